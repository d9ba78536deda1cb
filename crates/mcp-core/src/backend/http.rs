//! HTTP backend talking to the chat application's MCP API.
//!
//! Endpoints, relative to the configured base URL:
//!
//! | Operation       | Request                                   |
//! |-----------------|-------------------------------------------|
//! | select client   | `GET    /api/mcp/{name}`                  |
//! | call tool       | `POST   /api/mcp/{name}/tools/{tool}`     |
//! | list configs    | `GET    /api/mcp`                         |
//! | get config      | `GET    /api/mcp/{name}/config`           |
//! | insert config   | `POST   /api/mcp` with `{name, config}`   |
//! | update config   | `PUT    /api/mcp/{name}` with the config  |
//! | remove config   | `DELETE /api/mcp/{name}`                  |
//!
//! Failed responses are turned into [`BackendError::Remote`] carrying the
//! body's `message` (or `error`) field, falling back to the raw body and then
//! to the status text.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use url::Url;

use super::{ConfigStore, McpBackend, StoredServer};
use crate::error::{BackendError, ConfigError, WorkbenchResult, UNKNOWN_ERROR};
use crate::messages::McpClientInfo;
use crate::server_config::ServerConfig;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`McpBackend`] and [`ConfigStore`] over the application's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Create a backend with default settings.
    pub fn new(base_url: Url) -> Self {
        Self::with_options(base_url, DEFAULT_TIMEOUT, &HashMap::new())
    }

    /// Create a backend with a request timeout and extra headers.
    ///
    /// Headers that are not valid HTTP header names or values are skipped.
    pub fn with_options(base_url: Url, timeout: Duration, headers: &HashMap<String, String>) -> Self {
        let mut builder = Client::builder().timeout(timeout);

        if !headers.is_empty() {
            let mut header_map = HeaderMap::new();
            for (key, value) in headers {
                match (key.parse::<HeaderName>(), HeaderValue::from_str(value)) {
                    (Ok(name), Ok(value)) => {
                        header_map.insert(name, value);
                    }
                    _ => warn!("Skipping invalid header '{}'", key),
                }
            }
            builder = builder.default_headers(header_map);
        }

        let client = builder.build().unwrap_or_else(|_| Client::new());
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL from path segments, escaping each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::Unavailable(format!("'{}' cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(["api", "mcp"])
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: &Url) -> RequestBuilder {
        debug!("{} {}", method, url);
        self.client.request(method, url.clone())
    }

    async fn send(&self, builder: RequestBuilder, url: &Url) -> Result<Response, BackendError> {
        let response = builder
            .send()
            .await
            .map_err(|e| BackendError::request(url.as_str(), e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        warn!("{} returned {}: {}", url, status, message);
        Err(BackendError::remote(Some(status.as_u16()), message))
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

/// Extract a readable message from a failed response.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            match value.get(key) {
                Some(Value::String(message)) if !message.trim().is_empty() => {
                    return message.clone()
                }
                Some(Value::Object(inner)) => {
                    if let Some(Value::String(message)) = inner.get("message") {
                        return message.clone();
                    }
                }
                _ => {}
            }
        }
    }
    if !body.trim().is_empty() {
        return body.trim().to_string();
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
}

#[async_trait]
impl McpBackend for HttpBackend {
    async fn select_client(&self, server: &str) -> Result<McpClientInfo, BackendError> {
        let url = self.endpoint(&[server])?;
        let response = self.send(self.request(Method::GET, &url), &url).await?;
        let client: McpClientInfo = Self::read_json(response).await?;
        info!("Server '{}' exposes {} tool(s)", server, client.tool_info.len());
        Ok(client)
    }

    async fn call_tool(&self, server: &str, tool: &str, args: Value) -> Result<Value, BackendError> {
        let url = self.endpoint(&[server, "tools", tool])?;
        info!("Calling tool '{}' on '{}'", tool, server);
        let response = self
            .send(self.request(Method::POST, &url).json(&args), &url)
            .await?;

        // Tools may legitimately return nothing.
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ConfigStore for HttpBackend {
    async fn insert(&self, name: &str, config: &ServerConfig) -> WorkbenchResult<()> {
        let url = self.endpoint(&[])?;
        let body = json!({ "name": name, "config": config });
        self.send(self.request(Method::POST, &url).json(&body), &url)
            .await?;
        Ok(())
    }

    async fn update(&self, name: &str, config: &ServerConfig) -> WorkbenchResult<()> {
        let url = self.endpoint(&[name])?;
        match self
            .send(self.request(Method::PUT, &url).json(config), &url)
            .await
        {
            Ok(_) => Ok(()),
            Err(BackendError::Remote {
                status: Some(404), ..
            }) => Err(ConfigError::NotFound(name.to_string()).into()),
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, name: &str) -> WorkbenchResult<Option<ServerConfig>> {
        let url = self.endpoint(&[name, "config"])?;
        match self.send(self.request(Method::GET, &url), &url).await {
            Ok(response) => Ok(Some(Self::read_json(response).await?)),
            Err(BackendError::Remote {
                status: Some(404), ..
            }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> WorkbenchResult<Vec<StoredServer>> {
        let url = self.endpoint(&[])?;
        let response = self.send(self.request(Method::GET, &url), &url).await?;
        let mut servers: Vec<StoredServer> = Self::read_json(response).await?;
        servers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(servers)
    }

    async fn remove(&self, name: &str) -> WorkbenchResult<bool> {
        let url = self.endpoint(&[name])?;
        match self.send(self.request(Method::DELETE, &url), &url).await {
            Ok(_) => Ok(true),
            Err(BackendError::Remote {
                status: Some(404), ..
            }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
