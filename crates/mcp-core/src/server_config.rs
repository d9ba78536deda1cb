//! Connection configuration for an MCP server.
//!
//! A configuration is either a command to launch over stdio or a network
//! endpoint. Which one a JSON document describes is decided once, by
//! [`sniff`]: the presence of a string `url` field means network, a string
//! `command` field means stdio. Validation then runs against that variant only.
//!
//! # Example Configuration
//!
//! ```json
//! { "command": "node", "args": ["index.js"], "env": { "OPENAI_API_KEY": "sk-..." } }
//! ```
//!
//! ```json
//! { "url": "https://api.example.com", "headers": { "Authorization": "Bearer sk-..." } }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Placeholder text for an empty configuration editor.
pub const CONFIG_PLACEHOLDER: &str = r#"/** STDIO Example */
{
  "command": "node",
  "args": ["index.js"],
  "env": {
    "OPENAI_API_KEY": "sk-..."
  }
}

/** Network Example */
{
  "url": "https://api.example.com",
  "headers": {
    "Authorization": "Bearer sk-..."
  }
}"#;

/// The two configuration shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKind {
    Stdio,
    Network,
}

impl ConfigKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Network => "network",
        }
    }
}

impl std::fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Launch a server as a child process speaking over stdio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdioConfig {
    pub command: String,
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
}

/// Connect to a server over the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

/// A validated server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ServerConfig {
    Stdio(StdioConfig),
    Network(NetworkConfig),
}

impl ServerConfig {
    /// Create a stdio configuration.
    pub fn stdio(command: impl Into<String>, args: &[&str]) -> Self {
        Self::Stdio(StdioConfig {
            command: command.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            env: None,
        })
    }

    /// Create a network configuration.
    pub fn network(url: impl Into<String>) -> Self {
        Self::Network(NetworkConfig {
            url: url.into(),
            headers: None,
        })
    }

    pub fn kind(&self) -> ConfigKind {
        match self {
            Self::Stdio(_) => ConfigKind::Stdio,
            Self::Network(_) => ConfigKind::Network,
        }
    }

    /// Discriminate and validate a JSON value.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let kind = sniff(value).ok_or(ConfigError::UnrecognizedShape)?;
        validate(kind, value)
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl<'de> Deserialize<'de> for ServerConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Decide which configuration shape a value describes.
///
/// A string `url` takes precedence over a string `command`.
pub fn sniff(value: &Value) -> Option<ConfigKind> {
    let object = value.as_object()?;
    if object.get("url").is_some_and(Value::is_string) {
        Some(ConfigKind::Network)
    } else if object.get("command").is_some_and(Value::is_string) {
        Some(ConfigKind::Stdio)
    } else {
        None
    }
}

/// Cheap pre-check used to enable saving.
pub fn is_maybe_server_config(value: &Value) -> bool {
    sniff(value).is_some()
}

/// Validate a value against the schema of `kind`.
///
/// Unknown fields are ignored.
pub fn validate(kind: ConfigKind, value: &Value) -> Result<ServerConfig, ConfigError> {
    let object = value.as_object().ok_or(ConfigError::UnrecognizedShape)?;
    match kind {
        ConfigKind::Stdio => validate_stdio(object).map(ServerConfig::Stdio),
        ConfigKind::Network => validate_network(object).map(ServerConfig::Network),
    }
}

fn validate_stdio(object: &Map<String, Value>) -> Result<StdioConfig, ConfigError> {
    let kind = ConfigKind::Stdio;

    let command = match object.get("command") {
        Some(Value::String(command)) if !command.trim().is_empty() => command.clone(),
        Some(Value::String(_)) => return Err(invalid(kind, "command", "must not be empty")),
        Some(_) => return Err(invalid(kind, "command", "must be a string")),
        None => return Err(invalid(kind, "command", "is required")),
    };

    let args = match object.get("args") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid(kind, "args", "must contain only strings"))
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(invalid(kind, "args", "must be an array of strings")),
        None => return Err(invalid(kind, "args", "is required")),
    };

    let env = string_map(kind, "env", object.get("env"))?;

    Ok(StdioConfig { command, args, env })
}

fn validate_network(object: &Map<String, Value>) -> Result<NetworkConfig, ConfigError> {
    let kind = ConfigKind::Network;

    let url = match object.get("url") {
        Some(Value::String(url)) => url.clone(),
        Some(_) => return Err(invalid(kind, "url", "must be a string")),
        None => return Err(invalid(kind, "url", "is required")),
    };
    if let Err(e) = url::Url::parse(&url) {
        return Err(invalid(kind, "url", &format!("is not a valid URL ({})", e)));
    }

    let headers = string_map(kind, "headers", object.get("headers"))?;

    Ok(NetworkConfig { url, headers })
}

fn string_map(
    kind: ConfigKind,
    field: &str,
    value: Option<&Value>,
) -> Result<Option<BTreeMap<String, String>>, ConfigError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(entries)) => entries
            .iter()
            .map(|(key, value)| match value {
                Value::String(s) => Ok((key.clone(), s.clone())),
                _ => Err(invalid(kind, field, &format!("value for '{}' must be a string", key))),
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(Some),
        Some(_) => Err(invalid(kind, field, "must be an object of strings")),
    }
}

fn invalid(kind: ConfigKind, field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidField {
        kind: kind.as_str(),
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
