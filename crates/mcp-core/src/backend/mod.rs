//! Seams to the outside world.
//!
//! The workbench never talks MCP itself. Listing a server's tools and
//! invoking them goes through an [`McpBackend`], and persisting server
//! configurations goes through a [`ConfigStore`]. Two implementations ship
//! with the crate:
//!
//! - [`HttpBackend`]: the chat application's HTTP API (both traits)
//! - [`FileConfigStore`]: configurations kept in a local JSON file

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{BackendError, WorkbenchResult};
use crate::messages::McpClientInfo;
use crate::server_config::ServerConfig;

pub mod file;
#[cfg(feature = "http")]
pub mod http;

pub use file::FileConfigStore;
#[cfg(feature = "http")]
pub use http::HttpBackend;

/// Access to connected MCP servers.
#[async_trait]
pub trait McpBackend: Send + Sync {
    /// Fetch a server together with its tool list.
    async fn select_client(&self, server: &str) -> Result<McpClientInfo, BackendError>;

    /// Invoke a tool and return whatever it produced.
    async fn call_tool(&self, server: &str, tool: &str, args: Value) -> Result<Value, BackendError>;
}

/// A named server configuration as listed by a store.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoredServer {
    pub name: String,
    pub config: ServerConfig,
}

/// Persistence for server configurations.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Add a new configuration. Fails if the name is taken.
    async fn insert(&self, name: &str, config: &ServerConfig) -> WorkbenchResult<()>;

    /// Replace an existing configuration. Fails if the name is unknown.
    async fn update(&self, name: &str, config: &ServerConfig) -> WorkbenchResult<()>;

    async fn get(&self, name: &str) -> WorkbenchResult<Option<ServerConfig>>;

    /// All configurations, ordered by name.
    async fn list(&self) -> WorkbenchResult<Vec<StoredServer>>;

    /// Delete a configuration, returning whether it existed.
    async fn remove(&self, name: &str) -> WorkbenchResult<bool>;
}
