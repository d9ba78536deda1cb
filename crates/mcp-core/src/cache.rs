//! Cache of fetched server data.
//!
//! Views that show the server list or a server's tools read through a
//! [`ServerCache`]. Saving a configuration invalidates the affected entries so
//! the next read refetches instead of showing stale data.

use std::collections::HashMap;

use tracing::debug;

use crate::backend::{ConfigStore, McpBackend, StoredServer};
use crate::directory::ToolDirectory;
use crate::error::WorkbenchResult;

#[derive(Debug, Default)]
pub struct ServerCache {
    servers: Option<Vec<StoredServer>>,
    directories: HashMap<String, ToolDirectory>,
}

impl ServerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The server list, fetched from `store` when missing or invalidated.
    pub async fn servers(&mut self, store: &dyn ConfigStore) -> WorkbenchResult<&[StoredServer]> {
        if self.servers.is_none() {
            debug!("Fetching server list");
            self.servers = Some(store.list().await?);
        }
        Ok(self.servers.as_deref().unwrap_or_default())
    }

    /// A server's tools, fetched from `backend` when missing or invalidated.
    pub async fn directory(
        &mut self,
        backend: &dyn McpBackend,
        server: &str,
    ) -> WorkbenchResult<&ToolDirectory> {
        if !self.directories.contains_key(server) {
            debug!("Fetching tools for '{}'", server);
            let client = backend.select_client(server).await?;
            let directory = ToolDirectory::new(server, client.tool_info);
            self.directories.insert(server.to_string(), directory);
        }
        // Present: inserted above if it was missing.
        Ok(&self.directories[server])
    }

    /// Mark the server list stale.
    pub fn invalidate_list(&mut self) {
        self.servers = None;
    }

    /// Mark one server's tools stale.
    pub fn invalidate(&mut self, server: &str) {
        self.directories.remove(server);
    }

    pub fn is_list_stale(&self) -> bool {
        self.servers.is_none()
    }

    pub fn is_cached(&self, server: &str) -> bool {
        self.directories.contains_key(server)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;
    use crate::messages::{McpClientInfo, ToolInfo};
    use crate::server_config::ServerConfig;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        selects: AtomicUsize,
        lists: AtomicUsize,
    }

    #[async_trait]
    impl McpBackend for Counting {
        async fn select_client(&self, server: &str) -> Result<McpClientInfo, BackendError> {
            self.selects.fetch_add(1, Ordering::SeqCst);
            Ok(McpClientInfo {
                name: server.to_string(),
                tool_info: vec![ToolInfo::new("echo", "Echo input")],
            })
        }

        async fn call_tool(&self, _: &str, _: &str, args: Value) -> Result<Value, BackendError> {
            Ok(args)
        }
    }

    #[async_trait]
    impl ConfigStore for Counting {
        async fn insert(&self, _: &str, _: &ServerConfig) -> WorkbenchResult<()> {
            Ok(())
        }
        async fn update(&self, _: &str, _: &ServerConfig) -> WorkbenchResult<()> {
            Ok(())
        }
        async fn get(&self, _: &str) -> WorkbenchResult<Option<ServerConfig>> {
            Ok(None)
        }
        async fn list(&self) -> WorkbenchResult<Vec<StoredServer>> {
            self.lists.fetch_add(1, Ordering::SeqCst);
            Ok(vec![StoredServer {
                name: "one".to_string(),
                config: ServerConfig::network("https://one"),
            }])
        }
        async fn remove(&self, _: &str) -> WorkbenchResult<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_directory_is_fetched_once_until_invalidated() {
        let backend = Counting::default();
        let mut cache = ServerCache::new();

        assert_eq!(cache.directory(&backend, "srv").await.unwrap().len(), 1);
        cache.directory(&backend, "srv").await.unwrap();
        assert_eq!(backend.selects.load(Ordering::SeqCst), 1);

        cache.invalidate("srv");
        assert!(!cache.is_cached("srv"));
        cache.directory(&backend, "srv").await.unwrap();
        assert_eq!(backend.selects.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidated_list_is_refetched() {
        let store = Counting::default();
        let mut cache = ServerCache::new();
        assert!(cache.is_list_stale());

        cache.servers(&store).await.unwrap();
        cache.servers(&store).await.unwrap();
        assert_eq!(store.lists.load(Ordering::SeqCst), 1);

        cache.invalidate_list();
        assert!(cache.is_list_stale());
        assert_eq!(cache.servers(&store).await.unwrap()[0].name, "one");
        assert_eq!(store.lists.load(Ordering::SeqCst), 2);
    }
}
