//! Server configurations persisted in a local JSON file.
//!
//! The file holds a single object keyed by server name:
//!
//! ```json
//! { "servers": { "files": { "command": "npx", "args": ["server-filesystem"] } } }
//! ```
//!
//! Writes go to a temporary file in the same directory which is then renamed
//! over the old file, so a crash never leaves a half-written store.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{ConfigStore, StoredServer};
use crate::error::{BackendError, ConfigError, WorkbenchResult};
use crate::server_config::ServerConfig;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    servers: BTreeMap<String, ServerConfig>,
}

/// A [`ConfigStore`] backed by a JSON file.
#[derive(Debug)]
pub struct FileConfigStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StoreFile, BackendError> {
        if !self.path.exists() {
            return Ok(StoreFile::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(StoreFile::default());
        }
        serde_json::from_str(&content).map_err(|e| {
            BackendError::Storage(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    fn save(&self, store: &StoreFile) -> Result<(), BackendError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let content = serde_json::to_string_pretty(store)
            .map_err(|e| BackendError::Storage(e.to_string()))?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(&self.path)
            .map_err(|e| BackendError::Storage(e.to_string()))?;

        debug!("Wrote {} server(s) to {:?}", store.servers.len(), self.path);
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn insert(&self, name: &str, config: &ServerConfig) -> WorkbenchResult<()> {
        let _guard = self.lock.lock().await;
        let mut store = self.load()?;
        if store.servers.contains_key(name) {
            return Err(ConfigError::AlreadyExists(name.to_string()).into());
        }
        store.servers.insert(name.to_string(), config.clone());
        self.save(&store)?;
        info!("Inserted {} server '{}'", config.kind(), name);
        Ok(())
    }

    async fn update(&self, name: &str, config: &ServerConfig) -> WorkbenchResult<()> {
        let _guard = self.lock.lock().await;
        let mut store = self.load()?;
        match store.servers.get_mut(name) {
            Some(existing) => *existing = config.clone(),
            None => return Err(ConfigError::NotFound(name.to_string()).into()),
        }
        self.save(&store)?;
        info!("Updated {} server '{}'", config.kind(), name);
        Ok(())
    }

    async fn get(&self, name: &str) -> WorkbenchResult<Option<ServerConfig>> {
        let _guard = self.lock.lock().await;
        Ok(self.load()?.servers.remove(name))
    }

    async fn list(&self) -> WorkbenchResult<Vec<StoredServer>> {
        let _guard = self.lock.lock().await;
        Ok(self
            .load()?
            .servers
            .into_iter()
            .map(|(name, config)| StoredServer { name, config })
            .collect())
    }

    async fn remove(&self, name: &str) -> WorkbenchResult<bool> {
        let _guard = self.lock.lock().await;
        let mut store = self.load()?;
        let existed = store.servers.remove(name).is_some();
        if existed {
            self.save(&store)?;
            info!("Removed server '{}'", name);
        }
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkbenchError;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileConfigStore {
        FileConfigStore::new(dir.path().join("nested").join("servers.json"))
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.list().await.unwrap().is_empty());
        assert_eq!(store.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_insert_then_get_and_list() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store
            .insert("web", &ServerConfig::network("https://mcp.example.com"))
            .await
            .unwrap();
        store
            .insert("files", &ServerConfig::stdio("npx", &["server-filesystem"]))
            .await
            .unwrap();

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["files", "web"]);
        assert_eq!(
            store.get("web").await.unwrap(),
            Some(ServerConfig::network("https://mcp.example.com"))
        );
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicates() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let config = ServerConfig::stdio("node", &["index.js"]);

        store.insert("dup", &config).await.unwrap();
        let err = store.insert("dup", &config).await.unwrap_err();
        assert!(matches!(err, WorkbenchError::Config(ConfigError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_update_requires_existing() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let config = ServerConfig::stdio("node", &[]);

        let err = store.update("ghost", &config).await.unwrap_err();
        assert!(matches!(err, WorkbenchError::Config(ConfigError::NotFound(_))));

        store.insert("real", &config).await.unwrap();
        let replacement = ServerConfig::network("https://x");
        store.update("real", &replacement).await.unwrap();
        assert_eq!(store.get("real").await.unwrap(), Some(replacement));
    }

    #[tokio::test]
    async fn test_remove() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store
            .insert("gone", &ServerConfig::stdio("node", &[]))
            .await
            .unwrap();

        assert!(store.remove("gone").await.unwrap());
        assert!(!store.remove("gone").await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("servers.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = FileConfigStore::new(&path).list().await.unwrap_err();
        assert!(matches!(err, WorkbenchError::Backend(BackendError::Storage(_))));
    }
}
