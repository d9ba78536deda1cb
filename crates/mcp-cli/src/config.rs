//! Configuration for the workbench CLI.
//!
//! Settings are read from `~/.mcp-workbench/config/mcp-workbench.toml` when
//! it exists; missing keys fall back to defaults, and command-line flags
//! (or their environment variables) take precedence over the file.
//!
//! ```toml
//! [backend]
//! base_url = "http://localhost:3000"
//! timeout = "30s"
//!
//! [backend.headers]
//! Authorization = "Bearer ..."
//!
//! [editor]
//! debounce = "1s"
//!
//! [store]
//! kind = "file"
//! path = "/home/me/.mcp-workbench/data/servers.json"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use mcp_workbench_core::backend::http::DEFAULT_TIMEOUT;
use mcp_workbench_core::editor::DEFAULT_DEBOUNCE;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub editor: EditorConfig,
    pub store: StoreConfig,
}

/// Where tool listings and calls are sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Quiet period before the config editor reformats or shows an error.
    #[serde(with = "humantime_serde")]
    pub debounce: Duration,
}

/// Where server configurations are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub kind: StoreKind,
    /// File used by [`StoreKind::File`]; defaults to the data directory.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// The application's API, next to the tools.
    #[default]
    Remote,
    /// A local JSON file.
    File,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            headers: HashMap::new(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl BackendConfig {
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url)
            .with_context(|| format!("Invalid backend base URL '{}'", self.base_url))
    }
}

impl Config {
    /// Load configuration from `path`, or defaults if it does not exist.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.backend.base_url()?;

        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
