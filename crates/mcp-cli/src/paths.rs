//! Path management for the workbench's files.
//!
//! Everything lives under one home directory (`~/.mcp-workbench` unless
//! `MCP_WORKBENCH_HOME` points elsewhere):
//!
//! ```text
//! ~/.mcp-workbench/
//!   logs/      one log file per run
//!   config/    mcp-workbench.toml
//!   data/      servers.json for the local server store
//! ```

use anyhow::Result;
use std::path::PathBuf;

/// Overrides the home directory.
pub const HOME_ENV: &str = "MCP_WORKBENCH_HOME";

#[derive(Debug, Clone)]
pub struct WorkbenchPaths {
    pub home_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl WorkbenchPaths {
    /// Resolve the home directory and make sure the layout exists.
    pub fn new() -> Result<Self> {
        Self::at(Self::resolve_home())
    }

    /// Use `home_dir` as the root, creating missing directories.
    pub fn at(home_dir: impl Into<PathBuf>) -> Result<Self> {
        let home_dir = home_dir.into();
        let paths = Self {
            logs_dir: home_dir.join("logs"),
            config_dir: home_dir.join("config"),
            data_dir: home_dir.join("data"),
            home_dir,
        };
        paths.ensure_directories_exist()?;
        Ok(paths)
    }

    fn resolve_home() -> PathBuf {
        if let Some(home) = std::env::var_os(HOME_ENV) {
            return PathBuf::from(home);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mcp-workbench")
    }

    fn ensure_directories_exist(&self) -> Result<()> {
        for dir in [&self.home_dir, &self.logs_dir, &self.config_dir, &self.data_dir] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Log file path with a timestamp.
    pub fn log_file(&self, name: &str) -> PathBuf {
        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        self.logs_dir.join(format!("{}-{}.log", name, timestamp))
    }

    pub fn config_file(&self, name: &str) -> PathBuf {
        self.config_dir.join(format!("{}.toml", name))
    }

    pub fn default_config_file(&self) -> PathBuf {
        self.config_file("mcp-workbench")
    }

    /// Default location of the local server store.
    pub fn default_store_file(&self) -> PathBuf {
        self.data_dir.join("servers.json")
    }
}
