//! Command implementations for the workbench CLI.

use anyhow::{Context, Result};
use std::path::PathBuf;

use mcp_workbench_core::backend::{ConfigStore, FileConfigStore, HttpBackend};
use mcp_workbench_core::{ServerCache, ToolDirectory};

use crate::cli::{GlobalArgs, OutputFormat};
use crate::config::{Config, StoreKind};
use crate::paths::WorkbenchPaths;
use crate::utils::create_spinner;

pub mod call;
pub mod inspect;
pub mod interactive;
pub mod paths;
pub mod server;
pub mod tools;

/// Settings resolved from the config file and command-line overrides.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub paths: WorkbenchPaths,
    pub config: Config,
    pub output: OutputFormat,
}

impl CommandContext {
    pub fn new(global: &GlobalArgs, paths: WorkbenchPaths) -> Result<Self> {
        let config_path = global
            .config
            .clone()
            .unwrap_or_else(|| paths.default_config_file());
        if global.config.is_none() && !config_path.exists() {
            Config::default().save_to_file(&config_path)?;
            tracing::info!("Wrote default config to {:?}", config_path);
        }
        let mut config = Config::load_from_file(&config_path)?;

        if let Some(base_url) = &global.base_url {
            config.backend.base_url = base_url.clone();
        }
        if let Some(timeout) = global.timeout {
            config.backend.timeout = timeout;
        }
        if let Some(kind) = global.store {
            config.store.kind = kind;
        }
        if let Some(path) = &global.store_path {
            config.store.path = Some(path.clone());
        }
        config.backend.base_url()?;

        Ok(Self {
            paths,
            config,
            output: global.output,
        })
    }

    pub fn backend(&self) -> Result<HttpBackend> {
        Ok(HttpBackend::with_options(
            self.config.backend.base_url()?,
            self.config.backend.timeout,
            &self.config.backend.headers,
        ))
    }

    pub fn store_path(&self) -> PathBuf {
        self.config
            .store
            .path
            .clone()
            .unwrap_or_else(|| self.paths.default_store_file())
    }

    /// The configured server store.
    pub fn store(&self) -> Result<Box<dyn ConfigStore>> {
        let store: Box<dyn ConfigStore> = match self.config.store.kind {
            StoreKind::Remote => Box::new(self.backend()?),
            StoreKind::File => Box::new(FileConfigStore::new(self.store_path())),
        };
        Ok(store)
    }
}

/// Fetch a server's tools behind a spinner.
pub async fn fetch_directory(
    backend: &HttpBackend,
    cache: &mut ServerCache,
    server: &str,
) -> Result<ToolDirectory> {
    let spinner = create_spinner(format!("Fetching tools from '{}'...", server));
    let result = cache.directory(backend, server).await.cloned();
    spinner.finish_and_clear();
    result.with_context(|| format!("Failed to load tools for '{}'", server))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_config_file() -> Result<()> {
        let temp = TempDir::new()?;
        let paths = WorkbenchPaths::at(temp.path())?;
        std::fs::write(
            paths.default_config_file(),
            "[backend]\nbase_url = \"http://file.example\"\ntimeout = \"10s\"\n",
        )?;

        let global = GlobalArgs {
            base_url: Some("http://flag.example".to_string()),
            store: Some(StoreKind::File),
            ..GlobalArgs::default()
        };
        let ctx = CommandContext::new(&global, paths)?;

        assert_eq!(ctx.config.backend.base_url, "http://flag.example");
        assert_eq!(ctx.config.backend.timeout, Duration::from_secs(10));
        assert_eq!(ctx.config.store.kind, StoreKind::File);
        assert_eq!(ctx.store_path(), ctx.paths.default_store_file());
        Ok(())
    }

    #[test]
    fn test_invalid_base_url_flag_is_rejected() -> Result<()> {
        let temp = TempDir::new()?;
        let paths = WorkbenchPaths::at(temp.path())?;
        let global = GlobalArgs {
            base_url: Some("::nope".to_string()),
            ..GlobalArgs::default()
        };
        assert!(CommandContext::new(&global, paths).is_err());
        Ok(())
    }
}
