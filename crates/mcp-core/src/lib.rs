//! # MCP Workbench Core
//!
//! Building blocks for browsing and testing the tools exposed by MCP servers.
//!
//! The crate is organised around the screens of a tool-testing front end:
//!
//! - [`directory`]: a server's tool list and its search
//! - [`schema`]: the simplified, display-oriented view of a tool's input schema
//! - [`workspace`]: selection, JSON input, validation and the call lifecycle
//! - [`editor`]: the server configuration editor with debounced reformatting
//! - [`server_config`]: the stdio/network configuration union and its validation
//!
//! Talking to servers and persisting configurations happens behind the
//! [`backend::McpBackend`] and [`backend::ConfigStore`] traits.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mcp_workbench_core::backend::{HttpBackend, McpBackend};
//! use mcp_workbench_core::{ToolDirectory, ToolWorkspace};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = HttpBackend::new("http://localhost:3000".parse()?);
//! let client = backend.select_client("filesystem").await?;
//!
//! let mut workspace = ToolWorkspace::new(ToolDirectory::from(client));
//! workspace.select("read_file");
//! workspace.set_input(r#"{"path": "README.md"}"#);
//! let result = workspace.call_selected(&backend).await?;
//! println!("{:?}", result);
//! # Ok(())
//! # }
//! ```

#![warn(missing_debug_implementations)]

pub mod backend;
pub mod cache;
pub mod debounce;
pub mod directory;
pub mod editor;
pub mod error;
pub mod json;
pub mod messages;
pub mod schema;
pub mod server_config;
pub mod workspace;

pub use cache::ServerCache;
pub use directory::ToolDirectory;
pub use editor::ConfigEditor;
pub use error::{BackendError, ConfigError, WorkbenchError, WorkbenchResult};
pub use messages::{CallResult, McpClientInfo, ToolInfo};
pub use schema::{simplify, SchemaProperty, SimplifiedSchema};
pub use server_config::ServerConfig;
pub use workspace::ToolWorkspace;
