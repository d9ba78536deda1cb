//! Message types shared between the workbench and its backends.

pub mod tools;

pub use tools::{CallResult, McpClientInfo, ToolInfo};
