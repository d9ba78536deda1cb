//! Tool-related types exchanged with the application backend.
//!
//! This module provides types for:
//! - Tool discovery (the client record listing a server's tools)
//! - Tool invocation (calling a tool with JSON arguments)
//! - Call outcomes as shown in the result panel

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool definition as exposed by an MCP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInfo {
    /// Name of the tool, unique within a server
    pub name: String,

    /// Human-readable description of what the tool does
    #[serde(default)]
    pub description: String,

    /// JSON Schema for the tool's input parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

impl ToolInfo {
    /// Create a new tool definition.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: None,
        }
    }

    /// Set the input schema for this tool.
    pub fn with_input_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }
}

/// A connected server together with the tools it exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpClientInfo {
    /// Server name
    pub name: String,

    /// Tools reported by the server, in server order
    #[serde(default)]
    pub tool_info: Vec<ToolInfo>,
}

/// Outcome of a single tool invocation.
///
/// A new value replaces the previous one on every attempt. On the wire it is
/// `{"success": bool, "data"?: ..., "error"?: "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CallResultRecord", into = "CallResultRecord")]
pub enum CallResult {
    /// The tool returned data.
    Success { data: Value },

    /// The invocation failed with a message.
    Failure { error: String },
}

#[derive(Serialize, Deserialize)]
struct CallResultRecord {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<CallResult> for CallResultRecord {
    fn from(result: CallResult) -> Self {
        match result {
            CallResult::Success { data } => Self {
                success: true,
                data: Some(data),
                error: None,
            },
            CallResult::Failure { error } => Self {
                success: false,
                data: None,
                error: Some(error),
            },
        }
    }
}

impl From<CallResultRecord> for CallResult {
    fn from(record: CallResultRecord) -> Self {
        if record.success {
            Self::success(record.data.unwrap_or(Value::Null))
        } else {
            Self::failure(
                record
                    .error
                    .unwrap_or_else(|| crate::error::UNKNOWN_ERROR.to_string()),
            )
        }
    }
}

impl CallResult {
    pub fn success(data: Value) -> Self {
        Self::Success { data }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returned data, present only on success.
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// Error message, present only on failure.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }
}
