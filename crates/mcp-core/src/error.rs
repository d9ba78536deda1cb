//! Error types for the MCP workbench core.
//!
//! Errors are split by where they originate:
//! - [`ConfigError`] for server configuration shape and validation failures
//! - [`BackendError`] for failures reported by the application backend or store
//! - [`WorkbenchError`] as the umbrella type returned by public operations

use thiserror::Error;

use crate::json::JsonError;

/// Result alias used throughout the core crate.
pub type WorkbenchResult<T> = Result<T, WorkbenchError>;

/// Message used whenever no better description of a failure can be extracted.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Top-level error type for workbench operations.
#[derive(Debug, Error)]
pub enum WorkbenchError {
    /// Text could not be parsed as JSON.
    #[error(transparent)]
    Json(#[from] JsonError),

    /// Server configuration is malformed or fails validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The backend or configuration store reported a failure.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// An operation needs a selected tool but none is resolved.
    #[error("No tool selected")]
    NoToolSelected,

    /// The tool input currently holds a JSON error.
    #[error("Tool input is not valid JSON: {0}")]
    InvalidInput(String),

    /// A tool call is already running for this workspace.
    #[error("A tool call is already in flight")]
    CallInFlight,

    /// A configuration save is already running for this editor.
    #[error("A save is already in progress")]
    SaveInFlight,

    /// The server name is blank.
    #[error("Name is required")]
    NameRequired,
}

/// Server configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The value is not an object that looks like either config variant.
    #[error("Configuration must be an object with either a `command` or a `url` field")]
    UnrecognizedShape,

    /// A field failed validation against the selected schema.
    #[error("Invalid {kind} configuration: `{field}` {reason}")]
    InvalidField {
        kind: &'static str,
        field: String,
        reason: String,
    },

    /// No configuration exists under the given name.
    #[error("MCP server not found: {0}")]
    NotFound(String),

    /// Inserting would overwrite an existing configuration.
    #[error("MCP server '{0}' already exists")]
    AlreadyExists(String),
}

/// Errors surfaced by backends and configuration stores.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The remote side answered with a failure.
    #[error("{message}")]
    Remote { status: Option<u16>, message: String },

    /// The request never produced a response.
    #[error("Request to {endpoint} failed: {reason}")]
    Request { endpoint: String, reason: String },

    /// The response body was not what was expected.
    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),

    /// Local persistence failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The backend is not configured for this operation.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

impl BackendError {
    /// Create a remote failure with a message.
    pub fn remote(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Create a request failure for an endpoint.
    pub fn request(endpoint: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Request {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl WorkbenchError {
    /// Human-readable message for display in a result panel.
    ///
    /// Falls back to [`UNKNOWN_ERROR`] when the rendered message is empty.
    pub fn display_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        }
    }

    /// Whether this error came from validating the configuration shape.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Config(ConfigError::InvalidField { .. } | ConfigError::UnrecognizedShape)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_remote_message_falls_back_to_unknown() {
        let err = WorkbenchError::from(BackendError::remote(Some(500), ""));
        assert_eq!(err.display_message(), UNKNOWN_ERROR);
    }

    #[test]
    fn test_remote_message_is_passed_through() {
        let err = WorkbenchError::from(BackendError::remote(None, "boom"));
        assert_eq!(err.display_message(), "boom");
    }

    #[test]
    fn test_invalid_field_message() {
        let err = ConfigError::InvalidField {
            kind: "stdio",
            field: "command".to_string(),
            reason: "must not be empty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid stdio configuration: `command` must not be empty"
        );
        assert!(WorkbenchError::from(err).is_validation());
    }
}
