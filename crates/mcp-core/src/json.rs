//! JSON parsing and canonical formatting for user-edited text.
//!
//! Both the tool-input field and the configuration editor funnel their text
//! through [`parse_json`]. Blank text is not an error for either caller, so
//! [`validate_input`] treats it as "nothing to report".

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// A failed parse attempt with the parser's own message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct JsonError {
    /// Human-readable description, including position when known.
    pub message: String,
    /// 1-based line of the failure, 0 when unknown.
    pub line: usize,
    /// 1-based column of the failure, 0 when unknown.
    pub column: usize,
}

impl From<serde_json::Error> for JsonError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}

/// Parse text into a JSON value.
pub fn parse_json(text: &str) -> Result<Value, JsonError> {
    serde_json::from_str(text).map_err(JsonError::from)
}

/// Whether text is empty or whitespace only.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Validate user input, returning the message to display if it is invalid.
///
/// Blank input yields `None`.
pub fn validate_input(text: &str) -> Option<String> {
    if is_blank(text) {
        return None;
    }
    parse_json(text).err().map(|e| e.message)
}

/// Serialize a value with two-space indentation.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> String {
    // Serializing a `Value` or plain data structs cannot fail; fall back to
    // compact output for exotic map keys.
    serde_json::to_string_pretty(value)
        .or_else(|_| serde_json::to_string(value))
        .unwrap_or_default()
}
