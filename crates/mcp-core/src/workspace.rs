//! Interactive tool-testing workspace for one server.
//!
//! The workspace owns everything a user manipulates while testing tools:
//! the search query, the selected tool, the JSON input with its validation
//! error, and the outcome of the last call.
//!
//! Lifecycle:
//!
//! ```text
//! NoSelection --select--> ToolSelected --set_input--> Editing
//!      ^                       |                         |
//!      |                       +-------begin_call--------+
//!      |                                   |
//!      +------(tool disappears)       Calling --finish_call--> Resulted
//! ```
//!
//! Selecting a different tool resets all per-tool state. The reset is keyed
//! by tool name, so refreshing or re-filtering the list does not wipe the
//! input of a tool that is still selected.
//!
//! At most one call is in flight: [`ToolWorkspace::begin_call`] refuses to
//! start another, and [`ToolWorkspace::finish_call`] ignores outcomes that
//! belong to a selection the user has since left.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::backend::McpBackend;
use crate::directory::ToolDirectory;
use crate::error::{BackendError, WorkbenchError, WorkbenchResult};
use crate::json::{is_blank, parse_json, validate_input};
use crate::messages::{CallResult, ToolInfo};
use crate::schema::{simplify, SimplifiedSchema};

/// Characters of a description shown before "Show more".
pub const DESCRIPTION_PREVIEW_CHARS: usize = 300;

/// Shown in the detail panel when nothing is selected.
pub const SELECT_TOOL_PROMPT: &str = "Select a tool from the left to test";

/// Shown instead of the input editor for tools without a schema.
pub const NO_INPUT_SCHEMA: &str = "This tool doesn't have an input schema defined";

/// Shown when a schema has no properties to list.
pub const NO_SCHEMA_PROPERTIES: &str = "No schema properties available";

/// A call that has been started and awaits its outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCall {
    pub server: String,
    pub tool: String,
    pub args: Value,
    ticket: u64,
}

impl PendingCall {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }
}

/// Coarse state of the workspace, derived from its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NoSelection,
    ToolSelected,
    Editing,
    Calling,
    Resulted,
}

#[derive(Debug)]
pub struct ToolWorkspace {
    directory: ToolDirectory,
    search_query: String,
    selected: Option<String>,
    simplified_schema: Option<SimplifiedSchema>,
    json_input: String,
    json_error: Option<String>,
    call_result: Option<CallResult>,
    in_flight: Option<u64>,
    next_ticket: u64,
    show_input_schema: bool,
    show_full_description: bool,
}

impl ToolWorkspace {
    /// Open a workspace with the first tool selected.
    pub fn new(directory: ToolDirectory) -> Self {
        let mut workspace = Self {
            directory,
            search_query: String::new(),
            selected: None,
            simplified_schema: None,
            json_input: String::new(),
            json_error: None,
            call_result: None,
            in_flight: None,
            next_ticket: 0,
            show_input_schema: false,
            show_full_description: false,
        };
        workspace.select_index(0);
        workspace
    }

    pub fn server(&self) -> &str {
        self.directory.server()
    }

    pub fn directory(&self) -> &ToolDirectory {
        &self.directory
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Update the search query. The selection is left alone.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Tools matching the current query.
    pub fn filtered_tools(&self) -> Vec<&ToolInfo> {
        self.directory.filter(&self.search_query)
    }

    /// Message for an empty filtered list.
    pub fn empty_state(&self) -> Option<&'static str> {
        self.directory.empty_state(&self.search_query)
    }

    pub fn selected_tool(&self) -> Option<&ToolInfo> {
        self.selected
            .as_deref()
            .and_then(|name| self.directory.find(name))
    }

    /// Position of the selected tool in the filtered list, if visible.
    pub fn selected_index(&self) -> Option<usize> {
        let name = self.selected.as_deref()?;
        self.filtered_tools().iter().position(|tool| tool.name == name)
    }

    /// Select the tool at `index` of the filtered list.
    pub fn select_index(&mut self, index: usize) -> Option<&ToolInfo> {
        let name = self.filtered_tools().get(index).map(|tool| tool.name.clone())?;
        self.select(&name)
    }

    /// Select a tool by name.
    ///
    /// Switching to a different tool resets all per-tool state; selecting the
    /// current tool again changes nothing.
    pub fn select(&mut self, name: &str) -> Option<&ToolInfo> {
        self.directory.find(name)?;

        if self.selected.as_deref() != Some(name) {
            debug!("Selected tool '{}' on '{}'", name, self.server());
            self.selected = Some(name.to_string());
            self.reset_tool_state();
            self.refresh_schema();
        }
        self.selected_tool()
    }

    /// Replace the tool list after a refetch.
    ///
    /// The selection survives if the tool still exists; otherwise the first
    /// visible tool is selected.
    pub fn reload(&mut self, directory: ToolDirectory) {
        self.directory = directory;
        if self.selected_tool().is_some() {
            self.refresh_schema();
            return;
        }

        debug!("Selected tool vanished from '{}', reselecting", self.server());
        self.selected = None;
        self.reset_tool_state();
        self.simplified_schema = None;
        self.select_index(0);
    }

    fn reset_tool_state(&mut self) {
        self.call_result = None;
        self.in_flight = None;
        self.json_error = None;
        self.json_input.clear();
        self.show_input_schema = false;
        self.show_full_description = false;
    }

    fn refresh_schema(&mut self) {
        self.simplified_schema = self
            .selected_tool()
            .and_then(|tool| tool.input_schema.as_ref())
            .map(|schema| simplify(Some(schema)));
    }

    /// Simplified input schema of the selected tool, if it declares one.
    pub fn simplified_schema(&self) -> Option<&SimplifiedSchema> {
        self.simplified_schema.as_ref()
    }

    pub fn json_input(&self) -> &str {
        &self.json_input
    }

    /// Current validation error, only ever set for non-blank input.
    pub fn json_error(&self) -> Option<&str> {
        self.json_error.as_deref()
    }

    /// Replace the input text and revalidate it.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.json_input = text.into();
        self.json_error = validate_input(&self.json_input);
    }

    pub fn call_result(&self) -> Option<&CallResult> {
        self.call_result.as_ref()
    }

    pub fn is_call_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether a call may be started right now.
    pub fn can_call(&self) -> bool {
        self.selected_tool().is_some() && self.json_error.is_none() && self.in_flight.is_none()
    }

    pub fn phase(&self) -> Phase {
        if self.selected_tool().is_none() {
            Phase::NoSelection
        } else if self.in_flight.is_some() {
            Phase::Calling
        } else if self.call_result.is_some() {
            Phase::Resulted
        } else if !self.json_input.is_empty() {
            Phase::Editing
        } else {
            Phase::ToolSelected
        }
    }

    /// Start a call with the current input.
    ///
    /// Blank input is sent as an empty object.
    pub fn begin_call(&mut self) -> WorkbenchResult<PendingCall> {
        let tool = self
            .selected_tool()
            .map(|tool| tool.name.clone())
            .ok_or(WorkbenchError::NoToolSelected)?;
        if let Some(error) = &self.json_error {
            return Err(WorkbenchError::InvalidInput(error.clone()));
        }
        if self.in_flight.is_some() {
            return Err(WorkbenchError::CallInFlight);
        }

        let args = if is_blank(&self.json_input) {
            Value::Object(Map::new())
        } else {
            parse_json(&self.json_input)?
        };

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.in_flight = Some(ticket);
        info!("Calling '{}' on '{}'", tool, self.server());

        Ok(PendingCall {
            server: self.server().to_string(),
            tool,
            args,
            ticket,
        })
    }

    /// Record the outcome of a call started by [`begin_call`](Self::begin_call).
    ///
    /// Returns `false` if the outcome was discarded because the selection
    /// changed while the call was running.
    pub fn finish_call(&mut self, ticket: u64, outcome: Result<Value, BackendError>) -> bool {
        if self.in_flight != Some(ticket) {
            debug!("Discarding outcome of stale call #{}", ticket);
            return false;
        }
        self.in_flight = None;

        self.call_result = Some(match outcome {
            Ok(data) => CallResult::success(data),
            Err(e) => {
                let message = WorkbenchError::from(e).display_message();
                info!("Tool call failed: {}", message);
                CallResult::failure(message)
            }
        });
        true
    }

    /// Call the selected tool through `backend` and store the outcome.
    ///
    /// Backend failures become [`CallResult::Failure`]; only refusals to
    /// start (no selection, invalid input, call in flight) are returned as
    /// errors.
    pub async fn call_selected(&mut self, backend: &dyn McpBackend) -> WorkbenchResult<CallResult> {
        let pending = self.begin_call()?;
        let outcome = backend
            .call_tool(&pending.server, &pending.tool, pending.args.clone())
            .await;
        self.finish_call(pending.ticket, outcome);
        Ok(self
            .call_result
            .clone()
            .unwrap_or_else(|| CallResult::failure(crate::error::UNKNOWN_ERROR)))
    }

    pub fn show_input_schema(&self) -> bool {
        self.show_input_schema
    }

    pub fn toggle_input_schema(&mut self) {
        self.show_input_schema = !self.show_input_schema;
    }

    pub fn show_full_description(&self) -> bool {
        self.show_full_description
    }

    pub fn toggle_description(&mut self) {
        self.show_full_description = !self.show_full_description;
    }

    /// Whether the selected tool's description is long enough to truncate.
    pub fn has_more_description(&self) -> bool {
        self.selected_tool()
            .is_some_and(|tool| tool.description.chars().count() > DESCRIPTION_PREVIEW_CHARS)
    }

    /// The description as currently displayed.
    pub fn description_preview(&self) -> Option<String> {
        let tool = self.selected_tool()?;
        if self.show_full_description || !self.has_more_description() {
            return Some(tool.description.clone());
        }
        let head: String = tool
            .description
            .chars()
            .take(DESCRIPTION_PREVIEW_CHARS)
            .collect();
        Some(format!("{}...", head))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use crate::messages::McpClientInfo;
    use tracing_test::traced_test;

    fn tools() -> Vec<ToolInfo> {
        vec![
            ToolInfo::new("echo", "Echo the input back").with_input_schema(json!({
                "type": "object",
                "properties": {"text": {"type": "string"}},
                "required": ["text"]
            })),
            ToolInfo::new("explode", "Always fails").with_input_schema(json!({"type": "object"})),
            ToolInfo::new("plain", "No schema at all"),
        ]
    }

    fn workspace() -> ToolWorkspace {
        ToolWorkspace::new(ToolDirectory::new("srv", tools()))
    }

    struct Scripted;

    #[async_trait]
    impl McpBackend for Scripted {
        async fn select_client(&self, server: &str) -> Result<McpClientInfo, BackendError> {
            Ok(McpClientInfo {
                name: server.to_string(),
                tool_info: tools(),
            })
        }

        async fn call_tool(&self, _server: &str, tool: &str, args: Value) -> Result<Value, BackendError> {
            match tool {
                "explode" => Err(BackendError::remote(None, "boom")),
                "silent" => Err(BackendError::remote(None, "")),
                _ => Ok(json!({"echo": args})),
            }
        }
    }

    #[test]
    fn test_first_tool_selected_on_open() {
        let ws = workspace();
        assert_eq!(ws.selected_tool().unwrap().name, "echo");
        assert_eq!(ws.selected_index(), Some(0));
        assert_eq!(ws.phase(), Phase::ToolSelected);
        assert!(ws.simplified_schema().unwrap().get("text").unwrap().required);
    }

    #[test]
    fn test_empty_directory_has_no_selection() {
        let ws = ToolWorkspace::new(ToolDirectory::new("srv", vec![]));
        assert!(ws.selected_tool().is_none());
        assert_eq!(ws.phase(), Phase::NoSelection);
        assert!(!ws.can_call());
        assert_eq!(ws.empty_state(), Some(crate::directory::NO_TOOLS_AVAILABLE));
    }

    #[test]
    fn test_invalid_input_disables_call() {
        let mut ws = workspace();
        ws.set_input("{invalid");
        assert!(ws.json_error().is_some());
        assert!(!ws.can_call());
        assert!(matches!(ws.begin_call(), Err(WorkbenchError::InvalidInput(_))));
        assert!(!ws.is_call_loading());
    }

    #[test]
    fn test_blank_input_clears_error() {
        let mut ws = workspace();
        ws.set_input("{invalid");
        ws.set_input("  ");
        assert_eq!(ws.json_error(), None);
        assert!(ws.can_call());
    }

    #[test]
    fn test_blank_input_sends_empty_object() {
        let mut ws = workspace();
        let pending = ws.begin_call().unwrap();
        assert_eq!(pending.args, json!({}));
        assert_eq!(pending.tool, "echo");
        assert_eq!(pending.server, "srv");
        assert!(ws.is_call_loading());
    }

    #[test]
    fn test_at_most_one_call_in_flight() {
        let mut ws = workspace();
        let first = ws.begin_call().unwrap();
        assert!(matches!(ws.begin_call(), Err(WorkbenchError::CallInFlight)));

        assert!(ws.finish_call(first.ticket(), Ok(json!(1))));
        assert!(ws.begin_call().is_ok());
    }

    #[test]
    fn test_selecting_another_tool_resets_everything() {
        let mut ws = workspace();
        ws.set_input("{bad");
        ws.toggle_input_schema();
        ws.toggle_description();
        let pending = ws.begin_call();
        assert!(pending.is_err());
        ws.set_input(r#"{"text": "hi"}"#);
        let pending = ws.begin_call().unwrap();

        ws.select("explode").unwrap();
        assert_eq!(ws.json_input(), "");
        assert_eq!(ws.json_error(), None);
        assert_eq!(ws.call_result(), None);
        assert!(!ws.is_call_loading());
        assert!(!ws.show_input_schema());
        assert!(!ws.show_full_description());

        // The abandoned call must not leak into the new selection.
        assert!(!ws.finish_call(pending.ticket(), Ok(json!("late"))));
        assert_eq!(ws.call_result(), None);
    }

    #[test]
    #[traced_test]
    fn test_stale_outcome_is_logged() {
        let mut ws = workspace();
        let pending = ws.begin_call().unwrap();
        ws.select("plain");
        ws.finish_call(pending.ticket(), Err(BackendError::remote(None, "late")));
        assert!(logs_contain("Discarding outcome of stale call"));
    }

    #[test]
    fn test_reselecting_same_tool_keeps_state() {
        let mut ws = workspace();
        ws.set_input(r#"{"text": "keep"}"#);
        ws.select("echo");
        ws.select_index(0);
        assert_eq!(ws.json_input(), r#"{"text": "keep"}"#);
    }

    #[test]
    fn test_select_index_uses_filtered_list() {
        let mut ws = workspace();
        ws.set_search_query("FAILS");
        assert_eq!(ws.filtered_tools().len(), 1);
        assert_eq!(ws.select_index(0).unwrap().name, "explode");
        assert!(ws.select_index(5).is_none());
        assert_eq!(ws.selected_tool().unwrap().name, "explode");
    }

    #[test]
    fn test_filter_change_keeps_selection() {
        let mut ws = workspace();
        ws.set_input("{}");
        ws.set_search_query("plain");
        assert_eq!(ws.selected_tool().unwrap().name, "echo");
        assert_eq!(ws.selected_index(), None);
        assert_eq!(ws.json_input(), "{}");
    }

    #[test]
    fn test_unknown_tool_is_not_selected() {
        let mut ws = workspace();
        assert!(ws.select("missing").is_none());
        assert_eq!(ws.selected_tool().unwrap().name, "echo");
    }

    #[test]
    fn test_reload_keeps_existing_selection() {
        let mut ws = workspace();
        ws.select("explode");
        ws.set_input("{}");

        let mut reordered = tools();
        reordered.reverse();
        ws.reload(ToolDirectory::new("srv", reordered));
        assert_eq!(ws.selected_tool().unwrap().name, "explode");
        assert_eq!(ws.json_input(), "{}");
    }

    #[test]
    fn test_reload_without_selected_tool_reselects() {
        let mut ws = workspace();
        ws.select("explode");
        ws.set_input("{}");

        ws.reload(ToolDirectory::new("srv", vec![ToolInfo::new("fresh", "")]));
        assert_eq!(ws.selected_tool().unwrap().name, "fresh");
        assert_eq!(ws.json_input(), "");
        assert!(ws.simplified_schema().is_none());
    }

    #[tokio::test]
    async fn test_successful_call_stores_data() {
        let mut ws = workspace();
        ws.set_input(r#"{"text": "hi"}"#);

        let result = ws.call_selected(&Scripted).await.unwrap();
        assert_eq!(result, CallResult::success(json!({"echo": {"text": "hi"}})));
        assert_eq!(ws.phase(), Phase::Resulted);
        assert!(!ws.is_call_loading());
    }

    #[tokio::test]
    async fn test_failed_call_becomes_failure_result() {
        let mut ws = workspace();
        ws.select("explode");

        let result = ws.call_selected(&Scripted).await.unwrap();
        assert_eq!(result, CallResult::failure("boom"));
        assert_eq!(ws.call_result().unwrap().error(), Some("boom"));
        assert!(!ws.is_call_loading());
    }

    #[tokio::test]
    async fn test_failure_without_message_is_unknown_error() {
        let mut ws = ToolWorkspace::new(ToolDirectory::new("srv", vec![ToolInfo::new("silent", "")]));
        let result = ws.call_selected(&Scripted).await.unwrap();
        assert_eq!(result.error(), Some(crate::error::UNKNOWN_ERROR));
    }

    #[tokio::test]
    async fn test_new_call_replaces_previous_result() {
        let mut ws = workspace();
        ws.call_selected(&Scripted).await.unwrap();
        ws.set_input(r#"{"text": "again"}"#);
        ws.call_selected(&Scripted).await.unwrap();
        assert_eq!(
            ws.call_result().unwrap().data(),
            Some(&json!({"echo": {"text": "again"}}))
        );
    }

    #[test]
    fn test_description_preview_truncates() {
        let long = "x".repeat(DESCRIPTION_PREVIEW_CHARS + 20);
        let mut ws = ToolWorkspace::new(ToolDirectory::new("srv", vec![ToolInfo::new("long", long.clone())]));

        assert!(ws.has_more_description());
        let preview = ws.description_preview().unwrap();
        assert_eq!(preview.chars().count(), DESCRIPTION_PREVIEW_CHARS + 3);
        assert!(preview.ends_with("..."));

        ws.toggle_description();
        assert_eq!(ws.description_preview().unwrap(), long);
    }

    #[test]
    fn test_short_description_is_untouched() {
        let ws = workspace();
        assert!(!ws.has_more_description());
        assert_eq!(ws.description_preview().unwrap(), "Echo the input back");
    }
}
