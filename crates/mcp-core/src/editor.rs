//! Editor for a server's connection configuration.
//!
//! The editor keeps a JSON text and the structured value parsed from it in
//! sync. Text edits are authoritative: every edit is parsed right away and,
//! when it parses, becomes the new structured value. Two debounced effects
//! follow an edit:
//!
//! - **reformat**: once the user pauses after a change to the parsed value,
//!   the text is replaced with the canonical pretty-printed form
//! - **error display**: once the user pauses on text that does not parse, the
//!   parse error is shown; any successful parse cancels it
//!
//! Timer events arrive on an internal channel. Drive them with
//! [`ConfigEditor::next_event`] from an event loop, or drain whatever has
//! fired with [`ConfigEditor::pump`].

use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backend::ConfigStore;
use crate::cache::ServerCache;
use crate::debounce::Debouncer;
use crate::error::{WorkbenchError, WorkbenchResult};
use crate::json::{is_blank, parse_json, to_pretty_json};
use crate::server_config::{is_maybe_server_config, ConfigKind, ServerConfig};

/// Default pause before reformatting or showing an error.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Confirmation reported after a successful save.
pub const SAVE_SUCCESS_MESSAGE: &str = "Configuration saved successfully";

/// A debounced effect that has come due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// Replace the text with its canonical formatting.
    Reformat { generation: u64, text: String },
    /// Show a parse error.
    ShowError { generation: u64, message: String },
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub name: String,
    pub kind: ConfigKind,
    pub inserted: bool,
    pub message: &'static str,
}

#[derive(Debug)]
pub struct ConfigEditor {
    initial_name: Option<String>,
    name: String,
    config: Value,
    json_text: String,
    json_error: Option<String>,
    is_saving: bool,
    reformat: Debouncer<EditorEvent>,
    error_display: Debouncer<EditorEvent>,
    events: mpsc::UnboundedReceiver<EditorEvent>,
    shutdown: CancellationToken,
}

impl ConfigEditor {
    /// Editor for a new server.
    pub fn insert(debounce: Duration) -> Self {
        Self::build(None, Value::Null, debounce)
    }

    /// Editor for an existing server. The name cannot be changed.
    pub fn edit(name: impl Into<String>, config: &ServerConfig, debounce: Duration) -> Self {
        Self::build(Some(name.into()), config.to_value(), debounce)
    }

    fn build(initial_name: Option<String>, config: Value, debounce: Duration) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let json_text = if config.is_null() {
            String::new()
        } else {
            to_pretty_json(&config)
        };

        Self {
            name: initial_name.clone().unwrap_or_default(),
            initial_name,
            config,
            json_text,
            json_error: None,
            is_saving: false,
            reformat: Debouncer::new(debounce, tx.clone(), &shutdown),
            error_display: Debouncer::new(debounce, tx, &shutdown),
            events,
            shutdown,
        }
    }

    /// Whether saving creates a new server rather than updating one.
    pub fn is_insert(&self) -> bool {
        self.initial_name.is_none()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Change the server name. Only allowed when inserting.
    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        if !self.is_insert() {
            return false;
        }
        self.name = name.into();
        true
    }

    pub fn json_text(&self) -> &str {
        &self.json_text
    }

    /// Last value the text parsed to.
    pub fn config(&self) -> &Value {
        &self.config
    }

    /// The error currently shown, if the text is non-empty.
    pub fn json_error(&self) -> Option<&str> {
        if self.json_text.is_empty() {
            None
        } else {
            self.json_error.as_deref()
        }
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    /// Handle an edit of the JSON text.
    ///
    /// Text that no longer parses drops any pending reformat, so a timer
    /// never overwrites a newer edit. Must be called within a tokio runtime.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.json_text = text.into();
        self.error_display.cancel();

        match parse_json(&self.json_text) {
            Ok(value) => {
                let changed = value != self.config;
                self.config = value;
                self.json_error = None;
                if changed {
                    let text = to_pretty_json(&self.config);
                    self.reformat
                        .schedule(|generation| EditorEvent::Reformat { generation, text });
                }
            }
            Err(e) if !is_blank(&self.json_text) => {
                self.reformat.cancel();
                let message = e.message;
                self.error_display
                    .schedule(|generation| EditorEvent::ShowError { generation, message });
            }
            Err(_) => self.reformat.cancel(),
        }
    }

    /// Apply a fired timer event. Returns whether it took effect.
    pub fn apply(&mut self, event: EditorEvent) -> bool {
        match event {
            EditorEvent::Reformat { generation, text } => {
                if !self.reformat.is_current(generation) {
                    return false;
                }
                self.reformat.complete(generation);
                debug!("Reformatting config text");
                self.error_display.cancel();
                self.json_error = None;
                self.json_text = text;
                true
            }
            EditorEvent::ShowError {
                generation,
                message,
            } => {
                if !self.error_display.is_current(generation) {
                    return false;
                }
                self.error_display.complete(generation);
                debug!("Showing config parse error: {}", message);
                self.json_error = Some(message);
                true
            }
        }
    }

    /// Apply every event that has already fired. Returns how many took effect.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            if self.apply(event) {
                applied += 1;
            }
        }
        applied
    }

    pub fn has_pending_timers(&self) -> bool {
        self.reformat.is_pending() || self.error_display.is_pending()
    }

    /// Wait for the next timer event and apply it.
    ///
    /// Returns `None` immediately when no timer is pending.
    pub async fn next_event(&mut self) -> Option<EditorEvent> {
        loop {
            if !self.has_pending_timers() {
                self.pump();
                return None;
            }
            let event = self.events.recv().await?;
            if self.apply(event.clone()) {
                return Some(event);
            }
        }
    }

    /// Apply timer events until none are pending.
    pub async fn settle(&mut self) {
        while self.next_event().await.is_some() {}
    }

    /// Whether the save action is currently unavailable.
    pub fn save_disabled(&self) -> bool {
        self.name.trim().is_empty()
            || self.is_saving
            || self.json_error.is_some()
            || !is_maybe_server_config(&self.config)
    }

    /// Validate and persist the configuration.
    ///
    /// On success the cached server list and this server's tools are
    /// invalidated. On failure the editor keeps its state.
    pub async fn save(
        &mut self,
        store: &dyn ConfigStore,
        cache: &mut ServerCache,
    ) -> WorkbenchResult<SaveOutcome> {
        if self.is_saving {
            return Err(WorkbenchError::SaveInFlight);
        }
        let config = ServerConfig::from_value(&self.config)?;
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(WorkbenchError::NameRequired);
        }

        let inserted = self.is_insert();
        self.is_saving = true;
        let result = if inserted {
            store.insert(&name, &config).await
        } else {
            store.update(&name, &config).await
        };
        self.is_saving = false;

        match result {
            Ok(()) => {
                cache.invalidate_list();
                cache.invalidate(&name);
                info!("Saved {} configuration for '{}'", config.kind(), name);
                self.initial_name = Some(name.clone());
                self.name = name.clone();
                Ok(SaveOutcome {
                    name,
                    kind: config.kind(),
                    inserted,
                    message: SAVE_SUCCESS_MESSAGE,
                })
            }
            Err(e) => {
                warn!("Failed to save '{}': {}", name, e);
                Err(e)
            }
        }
    }

    /// Stop all pending timers.
    pub fn close(&mut self) {
        self.shutdown.cancel();
        self.reformat.cancel();
        self.error_display.cancel();
    }
}

impl Drop for ConfigEditor {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
