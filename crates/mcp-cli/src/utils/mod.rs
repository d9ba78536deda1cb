//! Terminal output helpers.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tabled::{Table, Tabled};

use mcp_workbench_core::schema::SimplifiedSchema;
use mcp_workbench_core::ToolInfo;

use crate::cli::OutputFormat;

/// Nesting levels shown before nested objects collapse.
pub const SCHEMA_EXPANSION_DEPTH: usize = 1;

/// Characters of a description shown in tool tables.
const TABLE_DESCRIPTION_CHARS: usize = 60;

/// Print a banner message
pub fn print_banner(message: &str) {
    println!("🚀 {}", message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("✅ {}", message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("❌ {}", message);
}

/// Print an informational message
pub fn print_info(message: &str) {
    println!("ℹ️  {}", message);
}

/// Serialize `value` in a machine-readable format.
///
/// Returns `None` for [`OutputFormat::Pretty`], which callers render
/// themselves.
pub fn render_structured<T: Serialize + ?Sized>(
    value: &T,
    format: OutputFormat,
) -> Result<Option<String>> {
    match format {
        OutputFormat::Pretty => Ok(None),
        OutputFormat::Json => Ok(Some(serde_json::to_string_pretty(value)?)),
        OutputFormat::Yaml => Ok(Some(serde_yaml::to_string(value)?)),
    }
}

/// Render a simplified schema as an indented property tree.
///
/// Nested objects deeper than [`SCHEMA_EXPANSION_DEPTH`] collapse to a
/// one-line marker unless `expand_all` is set.
pub fn render_schema(schema: &SimplifiedSchema, expand_all: bool) -> Vec<String> {
    let mut lines = Vec::new();
    render_level(schema, 0, expand_all, &mut lines);
    lines
}

fn render_level(schema: &SimplifiedSchema, level: usize, expand_all: bool, lines: &mut Vec<String>) {
    let indent = "  ".repeat(level);

    for (name, property) in schema.iter() {
        let mut line = format!("{}{}", indent, name);
        if property.required {
            line.push_str(" (required)");
        }
        if !property.kind.is_empty() {
            line.push_str(&format!(": {}", property.kind));
        }
        if let Some(values) = &property.enum_values {
            line.push_str(&format!(" [{}]", values.join(" | ")));
        }
        lines.push(line);

        let Some(nested) = &property.properties else {
            continue;
        };
        if nested.is_empty() {
            continue;
        }
        if expand_all || level < SCHEMA_EXPANSION_DEPTH {
            render_level(nested, level + 1, expand_all, lines);
        } else {
            lines.push(format!(
                "{}  ▸ {} nested propert{}",
                indent,
                nested.len(),
                if nested.len() == 1 { "y" } else { "ies" }
            ));
        }
    }
}

#[derive(Tabled)]
pub struct ToolTableRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Tool")]
    pub name: String,
    #[tabled(rename = "Inputs")]
    pub inputs: String,
    #[tabled(rename = "Description")]
    pub description: String,
}

/// Table of tools, numbered from 1.
pub fn tools_table<'a>(tools: impl IntoIterator<Item = &'a ToolInfo>) -> String {
    let rows: Vec<ToolTableRow> = tools
        .into_iter()
        .enumerate()
        .map(|(i, tool)| ToolTableRow {
            index: i + 1,
            name: tool.name.clone(),
            inputs: input_summary(tool),
            description: truncate(tool.description.lines().next().unwrap_or(""), TABLE_DESCRIPTION_CHARS),
        })
        .collect();

    Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .with(tabled::settings::Padding::new(1, 1, 0, 0))
        .to_string()
}

fn input_summary(tool: &ToolInfo) -> String {
    if tool.input_schema.is_none() {
        return "-".to_string();
    }
    let schema = mcp_workbench_core::simplify(tool.input_schema.as_ref());
    let required = schema.iter().filter(|(_, p)| p.required).count();
    format!("{} ({} required)", schema.len(), required)
}

/// Cut `text` to `max` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let head: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", head)
}

/// Spinner shown while waiting on the backend.
pub fn create_spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✔"])
        .template("{spinner:.blue.bold} {msg:.blue}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(std::time::Duration::from_millis(90));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_workbench_core::simplify;
    use serde_json::json;

    fn nested_schema() -> SimplifiedSchema {
        simplify(Some(&json!({
            "type": "object",
            "properties": {
                "path": {"type": "string"},
                "mode": {"type": "string", "enum": ["r", "w"]},
                "options": {
                    "type": "object",
                    "properties": {
                        "encoding": {"type": "string"},
                        "limits": {
                            "type": "object",
                            "properties": {
                                "bytes": {"type": "integer"}
                            }
                        }
                    },
                    "required": ["encoding"]
                }
            },
            "required": ["path"]
        })))
    }

    #[test]
    fn test_render_schema_collapses_deep_levels() {
        let lines = render_schema(&nested_schema(), false);
        assert_eq!(
            lines,
            vec![
                "path (required): string",
                "mode: string [r | w]",
                "options: object",
                "  encoding (required): string",
                "  limits: object",
                "    ▸ 1 nested property",
            ]
        );
    }

    #[test]
    fn test_render_schema_expand_all() {
        let lines = render_schema(&nested_schema(), true);
        assert_eq!(lines.last().map(String::as_str), Some("    bytes: integer"));
        assert!(!lines.iter().any(|line| line.contains('▸')));
    }

    #[test]
    fn test_render_structured() -> Result<()> {
        let value = json!({"a": 1});
        assert_eq!(render_structured(&value, OutputFormat::Pretty)?, None);
        assert_eq!(
            render_structured(&value, OutputFormat::Json)?.as_deref(),
            Some("{\n  \"a\": 1\n}")
        );
        assert_eq!(
            render_structured(&value, OutputFormat::Yaml)?.as_deref(),
            Some("a: 1\n")
        );
        Ok(())
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_tools_table_lists_every_tool() {
        let tools = vec![
            ToolInfo::new("read_file", "Read a file"),
            ToolInfo::new("echo", "Echo input").with_input_schema(json!({
                "type": "object",
                "properties": {"text": {"type": "string"}},
                "required": ["text"]
            })),
        ];
        let table = tools_table(&tools);
        assert!(table.contains("read_file"));
        assert!(table.contains("1 (1 required)"));
    }
}
