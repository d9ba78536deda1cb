//! `inspect`: show one tool's description and simplified input schema.

use anyhow::{anyhow, Result};
use serde_json::json;

use mcp_workbench_core::workspace::{NO_INPUT_SCHEMA, NO_SCHEMA_PROPERTIES};
use mcp_workbench_core::{ServerCache, ToolWorkspace};

use super::{fetch_directory, CommandContext};
use crate::cli::InspectArgs;
use crate::utils::{print_info, render_schema, render_structured};

pub async fn run(ctx: &CommandContext, args: InspectArgs) -> Result<()> {
    let backend = ctx.backend()?;
    let mut cache = ServerCache::new();
    let directory = fetch_directory(&backend, &mut cache, &args.server).await?;

    let mut workspace = ToolWorkspace::new(directory);
    if workspace.select(&args.tool).is_none() {
        return Err(anyhow!(
            "Tool '{}' not found on '{}'",
            args.tool,
            args.server
        ));
    }
    if args.full {
        workspace.toggle_description();
    }

    let summary = json!({
        "tool": workspace.selected_tool(),
        "simplifiedSchema": workspace.simplified_schema(),
    });
    if let Some(out) = render_structured(&summary, ctx.output)? {
        println!("{}", out);
        return Ok(());
    }

    print_tool_details(&workspace, args.expand);
    Ok(())
}

/// Print the selected tool's description and schema tree.
pub fn print_tool_details(workspace: &ToolWorkspace, expand_all: bool) {
    let Some(tool) = workspace.selected_tool() else {
        return;
    };

    println!("🔧 {}", tool.name);
    if let Some(description) = workspace.description_preview() {
        if !description.is_empty() {
            println!("\n{}", description);
        }
    }
    if workspace.has_more_description() && !workspace.show_full_description() {
        print_info("Description truncated, use --full (or 'Show more') to see all of it");
    }

    println!("\n📋 Input schema");
    match workspace.simplified_schema() {
        None => print_info(NO_INPUT_SCHEMA),
        Some(schema) if schema.is_empty() => print_info(NO_SCHEMA_PROPERTIES),
        Some(schema) => {
            for line in render_schema(schema, expand_all) {
                println!("  {}", line);
            }
        }
    }
}
