//! `interactive`: a prompt-driven session over one server's tools.
//!
//! Each round prints the workspace (selected tool, input, last result) and
//! offers the actions that are currently possible.

use anyhow::{bail, Result};
use dialoguer::{Input, Select};

use mcp_workbench_core::backend::ConfigStore;
use mcp_workbench_core::json::to_pretty_json;
use mcp_workbench_core::workspace::{NO_INPUT_SCHEMA, NO_SCHEMA_PROPERTIES, SELECT_TOOL_PROMPT};
use mcp_workbench_core::{ServerCache, ToolWorkspace};

use super::call::print_call_result;
use super::{fetch_directory, CommandContext};
use crate::cli::InteractiveArgs;
use crate::utils::{create_spinner, print_banner, print_error, print_info, render_schema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    SelectTool,
    ToggleDescription,
    ToggleSchema,
    EditInput,
    Call,
    Reload,
    Quit,
}

impl Action {
    fn label(&self, workspace: &ToolWorkspace) -> String {
        match self {
            Action::Search if workspace.search_query().is_empty() => "🔍 Search tools".to_string(),
            Action::Search => format!("🔍 Search tools (now '{}')", workspace.search_query()),
            Action::SelectTool => "🧰 Select tool".to_string(),
            Action::ToggleDescription if workspace.show_full_description() => "Show less".to_string(),
            Action::ToggleDescription => "Show more".to_string(),
            Action::ToggleSchema if workspace.show_input_schema() => "📋 Hide raw input schema".to_string(),
            Action::ToggleSchema => "📋 Show raw input schema".to_string(),
            Action::EditInput => "✏️  Edit JSON input".to_string(),
            Action::Call => "▶️  Call tool".to_string(),
            Action::Reload => "🔄 Reload tools".to_string(),
            Action::Quit => "Quit".to_string(),
        }
    }
}

/// Actions offered in the workspace's current state.
fn available_actions(workspace: &ToolWorkspace) -> Vec<Action> {
    let mut actions = vec![Action::Search, Action::SelectTool];
    if workspace.selected_tool().is_some() {
        if workspace.has_more_description() {
            actions.push(Action::ToggleDescription);
        }
        if workspace.simplified_schema().is_some() {
            actions.push(Action::ToggleSchema);
            actions.push(Action::EditInput);
        }
        if workspace.can_call() {
            actions.push(Action::Call);
        }
    }
    actions.push(Action::Reload);
    actions.push(Action::Quit);
    actions
}

pub async fn run(ctx: &CommandContext, args: InteractiveArgs) -> Result<()> {
    let backend = ctx.backend()?;
    let mut cache = ServerCache::new();

    let server = match args.server {
        Some(server) => server,
        None => {
            let store = ctx.store()?;
            pick_server(store.as_ref(), &mut cache).await?
        }
    };

    let directory = fetch_directory(&backend, &mut cache, &server).await?;
    let mut workspace = ToolWorkspace::new(directory);
    print_banner(&format!(
        "Testing tools on '{}' ({} available)",
        server,
        workspace.directory().len()
    ));

    loop {
        print_workspace(&workspace);

        let actions = available_actions(&workspace);
        let labels: Vec<String> = actions.iter().map(|a| a.label(&workspace)).collect();
        let choice = Select::new()
            .with_prompt("Action")
            .items(&labels)
            .default(0)
            .interact()?;

        match actions[choice] {
            Action::Search => {
                let query: String = Input::new()
                    .with_prompt("Search")
                    .with_initial_text(workspace.search_query())
                    .allow_empty(true)
                    .interact_text()?;
                workspace.set_search_query(query);
                print_tool_list(&workspace);
            }
            Action::SelectTool => select_tool(&mut workspace)?,
            Action::ToggleDescription => workspace.toggle_description(),
            Action::ToggleSchema => workspace.toggle_input_schema(),
            Action::EditInput => {
                let text: String = Input::new()
                    .with_prompt("JSON input")
                    .with_initial_text(workspace.json_input())
                    .allow_empty(true)
                    .interact_text()?;
                workspace.set_input(text);
            }
            Action::Call => {
                let spinner = create_spinner("Calling...");
                let result = workspace.call_selected(&backend).await;
                spinner.finish_and_clear();
                if let Err(e) = result {
                    print_error(&e.to_string());
                }
            }
            Action::Reload => {
                cache.invalidate(&server);
                let directory = fetch_directory(&backend, &mut cache, &server).await?;
                workspace.reload(directory);
            }
            Action::Quit => break,
        }
    }

    Ok(())
}

async fn pick_server(store: &dyn ConfigStore, cache: &mut ServerCache) -> Result<String> {
    let servers = cache.servers(store).await?;
    if servers.is_empty() {
        bail!("No servers configured. Add one with 'mcp-workbench server add'");
    }
    let names: Vec<&str> = servers.iter().map(|s| s.name.as_str()).collect();
    let index = Select::new()
        .with_prompt("Server")
        .items(&names)
        .default(0)
        .interact()?;
    Ok(names[index].to_string())
}

fn select_tool(workspace: &mut ToolWorkspace) -> Result<()> {
    let names: Vec<String> = workspace
        .filtered_tools()
        .iter()
        .map(|tool| tool.name.clone())
        .collect();
    if names.is_empty() {
        if let Some(message) = workspace.empty_state() {
            print_info(message);
        }
        return Ok(());
    }

    let index = Select::new()
        .with_prompt("Tool")
        .items(&names)
        .default(workspace.selected_index().unwrap_or(0))
        .interact()?;
    workspace.select_index(index);
    Ok(())
}

fn print_tool_list(workspace: &ToolWorkspace) {
    if let Some(message) = workspace.empty_state() {
        print_info(message);
        return;
    }
    for tool in workspace.filtered_tools() {
        let marker = if workspace.selected_tool().map(|t| &t.name) == Some(&tool.name) {
            "▶"
        } else {
            " "
        };
        println!(" {} {}", marker, tool.name);
    }
}

fn print_workspace(workspace: &ToolWorkspace) {
    println!();
    let Some(tool) = workspace.selected_tool() else {
        print_info(SELECT_TOOL_PROMPT);
        return;
    };

    println!("🔧 {}", tool.name);
    if let Some(description) = workspace.description_preview() {
        if !description.is_empty() {
            println!("{}", description);
        }
    }

    match workspace.simplified_schema() {
        None => print_info(NO_INPUT_SCHEMA),
        Some(schema) => {
            println!("📋 Input schema");
            if schema.is_empty() {
                print_info(NO_SCHEMA_PROPERTIES);
            }
            for line in render_schema(schema, false) {
                println!("  {}", line);
            }
            if let Some(raw) = raw_schema_text(workspace) {
                println!("📋 Input Schema: {}", tool.name);
                println!("{}", raw);
            }
            if !workspace.json_input().is_empty() {
                println!("📝 Input: {}", workspace.json_input());
            }
            if let Some(error) = workspace.json_error() {
                print_error(&format!("Invalid JSON: {}", error));
            }
        }
    }

    if let Some(result) = workspace.call_result() {
        print_call_result(result);
    }
}

/// The selected tool's schema as sent by the server, when toggled on.
fn raw_schema_text(workspace: &ToolWorkspace) -> Option<String> {
    if !workspace.show_input_schema() {
        return None;
    }
    let schema = workspace.selected_tool()?.input_schema.as_ref()?;
    Some(to_pretty_json(schema))
}
