//! `call`: invoke a tool once and print its result.

use anyhow::{anyhow, bail, Context, Result};

use mcp_workbench_core::json::to_pretty_json;
use mcp_workbench_core::{CallResult, ServerCache, ToolWorkspace};

use super::{fetch_directory, CommandContext};
use crate::cli::CallArgs;
use crate::utils::{create_spinner, print_error, print_success, render_structured};

pub async fn run(ctx: &CommandContext, args: CallArgs) -> Result<()> {
    let input = match (&args.input, &args.input_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input from {}", path.display()))?,
        (None, None) => String::new(),
    };

    let backend = ctx.backend()?;
    let mut cache = ServerCache::new();
    let directory = fetch_directory(&backend, &mut cache, &args.server).await?;

    let mut workspace = ToolWorkspace::new(directory);
    if workspace.select(&args.tool).is_none() {
        bail!("Tool '{}' not found on '{}'", args.tool, args.server);
    }
    workspace.set_input(input);
    if let Some(error) = workspace.json_error() {
        bail!("Invalid JSON input: {}", error);
    }

    let spinner = create_spinner(format!("Calling '{}'...", args.tool));
    let result = workspace.call_selected(&backend).await;
    spinner.finish_and_clear();
    let result = result?;

    if let Some(out) = render_structured(&result, ctx.output)? {
        println!("{}", out);
    } else {
        print_call_result(&result);
    }

    match result {
        CallResult::Success { .. } => Ok(()),
        CallResult::Failure { error } => Err(anyhow!("Tool call failed: {}", error)),
    }
}

/// Print a call outcome for humans.
pub fn print_call_result(result: &CallResult) {
    match result {
        CallResult::Success { data } => {
            print_success("Success");
            println!("{}", to_pretty_json(data));
        }
        CallResult::Failure { error } => print_error(&format!("Error: {}", error)),
    }
}
