//! `tools`: list a server's tools.

use anyhow::Result;

use mcp_workbench_core::ServerCache;

use super::{fetch_directory, CommandContext};
use crate::cli::ToolsArgs;
use crate::utils::{print_info, render_structured, tools_table};

pub async fn run(ctx: &CommandContext, args: ToolsArgs) -> Result<()> {
    let backend = ctx.backend()?;
    let mut cache = ServerCache::new();
    let directory = fetch_directory(&backend, &mut cache, &args.server).await?;

    let query = args.search.as_deref().unwrap_or("");
    let tools = directory.filter(query);
    tracing::debug!("{} of {} tool(s) match '{}'", tools.len(), directory.len(), query);

    if let Some(out) = render_structured(&tools, ctx.output)? {
        println!("{}", out);
        return Ok(());
    }

    if let Some(message) = directory.empty_state(query) {
        print_info(message);
        return Ok(());
    }

    println!("🧰 Tools on '{}'", directory.server());
    println!("{}", tools_table(tools));
    Ok(())
}
