//! MCP Workbench - browse, inspect and test the tools of MCP servers
//!
//! The CLI drives `mcp-workbench-core` against a chat application's MCP API:
//! list a server's tools, inspect their input schemas, call them with JSON
//! input, and manage server connection configurations.

#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod config;
mod paths;
mod utils;

use cli::{Cli, Commands};
use commands::CommandContext;
use paths::WorkbenchPaths;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = WorkbenchPaths::new()?;
    let interactive = matches!(cli.command, Commands::Interactive(_));
    init_logging(&paths, interactive)?;

    tracing::info!("MCP Workbench starting up, interactive: {}", interactive);
    tracing::debug!("Command: {:?}", cli.command);

    let ctx = CommandContext::new(&cli.global, paths)?;
    match cli.command {
        Commands::Tools(args) => commands::tools::run(&ctx, args).await,
        Commands::Inspect(args) => commands::inspect::run(&ctx, args).await,
        Commands::Call(args) => commands::call::run(&ctx, args).await,
        Commands::Interactive(args) => commands::interactive::run(&ctx, args).await,
        Commands::Server(args) => commands::server::run(&ctx, args).await,
        Commands::Paths => commands::paths::run(&ctx).await,
    }
}

/// Send all logs to a file so terminal output stays clean.
fn init_logging(paths: &WorkbenchPaths, interactive: bool) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mcp_workbench=debug,mcp_workbench_core=debug,info".into());

    let log_file_path = paths.log_file(if interactive {
        "mcp-workbench-interactive"
    } else {
        "mcp-workbench"
    });
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_file_path)?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_target(true)
        .with_thread_ids(interactive)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::info!("Log file: {:?}", log_file_path);
    tracing::info!("Using directory structure at: {}", paths.home_dir.display());

    if interactive {
        eprintln!("📄 Logs saved to: {}", log_file_path.display());
    }
    Ok(())
}
