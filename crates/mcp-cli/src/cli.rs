//! Command-line interface definitions for MCP Workbench

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::StoreKind;

/// MCP Workbench - browse, inspect and test the tools of MCP servers
#[derive(Parser, Debug)]
#[command(
    name = "mcp-workbench",
    version,
    about = "Browse, inspect and test the tools exposed by MCP servers",
    long_about = "MCP Workbench lists the tools of the MCP servers connected to a chat application, shows their input schemas, calls them with JSON input and manages the server connection configurations."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command; each overrides the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration file to load instead of the default one
    #[arg(long, global = true, env = "MCP_WORKBENCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the application serving the MCP API
    #[arg(long, global = true, env = "MCP_WORKBENCH_URL")]
    pub base_url: Option<String>,

    /// Request timeout, e.g. "30s" or "2m"
    #[arg(long, global = true, value_parser = humantime_serde::re::humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Where server configurations are kept
    #[arg(long, global = true, value_enum)]
    pub store: Option<StoreKind>,

    /// File for the local server store
    #[arg(long, global = true, env = "MCP_WORKBENCH_STORE")]
    pub store_path: Option<PathBuf>,

    /// Output format for structured data
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    pub output: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the tools a server exposes
    Tools(ToolsArgs),

    /// Show a tool's description and input schema
    Inspect(InspectArgs),

    /// Call a tool with JSON input
    Call(CallArgs),

    /// Browse and test a server's tools interactively
    Interactive(InteractiveArgs),

    /// Manage server connection configurations
    Server(ServerArgs),

    /// Show where logs, config and data are kept
    Paths,
}

#[derive(Args, Debug)]
pub struct ToolsArgs {
    /// Server name
    pub server: String,

    /// Only show tools whose name or description contains this text
    #[arg(short, long)]
    pub search: Option<String>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Server name
    pub server: String,

    /// Tool name
    pub tool: String,

    /// Print the whole description even when it is long
    #[arg(long)]
    pub full: bool,

    /// Expand nested object properties to any depth
    #[arg(long)]
    pub expand: bool,
}

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Server name
    pub server: String,

    /// Tool name
    pub tool: String,

    /// JSON input for the tool; empty input sends `{}`
    #[arg(short, long, conflicts_with = "input_file")]
    pub input: Option<String>,

    /// Read the JSON input from a file
    #[arg(long)]
    pub input_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct InteractiveArgs {
    /// Server to open; prompts for one when omitted
    pub server: Option<String>,
}

#[derive(Args, Debug)]
pub struct ServerArgs {
    #[command(subcommand)]
    pub action: ServerAction,
}

#[derive(Subcommand, Debug)]
pub enum ServerAction {
    /// List configured servers
    List,

    /// Print one server's configuration
    Show {
        /// Server name
        name: String,
    },

    /// Add a server
    Add {
        /// Server name; prompted for when omitted
        name: Option<String>,

        #[command(flatten)]
        source: ConfigSource,
    },

    /// Replace an existing server's configuration
    Edit {
        /// Server name
        name: String,

        #[command(flatten)]
        source: ConfigSource,
    },

    /// Remove a server
    Remove {
        /// Server name
        name: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Where a configuration's JSON comes from. Prompted for when neither is set.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigSource {
    /// Configuration JSON
    #[arg(long, conflicts_with = "file")]
    pub json: Option<String>,

    /// Read the configuration JSON from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable pretty output
    #[default]
    Pretty,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Pretty => write!(f, "pretty"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "mcp-workbench",
            "call",
            "files",
            "read_file",
            "--input",
            r#"{"path":"a"}"#,
            "--output",
            "json",
            "--timeout",
            "5s",
        ])
        .unwrap();

        assert_eq!(cli.global.output, OutputFormat::Json);
        assert_eq!(cli.global.timeout, Some(Duration::from_secs(5)));
        match cli.command {
            Commands::Call(args) => {
                assert_eq!(args.server, "files");
                assert_eq!(args.tool, "read_file");
                assert_eq!(args.input.as_deref(), Some(r#"{"path":"a"}"#));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_config_source_flags_conflict() {
        let result = Cli::try_parse_from([
            "mcp-workbench",
            "server",
            "add",
            "web",
            "--json",
            "{}",
            "--file",
            "config.json",
        ]);
        assert!(result.is_err());
    }
}
