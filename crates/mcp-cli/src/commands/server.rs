//! `server`: list, show, add, edit and remove server configurations.
//!
//! Adding and editing go through the same [`ConfigEditor`] a graphical front
//! end would use, so the text is reformatted and validated exactly as it
//! would be there.

use anyhow::{bail, Context, Result};
use dialoguer::{Confirm, Input};
use tabled::{Table, Tabled};

use mcp_workbench_core::backend::{ConfigStore, StoredServer};
use mcp_workbench_core::json::{is_blank, validate_input};
use mcp_workbench_core::server_config::CONFIG_PLACEHOLDER;
use mcp_workbench_core::{ConfigEditor, ServerCache, ServerConfig};

use super::CommandContext;
use crate::cli::{ConfigSource, ServerAction, ServerArgs};
use crate::utils::{print_info, print_success, render_structured};

#[derive(Tabled)]
struct ServerTableRow {
    #[tabled(rename = "Server")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Target")]
    target: String,
}

impl From<&StoredServer> for ServerTableRow {
    fn from(server: &StoredServer) -> Self {
        let target = match &server.config {
            ServerConfig::Stdio(stdio) => {
                std::iter::once(stdio.command.as_str())
                    .chain(stdio.args.iter().map(String::as_str))
                    .collect::<Vec<_>>()
                    .join(" ")
            }
            ServerConfig::Network(network) => network.url.clone(),
        };
        Self {
            name: server.name.clone(),
            kind: server.config.kind().to_string(),
            target,
        }
    }
}

pub async fn run(ctx: &CommandContext, args: ServerArgs) -> Result<()> {
    let store = ctx.store()?;
    let mut cache = ServerCache::new();

    match args.action {
        ServerAction::List => list(ctx, store.as_ref(), &mut cache).await,
        ServerAction::Show { name } => show(ctx, store.as_ref(), &name).await,
        ServerAction::Add { name, source } => {
            add(ctx, store.as_ref(), &mut cache, name, &source).await
        }
        ServerAction::Edit { name, source } => {
            edit(ctx, store.as_ref(), &mut cache, &name, &source).await
        }
        ServerAction::Remove { name, yes } => remove(store.as_ref(), &name, yes).await,
    }
}

async fn list(ctx: &CommandContext, store: &dyn ConfigStore, cache: &mut ServerCache) -> Result<()> {
    let servers = cache.servers(store).await?;

    if let Some(out) = render_structured(servers, ctx.output)? {
        println!("{}", out);
        return Ok(());
    }
    if servers.is_empty() {
        print_info("No servers configured. Add one with 'mcp-workbench server add'");
        return Ok(());
    }

    let rows: Vec<ServerTableRow> = servers.iter().map(ServerTableRow::from).collect();
    let table = Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .with(tabled::settings::Padding::new(1, 1, 0, 0))
        .to_string();
    println!("{}", table);
    Ok(())
}

async fn show(ctx: &CommandContext, store: &dyn ConfigStore, name: &str) -> Result<()> {
    let Some(config) = store.get(name).await? else {
        bail!("Server '{}' not found", name);
    };
    let out = render_structured(&config, ctx.output)?
        .unwrap_or_else(|| mcp_workbench_core::json::to_pretty_json(&config));
    println!("{}", out);
    Ok(())
}

async fn add(
    ctx: &CommandContext,
    store: &dyn ConfigStore,
    cache: &mut ServerCache,
    name: Option<String>,
    source: &ConfigSource,
) -> Result<()> {
    let mut editor = ConfigEditor::insert(ctx.config.editor.debounce);

    let name = match name {
        Some(name) => name,
        None => Input::<String>::new()
            .with_prompt("Server name")
            .interact_text()?,
    };
    editor.set_name(name);

    let text = read_config_text(source, None)?;
    save_from_text(&mut editor, text, store, cache).await
}

async fn edit(
    ctx: &CommandContext,
    store: &dyn ConfigStore,
    cache: &mut ServerCache,
    name: &str,
    source: &ConfigSource,
) -> Result<()> {
    let Some(config) = store.get(name).await? else {
        bail!("Server '{}' not found", name);
    };
    let mut editor = ConfigEditor::edit(name, &config, ctx.config.editor.debounce);

    let current = serde_json::to_string(&config)?;
    let text = read_config_text(source, Some(&current))?;
    save_from_text(&mut editor, text, store, cache).await
}

/// Feed `text` through the editor, wait for it to settle, then save.
async fn save_from_text(
    editor: &mut ConfigEditor,
    text: String,
    store: &dyn ConfigStore,
    cache: &mut ServerCache,
) -> Result<()> {
    if is_blank(&text) {
        bail!("Configuration is empty");
    }

    editor.set_text(text);
    editor.settle().await;
    if let Some(error) = editor.json_error() {
        bail!("Invalid JSON: {}", error);
    }

    let outcome = editor
        .save(store, cache)
        .await
        .with_context(|| format!("Failed to save '{}'", editor.name().trim()))?;
    editor.close();

    println!("{}", editor.json_text());
    print_success(&format!(
        "{} ({} server '{}' {})",
        outcome.message,
        outcome.kind,
        outcome.name,
        if outcome.inserted { "added" } else { "updated" }
    ));
    Ok(())
}

/// Configuration JSON from the flags, or prompted for.
fn read_config_text(source: &ConfigSource, initial: Option<&str>) -> Result<String> {
    if let Some(json) = &source.json {
        return Ok(json.clone());
    }
    if let Some(path) = &source.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    if initial.is_none() {
        println!("{}\n", CONFIG_PLACEHOLDER);
    }
    let mut prompt = Input::<String>::new()
        .with_prompt("Configuration JSON")
        .validate_with(|text: &String| match validate_input(text) {
            Some(error) => Err(error),
            None => Ok(()),
        });
    if let Some(initial) = initial {
        prompt = prompt.with_initial_text(initial);
    }
    Ok(prompt.interact_text()?)
}

async fn remove(store: &dyn ConfigStore, name: &str, yes: bool) -> Result<()> {
    let confirmed = yes
        || Confirm::new()
            .with_prompt(format!("Remove server '{}'?", name))
            .default(false)
            .interact()?;
    if !confirmed {
        print_info("Cancelled");
        return Ok(());
    }

    if store.remove(name).await? {
        print_success(&format!("Removed '{}'", name));
        Ok(())
    } else {
        bail!("Server '{}' not found", name)
    }
}
