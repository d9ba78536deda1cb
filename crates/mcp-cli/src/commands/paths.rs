//! `paths`: show where the workbench keeps its files.

use anyhow::Result;
use serde_json::json;
use std::path::Path;

use super::CommandContext;
use crate::config::StoreKind;
use crate::utils::render_structured;

pub async fn run(ctx: &CommandContext) -> Result<()> {
    let paths = &ctx.paths;
    let store = match ctx.config.store.kind {
        StoreKind::Remote => ctx.config.backend.base_url.clone(),
        StoreKind::File => ctx.store_path().display().to_string(),
    };

    let summary = json!({
        "home": paths.home_dir,
        "logs": paths.logs_dir,
        "config": paths.default_config_file(),
        "data": paths.data_dir,
        "store": store,
    });
    if let Some(out) = render_structured(&summary, ctx.output)? {
        println!("{}", out);
        return Ok(());
    }

    println!("📁 MCP Workbench Directory Structure");
    println!("═══════════════════════════════════");
    println!("   🏠 Home:   {}", paths.home_dir.display());
    print_dir("📄 Logs:  ", &paths.logs_dir)?;
    println!("   ⚙️  Config: {}", paths.default_config_file().display());
    print_dir("💾 Data:  ", &paths.data_dir)?;
    println!("\n🔌 Server store ({:?}): {}", ctx.config.store.kind, store);
    Ok(())
}

fn print_dir(label: &str, dir: &Path) -> Result<()> {
    let mut file_count = 0;
    let mut total_size = 0u64;
    for entry in std::fs::read_dir(dir)? {
        let metadata = entry?.metadata()?;
        if metadata.is_file() {
            file_count += 1;
            total_size += metadata.len();
        }
    }
    println!(
        "   {} {} ({} files, {})",
        label,
        dir.display(),
        file_count,
        format_file_size(total_size)
    );
    Ok(())
}

fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(1023), "1023 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
    }
}
