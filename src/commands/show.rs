//! Show command - displays configuration and patch information.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::patch;

/// Show target for the show command.
pub enum ShowTarget {
    /// Show current configuration
    Config { json: bool },
    /// Show discovered patches in application order
    Patches,
}

/// Execute the show command.
pub fn cmd_show(base_dir: &Path, config: &Config, target: ShowTarget) -> Result<()> {
    match target {
        ShowTarget::Config { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                config.print(base_dir);
            }
        }
        ShowTarget::Patches => {
            let patches_dir = base_dir.join(&config.patches_dir);
            let patches = patch::discover(&patches_dir)?;
            if patches.is_empty() {
                println!("No patches in {}", patches_dir.display());
            } else {
                println!("Patches in application order:");
                for (i, path) in patches.iter().enumerate() {
                    println!("  {}. {}", i + 1, path.display());
                }
            }
        }
    }
    Ok(())
}
