//! Telrpm - Telephus RPM package builder.
//!
//! Stages a copy of the Telephus source tree, applies the patches in
//! `patches/`, runs `setup.py bdist_rpm` with the configured metadata,
//! and removes the staging tree when done.

mod clean;
mod commands;
mod config;
mod package;
mod patch;
mod pipeline;
mod preflight;
mod process;
mod staging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use config::Config;
use pipeline::BuildOptions;

#[derive(Parser)]
#[command(name = "telrpm")]
#[command(about = "Telephus RPM package builder")]
#[command(
    after_help = "QUICK START:\n  telrpm preflight  Check all dependencies\n  telrpm build      Stage, patch, and build the RPM\n  telrpm clean all  Remove staging tree and artifacts"
)]
struct Cli {
    /// Base directory containing the source tree and patches
    /// (default: the directory holding this executable)
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the RPM (stage, patch, package, clean up)
    Build {
        /// RPM release number
        #[arg(default_value = "1")]
        release: u32,

        /// Abort on the first patch that fails to apply
        #[arg(long)]
        strict_patches: bool,

        /// Leave the staging tree on disk for inspection
        #[arg(long)]
        keep_staging: bool,
    },

    /// Clean staging tree and build artifacts
    Clean {
        #[command(subcommand)]
        what: Option<CleanTarget>,
    },

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowTarget,
    },

    /// Run preflight checks (verify tools and layout before build)
    Preflight {
        /// Fail if any checks fail (exit code 1)
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Subcommand)]
enum CleanTarget {
    /// Clean stale staging tree only
    Staging,
    /// Clean built .rpm artifacts and build/ directory
    Artifacts,
    /// Clean everything
    All,
}

#[derive(Subcommand)]
enum ShowTarget {
    /// Show current configuration
    Config {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show discovered patches in application order
    Patches,
}

/// Resolve the working root: explicit flag, else the executable's own
/// directory (the tool lives next to the source tree and patches).
fn resolve_base_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    let exe = std::env::current_exe().context("Failed to resolve own executable path")?;
    let dir = exe
        .parent()
        .context("Executable has no parent directory")?;
    Ok(dir.to_path_buf())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let base_dir = resolve_base_dir(cli.base_dir)?;

    // Load .env if present
    dotenvy::dotenv().ok();
    let config = Config::load(&base_dir);

    match cli.command {
        Commands::Build {
            release,
            strict_patches,
            keep_staging,
        } => {
            let opts = BuildOptions {
                release,
                strict_patches,
                keep_staging,
            };
            commands::cmd_build(&base_dir, &config, opts)?;
        }

        Commands::Clean { what } => {
            let clean_target = match what {
                None => commands::clean::CleanTarget::Staging,
                Some(CleanTarget::Staging) => commands::clean::CleanTarget::Staging,
                Some(CleanTarget::Artifacts) => commands::clean::CleanTarget::Artifacts,
                Some(CleanTarget::All) => commands::clean::CleanTarget::All,
            };
            commands::cmd_clean(&base_dir, &config, clean_target)?;
        }

        Commands::Show { what } => {
            let show_target = match what {
                ShowTarget::Config { json } => commands::show::ShowTarget::Config { json },
                ShowTarget::Patches => commands::show::ShowTarget::Patches,
            };
            commands::cmd_show(&base_dir, &config, show_target)?;
        }

        Commands::Preflight { strict } => {
            commands::cmd_preflight(&base_dir, &config, strict)?;
        }
    }

    Ok(())
}
