//! Clean command - removes staging trees and build artifacts.

use anyhow::Result;
use std::path::Path;

use crate::clean;
use crate::config::Config;

/// Clean target for the clean command.
pub enum CleanTarget {
    /// Clean staging tree only (default)
    Staging,
    /// Clean built artifacts only
    Artifacts,
    /// Clean everything
    All,
}

/// Execute the clean command.
pub fn cmd_clean(base_dir: &Path, config: &Config, target: CleanTarget) -> Result<()> {
    match target {
        CleanTarget::Staging => clean::clean_staging(base_dir, config)?,
        CleanTarget::Artifacts => clean::clean_artifacts(base_dir)?,
        CleanTarget::All => clean::clean_all(base_dir, config)?,
    }
    Ok(())
}
