//! Preflight command - verifies the build environment.

use anyhow::{bail, Result};
use std::path::Path;

use crate::config::Config;
use crate::preflight;

/// Execute the preflight command.
pub fn cmd_preflight(base_dir: &Path, config: &Config, strict: bool) -> Result<()> {
    let report = preflight::run_checks(base_dir, config)?;
    report.print();

    if strict && !report.all_passed() {
        bail!("{} preflight check(s) failed", report.fail_count());
    }

    Ok(())
}
