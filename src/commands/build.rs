//! Build command - runs the RPM pipeline.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::pipeline::{self, BuildOptions};

/// Execute the build command.
pub fn cmd_build(base_dir: &Path, config: &Config, opts: BuildOptions) -> Result<()> {
    pipeline::run(base_dir, config, &opts)?;
    Ok(())
}
