//! The build pipeline: stage, patch, package, clean up.
//!
//! A straight-line sequence. The staging tree is a scoped resource, so it
//! is removed on every exit path; failures from the patch and packaging
//! steps are collected and judged at the end instead of being silently
//! dropped the way the original shell build did.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::config::{Config, PatchMode};
use crate::package;
use crate::patch::{self, PatchReport};
use crate::staging::StagingTree;

/// What a pipeline run produced.
#[derive(Debug)]
pub struct BuildReport {
    /// RPM artifacts found in the dist directory after the build.
    pub artifacts: Vec<PathBuf>,
    /// Per-patch outcomes.
    pub patches: PatchReport,
}

/// Options for a single pipeline run.
pub struct BuildOptions {
    /// RPM release number (default 1).
    pub release: u32,
    /// Override the configured patch policy with strict.
    pub strict_patches: bool,
    /// Leave the staging tree on disk for inspection.
    pub keep_staging: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            release: 1,
            strict_patches: false,
            keep_staging: false,
        }
    }
}

/// Run the full pipeline rooted at `base_dir`.
pub fn run(base_dir: &Path, config: &Config, opts: &BuildOptions) -> Result<BuildReport> {
    println!("=== Telephus RPM Build (release {}) ===\n", opts.release);

    // 1. Stage: copy the upstream tree into the disposable working copy.
    println!(
        "Staging {} -> {}...",
        config.source_dir, config.staging_name
    );
    let staging = StagingTree::create(base_dir, &config.source_dir, &config.staging_name)?;

    // 2. Patch.
    let mode = if opts.strict_patches {
        PatchMode::Strict
    } else {
        config.patch_mode
    };
    let patches_dir = base_dir.join(&config.patches_dir);
    let patches = patch::discover(&patches_dir)?;
    let patch_report = if patches.is_empty() {
        println!("No patches to apply.");
        PatchReport::default()
    } else {
        println!("Applying {} patches...", patches.len());
        patch::apply_all(&patches, staging.path(), mode)
            .context("Patch application aborted")?
    };

    // 3. Package. In best-effort mode this runs even after patch failures,
    // matching the original build.
    package::build_rpm(config, opts.release, staging.path(), base_dir)?;

    // 4. Clean up.
    if opts.keep_staging {
        let kept = staging.keep();
        println!("Staging tree kept at {}", kept.display());
    } else {
        staging.remove()?;
    }

    let artifacts = package::find_artifacts(base_dir, opts.release)?;

    // Judge accumulated failures at the end.
    patch_report.print_failures();
    if artifacts.is_empty() {
        bail!(
            "bdist_rpm exited successfully but no .rpm for release {} was found in {}",
            opts.release,
            base_dir.display()
        );
    }

    println!("\nBuild complete:");
    for artifact in &artifacts {
        println!("  {}", artifact.display());
    }
    if !patch_report.all_applied() {
        println!(
            "  ({} of {} patches failed to apply; see warnings above)",
            patch_report.failed.len(),
            patch_report.failed.len() + patch_report.applied.len()
        );
    }

    Ok(BuildReport {
        artifacts,
        patches: patch_report,
    })
}
