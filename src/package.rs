//! Packaging tool invocation.
//!
//! Drives `python setup.py bdist_rpm` in the staging tree. The original
//! build never checked the tool's exit status; here a non-zero exit is a
//! hard error so a broken build cannot masquerade as success.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::process::Cmd;

/// Build the `setup.py bdist_rpm` argument list.
///
/// Pure so the exact invocation is testable without a Python toolchain.
/// `requires`/`build-requires` are passed verbatim even when empty.
pub fn bdist_rpm_args(config: &Config, release: u32, dist_dir: &Path) -> Vec<String> {
    vec![
        "setup.py".to_string(),
        "bdist_rpm".to_string(),
        format!("--python={}", config.python),
        format!("--dist-dir={}", dist_dir.display()),
        format!("--release={}", release),
        format!("--packager={}", config.packager),
        format!("--doc-files={}", config.doc_files.join(",")),
        format!("--requires={}", config.requires.join(",")),
        format!("--build-requires={}", config.build_requires.join(",")),
    ]
}

/// Run the packaging tool against the staging tree.
///
/// Output streams to the terminal so setup.py progress is visible.
pub fn build_rpm(config: &Config, release: u32, staging: &Path, dist_dir: &Path) -> Result<()> {
    println!(
        "Building RPM (release {}) with {}...",
        release, config.python
    );

    Cmd::new(&config.python)
        .args(bdist_rpm_args(config, release, dist_dir))
        .dir(staging)
        .error_msg("bdist_rpm failed")
        .run_interactive()?;

    Ok(())
}

/// True if an artifact filename carries the given release number.
///
/// bdist_rpm names artifacts `<name>-<version>-<release>.<arch>.rpm` (or
/// `.src.rpm`), so the release is the segment after the last dash.
fn artifact_matches(name: &str, release: u32) -> bool {
    let Some(stem) = name.strip_suffix(".rpm") else {
        return false;
    };
    let Some((_, tail)) = stem.rsplit_once('-') else {
        return false;
    };
    tail.split('.').next() == Some(release.to_string().as_str())
}

/// Find `.rpm` artifacts in the dist directory for the given release.
pub fn find_artifacts(dist_dir: &Path, release: u32) -> Result<Vec<PathBuf>> {
    let mut artifacts = Vec::new();

    let entries = fs::read_dir(dist_dir)
        .with_context(|| format!("Failed to read {}", dist_dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        if artifact_matches(&name.to_string_lossy(), release) {
            artifacts.push(entry.path());
        }
    }

    artifacts.sort();
    Ok(artifacts)
}
