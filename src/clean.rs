//! Build artifact cleaning.

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::Config;

/// Remove a stale staging tree left by an interrupted run.
pub fn clean_staging(base_dir: &Path, config: &Config) -> Result<()> {
    let staging = base_dir.join(&config.staging_name);

    if staging.exists() {
        println!("Removing {}...", staging.display());
        fs::remove_dir_all(&staging)?;
        println!("Staging tree cleaned.");
    } else {
        println!("No staging tree to clean.");
    }

    Ok(())
}

/// Remove built `.rpm` artifacts and the `build/` directory bdist_rpm
/// leaves behind in the dist directory.
pub fn clean_artifacts(base_dir: &Path) -> Result<()> {
    let mut cleaned = false;

    let entries = fs::read_dir(base_dir)?;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_string_lossy().ends_with(".rpm") {
            println!("Removing {}...", entry.path().display());
            fs::remove_file(entry.path())?;
            cleaned = true;
        }
    }

    let build_dir = base_dir.join("build");
    if build_dir.is_dir() {
        println!("Removing {}...", build_dir.display());
        fs::remove_dir_all(&build_dir)?;
        cleaned = true;
    }

    if cleaned {
        println!("Artifacts cleaned.");
    } else {
        println!("No artifacts to clean.");
    }

    Ok(())
}

/// Clean everything (staging + artifacts).
pub fn clean_all(base_dir: &Path, config: &Config) -> Result<()> {
    clean_staging(base_dir, config)?;
    clean_artifacts(base_dir)?;
    println!("\nFull clean complete.");
    Ok(())
}
