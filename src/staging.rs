//! Staging tree lifecycle.
//!
//! The build never touches the upstream source tree. It works in a
//! disposable copy that is created fresh for each run and removed on
//! every exit path, including errors partway through the pipeline.

use anyhow::{bail, Context, Result};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively copy a directory tree, preserving Unix permissions.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.with_context(|| format!("Failed to walk {}", src.display()))?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .expect("walkdir entry outside walk root");
        let target = dst.join(rel);

        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
        } else if file_type.is_symlink() {
            let link = fs::read_link(entry.path())?;
            std::os::unix::fs::symlink(&link, &target)
                .with_context(|| format!("Failed to symlink {}", target.display()))?;
        } else {
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
            let mode = entry.metadata()?.permissions().mode();
            fs::set_permissions(&target, fs::Permissions::from_mode(mode))?;
        }
    }
    Ok(())
}

/// A disposable working copy of the source tree.
///
/// Created by copying the upstream source, mutated in place by patch
/// application, and removed when dropped. Dropping is best-effort; call
/// [`StagingTree::remove`] to surface cleanup errors.
#[derive(Debug)]
pub struct StagingTree {
    path: PathBuf,
    removed: bool,
}

impl StagingTree {
    /// Create a staging tree by copying `source` to `staging_name` under
    /// `base_dir`.
    ///
    /// Fails if the source tree is missing. A stale staging tree from a
    /// previous run is removed first so every run starts fresh.
    pub fn create(base_dir: &Path, source_name: &str, staging_name: &str) -> Result<Self> {
        let source = base_dir.join(source_name);
        let staging = base_dir.join(staging_name);

        if !source.is_dir() {
            bail!(
                "Source tree not found at {}\n\
                 Expected the upstream source in '{}' next to the tool.",
                source.display(),
                source_name
            );
        }

        // Clean up if it exists from a previous run
        if staging.exists() {
            println!("Removing stale staging tree {}...", staging.display());
            fs::remove_dir_all(&staging)
                .with_context(|| format!("Failed to remove stale {}", staging.display()))?;
        }

        copy_dir_recursive(&source, &staging).with_context(|| {
            format!(
                "Failed to stage {} as {}",
                source.display(),
                staging.display()
            )
        })?;

        Ok(Self {
            path: staging,
            removed: false,
        })
    }

    /// Path to the staging tree.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the staging tree, reporting failure.
    pub fn remove(mut self) -> Result<()> {
        self.removed = true;
        if self.path.exists() {
            fs::remove_dir_all(&self.path)
                .with_context(|| format!("Failed to remove staging tree {}", self.path.display()))?;
        }
        Ok(())
    }

    /// Leak the staging tree, leaving it on disk (debugging aid).
    pub fn keep(mut self) -> PathBuf {
        self.removed = true;
        self.path.clone()
    }
}

impl Drop for StagingTree {
    fn drop(&mut self) {
        if !self.removed {
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}
