//! Patch discovery and application.
//!
//! Patches are unified diffs applied against the staging tree with one
//! leading path component stripped (`patch -p1`). Application order is
//! lexical by filename; the order is declared here rather than inherited
//! from whatever the filesystem happens to enumerate.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::PatchMode;
use crate::process::Cmd;

/// Outcome of applying one patch set.
#[derive(Debug, Default)]
pub struct PatchReport {
    /// Patches that applied cleanly, in application order.
    pub applied: Vec<PathBuf>,
    /// Patches that failed, with the patch tool's stderr.
    pub failed: Vec<(PathBuf, String)>,
}

impl PatchReport {
    /// Returns true if every discovered patch applied.
    pub fn all_applied(&self) -> bool {
        self.failed.is_empty()
    }

    /// Print a summary of failures to stderr.
    pub fn print_failures(&self) {
        for (path, stderr) in &self.failed {
            eprintln!("[WARN] Patch failed: {}", path.display());
            for line in stderr.lines() {
                eprintln!("       {}", line);
            }
        }
    }
}

/// Enumerate patch files in lexical filename order.
///
/// A missing or empty directory is not an error; it yields an empty set
/// and the pipeline skips the patch step.
pub fn discover(patches_dir: &Path) -> Result<Vec<PathBuf>> {
    if !patches_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut patches = Vec::new();
    let entries = fs::read_dir(patches_dir)
        .with_context(|| format!("Failed to read {}", patches_dir.display()))?;
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            patches.push(entry.path());
        }
    }

    // Lexical by filename, so 01-foo.patch precedes 02-bar.patch
    patches.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));
    Ok(patches)
}

/// Apply a single patch against the staging tree.
///
/// Returns the patch tool's stderr on failure instead of an error so the
/// caller can decide the policy.
fn apply_one(patch_file: &Path, staging: &Path) -> Result<std::result::Result<(), String>> {
    let result = Cmd::new("patch")
        .arg("-p1")
        .dir(staging)
        .stdin_file(patch_file)
        .allow_fail()
        .run()
        .with_context(|| format!("Failed to run patch for {}", patch_file.display()))?;

    if result.success() {
        Ok(Ok(()))
    } else {
        // patch writes rejects to stdout as well as stderr
        let mut detail = result.stderr_trimmed().to_string();
        if detail.is_empty() {
            detail = result.stdout.trim().to_string();
        }
        Ok(Err(detail))
    }
}

/// Apply all patches in order against the staging tree.
///
/// `BestEffort` records failures and keeps going, matching the original
/// build's observed behavior. `Strict` aborts on the first failure.
pub fn apply_all(patches: &[PathBuf], staging: &Path, mode: PatchMode) -> Result<PatchReport> {
    let mut report = PatchReport::default();

    for patch_file in patches {
        let name = patch_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| patch_file.display().to_string());
        println!("  Applying {}...", name);

        match apply_one(patch_file, staging)? {
            Ok(()) => report.applied.push(patch_file.clone()),
            Err(detail) => {
                if mode == PatchMode::Strict {
                    bail!("Patch {} failed to apply:\n{}", name, detail);
                }
                eprintln!("[WARN] Patch {} failed, continuing", name);
                report.failed.push((patch_file.clone(), detail));
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_missing_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        let patches = discover(&temp.path().join("patches")).unwrap();
        assert!(patches.is_empty());
    }

    #[test]
    fn test_discover_empty_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("patches");
        fs::create_dir_all(&dir).unwrap();
        assert!(discover(&dir).unwrap().is_empty());
    }

    #[test]
    fn test_discover_lexical_order() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("patches");
        fs::create_dir_all(&dir).unwrap();

        // Created out of order on purpose
        fs::write(dir.join("02-second.patch"), "").unwrap();
        fs::write(dir.join("10-last.patch"), "").unwrap();
        fs::write(dir.join("01-first.patch"), "").unwrap();

        let names: Vec<String> = discover(&dir)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["01-first.patch", "02-second.patch", "10-last.patch"]
        );
    }

    #[test]
    fn test_discover_skips_subdirectories() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("patches");
        fs::create_dir_all(dir.join("rejected")).unwrap();
        fs::write(dir.join("01-only.patch"), "").unwrap();

        let patches = discover(&dir).unwrap();
        assert_eq!(patches.len(), 1);
    }
}
