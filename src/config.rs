//! Configuration management for telrpm.
//!
//! Reads configuration from .env file and environment variables.
//! Environment variables take precedence over .env file.

use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Default upstream source tree name.
pub const DEFAULT_SOURCE_DIR: &str = "Telephus";
/// Default staging tree name (the patched, disposable copy).
pub const DEFAULT_STAGING_NAME: &str = "telephus";
/// Default patches directory.
pub const DEFAULT_PATCHES_DIR: &str = "patches";
/// Default target Python runtime for bdist_rpm.
pub const DEFAULT_PYTHON: &str = "python2.5";
/// Default packager identity embedded in the RPM.
pub const DEFAULT_PACKAGER: &str = "Brandon Williams <driftx@gmail.com>";

/// Patch application policy.
///
/// The original build kept going when a patch failed to apply, so
/// `BestEffort` is the default. `Strict` aborts on the first failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatchMode {
    BestEffort,
    Strict,
}

impl PatchMode {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "best-effort" => Some(PatchMode::BestEffort),
            "strict" => Some(PatchMode::Strict),
            _ => None,
        }
    }
}

/// Telrpm configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Name of the upstream source tree (default: Telephus)
    pub source_dir: String,
    /// Name of the staging tree the build works in (default: telephus)
    pub staging_name: String,
    /// Directory containing patch files (default: patches)
    pub patches_dir: String,
    /// Target Python interpreter for bdist_rpm (default: python2.5)
    pub python: String,
    /// Packager identity string embedded in RPM metadata
    pub packager: String,
    /// Documentation files to embed, passed as a comma-separated list
    pub doc_files: Vec<String>,
    /// Runtime package dependencies (empty by default, passed verbatim)
    pub requires: Vec<String>,
    /// Build-time package dependencies (empty by default, passed verbatim)
    pub build_requires: Vec<String>,
    /// Patch application policy
    pub patch_mode: PatchMode,
}

impl Config {
    /// Load configuration from .env file and environment.
    ///
    /// Searches for .env in the base directory; environment variables
    /// override anything the file sets.
    pub fn load(base_dir: &Path) -> Self {
        let mut env_vars = HashMap::new();

        // Try to load .env file
        let env_path = base_dir.join(".env");
        if env_path.exists() {
            if let Ok(content) = fs::read_to_string(&env_path) {
                for line in content.lines() {
                    let line = line.trim();
                    // Skip comments and empty lines
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    // Parse KEY=value
                    if let Some((key, value)) = line.split_once('=') {
                        let key = key.trim();
                        let value = value.trim();
                        // Remove quotes if present
                        let value = value.trim_matches('"').trim_matches('\'');
                        env_vars.insert(key.to_string(), value.to_string());
                    }
                }
            }
        }

        // Environment variables override .env file
        for (key, value) in std::env::vars() {
            env_vars.insert(key, value);
        }

        Self::from_vars(&env_vars)
    }

    /// Build a config from a resolved key/value map, applying defaults.
    fn from_vars(env_vars: &HashMap<String, String>) -> Self {
        let source_dir = env_vars
            .get("TELRPM_SOURCE_DIR")
            .cloned()
            .unwrap_or_else(|| DEFAULT_SOURCE_DIR.to_string());

        let staging_name = env_vars
            .get("TELRPM_STAGING_NAME")
            .cloned()
            .unwrap_or_else(|| DEFAULT_STAGING_NAME.to_string());

        let patches_dir = env_vars
            .get("TELRPM_PATCHES_DIR")
            .cloned()
            .unwrap_or_else(|| DEFAULT_PATCHES_DIR.to_string());

        let python = env_vars
            .get("TELRPM_PYTHON")
            .cloned()
            .unwrap_or_else(|| DEFAULT_PYTHON.to_string());

        let packager = env_vars
            .get("TELRPM_PACKAGER")
            .cloned()
            .unwrap_or_else(|| DEFAULT_PACKAGER.to_string());

        let doc_files = env_vars
            .get("TELRPM_DOC_FILES")
            .map(|s| parse_list(s))
            .unwrap_or_else(|| vec!["README".to_string(), "LICENSE".to_string()]);

        let requires = env_vars
            .get("TELRPM_REQUIRES")
            .map(|s| parse_list(s))
            .unwrap_or_default();

        let build_requires = env_vars
            .get("TELRPM_BUILD_REQUIRES")
            .map(|s| parse_list(s))
            .unwrap_or_default();

        let patch_mode = env_vars
            .get("TELRPM_PATCH_MODE")
            .and_then(|s| {
                let mode = PatchMode::parse(s);
                if mode.is_none() {
                    eprintln!(
                        "[WARN] Unknown TELRPM_PATCH_MODE '{}', using best-effort",
                        s
                    );
                }
                mode
            })
            .unwrap_or(PatchMode::BestEffort);

        Self {
            source_dir,
            staging_name,
            patches_dir,
            python,
            packager,
            doc_files,
            requires,
            build_requires,
            patch_mode,
        }
    }

    /// Check if the upstream source tree is available.
    pub fn has_source(&self, base_dir: &Path) -> bool {
        base_dir.join(&self.source_dir).join("setup.py").exists()
    }

    /// Print configuration for debugging.
    pub fn print(&self, base_dir: &Path) {
        println!("Configuration:");
        println!("  TELRPM_SOURCE_DIR: {}", self.source_dir);
        println!("  TELRPM_STAGING_NAME: {}", self.staging_name);
        println!("  TELRPM_PATCHES_DIR: {}", self.patches_dir);
        println!("  TELRPM_PYTHON: {}", self.python);
        println!("  TELRPM_PACKAGER: {}", self.packager);
        println!("  TELRPM_DOC_FILES: {}", self.doc_files.join(", "));
        println!("  TELRPM_REQUIRES: {}", self.requires.join(", "));
        println!("  TELRPM_BUILD_REQUIRES: {}", self.build_requires.join(", "));
        let mode = match self.patch_mode {
            PatchMode::BestEffort => "best-effort",
            PatchMode::Strict => "strict",
        };
        println!("  TELRPM_PATCH_MODE: {}", mode);
        if self.has_source(base_dir) {
            println!("  Source tree: FOUND");
        } else {
            println!(
                "  Source tree: NOT FOUND ({}/setup.py missing)",
                self.source_dir
            );
        }
    }
}

/// Split a comma-separated list, dropping empty entries.
fn parse_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(|p| p.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(&HashMap::new());
        assert_eq!(config.source_dir, "Telephus");
        assert_eq!(config.staging_name, "telephus");
        assert_eq!(config.patches_dir, "patches");
        assert_eq!(config.python, "python2.5");
        assert_eq!(config.doc_files, vec!["README", "LICENSE"]);
        assert!(config.requires.is_empty());
        assert!(config.build_requires.is_empty());
        assert_eq!(config.patch_mode, PatchMode::BestEffort);
    }

    #[test]
    fn test_overrides() {
        let mut vars = HashMap::new();
        vars.insert("TELRPM_PYTHON".to_string(), "python2.4".to_string());
        vars.insert(
            "TELRPM_DOC_FILES".to_string(),
            "README, CHANGELOG".to_string(),
        );
        vars.insert("TELRPM_PATCH_MODE".to_string(), "strict".to_string());

        let config = Config::from_vars(&vars);
        assert_eq!(config.python, "python2.4");
        assert_eq!(config.doc_files, vec!["README", "CHANGELOG"]);
        assert_eq!(config.patch_mode, PatchMode::Strict);
    }

    #[test]
    fn test_unknown_patch_mode_falls_back() {
        let mut vars = HashMap::new();
        vars.insert("TELRPM_PATCH_MODE".to_string(), "yolo".to_string());

        let config = Config::from_vars(&vars);
        assert_eq!(config.patch_mode, PatchMode::BestEffort);
    }

    #[test]
    fn test_parse_list_drops_empty() {
        assert_eq!(parse_list("a, b,,c "), vec!["a", "b", "c"]);
        assert!(parse_list("").is_empty());
    }
}
