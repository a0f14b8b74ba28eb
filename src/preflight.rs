//! Preflight checks: verify the environment before a build.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::patch;
use crate::process;

/// Result of a single preflight check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed.
    Pass,
    /// Check failed - build will fail.
    Fail,
    /// Check passed but with a warning.
    Warn,
}

impl CheckResult {
    pub fn pass(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Pass,
            details: None,
        }
    }

    pub fn pass_with(name: &str, details: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Pass,
            details: Some(details.to_string()),
        }
    }

    pub fn fail(name: &str, details: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Fail,
            details: Some(details.to_string()),
        }
    }

    pub fn warn(name: &str, details: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warn,
            details: Some(details.to_string()),
        }
    }
}

/// Results of all preflight checks.
pub struct PreflightReport {
    pub checks: Vec<CheckResult>,
}

impl PreflightReport {
    /// Returns true if all checks passed (no failures).
    pub fn all_passed(&self) -> bool {
        !self.checks.iter().any(|c| c.status == CheckStatus::Fail)
    }

    /// Count of failed checks.
    pub fn fail_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.status == CheckStatus::Fail)
            .count()
    }

    /// Print the report to stdout.
    pub fn print(&self) {
        println!("=== Preflight Check Results ===\n");

        for check in &self.checks {
            let status_str = match check.status {
                CheckStatus::Pass => "PASS",
                CheckStatus::Fail => "FAIL",
                CheckStatus::Warn => "WARN",
            };

            print!("  [{}] {}", status_str, check.name);
            if let Some(details) = &check.details {
                println!(": {}", details);
            } else {
                println!();
            }
        }

        println!();
        let total = self.checks.len();
        let passed = self
            .checks
            .iter()
            .filter(|c| c.status == CheckStatus::Pass)
            .count();
        let failed = self.fail_count();

        println!("Summary: {}/{} passed", passed, total);
        if failed > 0 {
            println!("         {} FAILED - build will not succeed", failed);
        }
    }
}

/// Run all preflight checks.
pub fn run_checks(base_dir: &Path, config: &Config) -> Result<PreflightReport> {
    let mut checks = Vec::new();

    // Python interpreter used by bdist_rpm
    checks.push(match which::which(&config.python) {
        Ok(path) => CheckResult::pass_with(&config.python, &path.display().to_string()),
        Err(_) => CheckResult::fail(
            &config.python,
            "not found in PATH (set TELRPM_PYTHON to override)",
        ),
    });

    // patch tool
    checks.push(if process::exists("patch") {
        CheckResult::pass("patch")
    } else {
        CheckResult::fail("patch", "not found in PATH")
    });

    // Source tree and its setup.py
    let source = base_dir.join(&config.source_dir);
    checks.push(if config.has_source(base_dir) {
        CheckResult::pass_with("source tree", &source.display().to_string())
    } else if source.is_dir() {
        CheckResult::fail(
            "source tree",
            &format!("{} exists but has no setup.py", source.display()),
        )
    } else {
        CheckResult::fail(
            "source tree",
            &format!("{} not found", source.display()),
        )
    });

    // Patches directory (optional)
    let patches_dir = base_dir.join(&config.patches_dir);
    let patches = patch::discover(&patches_dir)?;
    checks.push(if !patches_dir.is_dir() {
        CheckResult::warn(
            "patches",
            &format!("{} not present, build will skip patching", patches_dir.display()),
        )
    } else if patches.is_empty() {
        CheckResult::warn("patches", "directory present but empty")
    } else {
        CheckResult::pass_with("patches", &format!("{} patch file(s)", patches.len()))
    });

    // Stale staging tree from an interrupted run
    let staging = base_dir.join(&config.staging_name);
    if staging.exists() {
        checks.push(CheckResult::warn(
            "staging",
            &format!(
                "{} already exists and will be replaced on build",
                staging.display()
            ),
        ));
    }

    Ok(PreflightReport { checks })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_all_passed() {
        let report = PreflightReport {
            checks: vec![CheckResult::pass("a"), CheckResult::warn("b", "meh")],
        };
        assert!(report.all_passed());
        assert_eq!(report.fail_count(), 0);
    }

    #[test]
    fn test_report_with_failure() {
        let report = PreflightReport {
            checks: vec![CheckResult::pass("a"), CheckResult::fail("b", "missing")],
        };
        assert!(!report.all_passed());
        assert_eq!(report.fail_count(), 1);
    }
}
