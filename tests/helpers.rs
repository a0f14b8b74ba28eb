//! Shared test utilities for telrpm tests.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

use telrpm::config::{Config, PatchMode};

/// Test environment simulating the build root: an upstream source tree,
/// a patches directory, and a stub packaging tool standing in for the
/// Python toolchain.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Base directory (build root simulation)
    pub base_dir: PathBuf,
}

impl TestEnv {
    /// Create a new test environment with a mock Telephus source tree.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base_dir = temp_dir.path().to_path_buf();

        let src = base_dir.join("Telephus");
        fs::create_dir_all(src.join("telephus")).expect("Failed to create source tree");
        fs::write(src.join("setup.py"), "# setup stub\n").unwrap();
        fs::write(src.join("telephus/__init__.py"), "").unwrap();
        fs::write(src.join("README"), "hello\n").unwrap();
        fs::write(src.join("LICENSE"), "MIT\n").unwrap();

        Self {
            _temp_dir: temp_dir,
            base_dir,
        }
    }

    /// Write a patch file into the patches directory.
    pub fn write_patch(&self, name: &str, content: &str) {
        let dir = self.base_dir.join("patches");
        fs::create_dir_all(&dir).expect("Failed to create patches dir");
        fs::write(dir.join(name), content).expect("Failed to write patch");
    }

    /// Install a stub "python" that records its arguments to `args.log`
    /// in the dist directory and drops a plausible .rpm artifact there.
    pub fn install_stub_python(&self) -> PathBuf {
        let bin = self.base_dir.join("bin");
        fs::create_dir_all(&bin).unwrap();
        let script = bin.join("fake-python");

        let body = r#"#!/bin/sh
dist=.
rel=1
for arg in "$@"; do
  case "$arg" in
    --dist-dir=*) dist="${arg#--dist-dir=}" ;;
    --release=*)  rel="${arg#--release=}" ;;
  esac
done
printf '%s\n' "$@" > "$dist/args.log"
: > "$dist/telephus-1.0-$rel.noarch.rpm"
"#;
        fs::write(&script, body).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    /// Install a stub "python" that exits non-zero without producing
    /// anything, simulating a broken packaging toolchain.
    pub fn install_failing_python(&self) -> PathBuf {
        let bin = self.base_dir.join("bin");
        fs::create_dir_all(&bin).unwrap();
        let script = bin.join("failing-python");

        fs::write(&script, "#!/bin/sh\nexit 3\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    /// Default config wired to the stub packaging tool.
    pub fn config(&self) -> Config {
        let python = self.install_stub_python();
        Config {
            source_dir: "Telephus".into(),
            staging_name: "telephus".into(),
            patches_dir: "patches".into(),
            python: python.display().to_string(),
            packager: "Test Packager <test@example.org>".into(),
            doc_files: vec!["README".into(), "LICENSE".into()],
            requires: Vec::new(),
            build_requires: Vec::new(),
            patch_mode: PatchMode::BestEffort,
        }
    }

    /// Arguments the stub packaging tool recorded, one per line.
    pub fn recorded_args(&self) -> Vec<String> {
        let log = self.base_dir.join("args.log");
        fs::read_to_string(log)
            .map(|s| s.lines().map(|l| l.to_string()).collect())
            .unwrap_or_default()
    }

    pub fn staging_path(&self) -> PathBuf {
        self.base_dir.join("telephus")
    }
}

/// A patch rewriting README from "hello" to "goodbye" (applies with -p1).
pub const PATCH_HELLO_TO_GOODBYE: &str = "\
--- a/README
+++ b/README
@@ -1 +1 @@
-hello
+goodbye
";

/// Follow-up patch; only applies after [`PATCH_HELLO_TO_GOODBYE`].
pub const PATCH_GOODBYE_TO_FAREWELL: &str = "\
--- a/README
+++ b/README
@@ -1 +1 @@
-goodbye
+farewell
";

/// A patch whose context never matches the mock source tree.
pub const PATCH_NEVER_APPLIES: &str = "\
--- a/README
+++ b/README
@@ -1 +1 @@
-this line is not in the file
+whatever
";

/// Skip a test when the `patch` tool is unavailable on the host.
pub fn patch_tool_available() -> bool {
    let available = telrpm::process::exists("patch");
    if !available {
        eprintln!("skipping: 'patch' not found in PATH");
    }
    available
}
