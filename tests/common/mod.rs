//! Shared test utilities and fixture generators

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tempfile::TempDir;

/// Shell script standing in for sox.
///
/// Each call appends its arguments to `calls.log` next to the script and
/// creates the output file (the last argument). Inputs whose path contains
/// `slow` block for 30 seconds; inputs containing `broken` print a diagnostic
/// to stderr and exit with status 2.
const FAKE_CONVERTER: &str = r#"#!/bin/sh
log="$(dirname "$0")/calls.log"
echo "$*" >> "$log"
for last; do :; done
case "$*" in
    *broken*) echo "fake-sox FAIL formats: can't open input file" >&2; exit 2 ;;
    *slow*) exec sleep 30 ;;
esac
: > "$last"
exit 0
"#;

/// Write the fake converter into `dir` and return its path.
#[cfg(unix)]
pub fn fake_converter(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-sox");
    std::fs::write(&path, FAKE_CONVERTER).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

/// Argument lines recorded by the fake converter, one per invocation
pub fn recorded_calls(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join("calls.log"))
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Create empty input files in a fresh temp directory
pub fn create_inputs(names: &[&str]) -> (TempDir, Vec<PathBuf>) {
    let temp_dir = TempDir::new().unwrap();
    let paths = names
        .iter()
        .map(|name| {
            let path = temp_dir.path().join(name);
            std::fs::write(&path, b"").unwrap();
            path
        })
        .collect();
    (temp_dir, paths)
}

/// Poll `condition` until it holds or `timeout` elapses.
pub fn wait_for(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    condition()
}
