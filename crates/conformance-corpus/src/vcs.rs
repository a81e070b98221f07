// crates/conformance-corpus/src/vcs.rs
// ============================================================================
// Module: Revision-Control Snapshot
// Description: Lists files tracked by git under the corpus root.
// Purpose: Feed the untracked-files check with a one-shot snapshot.
// Dependencies: std::process, conformance-core
// ============================================================================

//! ## Overview
//! The snapshot runs `git ls-files -z` once with the corpus root as working
//! directory, so every path comes back relative to the root and matches the
//! paths produced by the corpus loader.

use std::path::Path;
use std::process::Command;

use conformance_core::FileSet;

use crate::error::CorpusError;

/// Returns the set of files git tracks under `root`.
///
/// # Errors
///
/// Returns [`CorpusError::Vcs`] when git cannot be run, exits unsuccessfully,
/// or reports a non-UTF-8 path.
pub fn tracked_files(root: &Path) -> Result<FileSet, CorpusError> {
    let output = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(["ls-files", "-z", "--", "."])
        .output()
        .map_err(|err| CorpusError::Vcs(err.to_string()))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CorpusError::Vcs(stderr.trim().to_string()));
    }
    parse_ls_files(&output.stdout)
}

/// Splits NUL-separated `ls-files` output.
fn parse_ls_files(stdout: &[u8]) -> Result<FileSet, CorpusError> {
    let mut paths = Vec::new();
    for entry in stdout.split(|byte| *byte == 0).filter(|entry| !entry.is_empty()) {
        let path = std::str::from_utf8(entry)
            .map_err(|_| CorpusError::Vcs("tracked path is not utf-8".to_string()))?;
        paths.push(path.to_string());
    }
    Ok(FileSet::new(paths))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
