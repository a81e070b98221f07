// crates/conformance-report/src/builder.rs
// ============================================================================
// Module: Report Builder
// Description: Assembles, writes, and verifies conformance report artifacts.
// Purpose: Publish a byte-stable report with a hashed manifest.
// Dependencies: cap-std, cap-primitives, serde_jcs, serde_json, conformance-core
// ============================================================================

//! ## Overview
//! The builder renders four artifacts from a summary tree and its stats:
//! `summary.json`, `summary.md`, `stats.json`, and the `index.json`
//! manifest. JSON is canonicalized before pretty-printing so key order is
//! stable. Writes go through a capability handle on the output directory,
//! never follow symlinks, and replace files by atomic rename.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Write;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use cap_primitives::fs::FollowSymlinks;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use cap_std::fs::OpenOptions;
use conformance_core::ConformanceStats;
use conformance_core::DEFAULT_HASH_ALGORITHM;
use conformance_core::HashAlgorithm;
use conformance_core::SummaryTree;
use conformance_core::core::hashing::hash_bytes;
use serde::Serialize;

use crate::markdown::render_markdown;
use crate::types::ManifestArtifact;
use crate::types::ReportArtifact;
use crate::types::ReportBundle;
use crate::types::ReportError;
use crate::types::ReportManifest;

/// Manifest file name.
const MANIFEST_PATH: &str = "index.json";

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Builds report bundles for one summary tree.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    /// Summary to publish.
    tree: SummaryTree,
    /// Chart data to publish.
    stats: ConformanceStats,
    /// Version recorded in the manifest.
    report_version: String,
    /// Hash algorithm for digests.
    hash_algorithm: HashAlgorithm,
}

impl ReportBuilder {
    /// Creates a builder for a summary tree and its stats.
    #[must_use]
    pub fn new(tree: SummaryTree, stats: ConformanceStats) -> Self {
        Self {
            tree,
            stats,
            report_version: env!("CARGO_PKG_VERSION").to_string(),
            hash_algorithm: DEFAULT_HASH_ALGORITHM,
        }
    }

    /// Returns the summary tree.
    #[must_use]
    pub const fn tree(&self) -> &SummaryTree {
        &self.tree
    }

    /// Builds the bundle without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when serialization fails.
    pub fn build(&self) -> Result<ReportBundle, ReportError> {
        let mut artifacts = vec![
            json_artifact("summary.json", &self.tree)?,
            text_artifact("summary.md", render_markdown(&self.tree), "text/markdown"),
            json_artifact("stats.json", &self.stats)?,
        ];
        artifacts.sort_by(|lhs, rhs| lhs.path.cmp(&rhs.path));
        ensure_unique_paths(&artifacts)?;
        let summary_digest = self
            .tree
            .digest(self.hash_algorithm)
            .map_err(|err| ReportError::Serialization(err.to_string()))?;
        let manifest = ReportManifest {
            report_version: self.report_version.clone(),
            hash_algorithm: self.hash_algorithm,
            summary_digest,
            feature_count: self.tree.feature_count(),
            test_count: self.tree.test_count(),
            artifacts: artifacts
                .iter()
                .map(|artifact| ManifestArtifact {
                    path: artifact.path.clone(),
                    content_type: artifact.content_type.clone(),
                    digest: hash_bytes(self.hash_algorithm, &artifact.bytes),
                })
                .collect(),
        };
        Ok(ReportBundle {
            manifest,
            artifacts,
        })
    }

    /// Writes the bundle into `output_dir`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when the directory is unsafe or a write fails.
    pub fn write_to(&self, output_dir: &Path) -> Result<ReportManifest, ReportError> {
        let bundle = self.build()?;
        let output = open_output_dir(output_dir, true)?;
        for artifact in &bundle.artifacts {
            let relative = validate_relative_path(&artifact.path)?;
            write_artifact_bytes(&output, &relative, &artifact.bytes)?;
        }
        let manifest_bytes = serialize_json_pretty(&bundle.manifest)?;
        write_artifact_bytes(&output, Path::new(MANIFEST_PATH), &manifest_bytes)?;
        Ok(bundle.manifest)
    }

    /// Verifies that `output_dir` holds exactly the bundle this builder produces.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Generation`] naming the first mismatched,
    /// missing, or unexpected file, or [`ReportError::OutputPath`] when the
    /// directory or an artifact is a symlink.
    pub fn verify_output(&self, output_dir: &Path) -> Result<(), ReportError> {
        let bundle = self.build()?;
        let output = open_output_dir(output_dir, false)?;
        let mut expected = BTreeSet::new();
        expected.insert(MANIFEST_PATH.to_string());
        for artifact in &bundle.artifacts {
            expected.insert(artifact.path.clone());
            let relative = validate_relative_path(&artifact.path)?;
            let bytes = read_expected_bytes(&output, &relative, artifact.bytes.len())?;
            if bytes != artifact.bytes {
                return Err(ReportError::Generation(format!(
                    "artifact mismatch: {}",
                    artifact.path
                )));
            }
        }
        let manifest_bytes = serialize_json_pretty(&bundle.manifest)?;
        let actual_manifest =
            read_expected_bytes(&output, Path::new(MANIFEST_PATH), manifest_bytes.len())?;
        if actual_manifest != manifest_bytes {
            return Err(ReportError::Generation(format!("manifest mismatch: {MANIFEST_PATH}")));
        }
        let mut actual = BTreeSet::new();
        collect_files_recursive(&output, Path::new(""), &mut actual)?;
        if let Some(path) = actual.difference(&expected).next() {
            return Err(ReportError::Generation(format!("unexpected artifact: {path}")));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Artifact Helpers
// ============================================================================

/// Builds a pretty JSON artifact with canonical key order.
fn json_artifact<T: Serialize>(path: &str, value: &T) -> Result<ReportArtifact, ReportError> {
    Ok(ReportArtifact {
        path: path.to_string(),
        content_type: String::from("application/json"),
        bytes: serialize_json_pretty(value)?,
    })
}

/// Builds a text artifact.
fn text_artifact(path: &str, content: String, content_type: &str) -> ReportArtifact {
    ReportArtifact {
        path: path.to_string(),
        content_type: content_type.to_string(),
        bytes: content.into_bytes(),
    }
}

/// Serializes a value into pretty JSON bytes with canonical key ordering.
fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<Vec<u8>, ReportError> {
    let canonical =
        serde_jcs::to_vec(value).map_err(|err| ReportError::Serialization(err.to_string()))?;
    let canonical_value: serde_json::Value = serde_json::from_slice(&canonical)
        .map_err(|err| ReportError::Serialization(err.to_string()))?;
    let mut bytes = serde_json::to_vec_pretty(&canonical_value)
        .map_err(|err| ReportError::Serialization(err.to_string()))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Ensures artifact paths are unique.
fn ensure_unique_paths(artifacts: &[ReportArtifact]) -> Result<(), ReportError> {
    let mut seen = BTreeSet::new();
    for artifact in artifacts {
        if !seen.insert(&artifact.path) {
            return Err(ReportError::Generation(format!(
                "duplicate artifact path: {}",
                artifact.path
            )));
        }
    }
    Ok(())
}

/// Validates that an artifact path is relative and stays inside the output.
fn validate_relative_path(path: &str) -> Result<PathBuf, ReportError> {
    if path.trim().is_empty() {
        return Err(ReportError::Generation(String::from("artifact path is empty")));
    }
    let candidate = PathBuf::from(path);
    for component in candidate.components() {
        if !matches!(component, Component::Normal(_)) {
            return Err(ReportError::Generation(format!(
                "artifact path contains invalid component: {path}"
            )));
        }
    }
    Ok(candidate)
}

// ============================================================================
// SECTION: Output Directory
// ============================================================================

/// Opens the output directory as a capability handle.
fn open_output_dir(output_dir: &Path, create_missing: bool) -> Result<Dir, ReportError> {
    if output_dir.as_os_str().is_empty() {
        return Err(ReportError::OutputPath(output_dir.to_path_buf()));
    }
    let normalized = if output_dir.is_absolute() {
        output_dir.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(output_dir))
            .map_err(|err| ReportError::Io(err.to_string()))?
    };
    let (anchor, components) = split_anchor_and_components(&normalized)?;
    if components.is_empty() {
        return Err(ReportError::OutputPath(normalized));
    }
    let mut current = Dir::open_ambient_dir(&anchor, ambient_authority())
        .map_err(|err| ReportError::Io(err.to_string()))?;
    for component in components {
        current = open_or_create_child_dir_nofollow(
            &current,
            Path::new(component.as_os_str()),
            create_missing,
        )
        .map_err(|err| map_open_error(&err, output_dir))?;
    }
    Ok(current)
}

/// Splits an absolute path into an anchor root and normal child components.
fn split_anchor_and_components(path: &Path) -> Result<(PathBuf, Vec<OsString>), ReportError> {
    let mut anchor = PathBuf::new();
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => anchor.push(component.as_os_str()),
            Component::CurDir => {}
            Component::Normal(value) => components.push(value.to_os_string()),
            Component::ParentDir => return Err(ReportError::OutputPath(path.to_path_buf())),
        }
    }
    if anchor.as_os_str().is_empty() {
        return Err(ReportError::OutputPath(path.to_path_buf()));
    }
    Ok((anchor, components))
}

/// Opens a child directory without following symlinks.
fn open_child_dir_nofollow(parent: &Dir, child: &Path) -> std::io::Result<Dir> {
    let mut options = OpenOptions::new();
    options.read(true);
    options._cap_fs_ext_follow(FollowSymlinks::No);
    let file = parent.open_with(child, &options)?;
    if !file.metadata()?.is_dir() {
        return Err(std::io::Error::new(
            ErrorKind::InvalidInput,
            "path component is not a directory",
        ));
    }
    Ok(Dir::from_std_file(file.into_std()))
}

/// Opens or creates a child directory without following symlinks.
fn open_or_create_child_dir_nofollow(
    parent: &Dir,
    child: &Path,
    create_missing: bool,
) -> std::io::Result<Dir> {
    match open_child_dir_nofollow(parent, child) {
        Ok(dir) => Ok(dir),
        Err(err) if err.kind() == ErrorKind::NotFound && create_missing => {
            parent.create_dir(child)?;
            open_child_dir_nofollow(parent, child)
        }
        Err(err) => Err(err),
    }
}

/// Maps low-level open errors into report path errors.
fn map_open_error(err: &std::io::Error, path: &Path) -> ReportError {
    if matches!(
        err.kind(),
        ErrorKind::NotFound
            | ErrorKind::InvalidInput
            | ErrorKind::PermissionDenied
            | ErrorKind::NotADirectory
            | ErrorKind::Unsupported
    ) {
        return ReportError::OutputPath(path.to_path_buf());
    }
    // ELOOP from a no-follow open of a symlink.
    #[cfg(unix)]
    if err.raw_os_error() == Some(40) {
        return ReportError::OutputPath(path.to_path_buf());
    }
    ReportError::Io(err.to_string())
}

// ============================================================================
// SECTION: File I/O
// ============================================================================

/// Opens the parent directory of a relative artifact path.
fn open_parent_dir(
    output_dir: &Dir,
    relative: &Path,
    create_missing: bool,
) -> Result<(Dir, OsString, PathBuf), ReportError> {
    let mut current = output_dir.try_clone().map_err(|err| ReportError::Io(err.to_string()))?;
    let mut parent = PathBuf::new();
    let mut components = relative.components().peekable();
    while let Some(component) = components.next() {
        let Component::Normal(name) = component else {
            return Err(ReportError::OutputPath(relative.to_path_buf()));
        };
        if components.peek().is_none() {
            let file_name = name.to_os_string();
            return Ok((current, file_name.clone(), parent.join(file_name)));
        }
        parent.push(name);
        current = open_or_create_child_dir_nofollow(&current, Path::new(name), create_missing)
            .map_err(|err| map_open_error(&err, relative))?;
    }
    Err(ReportError::OutputPath(relative.to_path_buf()))
}

/// Writes bytes to a relative path by temporary sibling and atomic rename.
fn write_artifact_bytes(output_dir: &Dir, relative: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    let (parent, file_name, file_path) = open_parent_dir(output_dir, relative, true)?;
    let file_name = Path::new(&file_name);
    for attempt in 0 .. 64_u32 {
        let mut temp_name = OsString::from(".tmp-");
        temp_name.push(file_name.as_os_str());
        temp_name.push(format!(".{}.{attempt}", std::process::id()));
        let temp_name = PathBuf::from(temp_name);
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        options._cap_fs_ext_follow(FollowSymlinks::No);
        match parent.open_with(&temp_name, &options) {
            Ok(mut temp_file) => {
                let written = temp_file
                    .write_all(bytes)
                    .and_then(|()| temp_file.sync_all())
                    .and_then(|()| parent.rename(&temp_name, &parent, file_name));
                if let Err(err) = written {
                    let _ = parent.remove_file(&temp_name);
                    return Err(ReportError::Io(err.to_string()));
                }
                return Ok(());
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {}
            Err(err) => return Err(map_open_error(&err, &file_path)),
        }
    }
    Err(ReportError::Generation("unable to allocate temporary output file".to_string()))
}

/// Reads a file, failing when its length differs from `expected_len`.
fn read_expected_bytes(
    output_dir: &Dir,
    relative: &Path,
    expected_len: usize,
) -> Result<Vec<u8>, ReportError> {
    let (parent, file_name, file_path) = open_parent_dir(output_dir, relative, false)?;
    let mut options = OpenOptions::new();
    options.read(true);
    options._cap_fs_ext_follow(FollowSymlinks::No);
    let mut file = parent.open_with(Path::new(&file_name), &options).map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            ReportError::Generation(format!("missing artifact: {}", relative.display()))
        } else {
            map_open_error(&err, &file_path)
        }
    })?;
    let metadata = file.metadata().map_err(|err| ReportError::Io(err.to_string()))?;
    if !metadata.is_file() {
        return Err(ReportError::OutputPath(file_path));
    }
    let expected_len = u64::try_from(expected_len)
        .map_err(|_| ReportError::Generation(String::from("expected length exceeds addressable size")))?;
    if metadata.len() != expected_len {
        return Err(ReportError::Generation(format!(
            "artifact size mismatch: {}",
            relative.display()
        )));
    }
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|err| ReportError::Io(err.to_string()))?;
    Ok(bytes)
}

/// Recursively collects `/`-separated file paths relative to the output root.
fn collect_files_recursive(
    current: &Dir,
    prefix: &Path,
    files: &mut BTreeSet<String>,
) -> Result<(), ReportError> {
    let entries = current.entries().map_err(|err| ReportError::Io(err.to_string()))?;
    for entry in entries {
        let entry = entry.map_err(|err| ReportError::Io(err.to_string()))?;
        let relative = prefix.join(entry.file_name());
        let file_type = entry.file_type().map_err(|err| ReportError::Io(err.to_string()))?;
        if file_type.is_symlink() {
            return Err(ReportError::OutputPath(relative));
        }
        if file_type.is_dir() {
            let directory = entry.open_dir().map_err(|err| ReportError::Io(err.to_string()))?;
            collect_files_recursive(&directory, &relative, files)?;
        } else if file_type.is_file() {
            let text = relative.to_str().ok_or_else(|| ReportError::OutputPath(relative.clone()))?;
            files.insert(text.replace('\\', "/"));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
