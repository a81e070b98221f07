// crates/conformance-report/src/types.rs
// ============================================================================
// Module: Report Types
// Description: Manifest, artifact, and error types for report output.
// Purpose: Describe what the report builder writes and how it fails.
// Dependencies: serde, thiserror, conformance-core
// ============================================================================

//! ## Overview
//! Artifacts carry their bytes and content type; the manifest records each
//! artifact's path and digest so a written report can be checked later.

use std::path::PathBuf;

use conformance_core::HashAlgorithm;
use conformance_core::HashDigest;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Manifest
// ============================================================================

/// Manifest written as `index.json`.
///
/// # Invariants
/// - `artifacts` is ordered by path and never lists `index.json` itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportManifest {
    /// Version of the tool that built the report.
    pub report_version: String,
    /// Hash algorithm used for every digest.
    pub hash_algorithm: HashAlgorithm,
    /// Canonical digest of the summary tree.
    pub summary_digest: HashDigest,
    /// Features in the summary.
    pub feature_count: usize,
    /// Test rows in the summary.
    pub test_count: usize,
    /// Artifacts in the bundle.
    pub artifacts: Vec<ManifestArtifact>,
}

/// Manifest entry for one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestArtifact {
    /// Relative path under the output directory.
    pub path: String,
    /// Content type.
    pub content_type: String,
    /// Digest of the artifact bytes.
    pub digest: HashDigest,
}

// ============================================================================
// SECTION: Bundle
// ============================================================================

/// Manifest plus artifact payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBundle {
    /// Manifest describing the artifacts.
    pub manifest: ReportManifest,
    /// Artifact payloads ordered by path.
    pub artifacts: Vec<ReportArtifact>,
}

/// One artifact payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    /// Relative path under the output directory.
    pub path: String,
    /// Content type.
    pub content_type: String,
    /// Serialized bytes.
    pub bytes: Vec<u8>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while building, writing, or verifying a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Filesystem failure.
    #[error("report io error: {0}")]
    Io(String),
    /// Output path is unusable or unsafe.
    #[error("invalid report output path: {}", .0.display())]
    OutputPath(PathBuf),
    /// Serialization failure.
    #[error("report serialization error: {0}")]
    Serialization(String),
    /// Build or verification failure.
    #[error("report error: {0}")]
    Generation(String),
}
