// crates/conformance-report/src/lib.rs
// ============================================================================
// Module: Conformance Report Library
// Description: Deterministic report artifacts for a summary tree.
// Purpose: Render, write, and verify the published conformance report.
// Dependencies: cap-std, serde_jcs, serde_json, conformance-core
// ============================================================================

//! ## Overview
//! The report builder turns a [`conformance_core::SummaryTree`] and its
//! chart data into a fixed set of artifacts plus a hashed `index.json`
//! manifest. Output is byte-stable for identical inputs, so an existing
//! report can be verified against a fresh build.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod builder;
pub mod markdown;
pub mod types;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use builder::ReportBuilder;
pub use markdown::render_markdown;
pub use types::ManifestArtifact;
pub use types::ReportArtifact;
pub use types::ReportBundle;
pub use types::ReportError;
pub use types::ReportManifest;
