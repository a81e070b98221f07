// crates/conformance-corpus/src/lib.rs
// ============================================================================
// Module: Conformance Corpus Library
// Description: Loaders that turn on-disk corpus data into core inputs.
// Purpose: Keep all filesystem, XML, CSV, and VCS access out of the core.
// Dependencies: cap-std, roxmltree, csv, conformance-core
// ============================================================================

//! ## Overview
//! Each loader owns one external format: the corpus directory and its test
//! documents, the order list, the results table, and the revision-control
//! snapshot. Loaders fail closed with [`CorpusError`]; data problems that the
//! checker can describe are left to the checker.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod document;
pub mod error;
pub mod loader;
pub mod order;
pub mod results;
pub mod vcs;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use document::MAX_ELEMENT_DEPTH;
pub use document::parse_document;
pub use error::CorpusError;
pub use loader::CorpusLoader;
pub use loader::LoadedCorpus;
pub use order::read_order_list;
pub use results::parse_results;
pub use results::read_results;
pub use results::render_results;
pub use results::write_results;
pub use vcs::tracked_files;
