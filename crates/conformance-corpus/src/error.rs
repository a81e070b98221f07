// crates/conformance-corpus/src/error.rs
// ============================================================================
// Module: Corpus Errors
// Description: Error type shared by all corpus loaders.
// Purpose: Name the offending file, row, or command in every failure.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! One error enum covers every loader. Model and outcome errors from the core
//! pass through unchanged.

use std::path::PathBuf;

use conformance_core::ModelError;
use conformance_core::OutcomeError;
use thiserror::Error;

/// Errors raised while loading corpus data.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// Filesystem failure.
    #[error("corpus io error: {0}")]
    Io(String),
    /// Path is unusable as a corpus root or data file.
    #[error("invalid corpus path: {0}")]
    Path(PathBuf),
    /// Symlinks are not followed inside the corpus.
    #[error("corpus contains a symlink: {0}")]
    Symlink(String),
    /// Document exceeds the configured byte limit.
    #[error("document {path} is {size} bytes, limit is {max}")]
    TooLarge {
        /// Corpus-relative path.
        path: String,
        /// Actual size in bytes.
        size: u64,
        /// Configured limit.
        max: usize,
    },
    /// Document or data file is not UTF-8.
    #[error("{0} must be utf-8")]
    NotUtf8(String),
    /// Document is not well-formed XML.
    #[error("document {path} is malformed: {message}")]
    Malformed {
        /// Corpus-relative path.
        path: String,
        /// Parser message.
        message: String,
    },
    /// Document has no leading `title` element.
    #[error("document {0} must start with a title element")]
    MissingTitle(String),
    /// Element nesting exceeds the supported depth.
    #[error("document {path} nests deeper than {max} elements")]
    TooDeep {
        /// Corpus-relative path.
        path: String,
        /// Maximum depth.
        max: usize,
    },
    /// File name does not follow the test id rule.
    #[error(transparent)]
    Model(#[from] ModelError),
    /// Results file is not valid CSV.
    #[error("results csv error: {0}")]
    Csv(String),
    /// Results file disagrees with the renderer schema.
    #[error(transparent)]
    Outcome(#[from] OutcomeError),
    /// Revision-control snapshot failed.
    #[error("vcs snapshot failed: {0}")]
    Vcs(String),
}
