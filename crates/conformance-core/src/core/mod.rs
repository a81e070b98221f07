// crates/conformance-core/src/core/mod.rs
// ============================================================================
// Module: Conformance Core Types
// Description: Corpus, outcome, and layout data model.
// Purpose: Provide stable, serializable types shared by checks and rollups.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types describe what the loaders hand to the checker and aggregator:
//! test cases, the corpus index and order list, the outcome table with its
//! renderer schema, and the declared report layout.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod corpus;
pub mod document;
pub mod hashing;
pub mod identifiers;
pub mod layout;
pub mod outcome;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use corpus::CorpusIndex;
pub use corpus::FileSet;
pub use corpus::OrderList;
pub use document::DocumentText;
pub use document::ElementNode;
pub use document::NamespaceDecl;
pub use document::QualifiedName;
pub use document::TestCase;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use hashing::HashError;
pub use identifiers::FeatureKey;
pub use identifiers::FeatureKind;
pub use identifiers::ModelError;
pub use identifiers::RendererId;
pub use identifiers::TestId;
pub use identifiers::TestName;
pub use layout::CategoryLayout;
pub use layout::ReportLayout;
pub use outcome::ColumnMap;
pub use outcome::OutcomeCode;
pub use outcome::OutcomeError;
pub use outcome::OutcomeRecord;
pub use outcome::OutcomeTable;
pub use outcome::RendererSchema;
pub use outcome::RendererSpec;
pub use outcome::SCHEMA_VERSION_V1;
