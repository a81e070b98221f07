// crates/conformance-core/src/lib.rs
// ============================================================================
// Module: Conformance Core Library
// Description: Public API surface for the conformance core.
// Purpose: Expose the corpus model, consistency checker, and rollup aggregator.
// Dependencies: crate::{core, runtime}
// ============================================================================

//! ## Overview
//! Conformance core validates a corpus of conformance test documents and
//! reduces per-renderer results into an ordered summary tree. It performs no
//! I/O: loaders in `conformance-corpus` build the inputs and renderers in
//! `conformance-report` consume the outputs.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use runtime::CategorySummary;
pub use runtime::CheckConfig;
pub use runtime::CheckInputs;
pub use runtime::CheckKind;
pub use runtime::CheckReport;
pub use runtime::CheckStatus;
pub use runtime::ConformanceStats;
pub use runtime::FeatureSummary;
pub use runtime::Outline;
pub use runtime::OutlineEntry;
pub use runtime::RendererColumn;
pub use runtime::RendererRollup;
pub use runtime::RendererStats;
pub use runtime::RollupAggregator;
pub use runtime::RollupError;
pub use runtime::RollupStatus;
pub use runtime::SummaryTree;
pub use runtime::TestRow;
pub use runtime::Violation;
pub use runtime::conformance_stats;
pub use runtime::outline;
pub use runtime::run_checks;
