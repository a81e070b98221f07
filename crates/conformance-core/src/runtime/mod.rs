// crates/conformance-core/src/runtime/mod.rs
// ============================================================================
// Module: Conformance Runtime
// Description: Consistency checks, rollup aggregation, and stats.
// Purpose: Turn loaded corpus data into verdicts and summaries.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Runtime passes are synchronous, pure transformations over data the
//! loaders already resolved. None of them perform I/O.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod checker;
pub mod outline;
pub mod rollup;
pub mod stats;
pub mod violation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use checker::CheckConfig;
pub use checker::CheckInputs;
pub use checker::CheckReport;
pub use checker::CheckStatus;
pub use checker::DEFAULT_IGNORED_TAGS;
pub use checker::DEFAULT_LINE_WIDTH;
pub use checker::DEFAULT_TITLE_MAX_LENGTH;
pub use checker::check_element_ids;
pub use checker::check_feature_layout;
pub use checker::check_line_width;
pub use checker::check_order_sync;
pub use checker::check_renderer_schema;
pub use checker::check_results_coverage;
pub use checker::check_test_ids;
pub use checker::check_title_length;
pub use checker::check_titles;
pub use checker::check_unused_namespaces;
pub use checker::check_untracked_files;
pub use checker::run_checks;
pub use outline::Outline;
pub use outline::OutlineEntry;
pub use outline::RepeatedTitle;
pub use outline::outline;
pub use rollup::CategorySummary;
pub use rollup::FeatureSummary;
pub use rollup::RendererColumn;
pub use rollup::RendererRollup;
pub use rollup::RollupAggregator;
pub use rollup::RollupError;
pub use rollup::RollupStatus;
pub use rollup::SummaryTree;
pub use rollup::TestRow;
pub use rollup::rollup_status;
pub use stats::ConformanceStats;
pub use stats::RendererStats;
pub use stats::conformance_stats;
pub use violation::CheckKind;
pub use violation::Violation;
