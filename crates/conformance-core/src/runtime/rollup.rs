// crates/conformance-core/src/runtime/rollup.rs
// ============================================================================
// Module: Rollup Aggregator
// Description: Reduces an outcome table into an ordered summary tree.
// Purpose: Collapse per-test outcomes into one status per feature and renderer.
// Dependencies: serde, sha2 (via hashing)
// ============================================================================

//! ## Overview
//! The aggregator groups outcome rows by feature key and walks the declared
//! [`ReportLayout`] to emit categories and features in declared order. Each
//! feature carries one [`RendererRollup`] per schema renderer and its test
//! rows ordered by declared index.
//!
//! Rollup rule, per feature and renderer:
//! - out-of-scope features are [`RollupStatus::OutOfScope`] regardless of data;
//! - a feature with no tests is [`RollupStatus::Failed`] for the primary
//!   renderer and [`RollupStatus::Unknown`] for the others;
//! - otherwise `covered` counts `Passed` and `Unknown` outcomes: all covered
//!   is `Passed`, none covered is `Failed`, anything else is `Partial`.
//!
//! Rows whose feature is not in the layout are ignored here; the checker
//! reports them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::corpus::CorpusIndex;
use crate::core::hashing::HashAlgorithm;
use crate::core::hashing::HashDigest;
use crate::core::hashing::HashError;
use crate::core::hashing::hash_canonical_json;
use crate::core::identifiers::FeatureKey;
use crate::core::identifiers::ModelError;
use crate::core::identifiers::RendererId;
use crate::core::identifiers::TestId;
use crate::core::layout::ReportLayout;
use crate::core::outcome::OutcomeCode;
use crate::core::outcome::OutcomeError;
use crate::core::outcome::OutcomeTable;
use crate::core::outcome::RendererSchema;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when the outcome table cannot be rolled up.
#[derive(Debug, Error)]
pub enum RollupError {
    /// Schema renderer has no column in the table.
    #[error("renderer {0} has no column in the results table")]
    MissingRenderer(RendererId),
    /// Results row id does not follow the naming rule.
    #[error(transparent)]
    Model(#[from] ModelError),
    /// Table and schema disagree in some other way.
    #[error(transparent)]
    Outcome(OutcomeError),
}

impl From<OutcomeError> for RollupError {
    fn from(err: OutcomeError) -> Self {
        match err {
            OutcomeError::MissingRenderer(renderer) => Self::MissingRenderer(renderer),
            other => Self::Outcome(other),
        }
    }
}

// ============================================================================
// SECTION: Rollup Status
// ============================================================================

/// Derived group-level status for one feature and renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollupStatus {
    /// Placeholder for non-primary renderers of an empty feature.
    Unknown,
    /// Every test covered.
    Passed,
    /// No test covered, or no tests at all.
    Failed,
    /// Some tests covered.
    Partial,
    /// Excluded from scoring.
    OutOfScope,
}

impl RollupStatus {
    /// Returns the stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Partial => "partial",
            Self::OutOfScope => "out_of_scope",
        }
    }
}

/// Rolls up the outcomes of one in-scope feature for one renderer.
///
/// An empty slice rolls up to [`RollupStatus::Failed`].
#[must_use]
pub fn rollup_status(outcomes: &[OutcomeCode]) -> RollupStatus {
    let covered = outcomes.iter().filter(|code| code.is_covered()).count();
    status_for(covered, outcomes.len())
}

/// Maps covered and total counts to a status.
const fn status_for(covered: usize, total: usize) -> RollupStatus {
    if total == 0 || covered == 0 {
        RollupStatus::Failed
    } else if covered == total {
        RollupStatus::Passed
    } else {
        RollupStatus::Partial
    }
}

// ============================================================================
// SECTION: Summary Tree
// ============================================================================

/// Renderer column of a summary, in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererColumn {
    /// Renderer id.
    pub id: RendererId,
    /// Display label.
    pub label: String,
    /// Primary renderer flag.
    pub primary: bool,
}

/// Rollup of one feature for one renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererRollup {
    /// Renderer id.
    pub renderer: RendererId,
    /// Derived status.
    pub status: RollupStatus,
    /// Tests whose outcome is `Passed` or `Unknown`.
    pub covered: usize,
    /// Tests in the feature.
    pub total: usize,
}

/// One test row in a feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRow {
    /// Test id.
    pub id: TestId,
    /// Declared index within the feature.
    pub index: u32,
    /// Title from the corpus, when known.
    pub title: Option<String>,
    /// Outcomes in schema renderer order.
    pub outcomes: Vec<OutcomeCode>,
}

/// Summary of one feature group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSummary {
    /// Feature key.
    pub feature_key: FeatureKey,
    /// Excluded from scoring.
    pub out_of_scope: bool,
    /// One rollup per schema renderer, in schema order.
    pub rollups: Vec<RendererRollup>,
    /// Test rows ordered by declared index.
    pub tests: Vec<TestRow>,
}

/// Summary of one report category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Section heading.
    pub title: String,
    /// Optional external link.
    pub link: Option<String>,
    /// Features in declared order.
    pub features: Vec<FeatureSummary>,
}

/// Hierarchical conformance summary: categories, features, tests.
///
/// # Invariants
/// - Categories and features follow the layout order exactly.
/// - Every layout feature appears, with placeholders when it has no rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTree {
    /// Renderer schema version the outcomes were decoded with.
    pub schema_version: u32,
    /// Renderer columns in schema order.
    pub renderers: Vec<RendererColumn>,
    /// Categories in declared order.
    pub categories: Vec<CategorySummary>,
}

impl SummaryTree {
    /// Iterates over every feature in declared order.
    pub fn features(&self) -> impl Iterator<Item = &FeatureSummary> {
        self.categories.iter().flat_map(|category| category.features.iter())
    }

    /// Looks up a feature by key.
    #[must_use]
    pub fn feature(&self, key: &FeatureKey) -> Option<&FeatureSummary> {
        self.features().find(|feature| &feature.feature_key == key)
    }

    /// Returns the number of features.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.features().count()
    }

    /// Returns the number of test rows.
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.features().map(|feature| feature.tests.len()).sum()
    }

    /// Returns the canonical JSON digest of the tree.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] when canonicalization fails.
    pub fn digest(&self, algorithm: HashAlgorithm) -> Result<HashDigest, HashError> {
        hash_canonical_json(algorithm, self)
    }
}

// ============================================================================
// SECTION: Aggregator
// ============================================================================

/// Builds summary trees from outcome tables.
#[derive(Debug, Clone, Copy)]
pub struct RollupAggregator<'a> {
    /// Agreed renderer schema.
    schema: &'a RendererSchema,
    /// Declared layout.
    layout: &'a ReportLayout,
    /// Optional corpus used to attach titles.
    corpus: Option<&'a CorpusIndex>,
}

impl<'a> RollupAggregator<'a> {
    /// Creates an aggregator for a schema and layout.
    #[must_use]
    pub const fn new(schema: &'a RendererSchema, layout: &'a ReportLayout) -> Self {
        Self {
            schema,
            layout,
            corpus: None,
        }
    }

    /// Attaches corpus titles to test rows.
    #[must_use]
    pub const fn with_corpus(mut self, corpus: &'a CorpusIndex) -> Self {
        self.corpus = Some(corpus);
        self
    }

    /// Reduces `table` into a summary tree.
    ///
    /// # Errors
    ///
    /// Returns [`RollupError::MissingRenderer`] when a schema renderer has no
    /// column, or [`RollupError::Model`] when a row id cannot be parsed.
    pub fn aggregate(&self, table: &OutcomeTable) -> Result<SummaryTree, RollupError> {
        let columns = self.schema.project(table)?;
        let mut groups: BTreeMap<FeatureKey, Vec<TestRow>> = BTreeMap::new();
        for record in table.records() {
            let name = record.test_id.parse()?;
            if !self.layout.contains(&name.feature_key) {
                continue;
            }
            let title = self
                .corpus
                .and_then(|corpus| corpus.get(&record.test_id))
                .map(|case| case.title.clone());
            groups.entry(name.feature_key).or_default().push(TestRow {
                id: record.test_id.clone(),
                index: name.index,
                title,
                outcomes: columns.outcomes(record),
            });
        }
        for rows in groups.values_mut() {
            rows.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.id.cmp(&b.id)));
        }

        let categories = self
            .layout
            .categories
            .iter()
            .map(|category| CategorySummary {
                title: category.title.clone(),
                link: category.link.clone(),
                features: category
                    .features
                    .iter()
                    .map(|key| {
                        let tests = groups.get(key).cloned().unwrap_or_default();
                        self.summarize(key, tests)
                    })
                    .collect(),
            })
            .collect();

        Ok(SummaryTree {
            schema_version: self.schema.version(),
            renderers: self
                .schema
                .renderers()
                .iter()
                .map(|renderer| RendererColumn {
                    id: renderer.id.clone(),
                    label: renderer.label.clone(),
                    primary: renderer.primary,
                })
                .collect(),
            categories,
        })
    }

    /// Computes the per-renderer rollups for one feature.
    fn summarize(&self, key: &FeatureKey, tests: Vec<TestRow>) -> FeatureSummary {
        let out_of_scope = self.layout.is_out_of_scope(key);
        let total = tests.len();
        let primary = self.schema.primary_index();
        let rollups = self
            .schema
            .renderers()
            .iter()
            .enumerate()
            .map(|(position, renderer)| {
                let covered = tests
                    .iter()
                    .filter(|row| row.outcomes.get(position).is_some_and(|code| code.is_covered()))
                    .count();
                let status = if out_of_scope {
                    RollupStatus::OutOfScope
                } else if total == 0 && position != primary {
                    RollupStatus::Unknown
                } else {
                    status_for(covered, total)
                };
                RendererRollup {
                    renderer: renderer.id.clone(),
                    status,
                    covered,
                    total,
                }
            })
            .collect();
        FeatureSummary {
            feature_key: key.clone(),
            out_of_scope,
            rollups,
            tests,
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
