// crates/conformance-core/src/runtime/violation.rs
// ============================================================================
// Module: Consistency Violations
// Description: Typed violation values produced by corpus checks.
// Purpose: Attribute every problem to a check, file, id, or line.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Data problems are values, not errors. Every check returns a list of
//! [`Violation`]s and the driver merges them into a report. Each violation
//! knows which [`CheckKind`] produced it so digests can be grouped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::FeatureKey;
use crate::core::identifiers::RendererId;
use crate::core::identifiers::TestId;

// ============================================================================
// SECTION: Check Kinds
// ============================================================================

/// Independently invocable consistency checks, in driver order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Test ids unique across the corpus.
    TestIds,
    /// Titles present and unique per feature group.
    Titles,
    /// Titles within the configured length.
    TitleLength,
    /// Element ids present and unique per document.
    ElementIds,
    /// Corpus and order list hold the same ids.
    OrderSync,
    /// Every declared id has a result row.
    ResultsCoverage,
    /// Every present file is tracked by revision control.
    UntrackedFiles,
    /// No line exceeds the configured width.
    LineWidth,
    /// Every prefixed namespace declaration is referenced.
    UnusedNamespace,
    /// Results columns match the renderer schema.
    RendererSchema,
    /// Every feature is placed in the report layout.
    FeatureLayout,
}

impl CheckKind {
    /// All checks in driver order.
    pub const ALL: &'static [Self] = &[
        Self::TestIds,
        Self::Titles,
        Self::TitleLength,
        Self::ElementIds,
        Self::OrderSync,
        Self::ResultsCoverage,
        Self::UntrackedFiles,
        Self::LineWidth,
        Self::UnusedNamespace,
        Self::RendererSchema,
        Self::FeatureLayout,
    ];

    /// Returns the stable snake_case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TestIds => "test_ids",
            Self::Titles => "titles",
            Self::TitleLength => "title_length",
            Self::ElementIds => "element_ids",
            Self::OrderSync => "order_sync",
            Self::ResultsCoverage => "results_coverage",
            Self::UntrackedFiles => "untracked_files",
            Self::LineWidth => "line_width",
            Self::UnusedNamespace => "unused_namespace",
            Self::RendererSchema => "renderer_schema",
            Self::FeatureLayout => "feature_layout",
        }
    }

    /// Resolves a snake_case label.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == value)
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Violations
// ============================================================================

/// One consistency problem found in the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum Violation {
    /// Two documents share a file name.
    DuplicateTestId {
        /// Shared identifier.
        id: TestId,
        /// Path of the first document.
        first: String,
        /// Path of the repeated document.
        second: String,
    },
    /// Two documents in one feature group share a title.
    DuplicateTitle {
        /// Feature group.
        feature_key: FeatureKey,
        /// Path of the first document.
        first: String,
        /// Path of the repeated document.
        second: String,
    },
    /// Document title is empty.
    EmptyTitle {
        /// Document path.
        file: String,
    },
    /// Document title exceeds the configured length.
    TitleTooLong {
        /// Document path.
        file: String,
        /// Title length in characters.
        length: usize,
        /// Configured maximum.
        max: usize,
    },
    /// Element without an id.
    MissingId {
        /// Local tag name.
        tag: String,
        /// Document path.
        file: String,
    },
    /// Element id repeated within one document.
    DuplicateId {
        /// Repeated id value.
        id: String,
        /// Document path.
        file: String,
    },
    /// Corpus and order list disagree.
    OrderOutOfSync {
        /// Ids present in the corpus but not declared.
        added: Vec<TestId>,
        /// Ids declared but absent from the corpus.
        removed: Vec<TestId>,
    },
    /// Order list repeats an id.
    DuplicateOrderEntry {
        /// Repeated identifier.
        id: TestId,
    },
    /// Declared ids without a result row.
    MissingResults {
        /// Ids lacking results, in declared order.
        ids: Vec<TestId>,
    },
    /// Present files not tracked by revision control.
    UntrackedFiles {
        /// Untracked paths, sorted.
        paths: Vec<String>,
    },
    /// Line wider than the configured width.
    LineTooLong {
        /// Document path.
        file: String,
        /// 1-based line number.
        line: usize,
        /// Line length in characters.
        length: usize,
        /// Configured maximum.
        max: usize,
    },
    /// Prefixed namespace declared but never referenced.
    UnusedNamespace {
        /// Document path.
        file: String,
        /// Declared prefix.
        prefix: String,
        /// Namespace URI.
        uri: String,
    },
    /// Schema renderer absent from the results table.
    RendererMissing {
        /// Missing renderer.
        renderer: RendererId,
    },
    /// Results column not declared by the schema.
    RendererUnknown {
        /// Undeclared column.
        column: String,
    },
    /// Feature present in the corpus or results but not in the layout.
    UnlistedFeature {
        /// Unlisted feature.
        feature_key: FeatureKey,
    },
    /// Out-of-scope entry naming no feature in the layout.
    UnknownScopeEntry {
        /// Unmatched feature key.
        feature_key: FeatureKey,
    },
    /// Results row id that does not follow the naming rule.
    MalformedResultId {
        /// Offending identifier.
        id: TestId,
    },
}

impl Violation {
    /// Returns the check that produces this violation.
    #[must_use]
    pub const fn kind(&self) -> CheckKind {
        match self {
            Self::DuplicateTestId {
                ..
            } => CheckKind::TestIds,
            Self::DuplicateTitle {
                ..
            }
            | Self::EmptyTitle {
                ..
            } => CheckKind::Titles,
            Self::TitleTooLong {
                ..
            } => CheckKind::TitleLength,
            Self::MissingId {
                ..
            }
            | Self::DuplicateId {
                ..
            } => CheckKind::ElementIds,
            Self::OrderOutOfSync {
                ..
            }
            | Self::DuplicateOrderEntry {
                ..
            } => CheckKind::OrderSync,
            Self::MissingResults {
                ..
            } => CheckKind::ResultsCoverage,
            Self::UntrackedFiles {
                ..
            } => CheckKind::UntrackedFiles,
            Self::LineTooLong {
                ..
            } => CheckKind::LineWidth,
            Self::UnusedNamespace {
                ..
            } => CheckKind::UnusedNamespace,
            Self::RendererMissing {
                ..
            }
            | Self::RendererUnknown {
                ..
            } => CheckKind::RendererSchema,
            Self::UnlistedFeature {
                ..
            }
            | Self::UnknownScopeEntry {
                ..
            }
            | Self::MalformedResultId {
                ..
            } => CheckKind::FeatureLayout,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTestId {
                id,
                first,
                second,
            } => write!(f, "test id {id} is used by {first} and {second}"),
            Self::DuplicateTitle {
                feature_key,
                first,
                second,
            } => write!(f, "{first} and {second} share a title in feature {feature_key}"),
            Self::EmptyTitle {
                file,
            } => write!(f, "{file} has an empty title"),
            Self::TitleTooLong {
                file,
                length,
                max,
            } => write!(f, "{file} has a title of {length} characters, max {max}"),
            Self::MissingId {
                tag,
                file,
            } => write!(f, "<{tag}> in {file} has no id"),
            Self::DuplicateId {
                id,
                file,
            } => write!(f, "id {id} is repeated in {file}"),
            Self::OrderOutOfSync {
                added,
                removed,
            } => {
                write!(
                    f,
                    "order list out of sync: added [{}], removed [{}]",
                    join(added),
                    join(removed)
                )
            }
            Self::DuplicateOrderEntry {
                id,
            } => write!(f, "order list repeats {id}"),
            Self::MissingResults {
                ids,
            } => write!(f, "no results for [{}]", join(ids)),
            Self::UntrackedFiles {
                paths,
            } => write!(f, "untracked files [{}]", join(paths)),
            Self::LineTooLong {
                file,
                line,
                length,
                max,
            } => write!(f, "{file}:{line} is {length} characters wide, max {max}"),
            Self::UnusedNamespace {
                file,
                prefix,
                uri,
            } => write!(f, "{file} declares unused namespace {prefix}={uri}"),
            Self::RendererMissing {
                renderer,
            } => write!(f, "renderer {renderer} has no results column"),
            Self::RendererUnknown {
                column,
            } => write!(f, "results column {column} is not a known renderer"),
            Self::UnlistedFeature {
                feature_key,
            } => write!(f, "feature {feature_key} is missing from the report layout"),
            Self::UnknownScopeEntry {
                feature_key,
            } => write!(f, "out-of-scope entry {feature_key} names no layout feature"),
            Self::MalformedResultId {
                id,
            } => write!(f, "results row {id} does not follow the test naming rule"),
        }
    }
}

/// Joins displayable items with `, `.
fn join<T: fmt::Display>(items: &[T]) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
