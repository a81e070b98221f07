// crates/conformance-core/src/runtime/checker.rs
// ============================================================================
// Module: Consistency Checker
// Description: Pure corpus invariant checks and the driver that runs them.
// Purpose: Report every violation in one pass, grouped by check.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Each `check_*` function is a pure function of its declared inputs and
//! returns the violations it found; none of them share state or depend on
//! another check having run. [`run_checks`] runs every enabled check whose
//! inputs were supplied and merges the results into a [`CheckReport`].
//!
//! Checks whose inputs are missing are recorded as skipped rather than
//! passed, so callers can tell "clean" apart from "not evaluated".

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::btree_map::Entry;

use serde::Deserialize;
use serde::Serialize;

use crate::core::corpus::CorpusIndex;
use crate::core::corpus::FileSet;
use crate::core::corpus::OrderList;
use crate::core::document::DocumentText;
use crate::core::document::TestCase;
use crate::core::identifiers::FeatureKey;
use crate::core::identifiers::TestId;
use crate::core::layout::ReportLayout;
use crate::core::outcome::OutcomeTable;
use crate::core::outcome::RendererSchema;
use crate::runtime::violation::CheckKind;
use crate::runtime::violation::Violation;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default maximum title length in characters.
pub const DEFAULT_TITLE_MAX_LENGTH: usize = 60;

/// Default maximum line width in characters.
pub const DEFAULT_LINE_WIDTH: usize = 100;

/// Structural tags that never need an id.
pub const DEFAULT_IGNORED_TAGS: &[&str] = &[
    "title",
    "desc",
    "stop",
    "feBlend",
    "feColorMatrix",
    "feComponentTransfer",
    "feComposite",
    "feConvolveMatrix",
    "feDiffuseLighting",
    "feDistantLight",
    "feDropShadow",
    "feFlood",
    "feFuncA",
    "feFuncB",
    "feFuncG",
    "feFuncR",
    "feGaussianBlur",
    "feImage",
    "feMerge",
    "feMergeNode",
    "feMorphology",
    "feOffset",
    "fePointLight",
    "feSpecularLighting",
    "feSpotLight",
    "feTile",
    "feTurbulence",
];

/// Namespace bound to the reserved `xml` prefix.
const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Tunables and allow-lists for the checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Maximum title length; `None` disables the title length check.
    pub title_max_length: Option<usize>,
    /// Maximum line width in characters.
    pub line_width: usize,
    /// Tags exempt from the element id requirement.
    pub ignored_tags: BTreeSet<String>,
    /// Documents exempt from the element id check.
    pub id_exemptions: BTreeSet<TestId>,
    /// Documents exempt from the line width check.
    pub line_width_exemptions: BTreeSet<TestId>,
    /// Documents exempt from the unused namespace check.
    pub namespace_exemptions: BTreeSet<TestId>,
    /// Checks that never run.
    pub disabled: BTreeSet<CheckKind>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            title_max_length: Some(DEFAULT_TITLE_MAX_LENGTH),
            line_width: DEFAULT_LINE_WIDTH,
            ignored_tags: DEFAULT_IGNORED_TAGS.iter().map(|tag| (*tag).to_string()).collect(),
            id_exemptions: BTreeSet::new(),
            line_width_exemptions: BTreeSet::new(),
            namespace_exemptions: BTreeSet::new(),
            disabled: BTreeSet::new(),
        }
    }
}

/// Inputs supplied by the loaders for one check run.
#[derive(Debug, Clone, Copy)]
pub struct CheckInputs<'a> {
    /// Loaded test cases.
    pub corpus: &'a CorpusIndex,
    /// Raw document text for text-level checks.
    pub texts: &'a [DocumentText],
    /// Declared order list.
    pub order: Option<&'a OrderList>,
    /// Parsed results table.
    pub outcomes: Option<&'a OutcomeTable>,
    /// Agreed renderer schema.
    pub schema: Option<&'a RendererSchema>,
    /// Declared report layout.
    pub layout: Option<&'a ReportLayout>,
    /// Files present under the corpus root.
    pub present_files: Option<&'a FileSet>,
    /// Files tracked by revision control.
    pub tracked_files: Option<&'a FileSet>,
}

impl<'a> CheckInputs<'a> {
    /// Creates inputs with only the corpus and document text.
    #[must_use]
    pub const fn new(corpus: &'a CorpusIndex, texts: &'a [DocumentText]) -> Self {
        Self {
            corpus,
            texts,
            order: None,
            outcomes: None,
            schema: None,
            layout: None,
            present_files: None,
            tracked_files: None,
        }
    }
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Overall result of a check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// No violations.
    Pass,
    /// At least one violation.
    Fail,
}

/// Merged result of every check in one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    /// Pass when `violations` is empty.
    pub status: CheckStatus,
    /// Number of test cases inspected.
    pub cases_checked: usize,
    /// Checks that ran, in driver order.
    pub checks_run: Vec<CheckKind>,
    /// Checks skipped because they were disabled or lacked inputs.
    pub checks_skipped: Vec<CheckKind>,
    /// Violations in driver order.
    pub violations: Vec<Violation>,
}

impl CheckReport {
    /// Returns true when no violation was found.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Counts violations per check.
    #[must_use]
    pub fn count_by_kind(&self) -> BTreeMap<CheckKind, usize> {
        let mut counts = BTreeMap::new();
        for violation in &self.violations {
            *counts.entry(violation.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// Groups violations per check, in check order.
    #[must_use]
    pub fn grouped(&self) -> BTreeMap<CheckKind, Vec<&Violation>> {
        let mut groups: BTreeMap<CheckKind, Vec<&Violation>> = BTreeMap::new();
        for violation in &self.violations {
            groups.entry(violation.kind()).or_default().push(violation);
        }
        groups
    }

    /// Returns the human-readable digest, one line per violation.
    #[must_use]
    pub fn digest_lines(&self) -> Vec<String> {
        self.grouped()
            .into_iter()
            .flat_map(|(kind, violations)| {
                violations.into_iter().map(move |violation| format!("[{kind}] {violation}"))
            })
            .collect()
    }
}

// ============================================================================
// SECTION: Driver
// ============================================================================

/// Runs every enabled check whose inputs are present.
#[must_use]
pub fn run_checks(inputs: &CheckInputs<'_>, config: &CheckConfig) -> CheckReport {
    let mut checks_run = Vec::new();
    let mut checks_skipped = Vec::new();
    let mut violations = Vec::new();
    for kind in CheckKind::ALL.iter().copied() {
        let found = if config.disabled.contains(&kind) {
            None
        } else {
            run_one(kind, inputs, config)
        };
        match found {
            Some(found) => {
                checks_run.push(kind);
                violations.extend(found);
            }
            None => checks_skipped.push(kind),
        }
    }
    let status = if violations.is_empty() { CheckStatus::Pass } else { CheckStatus::Fail };
    CheckReport {
        status,
        cases_checked: inputs.corpus.len(),
        checks_run,
        checks_skipped,
        violations,
    }
}

/// Runs one check, returning `None` when its inputs are missing.
fn run_one(kind: CheckKind, inputs: &CheckInputs<'_>, config: &CheckConfig) -> Option<Vec<Violation>> {
    let cases = inputs.corpus.cases();
    match kind {
        CheckKind::TestIds => Some(check_test_ids(cases)),
        CheckKind::Titles => Some(check_titles(cases)),
        CheckKind::TitleLength => {
            config.title_max_length.map(|max| check_title_length(cases, max))
        }
        CheckKind::ElementIds => Some(
            cases
                .iter()
                .filter(|case| !config.id_exemptions.contains(&case.id))
                .flat_map(|case| check_element_ids(case, &config.ignored_tags))
                .collect(),
        ),
        CheckKind::OrderSync => inputs.order.map(|order| check_order_sync(inputs.corpus, order)),
        CheckKind::ResultsCoverage => match (inputs.order, inputs.outcomes) {
            (Some(order), Some(outcomes)) => Some(check_results_coverage(order, outcomes)),
            _ => None,
        },
        CheckKind::UntrackedFiles => match (inputs.present_files, inputs.tracked_files) {
            (Some(present), Some(tracked)) => Some(check_untracked_files(present, tracked)),
            _ => None,
        },
        CheckKind::LineWidth => Some(
            inputs
                .texts
                .iter()
                .filter(|text| !config.line_width_exemptions.contains(&text.id))
                .flat_map(|text| check_line_width(text, config.line_width))
                .collect(),
        ),
        CheckKind::UnusedNamespace => Some(
            cases
                .iter()
                .filter(|case| !config.namespace_exemptions.contains(&case.id))
                .flat_map(check_unused_namespaces)
                .collect(),
        ),
        CheckKind::RendererSchema => match (inputs.schema, inputs.outcomes) {
            (Some(schema), Some(outcomes)) => Some(check_renderer_schema(schema, outcomes)),
            _ => None,
        },
        CheckKind::FeatureLayout => {
            inputs.layout.map(|layout| check_feature_layout(layout, inputs.corpus, inputs.outcomes))
        }
    }
}

// ============================================================================
// SECTION: Identity Checks
// ============================================================================

/// Flags documents that share a file name.
#[must_use]
pub fn check_test_ids(cases: &[TestCase]) -> Vec<Violation> {
    let mut first_seen: BTreeMap<&TestId, &str> = BTreeMap::new();
    let mut violations = Vec::new();
    for case in cases {
        match first_seen.entry(&case.id) {
            Entry::Vacant(slot) => {
                slot.insert(&case.path);
            }
            Entry::Occupied(slot) => violations.push(Violation::DuplicateTestId {
                id: case.id.clone(),
                first: (*slot.get()).to_string(),
                second: case.path.clone(),
            }),
        }
    }
    violations
}

/// Flags empty titles and titles repeated within a feature group.
#[must_use]
pub fn check_titles(cases: &[TestCase]) -> Vec<Violation> {
    let mut first_seen: BTreeMap<(&FeatureKey, &str), &str> = BTreeMap::new();
    let mut violations = Vec::new();
    for case in cases {
        let title = case.title.trim();
        if title.is_empty() {
            violations.push(Violation::EmptyTitle {
                file: case.path.clone(),
            });
            continue;
        }
        match first_seen.entry((&case.feature_key, title)) {
            Entry::Vacant(slot) => {
                slot.insert(&case.path);
            }
            Entry::Occupied(slot) => violations.push(Violation::DuplicateTitle {
                feature_key: case.feature_key.clone(),
                first: (*slot.get()).to_string(),
                second: case.path.clone(),
            }),
        }
    }
    violations
}

/// Flags titles longer than `max` characters.
#[must_use]
pub fn check_title_length(cases: &[TestCase], max: usize) -> Vec<Violation> {
    cases
        .iter()
        .filter_map(|case| {
            let length = case.title.chars().count();
            (length > max).then(|| Violation::TitleTooLong {
                file: case.path.clone(),
                length,
                max,
            })
        })
        .collect()
}

/// Flags elements without an id and ids repeated within one document.
///
/// Only `case` is inspected, so results for one document never depend on
/// another.
#[must_use]
pub fn check_element_ids(case: &TestCase, ignored_tags: &BTreeSet<String>) -> Vec<Violation> {
    let mut seen = BTreeSet::new();
    let mut reported = BTreeSet::new();
    let mut violations = Vec::new();
    for element in case.elements() {
        if ignored_tags.contains(element.tag()) {
            continue;
        }
        match element.id.as_deref().filter(|id| !id.is_empty()) {
            None => violations.push(Violation::MissingId {
                tag: element.tag().to_string(),
                file: case.path.clone(),
            }),
            Some(id) => {
                if !seen.insert(id) && reported.insert(id) {
                    violations.push(Violation::DuplicateId {
                        id: id.to_string(),
                        file: case.path.clone(),
                    });
                }
            }
        }
    }
    violations
}

// ============================================================================
// SECTION: Listing Checks
// ============================================================================

/// Compares corpus ids with the order list, reporting the directional diff.
#[must_use]
pub fn check_order_sync(corpus: &CorpusIndex, order: &OrderList) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut seen = BTreeSet::new();
    let mut repeated = BTreeSet::new();
    for id in order.entries() {
        if !seen.insert(id) && repeated.insert(id) {
            violations.push(Violation::DuplicateOrderEntry {
                id: id.clone(),
            });
        }
    }
    let present = corpus.ids();
    let added: Vec<TestId> = present.difference(&seen).map(|id| (*id).clone()).collect();
    let removed: Vec<TestId> = seen.difference(&present).map(|id| (*id).clone()).collect();
    if !added.is_empty() || !removed.is_empty() {
        violations.push(Violation::OrderOutOfSync {
            added,
            removed,
        });
    }
    violations
}

/// Flags declared ids without a results row.
#[must_use]
pub fn check_results_coverage(order: &OrderList, outcomes: &OutcomeTable) -> Vec<Violation> {
    let recorded = outcomes.ids();
    let mut seen = BTreeSet::new();
    let ids: Vec<TestId> = order
        .entries()
        .iter()
        .filter(|id| !recorded.contains(id) && seen.insert(*id))
        .cloned()
        .collect();
    if ids.is_empty() {
        Vec::new()
    } else {
        vec![Violation::MissingResults {
            ids,
        }]
    }
}

/// Flags present files that revision control does not track.
#[must_use]
pub fn check_untracked_files(present: &FileSet, tracked: &FileSet) -> Vec<Violation> {
    let paths: Vec<String> =
        present.iter().filter(|path| !tracked.contains(path)).map(str::to_string).collect();
    if paths.is_empty() {
        Vec::new()
    } else {
        vec![Violation::UntrackedFiles {
            paths,
        }]
    }
}

// ============================================================================
// SECTION: Text Checks
// ============================================================================

/// Flags lines wider than `max` characters (line numbers are 1-based).
#[must_use]
pub fn check_line_width(text: &DocumentText, max: usize) -> Vec<Violation> {
    text.text
        .lines()
        .enumerate()
        .filter_map(|(offset, line)| {
            let length = line.chars().count();
            (length > max).then(|| Violation::LineTooLong {
                file: text.path.clone(),
                line: offset + 1,
                length,
                max,
            })
        })
        .collect()
}

/// Flags prefixed namespaces that no element or attribute references.
///
/// A declaration whose URI no other declaration binds counts as used when
/// any element or attribute resolves to that URI. When several declarations
/// bind the same URI, each prefix must itself appear on a tag or attribute.
/// The default namespace and the `xml` namespace are never reported.
#[must_use]
pub fn check_unused_namespaces(case: &TestCase) -> Vec<Violation> {
    let mut used_uris: BTreeSet<&str> = BTreeSet::new();
    let mut used_prefixes: BTreeSet<&str> = BTreeSet::new();
    for element in case.elements() {
        if let Some(namespace) = element.name.namespace.as_deref() {
            used_uris.insert(namespace);
        }
        used_uris.extend(element.attribute_namespaces.iter().map(String::as_str));
        used_prefixes.extend(element.prefixes.iter().map(String::as_str));
    }
    let mut bindings: BTreeMap<&str, usize> = BTreeMap::new();
    for decl in &case.namespaces {
        *bindings.entry(decl.uri.as_str()).or_default() += 1;
    }
    case.namespaces
        .iter()
        .filter_map(|decl| {
            let prefix = decl.prefix.as_deref()?;
            if prefix == "xml" || decl.uri == XML_NAMESPACE || used_prefixes.contains(prefix) {
                return None;
            }
            let shared = bindings.get(decl.uri.as_str()).copied().unwrap_or_default() > 1;
            if !shared && used_uris.contains(decl.uri.as_str()) {
                return None;
            }
            Some(Violation::UnusedNamespace {
                file: case.path.clone(),
                prefix: prefix.to_string(),
                uri: decl.uri.clone(),
            })
        })
        .collect()
}

// ============================================================================
// SECTION: Schema Checks
// ============================================================================

/// Compares results columns with the renderer schema by id.
#[must_use]
pub fn check_renderer_schema(schema: &RendererSchema, outcomes: &OutcomeTable) -> Vec<Violation> {
    let mut violations: Vec<Violation> = schema
        .renderers()
        .iter()
        .filter(|renderer| outcomes.column_of(&renderer.id).is_none())
        .map(|renderer| Violation::RendererMissing {
            renderer: renderer.id.clone(),
        })
        .collect();
    violations.extend(
        outcomes
            .renderers()
            .iter()
            .filter(|column| !schema.renderers().iter().any(|renderer| &renderer.id == *column))
            .map(|column| Violation::RendererUnknown {
                column: column.to_string(),
            }),
    );
    violations
}

/// Flags features missing from the layout and stale out-of-scope entries.
#[must_use]
pub fn check_feature_layout(
    layout: &ReportLayout,
    corpus: &CorpusIndex,
    outcomes: Option<&OutcomeTable>,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut features: BTreeSet<FeatureKey> =
        corpus.cases().iter().map(|case| case.feature_key.clone()).collect();
    if let Some(outcomes) = outcomes {
        for record in outcomes.records() {
            match record.test_id.parse() {
                Ok(name) => {
                    features.insert(name.feature_key);
                }
                Err(_) => violations.push(Violation::MalformedResultId {
                    id: record.test_id.clone(),
                }),
            }
        }
    }
    let declared: BTreeSet<&FeatureKey> = layout.features().collect();
    violations.extend(features.into_iter().filter(|key| !declared.contains(key)).map(
        |feature_key| Violation::UnlistedFeature {
            feature_key,
        },
    ));
    violations.extend(layout.out_of_scope.iter().filter(|key| !declared.contains(key)).map(
        |feature_key| Violation::UnknownScopeEntry {
            feature_key: feature_key.clone(),
        },
    ));
    violations
}

// ============================================================================
// SECTION: Tests
// ============================================================================
