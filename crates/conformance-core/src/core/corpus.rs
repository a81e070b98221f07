// crates/conformance-core/src/core/corpus.rs
// ============================================================================
// Module: Corpus Index
// Description: Ordered collection of test cases and declared orderings.
// Purpose: Provide the corpus snapshot consumed by checks and rollups.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The corpus index holds every loaded [`TestCase`] in load order. The
//! declared canonical order lives in an [`OrderList`], parsed from a plain
//! text file with one identifier per line. File listings (present on disk,
//! tracked by revision control) are captured as [`FileSet`] snapshots so a
//! single check run never re-queries them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::document::TestCase;
use crate::core::identifiers::TestId;

// ============================================================================
// SECTION: Corpus Index
// ============================================================================

/// Ordered collection of loaded test cases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusIndex {
    /// Test cases in load order.
    cases: Vec<TestCase>,
}

impl CorpusIndex {
    /// Creates an index over the given cases, keeping their order.
    #[must_use]
    pub const fn new(cases: Vec<TestCase>) -> Self {
        Self {
            cases,
        }
    }

    /// Returns all cases in load order.
    #[must_use]
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Returns the number of cases.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns true when the corpus has no cases.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Looks up the first case with the given identifier.
    #[must_use]
    pub fn get(&self, id: &TestId) -> Option<&TestCase> {
        self.cases.iter().find(|case| &case.id == id)
    }

    /// Returns the set of identifiers present in the corpus.
    #[must_use]
    pub fn ids(&self) -> BTreeSet<&TestId> {
        self.cases.iter().map(|case| &case.id).collect()
    }

    /// Returns cases in declared order; cases absent from the list follow in
    /// file-name order.
    #[must_use]
    pub fn ordered_by(&self, order: &OrderList) -> Vec<&TestCase> {
        let mut ordered = Vec::with_capacity(self.cases.len());
        let mut seen = BTreeSet::new();
        for id in order.entries() {
            if let Some(case) = self.get(id)
                && seen.insert(&case.id)
            {
                ordered.push(case);
            }
        }
        let mut rest: Vec<&TestCase> =
            self.cases.iter().filter(|case| !seen.contains(&case.id)).collect();
        rest.sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.path.cmp(&b.path)));
        ordered.extend(rest);
        ordered
    }
}

// ============================================================================
// SECTION: Order List
// ============================================================================

/// Declared canonical ordering of test identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderList {
    /// Identifiers in declared order, duplicates preserved.
    entries: Vec<TestId>,
}

impl OrderList {
    /// Creates an order list from identifiers.
    #[must_use]
    pub const fn new(entries: Vec<TestId>) -> Self {
        Self {
            entries,
        }
    }

    /// Parses the order list text format.
    ///
    /// One identifier per line; surrounding whitespace is trimmed, and blank
    /// lines and lines starting with `#` are skipped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(TestId::from)
            .collect();
        Self {
            entries,
        }
    }

    /// Returns identifiers in declared order.
    #[must_use]
    pub fn entries(&self) -> &[TestId] {
        &self.entries
    }

    /// Returns the set of declared identifiers.
    #[must_use]
    pub fn ids(&self) -> BTreeSet<&TestId> {
        self.entries.iter().collect()
    }

    /// Returns true when the identifier is declared.
    #[must_use]
    pub fn contains(&self, id: &TestId) -> bool {
        self.entries.contains(id)
    }
}

// ============================================================================
// SECTION: File Sets
// ============================================================================

/// Snapshot of `/`-separated paths relative to the corpus root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSet {
    /// Paths in sorted order.
    paths: BTreeSet<String>,
}

impl FileSet {
    /// Creates a snapshot from paths.
    #[must_use]
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true when the path is in the snapshot.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Iterates over paths in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// Returns the number of paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns true when the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
