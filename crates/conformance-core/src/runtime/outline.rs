// crates/conformance-core/src/runtime/outline.rs
// ============================================================================
// Module: Corpus Outline
// Description: Flat listing of test documents and their titles.
// Purpose: Give authors a quick view of a feature's tests.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Lists test ids with their titles in id order, optionally narrowed to one
//! feature, and warns when two tests share a title.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::corpus::CorpusIndex;
use crate::core::identifiers::FeatureKey;
use crate::core::identifiers::TestId;

/// One listed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Test id.
    pub id: TestId,
    /// Declared title.
    pub title: String,
}

/// Title shared by two listed documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatedTitle {
    /// Shared title.
    pub title: String,
    /// Earlier document in listing order.
    pub first: TestId,
    /// Later document in listing order.
    pub second: TestId,
}

/// Listing sorted by file name, with repeated-title warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    /// Entries sorted by test id.
    pub entries: Vec<OutlineEntry>,
    /// Titles that appear more than once in the listing.
    pub warnings: Vec<RepeatedTitle>,
}

/// Lists every document, optionally restricted to one feature.
#[must_use]
pub fn outline(corpus: &CorpusIndex, feature: Option<&FeatureKey>) -> Outline {
    let mut cases: Vec<_> = corpus
        .cases()
        .iter()
        .filter(|case| feature.is_none_or(|key| &case.feature_key == key))
        .collect();
    cases.sort_by(|a, b| a.id.cmp(&b.id));

    let mut seen: BTreeMap<&str, &TestId> = BTreeMap::new();
    let mut outline = Outline::default();
    for case in cases {
        if let Some(first) = seen.get(case.title.as_str()) {
            outline.warnings.push(RepeatedTitle {
                title: case.title.clone(),
                first: (*first).clone(),
                second: case.id.clone(),
            });
        } else {
            seen.insert(case.title.as_str(), &case.id);
        }
        outline.entries.push(OutlineEntry {
            id: case.id.clone(),
            title: case.title.clone(),
        });
    }
    outline
}

#[cfg(test)]
mod tests;
