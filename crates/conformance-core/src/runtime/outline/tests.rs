// crates/conformance-core/src/runtime/outline/tests.rs
// ============================================================================
// Module: Corpus Outline Unit Tests
// Description: Sorting, filtering, and repeated-title warnings.
// Purpose: Pin the listing order and warning pairs.
// Dependencies: conformance-core
// ============================================================================

#![allow(clippy::unwrap_used, reason = "Test-only outline assertions.")]

use super::outline;
use crate::core::corpus::CorpusIndex;
use crate::core::document::ElementNode;
use crate::core::document::QualifiedName;
use crate::core::document::TestCase;

fn case(path: &str, title: &str) -> TestCase {
    TestCase::new(path, title, ElementNode::new(QualifiedName::local("svg")), Vec::new()).unwrap()
}

fn corpus() -> CorpusIndex {
    CorpusIndex::new(vec![
        case("shapes/e-rect-002.svg", "Rounded"),
        case("paint/a-fill-001.svg", "Named color"),
        case("shapes/e-rect-001.svg", "Simple"),
        case("shapes/e-circle-001.svg", "Simple"),
    ])
}

#[test]
fn entries_are_sorted_by_file_name() {
    let listing = outline(&corpus(), None);
    let ids: Vec<&str> = listing.entries.iter().map(|entry| entry.id.as_str()).collect();
    assert_eq!(ids, vec!["a-fill-001.svg", "e-circle-001.svg", "e-rect-001.svg", "e-rect-002.svg"]);
}

#[test]
fn repeated_titles_are_warned() {
    let listing = outline(&corpus(), None);
    assert_eq!(listing.warnings.len(), 1);
    assert_eq!(listing.warnings[0].first.as_str(), "e-circle-001.svg");
    assert_eq!(listing.warnings[0].second.as_str(), "e-rect-001.svg");
}

#[test]
fn feature_filter_limits_the_listing() {
    let key = "e-rect".parse().unwrap();
    let listing = outline(&corpus(), Some(&key));
    assert_eq!(listing.entries.len(), 2);
    assert!(listing.warnings.is_empty());
}
