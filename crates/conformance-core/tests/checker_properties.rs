// crates/conformance-core/tests/checker_properties.rs
// ============================================================================
// Module: Consistency Checker Property Tests
// Description: Corpus-level properties of the check driver.
// Purpose: Ensure clean corpora pass and single edits yield single violations.
// ============================================================================

//! Property-based tests for the consistency checker.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::BTreeSet;

use conformance_core::CategoryLayout;
use conformance_core::CheckConfig;
use conformance_core::CheckInputs;
use conformance_core::CorpusIndex;
use conformance_core::ElementNode;
use conformance_core::OrderList;
use conformance_core::OutcomeTable;
use conformance_core::QualifiedName;
use conformance_core::RendererId;
use conformance_core::RendererSchema;
use conformance_core::RendererSpec;
use conformance_core::ReportLayout;
use conformance_core::TestCase;
use conformance_core::TestId;
use conformance_core::Violation;
use conformance_core::run_checks;
use proptest::prelude::*;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn schema() -> RendererSchema {
    RendererSchema::new(
        1,
        "title",
        vec![RendererSpec {
            id: RendererId::new("resvg"),
            label: "resvg".to_string(),
            primary: true,
        }],
    )
    .unwrap()
}

fn case(index: usize, extra: Option<&str>) -> TestCase {
    let mut root = ElementNode::new(QualifiedName::local("svg"))
        .with_id("svg1")
        .with_child(ElementNode::new(QualifiedName::local("title")))
        .with_child(ElementNode::new(QualifiedName::local("rect")).with_id("rect1"));
    if let Some(id) = extra {
        root = root.with_child(ElementNode::new(QualifiedName::local("rect")).with_id(id));
    }
    let path = format!("shapes/e-rect-{index:03}.svg");
    TestCase::new(path, format!("Rect variant {index}"), root, Vec::new()).unwrap()
}

fn ids(count: usize) -> Vec<TestId> {
    (1 ..= count).map(|index| TestId::new(format!("e-rect-{index:03}.svg"))).collect()
}

fn results(ids: &[TestId]) -> OutcomeTable {
    let header = vec!["title".to_string(), "resvg".to_string()];
    let rows = ids.iter().map(|id| vec![id.to_string(), "1".to_string()]);
    OutcomeTable::parse_rows(&schema(), &header, rows).unwrap()
}

fn layout() -> ReportLayout {
    ReportLayout {
        categories: vec![CategoryLayout {
            title: "Shapes".to_string(),
            link: None,
            features: vec!["e-rect".parse().unwrap()],
        }],
        out_of_scope: BTreeSet::new(),
    }
}

// ============================================================================
// SECTION: Properties
// ============================================================================

proptest! {
    #[test]
    fn unique_ids_with_full_results_pass(count in 1_usize .. 40) {
        let corpus = CorpusIndex::new((1 ..= count).map(|index| case(index, None)).collect());
        let order = OrderList::new(ids(count));
        let outcomes = results(&ids(count));
        let schema = schema();
        let layout = layout();
        let inputs = CheckInputs {
            order: Some(&order),
            outcomes: Some(&outcomes),
            schema: Some(&schema),
            layout: Some(&layout),
            ..CheckInputs::new(&corpus, &[])
        };
        let report = run_checks(&inputs, &CheckConfig::default());
        prop_assert!(report.is_clean(), "unexpected violations: {:?}", report.violations);
    }

    #[test]
    fn one_removed_file_yields_one_order_violation(count in 2_usize .. 40, removed in 0_usize .. 40) {
        let removed = removed % count + 1;
        let corpus = CorpusIndex::new(
            (1 ..= count).filter(|index| *index != removed).map(|index| case(index, None)).collect(),
        );
        let order = OrderList::new(ids(count));
        let outcomes = results(&ids(count));
        let schema = schema();
        let layout = layout();
        let inputs = CheckInputs {
            order: Some(&order),
            outcomes: Some(&outcomes),
            schema: Some(&schema),
            layout: Some(&layout),
            ..CheckInputs::new(&corpus, &[])
        };
        let report = run_checks(&inputs, &CheckConfig::default());
        prop_assert_eq!(
            report.violations,
            vec![Violation::OrderOutOfSync {
                added: Vec::new(),
                removed: vec![TestId::new(format!("e-rect-{removed:03}.svg"))],
            }]
        );
    }

    #[test]
    fn duplicate_element_id_stays_in_its_document(count in 2_usize .. 20, broken in 0_usize .. 20) {
        let broken = broken % count + 1;
        let corpus = CorpusIndex::new(
            (1 ..= count)
                .map(|index| case(index, (index == broken).then_some("rect1")))
                .collect(),
        );
        let report = run_checks(&CheckInputs::new(&corpus, &[]), &CheckConfig::default());
        prop_assert_eq!(
            report.violations,
            vec![Violation::DuplicateId {
                id: "rect1".to_string(),
                file: format!("shapes/e-rect-{broken:03}.svg"),
            }]
        );
    }
}
