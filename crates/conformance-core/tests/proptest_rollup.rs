// crates/conformance-core/tests/proptest_rollup.rs
// ============================================================================
// Module: Rollup Property-Based Tests
// Description: Property tests for rollup status and summary tree stability.
// Purpose: Hold the rollup rule and idempotence across random outcome tables.
// ============================================================================

//! Property-based tests for rollup invariants.

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
use conformance_core::DEFAULT_HASH_ALGORITHM;
use conformance_core::OutcomeCode;
use conformance_core::OutcomeTable;
use conformance_core::RendererId;
use conformance_core::RendererSchema;
use conformance_core::RendererSpec;
use conformance_core::ReportLayout;
use conformance_core::RollupAggregator;
use conformance_core::RollupStatus;
use conformance_core::runtime::rollup_status;
use proptest::prelude::*;

fn outcome_strategy() -> impl Strategy<Value = OutcomeCode> {
    (0_u8 .. 4).prop_map(|code| OutcomeCode::from_code(code).unwrap())
}

fn schema() -> RendererSchema {
    RendererSchema::new(
        1,
        "title",
        vec![
            RendererSpec {
                id: RendererId::new("resvg"),
                label: "resvg".to_string(),
                primary: true,
            },
            RendererSpec {
                id: RendererId::new("chrome"),
                label: "Chrome".to_string(),
                primary: false,
            },
        ],
    )
    .unwrap()
}

fn layout() -> ReportLayout {
    ReportLayout {
        categories: vec![CategoryLayout {
            title: "Shapes".to_string(),
            link: None,
            features: vec!["e-rect".parse().unwrap(), "e-circle".parse().unwrap()],
        }],
        out_of_scope: BTreeSet::new(),
    }
}

fn table(rows: &[(OutcomeCode, OutcomeCode)]) -> OutcomeTable {
    let schema = schema();
    let header = vec!["title".to_string(), "resvg".to_string(), "chrome".to_string()];
    let rows = rows.iter().enumerate().map(|(index, (resvg, chrome))| {
        vec![
            format!("e-rect-{:03}.svg", index + 1),
            resvg.code().to_string(),
            chrome.code().to_string(),
        ]
    });
    OutcomeTable::parse_rows(&schema, &header, rows).unwrap()
}

proptest! {
    #[test]
    fn rollup_status_matches_covered_counts(codes in prop::collection::vec(outcome_strategy(), 1 .. 16)) {
        let covered = codes.iter().filter(|code| code.is_covered()).count();
        let status = rollup_status(&codes);
        if covered == codes.len() {
            prop_assert_eq!(status, RollupStatus::Passed);
        } else if covered == 0 {
            prop_assert_eq!(status, RollupStatus::Failed);
        } else {
            prop_assert_eq!(status, RollupStatus::Partial);
        }
    }

    #[test]
    fn aggregation_is_byte_stable(rows in prop::collection::vec((outcome_strategy(), outcome_strategy()), 0 .. 24)) {
        let schema = schema();
        let layout = layout();
        let outcomes = table(&rows);
        let aggregator = RollupAggregator::new(&schema, &layout);
        let first = aggregator.aggregate(&outcomes).unwrap();
        let second = aggregator.aggregate(&outcomes).unwrap();
        prop_assert_eq!(
            serde_jcs::to_vec(&first).unwrap(),
            serde_jcs::to_vec(&second).unwrap()
        );
        prop_assert_eq!(
            first.digest(DEFAULT_HASH_ALGORITHM).unwrap(),
            second.digest(DEFAULT_HASH_ALGORITHM).unwrap()
        );
    }

    #[test]
    fn every_declared_feature_is_emitted(rows in prop::collection::vec((outcome_strategy(), outcome_strategy()), 0 .. 24)) {
        let schema = schema();
        let layout = layout();
        let tree = RollupAggregator::new(&schema, &layout).aggregate(&table(&rows)).unwrap();
        let keys: Vec<String> = tree.features().map(|feature| feature.feature_key.to_string()).collect();
        prop_assert_eq!(keys, vec!["e-rect".to_string(), "e-circle".to_string()]);
        prop_assert_eq!(tree.test_count(), rows.len());
        let circle = tree.features().nth(1).unwrap();
        prop_assert_eq!(circle.rollups[0].status, RollupStatus::Failed);
        prop_assert_eq!(circle.rollups[1].status, RollupStatus::Unknown);
        let rect = tree.features().next().unwrap();
        for rollup in &rect.rollups {
            prop_assert_eq!(rollup.total, rows.len());
            prop_assert!(rollup.covered <= rollup.total);
        }
    }
}
