// crates/conformance-core/src/core/outcome/tests.rs
// ============================================================================
// Module: Outcome Table Unit Tests
// Description: Schema validation, row decoding, and resync behavior.
// Purpose: Ensure malformed results fail closed with precise locations.
// Dependencies: conformance-core
// ============================================================================

//! ## Overview
//! Covers renderer schema invariants, column lookup by id, malformed code
//! rejection, and order-list resync.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only outcome assertions."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::OutcomeCode;
use super::OutcomeError;
use super::OutcomeTable;
use super::RendererSchema;
use super::RendererSpec;
use crate::core::corpus::OrderList;
use crate::core::identifiers::RendererId;
use crate::core::identifiers::TestId;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn spec(id: &str, primary: bool) -> RendererSpec {
    RendererSpec {
        id: RendererId::new(id),
        label: id.to_string(),
        primary,
    }
}

fn schema() -> RendererSchema {
    RendererSchema::new(1, "title", vec![spec("resvg", true), spec("chrome", false)]).unwrap()
}

fn strings(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| (*cell).to_string()).collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn schema_requires_exactly_one_primary() {
    let none = RendererSchema::new(1, "title", vec![spec("a", false), spec("b", false)]);
    assert_eq!(none.unwrap_err(), OutcomeError::PrimaryCount(0));
    let two = RendererSchema::new(1, "title", vec![spec("a", true), spec("b", true)]);
    assert_eq!(two.unwrap_err(), OutcomeError::PrimaryCount(2));
}

#[test]
fn schema_rejects_unknown_version_and_duplicates() {
    assert_eq!(
        RendererSchema::new(7, "title", vec![spec("a", true)]).unwrap_err(),
        OutcomeError::UnsupportedVersion(7)
    );
    assert!(matches!(
        RendererSchema::new(1, "title", vec![spec("a", true), spec("a", false)]),
        Err(OutcomeError::DuplicateRenderer(_))
    ));
    assert_eq!(RendererSchema::new(1, "title", Vec::new()).unwrap_err(), OutcomeError::EmptySchema);
}

#[test]
fn columns_are_resolved_by_renderer_id_not_position() {
    let schema = schema();
    let header = strings(&["title", "chrome", "resvg"]);
    let table =
        OutcomeTable::parse_rows(&schema, &header, vec![strings(&["e-rect-001.svg", "2", "1"])])
            .unwrap();
    let columns = schema.project(&table).unwrap();
    let record = table.get(&TestId::new("e-rect-001.svg")).unwrap();
    assert_eq!(columns.outcomes(record), vec![OutcomeCode::Passed, OutcomeCode::Failed]);
}

#[test]
fn malformed_code_names_row_column_and_value() {
    let header = strings(&["title", "resvg", "chrome"]);
    let rows = vec![strings(&["e-rect-001.svg", "1", "1"]), strings(&["e-rect-002.svg", "1", "9"])];
    let err = OutcomeTable::parse_rows(&schema(), &header, rows).unwrap_err();
    assert_eq!(
        err,
        OutcomeError::InvalidCode {
            row: 3,
            column: "chrome".to_string(),
            value: "9".to_string(),
        }
    );
}

#[test]
fn parse_rejects_wrong_id_column_and_width() {
    let bad_header = strings(&["file", "resvg", "chrome"]);
    assert!(matches!(
        OutcomeTable::parse_rows(&schema(), &bad_header, Vec::new()),
        Err(OutcomeError::MissingIdColumn { .. })
    ));
    let header = strings(&["title", "resvg", "chrome"]);
    assert!(matches!(
        OutcomeTable::parse_rows(&schema(), &header, vec![strings(&["e-rect-001.svg", "1"])]),
        Err(OutcomeError::ColumnCount { row: 2, expected: 3, found: 2 })
    ));
}

#[test]
fn parse_rejects_duplicate_records() {
    let header = strings(&["title", "resvg", "chrome"]);
    let rows = vec![strings(&["e-rect-001.svg", "1", "1"]), strings(&["e-rect-001.svg", "0", "0"])];
    assert!(matches!(
        OutcomeTable::parse_rows(&schema(), &header, rows),
        Err(OutcomeError::DuplicateRecord(_))
    ));
}

#[test]
fn project_reports_missing_renderer() {
    let header = strings(&["title", "resvg"]);
    let table = OutcomeTable::parse_rows(&schema(), &header, Vec::new()).unwrap();
    assert_eq!(
        schema().project(&table).unwrap_err(),
        OutcomeError::MissingRenderer(RendererId::new("chrome"))
    );
}

#[test]
fn resync_keeps_rows_adds_unknown_and_drops_unlisted() {
    let header = strings(&["title", "chrome", "resvg"]);
    let rows = vec![strings(&["e-rect-002.svg", "2", "1"]), strings(&["e-rect-009.svg", "1", "1"])];
    let table = OutcomeTable::parse_rows(&schema(), &header, rows).unwrap();
    let order = OrderList::parse("e-rect-001.svg\ne-rect-002.svg\n");
    let synced = table.resync(&schema(), &order).unwrap();
    let ids: Vec<&str> = synced.records().iter().map(|record| record.test_id.as_str()).collect();
    assert_eq!(ids, vec!["e-rect-001.svg", "e-rect-002.svg"]);
    assert_eq!(synced.renderers(), &[RendererId::new("resvg"), RendererId::new("chrome")]);
    assert_eq!(synced.records()[0].outcomes, vec![OutcomeCode::Unknown, OutcomeCode::Unknown]);
    assert_eq!(synced.records()[1].outcomes, vec![OutcomeCode::Passed, OutcomeCode::Failed]);
    let rows = synced.to_rows(&schema());
    assert_eq!(rows[0], strings(&["title", "resvg", "chrome"]));
    assert_eq!(rows[2], strings(&["e-rect-002.svg", "1", "2"]));
}

#[test]
fn unknown_and_passed_count_as_covered() {
    assert!(OutcomeCode::Unknown.is_covered());
    assert!(OutcomeCode::Passed.is_covered());
    assert!(!OutcomeCode::Failed.is_covered());
    assert!(!OutcomeCode::Crashed.is_covered());
    for code in 0..4 {
        assert_eq!(OutcomeCode::from_code(code).map(OutcomeCode::code), Some(code));
    }
    assert_eq!(OutcomeCode::from_code(4), None);
}

#[test]
fn large_tables_resolve_every_id_and_resync_in_order() {
    let header = strings(&["title", "resvg", "chrome"]);
    let ids: Vec<String> = (1..=20_000).map(|index| format!("e-rect-{index:05}.svg")).collect();
    let rows = ids.iter().map(|id| vec![id.clone(), "1".to_string(), "2".to_string()]);
    let table = OutcomeTable::parse_rows(&schema(), &header, rows).unwrap();
    assert_eq!(table.len(), ids.len());
    assert_eq!(table.ids().len(), ids.len());
    for id in &ids {
        assert_eq!(table.get(&TestId::new(id.as_str())).unwrap().test_id.as_str(), id);
    }

    let reversed: Vec<TestId> = ids.iter().rev().map(|id| TestId::new(id.as_str())).collect();
    let synced = table.resync(&schema(), &OrderList::new(reversed.clone())).unwrap();
    let synced_ids: Vec<TestId> =
        synced.records().iter().map(|record| record.test_id.clone()).collect();
    assert_eq!(synced_ids, reversed);
    let last = synced.get(&reversed[0]).unwrap();
    assert_eq!(last.outcomes, vec![OutcomeCode::Passed, OutcomeCode::Failed]);
}

#[test]
fn numbered_rows_keep_their_source_lines() {
    let header = strings(&["title", "resvg", "chrome"]);
    let rows = vec![(3, strings(&["e-rect-001.svg", "1", "1"])), (7, strings(&["e-rect-002.svg", "x", "1"]))];
    let err = OutcomeTable::parse_numbered_rows(&schema(), &header, rows).unwrap_err();
    assert!(matches!(err, OutcomeError::InvalidCode { row: 7, .. }));
}

#[test]
fn decoded_tables_rebuild_the_id_index() {
    let header = strings(&["title", "resvg", "chrome"]);
    let rows = vec![strings(&["e-rect-001.svg", "1", "3"])];
    let table = OutcomeTable::parse_rows(&schema(), &header, rows).unwrap();
    let json = serde_json::to_string(&table).unwrap();
    let decoded: OutcomeTable = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, table);
    assert!(decoded.get(&TestId::new("e-rect-001.svg")).is_some());

    let duplicated = r#"{"renderers":["resvg"],"records":[
        {"test_id":"e-rect-001.svg","outcomes":["passed"]},
        {"test_id":"e-rect-001.svg","outcomes":["failed"]}]}"#;
    assert!(serde_json::from_str::<OutcomeTable>(duplicated).is_err());
}
