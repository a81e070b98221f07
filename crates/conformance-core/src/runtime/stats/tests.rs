// crates/conformance-core/src/runtime/stats/tests.rs
// ============================================================================
// Module: Conformance Stats Unit Tests
// Description: Pass counting by renderer id.
// Purpose: Ensure stats follow schema order rather than file column order.
// Dependencies: conformance-core
// ============================================================================

#![allow(clippy::unwrap_used, reason = "Test-only stats assertions.")]

use super::conformance_stats;
use crate::core::identifiers::RendererId;
use crate::core::outcome::OutcomeError;
use crate::core::outcome::OutcomeTable;
use crate::core::outcome::RendererSchema;
use crate::core::outcome::RendererSpec;

fn schema(ids: &[&str]) -> RendererSchema {
    let renderers = ids
        .iter()
        .enumerate()
        .map(|(position, id)| RendererSpec {
            id: RendererId::new(*id),
            label: id.to_uppercase(),
            primary: position == 0,
        })
        .collect();
    RendererSchema::new(1, "title", renderers).unwrap()
}

#[test]
fn counts_passed_per_renderer_in_schema_order() {
    let schema = schema(&["resvg", "chrome"]);
    let header = vec!["title".to_string(), "chrome".to_string(), "resvg".to_string()];
    let rows = vec![
        vec!["e-rect-001.svg".to_string(), "1".to_string(), "1".to_string()],
        vec!["e-rect-002.svg".to_string(), "2".to_string(), "1".to_string()],
        vec!["e-rect-003.svg".to_string(), "0".to_string(), "3".to_string()],
    ];
    let table = OutcomeTable::parse_rows(&schema, &header, rows).unwrap();
    let stats = conformance_stats(&schema, &table).unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.renderers[0].renderer.as_str(), "resvg");
    assert_eq!(stats.renderers[0].label, "RESVG");
    assert_eq!(stats.renderers[0].passed, 2);
    assert_eq!(stats.renderers[1].passed, 1);
}

#[test]
fn missing_renderer_is_an_error() {
    let narrow = schema(&["resvg"]);
    let header = vec!["title".to_string(), "resvg".to_string()];
    let table = OutcomeTable::parse_rows(&narrow, &header, Vec::new()).unwrap();
    let err = conformance_stats(&schema(&["resvg", "chrome"]), &table).unwrap_err();
    assert!(matches!(err, OutcomeError::MissingRenderer(renderer) if renderer.as_str() == "chrome"));
}
