// crates/conformance-report/tests/report_bundle.rs
// ============================================================================
// Module: Report Bundle Tests
// Description: Deterministic report generation and in-place verification.
// Purpose: Validate stable artifacts and the manifest digest contract.
// Dependencies: conformance-report, conformance-core, tempfile
// ============================================================================

//! ## Overview
//! Builds a report from a small aggregated summary and checks that repeated
//! builds are identical, written output verifies, and the manifest carries
//! the summary digest.

// ============================================================================
// SECTION: Imports
// ============================================================================

use conformance_core::CategoryLayout;
use conformance_core::DEFAULT_HASH_ALGORITHM;
use conformance_core::OutcomeTable;
use conformance_core::RendererId;
use conformance_core::RendererSchema;
use conformance_core::RendererSpec;
use conformance_core::ReportLayout;
use conformance_core::RollupAggregator;
use conformance_core::conformance_stats;
use conformance_report::ReportBuilder;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn builder() -> Result<ReportBuilder, Box<dyn std::error::Error>> {
    let spec = |id: &str, primary| RendererSpec {
        id: RendererId::new(id),
        label: id.to_string(),
        primary,
    };
    let schema = RendererSchema::new(1, "title", vec![spec("resvg", true), spec("batik", false)])?;
    let layout = ReportLayout {
        categories: vec![CategoryLayout {
            title: "Painting".to_string(),
            link: None,
            features: vec!["a-fill".parse()?, "a-stroke".parse()?],
        }],
        out_of_scope: std::collections::BTreeSet::new(),
    };
    let header = vec!["title".to_string(), "resvg".to_string(), "batik".to_string()];
    let rows = vec![
        vec!["a-fill-001.svg".to_string(), "1".to_string(), "2".to_string()],
        vec!["a-stroke-001.svg".to_string(), "0".to_string(), "1".to_string()],
    ];
    let table = OutcomeTable::parse_rows(&schema, &header, rows)?;
    let tree = RollupAggregator::new(&schema, &layout).aggregate(&table)?;
    let stats = conformance_stats(&schema, &table)?;
    Ok(ReportBuilder::new(tree, stats))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Ensures report generation is deterministic.
#[test]
fn report_bundle_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
    let first = builder()?.build()?;
    let second = builder()?.build()?;
    if first != second {
        return Err("report bundle is not deterministic".into());
    }
    Ok(())
}

/// Ensures written artifacts verify in place and carry the summary digest.
#[test]
fn report_bundle_verifies() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let output_dir = temp.path().join("report");
    let builder = builder()?;
    let manifest = builder.write_to(&output_dir)?;
    builder.verify_output(&output_dir)?;
    if manifest.summary_digest != builder.tree().digest(DEFAULT_HASH_ALGORITHM)? {
        return Err("manifest digest does not match summary".into());
    }
    if manifest.feature_count != 2 || manifest.test_count != 2 {
        return Err("manifest counts are wrong".into());
    }
    let stats = std::fs::read_to_string(output_dir.join("stats.json"))?;
    if !stats.contains("\"passed\": 1") {
        return Err(format!("unexpected stats.json {stats}").into());
    }
    Ok(())
}
