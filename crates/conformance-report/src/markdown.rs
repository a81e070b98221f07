// crates/conformance-report/src/markdown.rs
// ============================================================================
// Module: Markdown Renderer
// Description: Renders a summary tree as Markdown tables.
// Purpose: Produce the human-readable conformance page.
// Dependencies: conformance-core
// ============================================================================

//! ## Overview
//! One section per category, each holding a single table: a bold row per
//! feature with its rollups, followed by one row per test. Rollup cells show
//! the covered count and percentage; out-of-scope features show no counts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write;

use conformance_core::CategorySummary;
use conformance_core::FeatureSummary;
use conformance_core::RendererRollup;
use conformance_core::RollupStatus;
use conformance_core::SummaryTree;

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders `tree` as a Markdown document.
#[must_use]
pub fn render_markdown(tree: &SummaryTree) -> String {
    let mut out = String::from("# Conformance Summary\n\n");
    let renderers: Vec<String> = tree
        .renderers
        .iter()
        .map(|renderer| {
            if renderer.primary {
                format!("{} (primary)", renderer.label)
            } else {
                renderer.label.clone()
            }
        })
        .collect();
    let _ = writeln!(out, "Renderers: {}\n", renderers.join(", "));
    let _ = writeln!(
        out,
        "{} features, {} tests, schema version {}.",
        tree.feature_count(),
        tree.test_count(),
        tree.schema_version
    );
    for category in &tree.categories {
        out.push('\n');
        render_category(&mut out, tree, category);
    }
    out
}

/// Appends one category section.
fn render_category(out: &mut String, tree: &SummaryTree, category: &CategorySummary) {
    let _ = writeln!(out, "## {}\n", escape(&category.title));
    if let Some(link) = &category.link {
        let _ = writeln!(out, "Reference: <{link}>\n");
    }
    out.push_str("| Test |");
    for renderer in &tree.renderers {
        let _ = write!(out, " {} |", escape(&renderer.label));
    }
    out.push_str("\n|---|");
    for _ in &tree.renderers {
        out.push_str("---|");
    }
    out.push('\n');
    for feature in &category.features {
        render_feature(out, feature);
    }
}

/// Appends the rollup row and test rows of one feature.
fn render_feature(out: &mut String, feature: &FeatureSummary) {
    let _ = write!(out, "| **{}** |", feature.feature_key);
    for rollup in &feature.rollups {
        let _ = write!(out, " {} |", rollup_cell(rollup));
    }
    out.push('\n');
    for test in &feature.tests {
        let title = test.title.as_deref().map(escape).unwrap_or_default();
        if title.is_empty() {
            let _ = write!(out, "| {} |", test.id);
        } else {
            let _ = write!(out, "| {} {} |", test.id, title);
        }
        for code in &test.outcomes {
            let _ = write!(out, " {} |", code.as_str());
        }
        out.push('\n');
    }
}

/// Formats a rollup as status plus covered share.
fn rollup_cell(rollup: &RendererRollup) -> String {
    match rollup.status {
        RollupStatus::OutOfScope => "out of scope".to_string(),
        status if rollup.total == 0 => status.as_str().to_string(),
        status => format!(
            "{} {}/{} ({}%)",
            status.as_str(),
            rollup.covered,
            rollup.total,
            rounded_percent(rollup.covered, rollup.total)
        ),
    }
}

/// Whole percentage of `part` in `whole`, rounding halves to even.
fn rounded_percent(part: usize, whole: usize) -> usize {
    let scaled = part.saturating_mul(100);
    let quotient = scaled / whole;
    let remainder = scaled % whole;
    let twice = remainder.saturating_mul(2);
    if twice > whole || (twice == whole && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}

/// Escapes characters that break table cells.
fn escape(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

// ============================================================================
// SECTION: Tests
// ============================================================================
