// crates/conformance-core/src/runtime/stats.rs
// ============================================================================
// Module: Conformance Stats
// Description: Per-renderer pass counts over the whole outcome table.
// Purpose: Feed chart data to external chart tooling.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Stats count `Passed` outcomes per renderer across every row of the
//! outcome table, independent of the report layout. Renderers are emitted in
//! schema order and looked up by id.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::RendererId;
use crate::core::outcome::OutcomeCode;
use crate::core::outcome::OutcomeError;
use crate::core::outcome::OutcomeTable;
use crate::core::outcome::RendererSchema;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Pass count for one renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererStats {
    /// Renderer id.
    pub renderer: RendererId,
    /// Display label.
    pub label: String,
    /// Rows with a `Passed` outcome.
    pub passed: usize,
}

/// Chart data for the whole table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConformanceStats {
    /// Rows in the table.
    pub total: usize,
    /// Per-renderer counts in schema order.
    pub renderers: Vec<RendererStats>,
}

// ============================================================================
// SECTION: Computation
// ============================================================================

/// Counts `Passed` outcomes per schema renderer.
///
/// # Errors
///
/// Returns [`OutcomeError::MissingRenderer`] when a schema renderer has no
/// column in `table`.
pub fn conformance_stats(
    schema: &RendererSchema,
    table: &OutcomeTable,
) -> Result<ConformanceStats, OutcomeError> {
    let columns = schema.project(table)?;
    let mut passed = vec![0_usize; schema.renderers().len()];
    for record in table.records() {
        for (slot, code) in passed.iter_mut().zip(columns.outcomes(record)) {
            if code == OutcomeCode::Passed {
                *slot += 1;
            }
        }
    }
    Ok(ConformanceStats {
        total: table.len(),
        renderers: schema
            .renderers()
            .iter()
            .zip(passed)
            .map(|(renderer, passed)| RendererStats {
                renderer: renderer.id.clone(),
                label: renderer.label.clone(),
                passed,
            })
            .collect(),
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
