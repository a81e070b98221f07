// crates/conformance-corpus/src/results.rs
// ============================================================================
// Module: Results Table File
// Description: CSV reader and writer for the outcome table.
// Purpose: Decode results by header lookup and write them in schema order.
// Dependencies: csv, conformance-core
// ============================================================================

//! ## Overview
//! The first CSV record is the header. Columns are resolved by name against
//! the renderer schema, so the physical column order in the file carries no
//! meaning. Writing always emits the schema's id column followed by the
//! renderer columns in schema order. Errors name the physical file line of
//! the offending row, so blank lines in the file do not shift the count.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use conformance_core::OutcomeTable;
use conformance_core::RendererSchema;
use csv::ReaderBuilder;
use csv::StringRecord;
use csv::WriterBuilder;

use crate::error::CorpusError;
use crate::order::read_data_file;

// ============================================================================
// SECTION: Reading
// ============================================================================

/// Reads a results file under `schema`.
///
/// # Errors
///
/// Returns [`CorpusError`] when the file cannot be read or parsed, or when
/// any row holds a malformed outcome code.
pub fn read_results(path: &Path, schema: &RendererSchema) -> Result<OutcomeTable, CorpusError> {
    let text = read_data_file(path)?;
    parse_results(&text, schema)
}

/// Parses results CSV text under `schema`.
///
/// # Errors
///
/// Returns [`CorpusError::Csv`] for CSV syntax errors or a missing header,
/// and [`CorpusError::Outcome`] for header, width, code, or duplicate-id
/// problems.
pub fn parse_results(text: &str, schema: &RendererSchema) -> Result<OutcomeTable, CorpusError> {
    let mut reader =
        ReaderBuilder::new().has_headers(false).flexible(true).from_reader(text.as_bytes());
    let mut records = reader.records();
    let header = match records.next() {
        Some(record) => to_cells(&record.map_err(|err| CorpusError::Csv(err.to_string()))?),
        None => return Err(CorpusError::Csv("results file has no header".to_string())),
    };
    let rows = records
        .map(|record| record.map(|record| (line_of(&record), to_cells(&record))))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| CorpusError::Csv(err.to_string()))?;
    Ok(OutcomeTable::parse_numbered_rows(schema, &header, rows)?)
}

/// Trims every cell of a record.
fn to_cells(record: &StringRecord) -> Vec<String> {
    record.iter().map(|cell| cell.trim().to_string()).collect()
}

/// Returns the 1-based file line a record starts on.
fn line_of(record: &StringRecord) -> usize {
    record
        .position()
        .and_then(|position| usize::try_from(position.line()).ok())
        .unwrap_or_default()
}

// ============================================================================
// SECTION: Writing
// ============================================================================

/// Renders `table` as CSV bytes in schema column order.
///
/// # Errors
///
/// Returns [`CorpusError::Csv`] when serialization fails.
pub fn render_results(schema: &RendererSchema, table: &OutcomeTable) -> Result<Vec<u8>, CorpusError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    for row in table.to_rows(schema) {
        writer.write_record(&row).map_err(|err| CorpusError::Csv(err.to_string()))?;
    }
    writer.into_inner().map_err(|err| CorpusError::Csv(err.to_string()))
}

/// Writes `table` to `path` as CSV.
///
/// # Errors
///
/// Returns [`CorpusError`] when rendering or writing fails.
pub fn write_results(
    path: &Path,
    schema: &RendererSchema,
    table: &OutcomeTable,
) -> Result<(), CorpusError> {
    let bytes = render_results(schema, table)?;
    fs::write(path, bytes).map_err(|err| CorpusError::Io(format!("{}: {err}", path.display())))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
