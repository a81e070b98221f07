// crates/conformance-core/src/core/outcome.rs
// ============================================================================
// Module: Outcome Table
// Description: Per-test, per-renderer outcome codes and the renderer schema.
// Purpose: Make the column-to-renderer mapping explicit and validated.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! An [`OutcomeTable`] is the parsed results table: one row per test, one
//! column per renderer, in the order the table itself declares. A
//! [`RendererSchema`] is the versioned, agreed renderer list. Consumers never
//! index table columns positionally; they resolve a [`ColumnMap`] by renderer
//! id through [`RendererSchema::project`], which fails when the schema and the
//! table disagree.
//!
//! Stored codes form the closed [`OutcomeCode`] set. Partial and out-of-scope
//! are rollup statuses and are never stored.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::corpus::OrderList;
use crate::core::identifiers::RendererId;
use crate::core::identifiers::TestId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Renderer schema version with codes `0=Unknown 1=Passed 2=Failed 3=Crashed`.
pub const SCHEMA_VERSION_V1: u32 = 1;

/// Schema versions this build can decode.
pub const SUPPORTED_SCHEMA_VERSIONS: &[u32] = &[SCHEMA_VERSION_V1];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when building or reading outcome tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutcomeError {
    /// Schema version is not supported.
    #[error("unsupported renderer schema version {0}")]
    UnsupportedVersion(u32),
    /// Schema declares no renderers.
    #[error("renderer schema declares no renderers")]
    EmptySchema,
    /// Schema declares a renderer twice.
    #[error("renderer schema declares {0} more than once")]
    DuplicateRenderer(RendererId),
    /// Schema declares zero or several primary renderers.
    #[error("renderer schema must declare exactly one primary renderer, found {0}")]
    PrimaryCount(usize),
    /// Results header does not start with the id column.
    #[error("results header must start with column {expected}, found {found}")]
    MissingIdColumn {
        /// Expected id column name.
        expected: String,
        /// Column actually found.
        found: String,
    },
    /// Results header repeats a column.
    #[error("results header repeats column {0}")]
    DuplicateColumn(String),
    /// Row width differs from the header width.
    #[error("results row {row} has {found} columns, expected {expected}")]
    ColumnCount {
        /// 1-based file line, counting the header as line 1.
        row: usize,
        /// Header width.
        expected: usize,
        /// Row width.
        found: usize,
    },
    /// Cell holds a value outside the closed outcome enumeration.
    #[error("results row {row} column {column}: invalid outcome code {value:?}")]
    InvalidCode {
        /// 1-based file line, counting the header as line 1.
        row: usize,
        /// Column name.
        column: String,
        /// Offending cell text.
        value: String,
    },
    /// Results table lists the same test twice.
    #[error("results table lists {0} more than once")]
    DuplicateRecord(TestId),
    /// Results row has an empty test id.
    #[error("results row {0} has an empty test id")]
    EmptyTestId(usize),
    /// Schema renderer has no column in the table.
    #[error("renderer {0} has no column in the results table")]
    MissingRenderer(RendererId),
}

// ============================================================================
// SECTION: Outcome Codes
// ============================================================================

/// Stored outcome of one test against one renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeCode {
    /// Not yet evaluated.
    Unknown,
    /// Renders correctly.
    Passed,
    /// Renders incorrectly.
    Failed,
    /// Renderer crashed on the test.
    Crashed,
}

impl OutcomeCode {
    /// Returns the numeric code used in schema version 1.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Passed => 1,
            Self::Failed => 2,
            Self::Crashed => 3,
        }
    }

    /// Resolves a schema version 1 numeric code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            1 => Some(Self::Passed),
            2 => Some(Self::Failed),
            3 => Some(Self::Crashed),
            _ => None,
        }
    }

    /// Returns true when the outcome counts as covered in a rollup.
    ///
    /// `Unknown` counts as covered: it is not a confirmed failure.
    #[must_use]
    pub const fn is_covered(self) -> bool {
        matches!(self, Self::Passed | Self::Unknown)
    }

    /// Returns the stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Crashed => "crashed",
        }
    }
}

// ============================================================================
// SECTION: Renderer Schema
// ============================================================================

/// One renderer column declared by the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererSpec {
    /// Column name in the results table.
    pub id: RendererId,
    /// Display label.
    pub label: String,
    /// Primary renderer (the one whose empty groups are flagged as failed).
    pub primary: bool,
}

/// Versioned, agreed renderer list for a results table.
///
/// # Invariants
/// - `version` is in [`SUPPORTED_SCHEMA_VERSIONS`].
/// - `renderers` is non-empty, ids are unique, exactly one is primary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererSchema {
    /// Schema version governing code decoding.
    version: u32,
    /// Name of the test id column.
    id_column: String,
    /// Renderers in display order.
    renderers: Vec<RendererSpec>,
}

impl RendererSchema {
    /// Creates and validates a schema.
    ///
    /// # Errors
    ///
    /// Returns [`OutcomeError`] when the schema breaks an invariant.
    pub fn new(
        version: u32,
        id_column: impl Into<String>,
        renderers: Vec<RendererSpec>,
    ) -> Result<Self, OutcomeError> {
        if !SUPPORTED_SCHEMA_VERSIONS.contains(&version) {
            return Err(OutcomeError::UnsupportedVersion(version));
        }
        if renderers.is_empty() {
            return Err(OutcomeError::EmptySchema);
        }
        let mut seen = BTreeSet::new();
        for renderer in &renderers {
            if !seen.insert(&renderer.id) {
                return Err(OutcomeError::DuplicateRenderer(renderer.id.clone()));
            }
        }
        let primaries = renderers.iter().filter(|renderer| renderer.primary).count();
        if primaries != 1 {
            return Err(OutcomeError::PrimaryCount(primaries));
        }
        Ok(Self {
            version,
            id_column: id_column.into(),
            renderers,
        })
    }

    /// Returns the schema version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the id column name.
    #[must_use]
    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    /// Returns renderers in display order.
    #[must_use]
    pub fn renderers(&self) -> &[RendererSpec] {
        &self.renderers
    }

    /// Returns the display position of the primary renderer.
    #[must_use]
    pub fn primary_index(&self) -> usize {
        self.renderers.iter().position(|renderer| renderer.primary).unwrap_or_default()
    }

    /// Returns the header row for a results table in schema order.
    #[must_use]
    pub fn header(&self) -> Vec<String> {
        let mut header = Vec::with_capacity(self.renderers.len() + 1);
        header.push(self.id_column.clone());
        header.extend(self.renderers.iter().map(|renderer| renderer.id.to_string()));
        header
    }

    /// Decodes one stored cell under this schema's version.
    #[must_use]
    pub fn decode(&self, raw: &str) -> Option<OutcomeCode> {
        match self.version {
            SCHEMA_VERSION_V1 => raw.trim().parse::<u8>().ok().and_then(OutcomeCode::from_code),
            _ => None,
        }
    }

    /// Encodes an outcome under this schema's version.
    #[must_use]
    pub fn encode(&self, code: OutcomeCode) -> String {
        code.code().to_string()
    }

    /// Resolves each schema renderer to its column in `table`.
    ///
    /// # Errors
    ///
    /// Returns [`OutcomeError::MissingRenderer`] for the first schema
    /// renderer the table lacks.
    pub fn project(&self, table: &OutcomeTable) -> Result<ColumnMap, OutcomeError> {
        let mut columns = Vec::with_capacity(self.renderers.len());
        for renderer in &self.renderers {
            let column = table
                .column_of(&renderer.id)
                .ok_or_else(|| OutcomeError::MissingRenderer(renderer.id.clone()))?;
            columns.push(column);
        }
        Ok(ColumnMap {
            columns,
        })
    }
}

/// Table column index for each schema renderer, in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    /// Column indices, one per schema renderer.
    columns: Vec<usize>,
}

impl ColumnMap {
    /// Returns a record's outcomes in schema order.
    #[must_use]
    pub fn outcomes(&self, record: &OutcomeRecord) -> Vec<OutcomeCode> {
        self.columns
            .iter()
            .map(|column| record.outcomes.get(*column).copied().unwrap_or(OutcomeCode::Unknown))
            .collect()
    }
}

// ============================================================================
// SECTION: Outcome Table
// ============================================================================

/// Outcomes of one test, in table column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    /// Test identifier.
    pub test_id: TestId,
    /// One outcome per table column.
    pub outcomes: Vec<OutcomeCode>,
}

/// Parsed results table.
///
/// # Invariants
/// - Every record has exactly one outcome per renderer column.
/// - Test ids and renderer columns are unique.
/// - `index` maps each record's test id to its position in `records`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OutcomeTableData")]
pub struct OutcomeTable {
    /// Renderer columns in table order.
    renderers: Vec<RendererId>,
    /// Records in table order.
    records: Vec<OutcomeRecord>,
    /// Record position by test id.
    #[serde(skip)]
    index: BTreeMap<TestId, usize>,
}

/// Serialized form of an [`OutcomeTable`], revalidated on decode.
#[derive(Deserialize)]
struct OutcomeTableData {
    /// Renderer columns in table order.
    renderers: Vec<RendererId>,
    /// Records in table order.
    records: Vec<OutcomeRecord>,
}

impl TryFrom<OutcomeTableData> for OutcomeTable {
    type Error = OutcomeError;

    fn try_from(data: OutcomeTableData) -> Result<Self, Self::Error> {
        let mut table = Self::new(data.renderers)?;
        for record in data.records {
            table.push(record)?;
        }
        Ok(table)
    }
}

impl OutcomeTable {
    /// Creates an empty table with the given renderer columns.
    ///
    /// # Errors
    ///
    /// Returns [`OutcomeError::DuplicateColumn`] when a column repeats.
    pub fn new(renderers: Vec<RendererId>) -> Result<Self, OutcomeError> {
        let mut seen = BTreeSet::new();
        for renderer in &renderers {
            if !seen.insert(renderer) {
                return Err(OutcomeError::DuplicateColumn(renderer.to_string()));
            }
        }
        Ok(Self {
            renderers,
            records: Vec::new(),
            index: BTreeMap::new(),
        })
    }

    /// Parses a header and text rows under `schema`.
    ///
    /// Rows are numbered consecutively from 2 (the header is row 1). Cells
    /// are decoded with the schema version; values outside the closed
    /// enumeration are a hard error naming row, column, and value.
    ///
    /// # Errors
    ///
    /// Returns [`OutcomeError`] on header, width, code, or duplicate-id
    /// problems.
    pub fn parse_rows<I>(
        schema: &RendererSchema,
        header: &[String],
        rows: I,
    ) -> Result<Self, OutcomeError>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let numbered = rows.into_iter().enumerate().map(|(offset, row)| (offset + 2, row));
        Self::parse_numbered_rows(schema, header, numbered)
    }

    /// Parses rows that carry their own source line numbers.
    ///
    /// Readers that skip blank lines pass the physical line of each row so
    /// errors point at the right place in the file.
    ///
    /// # Errors
    ///
    /// Returns [`OutcomeError`] on header, width, code, or duplicate-id
    /// problems.
    pub fn parse_numbered_rows<I>(
        schema: &RendererSchema,
        header: &[String],
        rows: I,
    ) -> Result<Self, OutcomeError>
    where
        I: IntoIterator<Item = (usize, Vec<String>)>,
    {
        let first = header.first().map(|cell| cell.trim()).unwrap_or_default();
        if first != schema.id_column() {
            return Err(OutcomeError::MissingIdColumn {
                expected: schema.id_column().to_string(),
                found: first.to_string(),
            });
        }
        let columns: Vec<RendererId> =
            header.iter().skip(1).map(|cell| RendererId::new(cell.trim())).collect();
        let mut table = Self::new(columns)?;
        for (row_number, row) in rows {
            if row.len() != header.len() {
                return Err(OutcomeError::ColumnCount {
                    row: row_number,
                    expected: header.len(),
                    found: row.len(),
                });
            }
            let test_id = row.first().map(|cell| cell.trim()).unwrap_or_default();
            if test_id.is_empty() {
                return Err(OutcomeError::EmptyTestId(row_number));
            }
            let mut outcomes = Vec::with_capacity(table.renderers.len());
            for (renderer, cell) in table.renderers.iter().zip(row.iter().skip(1)) {
                let code = schema.decode(cell).ok_or_else(|| OutcomeError::InvalidCode {
                    row: row_number,
                    column: renderer.to_string(),
                    value: cell.clone(),
                })?;
                outcomes.push(code);
            }
            table.push(OutcomeRecord {
                test_id: TestId::new(test_id),
                outcomes,
            })?;
        }
        Ok(table)
    }

    /// Appends a record.
    ///
    /// # Errors
    ///
    /// Returns [`OutcomeError`] when the record width is wrong or the test id
    /// is already present.
    pub fn push(&mut self, record: OutcomeRecord) -> Result<(), OutcomeError> {
        if record.outcomes.len() != self.renderers.len() {
            return Err(OutcomeError::ColumnCount {
                row: self.records.len() + 2,
                expected: self.renderers.len() + 1,
                found: record.outcomes.len() + 1,
            });
        }
        if self.index.contains_key(&record.test_id) {
            return Err(OutcomeError::DuplicateRecord(record.test_id));
        }
        self.index.insert(record.test_id.clone(), self.records.len());
        self.records.push(record);
        Ok(())
    }

    /// Returns renderer columns in table order.
    #[must_use]
    pub fn renderers(&self) -> &[RendererId] {
        &self.renderers
    }

    /// Returns records in table order.
    #[must_use]
    pub fn records(&self) -> &[OutcomeRecord] {
        &self.records
    }

    /// Returns the number of records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when the table has no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record by test id.
    #[must_use]
    pub fn get(&self, id: &TestId) -> Option<&OutcomeRecord> {
        self.index.get(id).and_then(|position| self.records.get(*position))
    }

    /// Returns the set of test ids with a record.
    #[must_use]
    pub fn ids(&self) -> BTreeSet<&TestId> {
        self.index.keys().collect()
    }

    /// Returns the column index of a renderer.
    #[must_use]
    pub fn column_of(&self, renderer: &RendererId) -> Option<usize> {
        self.renderers.iter().position(|column| column == renderer)
    }

    /// Rebuilds the table in declared order with columns in schema order.
    ///
    /// Existing rows are kept, ids new to the order list get an all-unknown
    /// row, and ids no longer listed are dropped. Repeated order entries
    /// produce one row.
    ///
    /// # Errors
    ///
    /// Returns [`OutcomeError::MissingRenderer`] when a schema renderer has
    /// no column in this table.
    pub fn resync(&self, schema: &RendererSchema, order: &OrderList) -> Result<Self, OutcomeError> {
        let columns = schema.project(self)?;
        let renderers: Vec<RendererId> =
            schema.renderers().iter().map(|renderer| renderer.id.clone()).collect();
        let width = renderers.len();
        let mut table = Self::new(renderers)?;
        for id in order.entries() {
            if table.index.contains_key(id) {
                continue;
            }
            let outcomes = self
                .get(id)
                .map_or_else(|| vec![OutcomeCode::Unknown; width], |record| columns.outcomes(record));
            table.push(OutcomeRecord {
                test_id: id.clone(),
                outcomes,
            })?;
        }
        Ok(table)
    }

    /// Renders the table as text rows in column order, header first.
    #[must_use]
    pub fn to_rows(&self, schema: &RendererSchema) -> Vec<Vec<String>> {
        let mut rows = Vec::with_capacity(self.records.len() + 1);
        let mut header = Vec::with_capacity(self.renderers.len() + 1);
        header.push(schema.id_column().to_string());
        header.extend(self.renderers.iter().map(ToString::to_string));
        rows.push(header);
        for record in &self.records {
            let mut row = Vec::with_capacity(record.outcomes.len() + 1);
            row.push(record.test_id.to_string());
            row.extend(record.outcomes.iter().map(|code| schema.encode(*code)));
            rows.push(row);
        }
        rows
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
