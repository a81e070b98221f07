// crates/conformance-corpus/src/order.rs
// ============================================================================
// Module: Order List File
// Description: Reads the canonical test order list.
// Purpose: Load the plain-text order list into the core model.
// Dependencies: conformance-core
// ============================================================================

//! ## Overview
//! The order list is one test id per line. Blank lines and `#` comments are
//! skipped on read. Data files are capped at [`MAX_DATA_FILE_BYTES`].

use std::fs;
use std::path::Path;

use conformance_core::OrderList;

use crate::error::CorpusError;

/// Maximum size of an order list or results file.
pub const MAX_DATA_FILE_BYTES: usize = 16 * 1024 * 1024;

/// Reads an order list file.
///
/// # Errors
///
/// Returns [`CorpusError`] when the file cannot be read, is too large, or is
/// not UTF-8.
pub fn read_order_list(path: &Path) -> Result<OrderList, CorpusError> {
    let text = read_data_file(path)?;
    Ok(OrderList::parse(&text))
}

/// Reads a bounded UTF-8 data file.
pub(crate) fn read_data_file(path: &Path) -> Result<String, CorpusError> {
    let bytes = fs::read(path).map_err(|err| CorpusError::Io(format!("{}: {err}", path.display())))?;
    if bytes.len() > MAX_DATA_FILE_BYTES {
        return Err(CorpusError::TooLarge {
            path: path.display().to_string(),
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            max: MAX_DATA_FILE_BYTES,
        });
    }
    String::from_utf8(bytes).map_err(|_| CorpusError::NotUtf8(path.display().to_string()))
}
