// crates/conformance-cli/src/lib.rs
// ============================================================================
// Module: Conformance CLI Library
// Description: Shared helpers for the conformance command-line tool.
// Purpose: Expose the message catalog and run-event sinks to the binary.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The binary keeps command dispatch in `main.rs`; localization and
//! structured run events live here so they can be tested directly.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod events;
pub mod i18n;
