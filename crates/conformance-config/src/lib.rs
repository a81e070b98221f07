// crates/conformance-config/src/lib.rs
// ============================================================================
// Module: Conformance Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for conformance.toml semantics.
// Dependencies: conformance-core, serde, toml
// ============================================================================

//! ## Overview
//! `conformance-config` defines the canonical configuration model for the
//! conformance tooling. It provides strict, fail-closed validation and a
//! deterministic example configuration.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
