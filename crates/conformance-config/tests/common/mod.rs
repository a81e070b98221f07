// crates/conformance-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for conformance-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use conformance_config::ConfigError;
use conformance_config::ConformanceConfig;

/// Result type used by config tests.
pub type TestResult = Result<(), String>;

/// Minimal valid configuration with one primary renderer.
pub const MINIMAL_TOML: &str = r#"
[[renderers.columns]]
id = "resvg"
primary = true
"#;

/// Parses a TOML string into a `ConformanceConfig` without validation.
pub fn config_from_toml(toml_str: &str) -> Result<ConformanceConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a minimal config with all defaults applied.
pub fn minimal_config() -> Result<ConformanceConfig, toml::de::Error> {
    config_from_toml(MINIMAL_TOML)
}

/// Assert that a validation result is an error containing a specific substring.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error '{message}' did not contain '{needle}'"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
