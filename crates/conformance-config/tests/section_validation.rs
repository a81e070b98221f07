//! Section validation tests for conformance-config.
// crates/conformance-config/tests/section_validation.rs
// =============================================================================
// Module: Section Validation Tests
// Description: Per-section field validation with named offending fields.
// Purpose: Ensure invalid configuration is rejected with actionable messages.
// =============================================================================

use conformance_config::CategoryConfig;
use conformance_config::RendererColumnConfig;

mod common;

use common::TestResult;
use common::assert_invalid;
use common::minimal_config;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn column(id: &str, primary: bool) -> RendererColumnConfig {
    RendererColumnConfig {
        id: id.to_string(),
        label: None,
        primary,
    }
}

fn category(title: &str, features: &[&str]) -> CategoryConfig {
    CategoryConfig {
        title: title.to_string(),
        link: None,
        features: features.iter().map(|feature| (*feature).to_string()).collect(),
    }
}

// ============================================================================
// SECTION: Corpus
// ============================================================================

/// Verifies the corpus root must be non-empty.
#[test]
fn corpus_root_must_be_non_empty() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    config.corpus.root = "  ".to_string();
    assert_invalid(config.validate(), "corpus.root must be non-empty")
}

/// Verifies the extension must be bare.
#[test]
fn corpus_extension_must_be_bare() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    config.corpus.extension = ".svg".to_string();
    assert_invalid(config.validate(), "corpus.extension")
}

/// Verifies the document size limit bounds.
#[test]
fn corpus_document_limit_is_bounded() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    config.corpus.max_document_bytes = 0;
    assert_invalid(config.validate(), "corpus.max_document_bytes")?;
    config.corpus.max_document_bytes = 64 * 1024 * 1024;
    assert_invalid(config.validate(), "corpus.max_document_bytes")
}

// ============================================================================
// SECTION: Checks
// ============================================================================

/// Verifies the line width must be positive.
#[test]
fn line_width_must_be_positive() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    config.checks.line_width = 0;
    assert_invalid(config.validate(), "checks.line_width")
}

/// Verifies exemption entries must be ids rather than paths.
#[test]
fn exemptions_must_be_ids() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    config.checks.exemptions.element_ids = vec!["structure/svg/e-svg-031.svg".to_string()];
    assert_invalid(config.validate(), "checks.exemptions.element_ids")
}

/// Verifies empty ignored tags are rejected.
#[test]
fn ignored_tags_must_be_non_empty() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    config.checks.ignored_tags = Some(vec!["title".to_string(), String::new()]);
    assert_invalid(config.validate(), "checks.ignored_tags")
}

// ============================================================================
// SECTION: Renderers
// ============================================================================

/// Verifies at least one renderer column is required.
#[test]
fn renderers_require_columns() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    config.renderers.columns.clear();
    assert_invalid(config.validate(), "renderers.columns must not be empty")
}

/// Verifies exactly one primary renderer is required.
#[test]
fn renderers_require_one_primary() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    config.renderers.columns.push(column("chrome", true));
    assert_invalid(config.validate(), "exactly one primary renderer")?;
    config.renderers.columns = vec![column("resvg", false)];
    assert_invalid(config.validate(), "exactly one primary renderer")
}

/// Verifies duplicate renderer ids are rejected.
#[test]
fn renderers_reject_duplicates() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    config.renderers.columns.push(column("resvg", false));
    assert_invalid(config.validate(), "duplicate id resvg")
}

/// Verifies renderer ids cannot shadow the id column.
#[test]
fn renderers_reject_id_column_collision() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    config.renderers.columns.push(column("title", false));
    assert_invalid(config.validate(), "collides with renderers.id_column")
}

/// Verifies unsupported schema versions are rejected.
#[test]
fn renderers_reject_unknown_schema_version() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    config.renderers.schema_version = 2;
    assert_invalid(config.validate(), "renderers.schema_version 2 is not supported")
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Verifies feature keys in the layout must parse.
#[test]
fn report_rejects_invalid_feature_keys() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    config.report.categories = vec![category("Shapes", &["rect"])];
    assert_invalid(config.validate(), "report.categories[0].features contains invalid feature key")
}

/// Verifies a feature may appear only once in the layout.
#[test]
fn report_rejects_repeated_features() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    config.report.categories =
        vec![category("Shapes", &["e-rect"]), category("More shapes", &["e-rect"])];
    assert_invalid(config.validate(), "lists feature e-rect more than once")
}

/// Verifies categories need a title.
#[test]
fn report_rejects_untitled_category() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    config.report.categories = vec![category(" ", &["e-rect"])];
    assert_invalid(config.validate(), "report.categories[0].title")
}

/// Verifies out-of-scope keys outside the layout are left to the checker.
#[test]
fn report_allows_scope_entries_outside_layout() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    config.report.categories = vec![category("Shapes", &["e-rect"])];
    config.report.out_of_scope = vec!["e-font".to_string()];
    config.validate().map_err(|err| err.to_string())?;
    assert_invalid(
        {
            config.report.out_of_scope = vec!["font".to_string()];
            config.validate()
        },
        "report.out_of_scope contains invalid feature key font",
    )
}

// ============================================================================
// SECTION: Logging
// ============================================================================

/// Verifies the logging path must be non-empty when set.
#[test]
fn logging_path_must_be_non_empty() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    config.logging.path = Some(String::new());
    assert_invalid(config.validate(), "logging.path must be non-empty")
}
