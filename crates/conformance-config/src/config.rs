// crates/conformance-config/src/config.rs
// ============================================================================
// Module: Conformance Configuration
// Description: Configuration loading and validation for conformance tooling.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: conformance-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Unknown keys are rejected and every section validates itself before the
//! configuration is handed out. Relative paths are resolved against the
//! directory holding the configuration file.
//!
//! The configuration converts itself into the core inputs: [`CheckConfig`],
//! [`RendererSchema`], and [`ReportLayout`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use conformance_core::CategoryLayout;
use conformance_core::CheckConfig;
use conformance_core::CheckKind;
use conformance_core::FeatureKey;
use conformance_core::RendererId;
use conformance_core::RendererSchema;
use conformance_core::RendererSpec;
use conformance_core::ReportLayout;
use conformance_core::SCHEMA_VERSION_V1;
use conformance_core::TestId;
use conformance_core::runtime::DEFAULT_IGNORED_TAGS;
use conformance_core::runtime::DEFAULT_LINE_WIDTH;
use conformance_core::runtime::DEFAULT_TITLE_MAX_LENGTH;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "conformance.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "CONFORMANCE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default maximum size of one test document in bytes.
pub(crate) const DEFAULT_MAX_DOCUMENT_BYTES: usize = 256 * 1024;
/// Maximum allowed size of one test document in bytes.
pub(crate) const MAX_DOCUMENT_BYTES: usize = 16 * 1024 * 1024;
/// Maximum allowed line width.
pub(crate) const MAX_LINE_WIDTH: usize = 10_000;
/// Maximum number of renderer columns.
pub(crate) const MAX_RENDERER_COLUMNS: usize = 64;
/// Maximum number of report categories.
pub(crate) const MAX_REPORT_CATEGORIES: usize = 512;
/// Maximum number of entries in one allow-list.
pub(crate) const MAX_EXEMPTIONS: usize = 4096;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Conformance tooling configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConformanceConfig {
    /// Corpus location and loader limits.
    #[serde(default)]
    pub corpus: CorpusConfig,
    /// Consistency check tunables.
    #[serde(default)]
    pub checks: ChecksConfig,
    /// Renderer column schema.
    #[serde(default)]
    pub renderers: RenderersConfig,
    /// Report layout and output.
    #[serde(default)]
    pub report: ReportConfig,
    /// Structured event logging.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Directory relative paths are resolved against (not serialized).
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl ConformanceConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: explicit `path`, then `CONFORMANCE_CONFIG`, then
    /// `conformance.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::from_toml_str(content)?;
        config.base_dir = resolved
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// Relative paths resolve against the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.base_dir = PathBuf::from(".");
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.corpus.validate()?;
        self.checks.validate()?;
        self.renderers.validate()?;
        self.report.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Resolves a configured path against [`Self::base_dir`].
    #[must_use]
    pub fn resolve(&self, value: &str) -> PathBuf {
        let path = Path::new(value.trim());
        if path.is_absolute() { path.to_path_buf() } else { self.base_dir.join(path) }
    }

    /// Returns the absolute or base-relative corpus root.
    #[must_use]
    pub fn corpus_root(&self) -> PathBuf {
        self.resolve(&self.corpus.root)
    }

    /// Returns the order list path, when configured.
    #[must_use]
    pub fn order_file(&self) -> Option<PathBuf> {
        self.corpus.order_file.as_deref().map(|value| self.resolve(value))
    }

    /// Returns the results table path, when configured.
    #[must_use]
    pub fn results_file(&self) -> Option<PathBuf> {
        self.corpus.results_file.as_deref().map(|value| self.resolve(value))
    }

    /// Returns the report output directory.
    #[must_use]
    pub fn report_dir(&self) -> PathBuf {
        self.resolve(&self.report.output_dir)
    }

    /// Builds the check tunables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the checks section is invalid.
    pub fn check_config(&self) -> Result<CheckConfig, ConfigError> {
        self.checks.to_check_config()
    }

    /// Builds the renderer schema.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the renderers section is invalid.
    pub fn renderer_schema(&self) -> Result<RendererSchema, ConfigError> {
        self.renderers.to_schema()
    }

    /// Builds the report layout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the report section is invalid.
    pub fn report_layout(&self) -> Result<ReportLayout, ConfigError> {
        self.report.to_layout()
    }
}

// ============================================================================
// SECTION: Corpus Configuration
// ============================================================================

/// Revision-control integration for the untracked-files check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VcsMode {
    /// Query `git ls-files` once per run.
    #[default]
    Git,
    /// No revision control; the untracked-files check is skipped.
    None,
}

/// Corpus location and loader limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorpusConfig {
    /// Corpus root directory.
    #[serde(default = "default_corpus_root")]
    pub root: String,
    /// Test document file extension (without the dot).
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Declared order list file.
    #[serde(default)]
    pub order_file: Option<String>,
    /// Results table (CSV) file.
    #[serde(default)]
    pub results_file: Option<String>,
    /// Maximum size of one test document in bytes.
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
    /// Revision-control integration.
    #[serde(default)]
    pub vcs: VcsMode,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            root: default_corpus_root(),
            extension: default_extension(),
            order_file: None,
            results_file: None,
            max_document_bytes: default_max_document_bytes(),
            vcs: VcsMode::default(),
        }
    }
}

impl CorpusConfig {
    /// Validates corpus configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("corpus.root", &self.root)?;
        let extension = self.extension.trim();
        if extension.is_empty() || extension.contains(['.', '/', '\\']) {
            return Err(ConfigError::Invalid(
                "corpus.extension must be a bare, non-empty extension".to_string(),
            ));
        }
        if let Some(order_file) = &self.order_file {
            validate_path_string("corpus.order_file", order_file)?;
        }
        if let Some(results_file) = &self.results_file {
            validate_path_string("corpus.results_file", results_file)?;
        }
        if self.max_document_bytes == 0 || self.max_document_bytes > MAX_DOCUMENT_BYTES {
            return Err(ConfigError::Invalid(format!(
                "corpus.max_document_bytes must be between 1 and {MAX_DOCUMENT_BYTES}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Checks Configuration
// ============================================================================

/// Consistency check tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChecksConfig {
    /// Enables the title length check.
    #[serde(default = "default_true")]
    pub title_limit: bool,
    /// Maximum title length in characters.
    #[serde(default = "default_title_max_length")]
    pub title_max_length: usize,
    /// Maximum line width in characters.
    #[serde(default = "default_line_width")]
    pub line_width: usize,
    /// Tags exempt from the element id requirement (defaults to structural tags).
    #[serde(default)]
    pub ignored_tags: Option<Vec<String>>,
    /// Checks that never run.
    #[serde(default)]
    pub disabled: Vec<CheckKind>,
    /// Per-check document allow-lists.
    #[serde(default)]
    pub exemptions: ExemptionsConfig,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            title_limit: true,
            title_max_length: default_title_max_length(),
            line_width: default_line_width(),
            ignored_tags: None,
            disabled: Vec::new(),
            exemptions: ExemptionsConfig::default(),
        }
    }
}

/// Per-check document allow-lists, keyed by test id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExemptionsConfig {
    /// Documents skipped by the element id check.
    #[serde(default)]
    pub element_ids: Vec<String>,
    /// Documents skipped by the line width check.
    #[serde(default)]
    pub line_width: Vec<String>,
    /// Documents skipped by the unused namespace check.
    #[serde(default)]
    pub unused_namespace: Vec<String>,
}

impl ChecksConfig {
    /// Validates check configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.title_max_length == 0 {
            return Err(ConfigError::Invalid(
                "checks.title_max_length must be greater than zero".to_string(),
            ));
        }
        if self.line_width == 0 || self.line_width > MAX_LINE_WIDTH {
            return Err(ConfigError::Invalid(format!(
                "checks.line_width must be between 1 and {MAX_LINE_WIDTH}"
            )));
        }
        if let Some(tags) = &self.ignored_tags
            && tags.iter().any(|tag| tag.trim().is_empty())
        {
            return Err(ConfigError::Invalid(
                "checks.ignored_tags entries must be non-empty".to_string(),
            ));
        }
        validate_exemptions("checks.exemptions.element_ids", &self.exemptions.element_ids)?;
        validate_exemptions("checks.exemptions.line_width", &self.exemptions.line_width)?;
        validate_exemptions(
            "checks.exemptions.unused_namespace",
            &self.exemptions.unused_namespace,
        )?;
        Ok(())
    }

    /// Converts the section into core check tunables.
    fn to_check_config(&self) -> Result<CheckConfig, ConfigError> {
        self.validate()?;
        let ignored_tags = self.ignored_tags.as_ref().map_or_else(
            || DEFAULT_IGNORED_TAGS.iter().map(|tag| (*tag).to_string()).collect(),
            |tags| tags.iter().map(|tag| tag.trim().to_string()).collect(),
        );
        Ok(CheckConfig {
            title_max_length: self.title_limit.then_some(self.title_max_length),
            line_width: self.line_width,
            ignored_tags,
            id_exemptions: to_ids(&self.exemptions.element_ids),
            line_width_exemptions: to_ids(&self.exemptions.line_width),
            namespace_exemptions: to_ids(&self.exemptions.unused_namespace),
            disabled: self.disabled.iter().copied().collect(),
        })
    }
}

// ============================================================================
// SECTION: Renderer Configuration
// ============================================================================

/// Renderer column schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderersConfig {
    /// Outcome code schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Name of the results id column.
    #[serde(default = "default_id_column")]
    pub id_column: String,
    /// Renderer columns in display order.
    #[serde(default)]
    pub columns: Vec<RendererColumnConfig>,
}

impl Default for RenderersConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            id_column: default_id_column(),
            columns: Vec::new(),
        }
    }
}

/// One renderer column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RendererColumnConfig {
    /// Column name in the results table.
    pub id: String,
    /// Display label (defaults to the id).
    #[serde(default)]
    pub label: Option<String>,
    /// Primary renderer flag.
    #[serde(default)]
    pub primary: bool,
}

impl RenderersConfig {
    /// Validates renderer configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.to_schema().map(|_| ())
    }

    /// Converts the section into a validated renderer schema.
    fn to_schema(&self) -> Result<RendererSchema, ConfigError> {
        if self.schema_version != SCHEMA_VERSION_V1 {
            return Err(ConfigError::Invalid(format!(
                "renderers.schema_version {} is not supported",
                self.schema_version
            )));
        }
        let id_column = self.id_column.trim();
        if id_column.is_empty() {
            return Err(ConfigError::Invalid("renderers.id_column must be non-empty".to_string()));
        }
        if self.columns.is_empty() {
            return Err(ConfigError::Invalid("renderers.columns must not be empty".to_string()));
        }
        if self.columns.len() > MAX_RENDERER_COLUMNS {
            return Err(ConfigError::Invalid(format!(
                "renderers.columns exceeds {MAX_RENDERER_COLUMNS} entries"
            )));
        }
        let mut seen = BTreeSet::new();
        for column in &self.columns {
            let id = column.id.trim();
            if id.is_empty() {
                return Err(ConfigError::Invalid(
                    "renderers.columns id must be non-empty".to_string(),
                ));
            }
            if id == id_column {
                return Err(ConfigError::Invalid(format!(
                    "renderers.columns id {id} collides with renderers.id_column"
                )));
            }
            if !seen.insert(id) {
                return Err(ConfigError::Invalid(format!(
                    "renderers.columns contains duplicate id {id}"
                )));
            }
        }
        let primaries = self.columns.iter().filter(|column| column.primary).count();
        if primaries != 1 {
            return Err(ConfigError::Invalid(
                "renderers.columns must declare exactly one primary renderer".to_string(),
            ));
        }
        let renderers = self
            .columns
            .iter()
            .map(|column| {
                let id = column.id.trim();
                RendererSpec {
                    id: RendererId::new(id),
                    label: column.label.clone().unwrap_or_else(|| id.to_string()),
                    primary: column.primary,
                }
            })
            .collect();
        RendererSchema::new(self.schema_version, id_column, renderers)
            .map_err(|err| ConfigError::Invalid(format!("renderers: {err}")))
    }
}

// ============================================================================
// SECTION: Report Configuration
// ============================================================================

/// Report layout and output location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Output directory for report artifacts.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Feature keys excluded from scoring.
    #[serde(default)]
    pub out_of_scope: Vec<String>,
    /// Categories in display order.
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            out_of_scope: Vec::new(),
            categories: Vec::new(),
        }
    }
}

/// One report category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryConfig {
    /// Section heading.
    pub title: String,
    /// Optional external chapter link.
    #[serde(default)]
    pub link: Option<String>,
    /// Feature keys in display order.
    #[serde(default)]
    pub features: Vec<String>,
}

impl ReportConfig {
    /// Validates report configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("report.output_dir", &self.output_dir)?;
        self.to_layout().map(|_| ())
    }

    /// Converts the section into a report layout.
    fn to_layout(&self) -> Result<ReportLayout, ConfigError> {
        if self.categories.len() > MAX_REPORT_CATEGORIES {
            return Err(ConfigError::Invalid(format!(
                "report.categories exceeds {MAX_REPORT_CATEGORIES} entries"
            )));
        }
        let mut seen = BTreeSet::new();
        let mut categories = Vec::with_capacity(self.categories.len());
        for (position, category) in self.categories.iter().enumerate() {
            let title = category.title.trim();
            if title.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "report.categories[{position}].title must be non-empty"
                )));
            }
            let mut features = Vec::with_capacity(category.features.len());
            for raw in &category.features {
                let key = parse_feature_key(&format!("report.categories[{position}].features"), raw)?;
                if !seen.insert(key.clone()) {
                    return Err(ConfigError::Invalid(format!(
                        "report layout lists feature {key} more than once"
                    )));
                }
                features.push(key);
            }
            categories.push(CategoryLayout {
                title: title.to_string(),
                link: category.link.clone(),
                features,
            });
        }
        let out_of_scope = self
            .out_of_scope
            .iter()
            .map(|raw| parse_feature_key("report.out_of_scope", raw))
            .collect::<Result<BTreeSet<FeatureKey>, ConfigError>>()?;
        Ok(ReportLayout {
            categories,
            out_of_scope,
        })
    }
}

// ============================================================================
// SECTION: Logging Configuration
// ============================================================================

/// Structured event logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable structured JSON-line events.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Optional event log path (JSON lines); stderr when unset.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

impl LoggingConfig {
    /// Validates logging configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("logging.path", path)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    let path = Path::new(trimmed);
    for component in path.components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates an allow-list of test ids.
fn validate_exemptions(field: &str, entries: &[String]) -> Result<(), ConfigError> {
    if entries.len() > MAX_EXEMPTIONS {
        return Err(ConfigError::Invalid(format!("{field} exceeds {MAX_EXEMPTIONS} entries")));
    }
    for entry in entries {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Invalid(format!("{field} entries must be non-empty")));
        }
        if trimmed.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "{field} entries must be test ids, not paths: {trimmed}"
            )));
        }
    }
    Ok(())
}

/// Converts an allow-list into test ids.
fn to_ids(entries: &[String]) -> BTreeSet<TestId> {
    entries.iter().map(|entry| TestId::new(entry.trim())).collect()
}

/// Parses a feature key, naming the field on failure.
fn parse_feature_key(field: &str, raw: &str) -> Result<FeatureKey, ConfigError> {
    raw.trim()
        .parse::<FeatureKey>()
        .map_err(|_| ConfigError::Invalid(format!("{field} contains invalid feature key {raw}")))
}

/// Default corpus root directory.
fn default_corpus_root() -> String {
    "tests".to_string()
}

/// Default test document extension.
fn default_extension() -> String {
    "svg".to_string()
}

/// Default per-document size limit.
const fn default_max_document_bytes() -> usize {
    DEFAULT_MAX_DOCUMENT_BYTES
}

/// Default title length limit.
const fn default_title_max_length() -> usize {
    DEFAULT_TITLE_MAX_LENGTH
}

/// Default line width limit.
const fn default_line_width() -> usize {
    DEFAULT_LINE_WIDTH
}

/// Default schema version.
const fn default_schema_version() -> u32 {
    SCHEMA_VERSION_V1
}

/// Default results id column.
fn default_id_column() -> String {
    "title".to_string()
}

/// Default report output directory.
fn default_output_dir() -> String {
    "report".to_string()
}

/// Default for opt-out booleans.
const fn default_true() -> bool {
    true
}
