// crates/conformance-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Message catalog and translation utilities for the CLI.
// Purpose: Keep every user-facing string in one localized catalog.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! User-facing strings live in per-locale catalogs and are rendered through
//! the [`t!`](crate::t) macro. Structured run events are not localized.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Catalan.
    Ca,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ca => "ca",
        }
    }

    /// Parses a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        match lang {
            "en" => Some(Self::En),
            "ca" => Some(Self::Ca),
            _ => None,
        }
    }
}

/// Ordered list of supported CLI locales.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Ca];

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// Placeholder name without braces.
    pub key: &'static str,
    /// Preformatted value.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// English catalog.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "conformance {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("output.json_failed", "Failed to serialize output: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid."),
    ("corpus.load_failed", "Failed to load corpus: {error}"),
    ("order.load_failed", "Failed to read order list: {error}"),
    ("order.not_configured", "No order list is configured (corpus.order_file)."),
    ("results.load_failed", "Failed to read results: {error}"),
    ("results.not_configured", "No results file is configured (corpus.results_file)."),
    ("results.sync.ok", "Results written to {path} ({count} rows)."),
    ("results.sync.failed", "Failed to resync results: {error}"),
    ("vcs.failed", "Failed to snapshot tracked files: {error}"),
    ("events.open_failed", "Failed to open event log {path}: {error}"),
    ("check.summary", "Checked {cases} documents with {checks} checks ({skipped} skipped)."),
    ("check.pass", "All checks passed."),
    ("check.fail", "{count} violation(s) found:"),
    ("summary.failed", "Failed to build summary: {error}"),
    ("summary.header", "{features} features, {tests} tests"),
    ("summary.category", "{title}"),
    ("summary.feature", "  {feature}: {rollups}"),
    ("summary.rollup", "{renderer} {status} {covered}/{total}"),
    ("report.written", "Report written to {path} ({artifacts} artifacts, summary {digest})."),
    ("report.verified", "Report at {path} matches the current results."),
    ("report.failed", "Report failed: {error}"),
    ("outline.entry", "{id}  {title}"),
    ("outline.warning", "Warning: title '{title}' is used by both {first} and {second}."),
    ("outline.empty", "No test documents found."),
    ("stats.failed", "Failed to compute stats: {error}"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output is machine-translated and may be inaccurate.",
    ),
];

/// Catalan catalog.
const CATALOG_CA: &[(&str, &str)] = &[
    ("main.version", "conformance {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "sortida"),
    ("output.write_failed", "No s'ha pogut escriure a {stream}: {error}"),
    ("output.json_failed", "No s'ha pogut serialitzar la sortida: {error}"),
    ("config.load_failed", "No s'ha pogut carregar la configuració: {error}"),
    ("config.validate.ok", "Configuració vàlida."),
    ("corpus.load_failed", "No s'ha pogut carregar el corpus: {error}"),
    ("order.load_failed", "No s'ha pogut llegir la llista d'ordre: {error}"),
    ("order.not_configured", "No hi ha cap llista d'ordre configurada (corpus.order_file)."),
    ("results.load_failed", "No s'han pogut llegir els resultats: {error}"),
    (
        "results.not_configured",
        "No hi ha cap fitxer de resultats configurat (corpus.results_file).",
    ),
    ("results.sync.ok", "Resultats escrits a {path} ({count} files)."),
    ("results.sync.failed", "No s'han pogut resincronitzar els resultats: {error}"),
    ("vcs.failed", "No s'ha pogut obtenir la llista de fitxers seguits: {error}"),
    ("events.open_failed", "No s'ha pogut obrir el registre d'esdeveniments {path}: {error}"),
    (
        "check.summary",
        "S'han comprovat {cases} documents amb {checks} comprovacions ({skipped} omeses).",
    ),
    ("check.pass", "Totes les comprovacions han passat."),
    ("check.fail", "S'han trobat {count} infraccions:"),
    ("summary.failed", "No s'ha pogut construir el resum: {error}"),
    ("summary.header", "{features} funcionalitats, {tests} proves"),
    ("summary.category", "{title}"),
    ("summary.feature", "  {feature}: {rollups}"),
    ("summary.rollup", "{renderer} {status} {covered}/{total}"),
    ("report.written", "Informe escrit a {path} ({artifacts} artefactes, resum {digest})."),
    ("report.verified", "L'informe a {path} coincideix amb els resultats actuals."),
    ("report.failed", "L'informe ha fallat: {error}"),
    ("outline.entry", "{id}  {title}"),
    ("outline.warning", "Avís: el títol '{title}' l'utilitzen {first} i {second}."),
    ("outline.empty", "No s'han trobat documents de prova."),
    ("stats.failed", "No s'han pogut calcular les estadístiques: {error}"),
    ("i18n.lang.invalid_env", "Valor no vàlid per a {env}: {value}. S'esperava 'en' o 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Nota: la sortida que no és en anglès està traduïda automàticament i pot ser inexacta.",
    ),
];

/// Returns the raw catalog entries for a locale.
pub(crate) const fn catalog_entries_for(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::En => CATALOG_EN,
        Locale::Ca => CATALOG_CA,
    }
}

/// Returns the message catalog for the requested locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_CA_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    let cell = match locale {
        Locale::En => &CATALOG_EN_MAP,
        Locale::Ca => &CATALOG_CA_MAP,
    };
    cell.get_or_init(|| catalog_entries_for(locale).iter().copied().collect())
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let locale = current_locale();
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
