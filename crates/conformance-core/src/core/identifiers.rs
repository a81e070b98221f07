// crates/conformance-core/src/core/identifiers.rs
// ============================================================================
// Module: Conformance Identifiers
// Description: Test, feature, and renderer identifiers for the corpus.
// Purpose: Provide typed keys with a single documented parsing rule.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Test identifiers are document file names. Every file name follows one
//! rule, `<kind>-<feature>-<index>.<ext>`, from which the feature key and the
//! numeric index are derived. Directory placement never contributes to the
//! key. The rule is pinned by unit tests in `identifiers/tests.rs`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when a corpus identifier does not follow the naming rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Test identifier does not follow `<kind>-<feature>-<index>.<ext>`.
    #[error("invalid test id {id}: {reason}")]
    InvalidTestId {
        /// Offending identifier.
        id: String,
        /// Which part of the rule was violated.
        reason: &'static str,
    },
    /// Feature key does not follow `<kind>-<feature>`.
    #[error("invalid feature key {value}: {reason}")]
    InvalidFeatureKey {
        /// Offending key.
        value: String,
        /// Which part of the rule was violated.
        reason: &'static str,
    },
    /// Document path has no file name component.
    #[error("document path has no file name: {0}")]
    MissingFileName(String),
}

// ============================================================================
// SECTION: Test Identifier
// ============================================================================

/// Stable, file-name-derived test identifier (for example `e-rect-001.svg`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestId(String);

impl TestId {
    /// Creates a new test identifier without validating it.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derives the identifier from a `/`-separated document path.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingFileName`] when the path ends in `/` or is empty.
    pub fn from_path(path: &str) -> Result<Self, ModelError> {
        let name = path.rsplit('/').next().unwrap_or_default();
        if name.is_empty() {
            return Err(ModelError::MissingFileName(path.to_string()));
        }
        Ok(Self::new(name))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the identifier into its feature key and numeric index.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidTestId`] when the identifier does not
    /// follow `<kind>-<feature>-<index>.<ext>`.
    pub fn parse(&self) -> Result<TestName, ModelError> {
        let invalid = |reason| ModelError::InvalidTestId {
            id: self.0.clone(),
            reason,
        };
        let (stem, extension) =
            self.0.rsplit_once('.').ok_or_else(|| invalid("missing file extension"))?;
        if extension.is_empty() {
            return Err(invalid("missing file extension"));
        }
        let (kind_raw, rest) = stem.split_once('-').ok_or_else(|| invalid("missing kind prefix"))?;
        let kind = FeatureKind::from_prefix(kind_raw).ok_or_else(|| invalid("unknown kind prefix"))?;
        let (feature, index_raw) =
            rest.rsplit_once('-').ok_or_else(|| invalid("missing numeric index"))?;
        if feature.is_empty() {
            return Err(invalid("empty feature name"));
        }
        if index_raw.is_empty() || !index_raw.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(invalid("index must be all digits"));
        }
        let index = index_raw.parse::<u32>().map_err(|_| invalid("index out of range"))?;
        Ok(TestName {
            feature_key: FeatureKey {
                kind,
                name: feature.to_string(),
            },
            index,
        })
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for TestId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TestId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Parsed components of a test identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestName {
    /// Feature group the test belongs to.
    pub feature_key: FeatureKey,
    /// Declared numeric index within the feature group.
    pub index: u32,
}

// ============================================================================
// SECTION: Feature Keys
// ============================================================================

/// Kind of feature a test exercises, taken from the file name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Element test (`e-` prefix).
    Element,
    /// Attribute test (`a-` prefix).
    Attribute,
}

impl FeatureKind {
    /// Returns the file name prefix for this kind.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Element => "e",
            Self::Attribute => "a",
        }
    }

    /// Resolves a file name prefix to a kind.
    #[must_use]
    pub fn from_prefix(value: &str) -> Option<Self> {
        match value {
            "e" => Some(Self::Element),
            "a" => Some(Self::Attribute),
            _ => None,
        }
    }
}

/// Grouping key shared by all numbered variants of one feature (`e-rect`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeatureKey {
    /// Feature kind.
    kind: FeatureKind,
    /// Feature name (may contain dashes).
    name: String,
}

impl FeatureKey {
    /// Creates a feature key from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidFeatureKey`] when `name` is empty.
    pub fn new(kind: FeatureKind, name: impl Into<String>) -> Result<Self, ModelError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ModelError::InvalidFeatureKey {
                value: format!("{}-", kind.prefix()),
                reason: "empty feature name",
            });
        }
        Ok(Self {
            kind,
            name,
        })
    }

    /// Returns the feature kind.
    #[must_use]
    pub const fn kind(&self) -> FeatureKind {
        self.kind
    }

    /// Returns the feature name without the kind prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.prefix(), self.name)
    }
}

impl FromStr for FeatureKey {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| ModelError::InvalidFeatureKey {
            value: value.to_string(),
            reason,
        };
        let (kind_raw, name) = value.split_once('-').ok_or_else(|| invalid("missing kind prefix"))?;
        let kind = FeatureKind::from_prefix(kind_raw).ok_or_else(|| invalid("unknown kind prefix"))?;
        if name.is_empty() {
            return Err(invalid("empty feature name"));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(invalid("feature name contains whitespace"));
        }
        Ok(Self {
            kind,
            name: name.to_string(),
        })
    }
}

impl TryFrom<String> for FeatureKey {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FeatureKey> for String {
    fn from(value: FeatureKey) -> Self {
        value.to_string()
    }
}

// ============================================================================
// SECTION: Renderer Identifier
// ============================================================================

/// Renderer identifier used as a results column name (for example `resvg`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RendererId(String);

impl RendererId {
    /// Creates a new renderer identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RendererId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for RendererId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RendererId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
