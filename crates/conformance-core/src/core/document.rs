// crates/conformance-core/src/core/document.rs
// ============================================================================
// Module: Test Case Model
// Description: In-memory representation of one conformance test document.
// Purpose: Hold the identifier, title, element tree, and namespace table.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`TestCase`] is built once per load from a parsed document and is
//! immutable afterwards. The element tree keeps only what the consistency
//! checks need: qualified tag names, `id` attributes, and the namespaces
//! that attributes are qualified with.
//!
//! Raw document text is carried separately as [`DocumentText`] because only
//! the line-width check needs it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::FeatureKey;
use crate::core::identifiers::ModelError;
use crate::core::identifiers::TestId;

// ============================================================================
// SECTION: Element Tree
// ============================================================================

/// Namespace-qualified element or attribute name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Namespace URI, if the name is qualified.
    pub namespace: Option<String>,
    /// Local name with the namespace stripped.
    pub local: String,
}

impl QualifiedName {
    /// Creates an unqualified name.
    #[must_use]
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
        }
    }

    /// Creates a namespace-qualified name.
    #[must_use]
    pub fn qualified(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local: local.into(),
        }
    }
}

/// One element of a test document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementNode {
    /// Qualified tag name.
    pub name: QualifiedName,
    /// Value of the unqualified `id` attribute, if present.
    pub id: Option<String>,
    /// Namespace URIs of qualified attributes on this element.
    pub attribute_namespaces: Vec<String>,
    /// Namespace prefixes written on this element's tag and attributes.
    #[serde(default)]
    pub prefixes: Vec<String>,
    /// Child elements in document order.
    pub children: Vec<Self>,
}

impl ElementNode {
    /// Creates an element with no id, attributes, or children.
    #[must_use]
    pub const fn new(name: QualifiedName) -> Self {
        Self {
            name,
            id: None,
            attribute_namespaces: Vec::new(),
            prefixes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Sets the `id` attribute.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Appends a child element.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Records a qualified attribute namespace.
    #[must_use]
    pub fn with_attribute_namespace(mut self, uri: impl Into<String>) -> Self {
        self.attribute_namespaces.push(uri.into());
        self
    }

    /// Records a prefix written on the tag or an attribute.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// Returns the tag name with the namespace stripped.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.name.local
    }

    /// Iterates over this element and all descendants in document order.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self],
        }
    }
}

/// Pre-order iterator over an element tree.
#[derive(Debug)]
pub struct Descendants<'a> {
    /// Pending elements, next on top.
    stack: Vec<&'a ElementNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a ElementNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Prefixed namespace declaration on the root element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceDecl {
    /// Declared prefix (`None` for the default namespace).
    pub prefix: Option<String>,
    /// Namespace URI.
    pub uri: String,
}

// ============================================================================
// SECTION: Test Case
// ============================================================================

/// One conformance test document.
///
/// # Invariants
/// - `id` is the file name of `path`.
/// - `feature_key` and `index` are derived from `id` by [`TestId::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// File-name-derived identifier.
    pub id: TestId,
    /// Path relative to the corpus root, `/`-separated.
    pub path: String,
    /// Feature group key.
    pub feature_key: FeatureKey,
    /// Declared numeric index within the feature group.
    pub index: u32,
    /// Declared one-line title.
    pub title: String,
    /// Root element of the document.
    pub root: ElementNode,
    /// Namespaces declared on the root element.
    pub namespaces: Vec<NamespaceDecl>,
}

impl TestCase {
    /// Builds a test case, deriving its identifier from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] when the file name does not follow the
    /// identifier rule.
    pub fn new(
        path: impl Into<String>,
        title: impl Into<String>,
        root: ElementNode,
        namespaces: Vec<NamespaceDecl>,
    ) -> Result<Self, ModelError> {
        let path = path.into();
        let id = TestId::from_path(&path)?;
        let name = id.parse()?;
        Ok(Self {
            id,
            path,
            feature_key: name.feature_key,
            index: name.index,
            title: title.into(),
            root,
            namespaces,
        })
    }

    /// Iterates over every element in the document.
    #[must_use]
    pub fn elements(&self) -> Descendants<'_> {
        self.root.descendants()
    }
}

/// Raw text of one document, used by text-level checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentText {
    /// Identifier of the document.
    pub id: TestId,
    /// Path relative to the corpus root.
    pub path: String,
    /// Full UTF-8 document text.
    pub text: String,
}
