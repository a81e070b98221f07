// crates/conformance-corpus/src/document.rs
// ============================================================================
// Module: Document Parser
// Description: Parses one test document into a core test case.
// Purpose: Extract the title, element tree, and namespace table.
// Dependencies: roxmltree, conformance-core
// ============================================================================

//! ## Overview
//! Documents are parsed with DTDs allowed, since some tests declare internal
//! entities. Only the unqualified `id` attribute is recorded as an element
//! id. The xml namespace is never reported as a declaration. Prefixes are read
//! from each start tag's source text, since the parsed tree only keeps
//! resolved namespace URIs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use conformance_core::ElementNode;
use conformance_core::NamespaceDecl;
use conformance_core::QualifiedName;
use conformance_core::TestCase;
use roxmltree::Document;
use roxmltree::Node;
use roxmltree::ParsingOptions;

use crate::error::CorpusError;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum element nesting depth accepted in a document.
pub const MAX_ELEMENT_DEPTH: usize = 256;

/// Reserved xml namespace URI.
const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses document `text` found at corpus-relative `path`.
///
/// # Errors
///
/// Returns [`CorpusError`] when the document is malformed, lacks a leading
/// `title` element, nests too deeply, or has a file name that is not a test
/// id.
pub fn parse_document(path: &str, text: &str) -> Result<TestCase, CorpusError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = Document::parse_with_options(text, options).map_err(|err| {
        CorpusError::Malformed {
            path: path.to_string(),
            message: err.to_string(),
        }
    })?;
    let root = document.root_element();
    let title = read_title(path, root)?;
    let tree = build_node(path, text, root, 1)?;
    let namespaces = root
        .namespaces()
        .filter(|namespace| namespace.uri() != XML_NAMESPACE)
        .map(|namespace| NamespaceDecl {
            prefix: namespace.name().map(str::to_string),
            uri: namespace.uri().to_string(),
        })
        .collect();
    Ok(TestCase::new(path, title, tree, namespaces)?)
}

/// Reads the text of the root's first element child, which must be `title`.
fn read_title(path: &str, root: Node<'_, '_>) -> Result<String, CorpusError> {
    let Some(first) = root.first_element_child() else {
        return Err(CorpusError::MissingTitle(path.to_string()));
    };
    if first.tag_name().name() != "title" {
        return Err(CorpusError::MissingTitle(path.to_string()));
    }
    let text: String =
        first.descendants().filter(Node::is_text).filter_map(|node| node.text()).collect();
    Ok(text.trim().to_string())
}

/// Converts an element and its subtree into an [`ElementNode`].
fn build_node(
    path: &str,
    source: &str,
    node: Node<'_, '_>,
    depth: usize,
) -> Result<ElementNode, CorpusError> {
    if depth > MAX_ELEMENT_DEPTH {
        return Err(CorpusError::TooDeep {
            path: path.to_string(),
            max: MAX_ELEMENT_DEPTH,
        });
    }
    let tag = node.tag_name();
    let name = match tag.namespace() {
        Some(uri) => QualifiedName::qualified(uri, tag.name()),
        None => QualifiedName::local(tag.name()),
    };
    let mut element = ElementNode::new(name);
    element.id = node.attribute("id").map(str::to_string);
    element.attribute_namespaces = node
        .attributes()
        .filter_map(|attribute| attribute.namespace())
        .map(str::to_string)
        .collect();
    element.prefixes = written_prefixes(source, node);
    for child in node.children().filter(Node::is_element) {
        element.children.push(build_node(path, source, child, depth + 1)?);
    }
    Ok(element)
}

/// Collects the prefixes written on an element's start tag.
///
/// `xmlns:` declarations are bindings, not uses, and are skipped.
fn written_prefixes(source: &str, node: Node<'_, '_>) -> Vec<String> {
    let mut prefixes: Vec<String> = Vec::new();
    let Some(mut rest) = source.get(node.range().start ..).and_then(|tag| tag.strip_prefix('<'))
    else {
        return prefixes;
    };
    let mut tag_name = true;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() || rest.starts_with('>') || rest.starts_with('/') {
            break;
        }
        let end = rest
            .find(|ch: char| ch.is_whitespace() || matches!(ch, '=' | '>' | '/'))
            .unwrap_or(rest.len());
        let (name, tail) = rest.split_at(end);
        if let Some((prefix, _)) = name.split_once(':')
            && prefix != "xmlns"
            && !prefixes.iter().any(|known| known == prefix)
        {
            prefixes.push(prefix.to_string());
        }
        rest = tail;
        if tag_name {
            tag_name = false;
            continue;
        }
        let Some(value) = rest.trim_start().strip_prefix('=').map(str::trim_start) else {
            break;
        };
        let Some(quote) = value.chars().next().filter(|ch| matches!(ch, '"' | '\'')) else {
            break;
        };
        let body = &value[quote.len_utf8() ..];
        let Some(close) = body.find(quote) else {
            break;
        };
        rest = &body[close + quote.len_utf8() ..];
    }
    prefixes
}

// ============================================================================
// SECTION: Tests
// ============================================================================
