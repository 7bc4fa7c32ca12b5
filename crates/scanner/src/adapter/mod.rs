//! Language front-ends producing canonical top-level declaration nodes.
//!
//! Every adapter parses with tree-sitter and flattens the module scope into
//! [`SyntaxNode`]s. Nothing in the source is ever evaluated.

mod javascript;
mod python;
mod rust;

pub use javascript::JavaScriptAdapter;
pub use python::PythonAdapter;
pub use rust::RustAdapter;

use crate::docs::RawDoc;
use crate::error::{Result, ScanError};
use crate::language::Language;
use crate::visibility::{VisibilityMarker, VisibilityRule};
use std::collections::HashMap;
use std::sync::Arc;
use tree_sitter::{Node, Parser, Tree};

/// Parameter as written: name plus optional annotation text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParameter {
    pub name: String,
    pub annotation: Option<String>,
}

impl RawParameter {
    pub fn new(name: impl Into<String>, annotation: Option<String>) -> Self {
        Self {
            name: name.into(),
            annotation,
        }
    }
}

/// Language-independent view of one top-level callable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDeclaration {
    pub name: String,
    pub parameters: Vec<RawParameter>,
    pub return_annotation: Option<String>,
    pub doc: Option<RawDoc>,
    pub marker: VisibilityMarker,
    /// 1-indexed
    pub start_line: usize,
    /// 1-indexed, inclusive
    pub end_line: usize,
}

/// One module-scope node in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxNode {
    /// Function-like declaration
    Function(RawDeclaration),
    /// Anything else at module scope (imports, classes, statements)
    Other { kind: String, line: usize },
}

/// Capability: parse source text of one language into canonical nodes
pub trait SyntaxAdapter: Send + Sync {
    fn language(&self) -> Language;

    /// Flatten the module scope of `source`, or fail with the first syntax error
    fn parse(&self, source: &str) -> Result<Vec<SyntaxNode>>;

    /// Rule deciding visibility for the nodes of one parsed file
    fn visibility_rule(&self, nodes: &[SyntaxNode]) -> VisibilityRule;
}

/// Language tag → adapter lookup
#[derive(Clone)]
pub struct AdapterRegistry {
    adapters: HashMap<Language, Arc<dyn SyntaxAdapter>>,
}

impl AdapterRegistry {
    /// Registry with no adapters
    pub fn empty() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Registry with every built-in adapter
    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(PythonAdapter));
        registry.register(Arc::new(RustAdapter));
        registry.register(Arc::new(JavaScriptAdapter::javascript()));
        registry.register(Arc::new(JavaScriptAdapter::typescript()));
        registry.register(Arc::new(JavaScriptAdapter::tsx()));
        registry
    }

    /// Add or replace the adapter for its language
    pub fn register(&mut self, adapter: Arc<dyn SyntaxAdapter>) {
        self.adapters.insert(adapter.language(), adapter);
    }

    pub fn get(&self, language: Language) -> Result<&dyn SyntaxAdapter> {
        self.adapters
            .get(&language)
            .map(AsRef::as_ref)
            .ok_or_else(|| ScanError::unsupported_language(language.as_str()))
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut languages: Vec<_> = self.adapters.keys().map(|l| l.as_str()).collect();
        languages.sort_unstable();
        f.debug_struct("AdapterRegistry")
            .field("languages", &languages)
            .finish()
    }
}

/// Parse `source`, rejecting trees that contain syntax errors
pub(crate) fn parse_tree(language: Language, source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&language.tree_sitter_language())
        .map_err(|e| ScanError::tree_sitter(format!("Failed to set language: {e}")))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ScanError::tree_sitter("parser produced no tree"))?;

    let root = tree.root_node();
    if root.has_error() {
        let bad = first_error(root).unwrap_or(root);
        let position = bad.start_position();
        let message = if bad.is_missing() {
            format!("missing {}", bad.kind())
        } else {
            format!("unexpected syntax in {} source", language.as_str())
        };
        return Err(ScanError::parse(position.row + 1, position.column + 1, message));
    }

    Ok(tree)
}

/// Pre-order search for the earliest ERROR or MISSING node
///
/// Walks with a cursor so that deeply nested input cannot exhaust the stack.
fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

pub(crate) fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

pub(crate) fn field_text(node: Node<'_>, field: &str, source: &str) -> Option<String> {
    node.child_by_field_name(field)
        .map(|child| node_text(child, source).to_string())
}

pub(crate) fn other(node: Node<'_>) -> SyntaxNode {
    SyntaxNode::Other {
        kind: node.kind().to_string(),
        line: node.start_position().row + 1,
    }
}

/// Contiguous comment siblings directly above `node`, accepted by `is_doc`
///
/// Siblings whose kind is in `skip` (attributes, decorators) are stepped over.
/// A blank line between the block and the declaration detaches it.
pub(crate) fn leading_comments(
    node: Node<'_>,
    source: &str,
    skip: &[&str],
    is_doc: impl Fn(&str) -> bool,
) -> Option<String> {
    let mut blocks = Vec::new();
    let mut expected_row = node.start_position().row;
    let mut current = node.prev_sibling();

    while let Some(sibling) = current {
        if skip.contains(&sibling.kind()) {
            expected_row = sibling.start_position().row;
            current = sibling.prev_sibling();
            continue;
        }
        if !is_comment(sibling) || last_row(sibling) + 1 < expected_row {
            break;
        }
        // A comment sharing its line with earlier code trails that code
        let previous = sibling.prev_sibling();
        if previous.is_some_and(|prev| {
            !is_comment(prev) && last_row(prev) == sibling.start_position().row
        }) {
            break;
        }
        let text = node_text(sibling, source);
        if !is_doc(text) {
            break;
        }
        blocks.push(text);
        expected_row = sibling.start_position().row;
        current = previous;
    }

    if blocks.is_empty() {
        return None;
    }
    blocks.reverse();
    Some(blocks.join("\n"))
}

fn is_comment(node: Node<'_>) -> bool {
    node.kind().contains("comment")
}

/// Last row holding text of `node`; Rust line comments own their trailing newline
fn last_row(node: Node<'_>) -> usize {
    let end = node.end_position();
    if end.column == 0 && end.row > node.start_position().row {
        end.row - 1
    } else {
        end.row
    }
}
