use super::{
    field_text, leading_comments, node_text, other, parse_tree, RawDeclaration, RawParameter,
    SyntaxAdapter, SyntaxNode,
};
use crate::docs::RawDoc;
use crate::error::Result;
use crate::language::Language;
use crate::visibility::{VisibilityMarker, VisibilityRule};
use tree_sitter::Node;

/// Rust front-end: crate-root `fn` items, exported by a bare `pub`
#[derive(Debug, Clone, Copy, Default)]
pub struct RustAdapter;

impl SyntaxAdapter for RustAdapter {
    fn language(&self) -> Language {
        Language::Rust
    }

    fn parse(&self, source: &str) -> Result<Vec<SyntaxNode>> {
        let tree = parse_tree(Language::Rust, source)?;
        let root = tree.root_node();

        let mut cursor = root.walk();
        let nodes = root
            .named_children(&mut cursor)
            .filter(|child| !matches!(child.kind(), "line_comment" | "block_comment"))
            .map(|child| match child.kind() {
                "function_item" => {
                    declaration(source, child).map_or_else(|| other(child), SyntaxNode::Function)
                }
                _ => other(child),
            })
            .collect();

        Ok(nodes)
    }

    fn visibility_rule(&self, _nodes: &[SyntaxNode]) -> VisibilityRule {
        VisibilityRule::ExportKeyword
    }
}

fn declaration(source: &str, function: Node<'_>) -> Option<RawDeclaration> {
    let name = field_text(function, "name", source)?;

    let parameters = function
        .child_by_field_name("parameters")
        .map(|params| parameters(source, params))
        .unwrap_or_default();

    let doc = leading_comments(function, source, &["attribute_item"], is_outer_doc)
        .map(RawDoc::Comment);

    Some(RawDeclaration {
        name,
        parameters,
        return_annotation: field_text(function, "return_type", source),
        doc,
        marker: marker(source, function),
        start_line: function.start_position().row + 1,
        end_line: function.end_position().row + 1,
    })
}

/// Only a bare `pub` exports; `pub(crate)` and friends stay inside the crate
fn marker(source: &str, function: Node<'_>) -> VisibilityMarker {
    let mut cursor = function.walk();
    let visibility = function
        .children(&mut cursor)
        .find(|child| child.kind() == "visibility_modifier");
    match visibility {
        Some(modifier) if node_text(modifier, source).trim() == "pub" => VisibilityMarker::Exported,
        _ => VisibilityMarker::Unexported,
    }
}

fn is_outer_doc(comment: &str) -> bool {
    (comment.starts_with("///") && !comment.starts_with("////"))
        || (comment.starts_with("/**") && !comment.starts_with("/***") && comment != "/**/")
}

fn parameters(source: &str, params: Node<'_>) -> Vec<RawParameter> {
    let mut cursor = params.walk();
    params
        .named_children(&mut cursor)
        .filter_map(|param| match param.kind() {
            "parameter" => {
                let name = field_text(param, "pattern", source)?;
                Some(RawParameter::new(name, field_text(param, "type", source)))
            }
            "self_parameter" | "variadic_parameter" => {
                Some(RawParameter::new(node_text(param, source), None))
            }
            _ => None,
        })
        .collect()
}
