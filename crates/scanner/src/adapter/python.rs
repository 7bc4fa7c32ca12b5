use super::{
    field_text, leading_comments, node_text, other, parse_tree, RawDeclaration, RawParameter,
    SyntaxAdapter, SyntaxNode,
};
use crate::docs::RawDoc;
use crate::error::Result;
use crate::language::Language;
use crate::visibility::{VisibilityMarker, VisibilityRule};
use tree_sitter::Node;

/// Python front-end: module-level `def` / `async def`, decorated or not
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonAdapter;

impl SyntaxAdapter for PythonAdapter {
    fn language(&self) -> Language {
        Language::Python
    }

    fn parse(&self, source: &str) -> Result<Vec<SyntaxNode>> {
        let tree = parse_tree(Language::Python, source)?;
        let root = tree.root_node();

        let mut cursor = root.walk();
        let nodes = root
            .named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .map(|child| match function_of(child) {
                Some(function) => declaration(source, child, function)
                    .map_or_else(|| other(child), SyntaxNode::Function),
                None => other(child),
            })
            .collect();

        Ok(nodes)
    }

    fn visibility_rule(&self, _nodes: &[SyntaxNode]) -> VisibilityRule {
        VisibilityRule::NamingConvention
    }
}

/// The `function_definition` behind a module-level statement, if any
fn function_of(node: Node<'_>) -> Option<Node<'_>> {
    match node.kind() {
        "function_definition" => Some(node),
        "decorated_definition" => node
            .child_by_field_name("definition")
            .filter(|def| def.kind() == "function_definition"),
        _ => None,
    }
}

fn declaration(source: &str, outer: Node<'_>, function: Node<'_>) -> Option<RawDeclaration> {
    let name = field_text(function, "name", source)?;

    let parameters = function
        .child_by_field_name("parameters")
        .map(|params| parameters(source, params))
        .unwrap_or_default();

    let doc = docstring(source, function).or_else(|| {
        leading_comments(outer, source, &[], |text| !text.starts_with("#!"))
            .map(RawDoc::Comment)
    });

    Some(RawDeclaration {
        name,
        parameters,
        return_annotation: field_text(function, "return_type", source),
        doc,
        marker: VisibilityMarker::Absent,
        start_line: function.start_position().row + 1,
        end_line: outer.end_position().row + 1,
    })
}

fn parameters(source: &str, params: Node<'_>) -> Vec<RawParameter> {
    let mut cursor = params.walk();
    params
        .named_children(&mut cursor)
        .filter_map(|param| match param.kind() {
            "identifier" | "list_splat_pattern" | "dictionary_splat_pattern" => {
                Some(RawParameter::new(node_text(param, source), None))
            }
            "default_parameter" => {
                field_text(param, "name", source).map(|name| RawParameter::new(name, None))
            }
            "typed_default_parameter" => field_text(param, "name", source)
                .map(|name| RawParameter::new(name, field_text(param, "type", source))),
            "typed_parameter" => {
                let annotation = field_text(param, "type", source);
                let mut inner = param.walk();
                let name = param
                    .named_children(&mut inner)
                    .find(|child| child.kind() != "type")
                    .map(|child| node_text(child, source).to_string())?;
                Some(RawParameter::new(name, annotation))
            }
            // `*` and `/` separators, comments
            _ => None,
        })
        .collect()
}

/// String literal opening the function body
fn docstring(source: &str, function: Node<'_>) -> Option<RawDoc> {
    let body = function.child_by_field_name("body")?;
    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|stmt| stmt.kind() != "comment")?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let literal = first.named_child(0).filter(|expr| expr.kind() == "string")?;
    Some(RawDoc::Docstring(node_text(literal, source).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn functions(source: &str) -> Vec<RawDeclaration> {
        PythonAdapter
            .parse(source)
            .unwrap()
            .into_iter()
            .filter_map(|node| match node {
                SyntaxNode::Function(decl) => Some(decl),
                SyntaxNode::Other { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_reference_module() {
        let source = r#"def calculate_risk(amount: float, credit_score: int) -> str:
    """
    Analyzes the financial risk of a loan application.
    This would be the 'Layer 1' disclosure text.
    """
    return "High" if credit_score < 600 else "Low"

def _private_helper():
    """This should be ignored by the scanner."""
    pass
"#;
        let decls = functions(source);
        assert_eq!(decls.len(), 2);

        let risk = &decls[0];
        assert_eq!(risk.name, "calculate_risk");
        assert_eq!(
            risk.parameters,
            vec![
                RawParameter::new("amount", Some("float".to_string())),
                RawParameter::new("credit_score", Some("int".to_string())),
            ]
        );
        assert_eq!(risk.return_annotation.as_deref(), Some("str"));
        assert_eq!((risk.start_line, risk.end_line), (1, 6));
        assert!(matches!(&risk.doc, Some(RawDoc::Docstring(text)) if text.contains("financial risk")));

        assert_eq!(decls[1].name, "_private_helper");
        assert_eq!(decls[1].marker, VisibilityMarker::Absent);
    }

    #[test]
    fn test_parameter_shapes() {
        let source = "def f(a, b=1, c: int = 2, *args, key, **kwargs):\n    pass\n";
        let decl = &functions(source)[0];
        let names: Vec<_> = decl.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "*args", "key", "**kwargs"]);
        assert_eq!(decl.parameters[2].annotation.as_deref(), Some("int"));
        assert_eq!(decl.parameters[0].annotation, None);
        assert_eq!(decl.return_annotation, None);
    }

    #[test]
    fn test_decorated_and_async_definitions() {
        let source = "import functools\n\n@functools.cache\nasync def fetch(url: str) -> bytes:\n    ...\n";
        let decl = &functions(source)[0];
        assert_eq!(decl.name, "fetch");
        assert_eq!(decl.start_line, 4);
        assert_eq!(decl.return_annotation.as_deref(), Some("bytes"));
    }

    #[test]
    fn test_comment_block_when_no_docstring() {
        let source = "#!/usr/bin/env python\n\n# Adds two numbers.\n# Pure.\ndef add(a, b):\n    return a + b\n";
        let decl = &functions(source)[0];
        assert_eq!(
            decl.doc,
            Some(RawDoc::Comment("# Adds two numbers.\n# Pure.".to_string()))
        );
    }

    #[test]
    fn test_trailing_comment_on_previous_line_is_not_doc() {
        let source = "TIMEOUT = 30  # seconds, tuned for prod\ndef fetch(url):\n    pass\n";
        assert_eq!(functions(source)[0].doc, None);

        let source = "TIMEOUT = 30  # seconds\n# Fetches a page.\ndef fetch(url):\n    pass\n";
        assert_eq!(
            functions(source)[0].doc,
            Some(RawDoc::Comment("# Fetches a page.".to_string()))
        );
    }

    #[test]
    fn test_nested_functions_and_methods_are_not_top_level() {
        let source = "class Car:\n    def drive(self):\n        pass\n\ndef outer():\n    def inner():\n        pass\n    return inner\n";
        let names: Vec<_> = functions(source).into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["outer"]);
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let err = PythonAdapter.parse("def broken(:\n    pass\n").unwrap_err();
        assert_eq!(err.kind(), "ParseError");
    }
}
