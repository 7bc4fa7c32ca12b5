use super::{
    field_text, leading_comments, node_text, other, parse_tree, RawDeclaration, RawParameter,
    SyntaxAdapter, SyntaxNode,
};
use crate::docs::RawDoc;
use crate::error::Result;
use crate::language::Language;
use crate::visibility::{VisibilityMarker, VisibilityRule};
use std::collections::HashSet;
use tree_sitter::Node;

/// JavaScript / TypeScript / TSX front-end
///
/// Picks up `function` and generator declarations plus `const`/`let`/`var`
/// bindings to arrow functions or function expressions, optionally wrapped in
/// `export`. Names listed in a local `export { .. }` clause count as exported.
#[derive(Debug, Clone, Copy)]
pub struct JavaScriptAdapter {
    language: Language,
}

impl JavaScriptAdapter {
    #[must_use]
    pub const fn javascript() -> Self {
        Self {
            language: Language::JavaScript,
        }
    }

    #[must_use]
    pub const fn typescript() -> Self {
        Self {
            language: Language::TypeScript,
        }
    }

    #[must_use]
    pub const fn tsx() -> Self {
        Self {
            language: Language::Tsx,
        }
    }
}

impl SyntaxAdapter for JavaScriptAdapter {
    fn language(&self) -> Language {
        self.language
    }

    fn parse(&self, source: &str) -> Result<Vec<SyntaxNode>> {
        let tree = parse_tree(self.language, source)?;
        let root = tree.root_node();

        let mut cursor = root.walk();
        let statements: Vec<_> = root
            .named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .collect();
        let exported_names = export_clause_names(source, &statements);

        let mut nodes = Vec::with_capacity(statements.len());
        for statement in statements {
            let (inner, marker) = unwrap_export(statement);
            let functions = match inner {
                Some(inner) => declarations(source, statement, inner, marker),
                None => Vec::new(),
            };

            if functions.is_empty() {
                nodes.push(other(statement));
                continue;
            }
            for mut decl in functions {
                if exported_names.contains(&decl.name) {
                    decl.marker = VisibilityMarker::Exported;
                }
                nodes.push(SyntaxNode::Function(decl));
            }
        }

        Ok(nodes)
    }

    /// ES modules use `export`; plain scripts fall back to the naming convention
    fn visibility_rule(&self, nodes: &[SyntaxNode]) -> VisibilityRule {
        let is_module = nodes.iter().any(|node| match node {
            SyntaxNode::Function(decl) => decl.marker == VisibilityMarker::Exported,
            SyntaxNode::Other { kind, .. } => kind == "export_statement",
        });
        if is_module {
            VisibilityRule::ExportKeyword
        } else {
            VisibilityRule::NamingConvention
        }
    }
}

/// Statement under an `export`, with the marker it earns
fn unwrap_export(statement: Node<'_>) -> (Option<Node<'_>>, VisibilityMarker) {
    if statement.kind() == "export_statement" {
        let inner = statement
            .child_by_field_name("declaration")
            .or_else(|| statement.child_by_field_name("value"));
        (inner, VisibilityMarker::Exported)
    } else {
        (Some(statement), VisibilityMarker::Unexported)
    }
}

/// Names exported by `export { a, b as c }` without a `from` source
fn export_clause_names(source: &str, statements: &[Node<'_>]) -> HashSet<String> {
    let mut names = HashSet::new();
    for statement in statements {
        if statement.kind() != "export_statement"
            || statement.child_by_field_name("source").is_some()
        {
            continue;
        }
        let mut cursor = statement.walk();
        for clause in statement
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "export_clause")
        {
            let mut specifiers = clause.walk();
            for specifier in clause.named_children(&mut specifiers) {
                if let Some(name) = field_text(specifier, "name", source) {
                    names.insert(name);
                }
            }
        }
    }
    names
}

fn declarations(
    source: &str,
    outer: Node<'_>,
    inner: Node<'_>,
    marker: VisibilityMarker,
) -> Vec<RawDeclaration> {
    match inner.kind() {
        "function_declaration" | "generator_function_declaration" => {
            field_text(inner, "name", source)
                .map(|name| vec![function(source, outer, inner, name, marker)])
                .unwrap_or_default()
        }
        "lexical_declaration" | "variable_declaration" => {
            let mut cursor = inner.walk();
            let declarators: Vec<_> = inner
                .named_children(&mut cursor)
                .filter(|child| child.kind() == "variable_declarator")
                .collect();
            declarators
                .into_iter()
                .filter_map(|declarator| {
                    let value = declarator
                        .child_by_field_name("value")
                        .filter(|value| is_function_value(value.kind()))?;
                    let name = declarator
                        .child_by_field_name("name")
                        .filter(|name| name.kind() == "identifier")?;
                    let name = node_text(name, source).to_string();
                    Some(function(source, outer, value, name, marker))
                })
                .collect()
        }
        _ => Vec::new(),
    }
}

fn is_function_value(kind: &str) -> bool {
    matches!(
        kind,
        "arrow_function" | "function_expression" | "function" | "generator_function"
    )
}

fn function(
    source: &str,
    outer: Node<'_>,
    function: Node<'_>,
    name: String,
    marker: VisibilityMarker,
) -> RawDeclaration {
    let parameters = match function.child_by_field_name("parameters") {
        Some(params) => parameters(source, params),
        // `x => ..` has a single bare parameter
        None => function
            .child_by_field_name("parameter")
            .map(|param| vec![RawParameter::new(node_text(param, source), None)])
            .unwrap_or_default(),
    };

    let doc = leading_comments(outer, source, &[], |text| !is_directive(text))
        .map(RawDoc::Comment);

    RawDeclaration {
        name,
        parameters,
        return_annotation: annotation(source, function, "return_type"),
        doc,
        marker,
        start_line: outer.start_position().row + 1,
        end_line: outer.end_position().row + 1,
    }
}

fn parameters(source: &str, params: Node<'_>) -> Vec<RawParameter> {
    let mut cursor = params.walk();
    params
        .named_children(&mut cursor)
        .filter_map(|param| match param.kind() {
            "required_parameter" | "optional_parameter" => {
                let name = binding(source, param.child_by_field_name("pattern")?, 0)?;
                let name = if param.kind() == "optional_parameter" {
                    format!("{name}?")
                } else {
                    name
                };
                Some(RawParameter::new(name, annotation(source, param, "type")))
            }
            "comment" => None,
            _ => binding(source, param, 0).map(|name| RawParameter::new(name, None)),
        })
        .collect()
}

/// Nesting past this renders as `_`
const MAX_PATTERN_DEPTH: usize = 16;

/// Names bound by a parameter pattern
///
/// Default values and computed keys are dropped: `{ a = load() }` renders as
/// `{ a }`, `[b = 1, ...rest]` as `[b, ...rest]`.
fn binding(source: &str, pattern: Node<'_>, depth: usize) -> Option<String> {
    if depth > MAX_PATTERN_DEPTH {
        return Some("_".to_string());
    }
    let nested = |node: Node<'_>| binding(source, node, depth + 1);

    match pattern.kind() {
        "identifier" | "shorthand_property_identifier_pattern" | "this" => {
            Some(node_text(pattern, source).to_string())
        }
        "assignment_pattern" | "object_assignment_pattern" => {
            nested(pattern.child_by_field_name("left")?)
        }
        "pair_pattern" => {
            let value = nested(pattern.child_by_field_name("value")?)?;
            match pattern.child_by_field_name("key") {
                Some(key) if key.kind() == "property_identifier" => {
                    Some(format!("{}: {value}", node_text(key, source)))
                }
                // Computed or literal keys are expressions; keep the binding only
                _ => Some(value),
            }
        }
        "rest_pattern" => {
            let inner = pattern.named_child(0)?;
            Some(format!("...{}", nested(inner)?))
        }
        "object_pattern" | "array_pattern" => {
            let mut cursor = pattern.walk();
            let names: Vec<String> = pattern
                .named_children(&mut cursor)
                .filter(|child| child.kind() != "comment")
                .filter_map(nested)
                .collect();
            Some(if pattern.kind() == "object_pattern" {
                format!("{{ {} }}", names.join(", "))
            } else {
                format!("[{}]", names.join(", "))
            })
        }
        _ => None,
    }
}

/// Type text inside a `: T` annotation field
fn annotation(source: &str, node: Node<'_>, field: &str) -> Option<String> {
    let annotation = node.child_by_field_name(field)?;
    let text = match annotation.named_child(0) {
        Some(ty) if annotation.kind().ends_with("annotation") => node_text(ty, source),
        _ => node_text(annotation, source),
    };
    Some(text.to_string())
}

fn is_directive(comment: &str) -> bool {
    let body = comment
        .trim_start_matches('/')
        .trim_start_matches('*')
        .trim_start();
    body.starts_with("eslint")
        || body.starts_with("@ts-")
        || body.starts_with("prettier-ignore")
        || body.starts_with("#region")
        || body.starts_with("#endregion")
}
