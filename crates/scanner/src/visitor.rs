use crate::adapter::{RawDeclaration, SyntaxNode};
use std::collections::HashMap;

/// Single pass over canonical nodes, yielding function-like declarations
///
/// When a name is bound more than once at module scope, only the last
/// binding survives, since that is the one callers actually reach. Survivors
/// keep source order.
pub struct DeclarationVisitor<'a> {
    nodes: &'a [SyntaxNode],
}

impl<'a> DeclarationVisitor<'a> {
    #[must_use]
    pub const fn new(nodes: &'a [SyntaxNode]) -> Self {
        Self { nodes }
    }

    #[must_use]
    pub fn declarations(&self) -> Vec<&'a RawDeclaration> {
        let mut slots: Vec<Option<&'a RawDeclaration>> = Vec::new();
        let mut by_name: HashMap<&'a str, usize> = HashMap::new();

        for node in self.nodes {
            match node {
                SyntaxNode::Function(decl) => {
                    if let Some(previous) = by_name.insert(decl.name.as_str(), slots.len()) {
                        log::trace!(
                            "`{}` rebound at line {}, dropping earlier definition",
                            decl.name,
                            decl.start_line
                        );
                        slots[previous] = None;
                    }
                    slots.push(Some(decl));
                }
                SyntaxNode::Other { kind, line } => {
                    log::trace!("Skipping non-declaration `{kind}` at line {line}");
                }
            }
        }

        slots.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visibility::VisibilityMarker;

    fn function(name: &str, line: usize) -> SyntaxNode {
        SyntaxNode::Function(RawDeclaration {
            name: name.to_string(),
            parameters: vec![],
            return_annotation: None,
            doc: None,
            marker: VisibilityMarker::Absent,
            start_line: line,
            end_line: line,
        })
    }

    fn other(kind: &str, line: usize) -> SyntaxNode {
        SyntaxNode::Other {
            kind: kind.to_string(),
            line,
        }
    }

    #[test]
    fn test_yields_functions_in_source_order() {
        let nodes = vec![
            other("import_statement", 1),
            function("b", 3),
            other("class_definition", 5),
            function("a", 9),
        ];
        let names: Vec<_> = DeclarationVisitor::new(&nodes)
            .declarations()
            .into_iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_unknown_nodes_do_not_abort() {
        let nodes = vec![other("weird_macro_thing", 1), other("ERROR_like", 2)];
        assert!(DeclarationVisitor::new(&nodes).declarations().is_empty());
    }

    #[test]
    fn test_rebinding_keeps_last_definition() {
        let nodes = vec![function("f", 1), function("g", 3), function("f", 5)];
        let found: Vec<_> = DeclarationVisitor::new(&nodes)
            .declarations()
            .into_iter()
            .map(|d| (d.name.as_str(), d.start_line))
            .collect();
        assert_eq!(found, vec![("g", 3), ("f", 5)]);
    }
}
