//! Folds a filtered declaration into its three-layer record.
//!
//! Types are copied from the annotation text as written. Nothing is inferred.

use crate::adapter::RawDeclaration;
use crate::docs::Documentation;
use crate::types::{
    DeepContext, Declaration, DisclosureRecord, Hook, Parameter, SourceLocation, ToolDefinition,
    UNKNOWN_TYPE,
};
use crate::visibility::Visibility;

/// Build the transient [`Declaration`] for one raw node
#[must_use]
pub fn declaration(
    raw: &RawDeclaration,
    path: &str,
    visibility: Visibility,
    documentation: Documentation,
) -> Declaration {
    Declaration {
        name: raw.name.clone(),
        parameters: raw
            .parameters
            .iter()
            .map(|param| Parameter::new(param.name.trim(), type_label(param.annotation.as_deref())))
            .collect(),
        return_type: type_label(raw.return_annotation.as_deref()),
        documentation,
        source_location: SourceLocation {
            path: path.to_string(),
            line: raw.start_line,
            end_line: raw.end_line.max(raw.start_line),
        },
        visibility,
    }
}

/// Construct the disclosure record. Pure: equal input, equal record.
#[must_use]
pub fn assemble(declaration: Declaration) -> DisclosureRecord {
    let Declaration {
        name,
        parameters,
        return_type,
        documentation,
        source_location,
        visibility: _,
    } = declaration;

    DisclosureRecord {
        hook: Hook {
            name,
            summary: documentation.summary,
        },
        tool_definition: ToolDefinition {
            parameters,
            return_type,
            documentation: documentation.text,
            documented: documentation.documented,
        },
        deep_context: DeepContext { source_location },
    }
}

/// Annotation text with separators stripped and whitespace collapsed
fn type_label(annotation: Option<&str>) -> String {
    let Some(text) = annotation else {
        return UNKNOWN_TYPE.to_string();
    };
    let text = text.trim();
    let text = text
        .strip_prefix("->")
        .or_else(|| text.strip_prefix(':'))
        .unwrap_or(text);
    let label = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if label.is_empty() {
        UNKNOWN_TYPE.to_string()
    } else {
        label
    }
}
