use crate::docs::Documentation;
use crate::error::ScanError;
use crate::language::Language;
use crate::visibility::Visibility;
use serde::{Deserialize, Serialize};

/// Type label used whenever nothing is declared in the source
pub const UNKNOWN_TYPE: &str = "unknown";

/// One parameter of a disclosed callable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// Declared type text, or [`UNKNOWN_TYPE`]
    #[serde(rename = "type")]
    pub type_label: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_label: type_label.into(),
        }
    }
}

/// Where a declaration lives. A pointer only; never carries the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub path: String,
    /// 1-indexed line of the declaration
    pub line: usize,
    /// 1-indexed, inclusive
    pub end_line: usize,
}

/// A discoverable callable, built once per scan and folded into a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: String,
    pub documentation: Documentation,
    pub source_location: SourceLocation,
    pub visibility: Visibility,
}

/// Layer 1: identity plus one-sentence summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hook {
    pub name: String,
    pub summary: String,
}

/// Layer 2: signature and full documentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub parameters: Vec<Parameter>,
    pub return_type: String,
    pub documentation: String,
    /// False when `documentation` is the "no description" sentinel
    pub documented: bool,
}

/// Layer 3: pointer to the implementation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepContext {
    pub source_location: SourceLocation,
}

/// Three-layer disclosure of one public declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisclosureRecord {
    pub hook: Hook,
    pub tool_definition: ToolDefinition,
    pub deep_context: DeepContext,
}

/// How deep a rendered report discloses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Layer 1 only
    Hook,
    /// Layers 1 and 2
    Tool,
    /// All three layers
    #[default]
    Full,
}

impl Layer {
    /// JSON keys of record layers hidden at this depth
    const fn hidden_keys(self) -> &'static [&'static str] {
        match self {
            Self::Hook => &["toolDefinition", "deepContext"],
            Self::Tool => &["deepContext"],
            Self::Full => &[],
        }
    }
}

/// Records of a file that scanned cleanly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecords {
    pub file_path: String,
    pub language: Language,
    pub records: Vec<DisclosureRecord>,
}

/// A file that contributed no records because it failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanErrorEntry {
    pub file_path: String,
    pub error_kind: String,
    pub message: String,
}

impl ScanErrorEntry {
    pub fn new(file_path: impl Into<String>, error: &ScanError) -> Self {
        Self {
            file_path: file_path.into(),
            error_kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

/// Result slot of one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileScan {
    Ok(FileRecords),
    Error(ScanErrorEntry),
}

impl FileScan {
    #[must_use]
    pub fn file_path(&self) -> &str {
        match self {
            Self::Ok(ok) => &ok.file_path,
            Self::Error(err) => &err.file_path,
        }
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Records of a successful scan; empty for a failed one
    #[must_use]
    pub fn records(&self) -> &[DisclosureRecord] {
        match self {
            Self::Ok(ok) => &ok.records,
            Self::Error(_) => &[],
        }
    }
}

/// Counts over a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub files: usize,
    pub failed: usize,
    pub records: usize,
}

/// Aggregated output, one slot per input file in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub summary: ScanSummary,
    pub files: Vec<FileScan>,
}

impl ScanReport {
    #[must_use]
    pub fn new(files: Vec<FileScan>) -> Self {
        let summary = ScanSummary {
            files: files.len(),
            failed: files.iter().filter(|file| !file.is_ok()).count(),
            records: files.iter().map(|file| file.records().len()).sum(),
        };
        Self { summary, files }
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.summary.failed > 0
    }

    pub fn errors(&self) -> impl Iterator<Item = &ScanErrorEntry> {
        self.files.iter().filter_map(|file| match file {
            FileScan::Error(err) => Some(err),
            FileScan::Ok(_) => None,
        })
    }

    /// All records, files in input order and declarations in source order
    pub fn records(&self) -> impl Iterator<Item = &DisclosureRecord> {
        self.files.iter().flat_map(FileScan::records)
    }

    /// JSON rendering limited to `layer`
    pub fn to_json(&self, layer: Layer) -> serde_json::Result<serde_json::Value> {
        let mut value = serde_json::to_value(self)?;
        let hidden = layer.hidden_keys();
        if hidden.is_empty() {
            return Ok(value);
        }

        let files = value
            .get_mut("files")
            .and_then(serde_json::Value::as_array_mut)
            .into_iter()
            .flatten();
        for file in files {
            let records = file
                .get_mut("records")
                .and_then(serde_json::Value::as_array_mut)
                .into_iter()
                .flatten();
            for record in records {
                if let Some(record) = record.as_object_mut() {
                    for key in hidden {
                        record.remove(*key);
                    }
                }
            }
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(name: &str) -> DisclosureRecord {
        DisclosureRecord {
            hook: Hook {
                name: name.to_string(),
                summary: "Does a thing.".to_string(),
            },
            tool_definition: ToolDefinition {
                parameters: vec![Parameter::new("x", "int")],
                return_type: UNKNOWN_TYPE.to_string(),
                documentation: "Does a thing.".to_string(),
                documented: true,
            },
            deep_context: DeepContext {
                source_location: SourceLocation {
                    path: "lib.py".to_string(),
                    line: 3,
                    end_line: 4,
                },
            },
        }
    }

    fn report() -> ScanReport {
        ScanReport::new(vec![
            FileScan::Ok(FileRecords {
                file_path: "lib.py".to_string(),
                language: Language::Python,
                records: vec![record("run")],
            }),
            FileScan::Error(ScanErrorEntry::new(
                "gone.py",
                &ScanError::FileNotFound("gone.py".into()),
            )),
        ])
    }

    #[test]
    fn test_record_field_names() {
        let value = serde_json::to_value(record("run")).unwrap();
        assert_eq!(
            value,
            json!({
                "hook": {"name": "run", "summary": "Does a thing."},
                "toolDefinition": {
                    "parameters": [{"name": "x", "type": "int"}],
                    "returnType": "unknown",
                    "documentation": "Does a thing.",
                    "documented": true
                },
                "deepContext": {
                    "sourceLocation": {"path": "lib.py", "line": 3, "endLine": 4}
                }
            })
        );
    }

    #[test]
    fn test_report_summary_and_error_entries() {
        let report = report();
        assert_eq!(
            report.summary,
            ScanSummary {
                files: 2,
                failed: 1,
                records: 1
            }
        );
        assert!(report.has_errors());

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["files"][0]["status"], "ok");
        assert_eq!(value["files"][0]["language"], "python");
        assert_eq!(
            value["files"][1],
            json!({
                "status": "error",
                "filePath": "gone.py",
                "errorKind": "FileNotFound",
                "message": "File not found: gone.py"
            })
        );
    }

    #[test]
    fn test_layer_projection() {
        let report = report();

        let hook = report.to_json(Layer::Hook).unwrap();
        let first = &hook["files"][0]["records"][0];
        assert_eq!(first, &json!({"hook": {"name": "run", "summary": "Does a thing."}}));

        let tool = report.to_json(Layer::Tool).unwrap();
        let first = &tool["files"][0]["records"][0];
        assert!(first.get("toolDefinition").is_some());
        assert!(first.get("deepContext").is_none());

        let full = report.to_json(Layer::Full).unwrap();
        assert_eq!(full, serde_json::to_value(&report).unwrap());
    }

    #[test]
    fn test_report_deserializes_back() {
        let report = report();
        let text = serde_json::to_string(&report).unwrap();
        let parsed: ScanReport = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, report);
    }
}
