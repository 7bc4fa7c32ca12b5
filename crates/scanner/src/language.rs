use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Source language of a scanned file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Rust,
    Python,
    JavaScript,
    TypeScript,
    Tsx,
}

impl Language {
    /// All languages with a registered grammar
    pub const ALL: [Language; 5] = [
        Language::Rust,
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Tsx,
    ];

    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "rs" => Some(Language::Rust),
            "py" | "pyw" => Some(Language::Python),
            "js" | "mjs" | "cjs" | "jsx" => Some(Language::JavaScript),
            "ts" | "mts" | "cts" => Some(Language::TypeScript),
            "tsx" => Some(Language::Tsx),
            _ => None,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Self::from_extension(ext).ok_or_else(|| {
            let tag = if ext.is_empty() {
                format!("<none> ({})", path.display())
            } else {
                ext.to_string()
            };
            ScanError::unsupported_language(tag)
        })
    }

    /// Resolve an explicit language tag (name or extension)
    pub fn from_tag(tag: &str) -> Result<Self> {
        let lowered = tag.trim().to_lowercase();
        match lowered.as_str() {
            "rust" => Ok(Language::Rust),
            "python" => Ok(Language::Python),
            "javascript" => Ok(Language::JavaScript),
            "typescript" => Ok(Language::TypeScript),
            "tsx" => Ok(Language::Tsx),
            other => {
                Self::from_extension(other).ok_or_else(|| ScanError::unsupported_language(tag))
            }
        }
    }

    /// Get language name as string
    pub const fn as_str(self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Tsx => "tsx",
        }
    }

    /// Get Tree-sitter language instance
    pub fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            Language::Rust => tree_sitter_rust::LANGUAGE.into(),
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("rs"), Some(Language::Rust));
        assert_eq!(Language::from_extension("RS"), Some(Language::Rust));
        assert_eq!(Language::from_extension("py"), Some(Language::Python));
        assert_eq!(Language::from_extension("mjs"), Some(Language::JavaScript));
        assert_eq!(Language::from_extension("ts"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("tsx"), Some(Language::Tsx));
        assert_eq!(Language::from_extension("go"), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path("test.rs").unwrap(), Language::Rust);
        assert_eq!(
            Language::from_path("src/main.py").unwrap(),
            Language::Python
        );
        assert_eq!(
            Language::from_path("index.ts").unwrap(),
            Language::TypeScript
        );

        let err = Language::from_path("no_extension").unwrap_err();
        assert_eq!(err.kind(), "UnsupportedLanguage");
        let err = Language::from_path("main.go").unwrap_err();
        assert!(err.to_string().contains("go"));
    }

    #[test]
    fn test_from_tag() {
        assert_eq!(Language::from_tag("Python").unwrap(), Language::Python);
        assert_eq!(Language::from_tag("py").unwrap(), Language::Python);
        assert_eq!(Language::from_tag("tsx").unwrap(), Language::Tsx);
        assert!(Language::from_tag("cobol").is_err());
    }

    #[test]
    fn test_tag_round_trips_through_as_str() {
        for language in Language::ALL {
            assert_eq!(Language::from_tag(language.as_str()).unwrap(), language);
        }
    }
}
