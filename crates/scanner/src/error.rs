use std::path::PathBuf;
use thiserror::Error;

/// Result type for scanner operations
pub type Result<T> = std::result::Result<T, ScanError>;

/// Line/column of a syntax problem (both 1-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorLocation {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors that can occur while scanning a file
#[derive(Error, Debug)]
pub enum ScanError {
    /// Path does not resolve to a file
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Source is not syntactically valid for the declared language
    #[error("Parse error at {location}: {message}")]
    ParseError {
        location: ErrorLocation,
        message: String,
    },

    /// No adapter registered for the language tag
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),
}

impl ScanError {
    /// Create a parse error at a 1-indexed position
    pub fn parse(line: usize, column: usize, msg: impl Into<String>) -> Self {
        Self::ParseError {
            location: ErrorLocation { line, column },
            message: msg.into(),
        }
    }

    /// Create an unsupported language error
    pub fn unsupported_language(lang: impl Into<String>) -> Self {
        Self::UnsupportedLanguage(lang.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitterError(msg.into())
    }

    /// Stable kind label reported as `errorKind`
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FileNotFound(_) => "FileNotFound",
            Self::ParseError { .. } | Self::TreeSitterError(_) => "ParseError",
            Self::UnsupportedLanguage(_) => "UnsupportedLanguage",
            Self::InvalidConfig(_) => "InvalidConfig",
            Self::IoError(_) => "Io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(
            ScanError::FileNotFound(PathBuf::from("a.py")).kind(),
            "FileNotFound"
        );
        assert_eq!(ScanError::parse(3, 7, "unexpected").kind(), "ParseError");
        assert_eq!(ScanError::tree_sitter("boom").kind(), "ParseError");
        assert_eq!(
            ScanError::unsupported_language("cobol").kind(),
            "UnsupportedLanguage"
        );
        assert_eq!(ScanError::invalid_config("jobs").kind(), "InvalidConfig");
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "not utf-8");
        assert_eq!(ScanError::from(io).kind(), "Io");
    }

    #[test]
    fn test_parse_error_carries_location() {
        let err = ScanError::parse(3, 7, "unexpected token");
        assert_eq!(err.to_string(), "Parse error at 3:7: unexpected token");
    }
}
