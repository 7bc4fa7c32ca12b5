//! Documentation cleanup and Layer 1 summaries.

use crate::config::ScannerConfig;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Emitted in place of documentation when a declaration has none
pub const NO_DESCRIPTION: &str = "No description provided.";

/// Raw documentation exactly as it appears in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDoc {
    /// String literal docstring, quotes included
    Docstring(String),
    /// Comment block, delimiters included
    Comment(String),
}

/// Normalized documentation for one declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Documentation {
    /// Cleaned text, or [`NO_DESCRIPTION`]
    pub text: String,
    /// Bounded first sentence; empty when undocumented
    pub summary: String,
    /// False exactly when `text` is the sentinel
    pub documented: bool,
}

impl Documentation {
    #[must_use]
    pub fn missing() -> Self {
        Self {
            text: NO_DESCRIPTION.to_string(),
            summary: String::new(),
            documented: false,
        }
    }
}

/// Cleans raw doc text and derives the bounded summary
#[derive(Debug, Clone)]
pub struct DocNormalizer {
    max_summary_chars: usize,
    truncation_marker: String,
}

impl DocNormalizer {
    #[must_use]
    pub fn new(config: &ScannerConfig) -> Self {
        Self {
            max_summary_chars: config.max_summary_chars,
            truncation_marker: config.truncation_marker.clone(),
        }
    }

    #[must_use]
    pub fn normalize(&self, raw: Option<&RawDoc>) -> Documentation {
        let cleaned = match raw {
            Some(RawDoc::Docstring(text)) => collapse_whitespace(strip_string_quotes(text)),
            Some(RawDoc::Comment(text)) => collapse_whitespace(&strip_comment_markers(text)),
            None => String::new(),
        };

        if cleaned.is_empty() {
            return Documentation::missing();
        }

        let summary = self.bound(first_sentence(&cleaned));
        Documentation {
            text: cleaned,
            summary,
            documented: true,
        }
    }

    fn bound(&self, sentence: &str) -> String {
        let mut graphemes = sentence.graphemes(true);
        let head: String = graphemes.by_ref().take(self.max_summary_chars).collect();
        if graphemes.next().is_none() {
            return head;
        }

        let mut truncated = head.trim_end().to_string();
        truncated.push_str(&self.truncation_marker);
        truncated
    }
}

/// First sentence per UAX #29, or the whole text when there is no boundary
#[must_use]
pub fn first_sentence(text: &str) -> &str {
    text.split_sentence_bounds()
        .map(str::trim)
        .find(|sentence| !sentence.is_empty())
        .unwrap_or_default()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_string_quotes(literal: &str) -> &str {
    let body = literal
        .trim()
        .trim_start_matches(|c: char| matches!(c, 'r' | 'R' | 'u' | 'U' | 'b' | 'B' | 'f' | 'F'));

    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if let Some(inner) = body.strip_prefix(quote) {
            return inner.strip_suffix(quote).unwrap_or(inner);
        }
    }
    body
}

fn strip_comment_markers(comment: &str) -> String {
    let mut lines = Vec::new();

    for line in comment.lines() {
        let mut line = line.trim();
        for prefix in ["/**", "/*!", "/*", "///", "//!", "//", "#"] {
            if let Some(rest) = line.strip_prefix(prefix) {
                line = rest;
                break;
            }
        }
        line = line.strip_suffix("*/").unwrap_or(line).trim();
        line = line.strip_prefix('*').unwrap_or(line).trim();

        // JSDoc-style block tags end the prose description.
        if line.starts_with('@') {
            break;
        }
        lines.push(line);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn normalizer(max: usize) -> DocNormalizer {
        DocNormalizer::new(&ScannerConfig {
            max_summary_chars: max,
            ..ScannerConfig::default()
        })
    }

    #[test]
    fn test_python_docstring() {
        let raw = RawDoc::Docstring(
            "\"\"\"\n    Analyzes the financial risk of a loan application.\n    This would be the 'Layer 1' disclosure text.\n    \"\"\""
                .to_string(),
        );
        let doc = normalizer(160).normalize(Some(&raw));
        assert_eq!(
            doc.text,
            "Analyzes the financial risk of a loan application. This would be the 'Layer 1' disclosure text."
        );
        assert_eq!(
            doc.summary,
            "Analyzes the financial risk of a loan application."
        );
        assert!(doc.documented);
    }

    #[test]
    fn test_prefixed_single_quoted_docstring() {
        let raw = RawDoc::Docstring("r'Raw helper.'".to_string());
        let doc = normalizer(160).normalize(Some(&raw));
        assert_eq!(doc.text, "Raw helper.");
    }

    #[test]
    fn test_jsdoc_comment_stops_at_tags() {
        let raw = RawDoc::Comment(
            "/**\n * Loads a profile from disk.\n * Falls back to defaults.\n * @param path where to look\n */"
                .to_string(),
        );
        let doc = normalizer(160).normalize(Some(&raw));
        assert_eq!(doc.text, "Loads a profile from disk. Falls back to defaults.");
        assert_eq!(doc.summary, "Loads a profile from disk.");
    }

    #[test]
    fn test_line_comments() {
        let raw = RawDoc::Comment("/// Sums the inputs\n///\n/// Saturates on overflow!".to_string());
        let doc = normalizer(160).normalize(Some(&raw));
        assert_eq!(doc.text, "Sums the inputs Saturates on overflow!");

        let raw = RawDoc::Comment("# Greets someone".to_string());
        let doc = normalizer(160).normalize(Some(&raw));
        assert_eq!(doc.summary, "Greets someone");
    }

    #[test]
    fn test_missing_documentation_uses_sentinel() {
        let doc = normalizer(160).normalize(None);
        assert_eq!(doc.text, NO_DESCRIPTION);
        assert_eq!(doc.summary, "");
        assert!(!doc.documented);

        let blank = RawDoc::Docstring("\"\"\"   \"\"\"".to_string());
        assert_eq!(normalizer(160).normalize(Some(&blank)), Documentation::missing());
    }

    #[test]
    fn test_real_docstring_equal_to_sentinel_text_stays_documented() {
        let raw = RawDoc::Docstring("\"No description provided.\"".to_string());
        let doc = normalizer(160).normalize(Some(&raw));
        assert_eq!(doc.text, NO_DESCRIPTION);
        assert!(doc.documented);
    }

    #[test]
    fn test_summary_truncated_with_marker() {
        let raw = RawDoc::Comment(
            "// Computes an exponentially weighted moving average over the sample window"
                .to_string(),
        );
        let doc = normalizer(20).normalize(Some(&raw));
        assert_eq!(doc.summary, "Computes an exponent...");
        assert!(doc.summary.ends_with(DEFAULT_MARKER));
        assert!(doc.summary.chars().count() <= 20 + DEFAULT_MARKER.len());
        // The full text is never cut.
        assert!(doc.text.ends_with("sample window"));
    }

    #[test]
    fn test_summary_at_bound_is_not_marked() {
        let raw = RawDoc::Comment("// Exactly twenty char.".to_string());
        let doc = normalizer(20).normalize(Some(&raw));
        assert_eq!(doc.summary, "Exactly twenty char.");
    }

    #[test]
    fn test_first_sentence_boundaries() {
        assert_eq!(first_sentence("One. Two."), "One.");
        assert_eq!(first_sentence("Is it? Yes."), "Is it?");
        assert_eq!(first_sentence("Uses e.g. caching here. More."), "Uses e.g. caching here.");
        assert_eq!(first_sentence("Version 1.2 is current"), "Version 1.2 is current");
        assert_eq!(first_sentence("no punctuation at all"), "no punctuation at all");
    }

    const DEFAULT_MARKER: &str = crate::config::DEFAULT_TRUNCATION_MARKER;
}
