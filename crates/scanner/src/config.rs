use crate::error::{Result, ScanError};
use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default bound for the Layer 1 summary, in grapheme clusters
pub const DEFAULT_MAX_SUMMARY_CHARS: usize = 160;

/// Default marker appended to a truncated summary
pub const DEFAULT_TRUNCATION_MARKER: &str = "...";

/// Configuration for scanning behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScannerConfig {
    /// Maximum summary length before truncation
    pub max_summary_chars: usize,

    /// Appended to a summary cut at `max_summary_chars`
    pub truncation_marker: String,

    /// Languages to scan (empty = all supported languages)
    pub supported_languages: Vec<String>,

    /// Worker threads for multi-file scans (None = global rayon pool)
    pub jobs: Option<usize>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_summary_chars: DEFAULT_MAX_SUMMARY_CHARS,
            truncation_marker: DEFAULT_TRUNCATION_MARKER.to_string(),
            supported_languages: vec![],
            jobs: None,
        }
    }
}

impl ScannerConfig {
    /// Parse a config document: JSON first, TOML as fallback
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let config: Self = match serde_json::from_slice(bytes) {
            Ok(config) => config,
            Err(json_err) => {
                let utf8 = std::str::from_utf8(bytes)
                    .map_err(|err| ScanError::invalid_config(format!("{json_err}; {err}")))?;
                toml::from_str(utf8).map_err(|toml_err| {
                    ScanError::invalid_config(format!(
                        "config is not valid JSON ({json_err}) or TOML ({toml_err})"
                    ))
                })?
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => ScanError::FileNotFound(path.to_path_buf()),
            _ => ScanError::IoError(err),
        })?;
        Self::from_slice(&bytes)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_summary_chars == 0 {
            return Err(ScanError::invalid_config("max_summary_chars must be > 0"));
        }

        if self.truncation_marker.is_empty() {
            return Err(ScanError::invalid_config(
                "truncation_marker must not be empty",
            ));
        }

        if self.jobs == Some(0) {
            return Err(ScanError::invalid_config("jobs must be > 0 when set"));
        }

        for tag in &self.supported_languages {
            Language::from_tag(tag).map_err(|_| {
                ScanError::invalid_config(format!("unknown language in supported_languages: {tag}"))
            })?;
        }

        Ok(())
    }

    /// Whether the allow-list admits `language`
    #[must_use]
    pub fn allows(&self, language: Language) -> bool {
        self.supported_languages.is_empty()
            || self
                .supported_languages
                .iter()
                .any(|tag| Language::from_tag(tag).is_ok_and(|allowed| allowed == language))
    }
}
