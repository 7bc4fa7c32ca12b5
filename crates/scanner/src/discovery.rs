use crate::language::Language;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Finds scannable source files under a directory
pub struct SourceDiscovery {
    root: PathBuf,
    languages: Vec<Language>,
}

impl SourceDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            languages: Language::ALL.to_vec(),
        }
    }

    /// Keep only files detected as one of `languages`
    #[must_use]
    pub fn with_languages(mut self, languages: impl IntoIterator<Item = Language>) -> Self {
        self.languages = languages.into_iter().collect();
        self
    }

    /// Source files of the selected languages, sorted (.gitignore aware)
    pub fn discover(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let root = self.root.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .require_git(false);
        builder.filter_entry(move |entry| !Self::is_ignored_scope(entry.path(), &root));

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                        continue;
                    }

                    let path = entry.path();
                    if let Ok(meta) = entry.metadata() {
                        if meta.len() > MAX_FILE_SIZE_BYTES {
                            log::debug!(
                                "Skipping large file {} ({} bytes > {})",
                                path.display(),
                                meta.len(),
                                MAX_FILE_SIZE_BYTES
                            );
                            continue;
                        }
                    }

                    match Language::from_path(path).ok() {
                        Some(language) if self.languages.contains(&language) => {
                            files.push(path.to_path_buf());
                        }
                        Some(language) => {
                            log::debug!("Skipping {} ({language} not selected)", path.display());
                        }
                        None => {}
                    }
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files.sort();
        log::debug!(
            "Found {} source files under {}",
            files.len(),
            self.root.display()
        );
        files
    }

    fn is_ignored_scope(path: &Path, root: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(root) else {
            return false;
        };
        relative.components().any(|component| match component {
            std::path::Component::Normal(name) => {
                let lowered = name.to_string_lossy().to_lowercase();
                IGNORED_SCOPES.iter().any(|ignored| *ignored == lowered)
            }
            _ => false,
        })
    }
}

/// Build output, dependencies and caches that never hold authored sources
const IGNORED_SCOPES: &[&str] = &[
    "node_modules",
    "target",
    "dist",
    "build",
    "__pycache__",
    ".venv",
    "venv",
    "site-packages",
    "vendor",
    "third_party",
];

const MAX_FILE_SIZE_BYTES: u64 = 1_048_576; // 1 MB
