use crate::adapter::AdapterRegistry;
use crate::assembler;
use crate::config::ScannerConfig;
use crate::discovery::SourceDiscovery;
use crate::docs::DocNormalizer;
use crate::error::{Result, ScanError};
use crate::language::Language;
use crate::types::{DisclosureRecord, FileRecords, FileScan, ScanErrorEntry, ScanReport};
use crate::visitor::DeclarationVisitor;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Scan coordinator: runs the pipeline per file and merges results in input order
#[derive(Debug, Clone)]
pub struct Scanner {
    config: ScannerConfig,
    registry: AdapterRegistry,
    normalizer: DocNormalizer,
}

impl Scanner {
    /// Create a scanner with the built-in language adapters
    pub fn new(config: ScannerConfig) -> Result<Self> {
        Self::with_registry(config, AdapterRegistry::with_builtin())
    }

    /// Create a scanner over a custom adapter set
    pub fn with_registry(config: ScannerConfig, registry: AdapterRegistry) -> Result<Self> {
        config.validate()?;
        let normalizer = DocNormalizer::new(&config);
        Ok(Self {
            config,
            registry,
            normalizer,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Scan in-memory source text
    ///
    /// Either every public declaration is returned, or the error that stopped
    /// the file; never a partial list.
    pub fn scan_source(
        &self,
        source: &str,
        path: &str,
        language: Language,
    ) -> Result<Vec<DisclosureRecord>> {
        if !self.config.allows(language) {
            return Err(ScanError::unsupported_language(language.as_str()));
        }

        let adapter = self.registry.get(language)?;
        let nodes = adapter.parse(source)?;
        let rule = adapter.visibility_rule(&nodes);

        let records = DeclarationVisitor::new(&nodes)
            .declarations()
            .into_iter()
            .filter_map(|raw| {
                let visibility = rule.classify(&raw.name, raw.marker);
                if !visibility.is_public() {
                    log::trace!("{path}: `{}` is private, not disclosed", raw.name);
                    return None;
                }
                let documentation = self.normalizer.normalize(raw.doc.as_ref());
                let declaration = assembler::declaration(raw, path, visibility, documentation);
                Some(assembler::assemble(declaration))
            })
            .collect();

        Ok(records)
    }

    /// Scan one file, detecting its language from the extension
    pub fn scan_file(&self, path: impl AsRef<Path>) -> FileScan {
        self.scan_one(path.as_ref(), None)
    }

    /// Scan one file as `language`
    pub fn scan_file_as(&self, path: impl AsRef<Path>, language: Language) -> FileScan {
        self.scan_one(path.as_ref(), Some(language))
    }

    /// Scan files in parallel; slots follow the order of `paths`
    pub fn scan_files<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> ScanReport {
        self.scan_all(paths, None)
    }

    /// Scan files in parallel, all as `language`
    pub fn scan_files_as<P: AsRef<Path> + Sync>(
        &self,
        paths: &[P],
        language: Language,
    ) -> ScanReport {
        self.scan_all(paths, Some(language))
    }

    /// Like [`Scanner::scan_files`], expanding directories into their source files
    ///
    /// Directories only contribute files of languages the config allows;
    /// files named explicitly are always scanned.
    pub fn scan_paths<P: AsRef<Path>>(&self, paths: &[P]) -> ScanReport {
        let allowed = Language::ALL
            .into_iter()
            .filter(|language| self.config.allows(*language));
        let expanded = expand_paths(paths, &allowed.collect::<Vec<_>>());
        self.scan_files(&expanded)
    }

    /// Like [`Scanner::scan_paths`], scanning every file as `language`
    ///
    /// Directories only contribute files detected as `language`; files named
    /// explicitly are forced to it whatever their extension.
    pub fn scan_paths_as<P: AsRef<Path>>(&self, paths: &[P], language: Language) -> ScanReport {
        let expanded = expand_paths(paths, &[language]);
        self.scan_files_as(&expanded, language)
    }

    fn scan_all<P: AsRef<Path> + Sync>(&self, paths: &[P], language: Option<Language>) -> ScanReport {
        let run = || -> Vec<FileScan> {
            paths
                .par_iter()
                .map(|path| self.scan_one(path.as_ref(), language))
                .collect()
        };

        let files = match self.config.jobs {
            Some(jobs) => match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
                Ok(pool) => pool.install(run),
                Err(e) => {
                    log::warn!("Failed to build {jobs}-thread pool, using global pool: {e}");
                    run()
                }
            },
            None => run(),
        };

        let report = ScanReport::new(files);
        log::debug!(
            "Scanned {} files: {} records, {} failed",
            report.summary.files,
            report.summary.records,
            report.summary.failed
        );
        report
    }

    fn scan_one(&self, path: &Path, language: Option<Language>) -> FileScan {
        let file_path = path.display().to_string();
        match self.try_scan_file(path, &file_path, language) {
            Ok(records) => FileScan::Ok(records),
            Err(err) => {
                log::warn!("{file_path}: {err}");
                FileScan::Error(ScanErrorEntry::new(file_path, &err))
            }
        }
    }

    fn try_scan_file(
        &self,
        path: &Path,
        file_path: &str,
        language: Option<Language>,
    ) -> Result<FileRecords> {
        let source = read_source(path)?;
        let language = match language {
            Some(language) => language,
            None => Language::from_path(path)?,
        };
        log::debug!("Scanning {file_path} as {language}");

        let records = self.scan_source(&source, file_path, language)?;
        Ok(FileRecords {
            file_path: file_path.to_string(),
            language,
            records,
        })
    }
}

fn read_source(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => ScanError::FileNotFound(path.to_path_buf()),
        _ => ScanError::IoError(err),
    })?;
    String::from_utf8(bytes).map_err(|err| {
        ScanError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    })
}

/// Directories become their discovered sources of `languages`; everything else passes through
fn expand_paths<P: AsRef<Path>>(paths: &[P], languages: &[Language]) -> Vec<PathBuf> {
    let mut expanded = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            expanded.extend(
                SourceDiscovery::new(path)
                    .with_languages(languages.iter().copied())
                    .discover(),
            );
        } else {
            expanded.push(path.to_path_buf());
        }
    }
    expanded
}
