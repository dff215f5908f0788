//! Rule-driven dependency scanning
//!
//! [`DependencyScanner`] walks a project tree, runs every language rule over
//! the text of every regular file and collects the identifiers it finds.
//! Identifiers are deduplicated per language and keep the order in which they
//! were first seen. Traversal is sorted by file name, so scanning an unchanged
//! tree with unchanged rules always yields the same [`AggregatedResults`].

pub mod matcher;

pub use matcher::{CompiledRule, PatternError};

use crate::rules::RuleSet;
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Maximum directory depth, `None` for unlimited
    pub max_depth: Option<usize>,
    /// Honour `.gitignore`/`.ignore` files while walking
    pub respect_gitignore: bool,
    /// Files larger than this many bytes are skipped
    pub max_file_size: Option<u64>,
    /// Skip dot-files and dot-directories
    pub skip_hidden: bool,
}

/// Dependencies found per language, each list unique and in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregatedResults(BTreeMap<String, Vec<String>>);

impl AggregatedResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, language: &str) -> Option<&[String]> {
        self.0.get(language).map(Vec::as_slice)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of languages with at least one dependency
    pub fn len(&self) -> usize {
        self.0.values().filter(|deps| !deps.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_dependencies(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

impl FromIterator<(String, Vec<String>)> for AggregatedResults {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Accumulates findings while a scan runs
#[derive(Default)]
struct Accumulator {
    results: BTreeMap<String, Vec<String>>,
    seen: HashMap<String, HashSet<String>>,
}

impl Accumulator {
    /// Records `dependency` for `language`, returning false for a duplicate
    fn record(&mut self, language: &str, dependency: &str) -> bool {
        let seen = self.seen.entry(language.to_string()).or_default();
        if !seen.insert(dependency.to_string()) {
            return false;
        }
        self.results
            .entry(language.to_string())
            .or_default()
            .push(dependency.to_string());
        true
    }

    fn finish(self) -> AggregatedResults {
        AggregatedResults(self.results)
    }
}

/// A non-fatal problem recorded during a scan
#[derive(Debug, Clone, Error)]
pub enum ScanDiagnostic {
    #[error(transparent)]
    InvalidPattern(#[from] PatternError),

    #[error("Failed to read file {path}: {error}")]
    UnreadableFile { path: PathBuf, error: String },

    #[error("Failed to read directory entry: {message}")]
    WalkError { message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub unreadable_files: usize,
    pub scan_time_ms: u64,
}

pub struct DependencyScanner<'a> {
    rules: &'a RuleSet,
    config: ScanConfig,
    results: AggregatedResults,
    diagnostics: Vec<ScanDiagnostic>,
    summary: ScanSummary,
}

impl<'a> DependencyScanner<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self {
            rules,
            config: ScanConfig::default(),
            results: AggregatedResults::default(),
            diagnostics: Vec::new(),
            summary: ScanSummary::default(),
        }
    }

    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    /// Scans `root` recursively.
    ///
    /// Returns false without touching the filesystem when there are no rules.
    /// Otherwise returns true once the walk finishes, whatever was found;
    /// unreadable files and invalid patterns end up in [`Self::diagnostics`].
    pub fn analyze(&mut self, root: &Path) -> bool {
        self.results = AggregatedResults::default();
        self.diagnostics.clear();
        self.summary = ScanSummary::default();

        if self.rules.is_empty() {
            warn!("No language rules configured, nothing to scan for");
            return false;
        }

        let start = Instant::now();
        info!(
            repo = %root.display(),
            rules = self.rules.len(),
            "Starting dependency scan"
        );

        let compiled = self.compile_rules();
        let mut acc = Accumulator::default();

        for entry in self.walker(root) {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    warn!(error = %err, "Failed to read directory entry");
                    self.diagnostics.push(ScanDiagnostic::WalkError {
                        message: err.to_string(),
                    });
                    continue;
                }
            };

            let Some(file_type) = entry.file_type() else {
                continue;
            };
            let path = entry.path();

            // Links to files are read through; links to directories are not walked
            let size = if file_type.is_symlink() {
                match fs::metadata(path) {
                    Ok(meta) if meta.is_file() => Some(meta.len()),
                    Ok(_) => continue,
                    Err(err) => {
                        warn!(path = %path.display(), error = %err, "Broken symlink");
                        self.summary.unreadable_files += 1;
                        self.diagnostics.push(ScanDiagnostic::UnreadableFile {
                            path: path.to_path_buf(),
                            error: err.to_string(),
                        });
                        continue;
                    }
                }
            } else if file_type.is_file() {
                entry.metadata().ok().map(|meta| meta.len())
            } else {
                continue;
            };

            if let (Some(limit), Some(size)) = (self.config.max_file_size, size) {
                if size > limit {
                    debug!(path = %path.display(), size, limit, "Skipping large file");
                    self.summary.files_skipped += 1;
                    continue;
                }
            }

            let content = match fs::read(path) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Failed to read file");
                    self.summary.unreadable_files += 1;
                    self.diagnostics.push(ScanDiagnostic::UnreadableFile {
                        path: path.to_path_buf(),
                        error: err.to_string(),
                    });
                    continue;
                }
            };
            self.summary.files_scanned += 1;

            for rule in &compiled {
                for dependency in rule.extract(&content) {
                    if acc.record(rule.language(), dependency) {
                        debug!(
                            language = rule.language(),
                            dependency,
                            file = %path.display(),
                            "Found dependency"
                        );
                    }
                }
            }
        }

        self.results = acc.finish();
        self.summary.scan_time_ms = elapsed_ms(start.elapsed());

        if self.results.is_empty() {
            info!(
                files_scanned = self.summary.files_scanned,
                "Scan completed without dependencies"
            );
        } else {
            for (language, deps) in self.results.iter() {
                info!(language, dependencies = %deps.join(", "), "Dependencies found");
            }
            info!(
                languages = self.results.len(),
                dependencies = self.results.total_dependencies(),
                files_scanned = self.summary.files_scanned,
                scan_time_ms = self.summary.scan_time_ms,
                "Dependency scan completed"
            );
        }

        true
    }

    pub fn get_results(&self) -> &AggregatedResults {
        &self.results
    }

    pub fn into_results(self) -> AggregatedResults {
        self.results
    }

    pub fn diagnostics(&self) -> &[ScanDiagnostic] {
        &self.diagnostics
    }

    pub fn summary(&self) -> &ScanSummary {
        &self.summary
    }

    fn compile_rules(&mut self) -> Vec<CompiledRule> {
        let mut compiled = Vec::with_capacity(self.rules.len());
        for rule in self.rules.values() {
            match CompiledRule::compile(rule) {
                Ok(c) => compiled.push(c),
                Err(err) => {
                    warn!(
                        language = %err.language,
                        pattern = %err.pattern,
                        error = %err.message,
                        "Skipping rule with invalid pattern"
                    );
                    self.diagnostics.push(err.into());
                }
            }
        }
        compiled
    }

    fn walker(&self, root: &Path) -> ignore::Walk {
        let respect = self.config.respect_gitignore;
        WalkBuilder::new(root)
            .standard_filters(false)
            .hidden(self.config.skip_hidden)
            .git_ignore(respect)
            .git_exclude(respect)
            .ignore(respect)
            .require_git(false)
            .follow_links(false)
            .max_depth(self.config.max_depth)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build()
    }
}

/// Whole milliseconds in `elapsed`, saturating at `u64::MAX`
fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
