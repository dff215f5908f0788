//! Manifest rendering and writing
//!
//! Each language with findings gets one file in the project root, named by
//! its rule. The file name also picks the rendering: `Cargo.toml` becomes a
//! `[dependencies]` table, everything else is one identifier per line.

use crate::rules::{Rule, RuleSet};
use crate::scanner::AggregatedResults;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to write manifest {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Manifest filename '{0}' would be written outside the project root")]
    UnsafeFilename(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// `[dependencies]` table with wildcard versions
    CargoToml,
    /// One identifier per line
    PlainText,
}

impl ManifestFormat {
    pub fn for_filename(filename: &str) -> Self {
        if filename == "Cargo.toml" {
            ManifestFormat::CargoToml
        } else {
            // `.txt` and unknown extensions share the line-per-dependency layout
            ManifestFormat::PlainText
        }
    }

    pub fn render(&self, dependencies: &[String]) -> String {
        match self {
            ManifestFormat::CargoToml => {
                let lines: Vec<String> = dependencies
                    .iter()
                    .map(|dep| format!("{} = \"*\"", dep))
                    .collect();
                format!("[dependencies]\n{}", lines.join("\n"))
            }
            ManifestFormat::PlainText => dependencies.join("\n"),
        }
    }
}

/// Where the manifest for `rule` lives under `project_root`
pub fn manifest_path(project_root: &Path, rule: &Rule) -> PathBuf {
    project_root.join(&rule.manifest_filename)
}

#[derive(Debug, Default)]
pub struct ManifestWriteReport {
    pub written: Vec<PathBuf>,
    /// Languages with findings but no rule
    pub skipped: Vec<String>,
    pub failed: Vec<(String, ManifestError)>,
}

impl ManifestWriteReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ManifestWriter;

impl ManifestWriter {
    pub fn new() -> Self {
        Self
    }

    /// Writes one manifest per language in `results`.
    ///
    /// Missing rules and failed writes are logged and recorded in the report;
    /// they never stop the remaining languages from being written.
    pub fn write_manifests(
        &self,
        project_root: &Path,
        results: &AggregatedResults,
        rules: &RuleSet,
    ) -> ManifestWriteReport {
        let mut report = ManifestWriteReport::default();

        for (language, dependencies) in results.iter() {
            let Some(rule) = rules.get(language) else {
                warn!(language, "No manifest rule for language, skipping");
                report.skipped.push(language.to_string());
                continue;
            };

            match self.write_one(project_root, rule, dependencies) {
                Ok(path) => {
                    info!(language, path = %path.display(), dependencies = dependencies.len(), "Wrote manifest");
                    report.written.push(path);
                }
                Err(err) => {
                    warn!(language, error = %err, "Failed to write manifest");
                    report.failed.push((language.to_string(), err));
                }
            }
        }

        report
    }

    fn write_one(
        &self,
        project_root: &Path,
        rule: &Rule,
        dependencies: &[String],
    ) -> Result<PathBuf, ManifestError> {
        if !is_contained(&rule.manifest_filename) {
            return Err(ManifestError::UnsafeFilename(rule.manifest_filename.clone()));
        }

        let path = manifest_path(project_root, rule);
        let format = ManifestFormat::for_filename(&rule.manifest_filename);
        let content = format.render(dependencies);

        debug!(path = %path.display(), ?format, "Rendering manifest");

        fs::write(&path, content).map_err(|source| ManifestError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

fn is_contained(filename: &str) -> bool {
    let path = Path::new(filename);
    !filename.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
