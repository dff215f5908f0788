use super::{Rule, RuleSet};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

/// Location of the rule file relative to the working directory
pub const DEFAULT_RULES_PATH: &str = "memory/knowledge_base.json";

#[derive(Debug, Error)]
pub enum RuleStoreError {
    #[error("Rule file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to read rule file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write rule file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to serialize rules: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct KnowledgeDocument {
    #[serde(default)]
    language_rules: RuleSet,

    /// Other top-level keys are carried through untouched
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Persisted language rules
///
/// The store is loaded once and handed by reference to whoever needs the
/// rules. Every [`RuleStore::add_rule`] rewrites the whole file through a
/// temporary sibling that is renamed into place, so a reader never observes
/// a half-written document.
#[derive(Debug)]
pub struct RuleStore {
    path: PathBuf,
    document: KnowledgeDocument,
}

impl RuleStore {
    /// Loads the store from `path`, starting empty when the file is absent.
    ///
    /// A file that exists but cannot be read or parsed is an error; the
    /// store never falls back to an empty rule set in that case.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, RuleStoreError> {
        let path = path.into();

        if !path.exists() {
            debug!(path = %path.display(), "No rule file found, starting with empty rules");
            return Ok(Self {
                path,
                document: KnowledgeDocument::default(),
            });
        }

        let raw = fs::read_to_string(&path).map_err(|source| RuleStoreError::Read {
            path: path.clone(),
            source,
        })?;

        let mut document: KnowledgeDocument =
            serde_json::from_str(&raw).map_err(|source| RuleStoreError::Corrupt {
                path: path.clone(),
                source,
            })?;

        for (language, rule) in document.language_rules.iter_mut() {
            rule.language = language.clone();
        }

        debug!(
            path = %path.display(),
            rules = document.language_rules.len(),
            "Loaded rule file"
        );

        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_rules(&self) -> &RuleSet {
        &self.document.language_rules
    }

    pub fn get_rule(&self, language: &str) -> Option<&Rule> {
        self.document.language_rules.get(language)
    }

    pub fn is_empty(&self) -> bool {
        self.document.language_rules.is_empty()
    }

    /// Inserts or replaces the rule for `language` and persists the store.
    ///
    /// The pattern is stored as given; it is only compiled when a scan uses
    /// it. If persisting fails the in-memory rules are left as they were.
    pub fn add_rule(
        &mut self,
        language: &str,
        manifest_filename: &str,
        pattern: &str,
    ) -> Result<(), RuleStoreError> {
        let rule = Rule::new(language, manifest_filename, pattern);
        let previous = self
            .document
            .language_rules
            .insert(language.to_string(), rule);

        if let Err(e) = self.save() {
            match previous {
                Some(old) => self.document.language_rules.insert(language.to_string(), old),
                None => self.document.language_rules.remove(language),
            };
            return Err(e);
        }

        info!(
            language,
            manifest = manifest_filename,
            pattern,
            path = %self.path.display(),
            "Stored language rule"
        );
        Ok(())
    }

    fn save(&self) -> Result<(), RuleStoreError> {
        let content = self.render()?;
        let write_err = |source: io::Error| RuleStoreError::Write {
            path: self.path.clone(),
            source,
        };

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(write_err)?;

        let mut staging = NamedTempFile::new_in(&parent).map_err(write_err)?;
        staging.write_all(content.as_bytes()).map_err(write_err)?;
        staging.as_file().sync_all().map_err(write_err)?;
        staging
            .persist(&self.path)
            .map_err(|e| write_err(e.error))?;

        debug!(path = %self.path.display(), "Rule file written");
        Ok(())
    }

    fn render(&self) -> Result<String, RuleStoreError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.document.serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
