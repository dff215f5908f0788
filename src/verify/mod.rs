//! Post-condition checks used between pipeline stages
//!
//! Every check answers with a plain `bool` and logs why it failed; none of
//! them returns an error.

use crate::scanner::AggregatedResults;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Default, Clone, Copy)]
pub struct Verifier;

impl Verifier {
    pub fn new() -> Self {
        Self
    }

    /// True when `path` is a regular file holding at least one byte
    pub fn file_exists_and_nonempty(&self, path: &Path) -> bool {
        let meta = match fs::metadata(path) {
            Ok(m) if m.is_file() => m,
            _ => {
                warn!(path = %path.display(), "File does not exist or is not a regular file");
                return false;
            }
        };

        if meta.len() == 0 {
            warn!(path = %path.display(), "File is empty");
            return false;
        }

        true
    }

    /// True when at least one language has at least one dependency
    pub fn has_results(&self, results: &AggregatedResults) -> bool {
        if results.is_empty() {
            warn!("Dependency scan produced no results");
            return false;
        }
        true
    }

    /// True when `path` reads as text and contains every keyword
    pub fn content_contains_all<S: AsRef<str>>(&self, path: &Path, keywords: &[S]) -> bool {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Failed to read file for content check");
                return false;
            }
        };

        let missing = keywords
            .iter()
            .map(AsRef::<str>::as_ref)
            .find(|k| !content.contains(*k));

        match missing {
            Some(keyword) => {
                warn!(path = %path.display(), keyword, "Required keyword missing");
                false
            }
            None => true,
        }
    }
}
