//! Compiled form of a rule's pattern
//!
//! All calls into the regex engine go through this module so that a bad
//! user-supplied pattern turns into a [`PatternError`] for that one rule.

use crate::rules::Rule;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid pattern for language '{language}': {message}")]
pub struct PatternError {
    pub language: String,
    pub pattern: String,
    pub message: String,
}

/// A rule whose pattern compiled successfully
#[derive(Debug, Clone)]
pub struct CompiledRule {
    language: String,
    regex: Regex,
    use_group: bool,
}

impl CompiledRule {
    pub fn compile(rule: &Rule) -> Result<Self, PatternError> {
        let regex = Regex::new(&rule.pattern).map_err(|e| PatternError {
            language: rule.language.clone(),
            pattern: rule.pattern.clone(),
            message: e.to_string(),
        })?;

        // captures_len counts the implicit whole-match group
        let use_group = regex.captures_len() > 1;

        Ok(Self {
            language: rule.language.clone(),
            regex,
            use_group,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Identifiers in `content`, in match order, duplicates included.
    ///
    /// Without capture groups the whole match is the identifier. With groups,
    /// group 1 is; matches where it did not take part are skipped. Empty
    /// identifiers are never returned.
    pub fn extract<'a>(&'a self, content: &'a str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        if self.use_group {
            Box::new(
                self.regex
                    .captures_iter(content)
                    .filter_map(|caps| caps.get(1))
                    .map(|m| m.as_str())
                    .filter(|s| !s.is_empty()),
            )
        } else {
            Box::new(
                self.regex
                    .find_iter(content)
                    .map(|m| m.as_str())
                    .filter(|s| !s.is_empty()),
            )
        }
    }
}
