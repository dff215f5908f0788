//! Language rules and their persisted store
//!
//! A rule maps a language name to the regular expression used to find its
//! dependency identifiers and to the manifest file those identifiers are
//! written into. Rules live in a JSON document shaped like:
//!
//! ```json
//! {
//!     "language_rules": {
//!         "go": { "manifest": "go.deps.txt", "pattern": "github.com/\\S+" }
//!     }
//! }
//! ```

mod store;

pub use store::{RuleStore, RuleStoreError, DEFAULT_RULES_PATH};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Detection rule for one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Language key, unique within a store
    #[serde(skip)]
    pub language: String,

    /// Regular expression applied to file contents
    pub pattern: String,

    /// File name of the manifest written into the project root
    #[serde(rename = "manifest")]
    pub manifest_filename: String,
}

impl Rule {
    pub fn new(
        language: impl Into<String>,
        manifest_filename: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            pattern: pattern.into(),
            manifest_filename: manifest_filename.into(),
        }
    }
}

/// Rules keyed by language, iterated in language order
pub type RuleSet = BTreeMap<String, Rule>;
