//! Configuration management for depmint
//!
//! Settings are loaded from environment variables with sensible defaults.
//! Command-line flags take precedence and are applied on top by the CLI.
//!
//! # Environment Variables
//!
//! - `DEPMINT_RULES_PATH`: Rule file location - default: "memory/knowledge_base.json"
//! - `DEPMINT_LOG_LEVEL`: Logging level - default: "info"
//! - `DEPMINT_MAX_DEPTH`: Maximum directory depth to scan - default: unlimited
//! - `DEPMINT_MAX_FILE_SIZE`: Skip files larger than this many bytes - default: unlimited
//! - `DEPMINT_RESPECT_GITIGNORE`: Honour `.gitignore` files (true|false) - default: "false"
//! - `DEPMINT_SKIP_HIDDEN`: Skip dot-files and dot-directories (true|false) - default: "false"
//!
//! The optional assistant is configured separately, see [`crate::assistant`].
//!
//! # Example
//!
//! ```no_run
//! use depmint::DepmintConfig;
//!
//! let config = DepmintConfig::default();
//! config.validate().expect("Invalid configuration");
//! let scan = config.scan_config();
//! ```

use crate::rules::DEFAULT_RULES_PATH;
use crate::scanner::ScanConfig;
use std::env;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepmintConfig {
    /// Location of the persisted rule file
    pub rules_path: PathBuf,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Maximum scan depth, `None` for unlimited
    pub max_depth: Option<usize>,

    /// Files above this size in bytes are not scanned
    pub max_file_size: Option<u64>,

    pub respect_gitignore: bool,

    pub skip_hidden: bool,
}

impl Default for DepmintConfig {
    /// Loads the configuration from `DEPMINT_*` variables. A variable that is
    /// missing or fails to parse falls back to its own default; the others
    /// are still taken from the environment.
    fn default() -> Self {
        let defaults = Self::defaults();

        Self {
            rules_path: rules_path_from_env().unwrap_or(defaults.rules_path),
            log_level: log_level_from_env(),
            max_depth: parse_var_lenient("DEPMINT_MAX_DEPTH").or(defaults.max_depth),
            max_file_size: parse_var_lenient("DEPMINT_MAX_FILE_SIZE").or(defaults.max_file_size),
            respect_gitignore: parse_var_lenient("DEPMINT_RESPECT_GITIGNORE")
                .unwrap_or(defaults.respect_gitignore),
            skip_hidden: parse_var_lenient("DEPMINT_SKIP_HIDDEN").unwrap_or(defaults.skip_hidden),
        }
    }
}

impl DepmintConfig {
    /// Built-in defaults, ignoring the environment
    pub fn defaults() -> Self {
        Self {
            rules_path: PathBuf::from(DEFAULT_RULES_PATH),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            max_depth: None,
            max_file_size: None,
            respect_gitignore: false,
            skip_hidden: false,
        }
    }

    /// Loads from the environment, reporting the first value that fails to parse
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::defaults();

        Ok(Self {
            rules_path: rules_path_from_env().unwrap_or(defaults.rules_path),
            log_level: log_level_from_env(),
            max_depth: parse_var("DEPMINT_MAX_DEPTH")?,
            max_file_size: parse_var("DEPMINT_MAX_FILE_SIZE")?,
            respect_gitignore: parse_var("DEPMINT_RESPECT_GITIGNORE")?
                .unwrap_or(defaults.respect_gitignore),
            skip_hidden: parse_var("DEPMINT_SKIP_HIDDEN")?.unwrap_or(defaults.skip_hidden),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == Some(0) {
            return Err(ConfigError::ValidationFailed(
                "Max depth must be at least 1".to_string(),
            ));
        }

        if self.max_file_size == Some(0) {
            return Err(ConfigError::ValidationFailed(
                "Max file size must be at least 1 byte".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            max_depth: self.max_depth,
            respect_gitignore: self.respect_gitignore,
            max_file_size: self.max_file_size,
            skip_hidden: self.skip_hidden,
        }
    }
}

fn rules_path_from_env() -> Option<PathBuf> {
    env::var("DEPMINT_RULES_PATH")
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn log_level_from_env() -> String {
    env::var("DEPMINT_LOG_LEVEL")
        .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
        .to_lowercase()
}

/// Like [`parse_var`], but an unparsable value is logged and treated as unset
fn parse_var_lenient<T>(name: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    parse_var(name).unwrap_or_else(|e| {
        warn!("{}, using default", e);
        None
    })
}

fn parse_var<T>(name: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse::<T>()
                .map(Some)
                .map_err(|e| ConfigError::ParseError {
                    field: name.to_string(),
                    error: e.to_string(),
                })
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "DEPMINT_RULES_PATH",
        "DEPMINT_LOG_LEVEL",
        "DEPMINT_MAX_DEPTH",
        "DEPMINT_MAX_FILE_SIZE",
        "DEPMINT_RESPECT_GITIGNORE",
        "DEPMINT_SKIP_HIDDEN",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_default_config() {
        clear_env();
        let config = DepmintConfig::default();

        assert_eq!(config.rules_path, PathBuf::from("memory/knowledge_base.json"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.max_depth, None);
        assert!(!config.respect_gitignore);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        clear_env();
        env::set_var("DEPMINT_RULES_PATH", "/tmp/rules.json");
        env::set_var("DEPMINT_LOG_LEVEL", "DEBUG");
        env::set_var("DEPMINT_MAX_DEPTH", "4");
        env::set_var("DEPMINT_MAX_FILE_SIZE", "2048");
        env::set_var("DEPMINT_RESPECT_GITIGNORE", "true");

        let config = DepmintConfig::from_env().unwrap();
        assert_eq!(config.rules_path, PathBuf::from("/tmp/rules.json"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.max_depth, Some(4));
        assert_eq!(config.max_file_size, Some(2048));
        assert!(config.respect_gitignore);
        assert!(!config.skip_hidden);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_unparsable_value_is_reported() {
        clear_env();
        env::set_var("DEPMINT_MAX_DEPTH", "deep");

        match DepmintConfig::from_env() {
            Err(ConfigError::ParseError { field, .. }) => assert_eq!(field, "DEPMINT_MAX_DEPTH"),
            other => panic!("Expected ParseError, got {:?}", other),
        }

        clear_env();
    }

    #[test]
    #[serial]
    fn test_default_falls_back_per_variable() {
        clear_env();
        env::set_var("DEPMINT_RULES_PATH", "/tmp/custom_rules.json");
        env::set_var("DEPMINT_MAX_DEPTH", "deep");
        env::set_var("DEPMINT_MAX_FILE_SIZE", "4096");
        env::set_var("DEPMINT_SKIP_HIDDEN", "maybe");

        let config = DepmintConfig::default();
        assert_eq!(config.rules_path, PathBuf::from("/tmp/custom_rules.json"));
        assert_eq!(config.max_depth, None);
        assert_eq!(config.max_file_size, Some(4096));
        assert!(!config.skip_hidden);

        clear_env();
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = DepmintConfig::defaults();
        config.max_depth = Some(0);
        assert!(config.validate().is_err());

        let mut config = DepmintConfig::defaults();
        config.max_file_size = Some(0);
        assert!(config.validate().is_err());

        let mut config = DepmintConfig::defaults();
        config.log_level = "loud".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_scan_config_mapping() {
        let config = DepmintConfig {
            max_depth: Some(3),
            max_file_size: Some(100),
            respect_gitignore: true,
            skip_hidden: true,
            ..DepmintConfig::defaults()
        };

        let scan = config.scan_config();
        assert_eq!(scan.max_depth, Some(3));
        assert_eq!(scan.max_file_size, Some(100));
        assert!(scan.respect_gitignore);
        assert!(scan.skip_hidden);
    }
}
