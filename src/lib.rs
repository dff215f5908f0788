//! depmint - rule-driven dependency scanning and manifest generation
//!
//! depmint walks a project tree, applies one regular expression per language
//! to every file and collects the dependency identifiers it finds. Each
//! language with findings gets a manifest file in the project root, which is
//! then checked on disk before the run is reported as complete.
//!
//! # Core Concepts
//!
//! - **Rules**: per-language pattern and manifest filename, persisted as JSON
//!   by [`RuleStore`]
//! - **Scan**: [`DependencyScanner`] aggregates unique findings per language
//!   in first-seen order
//! - **Pipeline**: [`PipelineOrchestrator`] runs scan, verify, write and
//!   verify again, ending in a [`PipelineOutcome`]
//!
//! # Example Usage
//!
//! ```no_run
//! use depmint::{PipelineOrchestrator, PipelineOutcome, RuleStore};
//! use std::path::Path;
//!
//! let mut store = RuleStore::load("memory/knowledge_base.json")?;
//! store.add_rule("go", "go.deps.txt", r"github.com/\S+")?;
//!
//! let report = PipelineOrchestrator::new(&store).execute(Path::new("./my-project"));
//! if let PipelineOutcome::Completed { manifests } = &report.outcome {
//!     println!("Wrote {} manifest(s)", manifests.len());
//! }
//! # Ok::<(), depmint::RuleStoreError>(())
//! ```
//!
//! # Project Structure
//!
//! - [`rules`]: rule type and JSON-backed store
//! - [`scanner`]: tree walk and pattern matching
//! - [`manifest`]: manifest rendering and writing
//! - [`verify`]: post-condition checks
//! - [`pipeline`]: run sequencing and outcomes

pub mod assistant;
pub mod cli;
pub mod config;
pub mod manifest;
pub mod pipeline;
pub mod progress;
pub mod rules;
pub mod scanner;
pub mod util;
pub mod verify;

pub use assistant::AssistantSettings;
pub use config::{ConfigError, DepmintConfig};
pub use manifest::{ManifestError, ManifestFormat, ManifestWriteReport, ManifestWriter};
pub use pipeline::{AbortReason, PipelineOrchestrator, PipelineOutcome, PipelineReport};
pub use progress::{LoggingHandler, NoOpHandler, ProgressEvent, ProgressHandler};
pub use rules::{Rule, RuleSet, RuleStore, RuleStoreError};
pub use scanner::{AggregatedResults, DependencyScanner, ScanConfig, ScanDiagnostic, ScanSummary};
pub use util::{init_from_env, init_logging, LoggingConfig};
pub use verify::Verifier;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
