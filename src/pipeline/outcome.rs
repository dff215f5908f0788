use crate::manifest::ManifestWriteReport;
use crate::scanner::{AggregatedResults, ScanDiagnostic, ScanSummary};
use std::fmt;
use std::path::PathBuf;

/// Why a pipeline run stopped before completing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// No language rules are configured
    NoRules,
    /// The scan found nothing; a normal stop
    NoDependencies,
    /// A manifest is missing or empty after writing
    ManifestVerificationFailed {
        language: String,
        path: Option<PathBuf>,
    },
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::NoRules => write!(f, "no rules"),
            AbortReason::NoDependencies => write!(f, "no dependencies found"),
            AbortReason::ManifestVerificationFailed {
                language,
                path: Some(path),
            } => write!(
                f,
                "manifest verification failed for '{}': {}",
                language,
                path.display()
            ),
            AbortReason::ManifestVerificationFailed {
                language,
                path: None,
            } => write!(
                f,
                "manifest verification failed for '{}': no manifest rule",
                language
            ),
        }
    }
}

/// Terminal state of a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Completed { manifests: Vec<PathBuf> },
    Aborted(AbortReason),
}

impl PipelineOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, PipelineOutcome::Completed { .. })
    }

    /// Process exit code: 0 for completion and for the "nothing found" stop
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineOutcome::Completed { .. } => 0,
            PipelineOutcome::Aborted(AbortReason::NoDependencies) => 0,
            PipelineOutcome::Aborted(_) => 1,
        }
    }
}

/// Everything a pipeline run produced
#[derive(Debug)]
pub struct PipelineReport {
    pub outcome: PipelineOutcome,
    pub results: AggregatedResults,
    pub summary: ScanSummary,
    pub diagnostics: Vec<ScanDiagnostic>,
    /// `None` when the run stopped before writing
    pub write_report: Option<ManifestWriteReport>,
}
