//! Progress handler trait and events

use std::time::Duration;

/// Events emitted while the pipeline runs
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Pipeline started
    Started { repo_path: String },

    /// Dependency scan finished
    ScanComplete {
        languages: usize,
        dependencies: usize,
        files_scanned: usize,
        scan_time: Duration,
    },

    /// Manifest writing finished
    ManifestsWritten {
        written: usize,
        skipped: usize,
        failed: usize,
    },

    /// A written manifest did not pass verification
    VerificationFailed { language: String, path: String },

    /// Pipeline completed
    Completed {
        manifests: usize,
        total_time: Duration,
    },

    /// Pipeline stopped early
    Aborted { reason: String },
}

/// Trait for handling progress events
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
