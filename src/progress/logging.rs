//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { repo_path } => {
                info!(repo = %repo_path, "Starting project initialization");
            }
            ProgressEvent::ScanComplete {
                languages,
                dependencies,
                files_scanned,
                scan_time,
            } => {
                info!(
                    languages,
                    dependencies,
                    files_scanned,
                    scan_time_ms = scan_time.as_millis(),
                    "Scan complete"
                );
            }
            ProgressEvent::ManifestsWritten {
                written,
                skipped,
                failed,
            } => {
                if *failed > 0 || *skipped > 0 {
                    warn!(written, skipped, failed, "Manifests written with problems");
                } else {
                    debug!(written, "Manifests written");
                }
            }
            ProgressEvent::VerificationFailed { language, path } => {
                warn!(language = %language, path = %path, "Manifest verification failed");
            }
            ProgressEvent::Completed {
                manifests,
                total_time,
            } => {
                info!(
                    manifests,
                    total_time_ms = total_time.as_millis(),
                    "Project initialization complete"
                );
            }
            ProgressEvent::Aborted { reason } => {
                info!(reason = %reason, "Project initialization stopped");
            }
        }
    }
}
