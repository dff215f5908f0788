use super::outcome::{AbortReason, PipelineOutcome, PipelineReport};
use crate::assistant::AssistantSettings;
use crate::manifest::{manifest_path, ManifestWriteReport, ManifestWriter};
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use crate::rules::RuleStore;
use crate::scanner::{AggregatedResults, DependencyScanner, ScanConfig};
use crate::verify::Verifier;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Runs scan → verify → write → verify over one project
///
/// Every stop is reported through [`PipelineOutcome`]; nothing here is
/// retried and no stage failure is returned as an error.
pub struct PipelineOrchestrator<'a> {
    store: &'a RuleStore,
    scan_config: ScanConfig,
    writer: ManifestWriter,
    verifier: Verifier,
    progress_handler: Box<dyn ProgressHandler + 'a>,
    assistant: Option<AssistantSettings>,
}

impl<'a> PipelineOrchestrator<'a> {
    pub fn new(store: &'a RuleStore) -> Self {
        Self {
            store,
            scan_config: ScanConfig::default(),
            writer: ManifestWriter::new(),
            verifier: Verifier::new(),
            progress_handler: Box::new(NoOpHandler),
            assistant: None,
        }
    }

    pub fn with_scan_config(mut self, config: ScanConfig) -> Self {
        self.scan_config = config;
        self
    }

    pub fn with_progress(mut self, handler: impl ProgressHandler + 'a) -> Self {
        self.progress_handler = Box::new(handler);
        self
    }

    pub fn with_assistant(mut self, assistant: Option<AssistantSettings>) -> Self {
        self.assistant = assistant;
        self
    }

    pub fn assistant(&self) -> Option<&AssistantSettings> {
        self.assistant.as_ref()
    }

    pub fn execute(&self, project_root: &Path) -> PipelineReport {
        let start = Instant::now();
        info!(
            repo = %project_root.display(),
            assistant = self.assistant.is_some(),
            "Starting pipeline"
        );
        self.emit(ProgressEvent::Started {
            repo_path: project_root.display().to_string(),
        });

        let rules = self.store.get_rules();
        let mut scanner = DependencyScanner::new(rules).with_config(self.scan_config.clone());

        if !scanner.analyze(project_root) {
            return self.finish(start, PipelineOutcome::Aborted(AbortReason::NoRules), scanner, None);
        }

        let summary = scanner.summary().clone();
        let results = scanner.get_results();
        self.emit(ProgressEvent::ScanComplete {
            languages: results.len(),
            dependencies: results.total_dependencies(),
            files_scanned: summary.files_scanned,
            scan_time: Duration::from_millis(summary.scan_time_ms),
        });

        if !self.verifier.has_results(results) {
            return self.finish(
                start,
                PipelineOutcome::Aborted(AbortReason::NoDependencies),
                scanner,
                None,
            );
        }
        debug!("Scan results verified");

        let write_report = self.writer.write_manifests(project_root, results, rules);
        self.emit(ProgressEvent::ManifestsWritten {
            written: write_report.written.len(),
            skipped: write_report.skipped.len(),
            failed: write_report.failed.len(),
        });

        let outcome = self.verify_manifests(project_root, results);
        self.finish(start, outcome, scanner, Some(write_report))
    }

    fn verify_manifests(&self, project_root: &Path, results: &AggregatedResults) -> PipelineOutcome {
        let mut manifests = Vec::new();

        for language in results.languages() {
            let Some(rule) = self.store.get_rule(language) else {
                self.emit(ProgressEvent::VerificationFailed {
                    language: language.to_string(),
                    path: String::new(),
                });
                return PipelineOutcome::Aborted(AbortReason::ManifestVerificationFailed {
                    language: language.to_string(),
                    path: None,
                });
            };

            let path = manifest_path(project_root, rule);
            if !self.verifier.file_exists_and_nonempty(&path) {
                self.emit(ProgressEvent::VerificationFailed {
                    language: language.to_string(),
                    path: path.display().to_string(),
                });
                return PipelineOutcome::Aborted(AbortReason::ManifestVerificationFailed {
                    language: language.to_string(),
                    path: Some(path),
                });
            }
            manifests.push(path);
        }

        debug!(manifests = manifests.len(), "Manifests verified");
        PipelineOutcome::Completed { manifests }
    }

    fn finish(
        &self,
        start: Instant,
        outcome: PipelineOutcome,
        scanner: DependencyScanner<'_>,
        write_report: Option<ManifestWriteReport>,
    ) -> PipelineReport {
        match &outcome {
            PipelineOutcome::Completed { manifests } => self.emit(ProgressEvent::Completed {
                manifests: manifests.len(),
                total_time: start.elapsed(),
            }),
            PipelineOutcome::Aborted(reason) => self.emit(ProgressEvent::Aborted {
                reason: reason.to_string(),
            }),
        }

        let summary = scanner.summary().clone();
        let diagnostics = scanner.diagnostics().to_vec();

        PipelineReport {
            outcome,
            results: scanner.into_results(),
            summary,
            diagnostics,
            write_report,
        }
    }

    fn emit(&self, event: ProgressEvent) {
        self.progress_handler.on_progress(&event);
    }
}
