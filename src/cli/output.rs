//! Report formatting for the CLI
//!
//! Pipeline reports are rendered either as human-readable text or as JSON.
//! Both go to stdout; logging stays on stderr.

use crate::pipeline::{AbortReason, PipelineOutcome, PipelineReport};
use crate::rules::Rule;
use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// Human-readable formatted text
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_report(&self, project: &Path, report: &PipelineReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_report_json(project, report),
            OutputFormat::Human => Ok(self.format_report_human(project, report)),
        }
    }

    pub fn format_rule_added(&self, rule: &Rule, rules_path: &Path) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&json!({
                "language": rule.language,
                "manifest": rule.manifest_filename,
                "pattern": rule.pattern,
                "rules_path": rules_path.display().to_string(),
            }))
            .context("Failed to serialize rule to JSON"),
            OutputFormat::Human => Ok(format!(
                "Stored rule for '{}' (manifest: {}, pattern: {}) in {}",
                rule.language,
                rule.manifest_filename,
                rule.pattern,
                rules_path.display()
            )),
        }
    }

    fn format_report_json(&self, project: &Path, report: &PipelineReport) -> Result<String> {
        let (status, reason, manifests) = match &report.outcome {
            PipelineOutcome::Completed { manifests } => (
                "completed",
                None,
                manifests
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>(),
            ),
            PipelineOutcome::Aborted(reason) => ("aborted", Some(reason.to_string()), Vec::new()),
        };

        let write_failures: Vec<_> = report
            .write_report
            .iter()
            .flat_map(|w| w.failed.iter())
            .map(|(language, err)| json!({ "language": language, "error": err.to_string() }))
            .collect();

        let value = json!({
            "project": project.display().to_string(),
            "status": status,
            "reason": reason,
            "dependencies": report.results,
            "manifests": manifests,
            "scan": report.summary,
            "diagnostics": report
                .diagnostics
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>(),
            "write_failures": write_failures,
            "exit_code": report.outcome.exit_code(),
        });

        serde_json::to_string_pretty(&value).context("Failed to serialize report to JSON")
    }

    fn format_report_human(&self, project: &Path, report: &PipelineReport) -> String {
        let mut output = String::new();

        output.push_str(&format!("Project:  {}\n", project.display()));
        output.push_str(&format!(
            "Scanned:  {} file(s) in {} ms\n\n",
            report.summary.files_scanned, report.summary.scan_time_ms
        ));

        if !report.results.is_empty() {
            output.push_str("Dependencies:\n");
            for (language, deps) in report.results.iter() {
                output.push_str(&format!(
                    "  {} ({}): {}\n",
                    language,
                    deps.len(),
                    deps.join(", ")
                ));
            }
            output.push('\n');
        }

        if let PipelineOutcome::Completed { manifests } = &report.outcome {
            output.push_str("Manifests:\n");
            for path in manifests {
                output.push_str(&format!("  {}\n", path.display()));
            }
            output.push('\n');
        }

        let write_failures = report.write_report.iter().flat_map(|w| w.failed.iter());
        let mut warnings: Vec<String> = report.diagnostics.iter().map(|d| d.to_string()).collect();
        warnings.extend(write_failures.map(|(language, err)| format!("{}: {}", language, err)));
        if !warnings.is_empty() {
            output.push_str("Warnings:\n");
            for warning in &warnings {
                output.push_str(&format!("  - {}\n", warning));
            }
            output.push('\n');
        }

        let status = match &report.outcome {
            PipelineOutcome::Completed { .. } => "Project initialization completed".to_string(),
            PipelineOutcome::Aborted(AbortReason::NoDependencies) => {
                "No dependencies found, no manifests written".to_string()
            }
            PipelineOutcome::Aborted(AbortReason::NoRules) => {
                "No language rules configured; add one with `depmint config add-lang`".to_string()
            }
            PipelineOutcome::Aborted(reason) => format!("Stopped: {}", reason),
        };
        output.push_str(&status);
        output.push('\n');

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{AggregatedResults, ScanSummary};
    use std::path::PathBuf;

    fn completed_report() -> PipelineReport {
        PipelineReport {
            outcome: PipelineOutcome::Completed {
                manifests: vec![PathBuf::from("/p/go.deps.txt")],
            },
            results: [(
                "go".to_string(),
                vec![
                    "github.com/pkg/errors".to_string(),
                    "github.com/spf13/cobra".to_string(),
                ],
            )]
            .into_iter()
            .collect(),
            summary: ScanSummary {
                files_scanned: 3,
                ..Default::default()
            },
            diagnostics: vec![],
            write_report: None,
        }
    }

    #[test]
    fn test_human_completed() {
        let out = OutputFormatter::new(OutputFormat::Human)
            .format_report(Path::new("/p"), &completed_report())
            .unwrap();

        assert!(out.contains("Project:  /p"));
        assert!(out.contains("go (2): github.com/pkg/errors, github.com/spf13/cobra"));
        assert!(out.contains("/p/go.deps.txt"));
        assert!(out.contains("Project initialization completed"));
    }

    #[test]
    fn test_human_no_rules() {
        let report = PipelineReport {
            outcome: PipelineOutcome::Aborted(AbortReason::NoRules),
            results: AggregatedResults::new(),
            summary: ScanSummary::default(),
            diagnostics: vec![],
            write_report: None,
        };
        let out = OutputFormatter::new(OutputFormat::Human)
            .format_report(Path::new("/p"), &report)
            .unwrap();

        assert!(out.contains("No language rules configured"));
        assert!(!out.contains("Manifests:"));
    }

    #[test]
    fn test_json_completed() {
        let out = OutputFormatter::new(OutputFormat::Json)
            .format_report(Path::new("/p"), &completed_report())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["status"], "completed");
        assert_eq!(value["exit_code"], 0);
        assert_eq!(value["dependencies"]["go"][1], "github.com/spf13/cobra");
        assert_eq!(value["manifests"][0], "/p/go.deps.txt");
        assert_eq!(value["scan"]["files_scanned"], 3);
        assert!(value["reason"].is_null());
    }

    #[test]
    fn test_rule_added_human() {
        let rule = Rule::new("rust", "Cargo.toml", r"use (\w+)::");
        let out = OutputFormatter::new(OutputFormat::Human)
            .format_rule_added(&rule, Path::new("memory/knowledge_base.json"))
            .unwrap();

        assert!(out.contains("'rust'"));
        assert!(out.contains("Cargo.toml"));
    }
}
