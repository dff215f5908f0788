//! End-to-end integration tests
//!
//! Drives the library the way the CLI does:
//! - Rule persistence across store loads
//! - Scanning and aggregation
//! - Manifest writing and verification
//! - Pipeline outcomes

use depmint::{
    AbortReason, DependencyScanner, ManifestWriter, PipelineOrchestrator, PipelineOutcome, Rule,
    RuleSet, RuleStore, ScanDiagnostic, Verifier,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn rule_set(rules: &[(&str, &str, &str)]) -> RuleSet {
    rules
        .iter()
        .map(|(lang, manifest, pattern)| (lang.to_string(), Rule::new(*lang, *manifest, *pattern)))
        .collect()
}

/// Helper function to create a mixed-language project
fn create_mixed_project(dir: &TempDir) -> PathBuf {
    let path = dir.path().to_path_buf();

    fs::create_dir(path.join("src")).unwrap();
    fs::create_dir(path.join("scripts")).unwrap();

    fs::write(
        path.join("src/main.rs"),
        "use serde::Serialize;\nuse anyhow::Result;\nuse serde::Deserialize;\n",
    )
    .unwrap();
    fs::write(path.join("src/lib.rs"), "use tracing::info;\n").unwrap();
    fs::write(
        path.join("scripts/fetch.py"),
        "import requests\nimport yaml\n",
    )
    .unwrap();

    path
}

#[test]
fn test_rules_survive_reload() {
    let dir = TempDir::new().unwrap();
    let rules_path = dir.path().join("memory/knowledge_base.json");

    let mut store = RuleStore::load(&rules_path).unwrap();
    assert!(store.is_empty());
    store.add_rule("go", "go.deps.txt", r"github.com/\S+").unwrap();
    store.add_rule("python", "requirements.txt", r"import (\w+)").unwrap();

    let reloaded = RuleStore::load(&rules_path).unwrap();
    assert_eq!(reloaded.get_rules().len(), 2);
    let go = reloaded.get_rule("go").unwrap();
    assert_eq!(go.language, "go");
    assert_eq!(go.manifest_filename, "go.deps.txt");
    assert_eq!(go.pattern, r"github.com/\S+");
}

#[test]
fn test_repeated_scans_are_identical() {
    let dir = TempDir::new().unwrap();
    let project = create_mixed_project(&dir);
    let rules = rule_set(&[
        ("rust", "Cargo.toml", r"use (\w+)::"),
        ("python", "requirements.txt", r"import (\w+)"),
    ]);

    let mut first = DependencyScanner::new(&rules);
    assert!(first.analyze(&project));
    let mut second = DependencyScanner::new(&rules);
    assert!(second.analyze(&project));

    assert_eq!(first.get_results(), second.get_results());
    // Files are visited in name order, so src/lib.rs comes before src/main.rs
    assert_eq!(
        first.get_results().get("rust").unwrap(),
        &["tracing", "serde", "anyhow"]
    );
    assert_eq!(
        first.get_results().get("python").unwrap(),
        &["requests", "yaml"]
    );
}

#[test]
fn test_invalid_pattern_does_not_block_other_rules() {
    let dir = TempDir::new().unwrap();
    let project = create_mixed_project(&dir);
    let rules = rule_set(&[
        ("broken", "broken.txt", r"import ("),
        ("python", "requirements.txt", r"import (\w+)"),
    ]);

    let mut scanner = DependencyScanner::new(&rules);
    assert!(scanner.analyze(&project));

    assert!(scanner.get_results().get("broken").is_none());
    assert_eq!(scanner.get_results().get("python").unwrap().len(), 2);
    assert!(scanner
        .diagnostics()
        .iter()
        .any(|d| matches!(d, ScanDiagnostic::InvalidPattern(e) if e.language == "broken")));
}

#[test]
fn test_written_manifests_pass_verification() {
    let dir = TempDir::new().unwrap();
    let project = create_mixed_project(&dir);
    let rules = rule_set(&[
        ("rust", "Cargo.toml", r"use (\w+)::"),
        ("python", "requirements.txt", r"import (\w+)"),
    ]);

    let mut scanner = DependencyScanner::new(&rules);
    scanner.analyze(&project);
    let report = ManifestWriter::new().write_manifests(&project, scanner.get_results(), &rules);
    assert!(report.is_complete());

    let verifier = Verifier::new();
    let cargo = project.join("Cargo.toml");
    assert!(verifier.file_exists_and_nonempty(&cargo));
    assert!(verifier.content_contains_all(&cargo, &["[dependencies]", "serde = \"*\""]));
    assert_eq!(
        fs::read_to_string(project.join("requirements.txt")).unwrap(),
        "requests\nyaml"
    );
}

#[test]
fn test_pipeline_go_scenario() {
    let rules_dir = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join("main.go"),
        "github.com/pkg/errors github.com/spf13/cobra\ngithub.com/pkg/errors\n",
    )
    .unwrap();

    let mut store = RuleStore::load(rules_dir.path().join("rules.json")).unwrap();
    store.add_rule("go", "go.deps.txt", r"github.com/\S+").unwrap();

    let report = PipelineOrchestrator::new(&store).execute(project.path());

    assert!(report.outcome.is_completed());
    assert_eq!(
        fs::read_to_string(project.path().join("go.deps.txt")).unwrap(),
        "github.com/pkg/errors\ngithub.com/spf13/cobra"
    );
}

#[test]
fn test_pipeline_with_empty_store_writes_nothing() {
    let rules_dir = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    fs::write(project.path().join("main.go"), "github.com/pkg/errors").unwrap();

    let store = RuleStore::load(rules_dir.path().join("rules.json")).unwrap();
    let report = PipelineOrchestrator::new(&store).execute(project.path());

    assert_eq!(report.outcome, PipelineOutcome::Aborted(AbortReason::NoRules));
    assert!(report.results.is_empty());
    assert_eq!(fs::read_dir(project.path()).unwrap().count(), 1);
}
