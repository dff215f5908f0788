use super::commands::{AddLangArgs, InitArgs};
use super::output::{OutputFormat, OutputFormatter};
use crate::assistant::AssistantSettings;
use crate::config::DepmintConfig;
use crate::pipeline::PipelineOrchestrator;
use crate::progress::LoggingHandler;
use crate::rules::RuleStore;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Runs the full pipeline over one project and prints its report
///
/// Returns the process exit code.
pub fn handle_init(
    args: &InitArgs,
    rules_override: Option<&Path>,
    log_level_override: Option<&str>,
) -> i32 {
    let Some(target) = args.target() else {
        error!("No project path given");
        return 1;
    };
    debug!("Project path: {}", target.display());

    if !target.exists() {
        error!("Project path does not exist: {}", target.display());
        eprintln!("Error: project path does not exist: {}", target.display());
        return 1;
    }

    if !target.is_dir() {
        error!("Project path is not a directory: {}", target.display());
        eprintln!("Error: project path is not a directory: {}", target.display());
        return 1;
    }

    let project_root: PathBuf = match target.canonicalize() {
        Ok(path) => path,
        Err(e) => {
            error!("Failed to canonicalize project path: {}", e);
            return 1;
        }
    };

    let env_config = match DepmintConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let config = DepmintConfig {
        rules_path: rules_override
            .map(Path::to_path_buf)
            .unwrap_or(env_config.rules_path),
        log_level: log_level_override
            .map(str::to_lowercase)
            .unwrap_or(env_config.log_level),
        max_depth: args.max_depth.or(env_config.max_depth),
        respect_gitignore: args.respect_gitignore || env_config.respect_gitignore,
        ..env_config
    };
    if args.max_depth.is_some() {
        debug!("Max depth overridden to: {:?}", config.max_depth);
    }

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        eprintln!("\nPlease check your environment variables and command-line arguments.");
        return 1;
    }

    let store = match RuleStore::load(&config.rules_path) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to load rules: {}", e);
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    info!(
        rules = store.get_rules().len(),
        path = %store.path().display(),
        "Loaded language rules"
    );

    let orchestrator = PipelineOrchestrator::new(&store)
        .with_scan_config(config.scan_config())
        .with_assistant(AssistantSettings::from_env())
        .with_progress(LoggingHandler);

    let report = orchestrator.execute(&project_root);

    let formatter = OutputFormatter::new(args.format.into());
    match formatter.format_report(&project_root, &report) {
        Ok(output) => print!("{}", ensure_trailing_newline(output)),
        Err(e) => {
            error!("Failed to format report: {}", e);
            return 1;
        }
    }

    report.outcome.exit_code()
}

/// Stores a language rule and prints a confirmation
///
/// Only the rule file location is read from the environment, so unrelated
/// `DEPMINT_*` values that fail to parse do not block rule edits.
pub fn handle_add_lang(args: &AddLangArgs, rules_override: Option<&Path>) -> i32 {
    let rules_path = rules_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| DepmintConfig::default().rules_path);
    debug!("Rule file: {}", rules_path.display());

    let mut store = match RuleStore::load(&rules_path) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to load rules: {}", e);
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    if let Err(e) = store.add_rule(&args.lang, &args.manifest, &args.pattern) {
        error!("Failed to store rule: {}", e);
        eprintln!("Error: {}", e);
        return 1;
    }

    let Some(rule) = store.get_rule(&args.lang) else {
        error!("Rule for '{}' missing after save", args.lang);
        return 1;
    };

    let formatter = OutputFormatter::new(OutputFormat::Human);
    match formatter.format_rule_added(rule, store.path()) {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            error!("Failed to format confirmation: {}", e);
            1
        }
    }
}

fn ensure_trailing_newline(mut output: String) -> String {
    if !output.ends_with('\n') {
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::OutputFormatArg;
    use serial_test::serial;
    use std::env;
    use std::fs;
    use tempfile::TempDir;

    fn init_args(path: &Path) -> InitArgs {
        InitArgs {
            project_path: Some(path.to_path_buf()),
            path: None,
            format: OutputFormatArg::Json,
            respect_gitignore: false,
            max_depth: None,
        }
    }

    #[test]
    #[serial]
    fn test_init_rejects_missing_path() {
        let dir = TempDir::new().unwrap();
        let rules = dir.path().join("rules.json");
        let code = handle_init(&init_args(&dir.path().join("nope")), Some(&rules), None);
        assert_eq!(code, 1);
    }

    #[test]
    #[serial]
    fn test_init_rejects_file_path() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        let rules = dir.path().join("rules.json");
        assert_eq!(handle_init(&init_args(&file), Some(&rules), None), 1);
    }

    #[test]
    #[serial]
    fn test_init_with_corrupt_rules_fails() {
        let dir = TempDir::new().unwrap();
        let rules = dir.path().join("rules.json");
        fs::write(&rules, "{ not json").unwrap();
        let project = TempDir::new().unwrap();
        assert_eq!(handle_init(&init_args(project.path()), Some(&rules), None), 1);
    }

    #[test]
    #[serial]
    fn test_init_reports_unparsable_environment() {
        let dir = TempDir::new().unwrap();
        let rules = dir.path().join("rules.json");
        let project = TempDir::new().unwrap();
        env::set_var("DEPMINT_MAX_DEPTH", "deep");

        let code = handle_init(&init_args(project.path()), Some(&rules), None);

        env::remove_var("DEPMINT_MAX_DEPTH");
        assert_eq!(code, 1);
    }

    #[test]
    #[serial]
    fn test_log_level_flag_overrides_environment() {
        let dir = TempDir::new().unwrap();
        let rules = dir.path().join("rules.json");
        let add = AddLangArgs {
            lang: "go".to_string(),
            manifest: "go.deps.txt".to_string(),
            pattern: r"github.com/\S+".to_string(),
        };
        assert_eq!(handle_add_lang(&add, Some(&rules)), 0);
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("main.go"), "github.com/pkg/errors\n").unwrap();
        env::set_var("DEPMINT_LOG_LEVEL", "loud");

        let rejected = handle_init(&init_args(project.path()), Some(&rules), None);
        let accepted = handle_init(&init_args(project.path()), Some(&rules), Some("DEBUG"));

        env::remove_var("DEPMINT_LOG_LEVEL");
        assert_eq!(rejected, 1);
        assert_eq!(accepted, 0);
    }

    #[test]
    #[serial]
    fn test_add_lang_then_init() {
        let dir = TempDir::new().unwrap();
        let rules = dir.path().join("rules.json");
        let add = AddLangArgs {
            lang: "go".to_string(),
            manifest: "go.deps.txt".to_string(),
            pattern: r"github.com/\S+".to_string(),
        };
        assert_eq!(handle_add_lang(&add, Some(&rules)), 0);

        let project = TempDir::new().unwrap();
        fs::write(project.path().join("main.go"), "github.com/pkg/errors\n").unwrap();
        assert_eq!(handle_init(&init_args(project.path()), Some(&rules), None), 0);
        assert_eq!(
            fs::read_to_string(project.path().join("go.deps.txt")).unwrap(),
            "github.com/pkg/errors"
        );
    }
}
