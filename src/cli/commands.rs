use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// Rule-driven dependency scanner that writes per-language manifests
#[derive(Parser, Debug)]
#[command(
    name = "depmint",
    about = "Rule-driven dependency scanner that writes per-language manifests",
    version,
    long_about = "depmint scans a project tree with per-language regular expressions, \
                  collects the dependencies they match and writes one manifest file per \
                  language into the project root. Rules are stored in a JSON file and \
                  managed with `depmint config add-lang`."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        value_name = "FILE",
        help = "Rule file to use (defaults to DEPMINT_RULES_PATH or memory/knowledge_base.json)"
    )]
    pub rules: Option<PathBuf>,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

impl CliArgs {
    /// Log level requested on the command line, if any
    ///
    /// `--log-level` wins over `-v`, which wins over `-q`.
    pub fn log_level_override(&self) -> Option<String> {
        if let Some(level) = &self.log_level {
            Some(level.to_lowercase())
        } else if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Scan a project and write its dependency manifests",
        long_about = "Scans every file under the project path with the configured language \
                      rules, then writes and verifies one manifest per language found.\n\n\
                      Examples:\n  \
                      depmint init ./my-project\n  \
                      depmint init --path ./my-project --format json"
    )]
    Init(InitArgs),

    #[command(about = "Manage language rules")]
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    #[arg(
        value_name = "PATH",
        required_unless_present = "path",
        help = "Path to the project directory"
    )]
    pub project_path: Option<PathBuf>,

    #[arg(
        long = "path",
        value_name = "PATH",
        conflicts_with = "project_path",
        help = "Path to the project directory"
    )]
    pub path: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Report format"
    )]
    pub format: OutputFormatArg,

    #[arg(long, help = "Skip files matched by .gitignore and .ignore")]
    pub respect_gitignore: bool,

    #[arg(long, value_name = "DEPTH", help = "Maximum directory depth to scan")]
    pub max_depth: Option<usize>,
}

impl InitArgs {
    pub fn target(&self) -> Option<&Path> {
        self.project_path.as_deref().or(self.path.as_deref())
    }
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    #[command(
        about = "Add or replace the rule for a language",
        long_about = "Stores a detection rule for a language. The pattern is a regular \
                      expression; when it has a capture group, the first group is the \
                      dependency name, otherwise the whole match is.\n\n\
                      Examples:\n  \
                      depmint config add-lang --lang rust --manifest Cargo.toml --pattern 'use (\\w+)::'\n  \
                      depmint config add-lang --lang go --manifest go.deps.txt --pattern 'github.com/\\S+'"
    )]
    AddLang(AddLangArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AddLangArgs {
    #[arg(long, value_name = "LANG", help = "Language name (e.g. rust)")]
    pub lang: String,

    #[arg(long, value_name = "FILE", help = "Manifest file name (e.g. Cargo.toml)")]
    pub manifest: String,

    #[arg(
        long,
        value_name = "REGEX",
        allow_hyphen_values = true,
        help = "Regular expression that finds dependencies in source files"
    )]
    pub pattern: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
