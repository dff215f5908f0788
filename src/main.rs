use depmint::cli::commands::{CliArgs, Commands, ConfigCommands};
use depmint::cli::handlers::{handle_add_lang, handle_init};
use depmint::util::logging::{self, parse_level, LoggingConfig};
use depmint::VERSION;

use clap::Parser;
use tracing::debug;

fn main() {
    let args = CliArgs::parse();
    let log_level = args.log_level_override();
    init_logging_from_args(log_level.as_deref());

    debug!("depmint v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let rules = args.rules.as_deref();
    let exit_code = match &args.command {
        Commands::Init(init_args) => handle_init(init_args, rules, log_level.as_deref()),
        Commands::Config(config_args) => match &config_args.command {
            ConfigCommands::AddLang(add_args) => handle_add_lang(add_args, rules),
        },
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(level: Option<&str>) {
    match level {
        Some(level) => logging::init_logging(LoggingConfig {
            level: parse_level(level),
            ..logging::config_from_env()
        }),
        None => logging::init_from_env(),
    }
}
