pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{AddLangArgs, CliArgs, Commands, ConfigArgs, ConfigCommands, InitArgs};
pub use handlers::{handle_add_lang, handle_init};
pub use output::{OutputFormat, OutputFormatter};
