mod args;
mod export;
mod params;
mod resolved_command;

pub use args::{Args, ExportCommand, PASSWORD_ENV_VAR, parse_args, try_parse_args_from, usage_error};
pub use export::run_export;
pub use params::ExportParams;
pub use resolved_command::{resolve_command, resolve_command_with_prompt};
