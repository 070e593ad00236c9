pub mod commands;
pub mod handlers;

pub use commands::{CliArgs, Commands};
pub use handlers::{build_config, command_name, dispatch};
