use bazelize::cli::{command_name, dispatch, CliArgs};
use bazelize::util::logging::{init_logging, json_from_env, parse_level, LoggingConfig};
use bazelize::VERSION;

use clap::Parser;
use std::env;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("bazelize v{} starting", VERSION);
    debug!("Command: {}", command_name(&args));
    debug!("Arguments: {:?}", args);

    let exit_code = dispatch(&args);

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        let level_str = env::var("BAZELIZE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        parse_level(&level_str)
    };

    init_logging(LoggingConfig {
        level,
        use_json: json_from_env(),
        ..Default::default()
    });
}
