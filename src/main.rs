use pipeforge::cli::commands::{CliArgs, Commands};
use pipeforge::cli::handlers::{handle_config, handle_detect, handle_init, handle_list};
use pipeforge::util::logging::{init_logging, parse_level, LoggingConfig};
use pipeforge::{PipeforgeConfig, VERSION};

use clap::Parser;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();
    let config = PipeforgeConfig::default();
    init_logging_from_args(&args, &config);

    debug!("pipeforge v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Detect(detect_args) => handle_detect(detect_args),
        Commands::Init(init_args) => handle_init(init_args, &config),
        Commands::List(list_args) => handle_list(list_args),
        Commands::Config(config_args) => handle_config(config_args, &config),
    };

    std::process::exit(exit_code);
}

/// `--log-level` wins, then `-v` / `-q`, then `PIPEFORGE_LOG_LEVEL`.
fn init_logging_from_args(args: &CliArgs, config: &PipeforgeConfig) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        parse_level(&config.log_level)
    };

    init_logging(LoggingConfig {
        level,
        use_json: config.log_json,
        ..Default::default()
    });
}
