//! sessioncache CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use sessioncache::cli::{Cli, Commands, Target};
use sessioncache::config::{Config, ConfigManager};
use sessioncache::error::CacheResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> CacheResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load()?;

    init_logging(cli.verbose, &config);

    let target = Target {
        session: cli.session,
        namespace: cli.namespace,
    };

    // Dispatch to command
    match cli.command {
        Commands::Get(args) => sessioncache::cli::commands::get(args, &target, &config),
        Commands::Set(args) => sessioncache::cli::commands::set(args, &target, &config),
        Commands::Invalidate(args) => {
            sessioncache::cli::commands::invalidate(args, &target, &config)
        }
        Commands::Keys(args) => sessioncache::cli::commands::keys(args, &target, &config),
        Commands::Session(args) => sessioncache::cli::commands::session(args, &target, &config),
        Commands::Config(args) => {
            sessioncache::cli::commands::config(args, &config_manager, &config)
        }
    }
}

/// 0 = warn, 1 = info, 2+ = debug; logs go to stderr so stdout stays
/// parseable
fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("sessioncache=warn"),
        1 => EnvFilter::new("sessioncache=info"),
        _ => EnvFilter::new("sessioncache=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
