//! atlas-session - session-state bookkeeping for AI coding assistants
//!
//! CLI entry point that dispatches to subcommands.

use atlas_session::cli::{Cli, Commands};
use atlas_session::config::{Config, ConfigManager};
use atlas_session::error::{AtlasError, AtlasResult};
use atlas_session::report::Response;
use clap::Parser;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            // Failures outside an operation still produce a structured result
            match serde_json::to_string_pretty(&Response::from_error(&e)) {
                Ok(json) => println!("{json}"),
                Err(_) => eprintln!("Error: {e}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> AtlasResult<bool> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    // A project's own override applies wherever the tool is run from
    let local_config_path = if cli.no_local {
        None
    } else {
        let start = match cli.command.project() {
            Some(project) => project
                .canonicalize()
                .unwrap_or_else(|_| project.to_path_buf()),
            None => std::env::current_dir()
                .map_err(|e| AtlasError::io("getting current directory", e))?,
        };
        ConfigManager::find_local_config(&start)
    };

    let config = config_manager.load_merged(local_config_path.as_deref())?;
    init_logging(cli.verbose, &config);

    if let Some(ref path) = local_config_path {
        debug!("Using local config: {}", path.display());
    }
    atlas_session::ui::init_theme();

    match cli.command {
        Commands::Inventory(args) => atlas_session::cli::commands::inventory(args, &config),
        Commands::Preflight(args) => atlas_session::cli::commands::preflight(args, &config),
        Commands::Governance(args) => atlas_session::cli::commands::governance(args, &config),
        Commands::Context(args) => atlas_session::cli::commands::context(args, &config),
        Commands::GitSummary(args) => atlas_session::cli::commands::git_summary(args, &config),
        Commands::Hook(args) => atlas_session::cli::commands::hook(args, &config),
        Commands::Config(args) => {
            atlas_session::cli::commands::config(args, &config, &config_manager)
        }
    }
}

/// Logs go to stderr: 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("atlas_session=warn"),
        1 => EnvFilter::new("atlas_session=info"),
        _ => EnvFilter::new("atlas_session=debug"),
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
