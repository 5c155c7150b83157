//! autorecipe - Generate a rattler-build recipe.yaml from pyproject.toml
//!
//! Loads configuration, runs the drafter and renders its warnings.

mod cli;
mod error;
mod events;
mod logging;

use crate::cli::{expand_home, Cli};
use crate::error::CliError;
use crate::events::EventHandler;
use autorecipe_config::Config;
use autorecipe_drafter::{Drafter, GenerateReport, GenerateRequest};
use autorecipe_events::EventSender;
use clap::Parser;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();
    let debug_enabled = init_tracing(cli.debug);

    let (event_sender, mut event_receiver) = autorecipe_events::channel();
    let mut event_handler = EventHandler::new(debug_enabled);

    let result = run(cli, event_sender);
    event_handler.drain(&mut event_receiver);

    match result {
        Ok(report) => {
            info!(output = %report.output.display(), "recipe generated");
            println!("✔ Wrote {}", report.output.display());
        }
        Err(e) => {
            error!("Application error: {}", e);
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

/// Main application logic
fn run(cli: Cli, event_sender: EventSender) -> Result<GenerateReport, CliError> {
    info!("Starting autorecipe v{}", env!("CARGO_PKG_VERSION"));

    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(cli.config.as_deref()).map_err(CliError::Config)?;

    // 2. Merge environment variables
    config.merge_env().map_err(CliError::Config)?;

    // 3. Apply CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli)?;

    let drafter = Drafter::new()
        .with_python(config.general.python.clone())
        .with_event_sender(event_sender);

    let request = GenerateRequest {
        input: expand_home(config.input_path()),
        output: cli.output.map(expand_home),
        configured_output: config.output_path().map(|p| expand_home(p.to_path_buf())),
        overwrite: config.general.overwrite,
    };
    tracing::debug!(input = %request.input.display(), "generating recipe");

    Ok(drafter.generate(&request)?)
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, cli: &Cli) -> Result<(), CliError> {
    if let Some(python) = &cli.python {
        if python.trim().is_empty() {
            return Err(CliError::InvalidArguments(
                "--python must name an interpreter".to_string(),
            ));
        }
        config.general.python.clone_from(python);
    }
    if let Some(input) = &cli.input {
        config.paths.input = Some(input.clone());
    }
    if cli.overwrite {
        config.general.overwrite = true;
    }
    Ok(())
}

/// Initialize tracing/logging; returns whether debug output is on
fn init_tracing(debug_flag: bool) -> bool {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_flag;
    let default_filter = if debug_enabled {
        "info,autorecipe=debug,autorecipe_drafter=debug,autorecipe_platform=debug"
    } else {
        "error"
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    debug_enabled
}
