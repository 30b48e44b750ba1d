//! Splicer Video Splitter
//!
//! Splits videos into clips and merges clips back together using ffmpeg.
//!
//! # Usage
//!
//! ```bash
//! splicer split --manifest clips.json
//! splicer split --file movie.mp4 --split-size 00:05:00
//! splicer merge Clip-movie --output movie-joined.mp4
//! ```

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use splicer_cli::adapters::Utf8Environment;
use splicer_cli::app::DefaultAppContainer;
use splicer_cli::cli::{commands, Cli, Commands};
use splicer_cli::config_initialization::initialize_configuration_hierarchy;
use splicer_cli::utils::init_logging;
use splicer_cli::SplicerError;

/// Main entry point for the Splicer CLI application
fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            let code = err
                .downcast_ref::<SplicerError>()
                .map(SplicerError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn run() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let settings = initialize_configuration_hierarchy(&cli.overrides())
        .context("Failed to load configuration")?;
    init_logging(&settings.logging).context("Failed to initialize logging")?;

    info!("Starting Splicer v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &settings.config_file {
        debug!("Configuration loaded from {}", path.display());
    }

    let environment = Utf8Environment::initialize();
    let container = DefaultAppContainer::new(&settings, environment);

    // Execute the requested command
    match cli.command {
        Commands::Split(args) => {
            info!("Executing split command");
            commands::split(args, &container, &settings)?;
        }
        Commands::Merge(args) => {
            info!("Executing merge command");
            commands::merge(args, &container, &settings)?;
        }
    }

    info!("Splicer completed successfully");
    Ok(())
}
