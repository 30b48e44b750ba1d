//! CLI module for Splicer
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config_initialization::CliOverrides;
use crate::utils::{LogFormat, LogLevel};

pub mod args;
pub mod commands;

pub use args::{MergeArgs, SplitArgs};

/// Splicer video splitter
///
/// Splits a video into clips from a manifest or a fixed interval, and merges
/// a directory of clips back into one file. Requires ffmpeg and ffprobe.
#[derive(Parser, Debug)]
#[command(name = "splicer")]
#[command(about = "Split videos into clips and merge clips back together")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (RUST_LOG takes precedence)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Log output format
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// Configuration file (default: ./splicer.toml when present)
    #[arg(long, global = true, env = "SPLICER_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a video into clips
    Split(SplitArgs),
    /// Merge every video in a directory into one file
    Merge(MergeArgs),
}

impl Cli {
    /// Values that take part in the configuration hierarchy
    pub fn overrides(&self) -> CliOverrides {
        let (crf, preset) = match &self.command {
            Commands::Split(args) => (args.crf, args.preset.clone()),
            Commands::Merge(args) => (args.crf, args.preset.clone()),
        };

        CliOverrides {
            config: self.config.clone(),
            log_level: self.log_level,
            log_format: self.log_format,
            crf,
            preset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_overrides_from_split() {
        let cli = Cli::try_parse_from([
            "splicer",
            "--log-level",
            "debug",
            "split",
            "-f",
            "movie.mp4",
            "-s",
            "60",
            "--crf",
            "23",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.log_level, Some(LogLevel::Debug));
        assert_eq!(overrides.crf, Some(23));
        assert!(overrides.preset.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["splicer", "merge", "clips", "--log-format", "json"]).unwrap();
        assert_eq!(cli.log_format, Some(LogFormat::Json));
    }
}
