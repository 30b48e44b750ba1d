//! Configuration initialization and hierarchy management

use std::path::PathBuf;

use crate::adapters::toml_config::{discover_config_file, SplicerConfig, CONFIG_ENV_VAR};
use crate::engine::EncodeSettings;
use crate::error::{SplicerError, SplicerResult};
use crate::app::merge_interactor::DEFAULT_OUTPUT_NAME;
use crate::utils::{LogFormat, LogLevel, LoggingConfig};

/// Highest CRF accepted by x264/x265
pub const MAX_CRF: u8 = 51;

/// Environment variable names, in the order they are documented
pub const ENV_FFMPEG: &str = "SPLICER_FFMPEG";
pub const ENV_FFPROBE: &str = "SPLICER_FFPROBE";
pub const ENV_LOG_LEVEL: &str = "SPLICER_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "SPLICER_LOG_FORMAT";
pub const ENV_CRF: &str = "SPLICER_CRF";
pub const ENV_PRESET: &str = "SPLICER_PRESET";

/// Values given on the command line; `None` defers to lower layers
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub log_level: Option<LogLevel>,
    pub log_format: Option<LogFormat>,
    pub crf: Option<u8>,
    pub preset: Option<String>,
}

/// Effective settings after layering
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub ffmpeg: String,
    pub ffprobe: String,
    pub encode: EncodeSettings,
    pub merge_output: String,
    pub logging: LoggingConfig,
    /// File the settings were read from, if any
    pub config_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            encode: EncodeSettings::default(),
            merge_output: DEFAULT_OUTPUT_NAME.to_string(),
            logging: LoggingConfig::default(),
            config_file: None,
        }
    }
}

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &CliOverrides) -> SplicerResult<Settings> {
    let env = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());

    let working_dir = std::env::current_dir()?;
    let config_file = discover_config_file(cli.config.as_deref(), env(CONFIG_ENV_VAR), &working_dir)?;
    let file = match &config_file {
        Some(path) => SplicerConfig::load(path)?,
        None => SplicerConfig::default(),
    };

    let mut settings = layer_settings(&file, &env, cli)?;
    settings.config_file = config_file;
    Ok(settings)
}

/// Merge the layers; `env` looks up one environment variable
pub fn layer_settings(
    file: &SplicerConfig,
    env: &dyn Fn(&str) -> Option<String>,
    cli: &CliOverrides,
) -> SplicerResult<Settings> {
    let mut settings = Settings::default();

    // File layer
    if let Some(ffmpeg) = &file.tools.ffmpeg {
        settings.ffmpeg = ffmpeg.clone();
    }
    if let Some(ffprobe) = &file.tools.ffprobe {
        settings.ffprobe = ffprobe.clone();
    }
    if let Some(codec) = &file.encode.video_codec {
        settings.encode.video_codec = codec.clone();
    }
    if let Some(codec) = &file.encode.audio_codec {
        settings.encode.audio_codec = codec.clone();
    }
    if let Some(crf) = file.encode.crf {
        settings.encode.crf = check_crf(crf, "[encode] crf")?;
    }
    if let Some(preset) = &file.encode.preset {
        settings.encode.preset = preset.clone();
    }
    if let Some(name) = &file.merge.output_name {
        settings.merge_output = name.clone();
    }
    if let Some(level) = &file.logging.level {
        settings.logging.level = level.parse()?;
    }
    if let Some(format) = &file.logging.format {
        settings.logging.format = format.parse()?;
    }

    // Environment layer
    if let Some(ffmpeg) = env(ENV_FFMPEG) {
        settings.ffmpeg = ffmpeg;
    }
    if let Some(ffprobe) = env(ENV_FFPROBE) {
        settings.ffprobe = ffprobe;
    }
    if let Some(level) = env(ENV_LOG_LEVEL) {
        settings.logging.level = level.parse()?;
    }
    if let Some(format) = env(ENV_LOG_FORMAT) {
        settings.logging.format = format.parse()?;
    }
    if let Some(crf) = env(ENV_CRF) {
        let value = crf.trim().parse::<u8>().map_err(|e| SplicerError::Config {
            message: format!("{}={}: {}", ENV_CRF, crf, e),
        })?;
        settings.encode.crf = check_crf(value, ENV_CRF)?;
    }
    if let Some(preset) = env(ENV_PRESET) {
        settings.encode.preset = preset;
    }

    // Command line layer
    if let Some(level) = cli.log_level {
        settings.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        settings.logging.format = format;
    }
    if let Some(crf) = cli.crf {
        settings.encode.crf = check_crf(crf, "--crf")?;
    }
    if let Some(preset) = &cli.preset {
        settings.encode.preset = preset.clone();
    }

    Ok(settings)
}

fn check_crf(value: u8, source: &str) -> SplicerResult<u8> {
    if value > MAX_CRF {
        return Err(SplicerError::Config {
            message: format!("{}: CRF must be between 0 and {}, got {}", source, MAX_CRF, value),
        });
    }
    Ok(value)
}
