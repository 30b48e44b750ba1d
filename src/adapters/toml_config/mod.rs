// TOML config adapter - Configuration file discovery and parsing

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SplicerError, SplicerResult};

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "SPLICER_CONFIG";

/// Config file picked up from the working directory when nothing else is given
pub const DEFAULT_CONFIG_FILE: &str = "splicer.toml";

/// `[tools]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsSection {
    pub ffmpeg: Option<String>,
    pub ffprobe: Option<String>,
}

/// `[encode]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodeSection {
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub crf: Option<u8>,
    pub preset: Option<String>,
}

/// `[merge]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeSection {
    pub output_name: Option<String>,
}

/// `[logging]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub format: Option<String>,
}

/// Contents of a `splicer.toml` file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplicerConfig {
    pub tools: ToolsSection,
    pub encode: EncodeSection,
    pub merge: MergeSection,
    pub logging: LoggingSection,
}

impl SplicerConfig {
    /// Parse TOML text
    pub fn from_toml(text: &str, origin: &Path) -> SplicerResult<Self> {
        toml::from_str(text).map_err(|e| SplicerError::Config {
            message: format!("{}: {}", origin.display(), e),
        })
    }

    /// Read and parse a config file
    pub fn load(path: &Path) -> SplicerResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| SplicerError::Config {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml(&text, path)
    }
}

/// Find the config file to use.
///
/// An explicit path or `SPLICER_CONFIG` must exist; `./splicer.toml` is optional.
pub fn discover_config_file(
    explicit: Option<&Path>,
    env_value: Option<String>,
    working_dir: &Path,
) -> SplicerResult<Option<PathBuf>> {
    let required = explicit
        .map(Path::to_path_buf)
        .or_else(|| env_value.filter(|v| !v.trim().is_empty()).map(PathBuf::from));

    if let Some(path) = required {
        if !path.is_file() {
            return Err(SplicerError::Config {
                message: format!("config file {} does not exist", path.display()),
            });
        }
        return Ok(Some(path));
    }

    let fallback = working_dir.join(DEFAULT_CONFIG_FILE);
    Ok(fallback.is_file().then_some(fallback))
}
