//! Command synthesis for ffmpeg invocations
//!
//! Every invocation produced here is a fully resolved argument vector with
//! absolute paths. Nothing in this module spawns a process.

pub mod command;
pub mod concat;
pub mod split;

use std::ffi::OsString;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use command::FfmpegCommand;
pub use concat::{render_concat_list, synthesize_merge};
pub use split::{synthesize_clip, ExtractionMethod, SplitOptions};

/// One ffmpeg call ready to run
#[derive(Debug)]
pub struct Invocation {
    /// Arguments after the program name
    pub args: Vec<OsString>,
    /// File the call is expected to produce
    pub output: PathBuf,
    /// Concat list backing this call, removed when the invocation is dropped
    pub list_file: Option<tempfile::TempPath>,
}

impl Invocation {
    /// Arguments joined for logging; non UTF-8 bytes are replaced
    pub fn display_args(&self) -> String {
        self.args
            .iter()
            .map(|arg| {
                let text = arg.to_string_lossy();
                if text.is_empty() || text.contains(char::is_whitespace) {
                    format!("\"{}\"", text)
                } else {
                    text.into_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether the argument vector contains `flag` followed by `value`
    pub fn has_option(&self, flag: &str, value: &str) -> bool {
        self.args
            .windows(2)
            .any(|pair| pair[0] == *flag && pair[1] == *value)
    }

    /// Position of the first occurrence of `arg`
    pub fn position_of(&self, arg: &str) -> Option<usize> {
        self.args.iter().position(|candidate| candidate == arg)
    }
}

/// Encoder settings used whenever a call has to re-encode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeSettings {
    pub video_codec: String,
    pub audio_codec: String,
    pub crf: u8,
    pub preset: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            crf: 18,
            preset: "medium".to_string(),
        }
    }
}

impl EncodeSettings {
    /// x264/x265 take `-crf` and `-preset`; other encoders reject them
    pub fn accepts_quality_options(codec: &str) -> bool {
        matches!(codec, "libx264" | "libx265")
    }
}
