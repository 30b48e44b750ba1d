//! FFmpeg command builder

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::utils::time::format_ffmpeg_seconds;

/// One `-i` entry with the options that apply to it
#[derive(Debug, Clone)]
struct InputSpec {
    args: Vec<OsString>,
    path: PathBuf,
}

/// Builder for ffmpeg argument vectors.
///
/// Arguments added with [`input_arg`](Self::input_arg) attach to the next
/// [`input`](Self::input) and are emitted before its `-i`; output arguments
/// are emitted after the last input, followed by the output path.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    inputs: Vec<InputSpec>,
    pending_input_args: Vec<OsString>,
    output: PathBuf,
    output_args: Vec<OsString>,
    overwrite: bool,
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new command writing to `output`
    pub fn new(output: impl AsRef<Path>) -> Self {
        Self {
            inputs: Vec::new(),
            pending_input_args: Vec::new(),
            output: output.as_ref().to_path_buf(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    /// Add an argument for the next input (before its -i)
    pub fn input_arg(mut self, arg: impl Into<OsString>) -> Self {
        self.pending_input_args.push(arg.into());
        self
    }

    /// Add an input file
    pub fn input(mut self, path: impl AsRef<Path>) -> Self {
        let args = std::mem::take(&mut self.pending_input_args);
        self.inputs.push(InputSpec {
            args,
            path: path.as_ref().to_path_buf(),
        });
        self
    }

    /// Add an output argument (after every -i)
    pub fn output_arg(mut self, arg: impl Into<OsString>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Add multiple output arguments
    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Seek on the next input
    pub fn seek(self, seconds: f64) -> Self {
        self.input_arg("-ss").input_arg(format_ffmpeg_seconds(seconds))
    }

    /// Limit how much is written to the output
    pub fn duration(self, seconds: f64) -> Self {
        self.output_arg("-t").output_arg(format_ffmpeg_seconds(seconds))
    }

    /// Set video codec
    pub fn video_codec(self, codec: impl Into<OsString>) -> Self {
        self.output_arg("-c:v").output_arg(codec)
    }

    /// Set audio codec
    pub fn audio_codec(self, codec: impl Into<OsString>) -> Self {
        self.output_arg("-c:a").output_arg(codec)
    }

    /// Set CRF (quality)
    pub fn crf(self, crf: u8) -> Self {
        self.output_arg("-crf").output_arg(crf.to_string())
    }

    /// Set encoder preset
    pub fn preset(self, preset: impl Into<OsString>) -> Self {
        self.output_arg("-preset").output_arg(preset)
    }

    /// Set filter complex
    pub fn filter_complex(self, filter: impl Into<OsString>) -> Self {
        self.output_arg("-filter_complex").output_arg(filter)
    }

    /// Map a stream or filter pad into the output
    pub fn map(self, label: impl Into<OsString>) -> Self {
        self.output_arg("-map").output_arg(label)
    }

    /// Set log level
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Output path this command writes
    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Build the command arguments
    pub fn build_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            self.log_level.clone().into(),
        ];

        if self.overwrite {
            args.push("-y".into());
        }

        for input in &self.inputs {
            args.extend(input.args.iter().cloned());
            args.push("-i".into());
            args.push(input.path.clone().into_os_string());
        }

        args.extend(self.output_args.iter().cloned());
        args.push(self.output.clone().into_os_string());

        args
    }
}
