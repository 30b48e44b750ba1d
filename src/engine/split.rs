//! Clip extraction commands

use std::fmt;
use std::path::Path;

use crate::domain::model::{ClipLength, ClipSpec};
use crate::engine::{EncodeSettings, FfmpegCommand, Invocation};
use crate::error::{SplicerError, SplicerResult};
use crate::utils::path::absolutize;

/// Codec value that requests a stream copy
pub const COPY_CODEC: &str = "copy";

/// How one clip is cut out of the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    /// Seek to the nearest keyframe and copy packets
    Copy,
    /// Decode from the seek point and encode the clip
    Reencode,
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionMethod::Copy => write!(f, "copy"),
            ExtractionMethod::Reencode => write!(f, "reencode"),
        }
    }
}

/// User-facing codec options for a split run
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOptions {
    pub video_codec: String,
    pub audio_codec: String,
    /// Passed through to ffmpeg right before the output path
    pub extra_args: Vec<String>,
    pub encode: EncodeSettings,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            video_codec: COPY_CODEC.to_string(),
            audio_codec: COPY_CODEC.to_string(),
            extra_args: Vec::new(),
            encode: EncodeSettings::default(),
        }
    }
}

impl SplitOptions {
    /// A non-copy codec was requested for either stream
    pub fn requests_encoding(&self) -> bool {
        self.video_codec != COPY_CODEC || self.audio_codec != COPY_CODEC
    }

    fn effective_video_codec(&self) -> &str {
        if self.video_codec == COPY_CODEC {
            &self.encode.video_codec
        } else {
            &self.video_codec
        }
    }

    fn effective_audio_codec(&self) -> &str {
        if self.audio_codec == COPY_CODEC {
            &self.encode.audio_codec
        } else {
            &self.audio_codec
        }
    }
}

/// Build the extraction call for one clip.
///
/// `-ss` is always an input option so ffmpeg seeks before decoding; `-t` is
/// applied on the output and omitted for clips that run to the end.
pub fn synthesize_clip(
    source: &Path,
    output: &Path,
    clip: &ClipSpec,
    method: ExtractionMethod,
    options: &SplitOptions,
) -> SplicerResult<Invocation> {
    let source = absolutize(source)?;
    let output = absolutize(output)?;

    let mut command = FfmpegCommand::new(&output);
    if clip.start_time > 0.0 {
        command = command.seek(clip.start_time);
    }
    command = command.input(&source);

    if let ClipLength::Seconds(seconds) = clip.length {
        command = command.duration(seconds);
    }

    command = match method {
        ExtractionMethod::Copy => command
            .video_codec(COPY_CODEC)
            .audio_codec(COPY_CODEC)
            .output_args(["-avoid_negative_ts", "make_zero"]),
        ExtractionMethod::Reencode => {
            let video_codec = options.effective_video_codec();
            let mut command = command.video_codec(video_codec);
            if EncodeSettings::accepts_quality_options(video_codec) {
                command = command
                    .crf(options.encode.crf)
                    .preset(options.encode.preset.as_str());
            }
            command.audio_codec(options.effective_audio_codec())
        }
    };

    command = command.output_args(options.extra_args.iter().map(String::as_str));

    Ok(Invocation {
        args: command.build_args(),
        output,
        list_file: None,
    })
}

/// Split an `--extra` string into arguments, honouring single and double quotes
pub fn split_extra_args(extra: &str) -> SplicerResult<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in extra.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    args.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err(SplicerError::parameter(
            "extra",
            format!("unterminated quote in '{}'", extra),
        ));
    }
    if in_token {
        args.push(current);
    }

    Ok(args)
}
