//! FFprobe adapter for media file probing
//!
//! Runs `ffprobe` with JSON output and maps the first video stream and the
//! first audio stream onto a [`MediaProbe`].

use std::path::Path;

use serde::Deserialize;

use crate::adapters::env_locale::Utf8Environment;
use crate::adapters::tool::{run_captured, stderr_tail, ToolLocator};
use crate::domain::model::*;
use crate::error::{SplicerError, SplicerResult};
use crate::ports::ProbePort;
use crate::utils::time::format_ffmpeg_seconds;

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    #[serde(default)]
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    sample_rate: Option<String>,
    channel_layout: Option<String>,
    channels: Option<u32>,
    duration: Option<String>,
    #[serde(default)]
    disposition: Option<FfprobeDisposition>,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeDisposition {
    #[serde(default)]
    attached_pic: u8,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    format_name: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFrames {
    #[serde(default)]
    frames: Vec<FfprobeFrame>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFrame {
    pts_time: Option<String>,
    best_effort_timestamp_time: Option<String>,
}

/// FFprobe-based probe adapter
#[derive(Debug)]
pub struct FfprobeAdapter {
    tool: ToolLocator,
    env: Utf8Environment,
}

impl FfprobeAdapter {
    /// Create new FFprobe adapter; `program` is resolved on first use
    pub fn new(program: impl Into<String>, env: Utf8Environment) -> Self {
        Self {
            tool: ToolLocator::new(program),
            env,
        }
    }

    fn run(&self, file_path: &Path, args: &[&str]) -> SplicerResult<Vec<u8>> {
        let mut full_args: Vec<&std::ffi::OsStr> =
            args.iter().map(|a| std::ffi::OsStr::new(*a)).collect();
        full_args.push(file_path.as_os_str());

        tracing::debug!(file = %file_path.display(), "Running ffprobe");
        let output = run_captured(&self.tool, full_args, &self.env)?;

        if !output.status.success() {
            let stderr = stderr_tail(&output.stderr);
            return Err(SplicerError::probe(
                file_path.display().to_string(),
                if stderr.is_empty() {
                    format!("ffprobe exited with {}", output.status)
                } else {
                    stderr
                },
            ));
        }
        Ok(output.stdout)
    }
}

impl ProbePort for FfprobeAdapter {
    fn probe_media(&self, file_path: &Path) -> SplicerResult<MediaProbe> {
        let stdout = self.run(
            file_path,
            &[
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ],
        )?;
        parse_media_probe(file_path, &stdout)
    }

    fn probe_keyframes(&self, file_path: &Path, from: f64, to: f64) -> SplicerResult<Vec<f64>> {
        let interval = format!(
            "{}%{}",
            format_ffmpeg_seconds(from),
            format_ffmpeg_seconds(to)
        );
        let stdout = self.run(
            file_path,
            &[
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-skip_frame",
                "nokey",
                "-show_entries",
                "frame=pts_time,best_effort_timestamp_time",
                "-read_intervals",
                &interval,
                "-of",
                "json",
            ],
        )?;
        parse_keyframes(file_path, &stdout)
    }
}

/// Map ffprobe `-show_format -show_streams` JSON onto a probe result
pub fn parse_media_probe(file_path: &Path, json: &[u8]) -> SplicerResult<MediaProbe> {
    let path_text = file_path.display().to_string();
    let parsed: FfprobeOutput = serde_json::from_slice(json)
        .map_err(|e| SplicerError::probe(&path_text, format!("unreadable ffprobe output: {}", e)))?;

    let video = parsed
        .streams
        .iter()
        .filter(|s| s.codec_type.as_deref() == Some("video"))
        .find(|s| {
            s.disposition
                .as_ref()
                .map(|d| d.attached_pic == 0)
                .unwrap_or(true)
        })
        .ok_or_else(|| SplicerError::probe(&path_text, "no video stream"))?;

    let audio = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"));

    let frame_rate = video
        .r_frame_rate
        .as_deref()
        .and_then(FrameRate::parse)
        .or_else(|| video.avg_frame_rate.as_deref().and_then(FrameRate::parse));

    let duration = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .and_then(parse_seconds)
        .or_else(|| video.duration.as_deref().and_then(parse_seconds));

    let format_name = parsed
        .format
        .as_ref()
        .and_then(|f| f.format_name.clone())
        .unwrap_or_default();

    let profile = StreamProfile {
        codec_name: video
            .codec_name
            .clone()
            .unwrap_or_else(|| "unknown".to_string()),
        width: video.width.unwrap_or(0),
        height: video.height.unwrap_or(0),
        frame_rate,
        audio_codec: audio.and_then(|a| a.codec_name.clone()),
        sample_rate: audio
            .and_then(|a| a.sample_rate.as_deref())
            .and_then(|rate| rate.parse().ok()),
        channel_layout: audio.and_then(channel_layout_of),
    };

    Ok(MediaProbe {
        path: file_path.to_path_buf(),
        duration,
        format_name,
        profile,
    })
}

/// Keyframe timestamps from `-show_entries frame=pts_time` JSON, ascending
pub fn parse_keyframes(file_path: &Path, json: &[u8]) -> SplicerResult<Vec<f64>> {
    let parsed: FfprobeFrames = serde_json::from_slice(json).map_err(|e| {
        SplicerError::probe(
            file_path.display().to_string(),
            format!("unreadable keyframe output: {}", e),
        )
    })?;

    let mut times: Vec<f64> = parsed
        .frames
        .iter()
        .filter_map(|frame| {
            frame
                .pts_time
                .as_deref()
                .or(frame.best_effort_timestamp_time.as_deref())
                .and_then(parse_seconds)
        })
        .collect();
    times.sort_by(|a, b| a.total_cmp(b));
    Ok(times)
}

fn parse_seconds(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn channel_layout_of(stream: &FfprobeStream) -> Option<String> {
    match (&stream.channel_layout, stream.channels) {
        (Some(layout), _) if !layout.is_empty() => Some(layout.clone()),
        (_, Some(1)) => Some("mono".to_string()),
        (_, Some(2)) => Some("stereo".to_string()),
        (_, Some(n)) => Some(format!("{} channels", n)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "streams": [
            {"index": 0, "codec_name": "h264", "codec_type": "video", "width": 1920, "height": 1080,
             "r_frame_rate": "30000/1001", "avg_frame_rate": "30000/1001", "duration": "59.993",
             "disposition": {"default": 1, "attached_pic": 0}},
            {"index": 1, "codec_name": "aac", "codec_type": "audio", "sample_rate": "48000",
             "channels": 2, "channel_layout": "stereo"},
            {"index": 2, "codec_name": "mjpeg", "codec_type": "video", "width": 600, "height": 600,
             "r_frame_rate": "90000/1", "disposition": {"attached_pic": 1}}
        ],
        "format": {"filename": "movie.mp4", "format_name": "mov,mp4,m4a,3gp,3g2,mj2", "duration": "60.016000"}
    }"#;

    #[test]
    fn test_parse_media_probe() {
        let probe = parse_media_probe(Path::new("/v/movie.mp4"), SAMPLE.as_bytes()).unwrap();
        assert_eq!(probe.duration, Some(60.016));
        assert_eq!(probe.format_name, "mov,mp4,m4a,3gp,3g2,mj2");
        assert_eq!(probe.profile.codec_name, "h264");
        assert_eq!(probe.profile.resolution(), "1920x1080");
        assert_eq!(probe.profile.frame_rate, FrameRate::new(30000, 1001));
        assert_eq!(probe.profile.audio_codec.as_deref(), Some("aac"));
        assert_eq!(probe.profile.sample_rate, Some(48000));
        assert_eq!(probe.profile.channel_layout.as_deref(), Some("stereo"));
    }

    #[test]
    fn test_cover_art_is_not_the_video_stream() {
        let json = r#"{"streams": [
            {"codec_name": "png", "codec_type": "video", "width": 500, "height": 500,
             "disposition": {"attached_pic": 1}},
            {"codec_name": "hevc", "codec_type": "video", "width": 1280, "height": 720,
             "r_frame_rate": "25/1"}
        ], "format": {"format_name": "matroska,webm", "duration": "10.0"}}"#;
        let probe = parse_media_probe(Path::new("a.mkv"), json.as_bytes()).unwrap();
        assert_eq!(probe.profile.codec_name, "hevc");
        assert!(!probe.profile.has_audio());
    }

    #[test]
    fn test_audio_only_fails() {
        let json = r#"{"streams": [{"codec_name": "mp3", "codec_type": "audio"}], "format": {}}"#;
        let err = parse_media_probe(Path::new("song.mp4"), json.as_bytes()).unwrap_err();
        assert!(matches!(err, SplicerError::ProbeFailure { .. }));
        assert!(err.to_string().contains("no video stream"));
    }

    #[test]
    fn test_duration_falls_back_to_stream() {
        let json = r#"{"streams": [{"codec_name": "vp9", "codec_type": "video",
            "width": 640, "height": 360, "r_frame_rate": "0/0", "avg_frame_rate": "24/1",
            "duration": "12.5"}], "format": {"format_name": "webm"}}"#;
        let probe = parse_media_probe(Path::new("a.webm"), json.as_bytes()).unwrap();
        assert_eq!(probe.duration, Some(12.5));
        assert_eq!(probe.profile.frame_rate, FrameRate::new(24, 1));
    }

    #[test]
    fn test_channel_layout_from_channel_count() {
        let json = r#"{"streams": [
            {"codec_name": "h264", "codec_type": "video", "width": 2, "height": 2},
            {"codec_name": "pcm_s16le", "codec_type": "audio", "channels": 1, "sample_rate": "8000"}
        ]}"#;
        let probe = parse_media_probe(Path::new("a.avi"), json.as_bytes()).unwrap();
        assert_eq!(probe.profile.channel_layout.as_deref(), Some("mono"));
        assert!(probe.duration.is_none());
    }

    #[test]
    fn test_garbage_output() {
        assert!(parse_media_probe(Path::new("a.mp4"), b"not json").is_err());
    }

    #[test]
    fn test_parse_keyframes() {
        let json = r#"{"frames": [
            {"pts_time": "12.012000"},
            {"best_effort_timestamp_time": "10.010000"},
            {"pts_time": "N/A"}
        ]}"#;
        let keyframes = parse_keyframes(Path::new("a.mp4"), json.as_bytes()).unwrap();
        assert_eq!(keyframes, vec![10.01, 12.012]);
    }
}
