// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{SplicerError, SplicerResult};

/// Time specification with precision - represents time in seconds with fractional precision
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub struct TimeSpec {
    pub seconds: f64,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    /// Parse time string: seconds, MM:SS(.ms) or HH:MM:SS(.ms)
    pub fn parse(time_str: &str) -> Result<Self, String> {
        let trimmed = time_str.trim();

        if let Ok(seconds) = trimmed.parse::<f64>() {
            if !seconds.is_finite() {
                return Err("Time must be a finite number".to_string());
            }
            return Ok(Self::from_seconds(seconds));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        if parts.len() == 2 {
            let minutes = parts[0]
                .parse::<u32>()
                .map_err(|_| "Invalid minutes format".to_string())?;
            let seconds_part = parts[1]
                .parse::<f64>()
                .map_err(|_| "Invalid seconds format".to_string())?;

            if !(0.0..60.0).contains(&seconds_part) {
                return Err("Seconds must be less than 60".to_string());
            }

            Ok(Self::from_seconds(minutes as f64 * 60.0 + seconds_part))
        } else if parts.len() == 3 {
            let hours = parts[0]
                .parse::<u32>()
                .map_err(|_| "Invalid hours format".to_string())?;
            let minutes = parts[1]
                .parse::<u32>()
                .map_err(|_| "Invalid minutes format".to_string())?;
            let seconds_part = parts[2]
                .parse::<f64>()
                .map_err(|_| "Invalid seconds format".to_string())?;

            if minutes >= 60 {
                return Err("Minutes must be less than 60".to_string());
            }
            if !(0.0..60.0).contains(&seconds_part) {
                return Err("Seconds must be less than 60".to_string());
            }

            Ok(Self::from_seconds(
                hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds_part,
            ))
        } else {
            Err(
                "Invalid time format. Supported formats: seconds (e.g., 123.45), MM:SS.ms (e.g., 2:30.5), HH:MM:SS.ms (e.g., 1:02:30.5)"
                    .to_string(),
            )
        }
    }

    /// Format as HH:MM:SS.ms
    pub fn format_hms(&self) -> String {
        let total_millis = (self.seconds * 1000.0).round() as u64;
        let hours = total_millis / 3_600_000;
        let minutes = (total_millis % 3_600_000) / 60_000;
        let seconds = (total_millis % 60_000) / 1000;
        let milliseconds = total_millis % 1000;

        if hours > 0 {
            format!("{}:{:02}:{:02}.{:03}", hours, minutes, seconds, milliseconds)
        } else {
            format!("{}:{:02}.{:03}", minutes, seconds, milliseconds)
        }
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hms())
    }
}

/// How much of the source a clip captures
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClipLength {
    /// Fixed number of seconds from the start point
    Seconds(f64),
    /// Everything from the start point to the end of the source
    ToEnd,
}

impl fmt::Display for ClipLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipLength::Seconds(seconds) => write!(f, "{:.3}s", seconds),
            ClipLength::ToEnd => write!(f, "to end"),
        }
    }
}

/// One clip to extract from the source
#[derive(Debug, Clone, PartialEq)]
pub struct ClipSpec {
    pub index: u32,
    pub start_time: f64,
    pub length: ClipLength,
    /// Replaces the `clip-<index>` file stem when set
    pub name: Option<String>,
}

impl ClipSpec {
    /// Create new clip spec with validation
    pub fn new(index: u32, start_time: f64, length: ClipLength) -> SplicerResult<Self> {
        if !start_time.is_finite() || start_time < 0.0 {
            return Err(SplicerError::parameter(
                "start_time",
                format!("clip {} start must be a non-negative number, got {}", index, start_time),
            ));
        }
        if let ClipLength::Seconds(seconds) = length {
            if !seconds.is_finite() || seconds <= 0.0 {
                return Err(SplicerError::parameter(
                    "length",
                    format!("clip {} length must be positive, got {}", index, seconds),
                ));
            }
        }

        Ok(Self {
            index,
            start_time,
            length,
            name: None,
        })
    }

    /// Attach a custom output file stem
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// End of the clip in source time, if bounded
    pub fn end_time(&self) -> Option<f64> {
        match self.length {
            ClipLength::Seconds(seconds) => Some(self.start_time + seconds),
            ClipLength::ToEnd => None,
        }
    }

    /// Output file name for this clip with the given extension
    pub fn file_name(&self, extension: &str) -> String {
        let stem = match &self.name {
            Some(name) => name.clone(),
            None => format!("clip-{}", self.index),
        };
        format!("{}.{}", stem, extension)
    }
}

/// Frame rate as a reduced rational number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRate {
    pub num: u32,
    pub den: u32,
}

impl FrameRate {
    /// Create a reduced frame rate; zero components are rejected
    pub fn new(num: u32, den: u32) -> Option<Self> {
        if num == 0 || den == 0 {
            return None;
        }
        let divisor = gcd(num, den);
        Some(Self {
            num: num / divisor,
            den: den / divisor,
        })
    }

    /// Parse ffprobe rational notation such as `30000/1001` or `25`
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        match value.split_once('/') {
            Some((num, den)) => Self::new(num.trim().parse().ok()?, den.trim().parse().ok()?),
            None => Self::new(value.parse().ok()?, 1),
        }
    }

    /// Frames per second
    pub fn as_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Duration of one frame in seconds
    pub fn frame_duration(&self) -> f64 {
        self.den as f64 / self.num as f64
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Encoding parameters that decide whether inputs can be stream-copied together
#[derive(Debug, Clone, PartialEq)]
pub struct StreamProfile {
    pub codec_name: String,
    pub width: u32,
    pub height: u32,
    pub frame_rate: Option<FrameRate>,
    pub audio_codec: Option<String>,
    pub sample_rate: Option<u32>,
    pub channel_layout: Option<String>,
}

impl StreamProfile {
    /// Whether the input carries an audio stream
    pub fn has_audio(&self) -> bool {
        self.audio_codec.is_some()
    }

    /// Resolution as `WxH`
    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// Everything the prober learns about one file
#[derive(Debug, Clone, PartialEq)]
pub struct MediaProbe {
    pub path: PathBuf,
    pub duration: Option<f64>,
    pub format_name: String,
    pub profile: StreamProfile,
}

impl MediaProbe {
    /// Duration or a probe failure when the tool reported none
    pub fn require_duration(&self) -> SplicerResult<f64> {
        match self.duration {
            Some(duration) if duration.is_finite() && duration > 0.0 => Ok(duration),
            _ => Err(SplicerError::probe(
                self.path.display().to_string(),
                "source duration is unknown",
            )),
        }
    }
}

/// Concatenation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Concat demuxer with stream copy
    Copy,
    /// Filter-graph concat with re-encoding
    Reencode,
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeMode::Copy => write!(f, "copy"),
            MergeMode::Reencode => write!(f, "reencode"),
        }
    }
}

/// Plan for combining a directory of clips
#[derive(Debug, Clone)]
pub struct MergePlan {
    pub ordered_inputs: Vec<MediaProbe>,
    pub output_path: PathBuf,
    pub mode: MergeMode,
}

impl MergePlan {
    /// Create new merge plan; inputs must not be empty
    pub fn new(
        ordered_inputs: Vec<MediaProbe>,
        output_path: PathBuf,
        mode: MergeMode,
    ) -> SplicerResult<Self> {
        if ordered_inputs.is_empty() {
            return Err(SplicerError::NoInputs {
                dir: output_path
                    .parent()
                    .unwrap_or_else(|| Path::new("."))
                    .display()
                    .to_string(),
            });
        }

        Ok(Self {
            ordered_inputs,
            output_path,
            mode,
        })
    }

    /// Profile every input is normalised to when re-encoding
    pub fn reference_profile(&self) -> &StreamProfile {
        &self.ordered_inputs[0].profile
    }

    /// Sum of the probed input durations, if all are known
    pub fn total_input_duration(&self) -> Option<f64> {
        self.ordered_inputs.iter().map(|input| input.duration).sum()
    }
}

/// Outcome of one external tool call
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationResult {
    pub exit_code: Option<i32>,
    pub stderr_text: String,
    pub produced_path: Option<PathBuf>,
}

impl InvocationResult {
    /// Exit code zero and the output file exists
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0) && self.produced_path.is_some()
    }
}

/// Lifecycle of a clip or merge job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Resolved,
    Synthesized,
    Executing,
    Succeeded,
    Failed,
}

impl JobState {
    /// Whether `next` is a legal successor of this state
    pub fn can_transition_to(self, next: JobState) -> bool {
        use JobState::*;
        matches!(
            (self, next),
            (Pending, Resolved)
                | (Resolved, Synthesized)
                | (Synthesized, Executing)
                | (Executing, Succeeded)
                | (Pending | Resolved | Synthesized | Executing, Failed)
        )
    }

    /// Succeeded or Failed
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Pending => "pending",
            JobState::Resolved => "resolved",
            JobState::Synthesized => "synthesized",
            JobState::Executing => "executing",
            JobState::Succeeded => "succeeded",
            JobState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Tracks one job through its lifecycle
#[derive(Debug, Clone)]
pub struct JobTracker {
    label: String,
    state: JobState,
}

impl JobTracker {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            state: JobState::Pending,
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Move to `next`; illegal transitions are ignored and logged
    pub fn advance(&mut self, next: JobState) -> bool {
        if !self.state.can_transition_to(next) {
            tracing::warn!(job = %self.label, from = %self.state, to = %next, "Ignoring illegal job transition");
            return false;
        }
        tracing::debug!(job = %self.label, from = %self.state, to = %next, "Job transition");
        self.state = next;
        true
    }

    /// Mark failed from any non-terminal state
    pub fn fail(&mut self) {
        self.advance(JobState::Failed);
    }
}
