// Domain rules - Compatibility and copy-capability policies

use std::fmt;
use std::path::PathBuf;

use crate::domain::model::*;

/// Profile field compared when deciding whether inputs can be concatenated losslessly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Codec,
    Resolution,
    FrameRate,
    AudioCodec,
    SampleRate,
    ChannelLayout,
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProfileField::Codec => "codec",
            ProfileField::Resolution => "resolution",
            ProfileField::FrameRate => "frame rate",
            ProfileField::AudioCodec => "audio codec",
            ProfileField::SampleRate => "sample rate",
            ProfileField::ChannelLayout => "channel layout",
        };
        write!(f, "{}", name)
    }
}

/// One diverging field between the reference input and a candidate
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileMismatch {
    pub field: ProfileField,
    pub reference: PathBuf,
    pub candidate: PathBuf,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for ProfileMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Incompatible {}: {} vs {} ({})",
            self.field,
            self.expected,
            self.actual,
            self.candidate.display()
        )
    }
}

/// Result of the compatibility check over all merge inputs
#[derive(Debug, Clone, PartialEq)]
pub struct CompatibilityReport {
    pub mode: MergeMode,
    pub mismatches: Vec<ProfileMismatch>,
}

impl CompatibilityReport {
    /// Fields that diverged anywhere, in first-seen order
    pub fn diverging_fields(&self) -> Vec<ProfileField> {
        let mut fields = Vec::new();
        for mismatch in &self.mismatches {
            if !fields.contains(&mismatch.field) {
                fields.push(mismatch.field);
            }
        }
        fields
    }

    /// Human readable summary of every mismatch
    pub fn describe(&self) -> String {
        self.mismatches
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Business rules for concat compatibility
pub struct CompatibilityChecker;

impl CompatibilityChecker {
    /// Every field on which two profiles differ, with both rendered values
    pub fn differences(a: &StreamProfile, b: &StreamProfile) -> Vec<(ProfileField, String, String)> {
        let mut diffs = Vec::new();

        if a.codec_name != b.codec_name {
            diffs.push((ProfileField::Codec, a.codec_name.clone(), b.codec_name.clone()));
        }
        if a.width != b.width || a.height != b.height {
            diffs.push((ProfileField::Resolution, a.resolution(), b.resolution()));
        }
        if a.frame_rate != b.frame_rate {
            diffs.push((
                ProfileField::FrameRate,
                render(&a.frame_rate),
                render(&b.frame_rate),
            ));
        }
        if a.audio_codec != b.audio_codec {
            diffs.push((
                ProfileField::AudioCodec,
                render(&a.audio_codec),
                render(&b.audio_codec),
            ));
        }
        if a.sample_rate != b.sample_rate {
            diffs.push((
                ProfileField::SampleRate,
                render(&a.sample_rate),
                render(&b.sample_rate),
            ));
        }
        if a.channel_layout != b.channel_layout {
            diffs.push((
                ProfileField::ChannelLayout,
                render(&a.channel_layout),
                render(&b.channel_layout),
            ));
        }

        diffs
    }

    /// Whether two profiles may be stream-copied into one file
    pub fn are_compatible(a: &StreamProfile, b: &StreamProfile) -> bool {
        Self::differences(a, b).is_empty()
    }

    /// Compare every input against the first; equality is transitive so this covers all pairs
    pub fn check(inputs: &[MediaProbe]) -> CompatibilityReport {
        let mut mismatches = Vec::new();

        if let Some((reference, rest)) = inputs.split_first() {
            for candidate in rest {
                for (field, expected, actual) in
                    Self::differences(&reference.profile, &candidate.profile)
                {
                    mismatches.push(ProfileMismatch {
                        field,
                        reference: reference.path.clone(),
                        candidate: candidate.path.clone(),
                        expected,
                        actual,
                    });
                }
            }
        }

        let mode = if mismatches.is_empty() {
            MergeMode::Copy
        } else {
            MergeMode::Reencode
        };

        CompatibilityReport { mode, mismatches }
    }
}

fn render<T: fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "none".to_string(),
    }
}

/// Business rules for seek-and-copy extraction
pub struct CopySupport;

impl CopySupport {
    /// Video codecs that survive a keyframe-snapped stream copy
    pub fn codec_supports_copy(codec: &str) -> bool {
        matches!(
            codec,
            "h264" | "hevc" | "vp8" | "vp9" | "av1" | "mpeg4" | "mpeg2video" | "prores" | "mjpeg"
        )
    }

    /// Containers that accept copied packets with shifted timestamps.
    /// ffprobe reports aliases as a comma separated list, e.g. `mov,mp4,m4a,3gp,3g2,mj2`.
    pub fn container_supports_copy(format_name: &str) -> bool {
        format_name.split(',').any(|name| {
            matches!(
                name.trim(),
                "mov" | "mp4" | "matroska" | "webm" | "mpegts" | "avi" | "flv"
            )
        })
    }

    /// Both codec and container allow a copy extraction
    pub fn allows_copy(probe: &MediaProbe) -> bool {
        Self::codec_supports_copy(&probe.profile.codec_name)
            && Self::container_supports_copy(&probe.format_name)
    }
}

#[cfg(test)]
mod tests;
