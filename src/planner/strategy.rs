//! Extraction strategy selection

use serde::{Deserialize, Serialize};

use crate::domain::model::{ClipSpec, MediaProbe};
use crate::domain::rules::CopySupport;
use crate::engine::{ExtractionMethod, SplitOptions};
use crate::error::{SplicerError, SplicerResult};

/// Frame duration assumed when the source reports no frame rate
const FALLBACK_FRAME_DURATION: f64 = 1.0 / 30.0;

/// Seconds searched on each side of a cut for keyframes
pub const KEYFRAME_WINDOW: f64 = 2.0;

/// Requested extraction mode
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Copy when the source allows it; cuts snap to keyframes
    #[default]
    Auto,
    /// Copy only when the cut start sits on a keyframe
    Exact,
    /// Always copy
    Copy,
    /// Always re-encode
    Reencode,
}

/// Chooses how each clip is extracted
#[derive(Debug, Clone)]
pub struct StrategyPlanner {
    mode: ExtractionMode,
    base: ExtractionMethod,
    frame_duration: f64,
}

impl StrategyPlanner {
    /// Decide the method shared by every clip of `source`
    pub fn new(
        mode: ExtractionMode,
        source: &MediaProbe,
        options: &SplitOptions,
    ) -> SplicerResult<Self> {
        let base = match mode {
            ExtractionMode::Copy if options.requests_encoding() => {
                return Err(SplicerError::parameter(
                    "mode",
                    "copy mode cannot be combined with a non-copy codec",
                ))
            }
            ExtractionMode::Copy => ExtractionMethod::Copy,
            ExtractionMode::Reencode => ExtractionMethod::Reencode,
            ExtractionMode::Auto | ExtractionMode::Exact => {
                if options.requests_encoding() {
                    ExtractionMethod::Reencode
                } else if CopySupport::allows_copy(source) {
                    ExtractionMethod::Copy
                } else {
                    tracing::info!(
                        codec = %source.profile.codec_name,
                        container = %source.format_name,
                        "Source does not allow stream copy, clips will be re-encoded"
                    );
                    ExtractionMethod::Reencode
                }
            }
        };

        let frame_duration = source
            .profile
            .frame_rate
            .map(|rate| rate.frame_duration())
            .unwrap_or(FALLBACK_FRAME_DURATION);

        Ok(Self {
            mode,
            base,
            frame_duration,
        })
    }

    /// Method chosen for the whole run before any per-clip check
    pub fn base_method(&self) -> ExtractionMethod {
        self.base
    }

    /// Whether `method_for` needs keyframes for `clip`
    pub fn needs_keyframes(&self, clip: &ClipSpec) -> bool {
        self.mode == ExtractionMode::Exact
            && self.base == ExtractionMethod::Copy
            && clip.start_time > 0.0
    }

    /// Keyframe search window for `clip`
    pub fn keyframe_window(&self, clip: &ClipSpec) -> (f64, f64) {
        (
            (clip.start_time - KEYFRAME_WINDOW).max(0.0),
            clip.start_time + KEYFRAME_WINDOW,
        )
    }

    /// Final method for one clip; `keyframes` is only consulted in exact mode
    pub fn method_for(&self, clip: &ClipSpec, keyframes: &[f64]) -> ExtractionMethod {
        if !self.needs_keyframes(clip) {
            return self.base;
        }
        if near_keyframe(clip.start_time, keyframes, self.frame_duration) {
            ExtractionMethod::Copy
        } else {
            tracing::debug!(
                clip = clip.index,
                start = clip.start_time,
                "Cut start is off keyframe, re-encoding clip"
            );
            ExtractionMethod::Reencode
        }
    }
}

/// Some keyframe lies within `tolerance` seconds of `time`
pub fn near_keyframe(time: f64, keyframes: &[f64], tolerance: f64) -> bool {
    keyframes.iter().any(|kf| (kf - time).abs() <= tolerance)
}
