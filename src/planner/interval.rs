//! Uniform interval splitting

use serde::{Deserialize, Serialize};

use crate::domain::model::{ClipLength, ClipSpec};
use crate::error::{SplicerError, SplicerResult};
use crate::utils::time::segment_count;

/// Default share of the size limit actually targeted
pub const DEFAULT_FILESIZE_FACTOR: f64 = 0.95;

/// Most clips a single split may produce
pub const MAX_CLIPS: u32 = 10_000;

/// How a size limit is turned into an interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChunkStrategy {
    /// Largest interval whose clips stay under the limit; the last clip is short
    Eager,
    /// Fewest equally long clips that stay under the limit
    Even,
}

/// Where the uniform interval comes from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntervalSource {
    /// Fixed clip length in seconds
    Seconds(f64),
    /// Number of equally long clips
    Chunks(u32),
    /// Target clip size in bytes
    FileSize {
        max_bytes: u64,
        factor: f64,
        strategy: ChunkStrategy,
    },
}

impl IntervalSource {
    /// Reject parameters that can never produce clips, whatever the source
    pub fn validate(&self) -> SplicerResult<()> {
        match *self {
            IntervalSource::Seconds(seconds) => {
                if !seconds.is_finite() || seconds <= 0.0 {
                    return Err(SplicerError::parameter(
                        "split-size",
                        format!("interval must be positive, got {}", seconds),
                    ));
                }
            }
            IntervalSource::Chunks(count) => {
                if count == 0 {
                    return Err(SplicerError::parameter(
                        "split-chunks",
                        "chunk count must be at least 1",
                    ));
                }
                if count > MAX_CLIPS {
                    return Err(SplicerError::parameter(
                        "split-chunks",
                        format!("chunk count must not exceed {}, got {}", MAX_CLIPS, count),
                    ));
                }
            }
            IntervalSource::FileSize {
                max_bytes, factor, ..
            } => {
                if max_bytes == 0 {
                    return Err(SplicerError::parameter(
                        "split-filesize",
                        "size limit must be positive",
                    ));
                }
                if !(factor > 0.0 && factor <= 1.0) {
                    return Err(SplicerError::parameter(
                        "filesize-factor",
                        format!("factor must be in (0, 1], got {}", factor),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Clip length in seconds for a source of `duration` seconds and `file_size` bytes
    pub fn interval_seconds(&self, duration: f64, file_size: u64) -> SplicerResult<f64> {
        self.validate()?;
        match *self {
            IntervalSource::Seconds(seconds) => Ok(seconds),
            IntervalSource::Chunks(count) => Ok(duration / count as f64),
            IntervalSource::FileSize {
                max_bytes,
                factor,
                strategy,
            } => {
                if file_size == 0 {
                    return Err(SplicerError::parameter(
                        "split-filesize",
                        "source file is empty",
                    ));
                }

                let target = max_bytes as f64 * factor;
                let size = file_size as f64;
                match strategy {
                    ChunkStrategy::Even => {
                        let chunks = (size / target).ceil().max(1.0);
                        Ok(duration / chunks)
                    }
                    ChunkStrategy::Eager => Ok(target / size * duration),
                }
            }
        }
    }
}

/// Consecutive clips of `interval` seconds covering `duration`.
/// The final clip is truncated to what remains of the source.
pub fn interval_clips(duration: f64, interval: f64) -> SplicerResult<Vec<ClipSpec>> {
    if !interval.is_finite() || interval <= 0.0 {
        return Err(SplicerError::parameter(
            "split-size",
            format!("interval must be positive, got {}", interval),
        ));
    }
    if !duration.is_finite() || duration <= 0.0 {
        return Err(SplicerError::parameter(
            "duration",
            format!("source duration must be positive, got {}", duration),
        ));
    }

    if duration <= interval {
        tracing::warn!(
            duration,
            interval,
            "Source is not longer than the split interval, producing a single clip"
        );
    }

    let count = segment_count(duration, interval);
    if count > MAX_CLIPS {
        return Err(SplicerError::parameter(
            "interval",
            format!(
                "{}s clips over {}s would produce {} clips, more than {}",
                interval, duration, count, MAX_CLIPS
            ),
        ));
    }
    let mut clips = Vec::with_capacity(count as usize);

    for index in 0..count {
        let start = index as f64 * interval;
        let length = if index + 1 == count {
            (duration - start).min(interval)
        } else {
            interval
        };
        clips.push(ClipSpec::new(index, start, ClipLength::Seconds(length))?);
    }

    Ok(clips)
}
