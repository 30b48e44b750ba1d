//! Split planning: manifest or interval parameters to an ordered clip list

pub mod interval;
pub mod manifest;
pub mod strategy;

use std::collections::HashSet;
use std::path::PathBuf;

use crate::domain::model::{ClipLength, ClipSpec, MediaProbe};
use crate::error::{SplicerError, SplicerResult};
use crate::ports::ProbePort;
use crate::utils::path::{
    absolutize, default_output_dir, ensure_directory, extension_of, is_plain_file_name,
};
use crate::utils::time::BOUNDARY_EPSILON;

pub use interval::{interval_clips, ChunkStrategy, IntervalSource, DEFAULT_FILESIZE_FACTOR};
pub use manifest::{load_manifest, parse_manifest, Manifest, ManifestEntry, ManifestFormat};
pub use strategy::{ExtractionMode, StrategyPlanner};

/// Where the clip ranges come from
#[derive(Debug, Clone, PartialEq)]
pub enum ClipSource {
    Manifest(PathBuf),
    Interval(IntervalSource),
}

/// Inputs of one split run
#[derive(Debug, Clone)]
pub struct SplitRequest {
    /// Source file; overrides the manifest's `input_file`
    pub source: Option<PathBuf>,
    pub clips: ClipSource,
    /// Overrides the derived `Clip-<stem>` directory
    pub output_dir: Option<PathBuf>,
}

/// Everything needed to synthesize the clip invocations
#[derive(Debug, Clone)]
pub struct SplitPlan {
    pub source: MediaProbe,
    pub output_dir: PathBuf,
    pub extension: String,
    pub clips: Vec<ClipSpec>,
}

impl SplitPlan {
    /// Absolute output path of `clip`
    pub fn output_path(&self, clip: &ClipSpec) -> PathBuf {
        self.output_dir.join(clip.file_name(&self.extension))
    }
}

enum PendingClips {
    Entries(String, Vec<ManifestEntry>),
    Interval(IntervalSource),
}

/// Resolves a split request against the probed source
pub struct SplitResolver<'a> {
    probe: &'a dyn ProbePort,
}

impl<'a> SplitResolver<'a> {
    pub fn new(probe: &'a dyn ProbePort) -> Self {
        Self { probe }
    }

    /// Build the plan and create the output directory.
    /// Every range is checked before the directory is touched.
    pub fn resolve(&self, request: &SplitRequest) -> SplicerResult<SplitPlan> {
        let (source_path, pending) = match &request.clips {
            ClipSource::Manifest(manifest_path) => {
                let manifest = load_manifest(manifest_path)?;
                let origin = manifest_path.display().to_string();
                let source = request
                    .source
                    .clone()
                    .or(manifest.input_file)
                    .ok_or_else(|| SplicerError::ManifestValidation {
                        path: origin.clone(),
                        message: "missing field `input_file` and no source file given"
                            .to_string(),
                    })?;
                (source, PendingClips::Entries(origin, manifest.entries))
            }
            ClipSource::Interval(interval) => {
                let source = request.source.clone().ok_or_else(|| {
                    SplicerError::parameter("file", "a source file is required for interval splitting")
                })?;
                interval.validate()?;
                (source, PendingClips::Interval(*interval))
            }
        };

        let source_path = absolutize(&source_path)?;
        if !source_path.is_file() {
            return Err(SplicerError::probe(
                source_path.display().to_string(),
                "file does not exist",
            ));
        }

        let source = self.probe.probe_media(&source_path)?;
        let extension = extension_of(&source_path);

        let clips = match pending {
            PendingClips::Entries(origin, entries) => {
                manifest_clips(&entries, source.duration, &extension, &origin)?
            }
            PendingClips::Interval(interval) => {
                let duration = source.require_duration()?;
                let file_size = std::fs::metadata(&source_path)?.len();
                let seconds = interval.interval_seconds(duration, file_size)?;
                tracing::info!(duration, interval = seconds, "Splitting by interval");
                interval_clips(duration, seconds)?
            }
        };

        let output_dir = match &request.output_dir {
            Some(dir) => absolutize(dir)?,
            None => default_output_dir(&source_path)?,
        };
        ensure_directory(&output_dir)?;
        tracing::info!(dir = %output_dir.display(), clips = clips.len(), "Output directory ready");

        Ok(SplitPlan {
            source,
            output_dir,
            extension,
            clips,
        })
    }
}

/// Turn manifest entries into clips, indexed by position.
/// Ranges are checked against `duration` when it is known.
pub fn manifest_clips(
    entries: &[ManifestEntry],
    duration: Option<f64>,
    extension: &str,
    origin: &str,
) -> SplicerResult<Vec<ClipSpec>> {
    let mut clips = Vec::with_capacity(entries.len());
    let mut names = HashSet::new();

    for (position, entry) in entries.iter().enumerate() {
        let index = position as u32;

        if let Some(duration) = duration {
            check_range(index, entry, duration)?;
        }

        let mut clip = ClipSpec::new(index, entry.start_time, entry.length)?;
        if let Some(name) = &entry.name {
            if !is_plain_file_name(name) {
                return Err(SplicerError::ManifestValidation {
                    path: origin.to_string(),
                    message: format!("clip {} name '{}' is not a plain file name", index, name),
                });
            }
            clip = clip.with_name(strip_extension(name, extension));
        }

        let file_name = clip.file_name(extension);
        if !names.insert(file_name.clone()) {
            return Err(SplicerError::ManifestValidation {
                path: origin.to_string(),
                message: format!("clip {} reuses output name {}", index, file_name),
            });
        }

        clips.push(clip);
    }

    Ok(clips)
}

fn check_range(index: u32, entry: &ManifestEntry, duration: f64) -> SplicerResult<()> {
    let out_of_range = entry.start_time >= duration
        || match entry.length {
            ClipLength::Seconds(length) => entry.start_time + length > duration + BOUNDARY_EPSILON,
            ClipLength::ToEnd => false,
        };

    if out_of_range {
        return Err(SplicerError::InvalidRange {
            index,
            start: entry.start_time,
            length: entry.length.to_string(),
            duration,
        });
    }
    Ok(())
}

fn strip_extension(name: &str, extension: &str) -> String {
    let suffix = format!(".{}", extension);
    match name.strip_suffix(&suffix) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}
