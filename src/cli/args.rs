//! Command-line argument definitions

use std::path::PathBuf;

use clap::{ArgGroup, Args};

use crate::config_initialization::MAX_CRF;
use crate::domain::model::TimeSpec;
use crate::planner::{ChunkStrategy, ExtractionMode, IntervalSource, DEFAULT_FILESIZE_FACTOR};

/// Arguments for the split command
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("clip_source")
        .required(true)
        .args(["manifest", "split_size", "split_chunks", "split_filesize"])
))]
pub struct SplitArgs {
    /// Source video file (overrides the manifest's input_file)
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// JSON, YAML or CSV manifest describing the clips
    #[arg(short, long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Clip length (seconds, MM:SS(.ms) or HH:MM:SS(.ms))
    #[arg(short = 's', long, value_name = "TIME", value_parser = parse_interval, requires = "file")]
    pub split_size: Option<f64>,

    /// Number of equally long clips
    #[arg(short = 'c', long, value_name = "N", requires = "file")]
    pub split_chunks: Option<u32>,

    /// Target clip size in bytes
    #[arg(short = 'S', long, value_name = "BYTES", requires = "file")]
    pub split_filesize: Option<u64>,

    /// Share of --split-filesize actually targeted
    #[arg(long, value_name = "F", default_value_t = DEFAULT_FILESIZE_FACTOR)]
    pub filesize_factor: f64,

    /// How --split-filesize becomes an interval
    #[arg(long, value_enum, default_value_t = ChunkStrategy::Eager)]
    pub chunk_strategy: ChunkStrategy,

    /// Extraction strategy
    #[arg(long, value_enum, default_value_t = ExtractionMode::Auto)]
    pub mode: ExtractionMode,

    /// Video codec; anything but "copy" re-encodes
    #[arg(short, long = "vcodec", value_name = "CODEC", default_value = "copy")]
    pub vcodec: String,

    /// Audio codec; anything but "copy" re-encodes
    #[arg(short, long = "acodec", value_name = "CODEC", default_value = "copy")]
    pub acodec: String,

    /// Extra ffmpeg output arguments, e.g. "-movflags +faststart"
    #[arg(short, long, value_name = "ARGS", allow_hyphen_values = true)]
    pub extra: Option<String>,

    /// Output directory (default: Clip-<stem> next to the source)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Constant Rate Factor for re-encoded clips (0-51)
    #[arg(long, value_parser = parse_crf)]
    pub crf: Option<u8>,

    /// Encoder preset for re-encoded clips
    #[arg(long)]
    pub preset: Option<String>,
}

impl SplitArgs {
    /// Interval parameters, if the manifest was not chosen
    pub fn interval(&self) -> Option<IntervalSource> {
        if let Some(seconds) = self.split_size {
            return Some(IntervalSource::Seconds(seconds));
        }
        if let Some(count) = self.split_chunks {
            return Some(IntervalSource::Chunks(count));
        }
        self.split_filesize.map(|max_bytes| IntervalSource::FileSize {
            max_bytes,
            factor: self.filesize_factor,
            strategy: self.chunk_strategy,
        })
    }
}

/// Arguments for the merge command
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Directory holding the clips
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Merged file name, created inside DIR (default: output.mp4)
    #[arg(short, long, value_name = "NAME")]
    pub output: Option<String>,

    /// Fail instead of re-encoding when clips differ
    #[arg(long)]
    pub strict: bool,

    /// Order clip-2 before clip-10
    #[arg(long)]
    pub natural_sort: bool,

    /// Check the merged duration against the inputs
    #[arg(long)]
    pub verify: bool,

    /// Constant Rate Factor for re-encoded merges (0-51)
    #[arg(long, value_parser = parse_crf)]
    pub crf: Option<u8>,

    /// Encoder preset for re-encoded merges
    #[arg(long)]
    pub preset: Option<String>,
}

fn parse_interval(value: &str) -> Result<f64, String> {
    TimeSpec::parse(value).map(|t| t.seconds)
}

fn parse_crf(value: &str) -> Result<u8, String> {
    clap_num::number_range(value, 0, MAX_CRF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct SplitOnly {
        #[command(flatten)]
        args: SplitArgs,
    }

    fn parse(args: &[&str]) -> Result<SplitArgs, clap::Error> {
        let mut full = vec!["split"];
        full.extend_from_slice(args);
        SplitOnly::try_parse_from(full).map(|p| p.args)
    }

    #[test]
    fn test_interval_accepts_timestamps() {
        let args = parse(&["-f", "movie.mp4", "-s", "01:30"]).unwrap();
        assert_eq!(args.interval(), Some(IntervalSource::Seconds(90.0)));
    }

    #[test]
    fn test_manifest_conflicts_with_interval() {
        let err = parse(&["-m", "clips.json", "-f", "movie.mp4", "-s", "60"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_clip_source_required() {
        let err = parse(&["-f", "movie.mp4"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_interval_requires_file() {
        assert!(parse(&["-c", "4"]).is_err());
    }

    #[test]
    fn test_filesize_defaults() {
        let args = parse(&["-f", "movie.mp4", "-S", "1000000"]).unwrap();
        assert_eq!(
            args.interval(),
            Some(IntervalSource::FileSize {
                max_bytes: 1_000_000,
                factor: 0.95,
                strategy: ChunkStrategy::Eager,
            })
        );
    }

    #[test]
    fn test_manifest_has_no_interval() {
        let args = parse(&["-m", "clips.yaml"]).unwrap();
        assert!(args.interval().is_none());
        assert_eq!(args.vcodec, "copy");
        assert_eq!(args.mode, ExtractionMode::Auto);
    }

    #[test]
    fn test_crf_range() {
        assert_eq!(parse_crf("0"), Ok(0));
        assert_eq!(parse_crf("51"), Ok(51));
        assert!(parse_crf("52").is_err());
        assert!(parse_crf("fast").is_err());
    }
}
