//! Command implementations

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::app::{AppContainer, MergeJob, SplitJob};
use crate::cli::args::{MergeArgs, SplitArgs};
use crate::config_initialization::Settings;
use crate::domain::model::MergeMode;
use crate::engine::split::split_extra_args;
use crate::engine::SplitOptions;
use crate::planner::{ClipSource, SplitRequest};
use crate::probe::SortOrder;

/// Execute the split command
pub fn split(args: SplitArgs, container: &dyn AppContainer, settings: &Settings) -> Result<()> {
    let job = split_job(args, settings)?;
    info!("Starting split operation");

    let report = container
        .split_interactor()
        .execute(&job)
        .context("Split failed")?;

    for clip in &report.clips {
        println!("{}", clip.path.display());
    }
    info!(
        "Split completed: {} clips in {}",
        report.clips.len(),
        report.output_dir.display()
    );
    Ok(())
}

/// Execute the merge command
pub fn merge(args: MergeArgs, container: &dyn AppContainer, settings: &Settings) -> Result<()> {
    let job = merge_job(args, settings);
    info!("Starting merge operation");
    info!("Directory: {}", job.dir.display());

    let report = container
        .merge_interactor()
        .execute(&job)
        .with_context(|| format!("Failed to merge {}", job.dir.display()))?;

    if report.mode == MergeMode::Reencode {
        for mismatch in &report.mismatches {
            warn!("Re-encoded because {}", mismatch);
        }
    }
    if let Some(check) = &report.verification {
        info!(
            "Verification passed: {:.3}s merged, {:.3}s expected",
            check.actual, check.expected
        );
    }

    println!("{}", report.output.display());
    info!(
        "Merge completed: {} inputs, {} mode",
        report.inputs.len(),
        report.mode
    );
    Ok(())
}

/// Translate split arguments into a job
pub fn split_job(args: SplitArgs, settings: &Settings) -> Result<SplitJob> {
    let clips = match (&args.manifest, args.interval()) {
        (Some(manifest), _) => ClipSource::Manifest(manifest.clone()),
        (None, Some(interval)) => ClipSource::Interval(interval),
        (None, None) => anyhow::bail!("Either --manifest or an interval option is required"),
    };

    let extra_args = match &args.extra {
        Some(extra) => split_extra_args(extra).context("Invalid --extra value")?,
        None => Vec::new(),
    };

    Ok(SplitJob {
        request: SplitRequest {
            source: args.file,
            clips,
            output_dir: args.output_dir,
        },
        mode: args.mode,
        options: SplitOptions {
            video_codec: args.vcodec,
            audio_codec: args.acodec,
            extra_args,
            encode: settings.encode.clone(),
        },
    })
}

/// Translate merge arguments into a job
pub fn merge_job(args: MergeArgs, settings: &Settings) -> MergeJob {
    MergeJob {
        dir: args.dir,
        output_name: args.output.unwrap_or_else(|| settings.merge_output.clone()),
        strict: args.strict,
        order: if args.natural_sort {
            SortOrder::Natural
        } else {
            SortOrder::Lexicographic
        },
        verify: args.verify,
        encode: settings.encode.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::planner::IntervalSource;
    use clap::Parser;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> Commands {
        let mut full = vec!["splicer"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap().command
    }

    #[test]
    fn test_split_job_from_interval() {
        let Commands::Split(args) = parse(&[
            "split",
            "-f",
            "movie.mp4",
            "-c",
            "3",
            "-v",
            "libx265",
            "-e",
            "-metadata title='My Clip'",
        ]) else {
            panic!("expected split");
        };

        let job = split_job(args, &Settings::default()).unwrap();
        assert_eq!(job.request.source, Some(PathBuf::from("movie.mp4")));
        assert_eq!(job.request.clips, ClipSource::Interval(IntervalSource::Chunks(3)));
        assert_eq!(job.options.video_codec, "libx265");
        assert_eq!(job.options.audio_codec, "copy");
        assert_eq!(job.options.extra_args, vec!["-metadata", "title=My Clip"]);
    }

    #[test]
    fn test_split_job_from_manifest() {
        let Commands::Split(args) = parse(&["split", "-m", "clips.json", "-o", "out"]) else {
            panic!("expected split");
        };

        let job = split_job(args, &Settings::default()).unwrap();
        assert_eq!(job.request.clips, ClipSource::Manifest(PathBuf::from("clips.json")));
        assert_eq!(job.request.output_dir, Some(PathBuf::from("out")));
        assert!(job.request.source.is_none());
    }

    #[test]
    fn test_merge_job_uses_configured_output_name() {
        let settings = Settings {
            merge_output: "joined.mkv".to_string(),
            ..Settings::default()
        };

        let Commands::Merge(args) = parse(&["merge", "clips", "--natural-sort"]) else {
            panic!("expected merge");
        };
        let job = merge_job(args, &settings);
        assert_eq!(job.output_name, "joined.mkv");
        assert_eq!(job.order, SortOrder::Natural);

        let Commands::Merge(args) = parse(&["merge", "clips", "-o", "final.mp4", "--strict"]) else {
            panic!("expected merge");
        };
        let job = merge_job(args, &settings);
        assert_eq!(job.output_name, "final.mp4");
        assert!(job.strict);
    }
}
