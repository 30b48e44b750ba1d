// Split interactor - Orchestrates the split use case

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::model::*;
use crate::engine::{synthesize_clip, ExtractionMethod, SplitOptions};
use crate::error::{SplicerError, SplicerResult};
use crate::planner::{ExtractionMode, SplitRequest, SplitResolver, StrategyPlanner};
use crate::ports::*;

/// Everything a split run needs
#[derive(Debug, Clone)]
pub struct SplitJob {
    pub request: SplitRequest,
    pub mode: ExtractionMode,
    pub options: SplitOptions,
}

/// One extracted clip
#[derive(Debug, Clone, PartialEq)]
pub struct ClipOutcome {
    pub index: u32,
    pub path: PathBuf,
    pub method: ExtractionMethod,
}

/// Result of a fully successful split
#[derive(Debug, Clone, PartialEq)]
pub struct SplitReport {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub clips: Vec<ClipOutcome>,
}

/// Interactor for the split use case
pub struct SplitInteractor {
    probe_port: Arc<dyn ProbePort>,
    execute_port: Arc<dyn ExecutePort>,
}

impl SplitInteractor {
    /// Create new split interactor with injected ports
    pub fn new(probe_port: Arc<dyn ProbePort>, execute_port: Arc<dyn ExecutePort>) -> Self {
        Self {
            probe_port,
            execute_port,
        }
    }

    /// Resolve, then extract every clip in index order.
    /// The first failing clip aborts the run; earlier clips stay on disk.
    pub fn execute(&self, job: &SplitJob) -> SplicerResult<SplitReport> {
        let plan = SplitResolver::new(self.probe_port.as_ref()).resolve(&job.request)?;
        let strategy = StrategyPlanner::new(job.mode, &plan.source, &job.options)?;

        tracing::info!(
            source = %plan.source.path.display(),
            clips = plan.clips.len(),
            method = %strategy.base_method(),
            "Starting split"
        );

        let mut outcomes = Vec::with_capacity(plan.clips.len());

        for clip in &plan.clips {
            let output = plan.output_path(clip);
            let mut tracker = JobTracker::new(format!("clip-{}", clip.index));
            tracker.advance(JobState::Resolved);

            let keyframes = self.keyframes_for(&strategy, &plan.source.path, clip);
            let method = strategy.method_for(clip, &keyframes);

            let invocation =
                match synthesize_clip(&plan.source.path, &output, clip, method, &job.options) {
                    Ok(invocation) => invocation,
                    Err(e) => {
                        tracker.fail();
                        return Err(e);
                    }
                };
            tracker.advance(JobState::Synthesized);

            tracing::info!(
                clip = clip.index,
                start = %TimeSpec::from_seconds(clip.start_time),
                length = %clip.length,
                method = %method,
                "Extracting {}",
                output.display()
            );

            tracker.advance(JobState::Executing);
            let result = match self.execute_port.execute(&invocation) {
                Ok(result) => result,
                Err(e) => {
                    tracker.fail();
                    tracing::error!(clip = clip.index, error = %e, "Clip failed, aborting split");
                    return Err(e);
                }
            };

            if !result.succeeded() {
                tracker.fail();
                return Err(SplicerError::MissingOutput { path: output });
            }
            tracker.advance(JobState::Succeeded);

            outcomes.push(ClipOutcome {
                index: clip.index,
                path: output,
                method,
            });
        }

        tracing::info!(
            clips = outcomes.len(),
            dir = %plan.output_dir.display(),
            "Split finished"
        );

        Ok(SplitReport {
            source: plan.source.path.clone(),
            output_dir: plan.output_dir.clone(),
            clips: outcomes,
        })
    }

    fn keyframes_for(
        &self,
        strategy: &StrategyPlanner,
        source: &std::path::Path,
        clip: &ClipSpec,
    ) -> Vec<f64> {
        if !strategy.needs_keyframes(clip) {
            return Vec::new();
        }
        let (from, to) = strategy.keyframe_window(clip);
        match self.probe_port.probe_keyframes(source, from, to) {
            Ok(keyframes) => keyframes,
            Err(e) => {
                tracing::warn!(clip = clip.index, error = %e, "Keyframe probe failed, clip will be re-encoded");
                Vec::new()
            }
        }
    }
}
