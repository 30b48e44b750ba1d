// Merge interactor - Orchestrates the merge use case

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::model::*;
use crate::domain::rules::ProfileMismatch;
use crate::engine::{synthesize_merge, EncodeSettings};
use crate::error::{SplicerError, SplicerResult};
use crate::output::{DurationCheck, MergeVerifier};
use crate::ports::*;
use crate::probe::{scan_video_files, CompatibilityProber, SortOrder};
use crate::utils::path::{absolutize, is_plain_file_name};

/// Default merged file name inside the scanned directory
pub const DEFAULT_OUTPUT_NAME: &str = "output.mp4";

/// Everything a merge run needs
#[derive(Debug, Clone)]
pub struct MergeJob {
    pub dir: PathBuf,
    /// Plain file name, created inside `dir`
    pub output_name: String,
    /// Fail on incompatible inputs instead of re-encoding
    pub strict: bool,
    pub order: SortOrder,
    pub verify: bool,
    pub encode: EncodeSettings,
}

impl MergeJob {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            strict: false,
            order: SortOrder::default(),
            verify: false,
            encode: EncodeSettings::default(),
        }
    }
}

/// Result of a successful merge
#[derive(Debug, Clone, PartialEq)]
pub struct MergeReport {
    pub output: PathBuf,
    pub mode: MergeMode,
    pub inputs: Vec<PathBuf>,
    /// Why re-encoding was chosen; empty for copy merges
    pub mismatches: Vec<ProfileMismatch>,
    pub verification: Option<DurationCheck>,
}

/// Interactor for the merge use case
pub struct MergeInteractor {
    probe_port: Arc<dyn ProbePort>,
    execute_port: Arc<dyn ExecutePort>,
}

impl MergeInteractor {
    /// Create new merge interactor with injected ports
    pub fn new(probe_port: Arc<dyn ProbePort>, execute_port: Arc<dyn ExecutePort>) -> Self {
        Self {
            probe_port,
            execute_port,
        }
    }

    /// Scan, probe, decide, then run exactly one ffmpeg call
    pub fn execute(&self, job: &MergeJob) -> SplicerResult<MergeReport> {
        validate_output_name(&job.output_name)?;

        let dir = absolutize(&job.dir)?;
        let mut tracker = JobTracker::new("merge");

        let inputs = scan_video_files(&dir, Some(job.output_name.as_str()), job.order)?;
        if inputs.is_empty() {
            tracker.fail();
            return Err(SplicerError::NoInputs {
                dir: dir.display().to_string(),
            });
        }
        tracing::info!(dir = %dir.display(), inputs = inputs.len(), "Found merge inputs");

        let prober = CompatibilityProber::new(self.probe_port.as_ref());
        let (probes, report) = match prober.assess(&inputs) {
            Ok(assessed) => assessed,
            Err(e) => {
                tracker.fail();
                return Err(e);
            }
        };

        if report.mode == MergeMode::Reencode && job.strict {
            tracker.fail();
            return Err(SplicerError::IncompatibleInputs {
                details: report.describe(),
            });
        }
        if report.mode == MergeMode::Reencode {
            let fields: Vec<String> = report
                .diverging_fields()
                .iter()
                .map(ToString::to_string)
                .collect();
            tracing::warn!(fields = %fields.join(", "), "Inputs differ, falling back to re-encoding");
        }

        let plan = MergePlan::new(probes, dir.join(&job.output_name), report.mode)?;
        tracker.advance(JobState::Resolved);

        let invocation = match synthesize_merge(&plan, &job.encode) {
            Ok(invocation) => invocation,
            Err(e) => {
                tracker.fail();
                return Err(e);
            }
        };
        tracker.advance(JobState::Synthesized);

        tracker.advance(JobState::Executing);
        let result = match self.execute_port.execute(&invocation) {
            Ok(result) => result,
            Err(e) => {
                tracker.fail();
                return Err(e);
            }
        };
        // the concat list is no longer needed
        drop(invocation);

        if !result.succeeded() {
            tracker.fail();
            return Err(SplicerError::MissingOutput {
                path: plan.output_path.clone(),
            });
        }
        tracker.advance(JobState::Succeeded);
        tracing::info!(output = %plan.output_path.display(), mode = %plan.mode, "Merge finished");

        let verification = if job.verify {
            Some(MergeVerifier::new(self.probe_port.as_ref()).verify(&plan)?)
        } else {
            None
        };

        Ok(MergeReport {
            output: plan.output_path.clone(),
            mode: plan.mode,
            inputs: plan.ordered_inputs.iter().map(|i| i.path.clone()).collect(),
            mismatches: report.mismatches,
            verification,
        })
    }
}

fn validate_output_name(name: &str) -> SplicerResult<()> {
    if !is_plain_file_name(name) {
        return Err(SplicerError::parameter(
            "output",
            format!("'{}' must be a file name without directories", name),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_name_validation() {
        assert!(validate_output_name("output.mp4").is_ok());
        assert!(validate_output_name("joined clip.mkv").is_ok());
        assert!(validate_output_name("sub/output.mp4").is_err());
        assert!(validate_output_name("..").is_err());
        assert!(validate_output_name("").is_err());
    }

    #[test]
    fn test_default_job() {
        let job = MergeJob::new("/clips");
        assert_eq!(job.output_name, "output.mp4");
        assert_eq!(job.order, SortOrder::Lexicographic);
        assert!(!job.strict);
    }
}
