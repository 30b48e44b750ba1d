//! Merged output verification

use crate::domain::model::MergePlan;
use crate::error::{SplicerError, SplicerResult};
use crate::ports::ProbePort;

/// Tolerance used when the reference input has no frame rate
const FALLBACK_TOLERANCE: f64 = 1.0 / 30.0;

/// Measured against expected duration of a merged file
#[derive(Debug, Clone, PartialEq)]
pub struct DurationCheck {
    pub expected: f64,
    pub actual: f64,
    pub tolerance: f64,
}

impl DurationCheck {
    pub fn deviation(&self) -> f64 {
        (self.actual - self.expected).abs()
    }

    pub fn passed(&self) -> bool {
        self.deviation() <= self.tolerance
    }
}

/// Checks a merged file against the inputs it was built from
pub struct MergeVerifier<'a> {
    probe: &'a dyn ProbePort,
}

impl<'a> MergeVerifier<'a> {
    pub fn new(probe: &'a dyn ProbePort) -> Self {
        Self { probe }
    }

    /// Output duration must equal the summed input durations within one frame
    pub fn verify(&self, plan: &MergePlan) -> SplicerResult<DurationCheck> {
        let expected = plan.total_input_duration().ok_or_else(|| {
            SplicerError::VerificationFailed {
                message: "an input has no known duration".to_string(),
            }
        })?;

        let merged = self.probe.probe_media(&plan.output_path)?;
        let actual = merged.duration.ok_or_else(|| SplicerError::VerificationFailed {
            message: format!("{} has no known duration", plan.output_path.display()),
        })?;

        let tolerance = plan
            .reference_profile()
            .frame_rate
            .map(|rate| rate.frame_duration())
            .unwrap_or(FALLBACK_TOLERANCE);

        let check = DurationCheck {
            expected,
            actual,
            tolerance,
        };

        if !check.passed() {
            return Err(SplicerError::VerificationFailed {
                message: format!(
                    "merged duration {:.3}s differs from input total {:.3}s by {:.3}s (allowed {:.3}s)",
                    actual,
                    expected,
                    check.deviation(),
                    tolerance
                ),
            });
        }

        tracing::info!(expected, actual, "Merged duration verified");
        Ok(check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_check_tolerance() {
        let check = DurationCheck {
            expected: 56.0,
            actual: 56.03,
            tolerance: 0.04,
        };
        assert!(check.passed());

        let off = DurationCheck {
            expected: 56.0,
            actual: 55.9,
            tolerance: 0.04,
        };
        assert!(!off.passed());
    }
}
