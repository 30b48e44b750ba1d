//! Merge input probing and the copy/re-encode decision

pub mod scanner;

use std::path::PathBuf;

use crate::domain::model::MediaProbe;
use crate::domain::rules::{CompatibilityChecker, CompatibilityReport};
use crate::error::SplicerResult;
use crate::ports::ProbePort;

pub use scanner::{is_video_file, natural_cmp, scan_video_files, SortOrder, VIDEO_EXTENSIONS};

/// Probes every merge input and decides the concat mode
pub struct CompatibilityProber<'a> {
    probe: &'a dyn ProbePort,
}

impl<'a> CompatibilityProber<'a> {
    pub fn new(probe: &'a dyn ProbePort) -> Self {
        Self { probe }
    }

    /// Probe inputs in order; the first unreadable file aborts
    pub fn probe_all(&self, inputs: &[PathBuf]) -> SplicerResult<Vec<MediaProbe>> {
        inputs
            .iter()
            .map(|path| {
                let probed = self.probe.probe_media(path)?;
                tracing::debug!(
                    file = %path.display(),
                    codec = %probed.profile.codec_name,
                    resolution = %probed.profile.resolution(),
                    "Probed merge input"
                );
                Ok(probed)
            })
            .collect()
    }

    /// Probe and compare; mismatches are logged field by field
    pub fn assess(&self, inputs: &[PathBuf]) -> SplicerResult<(Vec<MediaProbe>, CompatibilityReport)> {
        let probes = self.probe_all(inputs)?;
        let report = CompatibilityChecker::check(&probes);

        for mismatch in &report.mismatches {
            tracing::warn!(
                field = %mismatch.field,
                file = %mismatch.candidate.display(),
                expected = %mismatch.expected,
                actual = %mismatch.actual,
                "Input differs from {}",
                mismatch.reference.display()
            );
        }
        tracing::info!(inputs = probes.len(), mode = %report.mode, "Compatibility decided");

        Ok((probes, report))
    }
}
