// Ports - Interface definitions (contracts)

use std::path::Path;

use crate::domain::model::*;
use crate::engine::Invocation;
use crate::error::SplicerResult;

/// Port for media file probing
pub trait ProbePort: Send + Sync {
    /// Probe duration, container and primary stream parameters
    fn probe_media(&self, file_path: &Path) -> SplicerResult<MediaProbe>;

    /// Keyframe timestamps of the first video stream within `[from, to]` seconds
    fn probe_keyframes(&self, file_path: &Path, from: f64, to: f64) -> SplicerResult<Vec<f64>>;
}

/// Port for running one external tool invocation to completion
pub trait ExecutePort: Send + Sync {
    /// Run the invocation; a non-zero exit is an error carrying the captured stderr
    fn execute(&self, invocation: &Invocation) -> SplicerResult<InvocationResult>;
}
