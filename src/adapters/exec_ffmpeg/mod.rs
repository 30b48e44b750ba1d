//! FFmpeg execution adapter
//!
//! Runs one synthesized invocation to completion. No retry, no timeout.

use crate::adapters::env_locale::Utf8Environment;
use crate::adapters::tool::{run_captured, stderr_tail, ToolLocator};
use crate::domain::model::InvocationResult;
use crate::engine::Invocation;
use crate::error::{SplicerError, SplicerResult};
use crate::ports::ExecutePort;

/// FFmpeg-based execution adapter
#[derive(Debug)]
pub struct FfmpegAdapter {
    tool: ToolLocator,
    env: Utf8Environment,
}

impl FfmpegAdapter {
    /// Create new FFmpeg adapter; `program` is resolved on first use
    pub fn new(program: impl Into<String>, env: Utf8Environment) -> Self {
        Self {
            tool: ToolLocator::new(program),
            env,
        }
    }
}

impl ExecutePort for FfmpegAdapter {
    fn execute(&self, invocation: &Invocation) -> SplicerResult<InvocationResult> {
        tracing::info!("About to run: {} {}", self.tool.name(), invocation.display_args());

        let output = run_captured(&self.tool, &invocation.args, &self.env)?;
        let stderr_text = String::from_utf8_lossy(&output.stderr).into_owned();
        let exit_code = output.status.code();

        if !output.status.success() {
            tracing::error!(exit_code = ?exit_code, output = %invocation.output.display(), "ffmpeg failed");
            return Err(SplicerError::TranscodeFailure {
                exit_code,
                stderr: stderr_tail(&output.stderr),
            });
        }

        if !stderr_text.trim().is_empty() {
            tracing::debug!(stderr = %stderr_text.trim(), "ffmpeg diagnostics");
        }

        if !invocation.output.is_file() {
            return Err(SplicerError::MissingOutput {
                path: invocation.output.clone(),
            });
        }

        Ok(InvocationResult {
            exit_code,
            stderr_text,
            produced_path: Some(invocation.output.clone()),
        })
    }
}
