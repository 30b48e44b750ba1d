//! Error handling module for Splicer

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Splicer operations
#[derive(Error, Debug)]
pub enum SplicerError {
    /// Manifest is malformed or misses required fields
    #[error("Invalid manifest {path}: {message}")]
    ManifestValidation { path: String, message: String },

    /// Clip range falls outside the source duration
    #[error(
        "Invalid range for clip {index}: start {start:.3}s, length {length} outside source duration {duration:.3}s"
    )]
    InvalidRange {
        index: u32,
        start: f64,
        length: String,
        duration: f64,
    },

    /// Interval parameters cannot produce clips
    #[error("Invalid parameter {name}: {message}")]
    InvalidParameter { name: String, message: String },

    /// Metadata probe could not read a file
    #[error("Failed to probe {path}: {message}")]
    ProbeFailure { path: String, message: String },

    /// External tool exited with a non-zero status
    #[error("Transcode failed ({}): {stderr}", describe_exit(.exit_code))]
    TranscodeFailure {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Merge inputs differ and re-encoding was not allowed
    #[error("Incompatible inputs: {details}")]
    IncompatibleInputs { details: String },

    /// Directory scan found nothing to merge
    #[error("No video files found in {dir}")]
    NoInputs { dir: String },

    /// External tool could not be located
    #[error("Required tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// Tool reported success but the output is absent
    #[error("Expected output was not produced: {}", .path.display())]
    MissingOutput { path: PathBuf },

    /// Output verification error
    #[error("Verification failed: {message}")]
    VerificationFailed { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Path cannot be represented for the external tool
    #[error("Invalid path: {message}")]
    InvalidPath { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SplicerError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            SplicerError::ManifestValidation { .. }
            | SplicerError::InvalidRange { .. }
            | SplicerError::InvalidParameter { .. }
            | SplicerError::Config { .. }
            | SplicerError::InvalidPath { .. } => 2,
            SplicerError::ProbeFailure { .. }
            | SplicerError::IncompatibleInputs { .. }
            | SplicerError::NoInputs { .. } => 3,
            SplicerError::TranscodeFailure { .. }
            | SplicerError::MissingOutput { .. }
            | SplicerError::VerificationFailed { .. } => 4,
            SplicerError::ToolNotFound { .. } | SplicerError::IoError(_) => 1,
        }
    }

    pub(crate) fn probe(path: impl Into<String>, message: impl Into<String>) -> Self {
        SplicerError::ProbeFailure {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        SplicerError::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Result type alias for Splicer operations
pub type SplicerResult<T> = std::result::Result<T, SplicerError>;
