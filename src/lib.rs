//! Splicer Video Splitter Library
//!
//! Splits a source video into clips described by a manifest or a uniform
//! interval, and merges a directory of clips back into one file, choosing
//! between lossless stream-copy concatenation and a re-encode fallback.
//! All media work is delegated to the `ffmpeg` and `ffprobe` executables.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod output;
pub mod planner;
pub mod ports;
pub mod probe;
pub mod utils;

// Re-export commonly used types
pub use domain::model::{ClipLength, ClipSpec, MediaProbe, MergeMode, MergePlan, TimeSpec};
pub use error::{SplicerError, SplicerResult};
