//! Output verification module

pub mod verifier;

pub use verifier::{DurationCheck, MergeVerifier};
