//! Error types for intone-analysis.

use thiserror::Error;

/// Failure inside a single detector run.
///
/// These never leave [`PitchEstimator`](crate::PitchEstimator): it logs them
/// and treats the frame as having no detection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectError {
    #[error("Frame too short: need {needed} samples, got {got}")]
    FrameTooShort { needed: usize, got: usize },

    #[error("Non-finite sample at index {0}")]
    NonFiniteSample(usize),

    #[error("Invalid frequency range: min={min} Hz, max={max} Hz at sample rate {sample_rate} Hz")]
    InvalidRange {
        min: f64,
        max: f64,
        sample_rate: f64,
    },
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, DetectError>;
