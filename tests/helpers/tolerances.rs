//! Tolerance constants for game and analysis tests.

/// Floating point accumulation over many ticks.
pub const SCORE_EPSILON: f64 = 1e-6;

/// Relative pitch error accepted from the estimator on clean sines.
pub const PITCH_TOLERANCE: f64 = 0.02;

/// Semitone error accepted for a detected in-tune voice.
pub const SEMITONE_TOLERANCE: f64 = 0.1;
