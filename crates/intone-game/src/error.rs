//! Error types for intone-game.

use thiserror::Error;

/// Error type for intone-game construction and configuration.
///
/// Nothing on the per-tick path returns this; it is only produced while
/// building targets and validating a [`GameConfig`](crate::GameConfig).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid note name: {0:?}")]
    InvalidNoteName(String),

    #[error("Invalid frequency: {0} Hz")]
    InvalidFrequency(f64),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, GameError>;
