//! Centralized error type for the intone umbrella crate.
//!
//! Wraps the subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Analysis: {0}")]
    Analysis(#[from] intone_analysis::DetectError),

    #[error(transparent)]
    Game(#[from] intone_game::GameError),
}

pub type Result<T> = std::result::Result<T, Error>;
