//! # Intone Game
//!
//! Deterministic game state driven by a stream of pitch estimates.
//!
//! - **Proximity**: worst-voice semitone error against a [`Target`]
//! - **State machine**: smoothed energy, hysteresis-controlled
//!   [`EmotionalState`], silence grace window
//! - **Scoring**: life or doom, selected with [`ScoringPolicy`]
//! - **Sequences**: demo playback, countdown and looping note targets
//!
//! Everything advances by an explicit `dt`; nothing here reads a clock.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use intone_game::{EmotionalState, ErrorReading, GameConfig};
//!
//! let mut machine = GameConfig::default().state_machine();
//! machine.tick(ErrorReading::Signal(3.0), Duration::from_millis(16));
//! assert_eq!(machine.state(), EmotionalState::Chaos);
//! ```

pub mod config;
pub mod error;
pub mod proximity;
pub mod scoring;
pub mod sequence;
pub mod smooth;
pub mod state;

pub use config::{GameConfig, SequenceNote};
pub use error::{GameError, Result};
pub use proximity::{ErrorReading, ProximityEngine, Target, DEFAULT_ERROR_SPAN};
pub use scoring::{DoomConfig, LifeConfig, Score, ScoreEvent, Scorekeeper, ScoringPolicy};
pub use sequence::{Phase, SequenceController, SequenceStep};
pub use smooth::{EnergySmoother, DEFAULT_ENERGY_LERP};
pub use state::{
    EmotionalState, Hysteresis, StateMachine, StateMachineConfig, TickOutcome,
    DEFAULT_GRACE_SILENCE, DEFAULT_SILENCE_ERROR,
};
