//! # Intone - Sing-to-target Game Engine
//!
//! Turns microphone frames into pitch estimates and drives a small game
//! whose state reflects how close the singers are to a target note.
//!
//! ## Architecture
//!
//! Intone is an umbrella crate that coordinates:
//! - **intone-analysis** - Pitch estimation (YIN, AMDF fallback, multi-voice search, note math)
//! - **intone-game** - Proximity, hysteresis state machine, life/doom scoring, note sequences
//!
//! and adds the [`GameSession`] that owns one game, plus the renderer-facing
//! [`GameSnapshot`] and the [`CuePlayer`] hook for reference tones.
//!
//! ## Quick Start
//!
//! ```
//! use std::time::Duration;
//! use intone::prelude::*;
//!
//! let mut session = GameSession::builder()
//!     .sample_rate(44100.0)
//!     .build()?;
//!
//! session.start_game(Target::from_note_name("A3")?);
//!
//! // Once per display frame, with the latest microphone window
//! let samples: Vec<f32> = (0..2048)
//!     .map(|i| (2.0 * std::f64::consts::PI * 220.0 * i as f64 / 44100.0).sin() as f32)
//!     .collect();
//! session.process_frame(&AudioFrame::new(&samples, 44100.0), Duration::from_millis(16));
//!
//! let snapshot = session.snapshot();
//! assert_eq!(snapshot.state, EmotionalState::Calm);
//! assert!(!snapshot.game_over);
//! # Ok::<(), intone::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `serialization` - serde derives on the analysis types (game types always derive them)

/// Re-export of intone-analysis for direct access
pub use intone_analysis as analysis;

/// Re-export of intone-game for direct access
pub use intone_game as game;

pub use intone_analysis::{
    hz_to_midi, hz_to_note_name, midi_to_hz, midi_to_note_name, note_name_to_hz, AudioFrame,
    EstimatorConfig, PitchEstimator, PitchResult, FREQ_MAX, FREQ_MIN, MAX_VOICES,
};

pub use intone_game::{
    DoomConfig, EmotionalState, ErrorReading, GameConfig, Hysteresis, LifeConfig, Phase, Score,
    ScoringPolicy, SequenceNote, Target, TickOutcome,
};

mod builder;
mod clock;
mod cue;
mod error;
mod session;
mod snapshot;

pub use builder::GameSessionBuilder;
pub use clock::{FrameClock, DEFAULT_FRAME_DT};
pub use cue::{CueNote, CuePlayer, SilentCue};
pub use error::{Error, Result};
pub use session::GameSession;
pub use snapshot::GameSnapshot;

/// Convenience prelude for common imports
pub mod prelude {
    // Session
    pub use crate::{GameSession, GameSessionBuilder, GameSnapshot};

    // Input
    pub use crate::{AudioFrame, FrameClock};

    // Game types
    pub use crate::{
        DoomConfig, EmotionalState, GameConfig, LifeConfig, Phase, Score, ScoringPolicy,
        SequenceNote, Target,
    };

    // Reference cue
    pub use crate::{CueNote, CuePlayer, SilentCue};
}
