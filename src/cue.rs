//! Reference-note cue handed to the tone synthesis side.

use std::time::Duration;

use intone_game::{SequenceStep, Target};
use serde::{Deserialize, Serialize};

/// One note of a reference cue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueNote {
    pub note_name: String,
    pub frequency_hz: f64,
    pub duration: Duration,
}

impl CueNote {
    pub fn new(target: &Target, duration: Duration) -> Self {
        Self {
            note_name: target.note_name.clone(),
            frequency_hz: target.frequency_hz,
            duration,
        }
    }
}

impl From<&SequenceStep> for CueNote {
    fn from(step: &SequenceStep) -> Self {
        Self::new(&step.target, step.duration)
    }
}

/// Plays reference notes when a game starts.
///
/// Fire-and-forget: the session never waits on or reads anything back from
/// the player.
pub trait CuePlayer: Send {
    fn play(&mut self, notes: &[CueNote]);
}

/// Cue player that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCue;

impl CuePlayer for SilentCue {
    fn play(&mut self, notes: &[CueNote]) {
        tracing::trace!(notes = notes.len(), "cue skipped");
    }
}

impl<F> CuePlayer for F
where
    F: FnMut(&[CueNote]) + Send,
{
    fn play(&mut self, notes: &[CueNote]) {
        self(notes)
    }
}
