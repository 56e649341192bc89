//! Read-only view of a session for the renderer.

use intone_analysis::hz_to_note_name;
use intone_game::{EmotionalState, Phase, Score, Target};
use serde::{Deserialize, Serialize};

/// Owned copy of everything a renderer needs for one frame.
///
/// Mutating a snapshot has no effect on the session it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub state: EmotionalState,
    /// Smoothed proximity, `0..=1`.
    pub energy: f64,
    pub score: Score,
    pub survival_secs: f64,
    /// Note being scored (or demonstrated, during the demo phase).
    pub targets: Vec<Target>,
    /// Visible countdown number while counting down.
    pub countdown: Option<u32>,
    /// Demo note index while the demo plays.
    pub demo_index: Option<usize>,
    /// Current note index in sequence mode.
    pub sequence_index: Option<usize>,
    pub game_over: bool,
    /// Voices passed to the most recent tick, in Hz.
    pub voices: Vec<f64>,
    /// Worst-voice error of the most recent evaluated tick, in semitones.
    pub last_error: Option<f64>,
}

impl GameSnapshot {
    /// Nearest note names of the detected voices.
    pub fn voice_notes(&self) -> Vec<String> {
        self.voices
            .iter()
            .filter_map(|&f| hz_to_note_name(f))
            .collect()
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }
}
