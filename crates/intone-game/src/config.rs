//! Game configuration.

use std::time::Duration;

use intone_analysis::{FREQ_MAX, FREQ_MIN, MAX_VOICES};
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::proximity::{ProximityEngine, Target, DEFAULT_ERROR_SPAN};
use crate::scoring::ScoringPolicy;
use crate::sequence::{SequenceController, SequenceStep};
use crate::smooth::DEFAULT_ENERGY_LERP;
use crate::state::{
    Hysteresis, StateMachine, StateMachineConfig, DEFAULT_GRACE_SILENCE, DEFAULT_SILENCE_ERROR,
};

/// A note of the sequence, by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceNote {
    pub note: String,
    pub duration: Duration,
}

impl SequenceNote {
    pub fn new(note: impl Into<String>, duration: Duration) -> Self {
        Self {
            note: note.into(),
            duration,
        }
    }

    pub fn resolve(&self) -> Result<SequenceStep> {
        Ok(SequenceStep {
            target: Target::from_note_name(&self.note)?,
            duration: self.duration,
        })
    }
}

/// Configuration for a game session. Fixed once the session is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Voice band in Hz; anything outside is discarded.
    pub freq_min: f64,
    pub freq_max: f64,
    /// Simultaneous voices to look for (1-5).
    pub max_voices: usize,
    pub energy_lerp: f64,
    /// Semitone error mapped to zero proximity.
    pub error_span: f64,
    pub hysteresis: Hysteresis,
    pub grace_silence: Duration,
    /// Error assumed once silence outlasts the grace window.
    pub silence_error: f64,
    pub scoring: ScoringPolicy,
    pub sequence: Vec<SequenceNote>,
    pub countdown_from: u32,
    pub countdown_interval: Duration,
    /// Length of the reference cue played when a simple game starts.
    pub cue_duration: Duration,
    /// Notes the doom model may switch to after a calm reward.
    pub target_pool: Vec<String>,
    /// Seed for target selection; `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let second = Duration::from_secs(1);
        Self {
            freq_min: FREQ_MIN,
            freq_max: FREQ_MAX,
            max_voices: 1,
            energy_lerp: DEFAULT_ENERGY_LERP,
            error_span: DEFAULT_ERROR_SPAN,
            hysteresis: Hysteresis::default(),
            grace_silence: DEFAULT_GRACE_SILENCE,
            silence_error: DEFAULT_SILENCE_ERROR,
            scoring: ScoringPolicy::default(),
            sequence: ["C4", "D4", "E4", "F4", "G4"]
                .into_iter()
                .map(|note| SequenceNote::new(note, second))
                .collect(),
            countdown_from: 3,
            countdown_interval: second,
            cue_duration: second,
            target_pool: ["C4", "D4", "E4", "F4", "G4", "A4", "B4"]
                .into_iter()
                .map(String::from)
                .collect(),
            rng_seed: None,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        let finite_band = self.freq_min.is_finite() && self.freq_max.is_finite();
        if !finite_band || self.freq_min <= 0.0 || self.freq_min >= self.freq_max {
            return Err(GameError::InvalidConfig(format!(
                "frequency band {}-{} Hz is empty or invalid",
                self.freq_min, self.freq_max
            )));
        }
        if !(1..=MAX_VOICES).contains(&self.max_voices) {
            return Err(GameError::InvalidConfig(format!(
                "max_voices {} out of range (1-{})",
                self.max_voices, MAX_VOICES
            )));
        }
        if !(self.energy_lerp > 0.0 && self.energy_lerp <= 1.0) {
            return Err(GameError::InvalidConfig(format!(
                "energy_lerp {} out of range (0, 1]",
                self.energy_lerp
            )));
        }
        if !(self.error_span.is_finite() && self.error_span > 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "error_span must be positive, got {}",
                self.error_span
            )));
        }
        if !(self.silence_error.is_finite() && self.silence_error >= 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "silence_error must be finite and non-negative, got {}",
                self.silence_error
            )));
        }
        self.hysteresis.validate()?;
        self.scoring.validate()?;

        if self.countdown_from > 0 && self.countdown_interval.is_zero() {
            return Err(GameError::InvalidConfig(
                "countdown_interval must be greater than zero".into(),
            ));
        }
        for note in &self.sequence {
            if note.duration.is_zero() {
                return Err(GameError::InvalidConfig(format!(
                    "sequence note {} has zero duration",
                    note.note
                )));
            }
            self.check_in_band(&note.resolve()?.target)?;
        }
        for note in &self.target_pool {
            self.check_in_band(&Target::from_note_name(note)?)?;
        }
        Ok(())
    }

    /// A target outside the band can never be matched by a scored voice.
    fn check_in_band(&self, target: &Target) -> Result<()> {
        if (self.freq_min..=self.freq_max).contains(&target.frequency_hz) {
            return Ok(());
        }
        Err(GameError::InvalidConfig(format!(
            "target {} ({:.1} Hz) is outside the {}-{} Hz band",
            target.note_name, target.frequency_hz, self.freq_min, self.freq_max
        )))
    }

    pub fn proximity_engine(&self) -> ProximityEngine {
        ProximityEngine::new(self.freq_min, self.freq_max, self.error_span)
    }

    pub fn state_machine(&self) -> StateMachine {
        let config = StateMachineConfig {
            hysteresis: self.hysteresis,
            energy_lerp: self.energy_lerp,
            grace_silence: self.grace_silence,
            silence_error: self.silence_error,
            scoring: self.scoring.clone(),
        };
        StateMachine::new(config, self.proximity_engine())
    }

    /// Build the sequence controller, resolving note names.
    pub fn sequence_controller(&self) -> Result<SequenceController> {
        let steps = self
            .sequence
            .iter()
            .map(SequenceNote::resolve)
            .collect::<Result<Vec<_>>>()?;
        Ok(SequenceController::new(
            steps,
            self.countdown_from,
            self.countdown_interval,
        ))
    }

    /// Resolved retarget pool.
    pub fn target_pool(&self) -> Result<Vec<Target>> {
        self.target_pool
            .iter()
            .map(|name| Target::from_note_name(name))
            .collect()
    }
}
