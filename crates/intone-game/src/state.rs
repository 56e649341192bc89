//! Emotional state machine.
//!
//! Each tick takes the worst-voice error (or the absence of any voice) and
//! updates, in order:
//!
//! 1. the silence timer, freezing everything during a short grace window
//! 2. the smoothed energy signal
//! 3. the emotional state, through a two-threshold hysteresis band per side
//! 4. the score, via the configured [`ScoringPolicy`]
//!
//! State transitions depend only on the previous state and the current
//! error, never on energy.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::proximity::{ErrorReading, ProximityEngine};
use crate::scoring::{Score, ScoreEvent, Scorekeeper, ScoringPolicy};
use crate::smooth::EnergySmoother;

/// Default silence tolerated before it counts against the singers.
pub const DEFAULT_GRACE_SILENCE: Duration = Duration::from_millis(300);

/// Error assumed once silence outlasts the grace window, in semitones.
pub const DEFAULT_SILENCE_ERROR: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmotionalState {
    #[default]
    Calm,
    Unstable,
    Chaos,
}

/// Enter/exit thresholds in semitones.
///
/// Entering a state needs a stronger reading than staying in it:
/// `calm_enter < calm_exit` and `chaos_exit < chaos_enter`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hysteresis {
    pub calm_enter: f64,
    pub calm_exit: f64,
    pub chaos_exit: f64,
    pub chaos_enter: f64,
}

impl Default for Hysteresis {
    fn default() -> Self {
        Self {
            calm_enter: 0.5,
            calm_exit: 0.8,
            chaos_exit: 1.1,
            chaos_enter: 1.5,
        }
    }
}

impl Hysteresis {
    pub fn validate(&self) -> Result<()> {
        let all_finite = [self.calm_enter, self.calm_exit, self.chaos_exit, self.chaos_enter]
            .iter()
            .all(|t| t.is_finite() && *t >= 0.0);
        if !all_finite {
            return Err(GameError::InvalidConfig(
                "hysteresis thresholds must be finite and non-negative".into(),
            ));
        }
        if !(self.calm_enter < self.calm_exit
            && self.chaos_exit < self.chaos_enter
            && self.calm_exit < self.chaos_enter)
        {
            return Err(GameError::InvalidConfig(format!(
                "hysteresis needs calm_enter < calm_exit < chaos_enter and chaos_exit < chaos_enter, got {:?}",
                self
            )));
        }
        Ok(())
    }

    /// Next state for `error` semitones given the previous state.
    ///
    /// Escalation is immediate, but chaos never drops straight to calm: an
    /// in-tune reading from chaos lands in unstable first.
    pub fn next_state(&self, previous: EmotionalState, error: f64) -> EmotionalState {
        use EmotionalState::*;

        if error.is_nan() || error > self.chaos_enter {
            return Chaos;
        }
        if error <= self.calm_enter {
            return match previous {
                Chaos => Unstable,
                Calm | Unstable => Calm,
            };
        }
        match previous {
            Calm if error <= self.calm_exit => Calm,
            Chaos if error >= self.chaos_exit => Chaos,
            _ => Unstable,
        }
    }
}

/// Knobs for [`StateMachine`].
#[derive(Debug, Clone, PartialEq)]
pub struct StateMachineConfig {
    pub hysteresis: Hysteresis,
    pub energy_lerp: f64,
    pub grace_silence: Duration,
    pub silence_error: f64,
    pub scoring: ScoringPolicy,
}

impl Default for StateMachineConfig {
    fn default() -> Self {
        Self {
            hysteresis: Hysteresis::default(),
            energy_lerp: crate::smooth::DEFAULT_ENERGY_LERP,
            grace_silence: DEFAULT_GRACE_SILENCE,
            silence_error: DEFAULT_SILENCE_ERROR,
            scoring: ScoringPolicy::default(),
        }
    }
}

/// What a single tick changed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickOutcome {
    /// New state, if it differs from the previous one.
    pub transition: Option<EmotionalState>,
    /// Silence is inside the grace window; nothing but survival time moved.
    pub frozen: bool,
    /// The doom model wants a fresh target.
    pub retarget: bool,
    /// The score hit its bound on this tick.
    pub game_over: bool,
}

#[derive(Debug, Clone)]
pub struct StateMachine {
    hysteresis: Hysteresis,
    proximity: ProximityEngine,
    energy: EnergySmoother,
    initial_energy: f64,
    grace_silence: Duration,
    silence_error: f64,
    state: EmotionalState,
    silence: Duration,
    survival: Duration,
    score: Scorekeeper,
    game_over: bool,
    last_error: Option<f64>,
}

impl StateMachine {
    pub fn new(config: StateMachineConfig, proximity: ProximityEngine) -> Self {
        let initial_energy = 1.0;
        Self {
            hysteresis: config.hysteresis,
            proximity,
            energy: EnergySmoother::new(initial_energy, config.energy_lerp),
            initial_energy,
            grace_silence: config.grace_silence,
            silence_error: config.silence_error,
            state: EmotionalState::Calm,
            silence: Duration::ZERO,
            survival: Duration::ZERO,
            score: Scorekeeper::new(config.scoring),
            game_over: false,
            last_error: None,
        }
    }

    /// Back to a fresh session: calm, full energy, initial score.
    pub fn reset(&mut self) {
        self.energy.set_immediate(self.initial_energy);
        self.state = EmotionalState::Calm;
        self.silence = Duration::ZERO;
        self.survival = Duration::ZERO;
        self.score.reset();
        self.game_over = false;
        self.last_error = None;
    }

    /// Advance by `dt` with the frame's error reading.
    pub fn tick(&mut self, reading: ErrorReading, dt: Duration) -> TickOutcome {
        if self.game_over {
            return TickOutcome::default();
        }
        self.survival += dt;

        let error = match reading {
            ErrorReading::Signal(error) => {
                self.silence = Duration::ZERO;
                error
            }
            ErrorReading::NoSignal => {
                self.silence += dt;
                if self.silence < self.grace_silence {
                    return TickOutcome {
                        frozen: true,
                        ..TickOutcome::default()
                    };
                }
                self.silence_error
            }
        };
        self.last_error = Some(error);

        self.energy.update(self.proximity.proximity(error));

        let previous = self.state;
        self.state = self.hysteresis.next_state(previous, error);
        let transition = (self.state != previous).then_some(self.state);
        if let Some(state) = transition {
            tracing::debug!(?previous, ?state, error, "emotional state changed");
        }

        let event = self.score.apply(self.state, dt);
        if event == ScoreEvent::Exhausted {
            self.game_over = true;
            tracing::debug!(survival = ?self.survival, "score exhausted, game over");
        }

        TickOutcome {
            transition,
            frozen: false,
            retarget: event == ScoreEvent::CalmReward,
            game_over: self.game_over,
        }
    }

    /// Advance survival time only, for ticks that have nothing to evaluate.
    pub fn idle(&mut self, dt: Duration) {
        if !self.game_over {
            self.survival += dt;
        }
    }

    pub fn state(&self) -> EmotionalState {
        self.state
    }

    pub fn energy(&self) -> f64 {
        self.energy.current()
    }

    pub fn score(&self) -> Score {
        self.score.score()
    }

    pub fn survival(&self) -> Duration {
        self.survival
    }

    pub fn silence(&self) -> Duration {
        self.silence
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Error used by the most recent evaluated tick.
    pub fn last_error(&self) -> Option<f64> {
        self.last_error
    }
}
