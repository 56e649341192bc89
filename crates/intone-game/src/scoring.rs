//! Life and doom scoring.
//!
//! Two incompatible models, picked per game through [`ScoringPolicy`]:
//!
//! - **Life**: a pool starting at 1.0 that drains while the singers are off
//!   target. Empty pool ends the game.
//! - **Doom**: a meter starting at 0 that fills while off target. Holding
//!   calm long enough bleeds some doom back off and asks for a new target.
//!   A full meter ends the game.
//!
//! Both accrue proportionally to `dt`, so frame rate does not change the
//! outcome.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::state::EmotionalState;

/// Scores this close to their terminal bound count as reaching it.
const TERMINAL_EPSILON: f64 = 1e-9;

/// Drain rates for the life model, in life per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeConfig {
    pub unstable_drain: f64,
    pub chaos_drain: f64,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            unstable_drain: 0.05,
            chaos_drain: 0.15,
        }
    }
}

/// Parameters of the doom model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoomConfig {
    /// Game over once doom reaches this.
    pub max: f64,
    /// Doom per second in chaos.
    pub rate: f64,
    /// Fraction of `rate` applied while unstable.
    pub unstable_weight: f64,
    /// Continuous calm needed to earn a reward.
    pub calm_hold: Duration,
    /// Doom removed per reward.
    pub calm_reward: f64,
}

impl Default for DoomConfig {
    fn default() -> Self {
        Self {
            max: 100.0,
            rate: 10.0,
            unstable_weight: 0.5,
            calm_hold: Duration::from_secs(3),
            calm_reward: 15.0,
        }
    }
}

/// Which scoring model a game uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScoringPolicy {
    Life(LifeConfig),
    Doom(DoomConfig),
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self::Life(LifeConfig::default())
    }
}

impl ScoringPolicy {
    pub fn validate(&self) -> Result<()> {
        let non_negative = |name: &str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(GameError::InvalidConfig(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )))
            }
        };
        match self {
            Self::Life(life) => {
                non_negative("unstable_drain", life.unstable_drain)?;
                non_negative("chaos_drain", life.chaos_drain)
            }
            Self::Doom(doom) => {
                non_negative("doom rate", doom.rate)?;
                non_negative("unstable_weight", doom.unstable_weight)?;
                non_negative("calm_reward", doom.calm_reward)?;
                if !(doom.max.is_finite() && doom.max > 0.0) {
                    return Err(GameError::InvalidConfig(format!(
                        "doom max must be positive, got {}",
                        doom.max
                    )));
                }
                if doom.calm_hold.is_zero() {
                    return Err(GameError::InvalidConfig(
                        "calm_hold must be greater than zero".into(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Current score as shown to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Score {
    /// Remaining life in `[0, 1]`.
    Life(f64),
    /// Accumulated doom in `[0, max]`.
    Doom { value: f64, max: f64 },
}

impl Score {
    /// How far along the way to game over, in `[0, 1]`.
    pub fn danger(&self) -> f64 {
        match *self {
            Self::Life(life) => 1.0 - life,
            Self::Doom { value, max } => value / max,
        }
    }
}

/// What a scoring step produced besides the new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreEvent {
    #[default]
    None,
    /// Calm was held long enough; doom was reduced and a new target is due.
    CalmReward,
    /// The score hit its terminal bound.
    Exhausted,
}

/// Applies a [`ScoringPolicy`] tick by tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Scorekeeper {
    policy: ScoringPolicy,
    value: f64,
    calm_held: Duration,
}

impl Scorekeeper {
    pub fn new(policy: ScoringPolicy) -> Self {
        let value = Self::initial_value(&policy);
        Self {
            policy,
            value,
            calm_held: Duration::ZERO,
        }
    }

    fn initial_value(policy: &ScoringPolicy) -> f64 {
        match policy {
            ScoringPolicy::Life(_) => 1.0,
            ScoringPolicy::Doom(_) => 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.value = Self::initial_value(&self.policy);
        self.calm_held = Duration::ZERO;
    }

    pub fn score(&self) -> Score {
        match &self.policy {
            ScoringPolicy::Life(_) => Score::Life(self.value),
            ScoringPolicy::Doom(doom) => Score::Doom {
                value: self.value,
                max: doom.max,
            },
        }
    }

    pub fn is_exhausted(&self) -> bool {
        match &self.policy {
            ScoringPolicy::Life(_) => self.value <= 0.0,
            ScoringPolicy::Doom(doom) => self.value >= doom.max,
        }
    }

    /// Accrue `dt` spent in `state`.
    pub fn apply(&mut self, state: EmotionalState, dt: Duration) -> ScoreEvent {
        let secs = dt.as_secs_f64();
        let mut event = ScoreEvent::None;

        match &self.policy {
            ScoringPolicy::Life(life) => {
                let drain = match state {
                    EmotionalState::Calm => 0.0,
                    EmotionalState::Unstable => life.unstable_drain,
                    EmotionalState::Chaos => life.chaos_drain,
                };
                self.value = (self.value - drain * secs).clamp(0.0, 1.0);
                if self.value <= TERMINAL_EPSILON {
                    self.value = 0.0;
                }
            }
            ScoringPolicy::Doom(doom) => {
                let weight = match state {
                    EmotionalState::Calm => 0.0,
                    EmotionalState::Unstable => doom.unstable_weight,
                    EmotionalState::Chaos => 1.0,
                };
                self.value = (self.value + doom.rate * weight * secs).clamp(0.0, doom.max);
                if self.value >= doom.max - TERMINAL_EPSILON {
                    self.value = doom.max;
                }

                if state == EmotionalState::Calm {
                    self.calm_held += dt;
                    if self.calm_held >= doom.calm_hold {
                        self.calm_held = Duration::ZERO;
                        self.value = (self.value - doom.calm_reward).max(0.0);
                        event = ScoreEvent::CalmReward;
                    }
                } else {
                    self.calm_held = Duration::ZERO;
                }
            }
        }

        if self.is_exhausted() {
            ScoreEvent::Exhausted
        } else {
            event
        }
    }
}
