//! Builder for configuring and constructing a `GameSession`.

use intone_analysis::{EstimatorConfig, PitchEstimator};
use intone_game::{GameConfig, ScoringPolicy, SequenceNote};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cue::{CuePlayer, SilentCue};
use crate::{GameSession, Result};

/// The game's frequency band always wins over the estimator's own range, so
/// the estimator never reports voices the game would throw away.
///
/// The sample rate is optional: without it the estimator is built from the
/// first frame passed to [`GameSession::process_frame`].
///
/// # Example
///
/// ```
/// use intone::prelude::*;
///
/// let session = GameSession::builder()
///     .sample_rate(48000.0)
///     .voices(2)
///     .scoring(ScoringPolicy::Doom(DoomConfig::default()))
///     .seed(42)
///     .build()?;
///
/// assert_eq!(session.sample_rate(), Some(48000.0));
/// # Ok::<(), intone::Error>(())
/// ```
pub struct GameSessionBuilder {
    config: GameConfig,
    estimator: EstimatorConfig,
    sample_rate: Option<f64>,
    cue: Box<dyn CuePlayer>,
}

impl Default for GameSessionBuilder {
    fn default() -> Self {
        Self {
            config: GameConfig::default(),
            estimator: EstimatorConfig::default(),
            sample_rate: None,
            cue: Box::new(SilentCue),
        }
    }
}

impl GameSessionBuilder {
    /// Replace the whole game configuration.
    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn estimator(mut self, config: EstimatorConfig) -> Self {
        self.estimator = config;
        self
    }

    pub fn sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    /// Default: 1
    pub fn voices(mut self, count: usize) -> Self {
        self.config.max_voices = count;
        self
    }

    /// Default: life
    pub fn scoring(mut self, policy: ScoringPolicy) -> Self {
        self.config.scoring = policy;
        self
    }

    pub fn sequence(mut self, notes: Vec<SequenceNote>) -> Self {
        self.config.sequence = notes;
        self
    }

    /// Seed target selection for reproducible games.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.rng_seed = Some(seed);
        self
    }

    /// Default: [`SilentCue`]
    pub fn cue(mut self, player: impl CuePlayer + 'static) -> Self {
        self.cue = Box::new(player);
        self
    }

    pub fn build(self) -> Result<GameSession> {
        self.config.validate()?;

        let mut estimator_config = self.estimator;
        estimator_config.min_frequency = self.config.freq_min;
        estimator_config.max_frequency = self.config.freq_max;

        let estimator = self
            .sample_rate
            .map(|sr| PitchEstimator::new(sr, estimator_config.clone()))
            .transpose()?;

        let sequence = self.config.sequence_controller()?;
        let target_pool = self.config.target_pool()?;
        let rng = match self.config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        tracing::debug!(
            voices = self.config.max_voices,
            sample_rate = ?self.sample_rate,
            "game session built"
        );

        Ok(GameSession::from_parts(
            self.config,
            estimator_config,
            estimator,
            sequence,
            target_pool,
            rng,
            self.cue,
        ))
    }
}
