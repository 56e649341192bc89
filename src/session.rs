//! GameSession that coordinates estimation, scoring and sequencing.

use std::time::Duration;

use intone_analysis::{AudioFrame, EstimatorConfig, PitchEstimator};
use intone_game::{
    ErrorReading, GameConfig, Phase, ProximityEngine, SequenceController, StateMachine, Target,
    TickOutcome,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::clock::DEFAULT_FRAME_DT;
use crate::cue::{CueNote, CuePlayer};
use crate::snapshot::GameSnapshot;

#[derive(Debug, Clone, PartialEq)]
enum StartCommand {
    Simple(Target),
    Sequence,
}

/// One game, owned by the caller.
///
/// Sessions share nothing with each other; run as many as needed.
/// `tick` takes `&mut self`, so a session can only ever be advanced from one
/// place at a time.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use intone::prelude::*;
///
/// let mut session = GameSession::builder().seed(7).build()?;
/// session.start_game(Target::from_note_name("A4")?);
///
/// session.tick(&[440.0], Duration::from_millis(16));
/// let snapshot = session.snapshot();
/// assert_eq!(snapshot.state, EmotionalState::Calm);
/// assert_eq!(snapshot.targets[0].note_name, "A4");
/// # Ok::<(), intone::Error>(())
/// ```
pub struct GameSession {
    config: GameConfig,
    estimator_config: EstimatorConfig,
    estimator: Option<PitchEstimator>,
    rejected_rate: Option<f64>,
    proximity: ProximityEngine,
    machine: StateMachine,
    sequence: SequenceController,
    target_pool: Vec<Target>,
    rng: StdRng,
    cue: Box<dyn CuePlayer>,

    started: Option<StartCommand>,
    target: Option<Target>,
    last_voices: Vec<f64>,
}

impl GameSession {
    /// Create a new session builder
    pub fn builder() -> crate::GameSessionBuilder {
        crate::GameSessionBuilder::default()
    }

    pub(crate) fn from_parts(
        config: GameConfig,
        estimator_config: EstimatorConfig,
        estimator: Option<PitchEstimator>,
        sequence: SequenceController,
        target_pool: Vec<Target>,
        rng: StdRng,
        cue: Box<dyn CuePlayer>,
    ) -> Self {
        Self {
            proximity: config.proximity_engine(),
            machine: config.state_machine(),
            config,
            estimator_config,
            estimator,
            rejected_rate: None,
            sequence,
            target_pool,
            rng,
            cue,
            started: None,
            target: None,
            last_voices: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start a simple game against a single target.
    ///
    /// Plays the target as a cue and goes straight to [`Phase::Playing`].
    pub fn start_game(&mut self, target: Target) {
        self.clear();
        tracing::debug!(
            target = %target.note_name,
            hz = target.frequency_hz,
            "simple game started"
        );
        self.cue.play(&[CueNote::new(&target, self.config.cue_duration)]);
        self.target = Some(target.clone());
        self.started = Some(StartCommand::Simple(target));
    }

    /// Start a sequence game: demo, countdown, then looping targets.
    pub fn start_sequence_game(&mut self) {
        self.clear();
        self.sequence.start();
        tracing::debug!(notes = self.sequence.steps().len(), "sequence game started");
        let cue: Vec<CueNote> = self.sequence.steps().iter().map(CueNote::from).collect();
        self.cue.play(&cue);
        self.started = Some(StartCommand::Sequence);
    }

    /// Stop the game and return to [`Phase::Idle`].
    pub fn reset_game(&mut self) {
        self.clear();
        self.started = None;
        tracing::debug!("game reset");
    }

    /// Repeat the last start command. Returns `false` if nothing was started.
    pub fn restart(&mut self) -> bool {
        match self.started.clone() {
            Some(StartCommand::Simple(target)) => self.start_game(target),
            Some(StartCommand::Sequence) => self.start_sequence_game(),
            None => return false,
        }
        true
    }

    fn clear(&mut self) {
        self.machine.reset();
        self.sequence.reset();
        self.target = None;
        self.last_voices.clear();
    }

    /// Advance the game by `dt` with the voices detected this frame.
    ///
    /// A zero `dt` is replaced with [`DEFAULT_FRAME_DT`].
    pub fn tick(&mut self, frequencies: &[f64], dt: Duration) -> TickOutcome {
        let dt = if dt.is_zero() { DEFAULT_FRAME_DT } else { dt };
        self.last_voices.clear();
        self.last_voices.extend_from_slice(frequencies);

        match self.started {
            None => TickOutcome::default(),
            Some(StartCommand::Simple(_)) => self.tick_simple(frequencies, dt),
            Some(StartCommand::Sequence) => self.tick_sequence(frequencies, dt),
        }
    }

    fn tick_simple(&mut self, frequencies: &[f64], dt: Duration) -> TickOutcome {
        let Some(target) = &self.target else {
            return TickOutcome::default();
        };
        let reading = self.proximity.max_error(frequencies, target.midi());
        let outcome = self.evaluate(reading, dt);
        if outcome.retarget {
            self.retarget();
        }
        outcome
    }

    fn tick_sequence(&mut self, frequencies: &[f64], dt: Duration) -> TickOutcome {
        let scored = self.sequence.advance(dt);
        if scored.is_zero() {
            return TickOutcome::default();
        }
        let Some(target) = self.sequence.current_target() else {
            // Nothing to sing against
            self.machine.idle(scored);
            return TickOutcome::default();
        };
        let reading = self.proximity.max_error(frequencies, target.midi());
        let outcome = self.evaluate(reading, scored);
        if outcome.game_over {
            self.sequence.finish();
        }
        outcome
    }

    fn evaluate(&mut self, reading: ErrorReading, dt: Duration) -> TickOutcome {
        let outcome = self.machine.tick(reading, dt);
        if outcome.game_over {
            tracing::debug!(
                survival_secs = self.machine.survival().as_secs_f64(),
                "game over"
            );
        }
        outcome
    }

    /// Swap to a random pool note other than the current one.
    fn retarget(&mut self) {
        let current = self.target.as_ref().map(|t| t.note_name.as_str());
        let candidates: Vec<&Target> = self
            .target_pool
            .iter()
            .filter(|t| Some(t.note_name.as_str()) != current)
            .collect();
        if let Some(next) = candidates.choose(&mut self.rng) {
            tracing::debug!(from = ?current, to = %next.note_name, "target changed");
            self.target = Some((*next).clone());
        }
    }

    /// Estimate voices in `frame` and tick with them.
    ///
    /// The estimator is rebuilt whenever the frame's sample rate changes. A
    /// sample rate the estimator cannot work with counts as a silent frame.
    pub fn process_frame(&mut self, frame: &AudioFrame<'_>, dt: Duration) -> TickOutcome {
        let max_voices = self.config.max_voices;
        let voices = match self.estimator_for(frame.sample_rate) {
            Some(estimator) => estimator.estimate(frame, max_voices),
            None => Vec::new(),
        };
        self.tick(&voices, dt)
    }

    fn estimator_for(&mut self, sample_rate: f64) -> Option<&PitchEstimator> {
        let stale = self
            .estimator
            .as_ref()
            .map_or(true, |e| e.sample_rate() != sample_rate);
        if stale {
            // Already warned about this rate
            if self.rejected_rate.map(f64::to_bits) == Some(sample_rate.to_bits()) {
                return None;
            }
            let rebuilt = match &self.estimator {
                Some(existing) => existing.configure(sample_rate),
                None => PitchEstimator::new(sample_rate, self.estimator_config.clone()),
            };
            match rebuilt {
                Ok(estimator) => {
                    tracing::debug!(sample_rate, "pitch estimator configured");
                    self.estimator = Some(estimator);
                    self.rejected_rate = None;
                }
                Err(e) => {
                    tracing::warn!(sample_rate, error = %e, "cannot analyse at this sample rate");
                    self.rejected_rate = Some(sample_rate);
                    return None;
                }
            }
        }
        self.estimator.as_ref()
    }

    pub fn phase(&self) -> Phase {
        match self.started {
            None => Phase::Idle,
            Some(StartCommand::Simple(_)) if self.machine.is_game_over() => Phase::GameOver,
            Some(StartCommand::Simple(_)) => Phase::Playing,
            Some(StartCommand::Sequence) => self.sequence.phase(),
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.machine.is_game_over()
    }

    /// Target scored right now, or demonstrated during the demo phase.
    pub fn current_target(&self) -> Option<&Target> {
        match self.started {
            None => None,
            Some(StartCommand::Simple(_)) => self.target.as_ref(),
            Some(StartCommand::Sequence) => match self.sequence.phase() {
                Phase::ListenToDemo => self
                    .sequence
                    .demo_index()
                    .and_then(|i| self.sequence.steps().get(i))
                    .map(|s| &s.target),
                _ => self.sequence.current_target(),
            },
        }
    }

    /// Sample rate the owned estimator is currently set up for.
    pub fn sample_rate(&self) -> Option<f64> {
        self.estimator.as_ref().map(PitchEstimator::sample_rate)
    }

    /// Owned copy of the session state for rendering.
    pub fn snapshot(&self) -> GameSnapshot {
        let sequence_mode = self.started == Some(StartCommand::Sequence);
        GameSnapshot {
            phase: self.phase(),
            state: self.machine.state(),
            energy: self.machine.energy(),
            score: self.machine.score(),
            survival_secs: self.machine.survival().as_secs_f64(),
            targets: self.current_target().cloned().into_iter().collect(),
            countdown: self.sequence.countdown(),
            demo_index: self.sequence.demo_index(),
            sequence_index: (sequence_mode && !self.sequence.is_empty())
                .then(|| self.sequence.current_index()),
            game_over: self.machine.is_game_over(),
            voices: self.last_voices.clone(),
            last_error: self.machine.last_error(),
        }
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("phase", &self.phase())
            .field("state", &self.machine.state())
            .field("target", &self.current_target())
            .field("sample_rate", &self.sample_rate())
            .finish_non_exhaustive()
    }
}
