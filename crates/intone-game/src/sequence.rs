//! Note-sequence game phases.
//!
//! ```text
//! Idle -> ListenToDemo -> Countdown(3, 2, 1) -> Playing -> GameOver
//! ```
//!
//! Phases only move forward, one at a time. Time that overshoots a phase or
//! a note boundary within a tick carries into the next one, so where the
//! controller ends up depends only on total elapsed time, not on how it was
//! sliced into frames.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::proximity::Target;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Nothing started yet, or reset.
    #[default]
    Idle,
    /// The reference notes are being played back.
    ListenToDemo,
    /// Visible countdown before play.
    Countdown,
    /// Singers are scored against the current note.
    Playing,
    /// Terminal until an explicit restart.
    GameOver,
}

/// One note of a sequence with how long it is held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceStep {
    pub target: Target,
    pub duration: Duration,
}

#[derive(Debug, Clone)]
pub struct SequenceController {
    steps: Vec<SequenceStep>,
    countdown_from: u32,
    countdown_interval: Duration,

    phase: Phase,
    phase_elapsed: Duration,
    demo_index: usize,
    countdown: u32,
    current_index: usize,
    note_elapsed: Duration,
}

impl SequenceController {
    /// Step durations and the countdown interval are expected to be
    /// non-zero; [`GameConfig::validate`](crate::GameConfig::validate)
    /// enforces that.
    pub fn new(steps: Vec<SequenceStep>, countdown_from: u32, countdown_interval: Duration) -> Self {
        Self {
            steps,
            countdown_from,
            countdown_interval,
            phase: Phase::Idle,
            phase_elapsed: Duration::ZERO,
            demo_index: 0,
            countdown: countdown_from,
            current_index: 0,
            note_elapsed: Duration::ZERO,
        }
    }

    /// Start from the top with the demo playback.
    pub fn start(&mut self) {
        self.rewind();
        self.enter(Phase::ListenToDemo);
        if self.demo_length().is_zero() {
            self.enter_countdown();
        }
    }

    /// Back to [`Phase::Idle`].
    pub fn reset(&mut self) {
        self.rewind();
        self.enter(Phase::Idle);
    }

    /// Freeze in [`Phase::GameOver`].
    pub fn finish(&mut self) {
        if self.phase != Phase::Idle {
            self.enter(Phase::GameOver);
        }
    }

    fn rewind(&mut self) {
        self.phase_elapsed = Duration::ZERO;
        self.demo_index = 0;
        self.countdown = self.countdown_from;
        self.current_index = 0;
        self.note_elapsed = Duration::ZERO;
    }

    fn enter(&mut self, phase: Phase) {
        if self.phase != phase {
            tracing::debug!(from = ?self.phase, to = ?phase, "sequence phase changed");
        }
        self.phase = phase;
        self.phase_elapsed = Duration::ZERO;
    }

    fn enter_countdown(&mut self) {
        self.countdown = self.countdown_from;
        if self.countdown == 0 {
            self.enter(Phase::Playing);
        } else {
            self.enter(Phase::Countdown);
        }
    }

    /// Advance by `dt`. Returns how much of `dt` was spent in
    /// [`Phase::Playing`], which is the time that should be scored.
    pub fn advance(&mut self, dt: Duration) -> Duration {
        let mut remaining = dt;
        loop {
            match self.phase {
                Phase::Idle | Phase::GameOver => return Duration::ZERO,

                Phase::ListenToDemo => {
                    let left = self.demo_length().saturating_sub(self.phase_elapsed);
                    if remaining < left {
                        self.phase_elapsed += remaining;
                        self.demo_index = self.step_at(self.phase_elapsed);
                        return Duration::ZERO;
                    }
                    remaining -= left;
                    self.enter_countdown();
                }

                Phase::Countdown => {
                    let left = self.countdown_interval.saturating_sub(self.phase_elapsed);
                    if remaining < left {
                        self.phase_elapsed += remaining;
                        return Duration::ZERO;
                    }
                    remaining -= left;
                    self.phase_elapsed = Duration::ZERO;
                    self.countdown = self.countdown.saturating_sub(1);
                    tracing::trace!(countdown = self.countdown, "countdown");
                    if self.countdown == 0 {
                        self.enter(Phase::Playing);
                    }
                }

                Phase::Playing => {
                    self.phase_elapsed += remaining;
                    self.advance_notes(remaining);
                    return remaining;
                }
            }
        }
    }

    fn advance_notes(&mut self, dt: Duration) {
        if self.steps.is_empty() {
            return;
        }
        self.note_elapsed += dt;
        loop {
            let duration = self.steps[self.current_index].duration;
            if duration.is_zero() || self.note_elapsed < duration {
                break;
            }
            self.note_elapsed -= duration;
            self.current_index = (self.current_index + 1) % self.steps.len();
            tracing::debug!(index = self.current_index, "sequence target advanced");
        }
    }

    /// Index of the step sounding `elapsed` into the demo.
    fn step_at(&self, elapsed: Duration) -> usize {
        let mut end = Duration::ZERO;
        for (index, step) in self.steps.iter().enumerate() {
            end += step.duration;
            if elapsed < end {
                return index;
            }
        }
        self.steps.len().saturating_sub(1)
    }

    /// Total length of one pass through the sequence.
    pub fn demo_length(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn steps(&self) -> &[SequenceStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Note being demonstrated, while in [`Phase::ListenToDemo`].
    pub fn demo_index(&self) -> Option<usize> {
        (self.phase == Phase::ListenToDemo && !self.steps.is_empty()).then_some(self.demo_index)
    }

    /// Visible countdown number, while in [`Phase::Countdown`].
    pub fn countdown(&self) -> Option<u32> {
        (self.phase == Phase::Countdown).then_some(self.countdown)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Note to sing right now. `None` outside play or with no notes.
    pub fn current_target(&self) -> Option<&Target> {
        if self.phase != Phase::Playing {
            return None;
        }
        self.steps.get(self.current_index).map(|s| &s.target)
    }

    /// Time spent in the current phase.
    pub fn phase_elapsed(&self) -> Duration {
        self.phase_elapsed
    }
}
