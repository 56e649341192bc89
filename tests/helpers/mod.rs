//! Test helpers and fixtures for intone integration tests
//!
//! Sessions are driven by hand: every test owns its session and advances it
//! with explicit `dt` values, so nothing depends on wall-clock time.

#![allow(dead_code)]

pub mod tolerances;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use intone::prelude::*;
use intone::{midi_to_hz, TickOutcome};

/// Default test sample rate (matches common hardware)
pub const TEST_SAMPLE_RATE: f64 = 48000.0;

/// Analysis window handed over per frame
pub const TEST_FRAME_SIZE: usize = 2048;

/// One display frame at 60 Hz
pub const FRAME: Duration = Duration::from_nanos(16_666_667);

/// Session with default configuration and a fixed seed.
pub fn test_session() -> GameSession {
    GameSession::builder()
        .sample_rate(TEST_SAMPLE_RATE)
        .seed(1)
        .build()
        .expect("Failed to create test session")
}

/// Session with a custom game configuration and a fixed seed.
pub fn test_session_with(config: GameConfig) -> GameSession {
    GameSession::builder()
        .config(config)
        .sample_rate(TEST_SAMPLE_RATE)
        .seed(1)
        .build()
        .expect("Failed to create test session")
}

/// Generate a test signal: sine wave at given frequency for specified samples.
pub fn generate_sine(frequency: f64, sample_rate: f64, num_samples: usize) -> Vec<f32> {
    generate_chord(&[frequency], sample_rate, num_samples)
}

/// Equal-amplitude sum of sines, peaking below 0.8.
pub fn generate_chord(frequencies: &[f64], sample_rate: f64, num_samples: usize) -> Vec<f32> {
    let scale = 0.8 / frequencies.len().max(1) as f64;
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate;
            let sum: f64 = frequencies
                .iter()
                .map(|f| (2.0 * std::f64::consts::PI * f * t).sin())
                .sum();
            (sum * scale) as f32
        })
        .collect()
}

/// Generate silence (zero samples).
pub fn generate_silence(num_samples: usize) -> Vec<f32> {
    vec![0.0; num_samples]
}

/// Frequency `semitones` away from `target`.
pub fn detuned(target: &Target, semitones: f64) -> f64 {
    midi_to_hz(target.midi() + semitones)
}

/// Tick `frames` times with the same voices, returning the last outcome.
pub fn run_frames(
    session: &mut GameSession,
    voices: &[f64],
    frames: usize,
    dt: Duration,
) -> TickOutcome {
    let mut last = TickOutcome::default();
    for _ in 0..frames {
        last = session.tick(voices, dt);
    }
    last
}

/// Tick with whatever the session currently wants sung, offset by
/// `semitones`. Silent when there is no target.
pub fn sing_along(session: &mut GameSession, semitones: f64, dt: Duration) -> TickOutcome {
    let voices: Vec<f64> = session
        .snapshot()
        .targets
        .iter()
        .map(|t| detuned(t, semitones))
        .collect();
    session.tick(&voices, dt)
}

/// Cue player that records every cue it is asked to play.
#[derive(Clone, Default)]
pub struct RecordingCue {
    played: Arc<Mutex<Vec<Vec<CueNote>>>>,
}

impl RecordingCue {
    pub fn played(&self) -> Vec<Vec<CueNote>> {
        self.played.lock().unwrap().clone()
    }
}

impl CuePlayer for RecordingCue {
    fn play(&mut self, notes: &[CueNote]) {
        self.played.lock().unwrap().push(notes.to_vec());
    }
}
