//! How far the singers are from the target note.
//!
//! The worst voice drives the verdict: the whole ensemble has to be in tune,
//! not just its best member.

use intone_analysis::{
    hz_to_midi, midi_to_hz, midi_to_note_name, note_name_to_midi, FREQ_MAX, FREQ_MIN,
};
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Semitone error that maps to zero proximity.
pub const DEFAULT_ERROR_SPAN: f64 = 2.0;

/// A note to sing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub note_name: String,
    pub frequency_hz: f64,
}

impl Target {
    /// Parse a note name such as `"C4"` or `"F#3"`.
    pub fn from_note_name(name: &str) -> Result<Self> {
        let midi =
            note_name_to_midi(name).ok_or_else(|| GameError::InvalidNoteName(name.to_string()))?;
        let frequency_hz = midi_to_hz(midi as f64);
        if !(frequency_hz.is_finite() && frequency_hz > 0.0) {
            return Err(GameError::InvalidFrequency(frequency_hz));
        }
        Ok(Self {
            note_name: name.to_string(),
            frequency_hz,
        })
    }

    /// A target at an arbitrary frequency, named after its nearest note.
    pub fn from_hz(frequency_hz: f64) -> Result<Self> {
        let note_name = hz_to_note_name_checked(frequency_hz)?;
        Ok(Self {
            note_name,
            frequency_hz,
        })
    }

    /// Fractional MIDI note of the target.
    pub fn midi(&self) -> f64 {
        // Constructors only admit positive finite frequencies
        hz_to_midi(self.frequency_hz).unwrap_or(f64::NAN)
    }
}

fn hz_to_note_name_checked(frequency_hz: f64) -> Result<String> {
    hz_to_midi(frequency_hz)
        .and_then(midi_to_note_name)
        .ok_or(GameError::InvalidFrequency(frequency_hz))
}

/// Outcome of comparing a frame's voices with the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ErrorReading {
    /// Worst per-voice distance in semitones.
    Signal(f64),
    /// No usable voice this frame.
    NoSignal,
}

impl ErrorReading {
    pub fn semitones(&self) -> Option<f64> {
        match self {
            Self::Signal(error) => Some(*error),
            Self::NoSignal => None,
        }
    }
}

/// Converts voice frequencies into an error against a target.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityEngine {
    freq_min: f64,
    freq_max: f64,
    error_span: f64,
}

impl Default for ProximityEngine {
    fn default() -> Self {
        Self {
            freq_min: FREQ_MIN,
            freq_max: FREQ_MAX,
            error_span: DEFAULT_ERROR_SPAN,
        }
    }
}

impl ProximityEngine {
    pub fn new(freq_min: f64, freq_max: f64, error_span: f64) -> Self {
        Self {
            freq_min,
            freq_max,
            error_span,
        }
    }

    /// Maximum `|midi(f) - target_midi|` over the in-band frequencies.
    ///
    /// Non-finite, non-positive and out-of-band values are dropped. An empty
    /// set after filtering is [`ErrorReading::NoSignal`], never zero error.
    pub fn max_error(&self, frequencies: &[f64], target_midi: f64) -> ErrorReading {
        if !target_midi.is_finite() {
            return ErrorReading::NoSignal;
        }
        frequencies
            .iter()
            .copied()
            .filter(|f| (self.freq_min..=self.freq_max).contains(f))
            .filter_map(hz_to_midi)
            .map(|midi| (midi - target_midi).abs())
            .fold(None, |worst: Option<f64>, error| {
                Some(worst.map_or(error, |w| w.max(error)))
            })
            .map_or(ErrorReading::NoSignal, ErrorReading::Signal)
    }

    /// `1 - clamp(error / span, 0, 1)`.
    pub fn proximity(&self, error: f64) -> f64 {
        if error.is_nan() {
            return 0.0;
        }
        1.0 - (error / self.error_span).clamp(0.0, 1.0)
    }

    pub fn error_span(&self) -> f64 {
        self.error_span
    }
}
