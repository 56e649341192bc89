//! # Intone Analysis
//!
//! Pitch analysis for sung input.
//!
//! This crate provides:
//! - **Pitch detection**: YIN as the primary detector, AMDF as a fallback
//! - **Multi-voice estimation**: up to [`MAX_VOICES`] fundamentals per frame,
//!   with duplicate and harmonic rejection
//! - **Music conversions**: Hz, fractional MIDI and note names
//!
//! All detectors operate on raw `&[f32]` sample buffers and are immutable.
//!
//! ## Example
//!
//! ```rust
//! use intone_analysis::{AudioFrame, EstimatorConfig, PitchEstimator, note_name_to_hz};
//!
//! let sample_rate = 44100.0;
//! let samples: Vec<f32> = (0..2048)
//!     .map(|i| (2.0 * std::f64::consts::PI * 220.0 * i as f64 / sample_rate).sin() as f32)
//!     .collect();
//!
//! let estimator = PitchEstimator::new(sample_rate, EstimatorConfig::default()).unwrap();
//! let voices = estimator.estimate(&AudioFrame::new(&samples, sample_rate), 1);
//!
//! assert_eq!(voices.len(), 1);
//! assert!((voices[0] - 220.0).abs() < 2.0);
//! assert_eq!(note_name_to_hz("A4"), Some(440.0));
//! ```

pub mod amdf;
pub mod error;
pub mod estimator;
pub mod music;
pub mod pitch;

pub use amdf::AmdfDetector;
pub use error::{DetectError, Result};
pub use estimator::{
    is_distinct_voice, AudioFrame, EstimatorConfig, PitchEstimator, FREQ_MAX, FREQ_MIN,
    MAX_VOICES,
};
pub use music::{
    cents_offset, hz_to_midi, hz_to_note_name, midi_to_hz, midi_to_note_name, note_name_to_hz,
    note_name_to_midi,
};
pub use pitch::{PitchResult, YinDetector};
