//! Frame-level frequency estimation for one or more simultaneous voices.
//!
//! [`PitchEstimator`] wraps the YIN detector (primary) and the AMDF detector
//! (fallback). In multi-voice mode it keeps generating candidates from
//! alternate detectors, shifted analysis windows and, when the front end
//! provides one, the magnitude spectrum, accepting a candidate only if it is
//! neither a near-duplicate nor a harmonic of a voice already found.
//!
//! Detector errors never escape: a bad frame yields an empty set.

use crate::amdf::{AmdfDetector, DEFAULT_AMDF_THRESHOLD};
use crate::error::Result;
use crate::pitch::{YinDetector, DEFAULT_YIN_THRESHOLD};
use crate::PitchResult;

/// Lowest frequency considered part of the singing range.
pub const FREQ_MIN: f64 = 80.0;
/// Highest frequency considered part of the singing range.
pub const FREQ_MAX: f64 = 1200.0;
/// Maximum number of simultaneous voices.
pub const MAX_VOICES: usize = 5;

/// One analysis window handed over by the audio front end.
#[derive(Debug, Clone, Copy)]
pub struct AudioFrame<'a> {
    /// Time-domain samples.
    pub samples: &'a [f32],
    /// Sample rate in Hz.
    pub sample_rate: f64,
    /// Optional normalized (0..1) magnitude spectrum of the same window.
    /// Bin `i` is centered at `i * sample_rate / (2 * spectrum.len())`.
    pub spectrum: Option<&'a [f32]>,
}

impl<'a> AudioFrame<'a> {
    pub fn new(samples: &'a [f32], sample_rate: f64) -> Self {
        Self {
            samples,
            sample_rate,
            spectrum: None,
        }
    }

    pub fn with_spectrum(mut self, spectrum: &'a [f32]) -> Self {
        self.spectrum = Some(spectrum);
        self
    }
}

/// Tunable detector and post-filter parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct EstimatorConfig {
    pub min_frequency: f64,
    pub max_frequency: f64,
    pub yin_threshold: f64,
    pub amdf_threshold: f64,
    /// Frames with an RMS below this are treated as silence.
    pub silence_rms: f32,
    /// Relative distance under which two candidates are the same voice.
    pub duplicate_tolerance: f64,
    /// Distance from an integer ratio under which a candidate is a harmonic.
    pub harmonic_tolerance: f64,
    /// Candidate evaluations allowed per frame after the first voice.
    pub max_attempts: usize,
    /// Minimum normalized magnitude for a spectral peak to be a candidate.
    pub spectral_floor: f32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            min_frequency: FREQ_MIN,
            max_frequency: FREQ_MAX,
            yin_threshold: DEFAULT_YIN_THRESHOLD,
            amdf_threshold: DEFAULT_AMDF_THRESHOLD,
            silence_rms: 0.005,
            duplicate_tolerance: 0.15,
            harmonic_tolerance: 0.1,
            max_attempts: 12,
            spectral_floor: 0.25,
        }
    }
}

/// True if `candidate` is a separate voice from every entry in `accepted`.
///
/// Rejects candidates within `duplicate_tolerance` (relative) of an accepted
/// voice, and candidates whose frequency ratio to one (larger over smaller)
/// is within `harmonic_tolerance` of an integer.
pub fn is_distinct_voice(
    candidate: f64,
    accepted: &[f64],
    duplicate_tolerance: f64,
    harmonic_tolerance: f64,
) -> bool {
    accepted.iter().all(|&existing| {
        if (candidate - existing).abs() / existing < duplicate_tolerance {
            return false;
        }
        let ratio = candidate.max(existing) / candidate.min(existing);
        (ratio - ratio.round()).abs() >= harmonic_tolerance
    })
}

/// Immutable per-sample-rate pitch estimator.
#[derive(Debug, Clone)]
pub struct PitchEstimator {
    config: EstimatorConfig,
    sample_rate: f64,
    primary: YinDetector,
    fallback: AmdfDetector,
}

impl PitchEstimator {
    pub fn new(sample_rate: f64, config: EstimatorConfig) -> Result<Self> {
        let primary = YinDetector::new(sample_rate, config.min_frequency, config.max_frequency)?
            .with_threshold(config.yin_threshold);
        let fallback = AmdfDetector::new(sample_rate, config.min_frequency, config.max_frequency)?
            .with_threshold(config.amdf_threshold);
        Ok(Self {
            config,
            sample_rate,
            primary,
            fallback,
        })
    }

    /// A new estimator for `sample_rate` with the same configuration.
    pub fn configure(&self, sample_rate: f64) -> Result<Self> {
        Self::new(sample_rate, self.config.clone())
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimate up to `max_voices` fundamental frequencies in Hz.
    ///
    /// The frame's sample rate must match [`sample_rate`](Self::sample_rate);
    /// a mismatched frame is rejected as no detection (rebuild with
    /// [`configure`](Self::configure) instead).
    pub fn estimate(&self, frame: &AudioFrame<'_>, max_voices: usize) -> Vec<f64> {
        let max_voices = max_voices.clamp(1, MAX_VOICES);

        if frame.sample_rate != self.sample_rate {
            tracing::trace!(
                frame_rate = frame.sample_rate,
                estimator_rate = self.sample_rate,
                "sample rate mismatch, skipping frame"
            );
            return Vec::new();
        }
        if rms(frame.samples) < self.config.silence_rms {
            return Vec::new();
        }

        let Some(first) = self
            .run_primary(frame.samples)
            .or_else(|| self.run_fallback(frame.samples))
        else {
            return Vec::new();
        };

        let mut voices = vec![first];
        if max_voices == 1 {
            return voices;
        }

        let mut attempts = 0;
        for candidate in self.candidates(frame) {
            if voices.len() >= max_voices || attempts >= self.config.max_attempts {
                break;
            }
            attempts += 1;
            if let Some(freq) = candidate {
                if is_distinct_voice(
                    freq,
                    &voices,
                    self.config.duplicate_tolerance,
                    self.config.harmonic_tolerance,
                ) {
                    voices.push(freq);
                }
            }
        }
        voices
    }

    fn in_range(&self, freq: f64) -> bool {
        freq.is_finite()
            && freq > 0.0
            && freq >= self.config.min_frequency
            && freq <= self.config.max_frequency
    }

    fn usable(&self, result: Result<Option<PitchResult>>, detector: &str) -> Option<f64> {
        match result {
            Ok(Some(pitch)) if pitch.is_voiced() && self.in_range(pitch.frequency) => {
                Some(pitch.frequency)
            }
            Ok(_) => None,
            Err(e) => {
                tracing::trace!(detector, error = %e, "detector failed, treating as no detection");
                None
            }
        }
    }

    fn run_primary(&self, samples: &[f32]) -> Option<f64> {
        self.usable(self.primary.detect(samples), "yin")
    }

    fn run_fallback(&self, samples: &[f32]) -> Option<f64> {
        self.usable(self.fallback.detect(samples), "amdf")
    }

    /// Lazily generated follow-up candidates, cheapest first.
    fn candidates<'f>(&'f self, frame: &'f AudioFrame<'_>) -> impl Iterator<Item = Option<f64>> + 'f {
        let samples = frame.samples;
        let len = samples.len();
        let windows = [
            (0, len),
            (0, len / 2),
            (len / 2, len),
            (len / 4, len * 3 / 4),
        ];

        let detector_candidates = windows.into_iter().enumerate().flat_map(move |(i, (start, end))| {
            let window = &samples[start..end];
            // The full window already ran through the primary detector
            let primary = (i > 0).then(|| self.run_primary(window));
            let fallback = Some(self.run_fallback(window));
            primary.into_iter().chain(fallback)
        });

        let spectral_candidates = frame
            .spectrum
            .map(|spectrum| self.spectral_peaks(spectrum, frame.sample_rate))
            .unwrap_or_default()
            .into_iter()
            .map(Some);

        detector_candidates.chain(spectral_candidates)
    }

    /// In-range local maxima of the magnitude spectrum, strongest first.
    fn spectral_peaks(&self, spectrum: &[f32], sample_rate: f64) -> Vec<f64> {
        if spectrum.len() < 3 {
            return Vec::new();
        }
        let bin_hz = sample_rate / (2.0 * spectrum.len() as f64);

        let mut peaks: Vec<(f32, f64)> = (1..spectrum.len() - 1)
            .filter(|&i| {
                let m = spectrum[i];
                m.is_finite()
                    && m >= self.config.spectral_floor
                    && m > spectrum[i - 1]
                    && m >= spectrum[i + 1]
            })
            .map(|i| {
                let (l, c, r) = (
                    spectrum[i - 1] as f64,
                    spectrum[i] as f64,
                    spectrum[i + 1] as f64,
                );
                let denominator = l - 2.0 * c + r;
                let offset = if denominator.abs() > 1e-12 {
                    (0.5 * (l - r) / denominator).clamp(-0.5, 0.5)
                } else {
                    0.0
                };
                (spectrum[i], (i as f64 + offset) * bin_hz)
            })
            .filter(|&(_, freq)| self.in_range(freq))
            .collect();

        peaks.sort_by(|a, b| b.0.total_cmp(&a.0));
        peaks.into_iter().map(|(_, freq)| freq).collect()
    }
}

fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples
        .iter()
        .filter(|s| s.is_finite())
        .map(|s| s * s)
        .sum();
    (sum_sq / samples.len() as f32).sqrt()
}
