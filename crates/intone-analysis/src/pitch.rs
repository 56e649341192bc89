//! Pitch detection using the YIN algorithm
//!
//! Primary detector for sung notes. Implements the YIN steps from
//! de Cheveigné & Kawahara (2002):
//!
//! 1. **Difference function** - d(τ) = Σ(x[j] - x[j+τ])²
//! 2. **Cumulative mean normalized difference** - d'(τ)
//! 3. **Absolute threshold** - first τ where d'(τ) < threshold
//! 4. **Parabolic interpolation** - sub-sample accuracy
//!
//! The detector is immutable: scratch buffers are allocated per call so a
//! detector can be shared freely and rebuilt for a new sample rate without
//! touching frames already in flight.

use crate::error::{DetectError, Result};
use crate::music::{hz_to_midi, hz_to_note_name};

/// Result of pitch detection for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct PitchResult {
    /// Detected frequency in Hz
    pub frequency: f64,
    /// Confidence/clarity of detection (0.0 - 1.0)
    pub confidence: f64,
}

impl PitchResult {
    /// Check if a pitch was detected
    pub fn is_voiced(&self) -> bool {
        self.frequency.is_finite() && self.frequency > 0.0 && self.confidence > 0.0
    }

    /// Fractional MIDI note number
    pub fn midi(&self) -> Option<f64> {
        hz_to_midi(self.frequency)
    }

    /// Nearest note name with sharp notation (e.g., "A4", "C#5")
    pub fn note_name(&self) -> Option<String> {
        hz_to_note_name(self.frequency)
    }
}

/// Default YIN threshold (lower = stricter).
pub const DEFAULT_YIN_THRESHOLD: f64 = 0.1;

/// Pitch detector using the YIN algorithm
#[derive(Debug, Clone, PartialEq)]
pub struct YinDetector {
    sample_rate: f64,
    min_freq: f64,
    max_freq: f64,
    threshold: f64,
}

impl YinDetector {
    /// Create a detector for the given sample rate and frequency range.
    pub fn new(sample_rate: f64, min_freq: f64, max_freq: f64) -> Result<Self> {
        validate_range(sample_rate, min_freq, max_freq)?;
        Ok(Self {
            sample_rate,
            min_freq,
            max_freq,
            threshold: DEFAULT_YIN_THRESHOLD,
        })
    }

    /// Set YIN threshold (0.01 - 0.5)
    ///
    /// Lower values are stricter and may miss quiet notes.
    /// Higher values are more permissive but may have false positives.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.01, 0.5);
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Minimum number of samples needed to cover two periods of `min_freq`.
    pub fn buffer_size(&self) -> usize {
        max_period(self.sample_rate, self.min_freq) * 2
    }

    /// Detect pitch in a single frame of audio.
    ///
    /// `Ok(None)` means the frame has no periodic content in range.
    pub fn detect(&self, samples: &[f32]) -> Result<Option<PitchResult>> {
        check_samples(samples)?;

        let min_period = min_period(self.sample_rate, self.max_freq);
        let max_period = max_period(self.sample_rate, self.min_freq).min(samples.len() / 2);

        if max_period <= min_period {
            return Err(DetectError::FrameTooShort {
                needed: self.buffer_size(),
                got: samples.len(),
            });
        }

        let difference = difference_function(samples, max_period);
        let cumulative_mean = cumulative_mean_normalized(&difference);

        let Some((period, aperiodicity)) =
            self.find_best_period(&cumulative_mean, min_period, max_period)
        else {
            return Ok(None);
        };

        let refined_period = parabolic_minimum(&cumulative_mean, period);
        if refined_period <= 0.0 {
            return Ok(None);
        }

        Ok(Some(PitchResult {
            frequency: self.sample_rate / refined_period,
            confidence: (1.0 - aperiodicity).max(0.0),
        }))
    }

    /// Absolute threshold step.
    ///
    /// Returns the FIRST local minimum below threshold, not the global
    /// minimum, which keeps sub-harmonics from winning. Falls back to the
    /// global minimum when it is reasonably periodic.
    fn find_best_period(
        &self,
        cumulative_mean: &[f64],
        min_period: usize,
        max_period: usize,
    ) -> Option<(usize, f64)> {
        let mut tau = min_period;
        while tau < max_period {
            if cumulative_mean[tau] < self.threshold {
                while tau + 1 < max_period && cumulative_mean[tau + 1] < cumulative_mean[tau] {
                    tau += 1;
                }
                return Some((tau, cumulative_mean[tau]));
            }
            tau += 1;
        }

        let (best_tau, best_val) = (min_period..=max_period)
            .map(|tau| (tau, cumulative_mean[tau]))
            .fold((min_period, f64::MAX), |best, candidate| {
                if candidate.1 < best.1 {
                    candidate
                } else {
                    best
                }
            });

        (best_val < 0.5).then_some((best_tau, best_val))
    }
}

pub(crate) fn validate_range(sample_rate: f64, min_freq: f64, max_freq: f64) -> Result<()> {
    let valid = sample_rate.is_finite()
        && sample_rate > 0.0
        && min_freq.is_finite()
        && max_freq.is_finite()
        && min_freq > 0.0
        && min_freq < max_freq
        && max_freq < sample_rate / 2.0;
    if valid {
        Ok(())
    } else {
        Err(DetectError::InvalidRange {
            min: min_freq,
            max: max_freq,
            sample_rate,
        })
    }
}

pub(crate) fn check_samples(samples: &[f32]) -> Result<()> {
    match samples.iter().position(|s| !s.is_finite()) {
        Some(index) => Err(DetectError::NonFiniteSample(index)),
        None => Ok(()),
    }
}

pub(crate) fn min_period(sample_rate: f64, max_freq: f64) -> usize {
    ((sample_rate / max_freq) as usize).max(2)
}

pub(crate) fn max_period(sample_rate: f64, min_freq: f64) -> usize {
    (sample_rate / min_freq) as usize
}

/// Difference function, d(τ) = r(0) + r'(τ) - 2*r(τ), with running energy sums.
fn difference_function(samples: &[f32], max_period: usize) -> Vec<f64> {
    let window = max_period;

    let mut cum_sq = vec![0.0f64; samples.len() + 1];
    for (i, &s) in samples.iter().enumerate() {
        cum_sq[i + 1] = cum_sq[i] + (s as f64) * (s as f64);
    }
    let energy = |start: usize, len: usize| -> f64 {
        let end = (start + len).min(samples.len());
        cum_sq[end] - cum_sq[start.min(end)]
    };

    let mut difference = vec![0.0f64; max_period + 1];
    let e0 = energy(0, window);
    for (tau, d) in difference.iter_mut().enumerate().skip(1) {
        let autocorr: f64 = samples[..window]
            .iter()
            .zip(&samples[tau..])
            .map(|(&a, &b)| a as f64 * b as f64)
            .sum();
        *d = e0 + energy(tau, window) - 2.0 * autocorr;
    }
    difference
}

/// d'(τ) = d(τ) / ((1/τ) * Σ d(j)) for j in 1..=τ, d'(0) = 1
fn cumulative_mean_normalized(difference: &[f64]) -> Vec<f64> {
    let mut cumulative_mean = vec![1.0f64; difference.len()];
    let mut running_sum = 0.0f64;
    for tau in 1..difference.len() {
        running_sum += difference[tau];
        if running_sum > 1e-10 {
            cumulative_mean[tau] = difference[tau] * tau as f64 / running_sum;
        }
    }
    cumulative_mean
}

/// Vertex of the parabola through (τ-1, τ, τ+1) of a minimum.
pub(crate) fn parabolic_minimum(values: &[f64], tau: usize) -> f64 {
    if tau < 1 || tau + 1 >= values.len() {
        return tau as f64;
    }

    let s0 = values[tau - 1];
    let s1 = values[tau];
    let s2 = values[tau + 1];
    let denominator = 2.0 * (2.0 * s1 - s2 - s0);

    if denominator.abs() > 1e-10 {
        tau as f64 + (s2 - s0) / denominator
    } else {
        tau as f64
    }
}
