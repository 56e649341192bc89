//! Average Magnitude Difference Function pitch detector.
//!
//! Fallback for frames where YIN finds nothing usable. AMDF is cheaper and
//! less picky about the threshold, at the cost of being more prone to octave
//! errors, so the dip search prefers the shortest lag whose depth is within
//! [`SUBHARMONIC_SLACK`] of the deepest one.

use crate::error::{DetectError, Result};
use crate::pitch::{check_samples, max_period, min_period, parabolic_minimum, validate_range};
use crate::PitchResult;

/// Default maximum normalized dip depth (dip / mean) accepted as periodic.
pub const DEFAULT_AMDF_THRESHOLD: f64 = 0.35;

/// A dip this close (relative) to the deepest one wins if it has a shorter lag.
const SUBHARMONIC_SLACK: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct AmdfDetector {
    sample_rate: f64,
    min_freq: f64,
    max_freq: f64,
    threshold: f64,
}

impl AmdfDetector {
    pub fn new(sample_rate: f64, min_freq: f64, max_freq: f64) -> Result<Self> {
        validate_range(sample_rate, min_freq, max_freq)?;
        Ok(Self {
            sample_rate,
            min_freq,
            max_freq,
            threshold: DEFAULT_AMDF_THRESHOLD,
        })
    }

    /// Clamped to 0.05 - 0.9.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.05, 0.9);
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn detect(&self, samples: &[f32]) -> Result<Option<PitchResult>> {
        check_samples(samples)?;

        let min_period = min_period(self.sample_rate, self.max_freq);
        let longest = max_period(self.sample_rate, self.min_freq);
        let max_lag = longest.min(samples.len() / 2);
        if max_lag <= min_period {
            return Err(DetectError::FrameTooShort {
                needed: longest * 2,
                got: samples.len(),
            });
        }

        let window = samples.len() - max_lag;
        let amdf: Vec<f64> = (0..=max_lag)
            .map(|tau| {
                let sum: f64 = samples[..window]
                    .iter()
                    .zip(&samples[tau..])
                    .map(|(&a, &b)| (a as f64 - b as f64).abs())
                    .sum();
                sum / window as f64
            })
            .collect();

        let searched = &amdf[min_period..=max_lag];
        let mean = searched.iter().sum::<f64>() / searched.len() as f64;
        if mean <= f64::EPSILON {
            return Ok(None);
        }

        let deepest = searched.iter().copied().fold(f64::MAX, f64::min);
        if deepest / mean > self.threshold {
            return Ok(None);
        }

        // First local minimum close enough to the deepest dip
        let limit = deepest + SUBHARMONIC_SLACK * mean;
        let Some(period) = (min_period..=max_lag).find(|&tau| {
            amdf[tau] <= limit
                && (tau == 0 || amdf[tau] <= amdf[tau - 1])
                && (tau + 1 >= amdf.len() || amdf[tau] <= amdf[tau + 1])
        }) else {
            return Ok(None);
        };

        let refined = parabolic_minimum(&amdf, period);
        if refined <= 0.0 {
            return Ok(None);
        }

        Ok(Some(PitchResult {
            frequency: self.sample_rate / refined,
            confidence: (1.0 - amdf[period] / mean).clamp(0.0, 1.0),
        }))
    }
}
