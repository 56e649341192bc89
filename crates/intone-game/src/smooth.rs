//! Exponentially smoothed energy signal.
//!
//! Frame-to-frame pitch estimates jitter; the renderer should not. Each
//! update moves the current value a fixed fraction of the way toward the
//! new proximity reading.
//!
//! # Example
//!
//! ```
//! use intone_game::EnergySmoother;
//!
//! let mut energy = EnergySmoother::new(1.0, 0.15);
//! energy.update(0.0);
//! assert!((energy.current() - 0.85).abs() < 1e-12);
//! ```

/// Default smoothing factor applied per tick.
pub const DEFAULT_ENERGY_LERP: f64 = 0.15;

/// Energy value in `[0, 1]`, smoothed with a per-tick lerp.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergySmoother {
    current: f64,
    factor: f64,
}

impl EnergySmoother {
    /// `factor` is clamped to `[0, 1]`; 1 follows the input immediately.
    pub fn new(initial: f64, factor: f64) -> Self {
        Self {
            current: clamp_unit(initial),
            factor: clamp_unit(factor),
        }
    }

    pub fn immediate(initial: f64) -> Self {
        Self::new(initial, 1.0)
    }

    /// Move toward `target` and return the new value.
    #[inline]
    pub fn update(&mut self, target: f64) -> f64 {
        let target = clamp_unit(target);
        self.current = clamp_unit(self.current + (target - self.current) * self.factor);
        self.current
    }

    #[inline]
    pub fn set_immediate(&mut self, value: f64) {
        self.current = clamp_unit(value);
    }

    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }

    #[inline]
    pub fn factor(&self) -> f64 {
        self.factor
    }
}

impl Default for EnergySmoother {
    fn default() -> Self {
        Self::new(1.0, DEFAULT_ENERGY_LERP)
    }
}

// NaN collapses to 0 so a bad reading can never poison the signal
fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
