//! Frame timing for hosts without their own delta-time source.

use std::time::{Duration, Instant};

/// Delta used when no previous frame exists (one 60 Hz frame).
pub const DEFAULT_FRAME_DT: Duration = Duration::from_nanos(16_666_667);

/// Turns monotonic frame timestamps into `dt` values.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
/// use intone::{FrameClock, DEFAULT_FRAME_DT};
///
/// let mut clock = FrameClock::new();
/// let start = Instant::now();
/// assert_eq!(clock.tick_at(start), DEFAULT_FRAME_DT);
/// assert_eq!(clock.tick_at(start + Duration::from_millis(20)), Duration::from_millis(20));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time since the previous call, measured now.
    pub fn tick(&mut self) -> Duration {
        self.tick_at(Instant::now())
    }

    /// Time since the previous call, measured at `now`.
    ///
    /// The first call, and any call with a timestamp that does not move
    /// forward, yields [`DEFAULT_FRAME_DT`].
    pub fn tick_at(&mut self, now: Instant) -> Duration {
        let dt = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .filter(|dt| !dt.is_zero())
            .unwrap_or(DEFAULT_FRAME_DT);
        self.last = Some(now);
        dt
    }

    /// Forget the previous frame; the next tick yields the default delta.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
