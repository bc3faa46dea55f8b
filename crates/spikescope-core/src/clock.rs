//! Simulated playback clock.
//!
//! The clock advances a simulated time in fixed steps, starting from a
//! configured offset into the recording. The tick counter is the source
//! of truth: the current time is always derived as `start + ticks * step`
//! rather than accumulated with repeated addition, so the tick at
//! simulated time `start + 16 * step` lands on exactly that value instead
//! of drifting by accumulated rounding error. Visibility-window
//! comparisons at the eviction boundary depend on this.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// The configured step is not a positive, finite number of seconds.
    #[error("invalid clock step {step}: must be finite and > 0")]
    InvalidStep {
        /// The rejected step value.
        step: f64,
    },

    /// The configured start time is not finite.
    #[error("invalid clock start time {start}: must be finite")]
    InvalidStart {
        /// The rejected start value.
        start: f64,
    },

    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,
}

/// Monotonic simulated clock with a fixed step.
///
/// The current time only increases, by exactly one [`step`] per tick,
/// for the entire run. There is no rewind and no pause state.
///
/// [`step`]: PlaybackClock::step
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackClock {
    /// Simulated time at tick 0, in seconds.
    start: f64,
    /// Seconds of simulated time per tick.
    step: f64,
    /// Number of ticks executed so far.
    ticks: u64,
}

impl PlaybackClock {
    /// Create a clock starting at `start` seconds, advancing by `step`
    /// seconds per tick.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidStep`] unless `step` is finite and
    /// strictly positive, and [`ClockError::InvalidStart`] unless
    /// `start` is finite.
    pub fn new(start: f64, step: f64) -> Result<Self, ClockError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(ClockError::InvalidStep { step });
        }
        if !start.is_finite() {
            return Err(ClockError::InvalidStart { start });
        }
        Ok(Self {
            start,
            step,
            ticks: 0,
        })
    }

    /// Advance the clock by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter would
    /// exceed `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.ticks = self.ticks.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.ticks)
    }

    /// Current simulated time in seconds, derived from the tick counter.
    pub fn current(&self) -> f64 {
        self.start + (self.ticks as f64) * self.step
    }

    /// Number of ticks executed so far.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Configured seconds per tick.
    pub const fn step(&self) -> f64 {
        self.step
    }

    /// Simulated time at tick 0.
    pub const fn start(&self) -> f64 {
        self.start
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_at_configured_time() {
        let clock = PlaybackClock::new(38.0, 1e-4).unwrap();
        assert_eq!(clock.ticks(), 0);
        assert!((clock.current() - 38.0).abs() < f64::EPSILON);
    }

    #[test]
    fn current_time_is_derived_not_accumulated() {
        let mut clock = PlaybackClock::new(0.0, 1e-4).unwrap();
        for _ in 0..16 {
            let _ = clock.advance().unwrap();
        }
        // 16 * 1e-4 computed by multiplication, not by 16 additions.
        assert!(clock.current() <= 16.0_f64 * 1e-4);
        assert!(clock.current() >= 15.0_f64 * 1e-4);
        assert_eq!(clock.ticks(), 16);
    }

    #[test]
    fn time_increases_monotonically() {
        let mut clock = PlaybackClock::new(1.0, 0.5).unwrap();
        let mut previous = clock.current();
        for _ in 0..10 {
            let _ = clock.advance().unwrap();
            assert!(clock.current() > previous);
            previous = clock.current();
        }
    }

    #[test]
    fn zero_step_rejected() {
        assert!(matches!(
            PlaybackClock::new(0.0, 0.0),
            Err(ClockError::InvalidStep { .. })
        ));
    }

    #[test]
    fn negative_step_rejected() {
        assert!(matches!(
            PlaybackClock::new(0.0, -1e-4),
            Err(ClockError::InvalidStep { .. })
        ));
    }

    #[test]
    fn non_finite_start_rejected() {
        assert!(matches!(
            PlaybackClock::new(f64::NAN, 1e-4),
            Err(ClockError::InvalidStart { .. })
        ));
    }
}
