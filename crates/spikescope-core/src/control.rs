//! Per-tick control seams: quit polling, pacing, progress notifications.
//!
//! The engine drives one [`ControlSurface::poll`] per tick (after the
//! frame is fully presented, so a quit request never leaves a partial
//! frame on screen) and one [`Pacer::pause`] per tick to approximate
//! real time. The viewer binds these to the window's event queue and a
//! blocking wall-clock sleep; tests use the no-op implementations.

use std::time::Duration;

/// What the controller wants the engine to do after this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Keep ticking.
    Continue,
    /// Stop playback now; the process should exit cleanly.
    Stop,
}

/// Termination-signal source, polled once per tick.
pub trait ControlSurface {
    /// Drain pending termination signals and report the verdict.
    fn poll(&mut self) -> Directive;
}

/// A control surface that never requests a stop (for tests and
/// headless runs).
#[derive(Debug, Default)]
pub struct NoopControl;

impl ControlSurface for NoopControl {
    fn poll(&mut self) -> Directive {
        Directive::Continue
    }
}

/// Per-tick pacing seam.
///
/// Playback is single-threaded and cooperative: the only suspension
/// point is this bounded pause after each tick, and it has no
/// cancellation semantics beyond the next poll observing a quit signal
/// immediately afterward.
pub trait Pacer {
    /// Pause for roughly one tick of wall-clock time.
    fn pause(&mut self);
}

/// Pacer that blocks the thread for a fixed duration per tick.
#[derive(Debug)]
pub struct WallClockPacer {
    pause: Duration,
}

impl WallClockPacer {
    /// Pace one tick per `step_seconds` of wall-clock time.
    pub fn new(step_seconds: f64) -> Self {
        Self {
            pause: Duration::from_secs_f64(step_seconds.max(0.0)),
        }
    }
}

impl Pacer for WallClockPacer {
    fn pause(&mut self) {
        std::thread::sleep(self.pause);
    }
}

/// Pacer that does not pause (for tests).
#[derive(Debug, Default)]
pub struct NoopPacer;

impl Pacer for NoopPacer {
    fn pause(&mut self) {}
}

/// Periodic progress-notification timer.
///
/// Fires when the simulated clock has advanced more than `interval`
/// past the last notification, then re-arms at the current time. The
/// last-notified time starts at zero rather than at the playback start
/// offset, so the first notification fires on the first tick of a run
/// that starts mid-recording.
#[derive(Debug)]
pub struct ProgressReporter {
    interval: f64,
    last_notified: f64,
}

impl ProgressReporter {
    /// Create a reporter firing every `interval` simulated seconds.
    pub const fn new(interval: f64) -> Self {
        Self {
            interval,
            last_notified: 0.0,
        }
    }

    /// Report the current simulated time; returns `true` when a
    /// notification is due, re-arming the timer.
    pub fn due(&mut self, now: f64) -> bool {
        if now - self.last_notified > self.interval {
            self.last_notified = now;
            true
        } else {
            false
        }
    }
}
