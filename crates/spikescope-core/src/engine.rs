//! The playback engine: merges a sorted spike stream with the simulated
//! clock and emits one render frame per tick.
//!
//! [`PlaybackEngine::advance_to`] is the temporal core. It ticks the
//! clock toward a target time and, on every tick at the pre-advance
//! time, runs the fixed per-tick sequence:
//!
//! 1. evict active entries whose visibility window has elapsed,
//! 2. present a frame through the [`FrameSink`],
//! 3. poll the [`ControlSurface`] for a quit request,
//! 4. emit a progress notification when the logging interval has passed,
//!
//! then advances the clock and pauses one step of wall-clock time.
//!
//! A consumed spike is inserted only after `advance_to` returns, with
//! `fired_at` set to the event's own timestamp. Render-before-insert is
//! deliberate: a spike becomes visible on the first rendered tick with
//! `current_time >= event.time`, which is the tick after the event is
//! consumed, and the event timestamp (not the quantized tick time)
//! anchors its visibility window.
//!
//! [`ControlSurface`]: crate::control::ControlSurface

use async_trait::async_trait;
use tracing::info;

use crate::active::ActiveSet;
use crate::catalog::NeuronCatalog;
use crate::clock::{ClockError, PlaybackClock};
use crate::config::PlaybackConfig;
use crate::control::{ControlSurface, Directive, Pacer, ProgressReporter};
use crate::types::{NeuronId, SpikeEvent};

/// Errors raised while presenting a frame.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// An active neuron has no catalog entry. The catalog must cover
    /// every neuron the spike stream references; this is fatal.
    #[error("neuron {neuron} not in catalog ({catalog_len} neurons)")]
    UnknownNeuron {
        /// The neuron that failed the lookup.
        neuron: NeuronId,
        /// Number of neurons the catalog covers.
        catalog_len: usize,
    },

    /// The drawing surface failed.
    #[error("surface error: {message}")]
    Surface {
        /// Description of the surface failure.
        message: String,
    },
}

/// Errors that can occur while advancing the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// Frame presentation failed.
    #[error("frame error: {source}")]
    Frame {
        /// The underlying frame error.
        #[from]
        source: FrameError,
    },

    /// The visibility window is not a non-negative, finite duration.
    #[error("invalid visibility window {flash_seconds}: must be finite and >= 0")]
    InvalidWindow {
        /// The rejected window value.
        flash_seconds: f64,
    },
}

/// One render target: receives the active set once per tick.
///
/// Presenting must be stateless and idempotent for a given active set:
/// two calls with unchanged inputs produce visually identical frames.
/// The trait is async so a windowed implementation can await the
/// surface's frame swap.
#[async_trait(?Send)]
pub trait FrameSink {
    /// Clear the surface and draw one marker per active neuron at its
    /// catalog position, colored by its category flag, then make the
    /// frame visible.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::UnknownNeuron`] when an active neuron has
    /// no catalog entry, or [`FrameError::Surface`] when the drawing
    /// surface fails. Both are fatal to the run.
    async fn present(
        &mut self,
        time: f64,
        active: &ActiveSet,
        catalog: &NeuronCatalog,
    ) -> Result<(), FrameError>;
}

/// Lifecycle phase of the engine. There is no pause state; the only
/// transitions are `Initializing -> Running -> Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    /// Created, playback not started.
    Initializing,
    /// Inside the tick loop.
    Running,
    /// Playback over (source exhausted or quit requested).
    Terminated,
}

/// Outcome of an [`PlaybackEngine::advance_to`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    /// The clock reached the target time.
    Reached,
    /// A quit request arrived before the target time.
    Interrupted,
}

/// The playback engine state: clock, active set, and per-tick timers.
///
/// All simulation state lives in this struct and is threaded through
/// explicitly; there are no process-wide singletons. The engine owns
/// and mutates the active set; frame sinks only ever see `&ActiveSet`.
#[derive(Debug)]
pub struct PlaybackEngine {
    clock: PlaybackClock,
    active: ActiveSet,
    flash_seconds: f64,
    progress: ProgressReporter,
    phase: EnginePhase,
    frames_rendered: u64,
}

impl PlaybackEngine {
    /// Create an engine from playback configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Clock`] for an invalid step or start time
    /// and [`EngineError::InvalidWindow`] for an invalid flash duration.
    pub fn new(config: &PlaybackConfig) -> Result<Self, EngineError> {
        Self::from_parts(
            config.start_time_seconds,
            config.step_seconds,
            config.flash_seconds,
            config.logging_interval_seconds,
        )
    }

    /// Create an engine from explicit timing parameters.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`PlaybackEngine::new`].
    pub fn from_parts(
        start_time: f64,
        step: f64,
        flash_seconds: f64,
        logging_interval: f64,
    ) -> Result<Self, EngineError> {
        if !flash_seconds.is_finite() || flash_seconds < 0.0 {
            return Err(EngineError::InvalidWindow { flash_seconds });
        }
        Ok(Self {
            clock: PlaybackClock::new(start_time, step)?,
            active: ActiveSet::new(),
            flash_seconds,
            progress: ProgressReporter::new(logging_interval),
            phase: EnginePhase::Initializing,
            frames_rendered: 0,
        })
    }

    /// Tick until the clock reaches `target` time, presenting one frame
    /// per tick.
    ///
    /// Performs zero ticks when `current_time >= target` already, so a
    /// batch of same-timestamp events lands in the active set together
    /// with no frame rendered between the insertions.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Frame`] when the sink fails (including an
    /// active neuron missing from the catalog) and [`EngineError::Clock`]
    /// on tick-counter overflow. Errors are fatal; the run does not
    /// continue.
    pub async fn advance_to(
        &mut self,
        target: f64,
        catalog: &NeuronCatalog,
        sink: &mut dyn FrameSink,
        control: &mut dyn ControlSurface,
        pacer: &mut dyn Pacer,
    ) -> Result<TickFlow, EngineError> {
        while self.clock.current() < target {
            let now = self.clock.current();

            self.active.evict_expired(now, self.flash_seconds);
            sink.present(now, &self.active, catalog).await?;
            self.frames_rendered = self.frames_rendered.saturating_add(1);

            if control.poll() == Directive::Stop {
                return Ok(TickFlow::Interrupted);
            }
            if self.progress.due(now) {
                info!(time = now, active = self.active.len(), "replay progress");
            }

            let _ = self.clock.advance()?;
            pacer.pause();
        }
        Ok(TickFlow::Reached)
    }

    /// Record a consumed spike: insert or refresh the neuron with the
    /// event's own timestamp. Call after [`advance_to`] has reached the
    /// event time.
    ///
    /// [`advance_to`]: PlaybackEngine::advance_to
    pub fn observe_spike(&mut self, event: SpikeEvent) {
        self.active.insert(event.neuron, event.time);
    }

    /// Current simulated time.
    pub fn current_time(&self) -> f64 {
        self.clock.current()
    }

    /// The set of currently visible neurons.
    pub const fn active(&self) -> &ActiveSet {
        &self.active
    }

    /// Current lifecycle phase.
    pub const fn phase(&self) -> EnginePhase {
        self.phase
    }

    /// Total frames presented so far.
    pub const fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Enter the tick loop: `Initializing -> Running`.
    pub(crate) fn mark_running(&mut self) {
        if self.phase == EnginePhase::Initializing {
            self.phase = EnginePhase::Running;
        }
    }

    /// Leave the tick loop: `Running -> Terminated`.
    pub(crate) fn mark_terminated(&mut self) {
        self.phase = EnginePhase::Terminated;
    }
}
