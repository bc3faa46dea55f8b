//! Playback engine for the Spikescope spike-train visualizer.
//!
//! This crate contains the temporal core of the visualizer: a simulated
//! clock that advances in fixed steps, a bounded-lifetime active set of
//! recently fired neurons, and the engine that merges a sorted spike
//! stream with the advancing clock and emits one render frame per tick.
//!
//! The crate performs no I/O of its own besides `tracing` output. Loading
//! the recorded spike train and neuron tables lives in `spikescope-data`;
//! opening a window and drawing frames lives in `spikescope-viewer`.
//! Those collaborators meet this crate at two seams: [`FrameSink`] (one
//! call per tick, presents the current active set) and [`ControlSurface`]
//! (one poll per tick for a quit request).
//!
//! [`FrameSink`]: engine::FrameSink
//! [`ControlSurface`]: control::ControlSurface

pub mod active;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod control;
pub mod engine;
pub mod runner;
pub mod types;

pub use active::ActiveSet;
pub use catalog::{NeuronCatalog, NeuronDescriptor};
pub use clock::PlaybackClock;
pub use config::ReplayConfig;
pub use control::{ControlSurface, Directive, Pacer};
pub use engine::{EnginePhase, FrameSink, PlaybackEngine, TickFlow};
pub use runner::{run_playback, EndReason, PlaybackResult};
pub use types::{NeuronId, SpikeEvent};
