//! Loaders for the tables the spiking simulator records.
//!
//! The simulator writes three CSV files per run: `spikeTrains.csv` (the
//! event stream), `locations.csv` (normalized 2-D coordinates per
//! neuron), and `neuronInfos.csv` (the inhibitory flag per neuron).
//! This crate parses them into the types `spikescope-core` consumes.
//! All parse failures are fatal: a malformed recording is reported with
//! its line number and playback never starts.

pub mod neurons;
pub mod spikes;

pub use neurons::{load_inhibitory_flags, load_locations, NeuronTableError};
pub use spikes::{load_spike_train, SpikeTrainError};
