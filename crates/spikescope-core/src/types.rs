//! Shared value types for the playback engine.
//!
//! Neuron identifiers are dense row indices into the recorded tables
//! (row `i` of the locations table describes neuron `i`), so the ID is a
//! thin `u32` newtype rather than anything globally unique. The wrapper
//! exists to keep neuron indices from mixing with other integers at
//! compile time.

use serde::{Deserialize, Serialize};

/// Identifier of a neuron, a dense row index into the neuron tables.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NeuronId(pub u32);

impl NeuronId {
    /// Wrap a raw row index.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Return the raw row index.
    pub const fn into_inner(self) -> u32 {
        self.0
    }

    /// Return the row index as a `usize` for table lookups.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for NeuronId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NeuronId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<NeuronId> for u32 {
    fn from(id: NeuronId) -> Self {
        id.0
    }
}

/// A single recorded firing: which neuron fired, and when (seconds of
/// simulated time). Immutable once read; spike streams are ordered by
/// non-decreasing `time`, and ties keep the order the recording provides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikeEvent {
    /// The neuron that fired.
    pub neuron: NeuronId,
    /// Simulated time of the firing, in seconds.
    pub time: f64,
}

impl SpikeEvent {
    /// Construct a spike event.
    pub const fn new(neuron: NeuronId, time: f64) -> Self {
        Self { neuron, time }
    }
}
