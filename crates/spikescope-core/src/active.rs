//! Bounded-lifetime set of recently fired neurons.
//!
//! The active set maps each neuron to the time of its most recent firing
//! and keeps the invariant that a neuron is a member iff
//! `current_time - fired_at <= window` (strict eviction: an entry exactly
//! at the boundary stays visible until the first tick where it exceeds
//! the window).
//!
//! Alongside the mapping, the set keeps a min-heap of `(fired_at, neuron)`
//! as an expiry index. Since the visibility window is fixed, expiry order
//! equals firing order, so eviction pops the oldest entries in O(log n)
//! instead of rescanning the whole mapping on every tick. When a neuron
//! refires while still active, the old heap entry goes stale; stale
//! entries are recognized on pop by comparing the recorded firing time
//! against the mapping (bitwise, the heap entry is a copy of the stored
//! value) and are discarded without touching the mapping.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use crate::types::NeuronId;

/// Heap key: expiry order is firing order because the window is fixed.
#[derive(Debug, Clone, Copy)]
struct ExpiryKey {
    fired_at: f64,
    neuron: NeuronId,
}

impl PartialEq for ExpiryKey {
    fn eq(&self, other: &Self) -> bool {
        self.fired_at.to_bits() == other.fired_at.to_bits() && self.neuron == other.neuron
    }
}

impl Eq for ExpiryKey {}

impl PartialOrd for ExpiryKey {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExpiryKey {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.fired_at
            .total_cmp(&other.fired_at)
            .then_with(|| self.neuron.cmp(&other.neuron))
    }
}

/// Set of neurons currently inside their visibility window.
///
/// Insertion refreshes: a neuron that fires again while still active has
/// its `fired_at` overwritten and its lifetime restarted. Iteration order
/// is by neuron ID, so renders are deterministic for a given membership.
#[derive(Debug, Default)]
pub struct ActiveSet {
    /// Most recent firing time per active neuron.
    fired: BTreeMap<NeuronId, f64>,
    /// Min-heap of firing times; may hold stale entries after refires.
    expiry: BinaryHeap<Reverse<ExpiryKey>>,
}

impl ActiveSet {
    /// Create an empty active set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a firing, or refresh the entry if the neuron is already
    /// active. `fired_at` is the event's own timestamp, not the tick
    /// time, so the visibility window is anchored to the recording.
    pub fn insert(&mut self, neuron: NeuronId, fired_at: f64) {
        let _previous = self.fired.insert(neuron, fired_at);
        self.expiry.push(Reverse(ExpiryKey { fired_at, neuron }));
    }

    /// Remove every entry whose window has elapsed at time `now`:
    /// strictly `now - fired_at > window`.
    pub fn evict_expired(&mut self, now: f64, window: f64) {
        while let Some(Reverse(key)) = self.expiry.peek().copied() {
            if now - key.fired_at <= window {
                break;
            }
            let _ = self.expiry.pop();
            // Stale heap entries (neuron refired since) must not evict
            // the refreshed mapping entry.
            if self
                .fired
                .get(&key.neuron)
                .is_some_and(|stored| stored.to_bits() == key.fired_at.to_bits())
            {
                let _ = self.fired.remove(&key.neuron);
            }
        }
    }

    /// Whether the neuron is currently active.
    pub fn contains(&self, neuron: NeuronId) -> bool {
        self.fired.contains_key(&neuron)
    }

    /// The most recent firing time of an active neuron.
    pub fn fired_at(&self, neuron: NeuronId) -> Option<f64> {
        self.fired.get(&neuron).copied()
    }

    /// Number of active neurons.
    pub fn len(&self) -> usize {
        self.fired.len()
    }

    /// Whether no neuron is active.
    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }

    /// Iterate over `(neuron, fired_at)` pairs in neuron-ID order.
    pub fn iter(&self) -> impl Iterator<Item = (NeuronId, f64)> + '_ {
        self.fired.iter().map(|(id, t)| (*id, *t))
    }
}
