//! Static per-neuron position and category metadata.
//!
//! The catalog joins the two row-aligned neuron tables (normalized
//! locations and inhibitory flags) into one descriptor per neuron,
//! scaling the `[0, 1]` coordinates to surface pixels at construction
//! time. It is built once before playback starts and is read-only for
//! the lifetime of the run.

use crate::types::NeuronId;

/// Errors raised while building the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The locations table and the flags table disagree on the neuron
    /// count; the tables are joined by row index, so this is fatal.
    #[error("neuron table length mismatch: {positions} locations vs {flags} flags")]
    LengthMismatch {
        /// Number of rows in the locations table.
        positions: usize,
        /// Number of rows in the flags table.
        flags: usize,
    },
}

/// Position and category of one neuron on the render surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeuronDescriptor {
    /// Pixel position on the surface, origin at the top-left corner.
    pub position: (i32, i32),
    /// Whether the neuron is inhibitory (selects the marker color).
    pub inhibitory: bool,
}

/// Read-only table of per-neuron descriptors, indexed by [`NeuronId`].
#[derive(Debug, Clone)]
pub struct NeuronCatalog {
    descriptors: Vec<NeuronDescriptor>,
}

impl NeuronCatalog {
    /// Join normalized locations and inhibitory flags into a catalog,
    /// scaling to a `width` x `height` surface. The recording uses a
    /// bottom-left origin while the surface uses top-left, so the
    /// vertical axis is flipped: `y_px = (1 - y) * height`. Coordinates
    /// truncate to whole pixels, matching the recorded layout.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::LengthMismatch`] when the two tables have
    /// different row counts.
    pub fn new(
        locations: &[(f64, f64)],
        inhibitory: &[bool],
        width: u32,
        height: u32,
    ) -> Result<Self, CatalogError> {
        if locations.len() != inhibitory.len() {
            return Err(CatalogError::LengthMismatch {
                positions: locations.len(),
                flags: inhibitory.len(),
            });
        }

        let descriptors = locations
            .iter()
            .zip(inhibitory.iter())
            .map(|(&(x, y), &inhibitory)| NeuronDescriptor {
                position: (
                    (x * f64::from(width)) as i32,
                    ((1.0 - y) * f64::from(height)) as i32,
                ),
                inhibitory,
            })
            .collect();

        Ok(Self { descriptors })
    }

    /// Look up the descriptor for a neuron, or `None` when the ID is
    /// outside the recorded population (a fatal precondition failure for
    /// the caller).
    pub fn descriptor(&self, neuron: NeuronId) -> Option<&NeuronDescriptor> {
        self.descriptors.get(neuron.index())
    }

    /// Number of neurons in the catalog.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
