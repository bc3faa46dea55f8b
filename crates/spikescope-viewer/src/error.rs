//! Error types for the viewer binary.
//!
//! [`ViewerError`] is the top-level error type that wraps all failure
//! modes from startup through playback.

/// Top-level error for the viewer binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `run` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// Argument parsing or configuration loading failed before the
    /// window opened.
    #[error("startup error: {message}")]
    Bootstrap {
        /// Description of the startup failure.
        message: String,
    },

    /// Spike train loading failed.
    #[error("spike train error: {source}")]
    SpikeTrain {
        /// The underlying loader error.
        #[from]
        source: spikescope_data::SpikeTrainError,
    },

    /// Neuron table loading failed.
    #[error("neuron table error: {source}")]
    NeuronTable {
        /// The underlying loader error.
        #[from]
        source: spikescope_data::NeuronTableError,
    },

    /// Neuron catalog construction failed.
    #[error("catalog error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: spikescope_core::catalog::CatalogError,
    },

    /// Engine construction or ticking failed.
    #[error("engine error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: spikescope_core::engine::EngineError,
    },

    /// The playback run failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: spikescope_core::runner::RunnerError,
    },
}
