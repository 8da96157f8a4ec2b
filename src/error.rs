//! Error types.
//!
//! Configuration problems are reported as [`ConfigError`] and wrapped into
//! [`Error::InvalidConfiguration`] by the fallible entry points. Everything
//! the binner and the objectives compute is otherwise total. Shape contract
//! violations in the gradient hot path are programmer errors and panic.

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `max_bins` must be in `[2, 256]`.
    #[error("max_bins must be in [2, 256], got {0}")]
    MaxBins(usize),

    /// `subsample` must keep at least one row.
    #[error("subsample must be >= 1, got {0}")]
    Subsample(usize),

    /// Prediction dimension does not fit the objective.
    #[error("objective '{objective}' does not support prediction_dim = {dim}")]
    PredictionDim {
        /// Registry name of the objective.
        objective: &'static str,
        /// Requested prediction dimension.
        dim: usize,
    },
}

/// Errors returned by the binner and the objective registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    /// The objective name is not in the registry.
    #[error(
        "unsupported objective '{0}' (expected one of: least_squares, binary_crossentropy, categorical_crossentropy)"
    )]
    UnsupportedObjective(String),

    /// Data passed to `transform` has a different number of features than
    /// the data the mapper was fitted on.
    #[error("expected {expected} features, got {actual}")]
    FeatureCountMismatch {
        /// Number of features seen during fit.
        expected: usize,
        /// Number of features in the offending input.
        actual: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
