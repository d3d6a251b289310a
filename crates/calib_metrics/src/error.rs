//! Metric error types.

use calib_core::types::{DataError, InterpolationError};
use thiserror::Error;

/// Errors raised while resolving or evaluating calibration metrics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    /// The requested metric name is not registered in the factory.
    #[error("Unknown calibration metric '{name}' (available: {available})")]
    UnknownMetric {
        /// The unknown name.
        name: String,
        /// The comma-separated registered names.
        available: String,
    },

    /// An integrated metric was requested without a mesh.
    #[error("Metric '{metric}' is integrated over a mesh: settings must name one")]
    MeshRequired {
        /// The name of the metric.
        metric: String,
    },

    /// The metric was evaluated before reference data were bound.
    #[error("Metric '{metric}' has no reference data")]
    ReferenceDataNotSet {
        /// The display name of the metric.
        metric: String,
    },

    /// Model and reference data disagree on shape for an output.
    #[error("Output '{output}': model data shape does not match the reference data")]
    ShapeMismatch {
        /// The name of the output.
        output: String,
    },

    /// An explicit weight outside the open interval (0, 1).
    #[error("The weight must be comprised between 0 and 1 (got {weight})")]
    InvalidWeight {
        /// The offending weight.
        weight: f64,
    },

    /// Explicit weights that cannot be completed to sum to 1.
    #[error("The weights must sum to 1 (explicit weights sum to {total})")]
    InvalidWeightSum {
        /// The sum of the explicit weights.
        total: f64,
    },

    /// A composite metric was built from an empty settings list.
    #[error("At least one calibration metric is required")]
    NoMetrics,

    /// A dataset operation failed.
    #[error(transparent)]
    Data(#[from] DataError),

    /// Interpolation onto the reference mesh failed.
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
}
