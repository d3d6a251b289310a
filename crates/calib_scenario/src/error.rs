//! Errors of the calibration layer.

use calib_core::types::{DataError, DisciplineError, DriverError, ParameterSpaceError};
use calib_metrics::MetricError;
use thiserror::Error;

/// Errors raised while calibrating disciplines against reference data.
#[derive(Debug, Error)]
pub enum CalibrationError {
    /// The reference data holds no sample.
    #[error("The reference data holds no sample")]
    EmptyReferenceData,

    /// The reference data lacks a variable the calibration needs.
    #[error("The reference data has no variable '{name}'")]
    MissingReferenceVariable {
        /// The missing variable.
        name: String,
    },

    /// The calibrator was executed before reference data was set.
    #[error("Reference data must be set before executing the calibrator")]
    ReferenceDataNotSet,

    /// A metric output the discipline chain did not compute.
    #[error("The discipline chain '{chain}' computed no output '{name}'")]
    MissingModelOutput {
        /// The missing output.
        name: String,
        /// The name of the chain.
        chain: String,
    },

    /// A metric could not be created or evaluated.
    #[error(transparent)]
    Metric(#[from] MetricError),

    /// A dataset operation failed.
    #[error(transparent)]
    Data(#[from] DataError),

    /// A discipline execution failed.
    #[error(transparent)]
    Discipline(#[from] DisciplineError),

    /// A driver run failed.
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// A parameter space operation failed.
    #[error(transparent)]
    Space(#[from] ParameterSpaceError),
}

impl CalibrationError {
    /// Shorthand for [`CalibrationError::MissingReferenceVariable`].
    pub fn missing_reference_variable(name: impl Into<String>) -> Self {
        Self::MissingReferenceVariable { name: name.into() }
    }

    /// Shorthand for [`CalibrationError::MissingModelOutput`].
    pub fn missing_model_output(name: impl Into<String>, chain: impl Into<String>) -> Self {
        Self::MissingModelOutput {
            name: name.into(),
            chain: chain.into(),
        }
    }
}
