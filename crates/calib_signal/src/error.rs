//! Errors of the signal layer.

use calib_core::types::DisciplineError;
use thiserror::Error;

/// Errors raised while generating time signals.
#[derive(Debug, Error)]
pub enum SignalError {
    /// The times of interest are empty.
    #[error("At least one time of interest is required")]
    EmptyTimes,

    /// The times of interest are not strictly ascending.
    #[error("The times of interest must be strictly ascending")]
    NonAscendingTimes,

    /// An initial state value is missing.
    #[error("No initial value for state variable '{name}'")]
    MissingInitialState {
        /// The state variable.
        name: String,
    },

    /// The right-hand side did not produce a state derivative.
    #[error("The right-hand side computed no derivative '{name}'")]
    MissingDerivative {
        /// The expected derivative variable.
        name: String,
    },

    /// The right-hand side discipline failed.
    #[error(transparent)]
    Discipline(#[from] DisciplineError),
}

impl SignalError {
    /// Shorthand for [`SignalError::MissingInitialState`].
    pub fn missing_initial_state(name: impl Into<String>) -> Self {
        Self::MissingInitialState { name: name.into() }
    }

    /// Shorthand for [`SignalError::MissingDerivative`].
    pub fn missing_derivative(name: impl Into<String>) -> Self {
        Self::MissingDerivative { name: name.into() }
    }
}
