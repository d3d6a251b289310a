//! Core data types for calibration.
//!
//! This module provides:
//! - [`Dataset`]: named variables storing per-sample rows
//! - [`ParameterSpace`]: bounded parameters with prior values
//! - Error types shared across the workspace

mod dataset;
mod parameter_space;

pub mod error;

pub use dataset::Dataset;
pub use error::{
    DataError, DisciplineError, DriverError, InterpolationError, ParameterSpaceError,
};
pub use parameter_space::ParameterSpace;
