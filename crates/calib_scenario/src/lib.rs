//! # calib_scenario
//!
//! Calibration of discipline parameters against reference data.
//!
//! The crate ties the lower layers together:
//!
//! - [`Calibrator`]: runs a discipline chain over the reference input
//!   samples and evaluates weighted metric composites on the results.
//! - [`CalibrationScenario`]: wraps a calibrator into an optimization
//!   problem, handles constraints from further metrics and tracks prior and
//!   posterior parameters and model data.
//! - [`CustomDoeDriver`] and [`FullFactorialDriver`]: sampling baselines
//!   implementing the driver seam of `calib_core`; numerical optimizers
//!   plug in through the same [`OptimizationDriver`] trait.
//!
//! [`OptimizationDriver`]: calib_core::traits::OptimizationDriver
//!
//! With the default `parallel` feature, the reference samples of one model
//! evaluation are run concurrently with rayon.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod calibrator;
mod doe;
mod error;
mod scenario;

pub use calibrator::Calibrator;
pub use doe::{CustomDoeDriver, FullFactorialDriver};
pub use error::CalibrationError;
pub use scenario::{CalibrationResult, CalibrationScenario};
