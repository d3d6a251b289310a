//! # calib_signal
//!
//! Time signal generation for calibration problems.
//!
//! A [`SignalGenerator`] produces multivariate [`Signal`]s at times of
//! interest from initial state values and parameters.
//! [`OdeSignalGenerator`] integrates a right-hand side expressed as a
//! discipline with a fixed-step Runge-Kutta scheme, and
//! [`SignalGeneratorDiscipline`] wraps any generator back into a discipline
//! whose inputs are `initial_<state>` values and parameters, so that its
//! trajectories can be calibrated like any other model output.
//!
//! The [`problems`] module ships a harmonic oscillator benchmark, with a
//! constant or exponentially decaying angular velocity.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod discipline;
mod error;
mod ode;
pub mod problems;
mod signal;

pub use discipline::SignalGeneratorDiscipline;
pub use error::SignalError;
pub use ode::OdeSignalGenerator;
pub use signal::{Signal, SignalGenerator};
