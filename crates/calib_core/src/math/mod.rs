//! Numerical routines shared by the metric layer.
//!
//! - [`interpolation`]: piecewise-linear interpolation without extrapolation
//! - [`quadrature`]: trapezoidal integration over irregular meshes
//! - [`stats`]: NaN-aware statistics

pub mod interpolation;
pub mod quadrature;
pub mod stats;

pub use interpolation::{ensure_ascending, interpolate_linear, interpolate_onto};
pub use quadrature::trapezoid;
pub use stats::nanmean;
