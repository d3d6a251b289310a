//! # calib_core: Foundation for the calibrate-rust workspace
//!
//! ## Layer 1 (Foundation) Role
//!
//! calib_core serves as the bottom layer of the workspace, providing:
//! - The tabular data model shared by metrics and scenarios (`types::dataset`)
//! - The space of calibration parameters with bounds (`types::parameter_space`)
//! - Interpolation, quadrature and NaN-aware statistics (`math`)
//! - The seams towards the host MDO framework (`traits`):
//!   disciplines on one side, optimization drivers on the other
//! - Error types: `DataError`, `ParameterSpaceError`, `InterpolationError`,
//!   `DisciplineError`, `DriverError` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other calib_* crates, with minimal external
//! dependencies:
//! - thiserror: Structured error types
//! - serde: Serialisation of datasets and results
//!
//! ## Usage Examples
//!
//! ```rust
//! use calib_core::types::{Dataset, ParameterSpace};
//!
//! // A dataset with two observations of a scalar output
//! let mut data = Dataset::new();
//! data.add_variable("y", vec![vec![1.0], vec![2.0]]).unwrap();
//! assert_eq!(data.n_samples(), 2);
//!
//! // The space of parameters to calibrate
//! let mut space = ParameterSpace::new();
//! space.add_variable("a", 0.0, 1.0, 0.5).unwrap();
//! assert_eq!(space.dimension(), 1);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod traits;
pub mod types;

#[cfg(test)]
mod tests {
    #[test]
    fn it_works() {
        assert_eq!(2 + 2, 4);
    }
}
