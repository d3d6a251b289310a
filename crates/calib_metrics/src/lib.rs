//! # calib_metrics
//!
//! Calibration metrics for the calibrate-rust workspace.
//!
//! A calibration metric quantifies the discrepancy between the outputs of a
//! discipline and reference data for one controlled output. Two families are
//! provided:
//!
//! - Mean metrics ([`Mse`], [`Mae`]): NaN-aware mean of a pointwise error
//!   over every sample and component.
//! - Integrated metrics ([`Ise`], [`Iae`]): pointwise error interpolated
//!   onto the reference mesh and integrated with the trapezoidal rule,
//!   averaged over samples. Used when the output is a 1D function
//!   discretized over a (possibly irregular) mesh.
//!
//! Metrics are resolved by name through [`CalibrationMetricFactory`] and
//! combined into weighted aggregates with [`CompositeMetric`].
//!
//! # Example
//!
//! ```
//! use calib_core::types::Dataset;
//! use calib_metrics::{CalibrationMetric, Mse};
//!
//! let mut reference = Dataset::new();
//! reference.add_scalar_variable("y", vec![1.0, 2.0]).unwrap();
//!
//! let mut model = Dataset::new();
//! model.add_scalar_variable("y", vec![1.0, 4.0]).unwrap();
//!
//! let mut metric = Mse::new("y");
//! metric.set_reference_data(&reference).unwrap();
//! assert_eq!(metric.evaluate(&model).unwrap(), 2.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod composite;
mod error;
mod factory;
mod integrated;
mod mean;
mod metric;
mod settings;

pub use composite::CompositeMetric;
pub use error::MetricError;
pub use factory::{CalibrationMetricFactory, MetricBuilder, MetricKind};
pub use integrated::{Iae, Ise};
pub use mean::{Mae, Mse};
pub use metric::CalibrationMetric;
pub use settings::CalibrationMetricSettings;
