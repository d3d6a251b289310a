//! The calibration metric trait.

use calib_core::types::Dataset;

use crate::error::MetricError;

/// A measure of the discrepancy between a model output and reference data.
///
/// A metric is tied to one controlled output (and, for integrated metrics,
/// the mesh that indexes it). Reference data are bound once with
/// [`set_reference_data`](CalibrationMetric::set_reference_data); the metric
/// is then evaluated against successive model datasets during optimization.
///
/// Most metrics measure inconsistency and are minimized; a metric measuring
/// consistency reports `maximize() == true` and the scenario layer flips the
/// optimization sense accordingly.
pub trait CalibrationMetric: Send + Sync {
    /// The registered type name of the metric, e.g. `"MSE"`.
    fn metric_name(&self) -> &str;

    /// The name of the controlled output compared by the metric.
    fn output_name(&self) -> &str;

    /// The name of the mesh indexing the output, for integrated metrics.
    fn mesh_name(&self) -> Option<&str> {
        None
    }

    /// The output name qualified with its mesh: `"y"` or `"y[mesh]"`.
    fn full_output_name(&self) -> String {
        match self.mesh_name() {
            Some(mesh) => format!("{}[{}]", self.output_name(), mesh),
            None => self.output_name().to_string(),
        }
    }

    /// The default display name: `"MSE(y)"` or `"ISE(y;mesh)"`.
    fn default_name(&self) -> String {
        match self.mesh_name() {
            Some(mesh) => format!("{}({};{})", self.metric_name(), self.output_name(), mesh),
            None => format!("{}({})", self.metric_name(), self.output_name()),
        }
    }

    /// Whether a larger metric value means a better fit.
    fn maximize(&self) -> bool {
        false
    }

    /// Bind the reference dataset the model outputs are compared with.
    fn set_reference_data(&mut self, reference: &Dataset) -> Result<(), MetricError>;

    /// Evaluate the metric against a model dataset.
    fn evaluate(&self, model: &Dataset) -> Result<f64, MetricError>;
}
