//! Declarative settings of a calibration metric.

use serde::{Deserialize, Serialize};

/// The settings of one calibration metric within a collection.
///
/// Settings are the serialisable description handed to the factory and the
/// calibration scenario. The weight only matters when the metric is one term
/// of a composite: it must lie strictly between 0 and 1 and the weights of a
/// collection must sum to 1. Metrics whose weight is left unset share the
/// remainder equally.
///
/// # Examples
///
/// ```
/// use calib_metrics::CalibrationMetricSettings;
///
/// let settings = CalibrationMetricSettings::new("z")
///     .with_metric("ISE")
///     .with_mesh("z_mesh")
///     .with_weight(0.3);
/// assert_eq!(settings.metric_name, "ISE");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationMetricSettings {
    /// The name of the controlled output.
    pub output_name: String,
    /// The name of the metric comparing the observed and simulated outputs.
    #[serde(default = "default_metric_name")]
    pub metric_name: String,
    /// The name of the mesh over which the output is discretised, if any.
    #[serde(default)]
    pub mesh_name: Option<String>,
    /// The weight of this metric within a collection of metrics.
    #[serde(default)]
    pub weight: Option<f64>,
}

fn default_metric_name() -> String {
    "MSE".to_string()
}

impl CalibrationMetricSettings {
    /// Create settings for an output, comparing it with the default metric.
    pub fn new(output_name: impl Into<String>) -> Self {
        Self {
            output_name: output_name.into(),
            metric_name: default_metric_name(),
            mesh_name: None,
            weight: None,
        }
    }

    /// Select the metric by name.
    pub fn with_metric(mut self, metric_name: impl Into<String>) -> Self {
        self.metric_name = metric_name.into();
        self
    }

    /// Attach the mesh over which the output is discretised.
    pub fn with_mesh(mut self, mesh_name: impl Into<String>) -> Self {
        self.mesh_name = Some(mesh_name.into());
        self
    }

    /// Set the weight of the metric within a collection.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// The names of the variables the metric reads from the model data.
    pub fn variable_names(&self) -> Vec<String> {
        match &self.mesh_name {
            Some(mesh) => vec![self.output_name.clone(), mesh.clone()],
            None => vec![self.output_name.clone()],
        }
    }
}
