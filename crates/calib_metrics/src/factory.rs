//! Name-based construction of calibration metrics.

use std::collections::BTreeMap;

use crate::composite::CompositeMetric;
use crate::error::MetricError;
use crate::integrated::{Iae, Ise};
use crate::mean::{Mae, Mse};
use crate::metric::CalibrationMetric;
use crate::settings::CalibrationMetricSettings;

/// The family a metric belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// NaN-aware mean of a pointwise error.
    Mean,
    /// Trapezoidal integral of a pointwise error over a mesh.
    Integrated,
}

/// Builds a metric from a controlled output name and an optional mesh name.
pub type MetricBuilder =
    Box<dyn Fn(&str, Option<&str>) -> Box<dyn CalibrationMetric> + Send + Sync>;

/// Registry resolving calibration metrics by name.
///
/// The built-in metrics `"MSE"`, `"MAE"`, `"ISE"` and `"IAE"` are registered
/// by default; user-defined metrics can be added with [`register`].
///
/// [`register`]: CalibrationMetricFactory::register
///
/// # Examples
///
/// ```
/// use calib_metrics::{CalibrationMetricFactory, CalibrationMetricSettings};
///
/// let factory = CalibrationMetricFactory::new();
/// let metric = factory
///     .create(&CalibrationMetricSettings::new("z").with_metric("ISE").with_mesh("mesh"))
///     .unwrap();
/// assert_eq!(metric.default_name(), "ISE(z;mesh)");
/// ```
pub struct CalibrationMetricFactory {
    builders: BTreeMap<String, (MetricKind, MetricBuilder)>,
}

impl Default for CalibrationMetricFactory {
    fn default() -> Self {
        let mut factory = Self {
            builders: BTreeMap::new(),
        };
        factory.register("MSE", MetricKind::Mean, |output, _| {
            Box::new(Mse::new(output))
        });
        factory.register("MAE", MetricKind::Mean, |output, _| {
            Box::new(Mae::new(output))
        });
        factory.register("ISE", MetricKind::Integrated, |output, mesh| {
            Box::new(Ise::new(output, mesh.unwrap_or_default()))
        });
        factory.register("IAE", MetricKind::Integrated, |output, mesh| {
            Box::new(Iae::new(output, mesh.unwrap_or_default()))
        });
        factory
    }
}

impl CalibrationMetricFactory {
    /// Create a factory with the built-in metrics registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a metric under a name, replacing any previous registration.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        kind: MetricKind,
        builder: impl Fn(&str, Option<&str>) -> Box<dyn CalibrationMetric> + Send + Sync + 'static,
    ) {
        self.builders
            .insert(name.into(), (kind, Box::new(builder)));
    }

    /// Whether a metric is registered under this name.
    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }

    /// The names of the registered metrics, sorted.
    pub fn metric_names(&self) -> Vec<&str> {
        self.builders.keys().map(String::as_str).collect()
    }

    /// Whether the named metric integrates over a mesh.
    ///
    /// # Errors
    ///
    /// [`MetricError::UnknownMetric`] when no metric is registered under
    /// this name.
    pub fn is_integrated(&self, name: &str) -> Result<bool, MetricError> {
        let (kind, _) = self.lookup(name)?;
        Ok(*kind == MetricKind::Integrated)
    }

    /// Create the metric described by settings.
    ///
    /// # Errors
    ///
    /// - [`MetricError::UnknownMetric`] when the metric name is not
    ///   registered
    /// - [`MetricError::MeshRequired`] when an integrated metric has no mesh
    pub fn create(
        &self,
        settings: &CalibrationMetricSettings,
    ) -> Result<Box<dyn CalibrationMetric>, MetricError> {
        let (kind, builder) = self.lookup(&settings.metric_name)?;
        if *kind == MetricKind::Integrated && settings.mesh_name.is_none() {
            return Err(MetricError::MeshRequired {
                metric: settings.metric_name.clone(),
            });
        }
        Ok(builder(&settings.output_name, settings.mesh_name.as_deref()))
    }

    /// Create a weighted composite from a collection of settings.
    ///
    /// # Errors
    ///
    /// Creation errors from [`create`](Self::create) plus the weight errors
    /// of [`CompositeMetric::new`].
    pub fn create_composite(
        &self,
        collection: &[CalibrationMetricSettings],
    ) -> Result<CompositeMetric, MetricError> {
        if collection.is_empty() {
            return Err(MetricError::NoMetrics);
        }
        let mut parts = Vec::with_capacity(collection.len());
        for settings in collection {
            parts.push((self.create(settings)?, settings.weight));
        }
        CompositeMetric::new(parts)
    }

    fn lookup(&self, name: &str) -> Result<&(MetricKind, MetricBuilder), MetricError> {
        self.builders
            .get(name)
            .ok_or_else(|| MetricError::UnknownMetric {
                name: name.to_string(),
                available: self.metric_names().join(", "),
            })
    }
}

impl std::fmt::Debug for CalibrationMetricFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalibrationMetricFactory")
            .field("metric_names", &self.metric_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calib_core::types::Dataset;
    use approx::assert_relative_eq;

    #[test]
    fn test_builtins_are_registered() {
        let factory = CalibrationMetricFactory::new();
        assert_eq!(factory.metric_names(), ["IAE", "ISE", "MAE", "MSE"]);
        assert!(factory.contains("MSE"));
        assert!(!factory.contains("RMSE"));
    }

    #[test]
    fn test_is_integrated() {
        let factory = CalibrationMetricFactory::new();
        assert!(factory.is_integrated("ISE").unwrap());
        assert!(!factory.is_integrated("MAE").unwrap());
        assert!(factory.is_integrated("unknown").is_err());
    }

    #[test]
    fn test_create_mean_metric() {
        let factory = CalibrationMetricFactory::new();
        let metric = factory
            .create(&CalibrationMetricSettings::new("y").with_metric("MAE"))
            .unwrap();
        assert_eq!(metric.metric_name(), "MAE");
        assert_eq!(metric.output_name(), "y");
    }

    #[test]
    fn test_integrated_metric_requires_mesh() {
        let factory = CalibrationMetricFactory::new();
        let err = factory
            .create(&CalibrationMetricSettings::new("z").with_metric("ISE"))
            .err()
            .unwrap();
        assert!(matches!(err, MetricError::MeshRequired { .. }));
    }

    #[test]
    fn test_unknown_metric_lists_available() {
        let factory = CalibrationMetricFactory::new();
        let err = factory
            .create(&CalibrationMetricSettings::new("y").with_metric("RMSE"))
            .err()
            .unwrap();
        let message = err.to_string();
        assert!(message.contains("RMSE"));
        assert!(message.contains("MSE"));
    }

    #[test]
    fn test_register_custom_metric() {
        struct Zero(String);
        impl CalibrationMetric for Zero {
            fn metric_name(&self) -> &str {
                "ZERO"
            }
            fn output_name(&self) -> &str {
                &self.0
            }
            fn set_reference_data(&mut self, _: &Dataset) -> Result<(), MetricError> {
                Ok(())
            }
            fn evaluate(&self, _: &Dataset) -> Result<f64, MetricError> {
                Ok(0.0)
            }
        }

        let mut factory = CalibrationMetricFactory::new();
        factory.register("ZERO", MetricKind::Mean, |output, _| {
            Box::new(Zero(output.to_string()))
        });
        let metric = factory
            .create(&CalibrationMetricSettings::new("y").with_metric("ZERO"))
            .unwrap();
        assert_eq!(metric.evaluate(&Dataset::new()).unwrap(), 0.0);
    }

    #[test]
    fn test_create_composite() {
        let factory = CalibrationMetricFactory::new();
        let mut composite = factory
            .create_composite(&[
                CalibrationMetricSettings::new("y").with_weight(0.5),
                CalibrationMetricSettings::new("z")
                    .with_metric("ISE")
                    .with_mesh("mesh")
                    .with_weight(0.5),
            ])
            .unwrap();
        assert_eq!(composite.name(), "0.5*MSE[y]+0.5*ISE[z[mesh]]");

        let mut reference = Dataset::new();
        reference.add_scalar_variable("y", vec![1.0]).unwrap();
        reference
            .add_variable("mesh", vec![vec![0.0, 1.0]])
            .unwrap();
        reference.add_variable("z", vec![vec![1.0, 1.0]]).unwrap();
        composite.set_reference_data(&reference).unwrap();

        let mut model = Dataset::new();
        model.add_scalar_variable("y", vec![3.0]).unwrap();
        model.add_variable("mesh", vec![vec![0.0, 1.0]]).unwrap();
        model.add_variable("z", vec![vec![2.0, 2.0]]).unwrap();
        // 0.5 * MSE(4) + 0.5 * ISE(1).
        assert_relative_eq!(composite.evaluate(&model).unwrap(), 2.5);
    }
}
