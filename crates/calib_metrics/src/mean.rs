//! Mean metrics: NaN-aware mean of a pointwise error.

use calib_core::math::nanmean;
use calib_core::types::Dataset;

use crate::error::MetricError;
use crate::metric::CalibrationMetric;

/// Shared state and evaluation for mean metrics.
///
/// Holds the reference rows of the controlled output and computes the
/// NaN-skipping mean of `compare(reference, model)` over every sample and
/// component. A NaN in either operand drops the pair from the mean, so
/// missing observations in the reference or model data are tolerated.
#[derive(Debug, Clone, Default)]
struct MeanAggregator {
    output_name: String,
    reference: Option<Vec<Vec<f64>>>,
}

impl MeanAggregator {
    fn new(output_name: impl Into<String>) -> Self {
        Self {
            output_name: output_name.into(),
            reference: None,
        }
    }

    fn set_reference_data(&mut self, reference: &Dataset) -> Result<(), MetricError> {
        self.reference = Some(reference.get(&self.output_name)?.to_vec());
        Ok(())
    }

    fn evaluate(
        &self,
        model: &Dataset,
        metric: &str,
        compare: fn(f64, f64) -> f64,
    ) -> Result<f64, MetricError> {
        let reference = self
            .reference
            .as_ref()
            .ok_or_else(|| MetricError::ReferenceDataNotSet {
                metric: format!("{}({})", metric, self.output_name),
            })?;
        let model_rows = model.get(&self.output_name)?;
        if model_rows.len() != reference.len() {
            return Err(MetricError::ShapeMismatch {
                output: self.output_name.clone(),
            });
        }
        let mut errors = Vec::new();
        for (ref_row, model_row) in reference.iter().zip(model_rows) {
            if ref_row.len() != model_row.len() {
                return Err(MetricError::ShapeMismatch {
                    output: self.output_name.clone(),
                });
            }
            errors.extend(ref_row.iter().zip(model_row).map(|(&r, &m)| compare(r, m)));
        }
        Ok(nanmean(errors.into_iter()))
    }
}

/// Mean squared error between the model and reference output data.
#[derive(Debug, Clone)]
pub struct Mse {
    inner: MeanAggregator,
}

impl Mse {
    /// Create the metric for a controlled output.
    pub fn new(output_name: impl Into<String>) -> Self {
        Self {
            inner: MeanAggregator::new(output_name),
        }
    }
}

impl CalibrationMetric for Mse {
    fn metric_name(&self) -> &str {
        "MSE"
    }

    fn output_name(&self) -> &str {
        &self.inner.output_name
    }

    fn set_reference_data(&mut self, reference: &Dataset) -> Result<(), MetricError> {
        self.inner.set_reference_data(reference)
    }

    fn evaluate(&self, model: &Dataset) -> Result<f64, MetricError> {
        self.inner
            .evaluate(model, "MSE", |r, m| (r - m) * (r - m))
    }
}

/// Mean absolute error between the model and reference output data.
#[derive(Debug, Clone)]
pub struct Mae {
    inner: MeanAggregator,
}

impl Mae {
    /// Create the metric for a controlled output.
    pub fn new(output_name: impl Into<String>) -> Self {
        Self {
            inner: MeanAggregator::new(output_name),
        }
    }
}

impl CalibrationMetric for Mae {
    fn metric_name(&self) -> &str {
        "MAE"
    }

    fn output_name(&self) -> &str {
        &self.inner.output_name
    }

    fn set_reference_data(&mut self, reference: &Dataset) -> Result<(), MetricError> {
        self.inner.set_reference_data(reference)
    }

    fn evaluate(&self, model: &Dataset) -> Result<f64, MetricError> {
        self.inner.evaluate(model, "MAE", |r, m| (r - m).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference() -> Dataset {
        let mut data = Dataset::new();
        data.add_scalar_variable("y", vec![1.0, 2.0]).unwrap();
        data
    }

    fn model() -> Dataset {
        let mut data = Dataset::new();
        data.add_scalar_variable("y", vec![3.0, 4.0]).unwrap();
        data
    }

    #[test]
    fn test_mse_value() {
        let mut metric = Mse::new("y");
        metric.set_reference_data(&reference()).unwrap();
        assert_relative_eq!(metric.evaluate(&model()).unwrap(), 4.0);
    }

    #[test]
    fn test_mae_value() {
        let mut metric = Mae::new("y");
        metric.set_reference_data(&reference()).unwrap();
        assert_relative_eq!(metric.evaluate(&model()).unwrap(), 2.0);
    }

    #[test]
    fn test_perfect_fit_is_zero() {
        let mut metric = Mse::new("y");
        metric.set_reference_data(&reference()).unwrap();
        assert_eq!(metric.evaluate(&reference()).unwrap(), 0.0);
    }

    #[test]
    fn test_names() {
        let metric = Mse::new("y");
        assert_eq!(metric.metric_name(), "MSE");
        assert_eq!(metric.full_output_name(), "y");
        assert_eq!(metric.default_name(), "MSE(y)");
        assert!(!metric.maximize());
    }

    #[test]
    fn test_missing_reference_data() {
        let metric = Mse::new("y");
        let err = metric.evaluate(&model()).unwrap_err();
        assert!(matches!(err, MetricError::ReferenceDataNotSet { .. }));
    }

    #[test]
    fn test_nan_entries_are_skipped() {
        let mut reference = Dataset::new();
        reference
            .add_scalar_variable("y", vec![1.0, 2.0, 2.0, f64::NAN])
            .unwrap();
        let mut model = Dataset::new();
        model
            .add_scalar_variable("y", vec![3.0, 4.0, f64::NAN, 4.0])
            .unwrap();

        let mut metric = Mae::new("y");
        metric.set_reference_data(&reference).unwrap();
        // Only the first two pairs are finite: (2 + 2) / 2.
        assert_relative_eq!(metric.evaluate(&model).unwrap(), 2.0);
    }

    #[test]
    fn test_sample_count_mismatch() {
        let mut metric = Mse::new("y");
        metric.set_reference_data(&reference()).unwrap();
        let mut model = Dataset::new();
        model.add_scalar_variable("y", vec![1.0]).unwrap();
        assert!(matches!(
            metric.evaluate(&model).unwrap_err(),
            MetricError::ShapeMismatch { .. }
        ));
    }
}
