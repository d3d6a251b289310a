//! Integrated metrics: trapezoidal integral of a pointwise error over a mesh.

use calib_core::math::{ensure_ascending, interpolate_onto, nanmean, trapezoid};
use calib_core::types::Dataset;

use crate::error::MetricError;
use crate::metric::CalibrationMetric;

/// Shared state and evaluation for integrated metrics.
///
/// The reference and model data each carry an output variable and a mesh
/// variable. Per sample, the model output is interpolated onto the reference
/// mesh, the pointwise error is integrated with the trapezoid rule and the
/// results are averaged over the samples. Decreasing meshes are reversed
/// before interpolation; extrapolating outside the model mesh is an error.
#[derive(Debug, Clone, Default)]
struct IntegratedAggregator {
    output_name: String,
    mesh_name: String,
    reference_mesh: Option<Vec<Vec<f64>>>,
    reference_output: Option<Vec<Vec<f64>>>,
}

impl IntegratedAggregator {
    fn new(output_name: impl Into<String>, mesh_name: impl Into<String>) -> Self {
        Self {
            output_name: output_name.into(),
            mesh_name: mesh_name.into(),
            reference_mesh: None,
            reference_output: None,
        }
    }

    fn set_reference_data(&mut self, reference: &Dataset) -> Result<(), MetricError> {
        let mesh = reference.get(&self.mesh_name)?.to_vec();
        let output = reference.get(&self.output_name)?.to_vec();
        self.reference_mesh = Some(mesh);
        self.reference_output = Some(output);
        Ok(())
    }

    fn evaluate(
        &self,
        model: &Dataset,
        metric: &str,
        compare: fn(f64, f64) -> f64,
    ) -> Result<f64, MetricError> {
        let (reference_mesh, reference_output) = self
            .reference_mesh
            .as_ref()
            .zip(self.reference_output.as_ref())
            .ok_or_else(|| MetricError::ReferenceDataNotSet {
                metric: format!("{}({};{})", metric, self.output_name, self.mesh_name),
            })?;
        let model_mesh = model.get(&self.mesh_name)?;
        let model_output = model.get(&self.output_name)?;
        if model_mesh.len() != reference_mesh.len()
            || model_output.len() != reference_output.len()
        {
            return Err(MetricError::ShapeMismatch {
                output: self.output_name.clone(),
            });
        }

        let mut integrals = Vec::with_capacity(reference_mesh.len());
        for i in 0..reference_mesh.len() {
            let (ref_mesh, ref_out) = ensure_ascending(&reference_mesh[i], &reference_output[i])?;
            let (mod_mesh, mod_out) = ensure_ascending(&model_mesh[i], &model_output[i])?;
            let interpolated = interpolate_onto(&mod_mesh, &mod_out, &ref_mesh)?;
            let errors: Vec<f64> = ref_out
                .iter()
                .zip(&interpolated)
                .map(|(&r, &m)| compare(r, m))
                .collect();
            integrals.push(trapezoid(&errors, &ref_mesh));
        }
        Ok(nanmean(integrals.into_iter()))
    }
}

/// Integrated squared error of a model output interpolated onto a mesh.
#[derive(Debug, Clone)]
pub struct Ise {
    inner: IntegratedAggregator,
}

impl Ise {
    /// Create the metric for a controlled output and its mesh.
    pub fn new(output_name: impl Into<String>, mesh_name: impl Into<String>) -> Self {
        Self {
            inner: IntegratedAggregator::new(output_name, mesh_name),
        }
    }
}

impl CalibrationMetric for Ise {
    fn metric_name(&self) -> &str {
        "ISE"
    }

    fn output_name(&self) -> &str {
        &self.inner.output_name
    }

    fn mesh_name(&self) -> Option<&str> {
        Some(&self.inner.mesh_name)
    }

    fn set_reference_data(&mut self, reference: &Dataset) -> Result<(), MetricError> {
        self.inner.set_reference_data(reference)
    }

    fn evaluate(&self, model: &Dataset) -> Result<f64, MetricError> {
        self.inner
            .evaluate(model, "ISE", |r, m| (r - m) * (r - m))
    }
}

/// Integrated absolute error of a model output interpolated onto a mesh.
#[derive(Debug, Clone)]
pub struct Iae {
    inner: IntegratedAggregator,
}

impl Iae {
    /// Create the metric for a controlled output and its mesh.
    pub fn new(output_name: impl Into<String>, mesh_name: impl Into<String>) -> Self {
        Self {
            inner: IntegratedAggregator::new(output_name, mesh_name),
        }
    }
}

impl CalibrationMetric for Iae {
    fn metric_name(&self) -> &str {
        "IAE"
    }

    fn output_name(&self) -> &str {
        &self.inner.output_name
    }

    fn mesh_name(&self) -> Option<&str> {
        Some(&self.inner.mesh_name)
    }

    fn set_reference_data(&mut self, reference: &Dataset) -> Result<(), MetricError> {
        self.inner.set_reference_data(reference)
    }

    fn evaluate(&self, model: &Dataset) -> Result<f64, MetricError> {
        self.inner.evaluate(model, "IAE", |r, m| (r - m).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn with_mesh(mesh: Vec<f64>, values: Vec<f64>) -> Dataset {
        let mut data = Dataset::new();
        data.add_variable("mesh", vec![mesh]).unwrap();
        data.add_variable("z", vec![values]).unwrap();
        data
    }

    #[test]
    fn test_iae_single_sample() {
        let reference = with_mesh(vec![0.0, 1.0, 3.0], vec![2.0, 3.0, 4.0]);
        let model = with_mesh(vec![0.0, 1.0, 3.0], vec![3.0, 5.0, 7.0]);

        let mut metric = Iae::new("z", "mesh");
        metric.set_reference_data(&reference).unwrap();
        // Errors are [1, 2, 3]: trapezoid over [0, 1, 3] gives 6.5.
        assert_relative_eq!(metric.evaluate(&model).unwrap(), 6.5);
    }

    #[test]
    fn test_iae_decreasing_mesh_is_flipped() {
        let reference = with_mesh(vec![3.0, 1.0, 0.0], vec![4.0, 3.0, 2.0]);
        let model = with_mesh(vec![0.0, 1.0, 3.0], vec![3.0, 5.0, 7.0]);

        let mut metric = Iae::new("z", "mesh");
        metric.set_reference_data(&reference).unwrap();
        assert_relative_eq!(metric.evaluate(&model).unwrap(), 6.5);
    }

    #[test]
    fn test_ise_with_interpolation() {
        // The model mesh is finer than the reference one; its values lie on
        // the straight line 2x + 1, so interpolation onto the reference mesh
        // is exact.
        let reference = with_mesh(vec![0.0, 1.0, 2.0], vec![0.0, 2.0, 4.0]);
        let model = with_mesh(
            vec![0.0, 0.5, 1.0, 1.5, 2.0],
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
        );

        let mut metric = Ise::new("z", "mesh");
        metric.set_reference_data(&reference).unwrap();
        // Pointwise squared error is 1 everywhere: the integral over [0, 2]
        // is 2.
        assert_relative_eq!(metric.evaluate(&model).unwrap(), 2.0);
    }

    #[test]
    fn test_mean_over_samples() {
        let mut reference = Dataset::new();
        reference
            .add_variable("mesh", vec![vec![0.0, 1.0, 3.0], vec![0.0, 2.0, 4.0]])
            .unwrap();
        reference
            .add_variable("z", vec![vec![2.0, 3.0, 4.0], vec![1.0, 1.0, 1.0]])
            .unwrap();
        let mut model = Dataset::new();
        model
            .add_variable("mesh", vec![vec![0.0, 1.0, 3.0], vec![0.0, 2.0, 4.0]])
            .unwrap();
        model
            .add_variable("z", vec![vec![3.0, 5.0, 7.0], vec![2.0, 2.0, 2.0]])
            .unwrap();

        let mut metric = Iae::new("z", "mesh");
        metric.set_reference_data(&reference).unwrap();
        // Sample integrals are 6.5 and 4.0: the mean is 5.25.
        assert_relative_eq!(metric.evaluate(&model).unwrap(), 5.25);
    }

    #[test]
    fn test_extrapolation_is_rejected() {
        let reference = with_mesh(vec![0.0, 1.0, 3.0], vec![2.0, 3.0, 4.0]);
        let model = with_mesh(vec![0.0, 1.0, 2.0], vec![3.0, 5.0, 7.0]);

        let mut metric = Ise::new("z", "mesh");
        metric.set_reference_data(&reference).unwrap();
        assert!(matches!(
            metric.evaluate(&model).unwrap_err(),
            MetricError::Interpolation(_)
        ));
    }

    #[test]
    fn test_names() {
        let metric = Ise::new("z", "mesh");
        assert_eq!(metric.metric_name(), "ISE");
        assert_eq!(metric.full_output_name(), "z[mesh]");
        assert_eq!(metric.default_name(), "ISE(z;mesh)");
    }

    #[test]
    fn test_missing_reference_data() {
        let metric = Iae::new("z", "mesh");
        let model = with_mesh(vec![0.0, 1.0], vec![1.0, 1.0]);
        assert!(matches!(
            metric.evaluate(&model).unwrap_err(),
            MetricError::ReferenceDataNotSet { .. }
        ));
    }
}
