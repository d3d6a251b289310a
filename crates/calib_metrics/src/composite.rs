//! Weighted combination of calibration metrics.

use calib_core::types::Dataset;

use crate::error::MetricError;
use crate::metric::CalibrationMetric;

/// A weighted sum of calibration metrics acting as a single criterion.
///
/// The sense of the composite is the sense of its first metric. A term whose
/// own sense disagrees with the composite enters the sum with a negated
/// weight, so that improving any term improves the composite.
///
/// The display name spells out the combination, for instance
/// `"0.5*MSE[y]+0.5*ISE[z[mesh]]"`. A single metric with weight 1 keeps the
/// plain form `"MSE[y]"`.
pub struct CompositeMetric {
    name: String,
    maximize: bool,
    output_names: Vec<String>,
    terms: Vec<(f64, Box<dyn CalibrationMetric>)>,
}

impl CompositeMetric {
    /// Combine metrics with optional weights into a single criterion.
    ///
    /// Explicit weights must lie strictly between 0 and 1 and the weights
    /// must sum to 1. Metrics without an explicit weight share the remainder
    /// equally.
    ///
    /// # Errors
    ///
    /// - [`MetricError::NoMetrics`] when `parts` is empty
    /// - [`MetricError::InvalidWeight`] when an explicit weight is outside
    ///   the open interval (0, 1)
    /// - [`MetricError::InvalidWeightSum`] when the weights cannot sum to 1
    pub fn new(
        parts: Vec<(Box<dyn CalibrationMetric>, Option<f64>)>,
    ) -> Result<Self, MetricError> {
        let weights = resolve_weights(&parts.iter().map(|(_, w)| *w).collect::<Vec<_>>())?;
        let maximize = parts[0].0.maximize();

        let mut name = String::new();
        let mut output_names = Vec::new();
        let mut terms = Vec::with_capacity(parts.len());
        for (index, ((metric, _), weight)) in parts.into_iter().zip(weights).enumerate() {
            let signed = if metric.maximize() == maximize {
                weight
            } else {
                -weight
            };
            if index == 0 {
                if weight == 1.0 {
                    name.push_str(&format!(
                        "{}[{}]",
                        metric.metric_name(),
                        metric.full_output_name()
                    ));
                } else {
                    name.push_str(&format!(
                        "{}*{}[{}]",
                        weight,
                        metric.metric_name(),
                        metric.full_output_name()
                    ));
                }
            } else {
                if signed >= 0.0 {
                    name.push('+');
                }
                name.push_str(&format!(
                    "{}*{}[{}]",
                    signed,
                    metric.metric_name(),
                    metric.full_output_name()
                ));
            }
            let output = metric.output_name().to_string();
            if !output_names.contains(&output) {
                output_names.push(output);
            }
            if let Some(mesh) = metric.mesh_name() {
                let mesh = mesh.to_string();
                if !output_names.contains(&mesh) {
                    output_names.push(mesh);
                }
            }
            terms.push((signed, metric));
        }

        Ok(Self {
            name,
            maximize,
            output_names,
            terms,
        })
    }

    /// The display name of the composite.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a larger composite value means a better fit.
    pub fn maximize(&self) -> bool {
        self.maximize
    }

    /// The model variables the composite reads, without duplicates.
    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }

    /// Store the reference data in every term.
    pub fn set_reference_data(&mut self, reference: &Dataset) -> Result<(), MetricError> {
        for (_, metric) in &mut self.terms {
            metric.set_reference_data(reference)?;
        }
        Ok(())
    }

    /// Evaluate the weighted sum on model data.
    pub fn evaluate(&self, model: &Dataset) -> Result<f64, MetricError> {
        let mut total = 0.0;
        for (weight, metric) in &self.terms {
            total += weight * metric.evaluate(model)?;
        }
        Ok(total)
    }
}

impl std::fmt::Debug for CompositeMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeMetric")
            .field("name", &self.name)
            .field("maximize", &self.maximize)
            .field("output_names", &self.output_names)
            .finish()
    }
}

/// Resolve optional weights into effective weights summing to 1.
///
/// Explicit weights must lie strictly between 0 and 1; unset weights share
/// the remainder equally.
pub fn resolve_weights(weights: &[Option<f64>]) -> Result<Vec<f64>, MetricError> {
    if weights.is_empty() {
        return Err(MetricError::NoMetrics);
    }

    let mut total = 0.0;
    let mut missing = 0usize;
    for weight in weights {
        match weight {
            Some(w) => {
                if !(*w > 0.0 && *w < 1.0) {
                    return Err(MetricError::InvalidWeight { weight: *w });
                }
                total += w;
            }
            None => missing += 1,
        }
    }

    if missing == 0 {
        if (total - 1.0).abs() > 1e-9 {
            return Err(MetricError::InvalidWeightSum { total });
        }
        return Ok(weights.iter().map(|w| w.unwrap_or(0.0)).collect());
    }
    if total >= 1.0 {
        return Err(MetricError::InvalidWeightSum { total });
    }

    let share = (1.0 - total) / missing as f64;
    Ok(weights.iter().map(|w| w.unwrap_or(share)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrated::Ise;
    use crate::mean::{Mae, Mse};
    use approx::assert_relative_eq;

    fn boxed(metric: impl CalibrationMetric + 'static) -> Box<dyn CalibrationMetric> {
        Box::new(metric)
    }

    #[test]
    fn test_resolve_explicit_weights() {
        let weights = resolve_weights(&[Some(0.3), Some(0.7)]).unwrap();
        assert_eq!(weights, vec![0.3, 0.7]);
    }

    #[test]
    fn test_resolve_shares_remainder() {
        let weights = resolve_weights(&[Some(0.5), None, None]).unwrap();
        assert_relative_eq!(weights[1], 0.25);
        assert_relative_eq!(weights[2], 0.25);
    }

    #[test]
    fn test_resolve_single_missing_weight_is_one() {
        assert_eq!(resolve_weights(&[None]).unwrap(), vec![1.0]);
    }

    #[test]
    fn test_resolve_rejects_bad_weight() {
        assert!(matches!(
            resolve_weights(&[Some(1.5), None]).unwrap_err(),
            MetricError::InvalidWeight { .. }
        ));
        assert!(matches!(
            resolve_weights(&[Some(0.0), None]).unwrap_err(),
            MetricError::InvalidWeight { .. }
        ));
    }

    #[test]
    fn test_resolve_rejects_bad_sum() {
        assert!(matches!(
            resolve_weights(&[Some(0.3), Some(0.3)]).unwrap_err(),
            MetricError::InvalidWeightSum { .. }
        ));
        assert!(matches!(
            resolve_weights(&[Some(0.6), Some(0.6), None]).unwrap_err(),
            MetricError::InvalidWeightSum { .. }
        ));
    }

    #[test]
    fn test_resolve_rejects_empty() {
        assert!(matches!(
            resolve_weights(&[]).unwrap_err(),
            MetricError::NoMetrics
        ));
    }

    #[test]
    fn test_single_metric_name() {
        let composite = CompositeMetric::new(vec![(boxed(Mse::new("y")), None)]).unwrap();
        assert_eq!(composite.name(), "MSE[y]");
        assert!(!composite.maximize());
        assert_eq!(composite.output_names(), ["y".to_string()]);
    }

    #[test]
    fn test_weighted_name_with_mesh() {
        let composite = CompositeMetric::new(vec![
            (boxed(Mse::new("y")), Some(0.5)),
            (boxed(Ise::new("z", "mesh")), Some(0.5)),
        ])
        .unwrap();
        assert_eq!(composite.name(), "0.5*MSE[y]+0.5*ISE[z[mesh]]");
        assert_eq!(
            composite.output_names(),
            ["y".to_string(), "z".to_string(), "mesh".to_string()]
        );
    }

    #[test]
    fn test_evaluate_weighted_sum() {
        let mut reference = Dataset::new();
        reference.add_scalar_variable("y", vec![1.0, 2.0]).unwrap();
        let mut model = Dataset::new();
        model.add_scalar_variable("y", vec![3.0, 4.0]).unwrap();

        let mut composite = CompositeMetric::new(vec![
            (boxed(Mse::new("y")), Some(0.5)),
            (boxed(Mae::new("y")), Some(0.5)),
        ])
        .unwrap();
        composite.set_reference_data(&reference).unwrap();
        // 0.5 * 4 + 0.5 * 2.
        assert_relative_eq!(composite.evaluate(&model).unwrap(), 3.0);
    }

    #[test]
    fn test_opposite_sense_negates_weight() {
        struct Gain(Mse);
        impl CalibrationMetric for Gain {
            fn metric_name(&self) -> &str {
                "GAIN"
            }
            fn output_name(&self) -> &str {
                self.0.output_name()
            }
            fn maximize(&self) -> bool {
                true
            }
            fn set_reference_data(&mut self, reference: &Dataset) -> Result<(), MetricError> {
                self.0.set_reference_data(reference)
            }
            fn evaluate(&self, model: &Dataset) -> Result<f64, MetricError> {
                self.0.evaluate(model)
            }
        }

        let composite = CompositeMetric::new(vec![
            (boxed(Mse::new("y")), Some(0.7)),
            (boxed(Gain(Mse::new("y"))), Some(0.3)),
        ])
        .unwrap();
        assert_eq!(composite.name(), "0.7*MSE[y]-0.3*GAIN[y]");
        assert!(!composite.maximize());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(500))]

            // With at least one unset weight, the resolved weights keep the
            // explicit values and sum to one.
            #[test]
            fn test_resolved_weights_sum_to_one(
                explicit in prop::collection::vec(prop::option::of(0.01f64..0.15), 1..6)
            ) {
                let mut weights = explicit;
                weights.push(None);
                let resolved = resolve_weights(&weights).unwrap();
                let total: f64 = resolved.iter().sum();
                prop_assert!((total - 1.0).abs() < 1e-9);
                for (given, got) in weights.iter().zip(&resolved) {
                    if let Some(w) = given {
                        prop_assert_eq!(w, got);
                    } else {
                        prop_assert!(*got > 0.0);
                    }
                }
            }
        }
    }
}
