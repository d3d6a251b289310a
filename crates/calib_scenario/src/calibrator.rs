//! Evaluation of calibration metrics over reference input samples.

use std::collections::HashMap;

use calib_core::traits::{DataMap, Discipline, DisciplineChain};
use calib_core::types::Dataset;
use calib_metrics::{CalibrationMetricFactory, CalibrationMetricSettings, CompositeMetric};
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::CalibrationError;

/// Evaluates how well a discipline chain reproduces reference data.
///
/// The calibrator runs the chain once per reference input sample, collects
/// the controlled outputs into a model dataset and evaluates one or more
/// weighted metric composites on it. The first composite, created from the
/// settings passed to [`Calibrator::new`], is the calibration objective;
/// further composites added with [`Calibrator::add_metrics`] typically back
/// constraints.
///
/// Reference data must be set with [`Calibrator::set_reference_data`] before
/// the calibrator is executed.
pub struct Calibrator {
    disciplines: DisciplineChain,
    input_names: Vec<String>,
    factory: CalibrationMetricFactory,
    composites: Vec<CompositeMetric>,
    objective_name: String,
    maximize_objective: bool,
    output_names: Vec<String>,
    reference_data: Option<Dataset>,
}

impl Calibrator {
    /// Create a calibrator with the default metric factory.
    ///
    /// The metric collection defines the calibration objective.
    ///
    /// # Errors
    ///
    /// Metric creation errors, including unknown metric names and invalid
    /// weights.
    pub fn new(
        disciplines: Vec<Box<dyn Discipline>>,
        input_names: Vec<String>,
        metrics: &[CalibrationMetricSettings],
    ) -> Result<Self, CalibrationError> {
        Self::with_factory(
            disciplines,
            input_names,
            metrics,
            CalibrationMetricFactory::new(),
        )
    }

    /// Create a calibrator resolving metric names through a given factory.
    pub fn with_factory(
        disciplines: Vec<Box<dyn Discipline>>,
        input_names: Vec<String>,
        metrics: &[CalibrationMetricSettings],
        factory: CalibrationMetricFactory,
    ) -> Result<Self, CalibrationError> {
        let mut calibrator = Self {
            disciplines: DisciplineChain::new(disciplines),
            input_names,
            factory,
            composites: Vec::new(),
            objective_name: String::new(),
            maximize_objective: false,
            output_names: Vec::new(),
            reference_data: None,
        };
        let (name, _) = calibrator.add_metrics(metrics)?;
        calibrator.maximize_objective = calibrator.composites[0].maximize();
        calibrator.objective_name = name;
        Ok(calibrator)
    }

    /// Combine metric settings into a composite and register it.
    ///
    /// Returns the name of the composite and the model variables it reads.
    ///
    /// # Errors
    ///
    /// Metric creation and weight errors, plus reference data errors when
    /// reference data was already set.
    pub fn add_metrics(
        &mut self,
        metrics: &[CalibrationMetricSettings],
    ) -> Result<(String, Vec<String>), CalibrationError> {
        let mut composite = self.factory.create_composite(metrics)?;
        if let Some(reference) = &self.reference_data {
            composite.set_reference_data(reference)?;
        }
        let name = composite.name().to_string();
        let outputs = composite.output_names().to_vec();
        for output in &outputs {
            if !self.output_names.contains(output) {
                self.output_names.push(output.clone());
            }
        }
        debug!(metric = %name, "registered calibration metric");
        self.composites.push(composite);
        Ok((name, outputs))
    }

    /// The factory resolving metric names, for registering custom metrics.
    ///
    /// Register custom metrics before creating the composites that use them.
    pub fn metric_factory_mut(&mut self) -> &mut CalibrationMetricFactory {
        &mut self.factory
    }

    /// The name of the calibration objective.
    pub fn objective_name(&self) -> &str {
        &self.objective_name
    }

    /// Whether a larger objective value means a better fit.
    pub fn maximize_objective(&self) -> bool {
        self.maximize_objective
    }

    /// The names of the registered composites, in registration order.
    pub fn metric_names(&self) -> Vec<&str> {
        self.composites.iter().map(CompositeMetric::name).collect()
    }

    /// The reference data, when set.
    pub fn reference_data(&self) -> Option<&Dataset> {
        self.reference_data.as_ref()
    }

    /// Store the reference data and pass it to every composite.
    ///
    /// # Errors
    ///
    /// - [`CalibrationError::EmptyReferenceData`] when the dataset holds no
    ///   sample
    /// - [`CalibrationError::MissingReferenceVariable`] when a calibration
    ///   input is absent from the dataset
    /// - Metric errors when a composite reads a missing output
    pub fn set_reference_data(&mut self, reference: Dataset) -> Result<(), CalibrationError> {
        if reference.n_samples() == 0 {
            return Err(CalibrationError::EmptyReferenceData);
        }
        for name in &self.input_names {
            if !reference.contains(name) {
                return Err(CalibrationError::missing_reference_variable(name.clone()));
            }
        }
        for composite in &mut self.composites {
            composite.set_reference_data(&reference)?;
        }
        info!(
            samples = reference.n_samples(),
            "reference data set on calibrator"
        );
        self.reference_data = Some(reference);
        Ok(())
    }

    /// Evaluate every registered composite at given parameter values.
    ///
    /// Returns a map from composite name to value.
    ///
    /// # Errors
    ///
    /// [`CalibrationError::ReferenceDataNotSet`] when no reference data was
    /// set, plus discipline and metric evaluation errors.
    pub fn execute(
        &self,
        parameters: &DataMap,
    ) -> Result<HashMap<String, f64>, CalibrationError> {
        let model = self.compute_model_data(parameters)?;
        let mut values = HashMap::with_capacity(self.composites.len());
        for composite in &self.composites {
            let value = composite.evaluate(&model)?;
            debug!(metric = %composite.name(), value, "evaluated calibration metric");
            values.insert(composite.name().to_string(), value);
        }
        Ok(values)
    }

    /// Run the chain over the reference input samples at given parameters.
    ///
    /// The returned dataset holds the calibration inputs alongside every
    /// model output a composite reads.
    pub fn compute_model_data(&self, parameters: &DataMap) -> Result<Dataset, CalibrationError> {
        let reference = self
            .reference_data
            .as_ref()
            .ok_or(CalibrationError::ReferenceDataNotSet)?;
        let sample_outputs = self.run_samples(parameters, reference)?;

        let mut model = Dataset::new();
        for name in &self.input_names {
            model.add_variable(name.clone(), reference.get(name)?.to_vec())?;
        }
        for name in &self.output_names {
            let mut rows = Vec::with_capacity(sample_outputs.len());
            for outputs in &sample_outputs {
                let row = outputs.get(name).ok_or_else(|| {
                    CalibrationError::missing_model_output(name.clone(), self.disciplines.name())
                })?;
                rows.push(row.clone());
            }
            model.add_variable(name.clone(), rows)?;
        }
        Ok(model)
    }

    fn run_samples(
        &self,
        parameters: &DataMap,
        reference: &Dataset,
    ) -> Result<Vec<DataMap>, CalibrationError> {
        let indices: Vec<usize> = (0..reference.n_samples()).collect();
        #[cfg(feature = "parallel")]
        {
            indices
                .par_iter()
                .map(|&i| self.run_sample(parameters, reference, i))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            indices
                .iter()
                .map(|&i| self.run_sample(parameters, reference, i))
                .collect()
        }
    }

    fn run_sample(
        &self,
        parameters: &DataMap,
        reference: &Dataset,
        sample: usize,
    ) -> Result<DataMap, CalibrationError> {
        let mut inputs = parameters.clone();
        for name in &self.input_names {
            inputs.insert(name.clone(), reference.get_sample(name, sample)?.to_vec());
        }
        Ok(self.disciplines.execute(&inputs)?)
    }
}
