//! End-to-end calibration of discipline parameters.

use std::cell::RefCell;
use std::collections::HashMap;

use calib_core::traits::{
    ConstraintFunction, ConstraintKind, Discipline, DriverSettings, EvaluationRecord,
    OptimizationDriver, OptimizationProblem,
};
use calib_core::types::{Dataset, DriverError, ParameterSpace};
use calib_metrics::CalibrationMetricSettings;
use tracing::info;

use crate::calibrator::Calibrator;
use crate::error::CalibrationError;

/// A constraint declared from a metric composite.
struct ConstraintSpec {
    name: String,
    kind: ConstraintKind,
    value: f64,
    positive: bool,
}

/// The outcome of a calibration run.
#[derive(Debug, Clone)]
pub struct CalibrationResult {
    /// The calibrated parameter values.
    pub parameters: HashMap<String, Vec<f64>>,
    /// The name of the calibration objective.
    pub objective_name: String,
    /// The objective at the calibrated parameters, in its natural sense.
    pub objective: f64,
    /// The number of model evaluations performed.
    pub n_evaluations: usize,
    /// The evaluation history of the driver.
    pub history: Vec<EvaluationRecord>,
}

impl std::fmt::Display for CalibrationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CalibrationResult {{ {}: {:.6e}, evaluations: {} }}",
            self.objective_name, self.objective, self.n_evaluations
        )
    }
}

/// Calibrates the parameters of a discipline chain from reference data.
///
/// Set from parameter values, the chain computes output data from input
/// data. The scenario drives an [`OptimizationDriver`] so that the model
/// outputs get close to the reference outputs in the sense of the objective
/// metric; further metrics can bound the search through constraints.
///
/// The current values of the calibration space are the prior; the
/// calibrated values become the posterior, available together with the
/// model data before and after calibration once [`execute`] has run.
///
/// [`execute`]: CalibrationScenario::execute
///
/// # Examples
///
/// ```no_run
/// use calib_core::types::{Dataset, ParameterSpace};
/// use calib_core::traits::DriverSettings;
/// use calib_metrics::CalibrationMetricSettings;
/// use calib_scenario::{CalibrationScenario, FullFactorialDriver};
/// # fn model() -> Vec<Box<dyn calib_core::traits::Discipline>> { vec![] }
/// # fn reference() -> Dataset { Dataset::new() }
///
/// let mut space = ParameterSpace::new();
/// space.add_variable("a", 0.0, 10.0, 5.0)?;
///
/// let mut scenario = CalibrationScenario::new(
///     model(),
///     vec!["x".to_string()],
///     &[CalibrationMetricSettings::new("y")],
///     space,
/// )?;
/// let result = scenario.execute(
///     &FullFactorialDriver::new(11),
///     reference(),
///     &DriverSettings::default(),
/// )?;
/// println!("{result}");
/// # Ok::<(), calib_scenario::CalibrationError>(())
/// ```
pub struct CalibrationScenario {
    calibrator: Calibrator,
    calibration_space: ParameterSpace,
    prior_parameters: HashMap<String, Vec<f64>>,
    posterior_parameters: Option<HashMap<String, Vec<f64>>>,
    prior_model_data: Option<Dataset>,
    posterior_model_data: Option<Dataset>,
    constraints: Vec<ConstraintSpec>,
}

impl CalibrationScenario {
    /// Create a scenario from a model, its calibration inputs, the metric
    /// collection defining the objective and the space of the parameters.
    ///
    /// # Errors
    ///
    /// Metric creation errors, including unknown metric names and invalid
    /// weights.
    pub fn new(
        disciplines: Vec<Box<dyn Discipline>>,
        input_names: Vec<String>,
        metrics: &[CalibrationMetricSettings],
        calibration_space: ParameterSpace,
    ) -> Result<Self, CalibrationError> {
        let calibrator = Calibrator::new(disciplines, input_names, metrics)?;
        let prior_parameters = calibration_space.current_values_as_map();
        Ok(Self {
            calibrator,
            calibration_space,
            prior_parameters,
            posterior_parameters: None,
            prior_model_data: None,
            posterior_model_data: None,
            constraints: Vec::new(),
        })
    }

    /// Define a constraint from a metric collection.
    ///
    /// The constraint keeps the metric value at `value` (equality) or on one
    /// side of it (inequality; above when `positive`). Returns the name of
    /// the constrained composite.
    ///
    /// # Errors
    ///
    /// Metric creation and weight errors.
    pub fn add_constraint(
        &mut self,
        metrics: &[CalibrationMetricSettings],
        kind: ConstraintKind,
        value: f64,
        positive: bool,
    ) -> Result<String, CalibrationError> {
        let (name, _) = self.calibrator.add_metrics(metrics)?;
        self.constraints.push(ConstraintSpec {
            name: name.clone(),
            kind,
            value,
            positive,
        });
        Ok(name)
    }

    /// The discipline evaluating the calibration metrics.
    pub fn calibrator(&self) -> &Calibrator {
        &self.calibrator
    }

    /// Mutable access to the calibrator, e.g. to register custom metrics.
    pub fn calibrator_mut(&mut self) -> &mut Calibrator {
        &mut self.calibrator
    }

    /// The name of the calibration objective.
    pub fn objective_name(&self) -> &str {
        self.calibrator.objective_name()
    }

    /// The parameter values before calibration.
    pub fn prior_parameters(&self) -> &HashMap<String, Vec<f64>> {
        &self.prior_parameters
    }

    /// The parameter values after calibration, once executed.
    pub fn posterior_parameters(&self) -> Option<&HashMap<String, Vec<f64>>> {
        self.posterior_parameters.as_ref()
    }

    /// The model data at the prior parameters, once executed.
    pub fn prior_model_data(&self) -> Option<&Dataset> {
        self.prior_model_data.as_ref()
    }

    /// The model data at the posterior parameters, once executed.
    pub fn posterior_model_data(&self) -> Option<&Dataset> {
        self.posterior_model_data.as_ref()
    }

    /// Calibrate the parameters against reference data with a driver.
    ///
    /// Every metric of the problem is computed from one model run per
    /// evaluated point, shared between the objective and the constraints.
    ///
    /// # Errors
    ///
    /// Reference data errors, model execution errors and driver failures.
    pub fn execute(
        &mut self,
        driver: &dyn OptimizationDriver,
        reference_data: Dataset,
        settings: &DriverSettings,
    ) -> Result<CalibrationResult, CalibrationError> {
        self.calibrator.set_reference_data(reference_data)?;
        self.prior_model_data = Some(self.calibrator.compute_model_data(&self.prior_parameters)?);

        let calibrator = &self.calibrator;
        let space = &self.calibration_space;
        let objective_name = calibrator.objective_name().to_string();

        // One model run per point, shared by the objective and constraints.
        let cache: RefCell<Option<(Vec<f64>, HashMap<String, f64>)>> = RefCell::new(None);
        let evaluate = move |x: &[f64]| -> Result<HashMap<String, f64>, DriverError> {
            if let Some((cached_x, values)) = cache.borrow().as_ref() {
                if cached_x.as_slice() == x {
                    return Ok(values.clone());
                }
            }
            let parameters = space
                .convert_array_to_map(x)
                .map_err(|err| DriverError::evaluation_failure(err.to_string()))?;
            let values = calibrator
                .execute(&parameters)
                .map_err(|err| DriverError::evaluation_failure(err.to_string()))?;
            *cache.borrow_mut() = Some((x.to_vec(), values.clone()));
            Ok(values)
        };
        let evaluate = &evaluate;

        let metric_value = |values: &HashMap<String, f64>, name: &str| {
            values.get(name).copied().ok_or_else(|| {
                DriverError::evaluation_failure(format!("metric '{name}' was not computed"))
            })
        };

        let objective = {
            let name = objective_name.clone();
            Box::new(move |x: &[f64]| metric_value(&evaluate(x)?, &name))
        };
        let mut problem = OptimizationProblem::new(&self.calibration_space, objective)
            .with_maximize(calibrator.maximize_objective());
        for constraint in &self.constraints {
            let name = constraint.name.clone();
            problem.add_constraint(ConstraintFunction {
                name: constraint.name.clone(),
                kind: constraint.kind,
                value: constraint.value,
                positive: constraint.positive,
                function: Box::new(move |x: &[f64]| metric_value(&evaluate(x)?, &name)),
            });
        }

        info!(
            driver = driver.name(),
            objective = %objective_name,
            constraints = self.constraints.len(),
            "starting calibration"
        );
        let result = driver.optimize(&problem, settings)?;

        let posterior = self.calibration_space.convert_array_to_map(&result.x_opt)?;
        self.posterior_model_data = Some(self.calibrator.compute_model_data(&posterior)?);
        self.posterior_parameters = Some(posterior.clone());
        info!(
            objective = result.f_opt,
            evaluations = result.n_evaluations,
            "calibration finished"
        );
        Ok(CalibrationResult {
            parameters: posterior,
            objective_name,
            objective: result.f_opt,
            n_evaluations: result.n_evaluations,
            history: result.history,
        })
    }
}
