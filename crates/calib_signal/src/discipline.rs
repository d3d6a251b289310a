//! A discipline wrapping a signal generator.

use calib_core::traits::{DataMap, Discipline};
use calib_core::types::DisciplineError;
use std::collections::HashMap;

use crate::signal::SignalGenerator;

/// Wraps a signal generator as a discipline producing trajectories.
///
/// The inputs are `initial_<state>` for every state variable plus the
/// parameter names; the outputs are the selected state trajectories, sampled
/// at fixed times of interest. When the time variable is listed among the
/// outputs, the times themselves are output under that name, so that an
/// integrated metric can use them as a mesh.
pub struct SignalGeneratorDiscipline {
    generator: Box<dyn SignalGenerator + Send + Sync>,
    state_names: Vec<String>,
    parameter_names: Vec<String>,
    output_names: Vec<String>,
    times: Vec<f64>,
    time_name: String,
    name: String,
}

impl SignalGeneratorDiscipline {
    /// Wrap a generator into a discipline.
    ///
    /// `state_names` are the generator states exposed as `initial_<state>`
    /// inputs; `output_names` selects the trajectories to output and may
    /// include the time variable, named `"time"` by default.
    pub fn new(
        generator: Box<dyn SignalGenerator + Send + Sync>,
        state_names: Vec<String>,
        parameter_names: Vec<String>,
        output_names: Vec<String>,
        times: Vec<f64>,
    ) -> Self {
        Self {
            generator,
            state_names,
            parameter_names,
            output_names,
            times,
            time_name: "time".to_string(),
            name: "SignalGenerator".to_string(),
        }
    }

    /// Use a custom name for the time variable.
    pub fn with_time_name(mut self, time_name: impl Into<String>) -> Self {
        self.time_name = time_name.into();
        self
    }

    /// The times of interest.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    fn initial_name(state: &str) -> String {
        format!("initial_{state}")
    }
}

impl Discipline for SignalGeneratorDiscipline {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_names(&self) -> Vec<String> {
        self.state_names
            .iter()
            .map(|state| Self::initial_name(state))
            .chain(self.parameter_names.iter().cloned())
            .collect()
    }

    fn output_names(&self) -> Vec<String> {
        self.output_names.clone()
    }

    fn execute(&self, inputs: &DataMap) -> Result<DataMap, DisciplineError> {
        let mut initial_state_values = HashMap::new();
        for state in &self.state_names {
            let input = Self::initial_name(state);
            let value = inputs
                .get(&input)
                .and_then(|values| values.first().copied())
                .ok_or_else(|| DisciplineError::missing_input(self.name(), input))?;
            initial_state_values.insert(state.clone(), value);
        }
        let mut parameter_values = HashMap::new();
        for parameter in &self.parameter_names {
            if let Some(values) = inputs.get(parameter) {
                if let Some(value) = values.first() {
                    parameter_values.insert(parameter.clone(), *value);
                }
            }
        }

        let signal = self
            .generator
            .generate(&self.times, &initial_state_values, &parameter_values)
            .map_err(|err| DisciplineError::execution_failure(self.name(), err.to_string()))?;

        let mut outputs = DataMap::new();
        for output in &self.output_names {
            if output == &self.time_name {
                outputs.insert(output.clone(), signal.times.clone());
            } else {
                let trajectory = signal.trajectory(output).ok_or_else(|| {
                    DisciplineError::execution_failure(
                        self.name(),
                        format!("the signal has no trajectory '{output}'"),
                    )
                })?;
                outputs.insert(output.clone(), trajectory.to_vec());
            }
        }
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ode::OdeSignalGenerator;
    use approx::assert_relative_eq;

    /// x_dot = r * x.
    struct Growth;

    impl Discipline for Growth {
        fn name(&self) -> &str {
            "Growth"
        }
        fn input_names(&self) -> Vec<String> {
            vec!["time".into(), "x".into(), "r".into()]
        }
        fn output_names(&self) -> Vec<String> {
            vec!["x_dot".into()]
        }
        fn default_inputs(&self) -> DataMap {
            DataMap::from([("r".to_string(), vec![1.0])])
        }
        fn execute(&self, inputs: &DataMap) -> Result<DataMap, DisciplineError> {
            let x = inputs
                .get("x")
                .ok_or_else(|| DisciplineError::missing_input("Growth", "x"))?[0];
            let r = inputs
                .get("r")
                .ok_or_else(|| DisciplineError::missing_input("Growth", "r"))?[0];
            Ok(DataMap::from([("x_dot".to_string(), vec![r * x])]))
        }
    }

    fn discipline() -> SignalGeneratorDiscipline {
        let generator = OdeSignalGenerator::new(Box::new(Growth), vec!["x".to_string()]);
        SignalGeneratorDiscipline::new(
            Box::new(generator),
            vec!["x".to_string()],
            vec!["r".to_string()],
            vec!["x".to_string(), "time".to_string()],
            vec![0.0, 0.5, 1.0],
        )
    }

    #[test]
    fn test_names() {
        let discipline = discipline();
        assert_eq!(discipline.input_names(), ["initial_x", "r"]);
        assert_eq!(discipline.output_names(), ["x", "time"]);
    }

    #[test]
    fn test_execute_outputs_trajectory_and_times() {
        let discipline = discipline();
        let outputs = discipline
            .execute(&DataMap::from([
                ("initial_x".to_string(), vec![1.0]),
                ("r".to_string(), vec![-1.0]),
            ]))
            .unwrap();
        assert_eq!(outputs["time"], vec![0.0, 0.5, 1.0]);
        assert_relative_eq!(outputs["x"][2], (-1.0f64).exp(), epsilon = 1e-8);
    }

    #[test]
    fn test_parameter_defaults_apply() {
        let discipline = discipline();
        // Without r, the rhs default r = 1 drives exponential growth.
        let outputs = discipline
            .execute(&DataMap::from([("initial_x".to_string(), vec![1.0])]))
            .unwrap();
        assert_relative_eq!(outputs["x"][2], 1.0f64.exp(), epsilon = 1e-8);
    }

    #[test]
    fn test_missing_initial_state() {
        let discipline = discipline();
        assert!(matches!(
            discipline.execute(&DataMap::new()).unwrap_err(),
            DisciplineError::MissingInput { .. }
        ));
    }
}
