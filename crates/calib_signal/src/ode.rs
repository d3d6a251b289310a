//! Signal generation by integrating an ODE right-hand side.

use std::collections::HashMap;

use calib_core::traits::{DataMap, Discipline};
use tracing::debug;

use crate::error::SignalError;
use crate::signal::{Signal, SignalGenerator};

/// A signal generator integrating an ODE defined by a discipline.
///
/// The right-hand side discipline reads the time variable, the state
/// variables and any parameters, and writes one `<state>_dot` output per
/// state variable. Integration uses the classical fourth-order Runge-Kutta
/// scheme with a fixed maximum step; the trajectories are reported at the
/// requested times of interest, starting from the initial time.
pub struct OdeSignalGenerator {
    rhs: Box<dyn Discipline>,
    state_names: Vec<String>,
    time_name: String,
    max_step: f64,
}

impl OdeSignalGenerator {
    /// Default integration step bound.
    pub const DEFAULT_MAX_STEP: f64 = 1e-3;

    /// Create a generator from a right-hand side and its state variables.
    pub fn new(rhs: Box<dyn Discipline>, state_names: Vec<String>) -> Self {
        Self {
            rhs,
            state_names,
            time_name: "time".to_string(),
            max_step: Self::DEFAULT_MAX_STEP,
        }
    }

    /// Use a custom name for the time variable.
    pub fn with_time_name(mut self, time_name: impl Into<String>) -> Self {
        self.time_name = time_name.into();
        self
    }

    /// Bound the integration step.
    pub fn with_max_step(mut self, max_step: f64) -> Self {
        self.max_step = max_step;
        self
    }

    /// The discipline defining the right-hand side of the ODE.
    pub fn rhs_discipline(&self) -> &dyn Discipline {
        self.rhs.as_ref()
    }

    /// The names of the state variables.
    pub fn state_names(&self) -> &[String] {
        &self.state_names
    }

    fn derivatives(
        &self,
        time: f64,
        state: &[f64],
        parameters: &HashMap<String, f64>,
    ) -> Result<Vec<f64>, SignalError> {
        let mut inputs = self.rhs.default_inputs();
        for (name, value) in parameters {
            inputs.insert(name.clone(), vec![*value]);
        }
        inputs.insert(self.time_name.clone(), vec![time]);
        for (name, value) in self.state_names.iter().zip(state) {
            inputs.insert(name.clone(), vec![*value]);
        }
        let outputs = self.rhs.execute(&inputs)?;
        self.state_names
            .iter()
            .map(|name| {
                let derivative = format!("{name}_dot");
                outputs
                    .get(&derivative)
                    .and_then(|values| values.first().copied())
                    .ok_or_else(|| SignalError::missing_derivative(derivative))
            })
            .collect()
    }

    fn rk4_step(
        &self,
        time: f64,
        state: &mut Vec<f64>,
        step: f64,
        parameters: &HashMap<String, f64>,
    ) -> Result<(), SignalError> {
        let shift = |base: &[f64], slope: &[f64], h: f64| -> Vec<f64> {
            base.iter().zip(slope).map(|(y, k)| y + h * k).collect()
        };
        let k1 = self.derivatives(time, state, parameters)?;
        let k2 = self.derivatives(time + step / 2.0, &shift(state, &k1, step / 2.0), parameters)?;
        let k3 = self.derivatives(time + step / 2.0, &shift(state, &k2, step / 2.0), parameters)?;
        let k4 = self.derivatives(time + step, &shift(state, &k3, step), parameters)?;
        for (i, y) in state.iter_mut().enumerate() {
            *y += step / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
        }
        Ok(())
    }
}

impl SignalGenerator for OdeSignalGenerator {
    fn generate(
        &self,
        times: &[f64],
        initial_state_values: &HashMap<String, f64>,
        parameter_values: &HashMap<String, f64>,
    ) -> Result<Signal, SignalError> {
        if times.is_empty() {
            return Err(SignalError::EmptyTimes);
        }
        if times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SignalError::NonAscendingTimes);
        }

        let mut state: Vec<f64> = self
            .state_names
            .iter()
            .map(|name| {
                initial_state_values
                    .get(name)
                    .copied()
                    .ok_or_else(|| SignalError::missing_initial_state(name.clone()))
            })
            .collect::<Result<_, _>>()?;

        let mut evolution: HashMap<String, Vec<f64>> = self
            .state_names
            .iter()
            .map(|name| (name.clone(), Vec::with_capacity(times.len())))
            .collect();
        let record = |evolution: &mut HashMap<String, Vec<f64>>, state: &[f64]| {
            for (name, value) in self.state_names.iter().zip(state) {
                if let Some(values) = evolution.get_mut(name) {
                    values.push(*value);
                }
            }
        };
        record(&mut evolution, &state);

        for window in times.windows(2) {
            let (start, end) = (window[0], window[1]);
            let n_steps = ((end - start) / self.max_step).ceil().max(1.0) as usize;
            let step = (end - start) / n_steps as f64;
            for i in 0..n_steps {
                self.rk4_step(start + step * i as f64, &mut state, step, parameter_values)?;
            }
            record(&mut evolution, &state);
        }
        debug!(
            rhs = self.rhs.name(),
            states = self.state_names.len(),
            times = times.len(),
            "generated signal"
        );

        let final_state = self
            .state_names
            .iter()
            .zip(&state)
            .map(|(name, value)| (name.clone(), *value))
            .collect();
        Ok(Signal {
            times: times.to_vec(),
            evolution,
            final_state,
        })
    }
}
