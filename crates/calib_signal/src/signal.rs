//! Multivariate time signals.

use std::collections::HashMap;

/// A multivariate signal sampled at times of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    /// The times of interest in ascending order.
    pub times: Vec<f64>,
    /// The state trajectories, one value per time of interest.
    pub evolution: HashMap<String, Vec<f64>>,
    /// The state values at final time.
    pub final_state: HashMap<String, f64>,
}

impl Signal {
    /// The trajectory of a state variable, when present.
    pub fn trajectory(&self, name: &str) -> Option<&[f64]> {
        self.evolution.get(name).map(Vec::as_slice)
    }
}

/// The base trait of signal generators.
pub trait SignalGenerator {
    /// Generate a signal at given times from initial states and parameters.
    ///
    /// The times must be strictly ascending, from initial to final time.
    fn generate(
        &self,
        times: &[f64],
        initial_state_values: &HashMap<String, f64>,
        parameter_values: &HashMap<String, f64>,
    ) -> Result<Signal, crate::error::SignalError>;
}
