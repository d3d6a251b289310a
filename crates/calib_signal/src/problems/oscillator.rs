//! A harmonic oscillator generating benchmark signals.

use calib_core::traits::{DataMap, Discipline, DisciplineChain};
use calib_core::types::DisciplineError;

use crate::ode::OdeSignalGenerator;

/// The right-hand side of the harmonic oscillator ODE.
///
/// Returns the time derivatives of the position and of the velocity.
pub fn oscillator_rhs(_time: f64, position: f64, velocity: f64, omega: f64) -> (f64, f64) {
    (velocity, -(omega * omega) * position)
}

/// The right-hand side of an angular velocity decreasing exponentially,
/// `d omega / dt = -a * exp(-a * t)` with `a > 0`.
pub fn omega_decay_rhs(time: f64, a: f64) -> f64 {
    -a * (-a * time).exp()
}

fn scalar(inputs: &DataMap, discipline: &str, name: &str) -> Result<f64, DisciplineError> {
    inputs
        .get(name)
        .and_then(|values| values.first().copied())
        .ok_or_else(|| DisciplineError::missing_input(discipline, name))
}

/// The oscillator right-hand side as a discipline.
///
/// Inputs default to a resting unit position and a unit angular velocity.
#[derive(Debug, Clone)]
pub struct OscillatorRhs {
    omega: f64,
}

impl Default for OscillatorRhs {
    fn default() -> Self {
        Self { omega: 1.0 }
    }
}

impl OscillatorRhs {
    /// Create the right-hand side with a default angular velocity.
    pub fn with_omega(omega: f64) -> Self {
        Self { omega }
    }
}

impl Discipline for OscillatorRhs {
    fn name(&self) -> &str {
        "OscillatorRhs"
    }

    fn input_names(&self) -> Vec<String> {
        vec![
            "time".into(),
            "position".into(),
            "velocity".into(),
            "omega".into(),
        ]
    }

    fn output_names(&self) -> Vec<String> {
        vec!["position_dot".into(), "velocity_dot".into()]
    }

    fn default_inputs(&self) -> DataMap {
        DataMap::from([
            ("time".to_string(), vec![0.0]),
            ("position".to_string(), vec![1.0]),
            ("velocity".to_string(), vec![0.0]),
            ("omega".to_string(), vec![self.omega]),
        ])
    }

    fn execute(&self, inputs: &DataMap) -> Result<DataMap, DisciplineError> {
        let time = scalar(inputs, self.name(), "time")?;
        let position = scalar(inputs, self.name(), "position")?;
        let velocity = scalar(inputs, self.name(), "velocity")?;
        let omega = scalar(inputs, self.name(), "omega")?;
        let (position_dot, velocity_dot) = oscillator_rhs(time, position, velocity, omega);
        Ok(DataMap::from([
            ("position_dot".to_string(), vec![position_dot]),
            ("velocity_dot".to_string(), vec![velocity_dot]),
        ]))
    }
}

/// The decaying angular velocity as a discipline.
#[derive(Debug, Clone)]
pub struct OmegaDecayRhs {
    a: f64,
}

impl Default for OmegaDecayRhs {
    fn default() -> Self {
        Self { a: 2e-2 }
    }
}

impl OmegaDecayRhs {
    /// Create the right-hand side with a decay rate.
    pub fn with_rate(a: f64) -> Self {
        Self { a }
    }
}

impl Discipline for OmegaDecayRhs {
    fn name(&self) -> &str {
        "OmegaDecayRhs"
    }

    fn input_names(&self) -> Vec<String> {
        vec!["time".into(), "omega".into(), "a".into()]
    }

    fn output_names(&self) -> Vec<String> {
        vec!["omega_dot".into()]
    }

    fn default_inputs(&self) -> DataMap {
        DataMap::from([
            ("time".to_string(), vec![0.0]),
            ("omega".to_string(), vec![1.0]),
            ("a".to_string(), vec![self.a]),
        ])
    }

    fn execute(&self, inputs: &DataMap) -> Result<DataMap, DisciplineError> {
        let time = scalar(inputs, self.name(), "time")?;
        let a = scalar(inputs, self.name(), "a")?;
        Ok(DataMap::from([(
            "omega_dot".to_string(),
            vec![omega_decay_rhs(time, a)],
        )]))
    }
}

/// An oscillator whose angular velocity decays as `-a * exp(-a * t)`.
///
/// The states are `omega`, `position` and `velocity`.
pub fn oscillator() -> OdeSignalGenerator {
    oscillator_with_omega_rhs(Box::new(OmegaDecayRhs::default()))
}

/// An oscillator with a custom angular velocity dynamics.
///
/// `omega_rhs` must output `omega_dot` from `time` and `omega`.
pub fn oscillator_with_omega_rhs(omega_rhs: Box<dyn Discipline>) -> OdeSignalGenerator {
    let rhs = DisciplineChain::new(vec![omega_rhs, Box::new(OscillatorRhs::default())]);
    OdeSignalGenerator::new(
        Box::new(rhs),
        vec!["omega".to_string(), "position".to_string(), "velocity".to_string()],
    )
}

/// An oscillator with a constant angular velocity.
///
/// The states are `position` and `velocity`; `omega` stays an input of the
/// right-hand side and can be overridden as a parameter.
pub fn oscillator_with_constant_omega(omega: f64) -> OdeSignalGenerator {
    OdeSignalGenerator::new(
        Box::new(OscillatorRhs::with_omega(omega)),
        vec!["position".to_string(), "velocity".to_string()],
    )
}
