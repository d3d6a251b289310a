//! Oscillator calibration demo
//!
//! Generates noisy position signals from a harmonic oscillator with a known
//! angular velocity, then recovers that velocity by calibrating the model
//! against the signals with an integrated squared error.

use anyhow::Result;
use calib_core::traits::{DataMap, Discipline, DriverSettings};
use calib_core::types::{Dataset, ParameterSpace};
use calib_metrics::CalibrationMetricSettings;
use calib_scenario::{CalibrationScenario, FullFactorialDriver};
use calib_signal::problems::oscillator::oscillator_with_constant_omega;
use calib_signal::SignalGeneratorDiscipline;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const TRUE_OMEGA: f64 = 1.5;
const NOISE_SIGMA: f64 = 0.01;

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

fn model(times: Vec<f64>) -> SignalGeneratorDiscipline {
    SignalGeneratorDiscipline::new(
        Box::new(oscillator_with_constant_omega(1.0)),
        vec!["position".to_string(), "velocity".to_string()],
        vec!["omega".to_string()],
        vec!["position".to_string(), "time".to_string()],
        times,
    )
}

/// Run the true oscillator over a few initial conditions and perturb the
/// observed positions with Gaussian noise.
fn reference_signals(times: &[f64]) -> Result<Dataset> {
    let truth = model(times.to_vec());
    let noise = Normal::new(0.0, NOISE_SIGMA)?;
    let mut rng = StdRng::seed_from_u64(42);

    let initial_conditions = [(1.0, 0.0), (0.5, 0.5), (1.5, -0.2)];
    let mut positions = Vec::new();
    let mut meshes = Vec::new();
    for (p0, v0) in initial_conditions {
        let outputs = truth.execute(&DataMap::from([
            ("initial_position".to_string(), vec![p0]),
            ("initial_velocity".to_string(), vec![v0]),
            ("omega".to_string(), vec![TRUE_OMEGA]),
        ]))?;
        let noisy = outputs["position"]
            .iter()
            .map(|p| p + noise.sample(&mut rng))
            .collect();
        positions.push(noisy);
        meshes.push(outputs["time"].clone());
    }

    let mut reference = Dataset::new();
    reference.add_scalar_variable(
        "initial_position",
        initial_conditions.iter().map(|(p0, _)| *p0).collect(),
    )?;
    reference.add_scalar_variable(
        "initial_velocity",
        initial_conditions.iter().map(|(_, v0)| *v0).collect(),
    )?;
    reference.add_variable("position", positions)?;
    reference.add_variable("time", meshes)?;
    Ok(reference)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("oscillator_demo=info".parse()?))
        .init();

    tracing::info!(omega = TRUE_OMEGA, "generating noisy reference signals");
    let times = linspace(0.0, 2.0, 9);
    let reference = reference_signals(&times)?;

    let mut space = ParameterSpace::new();
    space.add_variable("omega", 0.5, 3.0, 1.0)?;

    let mut scenario = CalibrationScenario::new(
        vec![Box::new(model(times))],
        vec!["initial_position".to_string(), "initial_velocity".to_string()],
        &[CalibrationMetricSettings::new("position")
            .with_metric("ISE")
            .with_mesh("time")],
        space,
    )?;
    tracing::info!(objective = scenario.objective_name(), "starting calibration");

    let result = scenario.execute(
        &FullFactorialDriver::new(26),
        reference,
        &DriverSettings::default(),
    )?;

    let omega = result.parameters["omega"][0];
    tracing::info!(
        omega,
        objective = result.objective,
        evaluations = result.n_evaluations,
        "calibration finished"
    );
    println!("{result}");
    println!("calibrated omega: {omega:.3} (true value {TRUE_OMEGA})");
    Ok(())
}
