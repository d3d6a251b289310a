//! The oscillator benchmark wrapped as a calibratable discipline.

use approx::assert_relative_eq;
use calib_core::traits::{DataMap, Discipline};
use calib_signal::problems::oscillator::{oscillator, oscillator_with_constant_omega};
use calib_signal::SignalGeneratorDiscipline;

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

#[test]
fn all_states_become_initial_inputs() {
    let discipline = SignalGeneratorDiscipline::new(
        Box::new(oscillator()),
        vec!["omega".into(), "position".into(), "velocity".into()],
        vec![],
        vec!["position".into()],
        linspace(0.0, 1.0, 5),
    );
    assert_eq!(
        discipline.input_names(),
        ["initial_omega", "initial_position", "initial_velocity"]
    );
    assert_eq!(discipline.output_names(), ["position"]);

    let outputs = discipline
        .execute(&DataMap::from([
            ("initial_position".to_string(), vec![1.0]),
            ("initial_velocity".to_string(), vec![0.0]),
            ("initial_omega".to_string(), vec![1.5]),
        ]))
        .unwrap();
    assert_eq!(outputs["position"].len(), 5);
    assert_relative_eq!(outputs["position"][0], 1.0);
    // The decay rate is tiny: the trajectory stays close to cos(1.5 t).
    assert_relative_eq!(outputs["position"][4], (1.5f64).cos(), epsilon = 0.02);
}

#[test]
fn decay_rate_is_exposed_as_a_parameter() {
    let discipline = SignalGeneratorDiscipline::new(
        Box::new(oscillator()),
        vec!["omega".into(), "position".into(), "velocity".into()],
        vec!["a".into()],
        vec!["position".into()],
        linspace(0.0, 1.0, 5),
    );
    assert_eq!(
        discipline.input_names(),
        ["initial_omega", "initial_position", "initial_velocity", "a"]
    );

    let inputs = |a: f64| {
        DataMap::from([
            ("initial_position".to_string(), vec![1.0]),
            ("initial_velocity".to_string(), vec![0.0]),
            ("initial_omega".to_string(), vec![1.5]),
            ("a".to_string(), vec![a]),
        ])
    };
    let slow = discipline.execute(&inputs(1e-2)).unwrap();
    let fast = discipline.execute(&inputs(0.5)).unwrap();
    // A faster decay slows the oscillation down, leaving a larger position.
    assert!(fast["position"][4] > slow["position"][4]);
}

#[test]
fn time_mesh_is_output_alongside_the_trajectory() {
    let times = linspace(0.0, 1.0, 5);
    let discipline = SignalGeneratorDiscipline::new(
        Box::new(oscillator_with_constant_omega(1.5)),
        vec!["position".into(), "velocity".into()],
        vec![],
        vec!["position".into(), "time".into()],
        times.clone(),
    );
    let outputs = discipline
        .execute(&DataMap::from([
            ("initial_position".to_string(), vec![1.0]),
            ("initial_velocity".to_string(), vec![0.0]),
        ]))
        .unwrap();
    assert_eq!(outputs["time"], times);
    assert_relative_eq!(outputs["position"][4], (1.5f64).cos(), epsilon = 1e-6);
}
