//! The discipline seam: a simulation model as a function of named data.

use std::collections::HashMap;

use crate::types::DisciplineError;

/// Named data exchanged with a discipline for one evaluation.
///
/// Each entry maps a variable name to the components of that variable for
/// a single sample.
pub type DataMap = HashMap<String, Vec<f64>>;

/// A simulation model exposed as a function from named inputs to named
/// outputs, owned by the host framework.
///
/// One `execute` call evaluates one sample. Implementations carry their own
/// state (and interior mutability if they cache); the trait requires
/// `Send + Sync` so calibration can evaluate reference samples in parallel.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use calib_core::traits::{DataMap, Discipline};
/// use calib_core::types::DisciplineError;
///
/// /// Computes y = a * x.
/// struct Linear;
///
/// impl Discipline for Linear {
///     fn name(&self) -> &str {
///         "Linear"
///     }
///
///     fn input_names(&self) -> Vec<String> {
///         vec!["x".into(), "a".into()]
///     }
///
///     fn output_names(&self) -> Vec<String> {
///         vec!["y".into()]
///     }
///
///     fn execute(&self, inputs: &DataMap) -> Result<DataMap, DisciplineError> {
///         let x = inputs["x"][0];
///         let a = inputs["a"][0];
///         Ok(HashMap::from([("y".to_string(), vec![a * x])]))
///     }
/// }
///
/// let outputs = Linear
///     .execute(&HashMap::from([
///         ("x".to_string(), vec![2.0]),
///         ("a".to_string(), vec![3.0]),
///     ]))
///     .unwrap();
/// assert_eq!(outputs["y"], vec![6.0]);
/// ```
pub trait Discipline: Send + Sync {
    /// The name of the discipline, used in error messages and logs.
    fn name(&self) -> &str;

    /// The names of the input variables.
    fn input_names(&self) -> Vec<String>;

    /// The names of the output variables.
    fn output_names(&self) -> Vec<String>;

    /// Default values for inputs absent from the execution data.
    fn default_inputs(&self) -> DataMap {
        DataMap::new()
    }

    /// Evaluate the model for one sample.
    fn execute(&self, inputs: &DataMap) -> Result<DataMap, DisciplineError>;
}

/// A chain of disciplines executed in sequence.
///
/// The outputs of earlier disciplines feed the inputs of later ones; the
/// chain exposes the union of the outputs. This is the process-level
/// coupling the calibration layer needs; richer multidisciplinary
/// formulations belong to the host framework.
pub struct DisciplineChain {
    disciplines: Vec<Box<dyn Discipline>>,
    name: String,
}

impl DisciplineChain {
    /// Create a chain from the disciplines to execute in order.
    pub fn new(disciplines: Vec<Box<dyn Discipline>>) -> Self {
        let name = disciplines
            .iter()
            .map(|d| d.name())
            .collect::<Vec<_>>()
            .join("->");
        Self { disciplines, name }
    }

    /// Execute the chain, returning the pool of all produced variables.
    ///
    /// Each discipline reads from the pool (seeded with `inputs` and the
    /// discipline defaults) and writes its outputs back into it.
    pub fn execute_pool(&self, inputs: &DataMap) -> Result<DataMap, DisciplineError> {
        let mut pool = inputs.clone();
        for discipline in &self.disciplines {
            let mut local = discipline.default_inputs();
            for name in discipline.input_names() {
                if let Some(values) = pool.get(&name) {
                    local.insert(name, values.clone());
                }
            }
            let outputs = discipline.execute(&local)?;
            pool.extend(outputs);
        }
        Ok(pool)
    }
}

impl Discipline for DisciplineChain {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_names(&self) -> Vec<String> {
        // Inputs not produced by an earlier discipline in the chain.
        let mut produced: Vec<String> = Vec::new();
        let mut names: Vec<String> = Vec::new();
        for discipline in &self.disciplines {
            for input in discipline.input_names() {
                if !produced.contains(&input) && !names.contains(&input) {
                    names.push(input);
                }
            }
            produced.extend(discipline.output_names());
        }
        names
    }

    fn output_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for discipline in &self.disciplines {
            for output in discipline.output_names() {
                if !names.contains(&output) {
                    names.push(output);
                }
            }
        }
        names
    }

    fn default_inputs(&self) -> DataMap {
        let mut defaults = DataMap::new();
        for discipline in &self.disciplines {
            for (name, values) in discipline.default_inputs() {
                defaults.entry(name).or_insert(values);
            }
        }
        defaults
    }

    fn execute(&self, inputs: &DataMap) -> Result<DataMap, DisciplineError> {
        let pool = self.execute_pool(inputs)?;
        let mut outputs = DataMap::new();
        for name in self.output_names() {
            if let Some(values) = pool.get(&name) {
                outputs.insert(name, values.clone());
            }
        }
        Ok(outputs)
    }
}
