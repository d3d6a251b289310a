//! Tabular dataset keyed by variable name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::DataError;

/// A collection of named variables observed over a common set of samples.
///
/// Each variable is a 2-D table: rows are samples (observations), columns
/// are the components of the variable. A scalar output observed four times
/// is stored as four rows of one component; a trajectory discretized over a
/// 5-point mesh is one row of five components per sample.
///
/// All variables in a dataset share the same number of samples. NaN entries
/// are legal and denote missing observations; NaN-aware metrics skip them.
///
/// # Example
///
/// ```
/// use calib_core::types::Dataset;
///
/// let mut data = Dataset::new();
/// data.add_variable("x", vec![vec![0.5], vec![1.0]]).unwrap();
/// data.add_variable("y", vec![vec![1.0], vec![2.0]]).unwrap();
///
/// assert_eq!(data.n_samples(), 2);
/// assert_eq!(data.component_count("y").unwrap(), 1);
/// assert_eq!(data.variable_names(), vec!["x", "y"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    // BTreeMap keeps variable iteration deterministic.
    variables: BTreeMap<String, Vec<Vec<f64>>>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable with its per-sample rows.
    ///
    /// # Errors
    ///
    /// - [`DataError::DuplicateVariable`] if the name is already present
    /// - [`DataError::RaggedRows`] if rows have inconsistent widths
    /// - [`DataError::SampleCountMismatch`] if the sample count differs
    ///   from the variables already present
    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        rows: Vec<Vec<f64>>,
    ) -> Result<(), DataError> {
        let name = name.into();
        if self.variables.contains_key(&name) {
            return Err(DataError::DuplicateVariable { name });
        }
        if let Some(first) = rows.first() {
            let width = first.len();
            if rows.iter().any(|row| row.len() != width) {
                return Err(DataError::RaggedRows { name });
            }
        }
        if let Some(expected) = self.n_samples_opt() {
            if rows.len() != expected {
                return Err(DataError::SampleCountMismatch {
                    name,
                    got: rows.len(),
                    expected,
                });
            }
        }
        self.variables.insert(name, rows);
        Ok(())
    }

    /// Add a scalar variable from one value per sample.
    pub fn add_scalar_variable(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), DataError> {
        self.add_variable(name, values.into_iter().map(|v| vec![v]).collect())
    }

    /// Get the rows of a variable.
    ///
    /// # Errors
    ///
    /// [`DataError::MissingVariable`] if the name is unknown.
    pub fn get(&self, name: &str) -> Result<&[Vec<f64>], DataError> {
        self.variables
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| DataError::missing_variable(name))
    }

    /// Get one sample row of a variable.
    pub fn get_sample(&self, name: &str, sample: usize) -> Result<&[f64], DataError> {
        let rows = self.get(name)?;
        rows.get(sample)
            .map(Vec::as_slice)
            .ok_or(DataError::EmptyDataset)
    }

    /// Whether the dataset contains a variable.
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// The number of samples shared by all variables (0 when empty).
    pub fn n_samples(&self) -> usize {
        self.n_samples_opt().unwrap_or(0)
    }

    fn n_samples_opt(&self) -> Option<usize> {
        self.variables.values().next().map(Vec::len)
    }

    /// The number of components of a variable.
    pub fn component_count(&self, name: &str) -> Result<usize, DataError> {
        let rows = self.get(name)?;
        Ok(rows.first().map_or(0, Vec::len))
    }

    /// The variable names in deterministic (sorted) order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.keys().map(String::as_str).collect()
    }

    /// Whether the dataset holds no variable.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
