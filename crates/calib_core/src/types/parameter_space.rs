//! Bounded space of the parameters to calibrate.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::error::ParameterSpaceError;

/// One parameter of the space, possibly vector-valued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SpaceVariable {
    name: String,
    lower: Vec<f64>,
    upper: Vec<f64>,
    value: Vec<f64>,
}

/// The space of the parameters to be calibrated.
///
/// Each parameter carries per-component lower/upper bounds and a current
/// value; the current values at construction time are the prior of the
/// calibration. Variables keep their insertion order, which defines the
/// layout of the flat vectors exchanged with optimization drivers.
///
/// # Example
///
/// ```
/// use calib_core::types::ParameterSpace;
///
/// let mut space = ParameterSpace::new();
/// space.add_variable("a", 0.0, 1.0, 0.5).unwrap();
/// space.add_variable("b", 0.0, 10.0, 2.0).unwrap();
///
/// assert_eq!(space.dimension(), 2);
/// assert_eq!(space.current_values(), vec![0.5, 2.0]);
/// assert_eq!(space.variable_names(), vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpace {
    variables: Vec<SpaceVariable>,
}

impl ParameterSpace {
    /// Create an empty space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scalar parameter with bounds and a prior value.
    ///
    /// # Errors
    ///
    /// - [`ParameterSpaceError::DuplicateVariable`] if the name exists
    /// - [`ParameterSpaceError::InvalidBounds`] if `lower > upper`
    /// - [`ParameterSpaceError::ValueOutsideBounds`] if the prior is outside
    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        lower: f64,
        upper: f64,
        value: f64,
    ) -> Result<(), ParameterSpaceError> {
        self.add_vector_variable(name, vec![lower], vec![upper], vec![value])
    }

    /// Add a vector-valued parameter with per-component bounds and priors.
    ///
    /// # Errors
    ///
    /// The errors of [`add_variable`](Self::add_variable), plus
    /// [`ParameterSpaceError::ComponentCountMismatch`] when the bounds and
    /// value vectors have different lengths.
    pub fn add_vector_variable(
        &mut self,
        name: impl Into<String>,
        lower: Vec<f64>,
        upper: Vec<f64>,
        value: Vec<f64>,
    ) -> Result<(), ParameterSpaceError> {
        let name = name.into();
        if self.variables.iter().any(|v| v.name == name) {
            return Err(ParameterSpaceError::DuplicateVariable { name });
        }
        if lower.len() != value.len() || upper.len() != value.len() {
            return Err(ParameterSpaceError::ComponentCountMismatch {
                name,
                lower: lower.len(),
                upper: upper.len(),
                value: value.len(),
            });
        }
        for ((&lo, &up), &val) in lower.iter().zip(&upper).zip(&value) {
            if lo > up {
                return Err(ParameterSpaceError::InvalidBounds {
                    name: name.clone(),
                    lower: lo,
                    upper: up,
                });
            }
            if val < lo || val > up {
                return Err(ParameterSpaceError::ValueOutsideBounds {
                    name: name.clone(),
                    value: val,
                    lower: lo,
                    upper: up,
                });
            }
        }
        self.variables.push(SpaceVariable {
            name,
            lower,
            upper,
            value,
        });
        Ok(())
    }

    /// The total number of scalar components in the space.
    pub fn dimension(&self) -> usize {
        self.variables.iter().map(|v| v.value.len()).sum()
    }

    /// The variable names in insertion order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.iter().map(|v| v.name.as_str()).collect()
    }

    /// The flattened lower bounds.
    pub fn lower_bounds(&self) -> Vec<f64> {
        self.variables.iter().flat_map(|v| v.lower.clone()).collect()
    }

    /// The flattened upper bounds.
    pub fn upper_bounds(&self) -> Vec<f64> {
        self.variables.iter().flat_map(|v| v.upper.clone()).collect()
    }

    /// The flattened current values (the prior before calibration).
    pub fn current_values(&self) -> Vec<f64> {
        self.variables.iter().flat_map(|v| v.value.clone()).collect()
    }

    /// The current values as a name-to-components map.
    pub fn current_values_as_map(&self) -> HashMap<String, Vec<f64>> {
        self.variables
            .iter()
            .map(|v| (v.name.clone(), v.value.clone()))
            .collect()
    }

    /// Split a flat vector into a name-to-components map.
    ///
    /// # Errors
    ///
    /// [`ParameterSpaceError::DimensionMismatch`] if the vector length is
    /// not the space dimension.
    pub fn convert_array_to_map(
        &self,
        values: &[f64],
    ) -> Result<HashMap<String, Vec<f64>>, ParameterSpaceError> {
        if values.len() != self.dimension() {
            return Err(ParameterSpaceError::DimensionMismatch {
                expected: self.dimension(),
                got: values.len(),
            });
        }
        let mut map = HashMap::new();
        let mut offset = 0;
        for variable in &self.variables {
            let size = variable.value.len();
            map.insert(
                variable.name.clone(),
                values[offset..offset + size].to_vec(),
            );
            offset += size;
        }
        Ok(map)
    }

    /// Flatten a name-to-components map into a vector in space order.
    ///
    /// # Errors
    ///
    /// [`ParameterSpaceError::UnknownVariable`] if a space variable is
    /// missing from the map.
    pub fn convert_map_to_array(
        &self,
        values: &HashMap<String, Vec<f64>>,
    ) -> Result<Vec<f64>, ParameterSpaceError> {
        let mut flat = Vec::with_capacity(self.dimension());
        for variable in &self.variables {
            let components = values.get(&variable.name).ok_or_else(|| {
                ParameterSpaceError::UnknownVariable {
                    name: variable.name.clone(),
                }
            })?;
            flat.extend_from_slice(components);
        }
        Ok(flat)
    }
}
