//! Error types for the foundation layer.
//!
//! Each concern gets its own `thiserror` enum with constructor helpers,
//! so the upper layers can wrap them with `#[from]` conversions.

use thiserror::Error;

/// Errors raised by [`crate::types::Dataset`] operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// A variable requested by name is not present in the dataset.
    #[error("Variable '{name}' is not present in the dataset")]
    MissingVariable {
        /// The name of the missing variable.
        name: String,
    },

    /// A variable was added with a sample count different from the dataset.
    #[error("Variable '{name}' has {got} samples, expected {expected}")]
    SampleCountMismatch {
        /// The name of the offending variable.
        name: String,
        /// The number of samples provided.
        got: usize,
        /// The number of samples expected.
        expected: usize,
    },

    /// A variable was added with rows of inconsistent widths.
    #[error("Variable '{name}' has rows of inconsistent component counts")]
    RaggedRows {
        /// The name of the offending variable.
        name: String,
    },

    /// A variable was added twice.
    #[error("Variable '{name}' is already present in the dataset")]
    DuplicateVariable {
        /// The name of the duplicated variable.
        name: String,
    },

    /// The dataset holds no sample.
    #[error("The dataset is empty")]
    EmptyDataset,
}

impl DataError {
    /// Create a missing-variable error.
    pub fn missing_variable(name: impl Into<String>) -> Self {
        DataError::MissingVariable { name: name.into() }
    }
}

/// Errors raised by [`crate::types::ParameterSpace`] operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterSpaceError {
    /// A variable was added twice.
    #[error("Parameter '{name}' is already present in the space")]
    DuplicateVariable {
        /// The name of the duplicated parameter.
        name: String,
    },

    /// Lower bound above upper bound.
    #[error("Parameter '{name}': lower bound {lower} exceeds upper bound {upper}")]
    InvalidBounds {
        /// The name of the parameter.
        name: String,
        /// The lower bound.
        lower: f64,
        /// The upper bound.
        upper: f64,
    },

    /// Prior value outside the bounds.
    #[error("Parameter '{name}': value {value} outside bounds [{lower}, {upper}]")]
    ValueOutsideBounds {
        /// The name of the parameter.
        name: String,
        /// The offending value.
        value: f64,
        /// The lower bound.
        lower: f64,
        /// The upper bound.
        upper: f64,
    },

    /// Bounds and value vectors with different component counts.
    #[error(
        "Parameter '{name}': {lower} lower bounds, {upper} upper bounds and {value} values"
    )]
    ComponentCountMismatch {
        /// The name of the parameter.
        name: String,
        /// The number of lower bounds.
        lower: usize,
        /// The number of upper bounds.
        upper: usize,
        /// The number of values.
        value: usize,
    },

    /// A parameter requested by name is not in the space.
    #[error("Parameter '{name}' is not present in the space")]
    UnknownVariable {
        /// The name of the missing parameter.
        name: String,
    },

    /// A flat vector has the wrong length for this space.
    #[error("Expected a vector of dimension {expected}, got {got}")]
    DimensionMismatch {
        /// The expected dimension.
        expected: usize,
        /// The provided dimension.
        got: usize,
    },
}

/// Errors raised by interpolation and quadrature routines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpolationError {
    /// Fewer data points than required.
    #[error("Insufficient data points: got {got}, need at least {need}")]
    InsufficientData {
        /// The number of points provided.
        got: usize,
        /// The minimum number required.
        need: usize,
    },

    /// Abscissa and ordinate lengths differ.
    #[error("Mismatched lengths: {xs} abscissae vs {ys} ordinates")]
    MismatchedLengths {
        /// The number of abscissae.
        xs: usize,
        /// The number of ordinates.
        ys: usize,
    },

    /// The mesh is neither monotonically increasing nor decreasing.
    #[error("The mesh is not monotonic")]
    NonMonotonicMesh,

    /// The requested point lies outside the data domain.
    ///
    /// Extrapolation is forbidden; integrated metrics require the model
    /// mesh to cover the reference mesh.
    #[error("Point {x} outside interpolation domain [{lower}, {upper}]")]
    OutOfDomain {
        /// The requested abscissa.
        x: f64,
        /// The lower end of the domain.
        lower: f64,
        /// The upper end of the domain.
        upper: f64,
    },
}

/// Errors raised by a [`crate::traits::Discipline`] execution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DisciplineError {
    /// A required input is missing.
    #[error("Discipline '{discipline}': missing input '{name}'")]
    MissingInput {
        /// The name of the discipline.
        discipline: String,
        /// The name of the missing input.
        name: String,
    },

    /// An input has an unexpected number of components.
    #[error("Discipline '{discipline}': input '{name}' has {got} components, expected {expected}")]
    InvalidInputSize {
        /// The name of the discipline.
        discipline: String,
        /// The name of the offending input.
        name: String,
        /// The number of components provided.
        got: usize,
        /// The number of components expected.
        expected: usize,
    },

    /// The model failed for a reason of its own.
    #[error("Discipline '{discipline}' failed: {message}")]
    ExecutionFailure {
        /// The name of the discipline.
        discipline: String,
        /// A description of the failure.
        message: String,
    },
}

impl DisciplineError {
    /// Create a missing-input error.
    pub fn missing_input(discipline: impl Into<String>, name: impl Into<String>) -> Self {
        DisciplineError::MissingInput {
            discipline: discipline.into(),
            name: name.into(),
        }
    }

    /// Create an execution-failure error.
    pub fn execution_failure(discipline: impl Into<String>, message: impl Into<String>) -> Self {
        DisciplineError::ExecutionFailure {
            discipline: discipline.into(),
            message: message.into(),
        }
    }
}

/// Errors raised by an optimization driver or by the functions it evaluates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DriverError {
    /// The objective or a constraint function failed at a point.
    #[error("Function evaluation failed: {message}")]
    EvaluationFailure {
        /// A description of the failure.
        message: String,
    },

    /// The driver exhausted its iteration budget without any evaluation.
    #[error("No candidate point could be evaluated (budget: {max_iter})")]
    NoEvaluation {
        /// The iteration budget.
        max_iter: usize,
    },

    /// No evaluated point satisfied the constraints.
    #[error("No feasible point among {evaluated} evaluated candidates")]
    Infeasible {
        /// The number of evaluated candidates.
        evaluated: usize,
    },

    /// The driver was given an empty sample plan.
    #[error("The driver received no sample to evaluate")]
    EmptySamples,
}

impl DriverError {
    /// Create an evaluation-failure error.
    pub fn evaluation_failure(message: impl Into<String>) -> Self {
        DriverError::EvaluationFailure {
            message: message.into(),
        }
    }
}
