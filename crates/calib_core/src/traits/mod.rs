//! Seams towards the host MDO framework.
//!
//! - [`Discipline`]: a simulation model evaluated sample by sample
//! - [`OptimizationDriver`]: a host-supplied optimizer consuming an
//!   [`OptimizationProblem`]

pub mod discipline;
pub mod driver;

pub use discipline::{DataMap, Discipline, DisciplineChain};
pub use driver::{
    ConstraintFunction, ConstraintKind, DriverSettings, EvaluationRecord, ObjectiveFn,
    OptimizationDriver, OptimizationProblem, OptimizationResult,
};
