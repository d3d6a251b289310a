//! The optimizer seam: problems handed to host-supplied drivers.
//!
//! The calibration layer shapes objective and constraint functions; solving
//! is delegated to implementations of [`OptimizationDriver`]. The workspace
//! ships DOE-style baseline drivers only; gradient-based or evolutionary
//! algorithms come from the host framework.

use crate::types::{DriverError, ParameterSpace};

/// A scalar function of a flat parameter vector.
pub type ObjectiveFn<'a> = Box<dyn Fn(&[f64]) -> Result<f64, DriverError> + 'a>;

/// The kind of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// `metric == value` within tolerance.
    Equality,
    /// `metric <= value` (or `>= value` when `positive`).
    Inequality,
}

/// A constraint attached to an optimization problem.
pub struct ConstraintFunction<'a> {
    /// The display name of the constraint.
    pub name: String,
    /// The kind of constraint.
    pub kind: ConstraintKind,
    /// The value for which the constraint is active.
    pub value: f64,
    /// For inequalities, whether the metric must be above `value`.
    pub positive: bool,
    /// The constraint function.
    pub function: ObjectiveFn<'a>,
}

/// Feasibility tolerance for equality constraints.
const EQ_TOLERANCE: f64 = 1e-9;

impl ConstraintFunction<'_> {
    /// Evaluate the constraint violation at a point (0 when satisfied).
    pub fn violation(&self, x: &[f64]) -> Result<f64, DriverError> {
        let value = (self.function)(x)?;
        let violation = match self.kind {
            ConstraintKind::Equality => {
                let gap = (value - self.value).abs();
                if gap <= EQ_TOLERANCE {
                    0.0
                } else {
                    gap
                }
            }
            ConstraintKind::Inequality if self.positive => (self.value - value).max(0.0),
            ConstraintKind::Inequality => (value - self.value).max(0.0),
        };
        Ok(violation)
    }

    /// Whether the constraint is satisfied at a point.
    pub fn is_satisfied(&self, x: &[f64]) -> Result<bool, DriverError> {
        Ok(self.violation(x)? <= EQ_TOLERANCE)
    }
}

/// An optimization problem shaped by the calibration layer.
///
/// The objective is always evaluated in its natural sense; the `maximize`
/// flag tells drivers which direction wins. [`OptimizationProblem::score`]
/// converts a raw objective value into a minimization score.
pub struct OptimizationProblem<'a> {
    /// The space of the optimization variables.
    pub space: &'a ParameterSpace,
    /// The objective function.
    pub objective: ObjectiveFn<'a>,
    /// Whether to maximize the objective.
    pub maximize: bool,
    /// The constraints of the problem.
    pub constraints: Vec<ConstraintFunction<'a>>,
}

impl<'a> OptimizationProblem<'a> {
    /// Create an unconstrained minimization problem.
    pub fn new(space: &'a ParameterSpace, objective: ObjectiveFn<'a>) -> Self {
        Self {
            space,
            objective,
            maximize: false,
            constraints: Vec::new(),
        }
    }

    /// Set the objective sense.
    pub fn with_maximize(mut self, maximize: bool) -> Self {
        self.maximize = maximize;
        self
    }

    /// Attach a constraint.
    pub fn add_constraint(&mut self, constraint: ConstraintFunction<'a>) {
        self.constraints.push(constraint);
    }

    /// Convert a raw objective value into a minimization score.
    pub fn score(&self, objective: f64) -> f64 {
        if self.maximize {
            -objective
        } else {
            objective
        }
    }

    /// Whether every constraint is satisfied at a point.
    pub fn is_feasible(&self, x: &[f64]) -> Result<bool, DriverError> {
        for constraint in &self.constraints {
            if !constraint.is_satisfied(x)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Settings common to all drivers.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverSettings {
    /// The maximum number of objective evaluations.
    pub max_iter: usize,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self { max_iter: 1000 }
    }
}

impl DriverSettings {
    /// Create settings with an evaluation budget.
    pub fn new(max_iter: usize) -> Self {
        Self { max_iter }
    }
}

/// One evaluated point of the optimization history.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRecord {
    /// The evaluated parameter vector.
    pub x: Vec<f64>,
    /// The raw objective value (in the problem's natural sense).
    pub objective: f64,
    /// Whether the point satisfied all constraints.
    pub feasible: bool,
}

/// The outcome of a driver run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    /// The best feasible parameter vector.
    pub x_opt: Vec<f64>,
    /// The objective at `x_opt`, in the problem's natural sense.
    pub f_opt: f64,
    /// The number of objective evaluations performed.
    pub n_evaluations: usize,
    /// The evaluation history in order.
    pub history: Vec<EvaluationRecord>,
}

impl std::fmt::Display for OptimizationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "OptimizationResult {{ f_opt: {:.6e}, evaluations: {} }}",
            self.f_opt, self.n_evaluations
        )
    }
}

/// A host-supplied optimizer.
///
/// Implementations explore the parameter space within the bounds of
/// `problem.space`, honour `problem.maximize` through
/// [`OptimizationProblem::score`], and skip infeasible points.
pub trait OptimizationDriver {
    /// The name of the driver, used in logs.
    fn name(&self) -> &str;

    /// Solve the problem within the settings budget.
    fn optimize(
        &self,
        problem: &OptimizationProblem<'_>,
        settings: &DriverSettings,
    ) -> Result<OptimizationResult, DriverError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> ParameterSpace {
        let mut space = ParameterSpace::new();
        space.add_variable("a", 0.0, 1.0, 0.5).unwrap();
        space
    }

    #[test]
    fn test_score_sense() {
        let space = space();
        let problem = OptimizationProblem::new(&space, Box::new(|x| Ok(x[0])));
        assert_eq!(problem.score(2.0), 2.0);
        let problem = problem.with_maximize(true);
        assert_eq!(problem.score(2.0), -2.0);
    }

    #[test]
    fn test_inequality_violation() {
        let constraint = ConstraintFunction {
            name: "c".into(),
            kind: ConstraintKind::Inequality,
            value: 0.5,
            positive: false,
            function: Box::new(|x| Ok(x[0])),
        };
        assert_eq!(constraint.violation(&[0.4]).unwrap(), 0.0);
        assert!((constraint.violation(&[0.7]).unwrap() - 0.2).abs() < 1e-12);
        assert!(constraint.is_satisfied(&[0.4]).unwrap());
        assert!(!constraint.is_satisfied(&[0.7]).unwrap());
    }

    #[test]
    fn test_positive_inequality() {
        let constraint = ConstraintFunction {
            name: "c".into(),
            kind: ConstraintKind::Inequality,
            value: 0.5,
            positive: true,
            function: Box::new(|x| Ok(x[0])),
        };
        assert!(constraint.is_satisfied(&[0.7]).unwrap());
        assert!(!constraint.is_satisfied(&[0.4]).unwrap());
    }

    #[test]
    fn test_equality_tolerance() {
        let constraint = ConstraintFunction {
            name: "c".into(),
            kind: ConstraintKind::Equality,
            value: 1.0,
            positive: false,
            function: Box::new(|x| Ok(x[0])),
        };
        assert!(constraint.is_satisfied(&[1.0 + 1e-12]).unwrap());
        assert!(!constraint.is_satisfied(&[1.1]).unwrap());
    }

    #[test]
    fn test_feasibility_over_constraints() {
        let space = space();
        let mut problem = OptimizationProblem::new(&space, Box::new(|x| Ok(x[0])));
        problem.add_constraint(ConstraintFunction {
            name: "c".into(),
            kind: ConstraintKind::Inequality,
            value: 0.5,
            positive: false,
            function: Box::new(|x| Ok(x[0])),
        });
        assert!(problem.is_feasible(&[0.2]).unwrap());
        assert!(!problem.is_feasible(&[0.8]).unwrap());
    }
}
