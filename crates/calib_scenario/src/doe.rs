//! Sampling drivers evaluating the calibration problem over fixed points.

use calib_core::traits::{
    DriverSettings, EvaluationRecord, OptimizationDriver, OptimizationProblem,
    OptimizationResult,
};
use calib_core::types::DriverError;
use tracing::{debug, info};

/// Evaluate a list of points and keep the best feasible one.
fn evaluate_points<I>(
    problem: &OptimizationProblem<'_>,
    points: I,
    settings: &DriverSettings,
) -> Result<OptimizationResult, DriverError>
where
    I: IntoIterator<Item = Vec<f64>>,
{
    let mut history = Vec::new();
    let mut best: Option<(Vec<f64>, f64)> = None;
    for point in points.into_iter().take(settings.max_iter) {
        let objective = (problem.objective)(&point)?;
        let feasible = problem.is_feasible(&point)?;
        debug!(?point, objective, feasible, "evaluated sample");
        if feasible {
            let score = problem.score(objective);
            let improves = match &best {
                Some((_, best_score)) => score < *best_score,
                None => true,
            };
            if improves {
                best = Some((point.clone(), score));
            }
        }
        history.push(EvaluationRecord {
            x: point,
            objective,
            feasible,
        });
    }

    if history.is_empty() {
        return Err(DriverError::NoEvaluation {
            max_iter: settings.max_iter,
        });
    }
    let (x_opt, best_score) = best.ok_or(DriverError::Infeasible {
        evaluated: history.len(),
    })?;
    let f_opt = problem.score(best_score);
    info!(f_opt, evaluations = history.len(), "sampling finished");
    Ok(OptimizationResult {
        x_opt,
        f_opt,
        n_evaluations: history.len(),
        history,
    })
}

/// A driver evaluating user-supplied parameter vectors.
///
/// The best feasible sample wins; no new points are generated.
#[derive(Debug, Clone, Default)]
pub struct CustomDoeDriver {
    samples: Vec<Vec<f64>>,
}

impl CustomDoeDriver {
    /// Create a driver from the points to evaluate.
    pub fn new(samples: Vec<Vec<f64>>) -> Self {
        Self { samples }
    }
}

impl OptimizationDriver for CustomDoeDriver {
    fn name(&self) -> &str {
        "CustomDOE"
    }

    fn optimize(
        &self,
        problem: &OptimizationProblem<'_>,
        settings: &DriverSettings,
    ) -> Result<OptimizationResult, DriverError> {
        if self.samples.is_empty() {
            return Err(DriverError::EmptySamples);
        }
        evaluate_points(problem, self.samples.iter().cloned(), settings)
    }
}

/// A driver evaluating a regular grid over the parameter bounds.
///
/// Each dimension is discretised into the same number of levels; the grid is
/// walked in lexicographic order up to the evaluation budget.
#[derive(Debug, Clone)]
pub struct FullFactorialDriver {
    levels: usize,
}

impl FullFactorialDriver {
    /// Create a driver with a number of levels per dimension (at least 2).
    pub fn new(levels: usize) -> Self {
        Self {
            levels: levels.max(2),
        }
    }

    /// Decode the grid point at a lexicographic index (last dimension fastest).
    fn point(&self, mut index: usize, lower: &[f64], upper: &[f64]) -> Vec<f64> {
        let dimension = lower.len();
        let mut point = vec![0.0; dimension];
        for dim in (0..dimension).rev() {
            let level = index % self.levels;
            index /= self.levels;
            let t = level as f64 / (self.levels - 1) as f64;
            point[dim] = lower[dim] + t * (upper[dim] - lower[dim]);
        }
        point
    }

    /// Materialize the full grid by decoding every index (test helper;
    /// `optimize` generates points lazily).
    #[cfg(test)]
    fn grid(&self, lower: &[f64], upper: &[f64]) -> Vec<Vec<f64>> {
        let total = self.levels.pow(lower.len() as u32);
        (0..total)
            .map(|index| self.point(index, lower, upper))
            .collect()
    }
}

impl OptimizationDriver for FullFactorialDriver {
    fn name(&self) -> &str {
        "FullFactorial"
    }

    fn optimize(
        &self,
        problem: &OptimizationProblem<'_>,
        settings: &DriverSettings,
    ) -> Result<OptimizationResult, DriverError> {
        let lower = problem.space.lower_bounds();
        let upper = problem.space.upper_bounds();
        // levels^dimension can exceed usize; the grid is never materialized.
        let total = self
            .levels
            .checked_pow(lower.len() as u32)
            .unwrap_or(usize::MAX);
        let points =
            (0..total.min(settings.max_iter)).map(|index| self.point(index, &lower, &upper));
        evaluate_points(problem, points, settings)
    }
}
