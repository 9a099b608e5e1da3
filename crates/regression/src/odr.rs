//! Orthogonal distance regression.
//!
//! For coefficients `beta` the weighted orthogonal sum of squares is
//!
//! ```text
//! S(beta) = sum_i min_d [ (y_i - f(x_i + d))^2 / sy_i^2 + d^2 / sx_i^2 ]
//! ```
//!
//! The inner minimisation over the per-point input correction `d` is a
//! one-dimensional Gauss-Newton solve; the outer minimisation over `beta`
//! uses the `argmin` Nelder-Mead solver.

use argmin::core::{CostFunction, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::neldermead::NelderMead;
use tracing::{debug, info, warn};

use crate::config::OdrConfig;
use crate::data::RegressionData;
use crate::error::RegressionError;
use crate::fit::{FittedModel, StopReason};
use crate::model::{ModelKind, evaluate, slope};
use crate::polyfit::polyfit;

const INNER_MAX_STEPS: usize = 50;
const INNER_HALVINGS: usize = 20;

/// A model bound to its data, ready to be fitted once.
///
/// # Example
///
/// ```
/// use emsr_regression::{ModelKind, RegressionData, RegressionModel};
///
/// let x = vec![4.0, 4.5, 5.0, 5.5, 6.0];
/// let y: Vec<f64> = x.iter().map(|v| 0.7 + 0.9 * v).collect();
/// let data = RegressionData::new(x, vec![0.1; 5], y, vec![0.1; 5]).unwrap();
///
/// let fit = RegressionModel::new(ModelKind::Linear, data).run().unwrap();
/// assert!((fit.beta()[1] - 0.9).abs() < 1e-4);
/// ```
#[derive(Debug, Clone)]
pub struct RegressionModel {
    kind: ModelKind,
    data: RegressionData,
    config: OdrConfig,
}

impl RegressionModel {
    /// Binds `kind` to `data` with the default solver configuration.
    pub fn new(kind: ModelKind, data: RegressionData) -> Self {
        Self {
            kind,
            data,
            config: OdrConfig::default(),
        }
    }

    /// Replaces the solver configuration.
    pub fn with_config(mut self, config: OdrConfig) -> Self {
        self.config = config;
        self
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn data(&self) -> &RegressionData {
        &self.data
    }

    /// Fits the model. Consumes it, so a model is fitted exactly once.
    ///
    /// # Errors
    ///
    /// - Configuration and model validation errors.
    /// - [`RegressionError::TooManyParameters`] if `n <= k`.
    /// - [`RegressionError::SingularPolyfit`] if no initial guess can be made.
    /// - [`RegressionError::RegressionFailed`] unless the solver stops on
    ///   sum-of-squares convergence.
    #[tracing::instrument(skip(self), fields(model = %self.kind, n = self.data.len()))]
    pub fn run(self) -> Result<FittedModel, RegressionError> {
        self.kind.validate()?;
        self.config.validate()?;
        let n = self.data.len();
        let k = self.kind.parameter_count();
        if n <= k {
            return Err(RegressionError::TooManyParameters { n, k });
        }

        let initial = match self.config.initial_beta() {
            Some(beta) if beta.len() != k => {
                return Err(RegressionError::InitialBetaMismatch {
                    got: beta.len(),
                    expected: k,
                });
            }
            Some(beta) => beta.to_vec(),
            None => polyfit(self.data.native(), self.data.target(), self.kind.order())?,
        };
        debug!(?initial, "initial coefficients");

        let cost = OdrCost { data: &self.data };
        let solver = NelderMead::new(simplex(&initial))
            .with_sd_tolerance(self.config.sd_tolerance())
            .map_err(|e| RegressionError::RegressionFailed {
                reason: e.to_string(),
            })?;
        let result = Executor::new(cost, solver)
            .configure(|state| state.max_iters(self.config.max_iterations()))
            .run()
            .map_err(|e| RegressionError::RegressionFailed {
                reason: e.to_string(),
            })?;

        let state = result.state();
        let iterations = state.get_iter();
        let stop_reason = match state.get_termination_status() {
            TerminationStatus::Terminated(TerminationReason::SolverConverged) => {
                StopReason::SumOfSquaresConvergence
            }
            TerminationStatus::Terminated(TerminationReason::MaxItersReached) => {
                StopReason::IterationLimit
            }
            other => StopReason::Other(format!("{other:?}")),
        };
        if stop_reason != StopReason::SumOfSquaresConvergence {
            warn!(%stop_reason, iterations, "regression did not converge");
            return Err(RegressionError::RegressionFailed {
                reason: stop_reason.to_string(),
            });
        }
        let beta = state
            .best_param
            .clone()
            .ok_or_else(|| RegressionError::RegressionFailed {
                reason: "solver returned no parameters".to_string(),
            })?;

        let sum_of_squares = weighted_sum_of_squares(&self.data, &beta);
        let fit = FittedModel::new(self.kind, beta, sum_of_squares, n, iterations, stop_reason);
        info!(
            beta = ?fit.beta(),
            residual = fit.residual(),
            iterations,
            "regression converged"
        );
        Ok(fit)
    }
}

/// Initial simplex: the guess plus one vertex per coordinate, perturbed by
/// 5% (or 0.00025 for a zero coordinate).
fn simplex(initial: &[f64]) -> Vec<Vec<f64>> {
    let mut vertices = Vec::with_capacity(initial.len() + 1);
    vertices.push(initial.to_vec());
    for i in 0..initial.len() {
        let mut vertex = initial.to_vec();
        vertex[i] = if vertex[i] == 0.0 {
            0.00025
        } else {
            vertex[i] * 1.05
        };
        vertices.push(vertex);
    }
    vertices
}

/// Weighted orthogonal sum of squares at `beta`.
pub(crate) fn weighted_sum_of_squares(data: &RegressionData, beta: &[f64]) -> f64 {
    (0..data.len())
        .map(|i| {
            let point = Point {
                x: data.native()[i],
                y: data.target()[i],
                wx: data.native_sigma()[i].powi(-2),
                wy: data.target_sigma()[i].powi(-2),
            };
            point.cost(beta, point.best_delta(beta))
        })
        .sum()
}

struct Point {
    x: f64,
    y: f64,
    /// Weight `1 / sx^2`.
    wx: f64,
    /// Weight `1 / sy^2`.
    wy: f64,
}

impl Point {
    fn cost(&self, beta: &[f64], delta: f64) -> f64 {
        let r = self.y - evaluate(beta, self.x + delta);
        self.wy * r * r + self.wx * delta * delta
    }

    /// Minimises the point cost over the input correction by Gauss-Newton
    /// with step halving.
    fn best_delta(&self, beta: &[f64]) -> f64 {
        let mut delta = 0.0;
        let mut current = self.cost(beta, delta);
        for _ in 0..INNER_MAX_STEPS {
            let r = self.y - evaluate(beta, self.x + delta);
            let d = slope(beta, self.x + delta);
            // normal equation of the 2-residual system [sqrt(wy) r, sqrt(wx) delta]
            let step = (self.wy * d * r - self.wx * delta) / (self.wy * d * d + self.wx);

            let mut scale = 1.0;
            let mut accepted = None;
            for _ in 0..INNER_HALVINGS {
                let candidate = delta + scale * step;
                let cost = self.cost(beta, candidate);
                if cost <= current {
                    accepted = Some((candidate, cost));
                    break;
                }
                scale *= 0.5;
            }
            let Some((candidate, cost)) = accepted else {
                break;
            };
            let moved = (candidate - delta).abs();
            delta = candidate;
            current = cost;
            if moved <= 1e-12 * (1.0 + delta.abs()) {
                break;
            }
        }
        delta
    }
}

struct OdrCost<'a> {
    data: &'a RegressionData,
}

impl CostFunction for OdrCost<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, beta: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        let s = weighted_sum_of_squares(self.data, beta);
        Ok(if s.is_finite() { s } else { f64::MAX })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn data(x: Vec<f64>, y: Vec<f64>, sx: f64, sy: f64) -> RegressionData {
        let n = x.len();
        RegressionData::new(x, vec![sx; n], y, vec![sy; n]).unwrap()
    }

    #[test]
    fn inner_solve_is_exact_for_a_line() {
        // line y = x, point (0, 2), equal weights: closest point is (1, 1)
        let p = Point {
            x: 0.0,
            y: 2.0,
            wx: 1.0,
            wy: 1.0,
        };
        let beta = [0.0, 1.0];
        let delta = p.best_delta(&beta);
        assert_abs_diff_eq!(delta, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.cost(&beta, delta), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn inner_solve_curved_model() {
        let p = Point {
            x: 1.0,
            y: 3.0,
            wx: 4.0,
            wy: 1.0,
        };
        let beta = [0.0, 0.0, 1.0];
        let delta = p.best_delta(&beta);
        // stationarity of the point cost
        let r = p.y - evaluate(&beta, p.x + delta);
        let gradient = -2.0 * p.wy * r * slope(&beta, p.x + delta) + 2.0 * p.wx * delta;
        assert_abs_diff_eq!(gradient, 0.0, epsilon = 1e-8);
    }

    #[test]
    fn perfect_line_is_recovered() {
        let x = vec![3.5, 4.0, 4.5, 5.0, 5.5, 6.0];
        let y: Vec<f64> = x.iter().map(|v| -0.3 + 1.1 * v).collect();
        let fit = RegressionModel::new(ModelKind::Linear, data(x, y, 0.2, 0.1))
            .run()
            .unwrap();
        assert_abs_diff_eq!(fit.beta()[0], -0.3, epsilon = 1e-4);
        assert_abs_diff_eq!(fit.beta()[1], 1.1, epsilon = 1e-4);
        assert!(fit.sum_of_squares() < 1e-8);
        assert_eq!(fit.stop_reason(), &StopReason::SumOfSquaresConvergence);
    }

    #[test]
    fn iteration_limit_is_a_failure() {
        let x = vec![3.0, 4.0, 5.0, 6.0, 7.0];
        let y = vec![3.2, 3.9, 5.3, 5.8, 7.1];
        let config = OdrConfig::new()
            .with_max_iterations(2)
            .with_initial_beta(vec![10.0, -3.0]);
        let err = RegressionModel::new(ModelKind::Linear, data(x, y, 0.1, 0.1))
            .with_config(config)
            .run()
            .unwrap_err();
        assert_eq!(
            err,
            RegressionError::RegressionFailed {
                reason: StopReason::IterationLimit.to_string()
            }
        );
    }

    #[test]
    fn initial_beta_length_is_checked() {
        let x = vec![3.0, 4.0, 5.0];
        let y = vec![3.0, 4.0, 5.0];
        let err = RegressionModel::new(ModelKind::Linear, data(x, y, 0.1, 0.1))
            .with_config(OdrConfig::new().with_initial_beta(vec![1.0]))
            .run()
            .unwrap_err();
        assert_eq!(
            err,
            RegressionError::InitialBetaMismatch {
                got: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn too_many_parameters() {
        let x = vec![3.0, 4.0, 5.0];
        let y = vec![3.0, 4.0, 5.0];
        let err = RegressionModel::new(ModelKind::Polynomial { order: 2 }, data(x, y, 0.1, 0.1))
            .run()
            .unwrap_err();
        assert_eq!(err, RegressionError::TooManyParameters { n: 3, k: 3 });
    }

    #[test]
    fn simplex_perturbs_each_coordinate() {
        let s = simplex(&[0.0, 2.0]);
        assert_eq!(s, vec![vec![0.0, 2.0], vec![0.00025, 2.0], vec![0.0, 2.1]]);
    }
}
