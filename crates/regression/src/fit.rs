//! Fitted model results and information criteria.

use std::fmt;

use serde::Serialize;

use crate::error::RegressionError;
use crate::model::{ModelKind, evaluate, slope};

/// Why the solver stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The spread of the simplex sums of squares fell below the tolerance.
    SumOfSquaresConvergence,
    /// `max_iterations` was reached first.
    IterationLimit,
    /// Any other solver termination.
    Other(String),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::SumOfSquaresConvergence => f.write_str("sum of squares convergence"),
            StopReason::IterationLimit => f.write_str("iteration limit reached"),
            StopReason::Other(reason) => f.write_str(reason),
        }
    }
}

/// Akaike information criteria of a fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Criteria {
    pub aic: f64,
    pub aicc: f64,
}

/// Computes AIC and AICc for `n` samples, `k` parameters and residual
/// variance `residual`.
///
/// `AIC = n ln(residual) + 2k`, `AICc = AIC + 2k(k+1) / (n - k - 1)`.
///
/// # Errors
///
/// [`RegressionError::CriterionUndefined`] if `n <= k + 1`.
///
/// # Example
///
/// ```
/// use emsr_regression::information_criteria;
///
/// let c = information_criteria(10, 2, 1.0).unwrap();
/// assert_eq!(c.aic, 4.0);
/// assert!((c.aicc - (4.0 + 12.0 / 7.0)).abs() < 1e-12);
/// assert!(information_criteria(3, 2, 1.0).is_err());
/// ```
pub fn information_criteria(n: usize, k: usize, residual: f64) -> Result<Criteria, RegressionError> {
    if n <= k + 1 {
        return Err(RegressionError::CriterionUndefined { n, k });
    }
    let aic = aic(n, k, residual);
    let (nf, kf) = (n as f64, k as f64);
    Ok(Criteria {
        aic,
        aicc: aic + 2.0 * kf * (kf + 1.0) / (nf - kf - 1.0),
    })
}

fn aic(n: usize, k: usize, residual: f64) -> f64 {
    n as f64 * residual.ln() + 2.0 * k as f64
}

/// A successfully fitted model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FittedModel {
    kind: ModelKind,
    beta: Vec<f64>,
    sum_of_squares: f64,
    residual: f64,
    sample_size: usize,
    iterations: u64,
    stop_reason: StopReason,
}

impl FittedModel {
    pub(crate) fn new(
        kind: ModelKind,
        beta: Vec<f64>,
        sum_of_squares: f64,
        sample_size: usize,
        iterations: u64,
        stop_reason: StopReason,
    ) -> Self {
        let dof = sample_size.saturating_sub(beta.len()).max(1);
        Self {
            kind,
            residual: sum_of_squares / dof as f64,
            beta,
            sum_of_squares,
            sample_size,
            iterations,
            stop_reason,
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    /// Coefficients in ascending powers.
    pub fn beta(&self) -> &[f64] {
        &self.beta
    }

    /// Residual variance: weighted sum of squares over `n - k`.
    pub fn residual(&self) -> f64 {
        self.residual
    }

    /// Weighted orthogonal sum of squares at the optimum.
    pub fn sum_of_squares(&self) -> f64 {
        self.sum_of_squares
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn parameter_count(&self) -> usize {
        self.beta.len()
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn stop_reason(&self) -> &StopReason {
        &self.stop_reason
    }

    /// Model prediction at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        evaluate(&self.beta, x)
    }

    /// Model slope at `x`.
    pub fn derivative(&self, x: f64) -> f64 {
        slope(&self.beta, x)
    }

    /// Akaike information criterion. Always defined.
    pub fn aic(&self) -> f64 {
        aic(self.sample_size, self.parameter_count(), self.residual)
    }

    /// AIC and AICc of this fit.
    ///
    /// # Errors
    ///
    /// [`RegressionError::CriterionUndefined`] if `n <= k + 1`.
    pub fn criterion_tests(&self) -> Result<Criteria, RegressionError> {
        information_criteria(self.sample_size, self.parameter_count(), self.residual)
    }
}
