//! Model families.

use std::fmt;

use serde::Serialize;

use crate::error::RegressionError;

/// Parametric form of `target = f(native; beta)`.
///
/// Coefficients are stored in ascending powers: `beta[i]` multiplies `x^i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelKind {
    /// `y = c0 + c1 x`.
    Linear,
    /// `y = c0 + c1 x + ... + c_order x^order`.
    Polynomial { order: usize },
}

impl ModelKind {
    /// Polynomial order of the model.
    pub fn order(self) -> usize {
        match self {
            ModelKind::Linear => 1,
            ModelKind::Polynomial { order } => order,
        }
    }

    /// Number of fitted coefficients.
    pub fn parameter_count(self) -> usize {
        self.order() + 1
    }

    pub fn validate(self) -> Result<(), RegressionError> {
        if self.order() < 1 {
            return Err(RegressionError::InvalidOrder { order: self.order() });
        }
        Ok(())
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Linear => f.write_str("linear"),
            ModelKind::Polynomial { order } => write!(f, "polynomial({order})"),
        }
    }
}

/// Evaluates the polynomial `beta` at `x` (Horner).
pub fn evaluate(beta: &[f64], x: f64) -> f64 {
    beta.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Evaluates the first derivative of the polynomial `beta` at `x`.
pub fn slope(beta: &[f64], x: f64) -> f64 {
    beta.iter()
        .enumerate()
        .skip(1)
        .rev()
        .fold(0.0, |acc, (i, &c)| acc * x + i as f64 * c)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn parameter_counts() {
        assert_eq!(ModelKind::Linear.parameter_count(), 2);
        assert_eq!(ModelKind::Polynomial { order: 3 }.parameter_count(), 4);
        assert!(ModelKind::Polynomial { order: 0 }.validate().is_err());
    }

    #[test]
    fn horner_evaluation() {
        // 1 + 2x + 3x^2 at x = 2
        assert_abs_diff_eq!(evaluate(&[1.0, 2.0, 3.0], 2.0), 17.0);
        // 2 + 6x at x = 2
        assert_abs_diff_eq!(slope(&[1.0, 2.0, 3.0], 2.0), 14.0);
        assert_abs_diff_eq!(slope(&[5.0], 2.0), 0.0);
    }

    #[test]
    fn display_names() {
        assert_eq!(ModelKind::Linear.to_string(), "linear");
        assert_eq!(
            ModelKind::Polynomial { order: 2 }.to_string(),
            "polynomial(2)"
        );
    }
}
