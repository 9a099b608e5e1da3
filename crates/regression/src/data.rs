//! Validated regression input.

use crate::error::RegressionError;

/// Minimum number of paired samples accepted for a fit.
pub const MIN_SAMPLES: usize = 3;

/// Paired native/target values with their standard errors.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionData {
    native: Vec<f64>,
    native_sigma: Vec<f64>,
    target: Vec<f64>,
    target_sigma: Vec<f64>,
}

impl RegressionData {
    /// Validates and stores the four arrays.
    ///
    /// # Errors
    ///
    /// - [`RegressionError::LengthMismatch`] if the arrays differ in length.
    /// - [`RegressionError::NotEnoughSamples`] below [`MIN_SAMPLES`] pairs.
    /// - [`RegressionError::NonFiniteInput`] for NaN or infinite entries.
    /// - [`RegressionError::NonPositiveSigma`] for a zero or negative sigma.
    pub fn new(
        native: Vec<f64>,
        native_sigma: Vec<f64>,
        target: Vec<f64>,
        target_sigma: Vec<f64>,
    ) -> Result<Self, RegressionError> {
        let n = native.len();
        for (input, values) in [
            ("native_sigma", &native_sigma),
            ("target", &target),
            ("target_sigma", &target_sigma),
        ] {
            if values.len() != n {
                return Err(RegressionError::LengthMismatch {
                    input,
                    got: values.len(),
                    expected: n,
                });
            }
        }
        if n < MIN_SAMPLES {
            return Err(RegressionError::NotEnoughSamples { n, min: MIN_SAMPLES });
        }
        for (input, values) in [
            ("native", &native),
            ("native_sigma", &native_sigma),
            ("target", &target),
            ("target_sigma", &target_sigma),
        ] {
            if values.iter().any(|v| !v.is_finite()) {
                return Err(RegressionError::NonFiniteInput { input });
            }
        }
        for (input, sigma) in [("native_sigma", &native_sigma), ("target_sigma", &target_sigma)] {
            if let Some(index) = sigma.iter().position(|&s| s <= 0.0) {
                return Err(RegressionError::NonPositiveSigma { input, index });
            }
        }
        Ok(Self {
            native,
            native_sigma,
            target,
            target_sigma,
        })
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.native.len()
    }

    /// Always `false`; construction requires [`MIN_SAMPLES`] pairs.
    pub fn is_empty(&self) -> bool {
        self.native.is_empty()
    }

    pub fn native(&self) -> &[f64] {
        &self.native
    }

    pub fn native_sigma(&self) -> &[f64] {
        &self.native_sigma
    }

    pub fn target(&self) -> &[f64] {
        &self.target
    }

    pub fn target_sigma(&self) -> &[f64] {
        &self.target_sigma
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ones(n: usize) -> Vec<f64> {
        vec![1.0; n]
    }

    #[test]
    fn two_samples_are_not_enough() {
        let err = RegressionData::new(ones(2), ones(2), ones(2), ones(2)).unwrap_err();
        assert_eq!(err, RegressionError::NotEnoughSamples { n: 2, min: 3 });
        assert!(RegressionData::new(ones(3), ones(3), ones(3), ones(3)).is_ok());
    }

    #[test]
    fn length_mismatch() {
        let err = RegressionData::new(ones(4), ones(4), ones(4), ones(3)).unwrap_err();
        assert!(matches!(
            err,
            RegressionError::LengthMismatch {
                input: "target_sigma",
                got: 3,
                expected: 4
            }
        ));
    }

    #[test]
    fn non_finite_values() {
        let mut target = ones(3);
        target[1] = f64::NAN;
        let err = RegressionData::new(ones(3), ones(3), target, ones(3)).unwrap_err();
        assert_eq!(err, RegressionError::NonFiniteInput { input: "target" });
    }

    #[test]
    fn zero_sigma() {
        let err = RegressionData::new(ones(3), vec![0.1, 0.0, 0.1], ones(3), ones(3)).unwrap_err();
        assert_eq!(
            err,
            RegressionError::NonPositiveSigma {
                input: "native_sigma",
                index: 1
            }
        );
    }
}
