//! Solver configuration.

use crate::error::RegressionError;

/// Configuration of the orthogonal distance regression.
///
/// # Example
///
/// ```
/// use emsr_regression::OdrConfig;
///
/// let config = OdrConfig::new()
///     .with_max_iterations(500)
///     .with_initial_beta(vec![0.5, 1.0]);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OdrConfig {
    max_iterations: u64,
    /// Starting coefficients; `None` means an ordinary least-squares polyfit.
    initial_beta: Option<Vec<f64>>,
    /// Convergence threshold on the spread of simplex costs.
    sd_tolerance: f64,
}

impl OdrConfig {
    /// Creates a configuration with defaults.
    ///
    /// Defaults: `max_iterations = 3000`, polyfit initial guess,
    /// `sd_tolerance = 1e-10`.
    pub fn new() -> Self {
        Self {
            max_iterations: 3000,
            initial_beta: None,
            sd_tolerance: 1e-10,
        }
    }

    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the starting coefficients, in ascending powers.
    pub fn with_initial_beta(mut self, beta: Vec<f64>) -> Self {
        self.initial_beta = Some(beta);
        self
    }

    /// Sets the convergence tolerance.
    pub fn with_sd_tolerance(mut self, sd_tolerance: f64) -> Self {
        self.sd_tolerance = sd_tolerance;
        self
    }

    /// Returns the iteration cap.
    pub fn max_iterations(&self) -> u64 {
        self.max_iterations
    }

    /// Returns the starting coefficients, if set.
    pub fn initial_beta(&self) -> Option<&[f64]> {
        self.initial_beta.as_deref()
    }

    /// Returns the convergence tolerance.
    pub fn sd_tolerance(&self) -> f64 {
        self.sd_tolerance
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), RegressionError> {
        if self.max_iterations < 1 {
            return Err(RegressionError::InvalidMaxIterations {
                value: self.max_iterations,
            });
        }
        if !self.sd_tolerance.is_finite() || self.sd_tolerance <= 0.0 {
            return Err(RegressionError::InvalidTolerance {
                value: self.sd_tolerance,
            });
        }
        if self
            .initial_beta
            .as_ref()
            .is_some_and(|beta| beta.iter().any(|b| !b.is_finite()))
        {
            return Err(RegressionError::NonFiniteInput {
                input: "initial_beta",
            });
        }
        Ok(())
    }
}

impl Default for OdrConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = OdrConfig::default();
        assert_eq!(cfg.max_iterations(), 3000);
        assert_eq!(cfg.initial_beta(), None);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_invalid() {
        assert!(OdrConfig::new().with_max_iterations(0).validate().is_err());
        assert!(OdrConfig::new().with_sd_tolerance(0.0).validate().is_err());
        assert!(
            OdrConfig::new()
                .with_initial_beta(vec![f64::NAN, 1.0])
                .validate()
                .is_err()
        );
    }
}
