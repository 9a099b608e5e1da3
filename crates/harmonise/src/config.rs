//! Harmoniser configuration.

use crate::error::HarmoniseError;

/// Configuration of a [`Harmoniser`](crate::Harmoniser).
///
/// # Example
///
/// ```
/// use emsr_harmonise::HarmoniserConfig;
///
/// let config = HarmoniserConfig::new()
///     .with_default_uncertainty(0.3)
///     .with_allow_trivial_conversion(false);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HarmoniserConfig {
    /// Standard error assumed for measures that report none.
    default_uncertainty: f64,
    /// Emit an identity conversion for measures already on the target scale.
    allow_trivial_conversion: bool,
}

impl HarmoniserConfig {
    /// Creates a configuration with defaults.
    ///
    /// Defaults: `default_uncertainty = 0.2`, `allow_trivial_conversion = true`.
    pub fn new() -> Self {
        Self {
            default_uncertainty: 0.2,
            allow_trivial_conversion: true,
        }
    }

    /// Sets the default uncertainty.
    pub fn with_default_uncertainty(mut self, default_uncertainty: f64) -> Self {
        self.default_uncertainty = default_uncertainty;
        self
    }

    /// Enables or disables identity conversions.
    pub fn with_allow_trivial_conversion(mut self, allow: bool) -> Self {
        self.allow_trivial_conversion = allow;
        self
    }

    /// Returns the default uncertainty.
    pub fn default_uncertainty(&self) -> f64 {
        self.default_uncertainty
    }

    /// Returns whether identity conversions are emitted.
    pub fn allow_trivial_conversion(&self) -> bool {
        self.allow_trivial_conversion
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), HarmoniseError> {
        if !self.default_uncertainty.is_finite() || self.default_uncertainty < 0.0 {
            return Err(HarmoniseError::InvalidUncertainty {
                value: self.default_uncertainty,
            });
        }
        Ok(())
    }
}

impl Default for HarmoniserConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = HarmoniserConfig::default();
        assert_eq!(cfg.default_uncertainty(), 0.2);
        assert!(cfg.allow_trivial_conversion());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_builder_chaining() {
        let cfg = HarmoniserConfig::new()
            .with_default_uncertainty(0.0)
            .with_allow_trivial_conversion(false);
        assert_eq!(cfg.default_uncertainty(), 0.0);
        assert!(!cfg.allow_trivial_conversion());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_invalid_uncertainty() {
        for value in [-0.1, f64::NAN, f64::INFINITY] {
            let cfg = HarmoniserConfig::new().with_default_uncertainty(value);
            assert!(cfg.validate().is_err());
        }
    }
}
