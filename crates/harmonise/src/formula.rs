//! Conversion formulas between magnitude scales.

use std::fmt;
use std::sync::Arc;

use emsr_catalogue::{Filter, MagnitudeMeasure};

use crate::error::HarmoniseError;

/// A value transform shared between clones of a formula.
pub type Transform = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

#[derive(Clone)]
enum Function {
    Identity,
    Polynomial(Vec<f64>),
    Custom(Transform),
}

impl Function {
    fn eval(&self, x: f64) -> f64 {
        match self {
            Function::Identity => x,
            Function::Polynomial(c) => c.iter().rev().fold(0.0, |acc, &ci| acc * x + ci),
            Function::Custom(f) => f(x),
        }
    }

    /// Central difference with step `1e-6 * max(1, |x|)`.
    fn derivative(&self, x: f64) -> f64 {
        if let Function::Identity = self {
            return 1.0;
        }
        let h = 1e-6 * x.abs().max(1.0);
        (self.eval(x + h) - self.eval(x - h)) / (2.0 * h)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Identity => f.write_str("Identity"),
            Function::Polynomial(c) => f.debug_tuple("Polynomial").field(c).finish(),
            Function::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A named transform from the measures in `domain` to `target_scale`.
///
/// The standard error of a converted measure combines the formula's model
/// error with the propagated input error:
///
/// ```text
/// se = sqrt(model_error^2 + f'(x)^2 * error^2)
/// ```
///
/// # Example
///
/// ```
/// use emsr_catalogue::Filter;
/// use emsr_harmonise::ConversionFormula;
///
/// let f = ConversionFormula::polynomial("mb->Mw", vec![-1.0, 1.2], 0.2, Filter::scales(["mb"]), "Mw");
/// assert_eq!(f.target_scale(), "Mw");
/// assert!((f.evaluate(5.0) - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct ConversionFormula {
    name: String,
    function: Function,
    model_error: f64,
    domain: Filter,
    target_scale: String,
}

impl ConversionFormula {
    /// Creates a formula from an arbitrary transform.
    pub fn new<F>(
        name: impl Into<String>,
        transform: F,
        model_error: f64,
        domain: Filter,
        target_scale: impl Into<String>,
    ) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            function: Function::Custom(Arc::new(transform)),
            model_error,
            domain,
            target_scale: target_scale.into(),
        }
    }

    /// Creates a polynomial formula, coefficients in ascending powers.
    pub fn polynomial(
        name: impl Into<String>,
        coefficients: Vec<f64>,
        model_error: f64,
        domain: Filter,
        target_scale: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            function: Function::Polynomial(coefficients),
            model_error,
            domain,
            target_scale: target_scale.into(),
        }
    }

    /// The trivial conversion of a measure already on `scale`.
    pub fn identity(scale: &str) -> Self {
        Self {
            name: format!("identity({scale})"),
            function: Function::Identity,
            model_error: 0.0,
            domain: Filter::scales([scale]),
            target_scale: scale.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model_error(&self) -> f64 {
        self.model_error
    }

    pub fn domain(&self) -> &Filter {
        &self.domain
    }

    pub fn target_scale(&self) -> &str {
        &self.target_scale
    }

    /// Polynomial coefficients, if this is a polynomial formula.
    pub fn coefficients(&self) -> Option<&[f64]> {
        match &self.function {
            Function::Polynomial(c) => Some(c),
            _ => None,
        }
    }

    /// Whether `measure` lies in the domain.
    pub fn is_applicable(&self, measure: &MagnitudeMeasure) -> bool {
        self.domain.matches(measure)
    }

    /// Raw value transform.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.function.eval(x)
    }

    /// Numerical first derivative of the transform.
    pub fn derivative(&self, x: f64) -> f64 {
        self.function.derivative(x)
    }

    /// Converts `measure`, using `default_uncertainty` when it reports no
    /// standard error.
    ///
    /// # Errors
    ///
    /// [`HarmoniseError::OutOfDomain`] if the measure is not in the domain.
    pub fn apply(
        &self,
        measure: &MagnitudeMeasure,
        default_uncertainty: f64,
    ) -> Result<MagnitudeMeasure, HarmoniseError> {
        if !self.is_applicable(measure) {
            return Err(HarmoniseError::OutOfDomain {
                formula: self.name.clone(),
                measure: measure.id().0,
                scale: measure.scale().to_string(),
                agency: measure.agency().to_string(),
            });
        }
        let x = measure.value();
        let error = measure.standard_error().unwrap_or(default_uncertainty);
        let d = self.derivative(x);
        let standard_error = self.model_error.hypot(d * error);
        Ok(measure.converted(&self.target_scale, self.evaluate(x), standard_error))
    }

    pub(crate) fn validate(&self) -> Result<(), HarmoniseError> {
        if !self.model_error.is_finite() || self.model_error < 0.0 {
            return Err(HarmoniseError::InvalidModelError {
                formula: self.name.clone(),
                value: self.model_error,
            });
        }
        Ok(())
    }
}
