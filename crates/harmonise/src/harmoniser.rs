//! Formula registry and path finding.

use std::collections::HashSet;

use emsr_catalogue::MagnitudeMeasure;
use tracing::{debug, info};

use crate::config::HarmoniserConfig;
use crate::error::HarmoniseError;
use crate::formula::ConversionFormula;
use crate::result::HarmoniserResult;

/// Converts measures to a target scale by chaining registered formulas.
///
/// # Example
///
/// ```
/// use emsr_catalogue::Filter;
/// use emsr_harmonise::{ConversionFormula, Harmoniser, HarmoniserConfig};
///
/// let mut harmoniser = Harmoniser::new(HarmoniserConfig::default()).unwrap();
/// harmoniser
///     .add_formula(ConversionFormula::polynomial(
///         "ms->mw",
///         vec![2.0, 0.67],
///         0.2,
///         Filter::scales(["MS"]),
///         "Mw",
///     ))
///     .unwrap();
/// assert_eq!(harmoniser.formulas().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Harmoniser {
    config: HarmoniserConfig,
    formulas: Vec<ConversionFormula>,
}

impl Harmoniser {
    /// Creates an empty harmoniser.
    ///
    /// # Errors
    ///
    /// Configuration validation errors.
    pub fn new(config: HarmoniserConfig) -> Result<Self, HarmoniseError> {
        config.validate()?;
        Ok(Self {
            config,
            formulas: Vec::new(),
        })
    }

    pub fn config(&self) -> &HarmoniserConfig {
        &self.config
    }

    /// Registered formulas in registration order.
    pub fn formulas(&self) -> &[ConversionFormula] {
        &self.formulas
    }

    /// Registers a formula.
    ///
    /// # Errors
    ///
    /// [`HarmoniseError::InvalidModelError`] for a negative or non-finite
    /// model error.
    pub fn add_formula(&mut self, formula: ConversionFormula) -> Result<(), HarmoniseError> {
        formula.validate()?;
        debug!(
            formula = formula.name(),
            target = formula.target_scale(),
            "registered formula"
        );
        self.formulas.push(formula);
        Ok(())
    }

    /// Finds a chain of formulas converting `measure` to `target`.
    ///
    /// A directly applicable formula wins. Otherwise the formula graph is
    /// searched depth first, most recently pushed branch first, and the
    /// first chain landing on `target` is returned. A formula applied to a
    /// scale it was already applied on is a dead end, so cyclic formula sets
    /// terminate. Formulas rejected by their domain are not marked.
    pub fn find_formulas_for(
        &self,
        measure: &MagnitudeMeasure,
        target: &str,
    ) -> Option<Vec<&ConversionFormula>> {
        let mut to_target = self.formulas.iter().filter(|f| f.target_scale() == target).peekable();
        to_target.peek()?;
        if let Some(direct) = to_target.find(|f| f.is_applicable(measure)) {
            return Some(vec![direct]);
        }

        let mut seen: HashSet<(usize, String)> = HashSet::new();
        let mut stack: Vec<(Vec<usize>, MagnitudeMeasure)> = Vec::new();
        self.expand(&[], measure, &mut seen, &mut stack);

        while let Some((path, current)) = stack.pop() {
            if current.scale() == target {
                debug!(measure = %measure.id(), hops = path.len(), "formula chain found");
                return Some(path.into_iter().map(|i| &self.formulas[i]).collect());
            }
            self.expand(&path, &current, &mut seen, &mut stack);
        }
        None
    }

    /// Pushes every applicable formula not yet applied on the scale of
    /// `current`, applied.
    fn expand(
        &self,
        path: &[usize],
        current: &MagnitudeMeasure,
        seen: &mut HashSet<(usize, String)>,
        stack: &mut Vec<(Vec<usize>, MagnitudeMeasure)>,
    ) {
        for (i, formula) in self.formulas.iter().enumerate() {
            if !formula.is_applicable(current) {
                continue;
            }
            if !seen.insert((i, current.scale().to_string())) {
                continue;
            }
            let Ok(next) = formula.apply(current, self.config.default_uncertainty()) else {
                continue;
            };
            let mut extended = path.to_vec();
            extended.push(i);
            stack.push((extended, next));
        }
    }

    /// Converts every measure to `target`.
    ///
    /// Measures without a chain are recorded as unconverted, unless they
    /// are already on `target` and trivial conversion is allowed.
    ///
    /// # Errors
    ///
    /// [`HarmoniseError::AlreadyConverted`] if a measure appears twice.
    #[tracing::instrument(skip(self, measures), fields(formulas = self.formulas.len()))]
    pub fn harmonise<I>(&self, measures: I, target: &str) -> Result<HarmoniserResult, HarmoniseError>
    where
        I: IntoIterator<Item = MagnitudeMeasure>,
    {
        let default_uncertainty = self.config.default_uncertainty();
        let mut result = HarmoniserResult::new();
        for measure in measures {
            let conversion = match self.find_formulas_for(&measure, target) {
                Some(chain) => Some(apply_chain(&chain, &measure, default_uncertainty)?),
                None if self.config.allow_trivial_conversion() && measure.scale() == target => {
                    let identity = ConversionFormula::identity(target);
                    Some(apply_chain(&[&identity], &measure, default_uncertainty)?)
                }
                None => None,
            };
            result.append(measure, conversion)?;
        }
        info!(
            converted = result.converted_count(),
            unconverted = result.unconverted().len(),
            "harmonisation complete"
        );
        Ok(result)
    }
}

fn apply_chain(
    chain: &[&ConversionFormula],
    measure: &MagnitudeMeasure,
    default_uncertainty: f64,
) -> Result<(MagnitudeMeasure, Vec<String>), HarmoniseError> {
    let mut current = measure.clone();
    for formula in chain {
        current = formula.apply(&current, default_uncertainty)?;
    }
    let names = chain.iter().map(|f| f.name().to_string()).collect();
    Ok((current, names))
}
