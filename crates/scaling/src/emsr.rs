//! Grouping, pair selection and model fitting for one measure collection.

use emsr_catalogue::{EventSiblings, MeasureCollection};
use emsr_grouping::{GroupingStrategy, Groups};
use emsr_regression::{MIN_SAMPLES, ModelKind, OdrConfig, RegressionData, RegressionModel};
use emsr_selection::{MatchedPairs, MissingUncertainty, SelectionStrategy};
use tracing::{info, warn};

use crate::error::ScalingError;
use crate::outcome::{EmsrOutcome, ScalingRelationship};

/// A grouped measure collection, ready to derive scaling relationships.
///
/// Grouping happens once, in [`Emsr::new`]; every scale pair fitted
/// afterwards reuses the groups.
///
/// # Example
///
/// ```
/// use emsr_catalogue::MeasureCollection;
/// use emsr_grouping::GroupingStrategy;
/// use emsr_scaling::Emsr;
///
/// let emsr = Emsr::new(MeasureCollection::new(Vec::new()), GroupingStrategy::ByEvent).unwrap();
/// assert!(emsr.groups().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Emsr {
    measures: MeasureCollection,
    grouping: GroupingStrategy,
    groups: Groups,
}

impl Emsr {
    /// Groups `measures` with `grouping`.
    ///
    /// # Errors
    ///
    /// Invalid grouping parameters.
    pub fn new(measures: MeasureCollection, grouping: GroupingStrategy) -> Result<Self, ScalingError> {
        let groups = grouping.group_measures(&measures)?;
        Ok(Self {
            measures,
            grouping,
            groups,
        })
    }

    pub fn measures(&self) -> &MeasureCollection {
        &self.measures
    }

    pub fn grouping(&self) -> &GroupingStrategy {
        &self.grouping
    }

    pub fn groups(&self) -> &Groups {
        &self.groups
    }

    /// Selects matched `(native, target)` pairs from the groups.
    pub fn select_pairs(
        &self,
        native: &str,
        target: &str,
        selection: &SelectionStrategy,
        missing: &MissingUncertainty,
        siblings: &dyn EventSiblings,
    ) -> Result<MatchedPairs, ScalingError> {
        Ok(selection.select(&self.groups, native, target, missing, siblings)?)
    }

    /// Fits every model in `models` to the pairs selected for
    /// `native -> target`.
    ///
    /// A model that fails is logged and recorded in the outcome; the call
    /// only fails if every model does.
    ///
    /// # Errors
    ///
    /// - [`ScalingError::NoModels`] if `models` is empty.
    /// - [`ScalingError::NotEnoughSamples`] for fewer than three pairs.
    /// - [`ScalingError::AllModelsFailed`] if no model fitted.
    /// - Selection and regression configuration errors.
    #[allow(clippy::too_many_arguments)]
    #[tracing::instrument(skip(self, selection, missing, siblings, models, config))]
    pub fn apply_regression_model(
        &self,
        native: &str,
        target: &str,
        selection: &SelectionStrategy,
        missing: &MissingUncertainty,
        siblings: &dyn EventSiblings,
        models: &[ModelKind],
        config: &OdrConfig,
    ) -> Result<EmsrOutcome, ScalingError> {
        if models.is_empty() {
            return Err(ScalingError::NoModels);
        }
        config.validate()?;

        let pairs = self.select_pairs(native, target, selection, missing, siblings)?;
        if pairs.len() < MIN_SAMPLES {
            return Err(ScalingError::NotEnoughSamples {
                native: native.to_string(),
                target: target.to_string(),
                pairs: pairs.len(),
                min: MIN_SAMPLES,
            });
        }
        info!(pairs = pairs.len(), "selected matched pairs");

        let data = RegressionData::new(
            pairs.native_values(),
            pairs.native_errors(),
            pairs.target_values(),
            pairs.target_errors(),
        )?;

        let mut outcome = EmsrOutcome::new(
            native,
            target,
            self.grouping.name(),
            selection.name(),
            &pairs,
        );
        for &kind in models {
            let model = RegressionModel::new(kind, data.clone()).with_config(config.clone());
            match model.run() {
                Ok(fit) => outcome.push_fit(ScalingRelationship::new(native, target, fit)),
                Err(e) => {
                    warn!(model = %kind, error = %e, "model failed");
                    outcome.push_failure(kind, e.to_string());
                }
            }
        }

        if outcome.relationships().is_empty() {
            return Err(ScalingError::AllModelsFailed {
                native: native.to_string(),
                target: target.to_string(),
                attempts: models.len(),
            });
        }
        if let Some(best) = outcome.best() {
            info!(best = %best.name(), "scaling relationship fitted");
        }
        Ok(outcome)
    }
}
