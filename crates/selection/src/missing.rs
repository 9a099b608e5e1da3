//! Policies for measures reported without a standard error.

use emsr_catalogue::{EventSiblings, MagnitudeMeasure};

use crate::error::SelectionError;

/// What to do with a measure whose standard error is unknown.
///
/// Measures that do report an error are never discarded nor modified.
#[derive(Debug, Clone, PartialEq)]
pub enum MissingUncertainty {
    /// Drop the measure.
    Discard,
    /// Use the largest error reported for the same event. Dropped when no
    /// sibling reports one.
    EventMaximum,
    /// Use a fixed value.
    FixedDefault(f64),
}

impl MissingUncertainty {
    /// Validates the policy parameters.
    pub fn validate(&self) -> Result<(), SelectionError> {
        match *self {
            MissingUncertainty::FixedDefault(value) if !(value.is_finite() && value > 0.0) => {
                Err(SelectionError::InvalidDefault { value })
            }
            _ => Ok(()),
        }
    }

    /// Returns `true` if `measure` must be left out of selection.
    pub fn should_be_discarded(
        &self,
        measure: &MagnitudeMeasure,
        siblings: &dyn EventSiblings,
    ) -> bool {
        if measure.standard_error().is_some() {
            return false;
        }
        match self {
            MissingUncertainty::Discard => true,
            MissingUncertainty::EventMaximum => event_maximum(measure, siblings).is_none(),
            MissingUncertainty::FixedDefault(_) => false,
        }
    }

    /// Returns the error to assume for `measure` when it reports none.
    ///
    /// `None` for [`MissingUncertainty::Discard`] and for an event without
    /// any reported error.
    pub fn default_for(
        &self,
        measure: &MagnitudeMeasure,
        siblings: &dyn EventSiblings,
    ) -> Option<f64> {
        match self {
            MissingUncertainty::Discard => None,
            MissingUncertainty::EventMaximum => event_maximum(measure, siblings),
            MissingUncertainty::FixedDefault(value) => Some(*value),
        }
    }

    /// Applies the policy: `None` if discarded, otherwise a copy whose
    /// standard error is always known.
    pub fn resolve(
        &self,
        measure: &MagnitudeMeasure,
        siblings: &dyn EventSiblings,
    ) -> Option<MagnitudeMeasure> {
        if measure.standard_error().is_some() {
            return Some(measure.clone());
        }
        if self.should_be_discarded(measure, siblings) {
            return None;
        }
        self.default_for(measure, siblings)
            .map(|default| measure.with_default_error(default))
    }
}

fn event_maximum(measure: &MagnitudeMeasure, siblings: &dyn EventSiblings) -> Option<f64> {
    siblings
        .siblings(measure.event_key())
        .into_iter()
        .filter_map(MagnitudeMeasure::standard_error)
        .reduce(f64::max)
}
