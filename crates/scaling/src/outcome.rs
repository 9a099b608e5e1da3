//! Fitted scaling relationships and their report.

use emsr_catalogue::Filter;
use emsr_harmonise::ConversionFormula;
use emsr_regression::{Criteria, FittedModel, ModelKind};
use emsr_selection::MatchedPairs;
use serde::Serialize;

use crate::error::ScalingError;

/// One fitted model between a native and a target scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalingRelationship {
    native: String,
    target: String,
    fit: FittedModel,
    /// `None` when AICc is undefined for this sample size.
    criteria: Option<Criteria>,
}

impl ScalingRelationship {
    pub(crate) fn new(native: &str, target: &str, fit: FittedModel) -> Self {
        let criteria = fit.criterion_tests().ok();
        Self {
            native: native.to_string(),
            target: target.to_string(),
            fit,
            criteria,
        }
    }

    pub fn native(&self) -> &str {
        &self.native
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn fit(&self) -> &FittedModel {
        &self.fit
    }

    pub fn criteria(&self) -> Option<Criteria> {
        self.criteria
    }

    /// Formula name, e.g. `mb->Mw linear`.
    pub fn name(&self) -> String {
        format!("{}->{} {}", self.native, self.target, self.fit.kind())
    }

    /// Converts the fit into a harmoniser formula.
    ///
    /// The model error is the square root of the residual variance. The
    /// domain defaults to every measure on the native scale.
    pub fn to_formula(&self, domain: Option<Filter>) -> ConversionFormula {
        ConversionFormula::polynomial(
            self.name(),
            self.fit.beta().to_vec(),
            self.fit.residual().sqrt(),
            domain.unwrap_or_else(|| Filter::scales([self.native.as_str()])),
            self.target.as_str(),
        )
    }
}

/// A model that did not fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelFailure {
    pub model: ModelKind,
    pub reason: String,
}

/// One matched pair as reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairPoint {
    pub group: String,
    pub native_agency: String,
    pub native_value: f64,
    pub native_error: Option<f64>,
    pub target_agency: String,
    pub target_value: f64,
    pub target_error: Option<f64>,
}

/// Result of fitting a set of models to one native/target scale pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmsrOutcome {
    native: String,
    target: String,
    grouping: String,
    selection: String,
    pairs: Vec<PairPoint>,
    relationships: Vec<ScalingRelationship>,
    failures: Vec<ModelFailure>,
}

impl EmsrOutcome {
    pub(crate) fn new(
        native: &str,
        target: &str,
        grouping: &str,
        selection: &str,
        pairs: &MatchedPairs,
    ) -> Self {
        let pairs = pairs
            .iter()
            .map(|(group, n, t)| PairPoint {
                group: group.to_string(),
                native_agency: n.agency().to_string(),
                native_value: n.value(),
                native_error: n.standard_error(),
                target_agency: t.agency().to_string(),
                target_value: t.value(),
                target_error: t.standard_error(),
            })
            .collect();
        Self {
            native: native.to_string(),
            target: target.to_string(),
            grouping: grouping.to_string(),
            selection: selection.to_string(),
            pairs,
            relationships: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub(crate) fn push_fit(&mut self, relationship: ScalingRelationship) {
        self.relationships.push(relationship);
    }

    pub(crate) fn push_failure(&mut self, model: ModelKind, reason: String) {
        self.failures.push(ModelFailure { model, reason });
    }

    pub fn native(&self) -> &str {
        &self.native
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Matched pairs the models were fitted to.
    pub fn pairs(&self) -> &[PairPoint] {
        &self.pairs
    }

    /// Successful fits, in request order.
    pub fn relationships(&self) -> &[ScalingRelationship] {
        &self.relationships
    }

    pub fn failures(&self) -> &[ModelFailure] {
        &self.failures
    }

    /// The fit with the lowest AICc.
    ///
    /// Falls back to AIC when AICc is undefined for any successful fit, so
    /// all candidates are ranked on the same criterion.
    pub fn best(&self) -> Option<&ScalingRelationship> {
        let use_aicc = self.relationships.iter().all(|r| r.criteria.is_some());
        let score = |r: &ScalingRelationship| match r.criteria {
            Some(c) if use_aicc => c.aicc,
            _ => r.fit.aic(),
        };
        self.relationships
            .iter()
            .min_by(|a, b| score(a).total_cmp(&score(b)))
    }

    /// Serialises the outcome as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ScalingError> {
        serde_json::to_string_pretty(self).map_err(|e| ScalingError::Serialization {
            reason: e.to_string(),
        })
    }
}
