use std::sync::Arc;

use approx::assert_abs_diff_eq;
use chrono::{Duration, TimeZone, Utc};
use emsr_catalogue::{Filter, MagnitudeMeasure, MeasureCollection, MeasureDraft, MeasureId, Origin};
use emsr_grouping::GroupingStrategy;
use emsr_harmonise::{Harmoniser, HarmoniserConfig};
use emsr_regression::{ModelKind, OdrConfig};
use emsr_scaling::{Emsr, ScalingError};
use emsr_selection::{MissingUncertainty, SelectionStrategy};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

/// `events` earthquakes with an `mb` and an `Mw` report each, where
/// `Mw = 0.8 + 0.85 mb` plus noise.
fn collection(events: usize, seed: u64) -> MeasureCollection {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 0.05).unwrap();
    let start = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
    let mut measures = Vec::new();
    let mut id = 0;
    for e in 0..events {
        let time = start + Duration::days(e as i64);
        let origin = Arc::new(Origin::new("o", format!("ev{e}"), time, 10.0, 20.0, "ISC"));
        let mb = 4.0 + 2.5 * e as f64 / events as f64;
        let mw = 0.8 + 0.85 * mb;
        for (agency, scale, value) in [("ISC", "mb", mb), ("GCMT", "Mw", mw)] {
            id += 1;
            measures.push(
                MeasureDraft::new(agency, origin.clone(), scale, value + noise.sample(&mut rng))
                    .with_standard_error(0.1)
                    .into_measure(MeasureId(id)),
            );
        }
    }
    MeasureCollection::new(measures)
}

fn fit(collection: MeasureCollection, models: &[ModelKind]) -> Result<emsr_scaling::EmsrOutcome, ScalingError> {
    let emsr = Emsr::new(collection.clone(), GroupingStrategy::ByEvent)?;
    emsr.apply_regression_model(
        "mb",
        "Mw",
        &SelectionStrategy::Precise,
        &MissingUncertainty::Discard,
        &collection,
        models,
        &OdrConfig::default(),
    )
}

#[test]
fn linear_relationship_is_recovered() {
    let outcome = fit(collection(40, 3), &[ModelKind::Linear]).unwrap();
    assert_eq!(outcome.pairs().len(), 40);
    let best = outcome.best().unwrap();
    assert_eq!(best.name(), "mb->Mw linear");
    assert_abs_diff_eq!(best.fit().beta()[1], 0.85, epsilon = 0.1);
    assert!(best.criteria().is_some());
}

#[test]
fn best_model_has_lowest_aicc() {
    let outcome = fit(
        collection(40, 5),
        &[ModelKind::Linear, ModelKind::Polynomial { order: 2 }],
    )
    .unwrap();
    let best = outcome.best().unwrap();
    for r in outcome.relationships() {
        assert!(best.criteria().unwrap().aicc <= r.criteria().unwrap().aicc);
    }
}

#[test]
fn two_pairs_are_not_enough() {
    let err = fit(collection(2, 1), &[ModelKind::Linear]).unwrap_err();
    assert_eq!(
        err,
        ScalingError::NotEnoughSamples {
            native: "mb".to_string(),
            target: "Mw".to_string(),
            pairs: 2,
            min: 3
        }
    );
}

#[test]
fn failures_are_kept_per_model() {
    // four pairs: the cubic has as many parameters as samples
    let outcome = fit(
        collection(4, 9),
        &[ModelKind::Linear, ModelKind::Polynomial { order: 3 }],
    )
    .unwrap();
    assert_eq!(outcome.relationships().len(), 1);
    assert_eq!(outcome.failures().len(), 1);
    assert_eq!(outcome.failures()[0].model, ModelKind::Polynomial { order: 3 });
}

#[test]
fn all_models_failing_is_an_error() {
    let err = fit(collection(4, 9), &[ModelKind::Polynomial { order: 3 }]).unwrap_err();
    assert!(matches!(err, ScalingError::AllModelsFailed { attempts: 1, .. }));
}

#[test]
fn no_models_is_an_error() {
    assert_eq!(fit(collection(5, 1), &[]).unwrap_err(), ScalingError::NoModels);
}

#[test]
fn formula_feeds_the_harmoniser() {
    let outcome = fit(collection(30, 4), &[ModelKind::Linear]).unwrap();
    let best = outcome.best().unwrap();
    let formula = best.to_formula(None);
    assert_eq!(formula.target_scale(), "Mw");
    assert_abs_diff_eq!(formula.model_error(), best.fit().residual().sqrt());

    let mut harmoniser = Harmoniser::new(HarmoniserConfig::default()).unwrap();
    harmoniser.add_formula(formula).unwrap();
    let measures: Vec<MagnitudeMeasure> = collection(30, 4)
        .filter(&Filter::scales(["mb"]))
        .into_vec();
    let result = harmoniser.harmonise(measures, "Mw").unwrap();
    assert_eq!(result.converted_count(), 30);
}

#[test]
fn outcome_serialises_to_json() {
    let outcome = fit(collection(10, 2), &[ModelKind::Linear]).unwrap();
    let json = outcome.to_json().unwrap();
    assert!(json.contains("\"native\": \"mb\""));
    assert!(json.contains("\"grouping\": \"event\""));
    assert!(json.contains("\"selection\": \"precise\""));
    assert!(json.contains("\"relationships\""));
}
