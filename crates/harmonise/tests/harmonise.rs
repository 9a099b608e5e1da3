use std::collections::HashSet;
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use chrono::{TimeZone, Utc};
use emsr_catalogue::{Filter, MagnitudeMeasure, MeasureDraft, MeasureId, Origin};
use emsr_harmonise::{
    ConversionFormula, ExportFormat, HarmoniseError, Harmoniser, HarmoniserConfig,
};

fn measure(id: u64, agency: &str, scale: &str, value: f64, minute: u32) -> MagnitudeMeasure {
    let time = Utc.with_ymd_and_hms(2015, 4, 25, 6, minute, 0).unwrap();
    let origin = Arc::new(Origin::new("o", format!("ev{id}"), time, 28.2, 84.7, agency));
    MeasureDraft::new(agency, origin, scale, value)
        .with_standard_error(0.1)
        .into_measure(MeasureId(id))
}

fn two_hop_harmoniser() -> Harmoniser {
    let mut h = Harmoniser::new(HarmoniserConfig::default()).unwrap();
    h.add_formula(ConversionFormula::polynomial(
        "f1",
        vec![0.2, 1.0],
        0.1,
        Filter::scales(["mb"]).and(Filter::agencies(["A"])),
        "M2",
    ))
    .unwrap();
    h.add_formula(ConversionFormula::polynomial(
        "f2",
        vec![-0.5, 1.1],
        0.2,
        Filter::scales(["M2"]),
        "Mw",
    ))
    .unwrap();
    h
}

#[test]
fn two_formula_chain_lands_on_target() {
    let h = two_hop_harmoniser();
    let m = measure(1, "A", "mb", 5.0, 0);

    let chain = h.find_formulas_for(&m, "Mw").unwrap();
    let names: Vec<&str> = chain.iter().map(|f| f.name()).collect();
    assert_eq!(names, ["f1", "f2"]);

    let result = h.harmonise(vec![m], "Mw").unwrap();
    let converted = result.get(MeasureId(1)).unwrap();
    assert_eq!(converted.converted.scale(), "Mw");
    assert_eq!(converted.formulas, ["f1", "f2"]);
    // 1.1 * (5.0 + 0.2) - 0.5
    assert_abs_diff_eq!(converted.converted.value(), 5.22, epsilon = 1e-9);
    // f1: sqrt(0.1^2 + 0.1^2); f2: sqrt(0.2^2 + 1.1^2 * 0.02)
    let after_f1 = 0.02_f64;
    let expected = (0.04 + 1.21 * after_f1).sqrt();
    assert_abs_diff_eq!(
        converted.converted.standard_error().unwrap(),
        expected,
        epsilon = 1e-6
    );
}

#[test]
fn other_agency_is_not_converted() {
    let h = two_hop_harmoniser();
    let m = measure(1, "B", "mb", 5.0, 0);
    assert!(h.find_formulas_for(&m, "Mw").is_none());
    let result = h.harmonise(vec![m], "Mw").unwrap();
    assert_eq!(result.unconverted().len(), 1);
}

#[test]
fn out_of_domain_apply_fails() {
    let h = two_hop_harmoniser();
    let f2 = &h.formulas()[1];
    let err = f2.apply(&measure(1, "A", "mb", 5.0, 0), 0.2).unwrap_err();
    assert!(matches!(err, HarmoniseError::OutOfDomain { .. }));
}

#[test]
fn converted_and_unconverted_partition_input() {
    let h = two_hop_harmoniser();
    let input = vec![
        measure(1, "A", "mb", 4.8, 0),
        measure(2, "B", "mb", 5.1, 1),
        measure(3, "C", "Mw", 6.0, 2),
        measure(4, "A", "ML", 3.9, 3),
        measure(5, "D", "M2", 5.5, 4),
    ];
    let result = h.harmonise(input.clone(), "Mw").unwrap();

    assert_eq!(result.len(), input.len());
    let converted: HashSet<MeasureId> = result.converted().map(|c| c.original.id()).collect();
    let unconverted: HashSet<MeasureId> = result.unconverted().iter().map(|m| m.id()).collect();
    assert!(converted.is_disjoint(&unconverted));
    assert_eq!(converted.len() + unconverted.len(), input.len());
    assert_eq!(
        converted,
        HashSet::from([MeasureId(1), MeasureId(3), MeasureId(5)])
    );
    for c in result.converted() {
        assert_eq!(c.converted.scale(), "Mw");
    }
}

#[test]
fn identity_conversion_keeps_value() {
    let h = two_hop_harmoniser();
    let m = measure(7, "C", "Mw", 7.8, 0);
    let result = h.harmonise(vec![m], "Mw").unwrap();
    let c = result.get(MeasureId(7)).unwrap();
    assert_eq!(c.converted.value(), 7.8);
    assert_eq!(c.converted.standard_error(), Some(0.1));
    assert_eq!(c.formulas, ["identity(Mw)"]);
}

#[test]
fn export_csv_in_origin_time_order() {
    let h = two_hop_harmoniser();
    let input = vec![
        measure(1, "A", "mb", 4.8, 30),
        measure(2, "A", "mb", 5.2, 10),
        measure(3, "B", "mb", 5.0, 20),
    ];
    let result = h.harmonise(input, "Mw").unwrap();
    let mut out = Vec::new();
    result.export(ExportFormat::Csv, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let events: Vec<&str> = text
        .lines()
        .skip(1)
        .map(|l| l.split(',').next().unwrap())
        .collect();
    assert_eq!(events, ["ev2", "ev1"]);
    assert!(text.lines().nth(1).unwrap().ends_with(",f1;f2"));
}

#[test]
fn domain_rejection_does_not_block_later_branch() {
    let mut h = Harmoniser::new(HarmoniserConfig::default()).unwrap();
    let formulas = [
        ("mb->T", vec![2.0, 1.0], Filter::scales(["mb"]), "T"),
        ("mb->S", vec![0.0, 1.0], Filter::scales(["mb"]), "S"),
        ("T->S", vec![0.0, 1.0], Filter::scales(["T"]), "S"),
        (
            "S->Mw",
            vec![0.0, 1.0],
            Filter::scales(["S"]).and(Filter::MagnitudeAtLeast(6.0)),
            "Mw",
        ),
    ];
    for (name, coefficients, domain, target) in formulas {
        h.add_formula(ConversionFormula::polynomial(name, coefficients, 0.1, domain, target))
            .unwrap();
    }

    // mb 5.0 reaches S twice: directly as 5.0 (below the S->Mw domain)
    // and through T as 7.0.
    let m = measure(1, "A", "mb", 5.0, 0);
    let chain = h.find_formulas_for(&m, "Mw").unwrap();
    let names: Vec<&str> = chain.iter().map(|f| f.name()).collect();
    assert_eq!(names, ["mb->T", "T->S", "S->Mw"]);

    let result = h.harmonise(vec![m], "Mw").unwrap();
    assert_abs_diff_eq!(
        result.get(MeasureId(1)).unwrap().converted.value(),
        7.0,
        epsilon = 1e-9
    );
}
