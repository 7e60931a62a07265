//! End-to-end analysis runs over in-memory workbooks.

mod common;

use common::{CABLE_2X70, CABLE_3X70, Location};
use rab_efficiency::analysis::aggregate::roi_pct;
use rab_efficiency::analysis::losses::{efficiency_pct, recommend_cable};
use rab_efficiency::analysis::run_analysis;
use rab_efficiency::analysis::tiers::{EfficiencyTier, RoiTier};
use rab_efficiency::analysis::types::{LocationRecord, PhaseType};
use rab_efficiency::analysis::warning::WarningKind;
use rab_efficiency::config::AnalysisConfig;
use rab_efficiency::error::AnalysisError;
use rab_efficiency::io::workbook::{Cell, Sheet, Workbook};

fn expected_three_phase_loss(load_kva: f64, voltage_v: f64, length_m: f64) -> f64 {
    let i = load_kva * 1000.0 / (3.0_f64.sqrt() * voltage_v);
    i * i * 0.443 * (length_m / 1000.0) / 1000.0
}

#[test]
fn standard_location_losses() {
    let wb = common::workbook(&[100.0e6], &[Location::standard("Gardu A")]);
    let report = run_analysis(&wb, &AnalysisConfig::baseline()).expect("analysis should run");
    let rec = &report.records[0];

    assert!((rec.conductor_loss_kw - expected_three_phase_loss(100.0, 380.0, 500.0)).abs() < 1e-9);
    assert!((rec.conductor_loss_kw - 5.123).abs() < 0.02);
    assert!((rec.transformer_loss_kw - 0.590625).abs() < 1e-12);
    assert_eq!(rec.total_loss_kw, rec.conductor_loss_kw + rec.transformer_loss_kw);
    assert!((rec.efficiency_pct - 92.87).abs() < 0.01);
    assert!(report.warnings.is_empty());
}

#[test]
fn run_totals_follow_records() {
    let mut b = Location::standard("Gardu B");
    b.cable = CABLE_3X70;
    b.length_m = 300.0;
    b.load_kva = 50.0;
    b.voltage_v = 220.0;
    b.phase = "1 Phase";
    b.rated_kva = None;
    b.baseline_kw = 4.0;

    let cfg = AnalysisConfig::baseline();
    let wb = common::workbook(&[60.0e6, 40.0e6], &[Location::standard("Gardu A"), b]);
    let report = run_analysis(&wb, &cfg).expect("analysis should run");

    assert_eq!(report.total_cost, 100.0e6);
    for r in &report.records {
        let expected = (r.baseline_losses_kw - r.total_loss_kw).max(0.0) * 8760.0 * 1500.0;
        assert_eq!(r.annual_benefit, expected);
    }
    let benefit: f64 = report.records.iter().map(|r| r.annual_benefit).sum();
    assert_eq!(report.total_benefit, benefit);
    assert!((report.roi_pct - benefit / 100.0e6 * 100.0).abs() < 1e-9);

    // Gardu B loses more than its baseline and falls back to the default transformer loss.
    let gardu_b = &report.records[1];
    assert_eq!(gardu_b.phase, PhaseType::SinglePhase);
    assert_eq!(gardu_b.transformer_loss_kw, 0.5);
    assert!(gardu_b.loss_savings_kw < 0.0);
    assert_eq!(gardu_b.annual_benefit, 0.0);
    assert_eq!(report.summary(None).roi, RoiTier::Feasible);
}

#[test]
fn marginal_roi_at_fifteen_percent() {
    let roi = roi_pct(15.0e6, 100.0e6);
    assert!((roi - 15.0).abs() < 1e-12);
    assert_eq!(RoiTier::classify(roi), RoiTier::Marginal);
    assert_eq!(RoiTier::classify(roi).label(), "marginal");
}

#[test]
fn sentinel_cable_substitutes_first_catalog_entry() {
    let mut loc = Location::standard("Gardu X");
    loc.cable = "-";
    let wb = common::workbook(&[1.0e6], &[loc]);
    let report = run_analysis(&wb, &AnalysisConfig::baseline()).expect("analysis should run");

    let rec = &report.records[0];
    assert!((rec.conductor_loss_kw - expected_three_phase_loss(100.0, 380.0, 500.0)).abs() < 1e-9);
    let substituted = report.warnings.iter().find_map(|w| match &w.kind {
        WarningKind::UnknownCable { substituted, .. } => Some(substituted.as_str()),
        _ => None,
    });
    assert_eq!(substituted, Some(CABLE_2X70));
}

#[test]
fn zero_load_yields_sentinel_and_zero_efficiency() {
    let rec = LocationRecord {
        name: "Kosong".into(),
        cable_type: CABLE_2X70.into(),
        length_m: 100.0,
        load_kva: 0.0,
        voltage_v: 380.0,
        phase: PhaseType::ThreePhase,
        transformer_rated_kva: None,
        transformer_loss_kw: 0.5,
        baseline_losses_kw: 5.0,
    };
    let cfg = AnalysisConfig::baseline();
    assert_eq!(recommend_cable(&rec, &cfg.cable_table()), "-");
    assert_eq!(efficiency_pct(0.0, 0.5, rec.load_kva, 0.8), 0.0);
}

#[test]
fn overload_and_phase_warnings() {
    let mut heavy = Location::standard("Gardu Berat");
    heavy.load_kva = 150.0;
    let mut odd = Location::standard("Gardu Aneh");
    odd.phase = "2 Phase";

    let report = run_analysis(
        &common::workbook(&[1.0e6], &[heavy, odd]),
        &AnalysisConfig::baseline(),
    )
    .expect("analysis should run");

    assert!(report.warnings.iter().any(|w| {
        w.location.as_deref() == Some("Gardu Berat")
            && matches!(w.kind, WarningKind::Overload { rated_kva, .. } if rated_kva == 160.0)
    }));
    assert!(report.warnings.iter().any(|w| {
        w.location.as_deref() == Some("Gardu Aneh")
            && matches!(
                w.kind,
                WarningKind::PhaseDefaulted {
                    assumed: PhaseType::ThreePhase
                }
            )
    }));
    assert_eq!(report.records.len(), 2);
}

#[test]
fn recommendation_is_stable_across_runs() {
    let locations = [Location::standard("Gardu A"), Location::standard("Gardu A")];
    let cfg = AnalysisConfig::baseline();
    let first = run_analysis(&common::workbook(&[1.0e6], &locations), &cfg).expect("first run");
    let second = run_analysis(&common::workbook(&[1.0e6], &locations), &cfg).expect("second run");

    let picks: Vec<&str> = first.records.iter().map(|r| r.recommended_cable.as_str()).collect();
    assert_eq!(picks, vec![CABLE_2X70, CABLE_2X70]);
    assert_eq!(first.records, second.records);
}

#[test]
fn location_filter_drives_summary() {
    let mut weak = Location::standard("Gardu Lemah");
    weak.baseline_kw = 0.0;
    let report = run_analysis(
        &common::workbook(&[1.0e9], &[Location::standard("Gardu A"), weak]),
        &AnalysisConfig::baseline(),
    )
    .expect("analysis should run");

    let all = report.summary(None);
    let weak_only = report.summary(Some("Gardu Lemah"));
    assert_eq!(all.record_count, 2);
    assert_eq!(weak_only.record_count, 1);
    assert!(weak_only.mean_savings_kw < 0.0);
    assert_eq!(weak_only.roi_pct, all.roi_pct);
    assert_eq!(all.efficiency, EfficiencyTier::Good);
}

// ---------------------------------------------------------------------------
// Validation failures
// ---------------------------------------------------------------------------

#[test]
fn missing_sheet_is_schema_error() {
    let wb = Workbook::new(vec![common::rab_sheet(&[1.0])]);
    let err = run_analysis(&wb, &AnalysisConfig::baseline()).unwrap_err();
    assert_eq!(err.kind(), "SchemaError");
    match err {
        AnalysisError::Schema { missing, .. } => assert_eq!(missing, vec!["Gambar".to_string()]),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_column_is_column_error() {
    let gambar = Sheet::new(
        "Gambar",
        vec!["Nama Lokasi".into(), "Jenis Kabel".into()],
        vec![vec![Cell::Text("A".into()), Cell::Text(CABLE_2X70.into())]],
    );
    let wb = Workbook::new(vec![common::rab_sheet(&[1.0]), gambar]);
    let err = run_analysis(&wb, &AnalysisConfig::baseline()).unwrap_err();
    assert_eq!(err.kind(), "ColumnError");
}

#[test]
fn non_numeric_cost_is_type_error() {
    let rab = Sheet::new(
        "RAB",
        vec!["Total (Rp)".into()],
        vec![vec![Cell::Text("sepuluh juta".into())]],
    );
    let wb = Workbook::new(vec![rab, common::gambar_sheet(&[Location::standard("A")])]);
    let err = run_analysis(&wb, &AnalysisConfig::baseline()).unwrap_err();
    match err {
        AnalysisError::Type { column, row, .. } => {
            assert_eq!(column, "Total (Rp)");
            assert_eq!(row, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn negative_length_and_zero_load_are_range_errors() {
    let mut negative = Location::standard("A");
    negative.length_m = -5.0;
    let err = run_analysis(
        &common::workbook(&[1.0], &[negative]),
        &AnalysisConfig::baseline(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), "RangeError");

    let mut empty = Location::standard("B");
    empty.load_kva = 0.0;
    let err = run_analysis(&common::workbook(&[1.0], &[empty]), &AnalysisConfig::baseline())
        .unwrap_err();
    assert_eq!(err.kind(), "RangeError");
}

#[test]
fn cable_outside_selection_is_cable_error() {
    let mut loc = Location::standard("A");
    loc.cable = CABLE_3X70;
    let cfg = AnalysisConfig::single_phase();
    let err = run_analysis(&common::workbook(&[1.0], &[loc]), &cfg).unwrap_err();
    match err {
        AnalysisError::Cable { invalid, allowed } => {
            assert_eq!(invalid, vec![CABLE_3X70.to_string()]);
            assert!(allowed.contains(&"-".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn non_finite_load_is_type_error() {
    let mut loc = Location::standard("A");
    loc.load_kva = f64::NAN;
    let err = run_analysis(&common::workbook(&[1.0], &[loc]), &AnalysisConfig::baseline())
        .unwrap_err();
    match err {
        AnalysisError::Type { column, row, .. } => {
            assert_eq!(column, "Beban Total (kVA)");
            assert_eq!(row, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn overflowing_load_fails_instead_of_reporting_infinity() {
    let mut huge = Location::standard("B");
    huge.load_kva = 1.0e200;
    let err = run_analysis(
        &common::workbook(&[1.0], &[Location::standard("A"), huge]),
        &AnalysisConfig::baseline(),
    )
    .unwrap_err();
    match err {
        AnalysisError::Range { column, row, .. } => {
            assert_eq!(column, "Beban Total (kVA)");
            assert_eq!(row, 3);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
