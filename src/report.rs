//! Terminal and JSON rendering of an analysis report.

use std::fmt::Write as _;

use serde::Serialize;

use crate::analysis::types::EnrichedRecord;
use crate::analysis::warning::AnalysisWarning;
use crate::analysis::{AnalysisReport, Summary};
use crate::io::export::group_thousands;

/// Width of the longest bar in text charts, in characters.
pub const CHART_WIDTH: usize = 40;

/// Formats a Rupiah amount as `Rp 1,234,567`.
pub fn rupiah(amount: f64) -> String {
    format!("Rp {}", group_thousands(amount, 0))
}

/// Renders a horizontal bar chart, one bar per `(label, value)`.
///
/// Bars scale to the largest magnitude; negative values are drawn with `-`.
pub fn bar_chart(title: &str, unit: &str, items: &[(String, f64)], width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{title}");
    let max = items.iter().map(|(_, v)| v.abs()).fold(0.0_f64, f64::max);
    let label_width = items.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    for (label, value) in items {
        let len = if max > 0.0 {
            ((value.abs() / max) * width as f64).round() as usize
        } else {
            0
        };
        let glyph = if *value < 0.0 { "-" } else { "#" };
        let _ = writeln!(
            out,
            "  {label:<label_width$} | {} {value:.2}{unit}",
            glyph.repeat(len)
        );
    }
    out
}

/// Renders the per-location result table.
pub fn location_table(records: &[&EnrichedRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<20} {:>8} {:>8} {:>7} {:>9} {:>9} {:>9} {:>8} {:>18}  {}",
        "Location",
        "Len(m)",
        "kVA",
        "V",
        "Cond kW",
        "Total kW",
        "Save kW",
        "Eff %",
        "Benefit (Rp/yr)",
        "Recommended"
    );
    for r in records {
        let _ = writeln!(
            out,
            "{:<20} {:>8.2} {:>8.2} {:>7.2} {:>9.2} {:>9.2} {:>9.2} {:>8.2} {:>18}  {}",
            r.name,
            r.length_m,
            r.load_kva,
            r.voltage_v,
            r.conductor_loss_kw,
            r.total_loss_kw,
            r.loss_savings_kw,
            r.efficiency_pct,
            group_thousands(r.annual_benefit, 0),
            r.recommended_cable
        );
    }
    out
}

/// Renders the full terminal report for an optional location filter.
pub fn render(report: &AnalysisReport, location: Option<&str>, charts: bool) -> String {
    let selected = report.filtered(location);
    let summary = report.summary(location);
    let mut out = String::new();

    let _ = writeln!(out, "--- Technical & Economic Analysis ---");
    let _ = writeln!(out, "Total RAB cost:        {}", rupiah(report.total_cost));
    let _ = writeln!(
        out,
        "Annual benefit:        {}",
        rupiah(report.total_benefit)
    );
    let _ = writeln!(out, "Annual ROI:            {:.2}%", report.roi_pct);
    if let Some(loc) = location {
        let _ = writeln!(out, "Location filter:       {loc}");
    }
    let _ = writeln!(out);
    out.push_str(&location_table(&selected));

    if charts && !selected.is_empty() {
        let series = |f: fn(&EnrichedRecord) -> f64| -> Vec<(String, f64)> {
            selected.iter().map(|r| (r.name.clone(), f(r))).collect()
        };
        let _ = writeln!(out);
        out.push_str(&bar_chart(
            "Total loss per location",
            " kW",
            &series(|r| r.total_loss_kw),
            CHART_WIDTH,
        ));
        let _ = writeln!(out);
        out.push_str(&bar_chart(
            "Efficiency per location",
            "%",
            &series(|r| r.efficiency_pct),
            CHART_WIDTH,
        ));
        let _ = writeln!(out);
        out.push_str(&bar_chart(
            "Loss savings per location",
            " kW",
            &series(|r| r.loss_savings_kw),
            CHART_WIDTH,
        ));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{summary}");

    if !report.warnings.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "--- Warnings ({}) ---", report.warnings.len());
        for w in &report.warnings {
            let _ = writeln!(out, "{w}");
        }
    }
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    total_cost: f64,
    total_benefit: f64,
    roi_pct: f64,
    summary: Summary,
    records: Vec<&'a EnrichedRecord>,
    warnings: &'a [AnalysisWarning],
}

/// Renders the filtered report as pretty JSON.
///
/// # Errors
///
/// Returns a `serde_json::Error` if serialization fails.
pub fn to_json(report: &AnalysisReport, location: Option<&str>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        total_cost: report.total_cost,
        total_benefit: report.total_benefit,
        roi_pct: report.roi_pct,
        summary: report.summary(location),
        records: report.filtered(location),
        warnings: &report.warnings,
    })
}
