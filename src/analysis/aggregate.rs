//! Aggregation of per-location results into the run report.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;

use super::losses::{LossCache, efficiency_pct};
use super::schema::{COL_BASELINE, COL_LOAD, SHEET_GAMBAR};
use super::tiers::{EfficiencyTier, RoiTier, SavingsTier};
use super::types::{CostItem, EnrichedRecord, HOURS_PER_YEAR, LocationRecord};
use super::warning::{AnalysisWarning, WarningKind};

/// Result of one analysis run.
///
/// Built fresh per run from immutable inputs; nothing carries over between
/// runs.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// One enriched record per location, in workbook order.
    pub records: Vec<EnrichedRecord>,
    /// Sum of RAB `Total (Rp)`.
    pub total_cost: f64,
    /// Sum of annual benefits over all locations (Rp/year).
    pub total_benefit: f64,
    /// `total_benefit / total_cost × 100`, 0 when there is no cost.
    pub roi_pct: f64,
    /// Every warning raised during the run.
    pub warnings: Vec<AnalysisWarning>,
}

/// Conclusions for a (possibly filtered) set of locations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Location filter applied, `None` for all.
    pub location: Option<String>,
    /// Number of records in the filtered set.
    pub record_count: usize,
    /// Mean efficiency over the filtered set (%).
    pub mean_efficiency_pct: f64,
    /// Mean loss savings over the filtered set (kW).
    pub mean_savings_kw: f64,
    /// Whole-run ROI (%).
    pub roi_pct: f64,
    /// Efficiency classification.
    pub efficiency: EfficiencyTier,
    /// Savings classification.
    pub savings: SavingsTier,
    /// ROI classification.
    pub roi: RoiTier,
}

/// Annual benefit (Rp/year) of a loss saving.
///
/// Negative savings earn nothing.
pub fn annual_benefit(loss_savings_kw: f64, tariff_per_kwh: f64) -> f64 {
    loss_savings_kw.max(0.0) * HOURS_PER_YEAR * tariff_per_kwh
}

/// Return on investment (%), 0 when `total_cost` is not positive.
pub fn roi_pct(total_benefit: f64, total_cost: f64) -> f64 {
    if total_cost > 0.0 {
        total_benefit / total_cost * 100.0
    } else {
        0.0
    }
}

/// Computes every derived column and the run totals.
///
/// # Arguments
///
/// * `cost_items` - RAB line items
/// * `records` - Preprocessed locations
/// * `config` - Analysis configuration
///
/// # Returns
///
/// An `AnalysisReport` holding the enriched records and the warnings raised
/// by the calculation (preprocessing warnings are added by the caller).
///
/// # Errors
///
/// Returns [`AnalysisError::Range`] if a record's losses, efficiency, or
/// benefit overflow to a non-finite value. Records are numbered like
/// Gambar rows (first record = row 2).
pub fn analyze(
    cost_items: &[CostItem],
    records: &[LocationRecord],
    config: &AnalysisConfig,
) -> Result<AnalysisReport, AnalysisError> {
    let cables = config.cable_table();
    let mut cache = LossCache::new(&cables);
    let mut warnings = Vec::new();
    let tariff = config.economics.tariff_per_kwh;

    let mut enriched = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let conductor = cache.conductor_loss(rec);
        if let Some(kind) = conductor.warning {
            warnings.push(AnalysisWarning::at(&rec.name, kind).logged());
        }

        let efficiency = efficiency_pct(
            conductor.loss_kw,
            rec.transformer_loss_kw,
            rec.load_kva,
            config.economics.power_factor,
        );
        if !(0.0..=100.0).contains(&efficiency) {
            warnings.push(
                AnalysisWarning::at(
                    &rec.name,
                    WarningKind::EfficiencyRange {
                        efficiency_pct: efficiency,
                    },
                )
                .logged(),
            );
        }

        let total_loss = conductor.loss_kw + rec.transformer_loss_kw;
        let savings = rec.baseline_losses_kw - total_loss;
        let benefit = annual_benefit(savings, tariff);

        let losses = [conductor.loss_kw, rec.transformer_loss_kw, total_loss, efficiency];
        if losses.iter().any(|v| !v.is_finite()) {
            return Err(overflow(i, COL_LOAD, rec.load_kva));
        }
        if !savings.is_finite() || !benefit.is_finite() {
            return Err(overflow(i, COL_BASELINE, rec.baseline_losses_kw));
        }

        enriched.push(EnrichedRecord {
            name: rec.name.clone(),
            cable_type: rec.cable_type.clone(),
            phase: rec.phase,
            length_m: rec.length_m,
            load_kva: rec.load_kva,
            voltage_v: rec.voltage_v,
            transformer_rated_kva: rec.transformer_rated_kva,
            transformer_loss_kw: rec.transformer_loss_kw,
            baseline_losses_kw: rec.baseline_losses_kw,
            conductor_loss_kw: conductor.loss_kw,
            total_loss_kw: total_loss,
            efficiency_pct: efficiency,
            loss_savings_kw: savings,
            annual_benefit: benefit,
            recommended_cable: cache.recommend_cable(rec),
        });
    }

    let total_cost: f64 = cost_items.iter().map(|c| c.total_cost).sum();
    let total_benefit: f64 = enriched.iter().map(|r| r.annual_benefit).sum();
    debug!(
        records = enriched.len(),
        cache_hits = cache.hits(),
        total_cost,
        total_benefit,
        "aggregated"
    );

    Ok(AnalysisReport {
        records: enriched,
        total_cost,
        total_benefit,
        roi_pct: roi_pct(total_benefit, total_cost),
        warnings,
    })
}

fn overflow(index: usize, column: &str, value: f64) -> AnalysisError {
    AnalysisError::Range {
        sheet: SHEET_GAMBAR.to_string(),
        column: column.to_string(),
        row: index + 2,
        value: value.to_string(),
        constraint: "is too large to produce a finite result".to_string(),
    }
}

impl AnalysisReport {
    /// Records matching a location name exactly; `None` selects all.
    pub fn filtered(&self, location: Option<&str>) -> Vec<&EnrichedRecord> {
        self.records
            .iter()
            .filter(|r| location.is_none_or(|loc| r.name == loc))
            .collect()
    }

    /// Distinct location names in first-seen order.
    pub fn locations(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for r in &self.records {
            if !names.contains(&r.name.as_str()) {
                names.push(&r.name);
            }
        }
        names
    }

    /// Tier summary over the filtered set. ROI always covers the whole run.
    pub fn summary(&self, location: Option<&str>) -> Summary {
        let selected = self.filtered(location);
        let mean = |f: fn(&EnrichedRecord) -> f64| {
            if selected.is_empty() {
                0.0
            } else {
                selected.iter().map(|r| f(r)).sum::<f64>() / selected.len() as f64
            }
        };
        let mean_efficiency_pct = mean(|r| r.efficiency_pct);
        let mean_savings_kw = mean(|r| r.loss_savings_kw);

        Summary {
            location: location.map(str::to_string),
            record_count: selected.len(),
            mean_efficiency_pct,
            mean_savings_kw,
            roi_pct: self.roi_pct,
            efficiency: EfficiencyTier::classify(mean_efficiency_pct),
            savings: SavingsTier::classify(mean_savings_kw),
            roi: RoiTier::classify(self.roi_pct),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Conclusions ---")?;
        writeln!(
            f,
            "[{} {}] System efficiency {} ({:.2}%).",
            self.efficiency.severity(),
            self.efficiency.color(),
            self.efficiency,
            self.mean_efficiency_pct
        )?;
        writeln!(
            f,
            "[{} {}] Loss savings {} ({:.2} kW).",
            self.savings.severity(),
            self.savings.color(),
            self.savings,
            self.mean_savings_kw
        )?;
        write!(
            f,
            "[{} {}] Project {} (ROI {:.2}%).",
            self.roi.severity(),
            self.roi.color(),
            self.roi,
            self.roi_pct
        )
    }
}
