//! Loss and ROI analysis pipeline.
//!
//! workbook → [`validate`] → [`preprocess`] → [`aggregate`] → report.

pub mod aggregate;
pub mod losses;
pub mod preprocess;
/// Sheet and column names of the workbook template.
pub mod schema;
/// Fixed-threshold efficiency, savings, and ROI tiers.
pub mod tiers;
pub mod types;
pub mod validate;
/// Non-fatal warnings raised during a run.
pub mod warning;

use tracing::info;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::io::workbook::Workbook;

pub use aggregate::{AnalysisReport, Summary};

/// Runs the whole pipeline on one workbook.
///
/// Validation completes before any calculation; on error nothing is
/// computed. Preprocessing warnings come first in the report, followed by
/// calculation warnings in record order.
///
/// # Errors
///
/// Returns the first validation failure, or a [`AnalysisError::Range`] when
/// a location's inputs overflow the calculation.
pub fn run_analysis(
    workbook: &Workbook,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, AnalysisError> {
    let cables = config.cable_table();
    let input = validate::validate(workbook, &cables)?;
    let prepared = preprocess::preprocess(&input, config);
    let mut report = aggregate::analyze(&input.cost_items, &prepared.records, config)?;

    let mut warnings = prepared.warnings;
    warnings.append(&mut report.warnings);
    report.warnings = warnings;

    info!(
        locations = report.records.len(),
        warnings = report.warnings.len(),
        roi_pct = report.roi_pct,
        "analysis complete"
    );
    Ok(report)
}
