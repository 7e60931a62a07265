//! Turns validated Gambar rows into typed [`LocationRecord`]s.
//!
//! Applies configured defaults, normalizes phase text, and derives the
//! transformer loss of each location.

use tracing::debug;

use crate::config::AnalysisConfig;

use super::losses::transformer_loss_kw;
use super::schema::DEFAULT_VOLTAGE_V;
use super::types::{LocationRecord, NO_CABLE, PhaseType};
use super::validate::{GambarRow, ValidatedInput};
use super::warning::{AnalysisWarning, WarningKind};

/// Load fraction of the transformer rating above which a location is flagged.
pub const OVERLOAD_RATIO: f64 = 0.9;

/// Records ready for calculation plus the warnings raised while building them.
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessed {
    /// One record per Gambar row, in workbook order.
    pub records: Vec<LocationRecord>,
    /// Phase and overload warnings.
    pub warnings: Vec<AnalysisWarning>,
}

/// Applies defaults and derives transformer losses.
pub fn preprocess(input: &ValidatedInput, config: &AnalysisConfig) -> Preprocessed {
    let mut warnings = Vec::new();
    let default_phase = config.network.default_phase;

    if !input.columns.phase {
        warnings.push(
            AnalysisWarning::run(WarningKind::PhaseDefaulted {
                assumed: default_phase,
            })
            .logged(),
        );
    }

    let records = input
        .rows
        .iter()
        .map(|row| build_record(row, input.columns.phase, config, &mut warnings))
        .collect::<Vec<_>>();

    debug!(
        records = records.len(),
        warnings = warnings.len(),
        "preprocessed locations"
    );
    Preprocessed { records, warnings }
}

fn build_record(
    row: &GambarRow,
    has_phase_column: bool,
    config: &AnalysisConfig,
    warnings: &mut Vec<AnalysisWarning>,
) -> LocationRecord {
    let default_phase = config.network.default_phase;
    let phase = if has_phase_column {
        match row.phase_text.as_deref().and_then(PhaseType::parse) {
            Some(p) => p,
            None => {
                warnings.push(
                    AnalysisWarning::at(
                        &row.name,
                        WarningKind::PhaseDefaulted {
                            assumed: default_phase,
                        },
                    )
                    .logged(),
                );
                default_phase
            }
        }
    } else {
        default_phase
    };

    let transformer_loss = match row.transformer_rated_kva {
        Some(rated) => {
            if rated > 0.0 && row.load_kva > OVERLOAD_RATIO * rated {
                warnings.push(
                    AnalysisWarning::at(
                        &row.name,
                        WarningKind::Overload {
                            load_kva: row.load_kva,
                            rated_kva: rated,
                        },
                    )
                    .logged(),
                );
            }
            transformer_loss_kw(
                row.load_kva,
                rated,
                config.transformer.default_core_loss_kw,
                config.transformer.default_full_load_loss_kw,
            )
        }
        None => row
            .transformer_loss_kw
            .unwrap_or(config.network.default_transformer_loss_kw),
    };

    LocationRecord {
        name: row.name.clone(),
        cable_type: row
            .cable_type
            .clone()
            .unwrap_or_else(|| NO_CABLE.to_string()),
        length_m: row.length_m.unwrap_or(0.0),
        load_kva: row.load_kva,
        voltage_v: row.voltage_v.unwrap_or(DEFAULT_VOLTAGE_V),
        phase,
        transformer_rated_kva: row.transformer_rated_kva,
        transformer_loss_kw: transformer_loss,
        baseline_losses_kw: row
            .baseline_losses_kw
            .unwrap_or(config.network.default_baseline_losses_kw),
    }
}
