//! Input validation: sheets, columns, numeric types and ranges, cable allow-list.
//!
//! Every check runs before any loss is computed. Checks run in a fixed
//! order and the first violation is returned.

use tracing::debug;

use crate::error::AnalysisError;
use crate::io::workbook::{Cell, Sheet, Workbook};

use super::schema::*;
use super::types::{CableTable, CostItem, NO_CABLE, cable_key};

/// Range rule for a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Constraint {
    /// Blank allowed, values >= 0.
    NonNegative,
    /// Every cell filled with a value > 0.
    Positive,
}

/// Which optional Gambar columns the workbook provides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionalColumns {
    /// `Tipe Phase` present.
    pub phase: bool,
    /// `Daya Trafo (kVA)` present.
    pub transformer_rating: bool,
    /// `Rugi Trafo (kW)` present.
    pub transformer_loss: bool,
    /// `Baseline Losses (kW)` present.
    pub baseline: bool,
}

/// A Gambar row whose cells have passed validation, defaults not yet applied.
#[derive(Debug, Clone, PartialEq)]
pub struct GambarRow {
    /// Spreadsheet row number (header is row 1).
    pub row: usize,
    /// `Nama Lokasi`, blank rendered as `"-"`.
    pub name: String,
    /// `Jenis Kabel`, `None` when blank.
    pub cable_type: Option<String>,
    /// `Panjang Jaringan (m)`, `None` when blank.
    pub length_m: Option<f64>,
    /// `Beban Total (kVA)`, always > 0.
    pub load_kva: f64,
    /// `Tegangan (V)`, `None` when blank.
    pub voltage_v: Option<f64>,
    /// Raw `Tipe Phase` text.
    pub phase_text: Option<String>,
    /// `Daya Trafo (kVA)`.
    pub transformer_rated_kva: Option<f64>,
    /// `Rugi Trafo (kW)`.
    pub transformer_loss_kw: Option<f64>,
    /// `Baseline Losses (kW)`.
    pub baseline_losses_kw: Option<f64>,
}

/// Output of a successful validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput {
    /// RAB line items.
    pub cost_items: Vec<CostItem>,
    /// Gambar rows in workbook order.
    pub rows: Vec<GambarRow>,
    /// Optional Gambar columns found.
    pub columns: OptionalColumns,
}

/// Validates a workbook against the template and the selected cables.
///
/// # Errors
///
/// Returns the first [`AnalysisError`] found, in this order: missing sheets,
/// missing columns (RAB, then Gambar), numeric type and range of the
/// required columns, disallowed cable types, then the optional transformer
/// and baseline columns.
pub fn validate(workbook: &Workbook, cables: &CableTable) -> Result<ValidatedInput, AnalysisError> {
    let (Some(rab), Some(gambar)) = (workbook.sheet(SHEET_RAB), workbook.sheet(SHEET_GAMBAR))
    else {
        return Err(AnalysisError::Schema {
            required: REQUIRED_SHEETS.iter().map(|s| (*s).to_string()).collect(),
            missing: REQUIRED_SHEETS
                .iter()
                .filter(|s| workbook.sheet(s).is_none())
                .map(|s| (*s).to_string())
                .collect(),
        });
    };

    require_columns(rab, REQUIRED_RAB_COLUMNS)?;
    require_columns(gambar, REQUIRED_GAMBAR_COLUMNS)?;

    let totals = numeric_column(rab, COL_TOTAL_COST, Constraint::NonNegative)?;
    let cost_items = totals
        .into_iter()
        .map(|v| CostItem {
            total_cost: v.unwrap_or(0.0),
        })
        .collect();

    let lengths = numeric_column(gambar, COL_LENGTH, Constraint::NonNegative)?;
    let loads = numeric_column(gambar, COL_LOAD, Constraint::Positive)?;
    let voltages = numeric_column(gambar, COL_VOLTAGE, Constraint::Positive)?;

    let columns = OptionalColumns {
        phase: gambar.has_column(COL_PHASE),
        transformer_rating: gambar.has_column(COL_TRANSFORMER_RATING),
        transformer_loss: gambar.has_column(COL_TRANSFORMER_LOSS),
        baseline: gambar.has_column(COL_BASELINE),
    };
    let cable_col = text_column(gambar, COL_CABLE);
    check_cables(&cable_col, cables)?;

    let ratings = optional_numeric(gambar, COL_TRANSFORMER_RATING)?;
    let losses = optional_numeric(gambar, COL_TRANSFORMER_LOSS)?;
    let baselines = optional_numeric(gambar, COL_BASELINE)?;

    let names = text_column(gambar, COL_LOCATION);
    let phases = if columns.phase {
        text_column(gambar, COL_PHASE)
    } else {
        vec![None; gambar.row_count()]
    };

    let rows = (0..gambar.row_count())
        .map(|i| GambarRow {
            row: i + 2,
            name: names[i].clone().unwrap_or_else(|| "-".to_string()),
            cable_type: cable_col[i].clone(),
            length_m: lengths[i],
            // Positive constraint guarantees a value.
            load_kva: loads[i].unwrap_or_default(),
            voltage_v: voltages[i],
            phase_text: phases[i].clone(),
            transformer_rated_kva: ratings[i],
            transformer_loss_kw: losses[i],
            baseline_losses_kw: baselines[i],
        })
        .collect::<Vec<_>>();

    debug!(
        cost_items = rab.row_count(),
        locations = rows.len(),
        "workbook validated"
    );
    Ok(ValidatedInput {
        cost_items,
        rows,
        columns,
    })
}

fn require_columns(sheet: &Sheet, required: &[&str]) -> Result<(), AnalysisError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|c| !sheet.has_column(c))
        .map(|c| (*c).to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AnalysisError::Column {
            sheet: sheet.name.clone(),
            missing,
        })
    }
}

/// Reads a numeric column, checking type (non-finite numbers included) for
/// the whole column first, then negativity, then (for `Positive`) zero and
/// blank cells.
fn numeric_column(
    sheet: &Sheet,
    header: &str,
    constraint: Constraint,
) -> Result<Vec<Option<f64>>, AnalysisError> {
    let Some(col) = sheet.column_index(header) else {
        return Ok(vec![None; sheet.row_count()]);
    };

    let mut values = Vec::with_capacity(sheet.row_count());
    for row in 0..sheet.row_count() {
        let value = match sheet.cell(row, col) {
            Cell::Empty => None,
            Cell::Number(n) if n.is_finite() => Some(*n),
            other => {
                return Err(AnalysisError::Type {
                    sheet: sheet.name.clone(),
                    column: header.to_string(),
                    row: row + 2,
                    value: other.to_string(),
                });
            }
        };
        values.push(value);
    }

    let range_error = |row: usize, value: String, constraint: &str| AnalysisError::Range {
        sheet: sheet.name.clone(),
        column: header.to_string(),
        row: row + 2,
        value,
        constraint: constraint.to_string(),
    };

    if let Some((row, v)) = values
        .iter()
        .enumerate()
        .find_map(|(i, v)| v.filter(|x| *x < 0.0).map(|x| (i, x)))
    {
        return Err(range_error(row, v.to_string(), "must not be negative"));
    }

    if constraint == Constraint::Positive {
        if let Some((row, v)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| v.is_none_or(|x| x <= 0.0))
        {
            let shown = v.map_or_else(|| "a blank cell".to_string(), |x| x.to_string());
            return Err(range_error(row, shown, "must be greater than zero"));
        }
    }

    Ok(values)
}

fn optional_numeric(sheet: &Sheet, header: &str) -> Result<Vec<Option<f64>>, AnalysisError> {
    numeric_column(sheet, header, Constraint::NonNegative)
}

fn text_column(sheet: &Sheet, header: &str) -> Vec<Option<String>> {
    let col = sheet.column_index(header);
    (0..sheet.row_count())
        .map(|row| col.and_then(|c| sheet.cell(row, c).as_text()))
        .collect()
}

fn check_cables(values: &[Option<String>], cables: &CableTable) -> Result<(), AnalysisError> {
    let mut invalid: Vec<String> = Vec::new();
    for cable in values.iter().flatten() {
        let allowed = cable_key(cable) == NO_CABLE || cables.contains(cable);
        if !allowed && !invalid.contains(cable) {
            invalid.push(cable.clone());
        }
    }
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(AnalysisError::Cable {
            invalid,
            allowed: cables.allowed_names(),
        })
    }
}
