//! Fatal error taxonomy for an analysis run.
//!
//! Any of these halts the pipeline before a single loss is computed.
//! Non-fatal conditions live in [`crate::analysis::warning`].

use std::path::PathBuf;

use thiserror::Error;

/// A fatal input problem. The first one found is reported.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// The workbook could not be opened or decoded.
    #[error("cannot read \"{}\": {message}", path.display())]
    FileRead {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying reader message.
        message: String,
    },

    /// One or more required sheets are absent.
    #[error("workbook must contain sheets {required:?}, missing {missing:?}")]
    Schema {
        /// All sheets the analysis needs.
        required: Vec<String>,
        /// The ones that were not found.
        missing: Vec<String>,
    },

    /// A required column is absent from a sheet.
    #[error("sheet \"{sheet}\" is missing required columns {missing:?}")]
    Column {
        /// Sheet name.
        sheet: String,
        /// Missing column headers.
        missing: Vec<String>,
    },

    /// A numeric column holds a non-numeric value.
    #[error("column \"{column}\" in sheet \"{sheet}\" must be numeric, row {row} holds \"{value}\"")]
    Type {
        /// Sheet name.
        sheet: String,
        /// Column header.
        column: String,
        /// Spreadsheet row (header is row 1).
        row: usize,
        /// Offending cell rendered as text.
        value: String,
    },

    /// A numeric value violates its range constraint.
    #[error("column \"{column}\" in sheet \"{sheet}\" {constraint}, row {row} holds {value}")]
    Range {
        /// Sheet name.
        sheet: String,
        /// Column header.
        column: String,
        /// Spreadsheet row (header is row 1).
        row: usize,
        /// Offending cell rendered as text.
        value: String,
        /// Human-readable constraint, e.g. `"must not be negative"`.
        constraint: String,
    },

    /// Cable types outside the configured allow-list.
    #[error("cable types not allowed: {invalid:?}, only {allowed:?} are permitted")]
    Cable {
        /// Distinct offending cable names, in first-seen order.
        invalid: Vec<String>,
        /// Selected cable names plus the `"-"` sentinel.
        allowed: Vec<String>,
    },
}

impl AnalysisError {
    /// Short taxonomy name, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FileRead { .. } => "FileReadError",
            Self::Schema { .. } => "SchemaError",
            Self::Column { .. } => "ColumnError",
            Self::Type { .. } => "TypeError",
            Self::Range { .. } => "RangeError",
            Self::Cable { .. } => "CableError",
        }
    }
}
