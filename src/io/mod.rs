//! Workbook input and CSV output.

pub mod export;
pub mod workbook;
