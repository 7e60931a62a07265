//! Loss, efficiency, and ROI analysis for power-distribution construction
//! budgets (RAB workbooks).

/// Validation, loss calculation, and aggregation pipeline.
pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
/// Workbook loading and CSV export.
pub mod io;
pub mod logging;
pub mod report;

pub use analysis::{AnalysisReport, run_analysis};
pub use config::AnalysisConfig;
pub use error::AnalysisError;
