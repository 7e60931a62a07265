//! Sheet and column names of the RAB workbook template.

/// Cost budget sheet.
pub const SHEET_RAB: &str = "RAB";
/// Technical layout sheet.
pub const SHEET_GAMBAR: &str = "Gambar";
/// Sheets every workbook must contain.
pub const REQUIRED_SHEETS: &[&str] = &[SHEET_RAB, SHEET_GAMBAR];

pub const COL_TOTAL_COST: &str = "Total (Rp)";

pub const COL_LOCATION: &str = "Nama Lokasi";
pub const COL_CABLE: &str = "Jenis Kabel";
pub const COL_LENGTH: &str = "Panjang Jaringan (m)";
pub const COL_LOAD: &str = "Beban Total (kVA)";
pub const COL_VOLTAGE: &str = "Tegangan (V)";
pub const COL_PHASE: &str = "Tipe Phase";
pub const COL_TRANSFORMER_RATING: &str = "Daya Trafo (kVA)";
pub const COL_TRANSFORMER_LOSS: &str = "Rugi Trafo (kW)";
pub const COL_BASELINE: &str = "Baseline Losses (kW)";

/// Required RAB columns.
pub const REQUIRED_RAB_COLUMNS: &[&str] = &[COL_TOTAL_COST];

/// Required Gambar columns.
pub const REQUIRED_GAMBAR_COLUMNS: &[&str] =
    &[COL_LOCATION, COL_CABLE, COL_LENGTH, COL_LOAD, COL_VOLTAGE];

/// Voltage assumed for a blank `Tegangan (V)` cell.
pub const DEFAULT_VOLTAGE_V: f64 = 380.0;
