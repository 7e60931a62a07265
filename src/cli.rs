//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::analysis::types::PhaseType;
use crate::config::{AnalysisConfig, ConfigError};

/// Power-distribution loss and ROI analysis for RAB workbooks.
#[derive(Debug, Parser)]
#[command(name = "rab-efficiency", version, about)]
pub struct CliArgs {
    /// Workbook (.xlsx/.xls/.ods) or a directory holding RAB.csv and Gambar.csv.
    pub workbook: PathBuf,

    /// Load configuration from a TOML file.
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Use a built-in preset (default, single_phase).
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Electricity tariff override (Rp/kWh).
    #[arg(long, value_name = "RP_PER_KWH")]
    pub tariff: Option<f64>,

    /// Power factor override (0-1).
    #[arg(long, value_name = "PF")]
    pub power_factor: Option<f64>,

    /// Default phase override ("1 Phase" or "3 Phase").
    #[arg(long, value_name = "PHASE")]
    pub phase: Option<String>,

    /// Restrict the cable selection; repeat for several cables.
    #[arg(long = "cable", value_name = "NAME")]
    pub cables: Vec<String>,

    /// Only report on this location.
    #[arg(long, value_name = "NAME")]
    pub location: Option<String>,

    /// Export the (filtered) enriched table to CSV.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Skip the text bar charts.
    #[arg(long)]
    pub no_charts: bool,

    /// Emit logs as JSON lines on stderr.
    #[arg(long)]
    pub log_json: bool,
}

impl CliArgs {
    /// Resolves the configuration: overrides → `--config` → `--preset` → defaults.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file or preset cannot be loaded or the
    /// phase override is unreadable. Range checks are left to
    /// [`AnalysisConfig::validate`].
    pub fn resolve_config(&self) -> Result<AnalysisConfig, ConfigError> {
        let mut cfg = if let Some(path) = &self.config {
            AnalysisConfig::from_toml_file(path)?
        } else if let Some(name) = &self.preset {
            AnalysisConfig::from_preset(name)?
        } else {
            AnalysisConfig::baseline()
        };

        if let Some(tariff) = self.tariff {
            cfg.economics.tariff_per_kwh = tariff;
        }
        if let Some(pf) = self.power_factor {
            cfg.economics.power_factor = pf;
        }
        if let Some(phase) = &self.phase {
            cfg.network.default_phase = PhaseType::parse(phase).ok_or_else(|| ConfigError {
                field: "--phase".to_string(),
                message: format!("unknown phase type \"{phase}\", expected \"1 Phase\" or \"3 Phase\""),
            })?;
        }
        if !self.cables.is_empty() {
            cfg.cables.selected = self.cables.clone();
        }
        Ok(cfg)
    }
}
