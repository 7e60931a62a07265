//! TOML-based analysis configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::analysis::types::{CableTable, PhaseType, cable_key};

/// Fixed cable catalog: name and resistance in ohm/km.
///
/// Iteration order of this slice is the deterministic order used for
/// unknown-cable substitution and recommendation tie-breaks.
pub const CABLE_CATALOG: &[(&str, f64)] = &[
    ("NFA2X-T 2x70+N70mm²", 0.443),
    ("NFA2X-T 3x70+N70mm²", 0.443),
];

/// Top-level analysis configuration parsed from TOML.
///
/// All fields have defaults matching the built-in `default` preset. Load
/// from TOML with [`AnalysisConfig::from_toml_file`] or use
/// [`AnalysisConfig::baseline`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Tariff and power factor.
    #[serde(default)]
    pub economics: EconomicsConfig,
    /// Per-location defaults for optional Gambar columns.
    #[serde(default)]
    pub network: NetworkConfig,
    /// Transformer loss model parameters.
    #[serde(default)]
    pub transformer: TransformerConfig,
    /// Cable selection from [`CABLE_CATALOG`].
    #[serde(default)]
    pub cables: CableConfig,
}

/// Tariff and power factor.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EconomicsConfig {
    /// Electricity tariff (Rp/kWh, >= 0).
    pub tariff_per_kwh: f64,
    /// Power factor (0.0-1.0).
    pub power_factor: f64,
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        Self {
            tariff_per_kwh: 1500.0,
            power_factor: 0.8,
        }
    }
}

/// Per-location defaults applied when a Gambar column or cell is missing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    /// Phase assumed when `Tipe Phase` is absent or unreadable.
    pub default_phase: PhaseType,
    /// Transformer loss (kW) when neither rating nor explicit loss is given.
    pub default_transformer_loss_kw: f64,
    /// Losses of the old network (kW) used to compute savings.
    pub default_baseline_losses_kw: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            default_phase: PhaseType::ThreePhase,
            default_transformer_loss_kw: 0.5,
            default_baseline_losses_kw: 5.0,
        }
    }
}

/// Transformer loss model parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformerConfig {
    /// No-load (core) loss in kW.
    pub default_core_loss_kw: f64,
    /// Copper loss at rated load in kW.
    pub default_full_load_loss_kw: f64,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            default_core_loss_kw: 0.2,
            default_full_load_loss_kw: 1.0,
        }
    }
}

/// Cable selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CableConfig {
    /// Selected catalog names. Matching ignores whitespace.
    pub selected: Vec<String>,
}

impl Default for CableConfig {
    fn default() -> Self {
        Self {
            selected: CABLE_CATALOG
                .iter()
                .map(|(name, _)| (*name).to_string())
                .collect(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"economics.power_factor"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl AnalysisConfig {
    /// Returns the default configuration (the values the sidebar starts with).
    pub fn baseline() -> Self {
        Self {
            economics: EconomicsConfig::default(),
            network: NetworkConfig::default(),
            transformer: TransformerConfig::default(),
            cables: CableConfig::default(),
        }
    }

    /// Returns the single-phase preset: locations default to single-phase and
    /// only the two-core cable is selected.
    pub fn single_phase() -> Self {
        Self {
            network: NetworkConfig {
                default_phase: PhaseType::SinglePhase,
                ..NetworkConfig::default()
            },
            cables: CableConfig {
                selected: vec![CABLE_CATALOG[0].0.to_string()],
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["default", "single_phase"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::baseline()),
            "single_phase" => Ok(Self::single_phase()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Builds the resistance table from the selected cables, in catalog order.
    ///
    /// Unknown selections are silently skipped here; [`Self::validate`]
    /// reports them.
    pub fn cable_table(&self) -> CableTable {
        let wanted: Vec<String> = self.cables.selected.iter().map(|s| cable_key(s)).collect();
        CableTable::new(
            CABLE_CATALOG
                .iter()
                .filter(|(name, _)| wanted.contains(&cable_key(name)))
                .map(|(name, r)| ((*name).to_string(), *r))
                .collect(),
        )
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let mut non_negative = |field: &str, value: f64| {
            if !value.is_finite() {
                errors.push(ConfigError::new(field, "must be finite"));
            } else if value < 0.0 {
                errors.push(ConfigError::new(field, "must be >= 0"));
            }
        };
        non_negative("economics.tariff_per_kwh", self.economics.tariff_per_kwh);
        non_negative(
            "network.default_transformer_loss_kw",
            self.network.default_transformer_loss_kw,
        );
        non_negative(
            "network.default_baseline_losses_kw",
            self.network.default_baseline_losses_kw,
        );
        non_negative(
            "transformer.default_core_loss_kw",
            self.transformer.default_core_loss_kw,
        );
        non_negative(
            "transformer.default_full_load_loss_kw",
            self.transformer.default_full_load_loss_kw,
        );

        let pf = self.economics.power_factor;
        if !(0.0..=1.0).contains(&pf) {
            errors.push(ConfigError::new(
                "economics.power_factor",
                "must be in [0.0, 1.0]",
            ));
        }

        if self.cables.selected.is_empty() {
            errors.push(ConfigError::new(
                "cables.selected",
                "must select at least one cable",
            ));
        }
        for name in &self.cables.selected {
            let known = CABLE_CATALOG
                .iter()
                .any(|(c, _)| cable_key(c) == cable_key(name));
            if !known {
                let catalog: Vec<&str> = CABLE_CATALOG.iter().map(|(c, _)| *c).collect();
                errors.push(ConfigError::new(
                    "cables.selected",
                    format!(
                        "unknown cable \"{name}\", catalog: {}",
                        catalog.join(", ")
                    ),
                ));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = AnalysisConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn baseline_matches_sidebar_defaults() {
        let cfg = AnalysisConfig::baseline();
        assert_eq!(cfg.economics.tariff_per_kwh, 1500.0);
        assert_eq!(cfg.economics.power_factor, 0.8);
        assert_eq!(cfg.network.default_phase, PhaseType::ThreePhase);
        assert_eq!(cfg.network.default_transformer_loss_kw, 0.5);
        assert_eq!(cfg.network.default_baseline_losses_kw, 5.0);
        assert_eq!(cfg.transformer.default_core_loss_kw, 0.2);
        assert_eq!(cfg.transformer.default_full_load_loss_kw, 1.0);
        assert_eq!(cfg.cable_table().len(), 2);
    }

    #[test]
    fn from_preset_unknown() {
        let err = AnalysisConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in AnalysisConfig::PRESETS {
            let cfg = AnalysisConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[economics]
tariff_per_kwh = 1444.7
power_factor = 0.85

[network]
default_phase = "1 phase"
default_transformer_loss_kw = 0.7
default_baseline_losses_kw = 4.0

[transformer]
default_core_loss_kw = 0.25
default_full_load_loss_kw = 1.35

[cables]
selected = ["NFA2X-T 3 x 70 + N 70 mm²"]
"#;
        let cfg = AnalysisConfig::from_toml_str(toml).expect("valid TOML should parse");
        assert_eq!(cfg.economics.power_factor, 0.85);
        assert_eq!(cfg.network.default_phase, PhaseType::SinglePhase);
        assert!(cfg.validate().is_empty());

        let table = cfg.cable_table();
        assert_eq!(table.len(), 1);
        assert_eq!(table.first().map(|(n, _)| n), Some("NFA2X-T 3x70+N70mm²"));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[economics]
tariff_per_kwh = 2000
"#;
        let cfg = AnalysisConfig::from_toml_str(toml).expect("partial TOML should parse");
        assert_eq!(cfg.economics.tariff_per_kwh, 2000.0);
        assert_eq!(cfg.economics.power_factor, 0.8);
        assert_eq!(cfg.cables.selected.len(), CABLE_CATALOG.len());
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[economics]
tariff_per_kwh = 1500
bogus_field = true
"#;
        assert!(AnalysisConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn unknown_phase_text_rejected() {
        let toml = r#"
[network]
default_phase = "2 Phase"
"#;
        assert!(AnalysisConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_catches_power_factor_out_of_range() {
        let mut cfg = AnalysisConfig::baseline();
        cfg.economics.power_factor = 1.2;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "economics.power_factor"));
    }

    #[test]
    fn validation_catches_negative_tariff() {
        let mut cfg = AnalysisConfig::baseline();
        cfg.economics.tariff_per_kwh = -1.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "economics.tariff_per_kwh"));
    }

    #[test]
    fn validation_catches_empty_and_unknown_cables() {
        let mut cfg = AnalysisConfig::baseline();
        cfg.cables.selected.clear();
        assert!(
            cfg.validate()
                .iter()
                .any(|e| e.message.contains("at least one"))
        );

        cfg.cables.selected = vec!["XLPE 4x95".to_string()];
        assert!(
            cfg.validate()
                .iter()
                .any(|e| e.message.contains("unknown cable"))
        );
    }

    #[test]
    fn cable_table_keeps_catalog_order() {
        let mut cfg = AnalysisConfig::baseline();
        cfg.cables.selected = vec![
            CABLE_CATALOG[1].0.to_string(),
            CABLE_CATALOG[0].0.to_string(),
        ];
        let table = cfg.cable_table();
        let names: Vec<&str> = table.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec![CABLE_CATALOG[0].0, CABLE_CATALOG[1].0]);
    }
}
