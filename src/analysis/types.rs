//! Core analysis types: input records, enriched output, and the cable table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Cable sentinel meaning "no cable specified" / "no recommendation".
pub const NO_CABLE: &str = "-";

/// Hours per year used to annualize kW savings.
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Normalizes a cable name for comparison by dropping all whitespace.
///
/// Workbooks spell the same cable as `"NFA2X-T 2 x 70 + N 70 mm²"` or
/// `"NFA2X-T 2x70+N70mm²"`.
pub fn cable_key(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Network phase arrangement of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PhaseType {
    /// Single-phase supply: `I = S / V`.
    SinglePhase,
    /// Balanced three-phase supply: `I = S / (√3 · V)`.
    ThreePhase,
}

impl PhaseType {
    /// Parses `"1 Phase"`/`"3 Phase"` spellings, ignoring case and whitespace.
    ///
    /// Bare `"1"` and `"3"` are accepted as well.
    pub fn parse(text: &str) -> Option<Self> {
        match cable_key(text).to_ascii_lowercase().as_str() {
            "1phase" | "1" => Some(Self::SinglePhase),
            "3phase" | "3" => Some(Self::ThreePhase),
            _ => None,
        }
    }

    /// Display label used in tables and exports.
    pub fn label(self) -> &'static str {
        match self {
            Self::SinglePhase => "1 Phase",
            Self::ThreePhase => "3 Phase",
        }
    }
}

impl fmt::Display for PhaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for PhaseType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
            .ok_or_else(|| format!("unknown phase type \"{value}\", expected \"1 Phase\" or \"3 Phase\""))
    }
}

impl From<PhaseType> for String {
    fn from(value: PhaseType) -> Self {
        value.label().to_string()
    }
}

/// One RAB line item. Only the total is used downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct CostItem {
    /// Line total in Rupiah (>= 0).
    pub total_cost: f64,
}

/// One Gambar row after validation and preprocessing.
///
/// All defaults are already applied; every numeric field is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRecord {
    /// Location identifier (display and filter key, not unique).
    pub name: String,
    /// Cable type as written in the workbook, or [`NO_CABLE`].
    pub cable_type: String,
    /// Network length (m, >= 0).
    pub length_m: f64,
    /// Total load (kVA, > 0 after validation).
    pub load_kva: f64,
    /// Service voltage (V, > 0 after validation).
    pub voltage_v: f64,
    /// Phase arrangement.
    pub phase: PhaseType,
    /// Transformer rating (kVA), when the workbook provides one.
    pub transformer_rated_kva: Option<f64>,
    /// Transformer loss (kW), derived, explicit, or defaulted.
    pub transformer_loss_kw: f64,
    /// Old-network losses (kW) the savings are measured against.
    pub baseline_losses_kw: f64,
}

/// A [`LocationRecord`] with every computed column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    /// Location identifier.
    pub name: String,
    /// Cable type as written in the workbook.
    pub cable_type: String,
    /// Phase arrangement.
    pub phase: PhaseType,
    /// Network length (m).
    pub length_m: f64,
    /// Total load (kVA).
    pub load_kva: f64,
    /// Service voltage (V).
    pub voltage_v: f64,
    /// Transformer rating (kVA), if given.
    pub transformer_rated_kva: Option<f64>,
    /// Transformer loss (kW).
    pub transformer_loss_kw: f64,
    /// Baseline losses (kW).
    pub baseline_losses_kw: f64,
    /// Conductor I²R loss (kW).
    pub conductor_loss_kw: f64,
    /// `conductor_loss_kw + transformer_loss_kw`.
    pub total_loss_kw: f64,
    /// Technical efficiency (%), not clamped.
    pub efficiency_pct: f64,
    /// `baseline_losses_kw - total_loss_kw`, may be negative.
    pub loss_savings_kw: f64,
    /// `max(loss_savings_kw, 0) * 8760 * tariff` (Rp/year).
    pub annual_benefit: f64,
    /// Cable with the lowest conductor loss, or [`NO_CABLE`].
    pub recommended_cable: String,
}

/// Resistance table: selected cables in catalog order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CableTable {
    entries: Vec<(String, f64)>,
}

impl CableTable {
    /// Creates a table from `(name, ohm/km)` pairs, keeping their order.
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    /// Number of cables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no cable is selected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(name, ohm/km)` in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, r)| (n.as_str(), *r))
    }

    /// First entry, the substitute for unknown cable types.
    pub fn first(&self) -> Option<(&str, f64)> {
        self.iter().next()
    }

    /// Looks up a cable by whitespace-insensitive name.
    pub fn resolve(&self, name: &str) -> Option<(&str, f64)> {
        let key = cable_key(name);
        self.iter().find(|(n, _)| cable_key(n) == key)
    }

    /// Returns `true` if `name` is a selected cable.
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Selected names followed by the sentinel, for error messages.
    pub fn allowed_names(&self) -> Vec<String> {
        self.iter()
            .map(|(n, _)| n.to_string())
            .chain(std::iter::once(NO_CABLE.to_string()))
            .collect()
    }
}
