//! Non-fatal analysis warnings.
//!
//! A warning never stops a run; the affected value is substituted locally
//! and the warning travels with the report.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use super::types::PhaseType;

/// What went wrong, with the values involved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum WarningKind {
    /// Load exceeds 90% of the transformer rating.
    Overload {
        /// Location load (kVA).
        load_kva: f64,
        /// Transformer rating (kVA).
        rated_kva: f64,
    },
    /// Load or voltage is not positive; conductor loss was taken as zero.
    InvalidInput {
        /// Location load (kVA).
        load_kva: f64,
        /// Service voltage (V).
        voltage_v: f64,
    },
    /// Cable type not in the resistance table; the first entry was used.
    UnknownCable {
        /// Cable type as written.
        requested: String,
        /// Cable whose resistance was used instead.
        substituted: String,
    },
    /// Efficiency fell outside 0-100%.
    EfficiencyRange {
        /// Computed efficiency (%).
        efficiency_pct: f64,
    },
    /// Phase type was missing or unreadable; the configured default applies.
    PhaseDefaulted {
        /// Phase assumed instead.
        assumed: PhaseType,
    },
}

impl WarningKind {
    /// Taxonomy name, used as a structured log field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Overload { .. } => "OverloadWarning",
            Self::InvalidInput { .. } => "InvalidInputWarning",
            Self::UnknownCable { .. } => "UnknownCableWarning",
            Self::EfficiencyRange { .. } => "EfficiencyRangeWarning",
            Self::PhaseDefaulted { .. } => "PhaseDefaultedWarning",
        }
    }
}

/// A warning attached to a location, or to the whole run when `location` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisWarning {
    /// Location name, `None` for run-level warnings.
    pub location: Option<String>,
    /// Warning details.
    #[serde(flatten)]
    pub kind: WarningKind,
}

impl AnalysisWarning {
    /// Creates a warning for one location.
    pub fn at(location: &str, kind: WarningKind) -> Self {
        Self {
            location: Some(location.to_string()),
            kind,
        }
    }

    /// Creates a run-level warning.
    pub fn run(kind: WarningKind) -> Self {
        Self {
            location: None,
            kind,
        }
    }

    /// Logs the warning through `tracing` and returns it unchanged.
    pub fn logged(self) -> Self {
        warn!(
            kind = self.kind.name(),
            location = self.location.as_deref().unwrap_or("*"),
            "{self}"
        );
        self
    }
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "[{loc}] ")?;
        }
        match &self.kind {
            WarningKind::Overload {
                load_kva,
                rated_kva,
            } => write!(
                f,
                "load {load_kva:.2} kVA exceeds 90% of transformer rating {rated_kva:.2} kVA"
            ),
            WarningKind::InvalidInput {
                load_kva,
                voltage_v,
            } => write!(
                f,
                "invalid load/voltage ({load_kva:.2} kVA, {voltage_v:.2} V), conductor loss taken as 0"
            ),
            WarningKind::UnknownCable {
                requested,
                substituted,
            } => write!(
                f,
                "cable type \"{requested}\" not recognized, using \"{substituted}\""
            ),
            WarningKind::EfficiencyRange { efficiency_pct } => write!(
                f,
                "efficiency {efficiency_pct:.2}% outside realistic range (0-100%), check input data"
            ),
            WarningKind::PhaseDefaulted { assumed } => {
                write!(f, "phase type missing or unreadable, assuming \"{assumed}\"")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_location() {
        let w = AnalysisWarning::at(
            "Gardu A",
            WarningKind::UnknownCable {
                requested: "-".into(),
                substituted: "NFA2X-T 2x70+N70mm²".into(),
            },
        );
        let s = w.to_string();
        assert!(s.starts_with("[Gardu A] "));
        assert!(s.contains("NFA2X-T 2x70+N70mm²"));
    }

    #[test]
    fn run_level_warning_has_no_prefix() {
        let w = AnalysisWarning::run(WarningKind::PhaseDefaulted {
            assumed: PhaseType::ThreePhase,
        });
        assert!(w.to_string().starts_with("phase type"));
        assert_eq!(w.kind.name(), "PhaseDefaultedWarning");
    }
}
