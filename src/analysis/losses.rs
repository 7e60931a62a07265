//! Loss calculator: transformer loss, conductor I²R loss, efficiency, and
//! cable recommendation for one location.
//!
//! Every function here is pure. [`LossCache`] memoizes the conductor-loss
//! and recommendation results within one run.

use std::collections::HashMap;

use super::types::{CableTable, LocationRecord, NO_CABLE, PhaseType};
use super::warning::WarningKind;

/// Transformer loss (kW) from a quadratic copper-loss model.
///
/// `core + full_load × (load / rated)²`. With a non-positive load or rating
/// the load ratio is undefined and only the core loss applies.
pub fn transformer_loss_kw(
    load_kva: f64,
    rated_kva: f64,
    core_loss_kw: f64,
    full_load_loss_kw: f64,
) -> f64 {
    if load_kva <= 0.0 || rated_kva <= 0.0 {
        return core_loss_kw;
    }
    let load_ratio = load_kva / rated_kva;
    core_loss_kw + load_ratio * load_ratio * full_load_loss_kw
}

/// Line current magnitude (A) for an apparent load at a voltage.
///
/// Three-phase: `S / (√3 · V)`; single-phase: `S / V`.
pub fn line_current_a(load_kva: f64, voltage_v: f64, phase: PhaseType) -> f64 {
    let va = load_kva * 1000.0;
    match phase {
        PhaseType::ThreePhase => va / (3.0_f64.sqrt() * voltage_v),
        PhaseType::SinglePhase => va / voltage_v,
    }
}

/// I²R loss (kW) over a line of given resistance and length.
///
/// Returns 0 for a non-positive load or voltage.
///
/// # Arguments
///
/// * `resistance_ohm_per_km` - Conductor resistance
/// * `length_m` - Line length in meters
/// * `load_kva` - Apparent load
/// * `voltage_v` - Service voltage
/// * `phase` - Phase arrangement
pub fn i2r_loss_kw(
    resistance_ohm_per_km: f64,
    length_m: f64,
    load_kva: f64,
    voltage_v: f64,
    phase: PhaseType,
) -> f64 {
    if load_kva <= 0.0 || voltage_v <= 0.0 {
        return 0.0;
    }
    let r = resistance_ohm_per_km * (length_m / 1000.0);
    let i = line_current_a(load_kva, voltage_v, phase);
    i * i * r / 1000.0
}

/// Conductor loss of one location plus how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct ConductorLoss {
    /// Loss in kW.
    pub loss_kw: f64,
    /// Cable whose resistance was used, `None` when no calculation ran.
    pub cable_used: Option<String>,
    /// Substitution that happened along the way, if any.
    pub warning: Option<WarningKind>,
}

/// Conductor loss for a location using its own cable type.
///
/// Unknown cable types (including the `"-"` sentinel) fall back to the
/// first entry of `cables` and report [`WarningKind::UnknownCable`].
pub fn conductor_loss(record: &LocationRecord, cables: &CableTable) -> ConductorLoss {
    if record.load_kva <= 0.0 || record.voltage_v <= 0.0 {
        return ConductorLoss {
            loss_kw: 0.0,
            cable_used: None,
            warning: Some(WarningKind::InvalidInput {
                load_kva: record.load_kva,
                voltage_v: record.voltage_v,
            }),
        };
    }

    let (cable, resistance, warning) = match cables.resolve(&record.cable_type) {
        Some((name, r)) => (name, r, None),
        None => {
            let Some((first, r)) = cables.first() else {
                return ConductorLoss {
                    loss_kw: 0.0,
                    cable_used: None,
                    warning: Some(WarningKind::UnknownCable {
                        requested: record.cable_type.clone(),
                        substituted: NO_CABLE.to_string(),
                    }),
                };
            };
            let warning = WarningKind::UnknownCable {
                requested: record.cable_type.clone(),
                substituted: first.to_string(),
            };
            (first, r, Some(warning))
        }
    };

    ConductorLoss {
        loss_kw: i2r_loss_kw(
            resistance,
            record.length_m,
            record.load_kva,
            record.voltage_v,
            record.phase,
        ),
        cable_used: Some(cable.to_string()),
        warning,
    }
}

/// Technical efficiency (%): `100 × (1 − losses / (load × pf))`.
///
/// Returns 0 for a non-positive load or power factor. Not clamped: callers
/// flag results outside 0-100.
pub fn efficiency_pct(
    conductor_loss_kw: f64,
    transformer_loss_kw: f64,
    load_kva: f64,
    power_factor: f64,
) -> f64 {
    if load_kva <= 0.0 || power_factor <= 0.0 {
        return 0.0;
    }
    let total_loss = conductor_loss_kw + transformer_loss_kw;
    let input_kw = load_kva * power_factor;
    100.0 * (1.0 - total_loss / input_kw)
}

/// Cable with the lowest conductor loss for this location.
///
/// Ties keep the earliest cable in table order. Returns `"-"` for a
/// non-positive load or an empty table.
pub fn recommend_cable(record: &LocationRecord, cables: &CableTable) -> String {
    if record.load_kva <= 0.0 {
        return NO_CABLE.to_string();
    }
    let mut best: Option<(&str, f64)> = None;
    for (name, resistance) in cables.iter() {
        let loss = i2r_loss_kw(
            resistance,
            record.length_m,
            record.load_kva,
            record.voltage_v,
            record.phase,
        );
        if best.is_none_or(|(_, best_loss)| loss < best_loss) {
            best = Some((name, loss));
        }
    }
    best.map_or_else(|| NO_CABLE.to_string(), |(name, _)| name.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LossKey {
    cable: String,
    length_bits: u64,
    load_bits: u64,
    voltage_bits: u64,
    phase: PhaseType,
}

impl LossKey {
    fn new(record: &LocationRecord, cable: &str) -> Self {
        Self {
            cable: cable.to_string(),
            length_bits: record.length_m.to_bits(),
            load_bits: record.load_kva.to_bits(),
            voltage_bits: record.voltage_v.to_bits(),
            phase: record.phase,
        }
    }
}

/// Per-run memo of conductor losses and recommendations.
///
/// Keyed by the exact inputs each function reads, so a hit returns what a
/// fresh computation would, warning included.
#[derive(Debug)]
pub struct LossCache<'a> {
    cables: &'a CableTable,
    conductor: HashMap<LossKey, ConductorLoss>,
    recommended: HashMap<LossKey, String>,
    hits: usize,
}

impl<'a> LossCache<'a> {
    /// Creates an empty cache bound to one resistance table.
    pub fn new(cables: &'a CableTable) -> Self {
        Self {
            cables,
            conductor: HashMap::new(),
            recommended: HashMap::new(),
            hits: 0,
        }
    }

    /// Memoized [`conductor_loss`].
    pub fn conductor_loss(&mut self, record: &LocationRecord) -> ConductorLoss {
        let key = LossKey::new(record, &record.cable_type);
        if let Some(hit) = self.conductor.get(&key) {
            self.hits += 1;
            return hit.clone();
        }
        let result = conductor_loss(record, self.cables);
        self.conductor.insert(key, result.clone());
        result
    }

    /// Memoized [`recommend_cable`].
    pub fn recommend_cable(&mut self, record: &LocationRecord) -> String {
        let key = LossKey::new(record, "");
        if let Some(hit) = self.recommended.get(&key) {
            self.hits += 1;
            return hit.clone();
        }
        let result = recommend_cable(record, self.cables);
        self.recommended.insert(key, result.clone());
        result
    }

    /// Number of lookups answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }
}
