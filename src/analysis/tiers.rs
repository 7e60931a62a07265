//! Fixed-threshold summary classifications.
//!
//! Three independent tiers, each a qualitative label plus a severity token.
//! Thresholds are fixed business rules. Each tier serializes as
//! `{ tier, label, severity, color }`.

use std::fmt;

use serde::{Serialize, Serializer};

/// Severity of a tier, mapped to a display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Green.
    Good,
    /// Amber.
    Moderate,
    /// Red.
    Poor,
}

impl Severity {
    /// Lowercase token, e.g. `"moderate"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Moderate => "moderate",
            Self::Poor => "poor",
        }
    }
}

#[derive(Serialize)]
struct TierView {
    tier: &'static str,
    label: &'static str,
    severity: Severity,
    color: &'static str,
}

/// Mean-efficiency tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EfficiencyTier {
    /// Mean efficiency above 95%.
    VeryGood,
    /// Mean efficiency above 90%.
    Good,
    /// Anything else.
    NeedsImprovement,
}

impl EfficiencyTier {
    /// Classifies a mean efficiency (%).
    pub fn classify(mean_efficiency_pct: f64) -> Self {
        if mean_efficiency_pct > 95.0 {
            Self::VeryGood
        } else if mean_efficiency_pct > 90.0 {
            Self::Good
        } else {
            Self::NeedsImprovement
        }
    }

    /// Stable identifier, e.g. `"very_good"`.
    pub fn key(self) -> &'static str {
        match self {
            Self::VeryGood => "very_good",
            Self::Good => "good",
            Self::NeedsImprovement => "needs_improvement",
        }
    }

    /// Human-readable label used in conclusions.
    pub fn label(self) -> &'static str {
        match self {
            Self::VeryGood => "very good",
            Self::Good => "good",
            Self::NeedsImprovement => "needs improvement",
        }
    }

    /// Severity token behind the color.
    pub fn severity(self) -> Severity {
        match self {
            Self::VeryGood => Severity::Good,
            Self::Good => Severity::Moderate,
            Self::NeedsImprovement => Severity::Poor,
        }
    }

    /// Display color (hex).
    pub fn color(self) -> &'static str {
        match self {
            Self::VeryGood => "#65e23b",
            Self::Good => "#e6bf42",
            Self::NeedsImprovement => "#e62535",
        }
    }
}

/// Mean-savings tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavingsTier {
    /// Mean savings above 3 kW.
    Excellent,
    /// Mean savings above 1 kW.
    Fair,
    /// Anything else.
    Low,
}

impl SavingsTier {
    /// Classifies a mean loss saving (kW).
    pub fn classify(mean_savings_kw: f64) -> Self {
        if mean_savings_kw > 3.0 {
            Self::Excellent
        } else if mean_savings_kw > 1.0 {
            Self::Fair
        } else {
            Self::Low
        }
    }

    /// Stable identifier, e.g. `"excellent"`.
    pub fn key(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Fair => "fair",
            Self::Low => "low",
        }
    }

    /// Human-readable label used in conclusions.
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Fair => "fair",
            Self::Low => "low",
        }
    }

    /// Severity token behind the color.
    pub fn severity(self) -> Severity {
        match self {
            Self::Excellent => Severity::Good,
            Self::Fair => Severity::Moderate,
            Self::Low => Severity::Poor,
        }
    }

    /// Display color (hex).
    pub fn color(self) -> &'static str {
        match self {
            Self::Excellent => "#68e240",
            Self::Fair => "#e0b62a",
            Self::Low => "#e01425",
        }
    }
}

/// Project ROI tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoiTier {
    /// ROI above 20%.
    Feasible,
    /// ROI above 10%.
    Marginal,
    /// Anything else.
    NotFeasible,
}

impl RoiTier {
    /// Classifies an annual ROI (%).
    pub fn classify(roi_pct: f64) -> Self {
        if roi_pct > 20.0 {
            Self::Feasible
        } else if roi_pct > 10.0 {
            Self::Marginal
        } else {
            Self::NotFeasible
        }
    }

    /// Stable identifier, e.g. `"feasible"`.
    pub fn key(self) -> &'static str {
        match self {
            Self::Feasible => "feasible",
            Self::Marginal => "marginal",
            Self::NotFeasible => "not_feasible",
        }
    }

    /// Human-readable label used in conclusions.
    pub fn label(self) -> &'static str {
        match self {
            Self::Feasible => "feasible",
            Self::Marginal => "marginal",
            Self::NotFeasible => "not feasible",
        }
    }

    /// Severity token behind the color.
    pub fn severity(self) -> Severity {
        match self {
            Self::Feasible => Severity::Good,
            Self::Marginal => Severity::Moderate,
            Self::NotFeasible => Severity::Poor,
        }
    }

    /// Display color (hex).
    pub fn color(self) -> &'static str {
        match self {
            Self::Feasible => "#77f04f",
            Self::Marginal => "#e4b725",
            Self::NotFeasible => "#f12738",
        }
    }
}

fn serialize_tier<S: Serializer>(
    serializer: S,
    tier: &'static str,
    label: &'static str,
    severity: Severity,
    color: &'static str,
) -> Result<S::Ok, S::Error> {
    TierView {
        tier,
        label,
        severity,
        color,
    }
    .serialize(serializer)
}

impl Serialize for EfficiencyTier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_tier(serializer, self.key(), self.label(), self.severity(), self.color())
    }
}

impl Serialize for SavingsTier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_tier(serializer, self.key(), self.label(), self.severity(), self.color())
    }
}

impl Serialize for RoiTier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_tier(serializer, self.key(), self.label(), self.severity(), self.color())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for EfficiencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for SavingsTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for RoiTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
