//! Compensation pattern records.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Kind of compensatory movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CompensationKind {
    /// Lateral lean of the trunk.
    TrunkLean,
    /// Axial rotation of the trunk away from the expected facing.
    TrunkRotation,
    /// Shoulder elevated toward the ear.
    ShoulderHiking,
    /// Unwanted elbow flexion during an extended-arm movement.
    ElbowFlexion,
    /// Pelvic tilt in the coronal plane.
    HipHike,
}

impl CompensationKind {
    /// Snake-case tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TrunkLean => "trunk_lean",
            Self::TrunkRotation => "trunk_rotation",
            Self::ShoulderHiking => "shoulder_hiking",
            Self::ElbowFlexion => "elbow_flexion",
            Self::HipHike => "hip_hike",
        }
    }
}

impl std::fmt::Display for CompensationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity tier, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Severity {
    /// Below the first reporting tier.
    Minimal,
    /// First reporting tier.
    Mild,
    /// Second tier.
    Moderate,
    /// Highest tier.
    Severe,
}

impl Severity {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }

    /// Returns `true` for tiers that are reported to callers.
    #[must_use]
    pub const fn is_reportable(self) -> bool {
        !matches!(self, Self::Minimal)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit of a compensation magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MagnitudeUnit {
    /// Angular deviation.
    Degrees,
    /// Percentage of a body-relative reference length.
    Percent,
    /// Linear distance, for landmark sources calibrated to metric space.
    Centimeters,
}

/// A detected compensation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompensationPattern {
    /// What was detected.
    pub kind: CompensationKind,
    /// How severe it is.
    pub severity: Severity,
    /// Size of the deviation in `unit`.
    pub magnitude: f64,
    /// Unit of `magnitude`.
    pub unit: MagnitudeUnit,
    /// Joint or region the pattern affects.
    pub affected_joint: String,
    /// Human-readable note.
    pub note: String,
}
