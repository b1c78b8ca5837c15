//! Severity tiers for each detector.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use biomech_types::Severity;

use crate::error::{CompensationError, Result};

/// Lower bounds of the mild, moderate and severe tiers.
///
/// Magnitudes below `mild` grade as [`Severity::Minimal`]. The top tier
/// starts strictly above `severe`.
///
/// # Example
///
/// ```
/// use biomech_compensation::SeverityScale;
/// use biomech_types::Severity;
///
/// let scale = SeverityScale::new(5.0, 10.0, 15.0);
/// assert_eq!(scale.grade(3.0), Severity::Minimal);
/// assert_eq!(scale.grade(7.0), Severity::Mild);
/// assert_eq!(scale.grade(12.0), Severity::Moderate);
/// assert_eq!(scale.grade(18.0), Severity::Severe);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeverityScale {
    /// Start of the mild tier.
    pub mild: f64,
    /// Start of the moderate tier.
    pub moderate: f64,
    /// Magnitudes above this are severe.
    pub severe: f64,
}

impl SeverityScale {
    /// Creates a scale.
    #[must_use]
    pub const fn new(mild: f64, moderate: f64, severe: f64) -> Self {
        Self {
            mild,
            moderate,
            severe,
        }
    }

    /// Grades a non-negative magnitude. NaN grades as minimal.
    #[must_use]
    pub fn grade(&self, magnitude: f64) -> Severity {
        if magnitude > self.severe {
            Severity::Severe
        } else if magnitude >= self.moderate {
            Severity::Moderate
        } else if magnitude >= self.mild {
            Severity::Mild
        } else {
            Severity::Minimal
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        let ordered = self.mild > 0.0 && self.mild <= self.moderate && self.moderate <= self.severe;
        if ordered && self.severe.is_finite() {
            Ok(())
        } else {
            Err(CompensationError::invalid_config(format!(
                "{name} tiers must be positive and ascending"
            )))
        }
    }
}

/// Thresholds for every detector.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CompensationThresholds {
    /// Lateral trunk lean, degrees. Default: 5 / 10 / 15
    pub trunk_lean: SeverityScale,

    /// Trunk axial rotation, degrees. Default: 5 / 10 / 15
    pub trunk_rotation: SeverityScale,

    /// Ear-to-shoulder closing, percent of the neutral ratio.
    /// Default: 10 / 20 / 30
    pub shoulder_hiking: SeverityScale,

    /// Unwanted elbow flexion, degrees. Default: 10 / 20 / 30
    pub elbow_flexion: SeverityScale,

    /// Pelvic tilt, degrees. Default: 3 / 5 / 8
    pub hip_hike: SeverityScale,

    /// Vertical ear-to-shoulder distance over torso height in a relaxed
    /// posture. Replace with a per-subject baseline when one is available.
    /// Default: 0.28
    pub neutral_ear_shoulder_ratio: f64,

    /// Minimum visibility of landmarks read directly by detectors.
    /// Default: 0.5
    pub min_visibility: f64,
}

impl Default for CompensationThresholds {
    fn default() -> Self {
        Self {
            trunk_lean: SeverityScale::new(5.0, 10.0, 15.0),
            trunk_rotation: SeverityScale::new(5.0, 10.0, 15.0),
            shoulder_hiking: SeverityScale::new(10.0, 20.0, 30.0),
            elbow_flexion: SeverityScale::new(10.0, 20.0, 30.0),
            hip_hike: SeverityScale::new(3.0, 5.0, 8.0),
            neutral_ear_shoulder_ratio: 0.28,
            min_visibility: 0.5,
        }
    }
}

impl CompensationThresholds {
    /// Set the neutral ear-to-shoulder ratio.
    #[must_use]
    pub const fn with_neutral_ear_shoulder_ratio(mut self, ratio: f64) -> Self {
        self.neutral_ear_shoulder_ratio = ratio;
        self
    }

    /// Set the landmark visibility threshold.
    #[must_use]
    pub const fn with_min_visibility(mut self, threshold: f64) -> Self {
        self.min_visibility = threshold;
        self
    }

    /// Set the trunk lean tiers.
    #[must_use]
    pub const fn with_trunk_lean(mut self, scale: SeverityScale) -> Self {
        self.trunk_lean = scale;
        self
    }

    /// Set the hip hike tiers.
    #[must_use]
    pub const fn with_hip_hike(mut self, scale: SeverityScale) -> Self {
        self.hip_hike = scale;
        self
    }

    /// Validate the thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`CompensationError::InvalidConfig`] when tiers are not
    /// ascending or a ratio is out of range.
    pub fn validate(&self) -> Result<()> {
        self.trunk_lean.validate("trunk_lean")?;
        self.trunk_rotation.validate("trunk_rotation")?;
        self.shoulder_hiking.validate("shoulder_hiking")?;
        self.elbow_flexion.validate("elbow_flexion")?;
        self.hip_hike.validate("hip_hike")?;

        if !(self.neutral_ear_shoulder_ratio > 0.0 && self.neutral_ear_shoulder_ratio < 1.0) {
            return Err(CompensationError::invalid_config(
                "neutral_ear_shoulder_ratio must be in (0, 1)",
            ));
        }

        if !(0.0..=1.0).contains(&self.min_visibility) {
            return Err(CompensationError::invalid_config(
                "min_visibility must be between 0 and 1",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        let scale = SeverityScale::new(3.0, 5.0, 8.0);
        assert_eq!(scale.grade(2.99), Severity::Minimal);
        assert_eq!(scale.grade(3.0), Severity::Mild);
        assert_eq!(scale.grade(5.0), Severity::Moderate);
        assert_eq!(scale.grade(8.0), Severity::Moderate);
        assert_eq!(scale.grade(8.01), Severity::Severe);
        assert_eq!(scale.grade(f64::NAN), Severity::Minimal);
    }

    #[test]
    fn default_thresholds_valid() {
        let t = CompensationThresholds::default();
        assert!(t.validate().is_ok());
        assert!(t.hip_hike.severe < t.trunk_lean.severe);
    }

    #[test]
    fn invalid_thresholds() {
        let t = CompensationThresholds::default().with_trunk_lean(SeverityScale::new(10.0, 5.0, 15.0));
        let err = t.validate().unwrap_err();
        assert!(err.to_string().contains("trunk_lean"));

        assert!(CompensationThresholds::default()
            .with_neutral_ear_shoulder_ratio(0.0)
            .validate()
            .is_err());
        assert!(CompensationThresholds::default().with_min_visibility(-0.1).validate().is_err());
    }
}
