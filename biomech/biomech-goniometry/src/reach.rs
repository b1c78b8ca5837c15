//! Hand reach level relative to the trunk.
//!
//! This is a landmark-distance heuristic. It places the wrist along the
//! hip-to-shoulder span and names a band, which is an approximation of the
//! vertebral level a hand-behind-back reach attains, not an anatomical
//! mapping.

use biomech_frames::FrameSet;
use biomech_types::{FrameType, PoseLandmark, Side};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GoniometryError, Result};

/// Band of the trunk the wrist reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReachLevel {
    /// Below the hip line.
    BelowPelvis,
    /// Lowest 15% of the trunk span (sacral region).
    Sacral,
    /// 15% to 45% (lumbar region).
    Lumbar,
    /// 45% to 75% (lower thoracic region).
    LowerThoracic,
    /// 75% to 100% (upper thoracic region).
    UpperThoracic,
    /// At or above the shoulder line.
    AboveShoulder,
}

impl ReachLevel {
    /// Band for a height expressed as a fraction of the hip-to-shoulder span.
    #[must_use]
    pub fn from_normalized_height(t: f64) -> Self {
        if t < 0.0 {
            Self::BelowPelvis
        } else if t < 0.15 {
            Self::Sacral
        } else if t < 0.45 {
            Self::Lumbar
        } else if t < 0.75 {
            Self::LowerThoracic
        } else if t < 1.0 {
            Self::UpperThoracic
        } else {
            Self::AboveShoulder
        }
    }
}

/// Heuristic reach estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReachEstimate {
    /// Side measured.
    pub side: Side,
    /// Band reached.
    pub level: ReachLevel,
    /// Wrist height along the trunk axis, 0 at the hips and 1 at the shoulders.
    pub normalized_height: f64,
    /// Lowest confidence among the wrist and trunk frames.
    pub confidence: f64,
}

/// Places a wrist along the global trunk axis.
///
/// # Errors
///
/// Fails when the global or thorax frame is missing, the wrist is below
/// `min_visibility`, or the trunk span is degenerate.
pub fn reach_level(
    wrist: &PoseLandmark,
    frames: &FrameSet,
    side: Side,
    min_visibility: f64,
) -> Result<ReachEstimate> {
    let joint = side.landmark("reach");
    if !wrist.is_visible(min_visibility) {
        return Err(GoniometryError::low_confidence(
            joint,
            side.landmark("wrist"),
            wrist.visibility,
            min_visibility,
        ));
    }
    let global = frames.require(FrameType::Global)?;
    let thorax = frames.require(FrameType::Thorax)?;
    let span = global.y.dot(&(thorax.origin - global.origin));
    if span <= f64::EPSILON {
        return Err(GoniometryError::degenerate(joint, "transverse"));
    }
    let t = global.y.dot(&(wrist.position - global.origin)) / span;
    Ok(ReachEstimate {
        side,
        level: ReachLevel::from_normalized_height(t),
        normalized_height: t,
        confidence: wrist.visibility.min(global.confidence).min(thorax.confidence),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use biomech_types::AnatomicalReferenceFrame;
    use nalgebra::Vector3;

    fn frames() -> FrameSet {
        let mut set = FrameSet::new(None);
        let frame = |t, y| {
            AnatomicalReferenceFrame::from_axes(t, Vector3::new(0.0, y, 0.0), Vector3::z(), Vector3::y(), -Vector3::x(), 0.9)
        };
        set.insert(frame(FrameType::Global, 0.9));
        set.insert(frame(FrameType::Thorax, 1.4));
        set
    }

    #[test]
    fn bands() {
        assert_eq!(ReachLevel::from_normalized_height(-0.2), ReachLevel::BelowPelvis);
        assert_eq!(ReachLevel::from_normalized_height(0.1), ReachLevel::Sacral);
        assert_eq!(ReachLevel::from_normalized_height(0.3), ReachLevel::Lumbar);
        assert_eq!(ReachLevel::from_normalized_height(0.6), ReachLevel::LowerThoracic);
        assert_eq!(ReachLevel::from_normalized_height(0.9), ReachLevel::UpperThoracic);
        assert_eq!(ReachLevel::from_normalized_height(1.2), ReachLevel::AboveShoulder);
    }

    #[test]
    fn wrist_at_mid_back() {
        let wrist = PoseLandmark::new_3d(0.1, 1.2, -0.1, 0.8);
        let estimate = reach_level(&wrist, &frames(), Side::Left, 0.5).unwrap();
        assert_relative_eq!(estimate.normalized_height, 0.6, epsilon = 1e-9);
        assert_eq!(estimate.level, ReachLevel::LowerThoracic);
        assert_relative_eq!(estimate.confidence, 0.8);
    }

    #[test]
    fn hidden_wrist_is_unavailable() {
        let wrist = PoseLandmark::new_3d(0.1, 1.2, -0.1, 0.2);
        assert!(matches!(
            reach_level(&wrist, &frames(), Side::Right, 0.5),
            Err(GoniometryError::LowConfidence { .. })
        ));
    }

    #[test]
    fn needs_trunk_frames() {
        let wrist = PoseLandmark::new_3d(0.1, 1.2, -0.1, 0.9);
        assert!(matches!(
            reach_level(&wrist, &FrameSet::new(None), Side::Left, 0.5),
            Err(GoniometryError::Frame(_))
        ));
    }
}
