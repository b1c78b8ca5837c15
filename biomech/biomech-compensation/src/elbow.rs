//! Elbow flexion drift during extended-arm movements.

use biomech_frames::FrameSet;
use biomech_types::vector::angle_between;
use biomech_types::{CompensationKind, CompensationPattern, FrameType, MagnitudeUnit, Side};

use crate::detector::graded;
use crate::error::Result;
use crate::thresholds::SeverityScale;

/// Elbow angle from the humerus and forearm long axes, degrees. 180° is
/// full extension.
///
/// # Errors
///
/// Fails when either frame of `side` is missing.
pub fn elbow_angle(frames: &FrameSet, side: Side) -> Result<f64> {
    let humerus = frames.require(FrameType::Humerus(side))?;
    let forearm = frames.require(FrameType::Forearm(side))?;
    // humerus.y points elbow to shoulder, forearm.y wrist to elbow.
    Ok(angle_between(&humerus.y, &-forearm.y))
}

/// Deviation of the elbow from full extension on one side.
///
/// # Errors
///
/// See [`elbow_angle`].
pub fn elbow_flexion(frames: &FrameSet, side: Side, scale: &SeverityScale) -> Result<Option<CompensationPattern>> {
    let drift = 180.0 - elbow_angle(frames, side)?;
    Ok(graded(
        CompensationKind::ElbowFlexion,
        scale,
        drift,
        MagnitudeUnit::Degrees,
        side.landmark("elbow"),
        format!("{side} elbow flexed {drift:.1}° from full extension"),
    ))
}
