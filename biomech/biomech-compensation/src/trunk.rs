//! Trunk lean and trunk rotation.

use biomech_frames::FrameSet;
use biomech_types::vector::{angle_between, project_onto_plane, try_normalize};
use biomech_types::{
    AnatomicalReferenceFrame, CompensationKind, CompensationPattern, FrameType, MagnitudeUnit,
    ViewOrientation,
};
use nalgebra::Vector3;

use crate::detector::graded;
use crate::error::{CompensationError, Result};
use crate::thresholds::SeverityScale;

const LEAN: &str = "trunk_lean";
const ROTATION: &str = "trunk_rotation";

/// Horizontal component of a frame's anterior axis: the normal of the level
/// coronal plane.
pub(crate) fn level_anterior(frame: &AnatomicalReferenceFrame, detector: &str) -> Result<Vector3<f64>> {
    try_normalize(project_onto_plane(&frame.x, &Vector3::y()))
        .ok_or_else(|| CompensationError::degenerate(detector, "anterior axis is vertical"))
}

/// Lateral lean of the global superior axis away from true vertical.
///
/// Sagittal-plane lean is removed by projecting onto the level coronal
/// plane first. Only evaluated from frontal and lateral views.
///
/// # Errors
///
/// Fails on a sagittal, posterior or undeclared view, without a global
/// frame, or when the trunk lies horizontal.
pub fn trunk_lean(frames: &FrameSet, scale: &SeverityScale) -> Result<Option<CompensationPattern>> {
    let view = frames.view();
    if !matches!(view, Some(ViewOrientation::Frontal | ViewOrientation::Lateral)) {
        return Err(CompensationError::view_mismatch(LEAN, view));
    }
    let global = frames.require(FrameType::Global)?;
    let normal = level_anterior(global, LEAN)?;
    let superior = project_onto_plane(&global.y, &normal);
    if try_normalize(superior).is_none() {
        return Err(CompensationError::degenerate(LEAN, "superior axis collapses"));
    }
    let lean = angle_between(&superior, &Vector3::y());
    let right = normal.cross(&Vector3::y());
    let toward = if superior.dot(&right) >= 0.0 { "right" } else { "left" };
    Ok(graded(
        CompensationKind::TrunkLean,
        scale,
        lean,
        MagnitudeUnit::Degrees,
        "trunk",
        format!("trunk leaning {lean:.1}° toward the {toward}"),
    ))
}

/// Axial rotation of the global anterior axis away from the direction the
/// declared view expects the subject to face.
///
/// # Errors
///
/// Fails without a declared view or global frame, or when the anterior axis
/// is vertical.
pub fn trunk_rotation(frames: &FrameSet, scale: &SeverityScale) -> Result<Option<CompensationPattern>> {
    let view = frames.view().ok_or_else(|| CompensationError::view_mismatch(ROTATION, None))?;
    let global = frames.require(FrameType::Global)?;
    let anterior = level_anterior(global, ROTATION)?;
    let expected = view.expected_anterior();
    let rotation = angle_between(&anterior, &expected);
    // Counter-clockwise seen from above turns the subject toward their left.
    let toward = if expected.cross(&anterior).y >= 0.0 { "left" } else { "right" };
    Ok(graded(
        CompensationKind::TrunkRotation,
        scale,
        rotation,
        MagnitudeUnit::Degrees,
        "trunk",
        format!("trunk rotated {rotation:.1}° toward the {toward} in a {view} view"),
    ))
}
