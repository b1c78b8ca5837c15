//! Hip hike.

use biomech_frames::FrameSet;
use biomech_types::vector::{angle_between, project_onto_plane, try_normalize};
use biomech_types::{CompensationKind, CompensationPattern, FrameType, MagnitudeUnit, Side};
use nalgebra::Vector3;

use crate::detector::graded;
use crate::error::{CompensationError, Result};
use crate::thresholds::SeverityScale;
use crate::trunk::level_anterior;

const HIP_HIKE: &str = "hip_hike";

/// Tilt of the hip line from horizontal in the level coronal plane.
///
/// # Errors
///
/// Fails without a pelvis frame or when the hip line collapses in the
/// coronal plane.
pub fn hip_hike(frames: &FrameSet, scale: &SeverityScale) -> Result<Option<CompensationPattern>> {
    let pelvis = frames.require(FrameType::Pelvis)?;
    let normal = level_anterior(pelvis, HIP_HIKE)?;
    let hip_line = try_normalize(project_onto_plane(&pelvis.z, &normal))
        .ok_or_else(|| CompensationError::degenerate(HIP_HIKE, "hip line collapses"))?;
    let tilt = (90.0 - angle_between(&hip_line, &Vector3::y())).abs();
    // The hip line points toward the subject's right.
    let raised = if hip_line.y >= 0.0 { Side::Right } else { Side::Left };
    Ok(graded(
        CompensationKind::HipHike,
        scale,
        tilt,
        MagnitudeUnit::Degrees,
        raised.landmark("hip"),
        format!("{raised} hip raised {tilt:.1}°"),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use biomech_types::vector::rotate_about_axis;
    use biomech_types::{AnatomicalReferenceFrame, Severity};

    // Subject facing +z; positive tilt raises the right hip (-x side).
    fn frames(tilt_deg: f64) -> FrameSet {
        let z = rotate_about_axis(&-Vector3::x(), &-Vector3::z(), tilt_deg);
        let y = rotate_about_axis(&Vector3::y(), &-Vector3::z(), tilt_deg);
        let pelvis = AnatomicalReferenceFrame::from_axes(FrameType::Pelvis, Vector3::zeros(), y.cross(&z), y, z, 0.9);
        let mut set = FrameSet::new(None);
        set.insert(pelvis);
        set
    }

    #[test]
    fn level_pelvis_reports_nothing() {
        assert!(hip_hike(&frames(0.0), &SeverityScale::new(3.0, 5.0, 8.0)).unwrap().is_none());
        assert!(hip_hike(&frames(2.0), &SeverityScale::new(3.0, 5.0, 8.0)).unwrap().is_none());
    }

    #[test]
    fn stricter_tiers_than_trunk() {
        let scale = SeverityScale::new(3.0, 5.0, 8.0);
        let pattern = hip_hike(&frames(4.0), &scale).unwrap().unwrap();
        assert_eq!(pattern.severity, Severity::Mild);
        assert_relative_eq!(pattern.magnitude, 4.0, epsilon = 1e-9);
        assert_eq!(pattern.affected_joint, "right_hip");

        let pattern = hip_hike(&frames(-9.0), &scale).unwrap().unwrap();
        assert_eq!(pattern.severity, Severity::Severe);
        assert_eq!(pattern.affected_joint, "left_hip");
    }

    #[test]
    fn requires_pelvis() {
        assert!(hip_hike(&FrameSet::new(None), &SeverityScale::new(3.0, 5.0, 8.0)).is_err());
    }
}
