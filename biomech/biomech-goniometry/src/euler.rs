//! Y-X-Y Euler decomposition for the shoulder.
//!
//! The humerus orientation relative to the thorax is decomposed into plane
//! of elevation, elevation and axial rotation. Both frames are re-expressed
//! in a common reference before extraction:
//! - The humerus is expressed in thorax coordinates.
//! - Right-side humeri are mirrored through the sagittal plane, so both
//!   arms share one sign convention.
//! - Axes are relabelled so elevation is measured about the thorax lateral
//!   axis. Pure forward flexion then gives plane of elevation 0° and pure
//!   abduction 90°.

use biomech_types::{AnatomicalReferenceFrame, EulerAngles, Side};
use nalgebra::{Matrix3, Vector3};

/// Decomposes a rotation matrix as `R = Ry(α) · Rx(β) · Ry(γ)`.
///
/// `elevation = acos(R₁₁)` (clamped), `plane_of_elevation = atan2(R₀₁, R₂₁)`
/// and `rotation = atan2(R₁₀, −R₁₂)`. When elevation is within
/// `gimbal_threshold_deg` of a pole, only `α + γ` (or `γ − α`) is
/// observable: plane of elevation is pinned to 0° and the combined rotation
/// `atan2(R₀₂, R₀₀)` is reported with `gimbal_lock = true`.
///
/// # Example
///
/// ```
/// use biomech_goniometry::decompose_yxy;
/// use nalgebra::{Rotation3, Vector3};
///
/// let r = Rotation3::from_axis_angle(&Vector3::y_axis(), 0.3)
///     * Rotation3::from_axis_angle(&Vector3::x_axis(), 1.1)
///     * Rotation3::from_axis_angle(&Vector3::y_axis(), -0.4);
/// let e = decompose_yxy(r.matrix(), 10.0);
/// assert!((e.plane_of_elevation - 0.3f64.to_degrees()).abs() < 1e-9);
/// assert!((e.elevation - 1.1f64.to_degrees()).abs() < 1e-9);
/// assert!((e.rotation + 0.4f64.to_degrees()).abs() < 1e-9);
/// ```
#[must_use]
pub fn decompose_yxy(r: &Matrix3<f64>, gimbal_threshold_deg: f64) -> EulerAngles {
    let elevation = r[(1, 1)].clamp(-1.0, 1.0).acos().to_degrees();
    if elevation < gimbal_threshold_deg || elevation > 180.0 - gimbal_threshold_deg {
        return EulerAngles {
            plane_of_elevation: 0.0,
            elevation,
            rotation: r[(0, 2)].atan2(r[(0, 0)]).to_degrees(),
            gimbal_lock: true,
        };
    }
    EulerAngles::new(
        r[(0, 1)].atan2(r[(2, 1)]).to_degrees(),
        elevation,
        r[(1, 0)].atan2(-r[(1, 2)]).to_degrees(),
    )
}

/// Rotation of the humerus relative to the thorax in the shoulder
/// reference described in the module docs.
#[must_use]
pub fn shoulder_rotation_matrix(
    thorax: &AnatomicalReferenceFrame,
    humerus: &AnatomicalReferenceFrame,
    side: Side,
) -> Matrix3<f64> {
    let mut x = thorax.to_local(&humerus.x);
    let mut y = thorax.to_local(&humerus.y);
    if side == Side::Right {
        x.z = -x.z;
        y.z = -y.z;
    }
    let z = x.cross(&y);

    let parent = [Vector3::z(), Vector3::y(), -Vector3::x()];
    let child = [z, y, -x];
    Matrix3::from_fn(|i, j| parent[i].dot(&child[j]))
}

/// Shoulder Euler angles from thorax and humerus frames.
#[must_use]
pub fn shoulder_euler(
    thorax: &AnatomicalReferenceFrame,
    humerus: &AnatomicalReferenceFrame,
    side: Side,
    gimbal_threshold_deg: f64,
) -> EulerAngles {
    decompose_yxy(&shoulder_rotation_matrix(thorax, humerus, side), gimbal_threshold_deg)
}
