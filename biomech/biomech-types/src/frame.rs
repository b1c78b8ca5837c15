//! Anatomical reference frames (ISB convention).
//!
//! Every frame is an origin plus three orthonormal axes:
//! - `x`: anterior
//! - `y`: superior
//! - `z`: lateral, toward the subject's right
//!
//! Frames are right-handed (`x × y = z`).

use nalgebra::{Matrix3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::landmark::Side;

/// Default tolerance for the unit-length and orthogonality checks.
pub const ORTHONORMAL_TOLERANCE: f64 = 1e-3;

/// Body segment a frame is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FrameType {
    /// Whole-body frame anchored at the hip midpoint.
    Global,
    /// Thorax frame anchored at the shoulder midpoint.
    Thorax,
    /// Pelvis frame anchored at the hip midpoint.
    Pelvis,
    /// Upper arm frame anchored at the shoulder joint.
    Humerus(Side),
    /// Forearm frame anchored at the elbow joint.
    Forearm(Side),
}

impl FrameType {
    /// Short name for logs and diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Thorax => "thorax",
            Self::Pelvis => "pelvis",
            Self::Humerus(Side::Left) => "left_humerus",
            Self::Humerus(Side::Right) => "right_humerus",
            Self::Forearm(Side::Left) => "left_forearm",
            Self::Forearm(Side::Right) => "right_forearm",
        }
    }

    /// Side of a bilateral segment frame.
    #[must_use]
    pub const fn side(self) -> Option<Side> {
        match self {
            Self::Humerus(side) | Self::Forearm(side) => Some(side),
            Self::Global | Self::Thorax | Self::Pelvis => None,
        }
    }
}

impl std::fmt::Display for FrameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An orthonormal coordinate system attached to a body segment.
///
/// # Example
///
/// ```
/// use biomech_types::{AnatomicalReferenceFrame, FrameType};
/// use nalgebra::Vector3;
///
/// let frame = AnatomicalReferenceFrame::from_primary_and_lateral(
///     FrameType::Thorax,
///     Vector3::new(0.0, 1.4, 0.0),
///     Vector3::new(0.0, 0.5, 0.0),
///     Vector3::new(0.0, 0.0, 0.3),
///     0.9,
/// )
/// .unwrap();
///
/// assert!(frame.is_orthonormal(1e-9));
/// assert!((frame.x.x - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnatomicalReferenceFrame {
    /// Segment this frame belongs to.
    pub frame_type: FrameType,
    /// Frame origin.
    pub origin: Vector3<f64>,
    /// Anterior axis.
    pub x: Vector3<f64>,
    /// Superior axis.
    pub y: Vector3<f64>,
    /// Lateral axis (subject's right).
    pub z: Vector3<f64>,
    /// Minimum visibility of the landmarks the frame was built from.
    pub confidence: f64,
}

impl AnatomicalReferenceFrame {
    /// Builds a frame from a superior axis and a rough lateral direction.
    ///
    /// `x = normalize(y × lateral)`, `z = x × y`. Returns `None` when the
    /// inputs are degenerate.
    #[must_use]
    pub fn from_primary_and_lateral(
        frame_type: FrameType,
        origin: Vector3<f64>,
        superior: Vector3<f64>,
        lateral: Vector3<f64>,
        confidence: f64,
    ) -> Option<Self> {
        let (x, y, z) = crate::vector::orthonormal_basis(&superior, &lateral)?;
        Some(Self {
            frame_type,
            origin,
            x,
            y,
            z,
            confidence: confidence.clamp(0.0, 1.0),
        })
    }

    /// Builds a frame from a superior axis and a `z` reference.
    ///
    /// `z = normalize(reference ⟂ y)`, `x = y × z`. Returns `None` when the
    /// reference is parallel to `y`.
    #[must_use]
    pub fn from_superior_and_z(
        frame_type: FrameType,
        origin: Vector3<f64>,
        superior: Vector3<f64>,
        z_reference: Vector3<f64>,
        confidence: f64,
    ) -> Option<Self> {
        let y = crate::vector::try_normalize(superior)?;
        let z = crate::vector::try_normalize(crate::vector::project_onto_plane(&z_reference, &y))?;
        let x = y.cross(&z);
        Some(Self::from_axes(frame_type, origin, x, y, z, confidence.clamp(0.0, 1.0)))
    }

    /// Builds a frame from a superior axis and an `x` reference.
    ///
    /// `x = normalize(reference ⟂ y)`, `z = x × y`. Returns `None` when the
    /// reference is parallel to `y`.
    #[must_use]
    pub fn from_superior_and_x(
        frame_type: FrameType,
        origin: Vector3<f64>,
        superior: Vector3<f64>,
        x_reference: Vector3<f64>,
        confidence: f64,
    ) -> Option<Self> {
        let y = crate::vector::try_normalize(superior)?;
        let x = crate::vector::try_normalize(crate::vector::project_onto_plane(&x_reference, &y))?;
        let z = x.cross(&y);
        Some(Self::from_axes(frame_type, origin, x, y, z, confidence.clamp(0.0, 1.0)))
    }

    /// Builds a frame from explicit axes without re-orthonormalizing.
    ///
    /// Callers are responsible for the orthonormality invariant; see
    /// [`Self::is_orthonormal`].
    #[must_use]
    pub const fn from_axes(
        frame_type: FrameType,
        origin: Vector3<f64>,
        x: Vector3<f64>,
        y: Vector3<f64>,
        z: Vector3<f64>,
        confidence: f64,
    ) -> Self {
        Self {
            frame_type,
            origin,
            x,
            y,
            z,
            confidence,
        }
    }

    /// Returns the axes as `[x, y, z]`.
    #[must_use]
    pub const fn axes(&self) -> [Vector3<f64>; 3] {
        [self.x, self.y, self.z]
    }

    /// Matrix whose columns are the frame axes in world coordinates.
    #[must_use]
    pub fn basis_matrix(&self) -> Matrix3<f64> {
        Matrix3::from_columns(&[self.x, self.y, self.z])
    }

    /// Expresses a world-space direction in this frame's basis.
    #[must_use]
    pub fn to_local(&self, v: &Vector3<f64>) -> Vector3<f64> {
        Vector3::new(self.x.dot(v), self.y.dot(v), self.z.dot(v))
    }

    /// Converts a direction expressed in this frame back to world space.
    #[must_use]
    pub fn to_world(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    /// Rotation matrix `R[i][j] = self_i · child_j`: the columns are the
    /// child's axes expressed in this frame.
    #[must_use]
    pub fn relative_rotation(&self, child: &Self) -> Matrix3<f64> {
        let parent = self.axes();
        let child = child.axes();
        Matrix3::from_fn(|i, j| parent[i].dot(&child[j]))
    }

    /// Checks unit length and pairwise orthogonality within `tolerance`.
    #[must_use]
    pub fn is_orthonormal(&self, tolerance: f64) -> bool {
        let unit = self
            .axes()
            .iter()
            .all(|a| (a.norm() - 1.0).abs() <= tolerance);
        let orthogonal = self.x.dot(&self.y).abs() <= tolerance
            && self.y.dot(&self.z).abs() <= tolerance
            && self.x.dot(&self.z).abs() <= tolerance;
        unit && orthogonal
    }

    /// Checks `x × y ≈ z`.
    #[must_use]
    pub fn is_right_handed(&self, tolerance: f64) -> bool {
        (self.x.cross(&self.y) - self.z).norm() <= tolerance
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn upright() -> AnatomicalReferenceFrame {
        AnatomicalReferenceFrame::from_primary_and_lateral(
            FrameType::Global,
            Vector3::zeros(),
            Vector3::y(),
            Vector3::z(),
            1.0,
        )
        .unwrap()
    }

    #[test]
    fn upright_axes_are_canonical() {
        let f = upright();
        assert_relative_eq!(f.x, Vector3::x());
        assert_relative_eq!(f.y, Vector3::y());
        assert_relative_eq!(f.z, Vector3::z());
        assert!(f.is_right_handed(1e-12));
    }

    #[test]
    fn skewed_lateral_is_orthogonalized() {
        let f = AnatomicalReferenceFrame::from_primary_and_lateral(
            FrameType::Thorax,
            Vector3::zeros(),
            Vector3::new(0.1, 1.0, 0.05),
            Vector3::new(0.2, 0.3, 1.0),
            0.8,
        )
        .unwrap();
        assert!(f.is_orthonormal(1e-9));
        assert!(f.is_right_handed(1e-9));
    }

    #[test]
    fn degenerate_inputs_yield_none() {
        assert!(
            AnatomicalReferenceFrame::from_primary_and_lateral(
                FrameType::Pelvis,
                Vector3::zeros(),
                Vector3::y(),
                Vector3::y() * 2.0,
                1.0,
            )
            .is_none()
        );
        assert!(
            AnatomicalReferenceFrame::from_superior_and_z(
                FrameType::Humerus(Side::Left),
                Vector3::zeros(),
                Vector3::zeros(),
                Vector3::z(),
                1.0,
            )
            .is_none()
        );
    }

    #[test]
    fn reference_constructors_agree() {
        let up = Vector3::new(0.0, 1.0, 0.2);
        let a = AnatomicalReferenceFrame::from_superior_and_z(
            FrameType::Humerus(Side::Right),
            Vector3::zeros(),
            up,
            Vector3::z(),
            1.0,
        )
        .unwrap();
        let b = AnatomicalReferenceFrame::from_superior_and_x(
            FrameType::Humerus(Side::Right),
            Vector3::zeros(),
            up,
            a.x,
            1.0,
        )
        .unwrap();
        assert!(a.is_right_handed(1e-9));
        assert_relative_eq!(a.z, b.z, epsilon = 1e-9);
    }

    #[test]
    fn local_world_round_trip() {
        let f = AnatomicalReferenceFrame::from_primary_and_lateral(
            FrameType::Thorax,
            Vector3::zeros(),
            Vector3::new(0.0, 1.0, 0.3),
            Vector3::x(),
            1.0,
        )
        .unwrap();
        let v = Vector3::new(0.4, -1.2, 2.0);
        assert_relative_eq!(f.to_world(&f.to_local(&v)), v, epsilon = 1e-12);
    }

    #[test]
    fn relative_rotation_of_self_is_identity() {
        let f = upright();
        assert_relative_eq!(f.relative_rotation(&f), Matrix3::identity(), epsilon = 1e-12);
    }

    #[test]
    fn confidence_is_clamped() {
        let f = AnatomicalReferenceFrame::from_primary_and_lateral(
            FrameType::Global,
            Vector3::zeros(),
            Vector3::y(),
            Vector3::z(),
            1.5,
        )
        .unwrap();
        assert_eq!(f.confidence, 1.0);
    }

    #[test]
    fn frame_type_names() {
        assert_eq!(FrameType::Humerus(Side::Right).to_string(), "right_humerus");
        assert_eq!(FrameType::Forearm(Side::Left).side(), Some(Side::Left));
        assert_eq!(FrameType::Thorax.side(), None);
    }
}
