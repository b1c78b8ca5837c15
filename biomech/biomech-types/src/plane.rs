//! Anatomical planes derived from reference frames.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::vector::{angle_between, normalize, project_onto_plane};

/// Rotation of the scapular plane anterior to the coronal plane, in degrees.
pub const SCAPULAR_PLANE_OFFSET_DEG: f64 = 35.0;

/// Named anatomical plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PlaneType {
    /// Divides left from right; normal is the lateral axis.
    Sagittal,
    /// Divides front from back; normal is the anterior axis.
    Coronal,
    /// Divides upper from lower; normal is the superior axis.
    Transverse,
    /// Plane of the scapula, the coronal plane rotated about the superior axis.
    Scapular,
}

impl PlaneType {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sagittal => "sagittal",
            Self::Coronal => "coronal",
            Self::Transverse => "transverse",
            Self::Scapular => "scapular",
        }
    }
}

impl std::fmt::Display for PlaneType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A plane through `point` with unit `normal`.
///
/// # Example
///
/// ```
/// use biomech_types::{AnatomicalPlane, PlaneType};
/// use nalgebra::Vector3;
///
/// let sagittal = AnatomicalPlane::new(PlaneType::Sagittal, Vector3::zeros(), Vector3::z() * 4.0);
/// assert!((sagittal.normal.norm() - 1.0).abs() < 1e-12);
///
/// // An arm vector with an out-of-plane component is measured in-plane.
/// let upper = Vector3::new(0.0, 1.0, 0.0);
/// let lower = Vector3::new(1.0, 0.0, 0.7);
/// assert!((sagittal.projected_angle(&upper, &lower) - 90.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnatomicalPlane {
    /// Which plane this is.
    pub plane_type: PlaneType,
    /// Unit normal.
    pub normal: Vector3<f64>,
    /// A point on the plane.
    pub point: Vector3<f64>,
    /// Rotation relative to the frame axis the plane was read from, degrees.
    pub rotation_offset_deg: f64,
}

impl AnatomicalPlane {
    /// Creates a plane; the normal is normalized.
    #[must_use]
    pub fn new(plane_type: PlaneType, point: Vector3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            plane_type,
            normal: normalize(normal),
            point,
            rotation_offset_deg: 0.0,
        }
    }

    /// Sets the rotation offset.
    #[must_use]
    pub const fn with_rotation_offset(mut self, degrees: f64) -> Self {
        self.rotation_offset_deg = degrees;
        self
    }

    /// Projects a direction onto the plane.
    #[must_use]
    pub fn project_direction(&self, v: &Vector3<f64>) -> Vector3<f64> {
        project_onto_plane(v, &self.normal)
    }

    /// Projects a point onto the plane.
    #[must_use]
    pub fn project_point(&self, p: &Vector3<f64>) -> Vector3<f64> {
        p - self.normal * self.signed_distance(p)
    }

    /// Signed distance from the plane, positive on the normal side.
    #[must_use]
    pub fn signed_distance(&self, p: &Vector3<f64>) -> f64 {
        self.normal.dot(&(p - self.point))
    }

    /// Angle in degrees between two directions after projecting both onto
    /// the plane.
    #[must_use]
    pub fn projected_angle(&self, a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
        angle_between(&self.project_direction(a), &self.project_direction(b))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn point_projection_lands_on_plane() {
        let plane = AnatomicalPlane::new(PlaneType::Transverse, Vector3::new(0.0, 1.0, 0.0), Vector3::y());
        let p = plane.project_point(&Vector3::new(0.3, 4.0, -2.0));
        assert_relative_eq!(p, Vector3::new(0.3, 1.0, -2.0), epsilon = 1e-12);
        assert_relative_eq!(plane.signed_distance(&Vector3::new(0.0, 0.5, 0.0)), -0.5);
    }

    #[test]
    fn projected_angle_ignores_normal_component() {
        let plane = AnatomicalPlane::new(PlaneType::Coronal, Vector3::zeros(), Vector3::x());
        // 45° out of plane on one vector, still 90° in-plane.
        let a = Vector3::new(1.0, 1.0, 0.0);
        let b = Vector3::new(0.0, 0.0, 1.0);
        assert_relative_eq!(plane.projected_angle(&a, &b), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn scapular_offset_constant() {
        assert_relative_eq!(SCAPULAR_PLANE_OFFSET_DEG, 35.0);
        let plane = AnatomicalPlane::new(PlaneType::Scapular, Vector3::zeros(), Vector3::x())
            .with_rotation_offset(SCAPULAR_PLANE_OFFSET_DEG);
        assert_eq!(plane.rotation_offset_deg, 35.0);
        assert_eq!(plane.plane_type.to_string(), "scapular");
    }
}
