//! Joint measurement records.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::compensation::CompensationPattern;
use crate::plane::PlaneType;

/// Y-X-Y Euler decomposition of a three-degree-of-freedom joint, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EulerAngles {
    /// First rotation about the parent superior axis.
    pub plane_of_elevation: f64,
    /// Rotation about the rotated `x` axis, `[0, 180]`.
    pub elevation: f64,
    /// Axial rotation about the segment's long axis.
    pub rotation: f64,
    /// Set when elevation is close enough to a pole that the plane of
    /// elevation was pinned to zero.
    pub gimbal_lock: bool,
}

impl EulerAngles {
    /// Creates an Euler triple outside gimbal lock.
    #[must_use]
    pub const fn new(plane_of_elevation: f64, elevation: f64, rotation: f64) -> Self {
        Self {
            plane_of_elevation,
            elevation,
            rotation,
            gimbal_lock: false,
        }
    }
}

/// One joint angle measured in an anatomical plane.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointAngleMeasurement {
    /// Joint name, e.g. `"left_elbow"`.
    pub joint: String,
    /// Temporally smoothed angle, degrees.
    pub angle: f64,
    /// Unsmoothed angle of the current frame, degrees.
    pub raw_angle: f64,
    /// Lowest confidence among the inputs used.
    pub confidence: f64,
    /// Plane both joint vectors were projected onto.
    pub plane: PlaneType,
    /// Euler decomposition for multi-DOF joints.
    pub euler: Option<EulerAngles>,
}

/// A measurement result of any kind, for exhaustive matching by consumers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Measurement {
    /// Single plane-projected angle.
    Angle(JointAngleMeasurement),
    /// Euler triple for a named joint.
    Euler {
        /// Joint name.
        joint: String,
        /// Decomposed angles.
        angles: EulerAngles,
    },
    /// Detected compensation.
    Compensation(CompensationPattern),
}

impl Measurement {
    /// Joint the measurement refers to.
    #[must_use]
    pub fn joint(&self) -> &str {
        match self {
            Self::Angle(m) => &m.joint,
            Self::Euler { joint, .. } => joint,
            Self::Compensation(p) => &p.affected_joint,
        }
    }
}
