//! Core data model for markerless goniometry.
//!
//! This crate holds the types every other biomech crate speaks:
//!
//! # Geometry
//!
//! - [`vector`] - Pure vector primitives (normalize, projection, angles)
//! - [`AnatomicalReferenceFrame`] - Orthonormal ISB-style segment frame
//! - [`AnatomicalPlane`] - Plane used to project limb vectors
//!
//! # Input
//!
//! - [`PoseLandmark`] - One estimated body keypoint
//! - [`ViewOrientation`] - Subject orientation relative to the camera
//! - [`Side`] - Left or right segment
//!
//! # Output
//!
//! - [`JointAngleMeasurement`] / [`EulerAngles`] - Joint angles
//! - [`CompensationPattern`] - Detected compensatory movement
//! - [`Measurement`] - Tagged union of the above
//!
//! # Coordinate Conventions
//!
//! Positions are y-up and right-handed. Frame axes follow the ISB
//! recommendation: `x` anterior, `y` superior, `z` toward the subject's
//! right.
//!
//! # Example
//!
//! ```
//! use biomech_types::prelude::*;
//! use nalgebra::Vector3;
//!
//! let thorax = AnatomicalReferenceFrame::from_primary_and_lateral(
//!     FrameType::Thorax,
//!     Vector3::new(0.0, 1.4, 0.0),
//!     Vector3::y(),
//!     Vector3::z(),
//!     0.9,
//! )
//! .unwrap();
//!
//! let sagittal = AnatomicalPlane::new(PlaneType::Sagittal, thorax.origin, thorax.z);
//! let upper_arm = Vector3::new(0.0, -1.0, 0.0);
//! let forearm = Vector3::new(1.0, 0.0, 0.4);
//! assert!((sagittal.projected_angle(&upper_arm, &forearm) - 90.0).abs() < 1e-9);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod compensation;
mod error;
mod frame;
mod landmark;
mod measurement;
mod plane;
pub mod vector;

pub use compensation::{CompensationKind, CompensationPattern, MagnitudeUnit, Severity};
pub use error::FailureCategory;
pub use frame::{AnatomicalReferenceFrame, FrameType, ORTHONORMAL_TOLERANCE};
pub use landmark::{PoseLandmark, Side, ViewOrientation};
pub use measurement::{EulerAngles, JointAngleMeasurement, Measurement};
pub use plane::{AnatomicalPlane, PlaneType, SCAPULAR_PLANE_OFFSET_DEG};

// Re-export nalgebra so downstream crates agree on the version.
pub use nalgebra;

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        AnatomicalPlane, AnatomicalReferenceFrame, CompensationKind, CompensationPattern,
        EulerAngles, FailureCategory, FrameType, JointAngleMeasurement, MagnitudeUnit,
        Measurement, PlaneType, PoseLandmark, Severity, Side, ViewOrientation,
    };
}
