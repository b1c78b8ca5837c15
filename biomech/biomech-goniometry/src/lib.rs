//! Joint angle measurement in anatomical planes.
//!
//! Angles are taken between plane-projected segment vectors, never between
//! raw camera-space vectors, so the same posture reads the same from any
//! viewpoint:
//!
//! - [`Goniometer`] - Per-joint angles with temporal smoothing
//! - [`JointCatalog`] - Which landmarks and plane define each joint
//! - [`decompose_yxy`] - ISB Y-X-Y shoulder decomposition
//! - [`reach_level`] - Heuristic functional reach band
//!
//! # Example
//!
//! ```
//! use biomech_goniometry::{JointCatalog, JointCategory};
//! use biomech_types::PlaneType;
//!
//! let catalog = JointCatalog::standard();
//! let shoulder = catalog.get("right_shoulder").unwrap();
//! assert_eq!(shoulder.category, JointCategory::Shoulder);
//! assert_eq!(shoulder.plane(), PlaneType::Scapular);
//! assert_eq!(shoulder.landmarks(), ["right_hip", "right_shoulder", "right_elbow"]);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod euler;
mod goniometer;
mod joints;
mod params;
mod reach;
mod smoothing;

pub use error::{GoniometryError, Result};
pub use euler::{decompose_yxy, shoulder_euler, shoulder_rotation_matrix};
pub use goniometer::Goniometer;
pub use joints::{JointCatalog, JointCategory, JointDefinition};
pub use params::GoniometerParams;
pub use reach::{ReachEstimate, ReachLevel, reach_level};
pub use smoothing::{AngleSmoother, MovingAverage};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        Goniometer, GoniometerParams, GoniometryError, JointCatalog, JointCategory, JointDefinition,
        ReachEstimate, ReachLevel,
    };
}
