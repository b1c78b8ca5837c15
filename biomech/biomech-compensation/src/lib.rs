//! Compensation detection from anatomical frame deviations.
//!
//! A compensation is a secondary deviation that inflates or masks the range
//! of motion at the joint being measured. Each check is a pure function of
//! the current frames (and landmarks, for shoulder hiking):
//!
//! - [`trunk_lean`] / [`trunk_rotation`] - Global frame against vertical and the expected facing
//! - [`shoulder_hiking`] - Ear-to-shoulder closing against a neutral ratio
//! - [`elbow_flexion`] - Drift from full extension on straight-arm movements
//! - [`hip_hike`] - Pelvic tilt, graded more strictly than the trunk
//!
//! [`CompensationDetector`] runs them together. Checks return `Ok(None)`
//! below the first severity tier and `Err` when they cannot be evaluated.
//!
//! # Example
//!
//! ```
//! use biomech_compensation::{trunk_lean, CompensationThresholds};
//! use biomech_frames::FrameSet;
//! use biomech_types::{AnatomicalReferenceFrame, FrameType, Severity, ViewOrientation};
//! use nalgebra::Vector3;
//!
//! // Facing the camera, leaning 12° toward the subject's right (-x).
//! let lean = 12f64.to_radians();
//! let global = AnatomicalReferenceFrame::from_primary_and_lateral(
//!     FrameType::Global,
//!     Vector3::zeros(),
//!     Vector3::new(-lean.sin(), lean.cos(), 0.0),
//!     -Vector3::x(),
//!     0.9,
//! )
//! .unwrap();
//! let mut frames = FrameSet::new(Some(ViewOrientation::Frontal));
//! frames.insert(global);
//!
//! let thresholds = CompensationThresholds::default();
//! let pattern = trunk_lean(&frames, &thresholds.trunk_lean).unwrap().unwrap();
//! assert_eq!(pattern.severity, Severity::Moderate);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod detector;
mod elbow;
mod error;
mod pelvis;
mod shoulder;
mod thresholds;
mod trunk;

pub use detector::{CompensationDetector, MovementContext};
pub use elbow::{elbow_angle, elbow_flexion};
pub use error::{CompensationError, Result};
pub use pelvis::hip_hike;
pub use shoulder::{ear_shoulder_ratio, shoulder_hiking};
pub use thresholds::{CompensationThresholds, SeverityScale};
pub use trunk::{trunk_lean, trunk_rotation};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        CompensationDetector, CompensationError, CompensationThresholds, MovementContext, SeverityScale,
    };
}
