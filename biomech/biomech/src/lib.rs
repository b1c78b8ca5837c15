//! Markerless goniometry toolkit.
//!
//! This umbrella crate re-exports the biomech-* crates and adds a per-frame
//! [`MeasurementPipeline`] that composes them:
//!
//! ```text
//! landmarks + schema id + view
//!     -> AnatomicalFrameBuilder (through FrameCache)
//!     -> FrameSet
//!     -> Goniometer (angles, shoulder Euler) + CompensationDetector
//!     -> FrameReport
//! ```
//!
//! # Quick Start
//!
//! ```
//! use biomech::prelude::*;
//!
//! let mut pipeline = MeasurementPipeline::new(PipelineConfig::realtime()).unwrap();
//!
//! // Subject facing the camera with the left forearm raised forward.
//! let mut pose = vec![PoseLandmark::new_3d(0.0, 0.0, 0.0, 0.0); 17];
//! pose[5] = PoseLandmark::new_3d(0.2, 1.4, 0.0, 0.9); // left_shoulder
//! pose[6] = PoseLandmark::new_3d(-0.2, 1.4, 0.0, 0.9); // right_shoulder
//! pose[7] = PoseLandmark::new_3d(0.2, 1.1, 0.0, 0.9); // left_elbow
//! pose[9] = PoseLandmark::new_3d(0.2, 1.1, 0.3, 0.9); // left_wrist
//! pose[11] = PoseLandmark::new_3d(0.12, 0.9, 0.0, 0.9); // left_hip
//! pose[12] = PoseLandmark::new_3d(-0.12, 0.9, 0.0, 0.9); // right_hip
//!
//! let report = pipeline
//!     .process(&PoseFrame::new(MOVENET_17, &pose).with_view(ViewOrientation::Frontal))
//!     .unwrap();
//! let elbow = report.angle("left_elbow").unwrap();
//! assert!((elbow.angle - 90.0).abs() < 1e-6);
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - Landmarks, frames, planes, measurement records
//! - [`schema`] - Landmark schemas and the registry
//! - [`frames`] - Frame construction and the frame cache
//! - [`goniometry`] - Joint angles, smoothing, Euler decomposition
//! - [`compensation`] - Compensation detectors
//!
//! # Feature Flags
//!
//! - `serde` - Serialization for configuration and measurement records

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
mod error;
mod pipeline;

pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use pipeline::{FrameReport, MeasurementPipeline, PoseFrame};

// =============================================================================
// Re-exports
// =============================================================================

/// Landmarks, frames, planes and measurement records.
pub use biomech_types as types;

/// Landmark schemas and the registry.
pub use biomech_schema as schema;

/// Frame construction and caching.
pub use biomech_frames as frames;

/// Joint angles and shoulder Euler decomposition.
pub use biomech_goniometry as goniometry;

/// Compensation detectors.
pub use biomech_compensation as compensation;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for measurement.
pub mod prelude {
    pub use crate::{FrameReport, MeasurementPipeline, PipelineConfig, PipelineError, PoseFrame};

    // Data model
    pub use biomech_types::{
        AnatomicalPlane, AnatomicalReferenceFrame, CompensationKind, CompensationPattern,
        EulerAngles, FrameType, JointAngleMeasurement, Measurement, PlaneType, PoseLandmark,
        Severity, Side, ViewOrientation,
    };

    // Schemas
    pub use biomech_schema::{MEDIAPIPE_33, MOVENET_17, PoseSchema, PoseSchemaRegistry};

    // Components
    pub use biomech_compensation::{CompensationDetector, CompensationThresholds, MovementContext};
    pub use biomech_frames::{AnatomicalFrameBuilder, FrameCache, FrameSet};
    pub use biomech_goniometry::{Goniometer, JointCatalog};
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn prelude_imports() {
        use prelude::*;

        let registry = PoseSchemaRegistry::with_builtin();
        assert!(registry.contains(MOVENET_17));
        assert!(registry.contains(MEDIAPIPE_33));
        assert_eq!(JointCatalog::standard().len(), 10);
    }

    #[test]
    fn module_reexports() {
        let _ = frames::FrameBuilderParams::default();
        let _ = goniometry::GoniometerParams::default();
        let _ = compensation::CompensationThresholds::default();
        assert_eq!(types::SCAPULAR_PLANE_OFFSET_DEG, 35.0);
    }
}
