//! Anatomical reference frames for markerless goniometry.
//!
//! Joint angles are only meaningful in the subject's own coordinate system,
//! not the camera's. This crate turns pose landmarks into ISB-style segment
//! frames and the anatomical planes read off them:
//!
//! - [`AnatomicalFrameBuilder`] - Global, thorax, pelvis, humerus and forearm frames
//! - [`FrameSet`] - Frames built for one pose, plus derived planes
//! - [`FrameCache`] - Thread-safe TTL/LRU cache keyed by quantized anchors
//!
//! Frames that cannot be built reliably are omitted rather than guessed.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use biomech_frames::{AnatomicalFrameBuilder, FrameBuilderParams, FrameCache};
//! use biomech_schema::{PoseSchemaRegistry, MOVENET_17};
//! use biomech_types::{FrameType, PlaneType, PoseLandmark, Side, ViewOrientation};
//!
//! let registry = Arc::new(PoseSchemaRegistry::with_builtin());
//! let builder = AnatomicalFrameBuilder::new(registry, FrameBuilderParams::default()).unwrap();
//! let cache = FrameCache::default();
//!
//! let mut pose = vec![PoseLandmark::new_3d(0.0, 0.0, 0.0, 0.0); 17];
//! pose[5] = PoseLandmark::new_3d(0.2, 1.4, 0.0, 0.9);
//! pose[6] = PoseLandmark::new_3d(-0.2, 1.4, 0.0, 0.9);
//! pose[11] = PoseLandmark::new_3d(0.1, 0.9, 0.0, 0.9);
//! pose[12] = PoseLandmark::new_3d(-0.1, 0.9, 0.0, 0.9);
//!
//! let frames = builder
//!     .build_set(MOVENET_17, &pose, Some(ViewOrientation::Frontal), Some(&cache))
//!     .unwrap();
//! assert!(frames.contains(FrameType::Thorax));
//! assert!(!frames.contains(FrameType::Humerus(Side::Left)));
//! assert!(frames.plane(PlaneType::Sagittal, Side::Left).is_some());
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod builder;
mod cache;
mod error;
mod frame_set;
mod params;

pub use builder::AnatomicalFrameBuilder;
pub use cache::{CacheStats, FrameCache};
pub use error::{FrameError, Result};
pub use frame_set::FrameSet;
pub use params::{CacheParams, FrameBuilderParams};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        AnatomicalFrameBuilder, CacheParams, CacheStats, FrameBuilderParams, FrameCache, FrameError,
        FrameSet,
    };
}
