//! Landmark schema registry.
//!
//! Pose backends disagree on how many landmarks they emit and in what order.
//! Everything downstream addresses landmarks by semantic name
//! (`"left_elbow"`), and a [`PoseSchemaRegistry`] turns those names into
//! slot indices for the active backend.
//!
//! - [`PoseSchema`] - Ordered slots plus named groups (`left_arm`, `torso`, ...)
//! - [`PoseSchemaRegistry`] - Schemas keyed by id, last registration wins
//! - [`builtin`] - `movenet_17` and `mediapipe_33`
//!
//! # Example
//!
//! ```
//! use biomech_schema::{PoseSchemaRegistry, MEDIAPIPE_33};
//! use biomech_types::PoseLandmark;
//!
//! let registry = PoseSchemaRegistry::with_builtin();
//! let frame = vec![PoseLandmark::new_2d(0.5, 0.5, 0.9); 33];
//! let elbow = registry.landmark(MEDIAPIPE_33, &frame, "left_elbow").unwrap();
//! assert!(elbow.is_visible(0.5));
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builtin;
mod error;
mod registry;
mod schema;

pub use builtin::{MEDIAPIPE_33, MOVENET_17};
pub use error::{Result, SchemaError};
pub use registry::PoseSchemaRegistry;
pub use schema::{LandmarkGroup, PoseSchema, SchemaDefinition};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{MEDIAPIPE_33, MOVENET_17, PoseSchema, PoseSchemaRegistry, SchemaError};
}
