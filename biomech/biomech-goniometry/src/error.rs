//! Error types for goniometry.

use biomech_frames::FrameError;
use biomech_schema::SchemaError;
use biomech_types::FailureCategory;
use thiserror::Error;

/// Errors that make a single joint measurement unavailable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GoniometryError {
    /// The joint is not in the catalog.
    #[error("unknown joint: {0}")]
    UnknownJoint(String),

    /// A joint landmark is below the visibility threshold.
    #[error("{joint}: landmark '{landmark}' visibility {visibility:.2} below {threshold:.2}")]
    LowConfidence {
        /// Joint being measured.
        joint: String,
        /// Offending landmark.
        landmark: String,
        /// Its visibility.
        visibility: f64,
        /// Required visibility.
        threshold: f64,
    },

    /// A joint vector vanished after projection onto the measurement plane.
    #[error("{joint}: segment collapses in the {plane} plane")]
    Degenerate {
        /// Joint being measured.
        joint: String,
        /// Plane name.
        plane: String,
    },

    /// Landmark resolution failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A required frame is missing.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Invalid parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GoniometryError {
    /// Creates an unknown joint error.
    #[must_use]
    pub fn unknown_joint(joint: impl Into<String>) -> Self {
        Self::UnknownJoint(joint.into())
    }

    /// Creates a low confidence error.
    #[must_use]
    pub fn low_confidence(
        joint: impl Into<String>,
        landmark: impl Into<String>,
        visibility: f64,
        threshold: f64,
    ) -> Self {
        Self::LowConfidence {
            joint: joint.into(),
            landmark: landmark.into(),
            visibility,
            threshold,
        }
    }

    /// Creates a degenerate projection error.
    #[must_use]
    pub fn degenerate(joint: impl Into<String>, plane: impl Into<String>) -> Self {
        Self::Degenerate {
            joint: joint.into(),
            plane: plane.into(),
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Broad failure class.
    #[must_use]
    pub const fn category(&self) -> FailureCategory {
        match self {
            Self::LowConfidence { .. } | Self::Degenerate { .. } => FailureCategory::LowConfidence,
            Self::Schema(e) => e.category(),
            Self::Frame(e) => e.category(),
            Self::UnknownJoint(_) | Self::InvalidConfig(_) => FailureCategory::InvalidConfig,
        }
    }
}

/// Result type for goniometry operations.
pub type Result<T> = std::result::Result<T, GoniometryError>;
