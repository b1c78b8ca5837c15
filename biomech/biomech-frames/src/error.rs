//! Error types for frame construction.

use biomech_schema::SchemaError;
use biomech_types::{FailureCategory, FrameType};
use thiserror::Error;

/// Errors that can occur while building or looking up anatomical frames.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    /// The frame is not present in the frame set.
    #[error("frame unavailable: {0}")]
    Unavailable(FrameType),

    /// An anchor landmark is below the visibility threshold.
    #[error("{frame} frame: landmark '{landmark}' visibility {visibility:.2} below {threshold:.2}")]
    LowConfidence {
        /// Frame being built.
        frame: FrameType,
        /// Offending landmark.
        landmark: String,
        /// Its visibility.
        visibility: f64,
        /// Required visibility.
        threshold: f64,
    },

    /// Anchor landmarks are coincident or collinear and no fallback applied.
    #[error("{0} frame: degenerate landmark geometry")]
    Degenerate(FrameType),

    /// The frame depends on another frame that is not available.
    #[error("{frame} frame requires the {requires} frame")]
    MissingDependency {
        /// Frame being built.
        frame: FrameType,
        /// Frame it depends on.
        requires: FrameType,
    },

    /// Landmark resolution failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Invalid parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl FrameError {
    /// Creates a low confidence error.
    #[must_use]
    pub fn low_confidence(
        frame: FrameType,
        landmark: impl Into<String>,
        visibility: f64,
        threshold: f64,
    ) -> Self {
        Self::LowConfidence {
            frame,
            landmark: landmark.into(),
            visibility,
            threshold,
        }
    }

    /// Creates a missing dependency error.
    #[must_use]
    pub const fn missing_dependency(frame: FrameType, requires: FrameType) -> Self {
        Self::MissingDependency { frame, requires }
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
            Self::Unavailable(_) | Self::MissingDependency { .. } => FailureCategory::MissingLandmark,
            Self::LowConfidence { .. } | Self::Degenerate(_) => FailureCategory::LowConfidence,
            Self::Schema(e) => e.category(),
            Self::InvalidConfig(_) => FailureCategory::InvalidConfig,
        }
    }
}

/// Result type for frame operations.
pub type Result<T> = std::result::Result<T, FrameError>;
