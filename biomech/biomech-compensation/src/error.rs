//! Error types for compensation detection.

use biomech_frames::FrameError;
use biomech_schema::SchemaError;
use biomech_types::{FailureCategory, ViewOrientation};
use thiserror::Error;

/// Reasons a detector could not evaluate the current pose.
///
/// A detector that ran and found nothing returns `Ok(None)`, not an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompensationError {
    /// The detector is not meaningful from this camera view.
    #[error("{detector} cannot be evaluated from a {view} view")]
    ViewMismatch {
        /// Detector name.
        detector: String,
        /// Declared view, or `"unknown"`.
        view: String,
    },

    /// A required landmark is below the visibility threshold.
    #[error("{detector}: landmark '{landmark}' visibility {visibility:.2} below {threshold:.2}")]
    LowConfidence {
        /// Detector name.
        detector: String,
        /// Offending landmark.
        landmark: String,
        /// Its visibility.
        visibility: f64,
        /// Required visibility.
        threshold: f64,
    },

    /// The reference geometry collapsed, e.g. a horizontal trunk.
    #[error("{detector}: degenerate geometry ({reason})")]
    Degenerate {
        /// Detector name.
        detector: String,
        /// What collapsed.
        reason: String,
    },

    /// A required frame is missing.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Landmark resolution failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Invalid thresholds.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CompensationError {
    /// Creates a view mismatch error.
    #[must_use]
    pub fn view_mismatch(detector: impl Into<String>, view: Option<ViewOrientation>) -> Self {
        Self::ViewMismatch {
            detector: detector.into(),
            view: view.map_or("unknown", ViewOrientation::as_str).to_string(),
        }
    }

    /// Creates a low confidence error.
    #[must_use]
    pub fn low_confidence(
        detector: impl Into<String>,
        landmark: impl Into<String>,
        visibility: f64,
        threshold: f64,
    ) -> Self {
        Self::LowConfidence {
            detector: detector.into(),
            landmark: landmark.into(),
            visibility,
            threshold,
        }
    }

    /// Creates a degenerate geometry error.
    #[must_use]
    pub fn degenerate(detector: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Degenerate {
            detector: detector.into(),
            reason: reason.into(),
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
            Self::ViewMismatch { .. } => FailureCategory::ViewMismatch,
            Self::LowConfidence { .. } | Self::Degenerate { .. } => FailureCategory::LowConfidence,
            Self::Frame(e) => e.category(),
            Self::Schema(e) => e.category(),
            Self::InvalidConfig(_) => FailureCategory::InvalidConfig,
        }
    }
}

/// Result type for compensation detection.
pub type Result<T> = std::result::Result<T, CompensationError>;
