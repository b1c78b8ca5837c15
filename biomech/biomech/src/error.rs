//! Pipeline-level errors.

use biomech_compensation::CompensationError;
use biomech_frames::FrameError;
use biomech_goniometry::GoniometryError;
use biomech_schema::SchemaError;
use biomech_types::FailureCategory;
use thiserror::Error;

/// Any error raised while configuring or running a [`crate::MeasurementPipeline`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// Schema registration or lookup failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Frame construction or cache configuration failed.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Goniometer configuration or measurement failed.
    #[error(transparent)]
    Goniometry(#[from] GoniometryError),

    /// Compensation thresholds or detection failed.
    #[error(transparent)]
    Compensation(#[from] CompensationError),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PipelineError {
    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Broad failure class.
    #[must_use]
    pub const fn category(&self) -> FailureCategory {
        match self {
            Self::Schema(e) => e.category(),
            Self::Frame(e) => e.category(),
            Self::Goniometry(e) => e.category(),
            Self::Compensation(e) => e.category(),
            Self::InvalidConfig(_) => FailureCategory::InvalidConfig,
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
