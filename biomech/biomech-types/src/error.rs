//! Failure taxonomy shared by every crate in the workspace.
//!
//! Each crate has its own error enum; all of them map onto a
//! [`FailureCategory`] so callers can decide uniformly whether to retry on a
//! later frame, skip the measurement, or ask the subject to reposition.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Broad class of a per-call failure. None of them are fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FailureCategory {
    /// A schema lacks a required landmark, or a required frame could not be
    /// built because its anchors were absent.
    MissingLandmark,
    /// A landmark or frame exists but is below its confidence threshold.
    LowConfidence,
    /// The measurement needs a different camera view.
    ViewMismatch,
    /// Parameters are out of range.
    InvalidConfig,
}

impl FailureCategory {
    /// Returns `true` when retrying on a later frame can succeed without
    /// changing configuration.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        !matches!(self, Self::InvalidConfig)
    }
}
