//! Parameters for frame construction and caching.

use std::time::Duration;

use biomech_types::SCAPULAR_PLANE_OFFSET_DEG;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{FrameError, Result};

/// Thresholds and fallbacks used by [`crate::AnatomicalFrameBuilder`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FrameBuilderParams {
    /// Minimum visibility of the four trunk landmarks. Default: 0.6
    pub trunk_min_visibility: f64,

    /// Minimum visibility of limb segment anchors. Default: 0.5
    pub segment_min_visibility: f64,

    /// Scapular plane rotation from the coronal plane, degrees. Default: 35
    pub scapular_offset_deg: f64,

    /// A shoulder or hip line shorter than this fraction of the trunk length
    /// is treated as collapsed and replaced by the view's lateral direction.
    /// Default: 0.05
    pub min_lateral_ratio: f64,

    /// Elbow flexion above which the forearm orients the humerus frame,
    /// degrees. Default: 20
    pub forearm_min_flexion_deg: f64,

    /// Angle below which two axes count as parallel when choosing a
    /// reference for segment frames, degrees. Default: 10
    pub parallel_threshold_deg: f64,
}

impl Default for FrameBuilderParams {
    fn default() -> Self {
        Self {
            trunk_min_visibility: 0.6,
            segment_min_visibility: 0.5,
            scapular_offset_deg: SCAPULAR_PLANE_OFFSET_DEG,
            min_lateral_ratio: 0.05,
            forearm_min_flexion_deg: 20.0,
            parallel_threshold_deg: 10.0,
        }
    }
}

impl FrameBuilderParams {
    /// Higher visibility requirements, for clinical capture setups.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            trunk_min_visibility: 0.75,
            segment_min_visibility: 0.65,
            ..Default::default()
        }
    }

    /// Lower visibility requirements, for noisy consumer webcams.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            trunk_min_visibility: 0.4,
            segment_min_visibility: 0.3,
            ..Default::default()
        }
    }

    /// Set the trunk visibility threshold.
    #[must_use]
    pub const fn with_trunk_min_visibility(mut self, threshold: f64) -> Self {
        self.trunk_min_visibility = threshold;
        self
    }

    /// Set the segment visibility threshold.
    #[must_use]
    pub const fn with_segment_min_visibility(mut self, threshold: f64) -> Self {
        self.segment_min_visibility = threshold;
        self
    }

    /// Set the scapular plane offset.
    #[must_use]
    pub const fn with_scapular_offset(mut self, degrees: f64) -> Self {
        self.scapular_offset_deg = degrees;
        self
    }

    /// Set the forearm reference flexion threshold.
    #[must_use]
    pub const fn with_forearm_min_flexion(mut self, degrees: f64) -> Self {
        self.forearm_min_flexion_deg = degrees;
        self
    }

    /// Validate the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::InvalidConfig`] for out-of-range values.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("trunk_min_visibility", self.trunk_min_visibility),
            ("segment_min_visibility", self.segment_min_visibility),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(FrameError::invalid_config(format!(
                    "{name} must be between 0 and 1, got {value}"
                )));
            }
        }

        if !(0.0..=90.0).contains(&self.scapular_offset_deg) {
            return Err(FrameError::invalid_config(
                "scapular_offset_deg must be between 0 and 90",
            ));
        }

        if !(0.0..1.0).contains(&self.min_lateral_ratio) {
            return Err(FrameError::invalid_config(
                "min_lateral_ratio must be in [0, 1)",
            ));
        }

        if !(0.0..180.0).contains(&self.forearm_min_flexion_deg) {
            return Err(FrameError::invalid_config(
                "forearm_min_flexion_deg must be in [0, 180)",
            ));
        }

        if !(self.parallel_threshold_deg > 0.0 && self.parallel_threshold_deg < 90.0) {
            return Err(FrameError::invalid_config(
                "parallel_threshold_deg must be in (0, 90)",
            ));
        }

        Ok(())
    }

    /// Sine of the parallel threshold; cross products shorter than this
    /// (for unit inputs) mark the inputs as parallel.
    #[must_use]
    pub fn parallel_sine(&self) -> f64 {
        self.parallel_threshold_deg.to_radians().sin()
    }
}

/// Sizing and expiry of [`crate::FrameCache`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CacheParams {
    /// Maximum number of cached frames. Default: 60
    pub capacity: usize,

    /// Entry lifetime. Default: 16 ms (one frame at 60 fps)
    pub ttl: Duration,

    /// Anchor quantization step. Landmarks that move less than this between
    /// calls share a cache entry. Default: 0.01
    pub precision: f64,
}

impl Default for CacheParams {
    fn default() -> Self {
        Self {
            capacity: 60,
            ttl: Duration::from_millis(16),
            precision: 0.01,
        }
    }
}

impl CacheParams {
    /// Set the capacity.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the time to live.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the quantization step.
    #[must_use]
    pub const fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    /// Validate the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::InvalidConfig`] for out-of-range values.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(FrameError::invalid_config("capacity must be at least 1"));
        }

        if self.ttl.is_zero() {
            return Err(FrameError::invalid_config("ttl must be positive"));
        }

        if !self.precision.is_finite() || self.precision <= 0.0 {
            return Err(FrameError::invalid_config("precision must be positive"));
        }

        Ok(())
    }
}
