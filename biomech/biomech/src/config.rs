//! Aggregated configuration for the measurement pipeline.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use biomech_compensation::CompensationThresholds;
use biomech_frames::{CacheParams, FrameBuilderParams};
use biomech_goniometry::GoniometerParams;

use crate::error::Result;

/// Every tunable of a [`crate::MeasurementPipeline`].
///
/// # Example
///
/// ```
/// use biomech::PipelineConfig;
///
/// let config = PipelineConfig::realtime().with_cache(false);
/// assert!(config.validate().is_ok());
/// assert!(!config.use_cache);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    /// Frame construction thresholds.
    pub frames: FrameBuilderParams,

    /// Frame cache sizing and expiry.
    pub cache: CacheParams,

    /// Route frame construction through the cache. Default: true
    pub use_cache: bool,

    /// Goniometer thresholds and smoothing.
    pub goniometer: GoniometerParams,

    /// Compensation severity tiers.
    pub compensation: CompensationThresholds,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            frames: FrameBuilderParams::default(),
            cache: CacheParams::default(),
            use_cache: true,
            goniometer: GoniometerParams::default(),
            compensation: CompensationThresholds::default(),
        }
    }
}

impl PipelineConfig {
    /// Live camera feed: default thresholds with smoothing and caching.
    #[must_use]
    pub fn realtime() -> Self {
        Self::default()
    }

    /// Single still images: strict frames, no smoothing and no cache.
    #[must_use]
    pub fn still_image() -> Self {
        Self {
            frames: FrameBuilderParams::strict(),
            use_cache: false,
            goniometer: GoniometerParams::unsmoothed(),
            ..Default::default()
        }
    }

    /// Set whether frames are cached.
    #[must_use]
    pub const fn with_cache(mut self, enabled: bool) -> Self {
        self.use_cache = enabled;
        self
    }

    /// Replace the frame parameters.
    #[must_use]
    pub fn with_frames(mut self, frames: FrameBuilderParams) -> Self {
        self.frames = frames;
        self
    }

    /// Replace the goniometer parameters.
    #[must_use]
    pub fn with_goniometer(mut self, goniometer: GoniometerParams) -> Self {
        self.goniometer = goniometer;
        self
    }

    /// Replace the compensation thresholds.
    #[must_use]
    pub fn with_compensation(mut self, compensation: CompensationThresholds) -> Self {
        self.compensation = compensation;
        self
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns the first section's validation error.
    pub fn validate(&self) -> Result<()> {
        self.frames.validate()?;
        self.cache.validate()?;
        self.goniometer.validate()?;
        self.compensation.validate()?;
        Ok(())
    }
}
