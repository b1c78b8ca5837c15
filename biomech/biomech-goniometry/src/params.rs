//! Parameters for the goniometer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GoniometryError, Result};

/// Thresholds and smoothing for [`crate::Goniometer`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GoniometerParams {
    /// Minimum visibility of each joint landmark. Default: 0.5
    pub min_visibility: f64,

    /// Moving-average window, in samples. Default: 5
    pub smoothing_window: usize,

    /// Elevation within this many degrees of 0° or 180° is treated as gimbal
    /// lock. Default: 10
    pub gimbal_threshold_deg: f64,
}

impl Default for GoniometerParams {
    fn default() -> Self {
        Self {
            min_visibility: 0.5,
            smoothing_window: 5,
            gimbal_threshold_deg: 10.0,
        }
    }
}

impl GoniometerParams {
    /// No temporal smoothing; every measurement is the raw angle.
    #[must_use]
    pub fn unsmoothed() -> Self {
        Self {
            smoothing_window: 1,
            ..Default::default()
        }
    }

    /// Set the visibility threshold.
    #[must_use]
    pub const fn with_min_visibility(mut self, threshold: f64) -> Self {
        self.min_visibility = threshold;
        self
    }

    /// Set the smoothing window.
    #[must_use]
    pub const fn with_smoothing_window(mut self, window: usize) -> Self {
        self.smoothing_window = window;
        self
    }

    /// Set the gimbal lock threshold.
    #[must_use]
    pub const fn with_gimbal_threshold(mut self, degrees: f64) -> Self {
        self.gimbal_threshold_deg = degrees;
        self
    }

    /// Validate the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`GoniometryError::InvalidConfig`] for out-of-range values.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_visibility) {
            return Err(GoniometryError::invalid_config(
                "min_visibility must be between 0 and 1",
            ));
        }

        if self.smoothing_window == 0 {
            return Err(GoniometryError::invalid_config(
                "smoothing_window must be at least 1",
            ));
        }

        if !(0.0..45.0).contains(&self.gimbal_threshold_deg) {
            return Err(GoniometryError::invalid_config(
                "gimbal_threshold_deg must be in [0, 45)",
            ));
        }

        Ok(())
    }
}
