//! Per-joint moving-average smoothing.

use std::collections::VecDeque;

use hashbrown::HashMap;

/// Fixed-size moving average over the most recent samples.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: usize,
    samples: VecDeque<f64>,
}

impl MovingAverage {
    /// Creates an average over at most `window` samples (at least one).
    #[must_use]
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            samples: VecDeque::with_capacity(window),
        }
    }

    /// Adds a sample and returns the current average.
    pub fn push(&mut self, value: f64) -> f64 {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
        self.mean()
    }

    /// Current average, or `0.0` when empty.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.samples.iter().sum::<f64>() / self.samples.len() as f64
        }
    }

    /// Number of samples held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if no samples are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drops all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Moving averages keyed by joint name.
#[derive(Debug, Clone)]
pub struct AngleSmoother {
    window: usize,
    joints: HashMap<String, MovingAverage>,
}

impl AngleSmoother {
    /// Creates a smoother with the given window.
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            joints: HashMap::new(),
        }
    }

    /// Window size.
    #[must_use]
    pub const fn window(&self) -> usize {
        self.window
    }

    /// Adds a sample for `joint` and returns its smoothed value.
    pub fn push(&mut self, joint: &str, value: f64) -> f64 {
        if let Some(avg) = self.joints.get_mut(joint) {
            return avg.push(value);
        }
        let mut avg = MovingAverage::new(self.window);
        let smoothed = avg.push(value);
        self.joints.insert(joint.to_string(), avg);
        smoothed
    }

    /// Forgets the history of one joint.
    pub fn reset_joint(&mut self, joint: &str) {
        self.joints.remove(joint);
    }

    /// Forgets all history.
    pub fn reset(&mut self) {
        self.joints.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn large_sample_leaving_window_does_not_skew_mean() {
        let mut avg = MovingAverage::new(3);
        avg.push(1e17);
        for v in [1.0, 2.0, 3.0] {
            avg.push(v);
        }
        assert_eq!(avg.mean(), 2.0);
        for _ in 0..10_000 {
            avg.push(0.1);
        }
        avg.push(30.0);
        avg.push(60.0);
        avg.push(90.0);
        assert_eq!(avg.mean(), 60.0);
    }

    #[test]
    fn average_over_window() {
        let mut avg = MovingAverage::new(3);
        assert_relative_eq!(avg.push(10.0), 10.0);
        assert_relative_eq!(avg.push(20.0), 15.0);
        assert_relative_eq!(avg.push(30.0), 20.0);
        // 10 drops out.
        assert_relative_eq!(avg.push(40.0), 30.0);
        assert_eq!(avg.len(), 3);
        avg.clear();
        assert!(avg.is_empty());
        assert_eq!(avg.mean(), 0.0);
    }

    #[test]
    fn joints_are_independent() {
        let mut smoother = AngleSmoother::new(5);
        smoother.push("left_elbow", 90.0);
        smoother.push("left_elbow", 100.0);
        assert_relative_eq!(smoother.push("right_elbow", 45.0), 45.0);
        assert_relative_eq!(smoother.push("left_elbow", 110.0), 100.0);
    }

    #[test]
    fn reset_clears_history() {
        let mut smoother = AngleSmoother::new(5);
        smoother.push("left_knee", 170.0);
        smoother.reset_joint("left_knee");
        assert_relative_eq!(smoother.push("left_knee", 90.0), 90.0);
        smoother.push("right_knee", 10.0);
        smoother.reset();
        assert_relative_eq!(smoother.push("right_knee", 20.0), 20.0);
    }

    #[test]
    fn zero_window_is_one() {
        let mut avg = MovingAverage::new(0);
        avg.push(1.0);
        assert_relative_eq!(avg.push(5.0), 5.0);
    }
}
