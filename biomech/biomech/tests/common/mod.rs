//! Synthetic poses shared by the integration tests.
//!
//! Poses are laid out in body coordinates (subject facing +z, their left at
//! +x, y up, metres) and then turned about the vertical axis to stand in for
//! different camera views.

#![allow(dead_code)]

use biomech::schema::PoseSchema;
use biomech::types::vector::rotate_about_axis;
use biomech::types::{PoseLandmark, ViewOrientation};
use nalgebra::Vector3;

/// Yaw that presents the subject to the camera in `view`.
pub fn yaw_for(view: ViewOrientation) -> f64 {
    match view {
        ViewOrientation::Frontal => 0.0,
        ViewOrientation::Sagittal => 90.0,
        ViewOrientation::Lateral => -90.0,
        ViewOrientation::Posterior => 180.0,
    }
}

/// Parametric standing pose.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticPose {
    /// Left elbow flexion, forward in the sagittal plane.
    pub left_elbow_flexion_deg: f64,
    /// Trunk lean toward the subject's right, about the hips.
    pub trunk_lean_deg: f64,
    /// Left shoulder raise toward the ear, metres.
    pub left_shoulder_raise: f64,
    /// Rotation of the whole body about the vertical axis.
    pub yaw_deg: f64,
    /// Visibility of every placed landmark.
    pub visibility: f64,
    /// Emit 3D landmarks; otherwise depth is dropped.
    pub depth: bool,
}

impl Default for SyntheticPose {
    fn default() -> Self {
        Self {
            left_elbow_flexion_deg: 0.0,
            trunk_lean_deg: 0.0,
            left_shoulder_raise: 0.0,
            yaw_deg: 0.0,
            visibility: 0.9,
            depth: true,
        }
    }
}

impl SyntheticPose {
    pub fn elbow(mut self, flexion_deg: f64) -> Self {
        self.left_elbow_flexion_deg = flexion_deg;
        self
    }

    pub fn lean(mut self, degrees: f64) -> Self {
        self.trunk_lean_deg = degrees;
        self
    }

    pub fn shoulder_raise(mut self, metres: f64) -> Self {
        self.left_shoulder_raise = metres;
        self
    }

    pub fn seen_from(mut self, view: ViewOrientation) -> Self {
        self.yaw_deg = yaw_for(view);
        self
    }

    pub fn flat(mut self) -> Self {
        self.depth = false;
        self
    }

    fn body_position(&self, name: &str) -> Option<Vector3<f64>> {
        let (s, c) = self.left_elbow_flexion_deg.to_radians().sin_cos();
        let p = match name {
            "nose" => Vector3::new(0.0, 1.62, 0.08),
            "left_eye" => Vector3::new(0.03, 1.64, 0.07),
            "right_eye" => Vector3::new(-0.03, 1.64, 0.07),
            "left_ear" => Vector3::new(0.08, 1.54, 0.0),
            "right_ear" => Vector3::new(-0.08, 1.54, 0.0),
            "left_shoulder" => Vector3::new(0.2, 1.4 + self.left_shoulder_raise, 0.0),
            "right_shoulder" => Vector3::new(-0.2, 1.4, 0.0),
            "left_elbow" => Vector3::new(0.2, 1.1, 0.0),
            "right_elbow" => Vector3::new(-0.2, 1.1, 0.0),
            "left_wrist" => Vector3::new(0.2, 1.1 - 0.25 * c, 0.25 * s),
            "right_wrist" => Vector3::new(-0.2, 0.85, 0.0),
            "left_hip" => Vector3::new(0.12, 0.9, 0.0),
            "right_hip" => Vector3::new(-0.12, 0.9, 0.0),
            "left_knee" => Vector3::new(0.12, 0.5, 0.0),
            "right_knee" => Vector3::new(-0.12, 0.5, 0.0),
            "left_ankle" => Vector3::new(0.12, 0.1, 0.0),
            "right_ankle" => Vector3::new(-0.12, 0.1, 0.0),
            "left_heel" => Vector3::new(0.12, 0.05, -0.05),
            "right_heel" => Vector3::new(-0.12, 0.05, -0.05),
            "left_foot_index" => Vector3::new(0.12, 0.1, 0.2),
            "right_foot_index" => Vector3::new(-0.12, 0.1, 0.2),
            _ => return None,
        };
        let upper_body = !matches!(
            name,
            "left_hip" | "right_hip" | "left_knee" | "right_knee" | "left_ankle" | "right_ankle"
        ) && !name.ends_with("heel")
            && !name.ends_with("foot_index");
        if upper_body && self.trunk_lean_deg != 0.0 {
            let hips = Vector3::new(0.0, 0.9, 0.0);
            return Some(hips + rotate_about_axis(&(p - hips), &Vector3::z(), self.trunk_lean_deg));
        }
        Some(p)
    }

    /// Landmarks in `schema` order. Slots the pose does not place have zero
    /// visibility.
    pub fn landmarks(&self, schema: &PoseSchema) -> Vec<PoseLandmark> {
        schema
            .names()
            .iter()
            .map(|name| match self.body_position(name) {
                Some(p) => {
                    let p = rotate_about_axis(&p, &Vector3::y(), self.yaw_deg);
                    if self.depth {
                        PoseLandmark::from_position(p, self.visibility)
                    } else {
                        PoseLandmark::new_2d(p.x, p.y, self.visibility)
                    }
                }
                None => PoseLandmark::new_2d(0.0, 0.0, 0.0),
            })
            .collect()
    }
}
