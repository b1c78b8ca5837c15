//! Plane-projected joint angle measurement.

use std::sync::Arc;

use biomech_frames::FrameSet;
use biomech_schema::PoseSchemaRegistry;
use biomech_types::{
    EulerAngles, FrameType, JointAngleMeasurement, PoseLandmark, Side,
    vector::{NORMALIZE_EPSILON, angle_between},
};
use tracing::debug;

use crate::error::{GoniometryError, Result};
use crate::euler::shoulder_euler;
use crate::joints::{JointCatalog, JointCategory, JointDefinition};
use crate::params::GoniometerParams;
use crate::reach::{ReachEstimate, reach_level};
use crate::smoothing::AngleSmoother;

/// Measures joint angles in anatomical planes.
///
/// Both joint vectors are projected onto the joint's plane before the angle
/// is taken, so the result does not depend on where the camera stands.
/// Angles are smoothed per joint with a moving average; the unsmoothed value
/// is reported alongside.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use biomech_frames::FrameSet;
/// use biomech_goniometry::{Goniometer, GoniometerParams};
/// use biomech_schema::{PoseSchemaRegistry, MOVENET_17};
/// use biomech_types::{AnatomicalReferenceFrame, FrameType, PoseLandmark};
/// use nalgebra::Vector3;
///
/// let registry = Arc::new(PoseSchemaRegistry::with_builtin());
/// let mut goniometer = Goniometer::new(registry, GoniometerParams::default()).unwrap();
///
/// let mut frames = FrameSet::new(None);
/// frames.insert(AnatomicalReferenceFrame::from_axes(
///     FrameType::Thorax,
///     Vector3::new(0.0, 1.4, 0.0),
///     Vector3::z(),
///     Vector3::y(),
///     -Vector3::x(),
///     0.9,
/// ));
///
/// let mut pose = vec![PoseLandmark::new_3d(0.0, 0.0, 0.0, 0.0); 17];
/// pose[5] = PoseLandmark::new_3d(0.2, 1.4, 0.0, 0.9); // left_shoulder
/// pose[7] = PoseLandmark::new_3d(0.2, 1.1, 0.0, 0.9); // left_elbow
/// pose[9] = PoseLandmark::new_3d(0.2, 1.1, 0.3, 0.9); // left_wrist, forearm forward
///
/// let m = goniometer.measure_angle(MOVENET_17, &pose, &frames, "left_elbow").unwrap();
/// assert!((m.angle - 90.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct Goniometer {
    registry: Arc<PoseSchemaRegistry>,
    catalog: JointCatalog,
    params: GoniometerParams,
    smoother: AngleSmoother,
}

impl Goniometer {
    /// Creates a goniometer with the standard joint catalog.
    ///
    /// # Errors
    ///
    /// Returns [`GoniometryError::InvalidConfig`] for invalid parameters.
    pub fn new(registry: Arc<PoseSchemaRegistry>, params: GoniometerParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            registry,
            catalog: JointCatalog::standard(),
            smoother: AngleSmoother::new(params.smoothing_window),
            params,
        })
    }

    /// Replaces the joint catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: JointCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Joint catalog.
    #[must_use]
    pub const fn catalog(&self) -> &JointCatalog {
        &self.catalog
    }

    /// Parameters.
    #[must_use]
    pub const fn params(&self) -> &GoniometerParams {
        &self.params
    }

    /// Measures one joint.
    ///
    /// Shoulder measurements also carry the Y-X-Y decomposition when the
    /// humerus frame is available.
    ///
    /// # Errors
    ///
    /// Fails when the joint is unknown, a landmark is missing or below the
    /// visibility threshold, the thorax frame (which defines the planes) is
    /// missing, or a joint vector collapses in the plane.
    pub fn measure_angle(
        &mut self,
        schema_id: &str,
        landmarks: &[PoseLandmark],
        frames: &FrameSet,
        joint: &str,
    ) -> Result<JointAngleMeasurement> {
        let definition = self
            .catalog
            .get(joint)
            .ok_or_else(|| GoniometryError::unknown_joint(joint))?;

        let [proximal, center, distal] = self.joint_landmarks(schema_id, landmarks, definition)?;
        let plane = frames.require_plane(definition.plane(), definition.side)?;
        let thorax = frames.require(FrameType::Thorax)?;

        let upper = plane.project_direction(&(proximal.position - center.position));
        let lower = plane.project_direction(&(distal.position - center.position));
        if upper.norm() < NORMALIZE_EPSILON || lower.norm() < NORMALIZE_EPSILON {
            return Err(GoniometryError::degenerate(joint, plane.plane_type.as_str()));
        }
        let raw_angle = angle_between(&upper, &lower);

        let confidence = [proximal, center, distal]
            .iter()
            .map(|l| l.visibility)
            .fold(thorax.confidence, f64::min);

        let euler = if definition.category == JointCategory::Shoulder {
            self.measure_shoulder_euler(frames, definition.side).ok()
        } else {
            None
        };

        let name = definition.name.clone();
        let plane_type = plane.plane_type;
        let angle = self.smoother.push(&name, raw_angle);
        Ok(JointAngleMeasurement {
            joint: name,
            angle,
            raw_angle,
            confidence,
            plane: plane_type,
            euler,
        })
    }

    /// Measures every catalog joint whose landmarks the schema defines.
    ///
    /// Joints that cannot be measured on this frame are skipped and logged.
    pub fn measure_all(
        &mut self,
        schema_id: &str,
        landmarks: &[PoseLandmark],
        frames: &FrameSet,
    ) -> Vec<JointAngleMeasurement> {
        let Ok(schema) = self.registry.schema(schema_id) else {
            debug!(schema = schema_id, "unknown schema, no joints measured");
            return Vec::new();
        };
        let joints: Vec<String> = self
            .catalog
            .names()
            .into_iter()
            .filter(|name| {
                self.catalog
                    .get(name)
                    .is_some_and(|j| schema.contains_all(&j.landmarks()))
            })
            .map(str::to_string)
            .collect();

        joints
            .iter()
            .filter_map(|joint| match self.measure_angle(schema_id, landmarks, frames, joint) {
                Ok(m) => Some(m),
                Err(error) => {
                    debug!(joint = %joint, %error, "joint angle unavailable");
                    None
                }
            })
            .collect()
    }

    /// Shoulder plane of elevation, elevation and axial rotation.
    ///
    /// # Errors
    ///
    /// Fails when the thorax or humerus frame is missing.
    pub fn measure_shoulder_euler(&self, frames: &FrameSet, side: Side) -> Result<EulerAngles> {
        let thorax = frames.require(FrameType::Thorax)?;
        let humerus = frames.require(FrameType::Humerus(side))?;
        Ok(shoulder_euler(thorax, humerus, side, self.params.gimbal_threshold_deg))
    }

    /// Heuristic band of the trunk the wrist reaches.
    ///
    /// # Errors
    ///
    /// See [`crate::reach_level`].
    pub fn reach_level(
        &self,
        schema_id: &str,
        landmarks: &[PoseLandmark],
        frames: &FrameSet,
        side: Side,
    ) -> Result<ReachEstimate> {
        let wrist = self
            .registry
            .landmark(schema_id, landmarks, &side.landmark("wrist"))?;
        reach_level(wrist, frames, side, self.params.min_visibility)
    }

    /// Forgets all smoothing history.
    pub fn reset_smoothing(&mut self) {
        self.smoother.reset();
    }

    /// Forgets the smoothing history of one joint.
    pub fn reset_joint(&mut self, joint: &str) {
        self.smoother.reset_joint(joint);
    }

    fn joint_landmarks<'a>(
        &self,
        schema_id: &str,
        landmarks: &'a [PoseLandmark],
        definition: &JointDefinition,
    ) -> Result<[&'a PoseLandmark; 3]> {
        let threshold = self.params.min_visibility;
        let fetch = |name: &str| -> Result<&'a PoseLandmark> {
            let landmark = self.registry.landmark(schema_id, landmarks, name)?;
            if landmark.is_visible(threshold) {
                Ok(landmark)
            } else {
                Err(GoniometryError::low_confidence(
                    &definition.name,
                    name,
                    landmark.visibility,
                    threshold,
                ))
            }
        };
        Ok([
            fetch(&definition.proximal)?,
            fetch(&definition.center)?,
            fetch(&definition.distal)?,
        ])
    }
}
