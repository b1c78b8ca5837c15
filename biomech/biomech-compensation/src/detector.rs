//! Detector façade over the individual compensation checks.

use std::sync::Arc;

use biomech_frames::FrameSet;
use biomech_schema::PoseSchemaRegistry;
use biomech_types::{CompensationKind, CompensationPattern, MagnitudeUnit, PoseLandmark, Side};
use tracing::debug;

use crate::elbow::elbow_flexion;
use crate::error::{CompensationError, Result};
use crate::pelvis::hip_hike;
use crate::shoulder::{ear_shoulder_ratio, shoulder_hiking};
use crate::thresholds::{CompensationThresholds, SeverityScale};
use crate::trunk::{trunk_lean, trunk_rotation};

/// Builds a pattern unless the magnitude grades as minimal.
pub(crate) fn graded(
    kind: CompensationKind,
    scale: &SeverityScale,
    magnitude: f64,
    unit: MagnitudeUnit,
    affected_joint: impl Into<String>,
    note: String,
) -> Option<CompensationPattern> {
    let severity = scale.grade(magnitude);
    severity.is_reportable().then(|| CompensationPattern {
        kind,
        severity,
        magnitude,
        unit,
        affected_joint: affected_joint.into(),
        note,
    })
}

/// What the subject is asked to do, for detectors that depend on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementContext {
    /// The elbow should stay straight, e.g. during shoulder flexion.
    pub elbow_extension_expected: bool,
    /// Limb being exercised. `None` checks both sides.
    pub side: Option<Side>,
}

impl MovementContext {
    /// A straight-arm movement on `side`, or on both arms.
    #[must_use]
    pub const fn extended_arm(side: Option<Side>) -> Self {
        Self {
            elbow_extension_expected: true,
            side,
        }
    }
}

/// Runs every compensation check against one pose.
///
/// Each check returns `Ok(None)` when nothing is worth reporting and `Err`
/// when it could not be evaluated at all.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use biomech_compensation::{CompensationDetector, CompensationThresholds, MovementContext};
/// use biomech_frames::FrameSet;
/// use biomech_schema::{PoseSchemaRegistry, MOVENET_17};
///
/// let registry = Arc::new(PoseSchemaRegistry::with_builtin());
/// let detector = CompensationDetector::new(registry, CompensationThresholds::default()).unwrap();
///
/// // Nothing can be evaluated without frames, so nothing is reported.
/// let patterns = detector.detect_all(MOVENET_17, &[], &FrameSet::new(None), &MovementContext::default());
/// assert!(patterns.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct CompensationDetector {
    registry: Arc<PoseSchemaRegistry>,
    thresholds: CompensationThresholds,
}

impl CompensationDetector {
    /// Creates a detector.
    ///
    /// # Errors
    ///
    /// Returns [`CompensationError::InvalidConfig`] for invalid thresholds.
    pub fn new(registry: Arc<PoseSchemaRegistry>, thresholds: CompensationThresholds) -> Result<Self> {
        thresholds.validate()?;
        Ok(Self { registry, thresholds })
    }

    /// Thresholds in use.
    #[must_use]
    pub const fn thresholds(&self) -> &CompensationThresholds {
        &self.thresholds
    }

    /// Trunk lean. See [`crate::trunk_lean`].
    ///
    /// # Errors
    ///
    /// Propagates the check's error.
    pub fn detect_trunk_lean(&self, frames: &FrameSet) -> Result<Option<CompensationPattern>> {
        trunk_lean(frames, &self.thresholds.trunk_lean)
    }

    /// Trunk rotation. See [`crate::trunk_rotation`].
    ///
    /// # Errors
    ///
    /// Propagates the check's error.
    pub fn detect_trunk_rotation(&self, frames: &FrameSet) -> Result<Option<CompensationPattern>> {
        trunk_rotation(frames, &self.thresholds.trunk_rotation)
    }

    /// Shoulder hiking. See [`crate::shoulder_hiking`].
    ///
    /// # Errors
    ///
    /// Propagates the check's error.
    pub fn detect_shoulder_hiking(
        &self,
        schema_id: &str,
        landmarks: &[PoseLandmark],
        frames: &FrameSet,
    ) -> Result<Option<CompensationPattern>> {
        shoulder_hiking(&self.registry, schema_id, landmarks, frames, &self.thresholds)
    }

    /// Elbow flexion drift on the context's side, or the larger of both.
    ///
    /// Returns `Ok(None)` when the movement does not call for a straight
    /// elbow.
    ///
    /// # Errors
    ///
    /// Fails when no requested side has humerus and forearm frames.
    pub fn detect_elbow_flexion(
        &self,
        frames: &FrameSet,
        context: &MovementContext,
    ) -> Result<Option<CompensationPattern>> {
        if !context.elbow_extension_expected {
            return Ok(None);
        }
        let scale = &self.thresholds.elbow_flexion;
        let sides = context.side.map_or(Side::BOTH.to_vec(), |side| vec![side]);

        let mut worst: Option<CompensationPattern> = None;
        let mut first_error = None;
        for side in sides {
            match elbow_flexion(frames, side, scale) {
                Ok(Some(pattern)) => {
                    if worst.as_ref().is_none_or(|w| pattern.magnitude > w.magnitude) {
                        worst = Some(pattern);
                    }
                }
                Ok(None) => {}
                Err(error) => {
                    first_error.get_or_insert(error);
                }
            }
        }
        match (worst, first_error) {
            (Some(pattern), _) => Ok(Some(pattern)),
            (None, Some(error)) if context.side.is_some() => Err(error),
            _ => Ok(None),
        }
    }

    /// Hip hike. See [`crate::hip_hike`].
    ///
    /// # Errors
    ///
    /// Propagates the check's error.
    pub fn detect_hip_hike(&self, frames: &FrameSet) -> Result<Option<CompensationPattern>> {
        hip_hike(frames, &self.thresholds.hip_hike)
    }

    /// Runs every check and collects the reported patterns.
    ///
    /// Checks that cannot be evaluated on this pose are logged and skipped.
    #[must_use]
    pub fn detect_all(
        &self,
        schema_id: &str,
        landmarks: &[PoseLandmark],
        frames: &FrameSet,
        context: &MovementContext,
    ) -> Vec<CompensationPattern> {
        let results = [
            (CompensationKind::TrunkLean, self.detect_trunk_lean(frames)),
            (CompensationKind::TrunkRotation, self.detect_trunk_rotation(frames)),
            (
                CompensationKind::ShoulderHiking,
                self.detect_shoulder_hiking(schema_id, landmarks, frames),
            ),
            (CompensationKind::ElbowFlexion, self.detect_elbow_flexion(frames, context)),
            (CompensationKind::HipHike, self.detect_hip_hike(frames)),
        ];

        results
            .into_iter()
            .filter_map(|(kind, result)| match result {
                Ok(pattern) => pattern,
                Err(error) => {
                    debug!(detector = %kind, category = ?error.category(), %error, "compensation check skipped");
                    None
                }
            })
            .collect()
    }

    /// Measures the subject's relaxed ear-to-shoulder ratio and uses it as
    /// the hiking baseline. Returns the new baseline.
    ///
    /// Averages the sides that can be measured.
    ///
    /// # Errors
    ///
    /// Fails when neither side can be measured, or when the measured ratio
    /// is out of range.
    pub fn calibrate_shoulder_baseline(
        &mut self,
        schema_id: &str,
        landmarks: &[PoseLandmark],
        frames: &FrameSet,
    ) -> Result<f64> {
        let min_visibility = self.thresholds.min_visibility;
        let mut ratios = Vec::with_capacity(2);
        let mut first_error = None;
        for side in Side::BOTH {
            match ear_shoulder_ratio(&self.registry, schema_id, landmarks, frames, side, min_visibility) {
                Ok(ratio) => ratios.push(ratio),
                Err(error) => {
                    first_error.get_or_insert(error);
                }
            }
        }
        if ratios.is_empty() {
            return Err(first_error
                .unwrap_or_else(|| CompensationError::degenerate("shoulder_hiking", "no side evaluated")));
        }

        #[allow(clippy::cast_precision_loss)]
        let baseline = ratios.iter().sum::<f64>() / ratios.len() as f64;
        let thresholds = self.thresholds.clone().with_neutral_ear_shoulder_ratio(baseline);
        thresholds.validate()?;
        debug!(baseline, sides = ratios.len(), "shoulder hiking baseline calibrated");
        self.thresholds = thresholds;
        Ok(baseline)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use biomech_schema::MOVENET_17;
    use biomech_types::vector::rotate_about_axis;
    use biomech_types::{AnatomicalReferenceFrame, FrameType, Severity, ViewOrientation};
    use nalgebra::Vector3;

    fn detector() -> CompensationDetector {
        CompensationDetector::new(Arc::new(PoseSchemaRegistry::with_builtin()), CompensationThresholds::default())
            .unwrap()
    }

    fn frame(frame_type: FrameType, origin_y: f64, up: Vector3<f64>) -> AnatomicalReferenceFrame {
        AnatomicalReferenceFrame::from_primary_and_lateral(
            frame_type,
            Vector3::new(0.0, origin_y, 0.0),
            up,
            -Vector3::x(),
            0.9,
        )
        .unwrap()
    }

    // Facing the camera with the trunk leaning `lean_deg` to the right.
    fn frames(lean_deg: f64) -> FrameSet {
        let up = rotate_about_axis(&Vector3::y(), &Vector3::z(), lean_deg);
        let mut set = FrameSet::new(Some(ViewOrientation::Frontal));
        set.insert(frame(FrameType::Global, 0.9, up));
        set.insert(frame(FrameType::Thorax, 1.4, up));
        set.insert(frame(FrameType::Pelvis, 0.9, Vector3::y()));
        set
    }

    fn pose() -> Vec<PoseLandmark> {
        let mut pose = vec![PoseLandmark::new_3d(0.0, 0.0, 0.0, 0.0); 17];
        // Ears straight above the shoulders so a leaning trunk reads neutral.
        pose[3] = PoseLandmark::new_3d(0.2, 1.54, 0.0, 0.9);
        pose[4] = PoseLandmark::new_3d(-0.2, 1.54, 0.0, 0.9);
        pose[5] = PoseLandmark::new_3d(0.2, 1.4, 0.0, 0.9);
        pose[6] = PoseLandmark::new_3d(-0.2, 1.4, 0.0, 0.9);
        pose
    }

    fn arm(set: &mut FrameSet, side: Side, flexion_deg: f64) {
        set.insert(AnatomicalReferenceFrame::from_axes(
            FrameType::Humerus(side),
            Vector3::zeros(),
            Vector3::z(),
            Vector3::y(),
            -Vector3::x(),
            0.9,
        ));
        let y = rotate_about_axis(&Vector3::y(), &Vector3::x(), -flexion_deg);
        let x = rotate_about_axis(&Vector3::z(), &Vector3::x(), -flexion_deg);
        set.insert(AnatomicalReferenceFrame::from_axes(
            FrameType::Forearm(side),
            Vector3::zeros(),
            x,
            y,
            -Vector3::x(),
            0.9,
        ));
    }

    #[test]
    fn upright_subject_reports_nothing() {
        let d = detector();
        let patterns = d.detect_all(MOVENET_17, &pose(), &frames(0.0), &MovementContext::extended_arm(None));
        assert!(patterns.is_empty());
    }

    #[test]
    fn lean_is_reported_through_detect_all() {
        let d = detector();
        let patterns = d.detect_all(MOVENET_17, &pose(), &frames(12.0), &MovementContext::default());
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].kind, CompensationKind::TrunkLean);
        assert_eq!(patterns[0].severity, Severity::Moderate);
    }

    #[test]
    fn elbow_drift_needs_context() {
        let d = detector();
        let mut set = frames(0.0);
        arm(&mut set, Side::Left, 15.0);
        arm(&mut set, Side::Right, 35.0);

        assert!(d.detect_elbow_flexion(&set, &MovementContext::default()).unwrap().is_none());

        let worst = d.detect_elbow_flexion(&set, &MovementContext::extended_arm(None)).unwrap().unwrap();
        assert_eq!(worst.affected_joint, "right_elbow");
        assert_eq!(worst.severity, Severity::Severe);

        let left = d
            .detect_elbow_flexion(&set, &MovementContext::extended_arm(Some(Side::Left)))
            .unwrap()
            .unwrap();
        assert_eq!(left.severity, Severity::Mild);
    }

    #[test]
    fn elbow_drift_on_missing_side() {
        let d = detector();
        let set = frames(0.0);
        assert!(d.detect_elbow_flexion(&set, &MovementContext::extended_arm(None)).unwrap().is_none());
        assert!(d.detect_elbow_flexion(&set, &MovementContext::extended_arm(Some(Side::Right))).is_err());
    }

    #[test]
    fn calibration_sets_baseline() {
        let mut d = detector();
        let mut p = pose();
        p[5].position.y = 1.44;
        p[6].position.y = 1.44;
        // Hiking against the default baseline.
        assert!(d.detect_shoulder_hiking(MOVENET_17, &p, &frames(0.0)).unwrap().is_some());

        let baseline = d.calibrate_shoulder_baseline(MOVENET_17, &p, &frames(0.0)).unwrap();
        assert_relative_eq!(baseline, 0.2, epsilon = 1e-9);
        assert_relative_eq!(d.thresholds().neutral_ear_shoulder_ratio, 0.2, epsilon = 1e-9);
        assert!(d.detect_shoulder_hiking(MOVENET_17, &p, &frames(0.0)).unwrap().is_none());
    }

    #[test]
    fn calibration_without_landmarks_fails() {
        let mut d = detector();
        assert!(d.calibrate_shoulder_baseline(MOVENET_17, &[], &frames(0.0)).is_err());
        assert_relative_eq!(d.thresholds().neutral_ear_shoulder_ratio, 0.28);
    }

    #[test]
    fn invalid_thresholds_rejected() {
        let t = CompensationThresholds::default().with_min_visibility(3.0);
        assert!(CompensationDetector::new(Arc::new(PoseSchemaRegistry::new()), t).is_err());
    }
}
