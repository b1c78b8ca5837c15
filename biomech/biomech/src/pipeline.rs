//! Per-frame measurement driver.

use std::sync::Arc;

use biomech_compensation::{CompensationDetector, MovementContext};
use biomech_frames::{AnatomicalFrameBuilder, CacheStats, FrameCache, FrameSet};
use biomech_goniometry::Goniometer;
use biomech_schema::PoseSchemaRegistry;
use biomech_types::{
    CompensationKind, CompensationPattern, JointAngleMeasurement, Measurement, PoseLandmark,
    ViewOrientation,
};
use tracing::debug;

use crate::config::PipelineConfig;
use crate::error::Result;

/// One pose detection to measure.
#[derive(Debug, Clone, Copy)]
pub struct PoseFrame<'a> {
    /// Schema the landmarks are ordered by.
    pub schema_id: &'a str,
    /// Landmarks in schema order.
    pub landmarks: &'a [PoseLandmark],
    /// View reported by the orientation classifier, if any.
    pub view: Option<ViewOrientation>,
    /// Movement being performed.
    pub context: MovementContext,
}

impl<'a> PoseFrame<'a> {
    /// A frame with no declared view and a default movement context.
    #[must_use]
    pub fn new(schema_id: &'a str, landmarks: &'a [PoseLandmark]) -> Self {
        Self {
            schema_id,
            landmarks,
            view: None,
            context: MovementContext::default(),
        }
    }

    /// Declares the camera view.
    #[must_use]
    pub const fn with_view(mut self, view: ViewOrientation) -> Self {
        self.view = Some(view);
        self
    }

    /// Sets the movement context.
    #[must_use]
    pub const fn with_context(mut self, context: MovementContext) -> Self {
        self.context = context;
        self
    }
}

/// Everything measured on one pose.
#[derive(Debug, Clone)]
pub struct FrameReport {
    /// Frames that could be built.
    pub frames: FrameSet,
    /// Joint angles that could be measured.
    pub angles: Vec<JointAngleMeasurement>,
    /// Reported compensations.
    pub compensations: Vec<CompensationPattern>,
}

impl FrameReport {
    /// Angle of one joint, if it was measured.
    #[must_use]
    pub fn angle(&self, joint: &str) -> Option<&JointAngleMeasurement> {
        self.angles.iter().find(|m| m.joint == joint)
    }

    /// Reported compensation of one kind, if any.
    #[must_use]
    pub fn compensation(&self, kind: CompensationKind) -> Option<&CompensationPattern> {
        self.compensations.iter().find(|p| p.kind == kind)
    }

    /// Flattens the report into tagged measurements.
    ///
    /// Angles that carry an Euler decomposition also yield a
    /// [`Measurement::Euler`] entry.
    #[must_use]
    pub fn measurements(&self) -> Vec<Measurement> {
        let mut out = Vec::with_capacity(self.angles.len() + self.compensations.len());
        for angle in &self.angles {
            if let Some(angles) = angle.euler {
                out.push(Measurement::Euler {
                    joint: angle.joint.clone(),
                    angles,
                });
            }
            out.push(Measurement::Angle(angle.clone()));
        }
        out.extend(self.compensations.iter().cloned().map(Measurement::Compensation));
        out
    }
}

/// Builds frames, measures joints and detects compensations for each pose.
///
/// The frame cache is shared through an [`Arc`] so parallel callers can use
/// it directly; smoothing state is owned by the pipeline.
///
/// # Example
///
/// ```
/// use biomech::{MeasurementPipeline, PipelineConfig, PoseFrame};
/// use biomech_schema::MOVENET_17;
/// use biomech_types::{PoseLandmark, ViewOrientation};
///
/// let mut pipeline = MeasurementPipeline::new(PipelineConfig::default()).unwrap();
///
/// let mut pose = vec![PoseLandmark::new_3d(0.0, 0.0, 0.0, 0.0); 17];
/// pose[5] = PoseLandmark::new_3d(0.2, 1.4, 0.0, 0.9);
/// pose[6] = PoseLandmark::new_3d(-0.2, 1.4, 0.0, 0.9);
/// pose[11] = PoseLandmark::new_3d(0.12, 0.9, 0.0, 0.9);
/// pose[12] = PoseLandmark::new_3d(-0.12, 0.9, 0.0, 0.9);
///
/// let report = pipeline
///     .process(&PoseFrame::new(MOVENET_17, &pose).with_view(ViewOrientation::Frontal))
///     .unwrap();
/// assert!(report.compensations.is_empty());
/// ```
#[derive(Debug)]
pub struct MeasurementPipeline {
    registry: Arc<PoseSchemaRegistry>,
    builder: AnatomicalFrameBuilder,
    cache: Option<Arc<FrameCache>>,
    goniometer: Goniometer,
    detector: CompensationDetector,
}

impl MeasurementPipeline {
    /// Creates a pipeline over the built-in schemas.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Self::with_registry(Arc::new(PoseSchemaRegistry::with_builtin()), config)
    }

    /// Creates a pipeline over a custom registry.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error.
    pub fn with_registry(registry: Arc<PoseSchemaRegistry>, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let cache = if config.use_cache {
            Some(Arc::new(FrameCache::new(config.cache)?))
        } else {
            None
        };
        Ok(Self {
            builder: AnatomicalFrameBuilder::new(Arc::clone(&registry), config.frames)?,
            goniometer: Goniometer::new(Arc::clone(&registry), config.goniometer)?,
            detector: CompensationDetector::new(Arc::clone(&registry), config.compensation)?,
            cache,
            registry,
        })
    }

    /// Schema registry.
    #[must_use]
    pub const fn registry(&self) -> &Arc<PoseSchemaRegistry> {
        &self.registry
    }

    /// Frame cache, when enabled.
    #[must_use]
    pub const fn cache(&self) -> Option<&Arc<FrameCache>> {
        self.cache.as_ref()
    }

    /// Cache diagnostics, when the cache is enabled.
    #[must_use]
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|c| c.stats())
    }

    /// Frame builder.
    #[must_use]
    pub const fn builder(&self) -> &AnatomicalFrameBuilder {
        &self.builder
    }

    /// Goniometer.
    #[must_use]
    pub const fn goniometer(&self) -> &Goniometer {
        &self.goniometer
    }

    /// Compensation detector.
    #[must_use]
    pub const fn detector(&self) -> &CompensationDetector {
        &self.detector
    }

    /// Mutable compensation detector, e.g. for baseline calibration.
    pub fn detector_mut(&mut self) -> &mut CompensationDetector {
        &mut self.detector
    }

    /// Measures one pose.
    ///
    /// Frames, joints and compensation checks that the pose does not
    /// support are left out of the report rather than failing the call.
    ///
    /// # Errors
    ///
    /// Fails only when the schema is not registered.
    pub fn process(&mut self, pose: &PoseFrame<'_>) -> Result<FrameReport> {
        let frames = self
            .builder
            .build_set(pose.schema_id, pose.landmarks, pose.view, self.cache.as_deref())?;
        let angles = self.goniometer.measure_all(pose.schema_id, pose.landmarks, &frames);
        let compensations = self
            .detector
            .detect_all(pose.schema_id, pose.landmarks, &frames, &pose.context);
        debug!(
            schema = pose.schema_id,
            frames = frames.len(),
            angles = angles.len(),
            compensations = compensations.len(),
            "pose processed"
        );
        Ok(FrameReport {
            frames,
            angles,
            compensations,
        })
    }

    /// Clears smoothing history and cached frames, e.g. between exercises.
    pub fn reset(&mut self) {
        self.goniometer.reset_smoothing();
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use biomech_schema::MOVENET_17;
    use biomech_types::{Severity, Side};

    fn pose() -> Vec<PoseLandmark> {
        let mut pose = vec![PoseLandmark::new_3d(0.0, 0.0, 0.0, 0.0); 17];
        let mut set = |i: usize, x: f64, y: f64, z: f64| pose[i] = PoseLandmark::new_3d(x, y, z, 0.9);
        set(3, 0.08, 1.54, 0.0);
        set(4, -0.08, 1.54, 0.0);
        set(5, 0.2, 1.4, 0.0);
        set(6, -0.2, 1.4, 0.0);
        set(7, 0.2, 1.1, 0.0);
        set(8, -0.2, 1.1, 0.0);
        set(9, 0.2, 0.8, 0.0);
        set(10, -0.2, 0.8, 0.0);
        set(11, 0.12, 0.9, 0.0);
        set(12, -0.12, 0.9, 0.0);
        set(13, 0.12, 0.5, 0.0);
        set(14, -0.12, 0.5, 0.0);
        set(15, 0.12, 0.1, 0.0);
        set(16, -0.12, 0.1, 0.0);
        pose
    }

    #[test]
    fn upright_pose_report() {
        let mut pipeline = MeasurementPipeline::new(PipelineConfig::default()).unwrap();
        let landmarks = pose();
        let report = pipeline
            .process(
                &PoseFrame::new(MOVENET_17, &landmarks)
                    .with_view(ViewOrientation::Frontal)
                    .with_context(MovementContext::extended_arm(None)),
            )
            .unwrap();

        assert_eq!(report.frames.len(), 7);
        let elbow = report.angle("left_elbow").unwrap();
        assert!((elbow.angle - 180.0).abs() < 1e-6);
        assert!(report.angle("right_knee").is_some());
        assert!(report.compensations.is_empty());
        assert!(report.compensation(CompensationKind::TrunkLean).is_none());
    }

    #[test]
    fn cache_is_used_across_frames() {
        let mut pipeline = MeasurementPipeline::new(PipelineConfig::default()).unwrap();
        let landmarks = pose();
        let frame = PoseFrame::new(MOVENET_17, &landmarks).with_view(ViewOrientation::Frontal);
        pipeline.process(&frame).unwrap();
        let first = pipeline.cache_stats().unwrap();
        assert_eq!(first.hits, 0);
        assert_eq!(first.misses, 7);

        pipeline.reset();
        assert_eq!(pipeline.cache().unwrap().len(), 0);
    }

    #[test]
    fn disabled_cache() {
        let pipeline = MeasurementPipeline::new(PipelineConfig::default().with_cache(false)).unwrap();
        assert!(pipeline.cache_stats().is_none());
    }

    #[test]
    fn unknown_schema_fails() {
        let mut pipeline = MeasurementPipeline::new(PipelineConfig::default()).unwrap();
        assert!(pipeline.process(&PoseFrame::new("openpose_25", &[])).is_err());
    }

    #[test]
    fn raised_shoulder_is_flagged() {
        let mut pipeline = MeasurementPipeline::new(PipelineConfig::still_image()).unwrap();
        let mut landmarks = pose();
        // Left shoulder raised to within 0.09 of the ear.
        landmarks[5].position.y = 1.45;
        let report = pipeline
            .process(&PoseFrame::new(MOVENET_17, &landmarks).with_view(ViewOrientation::Frontal))
            .unwrap();
        let hiking = report.compensation(CompensationKind::ShoulderHiking).unwrap();
        assert_eq!(hiking.affected_joint, Side::Left.landmark("shoulder"));
        assert!(hiking.severity >= Severity::Mild);
    }

    #[test]
    fn measurements_are_tagged() {
        let mut pipeline = MeasurementPipeline::new(PipelineConfig::default()).unwrap();
        let landmarks = pose();
        let report = pipeline
            .process(&PoseFrame::new(MOVENET_17, &landmarks).with_view(ViewOrientation::Frontal))
            .unwrap();
        let measurements = report.measurements();
        let eulers = measurements
            .iter()
            .filter(|m| matches!(m, Measurement::Euler { .. }))
            .count();
        assert_eq!(eulers, 2);
        assert!(measurements.iter().any(|m| m.joint() == "left_elbow"));
    }
}
