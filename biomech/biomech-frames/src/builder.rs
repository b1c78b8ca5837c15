//! Construction of ISB-style anatomical frames from pose landmarks.

use std::sync::Arc;

use biomech_schema::PoseSchemaRegistry;
use biomech_types::vector::{angle_between, midpoint, project_onto_plane, try_normalize};
use biomech_types::{AnatomicalReferenceFrame, FrameType, PoseLandmark, Side, ViewOrientation};
use nalgebra::Vector3;
use tracing::debug;

use crate::cache::FrameCache;
use crate::error::{FrameError, Result};
use crate::frame_set::FrameSet;
use crate::params::FrameBuilderParams;

const TRUNK_LANDMARKS: [&str; 4] = ["left_shoulder", "right_shoulder", "left_hip", "right_hip"];

// Trunk anchors resolved and checked against the trunk threshold.
struct Trunk {
    left_shoulder: Vector3<f64>,
    right_shoulder: Vector3<f64>,
    left_hip: Vector3<f64>,
    right_hip: Vector3<f64>,
    confidence: f64,
    has_depth: bool,
}

impl Trunk {
    fn hip_mid(&self) -> Vector3<f64> {
        midpoint(&self.left_hip, &self.right_hip)
    }

    fn shoulder_mid(&self) -> Vector3<f64> {
        midpoint(&self.left_shoulder, &self.right_shoulder)
    }

    fn up(&self) -> Vector3<f64> {
        self.shoulder_mid() - self.hip_mid()
    }
}

/// Builds anatomical reference frames for one pose.
///
/// Frames use `x` anterior, `y` superior and `z` toward the subject's right.
/// Trunk frames need all four trunk landmarks at or above
/// [`FrameBuilderParams::trunk_min_visibility`]; limb frames need their
/// anchors at or above [`FrameBuilderParams::segment_min_visibility`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use biomech_frames::{AnatomicalFrameBuilder, FrameBuilderParams};
/// use biomech_schema::{PoseSchemaRegistry, MOVENET_17};
/// use biomech_types::{FrameType, PoseLandmark, ViewOrientation};
///
/// let registry = Arc::new(PoseSchemaRegistry::with_builtin());
/// let builder = AnatomicalFrameBuilder::new(registry, FrameBuilderParams::default()).unwrap();
///
/// // Subject facing the camera: their right shoulder is on image left.
/// let mut pose = vec![PoseLandmark::new_3d(0.0, 0.0, 0.0, 0.0); 17];
/// pose[5] = PoseLandmark::new_3d(0.2, 1.4, 0.0, 0.9); // left_shoulder
/// pose[6] = PoseLandmark::new_3d(-0.2, 1.4, 0.0, 0.9); // right_shoulder
/// pose[11] = PoseLandmark::new_3d(0.1, 0.9, 0.0, 0.9); // left_hip
/// pose[12] = PoseLandmark::new_3d(-0.1, 0.9, 0.0, 0.9); // right_hip
///
/// let global = builder.build_global(MOVENET_17, &pose, Some(ViewOrientation::Frontal)).unwrap();
/// assert!(global.is_orthonormal(1e-9));
/// assert!(global.x.z > 0.99); // anterior points at the camera
/// ```
#[derive(Debug, Clone)]
pub struct AnatomicalFrameBuilder {
    registry: Arc<PoseSchemaRegistry>,
    params: FrameBuilderParams,
}

impl AnatomicalFrameBuilder {
    /// Creates a builder.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::InvalidConfig`] if the parameters are invalid.
    pub fn new(registry: Arc<PoseSchemaRegistry>, params: FrameBuilderParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { registry, params })
    }

    /// Builder parameters.
    #[must_use]
    pub const fn params(&self) -> &FrameBuilderParams {
        &self.params
    }

    /// Shared schema registry.
    #[must_use]
    pub const fn registry(&self) -> &Arc<PoseSchemaRegistry> {
        &self.registry
    }

    /// Whole-body frame: origin at the hip midpoint, superior toward the
    /// shoulder midpoint, lateral from the hip line.
    ///
    /// # Errors
    ///
    /// Fails if a trunk landmark is missing or below threshold, or if no
    /// lateral direction can be found.
    pub fn build_global(
        &self,
        schema_id: &str,
        landmarks: &[PoseLandmark],
        view: Option<ViewOrientation>,
    ) -> Result<AnatomicalReferenceFrame> {
        let trunk = self.trunk(FrameType::Global, schema_id, landmarks)?;
        self.trunk_frame(
            FrameType::Global,
            trunk.hip_mid(),
            &trunk,
            trunk.left_hip,
            trunk.right_hip,
            view,
        )
    }

    /// Thorax frame: origin at the shoulder midpoint, lateral from the
    /// shoulder line.
    ///
    /// # Errors
    ///
    /// Same as [`Self::build_global`].
    pub fn build_thorax(
        &self,
        schema_id: &str,
        landmarks: &[PoseLandmark],
        view: Option<ViewOrientation>,
    ) -> Result<AnatomicalReferenceFrame> {
        let trunk = self.trunk(FrameType::Thorax, schema_id, landmarks)?;
        self.trunk_frame(
            FrameType::Thorax,
            trunk.shoulder_mid(),
            &trunk,
            trunk.left_shoulder,
            trunk.right_shoulder,
            view,
        )
    }

    /// Pelvis frame: origin at the hip midpoint with the hip line as the
    /// primary (`z`) axis.
    ///
    /// # Errors
    ///
    /// Same as [`Self::build_global`].
    pub fn build_pelvis(
        &self,
        schema_id: &str,
        landmarks: &[PoseLandmark],
        view: Option<ViewOrientation>,
    ) -> Result<AnatomicalReferenceFrame> {
        let frame_type = FrameType::Pelvis;
        let trunk = self.trunk(frame_type, schema_id, landmarks)?;
        let up = trunk.up();
        let z = self
            .lateral_direction(trunk.left_hip, trunk.right_hip, &trunk, view)
            .and_then(try_normalize)
            .ok_or(FrameError::Degenerate(frame_type))?;
        let x = try_normalize(up.cross(&z)).ok_or(FrameError::Degenerate(frame_type))?;
        let y = z.cross(&x);
        Ok(AnatomicalReferenceFrame::from_axes(
            frame_type,
            trunk.hip_mid(),
            x,
            y,
            z,
            trunk.confidence,
        ))
    }

    /// Upper arm frame with origin at the shoulder and `y` from elbow to
    /// shoulder.
    ///
    /// When the wrist is visible and the elbow is flexed beyond
    /// [`FrameBuilderParams::forearm_min_flexion_deg`], the arm plane fixes
    /// `z`. Otherwise `x` is taken from the thorax superior axis, or from
    /// the thorax anterior axis when the arm is nearly parallel to the
    /// trunk.
    ///
    /// # Errors
    ///
    /// Fails if the shoulder or elbow is missing or below threshold, or if
    /// they coincide.
    pub fn build_humerus(
        &self,
        schema_id: &str,
        landmarks: &[PoseLandmark],
        side: Side,
        thorax: &AnatomicalReferenceFrame,
    ) -> Result<AnatomicalReferenceFrame> {
        let frame_type = FrameType::Humerus(side);
        let threshold = self.params.segment_min_visibility;
        let shoulder = self.anchor(frame_type, schema_id, landmarks, &side.landmark("shoulder"), threshold)?;
        let elbow = self.anchor(frame_type, schema_id, landmarks, &side.landmark("elbow"), threshold)?;
        let y = try_normalize(shoulder.position - elbow.position).ok_or(FrameError::Degenerate(frame_type))?;
        let confidence = shoulder.visibility.min(elbow.visibility).min(thorax.confidence);
        let parallel = self.params.parallel_sine();

        let wrist = self
            .registry
            .landmark(schema_id, landmarks, &side.landmark("wrist"))
            .ok()
            .filter(|w| w.is_visible(threshold));
        if let Some(wrist) = wrist {
            let forearm = wrist.position - elbow.position;
            let flexion = 180.0 - angle_between(&y, &forearm);
            let normal = forearm.cross(&y);
            if flexion > self.params.forearm_min_flexion_deg && normal.norm() >= parallel * forearm.norm() {
                if let Some(frame) = AnatomicalReferenceFrame::from_superior_and_z(
                    frame_type,
                    shoulder.position,
                    y,
                    normal,
                    confidence.min(wrist.visibility),
                ) {
                    return Ok(frame);
                }
            }
        }

        let from_up = project_onto_plane(&thorax.y, &y);
        let x_reference = if from_up.norm() >= parallel { from_up } else { thorax.x };
        AnatomicalReferenceFrame::from_superior_and_x(frame_type, shoulder.position, y, x_reference, confidence)
            .ok_or(FrameError::Degenerate(frame_type))
    }

    /// Forearm frame with origin at the elbow, `y` from wrist to elbow and
    /// `z` normal to the plane of the arm, falling back to the humerus `z`
    /// when the arm is straight.
    ///
    /// # Errors
    ///
    /// Fails if the elbow or wrist is missing or below threshold, or if
    /// they coincide.
    pub fn build_forearm(
        &self,
        schema_id: &str,
        landmarks: &[PoseLandmark],
        side: Side,
        humerus: &AnatomicalReferenceFrame,
    ) -> Result<AnatomicalReferenceFrame> {
        let frame_type = FrameType::Forearm(side);
        let threshold = self.params.segment_min_visibility;
        let elbow = self.anchor(frame_type, schema_id, landmarks, &side.landmark("elbow"), threshold)?;
        let wrist = self.anchor(frame_type, schema_id, landmarks, &side.landmark("wrist"), threshold)?;
        let y = try_normalize(elbow.position - wrist.position).ok_or(FrameError::Degenerate(frame_type))?;
        let normal = humerus.y.cross(&y);
        let z_reference = if normal.norm() >= self.params.parallel_sine() { normal } else { humerus.z };
        let confidence = elbow.visibility.min(wrist.visibility).min(humerus.confidence);
        AnatomicalReferenceFrame::from_superior_and_z(frame_type, elbow.position, y, z_reference, confidence)
            .ok_or(FrameError::Degenerate(frame_type))
    }

    /// Builds every frame that the landmarks support.
    ///
    /// Frames that cannot be built are omitted and logged. Humerus frames
    /// need the thorax; forearm frames need the humerus of the same side.
    /// With a cache, each frame goes through [`FrameCache::get_or_compute`].
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Schema`] if `schema_id` is not registered.
    pub fn build_set(
        &self,
        schema_id: &str,
        landmarks: &[PoseLandmark],
        view: Option<ViewOrientation>,
        cache: Option<&FrameCache>,
    ) -> Result<FrameSet> {
        self.registry.schema(schema_id)?;
        let mut set = FrameSet::new(view).with_scapular_offset(self.params.scapular_offset_deg);
        let trunk_names: Vec<String> = TRUNK_LANDMARKS.iter().map(|n| (*n).to_string()).collect();

        let global = self.cached(cache, FrameType::Global, view, schema_id, landmarks, &trunk_names, || {
            self.build_global(schema_id, landmarks, view)
        });
        record(&mut set, FrameType::Global, global);

        let thorax = self.cached(cache, FrameType::Thorax, view, schema_id, landmarks, &trunk_names, || {
            self.build_thorax(schema_id, landmarks, view)
        });
        record(&mut set, FrameType::Thorax, thorax);

        let pelvis = self.cached(cache, FrameType::Pelvis, view, schema_id, landmarks, &trunk_names, || {
            self.build_pelvis(schema_id, landmarks, view)
        });
        record(&mut set, FrameType::Pelvis, pelvis);

        for side in Side::BOTH {
            let mut arm_names = trunk_names.clone();
            arm_names.extend(["shoulder", "elbow", "wrist"].map(|s| side.landmark(s)));

            let humerus_type = FrameType::Humerus(side);
            let humerus = match set.get(FrameType::Thorax).copied() {
                Some(thorax) => self.cached(cache, humerus_type, view, schema_id, landmarks, &arm_names, || {
                    self.build_humerus(schema_id, landmarks, side, &thorax)
                }),
                None => Err(FrameError::missing_dependency(humerus_type, FrameType::Thorax)),
            };
            record(&mut set, humerus_type, humerus);

            let forearm_type = FrameType::Forearm(side);
            let forearm = match set.get(humerus_type).copied() {
                Some(humerus) => self.cached(cache, forearm_type, view, schema_id, landmarks, &arm_names, || {
                    self.build_forearm(schema_id, landmarks, side, &humerus)
                }),
                None => Err(FrameError::missing_dependency(forearm_type, humerus_type)),
            };
            record(&mut set, forearm_type, forearm);
        }

        debug!(schema = schema_id, frame_count = set.len(), "built frame set");
        Ok(set)
    }

    fn anchor<'a>(
        &self,
        frame_type: FrameType,
        schema_id: &str,
        landmarks: &'a [PoseLandmark],
        name: &str,
        threshold: f64,
    ) -> Result<&'a PoseLandmark> {
        let landmark = self.registry.landmark(schema_id, landmarks, name)?;
        if landmark.is_visible(threshold) {
            Ok(landmark)
        } else {
            Err(FrameError::low_confidence(frame_type, name, landmark.visibility, threshold))
        }
    }

    fn trunk(&self, frame_type: FrameType, schema_id: &str, landmarks: &[PoseLandmark]) -> Result<Trunk> {
        let threshold = self.params.trunk_min_visibility;
        let [ls, rs, lh, rh] = TRUNK_LANDMARKS;
        let ls = self.anchor(frame_type, schema_id, landmarks, ls, threshold)?;
        let rs = self.anchor(frame_type, schema_id, landmarks, rs, threshold)?;
        let lh = self.anchor(frame_type, schema_id, landmarks, lh, threshold)?;
        let rh = self.anchor(frame_type, schema_id, landmarks, rh, threshold)?;
        let all = [ls, rs, lh, rh];
        Ok(Trunk {
            left_shoulder: ls.position,
            right_shoulder: rs.position,
            left_hip: lh.position,
            right_hip: rh.position,
            confidence: all.iter().map(|l| l.visibility).fold(1.0, f64::min),
            has_depth: all.iter().all(|l| l.has_depth),
        })
    }

    // Direction toward the subject's right. The landmark line is replaced by
    // the view's lateral direction when it has collapsed or when a side view
    // was captured without depth.
    fn lateral_direction(
        &self,
        left: Vector3<f64>,
        right: Vector3<f64>,
        trunk: &Trunk,
        view: Option<ViewOrientation>,
    ) -> Option<Vector3<f64>> {
        let line = right - left;
        let collapsed = line.norm() < self.params.min_lateral_ratio * trunk.up().norm();
        let flat_side_view = !trunk.has_depth && view.is_some_and(ViewOrientation::is_side_view);
        if collapsed || flat_side_view {
            view.map(ViewOrientation::expected_right)
        } else {
            Some(line)
        }
    }

    fn trunk_frame(
        &self,
        frame_type: FrameType,
        origin: Vector3<f64>,
        trunk: &Trunk,
        left: Vector3<f64>,
        right: Vector3<f64>,
        view: Option<ViewOrientation>,
    ) -> Result<AnatomicalReferenceFrame> {
        let up = trunk.up();
        self.lateral_direction(left, right, trunk, view)
            .and_then(|lateral| {
                AnatomicalReferenceFrame::from_primary_and_lateral(frame_type, origin, up, lateral, trunk.confidence)
            })
            .or_else(|| {
                let lateral = view?.expected_right();
                AnatomicalReferenceFrame::from_primary_and_lateral(frame_type, origin, up, lateral, trunk.confidence)
            })
            .ok_or(FrameError::Degenerate(frame_type))
    }

    #[allow(clippy::too_many_arguments)]
    fn cached<F>(
        &self,
        cache: Option<&FrameCache>,
        frame_type: FrameType,
        view: Option<ViewOrientation>,
        schema_id: &str,
        landmarks: &[PoseLandmark],
        names: &[String],
        compute: F,
    ) -> Result<AnatomicalReferenceFrame>
    where
        F: FnOnce() -> Result<AnatomicalReferenceFrame>,
    {
        let Some(cache) = cache else {
            return compute();
        };
        // Visibility joins the key so a threshold crossing forces a rebuild
        // and the stored confidence tracks the current landmarks.
        let pass = |v: f64, threshold: f64| if v >= threshold { 1.0 } else { 0.0 };
        let anchors: Vec<Vector3<f64>> = names
            .iter()
            .filter_map(|n| self.registry.landmark(schema_id, landmarks, n).ok())
            .flat_map(|l| {
                [
                    l.position,
                    Vector3::new(
                        l.visibility,
                        pass(l.visibility, self.params.trunk_min_visibility),
                        pass(l.visibility, self.params.segment_min_visibility),
                    ),
                ]
            })
            .collect();
        cache.get_or_compute(frame_type, view, &anchors, compute)
    }
}

fn record(set: &mut FrameSet, frame_type: FrameType, result: Result<AnatomicalReferenceFrame>) {
    match result {
        Ok(frame) => set.insert(frame),
        Err(error) => debug!(frame = %frame_type, %error, "frame omitted"),
    }
}
