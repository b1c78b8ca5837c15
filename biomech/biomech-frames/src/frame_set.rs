//! The set of frames built for one pose.

use biomech_types::{
    AnatomicalPlane, AnatomicalReferenceFrame, FrameType, PlaneType, SCAPULAR_PLANE_OFFSET_DEG, Side,
    ViewOrientation, vector::rotate_about_axis,
};

use crate::error::{FrameError, Result};

/// Frames built from one landmark frame. Frames that could not be built are
/// absent rather than approximated.
///
/// # Example
///
/// ```
/// use biomech_frames::FrameSet;
/// use biomech_types::{FrameType, PlaneType, Side};
///
/// let set = FrameSet::new(None);
/// assert!(set.get(FrameType::Thorax).is_none());
/// assert!(set.require(FrameType::Thorax).is_err());
/// assert!(set.plane(PlaneType::Sagittal, Side::Left).is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSet {
    view: Option<ViewOrientation>,
    scapular_offset_deg: f64,
    global: Option<AnatomicalReferenceFrame>,
    thorax: Option<AnatomicalReferenceFrame>,
    pelvis: Option<AnatomicalReferenceFrame>,
    humerus: [Option<AnatomicalReferenceFrame>; 2],
    forearm: [Option<AnatomicalReferenceFrame>; 2],
}

const fn side_index(side: Side) -> usize {
    match side {
        Side::Left => 0,
        Side::Right => 1,
    }
}

impl FrameSet {
    /// Creates an empty set for the given view.
    #[must_use]
    pub const fn new(view: Option<ViewOrientation>) -> Self {
        Self {
            view,
            scapular_offset_deg: SCAPULAR_PLANE_OFFSET_DEG,
            global: None,
            thorax: None,
            pelvis: None,
            humerus: [None, None],
            forearm: [None, None],
        }
    }

    /// Overrides the scapular plane offset.
    #[must_use]
    pub const fn with_scapular_offset(mut self, degrees: f64) -> Self {
        self.scapular_offset_deg = degrees;
        self
    }

    /// View the landmarks were captured from.
    #[must_use]
    pub const fn view(&self) -> Option<ViewOrientation> {
        self.view
    }

    /// Stores a frame in the slot for its type, replacing any previous one.
    pub fn insert(&mut self, frame: AnatomicalReferenceFrame) {
        *self.slot_mut(frame.frame_type) = Some(frame);
    }

    /// Returns a frame if it was built.
    #[must_use]
    pub fn get(&self, frame_type: FrameType) -> Option<&AnatomicalReferenceFrame> {
        match frame_type {
            FrameType::Global => self.global.as_ref(),
            FrameType::Thorax => self.thorax.as_ref(),
            FrameType::Pelvis => self.pelvis.as_ref(),
            FrameType::Humerus(side) => self.humerus[side_index(side)].as_ref(),
            FrameType::Forearm(side) => self.forearm[side_index(side)].as_ref(),
        }
    }

    /// Returns a frame or [`FrameError::Unavailable`].
    ///
    /// # Errors
    ///
    /// Fails when the frame was omitted.
    pub fn require(&self, frame_type: FrameType) -> Result<&AnatomicalReferenceFrame> {
        self.get(frame_type).ok_or(FrameError::Unavailable(frame_type))
    }

    /// Returns `true` if the frame was built.
    #[must_use]
    pub fn contains(&self, frame_type: FrameType) -> bool {
        self.get(frame_type).is_some()
    }

    /// Number of frames present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames().count()
    }

    /// Returns `true` if no frame was built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the frames present, trunk first.
    pub fn frames(&self) -> impl Iterator<Item = &AnatomicalReferenceFrame> {
        [self.global.as_ref(), self.thorax.as_ref(), self.pelvis.as_ref()]
            .into_iter()
            .chain(self.humerus.iter().map(Option::as_ref))
            .chain(self.forearm.iter().map(Option::as_ref))
            .flatten()
    }

    /// Anatomical plane read off the thorax frame.
    ///
    /// `side` only matters for [`PlaneType::Scapular`], which is the coronal
    /// plane rotated anteriorly about the thorax superior axis toward that
    /// side.
    #[must_use]
    pub fn plane(&self, plane_type: PlaneType, side: Side) -> Option<AnatomicalPlane> {
        let thorax = self.thorax.as_ref()?;
        let plane = match plane_type {
            PlaneType::Sagittal => AnatomicalPlane::new(plane_type, thorax.origin, thorax.z),
            PlaneType::Coronal => AnatomicalPlane::new(plane_type, thorax.origin, thorax.x),
            PlaneType::Transverse => AnatomicalPlane::new(plane_type, thorax.origin, thorax.y),
            PlaneType::Scapular => {
                let angle = self.scapular_offset_deg * side.lateral_sign();
                let normal = rotate_about_axis(&thorax.x, &thorax.y, angle);
                AnatomicalPlane::new(plane_type, thorax.origin, normal).with_rotation_offset(angle)
            }
        };
        Some(plane)
    }

    /// Returns a plane or [`FrameError::Unavailable`] for the thorax frame.
    ///
    /// # Errors
    ///
    /// Fails when the thorax frame was omitted.
    pub fn require_plane(&self, plane_type: PlaneType, side: Side) -> Result<AnatomicalPlane> {
        self.plane(plane_type, side)
            .ok_or(FrameError::Unavailable(FrameType::Thorax))
    }

    fn slot_mut(&mut self, frame_type: FrameType) -> &mut Option<AnatomicalReferenceFrame> {
        match frame_type {
            FrameType::Global => &mut self.global,
            FrameType::Thorax => &mut self.thorax,
            FrameType::Pelvis => &mut self.pelvis,
            FrameType::Humerus(side) => &mut self.humerus[side_index(side)],
            FrameType::Forearm(side) => &mut self.forearm[side_index(side)],
        }
    }
}
