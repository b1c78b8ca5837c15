//! Pose landmarks, body sides and camera view orientation.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single body landmark produced by a pose-estimation backend.
///
/// Positions are expressed in a right-handed, y-up space. Backends that emit
/// y-down normalized image coordinates should go through
/// [`PoseLandmark::from_image`].
///
/// # Example
///
/// ```
/// use biomech_types::PoseLandmark;
///
/// let lm = PoseLandmark::new_3d(0.1, 0.9, -0.2, 0.95).with_name("left_shoulder");
/// assert!(lm.has_depth);
/// assert!(lm.is_visible(0.5));
/// assert_eq!(lm.name.as_deref(), Some("left_shoulder"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoseLandmark {
    /// Position (y-up). `z` is zero for 2D-only backends.
    pub position: Vector3<f64>,
    /// Whether `position.z` carries a real depth estimate.
    pub has_depth: bool,
    /// Visibility / confidence in `[0, 1]`.
    pub visibility: f64,
    /// Optional semantic name reported by the backend.
    pub name: Option<String>,
}

impl PoseLandmark {
    /// Creates a 2D landmark (no depth).
    #[must_use]
    pub fn new_2d(x: f64, y: f64, visibility: f64) -> Self {
        Self {
            position: Vector3::new(x, y, 0.0),
            has_depth: false,
            visibility: clamp_unit(visibility),
            name: None,
        }
    }

    /// Creates a 3D landmark.
    #[must_use]
    pub fn new_3d(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self::from_position(Vector3::new(x, y, z), visibility)
    }

    /// Creates a 3D landmark from a position vector.
    #[must_use]
    pub fn from_position(position: Vector3<f64>, visibility: f64) -> Self {
        Self {
            position,
            has_depth: true,
            visibility: clamp_unit(visibility),
            name: None,
        }
    }

    /// Creates a landmark from y-down normalized image coordinates.
    ///
    /// `y` is flipped to `1 - y` so the superior direction is `+y`.
    /// `depth` is used as-is when present.
    #[must_use]
    pub fn from_image(x: f64, y: f64, depth: Option<f64>, visibility: f64) -> Self {
        Self {
            position: Vector3::new(x, 1.0 - y, depth.unwrap_or(0.0)),
            has_depth: depth.is_some(),
            visibility: clamp_unit(visibility),
            name: None,
        }
    }

    /// Attaches a semantic name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns `true` if visibility is at least `threshold`.
    #[must_use]
    pub fn is_visible(&self, threshold: f64) -> bool {
        self.visibility >= threshold
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// Body side of a bilateral segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Side {
    /// Subject's left.
    Left,
    /// Subject's right.
    Right,
}

impl Side {
    /// Both sides, left first.
    pub const BOTH: [Self; 2] = [Self::Left, Self::Right];

    /// Landmark-name prefix (`"left"` / `"right"`).
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// The other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// `+1.0` for right, `-1.0` for left; the sign of the lateral axis
    /// pointing toward this side.
    #[must_use]
    pub const fn lateral_sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Prefixes a segment name, e.g. `Side::Left.landmark("elbow")` is
    /// `"left_elbow"`.
    #[must_use]
    pub fn landmark(self, segment: &str) -> String {
        format!("{}_{segment}", self.prefix())
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Orientation of the subject relative to the camera.
///
/// The camera looks along `-z`; `+x` is image right and `+y` is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ViewOrientation {
    /// Subject faces the camera.
    Frontal,
    /// Side view, subject faces image right.
    Sagittal,
    /// Side view, subject faces image left.
    Lateral,
    /// Subject faces away from the camera.
    Posterior,
}

impl ViewOrientation {
    /// Anterior direction a correctly positioned subject presents in this view.
    #[must_use]
    pub fn expected_anterior(self) -> Vector3<f64> {
        match self {
            Self::Frontal => Vector3::z(),
            Self::Sagittal => Vector3::x(),
            Self::Lateral => -Vector3::x(),
            Self::Posterior => -Vector3::z(),
        }
    }

    /// Direction of the subject's right side implied by this view
    /// (`anterior × up`).
    #[must_use]
    pub fn expected_right(self) -> Vector3<f64> {
        self.expected_anterior().cross(&Vector3::y())
    }

    /// Returns `true` for views where the subject's coronal plane faces the
    /// camera.
    #[must_use]
    pub const fn shows_coronal_plane(self) -> bool {
        matches!(self, Self::Frontal | Self::Posterior)
    }

    /// Returns `true` for the two side views.
    #[must_use]
    pub const fn is_side_view(self) -> bool {
        matches!(self, Self::Sagittal | Self::Lateral)
    }

    /// Lowercase tag as emitted by orientation classifiers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Frontal => "frontal",
            Self::Sagittal => "sagittal",
            Self::Lateral => "lateral",
            Self::Posterior => "posterior",
        }
    }

    /// Parses a classifier tag. Unknown tags yield `None`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "frontal" | "front" | "anterior" => Some(Self::Frontal),
            "sagittal" | "side" => Some(Self::Sagittal),
            "lateral" => Some(Self::Lateral),
            "posterior" | "back" => Some(Self::Posterior),
            _ => None,
        }
    }
}

impl std::fmt::Display for ViewOrientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
