//! Data-driven joint definitions.

use biomech_types::{PlaneType, Side};
use hashbrown::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Anatomical class of a joint; decides the measurement plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum JointCategory {
    /// Glenohumeral joint.
    Shoulder,
    /// Elbow hinge.
    Elbow,
    /// Hip joint.
    Hip,
    /// Knee hinge.
    Knee,
    /// Ankle joint.
    Ankle,
}

impl JointCategory {
    /// Plane a joint of this category is measured in.
    #[must_use]
    pub const fn plane(self) -> PlaneType {
        match self {
            Self::Shoulder => PlaneType::Scapular,
            Self::Hip => PlaneType::Coronal,
            Self::Elbow | Self::Knee | Self::Ankle => PlaneType::Sagittal,
        }
    }

    /// Segment name used in landmark and joint names.
    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::Shoulder => "shoulder",
            Self::Elbow => "elbow",
            Self::Hip => "hip",
            Self::Knee => "knee",
            Self::Ankle => "ankle",
        }
    }
}

/// A joint measured as the angle at `center` between the segments toward
/// `proximal` and `distal`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointDefinition {
    /// Joint name, e.g. `"left_elbow"`.
    pub name: String,
    /// Proximal landmark name.
    pub proximal: String,
    /// Vertex landmark name.
    pub center: String,
    /// Distal landmark name.
    pub distal: String,
    /// Anatomical class.
    pub category: JointCategory,
    /// Body side.
    pub side: Side,
}

impl JointDefinition {
    /// Standard definition for a category on one side.
    #[must_use]
    pub fn standard(category: JointCategory, side: Side) -> Self {
        let (proximal, center, distal) = match category {
            JointCategory::Shoulder => ("hip", "shoulder", "elbow"),
            JointCategory::Elbow => ("shoulder", "elbow", "wrist"),
            JointCategory::Hip => ("shoulder", "hip", "knee"),
            JointCategory::Knee => ("hip", "knee", "ankle"),
            JointCategory::Ankle => ("knee", "ankle", "foot_index"),
        };
        Self {
            name: side.landmark(category.segment()),
            proximal: side.landmark(proximal),
            center: side.landmark(center),
            distal: side.landmark(distal),
            category,
            side,
        }
    }

    /// Landmark names as `[proximal, center, distal]`.
    #[must_use]
    pub fn landmarks(&self) -> [&str; 3] {
        [&self.proximal, &self.center, &self.distal]
    }

    /// Plane this joint is measured in.
    #[must_use]
    pub const fn plane(&self) -> PlaneType {
        self.category.plane()
    }
}

/// Joint definitions keyed by name.
#[derive(Debug, Clone, Default)]
pub struct JointCatalog {
    joints: HashMap<String, JointDefinition>,
}

impl JointCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shoulder, elbow, hip, knee and ankle on both sides.
    #[must_use]
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for side in Side::BOTH {
            for category in [
                JointCategory::Shoulder,
                JointCategory::Elbow,
                JointCategory::Hip,
                JointCategory::Knee,
                JointCategory::Ankle,
            ] {
                catalog.insert(JointDefinition::standard(category, side));
            }
        }
        catalog
    }

    /// Adds or replaces a definition.
    pub fn insert(&mut self, joint: JointDefinition) -> Option<JointDefinition> {
        self.joints.insert(joint.name.clone(), joint)
    }

    /// Looks up a joint.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&JointDefinition> {
        self.joints.get(name)
    }

    /// Number of joints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Returns `true` if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Joint names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.joints.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_table() {
        assert_eq!(JointCategory::Shoulder.plane(), PlaneType::Scapular);
        assert_eq!(JointCategory::Elbow.plane(), PlaneType::Sagittal);
        assert_eq!(JointCategory::Knee.plane(), PlaneType::Sagittal);
        assert_eq!(JointCategory::Hip.plane(), PlaneType::Coronal);
        assert_eq!(JointCategory::Ankle.plane(), PlaneType::Sagittal);
    }

    #[test]
    fn standard_definitions() {
        let elbow = JointDefinition::standard(JointCategory::Elbow, Side::Right);
        assert_eq!(elbow.name, "right_elbow");
        assert_eq!(elbow.landmarks(), ["right_shoulder", "right_elbow", "right_wrist"]);

        let shoulder = JointDefinition::standard(JointCategory::Shoulder, Side::Left);
        assert_eq!(shoulder.landmarks(), ["left_hip", "left_shoulder", "left_elbow"]);
    }

    #[test]
    fn standard_catalog() {
        let catalog = JointCatalog::standard();
        assert_eq!(catalog.len(), 10);
        assert!(catalog.get("left_knee").is_some());
        assert!(catalog.get("neck").is_none());
        assert_eq!(catalog.names()[0], "left_ankle");
    }

    #[test]
    fn custom_joint_replaces() {
        let mut catalog = JointCatalog::standard();
        let mut knee = JointDefinition::standard(JointCategory::Knee, Side::Left);
        knee.distal = "left_heel".into();
        assert!(catalog.insert(knee).is_some());
        assert_eq!(catalog.get("left_knee").map(|j| j.distal.as_str()), Some("left_heel"));
    }
}
