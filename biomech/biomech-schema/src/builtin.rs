//! Built-in schemas for common pose backends.

use hashbrown::HashMap;

use crate::schema::PoseSchema;

/// Id of the COCO 17-keypoint layout emitted by `MoveNet`.
pub const MOVENET_17: &str = "movenet_17";

/// Id of the 33-keypoint `BlazePose` layout emitted by `MediaPipe`.
pub const MEDIAPIPE_33: &str = "mediapipe_33";

const COCO_NAMES: [&str; 17] = [
    "nose",
    "left_eye",
    "right_eye",
    "left_ear",
    "right_ear",
    "left_shoulder",
    "right_shoulder",
    "left_elbow",
    "right_elbow",
    "left_wrist",
    "right_wrist",
    "left_hip",
    "right_hip",
    "left_knee",
    "right_knee",
    "left_ankle",
    "right_ankle",
];

const BLAZEPOSE_NAMES: [&str; 33] = [
    "nose",
    "left_eye_inner",
    "left_eye",
    "left_eye_outer",
    "right_eye_inner",
    "right_eye",
    "right_eye_outer",
    "left_ear",
    "right_ear",
    "mouth_left",
    "mouth_right",
    "left_shoulder",
    "right_shoulder",
    "left_elbow",
    "right_elbow",
    "left_wrist",
    "right_wrist",
    "left_pinky",
    "right_pinky",
    "left_index",
    "right_index",
    "left_thumb",
    "right_thumb",
    "left_hip",
    "right_hip",
    "left_knee",
    "right_knee",
    "left_ankle",
    "right_ankle",
    "left_heel",
    "right_heel",
    "left_foot_index",
    "right_foot_index",
];

// Groups shared by both layouts.
const COMMON_GROUPS: [(&str, &[&str]); 6] = [
    ("left_arm", &["left_shoulder", "left_elbow", "left_wrist"]),
    ("right_arm", &["right_shoulder", "right_elbow", "right_wrist"]),
    ("left_leg", &["left_hip", "left_knee", "left_ankle"]),
    ("right_leg", &["right_hip", "right_knee", "right_ankle"]),
    ("torso", &["left_shoulder", "right_shoulder", "left_hip", "right_hip"]),
    ("head", &["nose", "left_ear", "right_ear"]),
];

const BLAZEPOSE_GROUPS: [(&str, &[&str]); 4] = [
    ("left_hand", &["left_wrist", "left_pinky", "left_index", "left_thumb"]),
    ("right_hand", &["right_wrist", "right_pinky", "right_index", "right_thumb"]),
    ("left_foot", &["left_ankle", "left_heel", "left_foot_index"]),
    ("right_foot", &["right_ankle", "right_heel", "right_foot_index"]),
];

/// COCO 17-keypoint schema (`MoveNet`, `PoseNet`, most top-down detectors).
#[must_use]
pub fn movenet_17() -> PoseSchema {
    from_static(MOVENET_17, &COCO_NAMES, &COMMON_GROUPS)
}

/// `BlazePose` 33-keypoint schema.
#[must_use]
pub fn mediapipe_33() -> PoseSchema {
    let groups: Vec<(&str, &[&str])> = COMMON_GROUPS
        .iter()
        .chain(BLAZEPOSE_GROUPS.iter())
        .copied()
        .collect();
    from_static(MEDIAPIPE_33, &BLAZEPOSE_NAMES, &groups)
}

/// All built-in schemas.
#[must_use]
pub fn all() -> Vec<PoseSchema> {
    vec![movenet_17(), mediapipe_33()]
}

// The tables above are unique and every group member is a slot name, so the
// checked constructors cannot fail here. Unknown members are skipped rather
// than panicking.
fn from_static(id: &str, names: &[&str], groups: &[(&str, &[&str])]) -> PoseSchema {
    let index: HashMap<&str, usize> = names.iter().enumerate().map(|(i, n)| (*n, i)).collect();
    let groups = groups.iter().map(|(name, members)| {
        let indices = members.iter().filter_map(|m| index.get(m).copied()).collect();
        ((*name).to_string(), indices)
    });
    PoseSchema::from_parts(id, names.iter().map(|n| (*n).to_string()).collect(), groups)
}
