//! Shoulder hiking: the shoulder closing toward the ear.

use biomech_frames::FrameSet;
use biomech_schema::PoseSchemaRegistry;
use biomech_types::{CompensationKind, CompensationPattern, FrameType, MagnitudeUnit, PoseLandmark, Side};

use crate::detector::graded;
use crate::error::{CompensationError, Result};
use crate::thresholds::CompensationThresholds;

const HIKING: &str = "shoulder_hiking";

/// Vertical ear-to-shoulder distance over torso height on one side.
///
/// Both lengths are measured along the trunk superior axes, so a leaning
/// trunk does not read as hiking.
///
/// # Errors
///
/// Fails when the global or thorax frame is missing, the ear or shoulder is
/// missing or below `min_visibility`, or the torso has no height.
pub fn ear_shoulder_ratio(
    registry: &PoseSchemaRegistry,
    schema_id: &str,
    landmarks: &[PoseLandmark],
    frames: &FrameSet,
    side: Side,
    min_visibility: f64,
) -> Result<f64> {
    let global = frames.require(FrameType::Global)?;
    let thorax = frames.require(FrameType::Thorax)?;
    let torso = global.y.dot(&(thorax.origin - global.origin));
    if torso <= f64::EPSILON {
        return Err(CompensationError::degenerate(HIKING, "torso has no height"));
    }

    let ear = visible(registry, schema_id, landmarks, &side.landmark("ear"), min_visibility)?;
    let shoulder = visible(registry, schema_id, landmarks, &side.landmark("shoulder"), min_visibility)?;
    Ok(thorax.y.dot(&(ear.position - shoulder.position)) / torso)
}

fn visible<'a>(
    registry: &PoseSchemaRegistry,
    schema_id: &str,
    landmarks: &'a [PoseLandmark],
    name: &str,
    min_visibility: f64,
) -> Result<&'a PoseLandmark> {
    let landmark = registry.landmark(schema_id, landmarks, name)?;
    if landmark.is_visible(min_visibility) {
        Ok(landmark)
    } else {
        Err(CompensationError::low_confidence(HIKING, name, landmark.visibility, min_visibility))
    }
}

/// Larger of the two sides' closing of the ear-to-shoulder distance,
/// as a percentage of the neutral ratio.
///
/// A side that cannot be evaluated is ignored while the other side can.
///
/// # Errors
///
/// Returns the first side's error when neither side can be evaluated.
pub fn shoulder_hiking(
    registry: &PoseSchemaRegistry,
    schema_id: &str,
    landmarks: &[PoseLandmark],
    frames: &FrameSet,
    thresholds: &CompensationThresholds,
) -> Result<Option<CompensationPattern>> {
    let neutral = thresholds.neutral_ear_shoulder_ratio;
    let mut worst: Option<(Side, f64)> = None;
    let mut first_error = None;
    for side in Side::BOTH {
        match ear_shoulder_ratio(registry, schema_id, landmarks, frames, side, thresholds.min_visibility) {
            Ok(ratio) => {
                let closing = ((neutral - ratio) / neutral * 100.0).max(0.0);
                if worst.is_none_or(|(_, c)| closing > c) {
                    worst = Some((side, closing));
                }
            }
            Err(error) => {
                first_error.get_or_insert(error);
            }
        }
    }

    let Some((side, closing)) = worst else {
        return Err(first_error.unwrap_or_else(|| CompensationError::degenerate(HIKING, "no side evaluated")));
    };
    Ok(graded(
        CompensationKind::ShoulderHiking,
        &thresholds.shoulder_hiking,
        closing,
        MagnitudeUnit::Percent,
        side.landmark("shoulder"),
        format!("{side} shoulder elevated, ear distance {closing:.0}% below neutral"),
    ))
}
