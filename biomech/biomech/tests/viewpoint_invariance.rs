//! Viewpoint invariance and end-to-end scenarios.
//!
//! The same posture must read the same from any camera position once limb
//! vectors are projected onto anatomical planes.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use std::time::Duration;

use biomech::frames::CacheParams;
use biomech::goniometry::GoniometerParams;
use biomech::prelude::*;
use common::SyntheticPose;

fn pipeline() -> MeasurementPipeline {
    MeasurementPipeline::new(PipelineConfig::default().with_goniometer(GoniometerParams::unsmoothed())).unwrap()
}

fn left_elbow(pipeline: &mut MeasurementPipeline, pose: SyntheticPose, view: ViewOrientation) -> f64 {
    let schema = pipeline.registry().schema(MOVENET_17).unwrap().clone();
    let landmarks = pose.seen_from(view).landmarks(&schema);
    let report = pipeline
        .process(&PoseFrame::new(MOVENET_17, &landmarks).with_view(view))
        .unwrap();
    report.angle("left_elbow").expect("left elbow measured").angle
}

// =============================================================================
// Camera position
// =============================================================================

#[test]
fn elbow_90_frontal_and_sagittal_agree() {
    let mut p = pipeline();
    let pose = SyntheticPose::default().elbow(90.0);
    let frontal = left_elbow(&mut p, pose, ViewOrientation::Frontal);
    let sagittal = left_elbow(&mut p, pose, ViewOrientation::Sagittal);
    assert!((frontal - 90.0).abs() < 3.0, "frontal {frontal}");
    assert!((frontal - sagittal).abs() < 3.0, "frontal {frontal} sagittal {sagittal}");
}

#[test]
fn every_view_agrees_with_depth() {
    let mut p = pipeline();
    for flexion in [20.0, 45.0, 90.0, 130.0] {
        let pose = SyntheticPose::default().elbow(flexion);
        for view in [
            ViewOrientation::Frontal,
            ViewOrientation::Sagittal,
            ViewOrientation::Lateral,
            ViewOrientation::Posterior,
        ] {
            let angle = left_elbow(&mut p, pose, view);
            assert!((angle - (180.0 - flexion)).abs() < 1e-6, "{view}: {angle}");
        }
    }
}

#[test]
fn side_view_without_depth() {
    // Forward flexion lies in the image plane of a side camera, so 2D
    // landmarks suffice there.
    let mut p = pipeline();
    let angle = left_elbow(&mut p, SyntheticPose::default().elbow(90.0).flat(), ViewOrientation::Sagittal);
    assert!((angle - 90.0).abs() < 3.0, "{angle}");
}

#[test]
fn yaw_jitter_is_tolerated() {
    let mut p = pipeline();
    for jitter in [-8.0, -3.0, 4.0, 9.0] {
        let mut pose = SyntheticPose::default().elbow(90.0).seen_from(ViewOrientation::Frontal);
        pose.yaw_deg += jitter;
        let schema = p.registry().schema(MOVENET_17).unwrap().clone();
        let landmarks = pose.landmarks(&schema);
        let report = p
            .process(&PoseFrame::new(MOVENET_17, &landmarks).with_view(ViewOrientation::Frontal))
            .unwrap();
        let angle = report.angle("left_elbow").unwrap().angle;
        assert!((angle - 90.0).abs() < 3.0, "jitter {jitter}: {angle}");
    }
}

// =============================================================================
// End-to-end scenarios
// =============================================================================

#[test]
fn end_to_end_elbow_90_without_drift() {
    let mut p = pipeline();
    let schema = p.registry().schema(MOVENET_17).unwrap().clone();
    let landmarks = SyntheticPose::default().elbow(90.0).landmarks(&schema);
    for name in ["left_shoulder", "left_elbow", "left_wrist"] {
        let index = schema.index_of(name).unwrap();
        assert!((landmarks[index].visibility - 0.9).abs() < 1e-12);
    }

    let report = p
        .process(&PoseFrame::new(MOVENET_17, &landmarks).with_view(ViewOrientation::Frontal))
        .unwrap();
    let elbow = report.angle("left_elbow").unwrap();
    assert_eq!(elbow.plane, PlaneType::Sagittal);
    assert!((elbow.angle - 90.0).abs() < 3.0);
    assert!((elbow.confidence - 0.9).abs() < 1e-12);
    assert!(report.compensation(CompensationKind::ElbowFlexion).is_none());
}

#[test]
fn trunk_lean_scenario() {
    let mut p = pipeline();
    let schema = p.registry().schema(MOVENET_17).unwrap().clone();
    for (lean, expected) in [
        (3.0, None),
        (7.0, Some(Severity::Mild)),
        (12.0, Some(Severity::Moderate)),
        (18.0, Some(Severity::Severe)),
    ] {
        let landmarks = SyntheticPose::default().lean(lean).landmarks(&schema);
        let report = p
            .process(&PoseFrame::new(MOVENET_17, &landmarks).with_view(ViewOrientation::Frontal))
            .unwrap();
        let severity = report.compensation(CompensationKind::TrunkLean).map(|c| c.severity);
        assert_eq!(severity, expected, "lean {lean}");
        assert!(report.compensation(CompensationKind::HipHike).is_none());
    }
}

#[test]
fn trunk_lean_needs_a_frontal_or_lateral_view() {
    let mut p = pipeline();
    let schema = p.registry().schema(MOVENET_17).unwrap().clone();
    let landmarks = SyntheticPose::default().lean(12.0).landmarks(&schema);
    let report = p.process(&PoseFrame::new(MOVENET_17, &landmarks)).unwrap();
    assert!(report.compensation(CompensationKind::TrunkLean).is_none());

    let landmarks = SyntheticPose::default()
        .lean(12.0)
        .seen_from(ViewOrientation::Posterior)
        .landmarks(&schema);
    let report = p
        .process(&PoseFrame::new(MOVENET_17, &landmarks).with_view(ViewOrientation::Posterior))
        .unwrap();
    assert!(report.compensation(CompensationKind::TrunkLean).is_none());
}

#[test]
fn straight_arm_movement_flags_bent_elbow() {
    let mut p = pipeline();
    let schema = p.registry().schema(MOVENET_17).unwrap().clone();
    let landmarks = SyntheticPose::default().elbow(25.0).landmarks(&schema);
    let report = p
        .process(
            &PoseFrame::new(MOVENET_17, &landmarks)
                .with_view(ViewOrientation::Frontal)
                .with_context(MovementContext::extended_arm(Some(Side::Left))),
        )
        .unwrap();
    let drift = report.compensation(CompensationKind::ElbowFlexion).unwrap();
    assert_eq!(drift.severity, Severity::Moderate);
    assert!((drift.magnitude - 25.0).abs() < 1e-6);
}

#[test]
fn shoulder_hiking_scenario() {
    let mut p = pipeline();
    let schema = p.registry().schema(MOVENET_17).unwrap().clone();
    let landmarks = SyntheticPose::default().shoulder_raise(0.04).landmarks(&schema);
    let report = p
        .process(&PoseFrame::new(MOVENET_17, &landmarks).with_view(ViewOrientation::Frontal))
        .unwrap();
    let hiking = report.compensation(CompensationKind::ShoulderHiking).unwrap();
    assert_eq!(hiking.affected_joint, "left_shoulder");
    assert!(hiking.severity >= Severity::Mild);
}

#[test]
fn streaming_frames_hit_the_cache() {
    let config = PipelineConfig {
        cache: CacheParams::default().with_ttl(Duration::from_secs(60)),
        ..Default::default()
    };
    let mut p = MeasurementPipeline::new(config).unwrap();
    let schema = p.registry().schema(MOVENET_17).unwrap().clone();
    let landmarks = SyntheticPose::default().elbow(45.0).landmarks(&schema);
    let frame = PoseFrame::new(MOVENET_17, &landmarks).with_view(ViewOrientation::Frontal);

    let first = p.process(&frame).unwrap();
    let second = p.process(&frame).unwrap();
    assert_eq!(first.frames, second.frames);

    let stats = p.cache_stats().unwrap();
    assert_eq!(stats.misses, 7);
    assert_eq!(stats.hits, 7);
    assert!((stats.hit_rate() - 0.5).abs() < 1e-12);
}

#[test]
fn cached_frames_respect_dropped_visibility() {
    let config = PipelineConfig {
        cache: CacheParams::default().with_ttl(Duration::from_secs(60)),
        ..Default::default()
    };
    let mut p = MeasurementPipeline::new(config).unwrap();
    let schema = p.registry().schema(MOVENET_17).unwrap().clone();
    let mut landmarks = SyntheticPose::default().landmarks(&schema);

    let first = p
        .process(&PoseFrame::new(MOVENET_17, &landmarks).with_view(ViewOrientation::Frontal))
        .unwrap();
    assert!(first.frames.contains(FrameType::Global));

    landmarks[schema.index_of("right_hip").unwrap()].visibility = 0.2;
    let second = p
        .process(&PoseFrame::new(MOVENET_17, &landmarks).with_view(ViewOrientation::Frontal))
        .unwrap();
    assert!(!second.frames.contains(FrameType::Global));
    assert!(!second.frames.contains(FrameType::Pelvis));
}
