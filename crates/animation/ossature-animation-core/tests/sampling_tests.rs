use std::f32::consts::TAU;

use ossature_animation_core::{
    Animation, Easing, Frame, FrameError, Interpolation, InterpolationPolicy, Keyframe,
    RotationBlend, Timeline, Value,
};
use ossature_skeleton_core::{BoneId, BoneProperty, JointId, JointProperty, Target, Vector};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn scalar_timeline(keys: &[(u32, f32)]) -> Timeline {
    let mut timeline = Timeline::new("length", Target::bone(BoneId(0), BoneProperty::Length));
    for &(frame, value) in keys {
        timeline
            .insert(Keyframe::new(Frame(frame), Value::Scalar(value)))
            .unwrap();
    }
    timeline
}

#[test]
fn scalar_zero_to_ten_is_five_at_the_midpoint() {
    let timeline = scalar_timeline(&[(0, 0.0), (10, 10.0)]);
    let policy = InterpolationPolicy::default();
    assert_eq!(timeline.sample(Frame(5), &policy), Some(Value::Scalar(5.0)));
    approx(
        timeline.sample(Frame(3), &policy).unwrap().as_scalar().unwrap(),
        3.0,
        1e-6,
    );
}

#[test]
fn keyframe_values_are_returned_exactly() {
    let values = [(0, 0.1_f32), (7, -3.3), (19, 1.0e-7), (1000, 12345.678)];
    let timeline = scalar_timeline(&values);
    let policy = InterpolationPolicy::default();
    for (frame, value) in values {
        assert_eq!(
            timeline.sample(Frame(frame), &policy),
            Some(Value::Scalar(value))
        );
    }
}

#[test]
fn sampling_clamps_outside_the_keyframe_range() {
    let timeline = scalar_timeline(&[(100, 2.0), (200, 4.0)]);
    let policy = InterpolationPolicy::default();
    assert_eq!(timeline.sample(Frame(0), &policy), Some(Value::Scalar(2.0)));
    assert_eq!(timeline.sample(Frame(99), &policy), Some(Value::Scalar(2.0)));
    assert_eq!(timeline.sample(Frame(201), &policy), Some(Value::Scalar(4.0)));
    assert_eq!(timeline.sample(Frame::MAX, &policy), Some(Value::Scalar(4.0)));

    let empty = Timeline::new("empty", Target::bone(BoneId(0), BoneProperty::Length));
    assert_eq!(empty.sample(Frame(10), &policy), None);
}

#[test]
fn booleans_step_by_default() {
    let mut timeline = Timeline::new("visible", Target::joint(JointId(0), JointProperty::Visible));
    timeline
        .insert(Keyframe::new(Frame(0), Value::Bool(true)))
        .unwrap();
    timeline
        .insert(Keyframe::new(Frame(100), Value::Bool(false)))
        .unwrap();
    let policy = InterpolationPolicy::default();
    assert_eq!(timeline.sample(Frame(99), &policy), Some(Value::Bool(true)));
    assert_eq!(timeline.sample(Frame(100), &policy), Some(Value::Bool(false)));

    let midpoint = InterpolationPolicy {
        boolean: Interpolation::Linear,
        ..InterpolationPolicy::default()
    };
    assert_eq!(timeline.sample(Frame(49), &midpoint), Some(Value::Bool(true)));
    assert_eq!(timeline.sample(Frame(50), &midpoint), Some(Value::Bool(false)));
}

#[test]
fn stepped_policy_holds_scalars() {
    let timeline = scalar_timeline(&[(0, 0.0), (10, 10.0)]);
    assert_eq!(
        timeline.sample(Frame(9), &InterpolationPolicy::stepped()),
        Some(Value::Scalar(0.0))
    );
}

#[test]
fn easing_shapes_the_arriving_segment() {
    let mut timeline = Timeline::new("offset", Target::bone(BoneId(1), BoneProperty::Offset));
    timeline
        .insert(Keyframe::new(Frame(0), Value::Vector(Vector::ZERO)))
        .unwrap();
    timeline
        .insert(
            Keyframe::new(Frame(100), Value::Vector(Vector::new(0.0, 1.0, 0.0)))
                .with_easing(Easing::CubicBezier([0.42, 0.0, 0.58, 1.0])),
        )
        .unwrap();
    let policy = InterpolationPolicy::default();
    let early = timeline.sample(Frame(25), &policy).unwrap().as_vector().unwrap();
    assert!(early.y < 0.25, "ease-in should lag linear, got {}", early.y);
    let mid = timeline.sample(Frame(50), &policy).unwrap().as_vector().unwrap();
    approx(mid.y, 0.5, 1e-3);
}

#[test]
fn frame_seconds_round_trip_is_exact() {
    let frames = (0..200_000u32)
        .step_by(13)
        .chain([1_000_000, 4_194_303, 4_194_304, 8_000_001, 8_388_607]);
    for index in frames {
        let frame = Frame(index);
        assert_eq!(Frame::from_secs_f32(frame.as_secs_f32()), Ok(frame), "{index}");
    }
    assert_eq!(Frame::from_secs_f32(-1.0), Err(FrameError::Negative(-1.0)));
}

#[test]
fn wave_fixture_parses_and_samples() {
    let animation: Animation = ossature_test_fixtures::animations::load("wave").unwrap();
    assert_eq!(animation.name(), "wave");
    assert_eq!(animation.timelines().len(), 3);
    assert_eq!(animation.duration(), Frame(1000));

    let swing = animation.timeline("right arm swing").unwrap();
    let policy = InterpolationPolicy::default();
    assert_eq!(swing.sample(Frame(500), &policy), Some(Value::Scalar(1.0)));
    approx(
        swing.sample(Frame(750), &policy).unwrap().as_scalar().unwrap(),
        0.5,
        1e-6,
    );
}

#[test]
fn unordered_keyframes_are_rejected_on_load() {
    let json = r#"{
        "name": "bad",
        "target": { "on": "bone", "bone": 0, "property": "length" },
        "keyframes": [
            { "frame": 10, "value": { "type": "scalar", "data": 1.0 } },
            { "frame": 10, "value": { "type": "scalar", "data": 2.0 } }
        ]
    }"#;
    assert!(serde_json::from_str::<Timeline>(json).is_err());

    let wrong_kind = r#"{
        "name": "bad",
        "target": { "on": "bone", "bone": 0, "property": "length" },
        "keyframes": [ { "frame": 0, "value": { "type": "bool", "data": true } } ]
    }"#;
    assert!(serde_json::from_str::<Timeline>(wrong_kind).is_err());
}

#[test]
fn relative_keyframe_offsets_the_previous_value() {
    let mut timeline = Timeline::new("length", Target::bone(BoneId(0), BoneProperty::Length));
    timeline
        .insert(Keyframe::new(Frame(0), Value::Scalar(0.0)))
        .unwrap();
    timeline
        .insert(Keyframe::relative(Frame(1000), Value::Scalar(1.0)))
        .unwrap();
    let policy = InterpolationPolicy::default();
    assert_eq!(timeline.sample(Frame(250), &policy), Some(Value::Scalar(0.25)));
    assert_eq!(timeline.sample(Frame(1000), &policy), Some(Value::Scalar(1.0)));
    assert_eq!(timeline.sample(Frame(5000), &policy), Some(Value::Scalar(1.0)));

    let mut visible = Timeline::new("visible", Target::joint(JointId(0), JointProperty::Visible));
    visible
        .insert(Keyframe::new(Frame(0), Value::Bool(true)))
        .unwrap();
    visible
        .insert(Keyframe::relative(Frame(10), Value::Bool(true)))
        .unwrap();
    assert_eq!(visible.sample(Frame(10), &policy), Some(Value::Bool(false)));
}

fn spin(from_degrees: f32, to_degrees: f32) -> Timeline {
    Timeline::new("spin", Target::bone(BoneId(0), BoneProperty::Rotation))
        .with(Keyframe::new(Frame(0), Value::Scalar(from_degrees.to_radians())))
        .unwrap()
        .with(Keyframe::new(Frame(100), Value::Scalar(to_degrees.to_radians())))
        .unwrap()
}

/// Angular distance in radians, ignoring whole turns.
fn arc_between(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(TAU);
    d.min(TAU - d)
}

#[test]
fn rotations_take_the_short_way_around() {
    let timeline = spin(350.0, 10.0);
    let policy = InterpolationPolicy::default();
    let mid = timeline.sample(Frame(50), &policy).unwrap().as_scalar().unwrap();
    assert!(arc_between(mid, 0.0) < 1e-3, "got {} degrees", mid.to_degrees());
    let quarter = timeline.sample(Frame(25), &policy).unwrap().as_scalar().unwrap();
    assert!(arc_between(quarter, 355f32.to_radians()) < 1e-3);

    // Plain numeric blending is still available, e.g. for multi-turn spins.
    let raw = policy.with_rotation(RotationBlend::Linear);
    let mid = timeline.sample(Frame(50), &raw).unwrap().as_scalar().unwrap();
    approx(mid.to_degrees(), 180.0, 1e-2);

    // Lengths are not angles and never wrap.
    let length = scalar_timeline(&[(0, 350.0), (100, 10.0)]);
    assert_eq!(length.sample(Frame(50), &policy), Some(Value::Scalar(180.0)));
}

#[test]
fn named_easing_presets_shape_segments() {
    let mut timeline = scalar_timeline(&[(0, 0.0)]);
    timeline
        .insert(Keyframe::new(Frame(100), Value::Scalar(1.0)).with_easing(Easing::EaseOutCubic))
        .unwrap();
    let policy = InterpolationPolicy::default();
    let early = timeline.sample(Frame(25), &policy).unwrap().as_scalar().unwrap();
    assert!(early > 0.25, "ease-out should lead linear, got {early}");
    assert_eq!(timeline.sample(Frame(100), &policy), Some(Value::Scalar(1.0)));
    assert_eq!(Easing::Linear.control_points(), None);
    assert_eq!(
        Easing::EaseInOut.control_points(),
        Some([0.42, 0.0, 0.58, 1.0])
    );
}
