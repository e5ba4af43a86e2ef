use std::time::Duration;

use ossature_animation_core::{
    apply_all, Animation, Frame, Keyframe, PlaybackConfig, PlaybackError, PlaybackEvent,
    PlaybackMode, PropertyUpdate, RunningAnimation, Timeline, Value,
};
use ossature_skeleton_core::{
    BoneId, BoneProperty, JointId, JointProperty, Skeleton, SkeletonError, Target,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

/// One second: length 0 -> 10, visibility flips at 500ms; plus an empty
/// timeline that must never produce updates.
fn ramp() -> Animation {
    let length = Timeline::new("length", Target::bone(BoneId(0), BoneProperty::Length))
        .with(Keyframe::new(Frame(0), Value::Scalar(0.0)))
        .unwrap()
        .with(Keyframe::new(Frame(1000), Value::Scalar(10.0)))
        .unwrap();
    let visible = Timeline::new("visible", Target::joint(JointId(0), JointProperty::Visible))
        .with(Keyframe::new(Frame(0), Value::Bool(true)))
        .unwrap()
        .with(Keyframe::new(Frame(500), Value::Bool(false)))
        .unwrap();
    let empty = Timeline::new("unused", Target::bone(BoneId(0), BoneProperty::Offset));
    Animation::new("ramp")
        .with(length)
        .unwrap()
        .with(empty)
        .unwrap()
        .with(visible)
        .unwrap()
}

fn scalar(outputs: &ossature_animation_core::Outputs) -> f32 {
    outputs.updates[0].value().as_scalar().unwrap()
}

#[test]
fn updates_follow_timeline_declaration_order() {
    let mut running = ramp().start(PlaybackConfig::default()).unwrap();
    let outputs = running.advance(0.25).unwrap();
    assert_eq!(outputs.updates.len(), 2);
    assert_eq!(
        outputs.updates[0],
        PropertyUpdate::new(
            Target::bone(BoneId(0), BoneProperty::Length),
            Value::Scalar(2.5)
        )
    );
    assert_eq!(
        outputs.updates[1],
        PropertyUpdate::new(
            Target::joint(JointId(0), JointProperty::Visible),
            Value::Bool(true)
        )
    );
    assert!(outputs.events.is_empty());
    assert_eq!(running.frame(), Frame(250));
}

#[test]
fn negative_or_nan_time_is_rejected_without_moving() {
    let mut running = ramp().start(PlaybackConfig::default()).unwrap();
    running.advance(0.1).unwrap();
    let before = (running.frame(), running.elapsed());

    assert_eq!(
        running.advance(-0.01).unwrap_err(),
        PlaybackError::NonMonotonicTime(-0.01)
    );
    assert!(matches!(
        running.advance(f32::NAN),
        Err(PlaybackError::NonMonotonicTime(_))
    ));
    assert_eq!((running.frame(), running.elapsed()), before);
}

#[test]
fn clamp_holds_the_last_frame() {
    let mut running = ramp()
        .start(PlaybackConfig::default().with_mode(PlaybackMode::Clamp))
        .unwrap();
    let outputs = running.advance(5.0).unwrap();
    assert_eq!(scalar(outputs), 10.0);
    assert!(outputs.events.is_empty());
    let outputs = running.advance(1.0).unwrap();
    assert_eq!(scalar(outputs), 10.0);
    assert_eq!(running.frame(), Frame(1000));
    assert!(!running.is_finished());
}

#[test]
fn stop_signals_completion_once_then_goes_quiet() {
    let mut running = ramp()
        .start(PlaybackConfig::default().with_mode(PlaybackMode::Stop))
        .unwrap();
    let outputs = running.advance(0.9).unwrap();
    assert!(outputs.events.is_empty());

    let outputs = running.advance(0.2).unwrap();
    assert_eq!(scalar(outputs), 10.0);
    assert_eq!(
        outputs.events,
        vec![PlaybackEvent::Completed { frame: Frame(1000) }]
    );
    assert!(running.is_finished());

    let elapsed = running.elapsed();
    assert!(running.advance(1.0).unwrap().is_empty());
    assert_eq!(running.elapsed(), elapsed);

    running.reset();
    assert!(!running.is_finished());
    let outputs = running.advance(0.5).unwrap();
    assert_eq!(scalar(outputs), 5.0);
}

#[test]
fn loop_wraps_and_counts() {
    let mut running = ramp()
        .start(PlaybackConfig::default().with_mode(PlaybackMode::Loop))
        .unwrap();
    let outputs = running.advance(1.25).unwrap();
    approx(scalar(outputs), 2.5, 1e-6);
    assert_eq!(outputs.events, vec![PlaybackEvent::Looped { count: 1 }]);

    let outputs = running.advance(2.0).unwrap();
    assert_eq!(outputs.events, vec![PlaybackEvent::Looped { count: 3 }]);
    assert_eq!(running.frame(), Frame(250));
    assert_eq!(running.loops(), 3);

    let outputs = running.advance(0.1).unwrap();
    assert!(outputs.events.is_empty());
}

#[test]
fn ping_pong_runs_backward() {
    let mut running = ramp()
        .start(PlaybackConfig::default().with_mode(PlaybackMode::PingPong))
        .unwrap();
    running.advance(1.25).unwrap();
    assert_eq!(running.frame(), Frame(750));
    running.advance(1.0).unwrap();
    assert_eq!(running.frame(), Frame(250));
}

#[test]
fn speed_scales_elapsed_time() {
    let mut running = ramp().start(PlaybackConfig::default().with_speed(2.0)).unwrap();
    running.advance_by(Duration::from_millis(100)).unwrap();
    assert_eq!(running.frame(), Frame(200));

    assert_eq!(
        running.set_speed(-1.0),
        Err(PlaybackError::InvalidSpeed(-1.0))
    );
    running.set_speed(0.0).unwrap();
    running.advance(10.0).unwrap();
    assert_eq!(running.frame(), Frame(200));
}

#[test]
fn invalid_speed_is_refused_at_start() {
    assert_eq!(
        ramp()
            .start(PlaybackConfig::default().with_speed(-1.0))
            .err(),
        Some(PlaybackError::InvalidSpeed(-1.0))
    );
    assert!(matches!(
        ramp().start(PlaybackConfig::default().with_speed(f32::NAN)),
        Err(PlaybackError::InvalidSpeed(_))
    ));
    assert!(matches!(
        RunningAnimation::new(ramp(), PlaybackConfig::default().with_speed(f32::INFINITY)),
        Err(PlaybackError::InvalidSpeed(_))
    ));
}

#[test]
fn seek_and_rebind_reset_state() {
    let mut running = ramp().start(PlaybackConfig::default()).unwrap();
    let outputs = running.seek(Frame(600));
    approx(scalar(outputs), 6.0, 1e-5);
    assert_eq!(outputs.updates[1].value(), Value::Bool(false));
    assert_eq!(running.sample_now().updates.len(), 2);

    let mut other = Animation::new("other");
    other
        .push(
            Timeline::new("rot", Target::bone(BoneId(0), BoneProperty::Rotation))
                .with(Keyframe::new(Frame(0), Value::Scalar(1.0)))
                .unwrap(),
        )
        .unwrap();
    running.rebind(other);
    assert_eq!(running.frame(), Frame::ZERO);
    assert_eq!(running.elapsed(), Duration::ZERO);
    let outputs = running.advance(0.5).unwrap();
    assert_eq!(outputs.updates.len(), 1);
    assert_eq!(outputs.updates[0].value(), Value::Scalar(1.0));
}

#[test]
fn applying_updates_is_left_to_the_caller() {
    let mut skeleton: ossature_skeleton_core::Skeleton =
        ossature_test_fixtures::skeletons::load("biped").unwrap();
    let pristine = skeleton.clone();
    let animation: Animation = ossature_test_fixtures::animations::load("wave").unwrap();
    let mut running = animation.start(PlaybackConfig::default()).unwrap();

    let updates = running.advance(0.5).unwrap().updates.clone();
    assert_eq!(skeleton, pristine);
    apply_all(&mut skeleton, &updates).unwrap();

    let arm = skeleton.find_bone("right arm").unwrap().id();
    assert_eq!(
        skeleton.get(&Target::bone(arm, BoneProperty::Rotation)),
        Ok(Value::Scalar(1.0))
    );
    let hand = skeleton.find_joint("right hand").unwrap().id();
    assert_eq!(
        skeleton.get(&Target::joint(hand, JointProperty::Visible)),
        Ok(Value::Bool(false))
    );
}

#[test]
fn apply_all_is_all_or_nothing() {
    let mut skeleton = Skeleton::new();
    let root = skeleton
        .add_bone(ossature_skeleton_core::BoneDefinition::root(
            ossature_skeleton_core::BoneKind::Root,
            1.0,
        ))
        .unwrap();
    let before = skeleton.clone();
    let updates = [
        PropertyUpdate::new(Target::bone(root, BoneProperty::Length), Value::Scalar(4.0)),
        PropertyUpdate::new(Target::bone(BoneId(9), BoneProperty::Length), Value::Scalar(1.0)),
    ];
    assert_eq!(
        apply_all(&mut skeleton, &updates),
        Err(SkeletonError::UnknownBone(BoneId(9)))
    );
    assert_eq!(skeleton, before);
}
