//! Hit testing for a 2D editing canvas.

use serde::{Deserialize, Serialize};

use ossature_api_core::{Coordinate, Vector};
use ossature_skeleton_core::{BoneId, BoneProperty, JointId, JointProperty, Skeleton, Target};

/// What a pointer at some canvas location would grab.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanvasTarget {
    Bone(BoneId),
    Joint(JointId),
}

impl CanvasTarget {
    /// The property a drag on this target edits: a bone swings, a joint
    /// slides.
    pub fn to_target(self) -> Target {
        match self {
            CanvasTarget::Bone(bone) => Target::bone(bone, BoneProperty::Rotation),
            CanvasTarget::Joint(joint) => Target::joint(joint, JointProperty::Offset),
        }
    }
}

/// The nearest visible joint within `tolerance` of `location`, else the
/// nearest bone segment within `tolerance`. Only X and Y are considered.
pub fn pick(skeleton: &Skeleton, location: Coordinate, tolerance: f32) -> Option<CanvasTarget> {
    let mut best: Option<(f32, JointId)> = None;
    for joint in skeleton.joints().filter(|joint| joint.is_visible()) {
        let Ok(position) = skeleton.joint_position(joint.id()) else {
            continue;
        };
        let distance = planar(location - position).magnitude();
        if distance <= tolerance && best.map_or(true, |(closest, _)| distance < closest) {
            best = Some((distance, joint.id()));
        }
    }
    if let Some((_, joint)) = best {
        return Some(CanvasTarget::Joint(joint));
    }

    let mut best: Option<(f32, BoneId)> = None;
    for pose in skeleton.resolve().iter() {
        let distance = distance_to_segment(location, pose.start, pose.end);
        if distance <= tolerance && best.map_or(true, |(closest, _)| distance < closest) {
            best = Some((distance, pose.bone));
        }
    }
    best.map(|(_, bone)| CanvasTarget::Bone(bone))
}

fn planar(vector: Vector) -> Vector {
    Vector::new(vector.x, vector.y, 0.0)
}

fn distance_to_segment(point: Coordinate, start: Coordinate, end: Coordinate) -> f32 {
    let segment = planar(end - start);
    let offset = planar(point - start);
    let length_squared = segment.dot(segment);
    if length_squared == 0.0 {
        return offset.magnitude();
    }
    let t = (offset.dot(segment) / length_squared).clamp(0.0, 1.0);
    (offset - segment * t).magnitude()
}
