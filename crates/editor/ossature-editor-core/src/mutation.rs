//! Mutation commands, as produced by a canvas or property panel.

use serde::{Deserialize, Serialize};

use ossature_api_core::{Coordinate, Rotation, Value, Vector};
use ossature_skeleton_core::{
    BoneId, BoneProperty, JointId, JointProperty, Skeleton, SkeletonError, Target,
};

use crate::error::{EditError, MutationRejection};

/// Request to write `payload` into `target`. Validated in full before
/// anything is applied.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkeletonMutation {
    pub target: Target,
    pub payload: Value,
}

impl SkeletonMutation {
    pub fn new(target: Target, payload: Value) -> Self {
        Self { target, payload }
    }

    pub fn rotate_bone(bone: BoneId, rotation: Rotation) -> Self {
        Self::new(Target::bone(bone, BoneProperty::Rotation), rotation.into())
    }

    pub fn resize_bone(bone: BoneId, length: f32) -> Self {
        Self::new(Target::bone(bone, BoneProperty::Length), Value::Scalar(length))
    }

    pub fn offset_bone(bone: BoneId, offset: Vector) -> Self {
        Self::new(Target::bone(bone, BoneProperty::Offset), Value::Vector(offset))
    }

    pub fn move_joint(joint: JointId, offset: Vector) -> Self {
        Self::new(Target::joint(joint, JointProperty::Offset), Value::Vector(offset))
    }

    pub fn show_joint(joint: JointId, visible: bool) -> Self {
        Self::new(Target::joint(joint, JointProperty::Visible), Value::Bool(visible))
    }

    /// The rotation that points `bone` from its start toward `location`,
    /// as a canvas drag on the bone's end does.
    pub fn aim_bone(
        skeleton: &Skeleton,
        bone: BoneId,
        location: Coordinate,
    ) -> Result<Self, EditError> {
        let target = Target::bone(bone, BoneProperty::Rotation);
        let current = skeleton
            .bone(bone)
            .map_err(|_| EditError::Rejected(MutationRejection::UnknownTarget(target)))?;
        let world = skeleton.bone_transform(bone)?;
        let toward = location - world.translation;
        if !toward.is_finite() || toward.x == 0.0 && toward.y == 0.0 {
            return Err(EditError::Rejected(MutationRejection::InvalidPayload {
                target,
                reason: "aim location must differ from the bone start".into(),
            }));
        }
        let parent_rotation = world.rotation - current.rotation();
        let world_rotation = Rotation::from(toward.direction() - current.axis().unit().direction());
        Ok(Self::rotate_bone(bone, world_rotation - parent_rotation))
    }

    /// Check the mutation against `skeleton` without applying it.
    pub fn validate(&self, skeleton: &Skeleton) -> Result<(), MutationRejection> {
        skeleton
            .validate(&self.target, &self.payload)
            .map_err(|err| rejection(self.target, err))
    }
}

pub(crate) fn rejection(target: Target, err: SkeletonError) -> MutationRejection {
    match err {
        SkeletonError::UnknownBone(_) | SkeletonError::UnknownJoint(_) => {
            MutationRejection::UnknownTarget(target)
        }
        SkeletonError::KindMismatch {
            target,
            expected,
            actual,
        } => MutationRejection::KindMismatch {
            target,
            expected,
            actual,
        },
        SkeletonError::InvalidValue { target, reason } => {
            MutationRejection::InvalidPayload { target, reason }
        }
        other => MutationRejection::InvalidPayload {
            target,
            reason: other.to_string(),
        },
    }
}
