//! Change records.
//!
//! A [`Change`] captures one successful mutation with enough data to replay
//! it onto an equal skeleton and to invert it.

use serde::{Deserialize, Serialize};

use ossature_api_core::{Coordinate, Value};
use ossature_skeleton_core::{
    BoneDefinition, BoneEnd, BoneId, JointDefinition, JointId, Skeleton, SkeletonError, Target,
};

use crate::error::EditError;

/// Groups changes that belong to one user action.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BatchId(pub u64);

/// Where a bone hangs in the tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attachment {
    pub parent: BoneId,
    pub end: BoneEnd,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeKind {
    BoneAdded {
        bone: BoneId,
        definition: BoneDefinition,
    },
    /// Joints riding on the bone are recorded as separate `JointRemoved`
    /// changes immediately before this one.
    BoneRemoved {
        bone: BoneId,
        definition: BoneDefinition,
    },
    BoneReparented {
        bone: BoneId,
        old: Attachment,
        new: Attachment,
    },
    JointAdded {
        joint: JointId,
        definition: JointDefinition,
    },
    JointRemoved {
        joint: JointId,
        definition: JointDefinition,
    },
    PropertyChanged {
        target: Target,
        old: Value,
        new: Value,
    },
    BoneRenamed {
        bone: BoneId,
        old: String,
        new: String,
    },
    JointRenamed {
        joint: JointId,
        old: String,
        new: String,
    },
    Translated {
        old: Coordinate,
        new: Coordinate,
    },
}

impl ChangeKind {
    /// The kind that undoes this one.
    pub fn inverse(&self) -> ChangeKind {
        match self.clone() {
            ChangeKind::BoneAdded { bone, definition } => {
                ChangeKind::BoneRemoved { bone, definition }
            }
            ChangeKind::BoneRemoved { bone, definition } => {
                ChangeKind::BoneAdded { bone, definition }
            }
            ChangeKind::BoneReparented { bone, old, new } => ChangeKind::BoneReparented {
                bone,
                old: new,
                new: old,
            },
            ChangeKind::JointAdded { joint, definition } => {
                ChangeKind::JointRemoved { joint, definition }
            }
            ChangeKind::JointRemoved { joint, definition } => {
                ChangeKind::JointAdded { joint, definition }
            }
            ChangeKind::PropertyChanged { target, old, new } => ChangeKind::PropertyChanged {
                target,
                old: new,
                new: old,
            },
            ChangeKind::BoneRenamed { bone, old, new } => ChangeKind::BoneRenamed {
                bone,
                old: new,
                new: old,
            },
            ChangeKind::JointRenamed { joint, old, new } => ChangeKind::JointRenamed {
                joint,
                old: new,
                new: old,
            },
            ChangeKind::Translated { old, new } => ChangeKind::Translated { old: new, new: old },
        }
    }

    /// Perform this change on `skeleton`. All-or-nothing, like the
    /// underlying skeleton operation.
    pub fn apply_to(&self, skeleton: &mut Skeleton) -> Result<(), EditError> {
        match self {
            ChangeKind::BoneAdded { bone, definition } => skeleton
                .restore_bone(*bone, definition.clone())
                .map_err(|err| replay_error(err, self)),
            ChangeKind::BoneRemoved { bone, .. } => {
                skeleton.remove_bone(*bone)?;
                Ok(())
            }
            ChangeKind::BoneReparented { bone, new, .. } => {
                skeleton.set_parent(*bone, new.parent, new.end)?;
                Ok(())
            }
            ChangeKind::JointAdded { joint, definition } => skeleton
                .restore_joint(*joint, definition.clone())
                .map_err(|err| replay_error(err, self)),
            ChangeKind::JointRemoved { joint, .. } => {
                skeleton.remove_joint(*joint)?;
                Ok(())
            }
            ChangeKind::PropertyChanged { target, new, .. } => {
                skeleton.set(target, *new)?;
                Ok(())
            }
            ChangeKind::BoneRenamed { bone, new, .. } => {
                skeleton.set_bone_label(*bone, new.clone())?;
                Ok(())
            }
            ChangeKind::JointRenamed { joint, new, .. } => {
                skeleton.set_joint_label(*joint, new.clone())?;
                Ok(())
            }
            ChangeKind::Translated { new, .. } => {
                skeleton.set_translation(*new)?;
                Ok(())
            }
        }
    }
}

fn replay_error(err: SkeletonError, kind: &ChangeKind) -> EditError {
    match err {
        SkeletonError::BoneSlotOccupied(_) | SkeletonError::JointSlotOccupied(_) => {
            EditError::ReplayMismatch(format!("{kind:?}: {err}"))
        }
        other => EditError::Skeleton(other),
    }
}

/// One recorded mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub batch: BatchId,
    #[serde(flatten)]
    pub kind: ChangeKind,
}

impl Change {
    pub fn new(batch: BatchId, kind: ChangeKind) -> Self {
        Self { batch, kind }
    }

    /// The animatable property touched, for property changes.
    pub fn target(&self) -> Option<Target> {
        match &self.kind {
            ChangeKind::PropertyChanged { target, .. } => Some(*target),
            _ => None,
        }
    }

    /// The value written, for property changes.
    pub fn value(&self) -> Option<Value> {
        match &self.kind {
            ChangeKind::PropertyChanged { new, .. } => Some(*new),
            _ => None,
        }
    }

    /// A change in the same batch that undoes this one.
    pub fn inverse(&self) -> Change {
        Change::new(self.batch, self.kind.inverse())
    }

    pub fn apply_to(&self, skeleton: &mut Skeleton) -> Result<(), EditError> {
        self.kind.apply_to(skeleton)
    }
}
