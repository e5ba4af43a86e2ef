//! Change-tracked skeleton ownership.

use ossature_animation_core::PropertyUpdate;
use ossature_api_core::{Coordinate, Value};
use ossature_skeleton_core::{
    BoneDefinition, BoneEnd, BoneId, JointDefinition, JointId, Skeleton, Target,
};

use crate::aggregator::{ChangeAggregator, GroupingPolicy};
use crate::change::{Attachment, BatchId, Change, ChangeKind};
use crate::error::EditError;
use crate::mutation::{rejection, SkeletonMutation};

/// Exclusive owner of a [`Skeleton`] that records a [`Change`] for every
/// successful mutation. Failed operations leave both the skeleton and the
/// change log untouched.
#[derive(Clone, Debug, Default)]
pub struct EditingSkeleton {
    skeleton: Skeleton,
    changes: ChangeAggregator,
}

impl EditingSkeleton {
    pub fn new(skeleton: Skeleton) -> Self {
        Self::with_policy(skeleton, GroupingPolicy::default())
    }

    pub fn with_policy(skeleton: Skeleton, policy: GroupingPolicy) -> Self {
        Self {
            skeleton,
            changes: ChangeAggregator::new(policy),
        }
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn into_skeleton(self) -> Skeleton {
        self.skeleton
    }

    pub fn begin_batch(&mut self) -> BatchId {
        self.changes.begin_batch()
    }

    pub fn peek_changes(&self) -> &[Change] {
        self.changes.peek()
    }

    pub fn drain_changes(&mut self) -> Vec<Change> {
        self.changes.drain()
    }

    // ----- structure -----

    pub fn add_bone(&mut self, definition: BoneDefinition) -> Result<BoneId, EditError> {
        let bone = self.skeleton.add_bone(definition)?;
        let definition = self.skeleton.bone(bone)?.definition();
        self.changes.record(ChangeKind::BoneAdded { bone, definition });
        Ok(bone)
    }

    pub fn add_joint(&mut self, definition: JointDefinition) -> Result<JointId, EditError> {
        let joint = self.skeleton.add_joint(definition)?;
        let definition = self.skeleton.joint(joint)?.definition();
        self.changes
            .record(ChangeKind::JointAdded { joint, definition });
        Ok(joint)
    }

    /// Remove a leaf bone. Its joints go with it and are recorded first so
    /// that replay and undo see them as separate changes.
    pub fn remove_bone(&mut self, bone: BoneId) -> Result<(), EditError> {
        let removed = self.skeleton.remove_bone(bone)?;
        for joint in &removed.joints {
            self.changes.record(ChangeKind::JointRemoved {
                joint: joint.id(),
                definition: joint.definition(),
            });
        }
        self.changes.record(ChangeKind::BoneRemoved {
            bone,
            definition: removed.bone.definition(),
        });
        Ok(())
    }

    pub fn remove_joint(&mut self, joint: JointId) -> Result<(), EditError> {
        let removed = self.skeleton.remove_joint(joint)?;
        self.changes.record(ChangeKind::JointRemoved {
            joint,
            definition: removed.definition(),
        });
        Ok(())
    }

    pub fn set_parent(
        &mut self,
        bone: BoneId,
        parent: BoneId,
        end: BoneEnd,
    ) -> Result<(), EditError> {
        let (old_parent, old_end) = self.skeleton.set_parent(bone, parent, end)?;
        self.changes.record(ChangeKind::BoneReparented {
            bone,
            old: Attachment {
                parent: old_parent,
                end: old_end,
            },
            new: Attachment { parent, end },
        });
        Ok(())
    }

    // ----- properties -----

    /// Write `value` into `target`. Returns the previous value.
    pub fn set_property(&mut self, target: &Target, value: Value) -> Result<Value, EditError> {
        let old = self.skeleton.set(target, value)?;
        // Stored form, so rotations replay already wrapped.
        let new = self.skeleton.get(target)?;
        self.changes.record(ChangeKind::PropertyChanged {
            target: *target,
            old,
            new,
        });
        Ok(old)
    }

    pub fn rename_bone(&mut self, bone: BoneId, label: impl Into<String>) -> Result<(), EditError> {
        let new = label.into();
        let old = self.skeleton.set_bone_label(bone, new.clone())?;
        self.changes.record(ChangeKind::BoneRenamed { bone, old, new });
        Ok(())
    }

    pub fn rename_joint(
        &mut self,
        joint: JointId,
        label: impl Into<String>,
    ) -> Result<(), EditError> {
        let new = label.into();
        let old = self.skeleton.set_joint_label(joint, new.clone())?;
        self.changes
            .record(ChangeKind::JointRenamed { joint, old, new });
        Ok(())
    }

    pub fn set_translation(&mut self, translation: Coordinate) -> Result<Coordinate, EditError> {
        let old = self.skeleton.set_translation(translation)?;
        self.changes.record(ChangeKind::Translated {
            old,
            new: translation,
        });
        Ok(old)
    }

    // ----- commands -----

    /// Validate and apply a mutation. Rejections are logged and leave the
    /// change log untouched.
    pub fn apply_mutation(&mut self, mutation: &SkeletonMutation) -> Result<Value, EditError> {
        if let Err(reason) = mutation.validate(&self.skeleton) {
            log::warn!("rejected mutation of {}: {reason}", mutation.target);
            return Err(EditError::Rejected(reason));
        }
        self.set_property(&mutation.target, mutation.payload)
    }

    pub fn apply_update(&mut self, update: &PropertyUpdate) -> Result<Value, EditError> {
        self.set_property(&update.target(), update.value())
    }

    /// Apply every update or none of them.
    pub fn apply_updates(&mut self, updates: &[PropertyUpdate]) -> Result<(), EditError> {
        for update in updates {
            self.skeleton
                .validate(&update.target(), &update.value())
                .map_err(|err| EditError::Rejected(rejection(update.target(), err)))?;
        }
        for update in updates {
            self.apply_update(update)?;
        }
        Ok(())
    }

    /// Undo `changes` (oldest first, as drained) by applying their inverses
    /// newest first. The inverses are recorded in a fresh batch, which is
    /// returned. On failure nothing changes.
    pub fn undo(&mut self, changes: &[Change]) -> Result<BatchId, EditError> {
        let mut staged = self.skeleton.clone();
        let inverses: Vec<ChangeKind> = changes.iter().rev().map(|c| c.kind.inverse()).collect();
        for kind in &inverses {
            kind.apply_to(&mut staged)?;
        }
        self.skeleton = staged;
        let batch = self.changes.begin_batch();
        for kind in inverses {
            self.changes.record(kind);
        }
        log::debug!("undid {} change(s) in batch {}", changes.len(), batch.0);
        Ok(batch)
    }
}

/// Apply recorded `changes` in order onto `skeleton`. All or nothing.
pub fn replay(skeleton: &mut Skeleton, changes: &[Change]) -> Result<(), EditError> {
    let mut staged = skeleton.clone();
    for change in changes {
        change.apply_to(&mut staged)?;
    }
    *skeleton = staged;
    Ok(())
}

impl From<EditingSkeleton> for Skeleton {
    fn from(editing: EditingSkeleton) -> Self {
        editing.into_skeleton()
    }
}

