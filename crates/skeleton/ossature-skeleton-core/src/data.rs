//! Flat, serializable form of a [`Skeleton`].
//!
//! Deserializing goes through [`TryFrom<SkeletonData>`], which rebuilds the
//! children indexes and rejects anything that would break the tree
//! invariants, so a loaded skeleton is as trustworthy as a built one.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use ossature_api_core::Coordinate;

use crate::bone::{Bone, BoneDefinition};
use crate::error::SkeletonError;
use crate::ids::{BoneId, JointId};
use crate::joint::{Joint, JointDefinition};
use crate::skeleton::Skeleton;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneRecord {
    pub id: BoneId,
    #[serde(flatten)]
    pub definition: BoneDefinition,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointRecord {
    pub id: JointId,
    #[serde(flatten)]
    pub definition: JointDefinition,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SkeletonData {
    #[serde(default)]
    pub translation: Coordinate,
    #[serde(default)]
    pub bones: Vec<BoneRecord>,
    #[serde(default)]
    pub joints: Vec<JointRecord>,
    /// Id allocator state. Raised to cover every listed id when loading.
    #[serde(default)]
    pub next_bone: u32,
    #[serde(default)]
    pub next_joint: u32,
}

impl From<Skeleton> for SkeletonData {
    fn from(skeleton: Skeleton) -> Self {
        SkeletonData {
            translation: skeleton.translation,
            bones: skeleton
                .bones()
                .map(|bone| BoneRecord {
                    id: bone.id(),
                    definition: bone.definition(),
                })
                .collect(),
            joints: skeleton
                .joints()
                .map(|joint| JointRecord {
                    id: joint.id(),
                    definition: joint.definition(),
                })
                .collect(),
            next_bone: skeleton.next_bone_id().0,
            next_joint: skeleton.next_joint_id().0,
        }
    }
}

impl TryFrom<SkeletonData> for Skeleton {
    type Error = SkeletonError;

    fn try_from(data: SkeletonData) -> Result<Self, Self::Error> {
        if !data.translation.is_finite() {
            return Err(SkeletonError::Malformed(format!(
                "non-finite translation {:?}",
                data.translation
            )));
        }
        let mut skeleton = Skeleton {
            translation: data.translation,
            ..Skeleton::default()
        };

        // Place every bone first; parents may be listed after their children.
        for record in data.bones {
            let id = record.id;
            let next = id.0.checked_add(1).ok_or_else(|| {
                SkeletonError::Malformed(format!("{id} leaves no room for further ids"))
            })?;
            if skeleton.bones.contains_key(&id) {
                return Err(SkeletonError::Malformed(format!("duplicate bone id {id}")));
            }
            if !(record.definition.length.is_finite() && record.definition.length >= 0.0) {
                return Err(SkeletonError::InvalidLength(record.definition.length));
            }
            if !record.definition.offset.is_finite() {
                return Err(SkeletonError::Malformed(format!(
                    "non-finite offset for {id}"
                )));
            }
            if !record.definition.rotation.to_radians().is_finite() {
                return Err(SkeletonError::Malformed(format!(
                    "non-finite rotation for {id}"
                )));
            }
            skeleton
                .bones
                .insert(id, Bone::from_definition(id, record.definition));
            skeleton.next_bone = skeleton.next_bone.max(next);
        }
        skeleton.next_bone = skeleton.next_bone.max(data.next_bone);

        let ids: Vec<BoneId> = skeleton.bones().map(Bone::id).collect();
        for &id in &ids {
            match skeleton.bone(id)?.parent() {
                None => {
                    if let Some(existing) = skeleton.root {
                        return Err(SkeletonError::RootAlreadyDefined { existing });
                    }
                    skeleton.root = Some(id);
                }
                Some(parent) => {
                    skeleton.bone(parent).map_err(|_| {
                        SkeletonError::Malformed(format!("{id} names missing parent {parent}"))
                    })?;
                    if let Some(parent) = skeleton.bones.get_mut(&parent) {
                        parent.adopt(id);
                    }
                }
            }
        }
        if skeleton.root.is_none() && !ids.is_empty() {
            return Err(SkeletonError::Malformed("no root bone".into()));
        }

        // Every bone must reach the root; anything else sits on a cycle.
        let mut reached: HashSet<BoneId> = HashSet::with_capacity(ids.len());
        let mut stack: Vec<BoneId> = skeleton.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            if reached.insert(id) {
                stack.extend(skeleton.bone(id)?.children().iter().copied());
            }
        }
        if let Some(orphan) = ids.iter().find(|id| !reached.contains(*id)) {
            return Err(SkeletonError::Malformed(format!(
                "{orphan} is not connected to the root"
            )));
        }

        for record in data.joints {
            let id = record.id;
            let next = id.0.checked_add(1).ok_or_else(|| {
                SkeletonError::Malformed(format!("{id} leaves no room for further ids"))
            })?;
            if skeleton.bone(record.definition.bone).is_err() {
                return Err(SkeletonError::Malformed(format!(
                    "{id} rides on missing {}",
                    record.definition.bone
                )));
            }
            if !record.definition.offset.is_finite() {
                return Err(SkeletonError::Malformed(format!(
                    "non-finite offset for {id}"
                )));
            }
            if skeleton.joints.contains_key(&id) {
                return Err(SkeletonError::Malformed(format!("duplicate joint id {id}")));
            }
            skeleton
                .joints
                .insert(id, Joint::from_definition(id, record.definition));
            skeleton.next_joint = skeleton.next_joint.max(next);
        }
        skeleton.next_joint = skeleton.next_joint.max(data.next_joint);

        log::debug!(
            "loaded skeleton with {} bones and {} joints",
            skeleton.bone_count(),
            skeleton.joint_count()
        );
        Ok(skeleton)
    }
}
