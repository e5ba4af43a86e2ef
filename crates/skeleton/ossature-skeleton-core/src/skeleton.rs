//! The skeleton arena: structural edits, property access and transform
//! resolution.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use ossature_api_core::{Coordinate, Rotation, Value, Vector};

use crate::bone::{Bone, BoneDefinition, BoneEnd};
use crate::data::SkeletonData;
use crate::error::SkeletonError;
use crate::ids::{BoneId, JointId};
use crate::joint::{Joint, JointDefinition};
use crate::target::{BoneProperty, JointProperty, Target};

/// A rigid placement in rig space: rotate about Z, then translate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Coordinate,
    pub rotation: Rotation,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Coordinate::ORIGIN,
        rotation: Rotation::ZERO,
    };

    pub fn new(translation: Coordinate, rotation: Rotation) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Map a displacement expressed in this frame to a world location.
    #[inline]
    pub fn apply(&self, local: Vector) -> Coordinate {
        self.translation + local.rotated(self.rotation)
    }

    /// Compose `local`, expressed in this frame, onto this transform.
    #[must_use]
    pub fn then(&self, local: Transform) -> Transform {
        Transform {
            translation: self.apply(Vector::from(local.translation)),
            rotation: self.rotation + local.rotation,
        }
    }
}

/// World placement of one bone.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BonePose {
    pub bone: BoneId,
    pub start: Coordinate,
    pub end: Coordinate,
    pub rotation: Rotation,
}

/// Every bone's world placement, parents before children.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pose {
    bones: Vec<BonePose>,
    index: HashMap<BoneId, usize>,
}

impl Pose {
    pub fn get(&self, bone: BoneId) -> Option<&BonePose> {
        self.index.get(&bone).map(|&at| &self.bones[at])
    }

    pub fn iter(&self) -> impl Iterator<Item = &BonePose> + '_ {
        self.bones.iter()
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    fn push(&mut self, pose: BonePose) {
        self.index.insert(pose.bone, self.bones.len());
        self.bones.push(pose);
    }
}

/// What `remove_bone` took out of the skeleton.
#[derive(Clone, Debug, PartialEq)]
pub struct RemovedBone {
    pub bone: Bone,
    /// Joints that rode on the bone, in id order.
    pub joints: Vec<Joint>,
}

/// A rig: one rooted tree of bones plus the joints attached to them.
///
/// Bones and joints live in sparse maps keyed by id, so storage follows the
/// number of live entities rather than the largest id. A removed id is never
/// handed out again: the allocators only move forward.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "SkeletonData", try_from = "SkeletonData")]
pub struct Skeleton {
    pub(crate) bones: HashMap<BoneId, Bone>,
    pub(crate) joints: HashMap<JointId, Joint>,
    pub(crate) root: Option<BoneId>,
    pub(crate) translation: Coordinate,
    pub(crate) next_bone: u32,
    pub(crate) next_joint: u32,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    // ----- queries -----

    pub fn bone(&self, id: BoneId) -> Result<&Bone, SkeletonError> {
        self.bones.get(&id).ok_or(SkeletonError::UnknownBone(id))
    }

    pub fn joint(&self, id: JointId) -> Result<&Joint, SkeletonError> {
        self.joints.get(&id).ok_or(SkeletonError::UnknownJoint(id))
    }

    pub fn root(&self) -> Option<BoneId> {
        self.root
    }

    /// Live bones in id order.
    pub fn bones(&self) -> impl Iterator<Item = &Bone> + '_ {
        let mut bones: Vec<&Bone> = self.bones.values().collect();
        bones.sort_unstable_by_key(|bone| bone.id);
        bones.into_iter()
    }

    /// Live joints in id order.
    pub fn joints(&self) -> impl Iterator<Item = &Joint> + '_ {
        let mut joints: Vec<&Joint> = self.joints.values().collect();
        joints.sort_unstable_by_key(|joint| joint.id);
        joints.into_iter()
    }

    pub fn children(&self, id: BoneId) -> Result<&[BoneId], SkeletonError> {
        Ok(self.bone(id)?.children())
    }

    /// Joints riding on `bone`, in id order.
    pub fn joints_on(&self, bone: BoneId) -> impl Iterator<Item = &Joint> + '_ {
        self.joints().filter(move |joint| joint.bone == bone)
    }

    /// First bone (lowest id) carrying `label`.
    pub fn find_bone(&self, label: &str) -> Option<&Bone> {
        self.bones().find(|bone| bone.label == label)
    }

    pub fn find_joint(&self, label: &str) -> Option<&Joint> {
        self.joints().find(|joint| joint.label == label)
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn translation(&self) -> Coordinate {
        self.translation
    }

    /// The id the next `add_bone` will return.
    pub fn next_bone_id(&self) -> BoneId {
        BoneId(self.next_bone)
    }

    pub fn next_joint_id(&self) -> JointId {
        JointId(self.next_joint)
    }

    // ----- structure -----

    pub fn add_bone(&mut self, definition: BoneDefinition) -> Result<BoneId, SkeletonError> {
        let id = self.next_bone_id();
        self.insert_bone(id, definition)?;
        log::debug!("added {id}");
        Ok(id)
    }

    /// Put a bone back under the id it was removed from.
    pub fn restore_bone(
        &mut self,
        id: BoneId,
        definition: BoneDefinition,
    ) -> Result<(), SkeletonError> {
        if self.bones.contains_key(&id) {
            return Err(SkeletonError::BoneSlotOccupied(id));
        }
        self.insert_bone(id, definition)?;
        log::debug!("restored {id}");
        Ok(())
    }

    fn insert_bone(&mut self, id: BoneId, definition: BoneDefinition) -> Result<(), SkeletonError> {
        let next = id.0.checked_add(1).ok_or(SkeletonError::IdsExhausted)?;
        check_length(definition.length)?;
        if !definition.offset.is_finite() {
            return Err(SkeletonError::Malformed(format!(
                "non-finite offset for {id}"
            )));
        }
        check_rotation(id, definition.rotation)?;
        match definition.parent {
            None => {
                if let Some(existing) = self.root {
                    return Err(SkeletonError::RootAlreadyDefined { existing });
                }
            }
            Some(parent) => {
                self.bone(parent)?;
            }
        }

        let bone = Bone::from_definition(id, definition);
        match bone.parent {
            None => self.root = Some(id),
            Some(parent) => {
                if let Some(parent) = self.bones.get_mut(&parent) {
                    parent.adopt(id);
                }
            }
        }
        self.bones.insert(id, bone);
        self.next_bone = self.next_bone.max(next);
        Ok(())
    }

    /// Remove a leaf bone together with the joints riding on it.
    pub fn remove_bone(&mut self, id: BoneId) -> Result<RemovedBone, SkeletonError> {
        let bone = self.bone(id)?;
        if !bone.children.is_empty() {
            return Err(SkeletonError::HasChildren {
                bone: id,
                children: bone.children.len(),
            });
        }

        let joints: Vec<JointId> = self.joints_on(id).map(|joint| joint.id).collect();
        let joints = joints
            .into_iter()
            .filter_map(|joint| self.joints.remove(&joint))
            .collect();

        let Some(bone) = self.bones.remove(&id) else {
            return Err(SkeletonError::UnknownBone(id));
        };
        match bone.parent {
            None => self.root = None,
            Some(parent) => {
                if let Some(parent) = self.bones.get_mut(&parent) {
                    parent.disown(id);
                }
            }
        }
        log::debug!("removed {id}");
        Ok(RemovedBone { bone, joints })
    }

    pub fn add_joint(&mut self, definition: JointDefinition) -> Result<JointId, SkeletonError> {
        let id = self.next_joint_id();
        self.insert_joint(id, definition)?;
        log::debug!("added {id}");
        Ok(id)
    }

    pub fn restore_joint(
        &mut self,
        id: JointId,
        definition: JointDefinition,
    ) -> Result<(), SkeletonError> {
        if self.joints.contains_key(&id) {
            return Err(SkeletonError::JointSlotOccupied(id));
        }
        self.insert_joint(id, definition)?;
        log::debug!("restored {id}");
        Ok(())
    }

    fn insert_joint(
        &mut self,
        id: JointId,
        definition: JointDefinition,
    ) -> Result<(), SkeletonError> {
        let next = id.0.checked_add(1).ok_or(SkeletonError::IdsExhausted)?;
        self.bone(definition.bone)?;
        if !definition.offset.is_finite() {
            return Err(SkeletonError::Malformed(format!(
                "non-finite offset for {id}"
            )));
        }
        self.joints.insert(id, Joint::from_definition(id, definition));
        self.next_joint = self.next_joint.max(next);
        Ok(())
    }

    pub fn remove_joint(&mut self, id: JointId) -> Result<Joint, SkeletonError> {
        let joint = self.joints.remove(&id).ok_or(SkeletonError::UnknownJoint(id))?;
        log::debug!("removed {id}");
        Ok(joint)
    }

    /// Hang `bone` from `end` of `parent`. Returns the previous attachment.
    pub fn set_parent(
        &mut self,
        bone: BoneId,
        parent: BoneId,
        end: BoneEnd,
    ) -> Result<(BoneId, BoneEnd), SkeletonError> {
        let current = self.bone(bone)?;
        let Some(old_parent) = current.parent else {
            return Err(SkeletonError::RootReparent(bone));
        };
        let old_end = current.attached_to;
        self.bone(parent)?;
        if self.ancestry(parent).any(|ancestor| ancestor == bone) {
            return Err(SkeletonError::CyclicParent { bone, parent });
        }

        if let Some(old) = self.bones.get_mut(&old_parent) {
            old.disown(bone);
        }
        if let Some(new) = self.bones.get_mut(&parent) {
            new.adopt(bone);
        }
        if let Some(moved) = self.bones.get_mut(&bone) {
            moved.parent = Some(parent);
            moved.attached_to = end;
        }
        log::debug!("reparented {bone} under {parent} ({end:?})");
        Ok((old_parent, old_end))
    }

    /// `id` followed by each of its ancestors up to the root.
    fn ancestry(&self, id: BoneId) -> impl Iterator<Item = BoneId> + '_ {
        std::iter::successors(Some(id), move |current| {
            self.bone(*current).ok().and_then(Bone::parent)
        })
    }

    // ----- properties -----

    pub fn set_bone_length(&mut self, id: BoneId, length: f32) -> Result<f32, SkeletonError> {
        check_length(length)?;
        let bone = self.bone_mut(id)?;
        Ok(std::mem::replace(&mut bone.length, length))
    }

    pub fn set_bone_rotation(
        &mut self,
        id: BoneId,
        rotation: Rotation,
    ) -> Result<Rotation, SkeletonError> {
        check_rotation(id, rotation)?;
        let bone = self.bone_mut(id)?;
        Ok(std::mem::replace(&mut bone.rotation, rotation))
    }

    pub fn set_bone_offset(&mut self, id: BoneId, offset: Vector) -> Result<Vector, SkeletonError> {
        if !offset.is_finite() {
            return Err(SkeletonError::InvalidValue {
                target: Target::bone(id, BoneProperty::Offset),
                reason: "offset must be finite".into(),
            });
        }
        let bone = self.bone_mut(id)?;
        Ok(std::mem::replace(&mut bone.offset, offset))
    }

    pub fn set_bone_label(
        &mut self,
        id: BoneId,
        label: impl Into<String>,
    ) -> Result<String, SkeletonError> {
        let bone = self.bone_mut(id)?;
        Ok(std::mem::replace(&mut bone.label, label.into()))
    }

    pub fn set_joint_offset(
        &mut self,
        id: JointId,
        offset: Vector,
    ) -> Result<Vector, SkeletonError> {
        if !offset.is_finite() {
            return Err(SkeletonError::InvalidValue {
                target: Target::joint(id, JointProperty::Offset),
                reason: "offset must be finite".into(),
            });
        }
        let joint = self.joint_mut(id)?;
        Ok(std::mem::replace(&mut joint.offset, offset))
    }

    pub fn set_joint_visible(&mut self, id: JointId, visible: bool) -> Result<bool, SkeletonError> {
        let joint = self.joint_mut(id)?;
        Ok(std::mem::replace(&mut joint.visible, visible))
    }

    pub fn set_joint_label(
        &mut self,
        id: JointId,
        label: impl Into<String>,
    ) -> Result<String, SkeletonError> {
        let joint = self.joint_mut(id)?;
        Ok(std::mem::replace(&mut joint.label, label.into()))
    }

    /// Move the whole rig. Returns the previous translation.
    pub fn set_translation(
        &mut self,
        translation: Coordinate,
    ) -> Result<Coordinate, SkeletonError> {
        if !translation.is_finite() {
            return Err(SkeletonError::InvalidTranslation(translation));
        }
        Ok(std::mem::replace(&mut self.translation, translation))
    }

    fn bone_mut(&mut self, id: BoneId) -> Result<&mut Bone, SkeletonError> {
        self.bones.get_mut(&id).ok_or(SkeletonError::UnknownBone(id))
    }

    fn joint_mut(&mut self, id: JointId) -> Result<&mut Joint, SkeletonError> {
        self.joints.get_mut(&id).ok_or(SkeletonError::UnknownJoint(id))
    }

    /// Read the current value of an animatable property.
    pub fn get(&self, target: &Target) -> Result<Value, SkeletonError> {
        Ok(match *target {
            Target::Bone { bone, property } => {
                let bone = self.bone(bone)?;
                match property {
                    BoneProperty::Length => Value::Scalar(bone.length),
                    BoneProperty::Rotation => Value::from(bone.rotation),
                    BoneProperty::Offset => Value::Vector(bone.offset),
                }
            }
            Target::Joint { joint, property } => {
                let joint = self.joint(joint)?;
                match property {
                    JointProperty::Offset => Value::Vector(joint.offset),
                    JointProperty::Visible => Value::Bool(joint.visible),
                }
            }
        })
    }

    /// Check that `value` could be written to `target` without writing it.
    pub fn validate(&self, target: &Target, value: &Value) -> Result<(), SkeletonError> {
        match *target {
            Target::Bone { bone, .. } => {
                self.bone(bone)?;
            }
            Target::Joint { joint, .. } => {
                self.joint(joint)?;
            }
        }
        let expected = target.kind();
        if value.kind() != expected {
            return Err(SkeletonError::KindMismatch {
                target: *target,
                expected,
                actual: value.kind(),
            });
        }
        if !value.is_finite() {
            return Err(SkeletonError::InvalidValue {
                target: *target,
                reason: "value must be finite".into(),
            });
        }
        if let (Target::Bone { property: BoneProperty::Length, .. }, Value::Scalar(length)) =
            (target, value)
        {
            if *length < 0.0 {
                return Err(SkeletonError::InvalidValue {
                    target: *target,
                    reason: format!("length {length} is negative"),
                });
            }
        }
        Ok(())
    }

    /// Write an animatable property, returning the value it replaced.
    ///
    /// Rotations are wrapped into one turn, so reading back may differ from
    /// what was written by whole turns.
    pub fn set(&mut self, target: &Target, value: Value) -> Result<Value, SkeletonError> {
        self.validate(target, &value)?;
        let old = match (*target, value) {
            (Target::Bone { bone, property }, value) => match (property, value) {
                (BoneProperty::Length, Value::Scalar(length)) => {
                    Value::Scalar(self.set_bone_length(bone, length)?)
                }
                (BoneProperty::Rotation, Value::Scalar(radians)) => {
                    Value::from(self.set_bone_rotation(bone, Rotation::radians(radians))?)
                }
                (BoneProperty::Offset, Value::Vector(offset)) => {
                    Value::Vector(self.set_bone_offset(bone, offset)?)
                }
                (_, value) => return Err(mismatch(target, &value)),
            },
            (Target::Joint { joint, property }, value) => match (property, value) {
                (JointProperty::Offset, Value::Vector(offset)) => {
                    Value::Vector(self.set_joint_offset(joint, offset)?)
                }
                (JointProperty::Visible, Value::Bool(visible)) => {
                    Value::Bool(self.set_joint_visible(joint, visible)?)
                }
                (_, value) => return Err(mismatch(target, &value)),
            },
        };
        log::trace!("set {target} = {value:?}");
        Ok(old)
    }

    // ----- transforms -----

    /// World transform at the start of `id`.
    pub fn bone_transform(&self, id: BoneId) -> Result<Transform, SkeletonError> {
        self.bone(id)?;
        let mut chain: Vec<&Bone> = self
            .ancestry(id)
            .map(|link| self.bone(link))
            .collect::<Result<_, _>>()?;
        chain.reverse();

        let mut world = Transform::new(self.translation, Rotation::ZERO);
        let mut parent: Option<&Bone> = None;
        for link in chain {
            let anchor = parent.map_or(Vector::ZERO, |parent| parent.extent(link.attached_to));
            world = world.then(Transform::new(
                Coordinate::from(anchor + link.offset),
                link.rotation,
            ));
            parent = Some(link);
        }
        Ok(world)
    }

    /// World location of one end of a bone.
    pub fn bone_position(&self, id: BoneId, end: BoneEnd) -> Result<Coordinate, SkeletonError> {
        let world = self.bone_transform(id)?;
        Ok(world.apply(self.bone(id)?.extent(end)))
    }

    pub fn joint_position(&self, id: JointId) -> Result<Coordinate, SkeletonError> {
        let joint = self.joint(id)?;
        let bone = self.bone(joint.bone)?;
        let world = self.bone_transform(joint.bone)?;
        Ok(world.apply(bone.extent(joint.end) + joint.offset))
    }

    /// Resolve every bone's world placement in one root-down pass.
    pub fn resolve(&self) -> Pose {
        let mut pose = Pose::default();
        let Some(root) = self.root else {
            return pose;
        };
        let mut worlds: HashMap<BoneId, Transform> =
            HashMap::with_capacity(self.bones.len());
        let mut queue = std::collections::VecDeque::from([root]);
        while let Some(id) = queue.pop_front() {
            let Ok(bone) = self.bone(id) else {
                continue;
            };
            let parent_world = bone
                .parent
                .and_then(|parent| worlds.get(&parent).copied().zip(self.bone(parent).ok()));
            let world = match parent_world {
                None => Transform::new(self.translation, Rotation::ZERO)
                    .then(Transform::new(Coordinate::from(bone.offset), bone.rotation)),
                Some((parent_world, parent)) => parent_world.then(Transform::new(
                    Coordinate::from(parent.extent(bone.attached_to) + bone.offset),
                    bone.rotation,
                )),
            };
            worlds.insert(id, world);
            pose.push(BonePose {
                bone: id,
                start: world.translation,
                end: world.apply(bone.extent(BoneEnd::End)),
                rotation: world.rotation,
            });
            queue.extend(bone.children.iter().copied());
        }
        pose
    }
}

fn check_length(length: f32) -> Result<(), SkeletonError> {
    if length.is_finite() && length >= 0.0 {
        Ok(())
    } else {
        Err(SkeletonError::InvalidLength(length))
    }
}

fn check_rotation(id: BoneId, rotation: Rotation) -> Result<(), SkeletonError> {
    if rotation.to_radians().is_finite() {
        Ok(())
    } else {
        Err(SkeletonError::InvalidValue {
            target: Target::bone(id, BoneProperty::Rotation),
            reason: "rotation must be finite".into(),
        })
    }
}

fn mismatch(target: &Target, value: &Value) -> SkeletonError {
    SkeletonError::KindMismatch {
        target: *target,
        expected: target.kind(),
        actual: value.kind(),
    }
}
