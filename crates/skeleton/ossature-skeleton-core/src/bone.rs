//! Bones and their fixed classification.

use serde::{Deserialize, Serialize};

use ossature_api_core::{Rotation, Vector};

use crate::ids::BoneId;

/// The role a bone plays in the rig. Fixed when the bone is created.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoneKind {
    Root,
    Spine,
    Neck,
    Head,
    Arm,
    Hand,
    Leg,
    Foot,
    Tail,
    Generic,
}

impl BoneKind {
    /// The local axis the bone's length runs along.
    pub const fn axis(self) -> BoneAxis {
        match self {
            BoneKind::Root | BoneKind::Spine | BoneKind::Neck | BoneKind::Head => {
                BoneAxis::PositiveY
            }
            BoneKind::Arm | BoneKind::Hand => BoneAxis::PositiveX,
            BoneKind::Leg | BoneKind::Foot => BoneAxis::NegativeY,
            BoneKind::Tail => BoneAxis::NegativeX,
            BoneKind::Generic => BoneAxis::PositiveY,
        }
    }

    pub const fn default_label(self) -> &'static str {
        match self {
            BoneKind::Root => "root",
            BoneKind::Spine => "spine",
            BoneKind::Neck => "neck",
            BoneKind::Head => "head",
            BoneKind::Arm => "arm",
            BoneKind::Hand => "hand",
            BoneKind::Leg => "leg",
            BoneKind::Foot => "foot",
            BoneKind::Tail => "tail",
            BoneKind::Generic => "bone",
        }
    }

    #[must_use]
    pub fn with_label(self, label: impl Into<String>) -> LabeledBoneKind {
        LabeledBoneKind {
            kind: self,
            label: label.into(),
        }
    }
}

/// A [`BoneKind`] paired with a user-facing name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledBoneKind {
    pub kind: BoneKind,
    pub label: String,
}

impl From<BoneKind> for LabeledBoneKind {
    fn from(kind: BoneKind) -> Self {
        kind.with_label(kind.default_label())
    }
}

/// The local direction a bone extends in, before any rotation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoneAxis {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
}

impl BoneAxis {
    pub const fn unit(self) -> Vector {
        match self {
            BoneAxis::PositiveX => Vector::new(1.0, 0.0, 0.0),
            BoneAxis::NegativeX => Vector::new(-1.0, 0.0, 0.0),
            BoneAxis::PositiveY => Vector::new(0.0, 1.0, 0.0),
            BoneAxis::NegativeY => Vector::new(0.0, -1.0, 0.0),
        }
    }
}

/// One of the two ends of a bone.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoneEnd {
    Start,
    #[default]
    End,
}

impl BoneEnd {
    /// Returns the opposite end.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            BoneEnd::Start => BoneEnd::End,
            BoneEnd::End => BoneEnd::Start,
        }
    }
}

/// Everything needed to create a bone. Also the payload of structural change
/// records, so that a removal can be undone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneDefinition {
    pub kind: LabeledBoneKind,
    pub length: f32,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default)]
    pub offset: Vector,
    #[serde(default)]
    pub parent: Option<BoneId>,
    #[serde(default)]
    pub attached_to: BoneEnd,
}

impl BoneDefinition {
    /// A parentless bone. A skeleton accepts exactly one.
    pub fn root(kind: impl Into<LabeledBoneKind>, length: f32) -> Self {
        Self {
            kind: kind.into(),
            length,
            rotation: Rotation::ZERO,
            offset: Vector::ZERO,
            parent: None,
            attached_to: BoneEnd::End,
        }
    }

    /// A bone hanging from `end` of `parent`.
    pub fn child(
        kind: impl Into<LabeledBoneKind>,
        length: f32,
        parent: BoneId,
        end: BoneEnd,
    ) -> Self {
        Self {
            parent: Some(parent),
            attached_to: end,
            ..Self::root(kind, length)
        }
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: impl Into<Rotation>) -> Self {
        self.rotation = rotation.into();
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: Vector) -> Self {
        self.offset = offset;
        self
    }
}

/// A bone in a [`Skeleton`](crate::Skeleton).
///
/// Only the skeleton creates bones; fields are read through accessors and
/// written through skeleton methods so the tree invariants hold.
#[derive(Clone, Debug, PartialEq)]
pub struct Bone {
    pub(crate) id: BoneId,
    pub(crate) kind: BoneKind,
    pub(crate) label: String,
    pub(crate) length: f32,
    pub(crate) rotation: Rotation,
    pub(crate) offset: Vector,
    pub(crate) parent: Option<BoneId>,
    pub(crate) attached_to: BoneEnd,
    /// Sorted by id.
    pub(crate) children: Vec<BoneId>,
}

impl Bone {
    pub(crate) fn from_definition(id: BoneId, definition: BoneDefinition) -> Self {
        Self {
            id,
            kind: definition.kind.kind,
            label: definition.kind.label,
            length: definition.length,
            rotation: definition.rotation,
            offset: definition.offset,
            parent: definition.parent,
            attached_to: definition.attached_to,
            children: Vec::new(),
        }
    }

    /// The definition that recreates this bone (children excluded).
    pub fn definition(&self) -> BoneDefinition {
        BoneDefinition {
            kind: self.kind.with_label(self.label.clone()),
            length: self.length,
            rotation: self.rotation,
            offset: self.offset,
            parent: self.parent,
            attached_to: self.attached_to,
        }
    }

    pub fn id(&self) -> BoneId {
        self.id
    }

    pub fn kind(&self) -> BoneKind {
        self.kind
    }

    pub fn axis(&self) -> BoneAxis {
        self.kind.axis()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    /// Rotation relative to the parent's world rotation.
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Translation from the parent anchor, in the parent's frame.
    pub fn offset(&self) -> Vector {
        self.offset
    }

    pub fn parent(&self) -> Option<BoneId> {
        self.parent
    }

    pub fn attached_to(&self) -> BoneEnd {
        self.attached_to
    }

    pub fn children(&self) -> &[BoneId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Displacement from the bone's start to `end` in its own unrotated frame.
    pub fn extent(&self, end: BoneEnd) -> Vector {
        match end {
            BoneEnd::Start => Vector::ZERO,
            BoneEnd::End => self.axis().unit() * self.length,
        }
    }

    pub(crate) fn adopt(&mut self, child: BoneId) {
        if let Err(at) = self.children.binary_search(&child) {
            self.children.insert(at, child);
        }
    }

    pub(crate) fn disown(&mut self, child: BoneId) {
        if let Ok(at) = self.children.binary_search(&child) {
            self.children.remove(at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_is_fixed_by_kind() {
        assert_eq!(BoneKind::Root.axis(), BoneAxis::PositiveY);
        assert_eq!(BoneKind::Leg.axis(), BoneAxis::NegativeY);
        assert_eq!(BoneKind::Arm.axis().unit(), Vector::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn labeled_kind_defaults_its_label() {
        let labeled = LabeledBoneKind::from(BoneKind::Tail);
        assert_eq!(labeled.label, "tail");
        assert_eq!(BoneKind::Arm.with_label("left arm").label, "left arm");
    }

    #[test]
    fn children_stay_sorted_and_unique() {
        let mut bone = Bone::from_definition(BoneId(0), BoneDefinition::root(BoneKind::Root, 1.0));
        bone.adopt(BoneId(4));
        bone.adopt(BoneId(2));
        bone.adopt(BoneId(4));
        assert_eq!(bone.children(), &[BoneId(2), BoneId(4)]);
        bone.disown(BoneId(2));
        assert_eq!(bone.children(), &[BoneId(4)]);
        assert_eq!(bone.definition(), BoneDefinition::root(BoneKind::Root, 1.0));
    }
}
