//! Addressing animatable properties.

use std::fmt;

use serde::{Deserialize, Serialize};

use ossature_api_core::ValueKind;

use crate::ids::{BoneId, JointId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoneProperty {
    /// Scalar, never negative.
    Length,
    /// Scalar radians, wrapped into one turn on write.
    Rotation,
    /// Vector.
    Offset,
}

impl BoneProperty {
    pub const fn kind(self) -> ValueKind {
        match self {
            BoneProperty::Length | BoneProperty::Rotation => ValueKind::Scalar,
            BoneProperty::Offset => ValueKind::Vector,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            BoneProperty::Length => "length",
            BoneProperty::Rotation => "rotation",
            BoneProperty::Offset => "offset",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointProperty {
    Offset,
    Visible,
}

impl JointProperty {
    pub const fn kind(self) -> ValueKind {
        match self {
            JointProperty::Offset => ValueKind::Vector,
            JointProperty::Visible => ValueKind::Bool,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            JointProperty::Offset => "offset",
            JointProperty::Visible => "visible",
        }
    }
}

/// One property on one bone or joint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "on", rename_all = "snake_case")]
pub enum Target {
    Bone { bone: BoneId, property: BoneProperty },
    Joint { joint: JointId, property: JointProperty },
}

impl Target {
    pub const fn bone(bone: BoneId, property: BoneProperty) -> Self {
        Target::Bone { bone, property }
    }

    pub const fn joint(joint: JointId, property: JointProperty) -> Self {
        Target::Joint { joint, property }
    }

    /// The value kind the property accepts.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Target::Bone { property, .. } => property.kind(),
            Target::Joint { property, .. } => property.kind(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Bone { bone, property } => write!(f, "{bone}.{}", property.name()),
            Target::Joint { joint, property } => write!(f, "{joint}.{}", property.name()),
        }
    }
}
