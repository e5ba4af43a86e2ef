use serde::{Deserialize, Serialize};

use ossature_api_core::Vector;

use crate::bone::BoneEnd;
use crate::ids::{BoneId, JointId};

/// Everything needed to create a joint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointDefinition {
    pub label: String,
    pub bone: BoneId,
    #[serde(default)]
    pub end: BoneEnd,
    #[serde(default)]
    pub offset: Vector,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

fn visible_by_default() -> bool {
    true
}

impl JointDefinition {
    pub fn new(label: impl Into<String>, bone: BoneId, end: BoneEnd) -> Self {
        Self {
            label: label.into(),
            bone,
            end,
            offset: Vector::ZERO,
            visible: true,
        }
    }

    #[must_use]
    pub fn with_offset(mut self, offset: Vector) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// A named attachment point on one end of a bone.
#[derive(Clone, Debug, PartialEq)]
pub struct Joint {
    pub(crate) id: JointId,
    pub(crate) label: String,
    pub(crate) bone: BoneId,
    pub(crate) end: BoneEnd,
    pub(crate) offset: Vector,
    pub(crate) visible: bool,
}

impl Joint {
    pub(crate) fn from_definition(id: JointId, definition: JointDefinition) -> Self {
        Self {
            id,
            label: definition.label,
            bone: definition.bone,
            end: definition.end,
            offset: definition.offset,
            visible: definition.visible,
        }
    }

    pub fn definition(&self) -> JointDefinition {
        JointDefinition {
            label: self.label.clone(),
            bone: self.bone,
            end: self.end,
            offset: self.offset,
            visible: self.visible,
        }
    }

    pub fn id(&self) -> JointId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The bone this joint rides on.
    pub fn bone(&self) -> BoneId {
        self.bone
    }

    pub fn end(&self) -> BoneEnd {
        self.end
    }

    /// Displacement from the bone end, in the bone's frame.
    pub fn offset(&self) -> Vector {
        self.offset
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
