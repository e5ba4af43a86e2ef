//! Error types for skeleton mutations and queries.

use ossature_api_core::{Coordinate, ValueKind};

use crate::ids::{BoneId, JointId};
use crate::target::Target;

/// Every failure a skeleton operation can report. A failed operation leaves
/// the skeleton exactly as it was.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SkeletonError {
    /// No bone with this id (never created or already removed)
    #[error("Unknown bone: {0}")]
    UnknownBone(BoneId),

    /// No joint with this id
    #[error("Unknown joint: {0}")]
    UnknownJoint(JointId),

    /// A second parentless bone was offered
    #[error("Skeleton already has a root: {existing}")]
    RootAlreadyDefined { existing: BoneId },

    /// The root cannot be given a parent
    #[error("Root bone {0} cannot be reparented")]
    RootReparent(BoneId),

    /// The new parent is the bone itself or one of its descendants
    #[error("Reparenting {bone} under {parent} would create a cycle")]
    CyclicParent { bone: BoneId, parent: BoneId },

    /// Bones with children are not removed implicitly
    #[error("Bone {bone} still has {children} child bone(s)")]
    HasChildren { bone: BoneId, children: usize },

    /// Lengths must be finite and non-negative
    #[error("Invalid bone length: {0}")]
    InvalidLength(f32),

    /// Value kind does not match the addressed property
    #[error("Kind mismatch for {target}: expected {expected:?}, got {actual:?}")]
    KindMismatch {
        target: Target,
        expected: ValueKind,
        actual: ValueKind,
    },

    /// Value has the right kind but cannot be stored
    #[error("Invalid value for {target}: {reason}")]
    InvalidValue { target: Target, reason: String },

    /// Restoring into an id that is live
    #[error("Bone id {0} is already in use")]
    BoneSlotOccupied(BoneId),

    #[error("Joint id {0} is already in use")]
    JointSlotOccupied(JointId),

    /// The rig translation must be finite
    #[error("Invalid translation: {0:?}")]
    InvalidTranslation(Coordinate),

    /// The id space is used up; the largest id can never be allocated
    #[error("No ids left to allocate")]
    IdsExhausted,

    /// Serialized data violates a structural invariant
    #[error("Malformed skeleton data: {0}")]
    Malformed(String),
}
