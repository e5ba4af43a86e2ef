//! ossature-skeleton-core: the rig topology.
//!
//! A [`Skeleton`] owns every [`Bone`] and [`Joint`] in sparse maps keyed by
//! [`BoneId`]/[`JointId`]. Parent links are ids, children lists are id
//! indexes; nothing in the tree owns anything else. World transforms are
//! composed root-down on demand.

pub mod bone;
pub mod data;
pub mod error;
pub mod ids;
pub mod joint;
pub mod skeleton;
pub mod target;

pub use bone::{Bone, BoneAxis, BoneDefinition, BoneEnd, BoneKind, LabeledBoneKind};
pub use data::SkeletonData;
pub use error::SkeletonError;
pub use ids::{BoneId, JointId};
pub use joint::{Joint, JointDefinition};
pub use skeleton::{BonePose, Pose, RemovedBone, Skeleton, Transform};
pub use target::{BoneProperty, JointProperty, Target};

pub use ossature_api_core::{Angle, Coordinate, Rotation, Value, ValueKind, Vector};
