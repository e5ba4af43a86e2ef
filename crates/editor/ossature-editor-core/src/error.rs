//! Error types for editing and persistence

use std::io;
use std::path::PathBuf;

use ossature_api_core::ValueKind;
use ossature_skeleton_core::{SkeletonError, Target};

/// Why a [`SkeletonMutation`](crate::SkeletonMutation) was discarded.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MutationRejection {
    #[error("Unknown target: {0}")]
    UnknownTarget(Target),

    #[error("Kind mismatch for {target}: expected {expected:?}, got {actual:?}")]
    KindMismatch {
        target: Target,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("Invalid payload for {target}: {reason}")]
    InvalidPayload { target: Target, reason: String },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EditError {
    /// The mutation was discarded; nothing was recorded
    #[error("Mutation rejected: {0}")]
    Rejected(MutationRejection),

    #[error(transparent)]
    Skeleton(#[from] SkeletonError),

    /// A recorded change does not fit the skeleton it is replayed onto
    #[error("Replay mismatch: {0}")]
    ReplayMismatch(String),
}

#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("Failed to read document: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed document: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum SaveError {
    #[error("Failed to write document: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Invalid file path: {}", .0.display())]
    InvalidPath(PathBuf),

    /// The temporary file could not replace the destination
    #[error("Failed to replace document: {0}")]
    Persist(#[source] io::Error),
}

impl From<tempfile::PersistError> for SaveError {
    fn from(err: tempfile::PersistError) -> Self {
        Self::Persist(err.error)
    }
}
