//! ossature-editor-core: change-tracked editing on top of the skeleton model.
//!
//! [`EditingSkeleton`] owns a [`Skeleton`](ossature_skeleton_core::Skeleton)
//! and records a [`Change`] for every successful mutation. Recorded changes
//! replay onto a copy of the starting skeleton to reproduce the edited one
//! exactly, and invert for undo. Documents are persisted as JSON with an
//! atomic replace.

pub mod aggregator;
pub mod canvas;
pub mod change;
pub mod editing;
pub mod error;
pub mod mutation;
pub mod persist;

pub use aggregator::{ChangeAggregator, GroupingPolicy};
pub use canvas::{pick, CanvasTarget};
pub use change::{Attachment, BatchId, Change, ChangeKind};
pub use editing::{replay, EditingSkeleton};
pub use error::{EditError, MutationRejection, ReadError, SaveError};
pub use mutation::SkeletonMutation;
pub use persist::{load, load_document, save, save_document, Document};
