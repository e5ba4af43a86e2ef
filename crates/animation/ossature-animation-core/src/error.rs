//! Error types for animation authoring and playback

use ossature_api_core::ValueKind;

/// Failure converting to or from [`Frame`](crate::Frame)
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum FrameError {
    #[error("Negative time: {0}s")]
    Negative(f32),

    #[error("Non-finite time: {0}")]
    NotFinite(f32),

    #[error("Time does not fit the frame range")]
    Overflow,
}

/// Failure editing a timeline or animation
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Keyframe value kind differs from the timeline target
    #[error("Kind mismatch in timeline '{timeline}': expected {expected:?}, got {actual:?}")]
    KindMismatch {
        timeline: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    /// Timeline names are unique within an animation
    #[error("Duplicate timeline: {0}")]
    DuplicateTimeline(String),

    /// No keyframe at this position
    #[error("Keyframe {index} not found in timeline '{timeline}'")]
    UnknownKeyframe { timeline: String, index: usize },

    /// Keyframes must be strictly increasing in frame order
    #[error("Keyframes out of order in timeline '{timeline}' at {index}")]
    Unordered { timeline: String, index: usize },

    /// Animation variables must be finite
    #[error("Variable '{name}' is not finite: {value}")]
    NonFiniteVariable { name: String, value: f32 },

    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Failure advancing a running animation. State is untouched when returned.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum PlaybackError {
    /// Elapsed time must be finite and non-negative
    #[error("Non-monotonic time step: {0}s")]
    NonMonotonicTime(f32),

    /// Speed must be finite and non-negative
    #[error("Invalid playback speed: {0}")]
    InvalidSpeed(f32),

    /// Accumulated time left the representable range
    #[error("Playback time overflow")]
    TimeOverflow,
}
