//! Ossature Animation Core (engine-agnostic)
//!
//! Keyframed [`Timeline`]s grouped into [`Animation`]s, sampled on a fixed
//! millisecond [`Frame`] grid. A [`RunningAnimation`] turns elapsed wall time
//! into ordered [`PropertyUpdate`]s; applying them to a skeleton is left to
//! the caller.

pub mod config;
pub mod data;
pub mod error;
pub mod frame;
pub mod interp;
pub mod outputs;
pub mod playback;
pub mod sampling;

pub use config::{
    Interpolation, InterpolationPolicy, PlaybackConfig, PlaybackMode, RotationBlend,
};
pub use data::{Animation, Easing, Keyframe, KeyframeMode, Timeline};
pub use error::{AnimationError, FrameError, PlaybackError};
pub use frame::Frame;
pub use outputs::{apply_all, Outputs, PlaybackEvent, PropertyUpdate};
pub use playback::RunningAnimation;
pub use sampling::sample_timeline;

pub use ossature_api_core::{Value, ValueKind};
pub use ossature_skeleton_core::Target;
