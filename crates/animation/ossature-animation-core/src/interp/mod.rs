//! Interpolation helpers.
//!
//! Value blending lives in [`functions`]; keyframe easing curves are applied
//! to the segment parameter before blending.

pub mod functions;

pub use functions::{ease, interpolate};
