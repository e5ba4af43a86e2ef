//! Playback configuration.

use serde::{Deserialize, Serialize};

use ossature_api_core::ValueKind;

/// How values between two keyframes are produced.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Hold the earlier keyframe.
    Step,
    /// Blend toward the later keyframe. Booleans switch at the midpoint.
    Linear,
}

/// How a linearly blended bone rotation travels between two angles.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationBlend {
    /// Blend the stored radians as plain numbers. Multi-turn spins keep
    /// their turns; 350 to 10 degrees sweeps back through 180.
    Linear,
    /// Take the shorter way around the circle.
    #[default]
    ShortestArc,
}

/// Interpolation per value kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationPolicy {
    pub boolean: Interpolation,
    pub scalar: Interpolation,
    pub vector: Interpolation,
    /// Applies to scalar timelines that target a bone rotation.
    pub rotation: RotationBlend,
}

impl Default for InterpolationPolicy {
    fn default() -> Self {
        Self {
            boolean: Interpolation::Step,
            scalar: Interpolation::Linear,
            vector: Interpolation::Linear,
            rotation: RotationBlend::ShortestArc,
        }
    }
}

impl InterpolationPolicy {
    /// Step for everything.
    pub const fn stepped() -> Self {
        Self {
            boolean: Interpolation::Step,
            scalar: Interpolation::Step,
            vector: Interpolation::Step,
            rotation: RotationBlend::ShortestArc,
        }
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: RotationBlend) -> Self {
        self.rotation = rotation;
        self
    }

    #[inline]
    pub const fn for_kind(&self, kind: ValueKind) -> Interpolation {
        match kind {
            ValueKind::Bool => self.boolean,
            ValueKind::Scalar => self.scalar,
            ValueKind::Vector => self.vector,
        }
    }
}

/// What happens when playback runs past the last keyframe.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackMode {
    /// Wrap to the start.
    Loop,
    /// Hold the last frame and keep producing updates.
    #[default]
    Clamp,
    /// Hold the last frame, signal completion once, then go quiet until reset.
    Stop,
    /// Run forward then backward.
    PingPong,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub mode: PlaybackMode,
    /// Multiplier on elapsed time. Finite and non-negative.
    pub speed: f32,
    pub interpolation: InterpolationPolicy,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            mode: PlaybackMode::default(),
            speed: 1.0,
            interpolation: InterpolationPolicy::default(),
        }
    }
}

impl PlaybackConfig {
    #[must_use]
    pub fn with_mode(mut self, mode: PlaybackMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_interpolation(mut self, interpolation: InterpolationPolicy) -> Self {
        self.interpolation = interpolation;
        self
    }
}
