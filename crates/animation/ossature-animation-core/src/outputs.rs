//! Output contracts from playback.
//!
//! Outputs carry the sampled property values for this tick, in timeline
//! declaration order, and a separate list of playback events. Applying them
//! to a skeleton is the caller's job.

use serde::{Deserialize, Serialize};

use ossature_api_core::Value;
use ossature_skeleton_core::{Skeleton, SkeletonError, Target};

use crate::frame::Frame;

/// The resolved value of one target at the sampled frame.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyUpdate {
    target: Target,
    value: Value,
}

impl PropertyUpdate {
    pub fn new(target: Target, value: Value) -> Self {
        Self { target, value }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn value(&self) -> Value {
        self.value
    }

    /// Write the value into `skeleton`, returning the value it replaced.
    pub fn apply(&self, skeleton: &mut Skeleton) -> Result<Value, SkeletonError> {
        skeleton.set(&self.target, self.value)
    }
}

/// Apply a batch of updates. Every update is validated first; if any would
/// fail, nothing is written.
pub fn apply_all(skeleton: &mut Skeleton, updates: &[PropertyUpdate]) -> Result<(), SkeletonError> {
    for update in updates {
        skeleton.validate(&update.target, &update.value)?;
    }
    for update in updates {
        update.apply(skeleton)?;
    }
    Ok(())
}

/// Discrete signals emitted while advancing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playback wrapped; `count` is the total number of wraps so far.
    Looped { count: u32 },
    /// Playback reached the end under [`PlaybackMode::Stop`](crate::PlaybackMode::Stop).
    Completed { frame: Frame },
}

/// Outputs returned by [`RunningAnimation::advance`](crate::RunningAnimation::advance).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub updates: Vec<PropertyUpdate>,
    #[serde(default)]
    pub events: Vec<PlaybackEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.updates.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_update(&mut self, update: PropertyUpdate) {
        self.updates.push(update);
    }

    #[inline]
    pub fn push_event(&mut self, event: PlaybackEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.events.is_empty()
    }
}
