//! Authoring model: keyframes, timelines and animations.
//!
//! Timelines keep their keyframes strictly ordered by frame with at most one
//! keyframe per frame, and every keyframe carries the value kind its target
//! accepts. Both rules are enforced on insert and again on deserialize.
//!
//! A relative keyframe stores an offset from the keyframe before it. Each
//! timeline keeps the resolved absolute values alongside its keyframes and
//! refreshes them on every edit, so sampling never walks back.

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use ossature_api_core::{Value, ValueKind};
use ossature_skeleton_core::{BoneProperty, Target};

use crate::config::{InterpolationPolicy, PlaybackConfig};
use crate::error::{AnimationError, PlaybackError};
use crate::frame::Frame;
use crate::playback::RunningAnimation;
use crate::sampling;

/// Timing curve of the segment that arrives at a keyframe.
///
/// The named presets are fixed cubic-bezier curves: the CSS keywords plus
/// the usual polynomial, sine, exponential, circular and back families.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    /// Control points `(x1, y1, x2, y2)` as in CSS `cubic-bezier`.
    CubicBezier([f32; 4]),
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    EaseInCirc,
    EaseOutCirc,
    EaseInOutCirc,
    EaseInBack,
    EaseOutBack,
    EaseInOutBack,
}

impl Easing {
    /// Bezier control points of the curve; `None` for linear timing.
    pub const fn control_points(&self) -> Option<[f32; 4]> {
        Some(match *self {
            Easing::Linear => return None,
            Easing::CubicBezier(points) => points,
            Easing::Ease => [0.25, 0.1, 0.25, 1.0],
            Easing::EaseIn => [0.42, 0.0, 1.0, 1.0],
            Easing::EaseOut => [0.0, 0.0, 0.58, 1.0],
            Easing::EaseInOut => [0.42, 0.0, 0.58, 1.0],
            Easing::EaseInSine => [0.12, 0.0, 0.39, 0.0],
            Easing::EaseOutSine => [0.61, 1.0, 0.88, 1.0],
            Easing::EaseInOutSine => [0.37, 0.0, 0.63, 1.0],
            Easing::EaseInQuad => [0.11, 0.0, 0.5, 0.0],
            Easing::EaseOutQuad => [0.5, 1.0, 0.89, 1.0],
            Easing::EaseInOutQuad => [0.45, 0.0, 0.55, 1.0],
            Easing::EaseInCubic => [0.32, 0.0, 0.67, 0.0],
            Easing::EaseOutCubic => [0.33, 1.0, 0.68, 1.0],
            Easing::EaseInOutCubic => [0.65, 0.0, 0.35, 1.0],
            Easing::EaseInQuart => [0.5, 0.0, 0.75, 0.0],
            Easing::EaseOutQuart => [0.25, 1.0, 0.5, 1.0],
            Easing::EaseInOutQuart => [0.76, 0.0, 0.24, 1.0],
            Easing::EaseInQuint => [0.64, 0.0, 0.78, 0.0],
            Easing::EaseOutQuint => [0.22, 1.0, 0.36, 1.0],
            Easing::EaseInOutQuint => [0.83, 0.0, 0.17, 1.0],
            Easing::EaseInExpo => [0.7, 0.0, 0.84, 0.0],
            Easing::EaseOutExpo => [0.16, 1.0, 0.3, 1.0],
            Easing::EaseInOutExpo => [0.87, 0.0, 0.13, 1.0],
            Easing::EaseInCirc => [0.55, 0.0, 1.0, 0.45],
            Easing::EaseOutCirc => [0.0, 0.55, 0.45, 1.0],
            Easing::EaseInOutCirc => [0.85, 0.0, 0.15, 1.0],
            Easing::EaseInBack => [0.36, 0.0, 0.66, -0.56],
            Easing::EaseOutBack => [0.34, 1.56, 0.64, 1.0],
            Easing::EaseInOutBack => [0.68, -0.6, 0.32, 1.6],
        })
    }
}

/// Whether a keyframe's value is the target value or an offset from the
/// keyframe before it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyframeMode {
    #[default]
    Absolute,
    /// Added to the previous keyframe's resolved value, or to the kind's zero
    /// on the first keyframe. Booleans toggle when the offset is true.
    Relative,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: Frame,
    pub value: Value,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default)]
    pub mode: KeyframeMode,
}

impl Keyframe {
    pub fn new(frame: Frame, value: Value) -> Self {
        Self {
            frame,
            value,
            easing: Easing::Linear,
            mode: KeyframeMode::Absolute,
        }
    }

    /// A keyframe that lands `delta` away from the one before it.
    pub fn relative(frame: Frame, delta: Value) -> Self {
        Self {
            mode: KeyframeMode::Relative,
            ..Self::new(frame, delta)
        }
    }

    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// Keyframes for one [`Target`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TimelineRecord")]
pub struct Timeline {
    name: String,
    target: Target,
    keyframes: Vec<Keyframe>,
    /// Absolute value of each keyframe, parallel to `keyframes`.
    #[serde(skip)]
    resolved: Vec<Value>,
}

#[derive(Deserialize)]
struct TimelineRecord {
    name: String,
    target: Target,
    #[serde(default)]
    keyframes: Vec<Keyframe>,
}

impl TryFrom<TimelineRecord> for Timeline {
    type Error = AnimationError;

    fn try_from(record: TimelineRecord) -> Result<Self, Self::Error> {
        let mut timeline = Timeline::new(record.name, record.target);
        for (index, keyframe) in record.keyframes.into_iter().enumerate() {
            if timeline
                .keyframes
                .last()
                .is_some_and(|last| last.frame >= keyframe.frame)
            {
                return Err(AnimationError::Unordered {
                    timeline: timeline.name,
                    index,
                });
            }
            timeline.insert(keyframe)?;
        }
        Ok(timeline)
    }
}

impl Timeline {
    pub fn new(name: impl Into<String>, target: Target) -> Self {
        Self {
            name: name.into(),
            target,
            keyframes: Vec::new(),
            resolved: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// The value kind every keyframe must carry.
    pub fn kind(&self) -> ValueKind {
        self.target.kind()
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// The absolute value each keyframe lands on, in keyframe order.
    pub fn resolved(&self) -> &[Value] {
        &self.resolved
    }

    pub(crate) fn is_rotation(&self) -> bool {
        matches!(
            self.target,
            Target::Bone {
                property: BoneProperty::Rotation,
                ..
            }
        )
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Frame of the last keyframe; zero when empty.
    pub fn duration(&self) -> Frame {
        self.keyframes.last().map_or(Frame::ZERO, |k| k.frame)
    }

    fn check_kind(&self, value: &Value) -> Result<(), AnimationError> {
        let expected = self.kind();
        if value.kind() == expected {
            Ok(())
        } else {
            Err(AnimationError::KindMismatch {
                timeline: self.name.clone(),
                expected,
                actual: value.kind(),
            })
        }
    }

    /// Insert in frame order. A keyframe already at the same frame is
    /// replaced and returned.
    pub fn insert(&mut self, keyframe: Keyframe) -> Result<Option<Keyframe>, AnimationError> {
        self.check_kind(&keyframe.value)?;
        let (at, replaced) = match self
            .keyframes
            .binary_search_by_key(&keyframe.frame, |k| k.frame)
        {
            Ok(at) => (at, Some(std::mem::replace(&mut self.keyframes[at], keyframe))),
            Err(at) => {
                self.keyframes.insert(at, keyframe);
                (at, None)
            }
        };
        self.resolve_from(at);
        Ok(replaced)
    }

    pub fn with(mut self, keyframe: Keyframe) -> Result<Self, AnimationError> {
        self.insert(keyframe)?;
        Ok(self)
    }

    pub fn remove(&mut self, index: usize) -> Result<Keyframe, AnimationError> {
        if index >= self.keyframes.len() {
            return Err(self.unknown(index));
        }
        let removed = self.keyframes.remove(index);
        self.resolve_from(index);
        Ok(removed)
    }

    /// Move the keyframe at `index` to `frame`. A keyframe already occupying
    /// `frame` is replaced and returned.
    pub fn move_keyframe(
        &mut self,
        index: usize,
        frame: Frame,
    ) -> Result<Option<Keyframe>, AnimationError> {
        let mut keyframe = self.remove(index)?;
        keyframe.frame = frame;
        self.insert(keyframe)
    }

    /// Recompute resolved values from keyframe `at` onward; everything
    /// before it is unaffected by an edit at `at`.
    fn resolve_from(&mut self, at: usize) {
        self.resolved.truncate(at);
        for keyframe in &self.keyframes[at..] {
            let value = match keyframe.mode {
                KeyframeMode::Absolute => keyframe.value,
                KeyframeMode::Relative => {
                    let base = self
                        .resolved
                        .last()
                        .copied()
                        .unwrap_or(Value::zero(keyframe.value.kind()));
                    // Kinds were checked on insert.
                    base.checked_add(keyframe.value).unwrap_or(keyframe.value)
                }
            };
            self.resolved.push(value);
        }
    }

    fn unknown(&self, index: usize) -> AnimationError {
        AnimationError::UnknownKeyframe {
            timeline: self.name.clone(),
            index,
        }
    }

    /// Value at `frame`, clamped to the first and last keyframes. `None` for
    /// an empty timeline.
    pub fn sample(&self, frame: Frame, policy: &InterpolationPolicy) -> Option<Value> {
        sampling::sample_timeline(self, frame, policy)
    }
}

/// A named, ordered set of timelines with unique names.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AnimationRecord")]
pub struct Animation {
    name: String,
    timelines: Vec<Timeline>,
    /// Named scalar parameters carried with the animation for its host.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    variables: HashMap<String, f32>,
}

#[derive(Deserialize)]
struct AnimationRecord {
    name: String,
    #[serde(default)]
    timelines: Vec<Timeline>,
    #[serde(default)]
    variables: HashMap<String, f32>,
}

impl TryFrom<AnimationRecord> for Animation {
    type Error = AnimationError;

    fn try_from(record: AnimationRecord) -> Result<Self, Self::Error> {
        let animation = Animation {
            name: record.name,
            timelines: record.timelines,
            variables: record.variables,
        };
        animation.validate()?;
        Ok(animation)
    }
}

impl Animation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timelines: Vec::new(),
            variables: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> String {
        std::mem::replace(&mut self.name, name.into())
    }

    /// Timelines in declaration order.
    pub fn timelines(&self) -> &[Timeline] {
        &self.timelines
    }

    pub fn timeline(&self, name: &str) -> Option<&Timeline> {
        self.timelines.iter().find(|t| t.name == name)
    }

    pub fn timeline_mut(&mut self, name: &str) -> Option<&mut Timeline> {
        self.timelines.iter_mut().find(|t| t.name == name)
    }

    pub fn push(&mut self, timeline: Timeline) -> Result<(), AnimationError> {
        if self.timeline(&timeline.name).is_some() {
            return Err(AnimationError::DuplicateTimeline(timeline.name));
        }
        self.timelines.push(timeline);
        Ok(())
    }

    pub fn with(mut self, timeline: Timeline) -> Result<Self, AnimationError> {
        self.push(timeline)?;
        Ok(self)
    }

    pub fn remove(&mut self, name: &str) -> Option<Timeline> {
        let at = self.timelines.iter().position(|t| t.name == name)?;
        Some(self.timelines.remove(at))
    }

    pub fn variable(&self, name: &str) -> Option<f32> {
        self.variables.get(name).copied()
    }

    /// Every variable in no particular order.
    pub fn variables(&self) -> impl Iterator<Item = (&str, f32)> + '_ {
        self.variables
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
    }

    /// Set a named variable, returning its previous value. Values must be
    /// finite.
    pub fn set_variable(
        &mut self,
        name: impl Into<String>,
        value: f32,
    ) -> Result<Option<f32>, AnimationError> {
        let name = name.into();
        if !value.is_finite() {
            return Err(AnimationError::NonFiniteVariable { name, value });
        }
        Ok(self.variables.insert(name, value))
    }

    pub fn with_variable(
        mut self,
        name: impl Into<String>,
        value: f32,
    ) -> Result<Self, AnimationError> {
        self.set_variable(name, value)?;
        Ok(self)
    }

    pub fn remove_variable(&mut self, name: &str) -> Option<f32> {
        self.variables.remove(name)
    }

    /// The latest keyframe across all timelines.
    pub fn duration(&self) -> Frame {
        self.timelines
            .iter()
            .map(Timeline::duration)
            .max()
            .unwrap_or(Frame::ZERO)
    }

    pub fn validate(&self) -> Result<(), AnimationError> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(self.timelines.len());
        for timeline in &self.timelines {
            if !seen.insert(timeline.name.as_str()) {
                return Err(AnimationError::DuplicateTimeline(timeline.name.clone()));
            }
        }
        if let Some((name, &value)) = self.variables.iter().find(|(_, v)| !v.is_finite()) {
            return Err(AnimationError::NonFiniteVariable {
                name: name.clone(),
                value,
            });
        }
        Ok(())
    }

    /// Begin playback of a copy of this animation.
    pub fn start(&self, config: PlaybackConfig) -> Result<RunningAnimation, PlaybackError> {
        RunningAnimation::new(self.clone(), config)
    }
}
