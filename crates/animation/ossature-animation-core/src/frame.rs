//! Discrete animation time.
//!
//! One frame is one millisecond. Conversions from seconds round to the
//! nearest frame and go through `f64`, so `Frame -> secs -> Frame` is exact
//! for every frame below 2^23.

use std::fmt;
use std::ops::{Add, Sub};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FrameError;

#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Frame(pub u32);

impl Frame {
    /// Frames per second.
    pub const RATE: u32 = 1000;
    pub const ZERO: Self = Frame(0);
    pub const MAX: Self = Frame(u32::MAX);

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn as_secs_f32(self) -> f32 {
        (f64::from(self.0) / f64::from(Self::RATE)) as f32
    }

    pub fn from_secs_f32(secs: f32) -> Result<Self, FrameError> {
        if !secs.is_finite() {
            return Err(FrameError::NotFinite(secs));
        }
        if secs < 0.0 {
            return Err(FrameError::Negative(secs));
        }
        let frames = (f64::from(secs) * f64::from(Self::RATE)).round();
        if frames > f64::from(u32::MAX) {
            return Err(FrameError::Overflow);
        }
        Ok(Frame(frames as u32))
    }
}

impl From<u32> for Frame {
    fn from(index: u32) -> Self {
        Frame(index)
    }
}

impl From<Frame> for u32 {
    fn from(frame: Frame) -> Self {
        frame.0
    }
}

impl From<Frame> for Duration {
    fn from(frame: Frame) -> Self {
        Duration::from_millis(u64::from(frame.0))
    }
}

impl TryFrom<Duration> for Frame {
    type Error = FrameError;

    /// Truncates to whole frames.
    fn try_from(duration: Duration) -> Result<Self, Self::Error> {
        u32::try_from(duration.as_millis())
            .map(Frame)
            .map_err(|_| FrameError::Overflow)
    }
}

impl Add for Frame {
    type Output = Frame;

    fn add(self, rhs: Frame) -> Frame {
        Frame(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Frame {
    type Output = Frame;

    fn sub(self, rhs: Frame) -> Frame {
        Frame(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unrepresentable_seconds() {
        assert_eq!(Frame::from_secs_f32(-0.5), Err(FrameError::Negative(-0.5)));
        assert!(matches!(
            Frame::from_secs_f32(f32::NAN),
            Err(FrameError::NotFinite(_))
        ));
        assert_eq!(Frame::from_secs_f32(1e10), Err(FrameError::Overflow));
        assert_eq!(Frame::from_secs_f32(0.0015), Ok(Frame(2)));
    }

    #[test]
    fn duration_conversions_truncate() {
        assert_eq!(Frame::try_from(Duration::from_micros(2_999)), Ok(Frame(2)));
        assert_eq!(Duration::from(Frame(1500)), Duration::from_millis(1500));
        assert_eq!(
            Frame::try_from(Duration::from_secs(u64::MAX)),
            Err(FrameError::Overflow)
        );
    }

    #[test]
    fn arithmetic_saturates() {
        assert_eq!(Frame::MAX + Frame(1), Frame::MAX);
        assert_eq!(Frame(3) - Frame(5), Frame::ZERO);
        assert_eq!(u32::from(Frame(7) + Frame(3)), 10);
    }
}
