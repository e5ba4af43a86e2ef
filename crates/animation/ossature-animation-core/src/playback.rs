//! Running playback of one animation.

use std::time::Duration;

use crate::config::{PlaybackConfig, PlaybackMode};
use crate::data::Animation;
use crate::error::PlaybackError;
use crate::frame::Frame;
use crate::outputs::{Outputs, PlaybackEvent, PropertyUpdate};
use crate::sampling::sample_with_hint;

/// Reflect `t` into `[0, span]` with ping-pong behavior, where the period is
/// `2 * span`.
fn ping_pong(t: u64, span: u64) -> u64 {
    if span == 0 {
        return 0;
    }
    let period = 2 * span;
    let m = t % period;
    if m <= span {
        m
    } else {
        period - m
    }
}

/// A playback cursor over its own copy of an [`Animation`].
///
/// Produces [`PropertyUpdate`]s; never touches a skeleton.
#[derive(Clone, Debug)]
pub struct RunningAnimation {
    animation: Animation,
    config: PlaybackConfig,
    elapsed: Duration,
    frame: Frame,
    /// Per-timeline segment hint, parallel to `animation.timelines()`.
    cursors: Vec<usize>,
    loops: u32,
    finished: bool,
    outputs: Outputs,
}

impl RunningAnimation {
    /// Fails when the configured speed is negative or not finite.
    pub fn new(animation: Animation, config: PlaybackConfig) -> Result<Self, PlaybackError> {
        check_speed(config.speed)?;
        log::debug!(
            "starting '{}' ({} timelines, {:?})",
            animation.name(),
            animation.timelines().len(),
            config.mode
        );
        let cursors = vec![0; animation.timelines().len()];
        Ok(Self {
            animation,
            config,
            elapsed: Duration::ZERO,
            frame: Frame::ZERO,
            cursors,
            loops: 0,
            finished: false,
            outputs: Outputs::default(),
        })
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn set_mode(&mut self, mode: PlaybackMode) {
        self.config.mode = mode;
    }

    pub fn set_speed(&mut self, speed: f32) -> Result<(), PlaybackError> {
        check_speed(speed)?;
        self.config.speed = speed;
        Ok(())
    }

    /// The frame last sampled.
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Accumulated, speed-scaled playback time.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of times playback has wrapped under [`PlaybackMode::Loop`].
    pub fn loops(&self) -> u32 {
        self.loops
    }

    /// True once a [`PlaybackMode::Stop`] animation has reached its end.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance by `elapsed_secs` of wall time.
    ///
    /// Negative or non-finite input is rejected and leaves the cursor as it
    /// was.
    pub fn advance(&mut self, elapsed_secs: f32) -> Result<&Outputs, PlaybackError> {
        if !elapsed_secs.is_finite() || elapsed_secs < 0.0 {
            log::warn!("rejected time step {elapsed_secs}s");
            return Err(PlaybackError::NonMonotonicTime(elapsed_secs));
        }
        self.step(f64::from(elapsed_secs))
    }

    pub fn advance_by(&mut self, elapsed: Duration) -> Result<&Outputs, PlaybackError> {
        self.step(elapsed.as_secs_f64())
    }

    fn step(&mut self, secs: f64) -> Result<&Outputs, PlaybackError> {
        check_speed(self.config.speed)?;
        if self.finished {
            self.outputs.clear();
            return Ok(&self.outputs);
        }
        let scaled = Duration::try_from_secs_f64(secs * f64::from(self.config.speed))
            .map_err(|_| PlaybackError::TimeOverflow)?;
        let elapsed = self
            .elapsed
            .checked_add(scaled)
            .ok_or(PlaybackError::TimeOverflow)?;

        self.outputs.clear();
        self.elapsed = elapsed;
        self.place();
        self.sample();
        log::trace!(
            "'{}' at {} ({} updates)",
            self.animation.name(),
            self.frame,
            self.outputs.updates.len()
        );
        Ok(&self.outputs)
    }

    /// Map `elapsed` onto the animation per the playback mode, emitting
    /// events.
    fn place(&mut self) {
        let raw = u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX);
        let end = u64::from(self.animation.duration().0);
        let local = match self.config.mode {
            PlaybackMode::Clamp => raw.min(end),
            PlaybackMode::Stop => {
                if raw >= end {
                    self.finished = true;
                    self.outputs.push_event(PlaybackEvent::Completed {
                        frame: Frame(end as u32),
                    });
                    log::debug!("'{}' completed", self.animation.name());
                }
                raw.min(end)
            }
            PlaybackMode::Loop => {
                if end == 0 {
                    0
                } else {
                    let count = u32::try_from(raw / end).unwrap_or(u32::MAX);
                    if count > self.loops {
                        self.loops = count;
                        self.outputs.push_event(PlaybackEvent::Looped { count });
                    }
                    raw % end
                }
            }
            PlaybackMode::PingPong => ping_pong(raw, end),
        };
        // local <= end <= u32::MAX
        self.frame = Frame(local as u32);
    }

    fn sample(&mut self) {
        let policy = self.config.interpolation;
        for (timeline, hint) in self.animation.timelines().iter().zip(&mut self.cursors) {
            if let Some(value) = sample_with_hint(timeline, self.frame, &policy, hint) {
                self.outputs
                    .push_update(PropertyUpdate::new(timeline.target(), value));
            }
        }
    }

    /// Re-sample the current frame without advancing or emitting events.
    pub fn sample_now(&mut self) -> &Outputs {
        self.outputs.clear();
        self.sample();
        &self.outputs
    }

    /// Jump to `frame` and sample it. Clears the finished flag.
    pub fn seek(&mut self, frame: Frame) -> &Outputs {
        self.elapsed = Duration::from(frame);
        self.finished = false;
        let end = self.animation.duration().0;
        self.loops = if end == 0 { 0 } else { frame.0 / end };
        self.outputs.clear();
        self.place();
        if self.config.mode != PlaybackMode::Stop {
            self.outputs.events.clear();
        }
        self.sample();
        &self.outputs
    }

    /// Back to frame zero with no history.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.frame = Frame::ZERO;
        self.loops = 0;
        self.finished = false;
        self.cursors.iter_mut().for_each(|c| *c = 0);
        self.outputs.clear();
    }

    /// Swap in a different animation and reset.
    pub fn rebind(&mut self, animation: Animation) {
        log::debug!(
            "rebinding '{}' -> '{}'",
            self.animation.name(),
            animation.name()
        );
        self.cursors = vec![0; animation.timelines().len()];
        self.animation = animation;
        self.reset();
    }
}

fn check_speed(speed: f32) -> Result<(), PlaybackError> {
    if speed.is_finite() && speed >= 0.0 {
        Ok(())
    } else {
        Err(PlaybackError::InvalidSpeed(speed))
    }
}
