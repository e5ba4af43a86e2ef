//! Timeline sampling.
//!
//! Model:
//! - Keyframes are strictly ordered by frame.
//! - Before the first keyframe the first value holds; after the last, the
//!   last value holds. No extrapolation.
//! - Exactly at a keyframe its resolved value is returned untouched; for a
//!   relative keyframe that is the predecessor's value plus its offset.
//! - Between keyframes `i` and `i+1` the segment parameter is eased by
//!   keyframe `i+1`'s easing, then blended per the value kind's
//!   [`Interpolation`](crate::Interpolation). Bone rotations blend along
//!   the policy's [`RotationBlend`].

use ossature_api_core::Value;

use crate::config::{Interpolation, InterpolationPolicy, RotationBlend};
use crate::data::{Keyframe, Timeline};
use crate::frame::Frame;
use crate::interp::functions::{ease, interpolate, shortest_arc};

/// Where a frame falls relative to a keyframe list.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Span {
    /// On keyframe `i`, or clamped to it.
    Hold(usize),
    /// Strictly between keyframes `i` and `i + 1`, at parameter `t`.
    Between(usize, f32),
}

/// Locate `frame` in `keys`, starting from the segment `hint` and falling
/// back to a binary search. `hint` is updated to the segment found so that
/// monotonic playback resolves in constant time. `keys` must be non-empty.
pub(crate) fn locate(keys: &[Keyframe], frame: Frame, hint: &mut usize) -> Span {
    let n = keys.len();
    let last = n.saturating_sub(1);
    if frame <= keys[0].frame {
        *hint = 0;
        return Span::Hold(0);
    }
    if frame >= keys[last].frame {
        *hint = last;
        return Span::Hold(last);
    }

    // keys[i].frame <= frame < keys[i + 1].frame
    let hinted = *hint < last && keys[*hint].frame <= frame && frame < keys[*hint + 1].frame;
    let i = if hinted {
        *hint
    } else {
        keys.partition_point(|k| k.frame <= frame) - 1
    };
    *hint = i;

    let (k0, k1) = (&keys[i], &keys[i + 1]);
    if frame == k0.frame {
        return Span::Hold(i);
    }
    let span = (k1.frame.0 - k0.frame.0) as f32;
    let t = (frame.0 - k0.frame.0) as f32 / span;
    Span::Between(i, t.clamp(0.0, 1.0))
}

/// Produce the value for a located span.
pub(crate) fn value_at(timeline: &Timeline, span: Span, policy: &InterpolationPolicy) -> Value {
    let values = timeline.resolved();
    match span {
        Span::Hold(i) => values[i],
        Span::Between(i, t) => {
            let (left, right) = (values[i], values[i + 1]);
            let t = ease(&timeline.keyframes()[i + 1].easing, t);
            let mode = policy.for_kind(left.kind());
            match (mode, policy.rotation, left, right) {
                (
                    Interpolation::Linear,
                    RotationBlend::ShortestArc,
                    Value::Scalar(a),
                    Value::Scalar(b),
                ) if timeline.is_rotation() => Value::Scalar(shortest_arc(a, b, t)),
                _ => interpolate(mode, &left, &right, t),
            }
        }
    }
}

/// Sample a timeline at `frame`. `None` for an empty timeline.
pub fn sample_timeline(
    timeline: &Timeline,
    frame: Frame,
    policy: &InterpolationPolicy,
) -> Option<Value> {
    let mut hint = 0;
    sample_with_hint(timeline, frame, policy, &mut hint)
}

pub(crate) fn sample_with_hint(
    timeline: &Timeline,
    frame: Frame,
    policy: &InterpolationPolicy,
    hint: &mut usize,
) -> Option<Value> {
    let keys = timeline.keyframes();
    if keys.is_empty() {
        return None;
    }
    let span = locate(keys, frame, hint);
    Some(value_at(timeline, span, policy))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(frames: &[u32]) -> Vec<Keyframe> {
        frames
            .iter()
            .map(|&f| Keyframe::new(Frame(f), Value::Scalar(f as f32)))
            .collect()
    }

    #[test]
    fn locate_clamps_and_finds_segments() {
        let keys = keys(&[10, 20, 40]);
        let mut hint = 0;
        assert_eq!(locate(&keys, Frame(0), &mut hint), Span::Hold(0));
        assert_eq!(locate(&keys, Frame(99), &mut hint), Span::Hold(2));
        assert_eq!(locate(&keys, Frame(20), &mut hint), Span::Hold(1));
        assert_eq!(locate(&keys, Frame(30), &mut hint), Span::Between(1, 0.5));
        assert_eq!(hint, 1);
        // A stale hint still finds the right segment.
        hint = 1;
        assert_eq!(locate(&keys, Frame(15), &mut hint), Span::Between(0, 0.5));
        assert_eq!(hint, 0);
    }

    #[test]
    fn single_keyframe_holds_everywhere() {
        let keys = keys(&[5]);
        let mut hint = 0;
        assert_eq!(locate(&keys, Frame(0), &mut hint), Span::Hold(0));
        assert_eq!(locate(&keys, Frame(500), &mut hint), Span::Hold(0));
    }
}
