//! Interpolation helpers:
//! - step_value (hold left)
//! - linear_value (component-wise, booleans switch at the midpoint)
//! - shortest_arc (angles blended the short way around)
//! - ease (cubic-bezier timing applied to the segment parameter)

use std::f32::consts::{PI, TAU};

use ossature_api_core::{Value, Vector};

use crate::config::Interpolation;
use crate::data::Easing;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vector(a: Vector, b: Vector, t: f32) -> Vector {
    Vector::new(
        lerp_f32(a.x, b.x, t),
        lerp_f32(a.y, b.y, t),
        lerp_f32(a.z, b.z, t),
    )
}

/// Blend two angles in radians along the shorter arc between them. The
/// result starts at `a` and may leave `[0, 2π)`; callers wrap on store.
#[inline]
pub fn shortest_arc(a: f32, b: f32, t: f32) -> f32 {
    let mut delta = (b - a).rem_euclid(TAU);
    if delta > PI {
        delta -= TAU;
    }
    a + delta * t
}

/// Step interpolation: choose left value.
#[inline]
pub fn step_value(a: &Value) -> Value {
    *a
}

/// Linear interpolation across value kinds.
pub fn linear_value(a: &Value, b: &Value, t: f32) -> Value {
    match (a, b) {
        (Value::Scalar(va), Value::Scalar(vb)) => Value::Scalar(lerp_f32(*va, *vb, t)),
        (Value::Vector(va), Value::Vector(vb)) => Value::Vector(lerp_vector(*va, *vb, t)),
        (Value::Bool(_), Value::Bool(vb)) if t >= 0.5 => Value::Bool(*vb),
        // Mismatched kinds cannot occur in a validated timeline; hold left.
        _ => *a,
    }
}

/// Blend `a` toward `b` at segment parameter `t` in `[0, 1]`.
#[inline]
pub fn interpolate(mode: Interpolation, a: &Value, b: &Value, t: f32) -> Value {
    match mode {
        Interpolation::Step => step_value(a),
        Interpolation::Linear => linear_value(a, b, t),
    }
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Given control points (x1, y1, x2, y2) and an input t in [0,1],
/// compute the eased y by inverting the x bezier via binary search.
#[inline]
fn bezier_ease_t(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    // Bezier(0,0,1,1) is exactly linear
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return t;
    }
    // Monotonic X in [0,1] assumed for x1/x2 in [0,1]
    let (x1, x2) = (x1.clamp(0.0, 1.0), x2.clamp(0.0, 1.0));
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = t;
    for _ in 0..24 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}

/// Map the raw segment parameter through the arriving keyframe's easing.
#[inline]
pub fn ease(easing: &Easing, t: f32) -> f32 {
    match easing.control_points() {
        None => t,
        Some([x1, y1, x2, y2]) => bezier_ease_t(t, x1, y1, x2, y2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32, eps: f32) {
        assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
    }

    #[test]
    fn bool_linear_switches_at_midpoint() {
        let (a, b) = (Value::Bool(false), Value::Bool(true));
        assert_eq!(linear_value(&a, &b, 0.49), Value::Bool(false));
        assert_eq!(linear_value(&a, &b, 0.5), Value::Bool(true));
        assert_eq!(interpolate(Interpolation::Step, &a, &b, 0.99), Value::Bool(false));
    }

    #[test]
    fn bezier_endpoints_and_symmetry() {
        let curve = Easing::CubicBezier([0.42, 0.0, 0.58, 1.0]);
        approx(ease(&curve, 0.0), 0.0, 1e-5);
        approx(ease(&curve, 1.0), 1.0, 1e-5);
        approx(ease(&curve, 0.5), 0.5, 1e-4);
        assert!(ease(&curve, 0.25) < 0.25);
        assert_eq!(ease(&Easing::CubicBezier([0.0, 0.0, 1.0, 1.0]), 0.3), 0.3);
    }

    #[test]
    fn presets_follow_their_curves() {
        for easing in [Easing::EaseInQuad, Easing::EaseInCubic, Easing::EaseInExpo] {
            approx(ease(&easing, 0.0), 0.0, 1e-5);
            approx(ease(&easing, 1.0), 1.0, 1e-5);
            assert!(ease(&easing, 0.5) < 0.5, "{easing:?}");
        }
        assert!(ease(&Easing::EaseOutSine, 0.5) > 0.5);
        approx(ease(&Easing::EaseInOutCubic, 0.5), 0.5, 1e-3);
        // Back curves overshoot below the start.
        assert!(ease(&Easing::EaseInBack, 0.2) < 0.0);
        assert_eq!(
            ease(&Easing::EaseInOut, 0.3),
            ease(&Easing::CubicBezier([0.42, 0.0, 0.58, 1.0]), 0.3)
        );
    }

    #[test]
    fn shortest_arc_crosses_zero() {
        let (a, b) = (350f32.to_radians(), 10f32.to_radians());
        approx(shortest_arc(a, b, 0.5), TAU, 1e-4);
        approx(shortest_arc(b, a, 0.5), 0.0, 1e-4);
        approx(shortest_arc(0.0, 1.0, 0.25), 0.25, 1e-6);
        approx(shortest_arc(a, b, 1.0).rem_euclid(TAU), b, 1e-4);
    }

    #[test]
    fn vectors_blend_componentwise() {
        let v = linear_value(
            &Value::Vector(Vector::new(0.0, 2.0, -4.0)),
            &Value::Vector(Vector::new(1.0, 4.0, 0.0)),
            0.25,
        );
        assert_eq!(v, Value::Vector(Vector::new(0.25, 2.5, -3.0)));
    }
}
