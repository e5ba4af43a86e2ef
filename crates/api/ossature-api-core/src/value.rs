//! Value: the payload of a keyframe, a property update or a recorded change.
//!
//! The set of kinds is closed on purpose; adding one is a compile-time change
//! at every consumer.

use serde::{Deserialize, Serialize};

use crate::math::{Angle, Coordinate, Rotation, Vector};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Bool,
    Scalar,
    Vector,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Value {
    /// Boolean (step by default)
    Bool(bool),

    /// Scalar float
    Scalar(f32),

    /// 3D displacement
    Vector(Vector),
}

impl Value {
    /// Return the coarse kind of this value.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Scalar(_) => ValueKind::Scalar,
            Value::Vector(_) => ValueKind::Vector,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            Value::Scalar(s) => Some(*s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_vector(&self) -> Option<Vector> {
        match self {
            Value::Vector(v) => Some(*v),
            _ => None,
        }
    }

    /// False for NaN or infinite numeric payloads.
    pub fn is_finite(&self) -> bool {
        match self {
            Value::Bool(_) => true,
            Value::Scalar(s) => s.is_finite(),
            Value::Vector(v) => v.is_finite(),
        }
    }

    /// The additive identity of `kind`: false, zero or the zero vector.
    pub const fn zero(kind: ValueKind) -> Value {
        match kind {
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Scalar => Value::Scalar(0.0),
            ValueKind::Vector => Value::Vector(Vector::ZERO),
        }
    }

    /// Offset `self` by `delta` of the same kind. Booleans toggle when
    /// `delta` is true. `None` when the kinds differ.
    pub fn checked_add(self, delta: Value) -> Option<Value> {
        match (self, delta) {
            (Value::Bool(a), Value::Bool(b)) => Some(Value::Bool(a ^ b)),
            (Value::Scalar(a), Value::Scalar(b)) => Some(Value::Scalar(a + b)),
            (Value::Vector(a), Value::Vector(b)) => Some(Value::Vector(a + b)),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Scalar(value)
    }
}

impl From<Vector> for Value {
    fn from(value: Vector) -> Self {
        Value::Vector(value)
    }
}

impl From<Coordinate> for Value {
    fn from(value: Coordinate) -> Self {
        Value::Vector(value.into())
    }
}

impl From<Angle> for Value {
    fn from(value: Angle) -> Self {
        Value::Scalar(value.to_radians())
    }
}

impl From<Rotation> for Value {
    fn from(value: Rotation) -> Self {
        Value::Scalar(value.to_radians())
    }
}
