//! Cartesian and angular primitives.
//!
//! `Coordinate` and `Vector` share a layout but not a role: a coordinate is a
//! position, a vector a displacement. Rigs are planar in XY; every rotation in
//! this crate turns about the Z axis and leaves `z` untouched.

use std::f32::consts::PI;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

const TWO_PI: f32 = PI * 2.0;

/// A position in rig space.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// A displacement in rig space.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Coordinate {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Coordinate) -> f32 {
        (other - self).magnitude()
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Vector {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn magnitude(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    #[inline]
    pub fn dot(self, other: Vector) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Direction of the XY projection, measured counter-clockwise from +X.
    #[inline]
    pub fn direction(self) -> Angle {
        Angle::radians(self.y.atan2(self.x))
    }

    /// Rotate counter-clockwise about the Z axis.
    #[inline]
    pub fn rotated(self, rotation: Rotation) -> Vector {
        if rotation.radians == 0.0 {
            return self;
        }
        let (sin, cos) = rotation.radians.sin_cos();
        Vector::new(
            self.x * cos - self.y * sin,
            self.x * sin + self.y * cos,
            self.z,
        )
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Returns the result of mapping each component through `f`.
    #[inline]
    pub fn map(self, mut f: impl FnMut(f32) -> f32) -> Self {
        Self::new(f(self.x), f(self.y), f(self.z))
    }
}

impl From<Vector> for Coordinate {
    #[inline]
    fn from(v: Vector) -> Self {
        Coordinate::new(v.x, v.y, v.z)
    }
}

impl From<Coordinate> for Vector {
    #[inline]
    fn from(c: Coordinate) -> Self {
        Vector::new(c.x, c.y, c.z)
    }
}

impl Add<Vector> for Coordinate {
    type Output = Coordinate;

    fn add(self, rhs: Vector) -> Coordinate {
        Coordinate::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub<Vector> for Coordinate {
    type Output = Coordinate;

    fn sub(self, rhs: Vector) -> Coordinate {
        Coordinate::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Sub for Coordinate {
    type Output = Vector;

    fn sub(self, rhs: Coordinate) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f32) -> Vector {
        self.map(|c| c * rhs)
    }
}

/// An angular measure in radians. Not wrapped: `Angle::degrees(720.0)` keeps
/// both turns.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Angle {
    radians: f32,
}

impl Angle {
    pub const ZERO: Self = Self { radians: 0.0 };

    #[inline]
    pub const fn radians(radians: f32) -> Self {
        Self { radians }
    }

    #[inline]
    pub fn degrees(degrees: f32) -> Self {
        Self::radians(degrees * PI / 180.0)
    }

    #[inline]
    pub const fn to_radians(self) -> f32 {
        self.radians
    }

    #[inline]
    pub fn to_degrees(self) -> f32 {
        self.radians * 180.0 / PI
    }
}

impl From<Rotation> for Angle {
    #[inline]
    fn from(rotation: Rotation) -> Self {
        Angle::radians(rotation.radians)
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, rhs: Angle) -> Angle {
        Angle::radians(self.radians + rhs.radians)
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Angle {
        Angle::radians(self.radians - rhs.radians)
    }
}

/// A rotation wrapped into `[0, 2π)`.
///
/// Converting an [`Angle`] wraps it; converting back is exact, so a wrapped
/// value survives any number of round trips unchanged.
#[derive(Copy, Clone, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "Angle", into = "Angle")]
pub struct Rotation {
    radians: f32,
}

impl Rotation {
    pub const ZERO: Self = Self { radians: 0.0 };

    #[inline]
    pub fn radians(radians: f32) -> Self {
        Self {
            radians: wrap(radians),
        }
    }

    #[inline]
    pub fn degrees(degrees: f32) -> Self {
        Self::from(Angle::degrees(degrees))
    }

    /// Always in `[0, 2π)`.
    #[inline]
    pub const fn to_radians(self) -> f32 {
        self.radians
    }

    /// Always in `[0, 360)` up to float rounding.
    #[inline]
    pub fn to_degrees(self) -> f32 {
        Angle::from(self).to_degrees()
    }
}

fn wrap(radians: f32) -> f32 {
    let wrapped = radians.rem_euclid(TWO_PI);
    // rem_euclid can round tiny negative inputs up to exactly 2π.
    if wrapped >= TWO_PI {
        0.0
    } else {
        wrapped
    }
}

impl From<Angle> for Rotation {
    #[inline]
    fn from(angle: Angle) -> Self {
        Rotation::radians(angle.radians)
    }
}

impl Add for Rotation {
    type Output = Rotation;

    fn add(self, rhs: Rotation) -> Rotation {
        Rotation::radians(self.radians + rhs.radians)
    }
}

impl Sub for Rotation {
    type Output = Rotation;

    fn sub(self, rhs: Rotation) -> Rotation {
        Rotation::radians(self.radians - rhs.radians)
    }
}

impl Neg for Rotation {
    type Output = Rotation;

    fn neg(self) -> Rotation {
        Rotation::radians(-self.radians)
    }
}

impl fmt::Debug for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.to_degrees())
    }
}
