//! ossature-api-core: math primitives and the closed `Value` variant shared by
//! the skeleton, animation and editor crates.

pub mod math;
pub mod value;

pub use math::{Angle, Coordinate, Rotation, Vector};
pub use value::{Value, ValueKind};
