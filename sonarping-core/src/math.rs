//! Vector math for SonarPing.
//!
//! [`Vec3`] is glam's double precision vector. It is `Copy`, so every function
//! here takes its operands by value and returns a fresh vector; nothing is
//! mutated in place. A `Vec3` is a point or a direction depending on context.

use crate::error::{Result, SonarError};

pub use glam::DVec3 as Vec3;

/// Componentwise `a - b`.
#[inline]
pub fn subtract(a: Vec3, b: Vec3) -> Vec3 {
    a - b
}

#[inline]
pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a.dot(b)
}

/// Right-handed cross product. The result is perpendicular to both inputs
/// with magnitude `|a||b|sin(θ)`.
#[inline]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    a.cross(b)
}

/// Euclidean norm.
#[inline]
pub fn magnitude(v: Vec3) -> f64 {
    v.length()
}

#[inline]
pub fn distance_to(a: Vec3, b: Vec3) -> f64 {
    magnitude(subtract(a, b))
}

/// Scales `v` to unit length.
///
/// # Errors
///
/// Returns [`SonarError::DegenerateVector`] when `v` has zero (or non-finite)
/// length instead of producing a vector of NaNs.
pub fn unit(v: Vec3) -> Result<Vec3> {
    let length = magnitude(v);
    if length == 0.0 || !length.is_finite() {
        return Err(SonarError::DegenerateVector { length });
    }
    Ok(v / length)
}
