use crate::math::Vec3;

/// A directed line cast into the scene to find intersections.
///
/// `direction` is not normalized. Its magnitude scales the intersection
/// parameter `t`, so `at(t)` is only a distance in meters when the direction
/// has unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub point: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(point: Vec3, direction: Vec3) -> Self {
        Self { point, direction }
    }

    /// Point reached after travelling `t` direction-lengths from the origin.
    #[inline]
    pub fn at(&self, t: f64) -> Vec3 {
        self.point + t * self.direction
    }
}
