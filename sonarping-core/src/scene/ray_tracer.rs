//! Ray tracing trait used by the simulation's geometry stage.
//!
//! [`Mesh`](crate::scene::Mesh) provides the default linear-scan
//! implementation. Anything answering the same query, such as a bounding
//! volume hierarchy, can stand in for it without changing the driver.

use crate::math::Vec3;
use crate::scene::{HitPolicy, IntersectOptions, Ray};

/// Result of a successful ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space point where the ray meets the surface
    pub point: Vec3,

    /// Ray parameter of the hit
    ///
    /// Measured in multiples of the ray direction's length. Negative when
    /// the surface lies behind the ray origin.
    pub t: f64,

    /// Index of the triangle that produced the hit, in mesh insertion order
    pub triangle_index: usize,
}

/// Trait for answering ray queries against scene geometry.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: the simulation shares one tracer
/// between its geometry workers when `worker_threads > 1`. Queries take
/// `&self`, so the geometry cannot change while a ping is in flight.
///
/// # Example
///
/// ```
/// use sonarping_core::math::Vec3;
/// use sonarping_core::scene::{HitPolicy, IntersectOptions, Ray, RayHit, RayTracer};
///
/// /// A single infinite wall at `x = distance`, facing the origin.
/// struct Wall {
///     distance: f64,
/// }
///
/// impl RayTracer for Wall {
///     fn cast_ray(
///         &self,
///         ray: &Ray,
///         options: &IntersectOptions,
///         _policy: HitPolicy,
///     ) -> Option<RayHit> {
///         if ray.direction.x <= options.epsilon {
///             return None;
///         }
///         let t = (self.distance - ray.point.x) / ray.direction.x;
///         if t < 0.0 && !options.accept_behind_origin {
///             return None;
///         }
///         Some(RayHit { point: ray.at(t), t, triangle_index: 0 })
///     }
/// }
///
/// let wall = Wall { distance: 25.0 };
/// let ray = Ray::new(Vec3::ZERO, Vec3::X);
/// let hit = wall.cast_ray(&ray, &IntersectOptions::default(), HitPolicy::FirstHit);
/// assert_eq!(hit.map(|h| h.point), Some(Vec3::new(25.0, 0.0, 0.0)));
/// ```
pub trait RayTracer: Send + Sync {
    /// Tests `ray` against the geometry.
    ///
    /// # Returns
    ///
    /// * `Some(RayHit)` for the hit selected by `policy`
    /// * `None` if nothing is hit
    fn cast_ray(&self, ray: &Ray, options: &IntersectOptions, policy: HitPolicy) -> Option<RayHit>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Simple test ray tracer that always returns a miss
    struct NoopTracer;

    impl RayTracer for NoopTracer {
        fn cast_ray(
            &self,
            _ray: &Ray,
            _options: &IntersectOptions,
            _policy: HitPolicy,
        ) -> Option<RayHit> {
            None
        }
    }

    #[test]
    fn test_noop_tracer() {
        let tracer = NoopTracer;
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let result = tracer.cast_ray(&ray, &IntersectOptions::default(), HitPolicy::FirstHit);
        assert!(result.is_none());
    }
}
