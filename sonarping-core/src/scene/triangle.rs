//! Triangles and the Möller–Trumbore ray intersection test.

use crate::config::DEFAULT_EPSILON;
use crate::error::Result;
use crate::math::{Vec3, cross, dot, magnitude, subtract, unit};
use crate::scene::Ray;

/// Parameters of a single ray/triangle test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectOptions {
    /// Determinant threshold. Anything below it is a miss, which rejects rays
    /// parallel to the plane as well as rays striking the back face.
    pub epsilon: f64,
    /// Keep hits with `t < 0`, i.e. behind the ray origin.
    pub accept_behind_origin: bool,
}

impl Default for IntersectOptions {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            accept_behind_origin: true,
        }
    }
}

/// A successful ray/triangle test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Ray parameter of the hit, in units of the ray direction's length
    pub t: f64,
    /// World-space hit point
    pub point: Vec3,
}

/// Three vertices with a winding order.
///
/// The winding fixes the sign of [`Triangle::normal`] and which side of the
/// triangle is front-facing: a ray registers a hit only when its direction
/// points against the normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub p1: Vec3,
    pub p2: Vec3,
    pub p3: Vec3,
}

impl Triangle {
    pub fn new(p1: Vec3, p2: Vec3, p3: Vec3) -> Self {
        Self { p1, p2, p3 }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.p1, self.p2, self.p3]
    }

    #[inline]
    fn edges(&self) -> (Vec3, Vec3) {
        (subtract(self.p2, self.p1), subtract(self.p3, self.p1))
    }

    /// Unnormalized face normal `e1 × e2`.
    pub fn normal(&self) -> Vec3 {
        let (e1, e2) = self.edges();
        cross(e1, e2)
    }

    /// Face normal scaled to unit length. Fails for collinear vertices.
    pub fn unit_normal(&self) -> Result<Vec3> {
        unit(self.normal())
    }

    pub fn centroid(&self) -> Vec3 {
        (self.p1 + self.p2 + self.p3) / 3.0
    }

    /// True when the vertices are collinear (or coincident). Such triangles
    /// never register a hit.
    pub fn is_degenerate(&self) -> bool {
        magnitude(self.normal()) == 0.0
    }

    /// Intersection point of `ray` with this triangle using the default
    /// options: `epsilon = 1e-6`, back faces culled, hits behind the ray
    /// origin accepted.
    pub fn ray_intersect(&self, ray: &Ray) -> Option<Vec3> {
        self.intersect(ray, &IntersectOptions::default())
            .map(|hit| hit.point)
    }

    /// One-sided Möller–Trumbore test.
    ///
    /// `u` and `v` are barycentric coordinates scaled by `det`, so the bounds
    /// checks compare against `det` instead of dividing first.
    pub fn intersect(&self, ray: &Ray, options: &IntersectOptions) -> Option<Intersection> {
        let (e1, e2) = self.edges();

        let pvec = cross(ray.direction, e2);
        let det = dot(e1, pvec);

        // Parallel and back-facing rays both land here.
        if det < options.epsilon {
            return None;
        }

        let tvec = subtract(ray.point, self.p1);
        let u = dot(tvec, pvec);
        if u < 0.0 || u > det {
            return None;
        }

        let qvec = cross(tvec, e1);
        let v = dot(ray.direction, qvec);
        if v < 0.0 || u + v > det {
            return None;
        }

        let t = dot(e2, qvec) / det;
        if t < 0.0 && !options.accept_behind_origin {
            return None;
        }

        Some(Intersection {
            t,
            point: ray.at(t),
        })
    }
}
