use crate::scene::ray_tracer::{RayHit, RayTracer};
use crate::scene::{IntersectOptions, Ray, Triangle};

/// How a ray resolves hits against several triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HitPolicy {
    /// Return the first triangle, in insertion order, that the ray hits.
    /// This is not necessarily the closest surface.
    #[default]
    FirstHit,
    /// Return the hit closest to the ray origin, on either side of it when
    /// hits behind the origin are accepted.
    Nearest,
}

/// An ordered collection of triangles, scanned linearly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    /// Appends a triangle. No validation or deduplication is performed.
    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Number of triangles with collinear vertices. They are kept in the mesh
    /// but can never be hit.
    pub fn degenerate_count(&self) -> usize {
        self.triangles.iter().filter(|t| t.is_degenerate()).count()
    }

    /// First collision of `ray` with the mesh, by insertion order.
    ///
    /// When several triangles lie on the ray, the one added first wins even if
    /// another is closer. Use [`Mesh::cast`] with [`HitPolicy::Nearest`] for
    /// the closest surface.
    pub fn get_collision(&self, ray: &Ray) -> Option<crate::math::Vec3> {
        self.cast(ray, &IntersectOptions::default(), HitPolicy::FirstHit)
            .map(|hit| hit.point)
    }

    /// Resolves `ray` against every triangle according to `policy`.
    pub fn cast(
        &self,
        ray: &Ray,
        options: &IntersectOptions,
        policy: HitPolicy,
    ) -> Option<RayHit> {
        let mut hits = self
            .triangles
            .iter()
            .enumerate()
            .filter_map(|(triangle_index, triangle)| {
                triangle
                    .intersect(ray, options)
                    .map(|intersection| RayHit {
                        point: intersection.point,
                        t: intersection.t,
                        triangle_index,
                    })
            });

        match policy {
            HitPolicy::FirstHit => hits.next(),
            // Every hit shares the ray's direction, so |t| orders them by distance.
            HitPolicy::Nearest => hits.min_by(|a, b| a.t.abs().total_cmp(&b.t.abs())),
        }
    }
}

impl FromIterator<Triangle> for Mesh {
    fn from_iter<I: IntoIterator<Item = Triangle>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl RayTracer for Mesh {
    fn cast_ray(&self, ray: &Ray, options: &IntersectOptions, policy: HitPolicy) -> Option<RayHit> {
        self.cast(ray, options, policy)
    }
}
