//! Scene geometry and ray queries.
//!
//! The scene system consists of four pieces:
//!
//! 1. **Ray** - origin plus an unnormalized direction
//! 2. **Triangle** - three wound vertices with a one-sided Möller–Trumbore test
//! 3. **Mesh** - ordered triangles scanned linearly, first hit wins by default
//! 4. **RayTracer** - the query trait the simulation drives, implemented by `Mesh`
//!
//! # Example
//!
//! ```
//! use sonarping_core::math::Vec3;
//! use sonarping_core::scene::{Mesh, Ray, Triangle};
//!
//! let mut mesh = Mesh::default();
//! mesh.add_triangle(Triangle::new(
//!     Vec3::new(10.0, -10.0, 0.0),
//!     Vec3::new(10.0, 10.0, 0.0),
//!     Vec3::new(10.0, 0.0, -10.0),
//! ));
//!
//! let hit = mesh.get_collision(&Ray::new(Vec3::ZERO, Vec3::X));
//! assert_eq!(hit, Some(Vec3::new(10.0, 0.0, 0.0)));
//! ```

pub mod mesh;
pub mod ray;
pub mod ray_tracer;
pub mod triangle;

pub use mesh::{HitPolicy, Mesh};
pub use ray::Ray;
pub use ray_tracer::{RayHit, RayTracer};
pub use triangle::{IntersectOptions, Intersection, Triangle};
