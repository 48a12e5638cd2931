//! # SonarPing Core
//!
//! Active sonar ping simulation. Directional transducers emit rays into a
//! triangulated scene; rays that strike the mesh are reflected back and every
//! transducer records the time of flight and attenuated magnitude of the echo.
//!
//! ## Quick Start
//!
//! ```
//! use sonarping_core::*;
//! use sonarping_core::math::Vec3;
//! use sonarping_core::scene::Triangle;
//!
//! // Build the scene: geometry plus the transducer array
//! let mut scene = Scene::default();
//! scene.add_triangle(Triangle::new(
//!     Vec3::new(10.0, -10.0, 0.0),
//!     Vec3::new(10.0, 10.0, 0.0),
//!     Vec3::new(10.0, 0.0, -10.0),
//! ));
//! let forward = scene.add_transducer(Transducer::new(Vec3::ZERO, Vec3::X));
//! scene.add_transducer(Transducer::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Z));
//!
//! // Run a ping with the default constants (1500 m/s, 0.1 dB/m)
//! let mut simulation = SonarSimulation::new(SimulationDesc::default(), scene)?;
//! let report = simulation.run_ping()?;
//! assert_eq!(report.hits, 1);
//!
//! // Both transducers hear the single hit
//! for transducer in simulation.scene().transducers() {
//!     assert_eq!(transducer.echoes().len(), 1);
//! }
//! let echo = simulation.scene().transducer(forward)?.echoes()[0];
//! println!("echo after {:.4} s, magnitude {:.3}", echo.time, echo.magnitude);
//!
//! // Inspect what happened
//! for event in simulation.poll_events() {
//!     if let PingEvent::RayMissed { emitter, .. } = event {
//!         println!("{} missed", emitter);
//!     }
//! }
//! # Ok::<(), SonarError>(())
//! ```
//!
//! ## Key Components
//!
//! - **[`math`]**: `Vec3` and the free vector functions (`dot`, `cross`, `unit`, ...)
//! - **[`scene`]**: `Ray`, `Triangle` (Möller–Trumbore), `Mesh` and the `RayTracer` trait
//! - **[`Transducer`]**: emitter pose, beam sampling and echo history
//! - **[`acoustics`]**: time of flight and attenuation
//! - **[`SonarSimulation`]**: owns a [`Scene`] and runs pings
//! - **[`PingEvent`]**: per-ray and per-echo telemetry
//!
//! ## Intersection policy
//!
//! - Triangles are one-sided: rays hitting the back face are culled together
//!   with rays parallel to the plane.
//! - Meshes return the **first** hit in insertion order by default, not the
//!   nearest. [`HitPolicy::Nearest`] is available.
//! - Hits behind the ray origin are accepted unless
//!   `SimulationDesc::accept_behind_origin` is cleared.

pub mod acoustics;
pub mod beam;
pub mod config;
pub mod error;
pub mod events;
pub mod math;
pub mod scene;
pub mod simulation;
pub mod transducer;

pub use acoustics::{EchoModel, attenuation_factor};
pub use beam::{BeamPattern, BeamSample, CenterlineBeam};
pub use config::SimulationDesc;
pub use error::SonarError;
pub use events::{PingEvent, PingTiming};
pub use scene::{HitPolicy, Mesh, Ray, RayHit, RayTracer, Triangle};
pub use simulation::{PingReport, RayCast, Scene, SonarSimulation, TracedRays};
pub use transducer::{Echo, Transducer, TransducerId};
