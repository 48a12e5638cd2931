//! Beam sampling strategies.
//!
//! A [`BeamPattern`] turns a transducer pose into the finite set of rays that
//! represent its beam, each with an intensity relative to the centerline.

use crate::math::Vec3;
use crate::scene::Ray;
use std::fmt::Debug;

/// One probing ray of a beam.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamSample {
    pub ray: Ray,
    /// Intensity relative to the beam centerline (1.0 on axis)
    pub relative_intensity: f64,
}

/// Strategy for sampling a transducer's beam.
///
/// Implementations must be `Send + Sync` so transducers can be shared with the
/// geometry workers, and `Debug` so transducers stay printable.
pub trait BeamPattern: Send + Sync + Debug {
    /// Produces the rays covering the beam emitted from `point` along `direction`.
    fn sample(&self, point: Vec3, direction: Vec3) -> Vec<BeamSample>;
}

/// A single full-intensity ray along the transducer axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CenterlineBeam;

impl BeamPattern for CenterlineBeam {
    fn sample(&self, point: Vec3, direction: Vec3) -> Vec<BeamSample> {
        vec![BeamSample {
            ray: Ray::new(point, direction),
            relative_intensity: 1.0,
        }]
    }
}
