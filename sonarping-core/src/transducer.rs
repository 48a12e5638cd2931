//! Transducers: emitters that cast the probing rays and receivers that
//! accumulate echoes.

use crate::beam::{BeamPattern, BeamSample, CenterlineBeam};
use crate::math::Vec3;
use crate::scene::Ray;
use std::sync::Arc;

/// Handle for a transducer registered in a [`Scene`](crate::simulation::Scene).
///
/// The wrapped value is the transducer's position in the scene's array.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransducerId(pub(crate) usize);

impl TransducerId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for TransducerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TransducerId({})", self.0)
    }
}

/// A single returned signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Echo {
    /// Round-trip time of flight in seconds
    pub time: f64,
    /// Received magnitude after attenuation
    pub magnitude: f64,
}

/// One physical sensor of the array.
///
/// Holds an emission pose, the beam pattern used to sample it and the echo
/// history. The history is append-only for the transducer's lifetime and
/// collects echoes from every ray that hits the scene, whichever transducer
/// emitted it.
#[derive(Debug, Clone)]
pub struct Transducer {
    point: Vec3,
    direction: Vec3,
    beam: Arc<dyn BeamPattern>,
    echoes: Vec<Echo>,
}

impl Transducer {
    /// Creates a transducer with the default [`CenterlineBeam`].
    pub fn new(point: Vec3, direction: Vec3) -> Self {
        Self {
            point,
            direction,
            beam: Arc::new(CenterlineBeam),
            echoes: Vec::new(),
        }
    }

    /// Replaces the beam sampling strategy.
    pub fn with_beam_pattern(mut self, beam: impl BeamPattern + 'static) -> Self {
        self.beam = Arc::new(beam);
        self
    }

    pub fn point(&self) -> Vec3 {
        self.point
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn beam_pattern(&self) -> &dyn BeamPattern {
        self.beam.as_ref()
    }

    /// Rays and relative intensities covering this transducer's beam.
    pub fn beam_samples(&self) -> Vec<BeamSample> {
        self.beam.sample(self.point, self.direction)
    }

    /// Rays covering this transducer's beam. With the default pattern this is
    /// exactly one ray from `point` along `direction`.
    pub fn cast_rays(&self) -> Vec<Ray> {
        self.beam_samples()
            .into_iter()
            .map(|sample| sample.ray)
            .collect()
    }

    /// Appends an echo to the history.
    pub fn add_return_signal(&mut self, time: f64, magnitude: f64) {
        self.echoes.push(Echo { time, magnitude });
    }

    /// Every echo received so far, in arrival order of the driver's calls.
    pub fn echoes(&self) -> &[Echo] {
        &self.echoes
    }
}
