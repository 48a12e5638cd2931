use crate::acoustics::EchoModel;
use crate::error::{Result, SonarError};
use crate::scene::{HitPolicy, IntersectOptions};

/// Speed of sound in sea water (m/s).
pub const DEFAULT_SPEED_OF_SOUND: f64 = 1500.0;

/// Determinant threshold of the Möller–Trumbore test.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// One-way absorption, roughly 100 dB/km at 200 kHz.
pub const DEFAULT_ATTENUATION_DB_PER_METER: f64 = -0.1;

/// Configuration descriptor for a sonar simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationDesc {
    /// Propagation speed used for time-of-flight (m/s)
    pub speed_of_sound: f64,
    /// Rays whose intersection determinant falls below this are treated as misses.
    /// This also culls back-facing hits.
    pub epsilon: f64,
    /// Signed attenuation coefficient in dB per meter (must be <= 0)
    pub attenuation_db_per_meter: f64,
    /// Magnitude of an emitted ping before attenuation
    pub source_intensity: f64,
    /// How a ray resolves several triangle hits
    pub hit_policy: HitPolicy,
    /// Accept intersections behind the ray origin (`t < 0`)
    pub accept_behind_origin: bool,
    /// Threads used by the geometry stage (1 runs it on the calling thread)
    pub worker_threads: usize,
}

impl Default for SimulationDesc {
    fn default() -> Self {
        Self {
            speed_of_sound: DEFAULT_SPEED_OF_SOUND,
            epsilon: DEFAULT_EPSILON,
            attenuation_db_per_meter: DEFAULT_ATTENUATION_DB_PER_METER,
            source_intensity: 1.0,
            hit_policy: HitPolicy::FirstHit,
            accept_behind_origin: true,
            worker_threads: 1,
        }
    }
}

impl SimulationDesc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn speed_of_sound(mut self, speed: f64) -> Self {
        self.speed_of_sound = speed;
        self
    }

    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn attenuation_db_per_meter(mut self, coefficient: f64) -> Self {
        self.attenuation_db_per_meter = coefficient;
        self
    }

    pub fn source_intensity(mut self, intensity: f64) -> Self {
        self.source_intensity = intensity;
        self
    }

    pub fn hit_policy(mut self, policy: HitPolicy) -> Self {
        self.hit_policy = policy;
        self
    }

    pub fn accept_behind_origin(mut self, accept: bool) -> Self {
        self.accept_behind_origin = accept;
        self
    }

    pub fn worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads;
        self
    }

    /// Checks that every parameter is usable by the simulation.
    pub fn validate(&self) -> Result<()> {
        if !self.speed_of_sound.is_finite() || self.speed_of_sound <= 0.0 {
            return Err(SonarError::Configuration(format!(
                "speed_of_sound must be positive and finite, got {}",
                self.speed_of_sound
            )));
        }

        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(SonarError::Configuration(format!(
                "epsilon must be non-negative and finite, got {}",
                self.epsilon
            )));
        }

        if !self.attenuation_db_per_meter.is_finite() || self.attenuation_db_per_meter > 0.0 {
            return Err(SonarError::Configuration(format!(
                "attenuation_db_per_meter must be finite and <= 0, got {}",
                self.attenuation_db_per_meter
            )));
        }

        if !self.source_intensity.is_finite() || self.source_intensity < 0.0 {
            return Err(SonarError::Configuration(format!(
                "source_intensity must be non-negative and finite, got {}",
                self.source_intensity
            )));
        }

        if self.worker_threads == 0 {
            return Err(SonarError::Configuration(
                "worker_threads must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Intersection parameters for the geometry stage.
    pub fn intersect_options(&self) -> IntersectOptions {
        IntersectOptions {
            epsilon: self.epsilon,
            accept_behind_origin: self.accept_behind_origin,
        }
    }

    /// Propagation parameters for the acoustics stage.
    pub fn echo_model(&self) -> EchoModel {
        EchoModel {
            speed_of_sound: self.speed_of_sound,
            attenuation_db_per_meter: self.attenuation_db_per_meter,
            source_intensity: self.source_intensity,
        }
    }
}
