//! Propagation model: time of flight and absorption loss.

use crate::config::{DEFAULT_ATTENUATION_DB_PER_METER, DEFAULT_SPEED_OF_SOUND};
use crate::math::{Vec3, magnitude, subtract};
use crate::transducer::Echo;

/// Fraction of amplitude left after travelling `distance` meters with a
/// signed loss of `db_per_meter` (negative for absorption).
///
/// `10 ^ ((distance * db_per_meter) / 10)`, so `attenuation_factor(0, _) == 1`.
#[inline]
pub fn attenuation_factor(distance: f64, db_per_meter: f64) -> f64 {
    10f64.powf((distance * db_per_meter) / 10.0)
}

/// Constants of the echo computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EchoModel {
    pub speed_of_sound: f64,
    pub attenuation_db_per_meter: f64,
    pub source_intensity: f64,
}

impl Default for EchoModel {
    fn default() -> Self {
        Self {
            speed_of_sound: DEFAULT_SPEED_OF_SOUND,
            attenuation_db_per_meter: DEFAULT_ATTENUATION_DB_PER_METER,
            source_intensity: 1.0,
        }
    }
}

impl EchoModel {
    pub fn attenuation_factor(&self, distance: f64) -> f64 {
        attenuation_factor(distance, self.attenuation_db_per_meter)
    }

    /// Emitter → surface → receiver travel time in seconds.
    pub fn round_trip_time(&self, outbound_distance: f64, return_distance: f64) -> f64 {
        (outbound_distance + return_distance) / self.speed_of_sound
    }

    /// Echo heard at `receiver` from a ray emitted at `emitter` that struck
    /// the scene at `collision`.
    ///
    /// The outbound leg is measured from the actual emitter position. Only the
    /// return leg is attenuated.
    pub fn echo_for(
        &self,
        collision: Vec3,
        emitter: Vec3,
        receiver: Vec3,
        relative_intensity: f64,
    ) -> Echo {
        let outbound_distance = magnitude(subtract(collision, emitter));
        let return_distance = magnitude(subtract(collision, receiver));

        Echo {
            time: self.round_trip_time(outbound_distance, return_distance),
            magnitude: self.source_intensity
                * relative_intensity
                * self.attenuation_factor(return_distance),
        }
    }
}
