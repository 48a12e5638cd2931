pub mod simulation_desc;

pub use simulation_desc::{
    DEFAULT_ATTENUATION_DB_PER_METER, DEFAULT_EPSILON, DEFAULT_SPEED_OF_SOUND, SimulationDesc,
};
