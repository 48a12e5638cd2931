//! Error types for SonarPing

use crate::transducer::TransducerId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SonarError {
    #[error("Degenerate vector: cannot normalize a vector of length {length}")]
    DegenerateVector { length: f64 },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown transducer: {0}")]
    UnknownTransducer(TransducerId),

    #[error("Geometry worker error: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, SonarError>;
