//! Event types for SonarPing

use crate::math::Vec3;
use crate::transducer::{Echo, TransducerId};
use std::time::Duration;
use uuid::Uuid;

/// Wall-clock time spent in each stage of a ping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PingTiming {
    /// Ray casting against the scene
    pub geometry: Duration,
    /// Echo computation and recording
    pub acoustics: Duration,
}

impl PingTiming {
    pub fn total(&self) -> Duration {
        self.geometry + self.acoustics
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PingEvent {
    RayHit {
        emitter: TransducerId,
        sample_index: usize,
        point: Vec3,
        triangle_index: usize,
    },
    RayMissed {
        emitter: TransducerId,
        sample_index: usize,
    },
    EchoRecorded {
        emitter: TransducerId,
        receiver: TransducerId,
        echo: Echo,
    },
    DegenerateEmitter {
        emitter: TransducerId,
        error: String,
    },
    PingCompleted {
        ping_id: Uuid,
        timing: PingTiming,
    },
}

impl PingEvent {
    pub fn emitter(&self) -> Option<TransducerId> {
        match self {
            Self::RayHit { emitter, .. }
            | Self::RayMissed { emitter, .. }
            | Self::EchoRecorded { emitter, .. }
            | Self::DegenerateEmitter { emitter, .. } => Some(*emitter),
            Self::PingCompleted { .. } => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::DegenerateEmitter { .. })
    }

    pub fn is_echo(&self) -> bool {
        matches!(self, Self::EchoRecorded { .. })
    }
}
