//! Packet-assignment policies
//!
//! Implements the two admission policies compared by the simulator:
//! - UniformRandom: pick a queue uniformly, overflow to the other if full
//! - ShortestQueue: join the shorter queue, ties favor queue 1
//!
//! Selection only inspects queue state; enqueueing the packet is the
//! caller's responsibility after a queue is chosen.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::queue::ServerQueue;
use crate::types::QueueId;

/// Packet-assignment policy, selected per simulation configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Policy {
    UniformRandom,
    ShortestQueue,
}

impl Policy {
    /// Choose a target queue for an arriving packet, or `None` to reject
    ///
    /// UniformRandom draws the first pick from `rng`; if that queue is full
    /// it falls back to the other queue, so the second-checked queue absorbs
    /// overflow rather than the pick being uniform over non-full queues.
    /// ShortestQueue compares `length()` with ties going to queue 1.
    pub fn select<R: Rng>(
        &self,
        queue1: &ServerQueue,
        queue2: &ServerQueue,
        rng: &mut R,
    ) -> Option<QueueId> {
        match self {
            Policy::UniformRandom => {
                let first = if rng.gen_bool(0.5) {
                    QueueId::First
                } else {
                    QueueId::Second
                };
                let (picked, fallback) = match first {
                    QueueId::First => (queue1, queue2),
                    QueueId::Second => (queue2, queue1),
                };
                if !picked.is_full() {
                    Some(first)
                } else if !fallback.is_full() {
                    Some(first.other())
                } else {
                    None
                }
            }
            Policy::ShortestQueue => match (queue1.is_full(), queue2.is_full()) {
                (false, false) => {
                    if queue1.length() <= queue2.length() {
                        Some(QueueId::First)
                    } else {
                        Some(QueueId::Second)
                    }
                }
                (false, true) => Some(QueueId::First),
                (true, false) => Some(QueueId::Second),
                (true, true) => None,
            },
        }
    }

    /// Stable identifier, also accepted by `FromStr`
    pub fn name(&self) -> &'static str {
        match self {
            Policy::UniformRandom => "random",
            Policy::ShortestQueue => "shortest",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Policy::UniformRandom),
            "shortest" => Ok(Policy::ShortestQueue),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}
