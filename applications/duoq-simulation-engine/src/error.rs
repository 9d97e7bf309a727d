//! Error types for the simulation engine

use thiserror::Error;

/// Invalid configuration, rejected before any simulation work starts
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("arrival rate must be positive and finite, got {0}")]
    ArrivalRate(f64),

    #[error("service rate must be positive and finite, got {0}")]
    ServiceRate(f64),

    #[error("queue capacity must be at least 1")]
    QueueCapacity,

    #[error("replication count must be at least 1")]
    ReplicationCount,

    #[error("packet budget must be at least 1")]
    PacketBudget,

    #[error("unknown policy '{0}' (expected 'random' or 'shortest')")]
    UnknownPolicy(String),

    #[error("unknown sweep axis '{0}' (expected 'arrival-rate', 'service-rate' or 'traffic-load')")]
    UnknownAxis(String),
}

/// Failures surfaced by a simulation run or its aggregation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The event schedule drained before the termination condition was met.
    /// The arrival-rescheduling rule keeps the schedule non-empty until the
    /// packet budget is offered and every admitted packet has departed, so
    /// this is an internal invariant violation, never a normal outcome.
    #[error("event schedule empty before termination (offered {offered}, admitted {admitted}, departed {departed})")]
    EmptySchedule {
        offered: u64,
        admitted: u64,
        departed: u64,
    },
}
