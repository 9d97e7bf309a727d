//! Simulation configuration and validation

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::policies::Policy;

/// Parameters for one simulation study
///
/// Validation is fail-fast: `validate` rejects bad parameters before any
/// simulation work begins, so no partial state is ever created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Packet arrival rate λ
    pub arrival_rate: f64,
    /// Per-server service rate μ
    pub service_rate: f64,
    /// Capacity of each queue, including the packet in service
    pub queue_capacity: usize,
    /// Packet-assignment policy
    pub policy: Policy,
    /// Independent replications per aggregated estimate
    pub replications: usize,
    /// Offered packets per replication
    pub packet_budget: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            arrival_rate: 1.0,
            service_rate: 1.0,
            queue_capacity: 10,
            policy: Policy::ShortestQueue,
            replications: 10,
            packet_budget: 10_000,
        }
    }
}

impl SimulationConfig {
    pub fn new(arrival_rate: f64, service_rate: f64, policy: Policy) -> Self {
        SimulationConfig {
            arrival_rate,
            service_rate,
            policy,
            ..Default::default()
        }
    }

    pub fn with_arrival_rate(mut self, rate: f64) -> Self {
        self.arrival_rate = rate;
        self
    }

    pub fn with_service_rate(mut self, rate: f64) -> Self {
        self.service_rate = rate;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_replications(mut self, replications: usize) -> Self {
        self.replications = replications;
        self
    }

    pub fn with_packet_budget(mut self, budget: u64) -> Self {
        self.packet_budget = budget;
        self
    }

    /// Offered load per server, ρ = λ/(2μ)
    pub fn traffic_load(&self) -> f64 {
        self.arrival_rate / (2.0 * self.service_rate)
    }

    /// Reject invalid parameters before any simulation starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.arrival_rate.is_finite() && self.arrival_rate > 0.0) {
            return Err(ConfigError::ArrivalRate(self.arrival_rate));
        }
        if !(self.service_rate.is_finite() && self.service_rate > 0.0) {
            return Err(ConfigError::ServiceRate(self.service_rate));
        }
        if self.queue_capacity < 1 {
            return Err(ConfigError::QueueCapacity);
        }
        if self.replications < 1 {
            return Err(ConfigError::ReplicationCount);
        }
        if self.packet_budget < 1 {
            return Err(ConfigError::PacketBudget);
        }
        Ok(())
    }
}
