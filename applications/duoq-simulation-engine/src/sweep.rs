//! Parameter sweeps across arrival rate, service rate, and traffic load
//!
//! The engine's single external call-shape: aggregate metrics for every
//! value on a swept parameter axis, holding the rest of the configuration
//! fixed. Consumers (chart rendering, interactive tooling) plot the
//! returned points; nothing here touches the filesystem.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SimulationConfig;
use crate::error::{ConfigError, SimulationError};
use crate::replication::{AggregatedMetrics, run_replications};

/// The parameter axis a sweep walks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepAxis {
    /// Vary λ with everything else fixed
    ArrivalRate,
    /// Vary μ with everything else fixed
    ServiceRate,
    /// Vary ρ = λ/(2μ) by setting λ = ρ·2μ with μ fixed
    TrafficLoad,
}

impl SweepAxis {
    /// Derive the configuration for one swept value
    pub fn apply(&self, value: f64, base: &SimulationConfig) -> SimulationConfig {
        match self {
            SweepAxis::ArrivalRate => base.clone().with_arrival_rate(value),
            SweepAxis::ServiceRate => base.clone().with_service_rate(value),
            SweepAxis::TrafficLoad => base
                .clone()
                .with_arrival_rate(value * 2.0 * base.service_rate),
        }
    }

    /// The standard nine-point range for this axis
    pub fn default_values(&self) -> Vec<f64> {
        match self {
            SweepAxis::ArrivalRate => linspace(0.2, 1.8, 9),
            SweepAxis::ServiceRate => linspace(0.3, 2.0, 9),
            SweepAxis::TrafficLoad => linspace(0.1, 0.9, 9),
        }
    }

    /// Human-readable axis label for tables and chart axes
    pub fn label(&self) -> &'static str {
        match self {
            SweepAxis::ArrivalRate => "Arrival Rate (λ)",
            SweepAxis::ServiceRate => "Service Rate (μ)",
            SweepAxis::TrafficLoad => "Traffic Load (ρ = λ/(2μ))",
        }
    }

    /// Stable identifier, also accepted by `FromStr`
    pub fn name(&self) -> &'static str {
        match self {
            SweepAxis::ArrivalRate => "arrival-rate",
            SweepAxis::ServiceRate => "service-rate",
            SweepAxis::TrafficLoad => "traffic-load",
        }
    }
}

impl fmt::Display for SweepAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SweepAxis {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arrival-rate" => Ok(SweepAxis::ArrivalRate),
            "service-rate" => Ok(SweepAxis::ServiceRate),
            "traffic-load" => Ok(SweepAxis::TrafficLoad),
            other => Err(ConfigError::UnknownAxis(other.to_string())),
        }
    }
}

/// One swept value with its aggregated metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub value: f64,
    pub metrics: AggregatedMetrics,
}

/// Aggregate metrics for every value on the swept axis
///
/// Each point runs the full replication set for its derived configuration.
/// The first failing point aborts the sweep.
pub fn run_sweep(
    axis: SweepAxis,
    values: &[f64],
    base: &SimulationConfig,
) -> Result<Vec<SweepPoint>, SimulationError> {
    info!(
        axis = %axis,
        points = values.len(),
        policy = %base.policy,
        "sweep started"
    );

    values
        .iter()
        .map(|&value| {
            let config = axis.apply(value, base);
            run_replications(&config).map(|metrics| SweepPoint { value, metrics })
        })
        .collect()
}

/// Evenly spaced values from `start` to `end` inclusive
pub fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (points - 1) as f64;
            (0..points).map(|i| start + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::Policy;

    #[test]
    fn linspace_hits_both_endpoints() {
        let values = linspace(0.2, 1.8, 9);
        assert_eq!(values.len(), 9);
        assert!((values[0] - 0.2).abs() < 1e-12);
        assert!((values[8] - 1.8).abs() < 1e-12);
        assert!((values[4] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn linspace_degenerate_lengths() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(0.5, 1.0, 1), vec![0.5]);
    }

    #[test]
    fn traffic_load_axis_fixes_mu_and_derives_lambda() {
        let base = SimulationConfig::default().with_service_rate(2.0);
        let config = SweepAxis::TrafficLoad.apply(0.4, &base);

        assert!((config.arrival_rate - 1.6).abs() < 1e-12);
        assert_eq!(config.service_rate, 2.0);
        assert!((config.traffic_load() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn sweep_returns_one_point_per_value() {
        let base = SimulationConfig::default()
            .with_replications(2)
            .with_packet_budget(500);
        let values = [0.5, 1.0];
        let points = run_sweep(SweepAxis::ArrivalRate, &values, &base).unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].value, 0.5);
        assert_eq!(points[1].value, 1.0);
    }

    #[test]
    fn invalid_swept_value_aborts_the_sweep() {
        let base = SimulationConfig::default()
            .with_replications(2)
            .with_packet_budget(500);
        let result = run_sweep(SweepAxis::ArrivalRate, &[1.0, -0.5], &base);
        assert!(result.is_err());
    }

    #[test]
    fn axis_parse_round_trips_and_rejects_unknown_names() {
        for axis in [
            SweepAxis::ArrivalRate,
            SweepAxis::ServiceRate,
            SweepAxis::TrafficLoad,
        ] {
            assert_eq!(axis.name().parse::<SweepAxis>().unwrap(), axis);
        }
        assert!("load".parse::<SweepAxis>().is_err());
    }

    #[test]
    fn queue_length_grows_with_traffic_load_for_both_policies() {
        let base = SimulationConfig::default()
            .with_replications(5)
            .with_packet_budget(5_000);
        let values = SweepAxis::TrafficLoad.default_values();

        for policy in [Policy::UniformRandom, Policy::ShortestQueue] {
            let points = run_sweep(
                SweepAxis::TrafficLoad,
                &values,
                &base.clone().with_policy(policy),
            )
            .unwrap();

            for pair in points.windows(2) {
                assert!(
                    pair[1].metrics.mean_queue_length.mean
                        >= pair[0].metrics.mean_queue_length.mean,
                    "mean queue length must not decrease from ρ={} to ρ={}",
                    pair[0].value,
                    pair[1].value
                );
            }
        }
    }
}
