//! Multi-replication statistical aggregation
//!
//! Runs R independent replications with distinct seeds and reduces their
//! per-run metrics to mean / standard-deviation summaries. Replications
//! share no mutable state, so the fan-out runs on rayon worker threads and
//! results merge only after every replication completes.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::simulator::{RunMetrics, SimulationRun};

/// Sample mean and sample standard deviation of one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistic {
    pub mean: f64,
    pub std_dev: f64,
}

impl Statistic {
    /// Sample statistics with the n − 1 denominator; one sample has zero
    /// spread
    fn from_samples(samples: &[f64]) -> Statistic {
        if samples.is_empty() {
            return Statistic {
                mean: 0.0,
                std_dev: 0.0,
            };
        }

        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let std_dev = if samples.len() > 1 {
            let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
            variance.sqrt()
        } else {
            0.0
        };

        Statistic { mean, std_dev }
    }
}

/// Mean/std-dev summary of R independent replications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedMetrics {
    pub blocking_probability: Statistic,
    pub mean_queue_length: Statistic,
    pub mean_sojourn_time: Statistic,
    pub replications: usize,
}

impl AggregatedMetrics {
    fn from_runs(runs: &[RunMetrics]) -> AggregatedMetrics {
        let samples_of = |metric: fn(&RunMetrics) -> f64| -> Vec<f64> {
            runs.iter().map(metric).collect()
        };

        AggregatedMetrics {
            blocking_probability: Statistic::from_samples(&samples_of(|r| r.blocking_probability)),
            mean_queue_length: Statistic::from_samples(&samples_of(|r| r.mean_queue_length)),
            mean_sojourn_time: Statistic::from_samples(&samples_of(|r| r.mean_sojourn_time)),
            replications: runs.len(),
        }
    }
}

/// Run `config.replications` independent replications and aggregate them
///
/// Replication `i` is seeded with `i`, so a given configuration always
/// produces the same aggregate. A failure in any replication aborts the
/// whole aggregation; partial results are never averaged with a broken run.
pub fn run_replications(config: &SimulationConfig) -> Result<AggregatedMetrics, SimulationError> {
    config.validate()?;

    let runs: Vec<RunMetrics> = (0..config.replications as u64)
        .into_par_iter()
        .map(|seed| SimulationRun::new(config, seed)?.run())
        .collect::<Result<_, _>>()?;

    let aggregated = AggregatedMetrics::from_runs(&runs);
    info!(
        policy = %config.policy,
        replications = config.replications,
        blocking = aggregated.blocking_probability.mean,
        queue_length = aggregated.mean_queue_length.mean,
        sojourn = aggregated.mean_sojourn_time.mean,
        "replications aggregated"
    );
    Ok(aggregated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::policies::Policy;

    #[test]
    fn statistic_matches_hand_computed_values() {
        let stat = Statistic::from_samples(&[1.0, 2.0, 3.0, 4.0]);
        assert!((stat.mean - 2.5).abs() < 1e-12);
        // Sample variance 5/3
        assert!((stat.std_dev - (5.0_f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn single_sample_has_zero_spread() {
        let stat = Statistic::from_samples(&[0.7]);
        assert_eq!(stat.mean, 0.7);
        assert_eq!(stat.std_dev, 0.0);
    }

    #[test]
    fn aggregation_is_deterministic() {
        let config = SimulationConfig::default()
            .with_replications(4)
            .with_packet_budget(2_000);
        let a = run_replications(&config).unwrap();
        let b = run_replications(&config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn aggregates_the_requested_replication_count() {
        let config = SimulationConfig::default()
            .with_replications(5)
            .with_packet_budget(1_000);
        let aggregated = run_replications(&config).unwrap();
        assert_eq!(aggregated.replications, 5);
        assert!(aggregated.mean_sojourn_time.mean > 0.0);
        assert!(aggregated.mean_sojourn_time.std_dev > 0.0);
    }

    #[test]
    fn invalid_configuration_aborts_before_any_run() {
        let config = SimulationConfig::default().with_replications(0);
        let err = run_replications(&config).unwrap_err();
        assert_eq!(
            err,
            SimulationError::Config(ConfigError::ReplicationCount)
        );
    }

    #[test]
    fn shortest_queue_blocks_less_than_uniform_random_under_load() {
        // ρ = 0.9 keeps blocking well away from zero for both policies, so
        // the known ordering is observable rather than a 0-vs-0 tie.
        let base = SimulationConfig::default()
            .with_arrival_rate(1.8)
            .with_service_rate(1.0);

        let random =
            run_replications(&base.clone().with_policy(Policy::UniformRandom)).unwrap();
        let shortest =
            run_replications(&base.with_policy(Policy::ShortestQueue)).unwrap();

        assert!(random.blocking_probability.mean > 0.0);
        assert!(
            shortest.blocking_probability.mean < random.blocking_probability.mean,
            "shortest-queue should block less: {} vs {}",
            shortest.blocking_probability.mean,
            random.blocking_probability.mean
        );
    }
}
