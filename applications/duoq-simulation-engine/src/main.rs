//! duoq simulation CLI
//!
//! Compares packet-assignment policies on the two-queue network, either at
//! a single operating point or swept across a parameter axis.

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::fs;

use duoq_simulation_engine::{
    Policy, SimulationConfig, SweepAxis, SweepPoint,
    replication::{AggregatedMetrics, run_replications},
    sweep::run_sweep,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "duoq-sim")]
#[command(about = "Simulate packet-assignment policies on a two-queue network", long_about = None)]
struct Args {
    /// Packet arrival rate λ
    #[arg(short = 'a', long, default_value_t = 1.0)]
    arrival_rate: f64,

    /// Per-server service rate μ
    #[arg(short = 's', long, default_value_t = 1.0)]
    service_rate: f64,

    /// Queue capacity, including the packet in service
    #[arg(short = 'c', long, default_value_t = 10)]
    capacity: usize,

    /// Independent replications per estimate
    #[arg(short = 'r', long, default_value_t = 10)]
    replications: usize,

    /// Offered packets per replication
    #[arg(short = 'p', long, default_value_t = 10_000)]
    packets: u64,

    /// Policies to compare (comma-separated: random,shortest)
    #[arg(long, default_value = "random,shortest")]
    policies: String,

    /// Sweep an axis instead of a single point
    /// (arrival-rate, service-rate, traffic-load)
    #[arg(long)]
    sweep: Option<String>,

    /// Output JSON file path (optional)
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Debug, Serialize)]
struct ComparisonReport {
    policy: Policy,
    metrics: AggregatedMetrics,
}

#[derive(Debug, Serialize)]
struct SweepReport {
    policy: Policy,
    axis: SweepAxis,
    points: Vec<SweepPoint>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "duoq_simulation_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║  duoq Two-Queue Network Simulator                        ║");
    println!("╚══════════════════════════════════════════════════════════╝\n");

    let policies: Vec<Policy> = args
        .policies
        .split(',')
        .map(|s| s.trim().parse::<Policy>())
        .collect::<Result<_, _>>()?;

    let base = SimulationConfig::default()
        .with_arrival_rate(args.arrival_rate)
        .with_service_rate(args.service_rate)
        .with_queue_capacity(args.capacity)
        .with_replications(args.replications)
        .with_packet_budget(args.packets);
    base.validate()?;

    println!("Configuration:");
    println!(
        "  λ = {}, μ = {}, capacity = {} (ρ = {:.3})",
        base.arrival_rate,
        base.service_rate,
        base.queue_capacity,
        base.traffic_load()
    );
    println!(
        "  {} replications × {} packets\n",
        base.replications, base.packet_budget
    );

    if let Some(axis) = &args.sweep {
        let axis: SweepAxis = axis.parse()?;
        run_sweep_comparison(axis, &policies, &base, args.output.as_deref())
    } else {
        run_point_comparison(&policies, &base, args.output.as_deref())
    }
}

fn run_point_comparison(
    policies: &[Policy],
    base: &SimulationConfig,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let mut reports = Vec::new();

    for &policy in policies {
        print!("Running {} policy... ", policy);
        let metrics = run_replications(&base.clone().with_policy(policy))?;
        println!("done");
        reports.push(ComparisonReport { policy, metrics });
    }

    println!(
        "\n{:<12} {:>22} {:>22} {:>22}",
        "Policy", "Blocking Prob", "Mean Queue Len", "Mean Sojourn"
    );
    println!("{}", "-".repeat(80));
    for report in &reports {
        println!(
            "{:<12} {:>22} {:>22} {:>22}",
            report.policy.name(),
            format_stat(&report.metrics.blocking_probability),
            format_stat(&report.metrics.mean_queue_length),
            format_stat(&report.metrics.mean_sojourn_time),
        );
    }

    write_json(output, &reports)?;
    println!("\n✅ Simulation complete\n");
    Ok(())
}

fn run_sweep_comparison(
    axis: SweepAxis,
    policies: &[Policy],
    base: &SimulationConfig,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let values = axis.default_values();
    let mut reports = Vec::new();

    for &policy in policies {
        println!("Sweeping {} for {} policy...", axis.label(), policy);
        let points = run_sweep(axis, &values, &base.clone().with_policy(policy))?;

        println!(
            "\n{:>10} {:>22} {:>22} {:>22}",
            axis.name(),
            "Blocking Prob",
            "Mean Queue Len",
            "Mean Sojourn"
        );
        println!("{}", "-".repeat(80));
        for point in &points {
            println!(
                "{:>10.3} {:>22} {:>22} {:>22}",
                point.value,
                format_stat(&point.metrics.blocking_probability),
                format_stat(&point.metrics.mean_queue_length),
                format_stat(&point.metrics.mean_sojourn_time),
            );
        }
        println!();

        reports.push(SweepReport {
            policy,
            axis,
            points,
        });
    }

    write_json(output, &reports)?;
    println!("✅ Sweep complete\n");
    Ok(())
}

fn format_stat(stat: &duoq_simulation_engine::Statistic) -> String {
    format!("{:.4} ± {:.4}", stat.mean, stat.std_dev)
}

fn write_json<T: Serialize>(output: Option<&str>, reports: &T) -> anyhow::Result<()> {
    if let Some(path) = output {
        let json = serde_json::to_string_pretty(reports)?;
        fs::write(path, json).with_context(|| format!("failed to write {path}"))?;
        println!("\nResults saved to {path}");
    }
    Ok(())
}
