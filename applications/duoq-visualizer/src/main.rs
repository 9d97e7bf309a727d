//! duoq chart rendering
//!
//! Runs the three standard parameter sweeps for both policies and renders
//! the nine metric-vs-axis comparison charts as interactive HTML files:
//! blocking probability, mean queue length and mean sojourn time, each
//! against arrival rate, service rate and traffic load.
//!
//! Usage:
//!   cargo run --bin duoq-plots -- --output-dir visualizations

use anyhow::Context;
use clap::Parser;
use plotly::{
    Plot, Scatter,
    color::NamedColor,
    common::{Line, Mode},
    layout::{Axis, Layout},
};
use std::fs;
use std::path::{Path, PathBuf};

use duoq_simulation_engine::{
    Policy, SimulationConfig, SweepAxis, SweepPoint, sweep::run_sweep,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "duoq-plots")]
#[command(about = "Render policy-comparison charts for the two-queue simulator", long_about = None)]
struct Args {
    /// Directory the HTML charts are written to
    #[arg(short, long, default_value = "visualizations")]
    output_dir: PathBuf,

    /// Independent replications per swept point
    #[arg(short, long, default_value_t = 10)]
    replications: usize,

    /// Offered packets per replication
    #[arg(short, long, default_value_t = 10_000)]
    packets: u64,
}

/// The three metrics charted for every axis
#[derive(Debug, Clone, Copy)]
enum Metric {
    Blocking,
    QueueLength,
    Sojourn,
}

impl Metric {
    fn title(&self) -> &'static str {
        match self {
            Metric::Blocking => "Blocking Probability",
            Metric::QueueLength => "Average Queue Length",
            Metric::Sojourn => "Average Sojourn Time",
        }
    }

    fn file_stem(&self) -> &'static str {
        match self {
            Metric::Blocking => "blocking",
            Metric::QueueLength => "queue_length",
            Metric::Sojourn => "sojourn",
        }
    }

    fn mean_of(&self, point: &SweepPoint) -> f64 {
        match self {
            Metric::Blocking => point.metrics.blocking_probability.mean,
            Metric::QueueLength => point.metrics.mean_queue_length.mean,
            Metric::Sojourn => point.metrics.mean_sojourn_time.mean,
        }
    }
}

fn axis_file_stem(axis: SweepAxis) -> &'static str {
    match axis {
        SweepAxis::ArrivalRate => "arrival_rate",
        SweepAxis::ServiceRate => "service_rate",
        SweepAxis::TrafficLoad => "traffic_load",
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "duoq_simulation_engine=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("failed to create {}", args.output_dir.display()))?;

    let base = SimulationConfig::default()
        .with_replications(args.replications)
        .with_packet_budget(args.packets);

    println!("🎨 Generating policy-comparison charts...");
    println!(
        "   {} replications × {} packets per swept point\n",
        base.replications, base.packet_budget
    );

    for axis in [
        SweepAxis::ArrivalRate,
        SweepAxis::ServiceRate,
        SweepAxis::TrafficLoad,
    ] {
        println!("Simulating vs {}...", axis.label());
        let values = axis.default_values();

        let random = run_sweep(
            axis,
            &values,
            &base.clone().with_policy(Policy::UniformRandom),
        )?;
        let shortest = run_sweep(
            axis,
            &values,
            &base.clone().with_policy(Policy::ShortestQueue),
        )?;

        for metric in [Metric::Blocking, Metric::QueueLength, Metric::Sojourn] {
            let path = write_chart(&args.output_dir, axis, metric, &random, &shortest);
            println!("   ✅ {}", path.display());
        }
        println!();
    }

    println!("🌐 All charts written to {}", args.output_dir.display());
    Ok(())
}

/// Render one metric-vs-axis chart comparing both policies
fn write_chart(
    output_dir: &Path,
    axis: SweepAxis,
    metric: Metric,
    random: &[SweepPoint],
    shortest: &[SweepPoint],
) -> PathBuf {
    let values: Vec<f64> = random.iter().map(|p| p.value).collect();
    let random_means: Vec<f64> = random.iter().map(|p| metric.mean_of(p)).collect();
    let shortest_means: Vec<f64> = shortest.iter().map(|p| metric.mean_of(p)).collect();

    let random_trace = Scatter::new(values.clone(), random_means)
        .name("Random Selection")
        .mode(Mode::LinesMarkers)
        .line(Line::new().color("rgba(255, 140, 0, 1.0)").width(2.0));

    let shortest_trace = Scatter::new(values, shortest_means)
        .name("Shortest Queue")
        .mode(Mode::LinesMarkers)
        .line(Line::new().color("rgba(34, 139, 34, 1.0)").width(2.0));

    let mut plot = Plot::new();
    plot.add_trace(random_trace);
    plot.add_trace(shortest_trace);

    let layout = Layout::new()
        .title(format!("{} vs {}", metric.title(), axis.label()))
        .x_axis(Axis::new().title(axis.label()))
        .y_axis(
            Axis::new()
                .title(metric.title())
                .grid_color(NamedColor::LightGray),
        )
        .hover_mode(plotly::layout::HoverMode::X);
    plot.set_layout(layout);

    let path = output_dir.join(format!(
        "{}_vs_{}.html",
        metric.file_stem(),
        axis_file_stem(axis)
    ));
    plot.write_html(&path);
    path
}
