/*
 * Boid Flocking Driver
 *
 * Runs one of the preset flocks (or a flock loaded from a JSON config)
 * without a window. It ticks the flock the way a render loop would, logs
 * periodic statistics and can dump the final snapshot, including the focal
 * agent's overlay geometry, as JSON for an external renderer.
 */

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use boids2d::{Agent, Flock, FlockConfig, FlockStats, FocalOverlay, Scenario};

#[derive(Parser, Debug)]
#[command(name = "boids2d", about = "Run a boid flock headless and report how it evolves")]
struct Args {
    /// Preset to run: A1-A9 or a name such as "full-flocking"
    #[arg(short, long, default_value = "a8")]
    scenario: Scenario,

    /// JSON file with flock parameters, replacing the preset's
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Disable the rayon thread pool
    #[arg(long)]
    sequential: bool,

    /// Log statistics every N ticks (0 logs only the final state)
    #[arg(long, default_value_t = 60)]
    report_every: u64,

    /// Write the final snapshot as JSON
    #[arg(long)]
    dump: Option<PathBuf>,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    scenario: &'static str,
    config: &'a FlockConfig,
    stats: FlockStats,
    agents: &'a [Agent],
    overlay: Option<FocalOverlay>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn build_config(args: &Args) -> Result<FlockConfig> {
    let mut config = match &args.config {
        Some(path) => FlockConfig::load(path)
            .with_context(|| format!("loading flock config from {}", path.display()))?,
        None => args.scenario.config(),
    };
    if args.seed.is_some() {
        config.rng_seed = args.seed;
    }
    if args.sequential {
        config.parallel = false;
    }
    Ok(config)
}

fn log_stats(stats: &FlockStats) {
    info!(
        tick = stats.tick,
        mean_neighbors = stats.mean_neighbors,
        isolated = stats.isolated,
        polarization = stats.polarization,
        "flock stats"
    );
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = build_config(&args)?;
    let mut flock = Flock::new(config).context("building flock")?;
    info!(
        scenario = %args.scenario,
        agents = flock.len(),
        ticks = args.ticks,
        "starting run"
    );

    for tick in 1..=args.ticks {
        flock.tick();
        if args.report_every > 0 && tick % args.report_every == 0 {
            log_stats(&FlockStats::measure(&flock));
        }
    }

    let stats = FlockStats::measure(&flock);
    log_stats(&stats);

    if let Some(path) = &args.dump {
        let snapshot = Snapshot {
            scenario: args.scenario.label(),
            config: flock.config(),
            stats,
            agents: flock.agents(),
            overlay: FocalOverlay::build(&flock, &args.scenario.overlays()),
        };
        let json = serde_json::to_string_pretty(&snapshot).context("serializing snapshot")?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "snapshot written");
    }

    Ok(())
}
