//! Clay Colony - headless runner
//!
//! Lays out a colony, steps it with a fixed delta until the tick budget runs
//! out or every clay pack has been delivered, then prints a summary.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use clay_colony::core::config::SimulationConfig;
use clay_colony::core::error::Result;
use clay_colony::simulation::{run_simulation_tick, Colony, SimulationEvent};

/// Headless Clay Colony simulation
#[derive(Parser, Debug)]
#[command(name = "clay_colony")]
#[command(about = "Run the clay-harvesting colony without a renderer")]
struct Args {
    /// TOML config file; missing keys use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum ticks to run
    #[arg(long, default_value_t = 10_000)]
    ticks: u64,

    /// Tick length in milliseconds
    #[arg(long, default_value_t = 16)]
    dt_ms: u64,

    /// Random seed (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of agents (overrides the config)
    #[arg(long)]
    agents: Option<usize>,

    /// Number of clay packs (overrides the config)
    #[arg(long)]
    nodes: Option<usize>,

    /// Write the final colony snapshot as JSON
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Print a progress line every N ticks (0 = never)
    #[arg(long, default_value_t = 1_000)]
    report_every: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("clay_colony=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(agents) = args.agents {
        config.agent_count = agents;
    }
    if let Some(nodes) = args.nodes {
        config.resource_count = nodes;
    }

    let mut colony = Colony::new(config)?;
    let dt = Duration::from_millis(args.dt_ms);

    println!("Clay Colony");
    println!("===========");
    println!(
        "{} agents, {} clay packs, seed {}",
        colony.agents.count(),
        colony.remaining_nodes(),
        colony.config.seed
    );

    let start = Instant::now();
    let mut hits = 0u64;
    let mut ticks_run = 0u64;

    for tick in 1..=args.ticks {
        let events = run_simulation_tick(&mut colony, dt);
        hits += events
            .iter()
            .filter(|e| matches!(e, SimulationEvent::HitLanded { .. }))
            .count() as u64;
        ticks_run = tick;

        if args.report_every > 0 && tick % args.report_every == 0 {
            println!(
                "[tick {:>6} | {:>7}ms] inventory {:>3}, packs left {:>3}",
                tick,
                colony.now(),
                colony.depot_inventory(),
                colony.remaining_nodes()
            );
        }

        if colony.is_harvest_complete() {
            tracing::info!("Harvest complete after {} ticks", tick);
            break;
        }
    }

    let elapsed = start.elapsed();
    let snapshot = colony.snapshot();

    println!();
    println!("--- Summary ---");
    println!("Ticks run: {} ({}ms simulated)", ticks_run, colony.now());
    println!("Hits landed: {}", hits);
    println!("Depot inventory: {}", colony.depot_inventory());
    println!("Clay packs remaining: {}", colony.remaining_nodes());
    println!("Harvest complete: {}", snapshot.harvest_complete);
    println!("Agents by state:");
    for (kind, count) in snapshot.state_counts() {
        if count > 0 {
            println!("  {:<20} {}", kind.name(), count);
        }
    }
    println!("Actual time: {:.2}ms", elapsed.as_secs_f64() * 1000.0);

    if let Some(path) = &args.snapshot {
        std::fs::write(path, snapshot.to_json()?)?;
        println!("\nSnapshot written to {}", path.display());
    }

    Ok(())
}
