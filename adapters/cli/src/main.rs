#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a headless Squad Tactics skirmish.

mod config_file;
mod skirmish;

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::skirmish::Skirmish;

/// Plays an autopiloted squad against the enemy AI and prints the combat log.
#[derive(Parser, Debug)]
#[command(name = "squad-tactics", version, about, long_about = None)]
struct Args {
    /// TOML file overriding rules, layout, projection or seed.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed for the combat random source.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of full rounds to play.
    #[arg(short, long, default_value_t = 5)]
    turns: u32,

    /// Simulation step in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 16)]
    step_ms: u64,

    /// Log order-level detail.
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the Squad Tactics command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = config_file::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    tracing::info!(
        seed = config.seed,
        columns = config.layout.columns,
        rows = config.layout.rows,
        "starting skirmish"
    );

    let step = Duration::from_millis(args.step_ms.max(1));
    let summary = Skirmish::new(config, step)?.play(args.turns);

    for shot in &summary.shots {
        println!("{shot}");
    }
    println!(
        "turn {}: {} units standing, {} enemies left",
        summary.turn, summary.units, summary.enemies_left
    );
    Ok(())
}

fn init_logging(verbose: bool) {
    let fallback = if verbose {
        "squad_tactics=debug"
    } else {
        "squad_tactics=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
