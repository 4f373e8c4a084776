//! Headless trainer: evolves a population without a window and logs one line
//! per generation.
//!
//! Usage:
//!   cargo run --release --bin train -- --generations 100 --seed 7 --history history.json

use std::fs;
use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use flappy_evo::simulation::evaluation::{self, TrainingSummary};
use flappy_evo::simulation::evolution::Population;
use flappy_evo::simulation::params::Params;
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "flappy-train")]
#[command(about = "Evolve flappy bird controllers without rendering")]
struct Args {
    /// JSON configuration file (defaults are used when omitted)
    #[arg(long)]
    config: Option<String>,

    /// Override the number of generations
    #[arg(long)]
    generations: Option<u32>,

    /// Override the population size
    #[arg(long)]
    population: Option<usize>,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Write the per-generation history as JSON
    #[arg(long)]
    history: Option<String>,

    /// Write the default configuration to this path and exit
    #[arg(long)]
    write_default_config: Option<String>,
}

#[derive(Serialize)]
struct History<'a> {
    created_at: String,
    params: &'a Params,
    summary: &'a TrainingSummary,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if let Some(path) = &args.write_default_config {
        Params::default()
            .save_to_file(path)
            .with_context(|| format!("failed to write default config to {path}"))?;
        println!("Wrote default configuration to {path}");
        return Ok(());
    }

    let mut params = match &args.config {
        Some(path) => Params::load_from_file(path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => Params::default(),
    };
    if let Some(generations) = args.generations {
        params.generations = generations;
    }
    if let Some(population) = args.population {
        params.population_size = population;
    }
    if args.seed.is_some() {
        params.rng_seed = args.seed;
    }
    params.validate().context("invalid configuration")?;

    info!(
        generations = params.generations,
        population = params.population_size,
        seed = ?params.rng_seed,
        "starting training"
    );

    let mut population = Population::new(&params);
    let cancel = AtomicBool::new(false);
    let summary = evaluation::train(&mut population, &params, &cancel, |generation| {
        println!(
            "gen {:>4}  score {:>3}  ticks {:>6}  best {:>8.1}  mean {:>8.1}  end {:?}",
            generation.generation,
            generation.score,
            generation.ticks,
            generation.best_fitness,
            generation.mean_fitness,
            generation.end,
        );
    })
    .context("training failed")?;

    println!();
    println!("=== TRAINING RESULTS ===");
    println!("  Generations:  {}", summary.generations.len());
    println!("  Stopped:      {:?}", summary.stopped);
    if let Some(best) = summary.best_fitness() {
        println!("  Best fitness: {:.1}", best);
    }

    if let Some(path) = &args.history {
        let history = History {
            created_at: Utc::now().to_rfc3339(),
            params: &params,
            summary: &summary,
        };
        let json = serde_json::to_string_pretty(&history).context("failed to encode history")?;
        fs::write(path, json).with_context(|| format!("failed to write history to {path}"))?;
        info!(path = %path, "wrote history");
    }

    Ok(())
}
