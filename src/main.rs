#[cfg(feature = "window")]
mod window;

use anyhow::{Context, Result};
use clap::Parser;
use flappy_evo::population::HillClimber;
use flappy_evo::{NullHook, RenderHook, SimConfig, SpriteSheet, Trainer};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "flappy-evo", about = "Evolve flappy birds with a hill-climbing optimizer")]
struct Cli {
    /// JSON file overriding simulation constants.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Maximum generations to train.
    #[arg(long, default_value_t = 50)]
    generations: usize,
    /// Birds per generation.
    #[arg(long, default_value_t = 20)]
    population: usize,
    /// Seed for pipes and mutation; overrides the config file.
    #[arg(long)]
    seed: Option<u64>,
    /// Stop once a bird reaches this fitness.
    #[arg(long, default_value_t = 100.0)]
    fitness_threshold: f64,
    /// Ticks per second; 0 runs as fast as possible.
    #[arg(long)]
    tick_rate: Option<u32>,
    /// Run without a window.
    #[arg(long)]
    headless: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SimConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(rate) = cli.tick_rate {
        config.tick_rate = rate;
    } else if cli.headless {
        config.tick_rate = 0;
    }
    config.validate()?;

    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().next_u64());
    info!(
        seed,
        population = cli.population,
        generations = cli.generations,
        headless = cli.headless,
        "starting training run"
    );

    let sprites = SpriteSheet::new();
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut optimizer = HillClimber::new(cli.population, seed ^ 0x5EED, cli.fitness_threshold);
    let mut hook = make_hook(&config, cli.headless)?;

    let summary = Trainer::new(&config, &sprites, cli.generations).run(
        &mut optimizer,
        &mut rng,
        hook.as_mut(),
    )?;

    info!(
        generations = summary.generations,
        best_score = summary.best_score,
        best_fitness = optimizer.best_fitness(),
        cancelled = summary.cancelled,
        "training finished"
    );
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

#[cfg(feature = "window")]
fn make_hook(config: &SimConfig, headless: bool) -> Result<Box<dyn RenderHook>> {
    if headless {
        return Ok(Box::new(NullHook));
    }
    Ok(Box::new(window::WindowHook::new(config)?))
}

#[cfg(not(feature = "window"))]
fn make_hook(_config: &SimConfig, headless: bool) -> Result<Box<dyn RenderHook>> {
    if !headless {
        tracing::warn!("built without the `window` feature, running headless");
    }
    Ok(Box::new(NullHook))
}
