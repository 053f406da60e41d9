use crate::brain::{Entrant, Optimizer};
use crate::config::SimConfig;
use crate::episode::{EpisodeReport, RenderHook, run_episode};
use crate::error::SimError;
use crate::sprites::SpriteSheet;
use rand::RngCore;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrainingSummary {
    pub generations: usize,
    /// The render hook requested shutdown; no further generations ran.
    pub cancelled: bool,
    pub best_score: u32,
    pub last: Option<EpisodeReport>,
}

/// Drives an optimizer one episode per generation.
pub struct Trainer<'a> {
    config: &'a SimConfig,
    sprites: &'a SpriteSheet,
    max_generations: usize,
}

impl<'a> Trainer<'a> {
    pub fn new(config: &'a SimConfig, sprites: &'a SpriteSheet, max_generations: usize) -> Self {
        Self {
            config,
            sprites,
            max_generations,
        }
    }

    pub fn run(
        &self,
        optimizer: &mut dyn Optimizer,
        rng: &mut dyn RngCore,
        hook: &mut dyn RenderHook,
    ) -> Result<TrainingSummary, SimError> {
        let mut summary = TrainingSummary::default();
        while summary.generations < self.max_generations && !optimizer.is_complete() {
            let generation = summary.generations;
            hook.begin_episode(generation);
            let report = optimizer.evaluate_generation(&mut |entrants: Vec<Entrant<'_>>| {
                run_episode(self.config, self.sprites, &mut *rng, entrants, &mut *hook)
            })?;
            summary.generations += 1;
            summary.best_score = summary.best_score.max(report.score);
            info!(
                generation,
                score = report.score,
                ticks = report.ticks,
                best_fitness = report.best_fitness().unwrap_or_default(),
                mean_fitness = report.mean_fitness().unwrap_or_default(),
                best_score = summary.best_score,
                "generation evaluated"
            );
            let cancelled = report.cancelled;
            summary.last = Some(report);
            if cancelled {
                warn!(generation, "shutdown requested, ending training run");
                summary.cancelled = true;
                break;
            }
        }
        Ok(summary)
    }
}
