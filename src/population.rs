//! A small stand-in for an external optimizer: one elite parent, mutated clones.
//! No speciation, crossover or topology changes.

use crate::brain::{Brain, EpisodeFn, Entrant, Observation, Optimizer};
use crate::episode::EpisodeReport;
use crate::error::{BrainError, SimError};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Single neuron, tanh output.
#[derive(Debug, Clone, PartialEq)]
pub struct Perceptron {
    pub weights: [f32; 3],
    pub bias: f32,
}

impl Perceptron {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            weights: [
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            ],
            bias: rng.gen_range(-1.0..1.0),
        }
    }

    pub fn activate(&self, inputs: &[f32; 3]) -> f32 {
        let sum: f32 = self
            .weights
            .iter()
            .zip(inputs)
            .map(|(w, x)| w * x)
            .sum::<f32>()
            + self.bias;
        sum.tanh()
    }

    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R, sigma: f32) {
        for w in self.weights.iter_mut() {
            *w += rng.gen_range(-sigma..sigma);
        }
        self.bias += rng.gen_range(-sigma..sigma);
    }
}

impl Brain for Perceptron {
    fn decide(&mut self, observation: &Observation) -> Result<f32, BrainError> {
        Ok(self.activate(&observation.as_array()))
    }
}

pub struct HillClimber {
    pop: Vec<Perceptron>,
    fitness: Vec<f64>,
    rng: SmallRng,
    sigma: f32,
    fitness_threshold: f64,
    generation: usize,
    best_fitness: f64,
    generation_best: Vec<f64>,
}

impl HillClimber {
    pub fn new(pop_size: usize, seed: u64, fitness_threshold: f64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let pop = (0..pop_size).map(|_| Perceptron::random(&mut rng)).collect();
        Self {
            pop,
            fitness: vec![0.0; pop_size],
            rng,
            sigma: 0.25,
            fitness_threshold,
            generation: 0,
            best_fitness: f64::NEG_INFINITY,
            generation_best: Vec::new(),
        }
    }

    pub fn population(&self) -> &[Perceptron] {
        &self.pop
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    /// Best fitness of every evaluated generation, oldest first.
    pub fn history(&self) -> &[f64] {
        &self.generation_best
    }

    /// Keep the fittest individual; refill with mutated copies of it.
    fn reproduce(&mut self) {
        let Some(best_idx) = (0..self.pop.len()).max_by(|&a, &b| self.fitness[a].total_cmp(&self.fitness[b]))
        else {
            return;
        };
        let best = self.fitness[best_idx];
        let mean = self.fitness.iter().sum::<f64>() / self.fitness.len() as f64;
        debug!(generation = self.generation, best, mean, "reproducing");
        self.generation_best.push(best);
        self.best_fitness = self.best_fitness.max(best);

        let parent = self.pop[best_idx].clone();
        let mut next = Vec::with_capacity(self.pop.len());
        next.push(parent.clone());
        while next.len() < self.pop.len() {
            let mut child = parent.clone();
            child.mutate(&mut self.rng, self.sigma);
            next.push(child);
        }
        self.pop = next;
        self.generation += 1;
    }
}

impl Optimizer for HillClimber {
    fn evaluate_generation(&mut self, episode: &mut EpisodeFn<'_>) -> Result<EpisodeReport, SimError> {
        let entrants = self
            .pop
            .iter_mut()
            .zip(self.fitness.iter_mut())
            .map(|(brain, fitness)| Entrant::new(brain, fitness))
            .collect();
        let report = episode(entrants)?;
        self.reproduce();
        Ok(report)
    }

    fn is_complete(&self) -> bool {
        self.best_fitness >= self.fitness_threshold
    }
}
