//! The narrow boundary between the simulation and an external optimizer.
//!
//! The optimizer owns brains and fitness values across generations; an
//! episode only borrows them through [`Entrant`] for its own duration.

use crate::episode::EpisodeReport;
use crate::error::{BrainError, SimError};

/// What a bird senses each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub y: f32,
    /// Distance to the bottom edge of the upcoming top barrier.
    pub gap_top_distance: f32,
    /// Distance to the top edge of the upcoming bottom barrier.
    pub gap_bottom_distance: f32,
}

impl Observation {
    pub fn as_array(&self) -> [f32; 3] {
        [self.y, self.gap_top_distance, self.gap_bottom_distance]
    }
}

/// Decision function. Outputs above the configured threshold mean "jump".
pub trait Brain {
    fn decide(&mut self, observation: &Observation) -> Result<f32, BrainError>;
}

impl<F> Brain for F
where
    F: FnMut(&Observation) -> Result<f32, BrainError>,
{
    fn decide(&mut self, observation: &Observation) -> Result<f32, BrainError> {
        self(observation)
    }
}

/// Always answers the same value.
#[derive(Debug, Clone, Copy)]
pub struct Constant(pub f32);

impl Brain for Constant {
    fn decide(&mut self, _observation: &Observation) -> Result<f32, BrainError> {
        Ok(self.0)
    }
}

/// One brain and its fitness slot, lent to an episode.
pub struct Entrant<'a> {
    pub brain: &'a mut dyn Brain,
    pub fitness: &'a mut f64,
}

impl<'a> Entrant<'a> {
    pub fn new(brain: &'a mut dyn Brain, fitness: &'a mut f64) -> Self {
        Self { brain, fitness }
    }
}

/// Runs one episode over a generation's entrants.
pub type EpisodeFn<'f> =
    dyn for<'e> FnMut(Vec<Entrant<'e>>) -> Result<EpisodeReport, SimError> + 'f;

/// Capability interface of the external optimizer.
pub trait Optimizer {
    /// Lend the current generation to `episode`, then breed the next one from the
    /// fitness values it wrote.
    fn evaluate_generation(&mut self, episode: &mut EpisodeFn<'_>) -> Result<EpisodeReport, SimError>;

    fn is_complete(&self) -> bool;
}
