//! Flappy-bird world used as a fitness environment for neuroevolution.
//!
//! The crate simulates birds and pipes tick by tick, asks each bird's
//! [`Brain`] whether to jump, and writes fitness back to slots owned by an
//! external [`Optimizer`].

pub mod base;
pub mod bird;
pub mod brain;
pub mod collision;
pub mod config;
pub mod episode;
pub mod error;
pub mod mask;
pub mod pipe;
pub mod population;
pub mod render;
pub mod sprites;
pub mod trainer;
pub mod world;

pub use brain::{Brain, Constant, Entrant, Observation, Optimizer};
pub use config::SimConfig;
pub use episode::{Control, EpisodeReport, NullHook, RenderHook, run_episode};
pub use error::{BrainError, ConfigError, SimError};
pub use sprites::SpriteSheet;
pub use trainer::{Trainer, TrainingSummary};
pub use world::{AgentSummary, Fate, World};
