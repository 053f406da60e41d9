use std::path::PathBuf;
use thiserror::Error;

/// Error type returned by decision functions. Owned by whoever implements the brain.
pub type BrainError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while loading or validating a [`SimConfig`](crate::SimConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Errors that end an episode early.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("decision function for agent {agent} failed")]
    Decision {
        agent: usize,
        #[source]
        source: BrainError,
    },
}
