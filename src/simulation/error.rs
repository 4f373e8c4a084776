//! Error types for configuration and simulation I/O.

use thiserror::Error;

/// A parameter set that does not describe a playable world.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid parameter `{field}`: {reason}")]
pub struct ConfigError {
    /// Name of the offending parameter.
    pub field: &'static str,
    /// Why the value was rejected.
    pub reason: &'static str,
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self { field, reason }
    }
}

/// Errors surfaced by the simulation library.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Rejected parameters.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A generation was started without any controllers.
    #[error("a generation needs at least one controller")]
    EmptyPopulation,
    /// Reading or writing a file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Encoding or decoding JSON failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
