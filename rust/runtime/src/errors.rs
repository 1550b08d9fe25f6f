use felt_engine::errors::GameError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Table runtime has been disposed")]
    Disposed,

    #[error("Table runtime is no longer running")]
    Closed,
}

impl RuntimeError {
    /// Whether the request was rejected by the engine and can be retried
    /// with a different action.
    pub fn is_rejection(&self) -> bool {
        matches!(self, RuntimeError::Game(e) if !e.is_fatal())
    }
}
