use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::game::GameError;

/// Failures that stop the binary before or outside a game session.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}
