use super::config::ConfigError;
use crate::core::io::error::ParseError;
use crate::core::models::trajectory::TrajectoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Trajectory(#[from] TrajectoryError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
