//! Game-level error type

use platform_engine::config::ConfigError;
use platform_engine::ecs::ComponentError;
use platform_engine::physics::PhysicsError;

/// Anything that can go wrong while building or running the game
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// Object assembly failed
    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    /// Body or shape creation failed
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    /// Configuration could not be read or written
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result alias for game operations
pub type GameResult<T> = Result<T, GameError>;
