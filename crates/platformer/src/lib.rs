//! # Platformer
//!
//! A physics-driven 2D platformer built on `platform_engine`: a player who
//! walks, wall-slides, wall-kicks and shoots, crates to push around, and
//! enemies that keep spawning and marching right.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod behaviour;
pub mod config;
pub mod error;
pub mod level;
pub mod movement;
pub mod player;
pub mod projectile;
pub mod sprite;
pub mod trail;
pub mod world;

pub use config::{GameConfig, CONFIG_PATH};
pub use error::{GameError, GameResult};
pub use world::GameWorld;
