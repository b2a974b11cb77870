//! Game configuration
//!
//! Every gameplay constant lives here with its default value. A
//! `platformer.toml` next to the binary overrides any subset of them.

use crate::movement::MovementTuning;
use platform_engine::config::{Config, EngineConfig};
use platform_engine::foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// File the binary reads its configuration from
pub const CONFIG_PATH: &str = "platformer.toml";

/// Complete game configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Engine settings (logging, tick rate, physics)
    pub engine: EngineConfig,

    /// Character movement tuning
    pub movement: MovementTuning,

    /// World rules: wraparound, enemy spawning, camera
    pub world: WorldConfig,

    /// Projectile settings
    pub projectile: ProjectileConfig,
}

impl Config for GameConfig {}

/// World rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Objects below this height wrap back to the top
    pub wrap_threshold: f32,

    /// Distance subtracted from y when wrapping
    pub wrap_offset: f32,

    /// Column (x) wrapped objects re-enter at
    pub reentry_column: f32,

    /// Simulated time of the first enemy spawn (seconds)
    pub first_spawn: f32,

    /// Seconds between enemy spawns
    pub spawn_interval: f32,

    /// No enemy spawns while this many enemies are alive.
    ///
    /// Counts live target objects only; level geometry, crates, the player
    /// and projectiles are not included.
    pub max_enemies: usize,

    /// Where enemies appear
    pub spawn_point: Vec2,

    /// Where the player starts
    pub player_start: Vec2,

    /// World units the camera fits into the window (square)
    pub view_size: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            wrap_threshold: 16.0,
            wrap_offset: 16.0,
            reentry_column: 2.0,
            first_spawn: 2.0,
            spawn_interval: 2.0,
            max_enemies: 15,
            spawn_point: Vec2::new(2.5, 0.5),
            player_start: Vec2::new(7.5, 14.5),
            view_size: 16.0,
        }
    }
}

/// Projectile settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Collision radius
    pub radius: f32,

    /// Shape density
    pub density: f32,

    /// Horizontal force applied on the first step
    pub launch_force: f32,

    /// Distance ahead of the shooter the projectile appears
    pub spawn_offset: f32,

    /// Seconds before an unspent projectile removes itself
    pub lifetime: f32,

    /// Draw a fading trail behind projectiles
    pub trail: bool,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            radius: 0.1,
            density: 1.0,
            launch_force: 20.0,
            spawn_offset: 1.0,
            lifetime: 3.0,
            trail: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_match_gameplay_constants() {
        let config = GameConfig::default();
        assert_relative_eq!(config.world.wrap_threshold, 16.0);
        assert_relative_eq!(config.world.reentry_column, 2.0);
        assert_relative_eq!(config.world.first_spawn, 2.0);
        assert_eq!(config.world.max_enemies, 15);
        assert_relative_eq!(config.movement.max_velocity, 5.0);
        assert_eq!(config.movement.jump_ticks, 3);
        assert_eq!(config.engine.physics.sub_steps, 4);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: GameConfig = toml::from_str(
            r#"
            [world]
            spawn_interval = 5.0

            [movement]
            max_velocity = 7.5
            "#,
        )
        .unwrap();

        assert_relative_eq!(config.world.spawn_interval, 5.0);
        assert_relative_eq!(config.world.first_spawn, 2.0);
        assert_relative_eq!(config.movement.max_velocity, 7.5);
        assert_relative_eq!(config.movement.move_force, 50.0);
        assert_eq!(config.projectile, ProjectileConfig::default());
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let path = std::env::temp_dir().join("platformer_missing_config.toml");
        let _ = std::fs::remove_file(&path);
        let config = GameConfig::load_or_default(&path).unwrap();
        assert_eq!(config, GameConfig::default());
    }
}
