//! Engine-level configuration

use crate::foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// Core engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,

    /// Fixed simulation ticks per second
    pub tick_rate: u32,

    /// Start with the physics debug overlay enabled
    pub debug_draw: bool,

    /// Physics world settings
    pub physics: PhysicsConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            tick_rate: 60,
            debug_draw: false,
            physics: PhysicsConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Length of one fixed tick in seconds
    pub fn tick_duration(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}

impl super::Config for EngineConfig {}

/// Physics world configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity vector; positive y pulls down
    pub gravity: Vec2,

    /// Solver sub-steps per world step
    pub sub_steps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, 10.0),
            sub_steps: 4,
        }
    }
}
