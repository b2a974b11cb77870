//! Per-tick context handed to component hooks

use super::commands::WorldCommands;
use crate::input::InputState;
use crate::physics::PhysicsSystem;

/// Timing of the tick being processed
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tick {
    /// Seconds covered by this tick
    pub delta_time: f32,
    /// Simulated time at the end of this tick
    pub time: f32,
}

impl Tick {
    /// Create a tick record
    pub fn new(delta_time: f32, time: f32) -> Self {
        Self { delta_time, time }
    }
}

/// Everything a component may touch besides its own GameObject
pub struct GameContext<'a> {
    /// Physics world
    pub physics: &'a mut PhysicsSystem,
    /// Input snapshot for this tick
    pub input: &'a InputState,
    /// Deferred spawn/remove requests
    pub commands: &'a mut WorldCommands,
    /// Tick timing
    pub tick: Tick,
}

impl<'a> GameContext<'a> {
    /// Assemble a context
    pub fn new(
        physics: &'a mut PhysicsSystem,
        input: &'a InputState,
        commands: &'a mut WorldCommands,
        tick: Tick,
    ) -> Self {
        Self {
            physics,
            input,
            commands,
            tick,
        }
    }
}
