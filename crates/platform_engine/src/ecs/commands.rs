//! Deferred structural changes to the scene

use super::game_object::{GameObject, GameObjectId};
use std::collections::VecDeque;

/// A structural change requested during a tick
#[derive(Debug)]
pub enum WorldCommand {
    /// Insert and initialize a new object
    Spawn(GameObject),
    /// Mark an object removed; it is swept in the same flush
    Remove(GameObjectId),
}

/// FIFO queue of [`WorldCommand`]s, applied by [`Scene::flush`](super::Scene::flush);
/// removals are also marked right after the physics step
#[derive(Debug, Default)]
pub struct WorldCommands {
    queue: VecDeque<WorldCommand>,
}

impl WorldCommands {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a new object
    pub fn spawn(&mut self, object: GameObject) {
        self.queue.push_back(WorldCommand::Spawn(object));
    }

    /// Request removal of an object; unknown ids are ignored at flush
    pub fn remove(&mut self, id: GameObjectId) {
        self.queue.push_back(WorldCommand::Remove(id));
    }

    /// Number of pending commands
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True when nothing is pending
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pending spawn requests
    pub fn pending_spawns(&self) -> usize {
        self.queue
            .iter()
            .filter(|command| matches!(command, WorldCommand::Spawn(_)))
            .count()
    }

    /// Drain pending removals, leaving spawn requests queued in order
    pub(crate) fn take_removals(&mut self) -> Vec<GameObjectId> {
        let mut removals = Vec::new();
        self.queue.retain(|command| match command {
            WorldCommand::Remove(id) => {
                removals.push(*id);
                false
            }
            WorldCommand::Spawn(_) => true,
        });
        removals
    }

    pub(crate) fn pop(&mut self) -> Option<WorldCommand> {
        self.queue.pop_front()
    }
}
