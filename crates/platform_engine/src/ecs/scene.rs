//! Scene: the live GameObject collection and its tick phases
//!
//! Each tick runs [`Scene::step_physics`], which also marks every object a
//! collision listener asked to remove, then [`Scene::update`] over every
//! initialized object still live, then [`Scene::flush`] applies queued
//! commands: removals are marked, spawns are inserted and initialized, and
//! finally every removed object is deinitialized and erased.

use super::commands::{WorldCommand, WorldCommands};
use super::context::{GameContext, Tick};
use super::game_object::{GameObject, GameObjectId};
use super::objects::GameObjects;
use crate::input::InputState;
use crate::physics::PhysicsSystem;
use crate::render::RenderContext;

/// Counts of what a flush changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Objects inserted and initialized
    pub spawned: usize,
    /// Objects deinitialized and erased
    pub removed: usize,
}

/// Owner of all live GameObjects
#[derive(Debug, Default)]
pub struct Scene {
    objects: GameObjects,
    commands: WorldCommands,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Live objects
    pub fn objects(&self) -> &GameObjects {
        &self.objects
    }

    /// Live objects, mutably
    pub fn objects_mut(&mut self) -> &mut GameObjects {
        &mut self.objects
    }

    /// Pending commands
    pub fn commands(&self) -> &WorldCommands {
        &self.commands
    }

    /// Pending commands, mutably
    pub fn commands_mut(&mut self) -> &mut WorldCommands {
        &mut self.commands
    }

    /// Number of objects in the collection
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True when the scene holds no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Insert and initialize an object immediately (level construction)
    pub fn insert(
        &mut self,
        object: GameObject,
        physics: &mut PhysicsSystem,
        input: &InputState,
        tick: Tick,
    ) -> GameObjectId {
        let id = self.objects.insert(object);
        let mut ctx = GameContext::new(physics, input, &mut self.commands, tick);
        if let Some(object) = self.objects.get_mut(id) {
            object.init(&mut ctx);
        }
        id
    }

    /// Queue an object for insertion at the next flush
    pub fn spawn(&mut self, object: GameObject) {
        self.commands.spawn(object);
    }

    /// Step physics and dispatch its events into this scene's objects.
    ///
    /// Removals queued by collision listeners are marked before returning, so
    /// those objects are not updated this tick.
    pub fn step_physics(&mut self, physics: &mut PhysicsSystem, delta_time: f32) {
        physics.update(delta_time, &mut self.objects, &mut self.commands);
        let marked = self.apply_removals();
        if marked > 0 {
            log::trace!("{} objects removed by physics events", marked);
        }
    }

    /// Mark every object named by a queued removal; spawns stay queued.
    ///
    /// Returns how many live objects were newly marked.
    pub fn apply_removals(&mut self) -> usize {
        let mut marked = 0;
        for id in self.commands.take_removals() {
            if let Some(object) = self.objects.get_mut(id) {
                if !object.is_removed() {
                    object.remove();
                    marked += 1;
                }
            }
        }
        marked
    }

    /// Update every initialized, non-removed object in insertion order
    pub fn update(&mut self, physics: &mut PhysicsSystem, input: &InputState, tick: Tick) {
        let mut ctx = GameContext::new(physics, input, &mut self.commands, tick);
        self.objects.for_each_ordered(|object| object.update(&mut ctx));
    }

    /// Apply queued commands, then sweep removed objects
    pub fn flush(
        &mut self,
        physics: &mut PhysicsSystem,
        input: &InputState,
        tick: Tick,
    ) -> FlushReport {
        let mut report = FlushReport::default();

        while let Some(command) = self.commands.pop() {
            match command {
                WorldCommand::Remove(id) => {
                    if let Some(object) = self.objects.get_mut(id) {
                        object.remove();
                    }
                }
                WorldCommand::Spawn(object) => {
                    let id = self.objects.insert(object);
                    let mut ctx = GameContext::new(physics, input, &mut self.commands, tick);
                    if let Some(object) = self.objects.get_mut(id) {
                        log::debug!("Spawned '{}'", object.name());
                        object.init(&mut ctx);
                    }
                    report.spawned += 1;
                }
            }
        }

        for id in self.objects.removed_ids() {
            if let Some(mut object) = self.objects.take(id) {
                let mut ctx = GameContext::new(physics, input, &mut self.commands, tick);
                object.deinit(&mut ctx);
                log::debug!("Removed '{}'", object.name());
                report.removed += 1;
            }
        }

        if report != FlushReport::default() {
            log::trace!("Flush: {:?}", report);
        }
        report
    }

    /// Render every live object in insertion order
    pub fn render(&self, ctx: &mut dyn RenderContext) {
        for object in self.objects.iter().filter(|object| !object.is_removed()) {
            object.render(ctx);
        }
    }

    /// Deinitialize and drop every object
    pub fn clear(&mut self, physics: &mut PhysicsSystem, input: &InputState, tick: Tick) {
        for id in self.objects.ids().to_vec() {
            if let Some(mut object) = self.objects.take(id) {
                let mut ctx = GameContext::new(physics, input, &mut self.commands, tick);
                object.deinit(&mut ctx);
            }
        }
        let dropped = self.commands.len();
        while self.commands.pop().is_some() {}
        if dropped > 0 {
            log::debug!("Dropped {} pending commands on clear", dropped);
        }
    }
}
