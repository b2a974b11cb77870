//! Physics system: steps the engine and dispatches its events
//!
//! Dispatch order after each step:
//! 1. sensor begin-touch, 2. sensor end-touch, 3. body moves,
//! 4. solid contact begin/end.
//! Events are resolved body -> owner id -> live GameObject; anything that
//! does not resolve (static level geometry, swept objects) is dropped.

use super::body::{Collision, PhysicsBodyComponent};
use super::debug::{self, DebugDrawFlags};
use super::engine::{BodyDef, BodyHandle, ContactEvent, PhysicsEngine, ShapeHandle};
use super::rapier::RapierEngine;
use super::scripted::ScriptedEngine;
use super::PhysicsError;
use crate::config::PhysicsConfig;
use crate::ecs::{GameObject, GameObjectId, GameObjects, WorldCommands};
use crate::render::RenderContext;
use std::collections::HashMap;

/// Builds a fresh engine for [`PhysicsSystem::init`]
pub type EngineFactory = Box<dyn Fn(&PhysicsConfig) -> Box<dyn PhysicsEngine>>;

/// Counts from the most recent [`PhysicsSystem::update`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Sensor begin-touches delivered
    pub sensor_begins: usize,
    /// Sensor end-touches delivered
    pub sensor_ends: usize,
    /// Move events delivered
    pub moves: usize,
    /// Contact begin/end pairs delivered
    pub contacts: usize,
    /// Events without a live owner
    pub dropped: usize,
}

/// Owner of the physics world
pub struct PhysicsSystem {
    config: PhysicsConfig,
    factory: EngineFactory,
    engine: Option<Box<dyn PhysicsEngine>>,
    owners: HashMap<BodyHandle, GameObjectId>,
    debug_flags: DebugDrawFlags,
    last_dispatch: DispatchStats,
}

impl std::fmt::Debug for PhysicsSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsSystem")
            .field("config", &self.config)
            .field("initialized", &self.engine.is_some())
            .field("owners", &self.owners.len())
            .field("debug_flags", &self.debug_flags)
            .finish_non_exhaustive()
    }
}

impl PhysicsSystem {
    /// Physics backed by rapier2d
    pub fn new(config: PhysicsConfig) -> Self {
        Self::with_factory(
            config,
            Box::new(|config: &PhysicsConfig| Box::new(RapierEngine::new(config.gravity)) as Box<dyn PhysicsEngine>),
        )
    }

    /// Physics backed by the deterministic [`ScriptedEngine`]
    pub fn scripted(config: PhysicsConfig) -> Self {
        Self::with_factory(
            config,
            Box::new(|config: &PhysicsConfig| Box::new(ScriptedEngine::new(config.gravity)) as Box<dyn PhysicsEngine>),
        )
    }

    /// Physics backed by any engine
    pub fn with_factory(config: PhysicsConfig, factory: EngineFactory) -> Self {
        Self {
            config,
            factory,
            engine: None,
            owners: HashMap::new(),
            debug_flags: DebugDrawFlags::empty(),
            last_dispatch: DispatchStats::default(),
        }
    }

    /// Create the physics world, destroying any previous one
    pub fn init(&mut self) {
        if self.engine.take().is_some() {
            log::info!("Re-initializing physics world");
        }
        self.owners.clear();
        self.engine = Some((self.factory)(&self.config));
        log::info!(
            "Physics world created (gravity {:?}, {} sub-steps)",
            self.config.gravity,
            self.config.sub_steps
        );
    }

    /// Destroy the physics world
    pub fn shutdown(&mut self) {
        self.engine = None;
        self.owners.clear();
    }

    /// True between `init` and `shutdown`
    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    /// Active configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// The engine, once initialized
    pub fn engine(&self) -> Option<&dyn PhysicsEngine> {
        self.engine.as_deref()
    }

    /// The engine mutably, once initialized
    pub fn engine_mut(&mut self) -> Option<&mut dyn PhysicsEngine> {
        self.engine.as_deref_mut()
    }

    /// The engine as its concrete type
    pub fn engine_as<E: PhysicsEngine>(&self) -> Option<&E> {
        self.engine.as_deref()?.as_any().downcast_ref::<E>()
    }

    /// The engine as its concrete type, mutably
    pub fn engine_as_mut<E: PhysicsEngine>(&mut self) -> Option<&mut E> {
        self.engine.as_deref_mut()?.as_any_mut().downcast_mut::<E>()
    }

    /// Allocate a body and wrap it in a component
    pub fn create_body(&mut self, def: BodyDef) -> Result<PhysicsBodyComponent, PhysicsError> {
        let engine = self.engine.as_deref_mut().ok_or(PhysicsError::NotInitialized)?;
        Ok(PhysicsBodyComponent::new(engine.create_body(&def)))
    }

    /// Release a body and forget its owner
    pub fn destroy_body(&mut self, body: BodyHandle) {
        self.owners.remove(&body);
        if let Some(engine) = self.engine.as_deref_mut() {
            engine.destroy_body(body);
        }
    }

    /// Route this body's events to `owner`
    pub fn bind_owner(&mut self, body: BodyHandle, owner: GameObjectId) {
        self.owners.insert(body, owner);
    }

    /// Owner of a body
    pub fn owner_of(&self, body: BodyHandle) -> Option<GameObjectId> {
        self.owners.get(&body).copied()
    }

    /// Owner of the body a shape is attached to
    pub fn owner_of_shape(&self, shape: ShapeHandle) -> Option<GameObjectId> {
        let body = self.engine.as_deref()?.shape_body(shape)?;
        self.owner_of(body)
    }

    /// Counts from the last update
    pub fn last_dispatch(&self) -> DispatchStats {
        self.last_dispatch
    }

    /// Current debug overlay selection
    pub fn debug_draw(&self) -> DebugDrawFlags {
        self.debug_flags
    }

    /// Select what the debug overlay draws
    pub fn set_debug_draw(&mut self, flags: DebugDrawFlags) {
        self.debug_flags = flags;
    }

    /// Switch the debug overlay between off and everything
    pub fn toggle_debug_draw(&mut self) {
        self.debug_flags = if self.debug_flags.is_empty() {
            DebugDrawFlags::all()
        } else {
            DebugDrawFlags::empty()
        };
        log::info!("Physics debug draw {:?}", self.debug_flags);
    }

    /// Draw the debug overlay in world space
    pub fn render_debug(&self, ctx: &mut dyn RenderContext) {
        if let Some(engine) = self.engine.as_deref() {
            debug::draw_shapes(engine, self.debug_flags, ctx);
        }
    }

    /// Step the world by `delta_time` and dispatch the resulting events
    pub fn update(
        &mut self,
        delta_time: f32,
        objects: &mut GameObjects,
        commands: &mut WorldCommands,
    ) {
        let Some(engine) = self.engine.as_deref_mut() else {
            log::warn!("Physics update before init");
            return;
        };
        engine.step(delta_time, self.config.sub_steps);
        let sensor_begins = engine.drain_sensor_begin_events();
        let sensor_ends = engine.drain_sensor_end_events();
        let moves = engine.drain_move_events();
        let contacts_began = engine.drain_body_begin_events();
        let contacts_ended = engine.drain_body_end_events();

        let mut stats = DispatchStats::default();

        for event in &sensor_begins {
            let delivered = self
                .sensor_owner(objects, event.sensor)
                .is_some_and(|body| body.sensor_began(event.sensor));
            count(&mut stats.sensor_begins, &mut stats.dropped, delivered);
        }

        for event in &sensor_ends {
            let delivered = self
                .sensor_owner(objects, event.sensor)
                .is_some_and(|body| body.sensor_ended(event.sensor));
            count(&mut stats.sensor_ends, &mut stats.dropped, delivered);
        }

        for event in &moves {
            let delivered = self
                .owner_of(event.body)
                .and_then(|id| objects.get_mut(id))
                .and_then(GameObject::split_mut::<PhysicsBodyComponent>)
                .map(|(transform, body)| body.on_move(transform, event.position, event.rotation))
                .is_some();
            count(&mut stats.moves, &mut stats.dropped, delivered);
        }

        for event in &contacts_began {
            let delivered = self.dispatch_contact(objects, commands, event, true);
            count(&mut stats.contacts, &mut stats.dropped, delivered);
        }

        for event in &contacts_ended {
            let delivered = self.dispatch_contact(objects, commands, event, false);
            count(&mut stats.contacts, &mut stats.dropped, delivered);
        }

        log::trace!("Physics dispatch: {:?}", stats);
        self.last_dispatch = stats;
    }

    fn sensor_owner<'o>(
        &self,
        objects: &'o mut GameObjects,
        sensor: ShapeHandle,
    ) -> Option<&'o mut PhysicsBodyComponent> {
        let id = self.owner_of_shape(sensor)?;
        objects.get_mut(id)?.get_mut::<PhysicsBodyComponent>()
    }

    fn dispatch_contact(
        &self,
        objects: &mut GameObjects,
        commands: &mut WorldCommands,
        event: &ContactEvent,
        began: bool,
    ) -> bool {
        let (Some(a), Some(b)) = (
            self.owner_of_shape(event.shape_a),
            self.owner_of_shape(event.shape_b),
        ) else {
            return false;
        };
        let Some((first, second)) = objects.get_pair_mut(a, b) else {
            return false;
        };
        notify(first, a, second, b, commands, began);
        notify(second, b, first, a, commands, began);
        true
    }
}

fn count(delivered_count: &mut usize, dropped: &mut usize, delivered: bool) {
    if delivered {
        *delivered_count += 1;
    } else {
        *dropped += 1;
    }
}

fn notify(
    object: &mut GameObject,
    this: GameObjectId,
    other_object: &GameObject,
    other: GameObjectId,
    commands: &mut WorldCommands,
    began: bool,
) {
    let Some(body) = object.get_mut::<PhysicsBodyComponent>() else {
        return;
    };
    let collision = Collision {
        this,
        other,
        other_object,
    };
    if began {
        body.collision_began(&collision, commands);
    } else {
        body.collision_ended(&collision, commands);
    }
}
