//! Component binding a GameObject to one physics body

use super::engine::{BodyHandle, Geometry, ShapeDef, ShapeHandle};
use super::sensor::Sensor;
use super::system::PhysicsSystem;
use super::PhysicsError;
use crate::ecs::{Component, GameContext, GameObject, GameObjectId, WorldCommands};
use crate::foundation::math::{Transform, Vec2};
use std::collections::HashMap;

/// The two objects involved in a contact, seen from one side
pub struct Collision<'a> {
    /// Object owning the listener
    pub this: GameObjectId,
    /// Object on the other side of the contact
    pub other: GameObjectId,
    /// The other object itself
    pub other_object: &'a GameObject,
}

/// Callback run when a solid contact begins or ends
pub type CollisionListener = Box<dyn FnMut(&Collision<'_>, &mut WorldCommands)>;

/// Owns one physics body and the sensors attached to it.
///
/// Created by [`PhysicsSystem::create_body`]. The body is bound to its
/// GameObject on `init` and released on `deinit`.
pub struct PhysicsBodyComponent {
    body: Option<BodyHandle>,
    shapes: Vec<ShapeHandle>,
    friction_shape: Option<ShapeHandle>,
    sensors: HashMap<ShapeHandle, Sensor>,
    began_listeners: Vec<CollisionListener>,
    ended_listeners: Vec<CollisionListener>,
}

impl std::fmt::Debug for PhysicsBodyComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsBodyComponent")
            .field("body", &self.body)
            .field("shapes", &self.shapes)
            .field("sensors", &self.sensors)
            .field("began_listeners", &self.began_listeners.len())
            .field("ended_listeners", &self.ended_listeners.len())
            .finish_non_exhaustive()
    }
}

impl PhysicsBodyComponent {
    pub(crate) fn new(body: BodyHandle) -> Self {
        Self {
            body: Some(body),
            shapes: Vec::new(),
            friction_shape: None,
            sensors: HashMap::new(),
            began_listeners: Vec::new(),
            ended_listeners: Vec::new(),
        }
    }

    /// Engine body, `None` once released
    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    /// Shapes attached through this component, in creation order
    pub fn shapes(&self) -> &[ShapeHandle] {
        &self.shapes
    }

    /// Attach a shape to the body.
    ///
    /// Sensor shapes get a zeroed occupancy counter. The first solid shape
    /// becomes the friction-bearing shape.
    pub fn add_shape(
        &mut self,
        physics: &mut PhysicsSystem,
        def: &ShapeDef,
        geometry: &Geometry,
    ) -> Result<ShapeHandle, PhysicsError> {
        let body = self.body.ok_or(PhysicsError::BodyReleased)?;
        let engine = physics.engine_mut().ok_or(PhysicsError::NotInitialized)?;
        let shape = engine
            .create_shape(body, def, geometry)
            .ok_or(PhysicsError::UnknownBody(body))?;

        self.shapes.push(shape);
        if def.is_sensor {
            self.sensors.insert(shape, Sensor::new());
        } else if self.friction_shape.is_none() {
            self.friction_shape = Some(shape);
        }
        Ok(shape)
    }

    /// Write an engine-reported pose into the owner's transform
    pub fn on_move(&self, transform: &mut Transform, position: Vec2, rotation: f32) {
        transform.position = position;
        transform.rotation = rotation;
    }

    /// Accumulate a force for the next step
    pub fn apply_force(&self, physics: &mut PhysicsSystem, force: Vec2) {
        if let (Some(body), Some(engine)) = (self.body, physics.engine_mut()) {
            engine.apply_force(body, force);
        }
    }

    /// Apply an impulse immediately
    pub fn apply_impulse(&self, physics: &mut PhysicsSystem, impulse: Vec2) {
        if let (Some(body), Some(engine)) = (self.body, physics.engine_mut()) {
            engine.apply_impulse(body, impulse);
        }
    }

    /// Linear velocity, zero when released
    pub fn linear_velocity(&self, physics: &PhysicsSystem) -> Vec2 {
        match (self.body, physics.engine()) {
            (Some(body), Some(engine)) => engine.linear_velocity(body),
            _ => Vec2::zeros(),
        }
    }

    /// Body mass, zero when released
    pub fn mass(&self, physics: &PhysicsSystem) -> f32 {
        match (self.body, physics.engine()) {
            (Some(body), Some(engine)) => engine.mass(body),
            _ => 0.0,
        }
    }

    /// Friction of the friction-bearing shape
    pub fn friction(&self, physics: &PhysicsSystem) -> Option<f32> {
        let shape = self.friction_shape?;
        physics.engine().map(|engine| engine.friction(shape))
    }

    /// Set friction on the friction-bearing shape
    pub fn set_friction(&self, physics: &mut PhysicsSystem, friction: f32) {
        if let (Some(shape), Some(engine)) = (self.friction_shape, physics.engine_mut()) {
            engine.set_friction(shape, friction);
        }
    }

    /// Teleport the body
    pub fn set_transform(&self, physics: &mut PhysicsSystem, position: Vec2, rotation: f32) {
        if let (Some(body), Some(engine)) = (self.body, physics.engine_mut()) {
            engine.set_transform(body, position, rotation);
        }
    }

    /// True while the sensor shape overlaps something; false for shapes
    /// that are not registered sensors of this body
    pub fn is_sensor_in_collision(&self, shape: ShapeHandle) -> bool {
        self.sensors.get(&shape).is_some_and(Sensor::in_collision)
    }

    /// Occupancy counter of a registered sensor
    pub fn sensor(&self, shape: ShapeHandle) -> Option<&Sensor> {
        self.sensors.get(&shape)
    }

    /// Replace every contact-began listener with `listener`
    pub fn set_collision_listener(
        &mut self,
        listener: impl FnMut(&Collision<'_>, &mut WorldCommands) + 'static,
    ) {
        self.began_listeners.clear();
        self.began_listeners.push(Box::new(listener));
    }

    /// Add a contact-began listener
    pub fn add_collision_listener(
        &mut self,
        listener: impl FnMut(&Collision<'_>, &mut WorldCommands) + 'static,
    ) {
        self.began_listeners.push(Box::new(listener));
    }

    /// Add a contact-ended listener
    pub fn add_collision_end_listener(
        &mut self,
        listener: impl FnMut(&Collision<'_>, &mut WorldCommands) + 'static,
    ) {
        self.ended_listeners.push(Box::new(listener));
    }

    pub(crate) fn sensor_began(&mut self, shape: ShapeHandle) -> bool {
        self.sensors.get_mut(&shape).map(Sensor::begin_touch).is_some()
    }

    pub(crate) fn sensor_ended(&mut self, shape: ShapeHandle) -> bool {
        self.sensors.get_mut(&shape).map(Sensor::end_touch).is_some()
    }

    pub(crate) fn collision_began(&mut self, collision: &Collision<'_>, commands: &mut WorldCommands) {
        for listener in &mut self.began_listeners {
            listener(collision, commands);
        }
    }

    pub(crate) fn collision_ended(&mut self, collision: &Collision<'_>, commands: &mut WorldCommands) {
        for listener in &mut self.ended_listeners {
            listener(collision, commands);
        }
    }
}

impl Component for PhysicsBodyComponent {
    fn init(&mut self, object: &mut GameObject, ctx: &mut GameContext<'_>) {
        let (Some(body), Some(id)) = (self.body, object.id()) else {
            log::warn!("Physics body on '{}' initialized outside a scene", object.name());
            return;
        };
        ctx.physics.bind_owner(body, id);
        if let Some((position, rotation)) = ctx.physics.engine().and_then(|engine| engine.body_position(body)) {
            self.on_move(object.transform_mut(), position, rotation);
        }
    }

    fn deinit(&mut self, _object: &mut GameObject, ctx: &mut GameContext<'_>) {
        if let Some(body) = self.body.take() {
            ctx.physics.destroy_body(body);
        }
        self.sensors.clear();
        self.friction_shape = None;
    }
}
