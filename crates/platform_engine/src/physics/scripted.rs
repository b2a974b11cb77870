//! Deterministic in-memory [`PhysicsEngine`]
//!
//! Integrates forces and gravity with explicit Euler steps and never detects
//! collisions. Contact and sensor events are injected by the caller, which
//! makes controller and dispatch behavior reproducible in tests and tools.

use super::engine::{
    BodyDef, BodyHandle, BodyType, ContactEvent, DebugShape, Geometry, MoveEvent, PhysicsEngine,
    SensorEvent, ShapeDef, ShapeHandle,
};
use crate::foundation::math::{constants::EPSILON, Vec2};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct ScriptedBody {
    def: BodyDef,
    position: Vec2,
    rotation: f32,
    velocity: Vec2,
    mass: f32,
    force: Vec2,
}

#[derive(Debug, Clone)]
struct ScriptedShape {
    body: BodyHandle,
    def: ShapeDef,
    geometry: Geometry,
}

/// Scripted physics world
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    gravity: Vec2,
    next_id: u64,
    bodies: BTreeMap<BodyHandle, ScriptedBody>,
    shapes: BTreeMap<ShapeHandle, ScriptedShape>,
    forces: Vec<(BodyHandle, Vec2)>,
    pending_sensor_begin: Vec<SensorEvent>,
    pending_sensor_end: Vec<SensorEvent>,
    pending_body_begin: Vec<ContactEvent>,
    pending_body_end: Vec<ContactEvent>,
    move_events: Vec<MoveEvent>,
    sensor_begin_events: Vec<SensorEvent>,
    sensor_end_events: Vec<SensorEvent>,
    body_begin_events: Vec<ContactEvent>,
    body_end_events: Vec<ContactEvent>,
}

impl ScriptedEngine {
    /// Create an empty world with the given gravity
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            ..Self::default()
        }
    }

    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Overwrite a body's velocity
    pub fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(&body) {
            body.velocity = velocity;
        }
    }

    /// Queue a sensor begin-touch for the next step
    pub fn push_sensor_begin(&mut self, sensor: ShapeHandle, visitor: ShapeHandle) {
        self.pending_sensor_begin.push(SensorEvent { sensor, visitor });
    }

    /// Queue a sensor end-touch for the next step
    pub fn push_sensor_end(&mut self, sensor: ShapeHandle, visitor: ShapeHandle) {
        self.pending_sensor_end.push(SensorEvent { sensor, visitor });
    }

    /// Queue a solid begin-touch for the next step
    pub fn push_body_begin(&mut self, shape_a: ShapeHandle, shape_b: ShapeHandle) {
        self.pending_body_begin.push(ContactEvent { shape_a, shape_b });
    }

    /// Queue a solid end-touch for the next step
    pub fn push_body_end(&mut self, shape_a: ShapeHandle, shape_b: ShapeHandle) {
        self.pending_body_end.push(ContactEvent { shape_a, shape_b });
    }

    /// Every force applied since the last [`Self::clear_force_log`]
    pub fn force_log(&self) -> &[(BodyHandle, Vec2)] {
        &self.forces
    }

    /// Forces applied to one body since the last clear
    pub fn forces_on(&self, body: BodyHandle) -> Vec<Vec2> {
        self.forces
            .iter()
            .filter(|(target, _)| *target == body)
            .map(|(_, force)| *force)
            .collect()
    }

    /// Forget logged forces
    pub fn clear_force_log(&mut self) {
        self.forces.clear();
    }

    /// Shapes attached to a body, in creation order
    pub fn shapes_of(&self, body: BodyHandle) -> Vec<ShapeHandle> {
        self.shapes
            .iter()
            .filter(|(_, shape)| shape.body == body)
            .map(|(handle, _)| *handle)
            .collect()
    }

    /// Whether a shape was created as a sensor
    pub fn is_sensor(&self, shape: ShapeHandle) -> bool {
        self.shapes.get(&shape).is_some_and(|shape| shape.def.is_sensor)
    }

    fn recompute_mass(&mut self, body: BodyHandle) {
        let mass = self
            .shapes
            .values()
            .filter(|shape| shape.body == body && !shape.def.is_sensor)
            .map(|shape| shape.def.density * shape.geometry.area())
            .sum();
        if let Some(body) = self.bodies.get_mut(&body) {
            body.mass = mass;
        }
    }
}

impl PhysicsEngine for ScriptedEngine {
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle {
        let handle = BodyHandle(self.allocate());
        self.bodies.insert(
            handle,
            ScriptedBody {
                def: *def,
                position: def.position,
                rotation: def.rotation,
                velocity: Vec2::zeros(),
                mass: 0.0,
                force: Vec2::zeros(),
            },
        );
        handle
    }

    fn destroy_body(&mut self, body: BodyHandle) {
        if self.bodies.remove(&body).is_some() {
            self.shapes.retain(|_, shape| shape.body != body);
        }
    }

    fn create_shape(
        &mut self,
        body: BodyHandle,
        def: &ShapeDef,
        geometry: &Geometry,
    ) -> Option<ShapeHandle> {
        if !self.bodies.contains_key(&body) {
            return None;
        }
        let handle = ShapeHandle(self.allocate());
        self.shapes.insert(
            handle,
            ScriptedShape {
                body,
                def: *def,
                geometry: *geometry,
            },
        );
        self.recompute_mass(body);
        Some(handle)
    }

    fn shape_body(&self, shape: ShapeHandle) -> Option<BodyHandle> {
        self.shapes.get(&shape).map(|shape| shape.body)
    }

    fn apply_force(&mut self, body: BodyHandle, force: Vec2) {
        if let Some(target) = self.bodies.get_mut(&body) {
            target.force += force;
            self.forces.push((body, force));
        }
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec2) {
        if let Some(body) = self.bodies.get_mut(&body) {
            if body.mass > 0.0 {
                body.velocity += impulse / body.mass;
            }
        }
    }

    fn linear_velocity(&self, body: BodyHandle) -> Vec2 {
        self.bodies
            .get(&body)
            .map_or_else(Vec2::zeros, |body| body.velocity)
    }

    fn mass(&self, body: BodyHandle) -> f32 {
        self.bodies.get(&body).map_or(0.0, |body| body.mass)
    }

    fn friction(&self, shape: ShapeHandle) -> f32 {
        self.shapes.get(&shape).map_or(0.0, |shape| shape.def.friction)
    }

    fn set_friction(&mut self, shape: ShapeHandle, friction: f32) {
        if let Some(shape) = self.shapes.get_mut(&shape) {
            shape.def.friction = friction;
        }
    }

    fn set_transform(&mut self, body: BodyHandle, position: Vec2, rotation: f32) {
        if let Some(body) = self.bodies.get_mut(&body) {
            body.position = position;
            body.rotation = rotation;
        }
    }

    fn body_position(&self, body: BodyHandle) -> Option<(Vec2, f32)> {
        self.bodies.get(&body).map(|body| (body.position, body.rotation))
    }

    fn step(&mut self, dt: f32, sub_steps: u32) {
        let sub_steps = sub_steps.max(1);
        let h = dt / sub_steps as f32;
        self.move_events.clear();

        for (handle, body) in &mut self.bodies {
            if body.def.body_type != BodyType::Dynamic {
                continue;
            }
            let start = body.position;
            let acceleration = if body.mass > 0.0 {
                body.force / body.mass + self.gravity
            } else {
                self.gravity
            };
            for _ in 0..sub_steps {
                body.velocity += acceleration * h;
                body.position += body.velocity * h;
            }
            body.force = Vec2::zeros();
            if (body.position - start).norm() > EPSILON {
                self.move_events.push(MoveEvent {
                    body: *handle,
                    position: body.position,
                    rotation: body.rotation,
                });
            }
        }

        self.sensor_begin_events = std::mem::take(&mut self.pending_sensor_begin);
        self.sensor_end_events = std::mem::take(&mut self.pending_sensor_end);
        self.body_begin_events = std::mem::take(&mut self.pending_body_begin);
        self.body_end_events = std::mem::take(&mut self.pending_body_end);
    }

    fn drain_move_events(&mut self) -> Vec<MoveEvent> {
        std::mem::take(&mut self.move_events)
    }

    fn drain_sensor_begin_events(&mut self) -> Vec<SensorEvent> {
        std::mem::take(&mut self.sensor_begin_events)
    }

    fn drain_sensor_end_events(&mut self) -> Vec<SensorEvent> {
        std::mem::take(&mut self.sensor_end_events)
    }

    fn drain_body_begin_events(&mut self) -> Vec<ContactEvent> {
        std::mem::take(&mut self.body_begin_events)
    }

    fn drain_body_end_events(&mut self) -> Vec<ContactEvent> {
        std::mem::take(&mut self.body_end_events)
    }

    fn debug_shapes(&self) -> Vec<DebugShape> {
        self.shapes
            .values()
            .filter_map(|shape| {
                let body = self.bodies.get(&shape.body)?;
                let sensor = shape.def.is_sensor;
                Some(match shape.geometry {
                    Geometry::Box {
                        half_extents,
                        offset,
                    } => {
                        let center = body.position + offset;
                        let (hx, hy) = (half_extents.x, half_extents.y);
                        DebugShape::Polygon {
                            vertices: vec![
                                center + Vec2::new(-hx, -hy),
                                center + Vec2::new(hx, -hy),
                                center + Vec2::new(hx, hy),
                                center + Vec2::new(-hx, hy),
                            ],
                            sensor,
                        }
                    }
                    Geometry::Circle { radius, offset } => DebugShape::Circle {
                        center: body.position + offset,
                        radius,
                        sensor,
                    },
                })
            })
            .collect()
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_force_accelerates_by_mass() {
        let mut engine = ScriptedEngine::new(Vec2::zeros());
        let body = engine.create_body(&BodyDef::new(BodyType::Dynamic, Vec2::zeros()));
        engine.create_shape(body, &ShapeDef::default(), &Geometry::centered_box(0.25, 0.5));
        assert_relative_eq!(engine.mass(body), 0.5);

        engine.apply_force(body, Vec2::new(1.0, 0.0));
        engine.step(0.5, 4);
        assert_relative_eq!(engine.linear_velocity(body).x, 1.0, epsilon = 1e-5);
        assert_eq!(engine.forces_on(body), vec![Vec2::new(1.0, 0.0)]);

        engine.step(0.5, 4);
        assert_relative_eq!(engine.linear_velocity(body).x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_sensors_are_massless() {
        let mut engine = ScriptedEngine::new(Vec2::zeros());
        let body = engine.create_body(&BodyDef::new(BodyType::Dynamic, Vec2::zeros()));
        engine.create_shape(body, &ShapeDef::sensor().with_density(5.0), &Geometry::centered_box(1.0, 1.0));
        assert_relative_eq!(engine.mass(body), 0.0);
    }

    #[test]
    fn test_injected_events_surface_after_step() {
        let mut engine = ScriptedEngine::new(Vec2::zeros());
        engine.push_sensor_begin(ShapeHandle(1), ShapeHandle(2));
        assert!(engine.drain_sensor_begin_events().is_empty());

        engine.step(1.0 / 60.0, 4);
        assert_eq!(engine.drain_sensor_begin_events().len(), 1);
        assert!(engine.drain_sensor_begin_events().is_empty());
    }

    #[test]
    fn test_static_bodies_do_not_move() {
        let mut engine = ScriptedEngine::new(Vec2::new(0.0, 10.0));
        let body = engine.create_body(&BodyDef::new(BodyType::Static, Vec2::new(1.0, 1.0)));
        engine.step(1.0, 4);
        assert!(engine.drain_move_events().is_empty());
        assert_eq!(engine.body_position(body), Some((Vec2::new(1.0, 1.0), 0.0)));
    }
}
