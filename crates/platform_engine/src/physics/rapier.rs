//! rapier2d backend for [`PhysicsEngine`]

use super::engine::{
    BodyDef, BodyHandle, BodyType, ContactEvent, DebugShape, Geometry, MoveEvent, PhysicsEngine,
    SensorEvent, ShapeDef, ShapeHandle,
};
use crate::foundation::math::Vec2;
use rapier2d::prelude::{
    point, vector, ActiveEvents, CCDSolver, ChannelEventCollector, ColliderBuilder,
    ColliderHandle, ColliderSet, CollisionEvent, ContactForceEvent, DefaultBroadPhase,
    ImpulseJointSet, IntegrationParameters, IslandManager, Isometry, MultibodyJointSet,
    NarrowPhase, PhysicsPipeline, Real, RigidBodyBuilder, RigidBodyHandle, RigidBodySet, Vector,
};

fn pack(index: u32, generation: u32) -> u64 {
    (u64::from(generation) << 32) | u64::from(index)
}

fn unpack(raw: u64) -> (u32, u32) {
    ((raw & 0xffff_ffff) as u32, (raw >> 32) as u32)
}

fn body_handle(handle: RigidBodyHandle) -> BodyHandle {
    let (index, generation) = handle.into_raw_parts();
    BodyHandle(pack(index, generation))
}

fn rigid_body_handle(handle: BodyHandle) -> RigidBodyHandle {
    let (index, generation) = unpack(handle.0);
    RigidBodyHandle::from_raw_parts(index, generation)
}

fn shape_handle(handle: ColliderHandle) -> ShapeHandle {
    let (index, generation) = handle.into_raw_parts();
    ShapeHandle(pack(index, generation))
}

fn collider_handle(handle: ShapeHandle) -> ColliderHandle {
    let (index, generation) = unpack(handle.0);
    ColliderHandle::from_raw_parts(index, generation)
}

fn to_vec2(vector: &Vector<Real>) -> Vec2 {
    Vec2::new(vector.x, vector.y)
}

/// Physics world backed by the rapier2d pipeline
pub struct RapierEngine {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    move_events: Vec<MoveEvent>,
    sensor_begin_events: Vec<SensorEvent>,
    sensor_end_events: Vec<SensorEvent>,
    body_begin_events: Vec<ContactEvent>,
    body_end_events: Vec<ContactEvent>,
}

impl RapierEngine {
    /// Create an empty world with the given gravity
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: vector![gravity.x, gravity.y],
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            move_events: Vec::new(),
            sensor_begin_events: Vec::new(),
            sensor_end_events: Vec::new(),
            body_begin_events: Vec::new(),
            body_end_events: Vec::new(),
        }
    }

    fn clear_events(&mut self) {
        self.move_events.clear();
        self.sensor_begin_events.clear();
        self.sensor_end_events.clear();
        self.body_begin_events.clear();
        self.body_end_events.clear();
    }

    fn is_sensor(&self, handle: ColliderHandle) -> bool {
        self.colliders.get(handle).is_some_and(|collider| collider.is_sensor())
    }

    fn record_collision(&mut self, event: CollisionEvent) {
        let (a, b, started) = match event {
            CollisionEvent::Started(a, b, _) => (a, b, true),
            CollisionEvent::Stopped(a, b, _) => (a, b, false),
        };

        if event.sensor() {
            // A collider removed this step no longer reports is_sensor, so the
            // survivor is assumed to be the sensor.
            let mut pairs = Vec::with_capacity(2);
            match (self.is_sensor(a), self.is_sensor(b)) {
                (true, true) => {
                    pairs.push((a, b));
                    pairs.push((b, a));
                }
                (true, false) => pairs.push((a, b)),
                _ => pairs.push((b, a)),
            }
            let queue = if started {
                &mut self.sensor_begin_events
            } else {
                &mut self.sensor_end_events
            };
            queue.extend(pairs.into_iter().map(|(sensor, visitor)| SensorEvent {
                sensor: shape_handle(sensor),
                visitor: shape_handle(visitor),
            }));
        } else {
            let contact = ContactEvent {
                shape_a: shape_handle(a),
                shape_b: shape_handle(b),
            };
            if started {
                self.body_begin_events.push(contact);
            } else {
                self.body_end_events.push(contact);
            }
        }
    }

    fn record_moves(&mut self) {
        for (handle, body) in self.bodies.iter() {
            if body.is_dynamic() && !body.is_sleeping() {
                self.move_events.push(MoveEvent {
                    body: body_handle(handle),
                    position: to_vec2(body.translation()),
                    rotation: body.rotation().angle(),
                });
            }
        }
    }
}

impl PhysicsEngine for RapierEngine {
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle {
        let builder = match def.body_type {
            BodyType::Static => RigidBodyBuilder::fixed(),
            BodyType::Dynamic => RigidBodyBuilder::dynamic(),
        };
        let mut builder = builder
            .translation(vector![def.position.x, def.position.y])
            .rotation(def.rotation)
            .ccd_enabled(def.bullet);
        if def.fixed_rotation {
            builder = builder.lock_rotations();
        }
        body_handle(self.bodies.insert(builder.build()))
    }

    fn destroy_body(&mut self, body: BodyHandle) {
        let removed = self.bodies.remove(
            rigid_body_handle(body),
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        if removed.is_none() {
            log::trace!("destroy_body on stale handle {:?}", body);
        }
    }

    fn create_shape(
        &mut self,
        body: BodyHandle,
        def: &ShapeDef,
        geometry: &Geometry,
    ) -> Option<ShapeHandle> {
        let parent = rigid_body_handle(body);
        if !self.bodies.contains(parent) {
            return None;
        }
        let builder = match *geometry {
            Geometry::Box {
                half_extents,
                offset,
            } => ColliderBuilder::cuboid(half_extents.x, half_extents.y)
                .translation(vector![offset.x, offset.y]),
            Geometry::Circle { radius, offset } => {
                ColliderBuilder::ball(radius).translation(vector![offset.x, offset.y])
            }
        };
        let collider = builder
            .density(def.density)
            .friction(def.friction)
            .restitution(def.restitution)
            .sensor(def.is_sensor)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let handle = self
            .colliders
            .insert_with_parent(collider, parent, &mut self.bodies);
        Some(shape_handle(handle))
    }

    fn shape_body(&self, shape: ShapeHandle) -> Option<BodyHandle> {
        self.colliders
            .get(collider_handle(shape))
            .and_then(|collider| collider.parent())
            .map(body_handle)
    }

    fn apply_force(&mut self, body: BodyHandle, force: Vec2) {
        if let Some(body) = self.bodies.get_mut(rigid_body_handle(body)) {
            body.add_force(vector![force.x, force.y], true);
        }
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec2) {
        if let Some(body) = self.bodies.get_mut(rigid_body_handle(body)) {
            body.apply_impulse(vector![impulse.x, impulse.y], true);
        }
    }

    fn linear_velocity(&self, body: BodyHandle) -> Vec2 {
        self.bodies
            .get(rigid_body_handle(body))
            .map_or_else(Vec2::zeros, |body| to_vec2(body.linvel()))
    }

    fn mass(&self, body: BodyHandle) -> f32 {
        self.bodies
            .get(rigid_body_handle(body))
            .map_or(0.0, |body| body.mass())
    }

    fn friction(&self, shape: ShapeHandle) -> f32 {
        self.colliders
            .get(collider_handle(shape))
            .map_or(0.0, |collider| collider.friction())
    }

    fn set_friction(&mut self, shape: ShapeHandle, friction: f32) {
        if let Some(collider) = self.colliders.get_mut(collider_handle(shape)) {
            collider.set_friction(friction);
        }
    }

    fn set_transform(&mut self, body: BodyHandle, position: Vec2, rotation: f32) {
        if let Some(body) = self.bodies.get_mut(rigid_body_handle(body)) {
            body.set_position(Isometry::new(vector![position.x, position.y], rotation), true);
        }
    }

    fn body_position(&self, body: BodyHandle) -> Option<(Vec2, f32)> {
        self.bodies
            .get(rigid_body_handle(body))
            .map(|body| (to_vec2(body.translation()), body.rotation().angle()))
    }

    fn step(&mut self, dt: f32, sub_steps: u32) {
        self.clear_events();
        if dt <= 0.0 {
            return;
        }
        let sub_steps = sub_steps.max(1);
        self.integration_parameters.dt = dt / sub_steps as f32;

        let (collision_send, collision_recv) =
            rapier2d::crossbeam::channel::unbounded::<CollisionEvent>();
        let (force_send, _force_recv) =
            rapier2d::crossbeam::channel::unbounded::<ContactForceEvent>();
        let event_handler = ChannelEventCollector::new(collision_send, force_send);

        for _ in 0..sub_steps {
            self.pipeline.step(
                &self.gravity,
                &self.integration_parameters,
                &mut self.island_manager,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                None,
                &(),
                &event_handler,
            );
        }

        // Forces are per-step; the next tick re-applies whatever it needs.
        for (_, body) in self.bodies.iter_mut() {
            body.reset_forces(false);
        }

        while let Ok(event) = collision_recv.try_recv() {
            self.record_collision(event);
        }
        self.record_moves();
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
        let mut shapes = Vec::with_capacity(self.colliders.len());
        for (_, collider) in self.colliders.iter() {
            let position = collider.position();
            let sensor = collider.is_sensor();
            if let Some(cuboid) = collider.shape().as_cuboid() {
                let half = cuboid.half_extents;
                let vertices = [(-half.x, -half.y), (half.x, -half.y), (half.x, half.y), (-half.x, half.y)]
                    .into_iter()
                    .map(|(x, y)| {
                        let corner = position * point![x, y];
                        Vec2::new(corner.x, corner.y)
                    })
                    .collect();
                shapes.push(DebugShape::Polygon { vertices, sensor });
            } else if let Some(ball) = collider.shape().as_ball() {
                shapes.push(DebugShape::Circle {
                    center: to_vec2(&position.translation.vector),
                    radius: ball.radius,
                    sensor,
                });
            }
        }
        shapes
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}
