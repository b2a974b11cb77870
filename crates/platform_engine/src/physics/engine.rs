//! Physics engine adapter boundary
//!
//! The rigid-body solver is a black box behind [`PhysicsEngine`]. Handles are
//! opaque and may go stale; every query on a stale handle returns a neutral
//! value instead of failing.

use crate::foundation::any::AsAny;
use crate::foundation::math::Vec2;

/// Opaque rigid body identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u64);

/// Opaque collision shape identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeHandle(pub u64);

/// How the solver treats a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyType {
    /// Never moves
    Static,
    /// Moved by forces and contacts
    #[default]
    Dynamic,
}

/// Body creation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDef {
    /// Static or dynamic
    pub body_type: BodyType,
    /// Initial position
    pub position: Vec2,
    /// Initial rotation in radians
    pub rotation: f32,
    /// Lock rotation (characters)
    pub fixed_rotation: bool,
    /// Continuous collision detection for fast movers
    pub bullet: bool,
}

impl BodyDef {
    /// Body of `body_type` at `position`
    pub fn new(body_type: BodyType, position: Vec2) -> Self {
        Self {
            body_type,
            position,
            rotation: 0.0,
            fixed_rotation: false,
            bullet: false,
        }
    }

    /// Lock rotation
    pub fn with_fixed_rotation(mut self) -> Self {
        self.fixed_rotation = true;
        self
    }

    /// Enable continuous collision detection
    pub fn with_bullet(mut self) -> Self {
        self.bullet = true;
        self
    }
}

/// Material and role of a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDef {
    /// Mass density
    pub density: f32,
    /// Coulomb friction coefficient
    pub friction: f32,
    /// Bounciness
    pub restitution: f32,
    /// Reports overlaps without collision response
    pub is_sensor: bool,
}

impl Default for ShapeDef {
    fn default() -> Self {
        Self {
            density: 1.0,
            friction: 0.6,
            restitution: 0.0,
            is_sensor: false,
        }
    }
}

impl ShapeDef {
    /// Massless overlap sensor
    pub fn sensor() -> Self {
        Self {
            density: 0.0,
            is_sensor: true,
            ..Self::default()
        }
    }

    /// Set density
    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    /// Set friction
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Set restitution
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }
}

/// Collision geometry, relative to the body origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// Axis-aligned box
    Box {
        /// Half width and half height
        half_extents: Vec2,
        /// Center offset from the body origin
        offset: Vec2,
    },
    /// Circle
    Circle {
        /// Radius
        radius: f32,
        /// Center offset from the body origin
        offset: Vec2,
    },
}

impl Geometry {
    /// Box centered on the body origin
    pub fn centered_box(half_width: f32, half_height: f32) -> Self {
        Self::Box {
            half_extents: Vec2::new(half_width, half_height),
            offset: Vec2::zeros(),
        }
    }

    /// Box centered at `offset`
    pub fn offset_box(half_width: f32, half_height: f32, offset: Vec2) -> Self {
        Self::Box {
            half_extents: Vec2::new(half_width, half_height),
            offset,
        }
    }

    /// Circle centered on the body origin
    pub fn circle(radius: f32) -> Self {
        Self::Circle {
            radius,
            offset: Vec2::zeros(),
        }
    }

    /// Enclosed area
    pub fn area(&self) -> f32 {
        match *self {
            Self::Box { half_extents, .. } => 4.0 * half_extents.x * half_extents.y,
            Self::Circle { radius, .. } => std::f32::consts::PI * radius * radius,
        }
    }
}

/// A dynamic body's pose after a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveEvent {
    /// Body that moved
    pub body: BodyHandle,
    /// New position
    pub position: Vec2,
    /// New rotation
    pub rotation: f32,
}

/// Overlap change between a sensor and another shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorEvent {
    /// The sensor shape
    pub sensor: ShapeHandle,
    /// The shape entering or leaving it
    pub visitor: ShapeHandle,
}

/// Contact change between two solid shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    /// First shape
    pub shape_a: ShapeHandle,
    /// Second shape
    pub shape_b: ShapeHandle,
}

/// World-space outline of one shape, for debug drawing
#[derive(Debug, Clone, PartialEq)]
pub enum DebugShape {
    /// Box corners in winding order
    Polygon {
        /// Corner points
        vertices: Vec<Vec2>,
        /// Shape is a sensor
        sensor: bool,
    },
    /// Circle
    Circle {
        /// Center
        center: Vec2,
        /// Radius
        radius: f32,
        /// Shape is a sensor
        sensor: bool,
    },
}

/// Black-box rigid-body solver.
///
/// Event drains return everything recorded by the most recent [`step`]
/// and leave the queue empty.
///
/// [`step`]: PhysicsEngine::step
pub trait PhysicsEngine: AsAny {
    /// Create a body
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle;

    /// Destroy a body and its shapes; stale handles are ignored
    fn destroy_body(&mut self, body: BodyHandle);

    /// Attach a shape; `None` when the body does not exist
    fn create_shape(
        &mut self,
        body: BodyHandle,
        def: &ShapeDef,
        geometry: &Geometry,
    ) -> Option<ShapeHandle>;

    /// Body a shape is attached to
    fn shape_body(&self, shape: ShapeHandle) -> Option<BodyHandle>;

    /// Accumulate a force for the next step
    fn apply_force(&mut self, body: BodyHandle, force: Vec2);

    /// Apply an impulse immediately
    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec2);

    /// Linear velocity, zero for stale handles
    fn linear_velocity(&self, body: BodyHandle) -> Vec2;

    /// Mass, zero for stale handles
    fn mass(&self, body: BodyHandle) -> f32;

    /// Shape friction, zero for stale handles
    fn friction(&self, shape: ShapeHandle) -> f32;

    /// Set shape friction
    fn set_friction(&mut self, shape: ShapeHandle, friction: f32);

    /// Teleport a body
    fn set_transform(&mut self, body: BodyHandle, position: Vec2, rotation: f32);

    /// Current position and rotation
    fn body_position(&self, body: BodyHandle) -> Option<(Vec2, f32)>;

    /// Advance by `dt` seconds split into `sub_steps` solver iterations
    fn step(&mut self, dt: f32, sub_steps: u32);

    /// Dynamic bodies that moved during the last step
    fn drain_move_events(&mut self) -> Vec<MoveEvent>;

    /// Sensor overlaps that began during the last step
    fn drain_sensor_begin_events(&mut self) -> Vec<SensorEvent>;

    /// Sensor overlaps that ended during the last step
    fn drain_sensor_end_events(&mut self) -> Vec<SensorEvent>;

    /// Solid contacts that began during the last step
    fn drain_body_begin_events(&mut self) -> Vec<ContactEvent>;

    /// Solid contacts that ended during the last step
    fn drain_body_end_events(&mut self) -> Vec<ContactEvent>;

    /// Outlines of every shape
    fn debug_shapes(&self) -> Vec<DebugShape>;

    /// Number of live bodies
    fn body_count(&self) -> usize;
}
