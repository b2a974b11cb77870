//! Physics layer
//!
//! [`PhysicsSystem`] owns a [`PhysicsEngine`] (rapier2d by default, or the
//! deterministic [`ScriptedEngine`]), steps it, and routes its events to the
//! [`PhysicsBodyComponent`] of the owning GameObject.

pub mod body;
pub mod debug;
pub mod engine;
pub mod rapier;
pub mod scripted;
pub mod sensor;
pub mod system;

pub use body::{Collision, CollisionListener, PhysicsBodyComponent};
pub use debug::DebugDrawFlags;
pub use engine::{
    BodyDef, BodyHandle, BodyType, ContactEvent, DebugShape, Geometry, MoveEvent, PhysicsEngine,
    SensorEvent, ShapeDef, ShapeHandle,
};
pub use rapier::RapierEngine;
pub use scripted::ScriptedEngine;
pub use sensor::Sensor;
pub use system::{DispatchStats, EngineFactory, PhysicsSystem};

/// Physics layer errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhysicsError {
    /// `PhysicsSystem::init` has not run
    #[error("Physics world not initialized")]
    NotInitialized,

    /// The component's body was already released
    #[error("Physics body already released")]
    BodyReleased,

    /// The engine does not know the body
    #[error("Unknown physics body: {0:?}")]
    UnknownBody(BodyHandle),
}
