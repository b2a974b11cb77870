//! # Platform Engine
//!
//! A small 2D runtime for physics-driven platformers.
//!
//! ## Features
//!
//! - **GameObject / Component model**: typed component lookup, init/update/
//!   deinit/render hooks, generational object ids
//! - **Deferred structure changes**: spawn/remove commands applied at a
//!   fixed sync point each tick
//! - **Physics dispatch**: rapier2d-backed bodies whose move, sensor and
//!   contact events are routed to the owning GameObject
//! - **Headless testing**: a deterministic scripted physics backend and a
//!   recording render context
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use platform_engine::prelude::*;
//!
//! let mut physics = PhysicsSystem::new(PhysicsConfig::default());
//! physics.init();
//!
//! let mut scene = Scene::new();
//! let input = InputState::default();
//! let body = physics
//!     .create_body(BodyDef::new(BodyType::Dynamic, Vec2::new(2.0, 2.0)))
//!     .expect("physics initialized");
//! let crate_box = GameObject::named("crate").with_component(body).expect("fresh object");
//! scene.insert(crate_box, &mut physics, &input, Tick::default());
//!
//! let tick = Tick::new(1.0 / 60.0, 1.0 / 60.0);
//! scene.step_physics(&mut physics, tick.delta_time);
//! scene.update(&mut physics, &input, tick);
//! scene.flush(&mut physics, &input, tick);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod ecs;
pub mod foundation;
pub mod input;
pub mod physics;
pub mod render;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, EngineConfig, PhysicsConfig},
        ecs::{
            Component, ComponentError, GameContext, GameObject, GameObjectId, GameObjects, Scene,
            Tick, WorldCommands,
        },
        foundation::{
            math::{Transform, Vec2},
            time::{IntervalTimer, Stopwatch, Timer},
        },
        input::{InputManager, InputState, KeyCode},
        physics::{
            BodyDef, BodyType, Collision, Geometry, PhysicsBodyComponent, PhysicsError,
            PhysicsSystem, ShapeDef, ShapeHandle,
        },
        render::{Color, Rect, RenderContext, TextureHandle, TextureRegistry},
    };
}
