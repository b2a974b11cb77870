//! GameObject / Component framework
//!
//! A [`GameObject`] owns an ordered list of [`Component`]s plus one
//! [`Transform`](crate::foundation::math::Transform). Objects live in a
//! generational arena ([`GameObjects`]) inside a [`Scene`]; structural
//! changes requested mid-tick go through [`WorldCommands`] and are applied
//! when the scene is flushed.

pub mod commands;
pub mod component;
pub mod context;
pub mod game_object;
pub mod objects;
pub mod scene;

pub use commands::{WorldCommand, WorldCommands};
pub use component::{Component, ComponentError};
pub use context::{GameContext, Tick};
pub use game_object::{GameObject, GameObjectId};
pub use objects::GameObjects;
pub use scene::{FlushReport, Scene};
