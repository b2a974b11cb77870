//! Component trait

use super::context::GameContext;
use super::game_object::GameObject;
use crate::foundation::any::AsAny;
use crate::render::RenderContext;

/// Behavior unit attached to exactly one [`GameObject`].
///
/// While a hook runs, the component is detached from its owner, so `object`
/// gives full access to the owner's transform and sibling components.
pub trait Component: AsAny {
    /// Called once after the owner enters the scene
    fn init(&mut self, _object: &mut GameObject, _ctx: &mut GameContext<'_>) {}

    /// Called once when the owner is swept from the scene
    fn deinit(&mut self, _object: &mut GameObject, _ctx: &mut GameContext<'_>) {}

    /// Called every tick while the owner is live
    fn update(&mut self, _object: &mut GameObject, _ctx: &mut GameContext<'_>) {}

    /// Draw in the owner's local space
    fn render(&self, _object: &GameObject, _ctx: &mut dyn RenderContext) {}

    /// Type name used in diagnostics
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Errors raised while assembling a [`GameObject`]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    /// Components cannot be attached once the owner is initialized
    #[error("Cannot add component {0} after init")]
    AlreadyInitialized(&'static str),

    /// A component of this type is already attached
    #[error("Duplicate component: {0}")]
    Duplicate(&'static str),
}
