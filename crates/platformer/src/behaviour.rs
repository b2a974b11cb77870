//! Intent sources for characters
//!
//! A [`BehaviourComponent`] samples its [`Behaviour`] once per tick and
//! caches the resulting [`Intents`] for sibling components to read.

use bitflags::bitflags;
use platform_engine::ecs::{Component, GameContext, GameObject};
use platform_engine::foundation::math::{is_zero, Vec2};
use platform_engine::input::InputState;
use platform_engine::physics::PhysicsBodyComponent;

bitflags! {
    /// What a character wants to do this tick
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Intents: u8 {
        /// Walk left
        const MOVE_LEFT = 1 << 0;
        /// Walk right
        const MOVE_RIGHT = 1 << 1;
        /// Start or sustain a jump
        const JUMP = 1 << 2;
        /// Fire
        const PRIMARY_ACTION = 1 << 3;
    }
}

/// Source of per-tick intents
pub trait Behaviour: std::fmt::Debug {
    /// Sample intents for this tick
    fn intents(&mut self, input: &InputState, velocity: Vec2) -> Intents;

    /// Projectiles destroy objects whose behaviour is a target
    fn is_target(&self) -> bool {
        false
    }
}

/// Intents from live input
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerBehaviour;

impl Behaviour for PlayerBehaviour {
    fn intents(&mut self, input: &InputState, _velocity: Vec2) -> Intents {
        let mut intents = Intents::empty();
        intents.set(Intents::MOVE_LEFT, input.left.active());
        intents.set(Intents::MOVE_RIGHT, input.right.active());
        intents.set(Intents::JUMP, input.up.active());
        // One shot per press, not one per held tick
        intents.set(
            Intents::PRIMARY_ACTION,
            input.primary_action.active() && input.primary_action.just_triggered,
        );
        intents
    }
}

/// Walks right while standing, drifts while falling
#[derive(Debug, Clone, Copy)]
pub struct EnemyBehaviour {
    /// Vertical speed still counted as standing
    pub rest_tolerance: f32,
}

impl Default for EnemyBehaviour {
    fn default() -> Self {
        Self {
            rest_tolerance: 0.05,
        }
    }
}

impl Behaviour for EnemyBehaviour {
    fn intents(&mut self, _input: &InputState, velocity: Vec2) -> Intents {
        if is_zero(velocity.y, self.rest_tolerance) {
            Intents::MOVE_RIGHT
        } else {
            Intents::empty()
        }
    }

    fn is_target(&self) -> bool {
        true
    }
}

/// Component wrapping a [`Behaviour`]
#[derive(Debug)]
pub struct BehaviourComponent {
    behaviour: Box<dyn Behaviour>,
    intents: Intents,
}

impl BehaviourComponent {
    /// Wrap a behaviour
    pub fn new(behaviour: impl Behaviour + 'static) -> Self {
        Self {
            behaviour: Box::new(behaviour),
            intents: Intents::empty(),
        }
    }

    /// Intents sampled this tick
    pub fn intents(&self) -> Intents {
        self.intents
    }

    /// Whether projectiles destroy this object
    pub fn is_target(&self) -> bool {
        self.behaviour.is_target()
    }
}

impl Component for BehaviourComponent {
    fn update(&mut self, object: &mut GameObject, ctx: &mut GameContext<'_>) {
        let velocity = object
            .get::<PhysicsBodyComponent>()
            .map_or_else(Vec2::zeros, |body| body.linear_velocity(ctx.physics));
        self.intents = self.behaviour.intents(ctx.input, velocity);
    }
}
