//! Character movement controller
//!
//! [`MovementController::tick`] is a pure function of the controller's jump
//! state and one tick's worth of intents and physics readings. It returns the
//! friction and forces to apply instead of touching the body itself, which
//! keeps the jump state machine testable without a physics world.

use crate::behaviour::Intents;
use platform_engine::foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// Movement constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    /// Horizontal speed above which walking force stops
    pub max_velocity: f32,

    /// Walking force
    pub move_force: f32,

    /// Walking force multiplier while airborne against a wall
    pub wall_slide_factor: f32,

    /// Force pulling residual horizontal speed toward zero
    pub centering_force: f32,

    /// Horizontal speed below which no centering force applies
    pub dead_zone: f32,

    /// Friction while standing
    pub ground_friction: f32,

    /// Friction while touching a wall in the air
    pub wall_friction: f32,

    /// Ticks a held jump keeps pushing
    pub jump_ticks: u32,

    /// Velocity change per jump tick, scaled by mass and tick rate into a force
    pub jump_impulse: f32,

    /// Ticks per second the jump force is calibrated for
    pub tick_rate: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            max_velocity: 5.0,
            move_force: 50.0,
            wall_slide_factor: 0.1,
            centering_force: 10.0,
            dead_zone: 0.1,
            ground_friction: 1.0,
            wall_friction: 0.5,
            jump_ticks: 3,
            jump_impulse: 2.0,
            tick_rate: 60.0,
        }
    }
}

/// Which sensors currently touch something
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactState {
    /// Bottom sensor
    pub on_ground: bool,
    /// Top sensor
    pub on_ceiling: bool,
    /// Left sensor
    pub on_left_wall: bool,
    /// Right sensor
    pub on_right_wall: bool,
}

impl ContactState {
    /// Either side sensor
    pub fn on_wall(&self) -> bool {
        self.on_left_wall || self.on_right_wall
    }
}

/// Horizontal facing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Facing {
    /// Facing -x
    Left,
    /// Facing +x
    #[default]
    Right,
}

impl Facing {
    /// -1 for left, 1 for right
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Jump state machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JumpState {
    /// Inside a jump window
    pub is_jumping: bool,
    /// Ticks of jump force left
    pub ticks_remaining: u32,
    /// Locked wall-kick side: -1 left wall, 1 right wall, 0 none
    pub direction: i8,
}

/// Readings for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControllerInput {
    /// Behaviour intents
    pub intents: Intents,
    /// Sensor contacts
    pub contact: ContactState,
    /// Body linear velocity
    pub velocity: Vec2,
    /// Body mass
    pub mass: f32,
}

/// What the owner should apply this tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerOutput {
    /// New friction for the body's solid shape, `None` keeps the current value
    pub friction: Option<f32>,
    /// Forces to apply, in order
    pub forces: Vec<Vec2>,
    /// Direction to face, `None` when no horizontal intent is active
    pub facing: Option<Facing>,
    /// Fire a projectile
    pub fire: bool,
}

impl ControllerOutput {
    /// Sum of all forces
    pub fn net_force(&self) -> Vec2 {
        self.forces.iter().sum()
    }
}

/// Walking, wall sliding and jumping for one character
#[derive(Debug, Clone, Default)]
pub struct MovementController {
    tuning: MovementTuning,
    jump: JumpState,
    facing: Facing,
}

impl MovementController {
    /// Create an idle controller
    pub fn new(tuning: MovementTuning) -> Self {
        Self {
            tuning,
            jump: JumpState::default(),
            facing: Facing::default(),
        }
    }

    /// Tuning in use
    pub fn tuning(&self) -> &MovementTuning {
        &self.tuning
    }

    /// Current jump state
    pub fn jump_state(&self) -> JumpState {
        self.jump
    }

    /// Last horizontal direction with an active intent
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Advance one tick
    pub fn tick(&mut self, input: &ControllerInput) -> ControllerOutput {
        let tuning = &self.tuning;
        let contact = input.contact;
        let left = input.intents.contains(Intents::MOVE_LEFT);
        let right = input.intents.contains(Intents::MOVE_RIGHT);
        let jump = input.intents.contains(Intents::JUMP);
        let vx = input.velocity.x;

        let pushing_left_wall = contact.on_left_wall && left;
        let pushing_right_wall = contact.on_right_wall && right;
        let pushing_wall = pushing_left_wall || pushing_right_wall;

        let mut output = ControllerOutput {
            friction: if contact.on_ground {
                Some(tuning.ground_friction)
            } else if contact.on_wall() {
                Some(tuning.wall_friction)
            } else {
                None
            },
            ..ControllerOutput::default()
        };

        if !left && !right {
            if vx < -tuning.dead_zone {
                output.forces.push(Vec2::new(tuning.centering_force, 0.0));
            } else if vx > tuning.dead_zone {
                output.forces.push(Vec2::new(-tuning.centering_force, 0.0));
            }
        } else {
            let force = if !contact.on_ground && contact.on_wall() {
                tuning.move_force * tuning.wall_slide_factor
            } else {
                tuning.move_force
            };
            // Both directions are checked independently
            if left && vx > -tuning.max_velocity {
                output.forces.push(Vec2::new(-force, 0.0));
            }
            if right && vx < tuning.max_velocity {
                output.forces.push(Vec2::new(force, 0.0));
            }
        }

        if jump && !self.jump.is_jumping && (contact.on_ground || pushing_wall) {
            self.jump = JumpState {
                is_jumping: true,
                ticks_remaining: tuning.jump_ticks,
                direction: 0,
            };
            log::debug!("Jump begin");
        }

        if jump && self.jump.ticks_remaining > 0 {
            self.jump.ticks_remaining -= 1;
            let force = input.mass * tuning.jump_impulse * tuning.tick_rate;
            let mut force_x = 0.0;
            if pushing_left_wall || self.jump.direction < 0 {
                force_x = force;
                self.jump.direction = -1;
            } else if pushing_right_wall || self.jump.direction > 0 {
                force_x = -force;
                self.jump.direction = 1;
            }
            output.forces.push(Vec2::new(force_x, -force));
            log::trace!("Jump tick {}", self.jump.ticks_remaining);
        } else if self.jump.is_jumping {
            self.jump = JumpState::default();
            log::debug!("Jump end");
        }

        if left {
            self.facing = Facing::Left;
            output.facing = Some(Facing::Left);
        } else if right {
            self.facing = Facing::Right;
            output.facing = Some(Facing::Right);
        }

        output.fire = input.intents.contains(Intents::PRIMARY_ACTION);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const GROUND: ContactState = ContactState {
        on_ground: true,
        on_ceiling: false,
        on_left_wall: false,
        on_right_wall: false,
    };

    fn input(intents: Intents, contact: ContactState, vx: f32) -> ControllerInput {
        ControllerInput {
            intents,
            contact,
            velocity: Vec2::new(vx, 0.0),
            mass: 0.5,
        }
    }

    #[test]
    fn test_friction_policy() {
        let mut controller = MovementController::default();

        let on_ground_and_wall = ContactState {
            on_left_wall: true,
            ..GROUND
        };
        assert_eq!(
            controller
                .tick(&input(Intents::empty(), on_ground_and_wall, 0.0))
                .friction,
            Some(1.0)
        );

        let on_wall = ContactState {
            on_right_wall: true,
            ..ContactState::default()
        };
        assert_eq!(
            controller.tick(&input(Intents::empty(), on_wall, 0.0)).friction,
            Some(0.5)
        );

        let airborne = ContactState::default();
        assert_eq!(
            controller.tick(&input(Intents::empty(), airborne, 0.0)).friction,
            None
        );
    }

    #[test]
    fn test_no_centering_force_inside_dead_zone() {
        let mut controller = MovementController::default();

        let output = controller.tick(&input(Intents::empty(), GROUND, 0.0));
        assert!(output.forces.is_empty());

        let output = controller.tick(&input(Intents::empty(), GROUND, 0.2));
        assert_eq!(output.forces, vec![Vec2::new(-10.0, 0.0)]);

        let output = controller.tick(&input(Intents::empty(), GROUND, -0.2));
        assert_eq!(output.forces, vec![Vec2::new(10.0, 0.0)]);
    }

    #[test]
    fn test_walk_force_gated_by_velocity_cap() {
        let mut controller = MovementController::default();

        let output = controller.tick(&input(Intents::MOVE_RIGHT, GROUND, 4.9));
        assert_eq!(output.forces, vec![Vec2::new(50.0, 0.0)]);

        let output = controller.tick(&input(Intents::MOVE_RIGHT, GROUND, 5.0));
        assert!(output.forces.is_empty());

        let output = controller.tick(&input(Intents::MOVE_LEFT, GROUND, -5.2));
        assert!(output.forces.is_empty());
    }

    #[test]
    fn test_velocity_converges_to_cap() {
        let mut controller = MovementController::default();
        let mass = 0.5;
        let dt = 1.0 / 60.0;
        let step = 50.0 / mass * dt;
        let mut vx = 0.0_f32;
        let mut peak = 0.0_f32;

        for _ in 0..120 {
            let output = controller.tick(&input(Intents::MOVE_RIGHT, GROUND, vx));
            vx += output.net_force().x / mass * dt;
            peak = peak.max(vx);
        }

        assert!(peak <= 5.0 + step + 1e-3);
        assert!(vx >= 5.0 - 1e-3);
        let settled = controller.tick(&input(Intents::MOVE_RIGHT, GROUND, vx));
        assert!(settled.forces.is_empty());
    }

    #[test]
    fn test_wall_slide_reduces_walk_force() {
        let mut controller = MovementController::default();
        let on_wall = ContactState {
            on_left_wall: true,
            ..ContactState::default()
        };

        let output = controller.tick(&input(Intents::MOVE_RIGHT, on_wall, 0.0));
        assert_eq!(output.forces.len(), 1);
        assert_relative_eq!(output.forces[0].x, 5.0);
    }

    #[test]
    fn test_both_directions_apply_independently() {
        let mut controller = MovementController::default();
        let output = controller.tick(&input(
            Intents::MOVE_LEFT | Intents::MOVE_RIGHT,
            GROUND,
            0.0,
        ));
        assert_eq!(
            output.forces,
            vec![Vec2::new(-50.0, 0.0), Vec2::new(50.0, 0.0)]
        );
        assert_relative_eq!(output.net_force().x, 0.0);
    }

    #[test]
    fn test_jump_window_lasts_three_ticks() {
        let mut controller = MovementController::default();
        let airborne = ContactState::default();
        let jump_force = 0.5 * 2.0 * 60.0;

        let output = controller.tick(&input(Intents::JUMP, GROUND, 0.0));
        assert_eq!(output.forces, vec![Vec2::new(0.0, -jump_force)]);
        assert_eq!(controller.jump_state().ticks_remaining, 2);

        let output = controller.tick(&input(Intents::JUMP, airborne, 0.0));
        assert_eq!(output.forces.len(), 1);
        assert_eq!(controller.jump_state().ticks_remaining, 1);

        let output = controller.tick(&input(Intents::JUMP, airborne, 0.0));
        assert_eq!(output.forces.len(), 1);
        assert_eq!(controller.jump_state().ticks_remaining, 0);
        assert!(controller.jump_state().is_jumping);

        let output = controller.tick(&input(Intents::JUMP, airborne, 0.0));
        assert!(output.forces.is_empty());
        assert_eq!(controller.jump_state(), JumpState::default());
    }

    #[test]
    fn test_releasing_jump_ends_window_early() {
        let mut controller = MovementController::default();

        controller.tick(&input(Intents::JUMP, GROUND, 0.0));
        assert!(controller.jump_state().is_jumping);

        let output = controller.tick(&input(Intents::empty(), ContactState::default(), 0.0));
        assert!(output.forces.is_empty());
        assert_eq!(controller.jump_state(), JumpState::default());
    }

    #[test]
    fn test_jump_needs_ground_or_pushed_wall() {
        let mut controller = MovementController::default();

        let output = controller.tick(&input(Intents::JUMP, ContactState::default(), 0.0));
        assert!(output.forces.is_empty());
        assert!(!controller.jump_state().is_jumping);

        // Touching a wall without pushing into it is not enough
        let on_left = ContactState {
            on_left_wall: true,
            ..ContactState::default()
        };
        let output = controller.tick(&input(Intents::JUMP | Intents::MOVE_RIGHT, on_left, 0.0));
        assert!(!controller.jump_state().is_jumping);
        assert_eq!(output.forces, vec![Vec2::new(5.0, 0.0)]);
    }

    #[test]
    fn test_wall_kick_direction_locks() {
        let mut controller = MovementController::default();
        let jump_force = 0.5 * 2.0 * 60.0;
        let on_left = ContactState {
            on_left_wall: true,
            ..ContactState::default()
        };

        let output = controller.tick(&input(Intents::JUMP | Intents::MOVE_LEFT, on_left, 0.0));
        assert_eq!(controller.jump_state().direction, -1);
        assert!(output.forces.contains(&Vec2::new(jump_force, -jump_force)));

        // Wall contact lost and intent reversed: the kick side stays locked
        let output = controller.tick(&input(
            Intents::JUMP | Intents::MOVE_RIGHT,
            ContactState::default(),
            1.0,
        ));
        assert_eq!(controller.jump_state().direction, -1);
        assert!(output.forces.contains(&Vec2::new(jump_force, -jump_force)));

        let on_right = ContactState {
            on_right_wall: true,
            ..ContactState::default()
        };
        controller.tick(&input(Intents::JUMP | Intents::MOVE_RIGHT, on_right, 1.0));
        assert_eq!(controller.jump_state().direction, -1);
    }

    #[test]
    fn test_right_wall_kick_pushes_left() {
        let mut controller = MovementController::default();
        let jump_force = 0.5 * 2.0 * 60.0;
        let on_right = ContactState {
            on_right_wall: true,
            ..ContactState::default()
        };

        let output = controller.tick(&input(Intents::JUMP | Intents::MOVE_RIGHT, on_right, 0.0));
        assert_eq!(controller.jump_state().direction, 1);
        assert!(output.forces.contains(&Vec2::new(-jump_force, -jump_force)));
    }

    #[test]
    fn test_facing_follows_last_direction() {
        let mut controller = MovementController::default();
        assert_eq!(controller.facing(), Facing::Right);

        let output = controller.tick(&input(Intents::MOVE_LEFT, GROUND, 0.0));
        assert_eq!(output.facing, Some(Facing::Left));

        let output = controller.tick(&input(Intents::empty(), GROUND, 0.0));
        assert_eq!(output.facing, None);
        assert_eq!(controller.facing(), Facing::Left);
    }
}
