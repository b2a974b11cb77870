//! Character component: sensors plus the movement controller
//!
//! On init the component attaches four sensors to its owner's physics body.
//! Each tick it reads the owner's behaviour intents and sensor contacts, runs
//! the [`MovementController`] and applies the result to the body.

use crate::behaviour::{BehaviourComponent, Intents};
use crate::config::ProjectileConfig;
use crate::movement::{ContactState, ControllerInput, Facing, MovementController, MovementTuning};
use crate::projectile;
use crate::sprite::Sprite;
use platform_engine::ecs::{Component, GameContext, GameObject};
use platform_engine::foundation::math::Vec2;
use platform_engine::physics::{Geometry, PhysicsBodyComponent, PhysicsError, PhysicsSystem, ShapeDef, ShapeHandle};
use platform_engine::render::TextureHandle;

/// Sensor geometry around a character body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorLayout {
    /// Under the feet
    pub bottom: Geometry,
    /// Above the head
    pub top: Geometry,
    /// Left side
    pub left: Geometry,
    /// Right side
    pub right: Geometry,
}

impl Default for SensorLayout {
    fn default() -> Self {
        Self {
            bottom: Geometry::offset_box(0.15, 0.05, Vec2::new(0.0, 0.5)),
            top: Geometry::offset_box(0.15, 0.05, Vec2::new(0.0, -0.5)),
            left: Geometry::offset_box(0.05, 0.45, Vec2::new(-0.25, 0.0)),
            right: Geometry::offset_box(0.05, 0.45, Vec2::new(0.25, 0.0)),
        }
    }
}

/// Shapes created from a [`SensorLayout`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterSensors {
    /// Ground sensor
    pub bottom: ShapeHandle,
    /// Ceiling sensor
    pub top: ShapeHandle,
    /// Left wall sensor
    pub left: ShapeHandle,
    /// Right wall sensor
    pub right: ShapeHandle,
}

impl CharacterSensors {
    /// Attach all four sensors to `body`
    pub fn attach(
        body: &mut PhysicsBodyComponent,
        physics: &mut PhysicsSystem,
        layout: &SensorLayout,
    ) -> Result<Self, PhysicsError> {
        let def = ShapeDef::sensor();
        Ok(Self {
            bottom: body.add_shape(physics, &def, &layout.bottom)?,
            top: body.add_shape(physics, &def, &layout.top)?,
            left: body.add_shape(physics, &def, &layout.left)?,
            right: body.add_shape(physics, &def, &layout.right)?,
        })
    }

    /// Read all four sensors
    pub fn contact_state(&self, body: &PhysicsBodyComponent) -> ContactState {
        ContactState {
            on_ground: body.is_sensor_in_collision(self.bottom),
            on_ceiling: body.is_sensor_in_collision(self.top),
            on_left_wall: body.is_sensor_in_collision(self.left),
            on_right_wall: body.is_sensor_in_collision(self.right),
        }
    }
}

/// What a character fires
#[derive(Debug, Clone, PartialEq)]
pub struct Weapon {
    /// Projectile settings
    pub projectile: ProjectileConfig,
    /// Projectile sprite
    pub texture: TextureHandle,
}

/// Drives a character body from its behaviour's intents
#[derive(Debug, Clone)]
pub struct PlayerComponent {
    controller: MovementController,
    layout: SensorLayout,
    sensors: Option<CharacterSensors>,
    weapon: Option<Weapon>,
}

impl PlayerComponent {
    /// Character with the default sensor layout and no weapon
    pub fn new(tuning: MovementTuning) -> Self {
        Self {
            controller: MovementController::new(tuning),
            layout: SensorLayout::default(),
            sensors: None,
            weapon: None,
        }
    }

    /// Fire projectiles on primary action
    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.weapon = Some(weapon);
        self
    }

    /// Use a different sensor layout
    pub fn with_sensor_layout(mut self, layout: SensorLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Sensors created during init
    pub fn sensors(&self) -> Option<CharacterSensors> {
        self.sensors
    }

    /// Movement state machine
    pub fn controller(&self) -> &MovementController {
        &self.controller
    }

    fn fire(&self, object: &GameObject, ctx: &mut GameContext<'_>) {
        let Some(weapon) = &self.weapon else {
            return;
        };
        let facing = self.controller.facing();
        let origin = object.transform().position
            + Vec2::new(facing.sign() * weapon.projectile.spawn_offset, 0.0);

        match projectile::spawn(ctx.physics, origin, facing, &weapon.projectile, weapon.texture) {
            Ok(bullet) => ctx.commands.spawn(bullet),
            Err(e) => log::warn!("'{}' failed to fire: {}", object.name(), e),
        }
    }
}

impl Component for PlayerComponent {
    fn init(&mut self, object: &mut GameObject, ctx: &mut GameContext<'_>) {
        let Some(body) = object.get_mut::<PhysicsBodyComponent>() else {
            log::error!("'{}' has a PlayerComponent but no physics body", object.name());
            return;
        };
        match CharacterSensors::attach(body, ctx.physics, &self.layout) {
            Ok(sensors) => self.sensors = Some(sensors),
            Err(e) => log::error!("Failed to attach sensors to '{}': {}", object.name(), e),
        }
    }

    fn update(&mut self, object: &mut GameObject, ctx: &mut GameContext<'_>) {
        let Some(sensors) = self.sensors else {
            return;
        };
        let intents = object
            .get::<BehaviourComponent>()
            .map_or_else(Intents::empty, BehaviourComponent::intents);
        let Some(body) = object.get::<PhysicsBodyComponent>() else {
            return;
        };

        let output = self.controller.tick(&ControllerInput {
            intents,
            contact: sensors.contact_state(body),
            velocity: body.linear_velocity(ctx.physics),
            mass: body.mass(ctx.physics),
        });

        if let Some(friction) = output.friction {
            body.set_friction(ctx.physics, friction);
        }
        for force in &output.forces {
            body.apply_force(ctx.physics, *force);
        }

        // Character art faces left
        if let (Some(facing), Some(sprite)) = (output.facing, object.get_mut::<Sprite>()) {
            sprite.set_flip_x(facing == Facing::Right);
        }

        if output.fire {
            self.fire(object, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviour::Behaviour;
    use approx::assert_relative_eq;
    use platform_engine::config::PhysicsConfig;
    use platform_engine::ecs::{GameObjectId, Scene, Tick};
    use platform_engine::foundation::math::Transform;
    use platform_engine::input::InputState;
    use platform_engine::physics::{BodyDef, BodyType, ScriptedEngine};

    #[derive(Debug)]
    struct Scripted(Intents);

    impl Behaviour for Scripted {
        fn intents(&mut self, _input: &InputState, _velocity: Vec2) -> Intents {
            self.0
        }
    }

    struct Rig {
        scene: Scene,
        physics: PhysicsSystem,
        input: InputState,
        id: GameObjectId,
    }

    impl Rig {
        fn new(intents: Intents, weapon: Option<Weapon>) -> Self {
            let mut physics = PhysicsSystem::scripted(PhysicsConfig {
                gravity: Vec2::zeros(),
                ..PhysicsConfig::default()
            });
            physics.init();

            let mut body = physics
                .create_body(BodyDef::new(BodyType::Dynamic, Vec2::new(4.0, 4.0)).with_fixed_rotation())
                .unwrap();
            body.add_shape(
                &mut physics,
                &ShapeDef::default().with_friction(0.3),
                &Geometry::centered_box(0.25, 0.5),
            )
            .unwrap();

            let mut player = PlayerComponent::new(MovementTuning::default());
            if let Some(weapon) = weapon {
                player = player.with_weapon(weapon);
            }
            let object = GameObject::named("player")
                .with_transform(Transform::from_position(Vec2::new(4.0, 4.0)))
                .with_component(body)
                .unwrap()
                .with_component(BehaviourComponent::new(Scripted(intents)))
                .unwrap()
                .with_component(player)
                .unwrap()
                .with_component(Sprite::tile(TextureHandle(0)))
                .unwrap();

            let mut scene = Scene::new();
            let input = InputState::default();
            let id = scene.insert(object, &mut physics, &input, Tick::default());
            Self {
                scene,
                physics,
                input,
                id,
            }
        }

        fn sensors(&self) -> CharacterSensors {
            self.scene
                .objects()
                .get(self.id)
                .and_then(|object| object.get::<PlayerComponent>())
                .and_then(PlayerComponent::sensors)
                .unwrap()
        }

        fn body(&self) -> &PhysicsBodyComponent {
            self.scene
                .objects()
                .get(self.id)
                .and_then(|object| object.get::<PhysicsBodyComponent>())
                .unwrap()
        }

        fn engine(&mut self) -> &mut ScriptedEngine {
            self.physics.engine_as_mut::<ScriptedEngine>().unwrap()
        }

        fn tick(&mut self) {
            let dt = 1.0 / 60.0;
            self.scene.step_physics(&mut self.physics, dt);
            self.scene
                .update(&mut self.physics, &self.input, Tick::new(dt, 0.0));
            self.scene
                .flush(&mut self.physics, &self.input, Tick::new(dt, 0.0));
        }
    }

    #[test]
    fn test_init_attaches_four_sensors() {
        let rig = Rig::new(Intents::empty(), None);
        let sensors = rig.sensors();
        let body = rig.body();

        assert_eq!(body.shapes().len(), 5);
        for shape in [sensors.bottom, sensors.top, sensors.left, sensors.right] {
            assert!(body.sensor(shape).is_some());
        }
        assert_eq!(sensors.contact_state(body), ContactState::default());
    }

    #[test]
    fn test_grounded_player_gets_ground_friction() {
        let mut rig = Rig::new(Intents::empty(), None);
        let sensors = rig.sensors();
        rig.engine().push_sensor_begin(sensors.bottom, ShapeHandle(999));
        rig.tick();

        assert!(rig.sensors().contact_state(rig.body()).on_ground);
        assert_eq!(rig.body().friction(&rig.physics), Some(1.0));
    }

    #[test]
    fn test_airborne_player_keeps_friction() {
        let mut rig = Rig::new(Intents::empty(), None);
        rig.tick();
        assert_eq!(rig.body().friction(&rig.physics), Some(0.3));
    }

    #[test]
    fn test_walk_force_reaches_body() {
        let mut rig = Rig::new(Intents::MOVE_RIGHT, None);
        let body = rig.body().body().unwrap();
        rig.tick();

        let forces = rig.engine().forces_on(body);
        assert_eq!(forces, vec![Vec2::new(50.0, 0.0)]);
    }

    #[test]
    fn test_grounded_jump_pushes_up_for_three_ticks() {
        let mut rig = Rig::new(Intents::JUMP, None);
        let body = rig.body().body().unwrap();
        let mass = rig.body().mass(&rig.physics);
        let sensors = rig.sensors();
        rig.engine().push_sensor_begin(sensors.bottom, ShapeHandle(999));

        for _ in 0..4 {
            rig.tick();
        }

        let forces = rig.engine().forces_on(body);
        assert_eq!(forces.len(), 3);
        for force in forces {
            assert_relative_eq!(force.y, -mass * 2.0 * 60.0);
        }
        let player = rig
            .scene
            .objects()
            .get(rig.id)
            .and_then(|object| object.get::<PlayerComponent>())
            .unwrap();
        assert!(!player.controller().jump_state().is_jumping);
    }

    #[test]
    fn test_sprite_faces_movement() {
        let mut rig = Rig::new(Intents::MOVE_RIGHT, None);
        rig.tick();
        let sprite = rig
            .scene
            .objects()
            .get(rig.id)
            .and_then(|object| object.get::<Sprite>())
            .unwrap();
        assert!(sprite.flip_x());
    }

    #[test]
    fn test_primary_action_spawns_projectile_next_flush() {
        let weapon = Weapon {
            projectile: ProjectileConfig {
                trail: false,
                ..ProjectileConfig::default()
            },
            texture: TextureHandle(7),
        };
        let mut rig = Rig::new(Intents::PRIMARY_ACTION, Some(weapon));
        assert_eq!(rig.scene.len(), 1);

        rig.tick();
        assert_eq!(rig.scene.len(), 2);

        let bullet = rig
            .scene
            .objects()
            .iter()
            .find(|object| object.name() == "bullet")
            .unwrap();
        assert!(bullet.is_initialized());
        assert_relative_eq!(bullet.transform().position.x, 5.0);
        assert_relative_eq!(bullet.transform().position.y, 4.0);
    }
}
