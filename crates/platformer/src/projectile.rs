//! Projectiles
//!
//! A projectile is a small dynamic circle launched by a one-step horizontal
//! force. It removes itself on its first solid contact, taking any target it
//! hit along, or when its lifetime runs out.

use crate::behaviour::BehaviourComponent;
use crate::config::ProjectileConfig;
use crate::error::GameResult;
use crate::movement::Facing;
use crate::sprite::Sprite;
use crate::trail::TrailRenderer;
use platform_engine::ecs::{Component, GameContext, GameObject};
use platform_engine::foundation::math::{Transform, Vec2};
use platform_engine::physics::{BodyDef, BodyType, Geometry, PhysicsBodyComponent, PhysicsSystem, ShapeDef};
use platform_engine::render::TextureHandle;

/// Despawn deadline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    /// Simulated time the owner entered the scene
    pub created_at: f32,
    /// Seconds to live; zero or less lives forever
    pub duration: f32,
}

impl Lifetime {
    /// Lifetime starting at `created_at`
    pub fn new(created_at: f32, duration: f32) -> Self {
        Self {
            created_at,
            duration,
        }
    }

    /// Check if the lifetime has run out at `now`
    pub fn is_expired(&self, now: f32) -> bool {
        self.duration > 0.0 && now >= self.created_at + self.duration
    }
}

/// Launch, hit and expiry logic of one projectile
#[derive(Debug, Clone)]
pub struct BulletComponent {
    launch_force: Vec2,
    lifetime: Lifetime,
}

impl BulletComponent {
    /// Projectile pushed by `launch_force` on its first step
    pub fn new(launch_force: Vec2, lifetime: f32) -> Self {
        Self {
            launch_force,
            lifetime: Lifetime::new(0.0, lifetime),
        }
    }

    /// Despawn deadline
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }
}

impl Component for BulletComponent {
    fn init(&mut self, object: &mut GameObject, ctx: &mut GameContext<'_>) {
        self.lifetime.created_at = ctx.tick.time;
        let Some(body) = object.get_mut::<PhysicsBodyComponent>() else {
            log::error!("Bullet '{}' has no physics body", object.name());
            return;
        };
        body.apply_force(ctx.physics, self.launch_force);
        body.set_collision_listener(|collision, commands| {
            let hit_target = collision
                .other_object
                .get::<BehaviourComponent>()
                .is_some_and(BehaviourComponent::is_target);
            if hit_target {
                log::debug!("Bullet hit '{}'", collision.other_object.name());
                commands.remove(collision.other);
            }
            commands.remove(collision.this);
        });
    }

    fn update(&mut self, object: &mut GameObject, ctx: &mut GameContext<'_>) {
        if self.lifetime.is_expired(ctx.tick.time) {
            object.remove();
        }
    }
}

/// Build a projectile at `origin` heading `facing`.
///
/// The body exists in the physics world as soon as this returns; queue the
/// object for spawning in the same tick.
pub fn spawn(
    physics: &mut PhysicsSystem,
    origin: Vec2,
    facing: Facing,
    config: &ProjectileConfig,
    texture: TextureHandle,
) -> GameResult<GameObject> {
    let mut body = physics.create_body(BodyDef::new(BodyType::Dynamic, origin).with_bullet())?;
    body.add_shape(
        physics,
        &ShapeDef::default().with_density(config.density),
        &Geometry::circle(config.radius),
    )?;

    let diameter = config.radius * 2.0;
    let mut object = GameObject::named("bullet")
        .with_transform(Transform::from_position(origin))
        .with_component(body)?
        .with_component(BulletComponent::new(
            Vec2::new(facing.sign() * config.launch_force, 0.0),
            config.lifetime,
        ))?
        .with_component(Sprite::new(texture, Vec2::new(diameter, diameter)))?;
    if config.trail {
        object.add_component(TrailRenderer::projectile())?;
    }
    Ok(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviour::EnemyBehaviour;
    use platform_engine::config::PhysicsConfig;
    use platform_engine::ecs::{GameObjectId, Scene, Tick};
    use platform_engine::input::InputState;
    use platform_engine::physics::{ScriptedEngine, ShapeHandle};

    fn physics() -> PhysicsSystem {
        let mut physics = PhysicsSystem::scripted(PhysicsConfig {
            gravity: Vec2::zeros(),
            ..PhysicsConfig::default()
        });
        physics.init();
        physics
    }

    fn boxed(
        physics: &mut PhysicsSystem,
        name: &str,
        position: Vec2,
        target: bool,
    ) -> (GameObject, ShapeHandle) {
        let mut body = physics
            .create_body(BodyDef::new(BodyType::Dynamic, position))
            .unwrap();
        let shape = body
            .add_shape(physics, &ShapeDef::default(), &Geometry::centered_box(0.5, 0.5))
            .unwrap();
        let mut object = GameObject::named(name).with_component(body).unwrap();
        if target {
            object
                .add_component(BehaviourComponent::new(EnemyBehaviour::default()))
                .unwrap();
        }
        (object, shape)
    }

    fn bullet_shape(scene: &Scene, id: GameObjectId) -> ShapeHandle {
        scene
            .objects()
            .get(id)
            .and_then(|object| object.get::<PhysicsBodyComponent>())
            .map(|body| body.shapes()[0])
            .unwrap()
    }

    fn tick(scene: &mut Scene, physics: &mut PhysicsSystem, time: f32) {
        let input = InputState::default();
        let dt = 1.0 / 60.0;
        scene.step_physics(physics, dt);
        scene.update(physics, &input, Tick::new(dt, time));
        scene.flush(physics, &input, Tick::new(dt, time));
    }

    #[test]
    fn test_lifetime_expiry() {
        let lifetime = Lifetime::new(1.0, 3.0);
        assert!(!lifetime.is_expired(3.9));
        assert!(lifetime.is_expired(4.0));
        assert!(!Lifetime::new(0.0, 0.0).is_expired(1000.0));
    }

    #[test]
    fn test_launch_force_follows_facing() {
        let mut physics = physics();
        let config = ProjectileConfig::default();
        let bullet = spawn(&mut physics, Vec2::new(1.0, 1.0), Facing::Left, &config, TextureHandle(0))
            .unwrap();
        assert!(bullet.has::<TrailRenderer>());

        let mut scene = Scene::new();
        let id = scene.insert(bullet, &mut physics, &InputState::default(), Tick::default());
        let body = scene
            .objects()
            .get(id)
            .and_then(|object| object.get::<PhysicsBodyComponent>())
            .and_then(PhysicsBodyComponent::body)
            .unwrap();

        let forces = physics.engine_as::<ScriptedEngine>().unwrap().forces_on(body);
        assert_eq!(forces, vec![Vec2::new(-config.launch_force, 0.0)]);
    }

    #[test]
    fn test_hit_removes_bullet_and_target() {
        let mut physics = physics();
        let config = ProjectileConfig {
            trail: false,
            ..ProjectileConfig::default()
        };
        let input = InputState::default();
        let mut scene = Scene::new();

        let bullet = spawn(&mut physics, Vec2::zeros(), Facing::Right, &config, TextureHandle(0))
            .unwrap();
        let bullet_id = scene.insert(bullet, &mut physics, &input, Tick::default());
        let (enemy, enemy_shape) = boxed(&mut physics, "enemy", Vec2::new(1.0, 0.0), true);
        let enemy_id = scene.insert(enemy, &mut physics, &input, Tick::default());

        let shape = bullet_shape(&scene, bullet_id);
        physics
            .engine_as_mut::<ScriptedEngine>()
            .unwrap()
            .push_body_begin(shape, enemy_shape);
        tick(&mut scene, &mut physics, 1.0 / 60.0);

        assert!(!scene.objects().contains(bullet_id));
        assert!(!scene.objects().contains(enemy_id));
    }

    #[test]
    fn test_hit_spares_non_targets() {
        let mut physics = physics();
        let config = ProjectileConfig::default();
        let input = InputState::default();
        let mut scene = Scene::new();

        let bullet = spawn(&mut physics, Vec2::zeros(), Facing::Right, &config, TextureHandle(0))
            .unwrap();
        let bullet_id = scene.insert(bullet, &mut physics, &input, Tick::default());
        let (crate_box, crate_shape) = boxed(&mut physics, "crate", Vec2::new(1.0, 0.0), false);
        let crate_id = scene.insert(crate_box, &mut physics, &input, Tick::default());

        let shape = bullet_shape(&scene, bullet_id);
        physics
            .engine_as_mut::<ScriptedEngine>()
            .unwrap()
            .push_body_begin(crate_shape, shape);
        tick(&mut scene, &mut physics, 1.0 / 60.0);

        assert!(!scene.objects().contains(bullet_id));
        assert!(scene.objects().contains(crate_id));
    }

    #[test]
    fn test_expired_bullet_removed() {
        let mut physics = physics();
        let config = ProjectileConfig {
            lifetime: 0.5,
            ..ProjectileConfig::default()
        };
        let mut scene = Scene::new();
        let bullet = spawn(&mut physics, Vec2::zeros(), Facing::Right, &config, TextureHandle(0))
            .unwrap();
        let id = scene.insert(bullet, &mut physics, &InputState::default(), Tick::default());

        tick(&mut scene, &mut physics, 0.25);
        assert!(scene.objects().contains(id));

        tick(&mut scene, &mut physics, 0.5);
        assert!(!scene.objects().contains(id));
        assert_eq!(physics.engine().map(|engine| engine.body_count()), Some(0));
    }
}
