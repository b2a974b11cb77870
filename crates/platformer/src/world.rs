//! Game world: level, characters and the per-tick loop
//!
//! One [`GameWorld::update`] call runs, in order: physics step and event
//! dispatch, object updates, the vertical wraparound, the enemy spawn timer,
//! and finally the command flush that inserts new objects and sweeps removed
//! ones.

use crate::assets::GameTextures;
use crate::behaviour::BehaviourComponent;
use crate::config::GameConfig;
use crate::error::GameResult;
use crate::level;
use platform_engine::ecs::{FlushReport, GameObjectId, Scene, Tick};
use platform_engine::foundation::math::{Transform, Vec2};
use platform_engine::foundation::time::{IntervalTimer, Timer};
use platform_engine::input::{InputState, KeyCode};
use platform_engine::physics::{DebugDrawFlags, PhysicsBodyComponent, PhysicsSystem};
use platform_engine::render::{Color, RenderContext, TextureRegistry};

/// Top-level orchestrator
#[derive(Debug)]
pub struct GameWorld {
    config: GameConfig,
    physics: PhysicsSystem,
    scene: Scene,
    input: InputState,
    registry: TextureRegistry,
    textures: Option<GameTextures>,
    camera: Transform,
    timer: Timer,
    spawner: IntervalTimer,
    player: Option<GameObjectId>,
}

impl GameWorld {
    /// World simulated by rapier2d
    pub fn new(config: GameConfig) -> Self {
        let physics = PhysicsSystem::new(config.engine.physics.clone());
        Self::with_physics(config, physics)
    }

    /// World using the given physics system
    pub fn with_physics(config: GameConfig, physics: PhysicsSystem) -> Self {
        let spawner = IntervalTimer::new(config.world.first_spawn, config.world.spawn_interval);
        Self {
            config,
            physics,
            scene: Scene::new(),
            input: InputState::default(),
            registry: TextureRegistry::new(),
            textures: None,
            camera: Transform::identity(),
            timer: Timer::new(),
            spawner,
            player: None,
        }
    }

    /// Create the physics world and build the level and player
    pub fn init(&mut self) -> GameResult<()> {
        self.physics.init();
        if self.config.engine.debug_draw {
            self.physics.set_debug_draw(DebugDrawFlags::all());
        }

        let textures = GameTextures::acquire(&mut self.registry);
        self.textures = Some(textures);

        let tick = Tick::new(0.0, self.timer.total_time());
        for object in level::build_level(&mut self.physics, &textures)? {
            self.scene.insert(object, &mut self.physics, &self.input, tick);
        }
        let player = level::player(&mut self.physics, &textures, &self.config)?;
        self.player = Some(self.scene.insert(player, &mut self.physics, &self.input, tick));

        log::info!(
            "World initialized: {} objects, {} textures",
            self.scene.len(),
            self.registry.len()
        );
        Ok(())
    }

    /// Fit the square view into a `width` x `height` frame, centered
    pub fn resize(&mut self, width: f32, height: f32) {
        let view = self.config.world.view_size;
        let scale = (width / view).min(height / view);
        let offset = (Vec2::new(width, height) - Vec2::new(view, view) * scale) / 2.0;
        self.camera = Transform::from_position(offset).with_uniform_scale(scale);
        log::debug!("Resized to {}x{}, camera scale {}", width, height, scale);
    }

    /// Advance the world by one tick
    pub fn update(&mut self, input: InputState, delta_time: f32) -> FlushReport {
        self.input = input;
        self.timer.advance(delta_time);
        let tick = Tick::new(delta_time, self.timer.total_time());

        self.scene.step_physics(&mut self.physics, delta_time);
        self.scene.update(&mut self.physics, &self.input, tick);
        self.wrap_fallen_objects();
        self.spawn_enemies(tick.time);

        self.scene.flush(&mut self.physics, &self.input, tick)
    }

    fn wrap_fallen_objects(&mut self) {
        let rules = &self.config.world;
        for object in self.scene.objects_mut().iter_mut() {
            if object.is_removed() {
                continue;
            }
            let Some((transform, body)) = object.split_mut::<PhysicsBodyComponent>() else {
                continue;
            };
            if transform.position.y > rules.wrap_threshold {
                transform.position.y -= rules.wrap_offset;
                transform.position.x = rules.reentry_column;
                body.set_transform(&mut self.physics, transform.position, transform.rotation);
            }
        }
    }

    fn spawn_enemies(&mut self, now: f32) {
        if !self.spawner.poll(now) {
            return;
        }
        let alive = self.enemy_count();
        if alive >= self.config.world.max_enemies {
            log::trace!("Enemy spawn skipped, {} alive", alive);
            return;
        }
        let Some(textures) = self.textures else {
            return;
        };
        match level::enemy(&mut self.physics, &textures, &self.config) {
            Ok(enemy) => {
                log::debug!("Spawning enemy {} at t={:.2}", alive + 1, now);
                self.scene.spawn(enemy);
            }
            Err(e) => log::error!("Enemy spawn failed: {}", e),
        }
    }

    /// Live objects projectiles treat as targets
    pub fn enemy_count(&self) -> usize {
        self.scene
            .objects()
            .iter()
            .filter(|object| !object.is_removed())
            .filter(|object| {
                object
                    .get::<BehaviourComponent>()
                    .is_some_and(BehaviourComponent::is_target)
            })
            .count()
    }

    /// Draw the frame
    pub fn render(&self, ctx: &mut dyn RenderContext) {
        ctx.clear(Color::BLACK);
        ctx.push_transform(&self.camera);
        self.scene.render(ctx);
        self.physics.render_debug(ctx);
        ctx.pop_transform();
    }

    /// Key release handling; Q toggles the physics overlay
    pub fn on_key_released(&mut self, key: KeyCode) {
        if key == KeyCode::Q {
            self.physics.toggle_debug_draw();
        }
    }

    /// Deinitialize every object and release the physics world
    pub fn shutdown(&mut self) {
        let tick = Tick::new(0.0, self.timer.total_time());
        let count = self.scene.len();
        self.scene.clear(&mut self.physics, &self.input, tick);
        self.physics.shutdown();
        self.player = None;
        log::info!("World shut down, {} objects released", count);
    }

    /// Active configuration
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Live objects
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Live objects, mutably
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Physics world
    pub fn physics(&self) -> &PhysicsSystem {
        &self.physics
    }

    /// Physics world, mutably
    pub fn physics_mut(&mut self) -> &mut PhysicsSystem {
        &mut self.physics
    }

    /// World-to-frame transform
    pub fn camera(&self) -> &Transform {
        &self.camera
    }

    /// Texture names behind the handles used for drawing
    pub fn textures(&self) -> &TextureRegistry {
        &self.registry
    }

    /// The player object, while it lives
    pub fn player(&self) -> Option<GameObjectId> {
        self.player.filter(|id| self.scene.objects().contains(*id))
    }

    /// Simulated seconds since start
    pub fn time(&self) -> f32 {
        self.timer.total_time()
    }

    /// Time of the next enemy spawn attempt
    pub fn next_spawn(&self) -> f32 {
        self.spawner.next_due()
    }
}
