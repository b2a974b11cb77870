//! Level geometry and object factories
//!
//! Platforms are strips of one-unit tiles backed by a single static box.
//! Crates and characters are dynamic bodies with one solid box each.

use crate::assets::{GameTextures, StripTiles};
use crate::behaviour::{Behaviour, BehaviourComponent, EnemyBehaviour, PlayerBehaviour};
use crate::config::GameConfig;
use crate::error::GameResult;
use crate::player::{PlayerComponent, Weapon};
use crate::sprite::Sprite;
use platform_engine::ecs::{Component, GameObject};
use platform_engine::foundation::math::{Transform, Vec2};
use platform_engine::physics::{BodyDef, BodyType, Geometry, PhysicsSystem, ShapeDef};
use platform_engine::render::{Rect, RenderContext, TextureHandle};

/// Strip direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Tiles laid left to right
    Horizontal,
    /// Tiles laid top to bottom
    Vertical,
}

/// Row or column of tiles centered on its owner
#[derive(Debug, Clone)]
pub struct TileStrip {
    tiles: Vec<(TextureHandle, Vec2)>,
}

impl TileStrip {
    /// Strip of `length` tiles
    pub fn new(tiles: &StripTiles, orientation: Orientation, length: usize) -> Self {
        let half = (length as f32 - 1.0) * 0.5;
        let tiles = (0..length)
            .map(|index| {
                let along = index as f32 - half;
                let offset = match orientation {
                    Orientation::Horizontal => Vec2::new(along, 0.0),
                    Orientation::Vertical => Vec2::new(0.0, along),
                };
                (tiles.for_index(index, length), offset)
            })
            .collect();
        Self { tiles }
    }

    /// Tiles and their offsets from the strip center
    pub fn tiles(&self) -> &[(TextureHandle, Vec2)] {
        &self.tiles
    }
}

impl Component for TileStrip {
    fn render(&self, _object: &GameObject, ctx: &mut dyn RenderContext) {
        let tile = Rect::centered(Vec2::new(1.0, 1.0));
        for (texture, offset) in &self.tiles {
            ctx.draw_texture(*texture, tile.translated(*offset), false);
        }
    }
}

/// Static platform strip centered at `center`
pub fn platform(
    physics: &mut PhysicsSystem,
    tiles: &StripTiles,
    orientation: Orientation,
    center: Vec2,
    length: usize,
) -> GameResult<GameObject> {
    let half_length = length as f32 * 0.5;
    let geometry = match orientation {
        Orientation::Horizontal => Geometry::centered_box(half_length, 0.5),
        Orientation::Vertical => Geometry::centered_box(0.5, half_length),
    };
    let mut body = physics.create_body(BodyDef::new(BodyType::Static, center))?;
    body.add_shape(
        physics,
        &ShapeDef::default().with_friction(1.0).with_restitution(0.0),
        &geometry,
    )?;

    Ok(GameObject::named("platform")
        .with_transform(Transform::from_position(center))
        .with_component(body)?
        .with_component(TileStrip::new(tiles, orientation, length))?)
}

/// One-unit dynamic crate
pub fn crate_box(
    physics: &mut PhysicsSystem,
    texture: TextureHandle,
    position: Vec2,
) -> GameResult<GameObject> {
    let mut body = physics.create_body(BodyDef::new(BodyType::Dynamic, position))?;
    body.add_shape(
        physics,
        &ShapeDef::default().with_density(1.0).with_friction(0.3),
        &Geometry::centered_box(0.5, 0.5),
    )?;

    Ok(GameObject::named("crate")
        .with_transform(Transform::from_position(position))
        .with_component(body)?
        .with_component(Sprite::tile(texture))?)
}

fn character(
    name: &str,
    physics: &mut PhysicsSystem,
    position: Vec2,
    behaviour: impl Behaviour + 'static,
    controller: PlayerComponent,
    texture: TextureHandle,
) -> GameResult<GameObject> {
    let mut body =
        physics.create_body(BodyDef::new(BodyType::Dynamic, position).with_fixed_rotation())?;
    body.add_shape(
        physics,
        &ShapeDef::default()
            .with_density(1.0)
            .with_friction(1.0)
            .with_restitution(0.0),
        &Geometry::centered_box(0.25, 0.5),
    )?;

    // Behaviour updates before the controller reads its intents
    Ok(GameObject::named(name)
        .with_transform(Transform::from_position(position))
        .with_component(body)?
        .with_component(BehaviourComponent::new(behaviour))?
        .with_component(controller)?
        .with_component(Sprite::tile(texture))?)
}

/// Input-driven player character
pub fn player(
    physics: &mut PhysicsSystem,
    textures: &GameTextures,
    config: &GameConfig,
) -> GameResult<GameObject> {
    let controller = PlayerComponent::new(config.movement.clone()).with_weapon(Weapon {
        projectile: config.projectile.clone(),
        texture: textures.bullet,
    });
    character(
        "player",
        physics,
        config.world.player_start,
        PlayerBehaviour,
        controller,
        textures.player,
    )
}

/// AI-driven enemy at the configured spawn point
pub fn enemy(
    physics: &mut PhysicsSystem,
    textures: &GameTextures,
    config: &GameConfig,
) -> GameResult<GameObject> {
    character(
        "enemy",
        physics,
        config.world.spawn_point,
        EnemyBehaviour::default(),
        PlayerComponent::new(config.movement.clone()),
        textures.enemy,
    )
}

/// Static geometry and crates, in draw order
pub fn build_level(
    physics: &mut PhysicsSystem,
    textures: &GameTextures,
) -> GameResult<Vec<GameObject>> {
    let mut objects = vec![
        platform(physics, &textures.ground, Orientation::Horizontal, Vec2::new(8.0, 15.5), 16)?,
        platform(physics, &textures.column, Orientation::Vertical, Vec2::new(15.5, 7.5), 15)?,
        platform(physics, &textures.column, Orientation::Vertical, Vec2::new(12.5, 12.0), 2)?,
        platform(physics, &textures.column, Orientation::Vertical, Vec2::new(11.5, 13.0), 2)?,
    ];

    let rows = 4;
    for row in 0..rows {
        for column in 0..rows - row {
            let position = Vec2::new(
                column as f32 + 0.5 + row as f32 * 0.5,
                14.0 - 2.0 * row as f32 + 0.5,
            );
            objects.push(crate_box(physics, textures.crate_box, position)?);
        }
    }
    objects.push(crate_box(physics, textures.crate_special, Vec2::new(6.5, 14.5))?);

    Ok(objects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use platform_engine::config::PhysicsConfig;
    use platform_engine::physics::{DebugShape, PhysicsBodyComponent};
    use platform_engine::render::{CommandRecorder, TextureRegistry};

    fn setup() -> (PhysicsSystem, GameTextures) {
        let mut physics = PhysicsSystem::scripted(PhysicsConfig::default());
        physics.init();
        let textures = GameTextures::acquire(&mut TextureRegistry::new());
        (physics, textures)
    }

    #[test]
    fn test_strip_tiles_centered() {
        let tiles = StripTiles {
            first: TextureHandle(1),
            middle: TextureHandle(2),
            last: TextureHandle(3),
        };
        let strip = TileStrip::new(&tiles, Orientation::Vertical, 2);

        assert_eq!(strip.tiles().len(), 2);
        assert_eq!(strip.tiles()[0].0, TextureHandle(1));
        assert_relative_eq!(strip.tiles()[0].1.y, -0.5);
        assert_eq!(strip.tiles()[1].0, TextureHandle(3));
        assert_relative_eq!(strip.tiles()[1].1.y, 0.5);
    }

    #[test]
    fn test_platform_has_one_body_spanning_strip() {
        let (mut physics, textures) = setup();
        let ground = platform(
            &mut physics,
            &textures.ground,
            Orientation::Horizontal,
            Vec2::new(8.0, 15.5),
            16,
        )
        .unwrap();

        let body = ground.get::<PhysicsBodyComponent>().unwrap();
        assert_eq!(body.shapes().len(), 1);
        assert_eq!(body.friction(&physics), Some(1.0));

        let engine = physics.engine().unwrap();
        assert_eq!(engine.body_count(), 1);
        match &engine.debug_shapes()[0] {
            DebugShape::Polygon { vertices, .. } => {
                assert_relative_eq!(vertices[0].x, 0.0);
                assert_relative_eq!(vertices[1].x, 16.0);
                assert_relative_eq!(vertices[0].y, 15.0);
            }
            other => panic!("unexpected shape {other:?}"),
        }

        let mut recorder = CommandRecorder::new();
        ground.render(&mut recorder);
        assert_eq!(recorder.texture_count(), 16);
    }

    #[test]
    fn test_level_layout() {
        let (mut physics, textures) = setup();
        let level = build_level(&mut physics, &textures).unwrap();

        let crates: Vec<_> = level.iter().filter(|object| object.name() == "crate").collect();
        assert_eq!(crates.len(), 11);
        assert_eq!(level.len(), 15);
        assert_eq!(physics.engine().map(|engine| engine.body_count()), Some(15));

        // Top of the pyramid
        let top = crates[9].transform().position;
        assert_relative_eq!(top.x, 2.0);
        assert_relative_eq!(top.y, 8.5);
    }

    #[test]
    fn test_character_body_and_components() {
        let (mut physics, textures) = setup();
        let config = GameConfig::default();
        let player = player(&mut physics, &textures, &config).unwrap();

        assert!(player.has::<BehaviourComponent>());
        assert!(player.has::<PlayerComponent>());
        assert!(player.has::<Sprite>());
        let body = player.get::<PhysicsBodyComponent>().unwrap();
        assert_relative_eq!(body.mass(&physics), 0.5);
        assert_relative_eq!(player.transform().position.x, 7.5);

        let enemy = enemy(&mut physics, &textures, &config).unwrap();
        assert!(enemy
            .get::<BehaviourComponent>()
            .is_some_and(BehaviourComponent::is_target));
    }
}
