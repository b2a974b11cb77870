//! Textured quad drawn at the owner's transform

use platform_engine::ecs::{Component, GameObject};
use platform_engine::foundation::math::Vec2;
use platform_engine::render::{Rect, RenderContext, TextureHandle};

/// Single-texture sprite centered on its owner
#[derive(Debug, Clone)]
pub struct Sprite {
    texture: TextureHandle,
    size: Vec2,
    flip_x: bool,
}

impl Sprite {
    /// Sprite of `size` world units
    pub fn new(texture: TextureHandle, size: Vec2) -> Self {
        Self {
            texture,
            size,
            flip_x: false,
        }
    }

    /// One-by-one tile sprite
    pub fn tile(texture: TextureHandle) -> Self {
        Self::new(texture, Vec2::new(1.0, 1.0))
    }

    /// Texture drawn
    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    /// Mirrored horizontally
    pub fn flip_x(&self) -> bool {
        self.flip_x
    }

    /// Mirror horizontally
    pub fn set_flip_x(&mut self, flip_x: bool) {
        self.flip_x = flip_x;
    }
}

impl Component for Sprite {
    fn render(&self, _object: &GameObject, ctx: &mut dyn RenderContext) {
        ctx.draw_texture(self.texture, Rect::centered(self.size), self.flip_x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use platform_engine::foundation::math::Transform;
    use platform_engine::render::{CommandRecorder, DrawCommand};

    #[test]
    fn test_renders_under_owner_transform() {
        let mut sprite = Sprite::tile(TextureHandle(3));
        sprite.set_flip_x(true);
        let object = GameObject::named("crate")
            .with_transform(Transform::from_position(Vec2::new(4.0, 2.0)))
            .with_component(sprite)
            .unwrap();

        let mut recorder = CommandRecorder::new();
        object.render(&mut recorder);

        match &recorder.commands()[0] {
            DrawCommand::Texture {
                texture,
                dest,
                flip_x,
                transform,
            } => {
                assert_eq!(*texture, TextureHandle(3));
                assert_eq!(*dest, Rect::centered(Vec2::new(1.0, 1.0)));
                assert!(*flip_x);
                assert_relative_eq!(transform[(0, 2)], 4.0);
                assert_relative_eq!(transform[(1, 2)], 2.0);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(recorder.depth(), 1);
    }
}
