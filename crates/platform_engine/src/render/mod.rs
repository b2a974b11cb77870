//! Render boundary
//!
//! Components draw through the [`RenderContext`] trait; the concrete 2D
//! renderer lives outside this crate. [`CommandRecorder`] is an in-memory
//! context used by the headless runner and tests.

pub mod recorder;
pub mod texture;

pub use recorder::{CommandRecorder, DrawCommand};
pub use texture::{TextureHandle, TextureRegistry};

use crate::foundation::math::{Transform, Vec2};

/// RGBA color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque white
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque green
    pub const GREEN: Self = Self::rgb(0.2, 0.9, 0.3);
    /// Opaque yellow
    pub const YELLOW: Self = Self::rgb(1.0, 0.85, 0.1);
    /// Opaque cyan
    pub const CYAN: Self = Self::rgb(0.0, 0.8, 1.0);

    /// Create an opaque color
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// Axis-aligned rectangle in the current local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner
    pub origin: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    /// Rectangle of `size` centered on the local origin
    pub fn centered(size: Vec2) -> Self {
        Self {
            origin: -size * 0.5,
            size,
        }
    }

    /// Same rectangle moved by `offset`
    pub fn translated(self, offset: Vec2) -> Self {
        Self {
            origin: self.origin + offset,
            ..self
        }
    }
}

/// Drawing context handed to every component's `render`
pub trait RenderContext {
    /// Clear the frame
    fn clear(&mut self, color: Color);

    /// Push a transform onto the stack, composed with the current one
    fn push_transform(&mut self, transform: &Transform);

    /// Pop the most recent transform
    fn pop_transform(&mut self);

    /// Draw a textured quad covering `dest`
    fn draw_texture(&mut self, texture: TextureHandle, dest: Rect, flip_x: bool);

    /// Draw a line segment
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color);

    /// Draw a point
    fn draw_point(&mut self, at: Vec2, size: f32, color: Color);

    /// Draw a closed polygon outline
    fn draw_polygon(&mut self, vertices: &[Vec2], color: Color) {
        for (index, from) in vertices.iter().enumerate() {
            let to = vertices[(index + 1) % vertices.len()];
            self.draw_line(*from, to, color);
        }
    }
}
