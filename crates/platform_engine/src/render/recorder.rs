//! Recording render context

use super::{Color, Rect, RenderContext, TextureHandle};
use crate::foundation::math::{Mat3, Point2, Transform, Vec2};

/// One recorded draw call, already mapped to frame space
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Frame clear
    Clear(Color),
    /// Textured quad; `transform` maps the local `dest` rectangle to frame space
    Texture {
        /// Texture drawn
        texture: TextureHandle,
        /// Destination in local space
        dest: Rect,
        /// Mirrored horizontally
        flip_x: bool,
        /// Local-to-frame matrix at submission
        transform: Mat3,
    },
    /// Line in frame space
    Line {
        /// Start point
        from: Vec2,
        /// End point
        to: Vec2,
        /// Line color
        color: Color,
    },
    /// Point in frame space
    Point {
        /// Position
        at: Vec2,
        /// Size in pixels
        size: f32,
        /// Point color
        color: Color,
    },
}

/// [`RenderContext`] that stores commands instead of drawing
#[derive(Debug)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
    stack: Vec<Mat3>,
}

impl Default for CommandRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRecorder {
    /// Create an empty recorder with an identity transform
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            stack: vec![Mat3::identity()],
        }
    }

    /// Drop recorded commands and reset the transform stack
    pub fn clear(&mut self) {
        self.commands.clear();
        self.stack.truncate(1);
    }

    /// Recorded commands in submission order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of textured quads recorded
    pub fn texture_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Texture { .. }))
            .count()
    }

    /// Current transform stack depth, 1 when balanced
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn current(&self) -> Mat3 {
        self.stack.last().copied().unwrap_or_else(Mat3::identity)
    }

    fn to_frame(&self, point: Vec2) -> Vec2 {
        self.current().transform_point(&Point2::from(point)).coords
    }
}

impl RenderContext for CommandRecorder {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn push_transform(&mut self, transform: &Transform) {
        let combined = self.current() * transform.to_matrix();
        self.stack.push(combined);
    }

    fn pop_transform(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        } else {
            log::warn!("Unbalanced pop_transform ignored");
        }
    }

    fn draw_texture(&mut self, texture: TextureHandle, dest: Rect, flip_x: bool) {
        let transform = self.current();
        self.commands.push(DrawCommand::Texture {
            texture,
            dest,
            flip_x,
            transform,
        });
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        let (from, to) = (self.to_frame(from), self.to_frame(to));
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn draw_point(&mut self, at: Vec2, size: f32, color: Color) {
        let at = self.to_frame(at);
        self.commands.push(DrawCommand::Point { at, size, color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lines_are_mapped_through_stack() {
        let mut recorder = CommandRecorder::new();
        recorder.push_transform(&Transform::identity().with_uniform_scale(2.0));
        recorder.push_transform(&Transform::from_position(Vec2::new(1.0, 0.0)));
        recorder.draw_line(Vec2::zeros(), Vec2::new(0.0, 1.0), Color::WHITE);
        recorder.pop_transform();
        recorder.pop_transform();

        assert_eq!(recorder.depth(), 1);
        match &recorder.commands()[0] {
            DrawCommand::Line { from, to, .. } => {
                assert_relative_eq!(*from, Vec2::new(2.0, 0.0));
                assert_relative_eq!(*to, Vec2::new(2.0, 2.0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_polygon_closes_outline() {
        let mut recorder = CommandRecorder::new();
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        recorder.draw_polygon(&square, Color::GREEN);
        assert_eq!(recorder.commands().len(), 4);
    }

    #[test]
    fn test_unbalanced_pop_keeps_root() {
        let mut recorder = CommandRecorder::new();
        recorder.pop_transform();
        assert_eq!(recorder.depth(), 1);
    }
}
