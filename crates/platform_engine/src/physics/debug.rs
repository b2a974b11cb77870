//! Physics debug overlay

use super::engine::{DebugShape, PhysicsEngine};
use crate::foundation::math::Vec2;
use crate::render::{Color, RenderContext};

bitflags::bitflags! {
    /// Which collider kinds the overlay draws
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DebugDrawFlags: u8 {
        /// Solid colliders
        const SOLIDS = 1 << 0;
        /// Sensor colliders
        const SENSORS = 1 << 1;
    }
}

const SOLID_COLOR: Color = Color::GREEN;
const SENSOR_COLOR: Color = Color::YELLOW;

/// Draw every engine shape selected by `flags`, in world space
pub fn draw_shapes(engine: &dyn PhysicsEngine, flags: DebugDrawFlags, ctx: &mut dyn RenderContext) {
    if flags.is_empty() {
        return;
    }
    for shape in engine.debug_shapes() {
        match shape {
            DebugShape::Polygon { vertices, sensor } => {
                if let Some(color) = color_for(sensor, flags) {
                    ctx.draw_polygon(&vertices, color);
                }
            }
            DebugShape::Circle {
                center,
                radius,
                sensor,
            } => {
                if let Some(color) = color_for(sensor, flags) {
                    ctx.draw_point(center, 4.0, color);
                    ctx.draw_line(center, center + Vec2::new(radius, 0.0), color);
                }
            }
        }
    }
}

fn color_for(sensor: bool, flags: DebugDrawFlags) -> Option<Color> {
    match (sensor, flags.contains(DebugDrawFlags::SENSORS), flags.contains(DebugDrawFlags::SOLIDS)) {
        (true, true, _) => Some(SENSOR_COLOR),
        (false, _, true) => Some(SOLID_COLOR),
        _ => None,
    }
}
