//! Math utilities and types
//!
//! Provides the 2D math types used by the world, physics and render layers.
//! World units: one tile is one unit, the y axis points down.

pub use nalgebra::{Matrix3, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3x3 homogeneous matrix type for 2D transforms
pub type Mat3 = Matrix3<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec2,

    /// Rotation in radians
    pub rotation: f32,

    /// Scale factors; a negative x mirrors horizontally
    pub scale: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set rotation
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set scale
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Set uniform scale
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec2::new(scale, scale);
        self
    }

    /// Convert to a homogeneous matrix (translate * rotate * scale)
    pub fn to_matrix(&self) -> Mat3 {
        Mat3::new_translation(&self.position)
            * Mat3::new_rotation(self.rotation)
            * Mat3::new_nonuniform_scaling(&self.scale)
    }

    /// Inverse of [`Self::to_matrix`], or `None` when a scale axis is zero
    pub fn inverse_matrix(&self) -> Option<Mat3> {
        self.to_matrix().try_inverse()
    }

    /// Map a local point into the parent space
    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.to_matrix().transform_point(&Point2::from(point)).coords
    }

    /// Map a parent-space point into local space
    pub fn inverse_transform_point(&self, point: Vec2) -> Option<Vec2> {
        self.inverse_matrix()
            .map(|inverse| inverse.transform_point(&Point2::from(point)).coords)
    }
}

/// Check whether `value` lies within `tolerance` of zero
pub fn is_zero(value: f32, tolerance: f32) -> bool {
    value.abs() <= tolerance
}

/// Mathematical constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Epsilon for floating point comparisons
    pub const EPSILON: f32 = 1e-6;
}
