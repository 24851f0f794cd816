//! Math utilities and types
//!
//! Provides the vector and transform types used by the scene graph.

pub use nalgebra::{Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// Transform representing position, rotation, and scale
///
/// Rotation is stored as Euler angles in degrees. Composed rotations add
/// component-wise and are not normalized, so they may exceed ±360°.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Euler rotation in degrees (x, y, z)
    pub rotation: Vec3,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform from explicit components
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Combine this transform (as the parent) with a child's local transform
    ///
    /// Child positions are scaled component-wise by the parent and offset by
    /// the parent position; they are NOT rotated by the parent orientation,
    /// and rotations combine by angle addition. This is a deliberate
    /// simplification of true affine composition.
    pub fn combine(&self, local: &Self) -> Self {
        Self {
            position: self.position + self.scale.component_mul(&local.position),
            rotation: self.rotation + local.rotation,
            scale: self.scale.component_mul(&local.scale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_combine_is_neutral() {
        let local = Transform::new(
            Vec3::new(1.0, -2.0, 3.0),
            Vec3::new(10.0, 20.0, 30.0),
            Vec3::new(2.0, 2.0, 2.0),
        );

        let composed = Transform::identity().combine(&local);
        assert_eq!(composed, local);
    }

    #[test]
    fn test_combine_scales_child_offset() {
        let parent = Transform::new(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::zeros(),
            Vec3::new(2.0, 2.0, 2.0),
        );
        let local = Transform::from_position(Vec3::new(0.5, 0.5, 0.0));

        let composed = parent.combine(&local);
        assert_relative_eq!(composed.position.x, 2.0);
        assert_relative_eq!(composed.position.y, 1.0);
        assert_relative_eq!(composed.position.z, 0.0);
        assert_relative_eq!(composed.scale.x, 2.0);
    }

    #[test]
    fn test_combine_adds_rotation_unnormalized() {
        let parent = Transform::new(Vec3::zeros(), Vec3::new(0.0, 350.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let local = Transform::new(Vec3::zeros(), Vec3::new(0.0, 20.0, 0.0), Vec3::new(1.0, 1.0, 1.0));

        let composed = parent.combine(&local);
        assert_relative_eq!(composed.rotation.y, 370.0);
    }

    #[test]
    fn test_teapot_on_board_world_position() {
        // Teapot local (0.5, 0.5, 0) on a board at the origin with unit scale.
        let board = Transform::from_position(Vec3::zeros());
        let teapot = Transform::from_position(Vec3::new(0.5, 0.5, 0.0));

        let world = board.combine(&teapot);
        assert_relative_eq!(world.position.x, 0.5);
        assert_relative_eq!(world.position.y, 0.5);
        assert_relative_eq!(world.position.z, 0.0);
    }
}
