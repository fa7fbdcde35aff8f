//! Math utilities and types
//!
//! Provides fundamental math types for 3D graphics, plus the modelview
//! matrix stack used by the scene graph draw traversal.

pub use nalgebra::{Matrix4, Unit, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (homogeneous coordinates)
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a translation matrix
    fn translation(x: f32, y: f32, z: f32) -> Mat4;

    /// Create a non-uniform scaling matrix
    fn scaling(x: f32, y: f32, z: f32) -> Mat4;

    /// Create a rotation matrix around an arbitrary axis (angle in radians)
    fn rotation(angle: f32, axis: Vec3) -> Mat4;

    /// Create a rotation matrix around the X axis
    fn rotation_x(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Z axis
    fn rotation_z(angle: f32) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn translation(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::new_translation(&Vec3::new(x, y, z))
    }

    fn scaling(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::new_nonuniform_scaling(&Vec3::new(x, y, z))
    }

    fn rotation(angle: f32, axis: Vec3) -> Mat4 {
        Mat4::from_axis_angle(&Unit::new_normalize(axis), angle)
    }

    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }
}

/// Stack of modelview matrices driving the draw traversal.
///
/// A transform node duplicates the top entry, post-multiplies its matrices
/// into the copy, draws its subtree, and pops — so sibling subtrees never
/// observe each other's accumulated transform. The stack is seeded with a
/// single entry (the camera matrix, or identity) and the traversal keeps
/// pushes and pops balanced.
#[derive(Debug, Clone)]
pub struct MatrixStack {
    stack: Vec<Mat4>,
}

impl MatrixStack {
    /// Create a stack seeded with the identity matrix
    pub fn new() -> Self {
        Self::with_view(Mat4::identity())
    }

    /// Create a stack seeded with a camera (world-to-view) matrix
    pub fn with_view(view: Mat4) -> Self {
        Self { stack: vec![view] }
    }

    /// Get a copy of the top-of-stack matrix
    pub fn top(&self) -> Mat4 {
        self.stack.last().copied().unwrap_or_else(Mat4::identity)
    }

    /// Push a copy of the current top entry
    pub fn push_duplicate(&mut self) {
        let top = self.top();
        self.stack.push(top);
    }

    /// Post-multiply the top entry by the given matrix
    pub fn multiply_top(&mut self, m: &Mat4) {
        if let Some(top) = self.stack.last_mut() {
            *top = *top * m;
        }
    }

    /// Pop the top entry, returning it if the stack was non-empty
    pub fn pop(&mut self) -> Option<Mat4> {
        self.stack.pop()
    }

    /// Current number of entries
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_matrix_stack_push_pop_restores_top() {
        let view = Mat4::translation(0.0, 5.0, -10.0);
        let mut stack = MatrixStack::with_view(view);

        stack.push_duplicate();
        stack.multiply_top(&Mat4::scaling(2.0, 2.0, 2.0));
        assert_eq!(stack.depth(), 2);
        assert_relative_eq!(stack.top(), view * Mat4::scaling(2.0, 2.0, 2.0));

        stack.pop();
        assert_eq!(stack.depth(), 1);
        assert_relative_eq!(stack.top(), view);
    }

    #[test]
    fn test_multiply_top_post_multiplies() {
        let mut stack = MatrixStack::new();
        let t = Mat4::translation(1.0, 0.0, 0.0);
        let r = Mat4::rotation_y(utils::deg_to_rad(90.0));

        stack.multiply_top(&t);
        stack.multiply_top(&r);
        assert_relative_eq!(stack.top(), t * r, epsilon = 1e-6);
    }

    #[test]
    fn test_rotation_matches_axis_angle() {
        let a = Mat4::rotation(0.7, Vec3::new(0.0, 1.0, 0.0));
        let b = Mat4::rotation_y(0.7);
        assert_relative_eq!(a, b, epsilon = 1e-6);
    }

    #[test]
    fn test_deg_rad_round_trip() {
        assert_relative_eq!(utils::rad_to_deg(utils::deg_to_rad(135.0)), 135.0, epsilon = 1e-4);
    }
}
