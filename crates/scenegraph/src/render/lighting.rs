//! Lighting system
//!
//! Lights attach to scene graph nodes and are accumulated into view space
//! once per frame. A light's position is homogeneous: `w = 1` marks a point
//! light, `w = 0` a directional light, so a single matrix multiply maps
//! either kind into a new coordinate space.

use crate::foundation::math::{utils, Mat4, Vec3, Vec4};

/// Light source attached to a scene graph node
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Ambient color contribution (RGB)
    pub ambient: Vec3,

    /// Diffuse color contribution (RGB)
    pub diffuse: Vec3,

    /// Specular color contribution (RGB)
    pub specular: Vec3,

    /// Homogeneous position: `w = 1` for a point light, `w = 0` for a
    /// directional light (in which case `xyz` is the direction)
    pub position: Vec4,

    /// Spotlight direction (`w = 0`); meaningful when `spot_cutoff > 0`
    pub spot_direction: Vec4,

    /// Cosine of the spotlight half-angle; `0` means not a spotlight
    pub spot_cutoff: f32,
}

impl Light {
    /// Create a light with all terms zeroed, positioned at the origin
    pub fn new() -> Self {
        Self {
            ambient: Vec3::zeros(),
            diffuse: Vec3::zeros(),
            specular: Vec3::zeros(),
            position: Vec4::new(0.0, 0.0, 0.0, 1.0),
            spot_direction: Vec4::zeros(),
            spot_cutoff: 0.0,
        }
    }

    /// Set the ambient color
    pub fn set_ambient(&mut self, r: f32, g: f32, b: f32) {
        self.ambient = Vec3::new(r, g, b);
    }

    /// Set the diffuse color
    pub fn set_diffuse(&mut self, r: f32, g: f32, b: f32) {
        self.diffuse = Vec3::new(r, g, b);
    }

    /// Set the specular color
    pub fn set_specular(&mut self, r: f32, g: f32, b: f32) {
        self.specular = Vec3::new(r, g, b);
    }

    /// Place the light at a point (`w = 1`)
    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vec4::new(x, y, z, 1.0);
    }

    /// Make the light directional along the given vector (`w = 0`)
    pub fn set_direction(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vec4::new(x, y, z, 0.0);
    }

    /// Set the spotlight direction
    pub fn set_spot_direction(&mut self, x: f32, y: f32, z: f32) {
        self.spot_direction = Vec4::new(x, y, z, 0.0);
    }

    /// Set the spotlight half-angle, in degrees; stored as its cosine
    pub fn set_spot_angle(&mut self, degrees: f32) {
        self.spot_cutoff = utils::deg_to_rad(degrees).cos();
    }

    /// Whether this is a directional light (`w = 0`)
    pub fn is_directional(&self) -> bool {
        self.position.w == 0.0
    }

    /// Whether this light has a spotlight cone
    pub fn is_spot(&self) -> bool {
        self.spot_cutoff > 0.0
    }

    /// Return a copy of this light with position and spot direction mapped
    /// by the given matrix. The original light is left untouched; the scene
    /// keeps its lights in local coordinates and hands out transformed
    /// copies each frame.
    pub fn transformed(&self, m: &Mat4) -> Self {
        let mut light = self.clone();
        light.position = m * self.position;
        light.spot_direction = m * self.spot_direction;
        light
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Mat4Ext;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_light_translates() {
        let mut light = Light::new();
        light.set_position(1.0, 2.0, 3.0);

        let moved = light.transformed(&Mat4::translation(10.0, 0.0, 0.0));
        assert_relative_eq!(moved.position, Vec4::new(11.0, 2.0, 3.0, 1.0));
        // source untouched
        assert_relative_eq!(light.position, Vec4::new(1.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn test_directional_light_ignores_translation() {
        let mut light = Light::new();
        light.set_direction(0.0, -1.0, 0.0);
        assert!(light.is_directional());

        let moved = light.transformed(&Mat4::translation(5.0, 5.0, 5.0));
        assert_relative_eq!(moved.position, Vec4::new(0.0, -1.0, 0.0, 0.0));
    }

    #[test]
    fn test_spot_angle_stores_cosine() {
        let mut light = Light::new();
        light.set_spot_angle(60.0);
        assert_relative_eq!(light.spot_cutoff, 0.5, epsilon = 1e-6);
        assert!(light.is_spot());
    }

    #[test]
    fn test_spot_direction_rotates() {
        let mut light = Light::new();
        light.set_spot_direction(0.0, 0.0, -1.0);

        let rotated = light.transformed(&Mat4::rotation_y(utils::deg_to_rad(90.0)));
        assert_relative_eq!(rotated.spot_direction.x, -1.0, epsilon = 1e-6);
        assert_relative_eq!(rotated.spot_direction.z, 0.0, epsilon = 1e-6);
    }
}
