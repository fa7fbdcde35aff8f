//! Material system for rendering

use crate::foundation::math::Vec3;

/// Surface material for a leaf node's mesh instance
///
/// Carries the classic lighting-model terms plus the extended coefficients
/// the scene description format can set (absorption, reflection,
/// transparency, refractive index).
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Ambient reflectance (RGB)
    pub ambient: Vec3,

    /// Diffuse reflectance (RGB)
    pub diffuse: Vec3,

    /// Specular reflectance (RGB)
    pub specular: Vec3,

    /// Emissive color (RGB)
    pub emission: Vec3,

    /// Specular exponent
    pub shininess: f32,

    /// Fraction of incoming light absorbed
    pub absorption: f32,

    /// Fraction of incoming light reflected
    pub reflection: f32,

    /// Fraction of incoming light transmitted
    pub transparency: f32,

    /// Refractive index of the material
    pub refractive_index: f32,
}

impl Material {
    /// Create a new material with default properties
    pub fn new() -> Self {
        Self {
            ambient: Vec3::zeros(),
            diffuse: Vec3::zeros(),
            specular: Vec3::zeros(),
            emission: Vec3::zeros(),
            shininess: 0.0,
            absorption: 1.0,
            reflection: 0.0,
            transparency: 0.0,
            refractive_index: 0.0,
        }
    }

    /// Set ambient, diffuse, and specular to a single flat color
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        let color = Vec3::new(r, g, b);
        self.ambient = color;
        self.diffuse = color;
        self.specular = color;
        self.shininess = 1.0;
        self
    }

    /// Set the ambient reflectance
    pub fn with_ambient(mut self, r: f32, g: f32, b: f32) -> Self {
        self.ambient = Vec3::new(r, g, b);
        self
    }

    /// Set the diffuse reflectance
    pub fn with_diffuse(mut self, r: f32, g: f32, b: f32) -> Self {
        self.diffuse = Vec3::new(r, g, b);
        self
    }

    /// Set the specular reflectance
    pub fn with_specular(mut self, r: f32, g: f32, b: f32) -> Self {
        self.specular = Vec3::new(r, g, b);
        self
    }

    /// Set the emissive color
    pub fn with_emission(mut self, r: f32, g: f32, b: f32) -> Self {
        self.emission = Vec3::new(r, g, b);
        self
    }

    /// Set the specular exponent
    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_color_sets_all_terms() {
        let material = Material::new().with_color(0.8, 0.4, 0.2);
        assert_eq!(material.ambient, Vec3::new(0.8, 0.4, 0.2));
        assert_eq!(material.diffuse, material.ambient);
        assert_eq!(material.specular, material.ambient);
        assert_eq!(material.shininess, 1.0);
    }

    #[test]
    fn test_default_is_black_and_opaque() {
        let material = Material::default();
        assert_eq!(material.diffuse, Vec3::zeros());
        assert_eq!(material.absorption, 1.0);
        assert_eq!(material.transparency, 0.0);
    }
}
