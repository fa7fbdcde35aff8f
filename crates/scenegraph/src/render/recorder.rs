//! Recording renderer
//!
//! A [`ScenegraphRenderer`] that records every contract call instead of
//! talking to a graphics API. Used by tests to assert traversal order and
//! by tools that inspect a scene without opening a window.

use crate::assets::TextureImage;
use crate::foundation::math::Mat4;
use crate::render::backend::{
    RenderError, ScenegraphRenderer, ShaderLocations, DEFAULT_TEXTURE,
};
use crate::render::{Light, Material, Mesh};
use std::collections::BTreeMap;

/// Default number of light slots, matching a typical forward-shading
/// uniform array size
pub const DEFAULT_LIGHT_CAPACITY: usize = 8;

/// One recorded `draw_mesh` call
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    /// Mesh name the leaf referenced
    pub mesh: String,

    /// Material the leaf carried
    pub material: Material,

    /// Modelview matrix at the moment of the call
    pub modelview: Mat4,

    /// Texture actually bound, after default-texture fallback
    pub texture: String,
}

/// Renderer that records contract calls for inspection
pub struct RecordingRenderer {
    locations: Option<ShaderLocations>,
    meshes: BTreeMap<String, Mesh>,
    textures: BTreeMap<String, TextureImage>,
    lights: Vec<Light>,
    light_capacity: usize,

    /// Draw calls recorded since the last [`clear`](Self::clear)
    pub draw_calls: Vec<DrawCall>,

    /// Light sets bound via `draw_lights` since the last clear
    pub frame_lights: Vec<Vec<Light>>,
}

impl RecordingRenderer {
    /// Create a recorder with the default light capacity
    pub fn new() -> Self {
        Self::with_light_capacity(DEFAULT_LIGHT_CAPACITY)
    }

    /// Create a recorder with an explicit light slot count
    pub fn with_light_capacity(light_capacity: usize) -> Self {
        Self {
            locations: None,
            meshes: BTreeMap::new(),
            textures: BTreeMap::new(),
            lights: Vec::new(),
            light_capacity,
            draw_calls: Vec::new(),
            frame_lights: Vec::new(),
        }
    }

    /// Names of registered meshes, sorted
    pub fn mesh_names(&self) -> Vec<&str> {
        self.meshes.keys().map(String::as_str).collect()
    }

    /// Names of registered textures, sorted
    pub fn texture_names(&self) -> Vec<&str> {
        self.textures.keys().map(String::as_str).collect()
    }

    /// Lights bound by the most recent `add_lights`
    pub fn bound_lights(&self) -> &[Light] {
        &self.lights
    }

    /// Forget recorded calls, keeping registered resources
    pub fn clear(&mut self) {
        self.draw_calls.clear();
        self.frame_lights.clear();
    }

    fn require_shaders(&self) -> Result<(), RenderError> {
        if self.locations.is_some() {
            Ok(())
        } else {
            Err(RenderError::ShadersNotInitialized)
        }
    }
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenegraphRenderer for RecordingRenderer {
    fn init_shader_program(&mut self, locations: ShaderLocations) -> Result<(), RenderError> {
        self.locations = Some(locations);
        Ok(())
    }

    fn shader_location(&self, name: &str) -> Option<i32> {
        self.locations.as_ref()?.get(name)
    }

    fn add_mesh(&mut self, name: &str, mesh: &Mesh) -> Result<(), RenderError> {
        self.require_shaders()?;
        self.meshes.insert(name.to_string(), mesh.clone());
        Ok(())
    }

    fn add_texture(&mut self, name: &str, texture: &TextureImage) -> Result<(), RenderError> {
        self.require_shaders()?;
        self.textures.insert(name.to_string(), texture.clone());
        Ok(())
    }

    fn add_lights(&mut self, lights: &[Light]) -> Result<(), RenderError> {
        if lights.len() > self.light_capacity {
            return Err(RenderError::TooManyLights {
                count: lights.len(),
                capacity: self.light_capacity,
            });
        }
        self.lights = lights.to_vec();
        Ok(())
    }

    fn draw_mesh(
        &mut self,
        name: &str,
        material: &Material,
        transform: &Mat4,
        texture: Option<&str>,
    ) -> Result<(), RenderError> {
        if !self.meshes.contains_key(name) {
            log::warn!("draw_mesh: no mesh named '{name}', skipping");
            return Ok(());
        }

        let texture = texture
            .filter(|t| self.textures.contains_key(*t))
            .unwrap_or(DEFAULT_TEXTURE);

        self.draw_calls.push(DrawCall {
            mesh: name.to_string(),
            material: material.clone(),
            modelview: *transform,
            texture: texture.to_string(),
        });
        Ok(())
    }

    fn draw_lights(&mut self, lights: &[Light]) -> Result<(), RenderError> {
        if lights.len() > self.light_capacity {
            return Err(RenderError::TooManyLights {
                count: lights.len(),
                capacity: self.light_capacity,
            });
        }
        self.frame_lights.push(lights.to_vec());
        Ok(())
    }

    fn dispose(&mut self) {
        self.locations = None;
        self.meshes.clear();
        self.textures.clear();
        self.lights.clear();
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Vertex;

    fn ready_recorder() -> RecordingRenderer {
        let mut renderer = RecordingRenderer::new();
        renderer
            .init_shader_program(ShaderLocations::new())
            .unwrap();
        renderer
    }

    fn triangle() -> Mesh {
        Mesh::new(
            vec![
                Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
                Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
                Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
            ],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn test_add_mesh_requires_shader_init() {
        let mut renderer = RecordingRenderer::new();
        assert!(matches!(
            renderer.add_mesh("box", &triangle()),
            Err(RenderError::ShadersNotInitialized)
        ));
    }

    #[test]
    fn test_unknown_mesh_is_silent_noop() {
        let mut renderer = ready_recorder();
        renderer
            .draw_mesh("ghost", &Material::new(), &Mat4::identity(), None)
            .unwrap();
        assert!(renderer.draw_calls.is_empty());
    }

    #[test]
    fn test_missing_texture_falls_back_to_default() {
        let mut renderer = ready_recorder();
        renderer.add_mesh("box", &triangle()).unwrap();

        renderer
            .draw_mesh("box", &Material::new(), &Mat4::identity(), None)
            .unwrap();
        renderer
            .draw_mesh(
                "box",
                &Material::new(),
                &Mat4::identity(),
                Some("never-registered"),
            )
            .unwrap();

        assert_eq!(renderer.draw_calls.len(), 2);
        assert_eq!(renderer.draw_calls[0].texture, DEFAULT_TEXTURE);
        assert_eq!(renderer.draw_calls[1].texture, DEFAULT_TEXTURE);
    }

    #[test]
    fn test_registered_texture_is_kept() {
        let mut renderer = ready_recorder();
        renderer.add_mesh("box", &triangle()).unwrap();
        renderer
            .add_texture("checker", &TextureImage::solid_color(2, 2, [128, 128, 128, 255]))
            .unwrap();

        renderer
            .draw_mesh("box", &Material::new(), &Mat4::identity(), Some("checker"))
            .unwrap();
        assert_eq!(renderer.draw_calls[0].texture, "checker");
    }

    #[test]
    fn test_light_capacity_enforced() {
        let mut renderer = RecordingRenderer::with_light_capacity(2);
        let lights = vec![Light::new(), Light::new(), Light::new()];
        assert!(matches!(
            renderer.add_lights(&lights),
            Err(RenderError::TooManyLights { count: 3, capacity: 2 })
        ));

        renderer.add_lights(&lights[..2]).unwrap();
        assert_eq!(renderer.bound_lights().len(), 2);
    }

    #[test]
    fn test_add_lights_replaces_not_appends() {
        let mut renderer = ready_recorder();
        renderer.add_lights(&[Light::new(), Light::new()]).unwrap();
        renderer.add_lights(&[Light::new()]).unwrap();
        assert_eq!(renderer.bound_lights().len(), 1);
    }
}
