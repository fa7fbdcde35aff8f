//! Renderer contract for scene graph traversal
//!
//! The scene container binds exactly one [`ScenegraphRenderer`] and pushes
//! its registries through it; the draw traversal then issues one
//! [`draw_mesh`](ScenegraphRenderer::draw_mesh) call per leaf. Concrete
//! implementations wrap a graphics API; binding that API's context is a
//! construction-time concern of each implementation, so a mismatched
//! context is a type error rather than a runtime check.

use crate::foundation::math::Mat4;
use crate::assets::TextureImage;
use crate::render::{Light, Material, Mesh};
use std::collections::BTreeMap;
use thiserror::Error;

/// Name of the fallback texture a renderer substitutes when a leaf names no
/// texture, or names one that was never registered
pub const DEFAULT_TEXTURE: &str = "white";

/// Errors from renderer-contract operations
#[derive(Error, Debug)]
pub enum RenderError {
    /// Resource registration attempted before shader setup
    #[error("shader locations not initialized; call init_shader_program before adding resources")]
    ShadersNotInitialized,

    /// A required shader variable is absent from the cached locations
    #[error("no shader variable named '{0}'")]
    MissingShaderVariable(String),

    /// More lights than the renderer has shader slots for
    #[error("light set of {count} exceeds renderer capacity of {capacity}")]
    TooManyLights {
        /// Number of lights submitted
        count: usize,
        /// Number of available light slots
        capacity: usize,
    },
}

/// Cached shader variable locations, queried once from a compiled shader
/// program and handed to the renderer before any resource registration
#[derive(Debug, Clone, Default)]
pub struct ShaderLocations {
    locations: BTreeMap<String, i32>,
}

impl ShaderLocations {
    /// Create an empty location table
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the location of a shader variable
    pub fn insert(&mut self, name: &str, location: i32) {
        self.locations.insert(name.to_string(), location);
    }

    /// Look up the location of a shader variable
    pub fn get(&self, name: &str) -> Option<i32> {
        self.locations.get(name).copied()
    }

    /// Look up a location, failing with a named error when absent
    pub fn require(&self, name: &str) -> Result<i32, RenderError> {
        self.get(name)
            .ok_or_else(|| RenderError::MissingShaderVariable(name.to_string()))
    }
}

/// Contract between the scene graph and a rendering backend
///
/// The container calls the registration methods once at bind time
/// ([`Scenegraph::set_renderer`](crate::scene::Scenegraph::set_renderer)),
/// and the draw traversal calls [`draw_mesh`](Self::draw_mesh) once per
/// leaf each frame. Registration before [`init_shader_program`]
/// (Self::init_shader_program) is an error, not a deferred retry.
pub trait ScenegraphRenderer {
    /// Cache shader variable locations; must precede `add_mesh`/`add_texture`
    fn init_shader_program(&mut self, locations: ShaderLocations) -> Result<(), RenderError>;

    /// Look up a cached shader variable location
    fn shader_location(&self, name: &str) -> Option<i32>;

    /// Register a mesh under a name for later drawing
    fn add_mesh(&mut self, name: &str, mesh: &Mesh) -> Result<(), RenderError>;

    /// Register a texture under a name for later drawing
    fn add_texture(&mut self, name: &str, texture: &TextureImage) -> Result<(), RenderError>;

    /// Replace the bound light set. Errors if `lights` exceeds the slot
    /// capacity; repeated calls re-bind rather than accumulate.
    fn add_lights(&mut self, lights: &[Light]) -> Result<(), RenderError>;

    /// Draw one mesh instance. An unregistered `name` is a silent no-op; a
    /// missing or unregistered texture falls back to [`DEFAULT_TEXTURE`].
    fn draw_mesh(
        &mut self,
        name: &str,
        material: &Material,
        transform: &Mat4,
        texture: Option<&str>,
    ) -> Result<(), RenderError>;

    /// Bind per-frame light values to their shader slots
    fn draw_lights(&mut self, lights: &[Light]) -> Result<(), RenderError>;

    /// Release renderer-held resources
    fn dispose(&mut self);
}
