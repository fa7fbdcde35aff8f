//! # Scenegraph
//!
//! A hierarchical 3D scene graph library with a declarative scene builder.
//!
//! ## Features
//!
//! - **Node hierarchy**: Group, Transform, and Leaf nodes stored in an
//!   index-based arena, with parent links and per-node lights
//! - **Deterministic traversals**: stack-disciplined draw traversal and
//!   pre-order light accumulation into view space
//! - **Declarative scenes**: RON scene descriptions with node duplication
//!   (`copy_of`) and external sub-scene inclusion (`from`)
//! - **Renderer contract**: a narrow trait boundary; graphics-API bindings
//!   live outside this crate
//! - **Asset import**: Wavefront OBJ meshes and image textures
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scenegraph::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let builder = SceneBuilder::new();
//!     let mut scene = builder.load("scenes/demo.ron")?;
//!
//!     let mut renderer = RecordingRenderer::new();
//!     renderer.init_shader_program(ShaderLocations::new())?;
//!     scene.set_renderer(Box::new(renderer))?;
//!
//!     let mut model_view = MatrixStack::new();
//!     scene.animate(0.0)?;
//!     scene.draw(&mut model_view)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod assets;
pub mod render;
pub mod scene;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        foundation::math::{Mat4, Mat4Ext, MatrixStack, Vec3, Vec4},
        assets::{ImageData, ObjLoader, TextureImage},
        render::{
            Light, Material, Mesh, RecordingRenderer, RenderError, ScenegraphRenderer,
            ShaderLocations, Vertex,
        },
        scene::{
            AnimationFn, BuildError, NodeKey, SceneBuilder, SceneDescription, SceneError,
            SceneTree, Scenegraph,
        },
    };
}
