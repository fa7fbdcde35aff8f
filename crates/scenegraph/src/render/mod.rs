//! Rendering data model and renderer contract
//!
//! This module holds everything the scene graph hands across the rendering
//! boundary: mesh geometry, materials, lights, and the
//! [`ScenegraphRenderer`] trait that graphics-API bindings implement. The
//! scene graph itself never talks to a graphics API; it only issues
//! contract calls during traversal.

mod mesh;
mod material;
mod lighting;
mod backend;
mod recorder;

pub use mesh::{Mesh, Vertex};
pub use material::Material;
pub use lighting::Light;
pub use backend::{RenderError, ScenegraphRenderer, ShaderLocations, DEFAULT_TEXTURE};
pub use recorder::{DrawCall, RecordingRenderer, DEFAULT_LIGHT_CAPACITY};
