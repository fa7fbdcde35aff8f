//! Asset loading for meshes and textures
//!
//! Scene descriptions reference meshes and textures by file path; this
//! module turns those paths into in-memory data the renderer contract can
//! register. Loading happens once at scene-build time, never per frame.

pub mod image_loader;
pub mod obj_loader;

pub use image_loader::{ImageData, TextureImage};
pub use obj_loader::{ObjError, ObjLoader};

use thiserror::Error;

/// Errors that can occur during asset loading
#[derive(Error, Debug)]
pub enum AssetError {
    /// File system error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Asset failed to decode
    #[error("Load failed: {0}")]
    LoadFailed(String),
}
