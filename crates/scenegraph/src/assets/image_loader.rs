//! Image loading utilities for texture data
//!
//! Decodes PNG and other common formats into RGBA pixel data for the
//! texture registry.

use crate::assets::AssetError;
use std::path::Path;
use image;

/// Decoded image, always RGBA8
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Raw RGBA pixel data, row-major
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

/// A named texture image as stored in the scene's texture registry
pub type TextureImage = ImageData;

impl ImageData {
    /// Load an image from a file path, converting to RGBA8. A missing
    /// file is an IO error; undecodable bytes are a load failure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let img = image::load_from_memory(&bytes).map_err(|e| {
            AssetError::LoadFailed(format!("failed to decode {}: {e}", path.display()))
        })?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("loaded image {width}x{height} from {}", path.display());

        Ok(Self {
            data: rgba.into_raw(),
            width,
            height,
        })
    }

    /// Decode an image from an in-memory byte buffer
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| AssetError::LoadFailed(format!("failed to decode image: {e}")))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            data: rgba.into_raw(),
            width,
            height,
        })
    }

    /// Create a solid color image. The scene container seeds its texture
    /// registry with a white one under the default texture name.
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = (width * height) as usize;
        let mut data = Vec::with_capacity(pixel_count * 4);
        for _ in 0..pixel_count {
            data.extend_from_slice(&color);
        }
        Self { data, width, height }
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y * self.width + x) * 4) as usize;
        let px = self.data.get(offset..offset + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Size of the pixel data in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_io_error() {
        let result = ImageData::from_file("no-such-texture.png");
        assert!(matches!(result, Err(AssetError::Io(_))));
    }

    #[test]
    fn test_undecodable_bytes_are_load_failure() {
        let result = ImageData::from_bytes(b"not an image");
        assert!(matches!(result, Err(AssetError::LoadFailed(_))));
    }

    #[test]
    fn test_solid_color_image() {
        let img = ImageData::solid_color(4, 2, [255, 0, 0, 255]);
        assert_eq!(img.width, 4);
        assert_eq!(img.height, 2);
        assert_eq!(img.size_bytes(), 4 * 2 * 4);
        assert_eq!(img.pixel(3, 1), Some([255, 0, 0, 255]));
        assert_eq!(img.pixel(4, 0), None);
    }
}
