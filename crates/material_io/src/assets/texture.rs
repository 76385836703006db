//! In-memory texture payload
//!
//! Textures are stored as raw RGBA8 so they can round-trip through the image
//! store without format-specific state.

/// Decoded texture data referenced by material inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,
    /// Texture height in pixels
    pub height: u32,
    /// Raw RGBA pixel data, 4 bytes per pixel
    pub data: Vec<u8>,
}

impl Texture {
    /// Create a texture from raw RGBA8 bytes
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Create a solid color texture (useful for testing and defaults)
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = (width * height) as usize;
        let mut data = Vec::with_capacity(pixel_count * 4);

        for _ in 0..pixel_count {
            data.extend_from_slice(&color);
        }

        Self {
            width,
            height,
            data,
        }
    }

    /// Get the size of the pixel data in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}
