//! Image store seam used by material save and load
//!
//! The save path persists each distinct texture once per session and the load
//! path reads each file once per session; both go through [`ImageIo`] so the
//! store can be swapped out in tests.

use std::path::Path;

use crate::assets::{AssetError, Texture};

/// Store that persists and retrieves texture assets by path
pub trait ImageIo {
    /// Load a texture asset from `path`
    fn load_image(&self, path: &str) -> Result<Texture, AssetError>;

    /// Save a texture asset to `path`
    fn save_image(&self, path: &str, texture: &Texture) -> Result<(), AssetError>;
}

/// Disk-backed image store (PNG, RGBA8 both ways)
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskImageIo;

impl ImageIo for DiskImageIo {
    fn load_image(&self, path: &str) -> Result<Texture, AssetError> {
        log::debug!("Loading image from: {path}");

        let img = image::open(Path::new(path))
            .map_err(|e| AssetError::LoadFailed(format!("Failed to load image: {e}")))?;

        // Normalize to RGBA8 regardless of the on-disk format
        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        log::debug!("Loaded image {width}x{height} from {path}");

        Ok(Texture::new(width, height, rgba_img.into_raw()))
    }

    fn save_image(&self, path: &str, texture: &Texture) -> Result<(), AssetError> {
        let expected = texture.width as usize * texture.height as usize * 4;
        if texture.data.len() != expected {
            return Err(AssetError::InvalidData(format!(
                "texture has {} bytes, expected {} for {}x{} RGBA",
                texture.data.len(),
                expected,
                texture.width,
                texture.height
            )));
        }

        log::debug!(
            "Saving image {}x{} to {path}",
            texture.width,
            texture.height
        );

        image::save_buffer(
            Path::new(path),
            &texture.data,
            texture.width,
            texture.height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| AssetError::SaveFailed(format!("Failed to save image: {e}")))
    }
}
