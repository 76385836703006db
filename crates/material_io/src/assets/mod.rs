//! Texture assets and the image store seam
//!
//! Material documents reference their textures as separate asset files; this
//! module holds the pixel payload type and the [`ImageIo`] seam the save and
//! load paths write and read those files through.

pub mod image_io;
pub mod texture;

pub use image_io::{DiskImageIo, ImageIo};
pub use texture::Texture;

use thiserror::Error;

/// Asset loading and saving errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Failed to load an asset
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),

    /// Failed to save an asset
    #[error("Failed to save asset: {0}")]
    SaveFailed(String),

    /// Asset data is inconsistent
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
