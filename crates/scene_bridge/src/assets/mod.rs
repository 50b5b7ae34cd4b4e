//! Asset resolution
//!
//! Turns the scene's texture and material declarations into renderer texture
//! handles and [`MaterialDescriptor`](crate::render::MaterialDescriptor)s.
//! Mesh and image files are never decoded here; they are passed to the
//! renderer as paths.

pub mod image_loader;
pub mod materials;
pub mod texture_cache;

pub use image_loader::ImageData;
pub use materials::{MaterialResolver, PbrChannel};
pub use texture_cache::TextureCache;

use std::path::PathBuf;

use thiserror::Error;

use crate::render::RenderError;

/// Asset errors
///
/// Any of these aborts the current load cycle: a renderer graph pointing at
/// assets that do not exist is not safe to draw.
#[derive(Error, Debug)]
pub enum AssetError {
    /// Referenced file does not exist
    #[error("{kind} file not found: {path:?}")]
    MissingFile {
        /// `mesh` or `texture`
        kind: &'static str,
        /// Resolved path
        path: PathBuf,
    },

    /// Renderer refused the asset
    #[error("Failed to load {what}: {source}")]
    LoadFailed {
        /// Path or description of the asset
        what: String,
        /// Renderer error
        source: RenderError,
    },
}
