//! Texture cache for deduplicating renderer texture loads
//!
//! File textures are keyed by path, synthesized textures by content digest. A
//! second request for the same key returns the handle the renderer already
//! gave out. Each import builds a fresh cache, so handles never outlive the
//! load cycle that created them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{AssetError, ImageData};
use crate::render::{RenderBackend, TextureHandle, TextureSource};

/// Path- and digest-keyed texture handle cache
#[derive(Debug, Default)]
pub struct TextureCache {
    by_path: HashMap<PathBuf, TextureHandle>,
    by_digest: HashMap<String, TextureHandle>,
    texture_scale: f32,
    verify_files: bool,
}

impl TextureCache {
    /// Create an empty cache
    pub fn new(texture_scale: f32, verify_files: bool) -> Self {
        Self {
            texture_scale,
            verify_files,
            ..Self::default()
        }
    }

    /// Load a texture file, reusing the handle if the path was loaded before
    pub fn load_file(
        &mut self,
        renderer: &mut dyn RenderBackend,
        path: &Path,
    ) -> Result<TextureHandle, AssetError> {
        if let Some(&handle) = self.by_path.get(path) {
            log::trace!("Texture cache hit for {:?}", path);
            return Ok(handle);
        }

        if self.verify_files && !path.is_file() {
            return Err(AssetError::MissingFile {
                kind: "texture",
                path: path.to_path_buf(),
            });
        }

        let source = TextureSource::File(path.to_path_buf());
        let handle = renderer
            .load_texture(&source, self.texture_scale)
            .map_err(|e| AssetError::LoadFailed {
                what: path.display().to_string(),
                source: e,
            })?;

        log::debug!("Loaded texture {:?} as {:?}", path, handle);
        self.by_path.insert(path.to_path_buf(), handle);
        Ok(handle)
    }

    /// Upload synthesized pixels, reusing the handle for identical content
    pub fn load_pixels(
        &mut self,
        renderer: &mut dyn RenderBackend,
        image: ImageData,
    ) -> Result<TextureHandle, AssetError> {
        let digest = image.digest();
        if let Some(&handle) = self.by_digest.get(&digest) {
            return Ok(handle);
        }

        let source = TextureSource::Pixels {
            image,
            digest: digest.clone(),
        };
        let handle = renderer
            .load_texture(&source, self.texture_scale)
            .map_err(|e| AssetError::LoadFailed {
                what: source.describe(),
                source: e,
            })?;

        log::debug!("Synthesized texture {} as {:?}", source.describe(), handle);
        self.by_digest.insert(digest, handle);
        Ok(handle)
    }

    /// Number of distinct textures loaded
    pub fn len(&self) -> usize {
        self.by_path.len() + self.by_digest.len()
    }

    /// Check if nothing was loaded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
