//! Material resolver
//!
//! Builds [`MaterialDescriptor`]s from material declarations, loading base
//! textures through the [`TextureCache`] and filling PBR channels from sibling
//! files or from synthesized single-pixel images.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::assets::{ImageData, TextureCache};
use crate::bridge::{BridgeResult, ConfigurationError};
use crate::config::BridgeConfig;
use crate::render::{MaterialDescriptor, RenderBackend, TextureHandle, TexturedMaterial};
use crate::scene::{MaterialNode, SceneDocument, TextureSourceNode};

/// PBR channel probed next to a base texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PbrChannel {
    /// Roughness map
    Roughness,
    /// Normal map
    Normal,
    /// Metallic map
    Metallic,
}

impl PbrChannel {
    /// Filename suffix appended to the base texture's stem
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Roughness => "-roughness",
            Self::Normal => "-normal",
            Self::Metallic => "-metallic",
        }
    }

    /// `dir/wood.png` becomes `dir/wood-roughness.png`
    pub fn sibling_path(self, base: &Path) -> Option<PathBuf> {
        let stem = base.file_stem()?.to_str()?;
        let mut name = format!("{stem}{}", self.suffix());
        if let Some(ext) = base.extension().and_then(|ext| ext.to_str()) {
            name.push('.');
            name.push_str(ext);
        }
        Some(base.with_file_name(name))
    }
}

/// Resolves material declarations into renderer descriptors, once per name
#[derive(Debug)]
pub struct MaterialResolver {
    textures: TextureCache,
    resolved: HashMap<String, MaterialDescriptor>,
    enable_pbr: bool,
}

impl MaterialResolver {
    /// Create a resolver for one load cycle
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            textures: TextureCache::new(config.texture_scale, config.verify_asset_files),
            resolved: HashMap::new(),
            enable_pbr: config.enable_pbr,
        }
    }

    /// Resolve a material declaration
    ///
    /// Without a texture reference the material is its flat color (opaque
    /// white when absent). A color texture (no file) also gives a flat color.
    /// A file texture gives a texture-backed descriptor with whatever PBR
    /// channels can be found or synthesized.
    pub fn resolve(
        &mut self,
        document: &SceneDocument,
        material: &MaterialNode,
        renderer: &mut dyn RenderBackend,
    ) -> BridgeResult<MaterialDescriptor> {
        if let Some(descriptor) = self.resolved.get(&material.name) {
            return Ok(descriptor.clone());
        }

        let descriptor = self.resolve_uncached(document, material, renderer)?;
        log::debug!("Resolved material '{}': {:?}", material.name, descriptor);
        self.resolved.insert(material.name.clone(), descriptor.clone());
        Ok(descriptor)
    }

    fn resolve_uncached(
        &mut self,
        document: &SceneDocument,
        material: &MaterialNode,
        renderer: &mut dyn RenderBackend,
    ) -> BridgeResult<MaterialDescriptor> {
        let Some(texture_name) = &material.texture else {
            return Ok(MaterialDescriptor::color(material.rgba.unwrap_or([1.0, 1.0, 1.0, 1.0])));
        };

        let texture = document.texture(texture_name).ok_or_else(|| ConfigurationError::UnknownTexture {
            material: material.name.clone(),
            texture: texture_name.clone(),
        })?;

        let path = match &texture.source {
            TextureSourceNode::File(path) => path,
            TextureSourceNode::Color(rgb) => {
                // Builtin gradients and checkers have no file; use their primary color
                return Ok(MaterialDescriptor::Color { kd: *rgb });
            }
        };

        let base = self.textures.load_file(renderer, path)?;
        let mut textured = TexturedMaterial::new(base)
            .with_tiling(
                material.texrepeat.unwrap_or([1.0, 1.0]),
                material.texuniform.unwrap_or(false),
            )
            .with_kind(texture.kind.clone());

        if self.enable_pbr {
            textured.roughness = self.load_sibling(renderer, path, PbrChannel::Roughness)?;
            textured.normal = self.load_sibling(renderer, path, PbrChannel::Normal)?;
            textured.metallic = self.load_sibling(renderer, path, PbrChannel::Metallic)?;

            if textured.metallic.is_none() {
                if let Some(specular) = material.specular {
                    textured.metallic = Some(self.scalar_texture(renderer, specular)?);
                }
            }
            if textured.roughness.is_none() {
                if let Some(shininess) = material.shininess {
                    textured.roughness = Some(self.scalar_texture(renderer, 1.0 - shininess)?);
                }
            }
            if textured.normal.is_none() {
                textured.normal = self.flat_normal(renderer)?;
            }
        }

        Ok(MaterialDescriptor::Textured(textured))
    }

    fn load_sibling(
        &mut self,
        renderer: &mut dyn RenderBackend,
        base: &Path,
        channel: PbrChannel,
    ) -> BridgeResult<Option<TextureHandle>> {
        let Some(sibling) = channel.sibling_path(base) else {
            return Ok(None);
        };
        if !sibling.is_file() {
            return Ok(None);
        }
        log::debug!("Found {:?} channel {:?}", channel, sibling);
        Ok(Some(self.textures.load_file(renderer, &sibling)?))
    }

    /// Single-pixel texture encoding a scalar channel value
    pub fn scalar_texture(&mut self, renderer: &mut dyn RenderBackend, value: f32) -> BridgeResult<TextureHandle> {
        Ok(self.textures.load_pixels(renderer, ImageData::from_scalar(value))?)
    }

    /// The shared flat normal map, `None` when PBR channels are disabled
    pub fn flat_normal(&mut self, renderer: &mut dyn RenderBackend) -> BridgeResult<Option<TextureHandle>> {
        if !self.enable_pbr {
            return Ok(None);
        }
        Ok(Some(self.textures.load_pixels(renderer, ImageData::flat_normal())?))
    }

    /// Texture-backed stand-in for an unmaterialled geom
    ///
    /// Solid base color from `rgba` with no roughness channel. With PBR
    /// enabled it is also fully metallic and carries the shared flat normal;
    /// otherwise the base color is all it has.
    pub fn solid_color_material(
        &mut self,
        renderer: &mut dyn RenderBackend,
        rgba: [f32; 4],
    ) -> BridgeResult<MaterialDescriptor> {
        let base = self.textures.load_pixels(renderer, ImageData::from_rgba(rgba))?;
        let metallic = if self.enable_pbr {
            Some(self.scalar_texture(renderer, 1.0)?)
        } else {
            None
        };
        let normal = self.flat_normal(renderer)?;

        Ok(MaterialDescriptor::Textured(
            TexturedMaterial::new(base)
                .with_metallic(metallic)
                .with_roughness(None)
                .with_normal(normal),
        ))
    }

    /// Number of distinct textures loaded this cycle
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}
