//! Renderer-native material descriptors

use super::TextureHandle;

/// Material handed to the renderer with a mesh
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialDescriptor {
    /// Flat diffuse color
    Color {
        /// Diffuse reflectance (RGB)
        kd: [f32; 3],
    },
    /// Texture-backed material with optional PBR channels
    Textured(TexturedMaterial),
}

impl MaterialDescriptor {
    /// Flat color descriptor from an RGBA color (alpha dropped)
    pub fn color(rgba: [f32; 4]) -> Self {
        Self::Color {
            kd: [rgba[0], rgba[1], rgba[2]],
        }
    }

    /// Texture-backed part, if any
    pub fn as_textured(&self) -> Option<&TexturedMaterial> {
        match self {
            Self::Textured(textured) => Some(textured),
            Self::Color { .. } => None,
        }
    }
}

/// Texture slots of a texture-backed material
///
/// Every PBR channel is individually optional. `None` means "no texture" and
/// is never confused with a handle whose value is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct TexturedMaterial {
    /// Base color / albedo texture
    pub base_color: TextureHandle,
    /// Metallic channel
    pub metallic: Option<TextureHandle>,
    /// Roughness channel
    pub roughness: Option<TextureHandle>,
    /// Normal map
    pub normal: Option<TextureHandle>,
    /// Tiling repeat factors
    pub repeat: [f32; 2],
    /// Uniform tiling instead of per-face tiling
    pub uniform_tiling: bool,
    /// Declared texture type (`2d`, `cube`, `skybox`)
    pub texture_kind: Option<String>,
}

impl TexturedMaterial {
    /// Base texture only, default tiling
    pub fn new(base_color: TextureHandle) -> Self {
        Self {
            base_color,
            metallic: None,
            roughness: None,
            normal: None,
            repeat: [1.0, 1.0],
            uniform_tiling: false,
            texture_kind: None,
        }
    }

    /// Set metallic channel
    pub fn with_metallic(mut self, texture: Option<TextureHandle>) -> Self {
        self.metallic = texture;
        self
    }

    /// Set roughness channel
    pub fn with_roughness(mut self, texture: Option<TextureHandle>) -> Self {
        self.roughness = texture;
        self
    }

    /// Set normal map
    pub fn with_normal(mut self, texture: Option<TextureHandle>) -> Self {
        self.normal = texture;
        self
    }

    /// Set tiling
    pub fn with_tiling(mut self, repeat: [f32; 2], uniform: bool) -> Self {
        self.repeat = repeat;
        self.uniform_tiling = uniform;
        self
    }

    /// Set declared texture type
    pub fn with_kind(mut self, kind: Option<String>) -> Self {
        self.texture_kind = kind;
        self
    }
}
