//! Procedural image data for synthesized textures
//!
//! Single-pixel images stand in for PBR channels the scene does not provide
//! (flat normals, metallic/roughness from scalar coefficients, solid base
//! colors). Images are identified by a SHA-256 digest of their content so the
//! same pixels are only ever uploaded once per load.

use image::{Rgba, RgbaImage};
use sha2::{Digest, Sha256};

/// RGBA8 image data ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of color channels (always 4)
    pub channels: u8,
}

impl ImageData {
    /// Create a solid color image
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self::from_image(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    /// 1x1 image from a floating point RGBA color in `[0, 1]`
    pub fn from_rgba(rgba: [f32; 4]) -> Self {
        Self::solid_color(1, 1, rgba.map(unit_to_byte))
    }

    /// 1x1 grey image encoding a scalar channel value in `[0, 1]`
    pub fn from_scalar(value: f32) -> Self {
        let v = unit_to_byte(value);
        Self::solid_color(1, 1, [v, v, v, 255])
    }

    /// 1x1 tangent-space normal pointing straight up (0, 0, 1)
    pub fn flat_normal() -> Self {
        Self::solid_color(1, 1, [128, 128, 255, 255])
    }

    fn from_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            data: image.into_raw(),
            width,
            height,
            channels: 4,
        }
    }

    /// Hex SHA-256 over dimensions and pixels
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.width.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        hasher.update([self.channels]);
        hasher.update(&self.data);
        format!("{:x}", hasher.finalize())
    }

    /// First pixel, the whole content of a 1x1 image
    pub fn pixel(&self) -> Option<[u8; 4]> {
        self.data.get(..4).and_then(|p| p.try_into().ok())
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unit_to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
