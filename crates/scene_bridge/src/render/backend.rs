//! Renderer sink abstraction
//!
//! Defines the calls a renderer must accept to host an imported scene. Handles
//! are opaque renderer-assigned integers; zero is a valid handle, so absence is
//! always spelled `Option<Handle>`.

use std::fmt;
use std::path::PathBuf;

use super::{MaterialDescriptor, RenderResult};
use crate::assets::ImageData;
use crate::foundation::math::{Mat4, QuatXyzw, Vec3};
use crate::scene::BodyRef;

/// Handle for a loaded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Handle for a loaded mesh object (mesh + material)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle(pub u32);

/// Handle for an instance placed in the renderer's scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceHandle(pub u32);

impl fmt::Display for InstanceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instance#{}", self.0)
    }
}

/// Where a texture's pixels come from
#[derive(Debug, Clone, PartialEq)]
pub enum TextureSource {
    /// Image file the renderer decodes itself
    File(PathBuf),
    /// Pixels synthesized in memory, identified by content digest
    Pixels {
        /// RGBA8 pixel data
        image: ImageData,
        /// Hex SHA-256 of the pixel content
        digest: String,
    },
}

impl TextureSource {
    /// Short description for log messages
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Pixels { image, digest } => {
                let short: String = digest.chars().take(12).collect();
                format!("{}x{} pixels [{short}]", image.width, image.height)
            }
        }
    }
}

/// Everything the renderer needs to load one mesh object
#[derive(Debug, Clone, PartialEq)]
pub struct MeshLoadRequest {
    /// Mesh file
    pub path: PathBuf,
    /// Per-axis scale applied to the mesh
    pub scale: Vec3,
    /// Diffuse color used when no texture-backed material applies
    pub color: [f32; 3],
    /// Resolved material, if any
    pub material: Option<MaterialDescriptor>,
    /// Whether the mesh's own textures may be loaded
    pub texture_enabled: bool,
    /// Mesh-local translation baked into the object
    pub local_position: Vec3,
    /// Mesh-local orientation baked into the object, scalar-last
    pub local_orientation: QuatXyzw,
}

/// Parameters for placing an object in the scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceSpec {
    /// Segmentation / class label
    pub class_id: u32,
    /// Whether the instance follows its owning body every tick
    pub dynamic: bool,
    /// Body the instance is attached to
    pub owner: BodyRef,
}

/// Renderer sink trait
///
/// Single-threaded and blocking. Resources created through one sink belong to
/// the caller until [`RenderBackend::release_all`].
pub trait RenderBackend {
    /// Load a texture and return its handle
    fn load_texture(&mut self, source: &TextureSource, texture_scale: f32) -> RenderResult<TextureHandle>;

    /// Load a mesh object with its material
    fn load_mesh_asset(&mut self, request: &MeshLoadRequest) -> RenderResult<ObjectHandle>;

    /// Place a loaded object in the scene
    fn instantiate(&mut self, object: ObjectHandle, spec: &InstanceSpec) -> RenderResult<InstanceHandle>;

    /// Move an instance
    fn set_instance_position(&mut self, instance: InstanceHandle, position: &Vec3) -> RenderResult<()>;

    /// Rotate an instance; the matrix is a homogeneous rotation with no translation
    fn set_instance_rotation(&mut self, instance: InstanceHandle, rotation: &Mat4) -> RenderResult<()>;

    /// Release every texture, object and instance created so far
    fn release_all(&mut self) -> RenderResult<()>;
}

impl<R: RenderBackend + ?Sized> RenderBackend for Box<R> {
    fn load_texture(&mut self, source: &TextureSource, texture_scale: f32) -> RenderResult<TextureHandle> {
        (**self).load_texture(source, texture_scale)
    }

    fn load_mesh_asset(&mut self, request: &MeshLoadRequest) -> RenderResult<ObjectHandle> {
        (**self).load_mesh_asset(request)
    }

    fn instantiate(&mut self, object: ObjectHandle, spec: &InstanceSpec) -> RenderResult<InstanceHandle> {
        (**self).instantiate(object, spec)
    }

    fn set_instance_position(&mut self, instance: InstanceHandle, position: &Vec3) -> RenderResult<()> {
        (**self).set_instance_position(instance, position)
    }

    fn set_instance_rotation(&mut self, instance: InstanceHandle, rotation: &Mat4) -> RenderResult<()> {
        (**self).set_instance_rotation(instance, rotation)
    }

    fn release_all(&mut self) -> RenderResult<()> {
        (**self).release_all()
    }
}

/// Optional interactive viewer redrawn after each sync pass
pub trait Viewer {
    /// Redraw from the renderer's current state
    fn refresh(&mut self) -> RenderResult<()>;
}
