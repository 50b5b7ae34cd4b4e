//! Renderer-facing interface
//!
//! The bridge never draws anything itself. It talks to a renderer through the
//! [`RenderBackend`] sink: load textures and meshes, instantiate them, move the
//! instances around, and release everything at the end of a load cycle.
//!
//! ## Architecture
//!
//! ```text
//! Bridge (import + sync)
//!      ↓
//! RenderBackend (trait object or generic)
//!      ↓
//! Concrete renderer / RecordingRenderer
//! ```

mod backend;
mod material;
mod recording;

pub use backend::{
    InstanceHandle, InstanceSpec, MeshLoadRequest, ObjectHandle, RenderBackend, TextureHandle,
    TextureSource, Viewer,
};
pub use material::{MaterialDescriptor, TexturedMaterial};
pub use recording::{RecordedInstance, RecordedTexture, RecordingRenderer};

/// Result type for renderer operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors reported by a renderer sink
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// Texture or mesh could not be created
    ///
    /// Typically a file the renderer cannot decode or a resource limit.
    #[error("Resource creation failed: {0}")]
    ResourceCreationFailed(String),

    /// Handle does not name a live renderer resource
    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    /// Resources could not be released
    #[error("Release failed: {0}")]
    ReleaseFailed(String),

    /// Backend-specific error
    #[error("Backend error: {0}")]
    BackendError(String),
}
