//! Bridge error types

use thiserror::Error;

use crate::assets::AssetError;
use crate::config::ConfigError;
use crate::physics::PhysicsError;
use crate::render::RenderError;
use crate::scene::SceneError;

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Problems with a single scene node
///
/// The node is skipped and the rest of the scene is imported, unless the
/// bridge runs in strict mode.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Geom `type` the bridge has no mapping for
    #[error("geom '{geom}' has unsupported type '{kind}'")]
    UnknownGeomKind {
        /// Geom label
        geom: String,
        /// Declared type
        kind: String,
    },

    /// Geom references a material the document does not declare
    #[error("geom '{geom}' references unknown material '{material}'")]
    MissingMaterial {
        /// Geom label
        geom: String,
        /// Material name
        material: String,
    },

    /// Mesh geom without a resolvable mesh asset
    #[error("geom '{geom}' references unknown mesh '{mesh}'")]
    MissingMesh {
        /// Geom label
        geom: String,
        /// Mesh name, empty when the attribute is absent
        mesh: String,
    },

    /// Material references a texture the document does not declare
    #[error("material '{material}' references unknown texture '{texture}'")]
    UnknownTexture {
        /// Material name
        material: String,
        /// Texture name
        texture: String,
    },

    /// Size attribute too short for the geom type
    #[error("geom '{geom}' of type '{kind}' needs {expected} size values, found {found}")]
    InvalidSize {
        /// Geom label
        geom: String,
        /// Geom type
        kind: String,
        /// Required number of values
        expected: usize,
        /// Values present
        found: usize,
    },
}

/// Top-level bridge errors
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Scene description could not be read
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Node-level problem (strict mode only at the top level)
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Missing or unloadable asset
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Renderer failure
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Physics authority failure
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    /// Configuration file failure
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Operation needs a loaded scene
    #[error("No scene loaded")]
    NotLoaded,

    /// No camera with this name
    #[error("Unknown camera '{0}'")]
    UnknownCamera(String),
}
