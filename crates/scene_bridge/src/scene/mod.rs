//! Scene description input
//!
//! Parses the physics engine's XML scene description into a [`SceneDocument`]:
//! asset dictionaries (meshes, textures, materials) and the geom and camera
//! nodes of the body tree, each tagged with its enclosing body.
//!
//! ```text
//! scene.xml
//!      ↓
//! SceneDocument (immutable, one per load)
//!      ↓
//! Bridge importer
//! ```

use std::fmt;
use std::path::PathBuf;

pub mod attributes;
mod document;

pub use document::{
    BodyNode, CameraNode, GeomNode, MaterialNode, MeshAsset, SceneDocument, TextureNode,
    TextureSourceNode,
};

/// Errors raised while reading a scene description
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// Malformed XML
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Document could not be read
    #[error("Failed to read scene '{}': {source}", .path.display())]
    Io {
        /// Document path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Attribute present but unparseable
    #[error("Invalid <{element}> attribute {attribute}=\"{value}\": {reason}")]
    InvalidAttribute {
        /// Element tag
        element: String,
        /// Attribute name
        attribute: &'static str,
        /// Raw attribute text
        value: String,
        /// What was wrong with it
        reason: String,
    },
}

/// Owner of a render instance or camera: the static world frame or a named body
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BodyRef {
    /// Static world frame, identity pose
    World,
    /// Named physics body
    Body(String),
}

impl BodyRef {
    /// Resolve an enclosing-body name; missing, `world` and `worldbody` map to the world frame
    pub fn from_parent(parent: Option<&str>) -> Self {
        match parent.map(str::trim) {
            None | Some("" | "world" | "worldbody") => Self::World,
            Some(name) => Self::Body(name.to_string()),
        }
    }

    /// Body name, `"world"` for the world frame
    pub fn name(&self) -> &str {
        match self {
            Self::World => "world",
            Self::Body(name) => name,
        }
    }

    /// Whether this is the static world frame
    pub fn is_world(&self) -> bool {
        matches!(self, Self::World)
    }
}

impl fmt::Display for BodyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
