//! Configuration system
//!
//! Load-time settings for the bridge. Files are TOML or RON, picked by extension.

use std::path::{Path, PathBuf};

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Ron,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// How segmentation class ids are handed out during import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassIdPolicy {
    /// 0, 1, 2, ... one per geom node in document order
    Sequential,
    /// Every instance gets the same id
    Constant(u32),
}

impl Default for ClassIdPolicy {
    fn default() -> Self {
        Self::Sequential
    }
}

/// Load-time bridge configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Instantiate geoms of the visual group
    pub render_visual: bool,
    /// Instantiate geoms of the collision group
    pub render_collision: bool,
    /// Group id treated as visual
    pub visual_group: i32,
    /// Group id treated as collision
    pub collision_group: i32,
    /// Class id assignment
    pub class_ids: ClassIdPolicy,
    /// Directory holding the canonical primitive meshes
    pub primitives_dir: PathBuf,
    /// Z extent of the tile that stands in for a plane
    pub plane_thickness: f32,
    /// Forwarded to every texture load
    pub texture_scale: f32,
    /// Probe and synthesize roughness/metallic/normal channels
    pub enable_pbr: bool,
    /// Check that mesh and texture files exist before handing them to the renderer
    pub verify_asset_files: bool,
    /// Extension substituted on external mesh files, e.g. `"obj"`
    pub mesh_extension: Option<String>,
    /// Silently skip unknown-kind geoms whose name contains "collision"
    pub skip_collision_named: bool,
    /// Turn per-node configuration errors into load failures
    pub strict: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            render_visual: true,
            render_collision: false,
            visual_group: 1,
            collision_group: 0,
            class_ids: ClassIdPolicy::Sequential,
            primitives_dir: PathBuf::from("assets/models/mjcf_primitives"),
            plane_thickness: 0.01,
            texture_scale: 1.0,
            enable_pbr: true,
            verify_asset_files: true,
            mesh_extension: None,
            skip_collision_named: true,
            strict: false,
        }
    }
}

impl Config for BridgeConfig {}

impl BridgeConfig {
    /// Builder pattern: choose which render groups are instantiated
    pub fn with_groups(mut self, render_visual: bool, render_collision: bool) -> Self {
        self.render_visual = render_visual;
        self.render_collision = render_collision;
        self
    }

    /// Builder pattern: class id policy
    pub fn with_class_ids(mut self, policy: ClassIdPolicy) -> Self {
        self.class_ids = policy;
        self
    }

    /// Builder pattern: primitive mesh directory
    pub fn with_primitives_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.primitives_dir = dir.into();
        self
    }

    /// Builder pattern: strict mode
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Class id for the n-th geom node of the document
    pub fn class_id_for(&self, node_index: usize) -> u32 {
        match self.class_ids {
            ClassIdPolicy::Sequential => u32::try_from(node_index).unwrap_or(u32::MAX),
            ClassIdPolicy::Constant(id) => id,
        }
    }
}
