//! Parsed scene description document
//!
//! One immutable snapshot of the physics engine's scene description for a single
//! load cycle: mesh, texture and material dictionaries plus the geom and camera
//! nodes in document order, each tagged with its enclosing body.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use roxmltree::Node;

use super::attributes as attr;
use super::SceneError;
use crate::foundation::math::{QuatWxyz, Vec3};

/// External mesh asset (`<mesh>`)
#[derive(Debug, Clone, PartialEq)]
pub struct MeshAsset {
    /// Lookup key
    pub name: String,
    /// Resolved file path
    pub file: PathBuf,
    /// Geometric scale, `[1, 1, 1]` when absent
    pub scale: Vec3,
}

/// Where a texture's pixels come from
#[derive(Debug, Clone, PartialEq)]
pub enum TextureSourceNode {
    /// Image file on disk
    File(PathBuf),
    /// No file: a constant color (`rgb1`, white when absent)
    Color([f32; 3]),
}

/// Texture declaration (`<texture>`)
#[derive(Debug, Clone, PartialEq)]
pub struct TextureNode {
    /// Lookup key
    pub name: String,
    /// Declared `type` (`2d`, `cube`, `skybox`)
    pub kind: Option<String>,
    /// Pixel source
    pub source: TextureSourceNode,
}

/// Material declaration (`<material>`)
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialNode {
    /// Lookup key
    pub name: String,
    /// Referenced texture name
    pub texture: Option<String>,
    /// Flat color
    pub rgba: Option<[f32; 4]>,
    /// Tiling repeat factors
    pub texrepeat: Option<[f32; 2]>,
    /// Uniform tiling flag
    pub texuniform: Option<bool>,
    /// Scalar specular coefficient
    pub specular: Option<f32>,
    /// Scalar shininess coefficient
    pub shininess: Option<f32>,
}

/// Body declaration (`<body>`)
#[derive(Debug, Clone, PartialEq)]
pub struct BodyNode {
    /// Body name, if any
    pub name: Option<String>,
    /// Name of the enclosing body, `None` at the top of the body tree
    pub parent: Option<String>,
}

/// Geometry node (`<geom>`)
#[derive(Debug, Clone, PartialEq)]
pub struct GeomNode {
    /// Geom name, if any
    pub name: Option<String>,
    /// Declared primitive type, `sphere` when absent
    pub kind: String,
    /// Render group, `0` when absent
    pub group: i32,
    /// Name of the enclosing body
    pub parent_body: Option<String>,
    /// Local position, `[0, 0, 0]` when absent
    pub pos: Vec3,
    /// Local orientation, scalar-first, identity when absent
    pub quat: QuatWxyz,
    /// Size components, `[1, 1, 1]` when absent
    pub size: Vec<f32>,
    /// Color, opaque white when absent
    pub rgba: [f32; 4],
    /// Referenced material name
    pub material: Option<String>,
    /// Referenced mesh name (mesh geoms)
    pub mesh: Option<String>,
}

impl GeomNode {
    /// Name for log messages
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed geom>")
    }

    /// Whether the node's name marks it as a collision representation
    pub fn is_collision_named(&self) -> bool {
        self.name.as_deref().is_some_and(|name| name.contains("collision"))
    }
}

/// Camera node (`<camera>`)
#[derive(Debug, Clone, PartialEq)]
pub struct CameraNode {
    /// Camera name, if any
    pub name: Option<String>,
    /// Name of the enclosing body
    pub parent_body: Option<String>,
    /// Local position offset
    pub pos: Vec3,
    /// Local orientation offset, scalar-first
    pub quat: QuatWxyz,
    /// Requested modalities (`rgb`, `normal`, `seg`, `3d`)
    pub modes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
struct AssetDirs {
    base: Option<PathBuf>,
    mesh: Option<PathBuf>,
    texture: Option<PathBuf>,
}

impl AssetDirs {
    fn resolve(&self, dir: Option<&PathBuf>, file: &str) -> PathBuf {
        let file = Path::new(file);
        if file.is_absolute() {
            return file.to_path_buf();
        }
        match (dir, &self.base) {
            (Some(dir), Some(base)) if dir.is_relative() => base.join(dir).join(file),
            (Some(dir), _) => dir.join(file),
            (None, Some(base)) => base.join(file),
            (None, None) => file.to_path_buf(),
        }
    }
}

/// Immutable parsed scene description
#[derive(Debug, Clone, Default)]
pub struct SceneDocument {
    model_name: Option<String>,
    meshes: Vec<MeshAsset>,
    textures: Vec<TextureNode>,
    materials: Vec<MaterialNode>,
    bodies: Vec<BodyNode>,
    geoms: Vec<GeomNode>,
    cameras: Vec<CameraNode>,
    mesh_index: HashMap<String, usize>,
    texture_index: HashMap<String, usize>,
    material_index: HashMap<String, usize>,
    body_parents: HashMap<String, Option<String>>,
}

impl SceneDocument {
    /// Parse a document; relative asset paths stay relative to the working directory
    pub fn parse(xml: &str) -> Result<Self, SceneError> {
        Self::parse_with_base(xml, None)
    }

    /// Read and parse a document; relative asset paths resolve against its directory
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let xml = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_with_base(&xml, path.parent().map(Path::to_path_buf))
    }

    /// Parse a document with an explicit base directory for relative asset paths
    pub fn parse_with_base(xml: &str, base_dir: Option<PathBuf>) -> Result<Self, SceneError> {
        let xml_doc = roxmltree::Document::parse(xml)?;
        let root = xml_doc.root_element();

        let mut dirs = AssetDirs {
            base: base_dir.filter(|dir| !dir.as_os_str().is_empty()),
            ..AssetDirs::default()
        };
        for compiler in root.descendants().filter(|n| n.has_tag_name("compiler")) {
            if let Some(asset_dir) = attr::string(compiler, "assetdir") {
                dirs.mesh = Some(PathBuf::from(&asset_dir));
                dirs.texture = Some(PathBuf::from(asset_dir));
            }
            if let Some(mesh_dir) = attr::string(compiler, "meshdir") {
                dirs.mesh = Some(PathBuf::from(mesh_dir));
            }
            if let Some(texture_dir) = attr::string(compiler, "texturedir") {
                dirs.texture = Some(PathBuf::from(texture_dir));
            }
        }

        let mut document = Self {
            model_name: attr::string(root, "model"),
            ..Self::default()
        };

        for node in root.descendants().filter(Node::is_element) {
            if is_template(node) {
                continue;
            }
            match node.tag_name().name() {
                "mesh" => document.add_mesh(node, &dirs)?,
                "texture" => document.add_texture(node, &dirs)?,
                "material" => document.add_material(node)?,
                "body" => document.add_body(node),
                "geom" => document.add_geom(node)?,
                "camera" => document.add_camera(node)?,
                _ => {}
            }
        }

        log::debug!(
            "Parsed scene '{}': {} meshes, {} textures, {} materials, {} bodies, {} geoms, {} cameras",
            document.model_name.as_deref().unwrap_or("unnamed"),
            document.meshes.len(),
            document.textures.len(),
            document.materials.len(),
            document.bodies.len(),
            document.geoms.len(),
            document.cameras.len()
        );

        Ok(document)
    }

    fn add_mesh(&mut self, node: Node<'_, '_>, dirs: &AssetDirs) -> Result<(), SceneError> {
        let Some(file) = attr::string(node, "file") else {
            log::debug!("Skipping <mesh> without a file attribute");
            return Ok(());
        };
        let Some(name) = attr::string(node, "name").or_else(|| file_stem(&file)) else {
            log::warn!("Skipping <mesh> with no usable name (file {file:?})");
            return Ok(());
        };

        let asset = MeshAsset {
            file: dirs.resolve(dirs.mesh.as_ref(), &file),
            scale: attr::vec3(node, "scale")?.unwrap_or_else(|| Vec3::new(1.0, 1.0, 1.0)),
            name,
        };
        insert_indexed(&mut self.meshes, &mut self.mesh_index, asset.name.clone(), asset);
        Ok(())
    }

    fn add_texture(&mut self, node: Node<'_, '_>, dirs: &AssetDirs) -> Result<(), SceneError> {
        let file = attr::string(node, "file");
        let name = attr::string(node, "name").or_else(|| file.as_deref().and_then(file_stem));
        let Some(name) = name else {
            log::debug!("Skipping unnamed <texture> without a file");
            return Ok(());
        };

        let source = match file {
            Some(file) => TextureSourceNode::File(dirs.resolve(dirs.texture.as_ref(), &file)),
            None => TextureSourceNode::Color(attr::rgb(node, "rgb1")?.unwrap_or([1.0, 1.0, 1.0])),
        };
        let texture = TextureNode {
            name,
            kind: attr::string(node, "type"),
            source,
        };
        insert_indexed(&mut self.textures, &mut self.texture_index, texture.name.clone(), texture);
        Ok(())
    }

    fn add_material(&mut self, node: Node<'_, '_>) -> Result<(), SceneError> {
        let Some(name) = attr::string(node, "name") else {
            log::warn!("Skipping unnamed <material>");
            return Ok(());
        };

        let material = MaterialNode {
            name,
            texture: attr::string(node, "texture"),
            rgba: attr::rgba(node, "rgba")?,
            texrepeat: attr::floats(node, "texrepeat", 2, 2)?.map(|v| [v[0], v[1]]),
            texuniform: attr::boolean(node, "texuniform")?,
            specular: attr::scalar(node, "specular")?,
            shininess: attr::scalar(node, "shininess")?,
        };
        insert_indexed(&mut self.materials, &mut self.material_index, material.name.clone(), material);
        Ok(())
    }

    fn add_body(&mut self, node: Node<'_, '_>) {
        let body = BodyNode {
            name: attr::string(node, "name"),
            parent: enclosing_body(node),
        };
        if let Some(name) = &body.name {
            self.body_parents.insert(name.clone(), body.parent.clone());
        }
        self.bodies.push(body);
    }

    fn add_geom(&mut self, node: Node<'_, '_>) -> Result<(), SceneError> {
        self.geoms.push(GeomNode {
            name: attr::string(node, "name"),
            kind: attr::string(node, "type").unwrap_or_else(|| "sphere".to_string()),
            group: attr::int(node, "group")?.unwrap_or(0),
            parent_body: enclosing_body(node),
            pos: attr::vec3(node, "pos")?.unwrap_or_else(Vec3::zeros),
            quat: attr::quat_wxyz(node, "quat")?.unwrap_or(QuatWxyz::IDENTITY),
            size: attr::floats(node, "size", 1, 4)?.unwrap_or_else(|| vec![1.0, 1.0, 1.0]),
            rgba: attr::rgba(node, "rgba")?.unwrap_or([1.0, 1.0, 1.0, 1.0]),
            material: attr::string(node, "material"),
            mesh: attr::string(node, "mesh"),
        });
        Ok(())
    }

    fn add_camera(&mut self, node: Node<'_, '_>) -> Result<(), SceneError> {
        self.cameras.push(CameraNode {
            name: attr::string(node, "name"),
            parent_body: enclosing_body(node),
            pos: attr::vec3(node, "pos")?.unwrap_or_else(Vec3::zeros),
            quat: attr::quat_wxyz(node, "quat")?.unwrap_or(QuatWxyz::IDENTITY),
            modes: attr::string(node, "modes")
                .map(|modes| modes.split_whitespace().map(str::to_string).collect()),
        });
        Ok(())
    }

    /// Model name from the root element
    pub fn model_name(&self) -> Option<&str> {
        self.model_name.as_deref()
    }

    /// Mesh assets in document order
    pub fn meshes(&self) -> &[MeshAsset] {
        &self.meshes
    }

    /// Look up a mesh asset by name
    pub fn mesh(&self, name: &str) -> Option<&MeshAsset> {
        self.mesh_index.get(name).map(|&i| &self.meshes[i])
    }

    /// Textures in document order
    pub fn textures(&self) -> &[TextureNode] {
        &self.textures
    }

    /// Look up a texture by name
    pub fn texture(&self, name: &str) -> Option<&TextureNode> {
        self.texture_index.get(name).map(|&i| &self.textures[i])
    }

    /// Materials in document order
    pub fn materials(&self) -> &[MaterialNode] {
        &self.materials
    }

    /// Look up a material by name
    pub fn material(&self, name: &str) -> Option<&MaterialNode> {
        self.material_index.get(name).map(|&i| &self.materials[i])
    }

    /// Bodies in document order
    pub fn bodies(&self) -> &[BodyNode] {
        &self.bodies
    }

    /// Enclosing body of a named body; `None` if unknown, `Some(None)` at the top
    pub fn body_parent(&self, name: &str) -> Option<Option<&str>> {
        self.body_parents.get(name).map(Option::as_deref)
    }

    /// Geom nodes in document order
    pub fn geoms(&self) -> &[GeomNode] {
        &self.geoms
    }

    /// Camera nodes in document order
    pub fn cameras(&self) -> &[CameraNode] {
        &self.cameras
    }
}

/// Later declarations with the same name replace earlier ones
fn insert_indexed<T>(items: &mut Vec<T>, index: &mut HashMap<String, usize>, name: String, item: T) {
    if let Some(&existing) = index.get(&name) {
        log::warn!("Duplicate asset name '{name}', keeping the later declaration");
        items[existing] = item;
    } else {
        index.insert(name, items.len());
        items.push(item);
    }
}

/// Elements inside `<default>` are class templates, not scene nodes
fn is_template(node: Node<'_, '_>) -> bool {
    node.ancestors().skip(1).any(|a| a.has_tag_name("default"))
}

/// Name of the nearest enclosing `<body>`; `None` under `<worldbody>` or an unnamed body
fn enclosing_body(node: Node<'_, '_>) -> Option<String> {
    node.ancestors()
        .skip(1)
        .find(|a| a.has_tag_name("body") || a.has_tag_name("worldbody"))
        .filter(|a| a.has_tag_name("body"))
        .and_then(|body| attr::string(body, "name"))
}

fn file_stem(file: &str) -> Option<String> {
    Path::new(file)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}
