//! Geometry instantiation
//!
//! One geom node becomes one renderer object plus one instance. The node's
//! declared type picks a [`GeomShape`], and the shape decides which mesh is
//! loaded and how the node's size maps onto the renderer's scale.
//!
//! | shape | mesh | scale |
//! |---|---|---|
//! | box | unit cube | `2 * half_extents` |
//! | cylinder | unit cylinder (r 1, h 2) | `[r, r, half_height]` |
//! | sphere | unit sphere (r 0.5) | `2 * r` |
//! | plane | unit cube | `[2 * sx, 2 * sy, thickness]` |
//! | mesh | external file | the mesh asset's own scale |

use std::fmt;
use std::path::{Path, PathBuf};

use super::{BridgeResult, ConfigurationError, RenderInstance};
use crate::assets::{AssetError, MaterialResolver};
use crate::config::BridgeConfig;
use crate::foundation::math::Vec3;
use crate::render::{InstanceSpec, MaterialDescriptor, MeshLoadRequest, RenderBackend};
use crate::scene::{BodyRef, GeomNode, SceneDocument};

/// Geom primitive types the renderer can host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeomShape {
    /// Box given by half-extents
    Box,
    /// Cylinder given by radius and half-height
    Cylinder,
    /// Sphere given by radius
    Sphere,
    /// External mesh asset
    Mesh,
    /// Infinite ground plane, drawn as a thin tile
    Plane,
}

impl GeomShape {
    /// Map a declared geom type
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "box" => Some(Self::Box),
            "cylinder" => Some(Self::Cylinder),
            "sphere" => Some(Self::Sphere),
            "mesh" => Some(Self::Mesh),
            "plane" => Some(Self::Plane),
            _ => None,
        }
    }

    /// Declared type name
    pub fn name(self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Cylinder => "cylinder",
            Self::Sphere => "sphere",
            Self::Mesh => "mesh",
            Self::Plane => "plane",
        }
    }

    /// Number of size components the shape reads
    pub fn required_size(self) -> usize {
        match self {
            Self::Box => 3,
            Self::Cylinder | Self::Plane => 2,
            Self::Sphere => 1,
            Self::Mesh => 0,
        }
    }

    /// Renderer scale for a primitive; `None` for meshes
    pub fn primitive_scale(self, size: &[f32], plane_thickness: f32) -> Option<Vec3> {
        match self {
            Self::Box => Some(Vec3::new(size[0], size[1], size[2]) * 2.0),
            Self::Cylinder => Some(Vec3::new(size[0], size[0], size[1])),
            Self::Sphere => Some(Vec3::repeat(2.0 * size[0])),
            Self::Plane => Some(Vec3::new(2.0 * size[0], 2.0 * size[1], plane_thickness)),
            Self::Mesh => None,
        }
    }
}

impl fmt::Display for GeomShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Canonical primitive meshes shipped with the renderer
#[derive(Debug, Clone)]
pub struct PrimitiveLibrary {
    dir: PathBuf,
}

impl PrimitiveLibrary {
    /// Library rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Unit cube, edge length 1
    pub fn cube(&self) -> PathBuf {
        self.dir.join("cube.obj")
    }

    /// Cylinder of radius 1 and height 2
    pub fn cylinder(&self) -> PathBuf {
        self.dir.join("cylinder.obj")
    }

    /// Sphere of radius 0.5
    pub fn sphere(&self) -> PathBuf {
        self.dir.join("sphere8.obj")
    }

    /// Mesh file for a primitive shape; `None` for meshes
    pub fn mesh_for(&self, shape: GeomShape) -> Option<PathBuf> {
        match shape {
            GeomShape::Box | GeomShape::Plane => Some(self.cube()),
            GeomShape::Cylinder => Some(self.cylinder()),
            GeomShape::Sphere => Some(self.sphere()),
            GeomShape::Mesh => None,
        }
    }
}

/// Loads and instantiates geom nodes
#[derive(Debug)]
pub struct GeometryInstantiator<'a> {
    config: &'a BridgeConfig,
    primitives: PrimitiveLibrary,
}

impl<'a> GeometryInstantiator<'a> {
    /// Create an instantiator for one load cycle
    pub fn new(config: &'a BridgeConfig) -> Self {
        Self {
            config,
            primitives: PrimitiveLibrary::new(&config.primitives_dir),
        }
    }

    /// Load and instantiate one geom node
    ///
    /// Configuration problems (short size, unknown material or mesh) come
    /// back as [`BridgeError::Configuration`](super::BridgeError) before the
    /// renderer is touched for this node.
    pub fn instantiate(
        &self,
        document: &SceneDocument,
        geom: &GeomNode,
        shape: GeomShape,
        class_id: u32,
        resolver: &mut MaterialResolver,
        renderer: &mut dyn RenderBackend,
    ) -> BridgeResult<RenderInstance> {
        let required = shape.required_size();
        if geom.size.len() < required {
            return Err(ConfigurationError::InvalidSize {
                geom: geom.label().to_string(),
                kind: shape.name().to_string(),
                expected: required,
                found: geom.size.len(),
            }
            .into());
        }

        let (path, scale) = self.mesh_and_scale(document, geom, shape)?;
        let material = self.material_for(document, geom, shape, resolver, renderer)?;

        let request = MeshLoadRequest {
            path,
            scale,
            color: [geom.rgba[0], geom.rgba[1], geom.rgba[2]],
            material,
            texture_enabled: geom.material.is_none(),
            local_position: geom.pos,
            local_orientation: geom.quat.to_xyzw(),
        };
        let object = renderer
            .load_mesh_asset(&request)
            .map_err(|e| AssetError::LoadFailed {
                what: request.path.display().to_string(),
                source: e,
            })?;

        let owner = BodyRef::from_parent(geom.parent_body.as_deref());
        let spec = InstanceSpec {
            class_id,
            dynamic: true,
            owner: owner.clone(),
        };
        let handle = renderer.instantiate(object, &spec)?;

        log::debug!(
            "Instantiated {} '{}' as {} (class {}, owner {}, scale {:?})",
            shape,
            geom.label(),
            handle,
            class_id,
            owner,
            request.scale.as_slice()
        );

        Ok(RenderInstance {
            handle,
            object,
            owner,
            dynamic: spec.dynamic,
            class_id,
            shape,
            name: geom.name.clone(),
        })
    }

    fn mesh_and_scale(
        &self,
        document: &SceneDocument,
        geom: &GeomNode,
        shape: GeomShape,
    ) -> BridgeResult<(PathBuf, Vec3)> {
        if let (Some(path), Some(scale)) = (
            self.primitives.mesh_for(shape),
            shape.primitive_scale(&geom.size, self.config.plane_thickness),
        ) {
            return Ok((path, scale));
        }

        let mesh_name = geom.mesh.clone().unwrap_or_default();
        let mesh = document.mesh(&mesh_name).ok_or_else(|| ConfigurationError::MissingMesh {
            geom: geom.label().to_string(),
            mesh: mesh_name.clone(),
        })?;

        let path = match &self.config.mesh_extension {
            Some(ext) => mesh.file.with_extension(ext),
            None => mesh.file.clone(),
        };
        self.verify(&path)?;
        Ok((path, mesh.scale))
    }

    fn verify(&self, path: &Path) -> Result<(), AssetError> {
        if self.config.verify_asset_files && !path.is_file() {
            return Err(AssetError::MissingFile {
                kind: "mesh",
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    fn material_for(
        &self,
        document: &SceneDocument,
        geom: &GeomNode,
        shape: GeomShape,
        resolver: &mut MaterialResolver,
        renderer: &mut dyn RenderBackend,
    ) -> BridgeResult<Option<MaterialDescriptor>> {
        match &geom.material {
            Some(name) => {
                let material = document.material(name).ok_or_else(|| ConfigurationError::MissingMaterial {
                    geom: geom.label().to_string(),
                    material: name.clone(),
                })?;
                Ok(Some(resolver.resolve(document, material, renderer)?))
            }
            None if shape == GeomShape::Cylinder => {
                Ok(Some(resolver.solid_color_material(renderer, geom.rgba)?))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::BridgeError;
    use crate::foundation::math::QuatXyzw;
    use crate::render::RecordingRenderer;
    use approx::assert_relative_eq;

    fn first_geom(xml: &str) -> (SceneDocument, GeomNode) {
        let doc = SceneDocument::parse(xml).unwrap();
        let geom = doc.geoms()[0].clone();
        (doc, geom)
    }

    fn instantiate_with(
        config: &BridgeConfig,
        xml: &str,
        renderer: &mut RecordingRenderer,
    ) -> BridgeResult<RenderInstance> {
        let (doc, geom) = first_geom(xml);
        let shape = GeomShape::parse(&geom.kind).unwrap();
        let mut resolver = MaterialResolver::new(config);
        GeometryInstantiator::new(config).instantiate(&doc, &geom, shape, 5, &mut resolver, renderer)
    }

    #[test]
    fn test_primitive_scales() {
        assert_relative_eq!(
            GeomShape::Box.primitive_scale(&[0.5, 1.0, 0.25], 0.01).unwrap(),
            Vec3::new(1.0, 2.0, 0.5)
        );
        assert_relative_eq!(
            GeomShape::Cylinder.primitive_scale(&[0.1, 0.4], 0.01).unwrap(),
            Vec3::new(0.1, 0.1, 0.4)
        );
        assert_relative_eq!(GeomShape::Sphere.primitive_scale(&[0.3], 0.01).unwrap(), Vec3::repeat(0.6));
        assert_relative_eq!(
            GeomShape::Plane.primitive_scale(&[3.0, 4.0, 0.1], 0.01).unwrap(),
            Vec3::new(6.0, 8.0, 0.01)
        );
        assert!(GeomShape::Mesh.primitive_scale(&[1.0], 0.01).is_none());
    }

    #[test]
    fn test_shape_parse() {
        assert_eq!(GeomShape::parse("cylinder"), Some(GeomShape::Cylinder));
        assert_eq!(GeomShape::parse("capsule"), None);
        assert_eq!(GeomShape::Plane.to_string(), "plane");
    }

    #[test]
    fn test_box_request() {
        let config = BridgeConfig::default().with_primitives_dir("prims");
        let mut renderer = RecordingRenderer::new();
        let xml = r#"<mujoco><worldbody><body name="table">
            <geom type="box" pos="0 0 1" quat="0 1 0 0" size="0.5 0.5 0.5" rgba="0 1 0 1"/>
        </body></worldbody></mujoco>"#;

        let instance = instantiate_with(&config, xml, &mut renderer).unwrap();
        assert_eq!(instance.owner, BodyRef::Body("table".to_string()));
        assert_eq!(instance.class_id, 5);
        assert!(instance.dynamic);

        let request = renderer.object(instance.object).unwrap();
        assert_eq!(request.path, PathBuf::from("prims/cube.obj"));
        assert_relative_eq!(request.scale, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(request.color, [0.0, 1.0, 0.0]);
        assert_eq!(request.local_orientation, QuatXyzw::new(1.0, 0.0, 0.0, 0.0));
        assert_relative_eq!(request.local_position, Vec3::new(0.0, 0.0, 1.0));
        assert!(request.texture_enabled);
        assert!(request.material.is_none());
    }

    #[test]
    fn test_cylinder_without_material_gets_stand_in() {
        let config = BridgeConfig::default();
        let mut renderer = RecordingRenderer::new();
        let xml = r#"<mujoco><worldbody><geom type="cylinder" size="0.1 0.3"/></worldbody></mujoco>"#;

        let instance = instantiate_with(&config, xml, &mut renderer).unwrap();
        assert_eq!(instance.owner, BodyRef::World);

        let request = renderer.object(instance.object).unwrap();
        let textured = request.material.as_ref().and_then(MaterialDescriptor::as_textured).unwrap();
        assert!(textured.metallic.is_some());
        assert_eq!(textured.roughness, None);
        assert!(textured.normal.is_some());
    }

    #[test]
    fn test_short_size_is_configuration_error() {
        let config = BridgeConfig::default();
        let mut renderer = RecordingRenderer::new();
        let xml = r#"<mujoco><worldbody><geom name="slab" type="box" size="1 1"/></worldbody></mujoco>"#;

        let result = instantiate_with(&config, xml, &mut renderer);
        assert!(matches!(
            result,
            Err(BridgeError::Configuration(ConfigurationError::InvalidSize { expected: 3, found: 2, .. }))
        ));
        assert!(renderer.objects().is_empty());
    }

    #[test]
    fn test_missing_material_is_configuration_error() {
        let config = BridgeConfig::default();
        let mut renderer = RecordingRenderer::new();
        let xml = r#"<mujoco><worldbody><geom type="sphere" material="ghost"/></worldbody></mujoco>"#;

        assert!(matches!(
            instantiate_with(&config, xml, &mut renderer),
            Err(BridgeError::Configuration(ConfigurationError::MissingMaterial { .. }))
        ));
    }

    #[test]
    fn test_mesh_geom() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bread.obj"), b"v 0 0 0").unwrap();

        let config = BridgeConfig {
            mesh_extension: Some("obj".to_string()),
            ..BridgeConfig::default()
        };
        let xml = r#"<mujoco>
            <asset><mesh name="bread" file="bread.stl" scale="0.5 0.5 2"/></asset>
            <worldbody><geom type="mesh" mesh="bread" size="9"/></worldbody>
        </mujoco>"#;
        let doc = SceneDocument::parse_with_base(xml, Some(dir.path().to_path_buf())).unwrap();
        let geom = doc.geoms()[0].clone();

        let mut renderer = RecordingRenderer::new();
        let mut resolver = MaterialResolver::new(&config);
        let instance = GeometryInstantiator::new(&config)
            .instantiate(&doc, &geom, GeomShape::Mesh, 0, &mut resolver, &mut renderer)
            .unwrap();

        let request = renderer.object(instance.object).unwrap();
        assert_eq!(request.path, dir.path().join("bread.obj"));
        // Never resized by the geom's size
        assert_relative_eq!(request.scale, Vec3::new(0.5, 0.5, 2.0));
    }

    #[test]
    fn test_mesh_geom_errors() {
        let config = BridgeConfig::default();
        let mut renderer = RecordingRenderer::new();

        let unknown = r#"<mujoco><worldbody><geom type="mesh" mesh="nope"/></worldbody></mujoco>"#;
        assert!(matches!(
            instantiate_with(&config, unknown, &mut renderer),
            Err(BridgeError::Configuration(ConfigurationError::MissingMesh { .. }))
        ));

        let missing_file = r#"<mujoco>
            <asset><mesh name="m" file="/nonexistent/m.obj"/></asset>
            <worldbody><geom type="mesh" mesh="m"/></worldbody>
        </mujoco>"#;
        assert!(matches!(
            instantiate_with(&config, missing_file, &mut renderer),
            Err(BridgeError::Asset(AssetError::MissingFile { kind: "mesh", .. }))
        ));
    }
}
