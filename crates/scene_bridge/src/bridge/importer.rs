//! Scene graph import
//!
//! Walks a [`SceneDocument`] once and builds the renderer-side instance graph:
//!
//! 1. every camera node becomes an inactive [`CameraDescriptor`]
//! 2. every geom node, in document order, gets a class id and is either
//!    filtered out by its render group, skipped with a configuration error,
//!    or instantiated
//!
//! A configuration error skips only its node (or aborts the load in strict
//! mode). Any other error releases whatever was created and fails the load.

use std::collections::HashSet;

use super::{
    BridgeError, BridgeResult, CameraDescriptor, ConfigurationError, GeomShape, GeometryInstantiator,
    RenderInstance,
};
use crate::assets::MaterialResolver;
use crate::config::BridgeConfig;
use crate::render::RenderBackend;
use crate::scene::{GeomNode, SceneDocument};

/// Geom node that was not instantiated because of a configuration error
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedNode {
    /// Position among the document's geom nodes
    pub index: usize,
    /// Geom name, if any
    pub name: Option<String>,
    /// What was wrong
    pub error: ConfigurationError,
}

/// Summary of one import
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Instances created
    pub instances: usize,
    /// Cameras registered
    pub cameras: usize,
    /// Geom nodes left out by the render-group filter or the collision-name rule
    pub filtered: usize,
    /// Geom nodes skipped with a configuration error
    pub skipped: Vec<SkippedNode>,
    /// Distinct textures loaded
    pub textures: usize,
}

/// Result of one import: the instance graph and the cameras
#[derive(Debug, Clone, Default)]
pub struct ImportedScene {
    /// Instances in geom document order
    pub instances: Vec<RenderInstance>,
    /// Cameras in document order
    pub cameras: Vec<CameraDescriptor>,
    /// What happened
    pub report: ImportReport,
}

/// Builds instance graphs from scene documents
#[derive(Debug, Clone)]
pub struct SceneImporter {
    config: BridgeConfig,
}

impl SceneImporter {
    /// Create an importer
    pub fn new(config: BridgeConfig) -> Self {
        Self { config }
    }

    /// Import configuration
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Whether a geom of this render group should be instantiated
    pub fn passes_group_filter(&self, group: i32) -> bool {
        (group == self.config.visual_group && self.config.render_visual)
            || (group == self.config.collision_group && self.config.render_collision)
    }

    /// Import a document into the renderer
    ///
    /// On failure every resource created by this call has been released.
    pub fn import(&self, document: &SceneDocument, renderer: &mut dyn RenderBackend) -> BridgeResult<ImportedScene> {
        match self.import_inner(document, renderer) {
            Ok(scene) => Ok(scene),
            Err(e) => {
                log::error!("Import failed, releasing partial scene: {}", e);
                if let Err(release) = renderer.release_all() {
                    log::error!("Failed to release partial scene: {}", release);
                }
                Err(e)
            }
        }
    }

    fn import_inner(&self, document: &SceneDocument, renderer: &mut dyn RenderBackend) -> BridgeResult<ImportedScene> {
        let mut scene = ImportedScene {
            cameras: Self::cameras(document),
            ..ImportedScene::default()
        };

        let mut resolver = MaterialResolver::new(&self.config);
        let instantiator = GeometryInstantiator::new(&self.config);

        for (index, geom) in document.geoms().iter().enumerate() {
            let Some(shape) = self.admit(index, geom, &mut scene.report)? else {
                continue;
            };

            let class_id = self.config.class_id_for(index);
            match instantiator.instantiate(document, geom, shape, class_id, &mut resolver, renderer) {
                Ok(instance) => scene.instances.push(instance),
                Err(BridgeError::Configuration(error)) => {
                    if self.config.strict {
                        return Err(error.into());
                    }
                    log::warn!("Skipping geom #{} '{}': {}", index, geom.label(), error);
                    scene.report.skipped.push(SkippedNode {
                        index,
                        name: geom.name.clone(),
                        error,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        scene.report.instances = scene.instances.len();
        scene.report.cameras = scene.cameras.len();
        scene.report.textures = resolver.texture_count();

        log::info!(
            "Imported {} instances, {} cameras, {} textures ({} filtered, {} skipped)",
            scene.report.instances,
            scene.report.cameras,
            scene.report.textures,
            scene.report.filtered,
            scene.report.skipped.len()
        );
        Ok(scene)
    }

    /// Decide whether a geom is instantiated
    ///
    /// Planes always are. Everything else must pass the group filter first;
    /// an unsupported type is then a configuration error, unless the node is
    /// named as a collision representation.
    fn admit(&self, index: usize, geom: &GeomNode, report: &mut ImportReport) -> BridgeResult<Option<GeomShape>> {
        let shape = GeomShape::parse(&geom.kind);
        if shape == Some(GeomShape::Plane) {
            return Ok(shape);
        }

        if !self.passes_group_filter(geom.group) {
            log::trace!("Filtered geom '{}' (group {})", geom.label(), geom.group);
            report.filtered += 1;
            return Ok(None);
        }

        if shape.is_none() {
            if self.config.skip_collision_named && geom.is_collision_named() {
                log::debug!("Skipping collision geom '{}' of type '{}'", geom.label(), geom.kind);
                report.filtered += 1;
                return Ok(None);
            }
            let error = ConfigurationError::UnknownGeomKind {
                geom: geom.label().to_string(),
                kind: geom.kind.clone(),
            };
            if self.config.strict {
                return Err(error.into());
            }
            log::warn!("Skipping geom #{} '{}': {}", index, geom.label(), error);
            report.skipped.push(SkippedNode {
                index,
                name: geom.name.clone(),
                error,
            });
        }
        Ok(shape)
    }

    fn cameras(document: &SceneDocument) -> Vec<CameraDescriptor> {
        let mut names = HashSet::new();
        document
            .cameras()
            .iter()
            .map(|node| {
                let mut camera = CameraDescriptor::from_node(node);
                if !names.insert(camera.name.clone()) {
                    let base = camera.name.clone();
                    let mut suffix = 1;
                    while !names.insert(format!("{base}_{suffix}")) {
                        suffix += 1;
                    }
                    camera.name = format!("{base}_{suffix}");
                }
                log::debug!("Registered camera '{}' on {}", camera.name, camera.owner);
                camera
            })
            .collect()
    }
}
