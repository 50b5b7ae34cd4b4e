//! Bridge facade
//!
//! Owns the renderer sink and one load cycle's worth of imported state. The
//! caller drives it: `load` once (or `reload`), then `sync` every tick with
//! the physics authority, and `close` at the end.

use std::path::Path;

use super::{
    BridgeError, BridgeResult, CameraDescriptor, CameraPoseComposer, ImportReport, ImportedScene,
    PoseSynchronizer, RenderInstance, SceneImporter, SyncReport,
};
use crate::config::BridgeConfig;
use crate::foundation::math::Pose;
use crate::physics::PhysicsAuthority;
use crate::render::{RenderBackend, Viewer};
use crate::scene::SceneDocument;

/// Physics-scene to renderer bridge
pub struct Bridge<R: RenderBackend> {
    importer: SceneImporter,
    renderer: R,
    viewer: Option<Box<dyn Viewer>>,
    document: Option<SceneDocument>,
    scene: Option<ImportedScene>,
    synchronizer: PoseSynchronizer,
    composer: CameraPoseComposer,
}

impl<R: RenderBackend> Bridge<R> {
    /// Create a bridge around a renderer; nothing is loaded yet
    pub fn new(config: BridgeConfig, renderer: R) -> Self {
        Self {
            importer: SceneImporter::new(config),
            renderer,
            viewer: None,
            document: None,
            scene: None,
            synchronizer: PoseSynchronizer::new(),
            composer: CameraPoseComposer,
        }
    }

    /// Load-time configuration
    pub fn config(&self) -> &BridgeConfig {
        self.importer.config()
    }

    /// Attach a viewer refreshed after every sync pass
    pub fn add_viewer(&mut self, viewer: Box<dyn Viewer>) {
        self.viewer = Some(viewer);
    }

    /// Import a document, replacing any scene loaded before
    pub fn load(&mut self, document: SceneDocument) -> BridgeResult<&ImportReport> {
        if self.scene.is_some() {
            self.release();
        }
        self.document = Some(document);
        self.import()
    }

    /// Read, parse and import a scene file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> BridgeResult<&ImportReport> {
        let document = SceneDocument::from_file(path)?;
        self.load(document)
    }

    /// Release everything and import the current document again
    pub fn reload(&mut self) -> BridgeResult<&ImportReport> {
        if self.document.is_none() {
            return Err(BridgeError::NotLoaded);
        }
        log::info!("Reloading scene");
        self.disconnect();
        self.import()
    }

    /// Release all renderer resources; the document is kept for `reload`
    pub fn disconnect(&mut self) {
        if self.scene.is_some() {
            self.release();
        }
    }

    /// Release all renderer resources and forget the document
    pub fn close(&mut self) {
        self.disconnect();
        self.document = None;
    }

    /// Whether an imported scene is live in the renderer
    pub fn is_loaded(&self) -> bool {
        self.scene.is_some()
    }

    fn import(&mut self) -> BridgeResult<&ImportReport> {
        let document = self.document.as_ref().ok_or(BridgeError::NotLoaded)?;
        let scene = self.importer.import(document, &mut self.renderer)?;
        Ok(&self.scene.insert(scene).report)
    }

    fn release(&mut self) {
        self.scene = None;
        self.synchronizer.reset();
        match self.renderer.release_all() {
            Ok(()) => log::info!("Released renderer resources"),
            Err(e) => log::error!("Failed to release renderer resources: {}", e),
        }
    }

    /// Push current body poses into every dynamic instance
    pub fn sync(&mut self, authority: &dyn PhysicsAuthority) -> SyncReport {
        let Some(scene) = &self.scene else {
            return SyncReport::default();
        };
        let viewer = self.viewer.as_deref_mut().map(|viewer| viewer as &mut dyn Viewer);
        self.synchronizer.sync(&scene.instances, authority, &mut self.renderer, viewer)
    }

    /// Report of the current import
    pub fn report(&self) -> Option<&ImportReport> {
        self.scene.as_ref().map(|scene| &scene.report)
    }

    /// Instances of the current import
    pub fn instances(&self) -> &[RenderInstance] {
        self.scene
            .as_ref()
            .map(|scene| scene.instances.as_slice())
            .unwrap_or_default()
    }

    /// Cameras of the current import
    pub fn cameras(&self) -> &[CameraDescriptor] {
        self.scene
            .as_ref()
            .map(|scene| scene.cameras.as_slice())
            .unwrap_or_default()
    }

    /// Look up a camera by name
    pub fn camera(&self, name: &str) -> Option<&CameraDescriptor> {
        self.cameras().iter().find(|camera| camera.name == name)
    }

    fn camera_mut(&mut self, name: &str) -> BridgeResult<&mut CameraDescriptor> {
        let scene = self.scene.as_mut().ok_or(BridgeError::NotLoaded)?;
        scene
            .cameras
            .iter_mut()
            .find(|camera| camera.name == name)
            .ok_or_else(|| BridgeError::UnknownCamera(name.to_string()))
    }

    /// Start rendering from a camera
    pub fn activate_camera(&mut self, name: &str) -> BridgeResult<()> {
        self.camera_mut(name)?.active = true;
        log::debug!("Activated camera '{}'", name);
        Ok(())
    }

    /// Stop rendering from a camera
    pub fn deactivate_camera(&mut self, name: &str) -> BridgeResult<()> {
        self.camera_mut(name)?.active = false;
        log::debug!("Deactivated camera '{}'", name);
        Ok(())
    }

    /// Flip a camera's activation; returns the new state
    pub fn toggle_camera(&mut self, name: &str) -> BridgeResult<bool> {
        let camera = self.camera_mut(name)?;
        camera.active = !camera.active;
        Ok(camera.active)
    }

    /// Cameras currently active
    pub fn active_cameras(&self) -> impl Iterator<Item = &CameraDescriptor> {
        self.cameras().iter().filter(|camera| camera.active)
    }

    /// World pose of a camera from the authority's current state
    pub fn camera_pose(&self, name: &str, authority: &dyn PhysicsAuthority) -> BridgeResult<Pose> {
        let camera = self
            .camera(name)
            .ok_or_else(|| BridgeError::UnknownCamera(name.to_string()))?;
        Ok(self.composer.pose(camera, authority)?)
    }

    /// Renderer sink
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable renderer sink
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
