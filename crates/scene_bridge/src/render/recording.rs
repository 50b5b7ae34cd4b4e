//! In-memory renderer sink
//!
//! Records every call it receives instead of drawing. Used by the demo binary
//! and as the renderer fake in tests. Handles are assigned from zero upward.

use std::collections::HashSet;

use super::{
    InstanceHandle, InstanceSpec, MeshLoadRequest, ObjectHandle, RenderBackend, RenderError,
    RenderResult, TextureHandle, TextureSource,
};
use crate::foundation::math::{Mat4, Vec3};

/// One recorded texture load
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedTexture {
    /// Assigned handle
    pub handle: TextureHandle,
    /// What was loaded
    pub source: TextureSource,
    /// Scale forwarded with the load
    pub texture_scale: f32,
}

/// One recorded instance and its latest transform
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedInstance {
    /// Assigned handle
    pub handle: InstanceHandle,
    /// Object the instance was created from
    pub object: ObjectHandle,
    /// Instantiation parameters
    pub spec: InstanceSpec,
    /// Last position written, if any
    pub position: Option<Vec3>,
    /// Last rotation written, if any
    pub rotation: Option<Mat4>,
    /// Number of transform writes received
    pub writes: usize,
}

/// Renderer sink that keeps everything in memory
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    textures: Vec<RecordedTexture>,
    objects: Vec<MeshLoadRequest>,
    instances: Vec<RecordedInstance>,
    released_textures: usize,
    released_objects: usize,
    releases: usize,
    fail_release: bool,
    rejected_instances: HashSet<InstanceHandle>,
    rejected_rotations: HashSet<InstanceHandle>,
}

impl RecordingRenderer {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `release_all` call report a failure (after releasing)
    pub fn with_failing_release(mut self) -> Self {
        self.fail_release = true;
        self
    }

    /// Make transform setters fail for one instance
    pub fn reject_instance(&mut self, handle: InstanceHandle) {
        self.rejected_instances.insert(handle);
    }

    /// Make only the rotation setter fail for one instance
    pub fn reject_rotation(&mut self, handle: InstanceHandle) {
        self.rejected_rotations.insert(handle);
    }

    /// Live texture loads
    pub fn textures(&self) -> &[RecordedTexture] {
        &self.textures
    }

    /// Live mesh object loads
    pub fn objects(&self) -> &[MeshLoadRequest] {
        &self.objects
    }

    /// Mesh load request behind an object handle
    pub fn object(&self, handle: ObjectHandle) -> Option<&MeshLoadRequest> {
        let index = usize::try_from(handle.0).ok()?.checked_sub(self.released_objects)?;
        self.objects.get(index)
    }

    /// Live instances
    pub fn instances(&self) -> &[RecordedInstance] {
        &self.instances
    }

    /// Look up a live instance
    pub fn instance(&self, handle: InstanceHandle) -> Option<&RecordedInstance> {
        self.instances.iter().find(|instance| instance.handle == handle)
    }

    /// Number of `release_all` calls received
    pub fn release_count(&self) -> usize {
        self.releases
    }

    fn next_texture_handle(&self) -> u32 {
        Self::handle_value(self.released_textures + self.textures.len())
    }

    fn handle_value(index: usize) -> u32 {
        u32::try_from(index).unwrap_or(u32::MAX)
    }

    fn instance_mut(&mut self, handle: InstanceHandle) -> RenderResult<&mut RecordedInstance> {
        if self.rejected_instances.contains(&handle) {
            return Err(RenderError::BackendError(format!("{handle} rejected transform update")));
        }
        self.instances
            .iter_mut()
            .find(|instance| instance.handle == handle)
            .ok_or_else(|| RenderError::InvalidHandle(handle.to_string()))
    }
}

impl RenderBackend for RecordingRenderer {
    fn load_texture(&mut self, source: &TextureSource, texture_scale: f32) -> RenderResult<TextureHandle> {
        let handle = TextureHandle(self.next_texture_handle());
        log::trace!("Recording texture {:?} from {}", handle, source.describe());
        self.textures.push(RecordedTexture {
            handle,
            source: source.clone(),
            texture_scale,
        });
        Ok(handle)
    }

    fn load_mesh_asset(&mut self, request: &MeshLoadRequest) -> RenderResult<ObjectHandle> {
        let handle = ObjectHandle(Self::handle_value(self.released_objects + self.objects.len()));
        log::trace!("Recording mesh {:?} from {:?}", handle, request.path);
        self.objects.push(request.clone());
        Ok(handle)
    }

    fn instantiate(&mut self, object: ObjectHandle, spec: &InstanceSpec) -> RenderResult<InstanceHandle> {
        if self.object(object).is_none() {
            return Err(RenderError::InvalidHandle(format!("{object:?}")));
        }
        let handle = InstanceHandle(Self::handle_value(self.instances.len()));
        self.instances.push(RecordedInstance {
            handle,
            object,
            spec: spec.clone(),
            position: None,
            rotation: None,
            writes: 0,
        });
        Ok(handle)
    }

    fn set_instance_position(&mut self, instance: InstanceHandle, position: &Vec3) -> RenderResult<()> {
        let record = self.instance_mut(instance)?;
        record.position = Some(*position);
        record.writes += 1;
        Ok(())
    }

    fn set_instance_rotation(&mut self, instance: InstanceHandle, rotation: &Mat4) -> RenderResult<()> {
        if self.rejected_rotations.contains(&instance) {
            return Err(RenderError::BackendError(format!("{instance} rejected rotation update")));
        }
        let record = self.instance_mut(instance)?;
        record.rotation = Some(*rotation);
        record.writes += 1;
        Ok(())
    }

    fn release_all(&mut self) -> RenderResult<()> {
        log::debug!(
            "Releasing {} textures, {} objects, {} instances",
            self.textures.len(),
            self.objects.len(),
            self.instances.len()
        );
        self.released_textures += self.textures.len();
        self.released_objects += self.objects.len();
        self.textures.clear();
        self.objects.clear();
        self.instances.clear();
        self.rejected_instances.clear();
        self.rejected_rotations.clear();
        self.releases += 1;

        if self.fail_release {
            return Err(RenderError::ReleaseFailed("recording renderer configured to fail".to_string()));
        }
        Ok(())
    }
}
