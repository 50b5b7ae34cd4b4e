//! Render instance records

use super::GeomShape;
use crate::render::{InstanceHandle, ObjectHandle};
use crate::scene::BodyRef;

/// One geom instantiated in the renderer, bound to its owning body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderInstance {
    /// Renderer instance handle
    pub handle: InstanceHandle,
    /// Loaded mesh object the instance was created from
    pub object: ObjectHandle,
    /// Body whose pose the instance follows
    pub owner: BodyRef,
    /// Whether sync moves this instance
    pub dynamic: bool,
    /// Segmentation / class label
    pub class_id: u32,
    /// Primitive the geom was mapped to
    pub shape: GeomShape,
    /// Geom name, if any
    pub name: Option<String>,
}

impl RenderInstance {
    /// Name for log messages
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{} {}", self.shape, self.handle),
        }
    }
}
