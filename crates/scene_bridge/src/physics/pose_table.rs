//! In-memory physics authority

use std::collections::HashMap;

use super::{PhysicsAuthority, PhysicsError};
use crate::foundation::math::{Mat3, QuatWxyz, Vec3};

/// Body poses keyed by name, written by whoever drives the simulation
#[derive(Debug, Clone)]
pub struct BodyPoseTable {
    bodies: HashMap<String, (Vec3, Mat3)>,
    stepped: bool,
}

impl Default for BodyPoseTable {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyPoseTable {
    /// Empty table, ready to be queried
    pub fn new() -> Self {
        Self {
            bodies: HashMap::new(),
            stepped: true,
        }
    }

    /// Builder pattern: every query fails with `NotReady` until [`Self::mark_stepped`]
    pub fn not_stepped(mut self) -> Self {
        self.stepped = false;
        self
    }

    /// Mark the state as stepped
    pub fn mark_stepped(&mut self) {
        self.stepped = true;
    }

    /// Set a body's pose from a rotation matrix
    pub fn set_body(&mut self, name: impl Into<String>, position: Vec3, rotation: Mat3) {
        self.bodies.insert(name.into(), (position, rotation));
    }

    /// Set a body's pose from a scalar-first quaternion
    pub fn set_body_wxyz(&mut self, name: impl Into<String>, position: Vec3, orientation: QuatWxyz) {
        self.set_body(name, position, orientation.to_rotation_matrix());
    }

    /// Remove a body
    pub fn remove_body(&mut self, name: &str) -> bool {
        self.bodies.remove(name).is_some()
    }

    /// Number of bodies
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Check if no bodies are present
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    fn lookup(&self, name: &str) -> Result<&(Vec3, Mat3), PhysicsError> {
        if !self.stepped {
            return Err(PhysicsError::NotReady);
        }
        self.bodies
            .get(name)
            .ok_or_else(|| PhysicsError::UnknownBody(name.to_string()))
    }
}

impl PhysicsAuthority for BodyPoseTable {
    fn body_position(&self, name: &str) -> Result<Vec3, PhysicsError> {
        self.lookup(name).map(|(position, _)| *position)
    }

    fn body_rotation(&self, name: &str) -> Result<Mat3, PhysicsError> {
        self.lookup(name).map(|(_, rotation)| *rotation)
    }
}
