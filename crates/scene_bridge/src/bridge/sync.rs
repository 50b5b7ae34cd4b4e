//! Per-tick pose synchronization
//!
//! Pushes the physics authority's current body poses into every dynamic render
//! instance. Each distinct owner is queried once per tick. A failure for one
//! instance (stale body, non-finite pose, renderer refusing the update) is
//! recorded and the instance keeps its last pose; the rest of the pass
//! continues. A rotation write that fails after the position was written puts
//! the previous position back, so an instance is never left half-updated.

use std::collections::HashMap;

use super::RenderInstance;
use crate::foundation::math::{Pose, Vec3};
use crate::physics::{body_world_pose, PhysicsAuthority, PhysicsError};
use crate::render::{InstanceHandle, RenderBackend, RenderError, Viewer};
use crate::scene::BodyRef;

/// Why an instance was not updated this tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Owner pose unavailable
    Physics(PhysicsError),
    /// Pose contains NaN or infinite components
    NonFinitePose,
    /// Renderer rejected the transform
    Renderer(String),
}

/// Instance left at its previous pose
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSkip {
    /// Instance handle
    pub instance: InstanceHandle,
    /// Owning body
    pub owner: BodyRef,
    /// What went wrong
    pub reason: SkipReason,
}

/// Outcome of one sync pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Dynamic instances whose transform was written
    pub updated: usize,
    /// Static instances left alone
    pub static_instances: usize,
    /// Dynamic instances that kept their previous pose
    pub skipped: Vec<SyncSkip>,
    /// Whether a viewer was refreshed after the pass
    pub viewer_refreshed: bool,
}

impl SyncReport {
    /// Check if every dynamic instance was updated
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Writes body poses into render instances
///
/// Remembers the last pose written to each instance. Instances that were
/// never written are at the origin.
#[derive(Debug, Clone, Default)]
pub struct PoseSynchronizer {
    applied: HashMap<InstanceHandle, Pose>,
}

impl PoseSynchronizer {
    /// Create a synchronizer with no applied poses
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget applied poses (the renderer released its instances)
    pub fn reset(&mut self) {
        self.applied.clear();
    }

    /// Last pose written to an instance
    pub fn applied_pose(&self, instance: InstanceHandle) -> Option<&Pose> {
        self.applied.get(&instance)
    }

    /// Run one sync pass
    pub fn sync(
        &mut self,
        instances: &[RenderInstance],
        authority: &dyn PhysicsAuthority,
        renderer: &mut dyn RenderBackend,
        viewer: Option<&mut dyn Viewer>,
    ) -> SyncReport {
        let mut report = SyncReport::default();
        let mut poses: HashMap<&BodyRef, Result<Pose, PhysicsError>> = HashMap::new();

        for instance in instances {
            if !instance.dynamic {
                report.static_instances += 1;
                continue;
            }

            let pose = poses
                .entry(&instance.owner)
                .or_insert_with(|| body_world_pose(&instance.owner, authority));

            let outcome = match pose {
                Ok(pose) => self.apply(renderer, instance.handle, pose),
                Err(e) => Err(SkipReason::Physics(e.clone())),
            };

            match outcome {
                Ok(()) => report.updated += 1,
                Err(reason) => {
                    log::warn!("Keeping last pose of '{}' (owner {}): {:?}", instance.label(), instance.owner, reason);
                    report.skipped.push(SyncSkip {
                        instance: instance.handle,
                        owner: instance.owner.clone(),
                        reason,
                    });
                }
            }
        }

        if let Some(viewer) = viewer {
            match viewer.refresh() {
                Ok(()) => report.viewer_refreshed = true,
                Err(e) => log::warn!("Viewer refresh failed: {}", e),
            }
        }

        log::trace!(
            "Synced {} instances ({} skipped, {} static)",
            report.updated,
            report.skipped.len(),
            report.static_instances
        );
        report
    }

    /// Write position then rotation; both or neither take effect
    fn apply(&mut self, renderer: &mut dyn RenderBackend, handle: InstanceHandle, pose: &Pose) -> Result<(), SkipReason> {
        let rotation = pose.orientation.to_homogeneous();
        if !is_finite(pose.position.as_slice()) || !is_finite(rotation.as_slice()) {
            return Err(SkipReason::NonFinitePose);
        }

        renderer
            .set_instance_position(handle, &pose.position)
            .map_err(renderer_reason)?;

        if let Err(e) = renderer.set_instance_rotation(handle, &rotation) {
            let previous = self.applied.get(&handle).map_or_else(Vec3::zeros, |last| last.position);
            if let Err(restore) = renderer.set_instance_position(handle, &previous) {
                log::error!("Failed to restore position of {}: {}", handle, restore);
            }
            return Err(renderer_reason(e));
        }

        self.applied.insert(handle, *pose);
        Ok(())
    }
}

fn is_finite(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn renderer_reason(error: RenderError) -> SkipReason {
    SkipReason::Renderer(error.to_string())
}
