//! Scene cameras
//!
//! Cameras are attached to a body with a fixed local offset. Their world pose
//! is composed on demand from the body's current pose; the synchronizer never
//! touches them.

use bitflags::bitflags;

use crate::foundation::math::{Pose, QuatXyzw, Vec3};
use crate::physics::{body_world_pose, PhysicsAuthority, PhysicsError};
use crate::scene::{BodyRef, CameraNode};

bitflags! {
    /// Modalities a camera renders
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CameraModes: u32 {
        /// Color image
        const RGB = 1 << 0;
        /// Surface normals
        const NORMAL = 1 << 1;
        /// Segmentation (class ids)
        const SEG = 1 << 2;
        /// 3D points
        const POINTS_3D = 1 << 3;
    }
}

impl CameraModes {
    /// Parse one mode name (`rgb`, `normal`, `seg`, `3d`)
    pub fn from_mode_name(name: &str) -> Option<Self> {
        match name {
            "rgb" => Some(Self::RGB),
            "normal" => Some(Self::NORMAL),
            "seg" => Some(Self::SEG),
            "3d" => Some(Self::POINTS_3D),
            _ => None,
        }
    }

    /// Parse a list of mode names; unknown names are logged and ignored
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        names.iter().fold(Self::empty(), |modes, name| {
            let name = name.as_ref();
            match Self::from_mode_name(name) {
                Some(mode) => modes | mode,
                None => {
                    log::warn!("Ignoring unknown camera mode '{}'", name);
                    modes
                }
            }
        })
    }
}

/// Camera attached to a body
#[derive(Debug, Clone, PartialEq)]
pub struct CameraDescriptor {
    /// Unique camera name
    pub name: String,
    /// Body the camera rides on
    pub owner: BodyRef,
    /// Position in the owner's frame
    pub offset_position: Vec3,
    /// Orientation in the owner's frame, scalar-last
    pub offset_orientation: QuatXyzw,
    /// Whether the camera is currently rendering
    pub active: bool,
    /// Requested modalities; `None` means the renderer default
    pub modes: Option<CameraModes>,
}

impl CameraDescriptor {
    /// Inactive camera from a scene node
    ///
    /// Unnamed cameras are called `<owner>_cam`, or `worldbody_cam` when
    /// mounted on the world frame.
    pub fn from_node(node: &CameraNode) -> Self {
        let owner = BodyRef::from_parent(node.parent_body.as_deref());
        let default_name = || match &owner {
            BodyRef::World => "worldbody_cam".to_string(),
            BodyRef::Body(name) => format!("{name}_cam"),
        };
        Self {
            name: node.name.clone().unwrap_or_else(default_name),
            offset_position: node.pos,
            offset_orientation: node.quat.to_xyzw(),
            active: false,
            modes: node.modes.as_deref().map(CameraModes::from_names),
            owner,
        }
    }

    /// Local offset as a pose
    pub fn offset(&self) -> Pose {
        Pose::new(self.offset_position, self.offset_orientation)
    }
}

/// Computes camera world poses
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraPoseComposer;

impl CameraPoseComposer {
    /// World pose of a camera: owner pose composed with the local offset
    ///
    /// World-owned cameras return their offset unchanged.
    pub fn pose(&self, camera: &CameraDescriptor, authority: &dyn PhysicsAuthority) -> Result<Pose, PhysicsError> {
        if camera.owner.is_world() {
            return Ok(camera.offset());
        }

        let body = body_world_pose(&camera.owner, authority)?;
        let world = body.to_matrix() * camera.offset().to_matrix();
        Ok(Pose::from_matrix(&world))
    }
}
