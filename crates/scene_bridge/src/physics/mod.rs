//! Physics authority interface
//!
//! The physics engine owns the ground-truth body transforms. The bridge only
//! reads them, by body name, through [`PhysicsAuthority`]. Instance sync and
//! camera composition both turn those reads into a [`Pose`] with
//! [`body_world_pose`].

mod pose_table;

pub use pose_table::BodyPoseTable;

use thiserror::Error;

use crate::foundation::math::{Mat3, Pose, Vec3};
use crate::scene::BodyRef;

/// Physics authority errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhysicsError {
    /// No body with this name in the current physics state
    #[error("Unknown body '{0}'")]
    UnknownBody(String),

    /// Authority has not been stepped or reset yet
    #[error("Physics state not ready")]
    NotReady,
}

/// Read-only per-body pose source
pub trait PhysicsAuthority {
    /// World position of a body
    fn body_position(&self, name: &str) -> Result<Vec3, PhysicsError>;

    /// World rotation of a body as a 3x3 orthonormal matrix
    fn body_rotation(&self, name: &str) -> Result<Mat3, PhysicsError>;
}

/// Current world pose of an owner
///
/// The world frame is always the identity pose and never queries the
/// authority. A body's rotation goes matrix -> scalar-first -> scalar-last.
pub fn body_world_pose(owner: &BodyRef, authority: &dyn PhysicsAuthority) -> Result<Pose, PhysicsError> {
    match owner {
        BodyRef::World => Ok(Pose::identity()),
        BodyRef::Body(name) => {
            let position = authority.body_position(name)?;
            let rotation = authority.body_rotation(name)?;
            Ok(Pose::from_position_rotation(position, &rotation))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{QuatWxyz, QuatXyzw};
    use approx::assert_relative_eq;

    #[test]
    fn test_world_is_identity_without_query() {
        let empty = BodyPoseTable::new().not_stepped();
        assert_eq!(body_world_pose(&BodyRef::World, &empty).unwrap(), Pose::identity());
    }

    #[test]
    fn test_body_pose_conversion() {
        let mut table = BodyPoseTable::new();
        // 90 degrees about Z, scalar-first
        let q = QuatWxyz::new(0.7071068, 0.0, 0.0, 0.7071068);
        table.set_body_wxyz("arm", Vec3::new(1.0, 2.0, 3.0), q);

        let pose = body_world_pose(&BodyRef::Body("arm".to_string()), &table).unwrap();
        assert_relative_eq!(pose.position, Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(pose.orientation, QuatXyzw::new(0.0, 0.0, 0.7071068, 0.7071068), epsilon = 1e-5);
    }

    #[test]
    fn test_unknown_body() {
        let table = BodyPoseTable::new();
        assert_eq!(
            body_world_pose(&BodyRef::Body("ghost".to_string()), &table),
            Err(PhysicsError::UnknownBody("ghost".to_string()))
        );
    }
}
