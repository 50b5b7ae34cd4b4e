//! Math utilities and types
//!
//! Provides the nalgebra aliases used across the bridge and the two quaternion
//! conventions that meet at its boundaries:
//!
//! - [`QuatWxyz`]: scalar-first, as written by the physics engine and its scene
//!   description documents.
//! - [`QuatXyzw`]: scalar-last, as consumed by the renderer.
//!
//! The two are never reinterpreted implicitly. Every crossing goes through
//! [`wxyz_to_xyzw`] or [`xyzw_to_wxyz`].

use approx::{AbsDiffEq, RelativeEq};

pub use nalgebra::{
    Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    Rotation3,
    Unit, UnitQuaternion,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Unit quaternion used for composition (nalgebra storage, no convention attached)
pub type Quat = UnitQuaternion<f32>;

/// Reorder a scalar-first quaternion `[w, x, y, z]` into scalar-last `[x, y, z, w]`.
pub fn wxyz_to_xyzw(q: [f32; 4]) -> [f32; 4] {
    [q[1], q[2], q[3], q[0]]
}

/// Reorder a scalar-last quaternion `[x, y, z, w]` into scalar-first `[w, x, y, z]`.
pub fn xyzw_to_wxyz(q: [f32; 4]) -> [f32; 4] {
    [q[3], q[0], q[1], q[2]]
}

/// Scalar-first quaternion `[w, x, y, z]` (physics convention)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuatWxyz(pub [f32; 4]);

impl QuatWxyz {
    /// Identity rotation
    pub const IDENTITY: Self = Self([1.0, 0.0, 0.0, 0.0]);

    /// Create from components in scalar-first order
    pub fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self([w, x, y, z])
    }

    /// Convert to the renderer convention
    pub fn to_xyzw(self) -> QuatXyzw {
        QuatXyzw(wxyz_to_xyzw(self.0))
    }

    /// Normalized nalgebra quaternion for composition
    pub fn to_unit(self) -> Quat {
        let [w, x, y, z] = self.0;
        UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z))
    }

    /// Read back from a nalgebra quaternion
    pub fn from_unit(q: &Quat) -> Self {
        Self([q.w, q.i, q.j, q.k])
    }

    /// Extract the rotation held by an orthonormal 3x3 matrix
    pub fn from_rotation_matrix(matrix: &Mat3) -> Self {
        let rotation = Rotation3::from_matrix_unchecked(*matrix);
        Self::from_unit(&UnitQuaternion::from_rotation_matrix(&rotation))
    }

    /// Rotation matrix for this quaternion (normalized first)
    pub fn to_rotation_matrix(self) -> Mat3 {
        self.to_unit().to_rotation_matrix().into_inner()
    }

    /// Euclidean norm of the raw components
    pub fn norm(&self) -> f32 {
        Vec4::from(self.0).norm()
    }
}

impl Default for QuatWxyz {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Scalar-last quaternion `[x, y, z, w]` (renderer convention)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuatXyzw(pub [f32; 4]);

impl QuatXyzw {
    /// Identity rotation
    pub const IDENTITY: Self = Self([0.0, 0.0, 0.0, 1.0]);

    /// Create from components in scalar-last order
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self([x, y, z, w])
    }

    /// Convert to the physics convention
    pub fn to_wxyz(self) -> QuatWxyz {
        QuatWxyz(xyzw_to_wxyz(self.0))
    }

    /// Rotation matrix for this quaternion (normalized first)
    pub fn to_rotation_matrix(self) -> Mat3 {
        self.to_wxyz().to_rotation_matrix()
    }

    /// Homogeneous 4x4 rotation, the form renderer instance setters take
    pub fn to_homogeneous(self) -> Mat4 {
        self.to_wxyz().to_unit().to_homogeneous()
    }
}

impl Default for QuatXyzw {
    fn default() -> Self {
        Self::IDENTITY
    }
}

macro_rules! impl_quat_approx {
    ($ty:ty) => {
        impl AbsDiffEq for $ty {
            type Epsilon = f32;

            fn default_epsilon() -> f32 {
                f32::default_epsilon()
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
                Vec4::from(self.0).abs_diff_eq(&Vec4::from(other.0), epsilon)
            }
        }

        impl RelativeEq for $ty {
            fn default_max_relative() -> f32 {
                f32::default_max_relative()
            }

            fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
                Vec4::from(self.0).relative_eq(&Vec4::from(other.0), epsilon, max_relative)
            }
        }
    };
}

impl_quat_approx!(QuatWxyz);
impl_quat_approx!(QuatXyzw);

/// World pose: position plus renderer-convention orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Position in world space
    pub position: Vec3,
    /// Orientation, scalar-last
    pub orientation: QuatXyzw,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    /// Origin with no rotation
    pub fn identity() -> Self {
        Self {
            position: Vec3::zeros(),
            orientation: QuatXyzw::IDENTITY,
        }
    }

    /// Create from position and orientation
    pub fn new(position: Vec3, orientation: QuatXyzw) -> Self {
        Self { position, orientation }
    }

    /// Build a pose from a physics-side position and 3x3 world rotation.
    ///
    /// Matrix to scalar-first quaternion, then scalar-first to scalar-last.
    /// Instance sync and camera composition both go through here.
    pub fn from_position_rotation(position: Vec3, rotation: &Mat3) -> Self {
        Self {
            position,
            orientation: QuatWxyz::from_rotation_matrix(rotation).to_xyzw(),
        }
    }

    /// Rigid 4x4 transform (translation * rotation)
    pub fn to_matrix(&self) -> Mat4 {
        make_pose_matrix(&self.position, &self.orientation.to_rotation_matrix())
    }

    /// Decompose a rigid 4x4 transform
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let position = Vec3::new(matrix.m14, matrix.m24, matrix.m34);
        let rotation: Mat3 = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        Self::from_position_rotation(position, &rotation)
    }
}

/// Rigid 4x4 transform from a position and a 3x3 rotation
pub fn make_pose_matrix(position: &Vec3, rotation: &Mat3) -> Mat4 {
    let mut matrix = rotation.to_homogeneous();
    matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(position);
    matrix
}
