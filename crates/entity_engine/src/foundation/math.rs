//! Math types
//!
//! nalgebra aliases in `f32`, the actor transform, Euler helpers used by the
//! record format, and the camera matrix constructors.

pub use nalgebra::{Quaternion, Unit, Vector2, Vector3, Vector4, Matrix4};

/// Texture coordinate
pub type Vec2 = Vector2<f32>;

/// Position, direction or scale
pub type Vec3 = Vector3<f32>;

/// Homogeneous vector, also used for RGBA colors
pub type Vec4 = Vector4<f32>;

/// Homogeneous 3D transform
pub type Mat4 = Matrix4<f32>;

/// Point, for APIs that tell points from vectors
pub type Point3 = nalgebra::Point3<f32>;

/// Unit rotation quaternion
pub type Quat = Unit<Quaternion<f32>>;

/// Placement of an actor: translate, rotate, then scale per axis
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// World position
    pub position: Vec3,
    /// World orientation
    pub rotation: Quat,
    /// Per-axis scale, applied in model space
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Origin, no rotation, unit scale
    pub fn identity() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::repeat(1.0),
        }
    }

    /// Model to world matrix (`T * R * S`)
    pub fn to_matrix(&self) -> Mat4 {
        let mut matrix = self.rotation.to_homogeneous().prepend_nonuniform_scaling(&self.scale);
        matrix.append_translation_mut(&self.position);
        matrix
    }

    /// Largest of the three scale factors
    pub fn max_scale(&self) -> f32 {
        self.scale.max()
    }
}

/// Euler angle conversions in degrees, XYZ order (roll, pitch, yaw)
pub mod euler {
    use super::{Quat, Vec3};

    /// Rotation from angles in degrees
    pub fn to_quat(degrees: Vec3) -> Quat {
        Quat::from_euler_angles(
            degrees.x.to_radians(),
            degrees.y.to_radians(),
            degrees.z.to_radians(),
        )
    }

    /// Angles in degrees of a rotation
    pub fn from_quat(rotation: &Quat) -> Vec3 {
        let (roll, pitch, yaw) = rotation.euler_angles();
        Vec3::new(roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees())
    }
}

/// Right-handed view matrix looking from `eye` at `target`
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
}

/// Right-handed perspective projection with OpenGL clip depth
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::new_perspective(aspect, fov_y, near, far)
}
