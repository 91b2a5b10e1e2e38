//! Math utilities and types
//!
//! Provides the fundamental math types shared by the geometry primitives and
//! the scene graph. Vectors and matrices come from nalgebra; [`Transform`] is
//! the rigid-plus-scale transform every scene node carries.

use approx::AbsDiffEq;
use std::ops::Mul;

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    Unit, UnitQuaternion,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Threshold below which lengths and denominators are treated as zero.
pub const EPSILON: f32 = 1.0e-6;

/// Rotation, scale and translation applied in that order.
///
/// A point `p` maps to `rotation * (scale ∘ p) + translation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Rotation quaternion
    pub rotation: Quat,

    /// Per-axis scale factors
    pub scale: Vec3,

    /// Translation in parent space
    pub translation: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            translation: Vec3::zeros(),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform from all three components
    pub fn new(rotation: Quat, scale: Vec3, translation: Vec3) -> Self {
        Self { rotation, scale, translation }
    }

    /// Create a transform from a translation vector
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Create a transform with only a rotation
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Default::default()
        }
    }

    /// Create a transform with only a (possibly non-uniform) scale
    pub fn from_scale(scale: Vec3) -> Self {
        Self {
            scale,
            ..Default::default()
        }
    }

    /// Transform placing an observer at `eye` looking towards `target`.
    ///
    /// The observer looks down its local -Z axis with +Y as up, matching the
    /// clip-space convention used by [`crate::scene::ClipSpace`]. Returns
    /// `None` when `eye == target` or `up` is parallel to the view direction.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Option<Self> {
        let backward = eye - target;
        if backward.norm() <= EPSILON || backward.cross(&up).norm() <= EPSILON {
            return None;
        }
        // face_towards maps local +Z onto the given direction
        let rotation = Quat::face_towards(&backward, &up);
        Some(Self {
            rotation,
            scale: Vec3::new(1.0, 1.0, 1.0),
            translation: eye,
        })
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.translation)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Create a transform from a transformation matrix
    ///
    /// The matrix is assumed to be a translation * rotation * scale product
    /// with positive scale; shear is discarded.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let translation = Vec3::new(matrix.m14, matrix.m24, matrix.m34);

        let scale_x = Vec3::new(matrix.m11, matrix.m21, matrix.m31).norm();
        let scale_y = Vec3::new(matrix.m12, matrix.m22, matrix.m32).norm();
        let scale_z = Vec3::new(matrix.m13, matrix.m23, matrix.m33).norm();
        let scale = Vec3::new(scale_x, scale_y, scale_z);

        let rotation_matrix = Mat3::new(
            matrix.m11 / scale_x, matrix.m12 / scale_y, matrix.m13 / scale_z,
            matrix.m21 / scale_x, matrix.m22 / scale_y, matrix.m23 / scale_z,
            matrix.m31 / scale_x, matrix.m32 / scale_y, matrix.m33 / scale_z,
        );
        let rotation = Quat::from_matrix(&rotation_matrix);

        Self {
            rotation,
            scale,
            translation,
        }
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: &Vec3) -> Vec3 {
        self.rotation * self.scale.component_mul(point) + self.translation
    }

    /// Apply this transform to a direction (translation is ignored)
    pub fn transform_vector(&self, vector: &Vec3) -> Vec3 {
        self.rotation * self.scale.component_mul(vector)
    }

    /// Algebraic inverse.
    ///
    /// `t.inverted() * t` is the identity for any non-zero scale; `t *
    /// t.inverted()` is the identity when the scale is uniform. Mapping
    /// points through the inverse undoes `t` only for uniform scale or no
    /// rotation; see [`crate::geometry::Plane::to_local`] for pulling planes
    /// back exactly.
    pub fn inverted(&self) -> Self {
        let inv_scale = Vec3::new(1.0 / self.scale.x, 1.0 / self.scale.y, 1.0 / self.scale.z);
        let inv_rotation = self.rotation.conjugate();
        let inv_translation = -(inv_rotation * self.translation.component_mul(&inv_scale));

        Self {
            rotation: inv_rotation,
            scale: inv_scale,
            translation: inv_translation,
        }
    }

    /// Invert in place
    pub fn invert(&mut self) {
        *self = self.inverted();
    }

    /// Whether this is the identity within `epsilon`
    pub fn is_identity(&self, epsilon: f32) -> bool {
        self.abs_diff_eq(&Self::identity(), epsilon)
    }
}

/// `a * b` applies `b` first, then `a`.
impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        Transform {
            rotation: self.rotation * rhs.rotation,
            scale: self.scale.component_mul(&rhs.scale),
            translation: self.translation + self.rotation * self.scale.component_mul(&rhs.translation),
        }
    }
}

impl Mul<Vec3> for Transform {
    type Output = Vec3;

    fn mul(self, rhs: Vec3) -> Vec3 {
        self.transform_point(&rhs)
    }
}

impl AbsDiffEq for Transform {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        // q and -q are the same rotation
        let a = self.rotation.quaternion().coords;
        let b = other.rotation.quaternion().coords;
        (a.abs_diff_eq(&b, epsilon) || a.abs_diff_eq(&(-b), epsilon))
            && self.scale.abs_diff_eq(&other.scale, epsilon)
            && self.translation.abs_diff_eq(&other.translation, epsilon)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_rotation(rng: &mut StdRng) -> Quat {
        let axis = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let axis = if axis.norm() < 1.0e-3 { Vec3::y() } else { axis };
        Quat::from_axis_angle(&Unit::new_normalize(axis), rng.gen_range(-3.0..3.0))
    }

    fn random_translation(rng: &mut StdRng) -> Vec3 {
        Vec3::new(
            rng.gen_range(-50.0..50.0),
            rng.gen_range(-50.0..50.0),
            rng.gen_range(-50.0..50.0),
        )
    }

    #[test]
    fn test_inverse_law_uniform_scale() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let s = rng.gen_range(0.1..10.0);
            let t = Transform::new(random_rotation(&mut rng), Vec3::repeat(s), random_translation(&mut rng));

            assert!((t * t.inverted()).is_identity(1.0e-3), "t * t^-1 not identity for {t:?}");
            assert!((t.inverted() * t).is_identity(1.0e-3), "t^-1 * t not identity for {t:?}");
        }
    }

    #[test]
    fn test_left_inverse_non_uniform_scale() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let scale = Vec3::new(
                rng.gen_range(0.2..5.0),
                rng.gen_range(0.2..5.0),
                rng.gen_range(0.2..5.0),
            );
            let t = Transform::new(random_rotation(&mut rng), scale, random_translation(&mut rng));
            assert!((t.inverted() * t).is_identity(1.0e-3));

            let inverse = t.inverted();
            assert_relative_eq!(inverse.scale.component_mul(&t.scale), Vec3::repeat(1.0), epsilon = 1.0e-5);
            assert!((inverse.rotation * t.rotation).angle() < 1.0e-4);
        }
    }

    #[test]
    fn test_inverse_maps_points_back_without_rotation() {
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..200 {
            let scale = Vec3::new(
                rng.gen_range(0.2..5.0),
                rng.gen_range(0.2..5.0),
                rng.gen_range(0.2..5.0),
            );
            let t = Transform::new(Quat::identity(), scale, random_translation(&mut rng));
            let p = random_translation(&mut rng);
            assert_relative_eq!(t.inverted() * (t * p), p, epsilon = 1.0e-3);
        }
    }

    #[test]
    fn test_composition_applies_right_first() {
        let translate = Transform::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let scale = Transform::from_scale(Vec3::repeat(2.0));

        let p = Vec3::new(1.0, 1.0, 1.0);
        assert_relative_eq!((translate * scale) * p, Vec3::new(3.0, 2.0, 2.0));
        assert_relative_eq!((scale * translate) * p, Vec3::new(4.0, 2.0, 2.0));
    }

    #[test]
    fn test_matrix_round_trip_preserves_point_mapping() {
        let t = Transform::new(
            Quat::from_axis_angle(&Vec3::z_axis(), 0.7),
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-4.0, 5.0, 6.0),
        );
        let p = Vec3::new(0.5, -1.5, 2.0);

        let via_matrix = t.to_matrix().transform_point(&nalgebra::Point3::from(p)).coords;
        assert_relative_eq!(via_matrix, t * p, epsilon = 1.0e-4);

        let back = Transform::from_matrix(&t.to_matrix());
        assert!(back.abs_diff_eq(&t, 1.0e-4));
    }

    #[test]
    fn test_look_at_faces_target() {
        let t = Transform::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::zeros(), Vec3::y())
            .expect("valid look-at");
        assert!(t.rotation.angle() < 1.0e-5);
        assert_relative_eq!(t.translation, Vec3::new(0.0, 0.0, 5.0));

        let t = Transform::look_at(Vec3::new(5.0, 0.0, 0.0), Vec3::zeros(), Vec3::y())
            .expect("valid look-at");
        let forward = t.transform_vector(&Vec3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(forward, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1.0e-5);

        assert!(Transform::look_at(Vec3::zeros(), Vec3::zeros(), Vec3::y()).is_none());
        assert!(Transform::look_at(Vec3::new(0.0, 5.0, 0.0), Vec3::zeros(), Vec3::y()).is_none());
    }
}
