//! Axis-aligned bounding boxes of any dimension.

use std::ops::{Add, AddAssign, Mul, MulAssign};

use nalgebra::{RealField, SVector};

use crate::foundation::math::{Transform, Vec3};
use crate::geometry::{Plane, Range};

/// Scalar usable as a bounding box coordinate.
pub trait BoxScalar: RealField + Copy {
    /// Largest finite value; the empty box spans `[+MAX, -MAX]`.
    const MAX: Self;
}

impl BoxScalar for f32 {
    const MAX: f32 = f32::MAX;
}

impl BoxScalar for f64 {
    const MAX: f64 = f64::MAX;
}

/// Axis-aligned box `{min, max}` in `D` dimensions.
///
/// The empty box has `min = +MAX` and `max = -MAX` on every axis so that
/// union with anything yields that thing. A box is empty as soon as any
/// `min[k] > max[k]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox<T, const D: usize> {
    min: SVector<T, D>,
    max: SVector<T, D>,
}

/// 3D single-precision box, the one scene nodes carry
pub type BoundingBox3 = BoundingBox<f32, 3>;

/// 2D single-precision box
pub type BoundingBox2 = BoundingBox<f32, 2>;

/// Side of a plane a box lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Entirely behind the plane
    Back = -1,
    /// Touching or crossing the plane
    Straddling = 0,
    /// Entirely in front of the plane
    Front = 1,
}

impl PlaneSide {
    /// `-1`, `0` or `+1`
    pub fn signum(self) -> i32 {
        self as i32
    }
}

fn min_of<T: BoxScalar>(a: T, b: T) -> T {
    if b < a { b } else { a }
}

fn max_of<T: BoxScalar>(a: T, b: T) -> T {
    if b > a { b } else { a }
}

impl<T: BoxScalar, const D: usize> Default for BoundingBox<T, D> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: BoxScalar, const D: usize> BoundingBox<T, D> {
    /// The empty box
    pub fn empty() -> Self {
        Self {
            min: SVector::from_element(T::MAX),
            max: SVector::from_element(-T::MAX),
        }
    }

    /// Box spanning `min..=max` (no reordering is done)
    pub fn new(min: SVector<T, D>, max: SVector<T, D>) -> Self {
        Self { min, max }
    }

    /// Box around `center` reaching `half_extent` in each direction
    pub fn from_center_half_extent(center: SVector<T, D>, half_extent: SVector<T, D>) -> Self {
        Self::new(center - half_extent, center + half_extent)
    }

    /// Degenerate box containing one point
    pub fn from_point(point: SVector<T, D>) -> Self {
        Self::new(point, point)
    }

    /// Smallest box containing every point (empty for no points)
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = SVector<T, D>>,
    {
        points.into_iter().fold(Self::empty(), |bbox, p| bbox + p)
    }

    /// Minimum corner
    pub fn min(&self) -> &SVector<T, D> {
        &self.min
    }

    /// Maximum corner
    pub fn max(&self) -> &SVector<T, D> {
        &self.max
    }

    /// Whether any axis has `min > max`
    pub fn is_empty(&self) -> bool {
        (0..D).any(|k| self.min[k] > self.max[k])
    }

    /// Grow to include `point`
    pub fn extend(&mut self, point: &SVector<T, D>) {
        for k in 0..D {
            self.min[k] = min_of(self.min[k], point[k]);
            self.max[k] = max_of(self.max[k], point[k]);
        }
    }

    /// Midpoint, zero for an empty box
    pub fn center(&self) -> SVector<T, D> {
        if self.is_empty() {
            return SVector::zeros();
        }
        (self.min + self.max) * nalgebra::convert::<f64, T>(0.5)
    }

    /// `max - min`, zero for an empty box
    pub fn extent(&self) -> SVector<T, D> {
        if self.is_empty() {
            return SVector::zeros();
        }
        self.max - self.min
    }

    /// Half of [`Self::extent`]
    pub fn half_extent(&self) -> SVector<T, D> {
        self.extent() * nalgebra::convert::<f64, T>(0.5)
    }

    /// Whether `point` lies inside or on the boundary
    pub fn contains_point(&self, point: &SVector<T, D>) -> bool {
        (0..D).all(|k| self.min[k] <= point[k] && point[k] <= self.max[k])
    }

    /// Whether `other` lies entirely inside this box. The empty box is
    /// inside every box; nothing non-empty is inside the empty box.
    pub fn contains_box(&self, other: &Self) -> bool {
        if other.is_empty() {
            return true;
        }
        !self.is_empty() && self.contains_point(&other.min) && self.contains_point(&other.max)
    }

    /// Whether the boxes overlap (touching counts)
    pub fn intersects(&self, other: &Self) -> bool {
        !(*self * *other).is_empty()
    }
}

/// Union
impl<T: BoxScalar, const D: usize> Add for BoundingBox<T, D> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        if rhs.is_empty() {
            return self;
        }
        if self.is_empty() {
            return rhs;
        }
        let mut result = self;
        result.extend(&rhs.min);
        result.extend(&rhs.max);
        result
    }
}

/// Union with a point
impl<T: BoxScalar, const D: usize> Add<SVector<T, D>> for BoundingBox<T, D> {
    type Output = Self;

    fn add(mut self, rhs: SVector<T, D>) -> Self {
        self.extend(&rhs);
        self
    }
}

impl<T: BoxScalar, const D: usize> AddAssign for BoundingBox<T, D> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Intersection
impl<T: BoxScalar, const D: usize> Mul for BoundingBox<T, D> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        if self.is_empty() || rhs.is_empty() {
            return Self::empty();
        }
        let mut result = self;
        for k in 0..D {
            result.min[k] = max_of(self.min[k], rhs.min[k]);
            result.max[k] = min_of(self.max[k], rhs.max[k]);
        }
        if result.is_empty() {
            Self::empty()
        } else {
            result
        }
    }
}

impl<T: BoxScalar, const D: usize> MulAssign for BoundingBox<T, D> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl BoundingBox3 {
    /// The eight corners, empty for an empty box
    pub fn corners(&self) -> Vec<Vec3> {
        if self.is_empty() {
            return Vec::new();
        }
        (0..8)
            .map(|i| {
                Vec3::new(
                    if i & 1 == 0 { self.min.x } else { self.max.x },
                    if i & 2 == 0 { self.min.y } else { self.max.y },
                    if i & 4 == 0 { self.min.z } else { self.max.z },
                )
            })
            .collect()
    }

    /// Corners with the smallest and largest projection onto `direction`
    pub fn support_points(&self, direction: &Vec3) -> (Vec3, Vec3) {
        let mut near = self.min;
        let mut far = self.max;
        for k in 0..3 {
            if direction[k] < 0.0 {
                near[k] = self.max[k];
                far[k] = self.min[k];
            }
        }
        (near, far)
    }

    /// Smallest and largest signed distance of the box to `plane`.
    ///
    /// Empty for an empty box.
    pub fn pair_distances_to_plane(&self, plane: &Plane) -> Range {
        if self.is_empty() {
            return Range::empty();
        }
        let center = plane.distance_to(&self.center());
        let radius = plane.normal().abs().dot(&self.half_extent());
        Range::new(center - radius, center + radius)
    }

    /// Which side of `plane` the box is on.
    ///
    /// An empty box is reported as [`PlaneSide::Back`].
    pub fn classify(&self, plane: &Plane) -> PlaneSide {
        let distances = self.pair_distances_to_plane(plane);
        if distances.is_empty() || distances.far < 0.0 {
            PlaneSide::Back
        } else if distances.near > 0.0 {
            PlaneSide::Front
        } else {
            PlaneSide::Straddling
        }
    }
}

/// Axis-aligned box enclosing the transformed box.
///
/// The half extent is scaled, then rotated by the absolute rotation matrix,
/// which over-estimates the tight bounds of a rotated box.
impl Mul<BoundingBox3> for Transform {
    type Output = BoundingBox3;

    fn mul(self, rhs: BoundingBox3) -> BoundingBox3 {
        if rhs.is_empty() {
            return rhs;
        }
        let center = self.transform_point(&rhs.center());
        let scaled = rhs.half_extent().component_mul(&self.scale.abs());
        let rotation = self.rotation.to_rotation_matrix();
        let half_extent = rotation.matrix().abs() * scaled;
        BoundingBox3::from_center_half_extent(center, half_extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Quat;
    use approx::assert_relative_eq;
    use nalgebra::{Vector2, Vector3};

    fn unit_cube() -> BoundingBox3 {
        BoundingBox3::new(Vec3::repeat(-0.5), Vec3::repeat(0.5))
    }

    #[test]
    fn test_empty_box() {
        let empty = BoundingBox3::empty();
        assert!(empty.is_empty());
        assert!(BoundingBox::<f64, 2>::empty().is_empty());
        assert!(!unit_cube().is_empty());
        assert!(BoundingBox3::from_points(Vec::new()).is_empty());
    }

    #[test]
    fn test_empty_plus_point_is_that_point() {
        for p in [Vec3::zeros(), Vec3::new(-3.0, 7.5, 1.0e6), Vec3::new(1.0, -1.0, 0.25)] {
            let bbox = BoundingBox3::empty() + p;
            assert!(!bbox.is_empty());
            assert_eq!(bbox, BoundingBox3::from_point(p));
            assert_eq!(*bbox.min(), p);
            assert_eq!(*bbox.max(), p);
        }

        let flat = BoundingBox::<f64, 2>::empty() + Vector2::new(1.0, 2.0);
        assert_eq!(*flat.min(), Vector2::new(1.0, 2.0));
    }

    #[test]
    fn test_union_and_intersection() {
        let a = BoundingBox3::new(Vec3::zeros(), Vec3::repeat(2.0));
        let b = BoundingBox3::new(Vec3::repeat(1.0), Vec3::repeat(3.0));
        let far_away = BoundingBox3::new(Vec3::repeat(10.0), Vec3::repeat(11.0));

        assert_eq!(a + b, BoundingBox3::new(Vec3::zeros(), Vec3::repeat(3.0)));
        assert_eq!(a * b, BoundingBox3::new(Vec3::repeat(1.0), Vec3::repeat(2.0)));
        assert!((a * far_away).is_empty());
        assert!(a.intersects(&b));
        assert!(!a.intersects(&far_away));
        assert_eq!(a + BoundingBox3::empty(), a);
        assert!((a * BoundingBox3::empty()).is_empty());
        assert!(a.contains_box(&(a * b)));
        assert!(!b.contains_box(&a));
    }

    #[test]
    fn test_plane_classification() {
        let cube = unit_cube();
        assert_eq!(cube.classify(&Plane::new(Vec3::x(), -2.0)), PlaneSide::Front);
        assert_eq!(cube.classify(&Plane::new(Vec3::x(), 2.0)), PlaneSide::Back);
        assert_eq!(cube.classify(&Plane::new(Vec3::x(), 0.0)), PlaneSide::Straddling);
        assert_eq!(PlaneSide::Back.signum(), -1);

        let diagonal = Plane::new(Vec3::new(1.0, 1.0, 1.0), 0.0);
        let distances = cube.pair_distances_to_plane(&diagonal);
        let expected = 1.5 / 3.0_f32.sqrt();
        assert_relative_eq!(distances.near, -expected, epsilon = 1.0e-6);
        assert_relative_eq!(distances.far, expected, epsilon = 1.0e-6);
    }

    #[test]
    fn test_support_points_match_pair_distances() {
        let bbox = BoundingBox3::new(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, 1.0, 5.0));
        let plane = Plane::new(Vec3::new(0.3, -0.8, 0.5), 0.7);
        let (near, far) = bbox.support_points(&plane.normal());
        let distances = bbox.pair_distances_to_plane(&plane);
        assert_relative_eq!(plane.distance_to(&near), distances.near, epsilon = 1.0e-5);
        assert_relative_eq!(plane.distance_to(&far), distances.far, epsilon = 1.0e-5);
    }

    #[test]
    fn test_transform_box() {
        let t = Transform::new(
            Quat::from_axis_angle(&Vec3::z_axis(), std::f32::consts::FRAC_PI_4),
            Vec3::new(2.0, 2.0, 1.0),
            Vec3::new(10.0, 0.0, 0.0),
        );
        let moved = t * unit_cube();
        assert_relative_eq!(moved.center(), Vector3::new(10.0, 0.0, 0.0), epsilon = 1.0e-5);
        let reach = 2.0_f32.sqrt();
        assert_relative_eq!(moved.half_extent(), Vector3::new(reach, reach, 0.5), epsilon = 1.0e-5);

        // The approximation always encloses the exact corners
        for corner in unit_cube().corners() {
            let p = t * corner;
            for k in 0..3 {
                assert!(p[k] >= moved.min()[k] - 1.0e-4 && p[k] <= moved.max()[k] + 1.0e-4);
            }
        }

        assert!((t * BoundingBox3::empty()).is_empty());
    }
}
