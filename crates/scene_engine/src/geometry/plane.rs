//! Oriented planes in homogeneous form.

use std::ops::Mul;

use crate::foundation::math::{Mat3, Transform, Vec3, Vec4, EPSILON};
use crate::geometry::{Line, LineSegment};

/// Plane stored as the homogeneous vector `(normal, distance)`.
///
/// The signed distance of a point is `dot(normal, p) - distance`; positive
/// values lie in front of the plane (on the side the normal points to).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    coefficients: Vec4,
}

impl Plane {
    /// Create a plane from a normal and its distance from the origin along
    /// that normal. The normal is normalized and the distance scaled with it.
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self::from_vector(Vec4::new(normal.x, normal.y, normal.z, distance))
    }

    /// Create a plane from an arbitrary `(normal, distance)` vector,
    /// re-normalizing by the normal's length.
    ///
    /// A near-zero normal is kept as is; such a plane reports a signed distance
    /// of `-distance` everywhere.
    pub fn from_vector(v: Vec4) -> Self {
        let length = v.xyz().norm();
        if length <= EPSILON {
            return Self { coefficients: v };
        }
        Self {
            coefficients: v / length,
        }
    }

    /// Plane through `point` facing `normal`
    pub fn from_point_normal(point: &Vec3, normal: &Vec3) -> Self {
        let n = normal.normalize();
        Self::from_vector(Vec4::new(n.x, n.y, n.z, n.dot(point)))
    }

    /// Plane through three points, oriented by the winding `a, b, c`
    /// (counter-clockwise seen from the front). `None` if they are collinear.
    pub fn from_points(a: &Vec3, b: &Vec3, c: &Vec3) -> Option<Self> {
        let normal = (b - a).cross(&(c - a));
        if normal.norm() <= EPSILON {
            return None;
        }
        Some(Self::from_point_normal(a, &normal))
    }

    /// Unit normal
    pub fn normal(&self) -> Vec3 {
        self.coefficients.xyz()
    }

    /// Distance from the origin along the normal
    pub fn distance(&self) -> f32 {
        self.coefficients.w
    }

    /// Homogeneous representation
    pub fn as_vector(&self) -> &Vec4 {
        &self.coefficients
    }

    /// Signed distance of `point`
    pub fn distance_to(&self, point: &Vec3) -> f32 {
        self.normal().dot(point) - self.distance()
    }

    /// Pulls a parent-space plane back into the local space of `transform`.
    ///
    /// Undoes `transform * plane`. Exact for rotated nodes with non-uniform
    /// scale, where mapping through `transform.inverted()` is not.
    pub fn to_local(&self, transform: &Transform) -> Self {
        let normal = transform
            .scale
            .component_mul(&(transform.rotation.inverse() * self.normal()));
        let distance = self.distance() - self.normal().dot(&transform.translation);
        Self::from_vector(Vec4::new(normal.x, normal.y, normal.z, distance))
    }

    /// Same plane facing the other way
    pub fn flipped(&self) -> Self {
        Self {
            coefficients: -self.coefficients,
        }
    }

    /// Orthogonal projection of `point` onto the plane
    pub fn project(&self, point: &Vec3) -> Vec3 {
        point - self.normal() * self.distance_to(point)
    }

    /// Intersection with an infinite line, `None` when parallel
    pub fn intersect_line(&self, line: &Line) -> Option<Vec3> {
        self.intersect_line_parameter(line).map(|t| line.point_at(t))
    }

    fn intersect_line_parameter(&self, line: &Line) -> Option<f32> {
        let denominator = self.normal().dot(&line.direction);
        if denominator.abs() <= EPSILON {
            return None;
        }
        Some(-self.distance_to(&line.origin) / denominator)
    }

    /// Intersection with a segment, `None` when parallel or out of its span
    pub fn intersect_segment(&self, segment: &LineSegment) -> Option<Vec3> {
        let line = Line::new(segment.start, segment.direction());
        let t = self.intersect_line_parameter(&line)?;
        if (0.0..=1.0).contains(&t) {
            Some(line.point_at(t))
        } else {
            None
        }
    }

    /// Line shared by two planes, `None` when they are parallel
    pub fn intersection_line(&self, other: &Plane) -> Option<Line> {
        let direction = self.normal().cross(&other.normal());
        let det = direction.norm_squared();
        if det <= EPSILON {
            return None;
        }
        // Point satisfying both plane equations, closest to the origin
        let origin = (other.normal().cross(&direction) * self.distance()
            + direction.cross(&self.normal()) * other.distance())
            / det;
        Some(Line::new(origin, direction))
    }

    /// Point shared by three planes, `None` when any two are parallel
    pub fn intersect_three(a: &Plane, b: &Plane, c: &Plane) -> Option<Vec3> {
        let m = Mat3::from_rows(&[
            a.normal().transpose(),
            b.normal().transpose(),
            c.normal().transpose(),
        ]);
        if m.determinant().abs() <= EPSILON {
            return None;
        }
        let inverse = m.try_inverse()?;
        Some(inverse * Vec3::new(a.distance(), b.distance(), c.distance()))
    }
}

/// Maps a plane from a transform's local space into its parent space.
///
/// Exact for rotation, translation and non-uniform scale: the normal is
/// divided by the scale, rotated, and the result re-normalized.
impl Mul<Plane> for Transform {
    type Output = Plane;

    fn mul(self, rhs: Plane) -> Plane {
        let normal = self.rotation * rhs.normal().component_div(&self.scale);
        let distance = rhs.distance() + normal.dot(&self.translation);
        Plane::from_vector(Vec4::new(normal.x, normal.y, normal.z, distance))
    }
}
