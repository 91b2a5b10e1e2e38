//! View frustums as ordered sets of inward-facing planes.
//!
//! Planes are extracted from a (view-)projection matrix with the Gribb-Hartmann
//! row technique for OpenGL clip space (camera looking down -Z, depth in
//! `[-1, 1]`), the convention of nalgebra's `Perspective3` and
//! `Orthographic3`. Every plane's normal points into the frustum.

use std::ops::Mul;

use crate::foundation::math::{Mat4, Transform, Vec3, Vec4};
use crate::geometry::{BoundingBox3, Plane};

/// Index of a frustum plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrustumPlane {
    /// Left clip plane
    Left = 0,
    /// Right clip plane
    Right = 1,
    /// Bottom clip plane
    Bottom = 2,
    /// Top clip plane
    Top = 3,
    /// Near clip plane
    Near = 4,
    /// Far clip plane (absent from [`OpenFrustum`])
    Far = 5,
}

/// Convex volume bounded by inward-facing planes.
pub trait PlaneVolume: Clone {
    /// Planes in [`FrustumPlane`] order
    fn planes(&self) -> &[Plane];

    /// The same volume mapped through `transform` (local to parent space)
    fn transformed(&self, transform: &Transform) -> Self;

    /// The same volume pulled back into the local space of `transform`
    fn to_local(&self, transform: &Transform) -> Self;

    /// Plane by index, `None` if this volume does not have it
    fn plane(&self, which: FrustumPlane) -> Option<&Plane> {
        self.planes().get(which as usize)
    }

    /// Whether `bbox` is at least partially inside.
    ///
    /// The box passes when, for every plane, its farthest signed distance is
    /// non-negative. An empty box is never contained.
    fn contain(&self, bbox: &BoundingBox3) -> bool {
        if bbox.is_empty() {
            return false;
        }
        self.planes()
            .iter()
            .all(|plane| bbox.pair_distances_to_plane(plane).far >= 0.0)
    }

    /// Whether `point` is inside or on every plane
    fn contain_point(&self, point: &Vec3) -> bool {
        self.planes().iter().all(|plane| plane.distance_to(point) >= 0.0)
    }
}

fn row(m: &Mat4, r: usize) -> Vec4 {
    Vec4::new(m[(r, 0)], m[(r, 1)], m[(r, 2)], m[(r, 3)])
}

/// Turns a clip-row combination `(a, b, c, d)` with `ax + by + cz + d >= 0`
/// inside into a plane in `dot(n, p) - distance` form.
fn plane_from_clip_row(v: Vec4) -> Plane {
    Plane::from_vector(Vec4::new(v.x, v.y, v.z, -v.w))
}

fn extract_planes(matrix: &Mat4) -> [Plane; 6] {
    let r0 = row(matrix, 0);
    let r1 = row(matrix, 1);
    let r2 = row(matrix, 2);
    let r3 = row(matrix, 3);
    [
        plane_from_clip_row(r3 + r0),
        plane_from_clip_row(r3 - r0),
        plane_from_clip_row(r3 + r1),
        plane_from_clip_row(r3 - r1),
        plane_from_clip_row(r3 + r2),
        plane_from_clip_row(r3 - r2),
    ]
}

/// Six-plane view frustum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    planes: [Plane; 6],
}

impl Frustum {
    /// Create a frustum from planes in [`FrustumPlane`] order
    pub fn new(planes: [Plane; 6]) -> Self {
        Self { planes }
    }

    /// Extract the frustum from a clip matrix.
    ///
    /// With a projection matrix the planes are in eye space; with a
    /// view-projection matrix they are in world space.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        Self::new(extract_planes(matrix))
    }

    /// Same frustum without its far plane
    pub fn open(&self) -> OpenFrustum {
        let [left, right, bottom, top, near, _far] = self.planes;
        OpenFrustum::new([left, right, bottom, top, near])
    }

    /// Near clip plane
    pub fn near(&self) -> &Plane {
        &self.planes[FrustumPlane::Near as usize]
    }

    /// Far clip plane
    pub fn far(&self) -> &Plane {
        &self.planes[FrustumPlane::Far as usize]
    }

    /// The eight corners, near face first (bottom-left, bottom-right,
    /// top-left, top-right), then the far face in the same order.
    ///
    /// `None` for a degenerate frustum whose planes do not meet in points.
    pub fn corners(&self) -> Option<[Vec3; 8]> {
        let p = &self.planes;
        let (l, r, b, t) = (&p[0], &p[1], &p[2], &p[3]);
        let mut corners = [Vec3::zeros(); 8];
        for (face, depth) in [&p[4], &p[5]].into_iter().enumerate() {
            corners[face * 4] = Plane::intersect_three(l, b, depth)?;
            corners[face * 4 + 1] = Plane::intersect_three(r, b, depth)?;
            corners[face * 4 + 2] = Plane::intersect_three(l, t, depth)?;
            corners[face * 4 + 3] = Plane::intersect_three(r, t, depth)?;
        }
        Some(corners)
    }

    /// Axis-aligned box around the corners, empty for a degenerate frustum
    pub fn bounding_box(&self) -> BoundingBox3 {
        self.corners()
            .map_or_else(BoundingBox3::empty, BoundingBox3::from_points)
    }
}

impl PlaneVolume for Frustum {
    fn planes(&self) -> &[Plane] {
        &self.planes
    }

    fn transformed(&self, transform: &Transform) -> Self {
        Self::new(self.planes.map(|plane| *transform * plane))
    }

    fn to_local(&self, transform: &Transform) -> Self {
        Self::new(self.planes.map(|plane| plane.to_local(transform)))
    }
}

impl Mul<Frustum> for Transform {
    type Output = Frustum;

    fn mul(self, rhs: Frustum) -> Frustum {
        rhs.transformed(&self)
    }
}

/// Frustum without a far plane.
///
/// Used where everything beyond the near plane inside the side planes counts,
/// such as fitting clip distances to scene content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenFrustum {
    planes: [Plane; 5],
}

impl OpenFrustum {
    /// Create from planes in [`FrustumPlane`] order (no far plane)
    pub fn new(planes: [Plane; 5]) -> Self {
        Self { planes }
    }

    /// Extract from a clip matrix, dropping the far plane
    pub fn from_matrix(matrix: &Mat4) -> Self {
        Frustum::from_matrix(matrix).open()
    }

    /// Near clip plane
    pub fn near(&self) -> &Plane {
        &self.planes[FrustumPlane::Near as usize]
    }
}

impl PlaneVolume for OpenFrustum {
    fn planes(&self) -> &[Plane] {
        &self.planes
    }

    fn transformed(&self, transform: &Transform) -> Self {
        Self::new(self.planes.map(|plane| *transform * plane))
    }

    fn to_local(&self, transform: &Transform) -> Self {
        Self::new(self.planes.map(|plane| plane.to_local(transform)))
    }
}

impl Mul<OpenFrustum> for Transform {
    type Output = OpenFrustum;

    fn mul(self, rhs: OpenFrustum) -> OpenFrustum {
        rhs.transformed(&self)
    }
}
