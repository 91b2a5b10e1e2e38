//! Geometric primitives used by culling
//!
//! Value types only: planes, lines, boxes, clip ranges and frustums, each with
//! the transform and classification operators the scene visitors need.

mod bounding_box;
mod frustum;
mod line;
mod plane;
mod range;

pub use bounding_box::{BoundingBox, BoundingBox2, BoundingBox3, BoxScalar, PlaneSide};
pub use frustum::{Frustum, FrustumPlane, OpenFrustum, PlaneVolume};
pub use line::{Line, LineSegment};
pub use plane::Plane;
pub use range::Range;
