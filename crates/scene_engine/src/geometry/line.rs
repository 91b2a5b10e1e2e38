//! Infinite lines and finite segments.

use std::ops::Mul;

use crate::foundation::math::{Transform, Vec3, EPSILON};

/// Infinite line through `origin` along `direction`.
///
/// The direction is not required to be normalized; parametric positions are
/// expressed in multiples of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// Point on the line
    pub origin: Vec3,
    /// Direction of the line
    pub direction: Vec3,
}

impl Line {
    /// Create a line from a point and a direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Line through two points, `None` if they coincide
    pub fn through(a: Vec3, b: Vec3) -> Option<Self> {
        let direction = b - a;
        if direction.norm() <= EPSILON {
            return None;
        }
        Some(Self::new(a, direction))
    }

    /// Point at parameter `t`
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Whether the direction is too short to define a line
    pub fn is_degenerate(&self) -> bool {
        self.direction.norm_squared() <= EPSILON * EPSILON
    }

    /// Parameter of the point on the line closest to `point`
    pub fn closest_parameter(&self, point: &Vec3) -> Option<f32> {
        let len_sq = self.direction.norm_squared();
        if len_sq <= EPSILON * EPSILON {
            return None;
        }
        Some((point - self.origin).dot(&self.direction) / len_sq)
    }

    /// Point on the line closest to `point`
    pub fn closest_point(&self, point: &Vec3) -> Option<Vec3> {
        self.closest_parameter(point).map(|t| self.point_at(t))
    }
}

impl Mul<Line> for Transform {
    type Output = Line;

    fn mul(self, rhs: Line) -> Line {
        Line::new(self.transform_point(&rhs.origin), self.transform_vector(&rhs.direction))
    }
}

/// Segment between two end points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Start point (parameter 0)
    pub start: Vec3,
    /// End point (parameter 1)
    pub end: Vec3,
}

impl LineSegment {
    /// Create a segment
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    /// `end - start`
    pub fn direction(&self) -> Vec3 {
        self.end - self.start
    }

    /// Segment length
    pub fn length(&self) -> f32 {
        self.direction().norm()
    }

    /// Point at parameter `t` in `[0, 1]`
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.start + self.direction() * t
    }

    /// Supporting line, `None` for a zero-length segment
    pub fn line(&self) -> Option<Line> {
        Line::through(self.start, self.end)
    }

    /// Point on the segment closest to `point`
    pub fn closest_point(&self, point: &Vec3) -> Vec3 {
        match self.line().and_then(|line| line.closest_parameter(point)) {
            Some(t) => self.point_at(t.clamp(0.0, 1.0)),
            None => self.start,
        }
    }
}

impl Mul<LineSegment> for Transform {
    type Output = LineSegment;

    fn mul(self, rhs: LineSegment) -> LineSegment {
        LineSegment::new(self.transform_point(&rhs.start), self.transform_point(&rhs.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_closest_point_on_line() {
        let line = Line::new(Vec3::zeros(), Vec3::new(2.0, 0.0, 0.0));
        let p = line.closest_point(&Vec3::new(3.0, 4.0, 0.0)).expect("non-degenerate");
        assert_relative_eq!(p, Vec3::new(3.0, 0.0, 0.0));

        let degenerate = Line::new(Vec3::zeros(), Vec3::zeros());
        assert!(degenerate.is_degenerate());
        assert!(degenerate.closest_point(&Vec3::x()).is_none());
    }

    #[test]
    fn test_segment_closest_point_is_clamped() {
        let seg = LineSegment::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(seg.closest_point(&Vec3::new(5.0, 1.0, 0.0)), Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(seg.closest_point(&Vec3::new(-5.0, 1.0, 0.0)), Vec3::zeros());
        assert_relative_eq!(seg.length(), 1.0);
    }

    #[test]
    fn test_transform_segment() {
        let seg = LineSegment::new(Vec3::zeros(), Vec3::x());
        let moved = Transform::from_translation(Vec3::new(0.0, 2.0, 0.0)) * seg;
        assert_relative_eq!(moved.start, Vec3::new(0.0, 2.0, 0.0));
        assert_relative_eq!(moved.end, Vec3::new(1.0, 2.0, 0.0));
    }
}
