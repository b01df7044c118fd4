//! Lines, rays and segments.

use locus_math::{Point3, Vec3};
use serde::{Deserialize, Serialize};

/// Which part of the carrier line a [`Line3d`] covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    /// Unbounded in both directions.
    Line,
    /// Bounded at `t = 0`, unbounded for `t > 0`.
    Ray,
    /// Bounded to `t ∈ [0, 1]`.
    Segment,
}

/// A straight linear entity in 3D space.
///
/// Parameterization: `P(t) = origin + t * direction`. For a segment
/// `t = 1` lands on the end point, so `direction` carries its length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line3d {
    /// Line, ray or segment.
    pub kind: LineKind,
    /// Starting point.
    pub origin: Point3,
    /// Direction; its length sets the parameter speed.
    pub direction: Vec3,
}

impl Line3d {
    /// Unbounded line through `origin` along `direction`.
    pub fn line(origin: Point3, direction: Vec3) -> Self {
        Self {
            kind: LineKind::Line,
            origin,
            direction,
        }
    }

    /// Ray starting at `origin` heading along `direction`.
    pub fn ray(origin: Point3, direction: Vec3) -> Self {
        Self {
            kind: LineKind::Ray,
            origin,
            direction,
        }
    }

    /// Segment from `start` to `end`, parameterized so `t=0` gives `start` and `t=1` gives `end`.
    pub fn segment(start: Point3, end: Point3) -> Self {
        Self {
            kind: LineKind::Segment,
            origin: start,
            direction: end - start,
        }
    }

    /// Same carrier with a different kind.
    pub fn with_kind(&self, kind: LineKind) -> Self {
        Self {
            kind,
            ..self.clone()
        }
    }

    /// Point at parameter `t`.
    pub fn eval(&self, t: f64) -> Point3 {
        self.origin + t * self.direction
    }

    /// Point at `t = 1`.
    pub fn end(&self) -> Point3 {
        self.eval(1.0)
    }

    /// Length of the direction vector (the segment length for segments).
    pub fn length(&self) -> f64 {
        self.direction.norm()
    }

    /// Point at `t = 0.5`.
    pub fn midpoint(&self) -> Point3 {
        self.eval(0.5)
    }

    /// Same carrier traversed the other way, starting from the end point.
    pub fn inverted(&self) -> Self {
        Self {
            kind: self.kind,
            origin: self.end(),
            direction: -self.direction,
        }
    }

    /// Whether parameter `t` lies on this entity, allowing `tol` of slack.
    pub fn accepts(&self, t: f64, tol: f64) -> bool {
        match self.kind {
            LineKind::Line => true,
            LineKind::Ray => t >= -tol,
            LineKind::Segment => t >= -tol && t <= 1.0 + tol,
        }
    }

    /// Clamp `t` onto this entity.
    pub fn clamp_param(&self, t: f64) -> f64 {
        match self.kind {
            LineKind::Line => t,
            LineKind::Ray => t.max(0.0),
            LineKind::Segment => t.clamp(0.0, 1.0),
        }
    }

    /// Parameter of the closest point on the infinite carrier to `p`.
    ///
    /// A zero-length direction yields `0`.
    pub fn param_of(&self, p: &Point3) -> f64 {
        let len2 = self.direction.norm_squared();
        if len2 == 0.0 {
            return 0.0;
        }
        (p - self.origin).dot(&self.direction) / len2
    }

    /// Closest point on this entity to `p`, with its parameter.
    pub fn near(&self, p: &Point3) -> (Point3, f64) {
        let t = self.clamp_param(self.param_of(p));
        (self.eval(t), t)
    }

    /// Distance from `p` to this entity.
    pub fn distance_to(&self, p: &Point3) -> f64 {
        (self.near(p).0 - p).norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_segment_parameterization() {
        let seg = Line3d::segment(Point3::new(1.0, 0.0, 0.0), Point3::new(1.0, 4.0, 0.0));
        assert_eq!(seg.end(), Point3::new(1.0, 4.0, 0.0));
        assert_eq!(seg.midpoint(), Point3::new(1.0, 2.0, 0.0));
        assert_relative_eq!(seg.length(), 4.0);
        let inv = seg.inverted();
        assert_eq!(inv.origin, seg.end());
        assert_eq!(inv.end(), seg.origin);
    }

    #[test]
    fn test_near_clamps_by_kind() {
        let p = Point3::new(-3.0, 1.0, 0.0);
        let line = Line3d::line(Point3::origin(), Vec3::new(2.0, 0.0, 0.0));
        let (pt, t) = line.near(&p);
        assert_eq!(pt, Point3::new(-3.0, 0.0, 0.0));
        assert_relative_eq!(t, -1.5);

        let (pt, t) = line.with_kind(LineKind::Ray).near(&p);
        assert_eq!(pt, Point3::origin());
        assert_eq!(t, 0.0);

        let far = Point3::new(10.0, 0.0, 0.0);
        let (pt, t) = line.with_kind(LineKind::Segment).near(&far);
        assert_eq!(pt, Point3::new(2.0, 0.0, 0.0));
        assert_eq!(t, 1.0);
    }

    #[test]
    fn test_accepts() {
        let base = Line3d::line(Point3::origin(), Vec3::x());
        assert!(base.accepts(-5.0, 0.0));
        assert!(!base.with_kind(LineKind::Ray).accepts(-0.1, 0.0));
        assert!(base.with_kind(LineKind::Segment).accepts(1.0 + 1e-9, 1e-6));
        assert!(!base.with_kind(LineKind::Segment).accepts(1.1, 1e-6));
    }

    #[test]
    fn test_distance_to() {
        let seg = Line3d::segment(Point3::origin(), Point3::new(4.0, 0.0, 0.0));
        assert_relative_eq!(seg.distance_to(&Point3::new(2.0, 3.0, 0.0)), 3.0);
        assert_relative_eq!(seg.distance_to(&Point3::new(7.0, 4.0, 0.0)), 5.0);
    }
}
