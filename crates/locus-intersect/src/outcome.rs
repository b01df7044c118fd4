//! Intersection results.

use locus_geom::Line3d;
use locus_math::Point3;
use serde::{Deserialize, Serialize};

/// What an intersection produced.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum IntersectionOutcome {
    /// Nothing intersects.
    #[default]
    None,
    /// A single crossing point.
    Point(Point3),
    /// A single point of tangency.
    TangentPoint(Point3),
    /// Two crossing points.
    TwoPoints(Point3, Point3),
    /// Any number of points (polylines, coplanar edges).
    Points(Vec<Point3>),
    /// A segment lying entirely in the other operand.
    Segment(Line3d),
    /// Pieces of a coplanar line inside a polygon, in order along the line.
    Segments(Vec<Line3d>),
    /// A line or ray lying in the other operand, or a plane–plane line.
    Line(Line3d),
    /// Skew lines: no intersection, but the shortest segment between them.
    ClosestApproach(Line3d),
}

impl IntersectionOutcome {
    /// Whether the outcome is an actual intersection.
    pub fn is_hit(&self) -> bool {
        !matches!(self, IntersectionOutcome::None | IntersectionOutcome::ClosestApproach(_))
    }

    /// Every intersection point, in order.
    pub fn points(&self) -> Vec<Point3> {
        match self {
            IntersectionOutcome::Point(p) | IntersectionOutcome::TangentPoint(p) => vec![*p],
            IntersectionOutcome::TwoPoints(a, b) => vec![*a, *b],
            IntersectionOutcome::Points(pts) => pts.clone(),
            _ => Vec::new(),
        }
    }

    /// Outcome for a list of points, using the most specific variant.
    pub(crate) fn from_points(pts: Vec<Point3>) -> Self {
        match pts.len() {
            0 => IntersectionOutcome::None,
            1 => IntersectionOutcome::Point(pts[0]),
            2 => IntersectionOutcome::TwoPoints(pts[0], pts[1]),
            _ => IntersectionOutcome::Points(pts),
        }
    }
}

/// Where a polyline met the other operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolylineHit {
    /// The edge starting at this vertex index crosses.
    Edge(usize),
    /// This vertex lies on the other operand.
    Vertex(usize),
}

/// Values an algorithm measured along the way.
///
/// Each field is only populated by the algorithms that produce it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IntersectionMeta {
    /// Signed distance along a linear entity to a plane, or the half-chord
    /// of two intersecting circles.
    pub dist: Option<f64>,
    /// Parameter along the first linear operand.
    pub ta: Option<f64>,
    /// Parameter along the second linear operand.
    pub tb: Option<f64>,
    /// Line an algorithm intersected through (plane–plane line of a circle
    /// or arc against a plane).
    pub line: Option<Line3d>,
    /// One entry per polyline point, in outcome order.
    pub polyline_hits: Vec<PolylineHit>,
}

/// A complete intersection answer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Intersection {
    /// The geometric result.
    pub outcome: IntersectionOutcome,
    /// Side values, populated per algorithm.
    pub meta: IntersectionMeta,
    /// Which branch of the algorithm decided the result.
    pub log: String,
}

impl Intersection {
    /// Result with the given outcome and log and no side values.
    pub(crate) fn new(outcome: IntersectionOutcome, log: impl Into<String>) -> Self {
        Self {
            outcome,
            meta: IntersectionMeta::default(),
            log: log.into(),
        }
    }

    /// A miss, explained by `log`.
    pub(crate) fn miss(log: impl Into<String>) -> Self {
        Self::new(IntersectionOutcome::None, log)
    }

    pub(crate) fn with_dist(mut self, dist: f64) -> Self {
        self.meta.dist = Some(dist);
        self
    }

    pub(crate) fn with_params(mut self, ta: f64, tb: f64) -> Self {
        self.meta.ta = Some(ta);
        self.meta.tb = Some(tb);
        self
    }

    /// Whether anything was hit.
    pub fn is_hit(&self) -> bool {
        self.outcome.is_hit()
    }

    /// Every intersection point.
    pub fn points(&self) -> Vec<Point3> {
        self.outcome.points()
    }
}
