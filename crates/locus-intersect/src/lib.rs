#![warn(missing_docs)]

//! Intersections between placed geometry.
//!
//! Operands are wrapped in the [`Geometry`] sum type and dispatched on the
//! pair of kinds. Only a fixed set of pairs is defined; anything else is a
//! [`GeomError::UnsupportedOperation`]. "No intersection" is an ordinary
//! result, never an error.
//!
//! ```
//! use locus_geom::Circle;
//! use locus_intersect::{Intersector, IntersectionOutcome};
//! use locus_math::{Point3, Vec3};
//!
//! let a = Circle::from_center(Point3::origin(), Vec3::z(), 5.0).unwrap();
//! let b = Circle::from_center(Point3::new(8.0, 0.0, 0.0), Vec3::z(), 5.0).unwrap();
//! let mut xsec = Intersector::new();
//! assert!(xsec.intersect(a, b).unwrap());
//! assert!(matches!(xsec.outcome(), IntersectionOutcome::TwoPoints(..)));
//! ```

mod circle;
mod linear;
mod outcome;
mod plane;

pub use circle::{arc_plane, circle_circle, circle_plane, line_circle};
pub use linear::{line_line, line_polygon};
pub use outcome::{Intersection, IntersectionMeta, IntersectionOutcome, PolylineHit};
pub use plane::{line_plane, plane_plane, polyline_plane};

use locus_geom::{Arc, Circle, Line3d, Plane, Polygon, Polyline};
use locus_math::{GeomError, Point3, Result, Vec3};
use serde::{Deserialize, Serialize};

// =============================================================================
// Operands
// =============================================================================

/// Anything that can be handed to the intersector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Infinite plane.
    Plane(Plane),
    /// Full circle.
    Circle(Circle),
    /// Circular arc.
    Arc(Arc),
    /// Open polyline.
    Polyline(Polyline),
    /// Closed planar polygon.
    Polygon(Polygon),
    /// Line, ray or segment.
    Line(Line3d),
    /// Free vector, intersected as a ray from the world origin.
    Vector(Vec3),
    /// Bare point. Never intersectable.
    Point(Point3),
}

impl Geometry {
    /// Kind name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Geometry::Plane(_) => "plane",
            Geometry::Circle(_) => "circle",
            Geometry::Arc(_) => "arc",
            Geometry::Polyline(_) => "polyline",
            Geometry::Polygon(_) => "polygon",
            Geometry::Line(_) => "line",
            Geometry::Vector(_) => "vector",
            Geometry::Point(_) => "point",
        }
    }

    /// Dispatch order; the lower-ranked operand is handled first.
    fn rank(&self) -> u8 {
        match self {
            Geometry::Plane(_) => 0,
            Geometry::Circle(_) => 1,
            Geometry::Arc(_) => 2,
            Geometry::Polyline(_) => 3,
            Geometry::Polygon(_) => 4,
            Geometry::Line(_) | Geometry::Vector(_) => 5,
            Geometry::Point(_) => 6,
        }
    }

    fn into_line_family(self) -> Self {
        match self {
            Geometry::Vector(v) => Geometry::Line(Line3d::ray(Point3::origin(), v)),
            other => other,
        }
    }
}

macro_rules! impl_from_geometry {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Geometry {
                fn from(g: $ty) -> Self {
                    Geometry::$variant(g)
                }
            }
        )*
    };
}

impl_from_geometry!(
    Plane => Plane,
    Circle => Circle,
    Arc => Arc,
    Polyline => Polyline,
    Polygon => Polygon,
    Line3d => Line,
    Vec3 => Vector,
    Point3 => Point,
);

// =============================================================================
// Options
// =============================================================================

/// Settings shared by every intersection algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectOptions {
    /// Distance below which points coincide and tangency is declared.
    pub tolerance: f64,
    /// Reject lines and rays that reach a plane from behind its normal.
    pub ignore_backface: bool,
}

impl Default for IntersectOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            ignore_backface: false,
        }
    }
}

impl IntersectOptions {
    /// Validate options.
    pub fn validate(&self) -> Result<()> {
        if self.tolerance.is_nan() || self.tolerance <= 0.0 {
            return Err(GeomError::degenerate(format!(
                "intersection tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Intersect two operands.
///
/// The pair is ordered by kind (plane, circle, arc, polyline, polygon,
/// line family) before dispatch, so argument order does not matter.
pub fn intersect(a: &Geometry, b: &Geometry, options: &IntersectOptions) -> Result<Intersection> {
    options.validate()?;
    if matches!(a, Geometry::Point(_)) || matches!(b, Geometry::Point(_)) {
        return Err(GeomError::unsupported(a.kind_name(), b.kind_name()));
    }

    let (a, b) = (a.clone().into_line_family(), b.clone().into_line_family());
    let (a, b) = if b.rank() < a.rank() { (b, a) } else { (a, b) };

    match (&a, &b) {
        (Geometry::Plane(p), Geometry::Plane(q)) => plane_plane(p, q, options),
        (Geometry::Plane(p), Geometry::Circle(c)) => circle_plane(c, p, options),
        (Geometry::Plane(p), Geometry::Arc(arc)) => arc_plane(arc, p, options),
        (Geometry::Plane(p), Geometry::Polyline(pl)) => polyline_plane(pl, p, options),
        (Geometry::Plane(p), Geometry::Line(l)) => line_plane(l, p, options),
        (Geometry::Circle(c1), Geometry::Circle(c2)) => circle_circle(c1, c2, options),
        (Geometry::Circle(c), Geometry::Line(l)) => line_circle(l, c, options),
        (Geometry::Polygon(pg), Geometry::Line(l)) => line_polygon(l, pg, options),
        (Geometry::Line(l1), Geometry::Line(l2)) => line_line(l1, l2, options),
        _ => Err(GeomError::unsupported(a.kind_name(), b.kind_name())),
    }
}

// =============================================================================
// Intersector
// =============================================================================

/// Stateful front end holding the options and the most recent result.
///
/// Every call to [`Intersector::intersect`] clears the previous result
/// before running, so a failed call leaves nothing behind.
#[derive(Debug, Clone, Default)]
pub struct Intersector {
    /// Options applied to every call.
    pub options: IntersectOptions,
    result: Intersection,
}

impl Intersector {
    /// Intersector with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intersector with the given options.
    pub fn with_options(options: IntersectOptions) -> Self {
        Self {
            options,
            result: Intersection::default(),
        }
    }

    /// Intersect `a` with `b`, returning whether anything was hit.
    ///
    /// Skew lines return `false` but still leave their closest approach in
    /// [`Intersector::outcome`].
    pub fn intersect(&mut self, a: impl Into<Geometry>, b: impl Into<Geometry>) -> Result<bool> {
        self.result = Intersection::default();
        self.result = intersect(&a.into(), &b.into(), &self.options)?;
        Ok(self.result.is_hit())
    }

    /// Result of the last call.
    pub fn result(&self) -> &Intersection {
        &self.result
    }

    /// Outcome of the last call.
    pub fn outcome(&self) -> &IntersectionOutcome {
        &self.result.outcome
    }

    /// Side values of the last call.
    pub fn meta(&self) -> &IntersectionMeta {
        &self.result.meta
    }

    /// Which branch the last call took.
    pub fn log(&self) -> &str {
        &self.result.log
    }

    /// Points found by the last call.
    pub fn points(&self) -> Vec<Point3> {
        self.result.points()
    }

    /// Take the last result, leaving the intersector empty.
    pub fn take(&mut self) -> Intersection {
        std::mem::take(&mut self.result)
    }
}
