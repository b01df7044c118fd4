#![warn(missing_docs)]

//! Computational geometry kernel.
//!
//! Re-exports the member crates and flattens their most used types:
//! frames and transforms, parametric curves and surfaces, and the
//! intersection engine.
//!
//! # Example
//!
//! ```
//! use locus::{Curve, Interval, Point3};
//!
//! let c = Curve::circle(Point3::origin(), 5.0).unwrap();
//! let quarter = c.eval(0.25).unwrap();
//! assert!((quarter - Point3::new(0.0, 5.0, 0.0)).norm() < 1e-6);
//! assert_eq!(c.domain(), Interval::twopi());
//! ```

pub use locus_curve;
pub use locus_geom;
pub use locus_intersect;
pub use locus_math;
pub use locus_surface;

pub use locus_curve::{Curve, CurvatureSample, NearFar, NearFarSettings, Osculating};
pub use locus_geom::{
    change_basis, AnyBasis, Arc, Based, BasedPoint, Basis, Circle, CylFrame, Frame, Line3d,
    LineKind, Orientation, Plane, Polygon, Polyline, Transformable,
};
pub use locus_intersect::{
    intersect, Geometry, IntersectOptions, Intersection, IntersectionMeta, IntersectionOutcome,
    Intersector, PolylineHit,
};
pub use locus_math::{
    normalize, Dir3, GeomError, Interval, Point2, Point3, Result, Tolerance, Transform, Vec3,
    WorldPlane, EPSILON,
};
pub use locus_surface::{IsoParam, Mesh, Surface, SurfaceCurvature};
