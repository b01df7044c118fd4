#![warn(missing_docs)]

//! Placed geometry for the locus kernel.
//!
//! Coordinate frames and the [`Basis`] trait they implement, plus the
//! primitive entities built on them: planes, lines/rays/segments, circles,
//! arcs, polylines and polygons. Every entity can be repositioned through
//! [`Transformable`], which dispatches on geometry kind: positions take the
//! full affine map, directions only its linear part.

mod basis;
mod circle;
mod frame;
mod line;
mod plane;
mod polygon;
mod polyline;
mod xform;

pub use basis::{AnyBasis, Based, BasedPoint, Basis};
pub use circle::{circumcircle, Arc, Circle};
pub use frame::{change_basis, CylFrame, Frame, Orientation};
pub use line::{Line3d, LineKind};
pub use plane::Plane;
pub use polygon::Polygon;
pub use polyline::Polyline;
pub use xform::Transformable;

pub use locus_math;
