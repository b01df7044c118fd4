//! Applying transforms to geometry.
//!
//! Positions take the full affine map; directions (free vectors, frame
//! axes, normals) take only the translation-stripped linear part.
//! Composite entities are rebuilt from their transformed parts, so a
//! transform that collapses a direction makes the rebuild fail with
//! [`GeomError::DegenerateInput`](locus_math::GeomError).

use locus_math::{normalize, Point2, Point3, Result, Transform, Vec3};

use crate::{Arc, BasedPoint, Circle, CylFrame, Frame, Line3d, Plane, Polygon, Polyline};

/// Geometry that can be repositioned by a [`Transform`].
pub trait Transformable {
    /// The transformed geometry type.
    type Output;

    /// Apply `xf` to this geometry.
    fn transformed(&self, xf: &Transform) -> Self::Output;
}

impl Transformable for Point3 {
    type Output = Point3;

    fn transformed(&self, xf: &Transform) -> Point3 {
        xf.apply_point(self)
    }
}

impl Transformable for Vec3 {
    type Output = Vec3;

    fn transformed(&self, xf: &Transform) -> Vec3 {
        xf.apply_vec(self)
    }
}

impl Transformable for Line3d {
    type Output = Line3d;

    fn transformed(&self, xf: &Transform) -> Line3d {
        Line3d {
            kind: self.kind,
            origin: xf.apply_point(&self.origin),
            direction: xf.apply_vec(&self.direction),
        }
    }
}

impl Transformable for Frame {
    type Output = Result<Frame>;

    fn transformed(&self, xf: &Transform) -> Result<Frame> {
        Frame::new(
            xf.apply_point(&self.origin),
            xf.apply_vec(self.x_axis.as_ref()),
            xf.apply_vec(self.y_axis.as_ref()),
        )
    }
}

impl Transformable for CylFrame {
    type Output = Result<CylFrame>;

    fn transformed(&self, xf: &Transform) -> Result<CylFrame> {
        self.frame.transformed(xf).map(CylFrame::from_frame)
    }
}

impl Transformable for Plane {
    type Output = Result<Plane>;

    /// The normal is carried by the linear part directly, so mirrors flip it.
    fn transformed(&self, xf: &Transform) -> Result<Plane> {
        let origin = xf.apply_point(&self.origin);
        let n = normalize(&xf.apply_vec(self.normal_dir.as_ref()))?;
        let x = xf.apply_vec(self.x_dir.as_ref());
        let x = normalize(&(x - n.as_ref() * x.dot(n.as_ref())))?;
        let y = normalize(&n.as_ref().cross(x.as_ref()))?;
        Ok(Plane::from_frame_axes(origin, x, y, n))
    }
}

impl Transformable for Circle {
    type Output = Result<Circle>;

    fn transformed(&self, xf: &Transform) -> Result<Circle> {
        let radius = xf.apply_vec(&(self.plane.x_dir.as_ref() * self.radius)).norm();
        Circle::new(self.plane.transformed(xf)?, radius)
    }
}

impl Transformable for Arc {
    type Output = Result<Arc>;

    fn transformed(&self, xf: &Transform) -> Result<Arc> {
        let radius = xf.apply_vec(&(self.basis.x_axis.as_ref() * self.radius)).norm();
        Arc::new(self.basis.transformed(xf)?, radius, self.sweep_angle)
    }
}

impl Transformable for Polyline {
    type Output = Polyline;

    /// The result is baseless: vertices are placed in the world first.
    fn transformed(&self, xf: &Transform) -> Polyline {
        Polyline::new(self.pts().iter().map(|p| xf.apply_point(p)))
    }
}

impl Transformable for Polygon {
    type Output = Result<Polygon>;

    /// The basis moves with the transform; vertices are re-expressed on it
    /// so that scaling is preserved.
    fn transformed(&self, xf: &Transform) -> Result<Polygon> {
        let basis = self.basis.transformed(xf)?;
        let verts = self
            .pts()
            .iter()
            .map(|p| {
                let local = basis.deval(&xf.apply_point(p));
                Point2::new(local.x, local.y)
            })
            .collect();
        Polygon::new(verts, basis)
    }
}

impl Transformable for BasedPoint {
    type Output = BasedPoint;

    /// The result is baseless, positioned at the transformed world point.
    fn transformed(&self, xf: &Transform) -> BasedPoint {
        BasedPoint::world(xf.apply_point(&self.position()))
    }
}
