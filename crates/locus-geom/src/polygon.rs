//! Planar polygons.

use locus_math::{GeomError, Point2, Point3, Result};
use serde::{Deserialize, Serialize};

use crate::{Frame, Line3d, Plane};

/// A closed planar polygon.
///
/// Vertices are stored as 2D coordinates in the XY plane of `basis`; the
/// closing edge from the last vertex back to the first is implicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Vertex coordinates in the basis XY plane.
    pub verts: Vec<Point2>,
    /// Frame whose XY plane carries the polygon.
    pub basis: Frame,
}

impl Polygon {
    /// Polygon from local vertices on `basis`.
    pub fn new(verts: Vec<Point2>, basis: Frame) -> Result<Self> {
        if verts.len() < 3 {
            return Err(GeomError::degenerate(format!(
                "polygon needs at least 3 vertices, got {}",
                verts.len()
            )));
        }
        let poly = Self { verts, basis };
        if poly.signed_area().abs() < locus_math::EPSILON {
            return Err(GeomError::degenerate("polygon has zero area"));
        }
        Ok(poly)
    }

    /// Polygon through coplanar world points.
    ///
    /// The basis sits on the first vertex with X towards the second.
    pub fn from_pts(pts: &[Point3]) -> Result<Self> {
        if pts.len() < 3 {
            return Err(GeomError::degenerate(format!(
                "polygon needs at least 3 vertices, got {}",
                pts.len()
            )));
        }
        let x = pts[1] - pts[0];
        let basis = pts[2..]
            .iter()
            .find_map(|p| Frame::new(pts[0], x, p - pts[0]).ok())
            .ok_or_else(|| GeomError::degenerate("polygon vertices are collinear"))?;
        let scale = pts.iter().map(|p| (p - pts[0]).norm()).fold(1.0, f64::max);
        let mut verts = Vec::with_capacity(pts.len());
        for p in pts {
            let local = basis.deval(p);
            if local.z.abs() > 1e-9 * scale {
                return Err(GeomError::degenerate("polygon vertices are not coplanar"));
            }
            verts.push(Point2::new(local.x, local.y));
        }
        Self::new(verts, basis)
    }

    /// Axis-aligned rectangle in the world XY plane centered on `center`.
    pub fn rectangle(center: Point3, width: f64, height: f64) -> Result<Self> {
        let (w, h) = (width / 2.0, height / 2.0);
        Self::new(
            vec![
                Point2::new(-w, -h),
                Point2::new(w, -h),
                Point2::new(w, h),
                Point2::new(-w, h),
            ],
            Frame::at(center),
        )
    }

    /// The supporting plane.
    pub fn plane(&self) -> Plane {
        self.basis.xy_plane()
    }

    /// World positions of the vertices.
    pub fn pts(&self) -> Vec<Point3> {
        self.verts.iter().map(|v| self.basis.eval(v.x, v.y, 0.0)).collect()
    }

    /// World-space edges, including the closing edge.
    pub fn edges(&self) -> Vec<Line3d> {
        let pts = self.pts();
        let n = pts.len();
        (0..n).map(|i| Line3d::segment(pts[i], pts[(i + 1) % n])).collect()
    }

    /// Signed area; positive when counter-clockwise about the basis Z axis.
    pub fn signed_area(&self) -> f64 {
        let n = self.verts.len();
        (0..n)
            .map(|i| {
                let (a, b) = (self.verts[i], self.verts[(i + 1) % n]);
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>()
            / 2.0
    }

    /// Perimeter length.
    pub fn perimeter(&self) -> f64 {
        self.edges().iter().map(Line3d::length).sum()
    }

    /// Whether world point `p` lies on the polygon's plane within `tol`
    /// and inside its boundary. Points within `tol` of any edge count as
    /// inside, whichever edge they sit on.
    pub fn contains(&self, p: &Point3, tol: f64) -> bool {
        let local = self.basis.deval(p);
        if local.z.abs() > tol {
            return false;
        }
        let q = Point2::new(local.x, local.y);
        self.boundary_distance(&q) <= tol || self.winding_number(&q) != 0
    }

    /// Distance from local point `q` to the nearest edge.
    pub fn boundary_distance(&self, q: &Point2) -> f64 {
        self.local_edges()
            .map(|(a, b)| {
                let edge = b - a;
                let t = (q - a).dot(&edge) / edge.norm_squared().max(f64::MIN_POSITIVE);
                (q - (a + edge * t.clamp(0.0, 1.0))).norm()
            })
            .fold(f64::INFINITY, f64::min)
    }

    /// Signed number of turns the boundary makes around local point `q`.
    ///
    /// Each edge crossing the horizontal through `q` on its right counts
    /// +1 going up and -1 going down. Points exactly on the boundary get
    /// an arbitrary answer; [`Polygon::contains`] settles those first.
    pub fn winding_number(&self, q: &Point2) -> i32 {
        self.local_edges()
            .map(|(a, b)| {
                let side = (b - a).perp(&(q - a));
                match (a.y <= q.y, b.y <= q.y) {
                    (true, false) if side > 0.0 => 1,
                    (false, true) if side < 0.0 => -1,
                    _ => 0,
                }
            })
            .sum()
    }

    fn local_edges(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let next = self.verts.iter().cycle().skip(1);
        self.verts.iter().zip(next).map(|(a, b)| (*a, *b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use locus_math::Vec3;

    #[test]
    fn test_rectangle() {
        let rect = Polygon::rectangle(Point3::new(1.0, 1.0, 0.0), 4.0, 2.0).unwrap();
        assert_relative_eq!(rect.signed_area(), 8.0);
        assert_relative_eq!(rect.perimeter(), 12.0);
        assert!(rect.contains(&Point3::new(2.5, 1.5, 0.0), 1e-9));
        assert!(!rect.contains(&Point3::new(3.5, 1.5, 0.0), 1e-9));
        assert!(!rect.contains(&Point3::new(2.5, 1.5, 0.1), 1e-9));
    }

    #[test]
    fn test_concave_containment() {
        // L shape
        let l = Polygon::new(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(4.0, 0.0),
                Point2::new(4.0, 1.0),
                Point2::new(1.0, 1.0),
                Point2::new(1.0, 4.0),
                Point2::new(0.0, 4.0),
            ],
            Frame::world(),
        )
        .unwrap();
        assert_eq!(l.winding_number(&Point2::new(0.5, 3.0)), 1);
        assert_eq!(l.winding_number(&Point2::new(3.0, 0.5)), 1);
        assert_eq!(l.winding_number(&Point2::new(2.0, 2.0)), 0);
        assert!(!l.contains(&Point3::new(2.0, 2.0, 0.0), 1e-9));
        // reentrant corner
        assert!(l.contains(&Point3::new(1.0, 1.0, 0.0), 1e-9));
    }

    #[test]
    fn test_clockwise_winding_is_negative() {
        let cw = Polygon::new(
            vec![Point2::new(0.0, 0.0), Point2::new(0.0, 1.0), Point2::new(1.0, 0.0)],
            Frame::world(),
        )
        .unwrap();
        assert!(cw.signed_area() < 0.0);
        assert_eq!(cw.winding_number(&Point2::new(0.2, 0.2)), -1);
        assert!(cw.contains(&Point3::new(0.2, 0.2, 0.0), 1e-9));
    }

    #[test]
    fn test_boundary_counts_on_every_edge() {
        let square = Polygon::rectangle(Point3::origin(), 2.0, 2.0).unwrap();
        let on_edges = [
            Point3::new(-1.0, 0.3, 0.0),
            Point3::new(1.0, 0.3, 0.0),
            Point3::new(0.3, -1.0, 0.0),
            Point3::new(0.3, 1.0, 0.0),
        ];
        for p in on_edges {
            assert!(square.contains(&p, 1e-9), "{p:?} should be on the boundary");
            let just_out = p + (p - Point3::new(0.3, 0.3, 0.0)).normalize() * 1e-3;
            assert!(!square.contains(&just_out, 1e-9), "{just_out:?} should be outside");
        }
        for corner in square.pts() {
            assert!(square.contains(&corner, 1e-9));
        }
        assert!(square.contains(&Point3::new(1.0 + 1e-9, 0.0, 0.0), 1e-6));
        assert!(square.contains(&Point3::new(-1.0 - 1e-9, 0.0, 0.0), 1e-6));
        assert_relative_eq!(square.boundary_distance(&Point2::new(0.0, 0.5)), 0.5);
        assert_relative_eq!(square.boundary_distance(&Point2::new(2.0, 2.0)), 2.0f64.sqrt());
    }

    #[test]
    fn test_from_pts_tilted() {
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 2.0),
            Point3::new(2.0, 2.0, 2.0),
            Point3::new(0.0, 2.0, 0.0),
        ];
        let poly = Polygon::from_pts(&pts).unwrap();
        for (a, b) in poly.pts().iter().zip(pts.iter()) {
            assert_relative_eq!((a - b).norm(), 0.0, epsilon = 1e-12);
        }
        assert!(poly.contains(&Point3::new(1.0, 1.0, 1.0), 1e-9));
        let n = poly.plane().normal();
        assert_relative_eq!(n.dot(&Vec3::new(1.0, 0.0, -1.0)).abs(), 2.0f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_polygons() {
        assert!(Polygon::new(vec![Point2::origin(), Point2::new(1.0, 0.0)], Frame::world()).is_err());
        let collinear = [Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)];
        assert!(Polygon::from_pts(&collinear).is_err());
        let skew = [
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.5),
        ];
        assert!(Polygon::from_pts(&skew).is_err());
    }
}
