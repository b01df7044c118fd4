//! Open polylines.

use locus_math::{Point3, Vec3};
use serde::{Deserialize, Serialize};

use crate::basis::place;
use crate::{AnyBasis, Based, Line3d};

/// A chain of straight segments through an ordered list of vertices.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polyline {
    /// Vertex coordinates relative to `basis`.
    pub verts: Vec<Vec3>,
    /// Basis the vertices are expressed in.
    pub basis: Option<AnyBasis>,
}

impl Polyline {
    /// Baseless polyline through world points.
    pub fn new(pts: impl IntoIterator<Item = Point3>) -> Self {
        Self {
            verts: pts.into_iter().map(|p| p.coords).collect(),
            basis: None,
        }
    }

    /// Polyline with vertices given in coordinates of `basis`.
    pub fn on(basis: impl Into<AnyBasis>, verts: Vec<Vec3>) -> Self {
        Self {
            verts,
            basis: Some(basis.into()),
        }
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.verts.len()
    }

    /// Whether there are no vertices.
    pub fn is_empty(&self) -> bool {
        self.verts.is_empty()
    }

    /// World position of vertex `i`.
    pub fn pt(&self, i: usize) -> Option<Point3> {
        self.verts.get(i).map(|v| place(self.basis.as_ref(), v))
    }

    /// World positions of every vertex.
    pub fn pts(&self) -> Vec<Point3> {
        self.verts.iter().map(|v| place(self.basis.as_ref(), v)).collect()
    }

    /// World-space segments joining consecutive vertices.
    pub fn edges(&self) -> Vec<Line3d> {
        self.pts().windows(2).map(|w| Line3d::segment(w[0], w[1])).collect()
    }

    /// Total world-space length.
    pub fn length(&self) -> f64 {
        self.pts().windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }
}

impl Based for Polyline {
    fn basis(&self) -> Option<&AnyBasis> {
        self.basis.as_ref()
    }

    fn basis_applied(&self) -> Self {
        Self::new(self.pts())
    }

    fn basis_stripped(&self) -> Self {
        Self {
            verts: self.verts.clone(),
            basis: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Frame;
    use approx::assert_relative_eq;

    #[test]
    fn test_edges_and_length() {
        let pl = Polyline::new([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(3.0, 4.0, 0.0),
        ]);
        assert_eq!(pl.edges().len(), 2);
        assert_relative_eq!(pl.length(), 7.0);
        assert_eq!(pl.edges()[1].end(), Point3::new(3.0, 4.0, 0.0));
    }

    #[test]
    fn test_based_polyline() {
        let frame = Frame::at(Point3::new(0.0, 0.0, 10.0));
        let pl = Polyline::on(frame, vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)]);
        assert_eq!(pl.pt(0), Some(Point3::new(1.0, 0.0, 10.0)));
        assert_eq!(pl.basis_applied().pts(), pl.pts());
        assert!(pl.basis_applied().is_baseless());
        assert_eq!(pl.basis_stripped().pt(1), Some(Point3::new(0.0, 1.0, 0.0)));
    }
}
