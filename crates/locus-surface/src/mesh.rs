//! Indexed polygon meshes used as surface surrogates.

use locus_math::{GeomError, Point3, Result, Vec3};
use serde::{Deserialize, Serialize};

/// Vertices plus faces indexing into them.
///
/// Faces may be triangles or quads; winding follows the order of indices.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Faces as lists of vertex indices.
    pub faces: Vec<Vec<usize>>,
}

impl Mesh {
    /// Mesh with the given vertices and no faces.
    pub fn new(vertices: Vec<Point3>) -> Self {
        Self {
            vertices,
            faces: Vec::new(),
        }
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Append a face; every index must name an existing vertex.
    pub fn add_face(&mut self, indices: &[usize]) -> Result<()> {
        if indices.len() < 3 {
            return Err(GeomError::degenerate(format!(
                "mesh face needs at least 3 vertices, got {}",
                indices.len()
            )));
        }
        if let Some(bad) = indices.iter().find(|&&i| i >= self.vertices.len()) {
            return Err(GeomError::degenerate(format!(
                "face index {bad} out of range for {} vertices",
                self.vertices.len()
            )));
        }
        self.faces.push(indices.to_vec());
        Ok(())
    }

    /// Positions of the vertices of face `i`.
    pub fn face_pts(&self, i: usize) -> Option<Vec<Point3>> {
        self.faces
            .get(i)
            .map(|f| f.iter().map(|&v| self.vertices[v]).collect())
    }

    /// Unit normal of face `i` (Newell's method); `None` for a degenerate face.
    pub fn face_normal(&self, i: usize) -> Option<Vec3> {
        let pts = self.face_pts(i)?;
        let n = pts.len();
        let normal = (0..n).fold(Vec3::zeros(), |acc, k| {
            let (a, b) = (pts[k], pts[(k + 1) % n]);
            acc + Vec3::new(
                (a.y - b.y) * (a.z + b.z),
                (a.z - b.z) * (a.x + b.x),
                (a.x - b.x) * (a.y + b.y),
            )
        });
        locus_math::normalize(&normal).ok().map(|d| d.into_inner())
    }

    /// Triangle indices, fanning each face from its first vertex.
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        self.faces
            .iter()
            .flat_map(|f| (1..f.len().saturating_sub(1)).map(move |k| [f[0], f[k], f[k + 1]]))
            .collect()
    }

    /// Total area of the fan-triangulated faces.
    pub fn area(&self) -> f64 {
        self.triangles()
            .iter()
            .map(|[a, b, c]| {
                let (pa, pb, pc) = (self.vertices[*a], self.vertices[*b], self.vertices[*c]);
                (pb - pa).cross(&(pc - pa)).norm() / 2.0
            })
            .sum()
    }
}
