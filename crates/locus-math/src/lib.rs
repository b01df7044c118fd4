#![warn(missing_docs)]

//! Math types for the locus geometry kernel.
//!
//! Thin wrappers around nalgebra providing domain-specific types
//! for computational geometry: points, vectors, directions, affine
//! transforms, parametric intervals, and tolerance constants.

mod error;
mod interval;
pub mod vector;

pub use error::{GeomError, Result};
pub use interval::Interval;
pub use vector::{
    is_coincident, is_equal, is_parallel, is_perpendicular, normalize, points_equal,
};

use nalgebra::{Matrix3, Matrix4, Unit, Vector2, Vector3, Vector4};
use serde::{Deserialize, Serialize};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A 3x3 matrix, used for linear blocks and tensors.
pub type Mat3 = Matrix3<f64>;

/// A point in 2D parameter space.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// Default tolerance for geometric comparisons.
pub const EPSILON: f64 = 1.0e-10;

/// A world coordinate plane, used to name mirror transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldPlane {
    /// The plane spanned by X and Y (normal Z).
    Xy,
    /// The plane spanned by X and Z (normal Y).
    Xz,
    /// The plane spanned by Y and Z (normal X).
    Yz,
}

/// An affine transformation.
///
/// Stored as a 4x4 homogeneous matrix whose last row is always
/// `[0, 0, 0, 1]`; only the upper 3x4 block carries information.
/// Points are column vectors, so `compose` follows matrix products:
/// `a.compose(&b)` maps `p` to `a(b(p))`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Build from the three informative rows `[m_r0, m_r1, m_r2, t_r]`.
    pub fn from_rows(rows: [[f64; 4]; 3]) -> Self {
        let mut m = Matrix4::identity();
        for (r, row) in rows.iter().enumerate() {
            for (c, v) in row.iter().enumerate() {
                m[(r, c)] = *v;
            }
        }
        Self { matrix: m }
    }

    /// Build from a linear 3x3 block and a translation.
    pub fn from_parts(linear: &Matrix3<f64>, translation: &Vec3) -> Self {
        let mut m = Matrix4::identity();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(linear);
        m[(0, 3)] = translation.x;
        m[(1, 3)] = translation.y;
        m[(2, 3)] = translation.z;
        Self { matrix: m }
    }

    /// Coefficient at row `r`, column `c`.
    pub fn m(&self, r: usize, c: usize) -> f64 {
        self.matrix[(r, c)]
    }

    /// The linear 3x3 block.
    pub fn linear(&self) -> Matrix3<f64> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// The translation column.
    pub fn translation_part(&self) -> Vec3 {
        Vec3::new(self.m(0, 3), self.m(1, 3), self.m(2, 3))
    }

    /// Translation by `v`.
    pub fn translation(v: &Vec3) -> Self {
        Self::from_parts(&Matrix3::identity(), v)
    }

    /// Uniform scale by `factor` about `origin` (the world origin if `None`).
    pub fn scale(factor: f64, origin: Option<&Point3>) -> Self {
        let shift = origin.map_or_else(Vec3::zeros, |o| o.coords * (1.0 - factor));
        Self::from_parts(&(Matrix3::identity() * factor), &shift)
    }

    /// Non-uniform scale by `(sx, sy, sz)` about the world origin.
    pub fn scale_xyz(sx: f64, sy: f64, sz: f64) -> Self {
        Self::from_parts(&Matrix3::from_diagonal(&Vec3::new(sx, sy, sz)), &Vec3::zeros())
    }

    /// Reflection through a world coordinate plane.
    pub fn mirror(plane: WorldPlane) -> Self {
        let mut m = Matrix4::identity();
        match plane {
            WorldPlane::Xy => m[(2, 2)] = -1.0,
            WorldPlane::Xz => m[(1, 1)] = -1.0,
            WorldPlane::Yz => m[(0, 0)] = -1.0,
        }
        Self { matrix: m }
    }

    /// Reflection through the plane at `origin` with unit `normal`.
    pub fn mirror_through(origin: &Point3, normal: &Dir3) -> Self {
        let n = normal.as_ref();
        let linear = Matrix3::identity() - n * n.transpose() * 2.0;
        let shift = n * (2.0 * n.dot(&origin.coords));
        Self::from_parts(&linear, &shift)
    }

    /// Rotation by `angle` radians about `axis`, pivoting on `center`
    /// (the world origin if `None`).
    ///
    /// Uses Rodrigues' rotation formula. Fails on a zero-length axis.
    pub fn rotation(axis: &Vec3, angle: f64, center: Option<&Point3>) -> Result<Self> {
        let axis = normalize(axis)?;
        let rot = Self::rotation_about_axis(&axis, angle);
        Ok(match center {
            None => rot,
            Some(c) => Self::translation(&c.coords)
                .compose(&rot)
                .compose(&Self::translation(&-c.coords)),
        })
    }

    /// Rotation about an arbitrary unit axis through the origin by `angle` radians.
    pub fn rotation_about_axis(axis: &Dir3, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let (x, y, z) = (axis.as_ref().x, axis.as_ref().y, axis.as_ref().z);
        let linear = Matrix3::new(
            t * x * x + c,
            t * x * y - s * z,
            t * x * z + s * y,
            t * x * y + s * z,
            t * y * y + c,
            t * y * z - s * x,
            t * x * z - s * y,
            t * y * z + s * x,
            t * z * z + c,
        );
        Self::from_parts(&linear, &Vec3::zeros())
    }

    /// Map local coordinates of the frame `(origin, x, y, z)` to world
    /// coordinates: the axes become the columns of the linear block.
    pub fn from_axes(origin: &Point3, x: &Vec3, y: &Vec3, z: &Vec3) -> Self {
        Self::from_parts(&Matrix3::from_columns(&[*x, *y, *z]), &origin.coords)
    }

    /// Compose: the result applies `other` first, then `self`.
    pub fn compose(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Copy with the translation column zeroed.
    pub fn strip_translation(&self) -> Self {
        Self::from_parts(&self.linear(), &Vec3::zeros())
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Transform a direction vector (ignores translation, applies rotation/scale).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        let r = self.matrix * Vector4::new(v.x, v.y, v.z, 0.0);
        Vec3::new(r.x, r.y, r.z)
    }

    /// Transform a surface normal (inverse transpose of the linear block).
    ///
    /// A singular linear block leaves the normal unchanged.
    pub fn apply_normal(&self, n: &Vec3) -> Vec3 {
        match self.linear().try_inverse() {
            Some(inv) => inv.transpose() * n,
            None => *n,
        }
    }

    /// Inverse of this transform, if it exists.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }

    /// Whether every coefficient matches `other` within `tol`.
    pub fn approx_eq(&self, other: &Transform, tol: f64) -> bool {
        self.matrix
            .iter()
            .zip(other.matrix.iter())
            .all(|(a, b)| (a - b).abs() <= tol)
    }

    /// Whether this is the identity within `tol`.
    pub fn is_identity(&self, tol: f64) -> bool {
        self.approx_eq(&Self::identity(), tol)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Tolerance settings for geometric comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Linear (componentwise / distance) tolerance.
    pub linear: f64,
    /// Angular tolerance in radians.
    pub angular: f64,
}

impl Tolerance {
    /// Default tolerances, both [`EPSILON`].
    pub const DEFAULT: Self = Self {
        linear: EPSILON,
        angular: EPSILON,
    };

    /// Tolerance with the given linear value and the default angular one.
    pub const fn new(linear: f64) -> Self {
        Self {
            linear,
            angular: EPSILON,
        }
    }

    /// `Some(tol)` overrides the linear tolerance; `None` keeps the default.
    pub fn from_override(tol: Option<f64>) -> Self {
        tol.map_or(Self::DEFAULT, Self::new)
    }

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if two vectors agree componentwise within tolerance.
    pub fn vecs_equal(&self, a: &Vec3, b: &Vec3) -> bool {
        (a - b).iter().all(|d| d.abs() < self.linear)
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }

    /// Check if two angles are effectively equal (in radians).
    pub fn angles_equal(&self, a: f64, b: f64) -> bool {
        (a - b).abs() < self.angular
    }

    /// Same direction and sense. Zero vectors are never coincident.
    pub fn coincident(&self, a: &Vec3, b: &Vec3) -> bool {
        match (normalize(a), normalize(b)) {
            (Ok(na), Ok(nb)) => self.vecs_equal(na.as_ref(), nb.as_ref()),
            _ => false,
        }
    }

    /// Same direction in either sense.
    pub fn parallel(&self, a: &Vec3, b: &Vec3) -> bool {
        self.coincident(a, b) || self.coincident(a, &-b)
    }

    /// At right angles. Zero vectors are never perpendicular.
    pub fn perpendicular(&self, a: &Vec3, b: &Vec3) -> bool {
        match (normalize(a), normalize(b)) {
            (Ok(na), Ok(nb)) => na.as_ref().dot(nb.as_ref()).abs() < self.linear,
            _ => false,
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_identity_transform() {
        let t = Transform::identity();
        let p = Point3::new(1.0, 2.0, 3.0);
        assert!((t.apply_point(&p) - p).norm() < 1e-12);
        assert!(t.is_identity(EPSILON));
    }

    #[test]
    fn test_translation_moves_points_not_vectors() {
        let t = Transform::translation(&Vec3::new(10.0, 20.0, 30.0));
        let p = t.apply_point(&Point3::new(1.0, 2.0, 3.0));
        assert!((p.x - 11.0).abs() < 1e-12);
        assert!((p.y - 22.0).abs() < 1e-12);
        assert!((p.z - 33.0).abs() < 1e-12);
        let v = t.apply_vec(&Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(v, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_scale_about_origin_point() {
        let center = Point3::new(1.0, 1.0, 1.0);
        let t = Transform::scale(3.0, Some(&center));
        assert_eq!(t.apply_point(&center), center);
        let p = t.apply_point(&Point3::new(2.0, 1.0, 1.0));
        assert_relative_eq!(p.x, 4.0);
        assert_relative_eq!(p.y, 1.0);
    }

    #[test]
    fn test_scale_xyz() {
        let t = Transform::scale_xyz(2.0, 3.0, 4.0);
        let p = t.apply_point(&Point3::new(1.0, 1.0, 1.0));
        assert_eq!(p, Point3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_compose_applies_right_operand_first() {
        let translate = Transform::translation(&Vec3::new(1.0, 0.0, 0.0));
        let scale = Transform::scale(2.0, None);
        // scale(translate(p)): origin -> (1,0,0) -> (2,0,0)
        let p = scale.compose(&translate).apply_point(&Point3::origin());
        assert!((p.x - 2.0).abs() < 1e-12);
        // translate(scale(p)): origin -> origin -> (1,0,0)
        let q = translate.compose(&scale).apply_point(&Point3::origin());
        assert!((q.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_inverse() {
        let t = Transform::translation(&Vec3::new(1.0, 2.0, 3.0));
        let inv = t.inverse().unwrap();
        assert!(t.compose(&inv).is_identity(1e-12));
    }

    #[test]
    fn test_rotation_about_axis() {
        let t = Transform::rotation(&Vec3::z(), FRAC_PI_2, None).unwrap();
        let r = t.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert!(r.x.abs() < 1e-12);
        assert!((r.y - 1.0).abs() < 1e-12);
        assert!(r.z.abs() < 1e-12);

        // 180° about (1,1,0) swaps x and y
        let t2 = Transform::rotation(&Vec3::new(1.0, 1.0, 0.0), PI, None).unwrap();
        let r2 = t2.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert!(r2.x.abs() < 1e-12);
        assert!((r2.y - 1.0).abs() < 1e-12);
        assert!(r2.z.abs() < 1e-12);
    }

    #[test]
    fn test_rotation_about_center() {
        let center = Point3::new(1.0, 0.0, 0.0);
        let t = Transform::rotation(&Vec3::z(), PI, Some(&center)).unwrap();
        let r = t.apply_point(&Point3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(r.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(r.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_zero_axis_fails() {
        assert!(Transform::rotation(&Vec3::zeros(), 1.0, None).is_err());
    }

    #[test]
    fn test_mirror_world_planes() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(Transform::mirror(WorldPlane::Xy).apply_point(&p), Point3::new(1.0, 2.0, -3.0));
        assert_eq!(Transform::mirror(WorldPlane::Xz).apply_point(&p), Point3::new(1.0, -2.0, 3.0));
        assert_eq!(Transform::mirror(WorldPlane::Yz).apply_point(&p), Point3::new(-1.0, 2.0, 3.0));
    }

    #[test]
    fn test_mirror_through_offset_plane() {
        let t = Transform::mirror_through(&Point3::new(0.0, 0.0, 5.0), &Vec3::z_axis());
        let p = t.apply_point(&Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(p.z, 9.0, epsilon = 1e-12);
        assert!(t.compose(&t).is_identity(1e-12));
    }

    #[test]
    fn test_strip_translation() {
        let t = Transform::rotation(&Vec3::z(), 0.3, Some(&Point3::new(4.0, 5.0, 6.0))).unwrap();
        let s = t.strip_translation();
        assert_eq!(s.translation_part(), Vec3::zeros());
        assert_eq!(s.linear(), t.linear());
    }

    #[test]
    fn test_from_rows_matches_coefficients() {
        let t = Transform::from_rows([
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
        ]);
        assert_eq!(t.m(1, 2), 7.0);
        assert_eq!(t.m(3, 3), 1.0);
        let p = t.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert_eq!(p, Point3::new(5.0, 13.0, 21.0));
    }

    #[test]
    fn test_tolerance_points_equal() {
        let tol = Tolerance::new(1e-6);
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(1.0 + 1e-7, 2.0, 3.0);
        assert!(tol.points_equal(&a, &b));
        let c = Point3::new(1.001, 2.0, 3.0);
        assert!(!tol.points_equal(&a, &c));
        assert!(!Tolerance::DEFAULT.points_equal(&a, &b));
    }
}
