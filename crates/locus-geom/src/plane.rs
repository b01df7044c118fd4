//! Infinite planes.

use locus_math::{
    normalize, vector::centroid, Dir3, GeomError, Point2, Point3, Result, Tolerance, Transform,
    Vec3,
};
use serde::{Deserialize, Serialize};

use crate::{Basis, Frame};

/// An infinite plane with an in-plane parameterization.
///
/// Parameterization: `P(u, v) = origin + u * x_dir + v * y_dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Origin point on the plane.
    pub origin: Point3,
    /// Unit vector along the u direction.
    pub x_dir: Dir3,
    /// Unit vector along the v direction.
    pub y_dir: Dir3,
    /// Unit normal (x_dir × y_dir).
    pub normal_dir: Dir3,
}

impl Plane {
    /// Create a plane from an origin and normal. In-plane axes are chosen arbitrarily.
    pub fn new(origin: Point3, normal: Vec3) -> Result<Self> {
        let n = normalize(&normal)
            .map_err(|_| GeomError::degenerate("plane normal has zero length"))?;
        // Pick an arbitrary perpendicular vector
        let arbitrary = if n.as_ref().x.abs() < 0.9 {
            Vec3::x()
        } else {
            Vec3::y()
        };
        let y = Dir3::new_normalize(n.as_ref().cross(&arbitrary));
        let x = Dir3::new_normalize(y.as_ref().cross(n.as_ref()));
        Ok(Self::from_frame_axes(origin, x, y, n))
    }

    /// Plane from already orthonormal axes.
    pub fn from_frame_axes(origin: Point3, x_dir: Dir3, y_dir: Dir3, normal_dir: Dir3) -> Self {
        Self {
            origin,
            x_dir,
            y_dir,
            normal_dir,
        }
    }

    /// Best plane through three points, anchored at their centroid.
    pub fn from_pts(a: &Point3, b: &Point3, c: &Point3) -> Result<Self> {
        let normal = (b - a).cross(&(c - a));
        if normal.norm() < locus_math::EPSILON {
            return Err(GeomError::degenerate("cannot fit a plane to collinear points"));
        }
        let origin = centroid(&[*a, *b, *c]).unwrap_or(*a);
        Self::new(origin, normal)
    }

    /// World XY plane (normal +Z).
    pub fn world_xy() -> Self {
        Frame::world().xy_plane()
    }

    /// World XZ plane (normal +Y).
    pub fn world_xz() -> Self {
        Frame::world().xz_plane()
    }

    /// World YZ plane (normal +X).
    pub fn world_yz() -> Self {
        Frame::world().yz_plane()
    }

    /// The unit normal as a plain vector.
    pub fn normal(&self) -> Vec3 {
        self.normal_dir.into_inner()
    }

    /// Plane constant `d` in `n · p = d`.
    pub fn d(&self) -> f64 {
        self.normal().dot(&self.origin.coords)
    }

    /// Frame on this plane: X and Y in-plane, Z along the normal.
    pub fn frame(&self) -> Frame {
        Frame {
            origin: self.origin,
            x_axis: self.x_dir,
            y_axis: self.y_dir,
            z_axis: self.normal_dir,
        }
    }

    /// Same plane, opposite normal.
    pub fn flipped(&self) -> Self {
        Self::from_frame_axes(self.origin, self.y_dir, self.x_dir, -self.normal_dir)
    }

    /// Point at in-plane coordinates `(u, v)`.
    pub fn evaluate(&self, u: f64, v: f64) -> Point3 {
        self.origin + u * self.x_dir.as_ref() + v * self.y_dir.as_ref()
    }

    /// Project a 3D point onto this plane's (u, v) parameter space.
    pub fn project(&self, p: &Point3) -> Point2 {
        let d = p - self.origin;
        Point2::new(d.dot(self.x_dir.as_ref()), d.dot(self.y_dir.as_ref()))
    }

    /// Signed distance from a point to this plane.
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        (p - self.origin).dot(self.normal_dir.as_ref())
    }

    /// Closest point on the plane to `p`.
    pub fn near(&self, p: &Point3) -> Point3 {
        p - self.normal() * self.signed_distance(p)
    }

    /// Whether `p` lies on the plane within `tol` (default [`EPSILON`](locus_math::EPSILON)).
    pub fn contains(&self, p: &Point3, tol: Option<f64>) -> bool {
        Tolerance::from_override(tol).is_zero(self.signed_distance(p))
    }

    /// Whether `other` describes the same infinite plane, in either orientation.
    pub fn is_coplanar(&self, other: &Plane, tol: Option<f64>) -> bool {
        let t = Tolerance::from_override(tol);
        t.is_zero(self.signed_distance(&other.origin))
            && t.parallel(self.normal_dir.as_ref(), other.normal_dir.as_ref())
    }

    /// Reflection through this plane.
    pub fn mirror_xform(&self) -> Transform {
        Transform::mirror_through(&self.origin, &self.normal_dir)
    }
}

impl Basis for Plane {
    fn eval(&self, local: &Vec3) -> Point3 {
        self.evaluate(local.x, local.y) + local.z * self.normal_dir.as_ref()
    }

    fn deval(&self, world: &Point3) -> Vec3 {
        let uv = self.project(world);
        Vec3::new(uv.x, uv.y, self.signed_distance(world))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_plane_axes_orthonormal() {
        let plane = Plane::new(Point3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 1.0, 1.0)).unwrap();
        let (x, y, n) = (plane.x_dir.into_inner(), plane.y_dir.into_inner(), plane.normal());
        assert_abs_diff_eq!(x.dot(&y), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x.cross(&y), n, epsilon = 1e-12);
        assert_relative_eq!(n.norm(), 1.0);
    }

    #[test]
    fn test_zero_normal_fails() {
        assert!(matches!(
            Plane::new(Point3::origin(), Vec3::zeros()),
            Err(GeomError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_from_pts() {
        let plane = Plane::from_pts(
            &Point3::new(0.0, 0.0, 2.0),
            &Point3::new(3.0, 0.0, 2.0),
            &Point3::new(0.0, 3.0, 2.0),
        )
        .unwrap();
        assert_abs_diff_eq!(plane.normal(), Vec3::z(), epsilon = 1e-12);
        assert_relative_eq!(plane.origin, Point3::new(1.0, 1.0, 2.0));
        assert_relative_eq!(plane.d(), 2.0);

        let collinear = Plane::from_pts(
            &Point3::origin(),
            &Point3::new(1.0, 1.0, 1.0),
            &Point3::new(2.0, 2.0, 2.0),
        );
        assert!(matches!(collinear, Err(GeomError::DegenerateInput(_))));
    }

    #[test]
    fn test_signed_distance_and_near() {
        let plane = Plane::world_xy();
        let p = Point3::new(3.0, 4.0, -5.0);
        assert_eq!(plane.signed_distance(&p), -5.0);
        assert_eq!(plane.near(&p), Point3::new(3.0, 4.0, 0.0));
        assert!(plane.contains(&plane.near(&p), None));
    }

    #[test]
    fn test_coplanar_ignores_orientation() {
        let a = Plane::world_xy();
        let b = Plane::new(Point3::new(7.0, -2.0, 0.0), -Vec3::z()).unwrap();
        assert!(a.is_coplanar(&b, None));
        assert!(a.is_coplanar(&a.flipped(), None));
        let c = Plane::new(Point3::new(0.0, 0.0, 1e-3), Vec3::z()).unwrap();
        assert!(!a.is_coplanar(&c, None));
        assert!(a.is_coplanar(&c, Some(1e-2)));
    }

    #[test]
    fn test_world_planes_normals() {
        assert_abs_diff_eq!(Plane::world_xz().normal(), Vec3::y(), epsilon = 1e-12);
        assert_abs_diff_eq!(Plane::world_yz().normal(), Vec3::x(), epsilon = 1e-12);
    }

    #[test]
    fn test_basis_round_trip() {
        let plane = Plane::new(Point3::new(1.0, -1.0, 0.5), Vec3::new(0.2, 0.9, -0.4)).unwrap();
        let local = Vec3::new(2.0, -3.0, 0.75);
        let world = Basis::eval(&plane, &local);
        assert_abs_diff_eq!(Basis::deval(&plane, &world), local, epsilon = 1e-12);
    }

    #[test]
    fn test_mirror_xform() {
        let plane = Plane::new(Point3::new(0.0, 0.0, 2.0), Vec3::z()).unwrap();
        let p = plane.mirror_xform().apply_point(&Point3::new(1.0, 1.0, 0.0));
        assert_abs_diff_eq!(p, Point3::new(1.0, 1.0, 4.0), epsilon = 1e-12);
    }
}
