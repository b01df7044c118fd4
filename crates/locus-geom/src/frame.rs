//! Orthonormal coordinate frames.

use std::f64::consts::TAU;

use locus_math::{normalize, Dir3, GeomError, Mat3, Point3, Result, Tolerance, Transform, Vec3};
use serde::{Deserialize, Serialize};

use crate::{Basis, Line3d, Plane};

/// How a frame placed on a world plane is oriented within that plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Orientation {
    /// X axis along this vector, projected into the plane.
    Vector(Vec3),
    /// X axis rotated by this many radians from the plane's first axis.
    Rotation(f64),
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::Rotation(0.0)
    }
}

/// A right-handed orthonormal coordinate frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Origin of the frame in world space.
    pub origin: Point3,
    /// Unit X axis.
    pub x_axis: Dir3,
    /// Unit Y axis.
    pub y_axis: Dir3,
    /// Unit Z axis (`x_axis × y_axis`).
    pub z_axis: Dir3,
}

impl Frame {
    /// Build a frame from an origin and two guide vectors.
    ///
    /// X follows `x_guide`; Z is `x × y_guide`; Y is then `z × x`, so
    /// `y_guide` only needs to lie on the desired side of X.
    pub fn new(origin: Point3, x_guide: Vec3, y_guide: Vec3) -> Result<Self> {
        let x = normalize(&x_guide)
            .map_err(|_| GeomError::degenerate("frame x guide vector has zero length"))?;
        if y_guide.norm() < locus_math::EPSILON {
            return Err(GeomError::degenerate("frame y guide vector has zero length"));
        }
        let z = normalize(&x.as_ref().cross(&y_guide))
            .map_err(|_| GeomError::degenerate("frame guide vectors are parallel"))?;
        let y = Dir3::new_normalize(z.as_ref().cross(x.as_ref()));
        Ok(Self {
            origin,
            x_axis: x,
            y_axis: y,
            z_axis: z,
        })
    }

    /// The world frame.
    pub fn world() -> Self {
        Self::at(Point3::origin())
    }

    /// A frame with world-aligned axes at `origin`.
    pub fn at(origin: Point3) -> Self {
        Self {
            origin,
            x_axis: Vec3::x_axis(),
            y_axis: Vec3::y_axis(),
            z_axis: Vec3::z_axis(),
        }
    }

    /// A frame lying in the world XY plane at `(x, y, 0)`.
    pub fn on_xy(x: f64, y: f64, orientation: Orientation) -> Result<Self> {
        on_world_plane(Point3::new(x, y, 0.0), Vec3::x(), Vec3::y(), orientation)
    }

    /// A frame lying in the world XZ plane at `(x, 0, z)`, normal along -Y.
    pub fn on_xz(x: f64, z: f64, orientation: Orientation) -> Result<Self> {
        on_world_plane(Point3::new(x, 0.0, z), Vec3::x(), Vec3::z(), orientation)
    }

    /// A frame lying in the world YZ plane at `(0, y, z)`, normal along +X.
    pub fn on_yz(y: f64, z: f64, orientation: Orientation) -> Result<Self> {
        on_world_plane(Point3::new(0.0, y, z), Vec3::y(), Vec3::z(), orientation)
    }

    /// Local-to-world rotation: the axes as matrix columns.
    pub fn rotation(&self) -> Mat3 {
        Mat3::from_columns(&[
            self.x_axis.into_inner(),
            self.y_axis.into_inner(),
            self.z_axis.into_inner(),
        ])
    }

    /// World point at local coordinates `(u, v, w)`.
    pub fn eval(&self, u: f64, v: f64, w: f64) -> Point3 {
        self.origin + u * self.x_axis.as_ref() + v * self.y_axis.as_ref() + w * self.z_axis.as_ref()
    }

    /// Local coordinates of a world point.
    pub fn deval(&self, p: &Point3) -> Vec3 {
        let d = p - self.origin;
        Vec3::new(
            d.dot(self.x_axis.as_ref()),
            d.dot(self.y_axis.as_ref()),
            d.dot(self.z_axis.as_ref()),
        )
    }

    /// World point at cylindrical coordinates about the Z axis.
    pub fn eval_cyl(&self, radius: f64, radians: f64, z: f64) -> Point3 {
        let (s, c) = radians.sin_cos();
        self.eval(radius * c, radius * s, z)
    }

    /// Cylindrical coordinates `(radius, radians, z)` of a world point.
    ///
    /// The angle is wrapped into `[0, 2π)`.
    pub fn deval_cyl(&self, p: &Point3) -> Vec3 {
        let l = self.deval(p);
        let mut theta = l.y.atan2(l.x);
        if theta < 0.0 {
            theta += TAU;
        }
        Vec3::new(l.x.hypot(l.y), theta, l.z)
    }

    /// World point at spherical coordinates; `polar` is measured from +Z.
    pub fn eval_sph(&self, radius: f64, azimuth: f64, polar: f64) -> Point3 {
        let (sp, cp) = polar.sin_cos();
        let (sa, ca) = azimuth.sin_cos();
        self.eval(radius * sp * ca, radius * sp * sa, radius * cp)
    }

    /// Spherical coordinates `(radius, azimuth, polar)` of a world point.
    pub fn deval_sph(&self, p: &Point3) -> Vec3 {
        let l = self.deval(p);
        let r = l.norm();
        if r == 0.0 {
            return Vec3::zeros();
        }
        let mut azimuth = l.y.atan2(l.x);
        if azimuth < 0.0 {
            azimuth += TAU;
        }
        Vec3::new(r, azimuth, (l.z / r).clamp(-1.0, 1.0).acos())
    }

    /// Plane through the origin spanned by X and Y (normal Z).
    pub fn xy_plane(&self) -> Plane {
        Plane::from_frame_axes(self.origin, self.x_axis, self.y_axis, self.z_axis)
    }

    /// Plane through the origin spanned by Z and X (normal Y).
    pub fn xz_plane(&self) -> Plane {
        Plane::from_frame_axes(self.origin, self.z_axis, self.x_axis, self.y_axis)
    }

    /// Plane through the origin spanned by Y and Z (normal X).
    pub fn yz_plane(&self) -> Plane {
        Plane::from_frame_axes(self.origin, self.y_axis, self.z_axis, self.x_axis)
    }

    /// Ray from the origin along X.
    pub fn x_ray(&self) -> Line3d {
        Line3d::ray(self.origin, self.x_axis.into_inner())
    }

    /// Ray from the origin along Y.
    pub fn y_ray(&self) -> Line3d {
        Line3d::ray(self.origin, self.y_axis.into_inner())
    }

    /// Ray from the origin along Z.
    pub fn z_ray(&self) -> Line3d {
        Line3d::ray(self.origin, self.z_axis.into_inner())
    }

    /// Transform carrying world geometry onto this frame.
    pub fn xform(&self) -> Transform {
        change_basis(&Frame::world(), self)
    }

    /// Transform carrying geometry on this frame back to the world.
    pub fn ixform(&self) -> Transform {
        change_basis(self, &Frame::world())
    }

    /// Reflection through this frame's XY plane.
    pub fn mirror_xform(&self) -> Transform {
        Transform::mirror_through(&self.origin, &self.z_axis)
    }

    /// Origin and axes agree componentwise within `tol` (default [`EPSILON`](locus_math::EPSILON)).
    pub fn is_equal(&self, other: &Frame, tol: Option<f64>) -> bool {
        let t = Tolerance::from_override(tol);
        t.vecs_equal(&self.origin.coords, &other.origin.coords)
            && t.vecs_equal(self.x_axis.as_ref(), other.x_axis.as_ref())
            && t.vecs_equal(self.y_axis.as_ref(), other.y_axis.as_ref())
            && t.vecs_equal(self.z_axis.as_ref(), other.z_axis.as_ref())
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::world()
    }
}

impl Basis for Frame {
    fn eval(&self, local: &Vec3) -> Point3 {
        Frame::eval(self, local.x, local.y, local.z)
    }

    fn deval(&self, world: &Point3) -> Vec3 {
        Frame::deval(self, world)
    }
}

fn on_world_plane(origin: Point3, u: Vec3, v: Vec3, orientation: Orientation) -> Result<Frame> {
    let normal = u.cross(&v);
    let x = match orientation {
        Orientation::Rotation(a) => u * a.cos() + v * a.sin(),
        Orientation::Vector(dir) => dir - normal * dir.dot(&normal),
    };
    Frame::new(origin, x, normal.cross(&x))
}

/// Transform taking geometry expressed relative to `source` into the
/// equivalent geometry expressed relative to `target`.
///
/// Moves `source` onto the world origin, rotates it into world alignment
/// using the direction cosines of its axes, then rotates and translates
/// out onto `target`.
pub fn change_basis(source: &Frame, target: &Frame) -> Transform {
    let into_source = Transform::from_parts(&source.rotation().transpose(), &Vec3::zeros())
        .compose(&Transform::translation(&-source.origin.coords));
    let onto_target = Transform::translation(&target.origin.coords)
        .compose(&Transform::from_parts(&target.rotation(), &Vec3::zeros()));
    onto_target.compose(&into_source)
}

/// A cylindrical coordinate system `(radius, radians, z)` built on a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CylFrame {
    /// Frame whose Z axis is the cylinder axis and X the zero angle.
    pub frame: Frame,
}

impl CylFrame {
    /// World-aligned cylindrical system at `origin`.
    pub fn new(origin: Point3) -> Self {
        Self {
            frame: Frame::at(origin),
        }
    }

    /// Cylindrical system on an existing frame.
    pub fn from_frame(frame: Frame) -> Self {
        Self { frame }
    }

    /// World point at `(radius, radians, z)`.
    pub fn eval(&self, radius: f64, radians: f64, z: f64) -> Point3 {
        self.frame.eval_cyl(radius, radians, z)
    }

    /// `(radius, radians, z)` of a world point, angle in `[0, 2π)`.
    pub fn deval(&self, p: &Point3) -> Vec3 {
        self.frame.deval_cyl(p)
    }
}

impl Basis for CylFrame {
    fn eval(&self, local: &Vec3) -> Point3 {
        CylFrame::eval(self, local.x, local.y, local.z)
    }

    fn deval(&self, world: &Point3) -> Vec3 {
        CylFrame::deval(self, world)
    }
}
