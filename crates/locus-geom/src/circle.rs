//! Circles and circular arcs.

use std::f64::consts::TAU;

use locus_math::{GeomError, Point3, Result, Tolerance, Vec3};
use serde::{Deserialize, Serialize};

use crate::{Frame, Plane};

/// The circle through three points, or `None` when they are collinear.
///
/// Solves the circumcenter in closed form from barycentric weights built
/// from squared edge lengths, with the plane normal following
/// `(b - a) × (c - a)`.
pub fn circumcircle(a: &Point3, b: &Point3, c: &Point3) -> Option<Circle> {
    let v1 = b - a;
    let v2 = c - a;
    let v3 = v1 - v2;
    let xl = v1.cross(&v3).norm();
    // Collinear when the sine of the angle between edges vanishes
    if xl <= locus_math::EPSILON * v1.norm() * v3.norm() || xl == 0.0 {
        return None;
    }
    let radius = 0.5 * v1.norm() * v2.norm() * v3.norm() / xl;
    let denom = 2.0 * xl * xl;
    let w1 = v3.norm_squared() * v1.dot(&v2) / denom;
    let w2 = v2.norm_squared() * v1.dot(&v3) / denom;
    let w3 = v1.norm_squared() * -v2.dot(&v3) / denom;
    let center = Point3::from(a.coords * w1 + b.coords * w2 + c.coords * w3);
    let plane = Plane::new(center, v1.cross(&v2)).ok()?;
    Some(Circle { plane, radius })
}

/// A full circle lying in a plane, centered on the plane's origin.
///
/// Parameterization: `P(t) = center + radius * (cos(t) * x_dir + sin(t) * y_dir)`,
/// `t ∈ [0, 2π)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Supporting plane; its origin is the center.
    pub plane: Plane,
    /// Radius.
    pub radius: f64,
}

impl Circle {
    /// Circle on `plane` centered at its origin.
    pub fn new(plane: Plane, radius: f64) -> Result<Self> {
        if radius <= 0.0 || !radius.is_finite() {
            return Err(GeomError::degenerate(format!("circle radius must be positive, got {radius}")));
        }
        Ok(Self { plane, radius })
    }

    /// Circle from a center point, plane normal and radius.
    pub fn from_center(center: Point3, normal: Vec3, radius: f64) -> Result<Self> {
        Self::new(Plane::new(center, normal)?, radius)
    }

    /// Circle passing through three points.
    pub fn thru_pts(a: &Point3, b: &Point3, c: &Point3) -> Result<Self> {
        circumcircle(a, b, c)
            .ok_or_else(|| GeomError::degenerate("cannot fit a circle to collinear points"))
    }

    /// Center point.
    pub fn center(&self) -> Point3 {
        self.plane.origin
    }

    /// Unit normal of the supporting plane.
    pub fn normal(&self) -> Vec3 {
        self.plane.normal()
    }

    /// Point at angle `radians` from the plane's X direction.
    pub fn eval(&self, radians: f64) -> Point3 {
        let (s, c) = radians.sin_cos();
        self.plane.evaluate(self.radius * c, self.radius * s)
    }

    /// Circumference.
    pub fn length(&self) -> f64 {
        TAU * self.radius
    }

    /// Whether `p` lies on the circle within `tol` (default [`EPSILON`](locus_math::EPSILON)).
    pub fn contains(&self, p: &Point3, tol: Option<f64>) -> bool {
        let t = Tolerance::from_override(tol);
        t.is_zero(self.plane.signed_distance(p)) && t.is_zero((p - self.center()).norm() - self.radius)
    }
}

/// A circular arc, sweeping counter-clockwise about a frame's Z axis
/// from the frame's X axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    /// Frame at the arc center; X marks the start angle.
    pub basis: Frame,
    /// Radius.
    pub radius: f64,
    /// Sweep angle in radians, in `(0, 2π]`.
    pub sweep_angle: f64,
}

impl Arc {
    /// Arc on `basis` with the given radius and sweep.
    pub fn new(basis: Frame, radius: f64, sweep_angle: f64) -> Result<Self> {
        if radius <= 0.0 || !radius.is_finite() {
            return Err(GeomError::degenerate(format!("arc radius must be positive, got {radius}")));
        }
        if sweep_angle.is_nan() || sweep_angle <= 0.0 || sweep_angle > TAU {
            return Err(GeomError::degenerate(format!(
                "arc sweep must lie in (0, 2π], got {sweep_angle}"
            )));
        }
        Ok(Self {
            basis,
            radius,
            sweep_angle,
        })
    }

    /// Arc about `center` from `start` towards `end`.
    ///
    /// The radius is taken from `start`; `end` only fixes the sweep. The
    /// minor arc is returned unless `is_major` is set.
    pub fn from_pts(center: &Point3, start: &Point3, end: &Point3, is_major: bool) -> Result<Self> {
        let to_start = start - center;
        let to_end = end - center;
        let minor = Frame::new(*center, to_start, to_end)?;
        let angle = locus_math::vector::angle(&to_start, &to_end)?;
        if is_major {
            let flipped = Frame::new(*center, to_start, -to_end)?;
            Self::new(flipped, to_start.norm(), TAU - angle)
        } else {
            Self::new(minor, to_start.norm(), angle)
        }
    }

    /// Arc starting at `a`, passing through `b`, ending at `c`.
    pub fn thru_pts(a: &Point3, b: &Point3, c: &Point3) -> Result<Self> {
        let circle = Circle::thru_pts(a, b, c)?;
        let center = circle.center();
        let frame = Frame::new(center, a - center, circle.normal().cross(&(a - center)))?;
        let through = frame.deval_cyl(b).y;
        let sweep = frame.deval_cyl(c).y;
        if through <= sweep {
            return Self::new(frame, circle.radius, sweep);
        }
        // b lies beyond c going counter-clockwise: sweep the other way
        let reversed = Frame::new(center, a - center, -frame.y_axis.into_inner())?;
        let sweep = reversed.deval_cyl(c).y;
        Self::new(reversed, circle.radius, sweep)
    }

    /// Center point.
    pub fn center(&self) -> Point3 {
        self.basis.origin
    }

    /// Point at normalized parameter `t ∈ [0, 1]` along the sweep.
    pub fn eval(&self, t: f64) -> Point3 {
        self.basis.eval_cyl(self.radius, t * self.sweep_angle, 0.0)
    }

    /// Start point.
    pub fn start(&self) -> Point3 {
        self.eval(0.0)
    }

    /// End point.
    pub fn end(&self) -> Point3 {
        self.eval(1.0)
    }

    /// Point halfway along the sweep.
    pub fn midpoint(&self) -> Point3 {
        self.eval(0.5)
    }

    /// Arc length.
    pub fn length(&self) -> f64 {
        self.radius * self.sweep_angle
    }

    /// The full circle this arc belongs to.
    pub fn circle(&self) -> Circle {
        Circle {
            plane: self.basis.xy_plane(),
            radius: self.radius,
        }
    }

    /// Whether world point `p` (assumed on the circle) falls within the sweep.
    pub fn covers(&self, p: &Point3, tol: f64) -> bool {
        let theta = self.basis.deval_cyl(p).y;
        theta <= self.sweep_angle + tol || theta >= TAU - tol
    }
}
