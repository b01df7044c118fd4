//! Common curve constructors.

use std::f64::consts::TAU;

use locus_math::{GeomError, Interval, Point3, Result, Vec3};

use crate::Curve;

impl Curve {
    /// Circle of `radius` about `center` in a plane parallel to world XY,
    /// over the domain `[0, 2π]`.
    pub fn circle(center: Point3, radius: f64) -> Result<Curve> {
        if radius <= 0.0 || !radius.is_finite() {
            return Err(GeomError::degenerate(format!("circle radius must be positive, got {radius}")));
        }
        Curve::new(
            move |t| center + Vec3::new(radius * t.cos(), radius * t.sin(), 0.0),
            Interval::twopi(),
        )
    }

    /// Helix about a world-Z axis through `center`, rising `pitch` per turn.
    ///
    /// The domain is `[0, 2π·turns]`.
    pub fn helix(center: Point3, radius: f64, pitch: f64, turns: f64) -> Result<Curve> {
        if radius <= 0.0 || !radius.is_finite() {
            return Err(GeomError::degenerate(format!("helix radius must be positive, got {radius}")));
        }
        if turns <= 0.0 || !turns.is_finite() {
            return Err(GeomError::degenerate(format!("helix turns must be positive, got {turns}")));
        }
        let rise = pitch / TAU;
        Curve::new(
            move |t| center + Vec3::new(radius * t.cos(), radius * t.sin(), rise * t),
            Interval::new(0.0, TAU * turns),
        )
    }

    /// Bezier curve over `[0, 1]` evaluated by de Casteljau's algorithm.
    pub fn bezier(control_pts: Vec<Point3>) -> Result<Curve> {
        if control_pts.len() < 2 {
            return Err(GeomError::degenerate(format!(
                "bezier needs at least 2 control points, got {}",
                control_pts.len()
            )));
        }
        Curve::new(move |t| de_casteljau(&control_pts, t), Interval::unit())
    }

    /// Cubic Hermite curve over `[0, 1]` from end points and end tangents.
    pub fn hermite(p0: Point3, m0: Vec3, p1: Point3, m1: Vec3) -> Result<Curve> {
        Curve::new(
            move |t| {
                let t2 = t * t;
                let t3 = t2 * t;
                let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
                let h10 = t3 - 2.0 * t2 + t;
                let h01 = -2.0 * t3 + 3.0 * t2;
                let h11 = t3 - t2;
                Point3::from(p0.coords * h00 + m0 * h10 + p1.coords * h01 + m1 * h11)
            },
            Interval::unit(),
        )
    }
}

fn de_casteljau(pts: &[Point3], t: f64) -> Point3 {
    let mut work: Vec<Vec3> = pts.iter().map(|p| p.coords).collect();
    for level in (1..work.len()).rev() {
        for i in 0..level {
            work[i] = work[i] * (1.0 - t) + work[i + 1] * t;
        }
    }
    Point3::from(work[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_circle_quarter() {
        let c = Curve::circle(Point3::origin(), 5.0).unwrap();
        assert_abs_diff_eq!(c.eval(0.25).unwrap(), Point3::new(0.0, 5.0, 0.0), epsilon = 1e-9);
        assert_abs_diff_eq!(c.eval(1.0).unwrap(), Point3::new(5.0, 0.0, 0.0), epsilon = 1e-9);
        assert!(Curve::circle(Point3::origin(), 0.0).is_err());
    }

    #[test]
    fn test_helix_rises_by_pitch() {
        let h = Curve::helix(Point3::origin(), 2.0, 3.0, 2.0).unwrap();
        assert_abs_diff_eq!(h.eval(0.5).unwrap(), Point3::new(2.0, 0.0, 3.0), epsilon = 1e-9);
        assert_abs_diff_eq!(h.eval(1.0).unwrap(), Point3::new(2.0, 0.0, 6.0), epsilon = 1e-9);
    }

    #[test]
    fn test_bezier_endpoints_and_midpoint() {
        let b = Curve::bezier(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ])
        .unwrap();
        assert_eq!(b.eval(0.0).unwrap(), Point3::origin());
        assert_eq!(b.eval(1.0).unwrap(), Point3::new(2.0, 0.0, 0.0));
        assert_abs_diff_eq!(b.eval(0.5).unwrap(), Point3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
        assert!(Curve::bezier(vec![Point3::origin()]).is_err());
    }

    #[test]
    fn test_hermite_matches_ends_and_tangents() {
        let h = Curve::hermite(
            Point3::origin(),
            Vec3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
        .unwrap()
        .with_tolerance(0.01)
        .unwrap();
        assert_eq!(h.eval(0.0).unwrap(), Point3::origin());
        assert_abs_diff_eq!(h.eval(1.0).unwrap(), Point3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(h.tangent(0.0).unwrap(), Vec3::x(), epsilon = 1e-3);
        assert_abs_diff_eq!(h.tangent(1.0).unwrap(), Vec3::y(), epsilon = 1e-3);
    }

    #[test]
    fn test_bezier_length() {
        let straight = Curve::bezier(vec![Point3::origin(), Point3::new(3.0, 4.0, 0.0)]).unwrap();
        assert_relative_eq!(straight.appx_length(), 5.0, epsilon = 1e-12);
    }
}
