//! Vector helpers and tolerance-aware predicates.
//!
//! nalgebra supplies the arithmetic; this module adds the fallible and
//! tolerance-driven operations geometry code leans on. Every predicate has
//! a free-function form taking an optional tolerance override that falls
//! back to [`EPSILON`](crate::EPSILON).

use crate::{Dir3, GeomError, Point3, Result, Tolerance, Vec3};

/// Normalize `v`, failing on a zero-length vector.
pub fn normalize(v: &Vec3) -> Result<Dir3> {
    let n = v.norm();
    if n < crate::EPSILON || !n.is_finite() {
        return Err(GeomError::degenerate("cannot normalize a zero-length vector"));
    }
    Ok(Dir3::new_unchecked(v / n))
}

/// `v` rescaled to `length`.
pub fn normalized_to(v: &Vec3, length: f64) -> Result<Vec3> {
    Ok(normalize(v)?.into_inner() * length)
}

/// Unsigned angle between two vectors, in radians.
pub fn angle(a: &Vec3, b: &Vec3) -> Result<f64> {
    let (na, nb) = (normalize(a)?, normalize(b)?);
    Ok(na.as_ref().dot(nb.as_ref()).clamp(-1.0, 1.0).acos())
}

/// Component of `v` along `onto`.
pub fn project_onto(v: &Vec3, onto: &Vec3) -> Result<Vec3> {
    let len2 = onto.norm_squared();
    if len2 < crate::EPSILON * crate::EPSILON {
        return Err(GeomError::degenerate("cannot project onto a zero-length vector"));
    }
    Ok(onto * (v.dot(onto) / len2))
}

/// Linear interpolation between two vectors.
pub fn interpolate(a: &Vec3, b: &Vec3, t: f64) -> Vec3 {
    a + (b - a) * t
}

/// Linear interpolation between two points.
pub fn lerp_point(a: &Point3, b: &Point3, t: f64) -> Point3 {
    a + (b - a) * t
}

/// Direction halfway between `a` and `b`.
pub fn bisector(a: &Vec3, b: &Vec3) -> Result<Dir3> {
    normalize(&(normalize(a)?.into_inner() + normalize(b)?.into_inner()))
}

/// Mean of a set of vectors.
pub fn average(vs: &[Vec3]) -> Option<Vec3> {
    if vs.is_empty() {
        return None;
    }
    Some(vs.iter().sum::<Vec3>() / vs.len() as f64)
}

/// Mean position of a set of points.
pub fn centroid(pts: &[Point3]) -> Option<Point3> {
    let coords: Vec<Vec3> = pts.iter().map(|p| p.coords).collect();
    average(&coords).map(Point3::from)
}

/// Index of the point in `pts` nearest to `target`.
pub fn near_index(target: &Point3, pts: &[Point3]) -> Option<usize> {
    extreme_index(target, pts, |d, best| d < best)
}

/// Index of the point in `pts` farthest from `target`.
pub fn far_index(target: &Point3, pts: &[Point3]) -> Option<usize> {
    extreme_index(target, pts, |d, best| d > best)
}

fn extreme_index(target: &Point3, pts: &[Point3], better: impl Fn(f64, f64) -> bool) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in pts.iter().enumerate() {
        let d = (p - target).norm_squared();
        match best {
            Some((_, bd)) if !better(d, bd) => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

/// Componentwise equality within tolerance.
pub fn is_equal(a: &Vec3, b: &Vec3, tol: Option<f64>) -> bool {
    Tolerance::from_override(tol).vecs_equal(a, b)
}

/// Componentwise point equality within tolerance.
pub fn points_equal(a: &Point3, b: &Point3, tol: Option<f64>) -> bool {
    Tolerance::from_override(tol).vecs_equal(&a.coords, &b.coords)
}

/// Whether `a` and `b` point the same way.
pub fn is_coincident(a: &Vec3, b: &Vec3, tol: Option<f64>) -> bool {
    Tolerance::from_override(tol).coincident(a, b)
}

/// Whether `a` and `b` lie along the same line, in either sense.
pub fn is_parallel(a: &Vec3, b: &Vec3, tol: Option<f64>) -> bool {
    Tolerance::from_override(tol).parallel(a, b)
}

/// Whether `a` and `b` are at right angles.
pub fn is_perpendicular(a: &Vec3, b: &Vec3, tol: Option<f64>) -> bool {
    Tolerance::from_override(tol).perpendicular(a, b)
}

/// Drop duplicate points, keeping the first of each coincident group.
pub fn cull_duplicates(pts: &[Point3], tol: Option<f64>) -> Vec<Point3> {
    let t = Tolerance::from_override(tol);
    let mut out: Vec<Point3> = Vec::with_capacity(pts.len());
    for p in pts {
        if !out.iter().any(|q| t.vecs_equal(&p.coords, &q.coords)) {
            out.push(*p);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_normalize_unit_length() {
        for v in [
            Vec3::new(3.0, 4.0, 0.0),
            Vec3::new(-1e-3, 2e-4, 5e-5),
            Vec3::new(1e6, -2e6, 3e6),
        ] {
            assert_relative_eq!(normalize(&v).unwrap().norm(), 1.0, epsilon = crate::EPSILON);
        }
    }

    #[test]
    fn test_normalize_zero_fails() {
        let err = normalize(&Vec3::zeros()).unwrap_err();
        assert!(matches!(err, GeomError::DegenerateInput(_)));
    }

    #[test]
    fn test_parallel_and_coincident() {
        let a = Vec3::new(1.0, 1.0, 0.0);
        let b = Vec3::new(2.0, 2.0, 0.0);
        let c = Vec3::new(-3.0, -3.0, 0.0);
        assert!(is_coincident(&a, &b, None));
        assert!(!is_coincident(&a, &c, None));
        assert!(is_parallel(&a, &c, None));
        assert!(!is_parallel(&a, &Vec3::x(), None));
        assert!(is_perpendicular(&a, &Vec3::new(1.0, -1.0, 0.0), None));
    }

    #[test]
    fn test_tolerance_override() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(1.0 + 1e-7, 0.0, 0.0);
        assert!(!is_equal(&a, &b, None));
        assert!(is_equal(&a, &b, Some(1e-6)));
    }

    #[test]
    fn test_angle_and_projection() {
        assert_relative_eq!(angle(&Vec3::x(), &Vec3::y()).unwrap(), FRAC_PI_2);
        let p = project_onto(&Vec3::new(2.0, 3.0, 4.0), &Vec3::new(0.0, 0.0, 10.0)).unwrap();
        assert_abs_diff_eq!(p, Vec3::new(0.0, 0.0, 4.0), epsilon = 1e-12);
    }

    #[test]
    fn test_rescale_and_interpolate() {
        let v = normalized_to(&Vec3::new(0.0, 3.0, 4.0), 10.0).unwrap();
        assert_abs_diff_eq!(v, Vec3::new(0.0, 6.0, 8.0), epsilon = 1e-12);
        assert!(normalized_to(&Vec3::zeros(), 2.0).is_err());

        let (a, b) = (Vec3::new(1.0, 0.0, 2.0), Vec3::new(3.0, -4.0, 2.0));
        assert_eq!(interpolate(&a, &b, 0.0), a);
        assert_eq!(interpolate(&a, &b, 1.0), b);
        assert_abs_diff_eq!(interpolate(&a, &b, 0.25), Vec3::new(1.5, -1.0, 2.0), epsilon = 1e-12);

        let (p, q) = (Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, -6.0));
        assert_abs_diff_eq!(lerp_point(&p, &q, 0.5), Point3::new(1.0, 2.0, -3.0), epsilon = 1e-12);
        assert_abs_diff_eq!(lerp_point(&p, &q, -0.5), Point3::new(-1.0, -2.0, 3.0), epsilon = 1e-12);
    }

    #[test]
    fn test_bisector() {
        let b = bisector(&Vec3::x(), &Vec3::new(0.0, 5.0, 0.0)).unwrap();
        let half = std::f64::consts::FRAC_1_SQRT_2;
        assert_abs_diff_eq!(b.into_inner(), Vec3::new(half, half, 0.0), epsilon = 1e-12);

        // lengths do not bias the direction
        let skewed = bisector(&Vec3::new(100.0, 0.0, 0.0), &Vec3::new(0.0, 0.0, 0.01)).unwrap();
        assert_abs_diff_eq!(skewed.into_inner(), Vec3::new(half, 0.0, half), epsilon = 1e-12);

        let antiparallel = bisector(&Vec3::new(1.0, 2.0, 3.0), &Vec3::new(-2.0, -4.0, -6.0));
        assert!(matches!(antiparallel, Err(GeomError::DegenerateInput(_))));
        assert!(bisector(&Vec3::zeros(), &Vec3::x()).is_err());
    }

    #[test]
    fn test_near_far_and_cull() {
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(5.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let target = Point3::new(0.9, 0.9, 0.0);
        assert_eq!(near_index(&target, &pts), Some(3));
        assert_eq!(far_index(&target, &pts), Some(1));
        assert_eq!(cull_duplicates(&pts, None).len(), 3);
        assert_eq!(centroid(&pts[..2]), Some(Point3::new(2.5, 0.0, 0.0)));
    }
}
