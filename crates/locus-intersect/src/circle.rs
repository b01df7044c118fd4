//! Circle and arc intersections.

use locus_geom::{Arc, Circle, Line3d, Plane};
use locus_math::{normalize, Point3, Result};

use crate::outcome::{Intersection, IntersectionOutcome};
use crate::plane::{line_plane, plane_plane};
use crate::IntersectOptions;

/// Points where a line in the plane of `circle` meets it, with their
/// parameters along the line.
///
/// The line is treated as unbounded; callers filter by kind.
fn chord(line: &Line3d, circle: &Circle, tol: f64) -> Result<Chord> {
    let dir = normalize(&line.direction)?;
    let center = circle.center();
    let t0 = line.param_of(&center);
    let foot = line.eval(t0);
    let d = (foot - center).norm();
    let r = circle.radius;
    if (d - r).abs() <= tol {
        return Ok(Chord::Tangent(foot, t0));
    }
    if d > r {
        return Ok(Chord::Miss);
    }
    let h = (r * r - d * d).sqrt();
    let dt = h / line.length();
    Ok(Chord::Two(
        (foot - dir.as_ref() * h, t0 - dt),
        (foot + dir.as_ref() * h, t0 + dt),
    ))
}

enum Chord {
    Miss,
    Tangent(Point3, f64),
    Two((Point3, f64), (Point3, f64)),
}

/// Intersect a circle with a plane.
///
/// The line where the two planes meet is recorded in `meta.line`; the
/// circle is then cut by that line.
pub fn circle_plane(circle: &Circle, plane: &Plane, options: &IntersectOptions) -> Result<Intersection> {
    let cut = plane_plane(&circle.plane, plane, options)?;
    let IntersectionOutcome::Line(line) = cut.outcome else {
        let why = if circle.plane.is_coplanar(plane, Some(options.tolerance)) {
            "circle lies in plane"
        } else {
            "circle is parallel to plane"
        };
        return Ok(Intersection::miss(why));
    };

    let mut result = match chord(&line, circle, options.tolerance)? {
        Chord::Miss => Intersection::miss("plane passes clear of circle"),
        Chord::Tangent(p, _) => Intersection::new(IntersectionOutcome::TangentPoint(p), "plane touches circle"),
        Chord::Two((p, _), (q, _)) => {
            Intersection::new(IntersectionOutcome::TwoPoints(p, q), "plane cuts circle")
        }
    };
    result.meta.line = Some(line);
    Ok(result)
}

/// Intersect an arc with a plane: cut the full circle, then keep the
/// points inside the sweep.
pub fn arc_plane(arc: &Arc, plane: &Plane, options: &IntersectOptions) -> Result<Intersection> {
    let full = circle_plane(&arc.circle(), plane, options)?;
    let angular = options.tolerance / arc.radius;
    let outcome = match full.outcome {
        IntersectionOutcome::TangentPoint(p) if arc.covers(&p, angular) => IntersectionOutcome::TangentPoint(p),
        IntersectionOutcome::TwoPoints(p, q) => IntersectionOutcome::from_points(
            [p, q].into_iter().filter(|x| arc.covers(x, angular)).collect(),
        ),
        _ => IntersectionOutcome::None,
    };
    let log = match (&outcome, full.is_hit()) {
        (IntersectionOutcome::None, true) => "plane cuts circle outside the arc".to_string(),
        (IntersectionOutcome::None, false) => full.log,
        _ => "plane cuts arc".to_string(),
    };
    Ok(Intersection {
        outcome,
        meta: full.meta,
        log,
    })
}

/// Intersect a line, ray or segment with a circle.
///
/// A line crossing the circle's plane hits only if the crossing lies on
/// the circle. A line in the plane is cut like a chord and the cut points
/// are filtered by the line's parameter range.
pub fn line_circle(line: &Line3d, circle: &Circle, options: &IntersectOptions) -> Result<Intersection> {
    let through = IntersectOptions {
        ignore_backface: false,
        ..options.clone()
    };
    let cross = line_plane(line, &circle.plane, &through)?;
    match cross.outcome {
        IntersectionOutcome::Point(p) => {
            if circle.contains(&p, Some(options.tolerance)) {
                Ok(cross)
            } else {
                Ok(Intersection {
                    outcome: IntersectionOutcome::None,
                    log: "line crosses circle plane off the circle".into(),
                    ..cross
                })
            }
        }
        IntersectionOutcome::Line(_) | IntersectionOutcome::Segment(_) => {
            let slack = options.tolerance / line.length();
            let result = match chord(line, circle, options.tolerance)? {
                Chord::Miss => Intersection::miss("line passes clear of circle"),
                Chord::Tangent(p, t) if line.accepts(t, slack) => {
                    let mut r = Intersection::new(IntersectionOutcome::TangentPoint(p), "line touches circle");
                    r.meta.ta = Some(t);
                    r
                }
                Chord::Tangent(..) => Intersection::miss("tangent point lies outside the line range"),
                Chord::Two(first, second) => {
                    let kept: Vec<Point3> = [first, second]
                        .into_iter()
                        .filter(|(_, t)| line.accepts(*t, slack))
                        .map(|(p, _)| p)
                        .collect();
                    if kept.is_empty() {
                        Intersection::miss("chord lies outside the line range")
                    } else {
                        Intersection::new(IntersectionOutcome::from_points(kept), "line cuts circle")
                    }
                }
            };
            Ok(result)
        }
        _ => Ok(cross),
    }
}

/// Intersect two coplanar circles through their radical line.
///
/// `meta.dist` is the half-chord length `h`; zero for tangent circles.
pub fn circle_circle(a: &Circle, b: &Circle, options: &IntersectOptions) -> Result<Intersection> {
    let tol = options.tolerance;
    if !a.plane.is_coplanar(&b.plane, Some(tol)) {
        return Ok(Intersection::miss("circles are not coplanar"));
    }
    let (c1, c2) = (a.center(), b.center());
    let (r1, r2) = (a.radius, b.radius);
    let d = (c2 - c1).norm();
    if d <= tol {
        return Ok(Intersection::miss("circles are concentric"));
    }
    if d > r1 + r2 + tol {
        return Ok(Intersection::miss("circles are too far apart"));
    }
    if d < (r1 - r2).abs() - tol {
        return Ok(Intersection::miss("one circle lies inside the other"));
    }

    let along = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let foot = c1 + (c2 - c1) * (along / d);
    let tangent = (d - (r1 + r2)).abs() <= tol || (d - (r1 - r2).abs()).abs() <= tol;
    if tangent {
        return Ok(Intersection::new(IntersectionOutcome::TangentPoint(foot), "circles touch").with_dist(0.0));
    }

    let h = (r1 * r1 - along * along).max(0.0).sqrt();
    let offset = normalize(&(c2 - c1).cross(&a.normal()))?.into_inner() * h;
    Ok(Intersection::new(
        IntersectionOutcome::TwoPoints(foot - offset, foot + offset),
        "circles cross",
    )
    .with_dist(h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use locus_geom::Frame;
    use locus_math::Vec3;
    use std::f64::consts::PI;

    fn opts() -> IntersectOptions {
        IntersectOptions::default()
    }

    fn flat(x: f64, y: f64, r: f64) -> Circle {
        Circle::from_center(Point3::new(x, y, 0.0), Vec3::z(), r).unwrap()
    }

    #[test]
    fn test_circle_circle_two_points() {
        let r = circle_circle(&flat(0.0, 0.0, 5.0), &flat(8.0, 0.0, 5.0), &opts()).unwrap();
        let IntersectionOutcome::TwoPoints(p, q) = r.outcome else {
            panic!("expected two points, got {:?}", r.outcome);
        };
        assert_abs_diff_eq!(p, Point3::new(4.0, 3.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(q, Point3::new(4.0, -3.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(r.meta.dist.unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_circle_circle_tangent_and_apart() {
        let r = circle_circle(&flat(0.0, 0.0, 2.0), &flat(5.0, 0.0, 3.0), &opts()).unwrap();
        assert_eq!(r.points().len(), 1);
        assert!(matches!(r.outcome, IntersectionOutcome::TangentPoint(_)));
        assert_abs_diff_eq!(r.points()[0], Point3::new(2.0, 0.0, 0.0), epsilon = 1e-12);

        let internal = circle_circle(&flat(0.0, 0.0, 5.0), &flat(2.0, 0.0, 3.0), &opts()).unwrap();
        assert_abs_diff_eq!(internal.points()[0], Point3::new(5.0, 0.0, 0.0), epsilon = 1e-12);

        let r = circle_circle(&flat(0.0, 0.0, 2.0), &flat(5.1, 0.0, 3.0), &opts()).unwrap();
        assert_eq!(r.outcome, IntersectionOutcome::None);
        assert!(!circle_circle(&flat(0.0, 0.0, 5.0), &flat(1.0, 0.0, 1.0), &opts()).unwrap().is_hit());
        assert!(!circle_circle(&flat(0.0, 0.0, 5.0), &flat(0.0, 0.0, 1.0), &opts()).unwrap().is_hit());
    }

    #[test]
    fn test_circle_circle_needs_coplanar() {
        let tilted = Circle::from_center(Point3::new(4.0, 0.0, 0.0), Vec3::x(), 5.0).unwrap();
        let r = circle_circle(&flat(0.0, 0.0, 5.0), &tilted, &opts()).unwrap();
        assert_eq!(r.log, "circles are not coplanar");
    }

    #[test]
    fn test_circle_plane() {
        let circle = flat(0.0, 0.0, 2.0);
        let cutter = Plane::new(Point3::new(1.0, 0.0, 0.0), Vec3::x()).unwrap();
        let r = circle_plane(&circle, &cutter, &opts()).unwrap();
        let mut ys: Vec<f64> = r.points().iter().map(|p| p.y).collect();
        ys.sort_by(f64::total_cmp);
        assert_eq!(ys.len(), 2);
        assert_abs_diff_eq!(ys[0], -(3.0_f64).sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(ys[1], (3.0_f64).sqrt(), epsilon = 1e-12);
        for p in r.points() {
            assert_abs_diff_eq!(p.x, 1.0, epsilon = 1e-12);
        }
        assert!(r.meta.line.is_some());

        let touch = Plane::new(Point3::new(2.0, 0.0, 0.0), Vec3::x()).unwrap();
        let r = circle_plane(&circle, &touch, &opts()).unwrap();
        assert!(matches!(r.outcome, IntersectionOutcome::TangentPoint(_)));

        let clear = Plane::new(Point3::new(3.0, 0.0, 0.0), Vec3::x()).unwrap();
        let r = circle_plane(&circle, &clear, &opts()).unwrap();
        assert!(!r.is_hit());
        assert!(r.meta.line.is_some());

        let r = circle_plane(&circle, &Plane::world_xy(), &opts()).unwrap();
        assert_eq!(r.log, "circle lies in plane");
    }

    #[test]
    fn test_arc_plane_filters_sweep() {
        // quarter arc from +X to +Y
        let arc = Arc::new(Frame::world(), 2.0, PI / 2.0).unwrap();
        let cutter = Plane::new(Point3::new(1.0, 0.0, 0.0), Vec3::x()).unwrap();
        let r = arc_plane(&arc, &cutter, &opts()).unwrap();
        assert_eq!(r.points().len(), 1);
        assert_abs_diff_eq!(r.points()[0], Point3::new(1.0, (3.0_f64).sqrt(), 0.0), epsilon = 1e-12);

        let behind = Plane::new(Point3::new(-1.0, 0.0, 0.0), Vec3::x()).unwrap();
        let r = arc_plane(&arc, &behind, &opts()).unwrap();
        assert!(!r.is_hit());
        assert_eq!(r.log, "plane cuts circle outside the arc");
    }

    #[test]
    fn test_line_through_circle_plane() {
        let circle = flat(0.0, 0.0, 1.0);
        let hit = Line3d::line(Point3::new(1.0, 0.0, 5.0), -Vec3::z());
        let r = line_circle(&hit, &circle, &opts()).unwrap();
        assert_eq!(r.outcome, IntersectionOutcome::Point(Point3::new(1.0, 0.0, 0.0)));

        let miss = Line3d::line(Point3::new(0.5, 0.0, 5.0), -Vec3::z());
        let r = line_circle(&miss, &circle, &opts()).unwrap();
        assert!(!r.is_hit());
        assert!(r.meta.dist.is_some());
    }

    #[test]
    fn test_line_in_circle_plane() {
        let circle = flat(0.0, 0.0, 1.0);
        let line = Line3d::line(Point3::new(-3.0, 0.0, 0.0), Vec3::x());
        let r = line_circle(&line, &circle, &opts()).unwrap();
        let IntersectionOutcome::TwoPoints(p, q) = r.outcome else {
            panic!("expected two points");
        };
        assert_abs_diff_eq!(p, Point3::new(-1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(q, Point3::new(1.0, 0.0, 0.0), epsilon = 1e-12);

        // a ray starting inside keeps only the forward point
        let ray = Line3d::ray(Point3::origin(), Vec3::x());
        let r = line_circle(&ray, &circle, &opts()).unwrap();
        assert_eq!(r.outcome, IntersectionOutcome::Point(Point3::new(1.0, 0.0, 0.0)));

        let seg = Line3d::segment(Point3::new(-0.5, 0.0, 0.0), Point3::new(0.5, 0.0, 0.0));
        assert!(!line_circle(&seg, &circle, &opts()).unwrap().is_hit());

        let tangent = Line3d::line(Point3::new(0.0, 1.0, 0.0), Vec3::x());
        let r = line_circle(&tangent, &circle, &opts()).unwrap();
        assert_eq!(r.outcome, IntersectionOutcome::TangentPoint(Point3::new(0.0, 1.0, 0.0)));
    }
}
