//! Intersections against infinite planes.

use locus_geom::{Line3d, LineKind, Plane, Polyline};
use locus_math::{normalize, GeomError, Result, EPSILON};

use crate::outcome::{Intersection, IntersectionOutcome, PolylineHit};
use crate::IntersectOptions;

/// Intersect a line, ray or segment with a plane.
///
/// `meta.dist` is the signed distance from the origin of `line` to the hit,
/// measured along its unit direction; `meta.ta` is the matching line
/// parameter. A linear entity lying in the plane comes back whole with a
/// distance of zero. `ignore_backface` rejects lines and rays travelling
/// along the plane normal; segments are accepted from either side.
pub fn line_plane(line: &Line3d, plane: &Plane, options: &IntersectOptions) -> Result<Intersection> {
    let length = line.length();
    let dir = normalize(&line.direction)
        .map_err(|_| GeomError::degenerate("cannot intersect a zero-length line"))?;
    let normal = plane.normal();
    let denom = normal.dot(dir.as_ref());

    if denom.abs() < EPSILON {
        if plane.signed_distance(&line.origin).abs() <= options.tolerance {
            let outcome = match line.kind {
                LineKind::Segment => IntersectionOutcome::Segment(line.clone()),
                LineKind::Line | LineKind::Ray => IntersectionOutcome::Line(line.clone()),
            };
            return Ok(Intersection::new(outcome, "line lies in plane").with_dist(0.0));
        }
        return Ok(Intersection::miss("line is parallel to plane"));
    }

    if options.ignore_backface && denom >= 0.0 && line.kind != LineKind::Segment {
        return Ok(Intersection::miss("line approaches the back of the plane"));
    }

    let dist = normal.dot(&(plane.origin - line.origin)) / denom;
    let ta = dist / length;
    let mut result = if line.accepts(ta, options.tolerance / length) {
        let point = line.origin + dir.as_ref() * dist;
        Intersection::new(IntersectionOutcome::Point(point), "line crosses plane")
    } else {
        let why = match line.kind {
            LineKind::Segment => "plane lies beyond the segment ends",
            _ => "plane lies behind the ray",
        };
        Intersection::miss(why)
    };
    result.meta.dist = Some(dist);
    result.meta.ta = Some(ta);
    Ok(result)
}

/// Intersect a polyline with a plane.
///
/// Vertices within tolerance of the plane are hits themselves; every edge
/// whose ends lie strictly on opposite sides contributes its crossing.
/// Each point is tagged in `meta.polyline_hits`.
pub fn polyline_plane(
    polyline: &Polyline,
    plane: &Plane,
    options: &IntersectOptions,
) -> Result<Intersection> {
    let pts = polyline.pts();
    let sides: Vec<f64> = pts
        .iter()
        .map(|p| {
            let sd = plane.signed_distance(p);
            if sd.abs() <= options.tolerance { 0.0 } else { sd }
        })
        .collect();

    let crossing = IntersectOptions {
        ignore_backface: false,
        ..options.clone()
    };
    let mut points = Vec::new();
    let mut hits = Vec::new();
    for i in 0..pts.len() {
        if sides[i] == 0.0 {
            points.push(pts[i]);
            hits.push(PolylineHit::Vertex(i));
        }
        if i + 1 < pts.len() && sides[i] * sides[i + 1] < 0.0 {
            let edge = Line3d::segment(pts[i], pts[i + 1]);
            if let IntersectionOutcome::Point(p) = line_plane(&edge, plane, &crossing)?.outcome {
                points.push(p);
                hits.push(PolylineHit::Edge(i));
            }
        }
    }

    if points.is_empty() {
        return Ok(Intersection::miss("polyline stays on one side of the plane"));
    }
    let log = format!("polyline meets plane at {} points", points.len());
    let mut result = Intersection::new(IntersectionOutcome::Points(points), log);
    result.meta.polyline_hits = hits;
    Ok(result)
}

/// Intersect two planes.
///
/// The line runs along `na × nb` through a point found by walking from
/// the origin of `b` inside `b`, perpendicular to the line, until it
/// reaches `a`.
pub fn plane_plane(a: &Plane, b: &Plane, options: &IntersectOptions) -> Result<Intersection> {
    let (na, nb) = (a.normal(), b.normal());
    let along = na.cross(&nb);
    if along.norm() < EPSILON {
        let why = if a.is_coplanar(b, Some(options.tolerance)) {
            "planes coincide"
        } else {
            "planes are parallel"
        };
        return Ok(Intersection::miss(why));
    }

    let inward = nb.cross(&along);
    let t = na.dot(&(a.origin - b.origin)) / na.dot(&inward);
    let point = b.origin + inward * t;
    let dir = normalize(&along)?;
    Ok(Intersection::new(
        IntersectionOutcome::Line(Line3d::line(point, dir.into_inner())),
        "planes meet along a line",
    ))
}
