//! Line–line and line–polygon intersections.

use locus_geom::{Line3d, LineKind, Polygon};
use locus_math::{GeomError, Result, EPSILON};

use crate::outcome::{Intersection, IntersectionOutcome};
use crate::plane::line_plane;
use crate::IntersectOptions;

/// Intersect two linear entities.
///
/// Solves for the closest approach of the two carriers (Bourke). When the
/// closest points coincide the lines meet there, provided each parameter
/// falls in its entity's range. Skew lines do not intersect, but the
/// shortest segment joining them comes back as
/// [`IntersectionOutcome::ClosestApproach`]. `meta.ta` and `meta.tb` are
/// recorded whenever the lines are not parallel.
///
/// Parallel and collinear lines are reported as misses.
pub fn line_line(a: &Line3d, b: &Line3d, options: &IntersectOptions) -> Result<Intersection> {
    let (v1, v2) = (a.direction, b.direction);
    let (len1, len2) = (v1.norm_squared(), v2.norm_squared());
    if len1 < EPSILON * EPSILON || len2 < EPSILON * EPSILON {
        return Err(GeomError::degenerate("cannot intersect a zero-length line"));
    }

    let offset = a.origin - b.origin;
    let cross = v2.dot(&v1);
    let denom = len1 * len2 - cross * cross;
    if denom.abs() <= EPSILON * len1 * len2 {
        return Ok(Intersection::miss("lines are parallel"));
    }

    let (d_ob, d_oa) = (offset.dot(&v2), offset.dot(&v1));
    let ta = (d_ob * cross - d_oa * len2) / denom;
    let tb = (d_ob + ta * cross) / len2;
    let (pa, pb) = (a.eval(ta), b.eval(tb));
    let gap = (pb - pa).norm();

    let result = if gap > options.tolerance {
        let log = format!("lines are skew, {gap} apart at closest approach");
        Intersection::new(IntersectionOutcome::ClosestApproach(Line3d::segment(pa, pb)), log)
    } else {
        let on_a = a.accepts(ta, options.tolerance / len1.sqrt());
        let on_b = b.accepts(tb, options.tolerance / len2.sqrt());
        match (on_a, on_b) {
            (true, true) => Intersection::new(IntersectionOutcome::Point(pa), "lines meet"),
            (false, _) => Intersection::miss("carriers meet outside the first line's range"),
            (true, false) => Intersection::miss("carriers meet outside the second line's range"),
        }
    };
    Ok(result.with_params(ta, tb))
}

/// Intersect a line, ray or segment with a polygon.
///
/// A line crossing the polygon's plane hits if the crossing is inside the
/// polygon; `ignore_backface` applies as for planes. A line lying in the
/// plane is split at every edge crossing and at its own ends, and the
/// pieces whose midpoints are inside come back as
/// [`IntersectionOutcome::Segments`].
pub fn line_polygon(line: &Line3d, polygon: &Polygon, options: &IntersectOptions) -> Result<Intersection> {
    let cross = line_plane(line, &polygon.plane(), options)?;
    match cross.outcome {
        IntersectionOutcome::Point(p) => {
            if polygon.contains(&p, options.tolerance) {
                Ok(Intersection {
                    log: "line crosses polygon".into(),
                    ..cross
                })
            } else {
                Ok(Intersection {
                    outcome: IntersectionOutcome::None,
                    log: "line crosses plane outside polygon".into(),
                    ..cross
                })
            }
        }
        IntersectionOutcome::Line(_) | IntersectionOutcome::Segment(_) => coplanar(line, polygon, options),
        _ => Ok(cross),
    }
}

fn coplanar(line: &Line3d, polygon: &Polygon, options: &IntersectOptions) -> Result<Intersection> {
    let tol = options.tolerance;
    let slack = tol / line.length();

    let mut params = Vec::new();
    for edge in polygon.edges() {
        let hit = line_line(line, &edge, options)?;
        if let (IntersectionOutcome::Point(_), Some(t)) = (&hit.outcome, hit.meta.ta) {
            params.push(t);
        }
    }
    let ends: &[f64] = match line.kind {
        LineKind::Line => &[],
        LineKind::Ray => &[0.0],
        LineKind::Segment => &[0.0, 1.0],
    };
    params.extend(ends.iter().filter(|&&t| polygon.contains(&line.eval(t), tol)));
    params.sort_by(f64::total_cmp);
    params.dedup_by(|later, earlier| (*later - *earlier).abs() <= slack);

    let pieces: Vec<Line3d> = params
        .windows(2)
        .filter(|w| polygon.contains(&line.eval((w[0] + w[1]) / 2.0), tol))
        .map(|w| Line3d::segment(line.eval(w[0]), line.eval(w[1])))
        .collect();

    if !pieces.is_empty() {
        let log = format!("line runs through polygon in {} pieces", pieces.len());
        return Ok(Intersection::new(IntersectionOutcome::Segments(pieces), log).with_dist(0.0));
    }
    if params.is_empty() {
        return Ok(Intersection::miss("coplanar line misses polygon"));
    }
    let touches = params.iter().map(|&t| line.eval(t)).collect();
    Ok(Intersection::new(IntersectionOutcome::Points(touches), "line touches polygon boundary").with_dist(0.0))
}
