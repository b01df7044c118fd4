//! Curvature from finite-difference neighbourhoods.

use locus_geom::{circumcircle, Circle, Line3d};
use locus_math::{Point3, Vec3};
use serde::{Deserialize, Serialize};

/// What best approximates a curve locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Osculating {
    /// The osculating circle.
    Circle(Circle),
    /// The neighbourhood is straight; a ray along the forward direction.
    Straight(Line3d),
}

/// Curvature measured at one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvatureSample {
    /// Parameter the neighbourhood was centered on.
    pub t: f64,
    /// Curve point at `t`.
    pub point: Point3,
    /// Curvature `1 / radius`; zero where the curve is straight.
    pub curvature: f64,
    /// Osculating circle, or the straight fallback.
    pub osculating: Osculating,
}

impl CurvatureSample {
    /// Radius of curvature; infinite where the curve is straight.
    pub fn radius(&self) -> f64 {
        match &self.osculating {
            Osculating::Circle(c) => c.radius,
            Osculating::Straight(_) => f64::INFINITY,
        }
    }
}

/// Curvature at `pt` from the vectors to its forward and backward neighbours.
///
/// Fits the circle through `pt`, `pt + v_pos` and `pt + v_neg`. Collinear
/// neighbours give zero curvature and a ray from `pt` along `v_pos`.
pub fn curvature_from_vecs(pt: &Point3, v_pos: &Vec3, v_neg: &Vec3) -> (f64, Osculating) {
    match circumcircle(pt, &(pt + v_pos), &(pt + v_neg)) {
        Some(circle) => (1.0 / circle.radius, Osculating::Circle(circle)),
        None => (0.0, Osculating::Straight(Line3d::ray(*pt, *v_pos))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_points_on_circle() {
        let r = 4.0;
        let at = |a: f64| Point3::new(r * a.cos(), r * a.sin(), 0.0);
        let pt = at(0.3);
        let (k, osc) = curvature_from_vecs(&pt, &(at(0.35) - pt), &(at(0.25) - pt));
        assert_relative_eq!(k, 0.25, epsilon = 1e-9);
        match osc {
            Osculating::Circle(c) => assert_abs_diff_eq!(c.center(), Point3::origin(), epsilon = 1e-9),
            Osculating::Straight(_) => panic!("expected a circle"),
        }
    }

    #[test]
    fn test_collinear_is_straight() {
        let pt = Point3::new(1.0, 1.0, 1.0);
        let (k, osc) = curvature_from_vecs(&pt, &Vec3::new(1.0, 0.0, 0.0), &Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(k, 0.0);
        match osc {
            Osculating::Straight(ray) => {
                assert_eq!(ray.origin, pt);
                assert_eq!(ray.direction, Vec3::x());
            }
            Osculating::Circle(_) => panic!("expected a straight fallback"),
        }
    }
}
