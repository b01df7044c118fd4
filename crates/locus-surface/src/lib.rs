#![warn(missing_docs)]

//! Parametric surfaces for the locus geometry kernel.
//!
//! A [`Surface`] maps a rectangular `(u, v)` domain into space, with an
//! independent tolerance per axis. Differential queries nudge by one
//! hundredth of the tolerance along each axis. A quad or triangle [`Mesh`]
//! surrogate sampled at the tolerances is built lazily and dropped whenever
//! the function, domains or tolerances change.

mod curvature;
mod mesh;

pub use curvature::{SurfaceCurvature, UMBILIC_TOLERANCE};
pub use mesh::Mesh;

use std::fmt;
use std::sync::{Arc, OnceLock};

use locus_curve::{curvature_from_vecs, Curve, Osculating};
use locus_geom::{Plane, Polyline};
use locus_math::{GeomError, Interval, Point3, Result, Vec3};
use serde::{Deserialize, Serialize};

/// The function a surface evaluates.
pub type SurfaceFn = Arc<dyn Fn(f64, f64) -> Point3 + Send + Sync>;

/// Which parameter an isocurve holds fixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum IsoParam {
    /// Hold `u` at the given value; the curve runs along `v`.
    U(f64),
    /// Hold `v` at the given value; the curve runs along `u`.
    V(f64),
}

/// Curvature of the two isoparametric curves through a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsoCurvature {
    /// Surface point.
    pub point: Point3,
    /// Curvature of the curve along `u`.
    pub k_u: f64,
    /// Curvature of the curve along `v`.
    pub k_v: f64,
    /// Osculating circle along `u`.
    pub osculating_u: Osculating,
    /// Osculating circle along `v`.
    pub osculating_v: Osculating,
}

impl IsoCurvature {
    /// `k_u * k_v`; equals the Gaussian curvature only where the
    /// isoparametric directions are principal.
    pub fn product(&self) -> f64 {
        self.k_u * self.k_v
    }
}

/// Neighbour vectors around a surface point: `(pt, u+, u-, v+, v-)`.
pub(crate) type Nudges = (Point3, Vec3, Vec3, Vec3, Vec3);

/// A two-parameter map from a rectangular domain into space.
#[derive(Clone)]
pub struct Surface {
    func: SurfaceFn,
    dom_u: Interval,
    dom_v: Interval,
    tol_u: f64,
    tol_v: f64,
    surrogate: OnceLock<Mesh>,
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("dom_u", &self.dom_u)
            .field("dom_v", &self.dom_v)
            .field("tol_u", &self.tol_u)
            .field("tol_v", &self.tol_v)
            .finish_non_exhaustive()
    }
}

fn check_domain(axis: &str, domain: &Interval) -> Result<()> {
    if !(domain.a.is_finite() && domain.b.is_finite()) || domain.delta() <= 0.0 {
        return Err(GeomError::degenerate(format!(
            "{axis} domain [{}, {}] must be finite and increasing",
            domain.a, domain.b
        )));
    }
    Ok(())
}

/// Segments needed to step across `delta` at `tol`, ignoring float noise.
fn divisions(delta: f64, tol: f64) -> usize {
    ((delta / tol * 1e7).round() / 1e7).ceil().max(1.0) as usize
}

fn clamp_tolerance(axis: &str, tol: f64, max: f64) -> Result<(f64, bool)> {
    if tol.is_nan() || tol <= 0.0 {
        return Err(GeomError::degenerate(format!("{axis} tolerance must be positive, got {tol}")));
    }
    Ok((tol.min(max), tol > max))
}

impl Surface {
    /// Surface over `dom_u × dom_v`; both tolerances start at their maximum.
    pub fn new(
        func: impl Fn(f64, f64) -> Point3 + Send + Sync + 'static,
        dom_u: Interval,
        dom_v: Interval,
    ) -> Result<Self> {
        check_domain("u", &dom_u)?;
        check_domain("v", &dom_v)?;
        Ok(Self {
            func: Arc::new(func),
            dom_u,
            dom_v,
            tol_u: dom_u.delta() / 10.0,
            tol_v: dom_v.delta() / 10.0,
            surrogate: OnceLock::new(),
        })
    }

    /// Builder form of [`Surface::set_tol_u`] and [`Surface::set_tol_v`].
    pub fn with_tolerances(mut self, tol_u: f64, tol_v: f64) -> Result<Self> {
        self.set_tol_u(tol_u)?;
        self.set_tol_v(tol_v)?;
        Ok(self)
    }

    /// The `u` domain.
    pub fn domain_u(&self) -> Interval {
        self.dom_u
    }

    /// The `v` domain.
    pub fn domain_v(&self) -> Interval {
        self.dom_v
    }

    /// Tolerance along `u`.
    pub fn tol_u(&self) -> f64 {
        self.tol_u
    }

    /// Tolerance along `v`.
    pub fn tol_v(&self) -> f64 {
        self.tol_v
    }

    /// Largest tolerances allowed: a tenth of each domain.
    pub fn tol_max(&self) -> (f64, f64) {
        (self.dom_u.delta() / 10.0, self.dom_v.delta() / 10.0)
    }

    /// Finite-difference step along `u`.
    pub fn tol_u_nudge(&self) -> f64 {
        self.tol_u / 100.0
    }

    /// Finite-difference step along `v`.
    pub fn tol_v_nudge(&self) -> f64 {
        self.tol_v / 100.0
    }

    /// Set the `u` tolerance, clamped to its maximum. Returns `true` when clamped.
    pub fn set_tol_u(&mut self, tol: f64) -> Result<bool> {
        let (tol, clamped) = clamp_tolerance("u", tol, self.tol_max().0)?;
        self.tol_u = tol;
        self.invalidate();
        Ok(clamped)
    }

    /// Set the `v` tolerance, clamped to its maximum. Returns `true` when clamped.
    pub fn set_tol_v(&mut self, tol: f64) -> Result<bool> {
        let (tol, clamped) = clamp_tolerance("v", tol, self.tol_max().1)?;
        self.tol_v = tol;
        self.invalidate();
        Ok(clamped)
    }

    /// Replace both domains; tolerances are re-clamped.
    pub fn set_domains(&mut self, dom_u: Interval, dom_v: Interval) -> Result<()> {
        check_domain("u", &dom_u)?;
        check_domain("v", &dom_v)?;
        self.dom_u = dom_u;
        self.dom_v = dom_v;
        let (max_u, max_v) = self.tol_max();
        self.tol_u = self.tol_u.min(max_u);
        self.tol_v = self.tol_v.min(max_v);
        self.invalidate();
        Ok(())
    }

    /// Replace the function.
    pub fn set_function(&mut self, func: impl Fn(f64, f64) -> Point3 + Send + Sync + 'static) {
        self.func = Arc::new(func);
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.surrogate = OnceLock::new();
    }

    /// The raw function value without a domain check.
    pub fn func_at(&self, u: f64, v: f64) -> Point3 {
        (self.func)(u, v)
    }

    pub(crate) fn admit(&self, u: f64, v: f64) -> Result<(f64, f64)> {
        let u = self.dom_u.admit(u).ok_or(GeomError::Domain {
            what: "surface u",
            value: u,
            min: self.dom_u.a,
            max: self.dom_u.b,
        })?;
        let v = self.dom_v.admit(v).ok_or(GeomError::Domain {
            what: "surface v",
            value: v,
            min: self.dom_v.a,
            max: self.dom_v.b,
        })?;
        Ok((u, v))
    }

    fn remap(&self, u: f64, v: f64) -> Result<(f64, f64)> {
        let unit = Interval::unit();
        let u = unit.admit(u).ok_or(GeomError::Domain {
            what: "surface u (normalized)",
            value: u,
            min: 0.0,
            max: 1.0,
        })?;
        let v = unit.admit(v).ok_or(GeomError::Domain {
            what: "surface v (normalized)",
            value: v,
            min: 0.0,
            max: 1.0,
        })?;
        let u = if u == 1.0 { self.dom_u.b } else { self.dom_u.eval(u) };
        let v = if v == 1.0 { self.dom_v.b } else { self.dom_v.eval(v) };
        Ok((u, v))
    }

    /// Evaluate at domain values `(u, v)`.
    pub fn deval(&self, u: f64, v: f64) -> Result<Point3> {
        let (u, v) = self.admit(u, v)?;
        Ok(self.func_at(u, v))
    }

    /// Evaluate at normalized parameters in `[0, 1]²`.
    pub fn eval(&self, u: f64, v: f64) -> Result<Point3> {
        let (u, v) = self.remap(u, v)?;
        Ok(self.func_at(u, v))
    }

    /// The point and its four axis neighbours. A neighbour past the domain
    /// edge is replaced by the reverse of the opposite one.
    pub(crate) fn nudged(&self, u: f64, v: f64) -> Result<Nudges> {
        let (u, v) = self.admit(u, v)?;
        let (nu, nv) = (self.tol_u_nudge(), self.tol_v_nudge());
        let pt = self.func_at(u, v);
        let pair = |fwd: Option<Vec3>, back: Option<Vec3>| match (fwd, back) {
            (Some(f), Some(b)) => (f, b),
            (Some(f), None) => (f, -f),
            (None, Some(b)) => (-b, b),
            (None, None) => (Vec3::zeros(), Vec3::zeros()),
        };
        let (u_pos, u_neg) = pair(
            (u + nu <= self.dom_u.b).then(|| self.func_at(u + nu, v) - pt),
            (u - nu >= self.dom_u.a).then(|| self.func_at(u - nu, v) - pt),
        );
        let (v_pos, v_neg) = pair(
            (v + nv <= self.dom_v.b).then(|| self.func_at(u, v + nv) - pt),
            (v - nv >= self.dom_v.a).then(|| self.func_at(u, v - nv) - pt),
        );
        Ok((pt, u_pos, u_neg, v_pos, v_neg))
    }

    /// Tangent plane at `(u, v)`; the normal is `∂u × ∂v` from central
    /// differences.
    pub fn deval_pln(&self, u: f64, v: f64) -> Result<Plane> {
        let (pt, u_pos, u_neg, v_pos, v_neg) = self.nudged(u, v)?;
        Plane::new(pt, (u_pos - u_neg).cross(&(v_pos - v_neg)))
    }

    /// [`Surface::deval_pln`] at normalized parameters.
    pub fn eval_pln(&self, u: f64, v: f64) -> Result<Plane> {
        let (u, v) = self.remap(u, v)?;
        self.deval_pln(u, v)
    }

    /// Curvature of the `u` and `v` isoparametric curves through `(u, v)`.
    ///
    /// At a domain edge the neighbour vectors are taken one nudge inward
    /// while the point itself stays on the edge.
    pub fn isocurvature(&self, u: f64, v: f64) -> Result<IsoCurvature> {
        let (u, v) = self.admit(u, v)?;
        let (nu, nv) = (self.tol_u_nudge(), self.tol_v_nudge());
        let (point, mut u_pos, mut u_neg, mut v_pos, mut v_neg) = self.nudged(u, v)?;

        let inner_u = u.clamp(self.dom_u.a + nu, self.dom_u.b - nu);
        if inner_u != u {
            let (_, p, n, _, _) = self.nudged(inner_u, v)?;
            (u_pos, u_neg) = (p, n);
        }
        let inner_v = v.clamp(self.dom_v.a + nv, self.dom_v.b - nv);
        if inner_v != v {
            let (_, _, _, p, n) = self.nudged(u, inner_v)?;
            (v_pos, v_neg) = (p, n);
        }

        let (k_u, osculating_u) = curvature_from_vecs(&point, &u_pos, &u_neg);
        let (k_v, osculating_v) = curvature_from_vecs(&point, &v_pos, &v_neg);
        Ok(IsoCurvature {
            point,
            k_u,
            k_v,
            osculating_u,
            osculating_v,
        })
    }

    /// Mesh sampled over the domains.
    ///
    /// `divs` overrides the `(u, v)` division counts, which otherwise follow
    /// the tolerances. `do_close` adds a row of faces joining the last `u`
    /// column back to the first; `tris` splits each quad in two.
    pub fn to_mesh(&self, do_close: bool, tris: bool, divs: Option<(usize, usize)>) -> Mesh {
        let (divs_u, divs_v) = divs.unwrap_or_else(|| {
            (
                divisions(self.dom_u.delta(), self.tol_u),
                divisions(self.dom_v.delta(), self.tol_v),
            )
        });
        let (divs_u, divs_v) = (divs_u.max(1), divs_v.max(1));
        let u_vals = self.dom_u.divide(divs_u, true);
        let v_vals = self.dom_v.divide(divs_v, true);
        let res_u = u_vals.len();

        let mut mesh = Mesh::new(
            v_vals
                .iter()
                .flat_map(|&v| u_vals.iter().map(move |&u| (u, v)))
                .map(|(u, v)| self.func_at(u, v))
                .collect(),
        );

        let mut push = |quad: [usize; 4]| {
            if tris {
                mesh.faces.push(vec![quad[0], quad[1], quad[2]]);
                mesh.faces.push(vec![quad[0], quad[2], quad[3]]);
            } else {
                mesh.faces.push(quad.to_vec());
            }
        };
        for row in (0..divs_v).map(|j| j * res_u) {
            for i in 0..res_u - 1 {
                push([row + i, row + i + 1, row + i + 1 + res_u, row + i + res_u]);
            }
            if do_close {
                push([row + res_u - 1, row, row + res_u, row + 2 * res_u - 1]);
            }
        }
        mesh
    }

    /// Mesh surrogate at the current tolerances, cached until the surface changes.
    pub fn surrogate(&self) -> &Mesh {
        self.surrogate.get_or_init(|| self.to_mesh(false, false, None))
    }

    /// Curve holding one parameter fixed, carrying that axis's tolerance.
    pub fn isocurve(&self, iso: IsoParam) -> Result<Curve> {
        let func = Arc::clone(&self.func);
        match iso {
            IsoParam::U(u) => {
                let (u, _) = self.admit(u, self.dom_v.a)?;
                Curve::new(move |t| func(u, t), self.dom_v)?.with_tolerance(self.tol_v)
            }
            IsoParam::V(v) => {
                let (_, v) = self.admit(self.dom_u.a, v)?;
                Curve::new(move |t| func(t, v), self.dom_u)?.with_tolerance(self.tol_u)
            }
        }
    }

    /// Polyline sampled along an isocurve.
    ///
    /// `dom` restricts the running parameter (default: its whole domain);
    /// `res` sets the segment count (default: domain over tolerance).
    pub fn isopolyline(&self, iso: IsoParam, dom: Option<Interval>, res: Option<usize>) -> Result<Polyline> {
        let (run, tol) = match iso {
            IsoParam::U(_) => (self.dom_v, self.tol_v),
            IsoParam::V(_) => (self.dom_u, self.tol_u),
        };
        let dom = dom.unwrap_or(run);
        let res = res.unwrap_or_else(|| (dom.delta() / tol).floor().max(1.0) as usize).max(1);
        dom.divide(res, true)
            .into_iter()
            .map(|t| match iso {
                IsoParam::U(u) => self.deval(u, t),
                IsoParam::V(v) => self.deval(t, v),
            })
            .collect::<Result<Vec<_>>>()
            .map(Polyline::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::{PI, TAU};

    fn cylinder(r: f64) -> Surface {
        Surface::new(
            move |u, v| Point3::new(r * u.cos(), r * u.sin(), v),
            Interval::twopi(),
            Interval::new(0.0, 4.0),
        )
        .unwrap()
    }

    fn flat() -> Surface {
        Surface::new(|u, v| Point3::new(u, v, 0.0), Interval::unit(), Interval::new(0.0, 2.0)).unwrap()
    }

    #[test]
    fn test_tolerances_clamped_per_axis() {
        let mut s = flat();
        assert_eq!(s.tol_max(), (0.1, 0.2));
        assert!(s.set_tol_u(1.0).unwrap());
        assert_eq!(s.tol_u(), 0.1);
        assert!(!s.set_tol_v(0.05).unwrap());
        assert_eq!(s.tol_v(), 0.05);
        assert!(s.set_tol_u(-1.0).is_err());
    }

    #[test]
    fn test_domain_checked_per_axis() {
        let s = flat();
        assert!(s.deval(1.0, 2.0).is_ok());
        assert!(matches!(s.deval(1.5, 1.0), Err(GeomError::Domain { what: "surface u", .. })));
        assert!(matches!(s.deval(0.5, -0.5), Err(GeomError::Domain { what: "surface v", .. })));
        assert_eq!(s.eval(1.0, 1.0).unwrap(), Point3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_tangent_plane_of_cylinder() {
        let s = cylinder(2.0);
        let pln = s.deval_pln(0.0, 1.0).unwrap();
        assert_abs_diff_eq!(pln.origin, Point3::new(2.0, 0.0, 1.0), epsilon = 1e-12);
        assert_abs_diff_eq!(pln.normal(), Vec3::x(), epsilon = 1e-9);
    }

    #[test]
    fn test_isocurvature_of_cylinder() {
        let s = cylinder(2.0);
        let k = s.isocurvature(1.0, 2.0).unwrap();
        assert_relative_eq!(k.k_u, 0.5, epsilon = 1e-6);
        assert_eq!(k.k_v, 0.0);
        assert_eq!(k.product(), 0.0);
        // edge values still see the bend
        let edge = s.isocurvature(0.0, 0.0).unwrap();
        assert_relative_eq!(edge.k_u, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_to_mesh_counts() {
        let s = flat();
        let quads = s.to_mesh(false, false, Some((4, 2)));
        assert_eq!(quads.num_vertices(), 15);
        assert_eq!(quads.num_faces(), 8);
        assert_relative_eq!(quads.area(), 2.0, epsilon = 1e-12);

        let tris = s.to_mesh(false, true, Some((4, 2)));
        assert_eq!(tris.num_faces(), 16);
        assert!(tris.faces.iter().all(|f| f.len() == 3));

        let closed = s.to_mesh(true, false, Some((4, 2)));
        assert_eq!(closed.num_faces(), 10);
        assert!(closed.faces.iter().flatten().all(|&i| i < closed.num_vertices()));
    }

    #[test]
    fn test_surrogate_follows_tolerance() {
        let mut s = flat();
        assert_eq!(s.surrogate().num_faces(), 100);
        s.set_tol_u(0.05).unwrap();
        assert_eq!(s.surrogate().num_faces(), 200);
        let n = s.surrogate().face_normal(0).unwrap();
        assert_abs_diff_eq!(n, Vec3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_isocurves() {
        let s = cylinder(1.0);
        let around = s.isocurve(IsoParam::V(3.0)).unwrap();
        assert_eq!(around.domain(), Interval::twopi());
        assert_abs_diff_eq!(around.deval(PI).unwrap(), Point3::new(-1.0, 0.0, 3.0), epsilon = 1e-12);
        let up = s.isocurve(IsoParam::U(0.0)).unwrap();
        assert_eq!(up.deval(4.0).unwrap(), Point3::new(1.0, 0.0, 4.0));
        assert!(s.isocurve(IsoParam::U(7.0)).is_err());

        let pl = s.isopolyline(IsoParam::V(0.0), None, Some(64)).unwrap();
        assert_eq!(pl.len(), 65);
        assert_relative_eq!(pl.length(), TAU, epsilon = 1e-2);
    }
}
