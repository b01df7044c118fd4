#![warn(missing_docs)]

//! Parametric curves for the locus geometry kernel.
//!
//! A [`Curve`] wraps a function from a parametric domain into space,
//! optionally read through a basis. Differential queries (tangent,
//! curvature, local frame) use finite-difference nudges of one hundredth
//! of the curve tolerance. A polyline surrogate sampled at the tolerance is
//! built lazily and discarded whenever the function, domain, basis or
//! tolerance changes.
//!
//! # Example
//!
//! ```
//! use locus_curve::Curve;
//! use locus_math::Point3;
//!
//! let circle = Curve::circle(Point3::origin(), 5.0).unwrap();
//! let quarter = circle.eval(0.25).unwrap();
//! assert!((quarter.y - 5.0).abs() < 1e-6);
//! ```

mod factory;
mod osculate;
mod search;

pub use osculate::{curvature_from_vecs, CurvatureSample, Osculating};
pub use search::{NearFar, NearFarSettings};

use std::fmt;
use std::sync::{Arc, OnceLock};

use locus_geom::{AnyBasis, Based, Basis, Frame, Plane, Polyline, Transformable};
use locus_math::{normalize, GeomError, Interval, Point3, Result, Transform, Vec3};

/// The function a curve evaluates.
pub type CurveFn = Arc<dyn Fn(f64) -> Point3 + Send + Sync>;

/// Round to 7 decimal places; absorbs float noise at domain bounds.
pub(crate) fn round7(t: f64) -> f64 {
    (t * 1e7).round() / 1e7
}

/// A one-parameter map from a domain into space.
#[derive(Clone)]
pub struct Curve {
    func: CurveFn,
    domain: Interval,
    tol: f64,
    basis: Option<AnyBasis>,
    surrogate: OnceLock<Polyline>,
}

impl fmt::Debug for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Curve")
            .field("domain", &self.domain)
            .field("tol", &self.tol)
            .field("basis", &self.basis)
            .finish_non_exhaustive()
    }
}

fn check_domain(domain: &Interval) -> Result<()> {
    if !(domain.a.is_finite() && domain.b.is_finite()) || domain.delta() <= 0.0 {
        return Err(GeomError::degenerate(format!(
            "parametric domain [{}, {}] must be finite and increasing",
            domain.a, domain.b
        )));
    }
    Ok(())
}

fn check_tolerance(tol: f64) -> Result<()> {
    if tol.is_nan() || tol <= 0.0 {
        return Err(GeomError::degenerate(format!("tolerance must be positive, got {tol}")));
    }
    Ok(())
}

impl Curve {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Curve over `domain`; the tolerance starts at its maximum.
    pub fn new(func: impl Fn(f64) -> Point3 + Send + Sync + 'static, domain: Interval) -> Result<Self> {
        Self::from_shared(Arc::new(func), domain)
    }

    /// Curve over `domain` from an already shared function.
    pub fn from_shared(func: CurveFn, domain: Interval) -> Result<Self> {
        check_domain(&domain)?;
        Ok(Self {
            func,
            domain,
            tol: domain.delta() / 10.0,
            basis: None,
            surrogate: OnceLock::new(),
        })
    }

    /// Builder form of [`Curve::set_tolerance`].
    pub fn with_tolerance(mut self, tol: f64) -> Result<Self> {
        self.set_tolerance(tol)?;
        Ok(self)
    }

    /// Builder form of [`Curve::set_basis`].
    pub fn with_basis(mut self, basis: impl Into<AnyBasis>) -> Self {
        self.set_basis(Some(basis.into()));
        self
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Parametric domain.
    pub fn domain(&self) -> Interval {
        self.domain
    }

    /// Current tolerance: the largest parametric step between samples.
    pub fn tol(&self) -> f64 {
        self.tol
    }

    /// Largest tolerance allowed: a tenth of the domain length.
    pub fn tol_max(&self) -> f64 {
        self.domain.delta() / 10.0
    }

    /// Finite-difference step used for differential queries.
    pub fn tol_nudge(&self) -> f64 {
        self.tol / 100.0
    }

    /// Set the tolerance, clamping it to [`Curve::tol_max`].
    ///
    /// Returns `true` when the requested value was clamped.
    pub fn set_tolerance(&mut self, tol: f64) -> Result<bool> {
        check_tolerance(tol)?;
        let max = self.tol_max();
        let clamped = tol > max;
        self.tol = tol.min(max);
        self.invalidate();
        Ok(clamped)
    }

    /// Replace the domain; the tolerance is re-clamped to the new maximum.
    pub fn set_domain(&mut self, domain: Interval) -> Result<()> {
        check_domain(&domain)?;
        self.domain = domain;
        self.tol = self.tol.min(self.tol_max());
        self.invalidate();
        Ok(())
    }

    /// Replace the function.
    pub fn set_function(&mut self, func: impl Fn(f64) -> Point3 + Send + Sync + 'static) {
        self.func = Arc::new(func);
        self.invalidate();
    }

    /// Replace or remove the basis.
    pub fn set_basis(&mut self, basis: Option<AnyBasis>) {
        self.basis = basis;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.surrogate = OnceLock::new();
    }

    /// The raw function value at `t`, before any basis is applied.
    pub fn func_at(&self, t: f64) -> Point3 {
        (self.func)(t)
    }

    /// World point at `t` without a domain check.
    pub(crate) fn point_at(&self, t: f64) -> Point3 {
        let p = (self.func)(t);
        match &self.basis {
            Some(b) => b.eval(&p.coords),
            None => p,
        }
    }

    // =========================================================================
    // Evaluation
    // =========================================================================

    /// Evaluate at domain value `t`.
    ///
    /// A value just outside the domain is retried after rounding to 7
    /// decimal places before failing with [`GeomError::Domain`].
    pub fn deval(&self, t: f64) -> Result<Point3> {
        Ok(self.point_at(self.in_domain(t)?))
    }

    fn in_domain(&self, t: f64) -> Result<f64> {
        self.domain.admit(t).ok_or(GeomError::Domain {
            what: "curve",
            value: t,
            min: self.domain.a,
            max: self.domain.b,
        })
    }

    /// Evaluate at normalized parameter `t ∈ [0, 1]`.
    pub fn eval(&self, t: f64) -> Result<Point3> {
        self.deval(self.remap(t)?)
    }

    fn remap(&self, t: f64) -> Result<f64> {
        let t = Interval::unit().admit(t).ok_or(GeomError::Domain {
            what: "curve (normalized)",
            value: t,
            min: 0.0,
            max: 1.0,
        })?;
        Ok(if t == 1.0 { self.domain.b } else { self.domain.eval(t) })
    }

    /// The point at `t` and the vectors to its nudged neighbours.
    ///
    /// A neighbour that would fall outside the domain is replaced by the
    /// reverse of the other one.
    fn nudged(&self, t: f64) -> Result<(Point3, Vec3, Vec3)> {
        let t = self.in_domain(t)?;
        let n = self.tol_nudge();
        let pt = self.point_at(t);
        let plus = (t + n <= self.domain.b).then(|| self.point_at(t + n) - pt);
        let minus = (t - n >= self.domain.a).then(|| self.point_at(t - n) - pt);
        match (plus, minus) {
            (Some(p), Some(m)) => Ok((pt, p, m)),
            (Some(p), None) => Ok((pt, p, -p)),
            (None, Some(m)) => Ok((pt, -m, m)),
            (None, None) => Err(GeomError::degenerate("nudge exceeds the curve domain")),
        }
    }

    /// Unit tangent at domain value `t`, from a symmetric difference.
    pub fn tangent(&self, t: f64) -> Result<Vec3> {
        let (_, plus, minus) = self.nudged(t)?;
        normalize(&(plus - minus))
            .map(|d| d.into_inner())
            .map_err(|_| GeomError::degenerate(format!("curve has no tangent at t={t}")))
    }

    /// Plane through the point at `t` with the tangent as normal.
    pub fn deval_pln(&self, t: f64) -> Result<Plane> {
        Plane::new(self.deval(t)?, self.tangent(t)?)
    }

    /// [`Curve::deval_pln`] at a normalized parameter.
    pub fn eval_pln(&self, t: f64) -> Result<Plane> {
        self.deval_pln(self.remap(t)?)
    }

    /// Curvature and osculating circle at domain value `t`.
    ///
    /// Near the domain ends the measurement moves inward by one nudge so
    /// both neighbours exist.
    pub fn curvature(&self, t: f64) -> Result<CurvatureSample> {
        let t = self.in_domain(t)?;
        let n = self.tol_nudge();
        let t = if t - n < self.domain.a {
            self.domain.a + n
        } else if t + n > self.domain.b {
            self.domain.b - n
        } else {
            t
        };
        let (point, plus, minus) = self.nudged(t)?;
        let (curvature, osculating) = curvature_from_vecs(&point, &plus, &minus);
        Ok(CurvatureSample {
            t,
            point,
            curvature,
            osculating,
        })
    }

    /// [`Curve::curvature`] at a normalized parameter.
    pub fn eval_curvature(&self, t: f64) -> Result<CurvatureSample> {
        self.curvature(self.remap(t)?)
    }

    /// Local frame at `t`: X along the tangent, Y towards the center of
    /// curvature, Z the binormal.
    ///
    /// On straight stretches Y is an arbitrary perpendicular.
    pub fn frame_at(&self, t: f64) -> Result<Frame> {
        let tangent = self.tangent(t)?;
        let point = self.deval(t)?;
        let toward = match self.curvature(t)?.osculating {
            Osculating::Circle(c) => c.center() - point,
            Osculating::Straight(_) => Vec3::zeros(),
        };
        let normal = toward - tangent * toward.dot(&tangent);
        if normal.norm() > locus_math::EPSILON {
            return Frame::new(point, tangent, normal);
        }
        // Pick an arbitrary perpendicular
        let arbitrary = if tangent.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
        Frame::new(point, tangent, tangent.cross(&arbitrary).cross(&tangent))
    }

    // =========================================================================
    // Partitioning
    // =========================================================================

    /// `divs + 1` evenly spaced points, or `divs` without the end point.
    pub fn divide(&self, divs: usize, include_last: bool) -> Result<Vec<Point3>> {
        if divs == 0 {
            return Err(GeomError::degenerate("cannot divide a curve into zero parts"));
        }
        Ok(self
            .domain
            .divide(divs, include_last)
            .into_iter()
            .map(|t| self.point_at(t))
            .collect())
    }

    /// Same curve restricted to `domain`.
    ///
    /// The tolerance defaults to this curve's and is clamped to the
    /// sub-domain's maximum.
    pub fn subcurve(&self, domain: Interval, tol: Option<f64>) -> Result<Curve> {
        check_domain(&domain)?;
        let mut sub = Curve {
            func: Arc::clone(&self.func),
            domain,
            tol: domain.delta() / 10.0,
            basis: self.basis.clone(),
            surrogate: OnceLock::new(),
        };
        sub.set_tolerance(tol.unwrap_or(self.tol))?;
        Ok(sub)
    }

    /// `divs` sub-curves over equal sub-domains, each with tolerance
    /// `tol / divs` clamped to its own maximum.
    pub fn subdivide(&self, divs: usize) -> Result<Vec<Curve>> {
        if divs == 0 {
            return Err(GeomError::degenerate("cannot subdivide a curve into zero parts"));
        }
        let tol = self.tol / divs as f64;
        self.domain
            .subintervals(divs)
            .into_iter()
            .map(|d| self.subcurve(d, Some(tol)))
            .collect()
    }

    // =========================================================================
    // Surrogate
    // =========================================================================

    /// Polyline sampled at the tolerance: `ceil(domain / tol)` segments.
    ///
    /// Built on first use and cached until the curve changes.
    pub fn surrogate(&self) -> &Polyline {
        self.surrogate.get_or_init(|| {
            let divs = round7(self.domain.delta() / self.tol).ceil().max(1.0) as usize;
            Polyline::new(self.domain.divide(divs, true).into_iter().map(|t| self.point_at(t)))
        })
    }

    /// Length of the surrogate polyline.
    pub fn appx_length(&self) -> f64 {
        self.surrogate().length()
    }
}

impl Based for Curve {
    fn basis(&self) -> Option<&AnyBasis> {
        self.basis.as_ref()
    }

    fn basis_applied(&self) -> Self {
        let Some(basis) = self.basis.clone() else {
            return self.clone();
        };
        let inner = Arc::clone(&self.func);
        Curve {
            func: Arc::new(move |t| basis.eval(&inner(t).coords)),
            domain: self.domain,
            tol: self.tol,
            basis: None,
            surrogate: OnceLock::new(),
        }
    }

    fn basis_stripped(&self) -> Self {
        Curve {
            func: Arc::clone(&self.func),
            domain: self.domain,
            tol: self.tol,
            basis: None,
            surrogate: OnceLock::new(),
        }
    }
}

impl Transformable for Curve {
    type Output = Curve;

    /// The result is baseless; its function reads the original through its
    /// basis and then applies `xf`.
    fn transformed(&self, xf: &Transform) -> Curve {
        let placed = self.basis_applied();
        let inner = Arc::clone(&placed.func);
        let xf = xf.clone();
        Curve {
            func: Arc::new(move |t| xf.apply_point(&inner(t))),
            domain: self.domain,
            tol: self.tol,
            basis: None,
            surrogate: OnceLock::new(),
        }
    }
}
