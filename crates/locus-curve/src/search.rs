//! Bracketing search for the nearest and farthest curve points.

use locus_math::vector::{far_index, near_index};
use locus_math::{GeomError, Interval, Point3, Result};
use serde::{Deserialize, Serialize};

use crate::Curve;

/// Parameters for [`Curve::near`] and [`Curve::far`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearFarSettings {
    /// Stop once the bracket is narrower than this, in domain units.
    /// Defaults to a tenth of the curve tolerance.
    pub tolerance: Option<f64>,
    /// Segments sampled per bracket.
    pub resolution: usize,
    /// Half-width of the next bracket, in sample spacings.
    pub buffer: f64,
    /// Maximum number of brackets examined.
    pub max_recursion: usize,
}

impl Default for NearFarSettings {
    fn default() -> Self {
        Self {
            tolerance: None,
            resolution: 8,
            buffer: 1.5,
            max_recursion: 20,
        }
    }
}

impl NearFarSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if let Some(tol) = self.tolerance {
            if tol.is_nan() || tol <= 0.0 {
                return Err(GeomError::degenerate("search tolerance must be positive"));
            }
        }
        if self.resolution < 2 {
            return Err(GeomError::degenerate("search resolution must be at least 2"));
        }
        if !self.buffer.is_finite() || self.buffer < 1.0 {
            return Err(GeomError::degenerate("search buffer must be at least 1"));
        }
        if self.max_recursion == 0 {
            return Err(GeomError::degenerate("max_recursion must be at least 1"));
        }
        Ok(())
    }
}

/// Result of a near/far search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearFar {
    /// The curve point found.
    pub point: Point3,
    /// Its domain value.
    pub t: f64,
    /// Distance from the query point.
    pub distance: f64,
    /// Whether the bracket shrank below the tolerance.
    pub converged: bool,
    /// Number of brackets examined.
    pub iterations: usize,
    /// Which branch the search finished on.
    pub log: String,
}

#[derive(Clone, Copy)]
enum Extreme {
    Near,
    Far,
}

impl Curve {
    /// Curve point closest to `pt`.
    ///
    /// The search is local: it refines around the best of a coarse set of
    /// samples, so a curve that doubles back may yield a local minimum.
    pub fn near(&self, pt: &Point3, settings: &NearFarSettings) -> Result<NearFar> {
        self.bracket(pt, settings, Extreme::Near)
    }

    /// Curve point farthest from `pt`.
    pub fn far(&self, pt: &Point3, settings: &NearFarSettings) -> Result<NearFar> {
        self.bracket(pt, settings, Extreme::Far)
    }

    fn bracket(&self, pt: &Point3, settings: &NearFarSettings, which: Extreme) -> Result<NearFar> {
        settings.validate()?;
        let tolerance = settings.tolerance.unwrap_or(self.tol() / 10.0);
        let divs = settings.resolution;

        let mut domain = self.domain();
        let mut force_start = true;
        let mut force_end = true;
        let mut iterations = 0;
        loop {
            let params = domain.divide(divs, true);
            let samples: Vec<Point3> = params.iter().map(|&t| self.point_at(t)).collect();
            let pick = match which {
                Extreme::Near => near_index(pt, &samples),
                Extreme::Far => far_index(pt, &samples),
            }
            .unwrap_or(0);

            let t = params[pick];
            let half = settings.buffer * domain.delta() / divs as f64;
            let next = Interval::new((t - half).max(domain.a), (t + half).min(domain.b));
            force_start &= next.a == domain.a;
            force_end &= next.b == domain.b;
            domain = next;
            iterations += 1;

            if domain.delta() <= tolerance || iterations >= settings.max_recursion {
                break;
            }
        }

        let converged = domain.delta() <= tolerance;
        let (t, branch) = if force_start {
            (self.domain().a, "collapsed onto domain start")
        } else if force_end {
            (self.domain().b, "collapsed onto domain end")
        } else {
            (domain.mid(), "bracket midpoint")
        };
        let log = if converged {
            format!("{branch} after {iterations} brackets")
        } else {
            format!(
                "{branch}; max_recursion {} reached with bracket width {:e}",
                settings.max_recursion,
                domain.delta()
            )
        };

        let point = self.point_at(t);
        Ok(NearFar {
            point,
            t,
            distance: (point - pt).norm(),
            converged,
            iterations,
            log,
        })
    }
}
