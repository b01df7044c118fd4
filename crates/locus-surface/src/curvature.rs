//! Principal curvatures from a discrete neighbourhood.
//!
//! Around the evaluation point we sample a fan of eight neighbours at the
//! nudge distance and follow Taubin's construction: every neighbour gives a
//! normal curvature along its projected direction, and their area-weighted
//! outer products form a symmetric tensor whose tangential eigenvectors are
//! the principal directions. A Householder reflection takes the normal onto
//! the Z axis so the tangential block is 2×2, which a single Givens rotation
//! diagonalizes. The principal curvatures are then fitted to the sampled
//! normal curvatures with Euler's formula by weighted least squares.

use locus_math::{normalize, GeomError, Mat3, Point3, Result, Vec3};
use serde::{Deserialize, Serialize};

use crate::Surface;

/// Relative spread `|k1 - k2|` below which a point counts as umbilic.
///
/// The spread is compared against `max(|k1|, |k2|, 1)`.
pub const UMBILIC_TOLERANCE: f64 = 1e-5;

/// Fan offsets in `(u, v)` nudge units, in angular order.
const FAN: [(f64, f64); 8] = [
    (1.0, 0.0),
    (1.0, 1.0),
    (0.0, 1.0),
    (-1.0, 1.0),
    (-1.0, 0.0),
    (-1.0, -1.0),
    (0.0, -1.0),
    (1.0, -1.0),
];

/// Differential geometry of a surface at one point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceCurvature {
    /// The surface point.
    pub point: Point3,
    /// Unit normal, area-weighted over the sampling fan. Curvature signs
    /// follow it: surfaces bending away from the normal are negative.
    pub normal: Vec3,
    /// Larger principal curvature.
    pub k1: f64,
    /// Smaller principal curvature.
    pub k2: f64,
    /// Gaussian curvature `k1 * k2`.
    pub gaussian: f64,
    /// Mean curvature `(k1 + k2) / 2`.
    pub mean: f64,
    /// Principal directions for `k1` and `k2`; `None` at an umbilic point,
    /// where every direction is principal.
    pub directions: Option<(Vec3, Vec3)>,
}

impl SurfaceCurvature {
    /// Whether the point is umbilic.
    pub fn is_umbilic(&self) -> bool {
        self.directions.is_none()
    }
}

impl Surface {
    /// Principal curvatures and directions at domain values `(u, v)`.
    ///
    /// Within one nudge of a domain edge the sampling fan is centred one
    /// nudge inward so it stays inside the domain; the reported `point` is
    /// still the surface at `(u, v)`.
    pub fn curvature_at(&self, u: f64, v: f64) -> Result<SurfaceCurvature> {
        let (u, v) = self.admit(u, v)?;
        let (nu, nv) = (self.tol_u_nudge(), self.tol_v_nudge());
        let cu = u.clamp(self.dom_u.a + nu, self.dom_u.b - nu);
        let cv = v.clamp(self.dom_v.a + nv, self.dom_v.b - nv);

        let center = self.func_at(cu, cv);
        let deltas: Vec<Vec3> = FAN
            .iter()
            .map(|(du, dv)| self.func_at(cu + du * nu, cv + dv * nv) - center)
            .collect();

        // Face normals of the fan; their lengths are twice the triangle areas
        let faces: Vec<Vec3> = (0..8).map(|j| deltas[j].cross(&deltas[(j + 1) % 8])).collect();
        let summed: Vec3 = faces.iter().sum();
        let normal = normalize(&summed)
            .map_err(|_| GeomError::degenerate(format!("surface has no normal at ({u}, {v})")))?
            .into_inner();

        // Per-neighbour normal curvature, projected direction and weight
        let mut samples = Vec::with_capacity(8);
        for (j, d) in deltas.iter().enumerate() {
            let len2 = d.norm_squared();
            let along = d - normal * normal.dot(d);
            let Ok(dir) = normalize(&along) else { continue };
            if len2 == 0.0 {
                continue;
            }
            let kappa = 2.0 * normal.dot(d) / len2;
            let weight = faces[(j + 7) % 8].norm() + faces[j].norm();
            samples.push((kappa, dir.into_inner(), weight));
        }
        let total: f64 = samples.iter().map(|s| s.2).sum();
        if samples.len() < 3 || total == 0.0 {
            return Err(GeomError::degenerate(format!(
                "surface neighbourhood collapses at ({u}, {v})"
            )));
        }
        for s in &mut samples {
            s.2 /= total;
        }

        let tensor = samples
            .iter()
            .fold(Mat3::zeros(), |m, (k, t, w)| m + (t * t.transpose()) * (w * k));

        // Householder reflection taking the normal onto ±Z
        let minus = normal - Vec3::z();
        let plus = normal + Vec3::z();
        let w = if minus.norm() > plus.norm() { minus } else { plus };
        let house = Mat3::identity() - (w * w.transpose()) * (2.0 / w.norm_squared());
        let reduced = house * tensor * house;
        let (e1, e2) = (house.column(0).into_owned(), house.column(1).into_owned());

        // Givens rotation diagonalizing the tangential block
        let (m11, m12, m22) = (reduced[(0, 0)], reduced[(0, 1)], reduced[(1, 1)]);
        let theta = 0.5 * (2.0 * m12).atan2(m22 - m11);
        let (s, c) = theta.sin_cos();
        let mut d1 = e1 * c - e2 * s;
        let mut d2 = e1 * s + e2 * c;

        let (mut k1, mut k2) = euler_fit(&samples, &d1, &d2)
            .unwrap_or_else(|| taubin_eigen(&reduced, c, s));
        if k2 > k1 {
            std::mem::swap(&mut k1, &mut k2);
            std::mem::swap(&mut d1, &mut d2);
        }

        let umbilic = (k1 - k2).abs() <= UMBILIC_TOLERANCE * k1.abs().max(k2.abs()).max(1.0);
        Ok(SurfaceCurvature {
            point: self.func_at(u, v),
            normal,
            k1,
            k2,
            gaussian: k1 * k2,
            mean: (k1 + k2) / 2.0,
            directions: (!umbilic).then_some((d1, d2)),
        })
    }

    /// [`Surface::curvature_at`] at normalized parameters.
    pub fn eval_curvature(&self, u: f64, v: f64) -> Result<SurfaceCurvature> {
        let (u, v) = self.remap(u, v)?;
        self.curvature_at(u, v)
    }
}

/// Weighted least-squares fit of `κ = k1·cos²φ + k2·sin²φ`, where `φ` is
/// the angle of each sample direction from `d1`.
fn euler_fit(samples: &[(f64, Vec3, f64)], d1: &Vec3, d2: &Vec3) -> Option<(f64, f64)> {
    let (mut s11, mut s12, mut s22, mut r1, mut r2) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (k, t, w) in samples {
        let c2 = t.dot(d1).powi(2);
        let s2 = t.dot(d2).powi(2);
        s11 += w * c2 * c2;
        s12 += w * c2 * s2;
        s22 += w * s2 * s2;
        r1 += w * k * c2;
        r2 += w * k * s2;
    }
    let det = s11 * s22 - s12 * s12;
    if det.abs() < 1e-12 {
        return None;
    }
    Some(((r1 * s22 - r2 * s12) / det, (s11 * r2 - s12 * r1) / det))
}

/// Principal curvatures from the tensor eigenvalues, `k1 = 3m1 - m2`.
fn taubin_eigen(reduced: &Mat3, c: f64, s: f64) -> (f64, f64) {
    let (m11, m12, m22) = (reduced[(0, 0)], reduced[(0, 1)], reduced[(1, 1)]);
    let l1 = c * c * m11 - 2.0 * c * s * m12 + s * s * m22;
    let l2 = s * s * m11 + 2.0 * c * s * m12 + c * c * m22;
    (3.0 * l1 - l2, 3.0 * l2 - l1)
}
