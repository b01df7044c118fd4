//! Local coordinate systems and entities placed on them.

use locus_math::{Point3, Vec3};
use serde::{Deserialize, Serialize};

use crate::{CylFrame, Frame, Plane};

/// Anything that maps local coordinates to world space and back.
pub trait Basis {
    /// World point at local coordinates `local`.
    fn eval(&self, local: &Vec3) -> Point3;

    /// Local coordinates of world point `world`; inverse of [`Basis::eval`].
    fn deval(&self, world: &Point3) -> Vec3;
}

/// The closed set of bases an entity can be placed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnyBasis {
    /// Orthonormal Cartesian frame.
    Frame(Frame),
    /// Cylindrical `(radius, radians, z)` system.
    Cylindrical(CylFrame),
    /// A plane's `(u, v, offset)` system.
    Plane(Plane),
}

impl Basis for AnyBasis {
    fn eval(&self, local: &Vec3) -> Point3 {
        match self {
            AnyBasis::Frame(f) => Basis::eval(f, local),
            AnyBasis::Cylindrical(c) => Basis::eval(c, local),
            AnyBasis::Plane(p) => Basis::eval(p, local),
        }
    }

    fn deval(&self, world: &Point3) -> Vec3 {
        match self {
            AnyBasis::Frame(f) => Basis::deval(f, world),
            AnyBasis::Cylindrical(c) => Basis::deval(c, world),
            AnyBasis::Plane(p) => Basis::deval(p, world),
        }
    }
}

impl From<Frame> for AnyBasis {
    fn from(f: Frame) -> Self {
        AnyBasis::Frame(f)
    }
}

impl From<CylFrame> for AnyBasis {
    fn from(c: CylFrame) -> Self {
        AnyBasis::Cylindrical(c)
    }
}

impl From<Plane> for AnyBasis {
    fn from(p: Plane) -> Self {
        AnyBasis::Plane(p)
    }
}

/// An entity whose stored coordinates may be relative to a basis.
///
/// Stored coordinates never change when the basis does; only the world
/// position read back through the basis moves. With no basis, local and
/// world coordinates coincide.
pub trait Based: Sized {
    /// The basis, if any.
    fn basis(&self) -> Option<&AnyBasis>;

    /// Copy expressed directly in world coordinates, with no basis.
    fn basis_applied(&self) -> Self;

    /// Copy keeping the stored local coordinates but dropping the basis.
    fn basis_stripped(&self) -> Self;

    /// Whether this entity carries no basis.
    fn is_baseless(&self) -> bool {
        self.basis().is_none()
    }
}

/// Map a local coordinate through an optional basis.
pub(crate) fn place(basis: Option<&AnyBasis>, local: &Vec3) -> Point3 {
    match basis {
        Some(b) => b.eval(local),
        None => Point3::from(*local),
    }
}

/// A point stored in local coordinates of an optional basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasedPoint {
    /// Coordinates relative to `basis` (world coordinates when baseless).
    pub local: Vec3,
    /// Basis the coordinates are expressed in.
    pub basis: Option<AnyBasis>,
}

impl BasedPoint {
    /// A baseless point at world position `p`.
    pub fn world(p: Point3) -> Self {
        Self {
            local: p.coords,
            basis: None,
        }
    }

    /// A point at `local` on `basis`.
    pub fn on(basis: impl Into<AnyBasis>, local: Vec3) -> Self {
        Self {
            local,
            basis: Some(basis.into()),
        }
    }

    /// World position, read through the basis.
    pub fn position(&self) -> Point3 {
        place(self.basis.as_ref(), &self.local)
    }
}

impl Based for BasedPoint {
    fn basis(&self) -> Option<&AnyBasis> {
        self.basis.as_ref()
    }

    fn basis_applied(&self) -> Self {
        Self::world(self.position())
    }

    fn basis_stripped(&self) -> Self {
        Self {
            local: self.local,
            basis: None,
        }
    }
}
