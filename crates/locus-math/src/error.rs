//! Error taxonomy shared by every locus crate.

use thiserror::Error;

/// Errors raised by geometric operations.
///
/// Operations are total-or-failed: an error is returned immediately and no
/// partial result is kept. "No intersection" and similar empty answers are
/// not errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeomError {
    /// Input has zero length, zero area, or is otherwise collapsed.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// A parametric object was evaluated outside its declared domain.
    #[error("{what} evaluated at {value}, outside its domain [{min}, {max}]")]
    Domain {
        /// Which kind of object was evaluated.
        what: &'static str,
        /// The offending parameter value.
        value: f64,
        /// Lower domain bound.
        min: f64,
        /// Upper domain bound.
        max: f64,
    },

    /// The requested operation is not defined for these operand kinds.
    #[error("operation not supported between {a} and {b}")]
    UnsupportedOperation {
        /// Kind of the first operand.
        a: String,
        /// Kind of the second operand.
        b: String,
    },
}

impl GeomError {
    /// Shorthand for a [`GeomError::DegenerateInput`].
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateInput(msg.into())
    }

    /// Shorthand for a [`GeomError::UnsupportedOperation`].
    pub fn unsupported(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            a: a.into(),
            b: b.into(),
        }
    }
}

/// Result type for geometric operations.
pub type Result<T> = std::result::Result<T, GeomError>;
