//! Error types for tensorwise

use crate::dtype::{DType, DTypeSet};
use thiserror::Error;

/// Result type alias using tensorwise's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tensorwise operations
///
/// Every variant is raised during validation, before any output element is
/// written, so a failed call never leaves a partially computed tensor behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Shapes are incompatible under the active broadcasting rule
    #[error("Shape mismatch: {lhs:?} vs {rhs:?}")]
    ShapeMismatch {
        /// Left-hand side shape
        lhs: Vec<usize>,
        /// Right-hand side shape
        rhs: Vec<usize>,
    },

    /// Axis places the alignment window outside the larger shape
    #[error("Invalid axis {axis} for shape of rank {rank}")]
    InvalidAxis {
        /// The requested axis
        axis: i64,
        /// Rank of the shape the axis indexes into
        rank: usize,
    },

    /// Element type not accepted where it is used
    ///
    /// Raised both for a dtype outside a slot's allowed set and for inputs
    /// that disagree on a dtype they must share.
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Accepted dtype(s)
        expected: DTypeSet,
        /// Actual dtype
        got: DType,
    },

    /// Element type not accepted by an operation
    #[error("Unsupported dtype {dtype} for operation '{op}'")]
    UnsupportedDType {
        /// The unsupported dtype
        dtype: DType,
        /// The operation name
        op: &'static str,
    },

    /// Integer division by zero
    #[error("Division by zero in integer operation '{op}'")]
    DivisionByZero {
        /// The operation name
        op: &'static str,
    },

    /// Wrong number of inputs for an operation
    #[error("Operation '{op}' expects {expected} input(s), got {got}")]
    UnsupportedArity {
        /// The operation name
        op: String,
        /// Human-readable arity, e.g. "2" or "at least 1"
        expected: String,
        /// Number of inputs supplied
        got: usize,
    },

    /// No kernel declaration exists for the operator name
    #[error("Unknown operator '{name}'")]
    UnknownOperator {
        /// The requested operator name
        name: String,
    },

    /// Operator is declared in the kernel table but has no executable kernel
    #[error("Operator '{name}' is declared but not executable")]
    NotImplemented {
        /// The requested operator name
        name: String,
    },

    /// Invalid argument provided to a constructor or operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Attribute present but malformed
    #[error("Invalid attribute '{name}': {reason}")]
    InvalidAttribute {
        /// Attribute name
        name: String,
        /// Reason for invalidity
        reason: String,
    },
}

impl Error {
    /// Create a shape mismatch error from two shapes
    pub fn shape_mismatch(lhs: &[usize], rhs: &[usize]) -> Self {
        Self::ShapeMismatch {
            lhs: lhs.to_vec(),
            rhs: rhs.to_vec(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(expected: impl Into<DTypeSet>, got: DType) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            got,
        }
    }

    /// Create an arity error
    pub fn arity(op: impl Into<String>, expected: impl Into<String>, got: usize) -> Self {
        Self::UnsupportedArity {
            op: op.into(),
            expected: expected.into(),
            got,
        }
    }

    /// Create an error for a shape whose element count overflows `usize`
    pub fn numel_overflow(shape: &[usize]) -> Self {
        Self::InvalidArgument {
            arg: "shape",
            reason: format!("element count of {shape:?} overflows usize"),
        }
    }

    /// Create an invalid attribute error
    pub fn invalid_attribute(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
