//! Elementwise tensor operations
//!
//! # Design
//!
//! Operations are exposed three ways, all funnelling into [`apply`]:
//!
//! ```text
//! execute("Add", inputs, attrs)        name + attributes, checked against the registry
//! Engine::add(&a, &b)                  ElementwiseOps trait with an explicit EngineConfig
//! ops::add(&a, &b)                     free functions using the default configuration
//!        │
//!        └── elementwise(op, inputs, BroadcastConfig, EngineConfig)
//!              ├── broadcast::resolve    output shape + per-input alignment
//!              └── apply                 dtype dispatch, BroadcastIter per input, kernel
//! ```
//!
//! # Semantics
//!
//! - `add`, `sub`, `mul`, `div` take exactly two inputs, `reciprocal` one,
//!   and `sum` one or more (folded left to right with addition).
//! - All inputs must share one dtype. `bool` tensors are rejected with
//!   `UnsupportedDType`.
//! - Integer arithmetic wraps; integer division by zero fails with
//!   `DivisionByZero` before any output is computed. Floats follow IEEE-754.

pub mod attributes;
mod apply;
mod dispatch;
mod execute;
mod kernels;

pub use apply::{apply, elementwise};
pub use attributes::{AttrValue, Attributes};
pub use execute::{execute, execute_with};

use crate::broadcast::BroadcastConfig;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::tensor::Tensor;
use std::fmt;

/// Elementwise operation kinds
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementwiseOp {
    /// a + b
    Add,
    /// a - b
    Sub,
    /// a * b
    Mul,
    /// a / b
    Div,
    /// 1 / a
    Reciprocal,
    /// a0 + a1 + ... + an
    Sum,
}

impl ElementwiseOp {
    /// Every operation kind
    pub const ALL: [ElementwiseOp; 6] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Reciprocal,
        Self::Sum,
    ];

    /// Operator name as published in the kernel table
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Sub => "Sub",
            Self::Mul => "Mul",
            Self::Div => "Div",
            Self::Reciprocal => "Reciprocal",
            Self::Sum => "Sum",
        }
    }

    /// Look up an operation by its operator name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Number of inputs the operation accepts
    pub const fn arity(self) -> Arity {
        match self {
            Self::Add | Self::Sub | Self::Mul | Self::Div => Arity::Exact(2),
            Self::Reciprocal => Arity::Exact(1),
            Self::Sum => Arity::AtLeast(1),
        }
    }
}

impl fmt::Display for ElementwiseOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepted input count of an operation
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Exactly `n` inputs
    Exact(usize),
    /// `n` or more inputs
    AtLeast(usize),
}

impl Arity {
    /// Whether `n` inputs are accepted
    #[inline]
    pub const fn accepts(self, n: usize) -> bool {
        match self {
            Self::Exact(k) => n == k,
            Self::AtLeast(k) => n >= k,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Elementwise operations on tensors
///
/// Implementors supply [`elementwise`](Self::elementwise); every named
/// operation is a thin wrapper over it. The plain methods use numpy-style
/// broadcasting, the `_with` methods take an explicit [`BroadcastConfig`].
///
/// # Example
///
/// ```
/// use tensorwise::prelude::*;
///
/// let engine = Engine::default();
/// let a = Tensor::from_slice(&[1.0f32, 2.0, 3.0], &[3, 1]);
/// let b = Tensor::from_slice(&[10.0f32, 20.0], &[2]);
///
/// let c = engine.add(&a, &b)?;
/// assert_eq!(c.shape(), &[3, 2]);
/// assert_eq!(c.to_vec::<f32>(), vec![11.0, 21.0, 12.0, 22.0, 13.0, 23.0]);
/// # Ok::<(), tensorwise::error::Error>(())
/// ```
pub trait ElementwiseOps {
    /// Apply `op` to `inputs` under `broadcast`
    fn elementwise(
        &self,
        op: ElementwiseOp,
        inputs: &[&Tensor],
        broadcast: BroadcastConfig,
    ) -> Result<Tensor>;

    /// Element-wise addition: a + b
    fn add(&self, a: &Tensor, b: &Tensor) -> Result<Tensor> {
        self.add_with(a, b, BroadcastConfig::NUMPY)
    }

    /// Element-wise addition with explicit broadcasting
    fn add_with(&self, a: &Tensor, b: &Tensor, broadcast: BroadcastConfig) -> Result<Tensor> {
        self.elementwise(ElementwiseOp::Add, &[a, b], broadcast)
    }

    /// Element-wise subtraction: a - b
    fn sub(&self, a: &Tensor, b: &Tensor) -> Result<Tensor> {
        self.sub_with(a, b, BroadcastConfig::NUMPY)
    }

    /// Element-wise subtraction with explicit broadcasting
    fn sub_with(&self, a: &Tensor, b: &Tensor, broadcast: BroadcastConfig) -> Result<Tensor> {
        self.elementwise(ElementwiseOp::Sub, &[a, b], broadcast)
    }

    /// Element-wise multiplication: a * b
    fn mul(&self, a: &Tensor, b: &Tensor) -> Result<Tensor> {
        self.mul_with(a, b, BroadcastConfig::NUMPY)
    }

    /// Element-wise multiplication with explicit broadcasting
    fn mul_with(&self, a: &Tensor, b: &Tensor, broadcast: BroadcastConfig) -> Result<Tensor> {
        self.elementwise(ElementwiseOp::Mul, &[a, b], broadcast)
    }

    /// Element-wise division: a / b
    ///
    /// # Errors
    ///
    /// `DivisionByZero` if the tensors are integers and `b` holds a zero.
    fn div(&self, a: &Tensor, b: &Tensor) -> Result<Tensor> {
        self.div_with(a, b, BroadcastConfig::NUMPY)
    }

    /// Element-wise division with explicit broadcasting
    fn div_with(&self, a: &Tensor, b: &Tensor, broadcast: BroadcastConfig) -> Result<Tensor> {
        self.elementwise(ElementwiseOp::Div, &[a, b], broadcast)
    }

    /// Element-wise reciprocal: 1 / a
    fn reciprocal(&self, a: &Tensor) -> Result<Tensor> {
        self.elementwise(ElementwiseOp::Reciprocal, &[a], BroadcastConfig::NUMPY)
    }

    /// Sum of one or more tensors
    fn sum(&self, inputs: &[&Tensor]) -> Result<Tensor> {
        self.sum_with(inputs, BroadcastConfig::NUMPY)
    }

    /// Sum of one or more tensors with explicit broadcasting
    ///
    /// An axis can only be combined with exactly two inputs.
    fn sum_with(&self, inputs: &[&Tensor], broadcast: BroadcastConfig) -> Result<Tensor> {
        self.elementwise(ElementwiseOp::Sum, inputs, broadcast)
    }
}

// ============================================================================
// Free functions (default EngineConfig)
// ============================================================================

macro_rules! binary_fns {
    ($($name:ident, $name_with:ident => $op:ident;)*) => {
        $(
            #[doc = concat!("`", stringify!($op), "` with numpy-style broadcasting and the default engine configuration")]
            pub fn $name(a: &Tensor, b: &Tensor) -> Result<Tensor> {
                $name_with(a, b, BroadcastConfig::NUMPY)
            }

            #[doc = concat!("`", stringify!($op), "` with explicit broadcasting and the default engine configuration")]
            pub fn $name_with(a: &Tensor, b: &Tensor, broadcast: BroadcastConfig) -> Result<Tensor> {
                elementwise(ElementwiseOp::$op, &[a, b], broadcast, &EngineConfig::default())
            }
        )*
    };
}

binary_fns! {
    add, add_with => Add;
    sub, sub_with => Sub;
    mul, mul_with => Mul;
    div, div_with => Div;
}

/// `Reciprocal` with the default engine configuration
pub fn reciprocal(a: &Tensor) -> Result<Tensor> {
    elementwise(
        ElementwiseOp::Reciprocal,
        &[a],
        BroadcastConfig::NUMPY,
        &EngineConfig::default(),
    )
}

/// `Sum` with numpy-style broadcasting and the default engine configuration
pub fn sum(inputs: &[&Tensor]) -> Result<Tensor> {
    sum_with(inputs, BroadcastConfig::NUMPY)
}

/// `Sum` with explicit broadcasting and the default engine configuration
pub fn sum_with(inputs: &[&Tensor], broadcast: BroadcastConfig) -> Result<Tensor> {
    elementwise(ElementwiseOp::Sum, inputs, broadcast, &EngineConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip() {
        for op in ElementwiseOp::ALL {
            assert_eq!(ElementwiseOp::from_name(op.name()), Some(op));
        }
        assert_eq!(ElementwiseOp::from_name("add"), None);
        assert_eq!(ElementwiseOp::from_name("Flatten"), None);
    }

    #[test]
    fn test_arity() {
        assert!(ElementwiseOp::Add.arity().accepts(2));
        assert!(!ElementwiseOp::Add.arity().accepts(3));
        assert!(ElementwiseOp::Reciprocal.arity().accepts(1));
        assert!(ElementwiseOp::Sum.arity().accepts(5));
        assert!(!ElementwiseOp::Sum.arity().accepts(0));
        assert_eq!(Arity::AtLeast(1).to_string(), "at least 1");
        assert_eq!(Arity::Exact(2).to_string(), "2");
    }

    #[test]
    fn test_free_functions() {
        let a = Tensor::from_slice(&[6i32, 8], &[2]);
        let b = Tensor::from_slice(&[2i32], &[1]);
        assert_eq!(add(&a, &b).unwrap().to_vec::<i32>(), [8, 10]);
        assert_eq!(sub(&a, &b).unwrap().to_vec::<i32>(), [4, 6]);
        assert_eq!(mul(&a, &b).unwrap().to_vec::<i32>(), [12, 16]);
        assert_eq!(div(&a, &b).unwrap().to_vec::<i32>(), [3, 4]);
        assert_eq!(sum(&[&a, &b, &a]).unwrap().to_vec::<i32>(), [14, 18]);
        assert!(div_with(&a, &b, BroadcastConfig::DISABLED).is_err());
    }
}
