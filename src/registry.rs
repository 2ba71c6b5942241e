//! Kernel declarations
//!
//! An immutable table describing every operator this crate publishes: its
//! name, domain and version, input/output counts, the element types each named
//! type slot accepts, and memory placement and aliasing hints for an external
//! operator-registration framework.
//!
//! | Op | Inputs | Slot constraints | Notes |
//! |----|--------|------------------|-------|
//! | Add, Sub, Mul, Div | 2 | `T`: numeric | |
//! | Sum | 1+ | `T`: numeric | |
//! | Reciprocal | 1 | `T`: f32, f64 | |
//! | Shape | 1 | `T`: bool, f32, f64, i16, i32, i64, u8, u16; `T1`: i64 | output 0 in host memory |
//! | Flatten | 1 | `T`: all | output 0 aliases input 0 |
//!
//! # Example
//!
//! ```
//! use tensorwise::dtype::DType;
//! use tensorwise::registry::{is_allowed, lookup};
//!
//! assert!(is_allowed("Add", "T", DType::U16));
//! assert!(!is_allowed("Reciprocal", "T", DType::I32));
//! assert!(is_allowed("Shape", "T1", DType::I64));
//! assert_eq!(lookup("Shape").unwrap().host_outputs, &[0]);
//! ```

use crate::dtype::{DType, DTypeSet};
use crate::error::{Error, Result};
use crate::ops::{Arity, ElementwiseOp};
use crate::tensor::Tensor;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Domain of every published operator
pub const ONNX_DOMAIN: &str = "ai.onnx";

/// Name of the shape introspection operator (declared only)
pub const SHAPE: &str = "Shape";

/// Name of the flatten operator
pub const FLATTEN: &str = "Flatten";

/// Allowed element types for one named type slot
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TypeConstraint {
    /// Slot name, e.g. `"T"`
    pub slot: &'static str,
    /// Types the slot accepts
    pub allowed: DTypeSet,
}

impl TypeConstraint {
    const fn new(slot: &'static str, allowed: DTypeSet) -> Self {
        Self { slot, allowed }
    }
}

/// Declaration of one operator kernel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KernelDef {
    /// Operator name
    pub name: &'static str,
    /// Operator domain
    pub domain: &'static str,
    /// First operator set version this kernel implements
    pub since_version: u32,
    /// Accepted input count
    pub inputs: Arity,
    /// Number of outputs
    pub outputs: usize,
    /// Allowed types per slot
    pub type_constraints: &'static [TypeConstraint],
    /// Slot bound to each input; for variadic inputs the last slot repeats
    pub input_slots: &'static [&'static str],
    /// Slot bound to each output
    pub output_slots: &'static [&'static str],
    /// Outputs that must be placed in host memory
    pub host_outputs: &'static [usize],
    /// `(input, output)` pairs where the output may share the input's storage
    pub aliases: &'static [(usize, usize)],
}

impl KernelDef {
    /// Constraint for `slot`, if declared
    pub fn constraint(&self, slot: &str) -> Option<&TypeConstraint> {
        self.type_constraints.iter().find(|c| c.slot == slot)
    }

    /// Whether `slot` accepts `dtype`
    pub fn allows(&self, slot: &str, dtype: DType) -> bool {
        self.constraint(slot)
            .is_some_and(|c| c.allowed.contains(dtype))
    }

    /// Slot bound to input `index`
    pub fn input_slot(&self, index: usize) -> Option<&'static str> {
        match self.inputs {
            Arity::AtLeast(_) => self
                .input_slots
                .get(index)
                .or(self.input_slots.last())
                .copied(),
            Arity::Exact(_) => self.input_slots.get(index).copied(),
        }
    }

    /// Slot bound to output `index`
    pub fn output_slot(&self, index: usize) -> Option<&'static str> {
        self.output_slots.get(index).copied()
    }

    /// Whether output `index` must live in host memory
    pub fn is_host_output(&self, index: usize) -> bool {
        self.host_outputs.contains(&index)
    }

    /// Input whose storage output `index` may share
    pub fn alias_of(&self, output: usize) -> Option<usize> {
        self.aliases
            .iter()
            .find(|&&(_, o)| o == output)
            .map(|&(i, _)| i)
    }

    /// Check `inputs` against the declared arity and type constraints
    ///
    /// # Errors
    ///
    /// - `UnsupportedArity` if the input count is not accepted
    /// - `TypeMismatch` if an input's dtype is outside its slot's allowed set,
    ///   or differs from an earlier input bound to the same slot
    pub fn validate(&self, inputs: &[&Tensor]) -> Result<()> {
        if !self.inputs.accepts(inputs.len()) {
            return Err(Error::arity(self.name, self.inputs.to_string(), inputs.len()));
        }

        let mut bound: SmallVec<[(&str, DType); 2]> = SmallVec::new();
        for (index, tensor) in inputs.iter().enumerate() {
            let Some(slot) = self.input_slot(index) else {
                continue;
            };
            let dtype = tensor.dtype();

            if let Some(c) = self.constraint(slot) {
                if !c.allowed.contains(dtype) {
                    return Err(Error::type_mismatch(c.allowed, dtype));
                }
            }

            match bound.iter().find(|(s, _)| *s == slot) {
                Some(&(_, first)) if first != dtype => {
                    return Err(Error::type_mismatch(first, dtype));
                }
                Some(_) => {}
                None => bound.push((slot, dtype)),
            }
        }
        Ok(())
    }
}

// ============================================================================
// Table
// ============================================================================

const NUMERIC_T: &[TypeConstraint] = &[TypeConstraint::new("T", DTypeSet::NUMERIC)];
const FLOAT_T: &[TypeConstraint] = &[TypeConstraint::new("T", DTypeSet::FLOATS)];
const ANY_T: &[TypeConstraint] = &[TypeConstraint::new("T", DTypeSet::ALL)];
const SHAPE_T: &[TypeConstraint] = &[
    TypeConstraint::new(
        "T",
        DTypeSet::of(&[
            DType::Bool,
            DType::F32,
            DType::F64,
            DType::I16,
            DType::I32,
            DType::I64,
            DType::U8,
            DType::U16,
        ]),
    ),
    TypeConstraint::new("T1", DTypeSet::single(DType::I64)),
];

const fn elementwise_def(op: ElementwiseOp, type_constraints: &'static [TypeConstraint]) -> KernelDef {
    KernelDef {
        name: op.name(),
        domain: ONNX_DOMAIN,
        since_version: 1,
        inputs: op.arity(),
        outputs: 1,
        type_constraints,
        input_slots: match op.arity() {
            Arity::Exact(2) => &["T", "T"],
            _ => &["T"],
        },
        output_slots: &["T"],
        host_outputs: &[],
        aliases: &[],
    }
}

static KERNEL_DEFS: &[KernelDef] = &[
    elementwise_def(ElementwiseOp::Add, NUMERIC_T),
    elementwise_def(ElementwiseOp::Sub, NUMERIC_T),
    elementwise_def(ElementwiseOp::Mul, NUMERIC_T),
    elementwise_def(ElementwiseOp::Div, NUMERIC_T),
    elementwise_def(ElementwiseOp::Reciprocal, FLOAT_T),
    elementwise_def(ElementwiseOp::Sum, NUMERIC_T),
    KernelDef {
        name: SHAPE,
        domain: ONNX_DOMAIN,
        since_version: 1,
        inputs: Arity::Exact(1),
        outputs: 1,
        type_constraints: SHAPE_T,
        input_slots: &["T"],
        output_slots: &["T1"],
        host_outputs: &[0],
        aliases: &[],
    },
    KernelDef {
        name: FLATTEN,
        domain: ONNX_DOMAIN,
        since_version: 1,
        inputs: Arity::Exact(1),
        outputs: 1,
        type_constraints: ANY_T,
        input_slots: &["T"],
        output_slots: &["T"],
        host_outputs: &[],
        aliases: &[(0, 0)],
    },
];

static BY_NAME: LazyLock<HashMap<&'static str, &'static KernelDef>> =
    LazyLock::new(|| KERNEL_DEFS.iter().map(|def| (def.name, def)).collect());

/// Every published kernel declaration
pub fn kernel_defs() -> &'static [KernelDef] {
    KERNEL_DEFS
}

/// Declaration for operator `name`
pub fn lookup(name: &str) -> Option<&'static KernelDef> {
    BY_NAME.get(name).copied()
}

/// Whether operator `op` accepts `dtype` in type slot `slot`
///
/// Unknown operators and undeclared slots accept nothing.
pub fn is_allowed(op: &str, slot: &str, dtype: DType) -> bool {
    lookup(op).is_some_and(|def| def.allows(slot, dtype))
}
