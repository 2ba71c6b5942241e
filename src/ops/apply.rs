//! Elementwise kernel dispatcher

use super::{ElementwiseOp, kernels};
use crate::broadcast::{BroadcastConfig, BroadcastIter, resolve};
use crate::config::EngineConfig;
use crate::dtype::{DType, Numeric};
use crate::error::{Error, Result};
use crate::tensor::{Tensor, checked_numel};
use smallvec::SmallVec;

/// Resolve broadcasting for `inputs` and apply `op`
///
/// All inputs must share the first input's dtype. This is the entry point
/// behind the free functions, [`ElementwiseOps`](super::ElementwiseOps) and
/// [`execute`](super::execute).
///
/// # Errors
///
/// - `UnsupportedArity` if the input count does not fit `op`
/// - `TypeMismatch` if the inputs disagree on dtype
/// - `ShapeMismatch` / `InvalidAxis` from [`resolve`]
/// - `UnsupportedDType` for bool tensors
/// - `DivisionByZero` for an integer divisor containing zero
pub fn elementwise(
    op: ElementwiseOp,
    inputs: &[&Tensor],
    broadcast: BroadcastConfig,
    config: &EngineConfig,
) -> Result<Tensor> {
    check_arity(op, inputs.len())?;

    let dtype = inputs[0].dtype();
    check_dtypes(inputs, dtype)?;

    let shapes: SmallVec<[&[usize]; 4]> = inputs.iter().map(|t| t.shape()).collect();
    let resolved = resolve(&shapes, broadcast)?;

    apply(op, inputs, &resolved.shape, dtype, &resolved.alignments, config)
}

/// Apply `op` to `inputs`, producing a tensor of `out_shape` and `dtype`
///
/// `alignments[k]` is the output dimension at which input `k`'s first
/// dimension lands (see [`Resolved`](crate::broadcast::Resolved)). The output
/// is freshly allocated; inputs are only read.
///
/// # Errors
///
/// - `UnsupportedArity` if the input count does not fit `op`
/// - `InvalidArgument` if `alignments` does not have one entry per input
/// - `TypeMismatch` if an input's dtype differs from `dtype`
/// - `ShapeMismatch` if an input does not broadcast into `out_shape`
/// - `UnsupportedDType` for bool
/// - `DivisionByZero` for an integer divisor containing zero
pub fn apply(
    op: ElementwiseOp,
    inputs: &[&Tensor],
    out_shape: &[usize],
    dtype: DType,
    alignments: &[usize],
    config: &EngineConfig,
) -> Result<Tensor> {
    check_arity(op, inputs.len())?;
    if alignments.len() != inputs.len() {
        return Err(Error::InvalidArgument {
            arg: "alignments",
            reason: format!(
                "expected {} alignment(s), got {}",
                inputs.len(),
                alignments.len()
            ),
        });
    }
    check_dtypes(inputs, dtype)?;

    let len = checked_numel(out_shape).ok_or_else(|| Error::numel_overflow(out_shape))?;
    let iters = inputs
        .iter()
        .zip(alignments)
        .map(|(t, &align)| BroadcastIter::new(t.shape(), out_shape, align))
        .collect::<Result<SmallVec<[BroadcastIter; 4]>>>()?;

    let _span = tracing::debug_span!("elementwise", op = op.name(), %dtype, len).entered();

    crate::dispatch_numeric!(dtype, T => {
        run::<T>(op, inputs, &iters, out_shape, len, config)
    }, op.name())
}

fn check_arity(op: ElementwiseOp, got: usize) -> Result<()> {
    let arity = op.arity();
    if arity.accepts(got) {
        Ok(())
    } else {
        Err(Error::arity(op.name(), arity.to_string(), got))
    }
}

fn check_dtypes(inputs: &[&Tensor], expected: DType) -> Result<()> {
    match inputs.iter().find(|t| t.dtype() != expected) {
        Some(t) => Err(Error::type_mismatch(expected, t.dtype())),
        None => Ok(()),
    }
}

fn run<T: Numeric>(
    op: ElementwiseOp,
    inputs: &[&Tensor],
    iters: &[BroadcastIter],
    out_shape: &[usize],
    len: usize,
    config: &EngineConfig,
) -> Result<Tensor> {
    let data = inputs
        .iter()
        .map(|t| t.typed::<T>())
        .collect::<Result<SmallVec<[&[T]; 4]>>>()?;

    if len > 0 && T::DTYPE.is_int() {
        check_divisor(op, &data)?;
    }

    let mut out = vec![T::zero(); len];
    match op {
        ElementwiseOp::Add => binary(&mut out, &data, iters, T::elem_add, config),
        ElementwiseOp::Sub => binary(&mut out, &data, iters, T::elem_sub, config),
        ElementwiseOp::Mul => binary(&mut out, &data, iters, T::elem_mul, config),
        ElementwiseOp::Div => binary(&mut out, &data, iters, T::elem_div, config),
        ElementwiseOp::Reciprocal => {
            kernels::unary(&mut out, data[0], &iters[0], T::elem_recip, config)
        }
        ElementwiseOp::Sum => {
            let operands: SmallVec<[(&[T], &BroadcastIter); 4]> =
                data.iter().copied().zip(iters.iter()).collect();
            kernels::fold(&mut out, &operands, T::elem_add, config)
        }
    }

    Tensor::from_vec(out, out_shape)
}

#[inline]
fn binary<T: Numeric>(
    out: &mut [T],
    data: &[&[T]],
    iters: &[BroadcastIter],
    f: fn(T, T) -> T,
    config: &EngineConfig,
) {
    kernels::binary(out, (data[0], &iters[0]), (data[1], &iters[1]), f, config)
}

/// Reject integer division whose divisor holds a zero
///
/// Every divisor element is read at least once when the output is non-empty,
/// so scanning the whole buffer matches what the kernel would touch.
fn check_divisor<T: Numeric>(op: ElementwiseOp, data: &[&[T]]) -> Result<()> {
    let divisor = match op {
        ElementwiseOp::Div => data[1],
        ElementwiseOp::Reciprocal => data[0],
        _ => return Ok(()),
    };

    if divisor.iter().any(|v| v.is_zero()) {
        tracing::debug!(op = op.name(), dtype = %T::DTYPE, "integer divisor contains zero");
        return Err(Error::DivisionByZero { op: op.name() });
    }
    Ok(())
}
