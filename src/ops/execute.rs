//! Name-based invocation

use super::{Attributes, ElementwiseOp, elementwise};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::registry;
use crate::tensor::Tensor;

/// Run the operator `op_name` with the default engine configuration
///
/// See [`execute_with`].
///
/// # Example
///
/// ```
/// use tensorwise::ops::{Attributes, execute};
/// use tensorwise::tensor::Tensor;
///
/// let a = Tensor::from_slice(&[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0], &[3, 3]);
/// let b = Tensor::from_slice(&[3.0f32, 2.0, 1.0], &[3]);
/// let attrs = Attributes::new().with("broadcast", 1i64).with("axis", 0i64);
///
/// let c = execute("Add", &[&a, &b], &attrs)?;
/// assert_eq!(
///     c.to_vec::<f32>(),
///     vec![4.0, 5.0, 6.0, 6.0, 7.0, 8.0, 8.0, 9.0, 10.0]
/// );
/// # Ok::<(), tensorwise::error::Error>(())
/// ```
pub fn execute(op_name: &str, inputs: &[&Tensor], attrs: &Attributes) -> Result<Tensor> {
    execute_with(&EngineConfig::default(), op_name, inputs, attrs)
}

/// Run the operator `op_name` on `inputs`
///
/// The operator's [`KernelDef`](crate::registry::KernelDef) is looked up and
/// the inputs are validated against its arity and type constraints before any
/// work is done. Arithmetic operators read `broadcast` and `axis` from
/// `attrs`; `Flatten` reads `axis` (default 1) and returns a view sharing the
/// input's storage.
///
/// # Errors
///
/// - `UnknownOperator` if no declaration exists for `op_name`
/// - `NotImplemented` for operators that are declared but have no kernel here
/// - `UnsupportedArity` / `TypeMismatch` from declaration checks
/// - `InvalidAttribute` / `InvalidAxis` for malformed attributes
/// - any error of [`elementwise`]
pub fn execute_with(
    config: &EngineConfig,
    op_name: &str,
    inputs: &[&Tensor],
    attrs: &Attributes,
) -> Result<Tensor> {
    let def = registry::lookup(op_name).ok_or_else(|| Error::UnknownOperator {
        name: op_name.to_string(),
    })?;
    let _span = tracing::debug_span!("execute", op = def.name, inputs = inputs.len()).entered();

    def.validate(inputs)?;

    if let Some(op) = ElementwiseOp::from_name(def.name) {
        let rank = inputs.iter().map(|t| t.ndim()).max().unwrap_or(0);
        let broadcast = attrs.broadcast_config(rank)?;
        return elementwise(op, inputs, broadcast, config);
    }

    match def.name {
        registry::FLATTEN => {
            let input = inputs[0];
            let axis = attrs.flatten_axis(input.ndim())?;
            input.flatten(axis)
        }
        name => Err(Error::NotImplemented {
            name: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DType;

    #[test]
    fn test_unknown_operator() {
        let a = Tensor::from_slice(&[1.0f32], &[1]);
        assert_eq!(
            execute("Pow", &[&a, &a], &Attributes::new()).unwrap_err(),
            Error::UnknownOperator {
                name: "Pow".into()
            }
        );
    }

    #[test]
    fn test_shape_is_declaration_only() {
        let a = Tensor::from_slice(&[1.0f32], &[1]);
        assert!(matches!(
            execute("Shape", &[&a], &Attributes::new()),
            Err(Error::NotImplemented { .. })
        ));
    }

    #[test]
    fn test_reciprocal_rejects_integers() {
        let a = Tensor::from_slice(&[2i32], &[1]);
        assert!(matches!(
            execute("Reciprocal", &[&a], &Attributes::new()),
            Err(Error::TypeMismatch { got: DType::I32, .. })
        ));
    }

    #[test]
    fn test_broadcast_disabled() {
        let a = Tensor::from_slice(&[1i64, 2, 3, 4], &[2, 2]);
        let b = Tensor::from_slice(&[1i64, 2], &[2]);
        let attrs = Attributes::new().with("broadcast", 0i64);
        assert!(matches!(
            execute("Sub", &[&a, &b], &attrs),
            Err(Error::ShapeMismatch { .. })
        ));
        assert_eq!(
            execute("Sub", &[&a, &a], &attrs).unwrap().to_vec::<i64>(),
            [0, 0, 0, 0]
        );
    }

    #[test]
    fn test_flatten_aliases_input() {
        let a = Tensor::from_slice(&[true, false, true, true, false, false], &[1, 2, 3]);
        let out = execute("Flatten", &[&a], &Attributes::new()).unwrap();
        assert_eq!(out.shape(), &[1, 6]);
        assert!(out.shares_storage(&a));

        let out = execute("Flatten", &[&a], &Attributes::new().with("axis", 2i64)).unwrap();
        assert_eq!(out.shape(), &[2, 3]);
    }

    #[test]
    fn test_flatten_axis_out_of_range() {
        let a = Tensor::from_slice(&[1u8, 2], &[2]);
        let attrs = Attributes::new().with("axis", 2i64);
        assert_eq!(
            execute("Flatten", &[&a], &attrs).unwrap_err(),
            Error::InvalidAxis { axis: 2, rank: 1 }
        );
    }

    #[test]
    fn test_execute_with_serial_config() {
        let a = Tensor::from_slice(&[1.0f64, 2.0], &[2]);
        let out = execute_with(&EngineConfig::serial(), "Sum", &[&a, &a, &a], &Attributes::new())
            .unwrap();
        assert_eq!(out.to_vec::<f64>(), [3.0, 6.0]);
    }
}
