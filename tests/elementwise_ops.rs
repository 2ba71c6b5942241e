//! Integration tests for the elementwise operators (Add, Sub, Mul, Div,
//! Reciprocal, Sum)
//!
//! Tests verify correctness across:
//! - Reference float vectors for every operator
//! - Integer wrapping and division semantics
//! - Multiple dtypes
//! - Serial vs parallel execution

mod common;

use common::{assert_allclose_f32, eager_parallel_engine, serial_engine};
use tensorwise::ops;
use tensorwise::prelude::*;

const LHS: [f32; 9] = [1.0, 2.0, -1.0, 0.0, 1.5, -100.0, -5.4, 9.3, -10_000.0];
const RHS: [f32; 9] = [-1.0, 4.4, 432.3, 0.0, 3.5, 64.0, -5.4, 9.3, 10_000.0];

// ============================================================================
// Reference Vectors
// ============================================================================

#[test]
fn test_add_f32() {
    let a = Tensor::from_slice(&LHS, &[3, 3]);
    let b = Tensor::from_slice(&RHS, &[3, 3]);

    let result = serial_engine().add(&a, &b).unwrap();

    assert_eq!(result.shape(), &[3, 3]);
    assert_allclose_f32(
        &result.to_vec::<f32>(),
        &[0.0, 6.4, 431.3, 0.0, 5.0, -36.0, -10.8, 18.6, 0.0],
        1e-6,
        1e-5,
        "add",
    );
}

#[test]
fn test_sub_f32() {
    let a = Tensor::from_slice(&LHS, &[3, 3]);
    let b = Tensor::from_slice(&RHS, &[3, 3]);

    let result = serial_engine().sub(&a, &b).unwrap();

    assert_allclose_f32(
        &result.to_vec::<f32>(),
        &[2.0, -2.4, -433.3, 0.0, -2.0, -164.0, 0.0, 0.0, -20_000.0],
        1e-6,
        1e-5,
        "sub",
    );
}

#[test]
fn test_mul_f32() {
    let a = Tensor::from_slice(&LHS, &[3, 3]);
    let b = Tensor::from_slice(&RHS, &[3, 3]);

    let result = serial_engine().mul(&a, &b).unwrap();

    assert_allclose_f32(
        &result.to_vec::<f32>(),
        &[
            -1.0,
            8.8,
            -432.3,
            0.0,
            5.25,
            -6_400.0,
            29.16,
            86.49,
            -100_000_000.0,
        ],
        1e-6,
        1e-5,
        "mul",
    );
}

#[test]
fn test_div_f32() {
    let a = Tensor::from_slice(&[1_000.0f32, 1.0, 6.0, 0.0, -10.0, -1.0], &[2, 3]);
    let b = Tensor::from_slice(&[1_000.0f32, 2.0, 3.0, 1.0, -1.0, 4.0], &[2, 3]);

    let result = serial_engine().div(&a, &b).unwrap();

    assert_eq!(result.shape(), &[2, 3]);
    assert_eq!(result.to_vec::<f32>(), [1.0, 0.5, 2.0, 0.0, 10.0, -0.25]);
}

#[test]
fn test_reciprocal_f32() {
    let a = Tensor::from_slice(&[1.0f32, 2.0, -1.0, -2.0], &[2, 2]);

    let result = serial_engine().reciprocal(&a).unwrap();

    assert_eq!(result.shape(), &[2, 2]);
    assert_eq!(result.to_vec::<f32>(), [1.0, 0.5, -1.0, -0.5]);
}

#[test]
fn test_sum_three_inputs_f32() {
    let a = Tensor::from_slice(
        &[1.0f32, 0.0, 1.0, -1.0, 1.1, -100.0, -5.4, 0.01, -10_000.0],
        &[3, 3],
    );
    let b = Tensor::from_slice(
        &[1.0f32, 0.0, 2.0, -2.0, 2.2, 64.0, -1.0, 0.02, 0.1],
        &[3, 3],
    );
    let c = Tensor::from_slice(
        &[1.0f32, 0.0, 3.0, -3.0, 3.3, 64.0, 5.4, 0.03, 10_000.0],
        &[3, 3],
    );

    let result = serial_engine().sum(&[&a, &b, &c]).unwrap();

    assert_allclose_f32(
        &result.to_vec::<f32>(),
        &[3.0, 0.0, 6.0, -6.0, 6.6, 28.0, -1.0, 0.06, 0.1],
        1e-5,
        1e-3,
        "sum",
    );
}

// ============================================================================
// Integer Semantics
// ============================================================================

#[test]
fn test_integer_add_wraps() {
    let a = Tensor::from_slice(&[i8::MAX, i8::MIN, 5], &[3]);
    let b = Tensor::from_slice(&[1i8, -1, 5], &[3]);

    let result = serial_engine().add(&a, &b).unwrap();

    assert_eq!(result.to_vec::<i8>(), [i8::MIN, i8::MAX, 10]);
}

#[test]
fn test_unsigned_sub_wraps() {
    let a = Tensor::from_slice(&[0u32, 5], &[2]);
    let b = Tensor::scalar(1u32);

    let result = serial_engine().sub(&a, &b).unwrap();

    assert_eq!(result.to_vec::<u32>(), [u32::MAX, 4]);
}

#[test]
fn test_integer_div_truncates() {
    let a = Tensor::from_slice(&[7i64, -7, 7, i64::MIN], &[4]);
    let b = Tensor::from_slice(&[2i64, 2, -2, -1], &[4]);

    let result = serial_engine().div(&a, &b).unwrap();

    assert_eq!(result.to_vec::<i64>(), [3, -3, -3, i64::MIN]);
}

#[test]
fn test_integer_div_by_zero_is_error() {
    let a = Tensor::from_slice(&[1u16, 2, 3], &[3]);
    let b = Tensor::from_slice(&[1u16, 0, 3], &[3]);

    let err = serial_engine().div(&a, &b).unwrap_err();

    assert_eq!(err, Error::DivisionByZero { op: "Div" });
}

#[test]
fn test_integer_div_by_broadcast_zero_is_error() {
    let a = Tensor::from_slice(&[1i32, 2, 3, 4], &[2, 2]);
    let b = Tensor::from_slice(&[0i32], &[1]);

    assert!(matches!(
        serial_engine().div(&a, &b),
        Err(Error::DivisionByZero { .. })
    ));
}

#[test]
fn test_integer_reciprocal() {
    let a = Tensor::from_slice(&[1i32, -1, 2], &[3]);

    let result = serial_engine().reciprocal(&a).unwrap();

    assert_eq!(result.to_vec::<i32>(), [1, -1, 0]);
}

#[test]
fn test_float_division_by_zero() {
    let a = Tensor::from_slice(&[1.0f64, -1.0, 0.0], &[3]);
    let b = Tensor::from_slice(&[0.0f64, 0.0, 0.0], &[3]);

    let result = serial_engine().div(&a, &b).unwrap().to_vec::<f64>();

    assert_eq!(result[0], f64::INFINITY);
    assert_eq!(result[1], f64::NEG_INFINITY);
    assert!(result[2].is_nan());
}

// ============================================================================
// DType Coverage
// ============================================================================

macro_rules! mul_typed {
    ($name:ident, $t:ty) => {
        #[test]
        fn $name() {
            let a = Tensor::from_slice(&[1 as $t, 2 as $t, 3 as $t, 4 as $t], &[2, 2]);
            let b = Tensor::from_slice(&[2 as $t, 3 as $t], &[2]);

            let result = serial_engine().mul(&a, &b).unwrap();

            assert_eq!(result.dtype(), <$t as Element>::DTYPE);
            assert_eq!(
                result.to_vec::<$t>(),
                [2 as $t, 6 as $t, 6 as $t, 12 as $t]
            );
        }
    };
}

mul_typed!(test_mul_typed_f64, f64);
mul_typed!(test_mul_typed_f32, f32);
mul_typed!(test_mul_typed_i64, i64);
mul_typed!(test_mul_typed_i32, i32);
mul_typed!(test_mul_typed_i16, i16);
mul_typed!(test_mul_typed_i8, i8);
mul_typed!(test_mul_typed_u64, u64);
mul_typed!(test_mul_typed_u32, u32);
mul_typed!(test_mul_typed_u16, u16);
mul_typed!(test_mul_typed_u8, u8);

#[test]
fn test_bool_is_not_arithmetic() {
    let a = Tensor::from_slice(&[true, false], &[2]);

    let err = serial_engine().add(&a, &a).unwrap_err();

    assert_eq!(
        err,
        Error::UnsupportedDType {
            dtype: DType::Bool,
            op: "Add"
        }
    );
}

#[test]
fn test_mixed_dtypes_rejected() {
    let a = Tensor::from_slice(&[1.0f32, 2.0], &[2]);
    let b = Tensor::from_slice(&[1i32, 2], &[2]);

    assert!(matches!(
        serial_engine().add(&a, &b),
        Err(Error::TypeMismatch {
            got: DType::I32,
            ..
        })
    ));
}

// ============================================================================
// Arity
// ============================================================================

#[test]
fn test_sum_single_input() {
    let a = Tensor::from_slice(&[1.5f64, -2.5], &[2]);

    let result = serial_engine().sum(&[&a]).unwrap();

    assert_eq!(result, a);
}

#[test]
fn test_sum_no_inputs() {
    let err = serial_engine().sum(&[]).unwrap_err();

    assert_eq!(err, Error::arity("Sum", "at least 1", 0));
}

#[test]
fn test_reciprocal_two_inputs() {
    let a = Tensor::from_slice(&[1.0f32], &[1]);

    let err = ops::elementwise(
        ElementwiseOp::Reciprocal,
        &[&a, &a],
        BroadcastConfig::NUMPY,
        &EngineConfig::default(),
    )
    .unwrap_err();

    assert_eq!(err, Error::arity("Reciprocal", "1", 2));
}

// ============================================================================
// Inputs and Outputs
// ============================================================================

#[test]
fn test_inputs_untouched() {
    let a = Tensor::from_slice(&[1.0f32, 2.0, 3.0], &[3]);
    let b = Tensor::from_slice(&[4.0f32], &[1]);
    let a_before = a.clone();

    let result = serial_engine().add(&a, &b).unwrap();

    assert_eq!(a.to_vec::<f32>(), a_before.to_vec::<f32>());
    assert!(!result.shares_storage(&a));
    assert!(!result.shares_storage(&b));
}

#[test]
fn test_scalar_operands() {
    let a = Tensor::scalar(3.0f64);
    let b = Tensor::scalar(4.0f64);

    let result = serial_engine().mul(&a, &b).unwrap();

    assert!(result.is_scalar());
    assert_eq!(result.to_vec::<f64>(), [12.0]);
}

#[test]
fn test_zero_sized_output() {
    let a = Tensor::zeros(&[0, 3], DType::F32);
    let b = Tensor::from_slice(&[1.0f32, 2.0, 3.0], &[3]);

    let result = serial_engine().add(&a, &b).unwrap();

    assert_eq!(result.shape(), &[0, 3]);
    assert_eq!(result.numel(), 0);
}

#[test]
fn test_bytes_interchange() {
    let a = Tensor::from_slice(&[1.0f32, 2.0], &[2]);
    let b = Tensor::from_bytes(&a.to_bytes(), DType::F32, &[2]).unwrap();

    let result = serial_engine().add(&a, &b).unwrap();

    assert_eq!(result.to_vec::<f32>(), [2.0, 4.0]);
}

// ============================================================================
// Parallel Execution
// ============================================================================

#[test]
fn test_parallel_matches_serial() {
    let rows = 301;
    let cols = 257;
    let a_data: Vec<f64> = (0..rows).map(|i| i as f64 * 0.5 - 20.0).collect();
    let b_data: Vec<f64> = (0..cols).map(|j| (j as f64).sin()).collect();
    let a = Tensor::from_slice(&a_data, &[rows, 1]);
    let b = Tensor::from_slice(&b_data, &[cols]);

    for op in [
        ElementwiseOp::Add,
        ElementwiseOp::Sub,
        ElementwiseOp::Mul,
        ElementwiseOp::Div,
    ] {
        let serial = serial_engine()
            .elementwise(op, &[&a, &b], BroadcastConfig::NUMPY)
            .unwrap();
        let parallel = eager_parallel_engine()
            .elementwise(op, &[&a, &b], BroadcastConfig::NUMPY)
            .unwrap();
        assert_eq!(serial.shape(), &[rows, cols]);
        assert_eq!(
            serial.to_bytes(),
            parallel.to_bytes(),
            "{op} differs between serial and parallel runs"
        );
    }
}

#[test]
fn test_parallel_sum_matches_serial() {
    let a_data: Vec<i32> = (0..10_000).collect();
    let a = Tensor::from_slice(&a_data, &[100, 100]);
    let b = Tensor::from_slice(&[1i32, -1], &[2, 1, 1]);
    let c = Tensor::from_slice(&(0..100).collect::<Vec<i32>>(), &[100]);

    let serial = serial_engine().sum(&[&a, &b, &c]).unwrap();
    let parallel = eager_parallel_engine().sum(&[&a, &b, &c]).unwrap();

    assert_eq!(serial.shape(), &[2, 100, 100]);
    assert_eq!(serial, parallel);
}
