//! DType dispatch for elementwise kernels
//!
//! The `dispatch_numeric!` macro turns a runtime [`DType`](crate::dtype::DType)
//! into a concrete Rust type so that one generic kernel body can serve every
//! element type.
//!
//! # Usage
//!
//! ```ignore
//! fn my_operation(dtype: DType) -> Result<usize> {
//!     dispatch_numeric!(dtype, T => {
//!         // T is now a concrete type (f32, f64, i32, etc.)
//!         Ok(std::mem::size_of::<T>())
//!     }, "my_operation")
//! }
//! ```
//!
//! ## Arguments
//!
//! * `$dtype` - Expression evaluating to a `DType` value
//! * `$T` - Identifier to bind to the concrete type in the body
//! * `$body` - Code block to execute with `T` bound
//! * `$error_op` - Operation name for error messages
//!
//! ## Supported Types
//!
//! - `F64` -> `f64`, `F32` -> `f32`
//! - `I64` -> `i64`, `I32` -> `i32`, `I16` -> `i16`, `I8` -> `i8`
//! - `U64` -> `u64`, `U32` -> `u32`, `U16` -> `u16`, `U8` -> `u8`
//! - `Bool` -> returns `UnsupportedDType` from the enclosing function

/// Runtime dtype dispatch over the arithmetic element types
///
/// Every bound type implements [`Numeric`](crate::dtype::Numeric). The
/// enclosing function must return `Result<_, Error>`.
#[macro_export]
macro_rules! dispatch_numeric {
    ($dtype:expr, $T:ident => $body:block, $error_op:expr) => {
        match $dtype {
            $crate::dtype::DType::F64 => {
                type $T = f64;
                $body
            }
            $crate::dtype::DType::F32 => {
                type $T = f32;
                $body
            }
            $crate::dtype::DType::I64 => {
                type $T = i64;
                $body
            }
            $crate::dtype::DType::I32 => {
                type $T = i32;
                $body
            }
            $crate::dtype::DType::I16 => {
                type $T = i16;
                $body
            }
            $crate::dtype::DType::I8 => {
                type $T = i8;
                $body
            }
            $crate::dtype::DType::U64 => {
                type $T = u64;
                $body
            }
            $crate::dtype::DType::U32 => {
                type $T = u32;
                $body
            }
            $crate::dtype::DType::U16 => {
                type $T = u16;
                $body
            }
            $crate::dtype::DType::U8 => {
                type $T = u8;
                $body
            }
            $crate::dtype::DType::Bool => {
                return Err($crate::error::Error::UnsupportedDType {
                    dtype: $dtype,
                    op: $error_op,
                })
            }
        }
    };
}
