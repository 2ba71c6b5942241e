//! Element traits for mapping Rust types to DType

use super::DType;
use crate::tensor::Buffer;
use bytemuck::Pod;
use std::fmt::Debug;

/// Trait for types that can be stored in a tensor
///
/// This trait connects Rust's type system to the runtime dtype system and gives
/// typed access into the tagged [`Buffer`] behind a tensor's storage. It is
/// implemented for every primitive in [`DType`], `bool` included.
pub trait Element: Copy + Send + Sync + PartialEq + Debug + 'static {
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Borrow the buffer as a slice of `Self`, if the variant matches
    fn slice(buffer: &Buffer) -> Option<&[Self]>;

    /// Wrap an owned vector in the matching buffer variant
    fn into_buffer(data: Vec<Self>) -> Buffer;
}

/// Arithmetic element types
///
/// Each method is the native scalar operation for the type. Integer
/// arithmetic uses two's-complement wrapping semantics: `i8::MAX + 1` is
/// `i8::MIN`, `0u8 - 1` is `u8::MAX`, and `i32::MIN / -1` is `i32::MIN`.
/// Floating point follows IEEE-754, so `1.0 / 0.0` is infinity and `0.0 / 0.0`
/// is NaN.
///
/// `elem_div` and `elem_recip` must not be called with a zero integer divisor;
/// kernels reject that case up front with [`crate::error::Error::DivisionByZero`].
pub trait Numeric: Element + Pod {
    /// Zero value
    fn zero() -> Self;

    /// One value
    fn one() -> Self;

    /// Whether the value is exactly zero
    fn is_zero(self) -> bool;

    /// a + b
    fn elem_add(self, rhs: Self) -> Self;

    /// a - b
    fn elem_sub(self, rhs: Self) -> Self;

    /// a * b
    fn elem_mul(self, rhs: Self) -> Self;

    /// a / b
    fn elem_div(self, rhs: Self) -> Self;

    /// 1 / a
    #[inline]
    fn elem_recip(self) -> Self {
        Self::one().elem_div(self)
    }
}

macro_rules! impl_element {
    ($t:ty, $dtype:ident) => {
        impl Element for $t {
            const DTYPE: DType = DType::$dtype;

            #[inline]
            fn slice(buffer: &Buffer) -> Option<&[Self]> {
                match buffer {
                    Buffer::$dtype(v) => Some(v.as_slice()),
                    _ => None,
                }
            }

            #[inline]
            fn into_buffer(data: Vec<Self>) -> Buffer {
                Buffer::$dtype(data)
            }
        }
    };
}

macro_rules! impl_float_numeric {
    ($t:ty) => {
        impl Numeric for $t {
            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            fn one() -> Self {
                1.0
            }

            #[inline]
            fn is_zero(self) -> bool {
                self == 0.0
            }

            #[inline]
            fn elem_add(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline]
            fn elem_sub(self, rhs: Self) -> Self {
                self - rhs
            }

            #[inline]
            fn elem_mul(self, rhs: Self) -> Self {
                self * rhs
            }

            #[inline]
            fn elem_div(self, rhs: Self) -> Self {
                self / rhs
            }

            #[inline]
            fn elem_recip(self) -> Self {
                self.recip()
            }
        }
    };
}

macro_rules! impl_int_numeric {
    ($t:ty) => {
        impl Numeric for $t {
            #[inline]
            fn zero() -> Self {
                0
            }

            #[inline]
            fn one() -> Self {
                1
            }

            #[inline]
            fn is_zero(self) -> bool {
                self == 0
            }

            #[inline]
            fn elem_add(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }

            #[inline]
            fn elem_sub(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }

            #[inline]
            fn elem_mul(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }

            #[inline]
            fn elem_div(self, rhs: Self) -> Self {
                self.wrapping_div(rhs)
            }
        }
    };
}

impl_element!(f64, F64);
impl_element!(f32, F32);
impl_element!(i64, I64);
impl_element!(i32, I32);
impl_element!(i16, I16);
impl_element!(i8, I8);
impl_element!(u64, U64);
impl_element!(u32, U32);
impl_element!(u16, U16);
impl_element!(u8, U8);
impl_element!(bool, Bool);

impl_float_numeric!(f64);
impl_float_numeric!(f32);
impl_int_numeric!(i64);
impl_int_numeric!(i32);
impl_int_numeric!(i16);
impl_int_numeric!(i8);
impl_int_numeric!(u64);
impl_int_numeric!(u32);
impl_int_numeric!(u16);
impl_int_numeric!(u8);
