//! Tensor types
//!
//! This module provides the `Tensor` type, an n-dimensional array backed by a
//! reference-counted, typed host buffer, together with its `Shape` and `Layout`.

mod core;
mod layout;
mod shape;
mod storage;

pub use self::core::Tensor;
pub use layout::{Layout, Strides, contiguous_strides};
pub use shape::{Shape, checked_numel};
pub use storage::{Buffer, Storage};
