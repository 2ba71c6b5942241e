//! Core Tensor type

use super::{Layout, Storage, checked_numel};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use std::fmt;

/// N-dimensional array in host memory
///
/// `Tensor` consists of:
/// - **Storage**: reference-counted, typed element buffer
/// - **Layout**: shape and row-major strides over that buffer
///
/// Element type is determined at runtime by the storage. Tensors built by this
/// crate are always contiguous, so element `i` of the row-major traversal is
/// element `i` of the buffer.
///
/// # Zero-Copy Views
///
/// `reshape` and `flatten` return tensors that share storage with their
/// source; cloning a tensor only bumps a reference count.
///
/// # Example
///
/// ```
/// use tensorwise::tensor::Tensor;
///
/// let a = Tensor::from_slice(&[1.0f32, 2.0, 3.0, 4.0], &[2, 2]);
/// assert_eq!(a.shape(), &[2, 2]);
/// assert_eq!(a.to_vec::<f32>(), vec![1.0, 2.0, 3.0, 4.0]);
/// ```
#[derive(Clone)]
pub struct Tensor {
    storage: Storage,
    layout: Layout,
}

impl Tensor {
    /// Create a tensor from storage and layout
    ///
    /// Fails if the layout does not cover exactly the storage's elements.
    pub fn from_parts(storage: Storage, layout: Layout) -> Result<Self> {
        if !layout.is_contiguous() || layout.elem_count() != storage.len() {
            return Err(Error::ShapeMismatch {
                lhs: layout.shape().to_vec(),
                rhs: vec![storage.len()],
            });
        }
        Ok(Self { storage, layout })
    }

    /// Create a tensor from a slice of data
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` does not equal the product of the `shape` dimensions.
    /// For a fallible alternative, use [`Self::try_from_slice`].
    pub fn from_slice<T: Element>(data: &[T], shape: &[usize]) -> Self {
        Self::try_from_slice(data, shape).expect("Tensor::from_slice failed")
    }

    /// Create a tensor from a slice of data (fallible version)
    ///
    /// Returns an error if `data.len()` does not equal the product of the `shape` dimensions.
    pub fn try_from_slice<T: Element>(data: &[T], shape: &[usize]) -> Result<Self> {
        Self::from_parts(Storage::from_slice(data), Layout::contiguous(shape))
    }

    /// Create a tensor that takes ownership of `data`
    pub fn from_vec<T: Element>(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        Self::from_parts(Storage::from_vec(data), Layout::contiguous(shape))
    }

    /// Create a tensor from native-endian bytes with an explicit dtype
    ///
    /// This is the entry point for hosts that hand over untyped buffers.
    pub fn from_bytes(bytes: &[u8], dtype: DType, shape: &[usize]) -> Result<Self> {
        Self::from_parts(Storage::from_bytes(bytes, dtype)?, Layout::contiguous(shape))
    }

    /// Create a rank-0 tensor holding one value
    pub fn scalar<T: Element>(value: T) -> Self {
        Self {
            storage: Storage::from_vec(vec![value]),
            layout: Layout::scalar(),
        }
    }

    /// Create a tensor filled with zeros (`false` for bool)
    pub fn zeros(shape: &[usize], dtype: DType) -> Self {
        let layout = Layout::contiguous(shape);
        Self {
            storage: Storage::zeroed(layout.elem_count(), dtype),
            layout,
        }
    }

    // ===== Accessors =====

    /// Get the storage
    #[inline]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Get the layout
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    /// Get the strides
    #[inline]
    pub fn strides(&self) -> &[isize] {
        self.layout.strides()
    }

    /// Get the number of dimensions (rank)
    #[inline]
    pub fn ndim(&self) -> usize {
        self.layout.ndim()
    }

    /// Get the total number of elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.layout.elem_count()
    }

    /// Get the element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    /// Check if this is a scalar (0-dimensional tensor)
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.layout.is_scalar()
    }

    /// Whether two tensors share one allocation
    #[inline]
    pub fn shares_storage(&self, other: &Tensor) -> bool {
        self.storage.ptr_eq(&other.storage)
    }

    // ===== Data Access =====

    /// Borrow the elements as `&[T]` in row-major order
    ///
    /// Returns `None` if `T` is not the tensor's element type.
    #[inline]
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        self.storage.as_slice()
    }

    /// Borrow the elements as `&[T]`, failing with `TypeMismatch` on the wrong type
    pub fn typed<T: Element>(&self) -> Result<&[T]> {
        self.as_slice()
            .ok_or_else(|| Error::type_mismatch(T::DTYPE, self.dtype()))
    }

    /// Copy the elements into a `Vec<T>`
    ///
    /// # Panics
    ///
    /// Panics if `T` is not the tensor's element type. For a fallible
    /// alternative, use [`Self::typed`].
    pub fn to_vec<T: Element>(&self) -> Vec<T> {
        self.typed::<T>()
            .expect("Tensor::to_vec called with the wrong element type")
            .to_vec()
    }

    /// Copy the elements out as native-endian bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        self.storage.buffer().to_bytes()
    }

    // ===== View Operations (Zero-Copy) =====

    /// Reshape to a new shape with the same element count (zero-copy)
    pub fn reshape(&self, shape: &[usize]) -> Result<Self> {
        let layout = self
            .layout
            .reshape(shape)
            .ok_or_else(|| Error::shape_mismatch(self.shape(), shape))?;

        Ok(Self {
            storage: self.storage.clone(),
            layout,
        })
    }

    /// Collapse into a 2-D view around `axis` (zero-copy)
    ///
    /// The output shape is `(d0 * ... * d(axis-1), d(axis) * ... * dn)`.
    /// `axis` may range over `0..=ndim`; `axis == 0` yields `(1, numel)` and
    /// `axis == ndim` yields `(numel, 1)`.
    pub fn flatten(&self, axis: usize) -> Result<Self> {
        let shape = self.shape();
        if axis > shape.len() {
            return Err(Error::InvalidAxis {
                axis: axis as i64,
                rank: shape.len(),
            });
        }

        let outer = checked_numel(&shape[..axis]).ok_or_else(|| Error::numel_overflow(shape))?;
        let inner = checked_numel(&shape[axis..]).ok_or_else(|| Error::numel_overflow(shape))?;
        self.reshape(&[outer, inner])
    }
}

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.storage.buffer() == other.storage.buffer()
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape())
            .field("dtype", &self.dtype())
            .field("data", self.storage.buffer())
            .finish()
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor({}, {})", self.layout, self.dtype())
    }
}
