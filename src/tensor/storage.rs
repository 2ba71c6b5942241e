//! Storage: host memory with Arc-based sharing

use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use std::sync::Arc;

/// Typed element buffer, one variant per [`DType`]
///
/// Keeping the Rust element type in the variant means typed access never needs
/// an alignment-sensitive cast of raw bytes.
#[derive(Clone, PartialEq)]
pub enum Buffer {
    /// f64 elements
    F64(Vec<f64>),
    /// f32 elements
    F32(Vec<f32>),
    /// i64 elements
    I64(Vec<i64>),
    /// i32 elements
    I32(Vec<i32>),
    /// i16 elements
    I16(Vec<i16>),
    /// i8 elements
    I8(Vec<i8>),
    /// u64 elements
    U64(Vec<u64>),
    /// u32 elements
    U32(Vec<u32>),
    /// u16 elements
    U16(Vec<u16>),
    /// u8 elements
    U8(Vec<u8>),
    /// bool elements
    Bool(Vec<bool>),
}

macro_rules! for_each_buffer {
    ($buffer:expr, $v:ident => $body:expr) => {
        match $buffer {
            Buffer::F64($v) => $body,
            Buffer::F32($v) => $body,
            Buffer::I64($v) => $body,
            Buffer::I32($v) => $body,
            Buffer::I16($v) => $body,
            Buffer::I8($v) => $body,
            Buffer::U64($v) => $body,
            Buffer::U32($v) => $body,
            Buffer::U16($v) => $body,
            Buffer::U8($v) => $body,
            Buffer::Bool($v) => $body,
        }
    };
}

impl Buffer {
    /// Element type held by this buffer
    pub fn dtype(&self) -> DType {
        match self {
            Self::F64(_) => DType::F64,
            Self::F32(_) => DType::F32,
            Self::I64(_) => DType::I64,
            Self::I32(_) => DType::I32,
            Self::I16(_) => DType::I16,
            Self::I8(_) => DType::I8,
            Self::U64(_) => DType::U64,
            Self::U32(_) => DType::U32,
            Self::U16(_) => DType::U16,
            Self::U8(_) => DType::U8,
            Self::Bool(_) => DType::Bool,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        for_each_buffer!(self, v => v.len())
    }

    /// Whether the buffer holds no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Zero-initialized buffer of `len` elements
    pub fn zeroed(dtype: DType, len: usize) -> Self {
        match dtype {
            DType::F64 => Self::F64(vec![0.0; len]),
            DType::F32 => Self::F32(vec![0.0; len]),
            DType::I64 => Self::I64(vec![0; len]),
            DType::I32 => Self::I32(vec![0; len]),
            DType::I16 => Self::I16(vec![0; len]),
            DType::I8 => Self::I8(vec![0; len]),
            DType::U64 => Self::U64(vec![0; len]),
            DType::U32 => Self::U32(vec![0; len]),
            DType::U16 => Self::U16(vec![0; len]),
            DType::U8 => Self::U8(vec![0; len]),
            DType::Bool => Self::Bool(vec![false; len]),
        }
    }

    /// Decode native-endian bytes into a typed buffer
    ///
    /// `bytes.len()` must be a multiple of the element size. Bool bytes must be
    /// 0 or 1.
    pub fn from_bytes(bytes: &[u8], dtype: DType) -> Result<Self> {
        let elem_size = dtype.size_in_bytes();
        if bytes.len() % elem_size != 0 {
            return Err(Error::InvalidArgument {
                arg: "bytes",
                reason: format!(
                    "length {} is not a multiple of the {dtype} element size {elem_size}",
                    bytes.len()
                ),
            });
        }

        // pod_collect_to_vec copies into a correctly aligned allocation.
        Ok(match dtype {
            DType::F64 => Self::F64(bytemuck::pod_collect_to_vec(bytes)),
            DType::F32 => Self::F32(bytemuck::pod_collect_to_vec(bytes)),
            DType::I64 => Self::I64(bytemuck::pod_collect_to_vec(bytes)),
            DType::I32 => Self::I32(bytemuck::pod_collect_to_vec(bytes)),
            DType::I16 => Self::I16(bytemuck::pod_collect_to_vec(bytes)),
            DType::I8 => Self::I8(bytemuck::pod_collect_to_vec(bytes)),
            DType::U64 => Self::U64(bytemuck::pod_collect_to_vec(bytes)),
            DType::U32 => Self::U32(bytemuck::pod_collect_to_vec(bytes)),
            DType::U16 => Self::U16(bytemuck::pod_collect_to_vec(bytes)),
            DType::U8 => Self::U8(bytes.to_vec()),
            DType::Bool => {
                let mut out = Vec::with_capacity(bytes.len());
                for &b in bytes {
                    match b {
                        0 => out.push(false),
                        1 => out.push(true),
                        _ => {
                            return Err(Error::InvalidArgument {
                                arg: "bytes",
                                reason: format!("byte {b} is not a valid bool"),
                            });
                        }
                    }
                }
                Self::Bool(out)
            }
        })
    }

    /// Encode the buffer as native-endian bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::F64(v) => bytemuck::cast_slice::<_, u8>(v).to_vec(),
            Self::F32(v) => bytemuck::cast_slice::<_, u8>(v).to_vec(),
            Self::I64(v) => bytemuck::cast_slice::<_, u8>(v).to_vec(),
            Self::I32(v) => bytemuck::cast_slice::<_, u8>(v).to_vec(),
            Self::I16(v) => bytemuck::cast_slice::<_, u8>(v).to_vec(),
            Self::I8(v) => bytemuck::cast_slice::<_, u8>(v).to_vec(),
            Self::U64(v) => bytemuck::cast_slice::<_, u8>(v).to_vec(),
            Self::U32(v) => bytemuck::cast_slice::<_, u8>(v).to_vec(),
            Self::U16(v) => bytemuck::cast_slice::<_, u8>(v).to_vec(),
            Self::U8(v) => v.clone(),
            Self::Bool(v) => v.iter().map(|&b| b as u8).collect(),
        }
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for_each_buffer!(self, v => std::fmt::Debug::fmt(v, f))
    }
}

/// Storage for tensor data
///
/// Storage wraps a typed buffer with reference counting, enabling zero-copy
/// views (flatten, reshape) that share the underlying memory.
///
/// Memory is deallocated when the last reference is dropped.
#[derive(Clone)]
pub struct Storage {
    inner: Arc<Buffer>,
}

impl Storage {
    /// Wrap an owned buffer
    pub fn new(buffer: Buffer) -> Self {
        Self {
            inner: Arc::new(buffer),
        }
    }

    /// Create zero-initialized storage of `len` elements
    pub fn zeroed(len: usize, dtype: DType) -> Self {
        Self::new(Buffer::zeroed(dtype, len))
    }

    /// Create storage from a slice, inferring dtype from the element type
    pub fn from_slice<T: Element>(data: &[T]) -> Self {
        Self::new(T::into_buffer(data.to_vec()))
    }

    /// Create storage from an owned vector without copying
    pub fn from_vec<T: Element>(data: Vec<T>) -> Self {
        Self::new(T::into_buffer(data))
    }

    /// Create storage from raw bytes with explicit dtype
    pub fn from_bytes(data: &[u8], dtype: DType) -> Result<Self> {
        Ok(Self::new(Buffer::from_bytes(data, dtype)?))
    }

    /// Borrow the typed buffer
    #[inline]
    pub fn buffer(&self) -> &Buffer {
        &self.inner
    }

    /// Borrow the elements as `&[T]`, or `None` if `T` is not the stored type
    #[inline]
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::slice(&self.inner)
    }

    /// Get the number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if storage is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Get the element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.inner.dtype()
    }

    /// Get size in bytes
    #[inline]
    pub fn size_in_bytes(&self) -> usize {
        self.len() * self.dtype().size_in_bytes()
    }

    /// Get the reference count
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Whether two storages share the same allocation
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("len", &self.len())
            .field("dtype", &self.dtype())
            .field("refs", &Arc::strong_count(&self.inner))
            .finish()
    }
}
