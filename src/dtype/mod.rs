//! Data type system for tensorwise tensors
//!
//! This module provides the `DType` enum representing all supported element types,
//! the `DTypeSet` bitset used by the kernel declaration table, and the `Element`
//! trait that binds Rust primitives to their runtime dtype.

mod element;

pub use element::{Element, Numeric};

use std::fmt;

// ============================================================================
// DType Enum
// ============================================================================

/// Element types supported by tensorwise tensors
///
/// Every tensor carries exactly one `DType` for its entire lifetime.
///
/// # Discriminant Values (Serialization Stability)
///
/// - Floats: 0-9 (F64=0, F32=1)
/// - Signed ints: 10-19 (I64=10, I32=11, I16=12, I8=13)
/// - Unsigned ints: 20-29 (U64=20, U32=21, U16=22, U8=23)
/// - Bool: 30
///
/// Existing values are never changed; `DTypeSet` relies on them staying below 64.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum DType {
    /// 64-bit floating point
    F64 = 0,
    /// 32-bit floating point
    F32 = 1,

    /// 64-bit signed integer
    I64 = 10,
    /// 32-bit signed integer
    I32 = 11,
    /// 16-bit signed integer
    I16 = 12,
    /// 8-bit signed integer
    I8 = 13,

    /// 64-bit unsigned integer
    U64 = 20,
    /// 32-bit unsigned integer
    U32 = 21,
    /// 16-bit unsigned integer
    U16 = 22,
    /// 8-bit unsigned integer
    U8 = 23,

    /// Boolean type (one byte per element)
    Bool = 30,
}

impl DType {
    /// Every dtype, in discriminant order
    pub const ALL: [DType; 11] = [
        Self::F64,
        Self::F32,
        Self::I64,
        Self::I32,
        Self::I16,
        Self::I8,
        Self::U64,
        Self::U32,
        Self::U16,
        Self::U8,
        Self::Bool,
    ];

    /// Size of one element in bytes
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::F64 | Self::I64 | Self::U64 => 8,
            Self::F32 | Self::I32 | Self::U32 => 4,
            Self::I16 | Self::U16 => 2,
            Self::I8 | Self::U8 | Self::Bool => 1,
        }
    }

    /// Returns true if this is a floating point type
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F64 | Self::F32)
    }

    /// Returns true if this is a signed integer type
    #[inline]
    pub const fn is_signed_int(self) -> bool {
        matches!(self, Self::I64 | Self::I32 | Self::I16 | Self::I8)
    }

    /// Returns true if this is an unsigned integer type
    #[inline]
    pub const fn is_unsigned_int(self) -> bool {
        matches!(self, Self::U64 | Self::U32 | Self::U16 | Self::U8)
    }

    /// Returns true if this is any integer type (signed or unsigned)
    #[inline]
    pub const fn is_int(self) -> bool {
        self.is_signed_int() || self.is_unsigned_int()
    }

    /// Returns true if this is a boolean type
    #[inline]
    pub const fn is_bool(self) -> bool {
        matches!(self, Self::Bool)
    }

    /// Returns true if arithmetic kernels exist for this type
    #[inline]
    pub const fn is_numeric(self) -> bool {
        self.is_float() || self.is_int()
    }

    /// Short name for display (e.g., "f32", "i64")
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::F64 => "f64",
            Self::F32 => "f32",
            Self::I64 => "i64",
            Self::I32 => "i32",
            Self::I16 => "i16",
            Self::I8 => "i8",
            Self::U64 => "u64",
            Self::U32 => "u32",
            Self::U16 => "u16",
            Self::U8 => "u8",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// Set of dtypes for efficient membership testing
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct DTypeSet {
    bits: u64,
}

impl DTypeSet {
    /// Empty set
    pub const EMPTY: Self = Self { bits: 0 };

    /// All floating point types
    pub const FLOATS: Self = Self {
        bits: (1 << DType::F64 as u8) | (1 << DType::F32 as u8),
    };

    /// All signed integer types
    pub const SIGNED_INTS: Self = Self {
        bits: (1 << DType::I64 as u8)
            | (1 << DType::I32 as u8)
            | (1 << DType::I16 as u8)
            | (1 << DType::I8 as u8),
    };

    /// All unsigned integer types
    pub const UNSIGNED_INTS: Self = Self {
        bits: (1 << DType::U64 as u8)
            | (1 << DType::U32 as u8)
            | (1 << DType::U16 as u8)
            | (1 << DType::U8 as u8),
    };

    /// All integer types
    pub const INTS: Self = Self {
        bits: Self::SIGNED_INTS.bits | Self::UNSIGNED_INTS.bits,
    };

    /// All numeric types (floats + ints)
    pub const NUMERIC: Self = Self {
        bits: Self::FLOATS.bits | Self::INTS.bits,
    };

    /// Every supported type, bool included
    pub const ALL: Self = Self {
        bits: Self::NUMERIC.bits | (1 << DType::Bool as u8),
    };

    /// Create a set containing a single dtype
    #[inline]
    pub const fn single(dtype: DType) -> Self {
        Self {
            bits: 1 << dtype as u8,
        }
    }

    /// Create a set from a list of dtypes
    pub const fn of(dtypes: &[DType]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < dtypes.len() {
            bits |= 1 << dtypes[i] as u8;
            i += 1;
        }
        Self { bits }
    }

    /// Check if the set contains a dtype
    #[inline]
    pub const fn contains(self, dtype: DType) -> bool {
        self.bits & (1 << dtype as u8) != 0
    }

    /// Union of two sets
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Intersection of two sets
    #[inline]
    pub const fn intersection(self, other: Self) -> Self {
        Self {
            bits: self.bits & other.bits,
        }
    }

    /// Check if set is empty
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Number of dtypes in the set
    #[inline]
    pub const fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Iterate the contained dtypes in discriminant order
    pub fn iter(self) -> impl Iterator<Item = DType> {
        DType::ALL.into_iter().filter(move |&d| self.contains(d))
    }
}

impl From<DType> for DTypeSet {
    fn from(dtype: DType) -> Self {
        Self::single(dtype)
    }
}

impl fmt::Debug for DTypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// `f32` for a single dtype, `one of {f64, f32}` otherwise
impl fmt::Display for DTypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.len() == 1 {
            if let Some(dtype) = self.iter().next() {
                return write!(f, "{dtype}");
            }
        }

        f.write_str("one of {")?;
        for (i, dtype) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{dtype}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_size() {
        assert_eq!(DType::F64.size_in_bytes(), 8);
        assert_eq!(DType::F32.size_in_bytes(), 4);
        assert_eq!(DType::I16.size_in_bytes(), 2);
        assert_eq!(DType::U8.size_in_bytes(), 1);
        assert_eq!(DType::Bool.size_in_bytes(), 1);
    }

    #[test]
    fn test_dtype_categories() {
        assert!(DType::F32.is_float());
        assert!(!DType::I32.is_float());
        assert!(DType::I32.is_signed_int());
        assert!(DType::U32.is_unsigned_int());
        assert!(!DType::Bool.is_numeric());
        assert!(DType::U16.is_numeric());
    }

    #[test]
    fn test_dtype_set() {
        assert!(DTypeSet::FLOATS.contains(DType::F32));
        assert!(!DTypeSet::FLOATS.contains(DType::I32));
        assert!(DTypeSet::INTS.contains(DType::I32));
        assert!(DTypeSet::NUMERIC.contains(DType::F32));
        assert!(!DTypeSet::NUMERIC.contains(DType::Bool));
        assert!(DTypeSet::ALL.contains(DType::Bool));
        assert!(DTypeSet::EMPTY.is_empty());
    }

    #[test]
    fn test_dtype_set_of() {
        let set = DTypeSet::of(&[DType::I64, DType::F32]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![DType::F32, DType::I64]);
        assert_eq!(set.intersection(DTypeSet::INTS), DTypeSet::single(DType::I64));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_dtype_set_display() {
        assert_eq!(DTypeSet::from(DType::I64).to_string(), "i64");
        assert_eq!(DTypeSet::FLOATS.to_string(), "one of {f64, f32}");
        assert_eq!(DTypeSet::EMPTY.to_string(), "one of {}");
    }
}
