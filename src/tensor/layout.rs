//! Layout: shape, strides, and offset for tensor memory layout

use super::shape::{STACK_DIMS, Shape, checked_numel};
use smallvec::SmallVec;
use std::fmt;

/// Strides type: element offsets between consecutive elements along each dimension
/// NOTE: Strides are in ELEMENTS, not bytes. A stride of 0 marks a broadcast dimension.
pub type Strides = SmallVec<[isize; STACK_DIMS]>;

/// Layout describes how a shape maps onto a flat buffer
///
/// Address of element at indices [i0, i1, ..., in]:
///   offset + i0 * strides[0] + i1 * strides[1] + ... + in * strides[n]
///
/// Tensors own contiguous row-major layouts. Broadcast layouts (with zero
/// strides) are only produced transiently by [`Layout::broadcast_to`] to drive
/// iteration.
#[derive(Clone, PartialEq, Eq)]
pub struct Layout {
    shape: Shape,
    strides: Strides,
    offset: usize,
}

impl Layout {
    /// Create a new contiguous (row-major/C-order) layout from a shape
    ///
    /// # Example
    /// ```
    /// use tensorwise::tensor::Layout;
    /// let layout = Layout::contiguous(&[2, 3, 4]);
    /// assert_eq!(layout.shape(), &[2, 3, 4]);
    /// assert_eq!(layout.strides(), &[12, 4, 1]);
    /// ```
    pub fn contiguous(shape: &[usize]) -> Self {
        Self {
            shape: Shape::from(shape),
            strides: contiguous_strides(shape),
            offset: 0,
        }
    }

    /// Create a scalar (0-dimensional) layout
    pub fn scalar() -> Self {
        Self {
            shape: Shape::scalar(),
            strides: Strides::new(),
            offset: 0,
        }
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Get the strides
    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Get the offset
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of dimensions (rank)
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.shape.numel()
    }

    /// Check if the tensor is a scalar (0 dimensions)
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    /// Check if memory is contiguous (row-major order)
    pub fn is_contiguous(&self) -> bool {
        self.offset == 0 && self.strides == contiguous_strides(&self.shape)
    }

    /// Compute the linear index (element offset) for given indices
    pub fn index(&self, indices: &[usize]) -> Option<usize> {
        if indices.len() != self.ndim() {
            return None;
        }

        if indices.iter().zip(self.shape.iter()).any(|(i, d)| i >= d) {
            return None;
        }

        let mut linear = self.offset as isize;
        for (&idx, &stride) in indices.iter().zip(self.strides.iter()) {
            linear += idx as isize * stride;
        }

        Some(linear as usize)
    }

    /// Create a reshaped layout (if contiguous)
    ///
    /// Returns None if the layout is not contiguous or element counts differ
    pub fn reshape(&self, new_shape: &[usize]) -> Option<Self> {
        if !self.is_contiguous() {
            return None;
        }

        if checked_numel(new_shape) != Some(self.elem_count()) {
            return None;
        }

        Some(Self::contiguous(new_shape))
    }

    /// Create a broadcast layout over a target shape
    ///
    /// This layout's dimensions are placed at `target[align..align + ndim]`.
    /// Target dimensions outside that window, and size-1 dimensions stretched
    /// to a larger target size, get stride 0 so every coordinate along them
    /// reads the same element.
    ///
    /// Returns None if the window does not fit or a dimension is incompatible.
    pub fn broadcast_to(&self, target: &[usize], align: usize) -> Option<Self> {
        if align + self.ndim() > target.len() {
            return None;
        }

        let mut strides = Strides::from_elem(0, target.len());
        for (i, (&s, &st)) in self.shape.iter().zip(self.strides.iter()).enumerate() {
            let t = target[align + i];
            if s == t {
                // A size-1 dimension has nothing to step over
                strides[align + i] = if s > 1 { st } else { 0 };
            } else if s != 1 {
                return None;
            }
        }

        Some(Self {
            shape: Shape::from(target),
            strides,
            offset: self.offset,
        })
    }
}

/// Compute contiguous strides for a given shape (row-major order)
pub fn contiguous_strides(shape: &[usize]) -> Strides {
    let mut strides = Strides::from_elem(0, shape.len());
    let mut stride = 1isize;

    // Saturating: past a zero-sized dimension the stride is never applied
    for (s, &dim) in strides.iter_mut().zip(shape.iter()).rev() {
        *s = stride;
        stride = stride.saturating_mul(dim as isize);
    }

    strides
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Layout {{ shape: {:?}, strides: {:?}, offset: {} }}",
            self.shape.as_slice(),
            self.strides.as_slice(),
            self.offset
        )
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.shape)
    }
}
