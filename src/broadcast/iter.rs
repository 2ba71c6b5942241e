//! Broadcast offset iteration

use crate::error::{Error, Result};
use crate::tensor::{Layout, Shape, Strides, checked_numel, contiguous_strides};
use smallvec::SmallVec;
use std::iter::FusedIterator;

/// Lazy sequence of input buffer offsets, one per output element
///
/// Offsets are produced in row-major output order (last dimension fastest).
/// Along a dimension where the input has size 1, or which lies outside the
/// input's aligned window, the stride is 0 and the same input element is
/// reused. Memory use is O(rank) regardless of output size.
///
/// The iterator is `Clone`, so a traversal can be restarted from any copy, and
/// [`starting_at`](Self::starting_at) positions it mid-sequence so workers can
/// split the output range.
///
/// # Example
///
/// ```
/// use tensorwise::broadcast::BroadcastIter;
///
/// // (3, 1) broadcast across (3, 2)
/// let offsets: Vec<usize> = BroadcastIter::new(&[3, 1], &[3, 2], 0).unwrap().collect();
/// assert_eq!(offsets, vec![0, 0, 1, 1, 2, 2]);
/// ```
#[derive(Clone, Debug)]
pub struct BroadcastIter {
    shape: Shape,
    strides: Strides,
    base: isize,
    coords: SmallVec<[usize; 4]>,
    offset: isize,
    pos: usize,
    len: usize,
}

impl BroadcastIter {
    /// Create an iterator reading a contiguous `input_shape` buffer in
    /// `output_shape` order, with the input's first dimension aligned at
    /// output dimension `align`
    ///
    /// Fails with `ShapeMismatch` if the input does not broadcast into the
    /// output, or `InvalidArgument` if the output element count overflows.
    pub fn new(input_shape: &[usize], output_shape: &[usize], align: usize) -> Result<Self> {
        if checked_numel(output_shape).is_none() {
            return Err(Error::numel_overflow(output_shape));
        }
        let layout = Layout::contiguous(input_shape)
            .broadcast_to(output_shape, align)
            .ok_or_else(|| Error::shape_mismatch(input_shape, output_shape))?;
        Ok(Self::from_layout(&layout))
    }

    /// Create an iterator over an already broadcast layout
    pub fn from_layout(layout: &Layout) -> Self {
        let shape = Shape::from(layout.shape());
        let len = shape.numel();
        let base = layout.offset() as isize;
        Self {
            coords: SmallVec::from_elem(0, shape.len()),
            strides: layout.strides().iter().copied().collect(),
            shape,
            base,
            offset: base,
            pos: 0,
            len,
        }
    }

    /// Position the iterator so the next offset is that of output index `start`
    pub fn starting_at(mut self, start: usize) -> Self {
        let start = start.min(self.len);
        self.pos = start;
        self.offset = self.base;

        if start < self.len {
            let mut rem = start;
            for d in (0..self.shape.len()).rev() {
                let c = rem % self.shape[d];
                rem /= self.shape[d];
                self.coords[d] = c;
                self.offset += c as isize * self.strides[d];
            }
        }
        self
    }

    /// Rewind to the first output element
    pub fn reset(&mut self) {
        self.coords.iter_mut().for_each(|c| *c = 0);
        self.offset = self.base;
        self.pos = 0;
    }

    /// Input offset of output index `index`, computed directly
    pub fn offset_of(&self, index: usize) -> usize {
        if self.len == 0 {
            return self.base as usize;
        }

        let mut rem = index;
        let mut offset = self.base;
        for d in (0..self.shape.len()).rev() {
            offset += (rem % self.shape[d]) as isize * self.strides[d];
            rem /= self.shape[d];
        }
        offset as usize
    }

    /// Output shape being traversed
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Per-dimension input strides over the output shape (0 = broadcast)
    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Whether offsets are simply `0, 1, 2, ...` (no broadcasting at all)
    pub fn is_identity(&self) -> bool {
        let expected = contiguous_strides(&self.shape);
        self.base == 0
            && self
                .shape
                .iter()
                .zip(self.strides.iter().zip(expected.iter()))
                .all(|(&dim, (&st, &ex))| dim <= 1 || st == ex)
    }
}

impl Iterator for BroadcastIter {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.pos >= self.len {
            return None;
        }

        let current = self.offset as usize;
        self.pos += 1;

        // Carry through dimensions, updating the offset incrementally
        for d in (0..self.shape.len()).rev() {
            self.coords[d] += 1;
            self.offset += self.strides[d];
            if self.coords[d] < self.shape[d] {
                break;
            }
            self.coords[d] = 0;
            self.offset -= self.shape[d] as isize * self.strides[d];
        }

        Some(current)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BroadcastIter {}

impl FusedIterator for BroadcastIter {}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(input: &[usize], output: &[usize], align: usize) -> Vec<usize> {
        BroadcastIter::new(input, output, align).unwrap().collect()
    }

    #[test]
    fn test_identity() {
        let it = BroadcastIter::new(&[2, 3], &[2, 3], 0).unwrap();
        assert!(it.is_identity());
        assert_eq!(it.collect::<Vec<_>>(), (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn test_identity_with_unit_dims() {
        let it = BroadcastIter::new(&[3, 1], &[3, 1], 0).unwrap();
        assert!(it.is_identity());
        assert!(!BroadcastIter::new(&[3, 1], &[3, 2], 0).unwrap().is_identity());
    }

    #[test]
    fn test_column_stretch() {
        assert_eq!(offsets(&[3, 1], &[3, 3], 0), [0, 0, 0, 1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn test_row_stretch() {
        assert_eq!(offsets(&[3], &[2, 3], 1), [0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_axis_zero_alignment() {
        assert_eq!(offsets(&[3], &[3, 3], 0), [0, 0, 0, 1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn test_middle_window() {
        // (3,) at axis 1 of (2, 3, 2)
        assert_eq!(
            offsets(&[3], &[2, 3, 2], 1),
            [0, 0, 1, 1, 2, 2, 0, 0, 1, 1, 2, 2]
        );
    }

    #[test]
    fn test_scalar_input() {
        assert_eq!(offsets(&[], &[2, 2], 2), [0, 0, 0, 0]);
        assert_eq!(offsets(&[], &[], 0), [0]);
    }

    #[test]
    fn test_zero_sized_output() {
        let it = BroadcastIter::new(&[1, 3], &[0, 3], 0).unwrap();
        assert_eq!(it.len(), 0);
        assert_eq!(it.collect::<Vec<_>>(), Vec::<usize>::new());
    }

    #[test]
    fn test_huge_empty_output() {
        let huge = 1usize << 40;
        let it = BroadcastIter::new(&[huge, 1, 0], &[huge, huge, 0], 0).unwrap();
        assert_eq!(it.len(), 0);
        assert_eq!(it.offset_of(0), 0);
        assert!(it.clone().starting_at(5).next().is_none());
    }

    #[test]
    fn test_overflowing_output() {
        let huge = 1usize << 40;
        assert!(matches!(
            BroadcastIter::new(&[huge, 1], &[huge, huge], 0),
            Err(Error::InvalidArgument { arg: "shape", .. })
        ));
    }

    #[test]
    fn test_incompatible() {
        assert!(BroadcastIter::new(&[2], &[3], 0).is_err());
        assert!(BroadcastIter::new(&[2, 2], &[2], 0).is_err());
    }

    #[test]
    fn test_restartable() {
        let it = BroadcastIter::new(&[2, 1], &[2, 4], 0).unwrap();
        let first: Vec<usize> = it.clone().collect();
        let second: Vec<usize> = it.collect();
        assert_eq!(first, second);

        let mut it = BroadcastIter::new(&[2, 1], &[2, 4], 0).unwrap();
        it.by_ref().take(5).for_each(drop);
        it.reset();
        assert_eq!(it.len(), 8);
        assert_eq!(it.next(), Some(0));
    }

    #[test]
    fn test_starting_at_matches_full_traversal() {
        let it = BroadcastIter::new(&[3, 1, 4], &[2, 3, 5, 4], 1).unwrap();
        let full: Vec<usize> = it.clone().collect();
        for start in [0, 1, 7, 20, 59, 119, 120] {
            let tail: Vec<usize> = it.clone().starting_at(start).collect();
            assert_eq!(tail, full[start..], "start = {start}");
        }
    }

    #[test]
    fn test_offsets_match_layout_index() {
        let output = [2, 3, 4];
        let layout = Layout::contiguous(&[3, 1]).broadcast_to(&output, 1).unwrap();
        let it = BroadcastIter::from_layout(&layout);

        let mut coords = [0usize; 3];
        for (i, offset) in it.clone().enumerate() {
            assert_eq!(layout.index(&coords), Some(offset), "coords {coords:?}");
            assert_eq!(it.offset_of(i), offset);
            for d in (0..output.len()).rev() {
                coords[d] += 1;
                if coords[d] < output[d] {
                    break;
                }
                coords[d] = 0;
            }
        }
    }

    #[test]
    fn test_offset_of() {
        let it = BroadcastIter::new(&[3, 1], &[2, 3, 4], 1).unwrap();
        let full: Vec<usize> = it.clone().collect();
        for (i, &o) in full.iter().enumerate() {
            assert_eq!(it.offset_of(i), o);
        }
    }
}
