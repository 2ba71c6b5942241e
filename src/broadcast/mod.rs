//! Broadcasting: shape resolution and strided offset iteration
//!
//! Two rules are supported:
//!
//! - **Trailing alignment** (numpy-style, the default): every input is aligned
//!   to the trailing end of the highest-rank shape. Aligned dimensions must be
//!   equal or one of them must be 1.
//! - **Axis alignment**: for two inputs, the lower-rank shape is aligned
//!   starting at `axis` inside the higher-rank one.
//!
//! When broadcasting is disabled, all shapes must match exactly.
//!
//! [`resolve`] computes the output shape and where each input lands in it;
//! [`BroadcastIter`] then walks one input's buffer in output order without
//! materializing a broadcast copy.

mod iter;
mod resolve;

pub use iter::BroadcastIter;
pub use resolve::{Resolved, broadcast_shape, resolve};

/// Broadcasting options for elementwise operations
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BroadcastConfig {
    /// If false, every input shape must be identical
    pub enabled: bool,
    /// Position in the larger shape where the smaller shape starts aligning.
    /// `None` aligns from the trailing end.
    pub axis: Option<usize>,
}

impl BroadcastConfig {
    /// Numpy-style trailing alignment
    pub const NUMPY: Self = Self {
        enabled: true,
        axis: None,
    };

    /// Exact shape matching only
    pub const DISABLED: Self = Self {
        enabled: false,
        axis: None,
    };

    /// Axis alignment for two inputs
    pub const fn with_axis(axis: usize) -> Self {
        Self {
            enabled: true,
            axis: Some(axis),
        }
    }
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self::NUMPY
    }
}
