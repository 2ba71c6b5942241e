//! # tensorwise
//!
//! **Elementwise tensor arithmetic with numpy-style broadcasting.**
//!
//! tensorwise computes `add`, `sub`, `mul`, `div`, `reciprocal` and n-ary `sum`
//! over host-memory tensors of any shape, aligning mismatched shapes by
//! broadcasting instead of materializing stretched copies.
//!
//! ## Features
//!
//! - **Broadcasting**: trailing (numpy) alignment, explicit axis alignment for
//!   two inputs, or exact shape matching
//! - **Element types**: f64, f32, signed and unsigned 8-64 bit integers; bool
//!   tensors can be stored, flattened and declared but not computed on
//! - **Kernel declarations**: an immutable table of operator type constraints
//!   for external registration frameworks
//! - **Name-based invocation**: `execute("Add", inputs, attrs)`
//!
//! ## Quick Start
//!
//! ```
//! use tensorwise::prelude::*;
//!
//! let a = Tensor::from_slice(&[1.0f32, 2.0, 3.0], &[3, 1]);
//! let b = Tensor::from_slice(&[1.0f32, 1.0, 1.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0], &[3, 3]);
//!
//! let c = Engine::default().add(&a, &b)?;
//! assert_eq!(c.shape(), &[3, 3]);
//! assert_eq!(c.to_vec::<f32>(), vec![2.0, 2.0, 2.0, 4.0, 4.0, 4.0, 6.0, 6.0, 6.0]);
//! # Ok::<(), tensorwise::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): split large outputs across threads
//!
//! ## Logging
//!
//! The crate emits [`tracing`] spans and events (`debug` around dispatch,
//! `trace` for resolved shapes). It never installs a subscriber.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod broadcast;
pub mod config;
pub mod dtype;
pub mod engine;
pub mod error;
pub mod ops;
pub mod registry;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::broadcast::BroadcastConfig;
    pub use crate::config::EngineConfig;
    pub use crate::dtype::{DType, Element};
    pub use crate::engine::Engine;
    pub use crate::error::{Error, Result};
    pub use crate::ops::{Attributes, ElementwiseOp, ElementwiseOps, execute};
    pub use crate::tensor::{Layout, Shape, Tensor};
}
