//! Execution engine

use crate::broadcast::BroadcastConfig;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::ops::{self, Attributes, ElementwiseOp, ElementwiseOps};
use crate::tensor::Tensor;

/// Runs elementwise operations under one [`EngineConfig`]
///
/// The engine is a small `Copy` value; it holds no buffers or threads of its
/// own. Parallel execution uses rayon's global pool.
///
/// # Example
///
/// ```
/// use tensorwise::prelude::*;
///
/// let engine = Engine::new(EngineConfig::serial());
/// let a = Tensor::from_slice(&[1i32, 2, 3], &[3]);
/// let b = Tensor::scalar(10i32);
/// assert_eq!(engine.mul(&a, &b)?.to_vec::<i32>(), vec![10, 20, 30]);
/// # Ok::<(), tensorwise::error::Error>(())
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create an engine with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Create an engine configured from the environment
    ///
    /// See [`EngineConfig::from_env`].
    pub fn from_env() -> Self {
        Self::new(EngineConfig::from_env())
    }

    /// The engine's configuration
    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run a named operator; see [`ops::execute_with`]
    pub fn execute(&self, op_name: &str, inputs: &[&Tensor], attrs: &Attributes) -> Result<Tensor> {
        ops::execute_with(&self.config, op_name, inputs, attrs)
    }
}

impl ElementwiseOps for Engine {
    fn elementwise(
        &self,
        op: ElementwiseOp,
        inputs: &[&Tensor],
        broadcast: BroadcastConfig,
    ) -> Result<Tensor> {
        ops::elementwise(op, inputs, broadcast, &self.config)
    }
}
