//! Engine configuration
//!
//! Controls how elementwise kernels schedule work. Configuration never changes
//! results: serial and parallel execution write identical outputs.

use std::env;

/// Environment variable overriding [`EngineConfig::parallel_min_len`]
pub const ENV_PARALLEL_MIN_LEN: &str = "TENSORWISE_PARALLEL_MIN_LEN";

/// Environment variable overriding [`EngineConfig::parallel`] ("0"/"false" disables)
pub const ENV_PARALLEL: &str = "TENSORWISE_PARALLEL";

/// Default output size from which kernels split work across threads
pub const DEFAULT_PARALLEL_MIN_LEN: usize = 1 << 15;

/// Execution settings for an [`Engine`](crate::engine::Engine)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Allow data-parallel execution (only effective with the `rayon` feature)
    pub parallel: bool,
    /// Minimum output element count before work is split across threads
    pub parallel_min_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_min_len: DEFAULT_PARALLEL_MIN_LEN,
        }
    }
}

impl EngineConfig {
    /// Defaults with overrides from `TENSORWISE_PARALLEL` and
    /// `TENSORWISE_PARALLEL_MIN_LEN`
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = env::var(ENV_PARALLEL) {
            match parse_flag(&raw) {
                Some(flag) => config.parallel = flag,
                None => tracing::warn!(var = ENV_PARALLEL, value = %raw, "ignoring invalid flag"),
            }
        }

        if let Ok(raw) = env::var(ENV_PARALLEL_MIN_LEN) {
            match raw.trim().parse::<usize>() {
                Ok(n) => config.parallel_min_len = n,
                Err(_) => {
                    tracing::warn!(var = ENV_PARALLEL_MIN_LEN, value = %raw, "ignoring invalid length")
                }
            }
        }

        config
    }

    /// Serial execution only
    pub fn serial() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Set whether parallel execution is allowed
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the minimum output length for parallel execution
    pub fn with_parallel_min_len(mut self, len: usize) -> Self {
        self.parallel_min_len = len;
        self
    }

    /// Whether an output of `len` elements should be split across threads
    #[inline]
    pub fn should_parallelize(&self, len: usize) -> bool {
        cfg!(feature = "rayon") && self.parallel && len >= self.parallel_min_len.max(2)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
