//! Engine configuration.

use std::time::Duration;

use crate::runtime::{CapabilitySet, Limits};

/// Default stack for the evaluation worker thread.
pub const DEFAULT_STACK_SIZE: usize = 256 * 1024 * 1024;

/// Everything a run needs besides its two sources.
///
/// There is no config file; the CLI maps its flags onto the `with_*` builders.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Host globals installed into both evaluation contexts.
    pub capabilities: CapabilitySet,
    /// Per-unit execution limits.
    pub limits: Limits,
    /// Stack size of the worker thread that owns the interpreter.
    pub stack_size: usize,
    /// Seed for `Math.random`; `None` draws one from the OS.
    pub random_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            capabilities: CapabilitySet::standard(),
            limits: Limits::default(),
            stack_size: DEFAULT_STACK_SIZE,
            random_seed: None,
        }
    }
}

impl EngineConfig {
    pub fn with_capabilities(mut self, capabilities: CapabilitySet) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.limits = self.limits.with_time_budget(budget);
        self
    }

    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = stack_size;
        self
    }

    pub fn with_random_seed(mut self, seed: Option<u64>) -> Self {
        self.random_seed = seed;
        self
    }
}
