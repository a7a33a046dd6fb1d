//! Engine limits

use serde::Deserialize;

/// Limits enforced by both engines
///
/// Deserialises from a partial document; missing fields keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VmConfig {
    /// Maximum number of frames on a call stack
    pub max_call_depth: usize,
    /// Maximum number of values on the operand stack
    pub max_stack_depth: usize,
    /// Maximum restarts honoured within one `execute` call
    pub max_restarts: usize,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 256,
            max_stack_depth: 4096,
            max_restarts: 1024,
        }
    }
}

impl VmConfig {
    /// Default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the call depth limit
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Set the operand stack limit
    pub fn with_max_stack_depth(mut self, depth: usize) -> Self {
        self.max_stack_depth = depth;
        self
    }

    /// Set the restart limit
    pub fn with_max_restarts(mut self, restarts: usize) -> Self {
        self.max_restarts = restarts;
        self
    }
}
