//! Control signals between verbs, the dispatch loop and the host

use core_types::Value;

/// What a resumable verb asks the dispatch loop to do next
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Finished normally; the value is pushed when the call site expects one
    Return(Value),
    /// Stop now and hand the continuation back to the host
    Suspend,
    /// Re-enter the dispatch loop against the (possibly mutated) continuation
    Restart,
}

impl From<Value> for Flow {
    fn from(value: Value) -> Self {
        Flow::Return(value)
    }
}

/// How a call to the resumable engine ended
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    /// The outermost frame returned this value
    Completed(Value),
    /// A verb suspended; the value is the top frame's return register at
    /// that moment and may be stale
    Suspended(Value),
}

impl ExecutionResult {
    /// The reported return register, whichever way execution ended
    pub fn value(&self) -> &Value {
        match self {
            ExecutionResult::Completed(v) | ExecutionResult::Suspended(v) => v,
        }
    }

    /// Consume into the reported value
    pub fn into_value(self) -> Value {
        match self {
            ExecutionResult::Completed(v) | ExecutionResult::Suspended(v) => v,
        }
    }

    /// Whether execution reached the end of the outermost frame
    pub fn is_completed(&self) -> bool {
        matches!(self, ExecutionResult::Completed(_))
    }

    /// Whether the continuation can be resumed
    pub fn is_suspended(&self) -> bool {
        matches!(self, ExecutionResult::Suspended(_))
    }
}
