//! Operand stack shared by every frame of a continuation

use core_types::{ErrorKind, Value, VmResult};

/// LIFO stack of values
///
/// Popping an empty stack is a fatal `StackUnderflow`; the depth limit is
/// enforced by the dispatch loop, not here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperandStack {
    values: Vec<Value>,
}

impl OperandStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a value
    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    /// Pop the top value
    pub fn pop(&mut self) -> VmResult<Value> {
        self.values.pop().ok_or_else(|| ErrorKind::StackUnderflow.into())
    }

    /// Pop the top value coerced to an integer
    pub fn pop_int(&mut self) -> VmResult<i32> {
        self.pop().map(|v| v.as_int())
    }

    /// Pop the top value coerced to a float
    pub fn pop_float(&mut self) -> VmResult<f32> {
        self.pop().map(|v| v.as_float())
    }

    /// Borrow the top value
    pub fn peek(&self) -> VmResult<&Value> {
        self.values.last().ok_or_else(|| ErrorKind::StackUnderflow.into())
    }

    /// Number of values on the stack
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the stack is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop everything above `height`
    pub fn truncate(&mut self, height: usize) {
        self.values.truncate(height);
    }

    /// Remove every value
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Values from bottom to top
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }
}

impl From<Vec<Value>> for OperandStack {
    fn from(values: Vec<Value>) -> Self {
        Self { values }
    }
}
