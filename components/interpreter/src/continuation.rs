//! Continuations
//!
//! The complete, owned state of one logical execution: a call stack with the
//! innermost frame on top, and the operand stack all of its frames share. A
//! suspended continuation is inert data; resuming it means handing it back
//! to [`crate::VirtualMachine::execute`].

use crate::call_frame::CallFrame;
use crate::stack::OperandStack;
use core_types::StackFrame;

/// Call stack plus operand stack
#[derive(Debug, Clone, Default)]
pub struct Continuation {
    /// Active frames, innermost last
    pub call_stack: Vec<CallFrame>,
    /// Operand stack shared by all frames
    pub data_stack: OperandStack,
}

impl Continuation {
    /// Continuation with `frame` as its only frame
    pub fn new(frame: CallFrame) -> Self {
        let mut cc = Self::default();
        cc.push_frame(frame);
        cc
    }

    /// Innermost frame
    pub fn frame(&self) -> Option<&CallFrame> {
        self.call_stack.last()
    }

    /// Innermost frame, mutably
    pub fn frame_mut(&mut self) -> Option<&mut CallFrame> {
        self.call_stack.last_mut()
    }

    /// Enter a new frame, recording the current operand-stack height in it
    pub fn push_frame(&mut self, mut frame: CallFrame) {
        frame.stack_height = self.data_stack.len();
        self.call_stack.push(frame);
    }

    /// Leave the innermost frame
    pub fn pop_frame(&mut self) -> Option<CallFrame> {
        self.call_stack.pop()
    }

    /// Number of active frames
    pub fn depth(&self) -> usize {
        self.call_stack.len()
    }

    /// True once the outermost frame has returned
    pub fn is_finished(&self) -> bool {
        self.call_stack.is_empty()
    }

    /// Diagnostic snapshot, outermost frame first
    pub fn snapshot(&self) -> Vec<StackFrame> {
        self.call_stack.iter().map(CallFrame::trace).collect()
    }
}
