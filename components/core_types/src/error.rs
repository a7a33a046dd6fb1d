//! Fatal execution faults.
//!
//! Every fault listed here aborts the continuation that raised it and is
//! propagated to the host. Suspend and restart are not faults; they travel
//! through the interpreter's own outcome types.

use crate::StackFrame;
use thiserror::Error;

/// The kind of fatal fault.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    /// An opcode tag with no assigned instruction
    #[error("unknown opcode tag {tag:#04x} at offset {offset}")]
    UnknownOpcode {
        /// The offending tag byte
        tag: u8,
        /// Offset of the tag within the instruction stream
        offset: usize,
    },
    /// A literal value tag with no assigned value kind
    #[error("unknown literal tag {tag:#04x} at offset {offset}")]
    UnknownLiteral {
        /// The offending tag byte
        tag: u8,
        /// Offset of the tag within the instruction stream
        offset: usize,
    },
    /// An instruction whose operands run past the end of the stream
    #[error("truncated instruction at offset {offset}")]
    TruncatedInstruction {
        /// Offset of the instruction start
        offset: usize,
    },
    /// A literal string that is not valid UTF-8
    #[error("invalid string literal at offset {offset}")]
    InvalidString {
        /// Offset of the literal start
        offset: usize,
    },
    /// A jump, call or entry target outside the instruction stream
    #[error("address {address} is outside the instruction stream (length {len})")]
    AddressOutOfRange {
        /// The target address
        address: usize,
        /// Length of the instruction stream
        len: usize,
    },
    /// Pop or peek on an empty operand stack
    #[error("operand stack underflow")]
    StackUnderflow,
    /// Operand stack grew past the configured limit
    #[error("operand stack exceeded {0} values")]
    StackOverflow(usize),
    /// Call stack grew past the configured limit
    #[error("call stack exceeded {0} frames")]
    CallStackOverflow(usize),
    /// A verb id that the verb table does not know
    #[error("unknown verb id {0}")]
    UnknownVerb(i32),
    /// An effective memory address outside the bound memory space
    #[error("memory address {address} out of range (size {size})")]
    MemoryOutOfRange {
        /// Effective address (base plus index)
        address: i64,
        /// Size of the memory space
        size: usize,
    },
    /// A frame without a bound memory space tried to address memory
    #[error("frame has no bound memory space")]
    NoMemory,
    /// Integer division or modulus by zero
    #[error("integer division by zero")]
    DivisionByZero,
    /// A message name the script does not export
    #[error("script does not export message '{0}'")]
    UnknownMessage(String),
    /// Restart was raised more often than the configured limit allows
    #[error("restart limit of {0} exceeded")]
    RestartLimit(usize),
    /// A verb rejected its operands
    #[error("verb '{verb}' failed: {message}")]
    Verb {
        /// Name of the verb
        verb: String,
        /// Human-readable reason
        message: String,
    },
}

/// A fatal fault with the call stack at the time it was raised.
///
/// # Examples
///
/// ```
/// use core_types::{ErrorKind, StackFrame, VmError};
///
/// let error = VmError::new(ErrorKind::UnknownVerb(7)).with_stack(vec![StackFrame {
///     script: "switch.cog".to_string(),
///     position: 12,
/// }]);
///
/// assert_eq!(error.kind, ErrorKind::UnknownVerb(7));
/// assert_eq!(error.stack.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct VmError {
    /// The type of fault
    pub kind: ErrorKind,
    /// Call stack snapshot, innermost frame last
    pub stack: Vec<StackFrame>,
}

impl VmError {
    /// Create a fault without stack information.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            stack: Vec::new(),
        }
    }

    /// Create a verb failure.
    pub fn verb(verb: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Verb {
            verb: verb.into(),
            message: message.into(),
        })
    }

    /// Attach a call stack snapshot. An existing snapshot is kept.
    pub fn with_stack(mut self, stack: Vec<StackFrame>) -> Self {
        if self.stack.is_empty() {
            self.stack = stack;
        }
        self
    }

    /// Render the stack snapshot, innermost frame first.
    pub fn backtrace(&self) -> String {
        let mut trace = String::new();
        for (i, frame) in self.stack.iter().rev().enumerate() {
            trace.push_str(&format!("\n  #{}: {}", i, frame));
        }
        trace
    }
}

impl From<ErrorKind> for VmError {
    fn from(kind: ErrorKind) -> Self {
        VmError::new(kind)
    }
}

/// Result alias used throughout the virtual machine.
pub type VmResult<T> = Result<T, VmError>;
