//! Call frames
//!
//! One frame per active invocation: which script is running, where it is,
//! which memory it addresses, and the registers a message handler sees.

use crate::memory::MemoryHandle;
use bytecode_system::{Address, Script};
use core_types::{StackFrame, Value};
use std::rc::Rc;

/// Number of parameter registers per frame
pub const PARAM_COUNT: usize = 4;

/// Call frame representing one invocation
#[derive(Debug, Clone)]
pub struct CallFrame {
    /// Script whose program this frame executes
    pub script: Rc<Script>,
    /// Bound memory space; `None` for frames run against the transient heap
    pub memory: Option<MemoryHandle>,
    /// Offset of the next instruction to execute
    pub program_counter: Address,
    /// Who triggered this invocation
    pub sender: Value,
    /// What object the invocation acts on
    pub source: Value,
    /// Read-only parameter registers
    pub params: [Value; PARAM_COUNT],
    /// Value handed back to the caller or host on return; `None` until
    /// something writes it
    return_register: Option<Value>,
    /// Copy the return register into the caller's on return
    pub save_return_register: bool,
    /// Push the return register onto the operand stack on return
    pub push_return_register: bool,
    /// Operand-stack height when the frame was entered
    pub stack_height: usize,
}

impl CallFrame {
    /// Create a frame entering `script` at `program_counter`
    pub fn new(script: Rc<Script>, program_counter: Address) -> Self {
        Self {
            script,
            memory: None,
            program_counter,
            sender: Value::Void,
            source: Value::Void,
            params: Default::default(),
            return_register: None,
            save_return_register: false,
            push_return_register: false,
            stack_height: 0,
        }
    }

    /// Bind a memory space
    pub fn with_memory(mut self, memory: MemoryHandle) -> Self {
        self.memory = Some(memory);
        self
    }

    /// Set the sender register
    pub fn with_sender(mut self, sender: impl Into<Value>) -> Self {
        self.sender = sender.into();
        self
    }

    /// Set the source register
    pub fn with_source(mut self, source: impl Into<Value>) -> Self {
        self.source = source.into();
        self
    }

    /// Set all parameter registers
    pub fn with_params(mut self, params: [Value; PARAM_COUNT]) -> Self {
        self.params = params;
        self
    }

    /// Copy the return register into the caller's on return
    pub fn saving_return(mut self) -> Self {
        self.save_return_register = true;
        self
    }

    /// Push the return register onto the caller's operand stack on return
    pub fn pushing_return(mut self) -> Self {
        self.push_return_register = true;
        self
    }

    /// Current return register, `Void` when never written
    pub fn return_value(&self) -> Value {
        self.return_register.clone().unwrap_or_default()
    }

    /// Write the return register. A written `Void` still counts as written.
    pub fn set_return_value(&mut self, value: impl Into<Value>) {
        self.return_register = Some(value.into());
    }

    /// Whether the return register has been written
    pub fn has_return_value(&self) -> bool {
        self.return_register.is_some()
    }

    /// Parameter register `n`, or `Void` when `n` is out of range
    pub fn param(&self, n: usize) -> Value {
        self.params.get(n).cloned().unwrap_or_default()
    }

    /// Frame for a `jal` to `target`: same script, memory, sender, source
    /// and parameters, fresh return register and flags
    pub fn nested(&self, target: Address) -> CallFrame {
        CallFrame {
            script: Rc::clone(&self.script),
            memory: self.memory.clone(),
            program_counter: target,
            sender: self.sender.clone(),
            source: self.source.clone(),
            params: self.params.clone(),
            return_register: None,
            save_return_register: false,
            push_return_register: false,
            stack_height: 0,
        }
    }

    /// Diagnostic view of this frame
    pub fn trace(&self) -> StackFrame {
        StackFrame {
            script: self.script.name().to_string(),
            position: self.program_counter,
        }
    }
}
