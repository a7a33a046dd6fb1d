//! Script instances
//!
//! An instance is one live copy of a script: the shared, immutable script
//! plus a private memory space seeded from its symbol defaults. Every
//! continuation opened on an instance addresses that same memory, so state
//! written by one message handler is visible to the next.

use crate::call_frame::{CallFrame, PARAM_COUNT};
use crate::continuation::Continuation;
use crate::memory::{Memory, MemoryHandle};
use bytecode_system::{Address, Script};
use core_types::{Value, VmResult};
use std::rc::Rc;

/// Registers handed to a message handler
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageContext {
    /// Who sent the message
    pub sender: Value,
    /// The object the message concerns
    pub source: Value,
    /// Parameter registers
    pub params: [Value; PARAM_COUNT],
}

impl MessageContext {
    /// Empty registers
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sender
    pub fn with_sender(mut self, sender: impl Into<Value>) -> Self {
        self.sender = sender.into();
        self
    }

    /// Set the source
    pub fn with_source(mut self, source: impl Into<Value>) -> Self {
        self.source = source.into();
        self
    }

    /// Set parameter register `n`; indices past the last register are ignored
    pub fn with_param(mut self, n: usize, value: impl Into<Value>) -> Self {
        if let Some(slot) = self.params.get_mut(n) {
            *slot = value.into();
        }
        self
    }
}

/// A script bound to its own memory
#[derive(Debug, Clone)]
pub struct Instance {
    script: Rc<Script>,
    memory: MemoryHandle,
}

impl Instance {
    /// Instantiate `script` with freshly seeded memory
    pub fn new(script: Rc<Script>) -> Self {
        let memory = Memory::from_cells(script.symbols().default_memory()).into_handle();
        Self { script, memory }
    }

    /// The script
    pub fn script(&self) -> &Rc<Script> {
        &self.script
    }

    /// The instance memory
    pub fn memory(&self) -> &MemoryHandle {
        &self.memory
    }

    /// Read a symbol's current value by name
    pub fn symbol_value(&self, name: &str) -> Option<Value> {
        let address = self.script.symbols().get(name)?.address;
        self.memory.borrow().cells().get(address).cloned()
    }

    /// Frame entering the handler for `message`
    pub fn frame_for(&self, message: &str, context: MessageContext) -> VmResult<CallFrame> {
        let entry = self.script.entry_point(message)?;
        self.frame_at(entry, context)
    }

    /// Frame entering the program at a raw offset
    pub fn frame_at(&self, entry: Address, context: MessageContext) -> VmResult<CallFrame> {
        self.script.program().check_address(entry)?;
        Ok(CallFrame::new(Rc::clone(&self.script), entry)
            .with_memory(Rc::clone(&self.memory))
            .with_sender(context.sender)
            .with_source(context.source)
            .with_params(context.params))
    }

    /// Fresh continuation for `message`, failing with `UnknownMessage`
    pub fn continuation_for(
        &self,
        message: &str,
        context: MessageContext,
    ) -> VmResult<Continuation> {
        self.frame_for(message, context).map(Continuation::new)
    }

    /// Fresh continuation entering at a raw offset
    pub fn continuation_at(
        &self,
        entry: Address,
        context: MessageContext,
    ) -> VmResult<Continuation> {
        self.frame_at(entry, context).map(Continuation::new)
    }
}

/// `script.instantiate()` for shared scripts
pub trait Instantiate {
    /// Create a new instance with its own memory
    fn instantiate(&self) -> Instance;
}

impl Instantiate for Rc<Script> {
    fn instantiate(&self) -> Instance {
        Instance::new(Rc::clone(self))
    }
}
