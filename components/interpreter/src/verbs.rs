//! Verb tables
//!
//! Verbs are host operations scripts reach through `call`/`callv`. A table
//! hands out sequential [`VerbId`]s as verbs are registered, resolves names
//! for the assembler, and looks handlers up by id at run time.
//!
//! The two engines use different handler shapes: transient verbs see only
//! the operand stack and always complete, resumable verbs get a
//! [`VerbContext`] and answer with a [`Flow`].

use crate::call_frame::CallFrame;
use crate::continuation::Continuation;
use crate::services::ServiceRegistry;
use crate::signal::Flow;
use crate::stack::OperandStack;
use bytecode_system::{VerbId, VerbResolver};
use core_types::{ErrorKind, Value, VmError, VmResult};
use std::collections::HashMap;
use std::fmt;

/// Handler signature for transient-mode verbs
pub type TransientHandler = dyn Fn(&mut OperandStack) -> VmResult<Value>;

/// Handler signature for resumable-mode verbs
pub type ResumableHandler = dyn Fn(&mut VerbContext<'_>) -> VmResult<Flow>;

/// Verbs usable by [`crate::TransientVm`]
pub type TransientVerbTable = VerbTable<TransientHandler>;

/// Verbs usable by [`crate::VirtualMachine`]
pub type ResumableVerbTable = VerbTable<ResumableHandler>;

/// A registered verb
pub struct Verb<H: ?Sized> {
    name: String,
    handler: Box<H>,
}

impl<H: ?Sized> Verb<H> {
    /// Registered name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The handler
    pub fn handler(&self) -> &H {
        &self.handler
    }
}

/// Name- and id-indexed verb registry
pub struct VerbTable<H: ?Sized> {
    verbs: Vec<Verb<H>>,
    by_name: HashMap<String, VerbId>,
}

impl<H: ?Sized> Default for VerbTable<H> {
    fn default() -> Self {
        Self {
            verbs: Vec::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<H: ?Sized> VerbTable<H> {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a boxed handler under `name`.
    ///
    /// Registering a name twice replaces the handler and keeps the id.
    pub fn add_boxed(&mut self, name: impl Into<String>, handler: Box<H>) -> VerbId {
        let name = name.into();
        if let Some(&id) = self.by_name.get(&name) {
            self.verbs[id.0 as usize].handler = handler;
            return id;
        }
        let id = VerbId(self.verbs.len() as i32);
        self.by_name.insert(name.clone(), id);
        self.verbs.push(Verb { name, handler });
        id
    }

    /// Look up a verb by id, failing with `UnknownVerb`
    pub fn get(&self, id: VerbId) -> VmResult<&Verb<H>> {
        usize::try_from(id.0)
            .ok()
            .and_then(|i| self.verbs.get(i))
            .ok_or_else(|| ErrorKind::UnknownVerb(id.0).into())
    }

    /// Id of a verb by name
    pub fn id_of(&self, name: &str) -> Option<VerbId> {
        self.by_name.get(name).copied()
    }

    /// Number of registered verbs
    pub fn len(&self) -> usize {
        self.verbs.len()
    }

    /// Whether no verbs are registered
    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    /// Registered names in id order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.verbs.iter().map(|v| v.name.as_str())
    }
}

impl<H: ?Sized> VerbResolver for VerbTable<H> {
    fn resolve_verb(&self, name: &str) -> Option<VerbId> {
        self.id_of(name)
    }
}

impl<H: ?Sized> fmt::Debug for VerbTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl VerbTable<TransientHandler> {
    /// Register a transient verb
    pub fn add<F>(&mut self, name: impl Into<String>, handler: F) -> VerbId
    where
        F: Fn(&mut OperandStack) -> VmResult<Value> + 'static,
    {
        self.add_boxed(name, Box::new(handler))
    }
}

impl VerbTable<ResumableHandler> {
    /// Register a resumable verb
    pub fn add<F>(&mut self, name: impl Into<String>, handler: F) -> VerbId
    where
        F: Fn(&mut VerbContext<'_>) -> VmResult<Flow> + 'static,
    {
        self.add_boxed(name, Box::new(handler))
    }
}

/// What a resumable verb can reach while it runs
///
/// The continuation is lent for the duration of the call; its top frame's
/// program counter already points past the `call`/`callv`.
pub struct VerbContext<'a> {
    /// The live continuation
    pub continuation: &'a mut Continuation,
    /// Host services
    pub services: &'a mut ServiceRegistry,
    /// True for `callv`, false for `call`
    pub expects_value: bool,
}

impl VerbContext<'_> {
    /// Pop an argument
    pub fn pop(&mut self) -> VmResult<Value> {
        self.continuation.data_stack.pop()
    }

    /// Pop an argument coerced to an integer
    pub fn pop_int(&mut self) -> VmResult<i32> {
        self.continuation.data_stack.pop_int()
    }

    /// The calling frame
    pub fn frame(&self) -> VmResult<&CallFrame> {
        self.continuation.frame().ok_or_else(no_frame)
    }

    /// The calling frame, mutably
    pub fn frame_mut(&mut self) -> VmResult<&mut CallFrame> {
        self.continuation.frame_mut().ok_or_else(no_frame)
    }

    /// Borrow a host service
    pub fn service<T: 'static>(&self) -> Option<&T> {
        self.services.get::<T>()
    }

    /// Mutably borrow a host service
    pub fn service_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.services.get_mut::<T>()
    }
}

fn no_frame() -> VmError {
    VmError::verb("<context>", "no active frame")
}
