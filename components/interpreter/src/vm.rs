//! Execution engines
//!
//! [`TransientVm`] runs a script to completion against a heap it owns.
//! [`VirtualMachine`] drives host-owned continuations that may suspend and
//! be resumed later, restarting the dispatch loop when a verb asks for it.

use crate::call_frame::CallFrame;
use crate::config::VmConfig;
use crate::continuation::Continuation;
use crate::dispatch::{self, Halt, ResumableMode, TransientMode};
use crate::memory::Memory;
use crate::services::ServiceRegistry;
use crate::signal::ExecutionResult;
use crate::verbs::{ResumableVerbTable, TransientVerbTable};
use bytecode_system::{Address, Script};
use core_types::{ErrorKind, Value, VmError, VmResult};
use std::rc::Rc;
use tracing::debug;

/// Run-to-completion engine over a shared heap
///
/// The heap persists across runs, so every script run by one `TransientVm`
/// sees the same memory.
#[derive(Debug, Default)]
pub struct TransientVm {
    heap: Memory,
    config: VmConfig,
}

impl TransientVm {
    /// Create an engine with an empty heap and default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the given limits
    pub fn with_config(config: VmConfig) -> Self {
        Self {
            heap: Memory::default(),
            config,
        }
    }

    /// Active limits
    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    /// The shared heap
    pub fn heap(&self) -> &Memory {
        &self.heap
    }

    /// The shared heap, mutably
    pub fn heap_mut(&mut self) -> &mut Memory {
        &mut self.heap
    }

    /// Run `script` from `entry` until its outermost frame returns.
    ///
    /// The heap first grows to cover the script's declared storage; newly
    /// added cells take their symbol's default value.
    pub fn run(
        &mut self,
        verbs: &TransientVerbTable,
        script: &Rc<Script>,
        entry: Address,
    ) -> VmResult<Value> {
        script.program().check_address(entry)?;
        self.reserve(script)?;

        debug!(script = script.name(), entry, "transient run");
        let mut cc = Continuation::new(CallFrame::new(Rc::clone(script), entry));
        let mut mode = TransientMode {
            heap: &mut self.heap,
            verbs,
        };
        let value = match dispatch::run(&mut mode, &mut cc, &self.config)? {
            Halt::Completed(value) => value,
            // Transient verbs cannot signal; kept total for the type.
            Halt::Suspended | Halt::Restart => top_return_register(&cc),
        };
        debug!(script = script.name(), %value, "transient run finished");
        Ok(value)
    }

    /// Run the handler exported for `message`
    pub fn run_message(
        &mut self,
        verbs: &TransientVerbTable,
        script: &Rc<Script>,
        message: &str,
    ) -> VmResult<Value> {
        let entry = script.entry_point(message)?;
        self.run(verbs, script, entry)
    }

    fn reserve(&mut self, script: &Script) -> VmResult<()> {
        let old_len = self.heap.len();
        self.heap.ensure_size(script.symbols().memory_size());
        for symbol in script.symbols().iter().filter(|s| s.address >= old_len) {
            self.heap
                .store(symbol.address as i64, symbol.default_value.clone())?;
        }
        Ok(())
    }
}

/// Resumable engine
///
/// Holds no execution state of its own: everything lives in the
/// [`Continuation`] the host passes in, so one engine can drive any number
/// of continuations.
#[derive(Debug, Default, Clone)]
pub struct VirtualMachine {
    config: VmConfig,
}

impl VirtualMachine {
    /// Create an engine with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the given limits
    pub fn with_config(config: VmConfig) -> Self {
        Self { config }
    }

    /// Active limits
    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    /// Execute or resume `cc`.
    ///
    /// Returns `Completed` with the outermost return register once the call
    /// stack empties, or `Suspended` with the top frame's return register
    /// when a verb suspends; `cc` is then positioned at the instruction
    /// after that verb call. Restarts re-enter the loop against `cc` as it
    /// stands and are never visible to the caller. An empty continuation
    /// completes immediately with `Void`.
    pub fn execute(
        &self,
        verbs: &ResumableVerbTable,
        services: &mut ServiceRegistry,
        cc: &mut Continuation,
    ) -> VmResult<ExecutionResult> {
        if cc.is_finished() {
            return Ok(ExecutionResult::Completed(Value::Void));
        }

        let mut restarts = 0;
        loop {
            let mut mode = ResumableMode {
                verbs,
                services: &mut *services,
            };
            match dispatch::run(&mut mode, cc, &self.config)? {
                Halt::Completed(value) => {
                    debug!(%value, restarts, "continuation completed");
                    return Ok(ExecutionResult::Completed(value));
                }
                // A verb that retired the last frame before suspending has
                // nothing left to resume.
                Halt::Suspended if cc.is_finished() => {
                    debug!(restarts, "continuation finished by suspending verb");
                    return Ok(ExecutionResult::Completed(Value::Void));
                }
                Halt::Suspended => {
                    let value = top_return_register(cc);
                    debug!(depth = cc.depth(), restarts, "continuation suspended");
                    return Ok(ExecutionResult::Suspended(value));
                }
                Halt::Restart => {
                    restarts += 1;
                    if restarts > self.config.max_restarts {
                        return Err(VmError::new(ErrorKind::RestartLimit(
                            self.config.max_restarts,
                        ))
                        .with_stack(cc.snapshot()));
                    }
                    debug!(restarts, depth = cc.depth(), "continuation restarted");
                }
            }
        }
    }
}

fn top_return_register(cc: &Continuation) -> Value {
    cc.frame()
        .map(CallFrame::return_value)
        .unwrap_or_default()
}
