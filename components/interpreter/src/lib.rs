//! Resumable stack interpreter for cog scripts
//!
//! This crate provides two engines over one instruction set:
//! - [`TransientVm`]: runs a script to completion against a shared heap;
//!   verbs see only the operand stack
//! - [`VirtualMachine`]: drives host-owned [`Continuation`]s with per-instance
//!   memory; verbs may suspend execution or restart the dispatch loop
//!
//! Opcode semantics are shared through [`evaluator`]; only memory addressing
//! and verb invocation differ between the engines.
//!
//! # Example
//!
//! ```
//! use interpreter::{ExecutionResult, Instantiate, MessageContext, ResumableVerbTable,
//!                   ServiceRegistry, VirtualMachine};
//! use bytecode_system::assemble;
//! use core_types::Value;
//! use std::rc::Rc;
//!
//! let mut verbs = ResumableVerbTable::new();
//! interpreter::system_verbs::register(&mut verbs);
//!
//! let source = "
//!     .message startup
//!     startup:
//!         push 2
//!         push 3
//!         add
//!         call returnex
//!         ret
//! ";
//! let script = Rc::new(assemble("sum.cog", source, &verbs).unwrap());
//! let instance = script.instantiate();
//! let mut cc = instance.continuation_for("startup", MessageContext::new()).unwrap();
//!
//! let vm = VirtualMachine::new();
//! let result = vm.execute(&verbs, &mut ServiceRegistry::new(), &mut cc).unwrap();
//! assert_eq!(result, ExecutionResult::Completed(Value::Int(5)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod call_frame;
pub mod config;
pub mod continuation;
mod dispatch;
pub mod evaluator;
pub mod instance;
pub mod memory;
pub mod services;
pub mod signal;
pub mod stack;
pub mod system_verbs;
pub mod verbs;
pub mod vm;

// Re-export main types at crate root
pub use call_frame::{CallFrame, PARAM_COUNT};
pub use config::VmConfig;
pub use continuation::Continuation;
pub use instance::{Instance, Instantiate, MessageContext};
pub use memory::{Memory, MemoryHandle};
pub use services::ServiceRegistry;
pub use signal::{ExecutionResult, Flow};
pub use stack::OperandStack;
pub use verbs::{
    ResumableHandler, ResumableVerbTable, TransientHandler, TransientVerbTable, Verb, VerbContext,
    VerbTable,
};
pub use vm::{TransientVm, VirtualMachine};
