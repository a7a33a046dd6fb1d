//! The dispatch loop
//!
//! One loop serves both engines. What differs between them (where `load`
//! and `stor` go, and what invoking a verb means) sits behind [`Mode`];
//! opcode semantics come from [`crate::evaluator`].
//!
//! Each cycle decodes from the top frame's program counter and advances it
//! past the instruction before executing, so a verb that suspends leaves the
//! continuation pointing at the next instruction. The top frame is re-read
//! every cycle because verbs may push or pop frames.

use crate::call_frame::CallFrame;
use crate::config::VmConfig;
use crate::continuation::Continuation;
use crate::evaluator::{binary, unary, BinaryOp, UnaryOp};
use crate::memory::{effective_address, Memory};
use crate::services::ServiceRegistry;
use crate::signal::Flow;
use crate::verbs::{ResumableVerbTable, TransientVerbTable, VerbContext};
use bytecode_system::{Address, Opcode, VerbId};
use core_types::{ErrorKind, Value, VmError, VmResult};
use tracing::trace;

/// Memory addressing and verb invocation for one engine
pub(crate) trait Mode {
    fn load(&mut self, frame: &CallFrame, address: i64) -> VmResult<Value>;
    fn store(&mut self, frame: &CallFrame, address: i64, value: Value) -> VmResult<()>;
    fn invoke(
        &mut self,
        cc: &mut Continuation,
        verb: VerbId,
        expects_value: bool,
    ) -> VmResult<Flow>;
}

/// Why the loop stopped
#[derive(Debug)]
pub(crate) enum Halt {
    Completed(Value),
    Suspended,
    Restart,
}

/// Shared heap, stack-only verbs
pub(crate) struct TransientMode<'a> {
    pub(crate) heap: &'a mut Memory,
    pub(crate) verbs: &'a TransientVerbTable,
}

impl Mode for TransientMode<'_> {
    fn load(&mut self, _frame: &CallFrame, address: i64) -> VmResult<Value> {
        self.heap.load(address)
    }

    fn store(&mut self, _frame: &CallFrame, address: i64, value: Value) -> VmResult<()> {
        self.heap.store(address, value)
    }

    fn invoke(&mut self, cc: &mut Continuation, verb: VerbId, _: bool) -> VmResult<Flow> {
        let verb = self.verbs.get(verb)?;
        (verb.handler())(&mut cc.data_stack).map(Flow::Return)
    }
}

/// Frame-bound memory, verbs with continuation and services
pub(crate) struct ResumableMode<'a> {
    pub(crate) verbs: &'a ResumableVerbTable,
    pub(crate) services: &'a mut ServiceRegistry,
}

impl Mode for ResumableMode<'_> {
    fn load(&mut self, frame: &CallFrame, address: i64) -> VmResult<Value> {
        let memory = frame.memory.as_ref().ok_or(ErrorKind::NoMemory)?;
        memory.borrow().load(address)
    }

    fn store(&mut self, frame: &CallFrame, address: i64, value: Value) -> VmResult<()> {
        let memory = frame.memory.as_ref().ok_or(ErrorKind::NoMemory)?;
        memory.borrow_mut().store(address, value)
    }

    fn invoke(
        &mut self,
        cc: &mut Continuation,
        verb: VerbId,
        expects_value: bool,
    ) -> VmResult<Flow> {
        let verb = self.verbs.get(verb)?;
        let mut context = VerbContext {
            continuation: cc,
            services: &mut *self.services,
            expects_value,
        };
        (verb.handler())(&mut context)
    }
}

/// Drive `cc` until it completes, a verb signals, or a fault occurs.
///
/// Faults carry a snapshot of the call stack with the frame that was
/// executing positioned at the faulting instruction.
pub(crate) fn run<M: Mode>(
    mode: &mut M,
    cc: &mut Continuation,
    config: &VmConfig,
) -> VmResult<Halt> {
    loop {
        let Some(frame) = cc.frame() else {
            return Ok(Halt::Completed(Value::Void));
        };
        let position = frame.program_counter;
        let slot = cc.depth() - 1;
        let instruction = match frame.script.program().decode(position) {
            Ok(instruction) => instruction,
            Err(e) => return Err(fault(cc, slot, position, e)),
        };
        trace!(
            script = frame.script.name(),
            offset = instruction.offset,
            op = %instruction.opcode,
            depth = cc.depth(),
            "step"
        );

        if let Some(frame) = cc.frame_mut() {
            frame.program_counter = instruction.next;
        }

        match step(mode, cc, config, instruction.opcode) {
            Ok(None) => {}
            Ok(Some(halt)) => return Ok(halt),
            Err(e) => return Err(fault(cc, slot, position, e)),
        }

        if cc.data_stack.len() > config.max_stack_depth {
            let e = ErrorKind::StackOverflow(config.max_stack_depth).into();
            return Err(fault(cc, slot, position, e));
        }
    }
}

fn step<M: Mode>(
    mode: &mut M,
    cc: &mut Continuation,
    config: &VmConfig,
    opcode: Opcode,
) -> VmResult<Option<Halt>> {
    match opcode {
        Opcode::Push(value) => cc.data_stack.push(value),
        Opcode::Dup => {
            let top = cc.data_stack.peek()?.clone();
            cc.data_stack.push(top);
        }

        Opcode::Load(base) => {
            let value = mode.load(top(cc)?, absolute(base))?;
            cc.data_stack.push(value);
        }
        Opcode::LoadI(base) => {
            let index = cc.data_stack.pop_int()?;
            let value = mode.load(top(cc)?, effective_address(base, index))?;
            cc.data_stack.push(value);
        }
        Opcode::Stor(base) => {
            let value = cc.data_stack.pop()?;
            mode.store(top(cc)?, absolute(base), value)?;
        }
        Opcode::StorI(base) => {
            let index = cc.data_stack.pop_int()?;
            let value = cc.data_stack.pop()?;
            mode.store(top(cc)?, effective_address(base, index), value)?;
        }

        Opcode::Jmp(target) => jump(cc, target)?,
        Opcode::Bt(target) => {
            if cc.data_stack.pop()?.is_truthy() {
                jump(cc, target)?;
            }
        }
        Opcode::Bf(target) => {
            if !cc.data_stack.pop()?.is_truthy() {
                jump(cc, target)?;
            }
        }
        Opcode::Jal(target) => {
            if cc.depth() >= config.max_call_depth {
                return Err(ErrorKind::CallStackOverflow(config.max_call_depth).into());
            }
            let callee = top(cc)?.nested(target);
            cc.push_frame(callee);
        }

        Opcode::Call(verb) => return call_verb(mode, cc, verb, false),
        Opcode::CallV(verb) => return call_verb(mode, cc, verb, true),
        Opcode::Ret => return Ok(ret(cc)),

        Opcode::Neg => apply_unary(cc, UnaryOp::Neg)?,
        Opcode::LNot => apply_unary(cc, UnaryOp::LNot)?,

        Opcode::Add => apply_binary(cc, BinaryOp::Add)?,
        Opcode::Sub => apply_binary(cc, BinaryOp::Sub)?,
        Opcode::Mul => apply_binary(cc, BinaryOp::Mul)?,
        Opcode::Div => apply_binary(cc, BinaryOp::Div)?,
        Opcode::Mod => apply_binary(cc, BinaryOp::Mod)?,
        Opcode::Bor => apply_binary(cc, BinaryOp::Bor)?,
        Opcode::Band => apply_binary(cc, BinaryOp::Band)?,
        Opcode::Bxor => apply_binary(cc, BinaryOp::Bxor)?,
        Opcode::LOr => apply_binary(cc, BinaryOp::LOr)?,
        Opcode::LAnd => apply_binary(cc, BinaryOp::LAnd)?,
        Opcode::Eq => apply_binary(cc, BinaryOp::Eq)?,
        Opcode::Ne => apply_binary(cc, BinaryOp::Ne)?,
        Opcode::Gt => apply_binary(cc, BinaryOp::Gt)?,
        Opcode::Ge => apply_binary(cc, BinaryOp::Ge)?,
        Opcode::Lt => apply_binary(cc, BinaryOp::Lt)?,
        Opcode::Le => apply_binary(cc, BinaryOp::Le)?,
    }
    Ok(None)
}

/// Pops right then left
fn apply_binary(cc: &mut Continuation, op: BinaryOp) -> VmResult<()> {
    let rhs = cc.data_stack.pop()?;
    let lhs = cc.data_stack.pop()?;
    cc.data_stack.push(binary(op, lhs, rhs)?);
    Ok(())
}

fn apply_unary(cc: &mut Continuation, op: UnaryOp) -> VmResult<()> {
    let value = cc.data_stack.pop()?;
    cc.data_stack.push(unary(op, value));
    Ok(())
}

fn call_verb<M: Mode>(
    mode: &mut M,
    cc: &mut Continuation,
    verb: VerbId,
    expects_value: bool,
) -> VmResult<Option<Halt>> {
    match mode.invoke(cc, verb, expects_value)? {
        Flow::Return(value) => {
            if expects_value {
                cc.data_stack.push(value);
            }
            Ok(None)
        }
        Flow::Suspend => Ok(Some(Halt::Suspended)),
        Flow::Restart => Ok(Some(Halt::Restart)),
    }
}

/// Retire the top frame. Popping the last frame completes the run.
///
/// A frame whose return register was never written returns the topmost
/// value it left above its entry height instead.
fn ret(cc: &mut Continuation) -> Option<Halt> {
    let Some(frame) = cc.pop_frame() else {
        return Some(Halt::Completed(Value::Void));
    };
    let value = if frame.has_return_value() {
        frame.return_value()
    } else if cc.data_stack.len() > frame.stack_height {
        cc.data_stack.peek().cloned().unwrap_or_default()
    } else {
        Value::Void
    };
    let Some(caller) = cc.call_stack.last_mut() else {
        return Some(Halt::Completed(value));
    };

    if frame.save_return_register {
        caller.set_return_value(value.clone());
    }
    cc.data_stack.truncate(frame.stack_height);
    if frame.push_return_register {
        cc.data_stack.push(value);
    }
    None
}

fn top(cc: &Continuation) -> VmResult<&CallFrame> {
    cc.frame().ok_or_else(|| ErrorKind::StackUnderflow.into())
}

fn jump(cc: &mut Continuation, target: Address) -> VmResult<()> {
    let frame = cc
        .frame_mut()
        .ok_or_else(|| VmError::from(ErrorKind::StackUnderflow))?;
    frame.program_counter = target;
    Ok(())
}

fn absolute(address: Address) -> i64 {
    i64::try_from(address).unwrap_or(i64::MAX)
}

/// Snapshot the call stack, placing frame `slot` at `position`.
///
/// `slot` is the executing frame's index from the outermost; verbs may have
/// pushed frames above it or the instruction may have popped it.
fn fault(cc: &Continuation, slot: usize, position: Address, error: VmError) -> VmError {
    let mut stack = cc.snapshot();
    if let Some(frame) = stack.get_mut(slot) {
        frame.position = position;
    }
    error.with_stack(stack)
}
