//! Integration tests for the interpreter
//!
//! End-to-end runs covering suspension, restart, nested calls and the
//! system verbs.

use bytecode_system::assemble;
use core_types::{Value, VmError};
use interpreter::{
    system_verbs, CallFrame, Continuation, ExecutionResult, Flow, Instance, Instantiate,
    MessageContext, ResumableVerbTable, ServiceRegistry, TransientVerbTable, TransientVm,
    VirtualMachine,
};
use std::cell::Cell;
use std::rc::Rc;

fn verbs() -> ResumableVerbTable {
    let mut verbs = ResumableVerbTable::new();
    system_verbs::register(&mut verbs);
    verbs.add("nop", |_| Ok(Flow::Return(Value::Void)));
    verbs.add("keepresult", |ctx| {
        let frame = ctx.frame_mut()?;
        frame.save_return_register = true;
        frame.push_return_register = true;
        Ok(Flow::Return(Value::Void))
    });
    verbs
}

fn instance(source: &str, verbs: &ResumableVerbTable) -> Instance {
    Rc::new(assemble("test.cog", source, verbs).unwrap()).instantiate()
}

/// Run to completion, resuming after every suspension; returns the final
/// value and the number of suspensions
fn run_to_end(
    vm: &VirtualMachine,
    verbs: &ResumableVerbTable,
    cc: &mut Continuation,
) -> (Value, usize) {
    let mut services = ServiceRegistry::new();
    let mut suspensions = 0;
    loop {
        match vm.execute(verbs, &mut services, cc).unwrap() {
            ExecutionResult::Completed(value) => return (value, suspensions),
            ExecutionResult::Suspended(_) => suspensions += 1,
        }
    }
}

// ============================================================================
// Transient scenarios
// ============================================================================

#[test]
fn test_push_push_add_ret_yields_five() {
    let verbs = TransientVerbTable::new();
    let script = Rc::new(assemble("sum", "push 2\npush 3\nadd\nret\n", &verbs).unwrap());
    assert_eq!(TransientVm::new().run(&verbs, &script, 0).unwrap(), Value::Int(5));
}

#[test]
fn test_branch_on_falsy_value() {
    let verbs = TransientVerbTable::new();
    let source = "
        push 1
        push 0
        bf L
        push 10
        jmp END
    L:  push 20
    END: ret
    ";
    let script = Rc::new(assemble("branch", source, &verbs).unwrap());
    assert_eq!(TransientVm::new().run(&verbs, &script, 0).unwrap(), Value::Int(20));
}

// ============================================================================
// Suspension
// ============================================================================

const INDEXED_READ: &str = "
    .symbol int table
    .symbol int t1 = 5
    .symbol int t2 = 7
    .message start
start:
    push 2
    loadi table
    PAUSE
    push 3
    mul
    ret
";

#[test]
fn test_suspend_after_indexed_read_matches_uninterrupted_run() {
    let verbs = verbs();
    let vm = VirtualMachine::new();

    let plain = instance(&INDEXED_READ.replace("PAUSE", ""), &verbs);
    let mut cc = plain.continuation_for("start", MessageContext::new()).unwrap();
    let (expected, suspensions) = run_to_end(&vm, &verbs, &mut cc);
    assert_eq!(expected, Value::Int(21));
    assert_eq!(suspensions, 0);

    let paused = instance(&INDEXED_READ.replace("PAUSE", "call suspend"), &verbs);
    let mut cc = paused.continuation_for("start", MessageContext::new()).unwrap();
    let mut services = ServiceRegistry::new();
    let first = vm.execute(&verbs, &mut services, &mut cc).unwrap();
    assert!(first.is_suspended());
    assert_eq!(cc.data_stack.as_slice(), &[Value::Int(7)]);

    let second = vm.execute(&verbs, &mut services, &mut cc).unwrap();
    assert_eq!(second, ExecutionResult::Completed(expected));
    assert!(cc.is_finished());
}

#[test]
fn test_suspend_inside_nested_call() {
    let verbs = verbs();
    let vm = VirtualMachine::new();
    let source = "
        .symbol int acc
        .message start
    start:
        push 4
        jal sub
        load acc
        add
        ret
    sub:
        push 6
        PAUSE
        stor acc
        ret
    ";

    let plain = instance(&source.replace("PAUSE", "call nop"), &verbs);
    let mut cc = plain.continuation_for("start", MessageContext::new()).unwrap();
    let (expected, _) = run_to_end(&vm, &verbs, &mut cc);
    assert_eq!(expected, Value::Int(10));

    let paused = instance(&source.replace("PAUSE", "call suspend"), &verbs);
    let mut cc = paused.continuation_for("start", MessageContext::new()).unwrap();
    let mut services = ServiceRegistry::new();
    assert!(vm.execute(&verbs, &mut services, &mut cc).unwrap().is_suspended());
    assert_eq!(cc.depth(), 2);
    let (resumed, suspensions) = run_to_end(&vm, &verbs, &mut cc);
    assert_eq!(resumed, expected);
    assert_eq!(suspensions, 0);
}

#[test]
fn test_suspended_result_is_top_return_register() {
    let verbs = verbs();
    let source = "
        .message start
    start:
        push 9
        call returnex
        call suspend
        ret
    ";
    let instance = instance(source, &verbs);
    let mut cc = instance.continuation_for("start", MessageContext::new()).unwrap();
    let result = VirtualMachine::new()
        .execute(&verbs, &mut ServiceRegistry::new(), &mut cc)
        .unwrap();
    assert_eq!(result, ExecutionResult::Suspended(Value::Int(9)));
    assert_eq!(result.value(), &Value::Int(9));
}

#[test]
fn test_explicit_void_return_wins_over_leftovers() {
    let verbs = verbs();
    let source = "
        .message start
    start:
        push 7
        push void
        call returnex
        ret
    ";
    let instance = instance(source, &verbs);
    let mut cc = instance.continuation_for("start", MessageContext::new()).unwrap();
    let result = VirtualMachine::new()
        .execute(&verbs, &mut ServiceRegistry::new(), &mut cc)
        .unwrap();
    assert_eq!(result, ExecutionResult::Completed(Value::Void));
}

#[test]
fn test_callv_suspend_pushes_nothing() {
    let verbs = verbs();
    let instance = instance(".message start\nstart:\npush 1\ncallv suspend\nret\n", &verbs);
    let mut cc = instance.continuation_for("start", MessageContext::new()).unwrap();
    let vm = VirtualMachine::new();
    let mut services = ServiceRegistry::new();

    let paused = vm.execute(&verbs, &mut services, &mut cc).unwrap();
    assert_eq!(paused, ExecutionResult::Suspended(Value::Void));
    assert_eq!(cc.data_stack.as_slice(), &[Value::Int(1)]);

    let done = vm.execute(&verbs, &mut services, &mut cc).unwrap();
    assert_eq!(done, ExecutionResult::Completed(Value::Int(1)));
    assert!(cc.is_finished());
}

// ============================================================================
// Restart
// ============================================================================

#[test]
fn test_restart_is_idempotent() {
    let restarted = Rc::new(Cell::new(0));
    let mut verbs = verbs();
    let counter = Rc::clone(&restarted);
    verbs.add("restartonce", move |_| {
        if counter.get() == 0 {
            counter.set(1);
            Ok(Flow::Restart)
        } else {
            Ok(Flow::Return(Value::Void))
        }
    });
    let vm = VirtualMachine::new();
    let source = "
        .symbol int n = 3
        .message start
    start:
        load n
        push 2
        mul
        call MARK
        ret
    ";

    let plain = instance(&source.replace("MARK", "nop"), &verbs);
    let mut cc = plain.continuation_for("start", MessageContext::new()).unwrap();
    let (expected, _) = run_to_end(&vm, &verbs, &mut cc);

    let restarting = instance(&source.replace("MARK", "restartonce"), &verbs);
    let mut cc = restarting.continuation_for("start", MessageContext::new()).unwrap();
    let result = vm.execute(&verbs, &mut ServiceRegistry::new(), &mut cc).unwrap();
    assert_eq!(result, ExecutionResult::Completed(expected));
    assert_eq!(restarted.get(), 1);
}

#[test]
fn test_callv_restart_pushes_nothing() {
    let heights = Rc::new(Cell::new(None));
    let mut verbs = verbs();
    let seen = Rc::clone(&heights);
    verbs.add("restartonce", move |ctx| {
        if seen.get().is_none() {
            seen.set(Some(ctx.continuation.data_stack.len()));
            Ok(Flow::Restart)
        } else {
            Ok(Flow::Return(Value::Int(99)))
        }
    });
    let instance = instance(".message start\nstart:\npush 1\ncallv restartonce\nret\n", &verbs);
    let mut cc = instance.continuation_for("start", MessageContext::new()).unwrap();
    let result = VirtualMachine::new()
        .execute(&verbs, &mut ServiceRegistry::new(), &mut cc)
        .unwrap();

    // The restart resumes after the callv, so the verb runs once and its
    // result is never pushed.
    assert_eq!(heights.get(), Some(1));
    assert_eq!(result, ExecutionResult::Completed(Value::Int(1)));
}

#[test]
fn test_restart_after_verb_pushes_frame() {
    // The verb starts another handler of the same instance on this
    // continuation, then restarts so that handler runs before the caller
    // continues.
    let mut verbs = verbs();
    verbs.add("dispatchbump", |ctx| {
        let frame = ctx
            .service::<Instance>()
            .ok_or_else(|| VmError::verb("dispatchbump", "no instance registered"))?
            .frame_for("bump", MessageContext::new())?;
        ctx.continuation.push_frame(frame);
        Ok(Flow::Restart)
    });
    let source = "
        .symbol int hits
        .message start
        .message bump
    start:
        call dispatchbump
        load hits
        ret
    bump:
        load hits
        push 1
        add
        stor hits
        ret
    ";
    let instance = instance(source, &verbs);
    let mut services = ServiceRegistry::new();
    services.insert(instance.clone());

    let mut cc = instance.continuation_for("start", MessageContext::new()).unwrap();
    let result = VirtualMachine::new()
        .execute(&verbs, &mut services, &mut cc)
        .unwrap();
    assert_eq!(result, ExecutionResult::Completed(Value::Int(1)));
    assert_eq!(instance.symbol_value("hits"), Some(Value::Int(1)));
}

// ============================================================================
// Nested calls
// ============================================================================

#[test]
fn test_jal_save_and_push_policy() {
    let verbs = verbs();
    let source = "
        .message start
    start:
        push 100
        jal sub
        call suspend
        ret
    sub:
        call keepresult
        push 1
        push 2
        push 42
        call returnex
        ret
    ";
    let instance = instance(source, &verbs);
    let mut cc = instance.continuation_for("start", MessageContext::new()).unwrap();
    let result = VirtualMachine::new()
        .execute(&verbs, &mut ServiceRegistry::new(), &mut cc)
        .unwrap();

    // Suspended in the caller right after the subroutine returned.
    assert_eq!(result, ExecutionResult::Suspended(Value::Int(42)));
    assert_eq!(cc.frame().unwrap().return_value(), Value::Int(42));
    assert_eq!(cc.data_stack.as_slice(), &[Value::Int(100), Value::Int(42)]);
}

#[test]
fn test_jal_without_flags_restores_stack_height() {
    let verbs = TransientVerbTable::new();
    let source = "
        push 5
        jal sub
        push 1
        add
        ret
    sub:
        push 8
        push 9
        ret
    ";
    let script = Rc::new(assemble("nested", source, &verbs).unwrap());
    assert_eq!(TransientVm::new().run(&verbs, &script, 0).unwrap(), Value::Int(6));
}

#[test]
fn test_frames_inherit_registers() {
    let verbs = verbs();
    let source = "
        .message start
    start:
        jal sub
        ret
    sub:
        call keepresult
        callv getsenderref
        callv getsourceref
        add
        push 1
        callv getparam
        add
        ret
    ";
    let instance = instance(source, &verbs);
    let context = MessageContext::new()
        .with_sender(10)
        .with_source(20)
        .with_param(1, 30);
    let mut cc = instance.continuation_for("start", context).unwrap();
    let (value, _) = run_to_end(&VirtualMachine::new(), &verbs, &mut cc);
    assert_eq!(value, Value::Int(60));
}

#[test]
fn test_getparam_out_of_range_is_void() {
    let verbs = verbs();
    let source = ".message start\nstart:\npush 9\ncallv getparam\ncall returnex\nret\n";
    let instance = instance(source, &verbs);
    let mut cc = instance
        .continuation_for("start", MessageContext::new().with_param(0, 1))
        .unwrap();
    let (value, _) = run_to_end(&VirtualMachine::new(), &verbs, &mut cc);
    assert_eq!(value, Value::Void);
}

#[test]
fn test_continuation_can_be_built_by_hand() {
    let verbs = verbs();
    let script = Rc::new(assemble("hand", "push 3\nret\n", &verbs).unwrap());
    let mut cc = Continuation::new(CallFrame::new(script, 0));
    let result = VirtualMachine::new()
        .execute(&verbs, &mut ServiceRegistry::new(), &mut cc)
        .unwrap();
    assert_eq!(result.into_value(), Value::Int(3));
}
