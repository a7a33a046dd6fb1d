//! Script instance integration tests
//!
//! Instances of one script keep separate memory; continuations opened on
//! the same instance share it, even while suspended and interleaved.

use bytecode_system::assemble;
use core_types::{ErrorKind, Value};
use interpreter::{
    system_verbs, ExecutionResult, Instance, Instantiate, MessageContext, ResumableVerbTable,
    ServiceRegistry, TransientVerbTable, TransientVm, VirtualMachine,
};
use std::rc::Rc;

const COUNTER: &str = "
    .symbol int count
    .symbol int step = 1
    .message bump
    .message pausedbump
    .message read

bump:
    load count
    load step
    add
    stor count
    ret

pausedbump:
    load count
    call suspend
    load step
    add
    stor count
    ret

read:
    load count
    call returnex
    ret
";

fn verbs() -> ResumableVerbTable {
    let mut verbs = ResumableVerbTable::new();
    system_verbs::register(&mut verbs);
    verbs
}

fn send(
    vm: &VirtualMachine,
    verbs: &ResumableVerbTable,
    instance: &Instance,
    message: &str,
) -> Value {
    let mut cc = instance
        .continuation_for(message, MessageContext::new())
        .unwrap();
    match vm.execute(verbs, &mut ServiceRegistry::new(), &mut cc).unwrap() {
        ExecutionResult::Completed(value) => value,
        ExecutionResult::Suspended(_) => panic!("{} suspended", message),
    }
}

#[test]
fn test_instances_have_separate_memory() {
    let verbs = verbs();
    let vm = VirtualMachine::new();
    let script = Rc::new(assemble("counter.cog", COUNTER, &verbs).unwrap());
    let first = script.instantiate();
    let second = script.instantiate();

    send(&vm, &verbs, &first, "bump");
    send(&vm, &verbs, &first, "bump");
    send(&vm, &verbs, &second, "bump");

    assert_eq!(send(&vm, &verbs, &first, "read"), Value::Int(2));
    assert_eq!(send(&vm, &verbs, &second, "read"), Value::Int(1));
}

#[test]
fn test_interleaved_continuations_share_instance_memory() {
    let verbs = verbs();
    let vm = VirtualMachine::new();
    let script = Rc::new(assemble("counter.cog", COUNTER, &verbs).unwrap());
    let instance = script.instantiate();
    let mut services = ServiceRegistry::new();

    // Paused handler reads count before the bump, then writes after it.
    let mut paused = instance
        .continuation_for("pausedbump", MessageContext::new())
        .unwrap();
    let first = vm.execute(&verbs, &mut services, &mut paused).unwrap();
    assert!(first.is_suspended());

    send(&vm, &verbs, &instance, "bump");
    send(&vm, &verbs, &instance, "bump");
    assert_eq!(instance.symbol_value("count"), Some(Value::Int(2)));

    let done = vm.execute(&verbs, &mut services, &mut paused).unwrap();
    assert!(done.is_completed());
    // The stale read wins: 0 + 1.
    assert_eq!(instance.symbol_value("count"), Some(Value::Int(1)));
}

#[test]
fn test_memory_written_by_host_is_visible() {
    let verbs = verbs();
    let vm = VirtualMachine::new();
    let script = Rc::new(assemble("counter.cog", COUNTER, &verbs).unwrap());
    let instance = script.instantiate();

    let step = script.symbols().get("step").unwrap().address;
    instance
        .memory()
        .borrow_mut()
        .store(step as i64, Value::Int(10))
        .unwrap();
    send(&vm, &verbs, &instance, "bump");
    assert_eq!(send(&vm, &verbs, &instance, "read"), Value::Int(10));
}

#[test]
fn test_transient_heap_is_shared_between_scripts() {
    let verbs = TransientVerbTable::new();
    let writer = ".symbol int cell\npush 99\nstor cell\nret\n";
    let writer = Rc::new(assemble("writer", writer, &verbs).unwrap());
    let reader = ".symbol int other\nload 0\nret\n";
    let reader = Rc::new(assemble("reader", reader, &verbs).unwrap());

    let mut vm = TransientVm::new();
    vm.run(&verbs, &writer, 0).unwrap();
    assert_eq!(vm.run(&verbs, &reader, 0).unwrap(), Value::Int(99));
    assert_eq!(vm.heap().len(), 1);
}

#[test]
fn test_message_entry_errors() {
    let verbs = verbs();
    let script = Rc::new(assemble("counter.cog", COUNTER, &verbs).unwrap());
    let err = script
        .instantiate()
        .continuation_for("missing", MessageContext::new())
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownMessage("missing".to_string()));

    let err = script
        .instantiate()
        .continuation_at(10_000, MessageContext::new())
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::AddressOutOfRange { .. }));
}
