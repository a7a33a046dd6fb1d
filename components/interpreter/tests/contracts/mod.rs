//! Contract tests for interpreter
//!
//! Pin the public surface hosts build against.

use bytecode_system::{assemble, VerbId, VerbResolver};
use core_types::{ErrorKind, Value};
use interpreter::{
    system_verbs, CallFrame, Continuation, ExecutionResult, Flow, Instance, Instantiate, Memory,
    MessageContext, OperandStack, ResumableVerbTable, ServiceRegistry, TransientVerbTable,
    TransientVm, VirtualMachine, VmConfig, PARAM_COUNT,
};
use std::rc::Rc;

#[test]
fn test_contract_verb_ids_are_sequential() {
    let mut verbs = TransientVerbTable::new();
    let a = verbs.add("a", |_| Ok(Value::Void));
    let b = verbs.add("b", |_| Ok(Value::Void));
    assert_eq!(a, VerbId(0));
    assert_eq!(b, VerbId(1));
    assert_eq!(verbs.resolve_verb("b"), Some(VerbId(1)));
    assert_eq!(verbs.len(), 2);
}

#[test]
fn test_contract_reregistering_keeps_id() {
    let mut verbs = TransientVerbTable::new();
    let first = verbs.add("v", |_| Ok(Value::Int(1)));
    let second = verbs.add("v", |_| Ok(Value::Int(2)));
    assert_eq!(first, second);
    assert_eq!(verbs.len(), 1);

    let mut stack = OperandStack::new();
    let verb = verbs.get(first).unwrap();
    assert_eq!((verb.handler())(&mut stack).unwrap(), Value::Int(2));
}

#[test]
fn test_contract_unknown_verb_id() {
    let verbs = ResumableVerbTable::new();
    let err = verbs.get(VerbId(3)).err().unwrap();
    assert_eq!(err.kind, ErrorKind::UnknownVerb(3));
}

#[test]
fn test_contract_system_verb_names() {
    let mut verbs = ResumableVerbTable::new();
    system_verbs::register(&mut verbs);
    for name in ["getsenderref", "getsourceref", "getparam", "returnex", "suspend"] {
        assert!(verbs.id_of(name).is_some(), "missing {}", name);
    }
}

#[test]
fn test_contract_flow_from_value() {
    assert_eq!(Flow::from(Value::Int(4)), Flow::Return(Value::Int(4)));
}

#[test]
fn test_contract_execution_result_accessors() {
    let done = ExecutionResult::Completed(Value::Int(1));
    let paused = ExecutionResult::Suspended(Value::Void);
    assert!(done.is_completed());
    assert!(paused.is_suspended());
    assert_eq!(done.value(), &Value::Int(1));
    assert_eq!(paused.into_value(), Value::Void);
}

#[test]
fn test_contract_service_registry_by_type() {
    struct Counter(u32);

    let mut services = ServiceRegistry::new();
    assert!(services.insert(Counter(1)).is_none());
    services.get_mut::<Counter>().unwrap().0 += 1;
    assert_eq!(services.get::<Counter>().map(|c| c.0), Some(2));
    assert!(!services.contains::<String>());
    assert_eq!(services.remove::<Counter>().map(|c| c.0), Some(2));
    assert!(services.is_empty());
}

#[test]
fn test_contract_default_config() {
    let config = VmConfig::default();
    assert_eq!(config.max_call_depth, 256);
    assert_eq!(config.max_stack_depth, 4096);
    assert_eq!(config.max_restarts, 1024);
    assert_eq!(VirtualMachine::new().config(), &config);
    assert_eq!(TransientVm::new().config(), &config);
}

#[test]
fn test_contract_params_are_four() {
    assert_eq!(PARAM_COUNT, 4);
    let ctx = MessageContext::new().with_param(3, 1).with_param(4, 2);
    assert_eq!(ctx.params[3], Value::Int(1));
}

#[test]
fn test_contract_instance_memory_from_symbols() {
    let verbs = ResumableVerbTable::new();
    let source = ".symbol int a = 3\n.symbol float b\n.message go\ngo:\nret\n";
    let script = Rc::new(assemble("mem", source, &verbs).unwrap());
    let instance: Instance = script.instantiate();
    assert_eq!(instance.memory().borrow().len(), 2);
    assert_eq!(instance.symbol_value("a"), Some(Value::Int(3)));
    assert_eq!(instance.symbol_value("b"), Some(Value::Float(0.0)));
    assert_eq!(instance.symbol_value("c"), None);
}

#[test]
fn test_contract_unknown_message() {
    let verbs = ResumableVerbTable::new();
    let script = Rc::new(assemble("m", ".message go\ngo:\nret\n", &verbs).unwrap());
    let err = script
        .instantiate()
        .continuation_for("stop", MessageContext::new())
        .err()
        .unwrap();
    assert_eq!(err.kind, ErrorKind::UnknownMessage("stop".to_string()));
}

#[test]
fn test_contract_empty_continuation_completes_void() {
    let mut cc = Continuation::default();
    let result = VirtualMachine::new()
        .execute(&ResumableVerbTable::new(), &mut ServiceRegistry::new(), &mut cc)
        .unwrap();
    assert_eq!(result, ExecutionResult::Completed(Value::Void));
}

#[test]
fn test_contract_push_frame_records_height() {
    let verbs = ResumableVerbTable::new();
    let script = Rc::new(assemble("h", "ret\n", &verbs).unwrap());
    let mut cc = Continuation::default();
    cc.data_stack.push(Value::Int(1));
    cc.data_stack.push(Value::Int(2));
    cc.push_frame(CallFrame::new(script, 0));
    assert_eq!(cc.frame().unwrap().stack_height, 2);
    assert_eq!(cc.depth(), 1);
}

#[test]
fn test_contract_memory_traps_out_of_range() {
    let mut memory = Memory::new(2);
    memory.store(1, Value::Int(9)).unwrap();
    assert_eq!(memory.load(1).unwrap(), Value::Int(9));
    let err = memory.load(2).err().unwrap();
    assert_eq!(err.kind, ErrorKind::MemoryOutOfRange { address: 2, size: 2 });
    assert!(memory.store(-1, Value::Void).is_err());
}
