//! Tests for the text assembler and disassembler

use bytecode_system::{assemble, disassemble, AsmError, Opcode, VerbId};
use core_types::Value;
use std::collections::HashMap;

fn no_verbs() -> HashMap<String, VerbId> {
    HashMap::new()
}

#[test]
fn test_disassembly_reassembles() {
    let source = "push 7\ndup\nmul\npush 1.5\nadd\nret\n";
    let script = assemble("square", source, &no_verbs()).unwrap();
    let listing = disassemble(script.program()).unwrap();

    let stripped: String = listing
        .lines()
        .map(|line| line.split_once(": ").unwrap().1)
        .collect::<Vec<_>>()
        .join("\n");
    let again = assemble("square", &stripped, &no_verbs()).unwrap();
    assert_eq!(again.program(), script.program());
}

#[test]
fn test_symbols_may_be_declared_after_use() {
    let source = "load total\nret\n.symbol int total = 9\n";
    let script = assemble("late", source, &no_verbs()).unwrap();
    assert_eq!(script.program().decode(0).unwrap().opcode, Opcode::Load(0));
    assert_eq!(
        script.symbols().get("total").unwrap().default_value,
        Value::Int(9)
    );
}

#[test]
fn test_numeric_operands() {
    let script = assemble("raw", "loadi 4\nstori 2\njmp 0\n", &no_verbs()).unwrap();
    let ops: Vec<Opcode> = script
        .program()
        .instructions()
        .map(|i| i.unwrap().opcode)
        .collect();
    assert_eq!(ops, vec![Opcode::LoadI(4), Opcode::StorI(2), Opcode::Jmp(0)]);
}

#[test]
fn test_unknown_type_and_directive() {
    let err = assemble("bad", ".symbol widget w\n", &no_verbs()).unwrap_err();
    assert!(matches!(err, AsmError::UnknownType { line: 1, .. }));

    let err = assemble("bad", ".flags 3\n", &no_verbs()).unwrap_err();
    assert_eq!(
        err,
        AsmError::UnknownDirective {
            line: 1,
            name: ".flags".to_string()
        }
    );
}

#[test]
fn test_message_for_missing_label() {
    let err = assemble("bad", ".message startup\nret\n", &no_verbs()).unwrap_err();
    assert_eq!(err, AsmError::UnresolvedLabel("startup".to_string()));
}
