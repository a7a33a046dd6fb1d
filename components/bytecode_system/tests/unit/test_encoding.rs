//! Tests for the binary instruction encoding

use bytecode_system::value::{decode_literal, encode_literal};
use bytecode_system::{Instruction, Opcode, Program, ProgramBuilder, VerbId};
use core_types::{ErrorKind, HandleKind, Value, Vector};

#[test]
fn test_tag_bytes_are_fixed() {
    let mut bytes = Vec::new();
    Opcode::Push(Value::Int(1)).encode(&mut bytes);
    assert_eq!(bytes, vec![0x01, 0x01, 1, 0, 0, 0]);

    bytes.clear();
    Opcode::Jal(0x0102).encode(&mut bytes);
    assert_eq!(bytes, vec![0x21, 0x02, 0x01, 0, 0]);

    bytes.clear();
    Opcode::CallV(VerbId(-1)).encode(&mut bytes);
    assert_eq!(bytes, vec![0x31, 0xff, 0xff, 0xff, 0xff]);

    bytes.clear();
    Opcode::Le.encode(&mut bytes);
    assert_eq!(bytes, vec![0x75]);
}

#[test]
fn test_string_literal_layout() {
    let mut bytes = Vec::new();
    encode_literal(&Value::from("hi"), &mut bytes);
    assert_eq!(bytes, vec![4, 2, 0, 0, 0, b'h', b'i']);
}

#[test]
fn test_vector_and_handle_literals_decode() {
    let mut bytes = Vec::new();
    encode_literal(&Value::Vector(Vector::new(1.0, -2.0, 0.5)), &mut bytes);
    encode_literal(&Value::Handle(HandleKind::Sector, 4), &mut bytes);

    let (vector, next) = decode_literal(&bytes, 0).unwrap();
    assert_eq!(vector, Value::Vector(Vector::new(1.0, -2.0, 0.5)));
    assert_eq!(next, 13);
    let (handle, end) = decode_literal(&bytes, next).unwrap();
    assert_eq!(handle, Value::Handle(HandleKind::Sector, 4));
    assert_eq!(end, bytes.len());
}

#[test]
fn test_truncated_operand_reports_instruction_offset() {
    let mut bytes = Vec::new();
    Opcode::Dup.encode(&mut bytes);
    bytes.extend_from_slice(&[0x10, 0x01]);
    let error = Instruction::decode(&bytes, 1).unwrap_err();
    assert_eq!(error.kind, ErrorKind::TruncatedInstruction { offset: 1 });
}

#[test]
fn test_branch_past_end_is_rejected() {
    let mut bytes = Vec::new();
    Opcode::Jmp(40).encode(&mut bytes);
    let error = Instruction::decode(&bytes, 0).unwrap_err();
    assert_eq!(error.kind, ErrorKind::AddressOutOfRange { address: 40, len: 5 });
}

#[test]
fn test_unknown_literal_tag() {
    let error = Program::from_bytes(vec![0x01, 0x09]).decode(0).unwrap_err();
    assert_eq!(error.kind, ErrorKind::UnknownLiteral { tag: 9, offset: 1 });
}

#[test]
fn test_builder_output_decodes_in_order() {
    let mut b = ProgramBuilder::new();
    let done = b.label();
    b.push(Value::Int(2))
        .push(Value::Int(3))
        .op(Opcode::Lt)
        .bt(done)
        .push(Value::Void)
        .ret();
    b.place(done).unwrap();
    b.push(Value::Bool(true)).ret();
    let program = b.finish().unwrap();

    let listing: Vec<String> = program
        .instructions()
        .map(|i| i.unwrap().opcode.to_string())
        .collect();
    assert_eq!(
        listing,
        vec!["push 2", "push 3", "lt", "bt 21", "push void", "ret", "push true", "ret"]
    );
}
