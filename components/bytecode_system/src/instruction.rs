//! Bytecode instruction encoding
//!
//! Every instruction is a one-byte tag followed by its operands. Code and
//! memory addresses are u32 little endian, verb ids are i32 little endian,
//! and `push` literals use the tagged encoding from [`crate::value`].

use crate::codec::Cursor;
use crate::opcode::{tag, Opcode, VerbId};
use crate::value::{encode_literal, encoded_len, read_literal};
use core_types::{ErrorKind, VmResult};

/// A decoded instruction together with its location in the stream
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// The decoded opcode and operands
    pub opcode: Opcode,
    /// Offset of the tag byte
    pub offset: usize,
    /// Offset of the following instruction
    pub next: usize,
}

impl Instruction {
    /// Decode the instruction starting at `offset`.
    ///
    /// Fails on offsets outside the stream, unknown tags, truncated operands
    /// and branch targets that do not point into the stream.
    pub fn decode(bytes: &[u8], offset: usize) -> VmResult<Instruction> {
        if offset >= bytes.len() {
            return Err(ErrorKind::AddressOutOfRange {
                address: offset,
                len: bytes.len(),
            }
            .into());
        }

        let mut cursor = Cursor::new(bytes, offset);
        let op_tag = cursor.read_u8()?;

        let opcode = match op_tag {
            tag::PUSH => Opcode::Push(read_literal(&mut cursor)?),
            tag::DUP => Opcode::Dup,
            tag::LOAD => Opcode::Load(cursor.read_u32()? as usize),
            tag::LOADI => Opcode::LoadI(cursor.read_u32()? as usize),
            tag::STOR => Opcode::Stor(cursor.read_u32()? as usize),
            tag::STORI => Opcode::StorI(cursor.read_u32()? as usize),
            tag::JMP => Opcode::Jmp(cursor.read_u32()? as usize),
            tag::JAL => Opcode::Jal(cursor.read_u32()? as usize),
            tag::BT => Opcode::Bt(cursor.read_u32()? as usize),
            tag::BF => Opcode::Bf(cursor.read_u32()? as usize),
            tag::CALL => Opcode::Call(VerbId(cursor.read_i32()?)),
            tag::CALLV => Opcode::CallV(VerbId(cursor.read_i32()?)),
            tag::RET => Opcode::Ret,
            tag::NEG => Opcode::Neg,
            tag::ADD => Opcode::Add,
            tag::SUB => Opcode::Sub,
            tag::MUL => Opcode::Mul,
            tag::DIV => Opcode::Div,
            tag::MOD => Opcode::Mod,
            tag::BOR => Opcode::Bor,
            tag::BAND => Opcode::Band,
            tag::BXOR => Opcode::Bxor,
            tag::LNOT => Opcode::LNot,
            tag::LOR => Opcode::LOr,
            tag::LAND => Opcode::LAnd,
            tag::EQ => Opcode::Eq,
            tag::NE => Opcode::Ne,
            tag::GT => Opcode::Gt,
            tag::GE => Opcode::Ge,
            tag::LT => Opcode::Lt,
            tag::LE => Opcode::Le,
            _ => {
                return Err(ErrorKind::UnknownOpcode {
                    tag: op_tag,
                    offset,
                }
                .into())
            }
        };

        if let Some(target) = opcode.branch_target() {
            if target >= bytes.len() {
                return Err(ErrorKind::AddressOutOfRange {
                    address: target,
                    len: bytes.len(),
                }
                .into());
            }
        }

        Ok(Instruction {
            opcode,
            offset,
            next: cursor.position(),
        })
    }

    /// Encoded size in bytes
    pub fn len(&self) -> usize {
        self.next - self.offset
    }

    /// Always false; every instruction has at least its tag byte
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Opcode {
    /// Append the binary encoding of this opcode to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.push(self.tag());
        match self {
            Opcode::Push(value) => encode_literal(value, out),
            Opcode::Load(a)
            | Opcode::LoadI(a)
            | Opcode::Stor(a)
            | Opcode::StorI(a)
            | Opcode::Jmp(a)
            | Opcode::Jal(a)
            | Opcode::Bt(a)
            | Opcode::Bf(a) => out.extend_from_slice(&(*a as u32).to_le_bytes()),
            Opcode::Call(id) | Opcode::CallV(id) => out.extend_from_slice(&id.0.to_le_bytes()),
            _ => {}
        }
    }

    /// Size of the binary encoding in bytes.
    pub fn encoded_len(&self) -> usize {
        match self {
            Opcode::Push(value) => 1 + encoded_len(value),
            Opcode::Load(_)
            | Opcode::LoadI(_)
            | Opcode::Stor(_)
            | Opcode::StorI(_)
            | Opcode::Jmp(_)
            | Opcode::Jal(_)
            | Opcode::Bt(_)
            | Opcode::Bf(_)
            | Opcode::Call(_)
            | Opcode::CallV(_) => 5,
            _ => 1,
        }
    }
}
