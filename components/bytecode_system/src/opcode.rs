//! Bytecode opcodes for the cog virtual machine
//!
//! Defines every instruction of the stack machine together with its
//! operands. The binary layout lives in [`crate::instruction`].

use core_types::Value;
use std::fmt;

/// Absolute byte offset into an instruction stream, or a memory address.
pub type Address = usize;

/// Identifier of a host-registered verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VerbId(pub i32);

impl fmt::Display for VerbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Encoding tags, one byte each.
pub(crate) mod tag {
    pub const PUSH: u8 = 0x01;
    pub const DUP: u8 = 0x02;
    pub const LOAD: u8 = 0x10;
    pub const LOADI: u8 = 0x11;
    pub const STOR: u8 = 0x12;
    pub const STORI: u8 = 0x13;
    pub const JMP: u8 = 0x20;
    pub const JAL: u8 = 0x21;
    pub const BT: u8 = 0x22;
    pub const BF: u8 = 0x23;
    pub const CALL: u8 = 0x30;
    pub const CALLV: u8 = 0x31;
    pub const RET: u8 = 0x32;
    pub const NEG: u8 = 0x40;
    pub const ADD: u8 = 0x41;
    pub const SUB: u8 = 0x42;
    pub const MUL: u8 = 0x43;
    pub const DIV: u8 = 0x44;
    pub const MOD: u8 = 0x45;
    pub const BOR: u8 = 0x50;
    pub const BAND: u8 = 0x51;
    pub const BXOR: u8 = 0x52;
    pub const LNOT: u8 = 0x60;
    pub const LOR: u8 = 0x61;
    pub const LAND: u8 = 0x62;
    pub const EQ: u8 = 0x70;
    pub const NE: u8 = 0x71;
    pub const GT: u8 = 0x72;
    pub const GE: u8 = 0x73;
    pub const LT: u8 = 0x74;
    pub const LE: u8 = 0x75;
}

/// Bytecode opcodes for cog execution
#[derive(Debug, Clone, PartialEq)]
pub enum Opcode {
    // Stack
    /// Push a literal value
    Push(Value),
    /// Duplicate top value on stack
    Dup,

    // Memory
    /// Push the value at a memory address
    Load(Address),
    /// Pop an index, push the value at address + index
    LoadI(Address),
    /// Pop a value into a memory address
    Stor(Address),
    /// Pop an index, then pop a value into address + index
    StorI(Address),

    // Control flow
    /// Unconditional jump to offset
    Jmp(Address),
    /// Call a subroutine at offset in a new frame
    Jal(Address),
    /// Pop a value, jump to offset if truthy
    Bt(Address),
    /// Pop a value, jump to offset if falsy
    Bf(Address),

    // Verbs and return
    /// Invoke a verb, discarding its result
    Call(VerbId),
    /// Invoke a verb and push its result
    CallV(VerbId),
    /// Return from the current frame
    Ret,

    // Arithmetic
    /// Negate top value
    Neg,
    /// Add top two stack values
    Add,
    /// Subtract top from second-top
    Sub,
    /// Multiply top two stack values
    Mul,
    /// Divide second-top by top
    Div,
    /// Modulo second-top by top
    Mod,

    // Bitwise
    /// Bitwise or
    Bor,
    /// Bitwise and
    Band,
    /// Bitwise exclusive or
    Bxor,

    // Logic
    /// Logical not
    LNot,
    /// Logical or
    LOr,
    /// Logical and
    LAnd,

    // Comparison
    /// Equal
    Eq,
    /// Not equal
    Ne,
    /// Greater than
    Gt,
    /// Greater than or equal
    Ge,
    /// Less than
    Lt,
    /// Less than or equal
    Le,
}

impl Opcode {
    /// The encoding tag of this opcode.
    pub fn tag(&self) -> u8 {
        match self {
            Opcode::Push(_) => tag::PUSH,
            Opcode::Dup => tag::DUP,
            Opcode::Load(_) => tag::LOAD,
            Opcode::LoadI(_) => tag::LOADI,
            Opcode::Stor(_) => tag::STOR,
            Opcode::StorI(_) => tag::STORI,
            Opcode::Jmp(_) => tag::JMP,
            Opcode::Jal(_) => tag::JAL,
            Opcode::Bt(_) => tag::BT,
            Opcode::Bf(_) => tag::BF,
            Opcode::Call(_) => tag::CALL,
            Opcode::CallV(_) => tag::CALLV,
            Opcode::Ret => tag::RET,
            Opcode::Neg => tag::NEG,
            Opcode::Add => tag::ADD,
            Opcode::Sub => tag::SUB,
            Opcode::Mul => tag::MUL,
            Opcode::Div => tag::DIV,
            Opcode::Mod => tag::MOD,
            Opcode::Bor => tag::BOR,
            Opcode::Band => tag::BAND,
            Opcode::Bxor => tag::BXOR,
            Opcode::LNot => tag::LNOT,
            Opcode::LOr => tag::LOR,
            Opcode::LAnd => tag::LAND,
            Opcode::Eq => tag::EQ,
            Opcode::Ne => tag::NE,
            Opcode::Gt => tag::GT,
            Opcode::Ge => tag::GE,
            Opcode::Lt => tag::LT,
            Opcode::Le => tag::LE,
        }
    }

    /// Assembly mnemonic.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Push(_) => "push",
            Opcode::Dup => "dup",
            Opcode::Load(_) => "load",
            Opcode::LoadI(_) => "loadi",
            Opcode::Stor(_) => "stor",
            Opcode::StorI(_) => "stori",
            Opcode::Jmp(_) => "jmp",
            Opcode::Jal(_) => "jal",
            Opcode::Bt(_) => "bt",
            Opcode::Bf(_) => "bf",
            Opcode::Call(_) => "call",
            Opcode::CallV(_) => "callv",
            Opcode::Ret => "ret",
            Opcode::Neg => "neg",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Div => "div",
            Opcode::Mod => "mod",
            Opcode::Bor => "bor",
            Opcode::Band => "band",
            Opcode::Bxor => "bxor",
            Opcode::LNot => "lnot",
            Opcode::LOr => "lor",
            Opcode::LAnd => "land",
            Opcode::Eq => "eq",
            Opcode::Ne => "ne",
            Opcode::Gt => "gt",
            Opcode::Ge => "ge",
            Opcode::Lt => "lt",
            Opcode::Le => "le",
        }
    }

    /// Operand-free opcode for a mnemonic, if it has no operand.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
        let op = match mnemonic {
            "dup" => Opcode::Dup,
            "ret" => Opcode::Ret,
            "neg" => Opcode::Neg,
            "add" => Opcode::Add,
            "sub" => Opcode::Sub,
            "mul" => Opcode::Mul,
            "div" => Opcode::Div,
            "mod" => Opcode::Mod,
            "bor" => Opcode::Bor,
            "band" => Opcode::Band,
            "bxor" => Opcode::Bxor,
            "lnot" => Opcode::LNot,
            "lor" => Opcode::LOr,
            "land" => Opcode::LAnd,
            "eq" => Opcode::Eq,
            "ne" => Opcode::Ne,
            "gt" => Opcode::Gt,
            "ge" => Opcode::Ge,
            "lt" => Opcode::Lt,
            "le" => Opcode::Le,
            _ => return None,
        };
        Some(op)
    }

    /// Check if this opcode ends a basic block
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            Opcode::Ret | Opcode::Jmp(_) | Opcode::Bt(_) | Opcode::Bf(_)
        )
    }

    /// Check if this opcode is a binary arithmetic operation
    pub fn is_binary_arithmetic(&self) -> bool {
        matches!(
            self,
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div | Opcode::Mod
        )
    }

    /// Code address this opcode may transfer control to
    pub fn branch_target(&self) -> Option<Address> {
        match self {
            Opcode::Jmp(addr) | Opcode::Jal(addr) | Opcode::Bt(addr) | Opcode::Bf(addr) => {
                Some(*addr)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::Push(Value::String(s)) => write!(f, "push {:?}", s),
            Opcode::Push(Value::Float(n)) => write!(f, "push {:?}", n),
            Opcode::Push(v) => write!(f, "push {}", v),
            Opcode::Load(a)
            | Opcode::LoadI(a)
            | Opcode::Stor(a)
            | Opcode::StorI(a)
            | Opcode::Jmp(a)
            | Opcode::Jal(a)
            | Opcode::Bt(a)
            | Opcode::Bf(a) => write!(f, "{} {}", self.mnemonic(), a),
            Opcode::Call(id) | Opcode::CallV(id) => write!(f, "{} {}", self.mnemonic(), id),
            _ => f.write_str(self.mnemonic()),
        }
    }
}
