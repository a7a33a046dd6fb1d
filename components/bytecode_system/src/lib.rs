//! Bytecode system for the cog virtual machine
//!
//! This crate provides the instruction set, its binary encoding, and the
//! compiled-script container the interpreter consumes.
//!
//! # Features
//!
//! - Stack-based opcode set as a closed enumeration
//! - Byte-addressable, immutable instruction streams with checked decoding
//! - Tagged literal encoding for every value kind
//! - Symbol and export tables describing a script's storage and messages
//! - A label-resolving builder, a text assembler and a disassembler
//!
//! # Example
//!
//! ```
//! use bytecode_system::{Opcode, ProgramBuilder};
//! use core_types::Value;
//!
//! let mut builder = ProgramBuilder::new();
//! builder.push(Value::Int(2)).push(Value::Int(3)).op(Opcode::Add).op(Opcode::Ret);
//! let program = builder.finish().unwrap();
//!
//! let first = program.decode(0).unwrap();
//! assert_eq!(first.opcode, Opcode::Push(Value::Int(2)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assembler;
pub mod builder;
mod codec;
pub mod disasm;
pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;
pub mod script;
pub mod value;

// Re-export main types at crate root
pub use assembler::{assemble, parse_literal, VerbResolver};
pub use builder::{Label, ProgramBuilder};
pub use disasm::{disassemble, disassemble_script};
pub use error::AsmError;
pub use instruction::Instruction;
pub use opcode::{Address, Opcode, VerbId};
pub use program::{Instructions, Program};
pub use script::{zero_value, ExportTable, Script, Symbol, SymbolTable};
