//! Disassembly listings
//!
//! One instruction per line as `offset: mnemonic operand`, the same text the
//! assembler reads back (minus the offsets).

use crate::program::Program;
use crate::script::Script;
use core_types::VmResult;
use std::fmt::Write;

/// Render every instruction of `program`.
///
/// Stops at the first malformed instruction and returns its fault.
pub fn disassemble(program: &Program) -> VmResult<String> {
    let mut out = String::new();
    for instruction in program.instructions() {
        let instruction = instruction?;
        let _ = writeln!(out, "{:6}: {}", instruction.offset, instruction.opcode);
    }
    Ok(out)
}

/// Render a script with its symbol and export tables ahead of the code
pub fn disassemble_script(script: &Script) -> VmResult<String> {
    let mut out = String::new();
    let _ = writeln!(out, "; {}", script.name());
    for symbol in script.symbols().iter() {
        let _ = write!(
            out,
            "; [{}] {} {} = {}",
            symbol.address, symbol.value_type, symbol.name, symbol.default_value
        );
        if symbol.local {
            out.push_str(" local");
        }
        out.push('\n');
    }
    for (message, offset) in script.exports().iter() {
        let _ = writeln!(out, "; message {} @ {}", message, offset);
    }
    out.push_str(&disassemble(script.program())?);
    Ok(out)
}
