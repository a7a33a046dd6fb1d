//! Programmatic bytecode construction
//!
//! [`ProgramBuilder`] appends encoded instructions and resolves forward
//! references through [`Label`]s. Branch operands are reserved as four zero
//! bytes and patched when the program is finished.

use crate::error::AsmError;
use crate::opcode::{Address, Opcode, VerbId};
use crate::program::Program;
use core_types::Value;
use std::fmt;

/// A code position that may be referenced before it is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(u32);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Fixup {
    at: usize,
    label: Label,
}

/// Bytecode builder
#[derive(Debug, Clone, Default)]
pub struct ProgramBuilder {
    bytes: Vec<u8>,
    labels: Vec<Option<usize>>,
    fixups: Vec<Fixup>,
    overflow: Option<usize>,
}

impl ProgramBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Current byte offset, i.e. the address of the next instruction
    pub fn pc(&self) -> Address {
        self.bytes.len()
    }

    /// Allocate a new, unplaced label
    pub fn label(&mut self) -> Label {
        let id = self.labels.len() as u32;
        self.labels.push(None);
        Label(id)
    }

    /// Place `label` at the current offset
    pub fn place(&mut self, label: Label) -> Result<(), AsmError> {
        let pc = self.pc();
        let slot = self
            .labels
            .get_mut(label.0 as usize)
            .ok_or_else(|| AsmError::UnresolvedLabel(label.to_string()))?;
        if slot.is_some() {
            return Err(AsmError::DuplicateLabel {
                line: 0,
                name: label.to_string(),
            });
        }
        *slot = Some(pc);
        Ok(())
    }

    /// Offset a label was placed at, if any
    pub fn position_of(&self, label: Label) -> Option<Address> {
        self.labels.get(label.0 as usize).copied().flatten()
    }

    /// Append an instruction with fully resolved operands
    pub fn op(&mut self, opcode: Opcode) -> &mut Self {
        if let Some(address) = opcode.branch_target() {
            self.check_address(address);
        }
        if let Opcode::Load(a) | Opcode::LoadI(a) | Opcode::Stor(a) | Opcode::StorI(a) = opcode {
            self.check_address(a);
        }
        opcode.encode(&mut self.bytes);
        self
    }

    /// `push literal`
    pub fn push(&mut self, value: impl Into<Value>) -> &mut Self {
        self.op(Opcode::Push(value.into()))
    }

    /// `dup`
    pub fn dup(&mut self) -> &mut Self {
        self.op(Opcode::Dup)
    }

    /// `load addr`
    pub fn load(&mut self, address: Address) -> &mut Self {
        self.op(Opcode::Load(address))
    }

    /// `loadi base`
    pub fn loadi(&mut self, base: Address) -> &mut Self {
        self.op(Opcode::LoadI(base))
    }

    /// `stor addr`
    pub fn stor(&mut self, address: Address) -> &mut Self {
        self.op(Opcode::Stor(address))
    }

    /// `stori base`
    pub fn stori(&mut self, base: Address) -> &mut Self {
        self.op(Opcode::StorI(base))
    }

    /// `jmp label`
    pub fn jmp(&mut self, target: Label) -> &mut Self {
        self.branch(Opcode::Jmp(0), target)
    }

    /// `jal label`
    pub fn jal(&mut self, target: Label) -> &mut Self {
        self.branch(Opcode::Jal(0), target)
    }

    /// `bt label`
    pub fn bt(&mut self, target: Label) -> &mut Self {
        self.branch(Opcode::Bt(0), target)
    }

    /// `bf label`
    pub fn bf(&mut self, target: Label) -> &mut Self {
        self.branch(Opcode::Bf(0), target)
    }

    /// `call verb`
    pub fn call(&mut self, verb: VerbId) -> &mut Self {
        self.op(Opcode::Call(verb))
    }

    /// `callv verb`
    pub fn callv(&mut self, verb: VerbId) -> &mut Self {
        self.op(Opcode::CallV(verb))
    }

    /// `ret`
    pub fn ret(&mut self) -> &mut Self {
        self.op(Opcode::Ret)
    }

    /// Patch label references and produce the immutable program
    pub fn finish(mut self) -> Result<Program, AsmError> {
        if let Some(address) = self.overflow {
            return Err(AsmError::AddressOverflow(address));
        }
        for fixup in &self.fixups {
            let target = self
                .labels
                .get(fixup.label.0 as usize)
                .copied()
                .flatten()
                .ok_or_else(|| AsmError::UnresolvedLabel(fixup.label.to_string()))?;
            let target = u32::try_from(target).map_err(|_| AsmError::AddressOverflow(target))?;
            self.bytes[fixup.at..fixup.at + 4].copy_from_slice(&target.to_le_bytes());
        }
        Ok(Program::from_bytes(self.bytes))
    }

    fn branch(&mut self, placeholder: Opcode, target: Label) -> &mut Self {
        placeholder.encode(&mut self.bytes);
        let at = self.bytes.len() - 4;
        self.fixups.push(Fixup { at, label: target });
        self
    }

    fn check_address(&mut self, address: Address) {
        if u32::try_from(address).is_err() && self.overflow.is_none() {
            self.overflow = Some(address);
        }
    }
}
