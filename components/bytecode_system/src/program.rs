//! Immutable instruction streams
//!
//! A [`Program`] is the byte buffer a compiled script carries. It is never
//! mutated after construction; any number of continuations may decode from
//! it at once.

use crate::instruction::Instruction;
use core_types::{ErrorKind, VmResult};

/// An immutable, byte-addressable instruction stream
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    bytes: Box<[u8]>,
}

impl Program {
    /// Wrap encoded bytecode.
    ///
    /// The bytes are not validated here; faults surface when an offending
    /// instruction is decoded, or up front through [`Program::validate`].
    pub fn from_bytes(bytes: impl Into<Box<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// The encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the stream holds no instructions
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode the instruction at an absolute offset
    pub fn decode(&self, offset: usize) -> VmResult<Instruction> {
        Instruction::decode(&self.bytes, offset)
    }

    /// Check that `offset` can be used as an entry point or resume position
    pub fn check_address(&self, offset: usize) -> VmResult<()> {
        if offset < self.bytes.len() {
            Ok(())
        } else {
            Err(ErrorKind::AddressOutOfRange {
                address: offset,
                len: self.bytes.len(),
            }
            .into())
        }
    }

    /// Iterate over instructions in stream order, starting at offset 0
    ///
    /// Iteration stops after the first decoding fault.
    pub fn instructions(&self) -> Instructions<'_> {
        Instructions {
            program: self,
            offset: 0,
            failed: false,
        }
    }

    /// Decode the whole stream once, reporting the first fault
    pub fn validate(&self) -> VmResult<()> {
        for instruction in self.instructions() {
            instruction?;
        }
        Ok(())
    }
}

/// Sequential decoder returned by [`Program::instructions`]
pub struct Instructions<'a> {
    program: &'a Program,
    offset: usize,
    failed: bool,
}

impl Iterator for Instructions<'_> {
    type Item = VmResult<Instruction>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.program.len() {
            return None;
        }
        match self.program.decode(self.offset) {
            Ok(instruction) => {
                self.offset = instruction.next;
                Some(Ok(instruction))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
