//! Addressable memory spaces
//!
//! A [`Memory`] is either a script instance's local storage (shared by all
//! frames of that instance through a [`MemoryHandle`]) or the process-wide
//! heap used in transient mode. Every access is bounds-checked.

use core_types::{ErrorKind, Value, VmResult};
use std::cell::RefCell;
use std::rc::Rc;

/// Shared, interior-mutable reference to a memory space
pub type MemoryHandle = Rc<RefCell<Memory>>;

/// An indexable run of value cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Memory {
    cells: Vec<Value>,
}

impl Memory {
    /// Create `size` cells holding `Void`
    pub fn new(size: usize) -> Self {
        Self {
            cells: vec![Value::Void; size],
        }
    }

    /// Wrap existing cells
    pub fn from_cells(cells: Vec<Value>) -> Self {
        Self { cells }
    }

    /// Move this memory behind a shared handle
    pub fn into_handle(self) -> MemoryHandle {
        Rc::new(RefCell::new(self))
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether there are no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Grow to at least `size` cells; never shrinks
    pub fn ensure_size(&mut self, size: usize) {
        if self.cells.len() < size {
            self.cells.resize(size, Value::Void);
        }
    }

    /// Read the cell at an effective address
    pub fn load(&self, address: i64) -> VmResult<Value> {
        let index = self.index(address)?;
        Ok(self.cells[index].clone())
    }

    /// Write the cell at an effective address
    pub fn store(&mut self, address: i64, value: Value) -> VmResult<()> {
        let index = self.index(address)?;
        self.cells[index] = value;
        Ok(())
    }

    /// All cells in address order
    pub fn cells(&self) -> &[Value] {
        &self.cells
    }

    fn index(&self, address: i64) -> VmResult<usize> {
        usize::try_from(address)
            .ok()
            .filter(|&i| i < self.cells.len())
            .ok_or_else(|| {
                ErrorKind::MemoryOutOfRange {
                    address,
                    size: self.cells.len(),
                }
                .into()
            })
    }
}

/// Effective address of an indexed access: `base + index`
pub fn effective_address(base: usize, index: i32) -> i64 {
    base as i64 + i64::from(index)
}
