//! Compiled scripts
//!
//! A [`Script`] bundles an immutable [`Program`] with the storage layout the
//! front end assigned ([`SymbolTable`]) and the messages it answers
//! ([`ExportTable`]). Scripts are shared read-only between every instance
//! and continuation running them.

use crate::error::AsmError;
use crate::opcode::Address;
use crate::program::Program;
use core_types::{ErrorKind, Value, ValueType, VmResult};
use std::collections::{BTreeMap, HashMap};

/// A declared storage slot
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// Name as written in the source
    pub name: String,
    /// Declared type
    pub value_type: ValueType,
    /// Memory address of the slot
    pub address: Address,
    /// Value the slot holds when an instance is created
    pub default_value: Value,
    /// Local slots are private to the script; others are exposed to the
    /// level designer
    pub local: bool,
    /// Link identifier for entity-bound symbols
    pub link_id: Option<i32>,
    /// Event mask for entity-bound symbols
    pub mask: u32,
    /// Designer-facing description
    pub description: Option<String>,
}

impl Symbol {
    /// Declare a slot holding the zero value of its type
    pub fn new(name: impl Into<String>, value_type: ValueType, address: Address) -> Self {
        Self {
            name: name.into(),
            value_type,
            address,
            default_value: zero_value(value_type),
            local: false,
            link_id: None,
            mask: 0,
            description: None,
        }
    }

    /// Replace the default value
    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = value;
        self
    }

    /// Mark the symbol local
    pub fn local(mut self) -> Self {
        self.local = true;
        self
    }

    /// Attach a link id
    pub fn with_link(mut self, link_id: i32) -> Self {
        self.link_id = Some(link_id);
        self
    }

    /// Attach an event mask
    pub fn with_mask(mut self, mask: u32) -> Self {
        self.mask = mask;
        self
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Initial value of a slot of the given type
pub fn zero_value(value_type: ValueType) -> Value {
    match value_type {
        ValueType::Void => Value::Void,
        ValueType::Int => Value::Int(0),
        ValueType::Float => Value::Float(0.0),
        ValueType::Bool => Value::Bool(false),
        ValueType::String => Value::String(String::new()),
        ValueType::Vector => Value::Vector(Default::default()),
        ValueType::Handle(kind) => Value::Handle(kind, -1),
    }
}

/// Ordered collection of a script's symbols
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    by_name: HashMap<String, usize>,
}

impl SymbolTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol with an explicit address.
    ///
    /// The address must fit the u32 memory operand encoding.
    pub fn insert(&mut self, symbol: Symbol) -> Result<(), AsmError> {
        if u32::try_from(symbol.address).is_err() {
            return Err(AsmError::AddressOverflow(symbol.address));
        }
        if self.by_name.contains_key(&symbol.name) {
            return Err(AsmError::DuplicateSymbol(symbol.name));
        }
        self.by_name.insert(symbol.name.clone(), self.symbols.len());
        self.symbols.push(symbol);
        Ok(())
    }

    /// Add a symbol at the next free address and return that address
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        value_type: ValueType,
    ) -> Result<Address, AsmError> {
        let address = self.memory_size();
        self.insert(Symbol::new(name, value_type, address))?;
        Ok(address)
    }

    /// Look a symbol up by name
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.by_name.get(name).map(|&i| &self.symbols[i])
    }

    /// Mutable lookup by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.by_name.get(name).map(|&i| &mut self.symbols[i])
    }

    /// Symbols in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Number of symbols
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether no symbols are declared
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Number of memory cells needed to hold every symbol
    pub fn memory_size(&self) -> usize {
        self.symbols
            .iter()
            .map(|s| s.address.saturating_add(1))
            .max()
            .unwrap_or(0)
    }

    /// Initial memory image: each symbol's default at its address, `Void`
    /// in any gap
    pub fn default_memory(&self) -> Vec<Value> {
        let mut cells = vec![Value::Void; self.memory_size()];
        for symbol in &self.symbols {
            cells[symbol.address] = symbol.default_value.clone();
        }
        cells
    }
}

/// Message name to entry offset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportTable {
    entries: BTreeMap<String, Address>,
}

impl ExportTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Export `offset` as the handler of `message`
    pub fn insert(&mut self, message: impl Into<String>, offset: Address) -> Result<(), AsmError> {
        let message = message.into();
        if self.entries.contains_key(&message) {
            return Err(AsmError::DuplicateMessage(message));
        }
        self.entries.insert(message, offset);
        Ok(())
    }

    /// Entry offset of a message handler
    pub fn offset(&self, message: &str) -> Option<Address> {
        self.entries.get(message).copied()
    }

    /// Exported messages in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Address)> {
        self.entries.iter().map(|(name, &offset)| (name.as_str(), offset))
    }

    /// Number of exported messages
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is exported
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An immutable compiled script
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    name: String,
    program: Program,
    symbols: SymbolTable,
    exports: ExportTable,
}

impl Script {
    /// Create a script with no symbols or exports
    pub fn new(name: impl Into<String>, program: Program) -> Self {
        Self {
            name: name.into(),
            program,
            symbols: SymbolTable::new(),
            exports: ExportTable::new(),
        }
    }

    /// Replace the symbol table
    pub fn with_symbols(mut self, symbols: SymbolTable) -> Self {
        self.symbols = symbols;
        self
    }

    /// Replace the export table
    pub fn with_exports(mut self, exports: ExportTable) -> Self {
        self.exports = exports;
        self
    }

    /// Script name, used in diagnostics
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Instruction stream
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Declared storage
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Exported messages
    pub fn exports(&self) -> &ExportTable {
        &self.exports
    }

    /// Entry offset for a message, failing with `UnknownMessage`
    pub fn entry_point(&self, message: &str) -> VmResult<Address> {
        self.exports
            .offset(message)
            .ok_or_else(|| ErrorKind::UnknownMessage(message.to_string()).into())
    }
}
