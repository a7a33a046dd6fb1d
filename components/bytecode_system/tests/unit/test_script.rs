//! Tests for symbol and export tables

use bytecode_system::{AsmError, ExportTable, Program, Script, Symbol, SymbolTable};
use core_types::{ErrorKind, HandleKind, Value, ValueType};

#[test]
fn test_symbol_builder_fields() {
    let symbol = Symbol::new("door", ValueType::Handle(HandleKind::Thing), 3)
        .with_link(12)
        .with_mask(0x405)
        .with_description("Door to open")
        .local();
    assert_eq!(symbol.link_id, Some(12));
    assert_eq!(symbol.mask, 0x405);
    assert_eq!(symbol.description.as_deref(), Some("Door to open"));
    assert!(symbol.local);
    assert_eq!(symbol.default_value, Value::Handle(HandleKind::Thing, -1));
}

#[test]
fn test_memory_size_follows_highest_address() {
    let mut table = SymbolTable::new();
    table.insert(Symbol::new("a", ValueType::Int, 5)).unwrap();
    table.insert(Symbol::new("b", ValueType::Int, 1)).unwrap();
    assert_eq!(table.memory_size(), 6);
    assert_eq!(table.declare("c", ValueType::Bool).unwrap(), 6);
}

#[test]
fn test_insert_rejects_unencodable_address() {
    let mut table = SymbolTable::new();
    let err = table
        .insert(Symbol::new("far", ValueType::Int, usize::MAX))
        .unwrap_err();
    assert_eq!(err, AsmError::AddressOverflow(usize::MAX));
    assert!(table.is_empty());
    assert_eq!(table.memory_size(), 0);
}

#[test]
fn test_export_table_lookup() {
    let mut exports = ExportTable::new();
    exports.insert("activated", 12).unwrap();
    exports.insert("startup", 0).unwrap();
    assert_eq!(exports.offset("activated"), Some(12));
    let names: Vec<&str> = exports.iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["activated", "startup"]);
    assert_eq!(
        exports.insert("startup", 4).unwrap_err(),
        AsmError::DuplicateMessage("startup".to_string())
    );
}

#[test]
fn test_script_entry_point() {
    let mut exports = ExportTable::new();
    exports.insert("pulse", 0).unwrap();
    let script = Script::new("pulse.cog", Program::from_bytes(vec![0x32])).with_exports(exports);
    assert_eq!(script.entry_point("pulse").unwrap(), 0);
    assert_eq!(
        script.entry_point("killed").unwrap_err().kind,
        ErrorKind::UnknownMessage("killed".to_string())
    );
}
