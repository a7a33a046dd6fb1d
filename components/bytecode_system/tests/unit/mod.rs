//! Unit tests for bytecode_system

mod test_assembler;
mod test_encoding;
mod test_script;
