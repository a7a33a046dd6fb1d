//! Unit tests for the fault taxonomy

use core_types::{ErrorKind, StackFrame, VmError};

#[test]
fn test_error_from_kind() {
    let error: VmError = ErrorKind::StackUnderflow.into();
    assert_eq!(error.kind, ErrorKind::StackUnderflow);
    assert!(error.stack.is_empty());
}

#[test]
fn test_error_display_is_kind_display() {
    let error = VmError::new(ErrorKind::UnknownVerb(12));
    assert_eq!(error.to_string(), "unknown verb id 12");
}

#[test]
fn test_verb_error_constructor() {
    let error = VmError::verb("getparam", "parameter index 9 out of range");
    assert_eq!(
        error.to_string(),
        "verb 'getparam' failed: parameter index 9 out of range"
    );
}

#[test]
fn test_address_out_of_range_display() {
    let kind = ErrorKind::AddressOutOfRange { address: 90, len: 12 };
    assert_eq!(
        kind.to_string(),
        "address 90 is outside the instruction stream (length 12)"
    );
}

#[test]
fn test_with_stack_attaches_frames() {
    let error = VmError::new(ErrorKind::DivisionByZero).with_stack(vec![StackFrame {
        script: "a.cog".to_string(),
        position: 3,
    }]);
    assert_eq!(error.stack.len(), 1);
    assert_eq!(error.backtrace(), "\n  #0: a.cog+3");
}

#[test]
fn test_error_is_std_error() {
    fn assert_error<E: std::error::Error>(_: &E) {}
    assert_error(&VmError::new(ErrorKind::NoMemory));
}
