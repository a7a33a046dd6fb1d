//! Unit tests for StackFrame

use core_types::StackFrame;

#[test]
fn test_stack_frame_fields() {
    let frame = StackFrame {
        script: "00_door.cog".to_string(),
        position: 48,
    };
    assert_eq!(frame.script, "00_door.cog");
    assert_eq!(frame.position, 48);
}

#[test]
fn test_stack_frame_clone_eq() {
    let frame = StackFrame {
        script: "x.cog".to_string(),
        position: 1,
    };
    assert_eq!(frame.clone(), frame);
}

#[test]
fn test_stack_frame_display() {
    let frame = StackFrame {
        script: "x.cog".to_string(),
        position: 1,
    };
    assert_eq!(frame.to_string(), "x.cog+1");
}
