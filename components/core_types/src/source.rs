//! Call stack snapshots attached to fatal faults.

use std::fmt;

/// Represents a single frame in a cog call stack snapshot.
///
/// Captured when a fault aborts a continuation so the host can report which
/// script and byte offset each active frame was executing.
///
/// # Examples
///
/// ```
/// use core_types::StackFrame;
///
/// let frame = StackFrame {
///     script: "door.cog".to_string(),
///     position: 25,
/// };
///
/// assert_eq!(frame.to_string(), "door.cog+25");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// Name of the script the frame belongs to
    pub script: String,
    /// Byte offset of the next instruction the frame would execute
    pub position: usize,
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.script, self.position)
    }
}
