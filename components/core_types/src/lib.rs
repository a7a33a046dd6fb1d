//! Core value types and error handling for the cog virtual machine.
//!
//! This crate provides the foundational types shared by the bytecode codec
//! and the interpreter: the dynamically typed scalar exchanged on stacks and
//! in memory, the type names the script front end declares, and the fatal
//! fault taxonomy.
//!
//! # Overview
//!
//! - [`Value`] - Tagged scalar (int, flex, bool, string, vector, handles)
//! - [`ValueType`] - Declared type of a symbol or value
//! - [`VmError`] - A fatal execution fault with a call stack snapshot
//! - [`ErrorKind`] - Categories of fatal faults
//! - [`StackFrame`] - One entry of a fault's call stack snapshot
//!
//! # Examples
//!
//! ```
//! use core_types::{ErrorKind, Value, VmError};
//!
//! let num = Value::Int(42);
//! assert!(num.is_truthy());
//! assert_eq!(num.as_int(), 42);
//!
//! let error = VmError::new(ErrorKind::StackUnderflow);
//! assert_eq!(error.to_string(), "operand stack underflow");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod source;
mod value;
mod value_type;

pub use error::{ErrorKind, VmError, VmResult};
pub use source::StackFrame;
pub use value::{Value, Vector};
pub use value_type::{HandleKind, ValueType};
