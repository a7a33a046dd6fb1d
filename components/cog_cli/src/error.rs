//! Error types for the CLI

use bytecode_system::AsmError;
use core_types::VmError;
use std::path::PathBuf;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Script execution fault
    #[error("runtime error: {0}{}", .0.backtrace())]
    Vm(#[from] VmError),

    /// Assembly failed
    #[error("assembly error: {0}")]
    Asm(#[from] AsmError),

    /// File could not be read
    #[error("could not read '{}': {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Configuration file is not a valid `VmConfig`
    #[error("bad config '{}': {source}", path.display())]
    Config {
        /// Config file
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },

    /// Argument combination the runtime cannot honour
    #[error("invalid argument: {0}")]
    Argument(String),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
