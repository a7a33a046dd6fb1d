//! Cog VM command-line host
//!
//! Assembles a cog source file and runs it in either engine. The binary
//! (`cogvm`) is a thin wrapper around [`Runtime`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod error;
pub mod host_verbs;
pub mod runtime;

pub use cli::{Cli, Entry, RunMode};
pub use error::{CliError, CliResult};
pub use host_verbs::Console;
pub use runtime::{RunReport, Runtime};
