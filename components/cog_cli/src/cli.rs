//! Command-line arguments

use bytecode_system::{parse_literal, Address};
use clap::{ArgAction, Parser, ValueEnum};
use core_types::Value;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Run a cog assembly script
#[derive(Parser, Debug)]
#[command(name = "cogvm", version)]
#[command(about = "Assemble and run a cog script")]
pub struct Cli {
    /// Assembly source file
    pub file: PathBuf,

    /// Message handler name or numeric program offset to start at
    #[arg(short, long, default_value = "0")]
    pub entry: Entry,

    /// Engine to run the script on
    #[arg(short, long, value_enum, default_value_t = RunMode::Resumable)]
    pub mode: RunMode,

    /// Sender register (resumable mode)
    #[arg(long, value_parser = parse_value)]
    pub sender: Option<Value>,

    /// Source register (resumable mode)
    #[arg(long, value_parser = parse_value)]
    pub source: Option<Value>,

    /// Parameter register value; repeat for up to four parameters
    #[arg(short, long = "param", value_parser = parse_value)]
    pub params: Vec<Value>,

    /// Print the disassembled script before running it
    #[arg(long)]
    pub print_bytecode: bool,

    /// JSON file with VM limits
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Log filter implied by `-v` when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Engine selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Shared heap, verbs see only the stack
    Transient,
    /// Per-instance memory, verbs may suspend
    Resumable,
}

/// Where execution starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Exported message handler
    Message(String),
    /// Raw program offset
    Offset(Address),
}

impl FromStr for Entry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("entry must not be empty".to_string());
        }
        Ok(match s.parse::<Address>() {
            Ok(offset) => Entry::Offset(offset),
            Err(_) => Entry::Message(s.to_string()),
        })
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Message(name) => write!(f, "{}", name),
            Entry::Offset(offset) => write!(f, "{}", offset),
        }
    }
}

fn parse_value(s: &str) -> Result<Value, String> {
    parse_literal(s).ok_or_else(|| format!("'{}' is not a value literal", s))
}
