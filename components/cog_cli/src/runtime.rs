//! Runtime orchestration for script execution
//!
//! The Runtime ties the pieces together:
//! - the assembler, resolving verb names against the host verb table
//! - the disassembler for `--print-bytecode`
//! - the transient or resumable engine, resuming suspended runs until
//!   the script completes

use crate::cli::{Entry, RunMode};
use crate::error::{CliError, CliResult};
use crate::host_verbs::{self, Console};
use bytecode_system::{assemble, disassemble_script, Script};
use core_types::Value;
use interpreter::{
    ExecutionResult, Instantiate, MessageContext, ServiceRegistry, TransientVm, VirtualMachine,
    VmConfig,
};
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Outcome of running a script
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Final return value
    pub value: Value,
    /// Times the script suspended before completing
    pub suspensions: usize,
}

/// Host runtime
pub struct Runtime {
    mode: RunMode,
    entry: Entry,
    context: MessageContext,
    config: VmConfig,
    console: Console,
    print_bytecode: bool,
}

impl Runtime {
    /// Create a runtime for `mode` writing script output to stdout
    ///
    /// # Example
    /// ```
    /// use cog_cli::{RunMode, Runtime};
    ///
    /// let runtime = Runtime::new(RunMode::Transient);
    /// ```
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            entry: Entry::Offset(0),
            context: MessageContext::new(),
            config: VmConfig::default(),
            console: Console::stdout(),
            print_bytecode: false,
        }
    }

    /// Start at `entry` instead of offset 0
    pub fn with_entry(mut self, entry: Entry) -> Self {
        self.entry = entry;
        self
    }

    /// Registers for the entry frame (resumable mode)
    pub fn with_context(mut self, context: MessageContext) -> Self {
        self.context = context;
        self
    }

    /// Engine limits
    pub fn with_config(mut self, config: VmConfig) -> Self {
        self.config = config;
        self
    }

    /// Send script output to `console`
    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    /// Enable bytecode printing
    pub fn with_print_bytecode(mut self, enabled: bool) -> Self {
        self.print_bytecode = enabled;
        self
    }

    /// Assemble and run the file at `path`
    ///
    /// # Errors
    /// Returns `CliError` if the file cannot be read, fails to assemble, or
    /// faults at run time
    pub fn execute_file(&self, path: &Path) -> CliResult<RunReport> {
        let source = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.execute_source(&name, &source)
    }

    /// Assemble and run `source`, naming the script `name`
    ///
    /// # Example
    /// ```
    /// use cog_cli::{Console, RunMode, Runtime};
    /// use core_types::Value;
    ///
    /// let runtime = Runtime::new(RunMode::Resumable).with_console(Console::capture());
    /// let report = runtime.execute_source("sum", "push 2\npush 3\nadd\nret\n").unwrap();
    /// assert_eq!(report.value, Value::Int(5));
    /// ```
    pub fn execute_source(&self, name: &str, source: &str) -> CliResult<RunReport> {
        match self.mode {
            RunMode::Transient => self.run_transient(name, source),
            RunMode::Resumable => self.run_resumable(name, source),
        }
    }

    fn run_transient(&self, name: &str, source: &str) -> CliResult<RunReport> {
        let verbs = host_verbs::transient(&self.console);
        let script = Rc::new(assemble(name, source, &verbs)?);
        self.dump(&script)?;

        if self.context != MessageContext::default() {
            warn!("sender, source and parameters are ignored in transient mode");
        }

        let mut vm = TransientVm::with_config(self.config);
        let value = match &self.entry {
            Entry::Message(message) => vm.run_message(&verbs, &script, message)?,
            Entry::Offset(offset) => vm.run(&verbs, &script, *offset)?,
        };
        Ok(RunReport {
            value,
            suspensions: 0,
        })
    }

    fn run_resumable(&self, name: &str, source: &str) -> CliResult<RunReport> {
        let verbs = host_verbs::resumable(&self.console);
        let script = Rc::new(assemble(name, source, &verbs)?);
        self.dump(&script)?;

        let instance = script.instantiate();
        let context = self.context.clone();
        let mut cc = match &self.entry {
            Entry::Message(message) => instance.continuation_for(message, context)?,
            Entry::Offset(offset) => instance.continuation_at(*offset, context)?,
        };

        let vm = VirtualMachine::with_config(self.config);
        let mut services = ServiceRegistry::new();

        let mut suspensions = 0;
        loop {
            match vm.execute(&verbs, &mut services, &mut cc)? {
                ExecutionResult::Completed(value) => {
                    debug!(script = name, suspensions, "script completed");
                    return Ok(RunReport { value, suspensions });
                }
                ExecutionResult::Suspended(value) => {
                    suspensions += 1;
                    info!(script = name, suspensions, %value, "script suspended, resuming");
                }
            }
        }
    }

    fn dump(&self, script: &Script) -> CliResult<()> {
        if self.print_bytecode {
            print!("{}", disassemble_script(script)?);
        }
        Ok(())
    }
}

/// Read a JSON `VmConfig`; omitted fields keep their defaults
pub fn load_config(path: &Path) -> CliResult<VmConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}
