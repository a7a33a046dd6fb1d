//! Cog VM CLI
//!
//! Entry point for `cogvm`. Parses arguments, sets up logging and
//! delegates to the Runtime for execution.

use clap::Parser;
use cog_cli::runtime::load_config;
use cog_cli::{Cli, CliError, CliResult, RunReport, Runtime};
use core_types::Value;
use interpreter::{MessageContext, VmConfig, PARAM_COUNT};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(report) => {
            if report.suspensions > 0 {
                eprintln!("(resumed {} time(s))", report.suspensions);
            }
            if !matches!(report.value, Value::Void) {
                println!("{}", report.value);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> CliResult<RunReport> {
    if cli.params.len() > PARAM_COUNT {
        return Err(CliError::Argument(format!(
            "at most {} parameters, got {}",
            PARAM_COUNT,
            cli.params.len()
        )));
    }

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => VmConfig::default(),
    };

    let mut context = MessageContext::new();
    if let Some(sender) = &cli.sender {
        context = context.with_sender(sender.clone());
    }
    if let Some(source) = &cli.source {
        context = context.with_source(source.clone());
    }
    for (n, value) in cli.params.iter().enumerate() {
        context = context.with_param(n, value.clone());
    }

    Runtime::new(cli.mode)
        .with_entry(cli.entry.clone())
        .with_context(context)
        .with_config(config)
        .with_print_bytecode(cli.print_bytecode)
        .execute_file(&cli.file)
}
