//! Usage output for invocations without a module.

use crate::cli::Cli;
use anyhow::Result;
use clap::CommandFactory;
use std::io::Write;
use wasi_launch_core::cli::ExitCode;

/// Prints usage to stdout and reports failure.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn run() -> Result<ExitCode> {
    run_with(&mut std::io::stdout().lock())
}

fn run_with(out: &mut impl Write) -> Result<ExitCode> {
    let help = Cli::command().render_help();
    write!(out, "{help}")?;
    Ok(ExitCode::ERROR)
}
