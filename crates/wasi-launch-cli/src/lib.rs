//! wasi-launch CLI library.
//!
//! Exposes argument parsing, positional dispatch, and the command
//! implementations so they can be tested without spawning the binary.

#![warn(missing_docs, missing_debug_implementations)]

pub mod cli;
pub mod commands;
pub mod dispatch;

use anyhow::{Context, Result};
use cli::Cli;
use commands::run::RunOptions;
use dispatch::Invocation;
use wasi_launch_core::LaunchConfig;
use wasi_launch_core::cli::ExitCode;

/// Executes a parsed command line.
///
/// Routes to the usage, version, or run command and returns the exit code.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the run fails.
pub fn execute(cli: Cli) -> Result<ExitCode> {
    match Invocation::from_tokens(&cli.tokens) {
        Invocation::Usage => commands::usage::run(),
        Invocation::Version => commands::version::run(),
        Invocation::Run { module, args } => {
            let config = LaunchConfig::load(cli.options.config.as_deref())
                .context("failed to load configuration")?;
            let options = RunOptions::resolve(module, args, &cli.options, &config)?;
            commands::run::run(&options)
        }
    }
}
