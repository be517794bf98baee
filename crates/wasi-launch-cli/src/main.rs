//! wasi-launch: run a WebAssembly module with WASI.
//!
//! # Examples
//!
//! ```bash
//! # Print the linked runtime version
//! wasi-launch version
//!
//! # Run a module; `run` is optional
//! wasi-launch run hello.wasm world
//! wasi-launch hello.wasm world
//!
//! # Expose a directory and an environment variable
//! wasi-launch --dir ./data::/data --env GREETING=hi app.wasm
//! ```

use clap::Parser;
use std::process::ExitCode as ProcessExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use wasi_launch_cli::cli::Cli;
use wasi_launch_core::cli::ExitCode;

fn main() -> ProcessExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version surface as "errors" that exit cleanly.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::ERROR.into()
            } else {
                ExitCode::SUCCESS.into()
            };
        }
    };

    init_logging(cli.verbose);

    match wasi_launch_cli::execute(cli) {
        Ok(code) => code.into(),
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::ERROR.into()
        }
    }
}

/// Initializes logging infrastructure.
///
/// Logs go to stderr so they never mix with the guest's stdout. Without
/// `--verbose` only warnings are shown unless `RUST_LOG` says otherwise.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
