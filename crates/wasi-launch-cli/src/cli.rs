//! CLI argument definitions and parsing.
//!
//! The launcher takes a handful of options followed by free-form positional
//! tokens. The tokens are not modelled as clap subcommands: `version` and
//! `run` are literal words recognized by [`crate::dispatch`], and everything
//! after the module path belongs to the guest, hyphens included.

use clap::Parser;
use std::path::PathBuf;
use wasi_launch_core::{DirMapping, EnvVar};

/// Run a WebAssembly module with WASI.
///
/// `version` prints the linked runtime version and ignores everything else.
/// `run` is optional. Arguments after the module path are passed to the
/// module verbatim, with the path itself as argument 0.
#[derive(Parser, Debug)]
#[command(name = "wasi-launch")]
#[command(version, about, long_about = None)]
#[command(override_usage = "wasi-launch [OPTIONS] [version] [run] <WASM_PATH> [ARGS]...")]
pub struct Cli {
    /// Launcher options
    #[command(flatten)]
    pub options: LaunchOptions,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,

    /// `version`, or `[run] <WASM_PATH> [ARGS]...`
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        hide = true
    )]
    pub tokens: Vec<String>,
}

/// Options shaping the guest's environment.
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Environment variable for the module in KEY=VALUE format
    #[arg(long = "env", value_name = "KEY=VALUE", num_args = 1)]
    pub env: Vec<EnvVar>,

    /// Preopen a host directory, optionally under a different guest path
    #[arg(long = "dir", value_name = "HOST[::GUEST]", num_args = 1)]
    pub dirs: Vec<DirMapping>,

    /// Forward the launcher's own environment to the module
    #[arg(long)]
    pub inherit_env: bool,

    /// Exported function to call instead of `_start`
    #[arg(long, value_name = "FUNCTION")]
    pub invoke: Option<String>,

    /// Configuration file (default: <config dir>/wasi-launch/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
