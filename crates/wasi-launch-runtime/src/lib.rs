//! WASM runtime glue for wasi-launch.
//!
//! Wraps Wasmtime and its WASI preview 1 host behind a small handle API:
//! configure, build a VM, initialize the WASI module, run a file.
//!
//! # Examples
//!
//! ```no_run
//! use wasi_launch_runtime::{HostRegistration, RuntimeConfig, Vm};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = RuntimeConfig::new();
//! config.add_host_registration(HostRegistration::Wasi);
//!
//! let mut vm = Vm::new(&config)?;
//! vm.import_module_mut(HostRegistration::Wasi)?
//!     .init(&["app.wasm"], &[], &[]);
//! vm.run_wasm_from_file("app.wasm", "_start")?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod limiter;
mod vm;
mod wasi;

pub use config::{HostRegistration, RuntimeConfig};
pub use vm::Vm;
pub use wasi::WasiModule;

/// Name of the linked runtime.
pub const RUNTIME_NAME: &str = "wasmtime";

/// Version of the linked runtime as resolved at build time.
pub const RUNTIME_VERSION: &str = env!("WASI_LAUNCH_WASMTIME_VERSION");

/// Version string of the linked runtime.
///
/// # Examples
///
/// ```
/// let version = wasi_launch_runtime::version();
/// assert!(version.starts_with("wasmtime "));
/// ```
#[must_use]
pub const fn version() -> &'static str {
    concat!("wasmtime ", env!("WASI_LAUNCH_WASMTIME_VERSION"))
}
