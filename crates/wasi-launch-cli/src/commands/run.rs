//! Run command implementation.
//!
//! Builds the runtime configuration with the WASI host registration, creates
//! the VM, initializes the WASI module, and invokes the entry point.

use crate::cli::LaunchOptions;
use crate::dispatch::module_argv;
use anyhow::Result;
use tracing::{debug, info};
use wasi_launch_core::cli::ExitCode;
use wasi_launch_core::{DirMapping, EnvVar, LaunchConfig, MemoryLimit};
use wasi_launch_runtime::{HostRegistration, RuntimeConfig, Vm};

/// Fully resolved settings for a single run.
///
/// Produced by layering command-line options over the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Module path as typed; also argument 0
    pub module: String,
    /// Arguments after the module path
    pub args: Vec<String>,
    /// Explicit environment variables
    pub env: Vec<EnvVar>,
    /// Directory mappings
    pub dirs: Vec<DirMapping>,
    /// Forward the launcher's environment
    pub inherit_env: bool,
    /// Exported function to call
    pub entry_point: String,
    /// Linear memory ceiling
    pub memory_limit: Option<MemoryLimit>,
    /// Fuel budget
    pub max_fuel: Option<u64>,
}

impl RunOptions {
    /// Layers `options` over `config`.
    ///
    /// Command-line env vars replace file entries with the same key, dir
    /// mappings are appended, and `--invoke` replaces the configured entry
    /// point.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration holds invalid values.
    pub fn resolve(
        module: String,
        args: Vec<String>,
        options: &LaunchOptions,
        config: &LaunchConfig,
    ) -> Result<Self> {
        let mut env = config.env_vars()?;
        for var in &options.env {
            env.retain(|existing| existing.key() != var.key());
            env.push(var.clone());
        }

        let mut dirs = config.dir_mappings()?;
        dirs.extend(options.dirs.iter().cloned());

        let entry_point = options
            .invoke
            .clone()
            .unwrap_or_else(|| config.runtime.entry_point.clone());

        Ok(Self {
            module,
            args,
            env,
            dirs,
            inherit_env: options.inherit_env || config.wasi.inherit_env,
            entry_point,
            memory_limit: config.memory_limit()?,
            max_fuel: config.runtime.max_fuel,
        })
    }

    /// Guest argument vector, starting with the module path.
    #[must_use]
    pub fn argv(&self) -> Vec<String> {
        module_argv(&self.module, &self.args)
    }

    /// Runtime configuration with the WASI host registration enabled.
    #[must_use]
    pub fn runtime_config(&self) -> RuntimeConfig {
        let mut config = RuntimeConfig::new()
            .with_memory_limit(self.memory_limit)
            .with_max_fuel(self.max_fuel);
        config.add_host_registration(HostRegistration::Wasi);
        config
    }
}

/// Runs the module described by `options`.
///
/// # Errors
///
/// Returns an error if the VM cannot be created, the WASI module is
/// missing, or the module fails to run.
pub fn run(options: &RunOptions) -> Result<ExitCode> {
    debug!("Running {} with {} args", options.module, options.args.len());

    let mut vm = Vm::new(&options.runtime_config())?;

    let wasi = vm.import_module_mut(HostRegistration::Wasi)?;
    wasi.set_inherit_env(options.inherit_env);
    wasi.init(&options.argv(), &options.env, &options.dirs);

    vm.run_wasm_from_file(&options.module, &options.entry_point)?;

    info!("{} finished", options.module);
    Ok(ExitCode::SUCCESS)
}
