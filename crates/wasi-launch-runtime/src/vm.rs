//! Virtual machine handle built from a [`RuntimeConfig`].
//!
//! A [`Vm`] owns the Wasmtime engine, the linker with every enabled host
//! registration, and the host module instances. Each call to
//! [`Vm::run_wasm_from_file`] compiles the file, creates a fresh store, and
//! invokes one exported function. Everything is released when the `Vm` (or
//! the per-run store) is dropped.
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
//!     .init(&["hello.wasm", "world"], &[], &[]);
//! vm.run_wasm_from_file("hello.wasm", "_start")?;
//! # Ok(())
//! # }
//! ```

use crate::config::{HostRegistration, RuntimeConfig};
use crate::limiter::MemoryLimiter;
use crate::wasi::WasiModule;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};
use wasi_launch_core::{Error, MemoryLimit, Result};
use wasmtime::{Engine, Linker, Module, Store};
use wasmtime_wasi::I32Exit;
use wasmtime_wasi::p1::{self, WasiP1Ctx};

/// Per-run store data.
struct HostState {
    wasi: WasiP1Ctx,
    limiter: MemoryLimiter,
}

/// WASM virtual machine with its host modules.
///
/// # Thread Safety
///
/// `Vm` is `Send`. Runs are sequential: each one borrows the `Vm` for its
/// whole duration.
pub struct Vm {
    engine: Engine,
    linker: Linker<HostState>,
    wasi: Option<WasiModule>,
    memory_limit: Option<MemoryLimit>,
    max_fuel: Option<u64>,
}

impl std::fmt::Debug for Vm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vm")
            .field("wasi", &self.wasi)
            .field("memory_limit", &self.memory_limit)
            .field("max_fuel", &self.max_fuel)
            .finish_non_exhaustive()
    }
}

impl Vm {
    /// Creates a VM from a configuration.
    ///
    /// Every host registration enabled on `config` is linked and gets an
    /// uninitialized module instance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] if the engine cannot be created or a
    /// host registration cannot be linked.
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let engine = Engine::new(&config.to_wasmtime()).map_err(|e| Error::Construction {
            what: "wasmtime engine".to_string(),
            message: format!("{e:#}"),
        })?;

        let mut linker: Linker<HostState> = Linker::new(&engine);

        let wasi = if config.has_host_registration(HostRegistration::Wasi) {
            p1::add_to_linker_sync(&mut linker, |state| &mut state.wasi).map_err(|e| {
                Error::Construction {
                    what: "wasi linker".to_string(),
                    message: format!("{e:#}"),
                }
            })?;
            debug!("Host registration linked: {}", HostRegistration::Wasi.import_module());
            Some(WasiModule::default())
        } else {
            None
        };

        Ok(Self {
            engine,
            linker,
            wasi,
            memory_limit: config.memory_limit(),
            max_fuel: config.max_fuel(),
        })
    }

    /// Looks up the module instance of an enabled host registration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HostModuleMissing`] if `registration` was not enabled
    /// on the configuration the VM was built from.
    pub fn import_module_mut(&mut self, registration: HostRegistration) -> Result<&mut WasiModule> {
        let module = match registration {
            HostRegistration::Wasi => self.wasi.as_mut(),
        };
        module.ok_or_else(|| Error::HostModuleMissing {
            name: registration.name().to_string(),
        })
    }

    /// Loads a module from `path` and invokes its `entry` export.
    ///
    /// The entry point must take no parameters and return nothing, as
    /// `_start` does. A guest `proc_exit(0)` counts as success.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`Error::Construction`] if the WASI context or store cannot be built
    /// - [`Error::ModuleExit`] if the guest exits with a non-zero status
    /// - [`Error::Execution`] if the file cannot be read or compiled, linking
    ///   fails, `entry` is missing or has the wrong type, or the guest traps
    pub fn run_wasm_from_file(&self, path: impl AsRef<Path>, entry: &str) -> Result<()> {
        let path = path.as_ref();
        let start_time = Instant::now();

        debug!("Compiling WASM module from {}", path.display());
        let module = Module::from_file(&self.engine, path).map_err(|e| Error::Execution {
            entry: entry.to_string(),
            message: format!("{e:#}"),
        })?;
        info!("Module compiled in {:?}", start_time.elapsed());

        let wasi = match &self.wasi {
            Some(wasi_module) => wasi_module.build_ctx()?,
            None => wasmtime_wasi::WasiCtxBuilder::new().build_p1(),
        };

        let mut store = Store::new(
            &self.engine,
            HostState {
                wasi,
                limiter: MemoryLimiter::new(self.memory_limit),
            },
        );
        store.limiter(|state| &mut state.limiter);

        if let Some(fuel) = self.max_fuel {
            store.set_fuel(fuel).map_err(|e| Error::Construction {
                what: "store".to_string(),
                message: format!("{e:#}"),
            })?;
            debug!("Fuel budget: {}", fuel);
        }

        let instance = guest_outcome(entry, self.linker.instantiate(&mut store, &module))?;

        let Some(instance) = instance else {
            // The guest exited cleanly from its start function.
            return Ok(());
        };

        debug!("Getting entry point function: {}", entry);
        let func = instance
            .get_typed_func::<(), ()>(&mut store, entry)
            .map_err(|e| Error::Execution {
                entry: entry.to_string(),
                message: format!("{e:#}"),
            })?;

        guest_outcome(entry, func.call(&mut store, ()))?;

        info!("WASM execution completed in {:?}", start_time.elapsed());
        Ok(())
    }
}

/// Maps a guest call result onto the launcher's error taxonomy.
///
/// `Ok(None)` means the guest called `proc_exit(0)` before returning.
fn guest_outcome<T>(entry: &str, result: wasmtime::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) => match e.downcast_ref::<I32Exit>() {
            Some(I32Exit(0)) => {
                debug!("Guest exited with code 0");
                Ok(None)
            }
            Some(I32Exit(code)) => Err(Error::ModuleExit { code: *code }),
            None => {
                debug!("WASM execution trap: {:#}", e);
                Err(Error::Execution {
                    entry: entry.to_string(),
                    message: format!("{e:#}"),
                })
            }
        },
    }
}
