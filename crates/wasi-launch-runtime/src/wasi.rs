//! The WASI host module.
//!
//! [`WasiModule`] records what the guest will see: its argument vector,
//! environment, and preopened directories. The actual WASI context is built
//! fresh for every run from this state.

use tracing::debug;
use wasi_launch_core::{DirMapping, EnvVar, Error, Result};
use wasmtime_wasi::p1::WasiP1Ctx;
use wasmtime_wasi::{DirPerms, FilePerms, WasiCtxBuilder};

/// Initialization state of the WASI host module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WasiModule {
    args: Vec<String>,
    envs: Vec<EnvVar>,
    preopens: Vec<DirMapping>,
    inherit_env: bool,
}

impl WasiModule {
    /// Initializes the module with program arguments, environment variables,
    /// and directory mappings.
    ///
    /// `args[0]` is conventionally the program name. Calling `init` again
    /// replaces everything set by the previous call.
    pub fn init<S: AsRef<str>>(&mut self, args: &[S], envs: &[EnvVar], preopens: &[DirMapping]) {
        self.args = args.iter().map(|a| a.as_ref().to_string()).collect();
        self.envs = envs.to_vec();
        self.preopens = preopens.to_vec();

        debug!(
            "WASI module initialized: {} args, {} env vars, {} preopens",
            self.args.len(),
            self.envs.len(),
            self.preopens.len()
        );
    }

    /// Forwards the launcher's own environment to the guest.
    ///
    /// Variables passed to [`WasiModule::init`] take precedence over
    /// inherited ones with the same name.
    pub fn set_inherit_env(&mut self, inherit: bool) {
        self.inherit_env = inherit;
    }

    /// Argument vector the guest will see.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Explicit environment variables.
    #[must_use]
    pub fn envs(&self) -> &[EnvVar] {
        &self.envs
    }

    /// Directory mappings.
    #[must_use]
    pub fn preopens(&self) -> &[DirMapping] {
        &self.preopens
    }

    /// Environment as the guest will see it.
    #[must_use]
    pub fn resolved_env(&self) -> Vec<(String, String)> {
        let mut env: Vec<(String, String)> = if self.inherit_env {
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .filter(|(k, _)| self.envs.iter().all(|e| e.key() != k.as_str()))
                .collect()
        } else {
            Vec::new()
        };

        env.extend(self.envs.iter().cloned().map(EnvVar::into_pair));
        env
    }

    /// Builds the WASI preview 1 context for a single run.
    ///
    /// Standard streams are inherited from the launcher.
    pub(crate) fn build_ctx(&self) -> Result<WasiP1Ctx> {
        let mut builder = WasiCtxBuilder::new();
        builder.inherit_stdio();
        builder.args(self.args.as_slice());
        let env = self.resolved_env();
        builder.envs(env.as_slice());

        for dir in &self.preopens {
            builder
                .preopened_dir(dir.host(), dir.guest(), DirPerms::all(), FilePerms::all())
                .map_err(|e| Error::Construction {
                    what: format!("preopened directory '{}'", dir.host().display()),
                    message: format!("{e:#}"),
                })?;
            debug!("Preopened {}", dir);
        }

        Ok(builder.build_p1())
    }
}
