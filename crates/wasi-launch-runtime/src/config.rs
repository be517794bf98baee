//! Engine configuration.
//!
//! # Examples
//!
//! ```
//! use wasi_launch_runtime::{HostRegistration, RuntimeConfig};
//!
//! let mut config = RuntimeConfig::new();
//! config.add_host_registration(HostRegistration::Wasi);
//! assert!(config.has_host_registration(HostRegistration::Wasi));
//! ```

use std::fmt;
use wasi_launch_core::MemoryLimit;
use wasmtime::{Config, Strategy, WasmBacktraceDetails};

/// Host capabilities that can be registered on a [`RuntimeConfig`].
///
/// Each registration makes a set of host functions importable by the guest
/// once a [`crate::Vm`] is built from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HostRegistration {
    /// WASI preview 1 (`wasi_snapshot_preview1`).
    Wasi,
}

impl HostRegistration {
    /// Short name used in messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Wasi => "wasi",
        }
    }

    /// Import namespace the guest links against.
    #[must_use]
    pub const fn import_module(&self) -> &'static str {
        match self {
            Self::Wasi => "wasi_snapshot_preview1",
        }
    }
}

impl fmt::Display for HostRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration a [`crate::Vm`] is built from.
///
/// Holds the enabled host registrations and optional resource limits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    host_registrations: Vec<HostRegistration>,
    memory_limit: Option<MemoryLimit>,
    max_fuel: Option<u64>,
}

impl RuntimeConfig {
    /// Creates a configuration with no host registrations and no limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables a host registration. Adding the same one twice is a no-op.
    pub fn add_host_registration(&mut self, registration: HostRegistration) -> &mut Self {
        if !self.host_registrations.contains(&registration) {
            self.host_registrations.push(registration);
        }
        self
    }

    /// Returns `true` if `registration` is enabled.
    #[must_use]
    pub fn has_host_registration(&self, registration: HostRegistration) -> bool {
        self.host_registrations.contains(&registration)
    }

    /// Caps guest linear memory.
    #[must_use]
    pub const fn with_memory_limit(mut self, limit: Option<MemoryLimit>) -> Self {
        self.memory_limit = limit;
        self
    }

    /// Enables fuel metering with the given budget.
    #[must_use]
    pub const fn with_max_fuel(mut self, fuel: Option<u64>) -> Self {
        self.max_fuel = fuel;
        self
    }

    /// Configured memory ceiling.
    #[must_use]
    pub const fn memory_limit(&self) -> Option<MemoryLimit> {
        self.memory_limit
    }

    /// Configured fuel budget.
    #[must_use]
    pub const fn max_fuel(&self) -> Option<u64> {
        self.max_fuel
    }

    pub(crate) fn to_wasmtime(&self) -> Config {
        let mut config = Config::new();
        config.wasm_backtrace_details(WasmBacktraceDetails::Enable);
        config.strategy(Strategy::Cranelift);

        if self.max_fuel.is_some() {
            config.consume_fuel(true);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_is_idempotent() {
        let mut config = RuntimeConfig::new();
        config
            .add_host_registration(HostRegistration::Wasi)
            .add_host_registration(HostRegistration::Wasi);
        assert_eq!(config.host_registrations.len(), 1);
    }

    #[test]
    fn test_default_has_no_registrations() {
        let config = RuntimeConfig::default();
        assert!(!config.has_host_registration(HostRegistration::Wasi));
        assert!(config.memory_limit().is_none());
        assert!(config.max_fuel().is_none());
    }

    #[test]
    fn test_limits_builder() {
        let config = RuntimeConfig::new()
            .with_memory_limit(Some(MemoryLimit::from_mb(16).unwrap()))
            .with_max_fuel(Some(500));
        assert_eq!(config.memory_limit().unwrap().megabytes(), 16);
        assert_eq!(config.max_fuel(), Some(500));
    }

    #[test]
    fn test_registration_names() {
        assert_eq!(HostRegistration::Wasi.to_string(), "wasi");
        assert_eq!(
            HostRegistration::Wasi.import_module(),
            "wasi_snapshot_preview1"
        );
    }
}
