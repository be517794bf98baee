//! Error types for wasi-launch.
//!
//! Every failure the launcher can hit falls into one of three groups:
//! constructing runtime objects, locating a host module, or running the
//! guest. All of them are fatal to the process.
//!
//! # Examples
//!
//! ```
//! use wasi_launch_core::{Error, Result};
//!
//! fn entry_point(name: &str) -> Result<&str> {
//!     if name.is_empty() {
//!         return Err(Error::InvalidArgument("entry point cannot be empty".to_string()));
//!     }
//!     Ok(name)
//! }
//!
//! assert!(entry_point("").is_err());
//! ```

use thiserror::Error;

/// Main error type for wasi-launch.
#[derive(Error, Debug)]
pub enum Error {
    /// A runtime object could not be created.
    ///
    /// Covers the engine, the WASI context (including preopened
    /// directories), and the store.
    #[error("failed to create {what}: {message}")]
    Construction {
        /// Which object failed to build (e.g. "wasmtime engine")
        what: String,
        /// Description from the underlying runtime
        message: String,
    },

    /// A host module was requested but never registered on the configuration.
    #[error("failed to init {name} module: host registration not enabled")]
    HostModuleMissing {
        /// Name of the missing host module
        name: String,
    },

    /// The guest module failed to load, link, or run.
    #[error("error running {entry}: {message}")]
    Execution {
        /// Entry point being invoked
        entry: String,
        /// Human-readable description of the failure
        message: String,
    },

    /// The guest called `proc_exit` with a non-zero status.
    #[error("module exited with code {code}")]
    ModuleExit {
        /// Exit status passed to `proc_exit`
        code: i32,
    },

    /// Invalid command-line or API argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration file could not be read, parsed, or validated.
    #[error("configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },
}

impl Error {
    /// Returns `true` if this is a construction error.
    ///
    /// # Examples
    ///
    /// ```
    /// use wasi_launch_core::Error;
    ///
    /// let err = Error::Construction {
    ///     what: "wasmtime engine".to_string(),
    ///     message: "unsupported target".to_string(),
    /// };
    /// assert!(err.is_construction_error());
    /// ```
    #[must_use]
    pub const fn is_construction_error(&self) -> bool {
        matches!(self, Self::Construction { .. })
    }

    /// Returns `true` if a host module was missing.
    #[must_use]
    pub const fn is_host_module_missing(&self) -> bool {
        matches!(self, Self::HostModuleMissing { .. })
    }

    /// Returns `true` if the guest failed to load, link, or run.
    ///
    /// # Examples
    ///
    /// ```
    /// use wasi_launch_core::Error;
    ///
    /// let err = Error::Execution {
    ///     entry: "_start".to_string(),
    ///     message: "unreachable".to_string(),
    /// };
    /// assert!(err.is_execution_error());
    /// assert_eq!(err.to_string(), "error running _start: unreachable");
    /// ```
    #[must_use]
    pub const fn is_execution_error(&self) -> bool {
        matches!(self, Self::Execution { .. })
    }

    /// Returns the guest exit status if the guest exited with a non-zero code.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ModuleExit { code } => Some(*code),
            _ => None,
        }
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }
}

/// Result type alias for wasi-launch operations.
pub type Result<T> = std::result::Result<T, Error>;
