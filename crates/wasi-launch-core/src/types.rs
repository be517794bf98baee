//! Strong types for values passed from the command line into the runtime.
//!
//! # Examples
//!
//! ```
//! use wasi_launch_core::{DirMapping, EnvVar, MemoryLimit};
//!
//! let dir: DirMapping = "./data::/data".parse().unwrap();
//! assert_eq!(dir.guest(), "/data");
//!
//! let var: EnvVar = "GREETING=hello".parse().unwrap();
//! assert_eq!(var.key(), "GREETING");
//!
//! let limit = MemoryLimit::from_mb(64).unwrap();
//! assert_eq!(limit.bytes(), 64 * 1024 * 1024);
//! ```

use crate::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Separator between the host and guest halves of a directory mapping.
pub const DIR_MAPPING_SEPARATOR: &str = "::";

/// Upper bound for a configured memory ceiling (4 GiB, the wasm32 address space).
pub const MAX_MEMORY_MB: u64 = 4096;

/// Maximum linear memory a guest instance may grow to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryLimit(u64);

impl MemoryLimit {
    /// Creates a limit from a megabyte count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `mb` is zero or above
    /// [`MAX_MEMORY_MB`].
    pub fn from_mb(mb: u64) -> Result<Self> {
        if mb == 0 || mb > MAX_MEMORY_MB {
            return Err(Error::InvalidArgument(format!(
                "memory limit must be between 1 and {MAX_MEMORY_MB} MB, got {mb}"
            )));
        }
        Ok(Self(mb * 1024 * 1024))
    }

    /// Returns the limit in bytes.
    #[must_use]
    pub const fn bytes(&self) -> u64 {
        self.0
    }

    /// Returns the limit in whole megabytes.
    #[must_use]
    pub const fn megabytes(&self) -> u64 {
        self.0 / (1024 * 1024)
    }
}

/// A host directory exposed to the guest under a guest path.
///
/// Parsed from `HOST[::GUEST]`. Without `::GUEST` the guest sees the
/// directory under the same path as the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirMapping {
    host: PathBuf,
    guest: String,
}

impl DirMapping {
    /// Creates a mapping from explicit host and guest paths.
    #[must_use]
    pub fn new(host: impl Into<PathBuf>, guest: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            guest: guest.into(),
        }
    }

    /// Host directory to preopen.
    #[must_use]
    pub fn host(&self) -> &Path {
        &self.host
    }

    /// Path the guest uses to reach the directory.
    #[must_use]
    pub fn guest(&self) -> &str {
        &self.guest
    }
}

impl FromStr for DirMapping {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (host, guest) = match s.split_once(DIR_MAPPING_SEPARATOR) {
            Some((host, guest)) => (host, guest),
            None => (s, s),
        };

        if host.is_empty() || guest.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "invalid directory mapping '{s}' (expected HOST or HOST::GUEST)"
            )));
        }

        Ok(Self::new(host, guest))
    }
}

impl fmt::Display for DirMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{DIR_MAPPING_SEPARATOR}{}",
            self.host.display(),
            self.guest
        )
    }
}

/// An environment variable handed to the guest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnvVar {
    key: String,
    value: String,
}

impl EnvVar {
    /// Creates a variable, validating the key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the key is empty or contains `=`.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() || key.contains('=') {
            return Err(Error::InvalidArgument(format!(
                "invalid environment variable name '{key}'"
            )));
        }
        Ok(Self {
            key,
            value: value.into(),
        })
    }

    /// Variable name.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Variable value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consumes the variable into a `(key, value)` pair.
    #[must_use]
    pub fn into_pair(self) -> (String, String) {
        (self.key, self.value)
    }
}

impl FromStr for EnvVar {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (key, value) = s.split_once('=').ok_or_else(|| {
            Error::InvalidArgument(format!("invalid environment variable '{s}' (expected KEY=VALUE)"))
        })?;
        Self::new(key, value)
    }
}
