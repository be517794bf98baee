//! Launcher configuration file.
//!
//! Configuration is stored in TOML format at:
//! - Linux: `~/.config/wasi-launch/config.toml`
//! - macOS: `~/Library/Application Support/wasi-launch/config.toml`
//! - Windows: `%APPDATA%\wasi-launch\config.toml`
//!
//! Every section and key is optional.
//!
//! ```toml
//! [runtime]
//! entry_point = "_start"
//! max_memory_mb = 512
//! max_fuel = 10000000
//!
//! [wasi]
//! inherit_env = false
//! env = { GREETING = "hello" }
//! dirs = [".::/work"]
//! ```

use crate::{DirMapping, EnvVar, Error, MemoryLimit, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Entry point invoked when none is configured.
pub const DEFAULT_ENTRY_POINT: &str = "_start";

/// Directory name under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "wasi-launch";

/// Top-level launcher configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaunchConfig {
    /// Engine settings
    #[serde(default)]
    pub runtime: RuntimeSection,

    /// WASI context settings
    #[serde(default)]
    pub wasi: WasiSection,
}

/// `[runtime]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeSection {
    /// Exported function to invoke
    #[serde(default = "default_entry_point")]
    pub entry_point: String,

    /// Linear memory ceiling per instance, in MB
    #[serde(default)]
    pub max_memory_mb: Option<u64>,

    /// Fuel units available to the guest; enables fuel metering when set
    #[serde(default)]
    pub max_fuel: Option<u64>,
}

/// `[wasi]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WasiSection {
    /// Forward the launcher's own environment to the guest
    #[serde(default)]
    pub inherit_env: bool,

    /// Extra environment variables
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Directory mappings in `HOST[::GUEST]` form
    #[serde(default)]
    pub dirs: Vec<String>,
}

fn default_entry_point() -> String {
    DEFAULT_ENTRY_POINT.to_string()
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self {
            entry_point: default_entry_point(),
            max_memory_mb: None,
            max_fuel: None,
        }
    }
}

impl LaunchConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the document is malformed or fails
    /// validation.
    ///
    /// # Examples
    ///
    /// ```
    /// use wasi_launch_core::LaunchConfig;
    ///
    /// let config = LaunchConfig::from_toml_str("[runtime]\nentry_point = \"main\"\n").unwrap();
    /// assert_eq!(config.runtime.entry_point, "main");
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::ConfigError {
            message: format!("failed to parse config file: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// tried and defaults are used when nothing is there.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => {
                    debug!("Config file not found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let content = fs::read_to_string(&path).map_err(|e| Error::ConfigError {
            message: format!("failed to read config file {}: {e}", path.display()),
        })?;

        debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if:
    /// - the entry point is empty
    /// - `max_memory_mb` is zero or above 4096
    /// - `max_fuel` is zero
    /// - an env key or dir mapping is malformed
    pub fn validate(&self) -> Result<()> {
        if self.runtime.entry_point.is_empty() {
            return Err(config_error("runtime.entry_point cannot be empty"));
        }

        self.memory_limit()?;

        if self.runtime.max_fuel == Some(0) {
            return Err(config_error("runtime.max_fuel must be greater than 0"));
        }

        self.env_vars()?;
        self.dir_mappings()?;

        Ok(())
    }

    /// Configured memory ceiling, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the value is out of range.
    pub fn memory_limit(&self) -> Result<Option<MemoryLimit>> {
        self.runtime
            .max_memory_mb
            .map(MemoryLimit::from_mb)
            .transpose()
            .map_err(|e| config_error(&format!("runtime.max_memory_mb: {e}")))
    }

    /// Environment variables from the `[wasi]` section, sorted by key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if a key is invalid.
    pub fn env_vars(&self) -> Result<Vec<EnvVar>> {
        self.wasi
            .env
            .iter()
            .map(|(k, v)| EnvVar::new(k, v))
            .collect::<Result<Vec<_>>>()
            .map_err(|e| config_error(&format!("wasi.env: {e}")))
    }

    /// Directory mappings from the `[wasi]` section.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if an entry is malformed.
    pub fn dir_mappings(&self) -> Result<Vec<DirMapping>> {
        self.wasi
            .dirs
            .iter()
            .map(|d| d.parse::<DirMapping>())
            .collect::<Result<Vec<_>>>()
            .map_err(|e| config_error(&format!("wasi.dirs: {e}")))
    }
}

/// Platform default configuration path.
///
/// Returns `None` when the platform has no config directory.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join("config.toml"))
}

fn config_error(message: &str) -> Error {
    Error::ConfigError {
        message: message.to_string(),
    }
}
