//! Core types, configuration, and errors for wasi-launch.
//!
//! This crate provides the foundational types shared by the runtime glue
//! and the command-line front end.
//!
//! # Architecture
//!
//! The core consists of:
//! - Error hierarchy covering construction, host module, and execution failures
//! - Strong types for CLI-supplied values (`DirMapping`, `EnvVar`, `MemoryLimit`)
//! - The optional TOML configuration file (`LaunchConfig`)
//! - Process exit codes

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;
mod types;

pub mod cli;

pub use config::{
    CONFIG_DIR_NAME, DEFAULT_ENTRY_POINT, LaunchConfig, RuntimeSection, WasiSection,
    default_config_path,
};
pub use error::{Error, Result};
pub use types::{DIR_MAPPING_SEPARATOR, DirMapping, EnvVar, MAX_MEMORY_MB, MemoryLimit};
