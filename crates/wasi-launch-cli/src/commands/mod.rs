//! Command implementations for the launcher.
//!
//! Each mode selected by [`crate::dispatch::Invocation`] has its own module
//! returning the process exit code.

pub mod run;
pub mod usage;
pub mod version;
