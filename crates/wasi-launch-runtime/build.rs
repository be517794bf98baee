//! Records the resolved Wasmtime version for `wasi_launch_runtime::version()`.

use std::env;
use std::path::{Path, PathBuf};

/// Release line used when no lockfile is visible (e.g. a registry build).
const FALLBACK_VERSION: &str = "38.0";

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_default());

    let version = match find_lockfile(&manifest_dir) {
        Some(lockfile) => {
            println!("cargo:rerun-if-changed={}", lockfile.display());
            locked_version(&lockfile, "wasmtime").unwrap_or_else(|| FALLBACK_VERSION.to_string())
        }
        None => FALLBACK_VERSION.to_string(),
    };

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rustc-env=WASI_LAUNCH_WASMTIME_VERSION={version}");
}

fn find_lockfile(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join("Cargo.lock"))
        .find(|candidate| candidate.is_file())
}

/// Version of `package` pinned in `lockfile`, preferring the configured release line.
fn locked_version(lockfile: &Path, package: &str) -> Option<String> {
    let text = std::fs::read_to_string(lockfile).ok()?;
    let lock: toml::Table = toml::from_str(&text).ok()?;
    let major = FALLBACK_VERSION.split('.').next()?;

    let versions: Vec<&str> = lock
        .get("package")?
        .as_array()?
        .iter()
        .filter(|entry| entry.get("name").and_then(toml::Value::as_str) == Some(package))
        .filter_map(|entry| entry.get("version").and_then(toml::Value::as_str))
        .collect();

    versions
        .iter()
        .find(|v| v.split('.').next() == Some(major))
        .or_else(|| versions.first())
        .map(|v| (*v).to_string())
}
