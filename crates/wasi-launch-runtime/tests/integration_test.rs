//! Integration tests running real WASI modules from disk.

use std::path::PathBuf;
use tempfile::TempDir;
use wasi_launch_core::{DirMapping, EnvVar, MemoryLimit};
use wasi_launch_runtime::{HostRegistration, RuntimeConfig, Vm};

/// Compiles `wat` and writes it to `name` inside `dir`.
fn write_module(dir: &TempDir, name: &str, wat: &str) -> PathBuf {
    let wasm = wat::parse_str(wat).expect("Failed to parse WAT");
    let path = dir.path().join(name);
    std::fs::write(&path, wasm).expect("Failed to write module");
    path
}

fn wasi_vm(config: RuntimeConfig) -> Vm {
    let mut config = config;
    config.add_host_registration(HostRegistration::Wasi);
    Vm::new(&config).expect("Failed to create VM")
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("wasi_launch_runtime=debug")
        .with_test_writer()
        .try_init();
}

const HELLO: &str = r#"
    (module
        (import "wasi_snapshot_preview1" "fd_write"
            (func $fd_write (param i32 i32 i32 i32) (result i32)))
        (memory (export "memory") 1)
        (data (i32.const 16) "hello\n")
        (func (export "_start")
            (i32.store (i32.const 0) (i32.const 16))
            (i32.store (i32.const 4) (i32.const 6))
            (drop (call $fd_write (i32.const 1) (i32.const 0) (i32.const 1) (i32.const 8)))
        )
    )
"#;

/// Exits with the number of arguments.
const ARGC: &str = r#"
    (module
        (import "wasi_snapshot_preview1" "args_sizes_get"
            (func $args_sizes_get (param i32 i32) (result i32)))
        (import "wasi_snapshot_preview1" "proc_exit" (func $proc_exit (param i32)))
        (memory (export "memory") 1)
        (func (export "_start")
            (drop (call $args_sizes_get (i32.const 0) (i32.const 4)))
            (call $proc_exit (i32.load (i32.const 0)))
        )
    )
"#;

/// Exits with the total byte size of the argument buffer.
const ARGV_BUF_SIZE: &str = r#"
    (module
        (import "wasi_snapshot_preview1" "args_sizes_get"
            (func $args_sizes_get (param i32 i32) (result i32)))
        (import "wasi_snapshot_preview1" "proc_exit" (func $proc_exit (param i32)))
        (memory (export "memory") 1)
        (func (export "_start")
            (drop (call $args_sizes_get (i32.const 0) (i32.const 4)))
            (call $proc_exit (i32.load (i32.const 4)))
        )
    )
"#;

/// Exits with the number of environment variables.
const ENVC: &str = r#"
    (module
        (import "wasi_snapshot_preview1" "environ_sizes_get"
            (func $environ_sizes_get (param i32 i32) (result i32)))
        (import "wasi_snapshot_preview1" "proc_exit" (func $proc_exit (param i32)))
        (memory (export "memory") 1)
        (func (export "_start")
            (drop (call $environ_sizes_get (i32.const 0) (i32.const 4)))
            (call $proc_exit (i32.load (i32.const 0)))
        )
    )
"#;

/// Exits with the errno of `fd_prestat_get` on the first preopen slot.
const PRESTAT: &str = r#"
    (module
        (import "wasi_snapshot_preview1" "fd_prestat_get"
            (func $fd_prestat_get (param i32 i32) (result i32)))
        (import "wasi_snapshot_preview1" "proc_exit" (func $proc_exit (param i32)))
        (memory (export "memory") 1)
        (func (export "_start")
            (call $proc_exit (call $fd_prestat_get (i32.const 3) (i32.const 0)))
        )
    )
"#;

#[test]
fn test_hello_module_runs() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = write_module(&dir, "hello.wasm", HELLO);

    let mut vm = wasi_vm(RuntimeConfig::new());
    vm.import_module_mut(HostRegistration::Wasi)
        .unwrap()
        .init(&[path.to_str().unwrap()], &[], &[]);

    vm.run_wasm_from_file(&path, "_start")
        .expect("Expected successful execution");
}

#[test]
fn test_arguments_are_forwarded() {
    let dir = TempDir::new().unwrap();
    let path = write_module(&dir, "argc.wasm", ARGC);

    let mut vm = wasi_vm(RuntimeConfig::new());
    vm.import_module_mut(HostRegistration::Wasi)
        .unwrap()
        .init(&["argc.wasm", "one", "--two"], &[], &[]);

    let err = vm.run_wasm_from_file(&path, "_start").unwrap_err();
    assert_eq!(err.exit_code(), Some(3));
}

#[test]
fn test_arguments_are_forwarded_verbatim() {
    let dir = TempDir::new().unwrap();
    let path = write_module(&dir, "argv.wasm", ARGV_BUF_SIZE);

    let mut vm = wasi_vm(RuntimeConfig::new());
    // "a.wasm\0" + "xy\0" + "-z\0" = 7 + 3 + 3
    vm.import_module_mut(HostRegistration::Wasi)
        .unwrap()
        .init(&["a.wasm", "xy", "-z"], &[], &[]);

    let err = vm.run_wasm_from_file(&path, "_start").unwrap_err();
    assert_eq!(err.exit_code(), Some(13));
}

#[test]
fn test_environment_is_forwarded() {
    let dir = TempDir::new().unwrap();
    let path = write_module(&dir, "envc.wasm", ENVC);

    let env: Vec<EnvVar> = ["A=1", "B=2"].iter().map(|s| s.parse().unwrap()).collect();
    let mut vm = wasi_vm(RuntimeConfig::new());
    vm.import_module_mut(HostRegistration::Wasi)
        .unwrap()
        .init(&["envc.wasm"], &env, &[]);

    let err = vm.run_wasm_from_file(&path, "_start").unwrap_err();
    assert_eq!(err.exit_code(), Some(2));
}

#[test]
fn test_proc_exit_zero_is_success() {
    let dir = TempDir::new().unwrap();
    let path = write_module(&dir, "envc.wasm", ENVC);

    let mut vm = wasi_vm(RuntimeConfig::new());
    vm.import_module_mut(HostRegistration::Wasi)
        .unwrap()
        .init(&["envc.wasm"], &[], &[]);

    assert!(vm.run_wasm_from_file(&path, "_start").is_ok());
}

#[test]
fn test_preopened_directory_is_visible() {
    let dir = TempDir::new().unwrap();
    let path = write_module(&dir, "prestat.wasm", PRESTAT);

    let mut vm = wasi_vm(RuntimeConfig::new());
    vm.import_module_mut(HostRegistration::Wasi).unwrap().init(
        &["prestat.wasm"],
        &[],
        &[DirMapping::new(dir.path(), "/work")],
    );

    // errno 0: fd 3 is a preopened directory
    assert!(vm.run_wasm_from_file(&path, "_start").is_ok());
}

#[test]
fn test_no_preopen_reports_bad_descriptor() {
    let dir = TempDir::new().unwrap();
    let path = write_module(&dir, "prestat.wasm", PRESTAT);

    let mut vm = wasi_vm(RuntimeConfig::new());
    vm.import_module_mut(HostRegistration::Wasi)
        .unwrap()
        .init(&["prestat.wasm"], &[], &[]);

    // errno 8 is EBADF in wasi_snapshot_preview1
    let err = vm.run_wasm_from_file(&path, "_start").unwrap_err();
    assert_eq!(err.exit_code(), Some(8));
}

#[test]
fn test_missing_preopen_directory_fails_construction() {
    let dir = TempDir::new().unwrap();
    let path = write_module(&dir, "hello.wasm", HELLO);

    let mut vm = wasi_vm(RuntimeConfig::new());
    vm.import_module_mut(HostRegistration::Wasi).unwrap().init(
        &["hello.wasm"],
        &[],
        &[DirMapping::new(dir.path().join("missing"), "/missing")],
    );

    let err = vm.run_wasm_from_file(&path, "_start").unwrap_err();
    assert!(err.is_construction_error());
}

#[test]
fn test_trap_is_execution_error() {
    let dir = TempDir::new().unwrap();
    let path = write_module(
        &dir,
        "trap.wasm",
        r#"(module (func (export "_start") unreachable))"#,
    );

    let vm = wasi_vm(RuntimeConfig::new());
    let err = vm.run_wasm_from_file(&path, "_start").unwrap_err();
    assert!(err.is_execution_error());
    assert!(err.to_string().starts_with("error running _start:"));
}

#[test]
fn test_missing_entry_point() {
    let dir = TempDir::new().unwrap();
    let path = write_module(&dir, "lib.wasm", r#"(module (func (export "other")))"#);

    let vm = wasi_vm(RuntimeConfig::new());
    let err = vm.run_wasm_from_file(&path, "_start").unwrap_err();
    assert!(err.is_execution_error());
}

#[test]
fn test_custom_entry_point() {
    let dir = TempDir::new().unwrap();
    let path = write_module(&dir, "main.wasm", r#"(module (func (export "main")))"#);

    let vm = wasi_vm(RuntimeConfig::new());
    assert!(vm.run_wasm_from_file(&path, "main").is_ok());
}

#[test]
fn test_invalid_wasm_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("garbage.wasm");
    std::fs::write(&path, [0x00, 0x01, 0x02, 0x03]).unwrap();

    let vm = wasi_vm(RuntimeConfig::new());
    let err = vm.run_wasm_from_file(&path, "_start").unwrap_err();
    assert!(err.is_execution_error());
}

#[test]
fn test_unlinked_wasi_import_fails_without_registration() {
    let dir = TempDir::new().unwrap();
    let path = write_module(&dir, "hello.wasm", HELLO);

    let vm = Vm::new(&RuntimeConfig::new()).unwrap();
    let err = vm.run_wasm_from_file(&path, "_start").unwrap_err();
    assert!(err.is_execution_error());
}

#[test]
fn test_memory_limit_enforcement() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    // 100 pages = 6.4MB, above the 1MB ceiling
    let path = write_module(
        &dir,
        "big.wasm",
        r#"(module (memory (export "memory") 100) (func (export "_start")))"#,
    );

    let config = RuntimeConfig::new().with_memory_limit(Some(MemoryLimit::from_mb(1).unwrap()));
    let vm = wasi_vm(config);
    let err = vm.run_wasm_from_file(&path, "_start").unwrap_err();
    assert!(err.is_execution_error());
}

#[test]
fn test_fuel_exhaustion() {
    let dir = TempDir::new().unwrap();
    let path = write_module(
        &dir,
        "spin.wasm",
        r#"(module (func (export "_start") (loop $l (br $l))))"#,
    );

    let config = RuntimeConfig::new().with_max_fuel(Some(10_000));
    let vm = wasi_vm(config);
    let err = vm.run_wasm_from_file(&path, "_start").unwrap_err();
    assert!(err.is_execution_error());
}
