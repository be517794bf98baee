//! Version command implementation.

use anyhow::Result;
use std::io::Write;
use wasi_launch_core::cli::ExitCode;

/// Prints the linked runtime version to stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn run() -> Result<ExitCode> {
    run_with(&mut std::io::stdout().lock())
}

fn run_with(out: &mut impl Write) -> Result<ExitCode> {
    writeln!(out, "{}", wasi_launch_runtime::version())?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_output() {
        let mut out = Vec::new();
        let code = run_with(&mut out).unwrap();

        assert!(code.is_success());
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.trim_end(), wasi_launch_runtime::version());
        assert!(!text.trim().is_empty());
    }
}
