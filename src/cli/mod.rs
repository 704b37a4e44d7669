//! CLI for the umlang test harness
//!
//! ## Usage
//!
//! - `umtest <runtime>` - run all suites against a runtime
//! - `umtest <runtime> <suite>` - run one named suite
//! - `umtest` - print usage, the detected platform, available runtimes
//!   (marked compatible/incompatible) and suite names; exit non-zero
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros. Command
//! functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits. The exit
//! status reflects overall success: 0 only when the build succeeded and
//! every executed test passed.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::fmt;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use crate::harness::errors::HarnessError;
use crate::harness::reporter::ConsoleReporter;
use crate::harness::Harness;
use crate::version::UM_HARNESS_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Test harness for umlang runtime implementations
#[derive(Parser, Debug)]
#[command(name = "umtest")]
#[command(version = UM_HARNESS_VERSION)]
#[command(about = "Test harness for umlang runtime implementations", long_about = None)]
pub struct Cli {
    /// Runtime implementation to test
    #[arg(value_name = "RUNTIME")]
    pub runtime: Option<String>,

    /// Test suite to run (default: all suites)
    #[arg(value_name = "SUITE")]
    pub suite: Option<String>,

    /// Repository root containing tests/ and umasm/umbinary/
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Report timing for every test, not just benchmarks
    #[arg(short, long)]
    pub verbose: bool,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI invocation and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let Some(runtime) = cli.runtime else {
        print_usage(&cli.root);
        return Ok(ExitCode::FAILURE);
    };

    let harness = Harness::load(&cli.root)
        .map_err(|e| CliError::failure(format!("error loading configuration: {}", e)))?;

    let mut reporter = ConsoleReporter::new(cli.verbose);
    match harness.run(&runtime, cli.suite.as_deref(), &mut reporter) {
        Ok(summary) => Ok(if summary.all_passed() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }),
        Err(HarnessError::UnknownRuntime { name, compatible }) => {
            let mut msg = format!(
                "unknown runtime '{}'\ndetected platform: {} {}\ncompatible runtimes for your platform:",
                name,
                harness.platform().os,
                harness.platform().arch
            );
            for runtime in &compatible {
                msg.push_str(&format!("\n  - {}", runtime));
            }
            Err(CliError::failure(msg))
        }
        Err(e) => Err(CliError::failure(e.to_string())),
    }
}

/// Print the usage banner: platform, runtimes (marked), and suite names.
fn print_usage(root: &Path) {
    println!("Usage: umtest <RUNTIME> [SUITE]");

    // Best effort: show available options when the registries load.
    match Harness::load(root) {
        Ok(harness) => {
            let platform = harness.platform();
            println!();
            println!("Detected platform: {} {}", platform.os, platform.arch);

            let compatible = harness.compatible_runtimes();
            println!();
            println!("Recommended runtimes for your platform:");
            for name in &compatible {
                println!("  - {}", name);
            }

            println!();
            println!("All available runtimes:");
            for name in harness.runtimes().keys() {
                if compatible.contains(name) {
                    println!("  \x1b[32m+\x1b[0m {}", name);
                } else {
                    println!("  \x1b[33m!\x1b[0m {} (incompatible)", name);
                }
            }

            println!();
            println!("Available test suites:");
            for name in harness.suites().keys() {
                println!("  - {}", name);
            }
        }
        Err(e) => {
            eprintln!("error loading configuration: {}", e);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_runtime_only() {
        let cli = Cli::try_parse_from(["umtest", "interp"]).unwrap();
        assert_eq!(cli.runtime.as_deref(), Some("interp"));
        assert!(cli.suite.is_none());
        assert_eq!(cli.root, PathBuf::from("."));
    }

    #[test]
    fn test_cli_parse_runtime_and_suite() {
        let cli = Cli::try_parse_from(["umtest", "jit", "basic"]).unwrap();
        assert_eq!(cli.runtime.as_deref(), Some("jit"));
        assert_eq!(cli.suite.as_deref(), Some("basic"));
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["umtest"]).unwrap();
        assert!(cli.runtime.is_none());
        assert!(cli.suite.is_none());
    }

    #[test]
    fn test_cli_parse_root_and_verbose() {
        let cli = Cli::try_parse_from(["umtest", "--root", "/repo", "-v", "interp"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("/repo"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_rejects_extra_positionals() {
        assert!(Cli::try_parse_from(["umtest", "a", "b", "c"]).is_err());
    }
}
