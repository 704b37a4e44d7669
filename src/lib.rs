#![deny(unsafe_code)]
//! umlang Runtime Test Harness
//!
//! Validates interchangeable executable "runtime" implementations of umlang
//! against a shared suite of test programs and expected outputs. The harness
//! resolves platform compatibility, builds a runtime if its descriptor says
//! so, executes each test program through the runtime with a wall-clock
//! timeout, and aggregates pass/fail/timing statistics.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`.
//!   The `cli` and `harness` modules enforce `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//! - **Per-test failures**: a bad test case (missing file, crash, timeout)
//!   becomes a failed [`TestOutcome`], never a panic or an aborted run.
//! - **Unsafe code**: confined to the single `killpg` call in the executor
//!   that takes a timed-out child's process group down with it.

pub mod cli;
pub mod harness;
pub mod version;

pub use harness::errors::HarnessError;
pub use harness::executor::TestOutcome;
pub use harness::platform::PlatformIdentity;
pub use harness::registry::{RuntimeDescriptor, RuntimeRegistry, SuiteRegistry, TestCase};
pub use harness::reporter::{ConsoleReporter, SilentReporter, TestReporter};
pub use harness::suite::SuiteSummary;
pub use harness::{Harness, HarnessPaths};
