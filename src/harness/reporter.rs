//! Test progress and summary reporting
//!
//! ## TestReporter Trait
//!
//! The harness reports through a `TestReporter` trait to separate
//! presentation from execution. Implement the trait for custom output
//! formats (JSON, TAP, etc.); the default [`ConsoleReporter`] prints
//! incrementally with ANSI color.

use super::executor::TestOutcome;
use super::registry::TestCase;
use super::suite::SuiteSummary;

/// Trait for reporting harness progress.
pub trait TestReporter {
    /// Called before a runtime's build command is spawned.
    fn on_build_start(&mut self, _runtime: &str) {}

    /// Called after a build command exits successfully.
    fn on_build_complete(&mut self, _runtime: &str) {}

    /// Called when a known runtime is not in the compatible set for the
    /// detected platform. The build proceeds anyway.
    fn on_incompatible_platform(&mut self, _runtime: &str, _platform_key: &str, _compatible: &[String]) {
    }

    /// Called once before any suite runs.
    fn on_run_start(&mut self, _runtime: &str) {}

    /// Called before each suite's cases run.
    fn on_suite_start(&mut self, _suite: &str) {}

    /// Called after each test case completes.
    fn on_test_complete(&mut self, case: &TestCase, outcome: &TestOutcome);

    /// Called after all suites complete.
    fn on_run_complete(&mut self, summary: &SuiteSummary);
}

/// Default console reporter.
#[derive(Default)]
pub struct ConsoleReporter {
    /// Report timing for every test, not just benchmarks.
    pub verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl TestReporter for ConsoleReporter {
    fn on_build_start(&mut self, runtime: &str) {
        println!("building {}...", runtime);
    }

    fn on_build_complete(&mut self, runtime: &str) {
        println!("\x1b[32mbuild successful\x1b[0m for {}", runtime);
    }

    fn on_incompatible_platform(&mut self, runtime: &str, platform_key: &str, compatible: &[String]) {
        eprintln!(
            "\x1b[33mwarning\x1b[0m: runtime '{}' may not be compatible with your platform ({})",
            runtime, platform_key
        );
        eprintln!("compatible runtimes for your platform:");
        for name in compatible {
            eprintln!("  - {}", name);
        }
        eprintln!("continuing anyway (build may fail)");
    }

    fn on_run_start(&mut self, runtime: &str) {
        println!();
        println!(
            "\x1b[1m=========== running tests for {} ===========\x1b[0m",
            runtime
        );
    }

    fn on_suite_start(&mut self, suite: &str) {
        println!();
        println!("\x1b[1m{}\x1b[0m:", suite.to_uppercase());
    }

    fn on_test_complete(&mut self, case: &TestCase, outcome: &TestOutcome) {
        if outcome.passed {
            if case.benchmark || self.verbose {
                println!(
                    "  \x1b[32mPASSED\x1b[0m {} ({:.3}s)",
                    case.name,
                    outcome.elapsed.as_secs_f64()
                );
            } else {
                println!("  \x1b[32mPASSED\x1b[0m {}", case.name);
            }
        } else if self.verbose {
            println!(
                "  \x1b[31mFAILED\x1b[0m {} ({:.3}s): {}",
                case.name,
                outcome.elapsed.as_secs_f64(),
                outcome.message
            );
        } else {
            println!("  \x1b[31mFAILED\x1b[0m {}: {}", case.name, outcome.message);
        }
    }

    fn on_run_complete(&mut self, summary: &SuiteSummary) {
        println!();
        if summary.total == 0 {
            println!("no tests collected");
            return;
        }

        let color = if summary.all_passed() {
            "\x1b[1;32m"
        } else {
            "\x1b[1;31m"
        };
        println!(
            "{}=========== {}/{} passed ({:.1}%) in {:.3}s ===========\x1b[0m",
            color,
            summary.passed,
            summary.total,
            summary.success_rate(),
            summary.elapsed.as_secs_f64()
        );
        if !summary.all_passed() {
            println!("{} test(s) failed", summary.failed());
        }
    }
}

/// Reporter that swallows everything; used by unit tests and embedders that
/// only want the returned [`SuiteSummary`].
#[derive(Default)]
pub struct SilentReporter;

impl TestReporter for SilentReporter {
    fn on_test_complete(&mut self, _case: &TestCase, _outcome: &TestOutcome) {}

    fn on_run_complete(&mut self, _summary: &SuiteSummary) {}
}
