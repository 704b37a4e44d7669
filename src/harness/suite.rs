//! Suite sequencing and aggregation
//!
//! Drives the executor across one named suite or the whole registry, in
//! order, accumulating totals. Elapsed time sums over every case, passed and
//! failed alike. An unknown suite name aborts before any execution.

use std::time::Duration;

use super::errors::HarnessError;
use super::executor;
use super::registry::{RuntimeDescriptor, SuiteRegistry, TestCase};
use super::reporter::TestReporter;
use super::HarnessPaths;

/// Aggregate over a sequence of test outcomes. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuiteSummary {
    pub total: usize,
    pub passed: usize,
    pub elapsed: Duration,
}

impl SuiteSummary {
    pub fn failed(&self) -> usize {
        self.total - self.passed
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }

    /// Percentage of passed tests; 0.0 when no tests ran.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64 * 100.0
        }
    }
}

/// Run either the named suite or every suite in registry order, reporting
/// each outcome incrementally.
pub fn run_suites(
    runtime_name: &str,
    desc: &RuntimeDescriptor,
    suites: &SuiteRegistry,
    selection: Option<&str>,
    paths: &HarnessPaths,
    reporter: &mut dyn TestReporter,
) -> Result<SuiteSummary, HarnessError> {
    let selected: Vec<(&str, &[TestCase])> = match selection {
        Some(name) => {
            let cases = suites.get(name).ok_or_else(|| HarnessError::UnknownSuite {
                name: name.to_string(),
            })?;
            vec![(name, cases.as_slice())]
        }
        None => suites
            .iter()
            .map(|(name, cases)| (name.as_str(), cases.as_slice()))
            .collect(),
    };

    reporter.on_run_start(runtime_name);

    let mut summary = SuiteSummary::default();
    for (suite_name, cases) in selected {
        reporter.on_suite_start(suite_name);
        for case in cases {
            let outcome = executor::run_test(desc, case, paths);
            summary.total += 1;
            if outcome.passed {
                summary.passed += 1;
            }
            summary.elapsed += outcome.elapsed;
            reporter.on_test_complete(case, &outcome);
        }
    }

    reporter.on_run_complete(&summary);
    Ok(summary)
}
