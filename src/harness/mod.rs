//! Harness core: orchestration of runtime builds and test execution
//!
//! ## Modules
//!
//! - `platform` - Platform identity and runtime compatibility resolution
//! - `registry` - Registry data model and JSON loading
//! - `errors` - Error taxonomy
//! - `build` - Build orchestration with timeout
//! - `executor` - Per-test process execution with timeout and classification
//! - `suite` - Suite sequencing and aggregation
//! - `reporter` - Progress/summary reporting trait and console implementation
//!
//! ## Design
//!
//! Configuration is loaded once per invocation into immutable registries and
//! passed by reference into each component; nothing is ambient. Execution is
//! strictly sequential: one test runs to completion or timeout before the
//! next begins.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod build;
pub mod errors;
pub mod executor;
pub mod platform;
pub mod registry;
pub mod reporter;
pub mod suite;

use std::path::{Path, PathBuf};

use errors::HarnessError;
use platform::PlatformIdentity;
use registry::{RuntimeRegistry, SuiteRegistry};
use reporter::TestReporter;
use suite::SuiteSummary;

/// Well-known locations under the repository root.
#[derive(Debug, Clone)]
pub struct HarnessPaths {
    root: PathBuf,
}

impl HarnessPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the two registry files.
    pub fn config_dir(&self) -> PathBuf {
        self.root.join("tests")
    }

    pub fn runtimes_file(&self) -> PathBuf {
        self.config_dir().join("runtimes.json")
    }

    pub fn test_cases_file(&self) -> PathBuf {
        self.config_dir().join("test_cases.json")
    }

    /// Fixed root for test program files.
    pub fn programs_dir(&self) -> PathBuf {
        self.root.join("umasm").join("umbinary")
    }
}

/// Top-level coordinator for a single invocation: one runtime, optionally
/// one suite.
pub struct Harness {
    paths: HarnessPaths,
    platform: PlatformIdentity,
    runtimes: RuntimeRegistry,
    suites: SuiteRegistry,
}

impl Harness {
    /// Assemble a harness from already-loaded registries. Unit tests inject
    /// registries here without touching the filesystem.
    pub fn new(paths: HarnessPaths, runtimes: RuntimeRegistry, suites: SuiteRegistry) -> Self {
        Self {
            paths,
            platform: PlatformIdentity::detect(),
            runtimes,
            suites,
        }
    }

    /// Override the detected platform; for tests of compatibility behavior.
    pub fn with_platform(mut self, platform: PlatformIdentity) -> Self {
        self.platform = platform;
        self
    }

    /// Load both registries from `<root>/tests/`.
    pub fn load(root: impl Into<PathBuf>) -> Result<Self, HarnessError> {
        let paths = HarnessPaths::new(root);
        let runtimes = registry::load_runtimes(&paths.runtimes_file())?;
        let suites = registry::load_suites(&paths.test_cases_file())?;
        Ok(Self::new(paths, runtimes, suites))
    }

    pub fn platform(&self) -> &PlatformIdentity {
        &self.platform
    }

    pub fn runtimes(&self) -> &RuntimeRegistry {
        &self.runtimes
    }

    pub fn suites(&self) -> &SuiteRegistry {
        &self.suites
    }

    /// Runtimes eligible to run on the detected platform.
    pub fn compatible_runtimes(&self) -> Vec<String> {
        platform::compatible_runtimes(&self.runtimes, &self.platform)
    }

    /// Build the runtime, then run the named suite (or all suites). A build
    /// failure aborts before any test executes.
    pub fn run(
        &self,
        runtime_name: &str,
        suite: Option<&str>,
        reporter: &mut dyn TestReporter,
    ) -> Result<SuiteSummary, HarnessError> {
        let desc = build::build_runtime(
            runtime_name,
            &self.runtimes,
            &self.platform,
            self.paths.root(),
            std::time::Duration::from_secs(build::BUILD_TIMEOUT_SECS),
            reporter,
        )?;
        suite::run_suites(runtime_name, desc, &self.suites, suite, &self.paths, reporter)
    }
}
