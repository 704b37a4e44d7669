//! Registry data model and JSON loading
//!
//! Two registries drive the harness, both loaded once at startup and passed
//! by reference into every component so unit tests can inject them directly
//! without touching the filesystem:
//!
//! - `runtimes.json` — map of runtime name to [`RuntimeDescriptor`]
//! - `test_cases.json` — map of suite name to an ordered list of [`TestCase`]
//!
//! JSON objects carry no reliable key order, so both registries are
//! `BTreeMap`s: iteration order is deterministic name order. Cases within a
//! suite keep their file order.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::errors::HarnessError;

/// Default per-test timeout in seconds when a test case declares none.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// One executable runtime implementation of umlang.
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeDescriptor {
    /// Path to the executable artifact, relative to the repository root.
    pub path: String,
    /// Shell-invocable build instruction; absent means already built.
    #[serde(default)]
    pub build_cmd: Option<String>,
    /// Platform keys (`"<os>-<arch>"`) the runtime supports, or the `"all"`
    /// sentinel. Absent triggers legacy name-based heuristic matching.
    #[serde(default)]
    pub platforms: Option<Vec<String>>,
}

/// One executable test scenario within a suite.
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    /// Human-readable identifier, unique within its suite.
    pub name: String,
    /// Program file path, relative to the test-programs root.
    pub program: String,
    /// Text fed to the runtime's standard input, then closed.
    #[serde(default)]
    pub input: Option<String>,
    /// Exact string the runtime's stdout must equal; absent means only the
    /// exit status is checked.
    #[serde(default)]
    pub expected: Option<String>,
    /// Seconds before forced termination.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// When true, successful execution time is reported even on success.
    #[serde(default)]
    pub benchmark: bool,
}

/// Map of runtime name to descriptor.
pub type RuntimeRegistry = BTreeMap<String, RuntimeDescriptor>;

/// Map of suite name to ordered test cases.
pub type SuiteRegistry = BTreeMap<String, Vec<TestCase>>;

/// Load the runtime registry from a JSON file.
pub fn load_runtimes(path: &Path) -> Result<RuntimeRegistry, HarnessError> {
    let text = fs::read_to_string(path)
        .map_err(|e| HarnessError::Config(format!("failed to read {}: {}", path.display(), e)))?;
    Ok(serde_json::from_str(&text)?)
}

/// Load the test-case registry from a JSON file.
pub fn load_suites(path: &Path) -> Result<SuiteRegistry, HarnessError> {
    let text = fs::read_to_string(path)
        .map_err(|e| HarnessError::Config(format!("failed to read {}: {}", path.display(), e)))?;
    Ok(serde_json::from_str(&text)?)
}
