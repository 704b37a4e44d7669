//! Harness error taxonomy
//!
//! Configuration and build errors abort an invocation and surface here.
//! Per-test failures deliberately do not: they are absorbed into failed
//! [`crate::harness::executor::TestOutcome`]s so one bad test case never
//! stops the remaining suite.

use thiserror::Error;

/// Errors that abort a harness invocation.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("unknown runtime '{name}'")]
    UnknownRuntime {
        name: String,
        /// Runtimes compatible with the detected platform, for suggestions.
        compatible: Vec<String>,
    },

    #[error("unknown test suite '{name}'")]
    UnknownSuite { name: String },

    #[error("build failed for '{runtime}':\n{stderr}")]
    BuildFailed { runtime: String, stderr: String },

    #[error("build timed out for '{runtime}' after {limit}s")]
    BuildTimeout { runtime: String, limit: u64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
