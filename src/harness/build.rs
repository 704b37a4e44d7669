//! Build orchestration
//!
//! Prepares a runtime before any test runs. A runtime with no `build_cmd`
//! is already built and needs no action. A known-but-incompatible runtime
//! gets a warning, not a refusal: the build is allowed to fail naturally,
//! preserving the observable behavior older registries depend on.

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use tracing::warn;

use super::errors::HarnessError;
use super::executor::run_with_deadline;
use super::platform::{compatible_runtimes, PlatformIdentity};
use super::registry::{RuntimeDescriptor, RuntimeRegistry};
use super::reporter::TestReporter;

/// Default upper bound on a build step, in seconds.
pub const BUILD_TIMEOUT_SECS: u64 = 120;

/// Build `name` if its descriptor carries a build command, giving the build
/// at most `limit` of wall-clock time. Returns the descriptor on success so
/// callers proceed straight to execution.
pub fn build_runtime<'r>(
    name: &str,
    registry: &'r RuntimeRegistry,
    identity: &PlatformIdentity,
    root: &Path,
    limit: Duration,
    reporter: &mut dyn TestReporter,
) -> Result<&'r RuntimeDescriptor, HarnessError> {
    let Some(desc) = registry.get(name) else {
        return Err(HarnessError::UnknownRuntime {
            name: name.to_string(),
            compatible: compatible_runtimes(registry, identity),
        });
    };

    let compatible = compatible_runtimes(registry, identity);
    if !compatible.iter().any(|n| n == name) {
        warn!(
            runtime = name,
            platform = %identity.key,
            "runtime may not be compatible with this platform"
        );
        reporter.on_incompatible_platform(name, &identity.key, &compatible);
    }

    let Some(build_cmd) = desc.build_cmd.as_deref() else {
        return Ok(desc);
    };

    reporter.on_build_start(name);
    let output = run_with_deadline(shell_command(build_cmd, root), None, limit)?;

    if output.timed_out {
        return Err(HarnessError::BuildTimeout {
            runtime: name.to_string(),
            limit: limit.as_secs(),
        });
    }
    if !output.success() {
        return Err(HarnessError::BuildFailed {
            runtime: name.to_string(),
            stderr: output.stderr,
        });
    }

    reporter.on_build_complete(name);
    Ok(desc)
}

/// Shell-interpreted command with the repository root as working directory.
#[cfg(unix)]
fn shell_command(command: &str, root: &Path) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command).current_dir(root);
    cmd
}

#[cfg(windows)]
fn shell_command(command: &str, root: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command).current_dir(root);
    cmd
}
