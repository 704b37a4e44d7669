//! Single-test execution: spawn, feed stdin, capture, enforce timeout
//!
//! One test case runs one child process to completion or deadline. Supplied
//! input is written in full by a dedicated thread and the pipe is closed to
//! signal end-of-input; stdout and stderr are drained on their own threads
//! so a chatty child cannot deadlock against a full pipe. The wait loop
//! polls `try_wait` on a short sleep; on deadline expiry the whole process
//! group is killed and the child reaped so no descriptors or zombies leak.
//! On unix the child is spawned as its own process-group leader so that
//! descendants it forked die with it; they inherit the output pipes, and a
//! surviving descendant would otherwise hold the drain threads open long
//! past the deadline.
//!
//! Every failure mode, including spawn errors, becomes a failed
//! [`TestOutcome`]. The executor never aborts the harness for a single bad
//! test case.

use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use super::registry::{RuntimeDescriptor, TestCase};
use super::HarnessPaths;

/// Result of one test execution.
#[derive(Debug, Clone)]
pub struct TestOutcome {
    pub passed: bool,
    /// Captured stdout on success, diagnostic text on failure.
    pub message: String,
    /// Wall-clock time; zero when no process was spawned.
    pub elapsed: Duration,
}

impl TestOutcome {
    fn fail(message: String, elapsed: Duration) -> Self {
        Self {
            passed: false,
            message,
            elapsed,
        }
    }
}

/// Captured output of a child that ran to completion or was killed.
#[derive(Debug)]
pub(crate) struct ChildOutput {
    /// Exit code; `None` when the child died to a signal.
    pub code: Option<i32>,
    pub timed_out: bool,
    pub stdout: String,
    pub stderr: String,
    /// Spawn-to-reap wall-clock time; on timeout this is time-to-kill and
    /// excludes any tail spent joining the drain threads.
    pub elapsed: Duration,
}

impl ChildOutput {
    pub(crate) fn success(&self) -> bool {
        !self.timed_out && self.code == Some(0)
    }
}

/// Run one test case against one runtime. Missing files fail without a
/// spawn; everything else is classified from the child's behavior.
pub fn run_test(desc: &RuntimeDescriptor, case: &TestCase, paths: &HarnessPaths) -> TestOutcome {
    let executable = paths.root().join(&desc.path);
    let program = paths.programs_dir().join(&case.program);

    if !executable.exists() {
        return TestOutcome::fail(
            format!("executable not found: {}", executable.display()),
            Duration::ZERO,
        );
    }
    if !program.exists() {
        return TestOutcome::fail(
            format!("test program not found: {}", program.display()),
            Duration::ZERO,
        );
    }

    let mut cmd = Command::new(&executable);
    cmd.arg(&program);

    let limit = Duration::from_secs(case.timeout);
    let start = Instant::now();
    let output = match run_with_deadline(cmd, case.input.as_deref(), limit) {
        Ok(output) => output,
        Err(e) => {
            return TestOutcome::fail(format!("execution error: {e}"), start.elapsed());
        }
    };
    let elapsed = output.elapsed;

    if output.timed_out {
        return TestOutcome::fail(format!("timeout after {}s", case.timeout), elapsed);
    }

    if !output.success() {
        let diagnostic = match output.code {
            Some(code) => format!("runtime error (exit code {}): {}", code, output.stderr),
            None => format!("runtime terminated by signal: {}", output.stderr),
        };
        return TestOutcome::fail(diagnostic, elapsed);
    }

    if let Some(expected) = case.expected.as_deref() {
        // Byte-exact: a trailing-newline difference is a mismatch.
        if output.stdout != expected {
            return TestOutcome::fail(
                format!(
                    "output mismatch: expected {:?}, got {:?}",
                    expected, output.stdout
                ),
                elapsed,
            );
        }
    }

    TestOutcome {
        passed: true,
        message: output.stdout,
        elapsed,
    }
}

/// Spawn `cmd`, optionally feed `input` to stdin, and wait up to `limit`.
/// Shared by test execution and the build step.
pub(crate) fn run_with_deadline(
    mut cmd: Command,
    input: Option<&str>,
    limit: Duration,
) -> std::io::Result<ChildOutput> {
    cmd.stdin(if input.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    // Own process group: a deadline kill must take forked descendants too,
    // and they inherit the output pipes.
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt as _;
        cmd.process_group(0);
    }

    let start = Instant::now();
    let mut child = cmd.spawn()?;

    let stdin_thread = input.map(|data| {
        let stdin = child.stdin.take();
        let data = data.to_string();
        std::thread::spawn(move || -> std::io::Result<()> {
            if let Some(mut stdin) = stdin {
                stdin.write_all(data.as_bytes())?;
                stdin.flush()?;
            }
            // Dropping the handle closes the pipe: end-of-input.
            Ok(())
        })
    });

    let stdout = child.stdout.take();
    let stdout_thread = std::thread::spawn(move || drain_pipe(stdout));
    let stderr = child.stderr.take();
    let stderr_thread = std::thread::spawn(move || drain_pipe(stderr));

    let (status, timed_out) = wait_with_deadline(&mut child, limit)?;
    let elapsed = start.elapsed();

    if let Some(handle) = stdin_thread {
        let _ = handle.join();
    }
    let stdout = stdout_thread.join().unwrap_or_default();
    let stderr = stderr_thread.join().unwrap_or_default();

    Ok(ChildOutput {
        code: status.code(),
        timed_out,
        stdout,
        stderr,
        elapsed,
    })
}

/// Timed wait: poll `try_wait` on a short sleep; kill and reap on expiry.
fn wait_with_deadline(child: &mut Child, limit: Duration) -> std::io::Result<(ExitStatus, bool)> {
    let deadline = Instant::now().checked_add(limit);

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok((status, false));
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            kill_process_group(child);
            let status = child.wait()?;
            return Ok((status, true));
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}

/// Kill the child's whole process group; the child is its leader.
#[cfg(unix)]
#[allow(unsafe_code)]
fn kill_process_group(child: &mut Child) {
    let pgid = child.id() as libc::pid_t;
    // SAFETY: killpg with SIGKILL on the group we created at spawn; the
    // worst a stale pgid can do is return ESRCH, which we ignore.
    unsafe {
        libc::killpg(pgid, libc::SIGKILL);
    }
    let _ = child.kill();
}

#[cfg(not(unix))]
fn kill_process_group(child: &mut Child) {
    let _ = child.kill();
}

/// Capture a pipe to the end as text.
fn drain_pipe<R: Read>(pipe: Option<R>) -> String {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    String::from_utf8_lossy(&buf).into_owned()
}
