//! Integration tests for the harness library API
//!
//! Each test assembles a throwaway repository layout (registries under
//! `tests/`, programs under `umasm/umbinary/`) in the system temp dir and
//! drives the public `Harness` API against `/bin/sh` as a stand-in runtime.

#![cfg(unix)]

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use um_harness::{
    Harness, HarnessError, HarnessPaths, PlatformIdentity, SuiteSummary, TestCase, TestOutcome,
    TestReporter,
};

/// Throwaway repository layout, removed on drop.
struct FixtureRepo {
    root: PathBuf,
}

impl FixtureRepo {
    fn new(tag: &str) -> Self {
        let root = std::env::temp_dir().join(format!(
            "um_harness_it_{}_{}_{}",
            tag,
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0)
        ));
        fs::create_dir_all(root.join("tests")).unwrap();
        fs::create_dir_all(root.join("umasm/umbinary")).unwrap();
        Self { root }
    }

    fn write_registries(&self, runtimes: &str, test_cases: &str) {
        fs::write(self.root.join("tests/runtimes.json"), runtimes).unwrap();
        fs::write(self.root.join("tests/test_cases.json"), test_cases).unwrap();
    }

    fn write_program(&self, name: &str, contents: &str) {
        fs::write(self.root.join("umasm/umbinary").join(name), contents).unwrap();
    }

    fn harness(&self) -> Harness {
        Harness::load(&self.root).unwrap()
    }
}

impl Drop for FixtureRepo {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

/// Reporter that records which tests executed and how they fared.
#[derive(Default)]
struct RecordingReporter {
    tests: Vec<(String, bool)>,
    builds_started: Vec<String>,
    incompatible_warnings: usize,
}

impl TestReporter for RecordingReporter {
    fn on_build_start(&mut self, runtime: &str) {
        self.builds_started.push(runtime.to_string());
    }

    fn on_incompatible_platform(&mut self, _runtime: &str, _key: &str, _compatible: &[String]) {
        self.incompatible_warnings += 1;
    }

    fn on_test_complete(&mut self, case: &TestCase, outcome: &TestOutcome) {
        self.tests.push((case.name.clone(), outcome.passed));
    }

    fn on_run_complete(&mut self, _summary: &SuiteSummary) {}
}

const SH_RUNTIME: &str = r#"{"interp": {"path": "/bin/sh", "platforms": ["all"]}}"#;

#[test]
fn echo_test_passes_with_exact_output() {
    let repo = FixtureRepo::new("echo");
    repo.write_registries(
        SH_RUNTIME,
        r#"{"basic": [{"name": "echo", "program": "echo.um", "expected": "hello\n"}]}"#,
    );
    repo.write_program("echo.um", "echo hello\n");

    let mut reporter = RecordingReporter::default();
    let summary = repo.harness().run("interp", None, &mut reporter).unwrap();

    assert_eq!(summary.total, 1);
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.success_rate(), 100.0);
    assert_eq!(reporter.tests, [("echo".to_string(), true)]);
}

#[test]
fn bad_exit_reports_code_in_diagnostic() {
    let repo = FixtureRepo::new("badexit");
    repo.write_registries(
        SH_RUNTIME,
        r#"{"basic": [{"name": "bad-exit", "program": "fail.um"}]}"#,
    );
    repo.write_program("fail.um", "exit 1\n");

    let mut reporter = RecordingReporter::default();
    let summary = repo.harness().run("interp", None, &mut reporter).unwrap();

    assert_eq!((summary.total, summary.passed), (1, 0));
    assert_eq!(summary.success_rate(), 0.0);
    assert_eq!(reporter.tests, [("bad-exit".to_string(), false)]);
}

#[test]
fn unknown_runtime_runs_zero_tests_and_suggests() {
    let repo = FixtureRepo::new("ghost");
    repo.write_registries(
        SH_RUNTIME,
        r#"{"basic": [{"name": "echo", "program": "echo.um"}]}"#,
    );
    repo.write_program("echo.um", "echo hello\n");

    let mut reporter = RecordingReporter::default();
    let err = repo.harness().run("ghost", None, &mut reporter).unwrap_err();

    match err {
        HarnessError::UnknownRuntime { name, compatible } => {
            assert_eq!(name, "ghost");
            assert_eq!(compatible, ["interp"]);
        }
        other => panic!("expected UnknownRuntime, got {other:?}"),
    }
    assert!(reporter.tests.is_empty(), "no test may execute");
}

#[test]
fn unknown_suite_runs_zero_tests() {
    let repo = FixtureRepo::new("nosuite");
    repo.write_registries(
        SH_RUNTIME,
        r#"{"basic": [{"name": "echo", "program": "echo.um"}]}"#,
    );
    repo.write_program("echo.um", "echo hello\n");

    let mut reporter = RecordingReporter::default();
    let err = repo
        .harness()
        .run("interp", Some("ghost-suite"), &mut reporter)
        .unwrap_err();

    assert!(matches!(err, HarnessError::UnknownSuite { name } if name == "ghost-suite"));
    assert!(reporter.tests.is_empty());
}

#[test]
fn failed_build_aborts_before_any_test() {
    let repo = FixtureRepo::new("buildfail");
    repo.write_registries(
        r#"{"jit": {"path": "/bin/sh", "build_cmd": "echo broken >&2; exit 1", "platforms": ["all"]}}"#,
        r#"{"basic": [{"name": "echo", "program": "echo.um"}]}"#,
    );
    repo.write_program("echo.um", "echo hello\n");

    let mut reporter = RecordingReporter::default();
    let err = repo.harness().run("jit", None, &mut reporter).unwrap_err();

    match err {
        HarnessError::BuildFailed { runtime, stderr } => {
            assert_eq!(runtime, "jit");
            assert!(stderr.contains("broken"));
        }
        other => panic!("expected BuildFailed, got {other:?}"),
    }
    assert_eq!(reporter.builds_started, ["jit"]);
    assert!(reporter.tests.is_empty(), "build failure must abort the run");
}

#[test]
fn named_suite_runs_only_that_suite() {
    let repo = FixtureRepo::new("selection");
    repo.write_registries(
        SH_RUNTIME,
        r#"{
            "alpha": [{"name": "a", "program": "ok.um"}],
            "beta": [{"name": "b", "program": "ok.um"}]
        }"#,
    );
    repo.write_program("ok.um", "exit 0\n");

    let mut reporter = RecordingReporter::default();
    let summary = repo
        .harness()
        .run("interp", Some("beta"), &mut reporter)
        .unwrap();

    assert_eq!(summary.total, 1);
    assert_eq!(reporter.tests, [("b".to_string(), true)]);
}

#[test]
fn all_suites_run_in_registry_order() {
    let repo = FixtureRepo::new("order");
    repo.write_registries(
        SH_RUNTIME,
        r#"{
            "beta": [{"name": "b1", "program": "ok.um"}, {"name": "b2", "program": "ok.um"}],
            "alpha": [{"name": "a1", "program": "ok.um"}]
        }"#,
    );
    repo.write_program("ok.um", "exit 0\n");

    let mut reporter = RecordingReporter::default();
    let summary = repo.harness().run("interp", None, &mut reporter).unwrap();

    assert_eq!(summary.total, 3);
    let names: Vec<&str> = reporter.tests.iter().map(|(n, _)| n.as_str()).collect();
    // BTreeMap registry order: suite names sorted, cases in file order.
    assert_eq!(names, ["a1", "b1", "b2"]);
}

#[test]
fn failure_does_not_stop_remaining_cases() {
    let repo = FixtureRepo::new("keepgoing");
    repo.write_registries(
        SH_RUNTIME,
        r#"{"basic": [
            {"name": "boom", "program": "fail.um"},
            {"name": "after", "program": "ok.um"}
        ]}"#,
    );
    repo.write_program("fail.um", "exit 1\n");
    repo.write_program("ok.um", "exit 0\n");

    let mut reporter = RecordingReporter::default();
    let summary = repo.harness().run("interp", None, &mut reporter).unwrap();

    assert_eq!((summary.total, summary.passed), (2, 1));
    assert_eq!(
        reporter.tests,
        [("boom".to_string(), false), ("after".to_string(), true)]
    );
}

#[test]
fn timed_out_case_is_killed_and_suite_proceeds() {
    let repo = FixtureRepo::new("timeout");
    repo.write_registries(
        SH_RUNTIME,
        r#"{"basic": [
            {"name": "slow", "program": "slow.um", "timeout": 1},
            {"name": "after", "program": "ok.um"}
        ]}"#,
    );
    repo.write_program("slow.um", "sleep 30\n");
    repo.write_program("ok.um", "exit 0\n");

    let start = std::time::Instant::now();
    let mut reporter = RecordingReporter::default();
    let summary = repo.harness().run("interp", None, &mut reporter).unwrap();

    assert_eq!((summary.total, summary.passed), (2, 1));
    assert_eq!(reporter.tests[0].1, false);
    assert!(
        start.elapsed() < Duration::from_secs(15),
        "harness must not wait out the child's sleep"
    );
}

#[test]
fn stdin_roundtrip_with_expected_output() {
    let repo = FixtureRepo::new("stdin");
    repo.write_registries(
        SH_RUNTIME,
        r#"{"basic": [{
            "name": "cat",
            "program": "cat.um",
            "input": "forty two\n",
            "expected": "forty two\n"
        }]}"#,
    );
    repo.write_program("cat.um", "cat -\n");

    let mut reporter = RecordingReporter::default();
    let summary = repo.harness().run("interp", None, &mut reporter).unwrap();
    assert_eq!((summary.total, summary.passed), (1, 1));
}

#[test]
fn rerun_is_idempotent_on_outcomes() {
    let repo = FixtureRepo::new("idempotent");
    repo.write_registries(
        SH_RUNTIME,
        r#"{"basic": [
            {"name": "ok", "program": "ok.um", "expected": "hi\n"},
            {"name": "bad", "program": "fail.um"}
        ]}"#,
    );
    repo.write_program("ok.um", "echo hi\n");
    repo.write_program("fail.um", "exit 1\n");

    let harness = repo.harness();
    let mut first = RecordingReporter::default();
    let mut second = RecordingReporter::default();
    harness.run("interp", None, &mut first).unwrap();
    harness.run("interp", None, &mut second).unwrap();
    assert_eq!(first.tests, second.tests);
}

#[test]
fn incompatible_runtime_warns_but_proceeds() {
    let repo = FixtureRepo::new("incompat");
    repo.write_registries(
        r#"{"pinned": {"path": "/bin/sh", "platforms": ["umios-vax"]}}"#,
        r#"{"basic": [{"name": "ok", "program": "ok.um"}]}"#,
    );
    repo.write_program("ok.um", "exit 0\n");

    let mut reporter = RecordingReporter::default();
    let summary = repo.harness().run("pinned", None, &mut reporter).unwrap();

    assert_eq!(reporter.incompatible_warnings, 1);
    assert_eq!((summary.total, summary.passed), (1, 1));
}

#[test]
fn load_reads_registries_from_repo_layout() {
    let repo = FixtureRepo::new("load");
    repo.write_registries(
        r#"{
            "interp": {"path": "interp/interp"},
            "jit": {"path": "jit/jit", "build_cmd": "make", "platforms": ["linux-x86_64"]}
        }"#,
        r#"{"basic": [], "io": [{"name": "cat", "program": "cat.um", "input": "x"}]}"#,
    );

    let harness = repo.harness();
    assert_eq!(harness.runtimes().len(), 2);
    assert_eq!(harness.suites().len(), 2);
    assert_eq!(harness.suites()["io"][0].name, "cat");

    let paths = HarnessPaths::new(repo.root.clone());
    assert!(paths.runtimes_file().ends_with("tests/runtimes.json"));
    assert!(paths.programs_dir().ends_with("umasm/umbinary"));
}

#[test]
fn legacy_names_resolve_against_injected_platform() {
    let repo = FixtureRepo::new("legacy");
    repo.write_registries(
        r#"{
            "jit-darwin-arm64": {"path": "jit/darwin"},
            "interp": {"path": "interp/interp"}
        }"#,
        r#"{}"#,
    );

    let harness = repo
        .harness()
        .with_platform(PlatformIdentity::from_raw("darwin", "arm64"));
    assert_eq!(
        harness.compatible_runtimes(),
        ["interp", "jit-darwin-arm64"]
    );
}
