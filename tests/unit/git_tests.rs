//! Tests for git command construction and failure capture.

#![allow(clippy::expect_used)]

use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};

use anyhow::Result;

use nimbus_cli::application::ports::{CommandRunner, RepoCloner};
use nimbus_cli::domain::error::CloneError;
use nimbus_cli::infra::git::GitCli;

type CallLog = Arc<Mutex<Vec<(String, Vec<String>)>>>;

/// Runner that records invocations and plays back a fixed output.
struct FakeRunner {
    exit_code: i32,
    stdout: &'static str,
    stderr: &'static str,
    calls: CallLog,
}

impl FakeRunner {
    fn succeeding() -> (Self, CallLog) {
        let calls = CallLog::default();
        let runner = Self { exit_code: 0, stdout: "", stderr: "", calls: Arc::clone(&calls) };
        (runner, calls)
    }

    fn failing(stdout: &'static str, stderr: &'static str) -> Self {
        Self { exit_code: 128, stdout, stderr, calls: CallLog::default() }
    }
}

impl CommandRunner for FakeRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.calls.lock().expect("mutex poisoned").push((
            program.to_owned(),
            args.iter().map(|s| (*s).to_owned()).collect(),
        ));
        Ok(Output {
            status: ExitStatus::from_raw(self.exit_code << 8),
            stdout: self.stdout.as_bytes().to_vec(),
            stderr: self.stderr.as_bytes().to_vec(),
        })
    }
}

#[tokio::test]
async fn quiet_clone_passes_the_quiet_flag() {
    let (runner, calls) = FakeRunner::succeeding();
    let git = GitCli::with_runner(runner);

    git.clone_repo("ssh://u@host/~/git/foo.git/", Path::new("foo"), true)
        .await
        .expect("clone should succeed");

    let calls = calls.lock().expect("mutex poisoned");
    assert_eq!(calls.len(), 1);
    let (program, args) = &calls[0];
    assert_eq!(program, "git");
    assert_eq!(args, &["clone", "--quiet", "ssh://u@host/~/git/foo.git/", "foo"]);
}

#[tokio::test]
async fn verbose_clone_omits_the_quiet_flag() {
    let (runner, calls) = FakeRunner::succeeding();
    let git = GitCli::with_runner(runner);

    git.clone_repo("ssh://u@host/~/git/foo.git/", Path::new("foo"), false)
        .await
        .expect("clone should succeed");

    let calls = calls.lock().expect("mutex poisoned");
    let (_, args) = &calls[0];
    assert_eq!(args, &["clone", "ssh://u@host/~/git/foo.git/", "foo"]);
}

#[tokio::test]
async fn failed_clone_captures_both_output_streams() {
    let runner = FakeRunner::failing("Cloning into 'foo'...\n", "fatal: repository not found\n");
    let git = GitCli::with_runner(runner);

    let err = git
        .clone_repo("ssh://u@host/~/git/foo.git/", Path::new("foo"), true)
        .await
        .expect_err("non-zero exit must fail");

    let clone_err = err.downcast_ref::<CloneError>().expect("typed clone error");
    assert!(clone_err.output.contains("Cloning into 'foo'"));
    assert!(clone_err.output.contains("repository not found"));
}
