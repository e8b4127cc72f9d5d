//! Shared mock infrastructure for unit tests.
//!
//! Provides canned port implementations and output helpers so each test file
//! doesn't have to re-define the same boilerplate.

#![allow(clippy::expect_used)]
#![allow(dead_code)] // not every test file uses every mock

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;

use nimbus_cli::application::ports::{
    BrokerClient, ControlRequest, DnsResolver, HttpProbe, ProbeResponse, ProgressReporter,
    RepoCloner, Sleeper,
};
use nimbus_cli::domain::app::{AppSpec, CreatedApp, Credentials};
use nimbus_cli::domain::error::{BrokerError, CloneError};
use nimbus_cli::domain::response::{BrokerReply, UserInfo};

fn unexpected<T>() -> Result<T> {
    anyhow::bail!("not expected in this test")
}

// ── Reporter ──────────────────────────────────────────────────────────────────

/// Swallows all progress output.
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}

// ── Sleeper ───────────────────────────────────────────────────────────────────

/// Records every requested sleep without actually sleeping.
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn recorded_secs(&self) -> Vec<u64> {
        self.sleeps
            .lock()
            .expect("mutex poisoned")
            .iter()
            .map(Duration::as_secs)
            .collect()
    }
}

impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().expect("mutex poisoned").push(duration);
    }
}

// ── Resolver ──────────────────────────────────────────────────────────────────

/// Resolver that succeeds starting from a given attempt number (1-based);
/// `None` means it never succeeds.
pub struct ScriptedResolver {
    succeed_on: Option<u32>,
    calls: Mutex<u32>,
}

impl ScriptedResolver {
    pub fn never() -> Self {
        Self { succeed_on: None, calls: Mutex::new(0) }
    }

    pub fn succeeds_on(attempt: u32) -> Self {
        Self { succeed_on: Some(attempt), calls: Mutex::new(0) }
    }

    pub fn call_count(&self) -> u32 {
        *self.calls.lock().expect("mutex poisoned")
    }
}

impl DnsResolver for ScriptedResolver {
    async fn resolves(&self, _host: &str) -> bool {
        let mut calls = self.calls.lock().expect("mutex poisoned");
        *calls += 1;
        self.succeed_on.is_some_and(|n| *calls >= n)
    }
}

// ── HTTP probe ────────────────────────────────────────────────────────────────

/// One scripted health-check response.
pub enum ProbeStep {
    Respond { status: u16, body: &'static [u8] },
    TransportError,
}

/// Plays back a scripted sequence of responses; the final step repeats once
/// the script is exhausted.
pub struct ScriptedProbe {
    script: Mutex<VecDeque<ProbeStep>>,
    last: ProbeStep,
    calls: Mutex<u32>,
}

impl ScriptedProbe {
    pub fn always(status: u16, body: &'static [u8]) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            last: ProbeStep::Respond { status, body },
            calls: Mutex::new(0),
        }
    }

    pub fn sequence(steps: Vec<ProbeStep>, then: ProbeStep) -> Self {
        Self {
            script: Mutex::new(steps.into()),
            last: then,
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        *self.calls.lock().expect("mutex poisoned")
    }
}

impl HttpProbe for ScriptedProbe {
    async fn get(&self, _url: &str) -> Result<ProbeResponse> {
        *self.calls.lock().expect("mutex poisoned") += 1;
        let step = self.script.lock().expect("mutex poisoned").pop_front();
        match step.as_ref().unwrap_or(&self.last) {
            ProbeStep::Respond { status, body } => Ok(ProbeResponse {
                status: *status,
                body: body.to_vec(),
            }),
            ProbeStep::TransportError => anyhow::bail!("connection refused"),
        }
    }
}

// ── Broker ────────────────────────────────────────────────────────────────────

/// Configurable broker mock recording create/destroy/control traffic.
pub struct MockBroker {
    pub create_result: Box<dyn Fn() -> Result<CreatedApp> + Send + Sync>,
    pub create_calls: Mutex<u32>,
    pub destroy_calls: Mutex<Vec<String>>,
    pub control_calls: Mutex<Vec<(String, String, bool)>>,
}

impl MockBroker {
    pub fn creating(created: CreatedApp) -> Self {
        Self {
            create_result: Box::new(move || Ok(created.clone())),
            create_calls: Mutex::new(0),
            destroy_calls: Mutex::new(Vec::new()),
            control_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_create(exit_code: i32) -> Self {
        Self {
            create_result: Box::new(move || {
                Err(BrokerError::Server {
                    exit_code: Some(exit_code),
                    detail: "problem reported from server".into(),
                }
                .into())
            }),
            create_calls: Mutex::new(0),
            destroy_calls: Mutex::new(Vec::new()),
            control_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn create_count(&self) -> u32 {
        *self.create_calls.lock().expect("mutex poisoned")
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.destroy_calls.lock().expect("mutex poisoned").clone()
    }

    pub fn controlled(&self) -> Vec<(String, String, bool)> {
        self.control_calls.lock().expect("mutex poisoned").clone()
    }
}

impl BrokerClient for MockBroker {
    async fn user_info(&self, _creds: &Credentials) -> Result<UserInfo> {
        unexpected()
    }

    async fn create_app(&self, _spec: &AppSpec, _creds: &Credentials) -> Result<CreatedApp> {
        *self.create_calls.lock().expect("mutex poisoned") += 1;
        (self.create_result)()
    }

    async fn destroy_app(&self, app_name: &str, _creds: &Credentials) -> Result<()> {
        self.destroy_calls
            .lock()
            .expect("mutex poisoned")
            .push(app_name.to_owned());
        Ok(())
    }

    async fn control_app(
        &self,
        req: &ControlRequest<'_>,
        _creds: &Credentials,
    ) -> Result<BrokerReply> {
        self.control_calls.lock().expect("mutex poisoned").push((
            req.app_name.to_owned(),
            req.action.to_owned(),
            req.embedded,
        ));
        Ok(BrokerReply::default())
    }

    async fn list_cartridges(&self, _cart_type: &str) -> Result<Vec<String>> {
        unexpected()
    }
}

// ── Repo cloner ───────────────────────────────────────────────────────────────

/// Cloner mock recording clone and remove traffic.
pub struct MockCloner {
    fail: bool,
    pub clone_calls: Mutex<Vec<(String, PathBuf, bool)>>,
    pub removed: Mutex<Vec<PathBuf>>,
}

impl MockCloner {
    pub fn ok() -> Self {
        Self {
            fail: false,
            clone_calls: Mutex::new(Vec::new()),
            removed: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            clone_calls: Mutex::new(Vec::new()),
            removed: Mutex::new(Vec::new()),
        }
    }

    pub fn cloned(&self) -> Vec<(String, PathBuf, bool)> {
        self.clone_calls.lock().expect("mutex poisoned").clone()
    }

    pub fn removed_dirs(&self) -> Vec<PathBuf> {
        self.removed.lock().expect("mutex poisoned").clone()
    }
}

impl RepoCloner for MockCloner {
    async fn clone_repo(&self, git_url: &str, target_dir: &Path, quiet: bool) -> Result<()> {
        self.clone_calls.lock().expect("mutex poisoned").push((
            git_url.to_owned(),
            target_dir.to_path_buf(),
            quiet,
        ));
        if self.fail {
            return Err(CloneError { output: "fatal: could not read from remote".into() }.into());
        }
        Ok(())
    }

    fn remove_repo(&self, target_dir: &Path) {
        self.removed
            .lock()
            .expect("mutex poisoned")
            .push(target_dir.to_path_buf());
    }
}
