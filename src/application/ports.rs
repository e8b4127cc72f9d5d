//! Port trait definitions for the application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::app::{AppSpec, CreatedApp, Credentials};
use crate::domain::response::{BrokerReply, UserInfo};

// ── Value types ───────────────────────────────────────────────────────────────

/// Parameters for a generic application control call.
#[derive(Debug, Clone, Copy)]
pub struct ControlRequest<'a> {
    /// Application name the action applies to.
    pub app_name: &'a str,
    /// Broker action verb, e.g. `"start"`, `"stop"`, `"restart"`, `"deconfigure"`.
    pub action: &'a str,
    /// Route to the embedded-cartridge endpoint instead of the standalone one.
    pub embedded: bool,
    /// Cartridge (framework) the action applies to, when required.
    pub framework: Option<&'a str>,
    /// Server alias for alias-management actions.
    pub server_alias: Option<&'a str>,
}

/// A minimal HTTP response as seen by the readiness prober.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

// ── Broker port ───────────────────────────────────────────────────────────────

/// Authenticated calls against the broker API.
///
/// Implementations must keep "could not reach the server" (transport errors)
/// distinct from decoded server error payloads; callers branch on the
/// difference.
#[allow(async_fn_in_trait)]
pub trait BrokerClient {
    /// Look up per-session user info (namespace, domain suffix).
    async fn user_info(&self, creds: &Credentials) -> Result<UserInfo>;

    /// Create a remote application slot (`configure` action).
    async fn create_app(&self, spec: &AppSpec, creds: &Credentials) -> Result<CreatedApp>;

    /// Destroy a remote application slot (`deconfigure` action). Best-effort:
    /// rollback callers ignore the result.
    async fn destroy_app(&self, app_name: &str, creds: &Credentials) -> Result<()>;

    /// Generic action dispatch (start/stop/restart/alias/embedded operations).
    async fn control_app(
        &self,
        req: &ControlRequest<'_>,
        creds: &Credentials,
    ) -> Result<BrokerReply>;

    /// Informational cartridge listing. Not authenticated.
    async fn list_cartridges(&self, cart_type: &str) -> Result<Vec<String>>;
}

// ── Probe ports ───────────────────────────────────────────────────────────────

/// DNS resolution check. "Not yet resolvable" is `false`, never an error.
#[allow(async_fn_in_trait)]
pub trait DnsResolver {
    async fn resolves(&self, host: &str) -> bool;
}

/// Plain GET for the application health check.
#[allow(async_fn_in_trait)]
pub trait HttpProbe {
    /// Fetch a URL. Transport failures are errors; the prober treats them as
    /// failed attempts.
    async fn get(&self, url: &str) -> Result<ProbeResponse>;
}

/// Abstracts sleeping so polling loops can be tested without real delays.
#[allow(async_fn_in_trait)]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

// ── Local repository port ─────────────────────────────────────────────────────

/// Local git repository management.
#[allow(async_fn_in_trait)]
pub trait RepoCloner {
    /// Clone `git_url` into `target_dir`.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::domain::error::CloneError`] carrying the captured
    /// command output when the clone fails.
    async fn clone_repo(&self, git_url: &str, target_dir: &Path, quiet: bool) -> Result<()>;

    /// Recursive best-effort delete, used only during rollback. Never fails.
    fn remove_repo(&self, target_dir: &Path);
}

// ── Command runner port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds the
    /// runner's timeout. On timeout, the child process must be killed.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
}

// ── Interaction ports ─────────────────────────────────────────────────────────

/// Returns a password without echoing input.
pub trait PasswordPrompt {
    /// Prompt for a password.
    ///
    /// # Errors
    ///
    /// Returns an error when the terminal interaction fails or is interrupted.
    fn read_password(&self) -> Result<String>;
}

/// Abstracts progress reporting so services can emit events without depending
/// on the presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
