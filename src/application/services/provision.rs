//! Provisioning orchestrator — the `create` state machine.
//!
//! Sequencing: create the remote application, arm a rollback stack, wait for
//! DNS, clone the repository, then hand a summary back to the caller. Every
//! irreversible local or remote side effect registers a compensating action;
//! any failure after the remote create unwinds the stack exactly once, in
//! reverse push order. The two success paths (Done and the documented
//! DNS-timeout soft-success) disarm the stack instead.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::{
    BrokerClient, DnsResolver, ProgressReporter, RepoCloner, Sleeper,
};
use crate::application::services::probe;
use crate::domain::app::{
    validate_app_name, validate_login, validate_namespace, AppSpec, Credentials, ProvisionResult,
};

/// Caller-selected knobs for a provisioning run.
#[derive(Debug, Clone)]
pub struct ProvisionOptions {
    /// Skip the DNS readiness wait.
    pub skip_dns: bool,
    /// Skip the local clone.
    pub skip_clone: bool,
    /// Where to clone the new repository.
    pub repo_dir: PathBuf,
    /// Debug mode: verbose clone, extra poll diagnostics.
    pub debug: bool,
}

/// Terminal outcome of a provisioning run.
#[derive(Debug)]
pub enum ProvisionOutcome {
    /// The full flow completed.
    Created(ProvisionResult),
    /// DNS never became resolvable. The remote application exists and is
    /// healthy as far as the broker is concerned, so this is reported as
    /// success with manual follow-up instructions; no rollback fires.
    DnsTimedOut {
        fqdn: String,
        app_url: String,
        git_url: String,
        repo_dir: PathBuf,
    },
}

/// Compensating actions, unwound in reverse push order on failure.
#[derive(Debug)]
enum Compensation {
    DestroyRemoteApp,
    RemoveCloneDir(PathBuf),
}

#[derive(Debug, Default)]
struct RollbackStack {
    actions: Vec<Compensation>,
}

impl RollbackStack {
    fn push(&mut self, action: Compensation) {
        self.actions.push(action);
    }

    /// Suppress all registered compensations. Called exactly once on each
    /// success path.
    fn disarm(&mut self) {
        self.actions.clear();
    }

    /// Execute all registered compensations in reverse push order.
    /// Compensation failures are reported but never override the original
    /// error.
    async fn unwind(
        &mut self,
        broker: &impl BrokerClient,
        git: &impl RepoCloner,
        spec: &AppSpec,
        creds: &Credentials,
        reporter: &impl ProgressReporter,
    ) {
        while let Some(action) = self.actions.pop() {
            match action {
                Compensation::RemoveCloneDir(dir) => {
                    reporter.warn("cleaning up git repo");
                    git.remove_repo(&dir);
                }
                Compensation::DestroyRemoteApp => {
                    reporter.warn("cleaning up application");
                    if let Err(err) = broker.destroy_app(&spec.name, creds).await {
                        reporter.warn(&format!("application cleanup failed: {err:#}"));
                    }
                }
            }
        }
    }
}

/// Run the `create` state machine.
///
/// Inputs are validated before any remote call. A create failure needs no
/// rollback (nothing exists yet) and propagates directly; a clone failure
/// destroys the just-created remote application before returning.
///
/// # Errors
///
/// Returns validation errors, broker errors from the create call, or a
/// [`crate::domain::error::CloneError`] after rollback has run.
pub async fn provision_app(
    broker: &impl BrokerClient,
    dns: &impl DnsResolver,
    git: &impl RepoCloner,
    sleeper: &impl Sleeper,
    reporter: &impl ProgressReporter,
    spec: &AppSpec,
    creds: &Credentials,
    opts: &ProvisionOptions,
) -> Result<ProvisionOutcome> {
    validate_login(&creds.login)?;
    validate_app_name(&spec.name)?;
    validate_namespace(&spec.namespace)?;

    reporter.step(&format!(
        "attempting to create remote application space: {}",
        spec.name
    ));
    let created = broker.create_app(spec, creds).await?;
    for message in &created.messages {
        reporter.step(message);
    }

    // The remote slot now exists; from here on, every failure must destroy it.
    let mut rollback = RollbackStack::default();
    rollback.push(Compensation::DestroyRemoteApp);

    let fqdn = spec.fqdn();
    let git_url = spec.git_url(&created.uuid);

    if !opts.skip_dns {
        reporter.step("your new domain name is being propagated worldwide (this might take a minute)...");
        if !probe::wait_for_dns(dns, sleeper, reporter, &fqdn).await {
            // Soft-success: the app is up, only our resolver hasn't caught up.
            // The deferred cleanup is suppressed for this specific exit.
            rollback.disarm();
            return Ok(ProvisionOutcome::DnsTimedOut {
                app_url: spec.app_url(),
                git_url,
                repo_dir: opts.repo_dir.clone(),
                fqdn,
            });
        }
        reporter.success(&format!("{fqdn} resolves"));
    }

    if !opts.skip_clone {
        reporter.step(&format!("cloning {git_url}"));
        if let Err(err) = git.clone_repo(&git_url, &opts.repo_dir, !opts.debug).await {
            rollback.unwind(broker, git, spec, creds, reporter).await;
            return Err(err);
        }
        rollback.push(Compensation::RemoveCloneDir(opts.repo_dir.clone()));
    }

    rollback.disarm();
    Ok(ProvisionOutcome::Created(ProvisionResult {
        app_uuid: created.uuid,
        fqdn,
        health_check_path: created.health_check_path,
        git_url,
        repo_dir: (!opts.skip_clone).then(|| opts.repo_dir.clone()),
        result_message: created.result,
    }))
}
