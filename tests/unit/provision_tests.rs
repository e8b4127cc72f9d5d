//! Tests for the provisioning orchestrator and its rollback behavior.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use nimbus_cli::application::ports::ControlRequest;
use nimbus_cli::application::services::control::{control_app, destroy_app};
use nimbus_cli::application::services::provision::{
    provision_app, ProvisionOptions, ProvisionOutcome,
};
use nimbus_cli::domain::app::{AppSpec, CreatedApp, Credentials};
use nimbus_cli::domain::error::exit_code_for;

use crate::mocks::{MockBroker, MockCloner, NullReporter, RecordingSleeper, ScriptedResolver};

fn spec() -> AppSpec {
    AppSpec {
        name: "foo".into(),
        cartridge: "rack-1.1".into(),
        namespace: "bar".into(),
        domain: "example.com".into(),
    }
}

fn creds() -> Credentials {
    Credentials {
        login: "user@example.com".into(),
        password: "secret".into(),
    }
}

fn created() -> CreatedApp {
    CreatedApp {
        uuid: "abc123".into(),
        health_check_path: "health".into(),
        result: Some("Successfully created application".into()),
        messages: vec![],
    }
}

fn opts() -> ProvisionOptions {
    ProvisionOptions {
        skip_dns: false,
        skip_clone: false,
        repo_dir: PathBuf::from("foo"),
        debug: false,
    }
}

#[tokio::test]
async fn happy_path_creates_resolves_and_clones() {
    let broker = MockBroker::creating(created());
    let dns = ScriptedResolver::succeeds_on(1);
    let git = MockCloner::ok();
    let sleeper = RecordingSleeper::default();

    let outcome = provision_app(
        &broker, &dns, &git, &sleeper, &NullReporter, &spec(), &creds(), &opts(),
    )
    .await
    .expect("provisioning should succeed");

    let ProvisionOutcome::Created(result) = outcome else {
        panic!("expected Created outcome");
    };
    assert_eq!(result.app_uuid, "abc123");
    assert_eq!(result.fqdn, "foo-bar.example.com");
    assert_eq!(result.git_url, "ssh://abc123@foo-bar.example.com/~/git/foo.git/");
    assert_eq!(result.repo_dir, Some(PathBuf::from("foo")));

    assert_eq!(broker.create_count(), 1);
    assert!(broker.destroyed().is_empty(), "no rollback on success");

    let clones = git.cloned();
    assert_eq!(clones.len(), 1);
    let (url, dir, quiet) = &clones[0];
    assert_eq!(url, &result.git_url);
    assert_eq!(dir, &PathBuf::from("foo"));
    assert!(*quiet, "non-debug clone is quiet");
}

#[tokio::test]
async fn clone_failure_destroys_the_remote_application() {
    let broker = MockBroker::creating(created());
    let dns = ScriptedResolver::succeeds_on(1);
    let git = MockCloner::failing();
    let sleeper = RecordingSleeper::default();

    let err = provision_app(
        &broker, &dns, &git, &sleeper, &NullReporter, &spec(), &creds(), &opts(),
    )
    .await
    .expect_err("clone failure must propagate");

    assert_eq!(exit_code_for(&err), 216);
    assert_eq!(broker.destroyed(), vec!["foo".to_string()]);
    assert!(
        git.removed_dirs().is_empty(),
        "the failed clone dir was never registered for removal"
    );
}

#[tokio::test]
async fn dns_exhaustion_is_a_soft_success_without_rollback() {
    let broker = MockBroker::creating(created());
    let dns = ScriptedResolver::never();
    let git = MockCloner::ok();
    let sleeper = RecordingSleeper::default();

    let outcome = provision_app(
        &broker, &dns, &git, &sleeper, &NullReporter, &spec(), &creds(), &opts(),
    )
    .await
    .expect("DNS timeout is not an error");

    let ProvisionOutcome::DnsTimedOut { fqdn, app_url, git_url, repo_dir } = outcome else {
        panic!("expected DnsTimedOut outcome");
    };
    assert_eq!(fqdn, "foo-bar.example.com");
    assert_eq!(app_url, "http://foo-bar.example.com/");
    assert_eq!(git_url, "ssh://abc123@foo-bar.example.com/~/git/foo.git/");
    assert_eq!(repo_dir, PathBuf::from("foo"));

    assert!(broker.destroyed().is_empty(), "soft-success must not destroy");
    assert!(git.cloned().is_empty(), "no clone without DNS");
}

#[tokio::test]
async fn create_failure_propagates_without_rollback() {
    let broker = MockBroker::failing_create(129);
    let dns = ScriptedResolver::succeeds_on(1);
    let git = MockCloner::ok();
    let sleeper = RecordingSleeper::default();

    let err = provision_app(
        &broker, &dns, &git, &sleeper, &NullReporter, &spec(), &creds(), &opts(),
    )
    .await
    .expect_err("create failure must propagate");

    assert_eq!(exit_code_for(&err), 129);
    assert!(broker.destroyed().is_empty(), "nothing to roll back");
    assert_eq!(dns.call_count(), 0);
    assert!(git.cloned().is_empty());
}

#[tokio::test]
async fn skip_flags_bypass_dns_and_clone() {
    let broker = MockBroker::creating(created());
    let dns = ScriptedResolver::never();
    let git = MockCloner::ok();
    let sleeper = RecordingSleeper::default();
    let opts = ProvisionOptions { skip_dns: true, skip_clone: true, ..opts() };

    let outcome = provision_app(
        &broker, &dns, &git, &sleeper, &NullReporter, &spec(), &creds(), &opts,
    )
    .await
    .expect("should succeed");

    let ProvisionOutcome::Created(result) = outcome else {
        panic!("expected Created outcome");
    };
    assert_eq!(result.repo_dir, None);
    assert_eq!(dns.call_count(), 0);
    assert!(git.cloned().is_empty());
    assert!(sleeper.recorded_secs().is_empty());
}

#[tokio::test]
async fn invalid_login_fails_before_any_broker_call() {
    let broker = MockBroker::creating(created());
    let dns = ScriptedResolver::succeeds_on(1);
    let git = MockCloner::ok();
    let sleeper = RecordingSleeper::default();
    let creds = Credentials { login: "bad/login".into(), password: "pw".into() };

    let err = provision_app(
        &broker, &dns, &git, &sleeper, &NullReporter, &spec(), &creds, &opts(),
    )
    .await
    .expect_err("forbidden login character");

    assert_eq!(exit_code_for(&err), 1);
    assert_eq!(broker.create_count(), 0);
}

#[tokio::test]
async fn invalid_app_name_fails_before_any_broker_call() {
    let broker = MockBroker::creating(created());
    let dns = ScriptedResolver::succeeds_on(1);
    let git = MockCloner::ok();
    let sleeper = RecordingSleeper::default();
    let spec = AppSpec { name: "my-app".into(), ..spec() };

    let err = provision_app(
        &broker, &dns, &git, &sleeper, &NullReporter, &spec, &creds(), &opts(),
    )
    .await
    .expect_err("hyphenated name");

    assert_eq!(exit_code_for(&err), 1);
    assert_eq!(broker.create_count(), 0);
}

// ── Control service ───────────────────────────────────────────────────────────

#[tokio::test]
async fn control_dispatches_the_requested_action() {
    let broker = MockBroker::creating(created());
    let req = ControlRequest {
        app_name: "foo",
        action: "restart",
        embedded: false,
        framework: None,
        server_alias: None,
    };

    control_app(&broker, &NullReporter, &req, &creds(), false)
        .await
        .expect("control should succeed");

    assert_eq!(
        broker.controlled(),
        vec![("foo".to_string(), "restart".to_string(), false)]
    );
}

#[tokio::test]
async fn destroy_sends_the_deconfigure_action() {
    let broker = MockBroker::creating(created());

    destroy_app(&broker, &NullReporter, "foo", &creds(), false)
        .await
        .expect("destroy should succeed");

    assert_eq!(
        broker.controlled(),
        vec![("foo".to_string(), "deconfigure".to_string(), false)]
    );
}

#[tokio::test]
async fn control_rejects_invalid_app_name_before_calling_out() {
    let broker = MockBroker::creating(created());
    let req = ControlRequest {
        app_name: "bad name",
        action: "stop",
        embedded: false,
        framework: None,
        server_alias: None,
    };

    let err = control_app(&broker, &NullReporter, &req, &creds(), false)
        .await
        .expect_err("space in app name");

    assert_eq!(exit_code_for(&err), 1);
    assert!(broker.controlled().is_empty());
}
