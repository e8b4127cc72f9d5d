//! `nimbus create` — provision an application end to end.
//!
//! Validates input, resolves user info, runs the provisioning orchestrator,
//! then confirms the application answers its health check. DNS-timeout is a
//! soft success: manual instructions are printed and the process exits 0.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::BrokerClient;
use crate::application::services::probe;
use crate::application::services::provision::{
    provision_app, ProvisionOptions, ProvisionOutcome,
};
use crate::domain::app::{validate_app_name, AppSpec, ProvisionResult, MAX_RETRIES};
use crate::infra::ssh;
use crate::output::OutputContext;

/// Arguments for the create command.
#[derive(Args)]
pub struct CreateArgs {
    /// Application name (alphanumeric, max 32 characters)
    #[arg(short = 'a', long)]
    pub app: String,

    /// Cartridge (framework) type, e.g. rack-1.1
    #[arg(short = 't', long = "type")]
    pub cartridge: String,

    /// Login for the Nimbus platform
    #[arg(short = 'l', long)]
    pub login: String,

    /// Password (prompted when omitted)
    #[arg(short = 'p', long)]
    pub password: Option<String>,

    /// Directory to clone the repository into (defaults to the app name)
    #[arg(short = 'r', long)]
    pub repo: Option<PathBuf>,

    /// Skip waiting for DNS propagation
    #[arg(long)]
    pub no_dns: bool,

    /// Skip the local git clone
    #[arg(long)]
    pub no_git: bool,
}

/// Run `nimbus create`.
///
/// # Errors
///
/// Returns validation, broker, or clone errors; `main` maps each to its
/// documented exit status.
pub async fn run(args: &CreateArgs, app: &AppContext) -> Result<()> {
    validate_app_name(&args.app)?;
    let creds = super::obtain_credentials(&args.login, args.password.as_deref(), app)?;

    if ssh::resolve_key_file(&app.config).is_none() {
        app.output.warn("unable to find an SSH key file.");
        app.output.warn(ssh::KEY_GUIDANCE);
    }

    let info = app.broker.user_info(&creds).await?;
    let spec = AppSpec {
        name: args.app.clone(),
        cartridge: args.cartridge.clone(),
        namespace: info.namespace,
        domain: info.domain,
    };
    let repo_dir = args
        .repo
        .clone()
        .unwrap_or_else(|| PathBuf::from(&args.app));

    let opts = ProvisionOptions {
        skip_dns: args.no_dns,
        skip_clone: args.no_git,
        repo_dir,
        debug: app.config.debug,
    };

    let reporter = app.reporter();
    let outcome = provision_app(
        &app.broker,
        &app.dns,
        &app.git,
        &app.sleeper,
        &reporter,
        &spec,
        &creds,
        &opts,
    )
    .await;
    reporter.clear();

    match outcome? {
        ProvisionOutcome::DnsTimedOut { fqdn, app_url, git_url, repo_dir } => {
            print_dns_timeout_notice(&app.output, &args.app, &args.login, &fqdn, &app_url, &git_url, &repo_dir);
            Ok(())
        }
        ProvisionOutcome::Created(result) => {
            // Jenkins-type cartridges manage their own repo; only nag about
            // the skipped clone in debug mode for those.
            if args.no_git && (app.config.debug || !args.cartridge.contains("jenkins")) {
                print_no_clone_notice(&app.output);
            }
            confirm_available(args, app, &result).await;
            Ok(())
        }
    }
}

/// Poll the health-check URL and print the final summary.
///
/// Exhaustion is not a failure: the app may simply still be starting.
async fn confirm_available(args: &CreateArgs, app: &AppContext, result: &ProvisionResult) {
    let url = format!(
        "http://{}/{}",
        result.fqdn,
        result.health_check_path.trim_start_matches('/')
    );

    let reporter = app.reporter();
    let healthy = probe::wait_for_healthy(
        &app.health,
        &app.sleeper,
        &reporter,
        &url,
        MAX_RETRIES,
        app.config.debug,
    )
    .await;

    if healthy {
        reporter.finish(&format!("application '{}' is available", args.app));
    } else {
        reporter.clear();
        app.output.warn(&format!(
            "application '{}' did not answer its health check yet — it may still be starting. \
             Give it a minute and check the URL below.",
            args.app
        ));
    }

    let ctx = &app.output;
    ctx.header(&format!("your application '{}' is now published here:", args.app));
    ctx.kv("URL", &format!("http://{}/", result.fqdn));
    ctx.kv("Git remote", &result.git_url);
    match result.repo_dir.as_deref() {
        Some(dir) => ctx.kv(
            "Next",
            &format!("commit to {} and 'git push' to publish changes", dir.display()),
        ),
        None => ctx.kv(
            "Next",
            &format!("git clone {} and 'git push' to publish changes", result.git_url),
        ),
    }
    if let Some(message) = result.result_message.as_deref() {
        if !message.is_empty() {
            ctx.info(message);
        }
    }
}

/// Manual-fallback instructions for the DNS-timeout soft-success path.
fn print_dns_timeout_notice(
    ctx: &OutputContext,
    app_name: &str,
    login: &str,
    fqdn: &str,
    app_url: &str,
    git_url: &str,
    repo_dir: &std::path::Path,
) {
    ctx.warn(&format!(
        "we weren't able to look up your hostname ({fqdn}) in a reasonable amount of time. \
         This can happen periodically and will just take an extra minute or two to propagate \
         depending on where you are in the world. Once you can reach your application in a \
         browser, clone your git repository."
    ));
    ctx.kv("Application URL", app_url);
    ctx.kv("Git repository URL", git_url);
    ctx.kv(
        "Git clone command",
        &format!("git clone {git_url} {}", repo_dir.display()),
    );
    ctx.info(&format!(
        "if you can't get '{app_name}' running in the browser, you can destroy and recreate it: \
         nimbus destroy -a {app_name} -l {login}"
    ));
}

fn print_no_clone_notice(ctx: &OutputContext) {
    ctx.info(
        "no local repo has been created (--no-git). You can't make changes to your published \
         application until you clone it yourself; see the git URL below.",
    );
}
