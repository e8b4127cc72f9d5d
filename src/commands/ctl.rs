//! `nimbus ctl` — generic application control actions.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ControlRequest;
use crate::application::services::control;
use crate::domain::app::validate_app_name;

/// Arguments for the ctl command.
#[derive(Args)]
pub struct CtlArgs {
    /// Application name
    #[arg(short = 'a', long)]
    pub app: String,

    /// Action to perform (start, stop, restart, reload, status, ...)
    #[arg(short = 'c', long = "command")]
    pub action: String,

    /// Apply the action to this embedded cartridge instead of the app itself
    #[arg(short = 'e', long)]
    pub embedded: Option<String>,

    /// Server alias for alias-management actions
    #[arg(long)]
    pub alias: Option<String>,

    /// Login for the Nimbus platform
    #[arg(short = 'l', long)]
    pub login: String,

    /// Password (prompted when omitted)
    #[arg(short = 'p', long)]
    pub password: Option<String>,
}

/// Run `nimbus ctl`.
///
/// # Errors
///
/// Returns validation or broker errors; `main` maps each to its documented
/// exit status.
pub async fn run(args: &CtlArgs, app: &AppContext) -> Result<()> {
    validate_app_name(&args.app)?;
    let creds = super::obtain_credentials(&args.login, args.password.as_deref(), app)?;

    let req = ControlRequest {
        app_name: &args.app,
        action: &args.action,
        embedded: args.embedded.is_some(),
        framework: args.embedded.as_deref(),
        server_alias: args.alias.as_deref(),
    };

    let reporter = app.reporter();
    control::control_app(&app.broker, &reporter, &req, &creds, app.config.debug).await?;
    reporter.finish(&format!("'{}' completed for '{}'", args.action, args.app));
    Ok(())
}
