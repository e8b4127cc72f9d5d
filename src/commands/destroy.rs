//! `nimbus destroy` — remove an application from the platform.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::control;
use crate::domain::app::validate_app_name;

/// Arguments for the destroy command.
#[derive(Args)]
pub struct DestroyArgs {
    /// Application name
    #[arg(short = 'a', long)]
    pub app: String,

    /// Login for the Nimbus platform
    #[arg(short = 'l', long)]
    pub login: String,

    /// Password (prompted when omitted)
    #[arg(short = 'p', long)]
    pub password: Option<String>,
}

/// Run `nimbus destroy`.
///
/// # Errors
///
/// Returns validation or broker errors; `main` maps each to its documented
/// exit status.
pub async fn run(args: &DestroyArgs, app: &AppContext) -> Result<()> {
    validate_app_name(&args.app)?;
    let creds = super::obtain_credentials(&args.login, args.password.as_deref(), app)?;

    let reporter = app.reporter();
    control::destroy_app(&app.broker, &reporter, &args.app, &creds, app.config.debug).await?;
    reporter.finish(&format!("application '{}' destroyed", args.app));
    Ok(())
}
