//! `nimbus info` — show account information from the broker.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::BrokerClient as _;

/// Arguments for the info command.
#[derive(Args)]
pub struct InfoArgs {
    /// Login for the Nimbus platform
    #[arg(short = 'l', long)]
    pub login: String,

    /// Password (prompted when omitted)
    #[arg(short = 'p', long)]
    pub password: Option<String>,
}

/// Run `nimbus info`.
///
/// # Errors
///
/// Returns validation or broker errors; `main` maps each to its documented
/// exit status (97 for bad credentials, 99 when no domain is registered).
pub async fn run(args: &InfoArgs, app: &AppContext) -> Result<()> {
    let creds = super::obtain_credentials(&args.login, args.password.as_deref(), app)?;

    let info = app.broker.user_info(&creds).await?;

    let ctx = &app.output;
    ctx.header("account");
    ctx.kv("Login", &creds.login);
    ctx.kv("Namespace", &info.namespace);
    ctx.kv("Domain", &info.domain);

    if app.config.debug {
        println!("{}", serde_json::to_string_pretty(&info.raw)?);
        let versions = app.broker.server_versions();
        ctx.kv("API version", &versions.api);
        ctx.kv("Broker version", &versions.broker);
    }
    Ok(())
}
