//! Single-call application control flows — `destroy` and `ctl`.
//!
//! Unlike provisioning there is no multi-step rollback here: validate, issue
//! one broker call, surface the server's messages, done.

use anyhow::Result;

use crate::application::ports::{BrokerClient, ControlRequest, ProgressReporter};
use crate::domain::app::{validate_app_name, validate_login, Credentials};
use crate::domain::response::BrokerReply;

/// Issue a control action against an application and report the outcome.
///
/// # Errors
///
/// Returns validation errors or the broker's typed error; the caller maps it
/// to the documented exit status.
pub async fn control_app(
    broker: &impl BrokerClient,
    reporter: &impl ProgressReporter,
    req: &ControlRequest<'_>,
    creds: &Credentials,
    debug: bool,
) -> Result<()> {
    validate_login(&creds.login)?;
    validate_app_name(req.app_name)?;

    let reply = broker.control_app(req, creds).await?;
    report_reply(reporter, &reply, debug);
    Ok(())
}

/// Destroy an application — a control flow with the `deconfigure` action.
///
/// # Errors
///
/// Same as [`control_app`].
pub async fn destroy_app(
    broker: &impl BrokerClient,
    reporter: &impl ProgressReporter,
    app_name: &str,
    creds: &Credentials,
    debug: bool,
) -> Result<()> {
    let req = ControlRequest {
        app_name,
        action: "deconfigure",
        embedded: false,
        framework: None,
        server_alias: None,
    };
    control_app(broker, reporter, &req, creds, debug).await
}

/// Print a successful reply: messages always, result text only in debug mode
/// (matching the broker's own verbosity convention).
fn report_reply(reporter: &impl ProgressReporter, reply: &BrokerReply, debug: bool) {
    for message in &reply.messages {
        reporter.step(message);
    }
    if debug {
        if let Some(result) = reply.result.as_deref() {
            reporter.success(result);
        }
    }
}
