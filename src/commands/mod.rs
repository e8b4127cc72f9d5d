//! Command handlers — thin wiring between the CLI surface and the
//! application services.

pub mod cartridges;
pub mod create;
pub mod ctl;
pub mod destroy;
pub mod info;
pub mod version;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::PasswordPrompt as _;
use crate::domain::app::{validate_login, Credentials};

/// Validate the login and obtain a password, prompting when none was given
/// on the command line.
pub(crate) fn obtain_credentials(
    login: &str,
    password: Option<&str>,
    app: &AppContext,
) -> Result<Credentials> {
    validate_login(login)?;
    let password = match password {
        Some(p) => p.to_owned(),
        None => app.prompt.read_password()?,
    };
    Ok(Credentials {
        login: login.to_owned(),
        password,
    })
}
