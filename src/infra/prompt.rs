//! Password prompting — implements `PasswordPrompt` with dialoguer.

use anyhow::{Context, Result};

use crate::application::ports::PasswordPrompt;

/// Interactive terminal prompt. Input is never echoed.
pub struct TerminalPrompt;

impl PasswordPrompt for TerminalPrompt {
    fn read_password(&self) -> Result<String> {
        dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .context("reading password")
    }
}
