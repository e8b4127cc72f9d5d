//! Application domain types and pure validation functions.
//!
//! This module is intentionally free of I/O, async, and external layer
//! imports. URL derivation and input validation live here so the rules can
//! be tested without a broker.

use std::path::PathBuf;

use anyhow::Result;

use crate::domain::error::ValidationError;

/// Maximum length of an application name.
pub const APP_NAME_MAX_LENGTH: usize = 32;

/// Maximum length of a namespace.
pub const NAMESPACE_MAX_LENGTH: usize = 16;

/// Maximum number of attempts for every polling loop (DNS, health check).
pub const MAX_RETRIES: u32 = 7;

/// Initial polling interval in seconds. Doubles after each failed attempt.
pub const INITIAL_DELAY_SECS: u64 = 2;

/// Characters that may never appear in a login.
const LOGIN_FORBIDDEN: &[char] = &[
    '"', '$', '^', '<', '>', '|', '%', '/', ';', ':', ',', '\\', '*', '=', '~',
];

// ── Types ─────────────────────────────────────────────────────────────────────

/// Authenticated identity. The password is never logged; debug output masks it.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

/// Everything needed to derive the application's addresses.
#[derive(Debug, Clone)]
pub struct AppSpec {
    /// Application name (alphanumeric, at most 32 characters).
    pub name: String,
    /// Cartridge (framework) identifier, e.g. `"rack-1.1"`.
    pub cartridge: String,
    /// User namespace, from the broker's user-info response.
    pub namespace: String,
    /// Domain suffix, from the broker's user-info response.
    pub domain: String,
}

impl AppSpec {
    /// Fully-qualified hostname: `{name}-{namespace}.{domain}`.
    #[must_use]
    pub fn fqdn(&self) -> String {
        format!("{}-{}.{}", self.name, self.namespace, self.domain)
    }

    /// Public application URL.
    #[must_use]
    pub fn app_url(&self) -> String {
        format!("http://{}/", self.fqdn())
    }

    /// Git remote URL for the given application UUID.
    #[must_use]
    pub fn git_url(&self, app_uuid: &str) -> String {
        format!("ssh://{app_uuid}@{}/~/git/{}.git/", self.fqdn(), self.name)
    }
}

/// Decoded payload of a successful create-app call.
#[derive(Debug, Clone)]
pub struct CreatedApp {
    pub uuid: String,
    pub health_check_path: String,
    /// Server-reported result text, shown to the user at the end.
    pub result: Option<String>,
    /// Server-reported informational messages.
    pub messages: Vec<String>,
}

/// Summary of a completed provisioning run.
#[derive(Debug, Clone)]
pub struct ProvisionResult {
    pub app_uuid: String,
    pub fqdn: String,
    pub health_check_path: String,
    pub git_url: String,
    /// Local clone directory, `None` when cloning was skipped.
    pub repo_dir: Option<PathBuf>,
    pub result_message: Option<String>,
}

// ── Validation ────────────────────────────────────────────────────────────────

/// Validate a login before it is sent anywhere.
///
/// # Errors
///
/// Returns an error when the login is empty or contains a forbidden character.
pub fn validate_login(login: &str) -> Result<()> {
    if login.is_empty() {
        return Err(ValidationError::LoginRequired.into());
    }
    if login.chars().any(|c| LOGIN_FORBIDDEN.contains(&c)) {
        return Err(ValidationError::LoginForbiddenChars.into());
    }
    Ok(())
}

/// Validate an application name: alphanumeric, at most 32 characters.
///
/// # Errors
///
/// Returns an error when the name is empty, non-alphanumeric, or too long.
pub fn validate_app_name(name: &str) -> Result<()> {
    validate_field(name, "application", APP_NAME_MAX_LENGTH)
}

/// Validate a namespace: alphanumeric, at most 16 characters.
///
/// # Errors
///
/// Returns an error when the namespace is empty, non-alphanumeric, or too long.
pub fn validate_namespace(namespace: &str) -> Result<()> {
    validate_field(namespace, "namespace", NAMESPACE_MAX_LENGTH)
}

fn validate_field(value: &str, field: &'static str, max: usize) -> Result<()> {
    if value.is_empty() {
        return Err(ValidationError::Required { field }.into());
    }
    if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::NonAlphanumeric { field }.into());
    }
    if value.len() > max {
        return Err(ValidationError::TooLong { field, max }.into());
    }
    Ok(())
}

// ── Backoff ───────────────────────────────────────────────────────────────────

/// Next polling interval: the current interval doubled.
#[must_use]
pub fn next_delay(interval_secs: u64) -> u64 {
    interval_secs * 2
}

// ── Unit tests ────────────────────────────────────────────────────────────────
