//! Typed broker response decoding.
//!
//! The broker answers every call with a JSON object using a fixed set of
//! recognized keys. Decoding happens exactly once, at the broker-client
//! boundary; everything above this layer works with typed structs.

#![allow(clippy::expect_used)] // version pattern is a compile-time constant

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::domain::error::BrokerError;

// ── Reply ─────────────────────────────────────────────────────────────────────

/// A decoded broker response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrokerReply {
    /// Human-readable result text.
    pub result: Option<String>,
    /// Server-chosen process exit code for error replies.
    pub exit_code: Option<i32>,
    /// Informational messages to surface to the user.
    #[serde(default)]
    pub messages: Vec<String>,
    /// Server-side debug text, only meaningful when debug was requested.
    pub debug: Option<String>,
    /// Nested JSON payload, transmitted as a string.
    pub data: Option<String>,
    /// Server API version, `\d+.\d+.\d+` when well-formed.
    pub api: Option<String>,
    /// Broker version, `\d+.\d+.\d+` when well-formed.
    pub broker: Option<String>,
    /// Unrecognized keys, kept for debug dumps.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BrokerReply {
    /// Decode a response body.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Protocol`] when the body is not the expected
    /// JSON object.
    pub fn parse(body: &str) -> Result<Self, BrokerError> {
        serde_json::from_str(body).map_err(|e| BrokerError::Protocol(e.to_string()))
    }

    /// Decode the nested `data` payload.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Protocol`] when `data` is absent or is not
    /// valid JSON.
    pub fn parse_data(&self) -> Result<serde_json::Value, BrokerError> {
        let data = self
            .data
            .as_deref()
            .ok_or_else(|| BrokerError::Protocol("response carried no data payload".into()))?;
        serde_json::from_str(data).map_err(|e| BrokerError::Protocol(e.to_string()))
    }
}

// ── Version tracking ──────────────────────────────────────────────────────────

fn version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\A\d+\.\d+\.\d+\z").expect("valid pattern"))
}

/// Whether a server-reported version string is well-formed.
#[must_use]
pub fn is_version(s: &str) -> bool {
    version_re().is_match(s)
}

/// Last-known-good server version strings, updated from every decoded reply.
#[derive(Debug, Clone)]
pub struct ServerVersions {
    pub api: String,
    pub broker: String,
}

impl Default for ServerVersions {
    fn default() -> Self {
        Self {
            api: "?.?.?".into(),
            broker: "?.?.?".into(),
        }
    }
}

impl ServerVersions {
    /// Absorb version strings from a reply. Malformed or absent values are
    /// ignored, never an error.
    pub fn absorb(&mut self, reply: &BrokerReply) {
        if let Some(api) = reply.api.as_deref() {
            if is_version(api) {
                self.api = api.to_owned();
            }
        }
        if let Some(broker) = reply.broker.as_deref() {
            if is_version(broker) {
                self.broker = broker.to_owned();
            }
        }
    }
}

// ── User info ─────────────────────────────────────────────────────────────────

/// Per-session user information, obtained once from the broker and read-only
/// thereafter.
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub namespace: String,
    pub domain: String,
    /// Full decoded payload, for debug dumps.
    pub raw: serde_json::Value,
}

impl UserInfo {
    /// Extract user info from a decoded userinfo reply.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Protocol`] when the nested payload is missing
    /// the expected fields.
    pub fn from_reply(reply: &BrokerReply) -> Result<Self, BrokerError> {
        let raw = reply.parse_data()?;
        let info = raw
            .get("user_info")
            .ok_or_else(|| BrokerError::Protocol("user_info missing from response".into()))?;
        let namespace = string_field(info, "namespace")?;
        let domain = string_field(info, "domain")?;
        Ok(Self { namespace, domain, raw })
    }
}

fn string_field(value: &serde_json::Value, key: &str) -> Result<String, BrokerError> {
    value
        .get(key)
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| BrokerError::Protocol(format!("{key} missing from response")))
}

// ── Unit tests ────────────────────────────────────────────────────────────────
